use super::*;
use crate::assets::template::TemplateImage;
use crate::batch::archive::{InMemoryArchive, ZipArchive};
use crate::batch::names::NameList;
use crate::render::backend::RasterRef;

/// Paints the template unchanged; names starting with `!render` fail to render and names
/// starting with `!encode` yield an empty surface.
#[derive(Default)]
struct StubRenderer {
    buf: Vec<u8>,
    rendered: Vec<String>,
}

impl OverlayRenderer for StubRenderer {
    fn render(
        &mut self,
        template: &TemplateImage,
        text: &str,
        _style: &TextStyleConfig,
        target: RenderTarget,
    ) -> CertstampResult<RasterRef<'_>> {
        self.rendered.push(text.to_owned());
        if text.starts_with("!render") {
            return Err(CertstampError::render("glyph explosion"));
        }
        if text.starts_with("!encode") {
            return Ok(RasterRef {
                width: 0,
                height: 0,
                data: &[],
            });
        }
        self.buf.clear();
        self.buf.extend_from_slice(template.pixels());
        Ok(RasterRef {
            width: target.size.width,
            height: target.size.height,
            data: &self.buf,
        })
    }
}

struct FailingArchive;

impl ArchiveSink for FailingArchive {
    fn add_file(&mut self, _name: &str, _bytes: Vec<u8>) -> CertstampResult<EntryWrite> {
        Err(CertstampError::archive("disk full"))
    }

    fn finalize(&mut self) -> CertstampResult<Vec<u8>> {
        Err(CertstampError::archive("disk full"))
    }
}

fn store_with_template() -> TemplateStore {
    let mut store = TemplateStore::new();
    store.replace(TemplateImage::from_rgba8_premul(4, 3, vec![255; 4 * 3 * 4]).unwrap());
    store
}

fn job(format: OutputFormat) -> BatchJob {
    BatchJob::new(TextStyleConfig::default(), format, NamingConfig::default()).unwrap()
}

fn names(list: &[&str]) -> NameList {
    let mut n = NameList::new();
    n.extend_names(list.iter().copied());
    n
}

#[test]
fn sanitize_replaces_utf16_units() {
    assert_eq!(sanitize_filename("Ada Lovelace"), "Ada_Lovelace");
    assert_eq!(sanitize_filename("A!"), "A_");
    assert_eq!(sanitize_filename("José"), "Jos_");
    assert_eq!(sanitize_filename("😀x"), "__x");
    assert_eq!(sanitize_filename(""), "");
}

#[test]
fn entry_and_archive_names() {
    assert_eq!(
        entry_file_name("certificate", "Grace Hopper", OutputFormat::Jpeg),
        "certificate_Grace_Hopper.jpg"
    );
    let archive = archive_file_name("certificate_bulk");
    let millis = archive
        .strip_prefix("certificate_bulk_")
        .and_then(|s| s.strip_suffix(".zip"))
        .unwrap();
    assert!(millis.parse::<i64>().unwrap() > 0);
}

#[test]
fn naming_is_validated() {
    let bad = NamingConfig {
        file_prefix: "../x".to_owned(),
        ..NamingConfig::default()
    };
    assert!(BatchJob::new(TextStyleConfig::default(), OutputFormat::Png, bad).is_err());
    let empty = NamingConfig {
        archive_prefix: String::new(),
        ..NamingConfig::default()
    };
    assert!(empty.validate().is_err());
}

#[test]
fn invalid_style_is_rejected_up_front() {
    let mut style = TextStyleConfig::default();
    style.font_size = -1.0;
    let err = BatchJob::new(style, OutputFormat::Png, NamingConfig::default()).unwrap_err();
    assert!(matches!(err, CertstampError::Validation(_)));
}

#[test]
fn empty_list_is_a_precondition_error_with_no_work() {
    let store = store_with_template();
    let mut r = StubRenderer::default();
    let mut a = InMemoryArchive::new();
    let err = run_batch(&mut r, &mut a, &store, &[], &job(OutputFormat::Png)).unwrap_err();
    assert!(matches!(err, CertstampError::Precondition(_)));
    assert!(r.rendered.is_empty());
    assert!(!a.is_finalized());
}

#[test]
fn missing_template_is_a_precondition_error() {
    let store = TemplateStore::new();
    let mut r = StubRenderer::default();
    let mut a = InMemoryArchive::new();
    let list = names(&["Ada"]);
    let err = run_batch(&mut r, &mut a, &store, list.entries(), &job(OutputFormat::Png)).unwrap_err();
    assert!(matches!(err, CertstampError::Precondition(_)));
    assert!(r.rendered.is_empty());
}

#[test]
fn distinct_names_give_one_file_each_in_order() {
    let store = store_with_template();
    let mut r = StubRenderer::default();
    let mut a = InMemoryArchive::new();
    let list = names(&["Ada", "Grace", "Katherine"]);
    let report = run_batch(&mut r, &mut a, &store, list.entries(), &job(OutputFormat::Png)).unwrap();

    assert_eq!(report.succeeded, 3);
    assert_eq!(report.failed, 0);
    assert_eq!(report.files_in_archive(), 3);
    let files: Vec<&str> = a.entries().iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(
        files,
        [
            "certificate_Ada.png",
            "certificate_Grace.png",
            "certificate_Katherine.png"
        ]
    );
    assert!(a.is_finalized());
    assert_eq!(r.rendered, ["Ada", "Grace", "Katherine"]);
}

#[test]
fn colliding_names_keep_the_last_write() {
    let store = store_with_template();
    let mut r = StubRenderer::default();
    let mut a = InMemoryArchive::new();
    let list = names(&["A!", "B", "A?"]);
    let report = run_batch(&mut r, &mut a, &store, list.entries(), &job(OutputFormat::Png)).unwrap();

    assert_eq!(report.succeeded, 3);
    assert_eq!(report.overwritten, 1);
    assert_eq!(report.files_in_archive(), 2);
    let files: Vec<&str> = a.entries().iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(files, ["certificate_A_.png", "certificate_B.png"]);
    assert_eq!(
        report.outcomes[2].status,
        EntryStatus::Written {
            file_name: "certificate_A_.png".to_owned(),
            replaced: true,
        }
    );
}

#[test]
fn per_entry_failures_do_not_stop_the_batch() {
    let store = store_with_template();
    let mut r = StubRenderer::default();
    let mut a = InMemoryArchive::new();
    let list = names(&["Ada", "!render me", "!encode me", "Grace"]);
    let report = run_batch(&mut r, &mut a, &store, list.entries(), &job(OutputFormat::Jpeg)).unwrap();

    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 2);
    assert_eq!(a.entries().len(), 2);
    let failed: Vec<&str> = report.failures().map(|o| o.name.as_str()).collect();
    assert_eq!(failed, ["!render me", "!encode me"]);
    let EntryStatus::Failed { error } = &report.outcomes[1].status else {
        panic!("expected failure");
    };
    assert!(error.starts_with("render error:"), "{error}");
    let EntryStatus::Failed { error } = &report.outcomes[2].status else {
        panic!("expected failure");
    };
    assert!(error.starts_with("encode error:"), "{error}");
}

#[test]
fn archive_failure_aborts_the_run() {
    let store = store_with_template();
    let mut r = StubRenderer::default();
    let list = names(&["Ada", "Grace"]);
    let err = run_batch(
        &mut r,
        &mut FailingArchive,
        &store,
        list.entries(),
        &job(OutputFormat::Png),
    )
    .unwrap_err();
    assert!(matches!(err, CertstampError::Archive(_)));
    assert_eq!(r.rendered, ["Ada"]);
}

#[test]
fn zip_report_carries_blob_metadata() {
    let store = store_with_template();
    let mut r = StubRenderer::default();
    let mut a = ZipArchive::new();
    let list = names(&["Ada", "Grace"]);
    let report = run_batch(&mut r, &mut a, &store, list.entries(), &job(OutputFormat::Pdf)).unwrap();

    assert_eq!(report.archive.mime_type, "application/zip");
    assert!(report.archive.file_name.starts_with("certificate_bulk_"));
    assert!(report.archive.file_name.ends_with(".zip"));
    let reader = zip::ZipArchive::new(std::io::Cursor::new(report.archive.bytes)).unwrap();
    let mut files: Vec<&str> = reader.file_names().collect();
    files.sort_unstable();
    assert_eq!(files, ["certificate_Ada.pdf", "certificate_Grace.pdf"]);
}
