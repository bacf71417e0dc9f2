use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use sha2::Digest as _;

use certstamp::{
    CpuRenderer, FontCatalog, FontWeight, JobConfig, NameList, OutputFormat, PreviewStatus,
    PreviewSynchronizer, TemplateStore, TextColor, ZipArchive, run_batch,
};

#[derive(Parser, Debug)]
#[command(name = "certstamp", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one file per name and bundle them into a zip archive.
    Batch(BatchArgs),
    /// Render the scaled-down preview as a PNG.
    Preview(PreviewArgs),
    /// List font families, optionally resolving one.
    Fonts(FontsArgs),
}

/// Style and output flags; each one overrides the job config.
#[derive(Args, Debug)]
struct StyleArgs {
    /// Job config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Horizontal anchor in percent of the template width.
    #[arg(long)]
    x: Option<f64>,

    /// Vertical anchor in percent of the template height.
    #[arg(long)]
    y: Option<f64>,

    /// Font size in pixels at full template resolution.
    #[arg(long)]
    font_size: Option<f32>,

    /// Font family name.
    #[arg(long)]
    font_family: Option<String>,

    /// Font weight (`normal`, `bold`, `100`..`900`).
    #[arg(long)]
    font_weight: Option<FontWeight>,

    /// Text color (`#rgb`, `#rrggbb`, `#rrggbbaa`).
    #[arg(long)]
    color: Option<TextColor>,

    /// Output format (`png`, `jpg`, `pdf`).
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Extra font directory (repeatable).
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,

    /// Do not load installed system fonts.
    #[arg(long)]
    no_system_fonts: bool,
}

impl StyleArgs {
    fn job_config(&self) -> anyhow::Result<JobConfig> {
        let mut cfg = match &self.config {
            Some(path) => JobConfig::from_path(path)?,
            None => JobConfig::default(),
        };
        if let Some(x) = self.x {
            cfg.style.position.x = x;
        }
        if let Some(y) = self.y {
            cfg.style.position.y = y;
        }
        if let Some(size) = self.font_size {
            cfg.style.font_size = size;
        }
        if let Some(family) = &self.font_family {
            cfg.style.font_family = family.clone();
        }
        if let Some(weight) = self.font_weight {
            cfg.style.font_weight = weight;
        }
        if let Some(color) = self.color {
            cfg.style.color = color;
        }
        if let Some(format) = self.format {
            cfg.format = format;
        }
        cfg.fonts.dirs.extend(self.font_dirs.iter().cloned());
        if self.no_system_fonts {
            cfg.fonts.system_fonts = false;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Template image (PNG, JPEG, ...).
    #[arg(long)]
    template: PathBuf,

    /// Text file with one name per line (first comma-separated column).
    #[arg(long)]
    names: Option<PathBuf>,

    /// Name to include (repeatable); added after `--names`.
    #[arg(long = "name")]
    extra_names: Vec<String>,

    /// Ignore the first line of `--names`.
    #[arg(long)]
    skip_header: bool,

    /// Directory the archive is written into.
    #[arg(long)]
    out_dir: PathBuf,

    #[command(flatten)]
    style: StyleArgs,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Template image (PNG, JPEG, ...).
    #[arg(long)]
    template: PathBuf,

    /// Sample name; the configured placeholder is used when omitted.
    #[arg(long)]
    name: Option<String>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    style: StyleArgs,
}

#[derive(Parser, Debug)]
struct FontsArgs {
    /// Extra font directory (repeatable).
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,

    /// Do not load installed system fonts.
    #[arg(long)]
    no_system_fonts: bool,

    /// Resolve this family and print the chosen face.
    #[arg(long)]
    resolve: Option<String>,

    /// Weight used with `--resolve`.
    #[arg(long, default_value = "normal")]
    weight: FontWeight,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Batch(args) => cmd_batch(args),
        Command::Preview(args) => cmd_preview(args),
        Command::Fonts(args) => cmd_fonts(args),
    }
}

fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn load_template(path: &Path) -> anyhow::Result<TemplateStore> {
    let mut store = TemplateStore::new();
    store.load_path(path)?;
    Ok(store)
}

fn cmd_batch(args: BatchArgs) -> anyhow::Result<()> {
    let cfg = args.style.job_config()?;
    let job = cfg.batch_job()?;
    let store = load_template(&args.template)?;

    let mut names = match &args.names {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read names '{}'", path.display()))?;
            NameList::from_lines(&text, args.skip_header)
        }
        None => NameList::new(),
    };
    names.extend_names(&args.extra_names);

    let mut renderer = CpuRenderer::new(Arc::new(cfg.fonts.build_catalog()));
    let mut archive = ZipArchive::new();
    let report = run_batch(
        &mut renderer,
        &mut archive,
        &store,
        names.entries(),
        &job,
    )?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    let out = args.out_dir.join(&report.archive.file_name);
    std::fs::write(&out, &report.archive.bytes)
        .with_context(|| format!("write archive '{}'", out.display()))?;

    eprintln!(
        "wrote {} ({} succeeded, {} failed, {} overwritten)",
        out.display(),
        report.succeeded,
        report.failed,
        report.overwritten
    );
    for outcome in report.failures() {
        if let certstamp::EntryStatus::Failed { error } = &outcome.status {
            eprintln!("  failed: {:?}: {error}", outcome.name);
        }
    }
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let cfg = args.style.job_config()?;
    let store = load_template(&args.template)?;

    let mut names = NameList::new();
    if let Some(name) = &args.name {
        names.push_name(name);
    }

    let renderer = CpuRenderer::new(Arc::new(cfg.fonts.build_catalog()));
    let mut sync =
        PreviewSynchronizer::with_settings(renderer, cfg.preview.max_width, &cfg.preview.placeholder);
    match sync.refresh(store.current(), &cfg.style, &names) {
        PreviewStatus::Rendered | PreviewStatus::Unchanged => {}
        PreviewStatus::NoTemplate => anyhow::bail!("no template loaded"),
        PreviewStatus::Failed(msg) => anyhow::bail!("preview failed: {msg}"),
    }
    let preview = sync
        .preview()
        .context("preview reported success without a raster")?;

    let png = certstamp::encode(preview.as_raster_ref(), OutputFormat::Png)?;
    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, png).with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({}x{})",
        args.out.display(),
        preview.width,
        preview.height
    );
    Ok(())
}

fn cmd_fonts(args: FontsArgs) -> anyhow::Result<()> {
    let catalog = FontCatalog::from_sources(!args.no_system_fonts, &args.font_dirs);

    match &args.resolve {
        Some(family) => {
            let face = catalog.resolve(family, args.weight)?;
            println!("requested: {family} ({})", args.weight);
            println!("family:    {}", face.family);
            println!("weight:    {}", face.weight);
            println!("index:     {}", face.index);
            println!("fallback:  {}", face.is_fallback);
            println!("sha256:    {}", sha256_hex(&face.bytes));
        }
        None => {
            for family in catalog.families() {
                println!("{family}");
            }
            eprintln!("{} faces", catalog.len());
        }
    }
    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
