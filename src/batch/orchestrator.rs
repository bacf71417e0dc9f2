use serde::{Deserialize, Serialize};

use crate::{
    assets::template::TemplateStore,
    batch::archive::{ArchiveSink, EntryWrite},
    batch::names::NameEntry,
    encode::{OutputFormat, encode},
    foundation::error::{CertstampError, CertstampResult},
    render::backend::{OverlayRenderer, RenderTarget},
    style::config::TextStyleConfig,
};

/// Default prefix of per-entry file names.
pub const DEFAULT_FILE_PREFIX: &str = "certificate";
/// Default prefix of the archive file name.
pub const DEFAULT_ARCHIVE_PREFIX: &str = "certificate_bulk";

/// File naming for one batch run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamingConfig {
    /// Literal prefix of every entry file name.
    pub file_prefix: String,
    /// Literal prefix of the archive file name.
    pub archive_prefix: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            file_prefix: DEFAULT_FILE_PREFIX.to_owned(),
            archive_prefix: DEFAULT_ARCHIVE_PREFIX.to_owned(),
        }
    }
}

impl NamingConfig {
    /// Prefixes must be non-empty and themselves filename-safe.
    pub fn validate(&self) -> CertstampResult<()> {
        for (field, v) in [
            ("file_prefix", &self.file_prefix),
            ("archive_prefix", &self.archive_prefix),
        ] {
            if v.is_empty() {
                return Err(CertstampError::validation(format!(
                    "naming.{field} must not be empty"
                )));
            }
            if !v
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            {
                return Err(CertstampError::validation(format!(
                    "naming.{field} may only contain [A-Za-z0-9_-], got '{v}'"
                )));
            }
        }
        Ok(())
    }
}

/// Replace every UTF-16 code unit outside `[A-Za-z0-9]` with `_`.
///
/// Characters outside the Basic Multilingual Plane are two code units and so become `__`.
pub fn sanitize_filename(name: &str) -> String {
    name.encode_utf16()
        .map(|unit| match u8::try_from(unit) {
            Ok(b) if b.is_ascii_alphanumeric() => char::from(b),
            _ => '_',
        })
        .collect()
}

/// Per-entry file name: `{prefix}_{sanitized name}.{ext}`.
pub fn entry_file_name(prefix: &str, name: &str, format: OutputFormat) -> String {
    format!("{prefix}_{}.{}", sanitize_filename(name), format.extension())
}

/// Time-based archive file name: `{prefix}_{unix millis}.zip`.
pub fn archive_file_name(prefix: &str) -> String {
    format!("{prefix}_{}.zip", chrono::Utc::now().timestamp_millis())
}

/// Settings frozen for the duration of one batch run.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchJob {
    style: TextStyleConfig,
    format: OutputFormat,
    naming: NamingConfig,
}

impl BatchJob {
    /// Validate and freeze the run settings.
    pub fn new(
        style: TextStyleConfig,
        format: OutputFormat,
        naming: NamingConfig,
    ) -> CertstampResult<Self> {
        style.validate()?;
        naming.validate()?;
        Ok(Self {
            style,
            format,
            naming,
        })
    }

    /// Frozen text style.
    pub fn style(&self) -> &TextStyleConfig {
        &self.style
    }

    /// Frozen output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Frozen naming.
    pub fn naming(&self) -> &NamingConfig {
        &self.naming
    }
}

/// Finished archive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveBlob {
    /// Suggested file name, e.g. `certificate_bulk_1718000000000.zip`.
    pub file_name: String,
    /// MIME type of `bytes`.
    pub mime_type: String,
    /// Archive contents.
    pub bytes: Vec<u8>,
}

/// What happened to one name entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryStatus {
    /// Rendered, encoded and stored.
    Written {
        /// Archive entry name.
        file_name: String,
        /// An earlier entry with the same file name was overwritten.
        replaced: bool,
    },
    /// Render or encode failed; nothing was stored for this entry.
    Failed {
        /// Error message.
        error: String,
    },
}

/// Per-entry record in a [`BatchReport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryOutcome {
    /// Entry name as given.
    pub name: String,
    /// Entry id as given.
    pub id: String,
    /// Result for this entry.
    pub status: EntryStatus,
}

/// Result of a completed batch run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchReport {
    /// Finalized archive.
    pub archive: ArchiveBlob,
    /// One record per input entry, in input order.
    pub outcomes: Vec<EntryOutcome>,
    /// Entries written to the archive (including those later overwritten).
    pub succeeded: usize,
    /// Entries whose render or encode failed.
    pub failed: usize,
    /// Writes that replaced an earlier entry with the same file name.
    pub overwritten: usize,
}

impl BatchReport {
    /// Distinct files in the archive.
    pub fn files_in_archive(&self) -> usize {
        self.succeeded - self.overwritten
    }

    /// Failed outcomes only.
    pub fn failures(&self) -> impl Iterator<Item = &EntryOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, EntryStatus::Failed { .. }))
    }
}

/// Render, encode and archive one file per entry, in list order.
///
/// Fails before any work with `Precondition` when no template is loaded or `names` is empty, and
/// with `InvalidTemplate` for a zero-area template. Render and encode failures are recorded per
/// entry and the run continues; archive failures abort the run.
#[tracing::instrument(
    skip_all,
    fields(entries = names.len(), format = %job.format())
)]
pub fn run_batch<R, A>(
    renderer: &mut R,
    archive: &mut A,
    templates: &TemplateStore,
    names: &[NameEntry],
    job: &BatchJob,
) -> CertstampResult<BatchReport>
where
    R: OverlayRenderer + ?Sized,
    A: ArchiveSink + ?Sized,
{
    let template = templates.require()?;
    if names.is_empty() {
        return Err(CertstampError::precondition(
            "name list is empty; add at least one name",
        ));
    }
    template.ensure_renderable()?;

    let target = RenderTarget::native(template);
    let mut outcomes = Vec::with_capacity(names.len());
    let (mut succeeded, mut failed, mut overwritten) = (0usize, 0usize, 0usize);

    for (index, entry) in names.iter().enumerate() {
        // The raster borrows the renderer's scratch surface; encoding must finish before the
        // next render can start.
        let encoded = renderer
            .render(template, &entry.name, job.style(), target)
            .and_then(|raster| encode(raster, job.format()));

        let status = match encoded {
            Ok(bytes) => {
                let file_name = entry_file_name(&job.naming().file_prefix, &entry.name, job.format());
                let write = archive.add_file(&file_name, bytes)?;
                let replaced = write == EntryWrite::Replaced;
                succeeded += 1;
                if replaced {
                    overwritten += 1;
                    tracing::debug!(index, file = %file_name, "entry overwrote an earlier file");
                } else {
                    tracing::debug!(index, file = %file_name, "entry written");
                }
                EntryStatus::Written {
                    file_name,
                    replaced,
                }
            }
            Err(e) if e.is_entry_scoped() => {
                failed += 1;
                tracing::warn!(index, id = %entry.id, error = %e, "entry failed");
                EntryStatus::Failed {
                    error: e.to_string(),
                }
            }
            Err(e) => return Err(e),
        };
        outcomes.push(EntryOutcome {
            name: entry.name.clone(),
            id: entry.id.clone(),
            status,
        });
    }

    let bytes = archive.finalize()?;
    let blob = ArchiveBlob {
        file_name: archive_file_name(&job.naming().archive_prefix),
        mime_type: archive.mime_type().to_owned(),
        bytes,
    };
    tracing::info!(
        succeeded,
        failed,
        overwritten,
        archive = %blob.file_name,
        bytes = blob.bytes.len(),
        "batch complete"
    );

    Ok(BatchReport {
        archive: blob,
        outcomes,
        succeeded,
        failed,
        overwritten,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/batch/orchestrator.rs"]
mod tests;
