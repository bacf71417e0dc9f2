//! Job configuration loaded from JSON.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{
    assets::fonts::FontCatalog,
    batch::orchestrator::{BatchJob, NamingConfig},
    encode::OutputFormat,
    foundation::error::{CertstampError, CertstampResult},
    render::preview::{DEFAULT_PLACEHOLDER, DEFAULT_PREVIEW_MAX_WIDTH},
    style::config::TextStyleConfig,
};

/// Where fonts come from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontSettings {
    /// Directories scanned (non-recursively) for `.ttf`, `.otf` and `.ttc` files.
    pub dirs: Vec<PathBuf>,
    /// Load the fonts installed on the system.
    pub system_fonts: bool,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            dirs: Vec::new(),
            system_fonts: true,
        }
    }
}

impl FontSettings {
    /// Build the catalog these settings describe.
    pub fn build_catalog(&self) -> FontCatalog {
        FontCatalog::from_sources(self.system_fonts, &self.dirs)
    }
}

/// Preview sizing and sample text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewSettings {
    /// Preview width cap in pixels; templates are never upscaled.
    pub max_width: u32,
    /// Text drawn when the name list is empty.
    pub placeholder: String,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_PREVIEW_MAX_WIDTH,
            placeholder: DEFAULT_PLACEHOLDER.to_owned(),
        }
    }
}

/// Everything a batch or preview run needs besides the template and names.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JobConfig {
    /// Overlay text style.
    pub style: TextStyleConfig,
    /// Per-entry output format.
    pub format: OutputFormat,
    /// Entry and archive file naming.
    pub naming: NamingConfig,
    /// Font sources.
    pub fonts: FontSettings,
    /// Preview settings.
    pub preview: PreviewSettings,
}

impl JobConfig {
    /// Parse from a JSON string. Missing fields take their defaults; unknown fields are errors.
    pub fn from_json_str(s: &str) -> CertstampResult<Self> {
        serde_json::from_str(s).map_err(|e| CertstampError::serde(e.to_string()))
    }

    /// Read and parse a JSON file.
    pub fn from_path(path: &Path) -> CertstampResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read job config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Validate every nested value.
    pub fn validate(&self) -> CertstampResult<()> {
        self.style.validate()?;
        self.naming.validate()?;
        if self.preview.max_width == 0 {
            return Err(CertstampError::validation("preview.max_width must be > 0"));
        }
        Ok(())
    }

    /// Freeze the batch-relevant settings into a [`BatchJob`].
    pub fn batch_job(&self) -> CertstampResult<BatchJob> {
        BatchJob::new(self.style.clone(), self.format, self.naming.clone())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
