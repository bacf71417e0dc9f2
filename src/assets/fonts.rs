use std::{
    collections::BTreeSet,
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use usvg::fontdb;

use crate::{
    foundation::error::{CertstampError, CertstampResult},
    style::config::FontWeight,
};

/// A concrete font face resolved from the catalog, with its backing bytes.
#[derive(Clone)]
pub struct FontFace {
    /// Catalog identity of the face. Distinct per file and collection index.
    pub id: fontdb::ID,
    /// Primary family name of the face.
    pub family: String,
    /// OpenType weight of the face.
    pub weight: u16,
    /// Face index inside the font file (non-zero for collections).
    pub index: u32,
    /// Raw font file bytes.
    pub bytes: Arc<Vec<u8>>,
    /// `true` when the requested family was not found and a fallback face was used.
    pub is_fallback: bool,
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontFace")
            .field("id", &self.id)
            .field("family", &self.family)
            .field("weight", &self.weight)
            .field("index", &self.index)
            .field("bytes_len", &self.bytes.len())
            .field("is_fallback", &self.is_fallback)
            .finish()
    }
}

/// Set of font faces available to the renderer.
///
/// Built once (system fonts and/or font directories) and then shared read-only between
/// renderers.
pub struct FontCatalog {
    db: fontdb::Database,
}

impl fmt::Debug for FontCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontCatalog")
            .field("faces", &self.db.len())
            .finish()
    }
}

impl Default for FontCatalog {
    fn default() -> Self {
        Self::empty()
    }
}

impl FontCatalog {
    /// Catalog with no faces.
    pub fn empty() -> Self {
        Self {
            db: fontdb::Database::new(),
        }
    }

    /// Catalog populated with the fonts installed on this machine.
    pub fn system() -> Self {
        let mut out = Self::empty();
        out.db.load_system_fonts();
        tracing::debug!(faces = out.db.len(), "loaded system fonts");
        out
    }

    /// Catalog from optional system fonts plus every font file directly inside `dirs`.
    pub fn from_sources(system_fonts: bool, dirs: &[PathBuf]) -> Self {
        let mut out = if system_fonts {
            Self::system()
        } else {
            Self::empty()
        };
        for dir in dirs {
            out.load_dir(dir);
        }
        out
    }

    /// Load `.ttf`/`.otf`/`.ttc` files directly inside `dir`; returns the number of files read.
    ///
    /// Unreadable directories and files are skipped.
    pub fn load_dir(&mut self, dir: &Path) -> usize {
        let Ok(rd) = std::fs::read_dir(dir) else {
            tracing::warn!(dir = %dir.display(), "font directory not readable; skipped");
            return 0;
        };

        let mut loaded = 0usize;
        for entry in rd.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
                continue;
            };
            let ext = ext.to_ascii_lowercase();
            if ext != "ttf" && ext != "otf" && ext != "ttc" {
                continue;
            }
            match self.db.load_font_file(&path) {
                Ok(()) => loaded += 1,
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "font file skipped"),
            }
        }
        tracing::debug!(dir = %dir.display(), loaded, "loaded font directory");
        loaded
    }

    /// Register in-memory font bytes.
    pub fn load_font_data(&mut self, bytes: Vec<u8>) {
        self.db.load_font_data(bytes);
    }

    /// Number of faces in the catalog.
    pub fn len(&self) -> usize {
        self.db.len()
    }

    /// Return `true` when the catalog holds no faces.
    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    /// Distinct family names, sorted.
    pub fn families(&self) -> Vec<String> {
        let set: BTreeSet<String> = self
            .db
            .faces()
            .filter_map(|f| f.families.first().map(|(name, _)| name.clone()))
            .collect();
        set.into_iter().collect()
    }

    /// Resolve `family` at `weight` to a concrete face.
    ///
    /// Lookup order: the named family (generic CSS names map to generic families), then
    /// sans-serif, serif, monospace, then the first face in the catalog.
    pub fn resolve(&self, family: &str, weight: FontWeight) -> CertstampResult<FontFace> {
        if self.db.is_empty() {
            return Err(CertstampError::render(format!(
                "no font faces available to draw family '{family}'"
            )));
        }

        let requested = [requested_family(family.trim())];
        if let Some(id) = self.query(&requested, weight) {
            return self.face_for(id, false);
        }

        let fallbacks = [
            fontdb::Family::SansSerif,
            fontdb::Family::Serif,
            fontdb::Family::Monospace,
        ];
        let id = self
            .query(&fallbacks, weight)
            .or_else(|| self.db.faces().next().map(|f| f.id))
            .ok_or_else(|| CertstampError::render("font catalog has no faces"))?;
        let face = self.face_for(id, true)?;
        tracing::warn!(
            requested = family,
            resolved = %face.family,
            "font family not found; using fallback face"
        );
        Ok(face)
    }

    fn query(&self, families: &[fontdb::Family<'_>], weight: FontWeight) -> Option<fontdb::ID> {
        self.db.query(&fontdb::Query {
            families,
            weight: fontdb::Weight(weight.value()),
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        })
    }

    fn face_for(&self, id: fontdb::ID, is_fallback: bool) -> CertstampResult<FontFace> {
        let info = self
            .db
            .face(id)
            .ok_or_else(|| CertstampError::render("resolved font face vanished from catalog"))?;
        let family = info
            .families
            .first()
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| "unknown".to_owned());
        let weight = info.weight.0;
        let (bytes, index) = self
            .db
            .with_face_data(id, |data, index| (data.to_vec(), index))
            .ok_or_else(|| {
                CertstampError::render(format!("font data for family '{family}' is unreadable"))
            })?;
        Ok(FontFace {
            id,
            family,
            weight,
            index,
            bytes: Arc::new(bytes),
            is_fallback,
        })
    }
}

fn requested_family(name: &str) -> fontdb::Family<'_> {
    match name.to_ascii_lowercase().as_str() {
        "serif" => fontdb::Family::Serif,
        "sans-serif" => fontdb::Family::SansSerif,
        "monospace" => fontdb::Family::Monospace,
        "cursive" => fontdb::Family::Cursive,
        "fantasy" => fontdb::Family::Fantasy,
        _ => fontdb::Family::Name(name),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
