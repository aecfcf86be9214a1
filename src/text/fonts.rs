use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::foundation::error::{MemeError, MemeResult};

/// Family tried when the requested one is not installed.
pub const FALLBACK_FAMILY: &str = "impact";

/// Directories searched by [`FontLibrary::load_default`].
pub fn default_font_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![PathBuf::from("fonts")];
    if let Some(home) = std::env::var_os("HOME") {
        let home = PathBuf::from(home);
        dirs.push(home.join(".fonts"));
        dirs.push(home.join(".local/share/fonts"));
        dirs.push(home.join("Library/Fonts"));
    }
    dirs.extend(
        [
            "/usr/share/fonts",
            "/usr/local/share/fonts",
            "/Library/Fonts",
            "/System/Library/Fonts",
            "C:\\Windows\\Fonts",
        ]
        .map(PathBuf::from),
    );
    dirs
}

#[derive(Clone, Debug)]
enum FaceSource {
    File(PathBuf),
    Memory(Arc<Vec<u8>>),
}

#[derive(Clone, Debug)]
struct FaceEntry {
    family: String,
    source: FaceSource,
    rank: u8,
}

/// A face picked for drawing: the family name as the font reports it, plus its bytes.
#[derive(Clone, Debug)]
pub struct ResolvedFont {
    pub family: String,
    pub bytes: Arc<Vec<u8>>,
}

/// Index of available font faces, one per family, keyed by lower-cased family name.
///
/// Captions are bold, so within a family a bold upright face wins over a regular one.
#[derive(Debug, Default)]
pub struct FontLibrary {
    faces: BTreeMap<String, FaceEntry>,
}

impl FontLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan [`default_font_dirs`]. Missing directories are skipped.
    pub fn load_default() -> Self {
        Self::load_dirs(default_font_dirs())
    }

    /// Recursively scan `dirs` for `.ttf` and `.otf` files.
    #[tracing::instrument(skip(dirs))]
    pub fn load_dirs<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut lib = Self::new();
        for dir in dirs {
            let dir = dir.as_ref();
            if !dir.is_dir() {
                continue;
            }
            for entry in walkdir::WalkDir::new(dir)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_map(Result::ok)
            {
                let path = entry.path();
                if !entry.file_type().is_file() || !is_font_file(path) {
                    continue;
                }
                let Ok(bytes) = std::fs::read(path) else {
                    tracing::debug!(path = %path.display(), "skipping unreadable font");
                    continue;
                };
                // Fresh context per file so scanned blobs are not all held at once.
                let mut scratch = parley::FontContext::default();
                let Some(family) = family_name_of(&mut scratch, bytes) else {
                    continue;
                };
                lib.insert(FaceEntry {
                    rank: face_rank(path),
                    family,
                    source: FaceSource::File(path.to_path_buf()),
                });
            }
        }
        tracing::debug!(families = lib.faces.len(), "font scan finished");
        lib
    }

    /// Register an in-memory face under the family name the font itself reports.
    pub fn add_font_bytes(&mut self, bytes: Vec<u8>) -> MemeResult<String> {
        let mut scratch = parley::FontContext::default();
        let family = family_name_of(&mut scratch, bytes.clone())
            .ok_or_else(|| MemeError::validation("no font families registered from font bytes"))?;
        self.insert(FaceEntry {
            family: family.clone(),
            source: FaceSource::Memory(Arc::new(bytes)),
            rank: u8::MAX,
        });
        Ok(family)
    }

    fn insert(&mut self, entry: FaceEntry) {
        let key = entry.family.to_lowercase();
        match self.faces.get(&key) {
            Some(existing) if existing.rank >= entry.rank => {}
            _ => {
                self.faces.insert(key, entry);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.faces.values().map(|f| f.family.as_str())
    }

    pub fn contains(&self, family: &str) -> bool {
        self.faces.contains_key(&family.trim().to_lowercase())
    }

    /// Pick a face for `family`: exact match, then Impact, then any sans family, then anything.
    pub fn resolve(&self, family: &str) -> MemeResult<ResolvedFont> {
        let wanted = family.trim().to_lowercase();
        let entry = self
            .faces
            .get(&wanted)
            .or_else(|| self.faces.get(FALLBACK_FAMILY))
            .or_else(|| {
                self.faces
                    .iter()
                    .find(|(k, _)| k.contains("sans") && !k.contains("mono"))
                    .map(|(_, v)| v)
            })
            .or_else(|| self.faces.values().next())
            .ok_or_else(|| MemeError::render("no fonts available; pass --font-dir"))?;

        if entry.family.to_lowercase() != wanted {
            tracing::warn!(requested = %family, using = %entry.family, "font family not found, falling back");
        }

        let bytes = match &entry.source {
            FaceSource::Memory(bytes) => bytes.clone(),
            FaceSource::File(path) => Arc::new(std::fs::read(path).map_err(|e| {
                MemeError::render(format!("read font '{}': {e}", path.display()))
            })?),
        };
        Ok(ResolvedFont {
            family: entry.family.clone(),
            bytes,
        })
    }
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"))
}

fn face_rank(path: &Path) -> u8 {
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_lowercase();
    let bold = name.contains("bold") || name.contains("black") || name.contains("heavy");
    let slanted = name.contains("italic") || name.contains("oblique");
    match (bold, slanted) {
        (true, false) => 3,
        (false, false) => 2,
        (true, true) => 1,
        (false, true) => 0,
    }
}

fn family_name_of(scratch: &mut parley::FontContext, bytes: Vec<u8>) -> Option<String> {
    let families = scratch
        .collection
        .register_fonts(parley::fontique::Blob::from(bytes), None);
    let (id, _) = families.first()?;
    scratch
        .collection
        .family_name(*id)
        .map(str::to_string)
        .filter(|n| !n.trim().is_empty())
}

#[cfg(test)]
#[path = "../../tests/unit/text/fonts.rs"]
pub(crate) mod tests;
