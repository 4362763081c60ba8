//! Persistent record of modifications already produced per source image.
//!
//! The selectors only ever see what this registry hands them, so its order
//! matters: modifications are kept in registration order and re-registering
//! a resolution replaces the old entry in place.
//!
//! ## Keys
//!
//! The registry is **content-addressed**: images are keyed by the SHA-256 of
//! the source file ([`hash_file`]). Moving or renaming a source keeps its
//! modifications; editing its pixels starts over.
//!
//! ## Storage
//!
//! A pretty-printed JSON file, `registry.json` by default:
//!
//! ```json
//! {
//!   "version": 1,
//!   "images": {
//!     "9f86d0...": {
//!       "dimensions": { "width": 1600, "height": 1200 },
//!       "modifications": [
//!         { "resolution_id": 1, "resolution": { "width": 800, "height": 600 },
//!           "crop": { "top_left": { "x": 0, "y": 0 }, "size": { "width": 1600, "height": 1200 } } }
//!       ]
//!     }
//!   }
//! }
//! ```
//!
//! A file written by another registry version is discarded with a warning
//! and the registry starts empty.

use crate::geometry::Size;
use crate::imaging::normalize_dimensions;
use crate::types::{Candidate, Modification};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Default registry file name.
pub const REGISTRY_FILENAME: &str = "registry.json";

/// Version of the registry format. Bump this when the layout changes.
const REGISTRY_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Registry JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything registered for one source image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    pub dimensions: Size,
    pub modifications: Vec<Modification>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModificationRegistry {
    pub version: u32,
    pub images: BTreeMap<String, ImageEntry>,
}

#[derive(Deserialize)]
struct VersionHeader {
    version: u32,
}

impl ModificationRegistry {
    pub fn empty() -> Self {
        Self {
            version: REGISTRY_VERSION,
            images: BTreeMap::new(),
        }
    }

    /// Load from `path`. A missing file or another format version yields an
    /// empty registry; unreadable or corrupt files are errors.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::empty()),
            Err(e) => return Err(e.into()),
        };

        let header: VersionHeader = serde_json::from_str(&content)?;
        if header.version != REGISTRY_VERSION {
            warn!(
                path = %path.display(),
                found = header.version,
                expected = REGISTRY_VERSION,
                "Registry version mismatch, starting empty"
            );
            return Ok(Self::empty());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), RegistryError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Record `modification` for the image stored under `key`.
    ///
    /// An existing modification for the same resolution and context is
    /// replaced where it stands. Modifications without a resolution id are
    /// identified by their resolution instead.
    pub fn register(&mut self, key: &str, dimensions: Size, modification: Modification) {
        let entry = self
            .images
            .entry(key.to_string())
            .or_insert_with(|| ImageEntry {
                dimensions,
                modifications: Vec::new(),
            });
        entry.dimensions = dimensions;

        let existing = entry
            .modifications
            .iter_mut()
            .find(|m| same_slot(m, &modification));

        info!(
            key,
            resolution = %modification.resolution,
            id = ?modification.resolution_id,
            replaced = existing.is_some(),
            "Registered modification"
        );
        match existing {
            Some(slot) => *slot = modification,
            None => entry.modifications.push(modification),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ImageEntry> {
        self.images.get(key)
    }

    /// The modifications of `key` paired with their effective sizes, in
    /// registration order. Unknown sides are filled in from the image ratio.
    pub fn candidates(&self, key: &str) -> Vec<Candidate> {
        let Some(entry) = self.images.get(key) else {
            return Vec::new();
        };
        entry
            .modifications
            .iter()
            .map(|m| {
                let effective = normalize_dimensions(m.resolution, entry.dimensions);
                (m.clone(), effective)
            })
            .collect()
    }
}

impl Default for ModificationRegistry {
    fn default() -> Self {
        Self::empty()
    }
}

fn same_slot(existing: &Modification, new: &Modification) -> bool {
    if existing.context_id != new.context_id {
        return false;
    }
    match (existing.resolution_id, new.resolution_id) {
        (Some(a), Some(b)) => a == b,
        (None, None) => existing.resolution == new.resolution,
        _ => false,
    }
}

/// SHA-256 hash of a file's contents, returned as a hex string.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    let digest = Sha256::digest(&bytes);
    Ok(format!("{:x}", digest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::types::{ContextId, ResolutionId};
    use std::fs;
    use tempfile::TempDir;

    fn modification(id: u64, width: i32, height: i32) -> Modification {
        Modification::new(Size::new(width, height), None).with_resolution_id(ResolutionId(id))
    }

    // =========================================================================
    // Load / save
    // =========================================================================

    #[test]
    fn load_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let registry = ModificationRegistry::load(&tmp.path().join(REGISTRY_FILENAME)).unwrap();
        assert_eq!(registry, ModificationRegistry::empty());
    }

    #[test]
    fn save_then_load_keeps_order() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join(REGISTRY_FILENAME);

        let mut registry = ModificationRegistry::empty();
        let dims = Size::new(1600, 1200);
        registry.register("abc", dims, modification(3, 800, 600));
        registry.register(
            "abc",
            dims,
            Modification::new(Size::new(400, 400), Some(Rect::new(200, 0, 1200, 1200)))
                .with_resolution_id(ResolutionId(1)),
        );
        registry.save(&path).unwrap();

        let loaded = ModificationRegistry::load(&path).unwrap();
        assert_eq!(loaded, registry);
        let ids: Vec<_> = loaded.get("abc").unwrap().modifications.iter()
            .map(|m| m.resolution_id)
            .collect();
        assert_eq!(ids, vec![Some(ResolutionId(3)), Some(ResolutionId(1))]);
    }

    #[test]
    fn load_other_version_is_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(REGISTRY_FILENAME);
        fs::write(&path, r#"{"version": 99, "images": {"x": "whatever"}}"#).unwrap();

        let registry = ModificationRegistry::load(&path).unwrap();
        assert!(registry.images.is_empty());
    }

    #[test]
    fn load_corrupt_json_errors() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(REGISTRY_FILENAME);
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            ModificationRegistry::load(&path),
            Err(RegistryError::Json(_))
        ));
    }

    #[test]
    fn saved_json_layout() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(REGISTRY_FILENAME);
        let mut registry = ModificationRegistry::empty();
        registry.register("k", Size::new(100, 100), modification(1, 50, 50));
        registry.save(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["images"]["k"]["modifications"][0]["resolution"]["width"], 50);
        assert_eq!(value["images"]["k"]["modifications"][0]["resolution_id"], 1);
    }

    // =========================================================================
    // Registration
    // =========================================================================

    #[test]
    fn register_replaces_same_resolution_in_place() {
        let mut registry = ModificationRegistry::empty();
        let dims = Size::new(1600, 1200);
        registry.register("k", dims, modification(1, 800, 600));
        registry.register("k", dims, modification(2, 400, 300));
        registry.register("k", dims, modification(1, 640, 480));

        let mods = &registry.get("k").unwrap().modifications;
        assert_eq!(mods.len(), 2);
        assert_eq!(mods[0].resolution, Size::new(640, 480));
        assert_eq!(mods[1].resolution_id, Some(ResolutionId(2)));
    }

    #[test]
    fn register_keeps_contexts_apart() {
        let mut registry = ModificationRegistry::empty();
        let dims = Size::new(1600, 1200);
        registry.register("k", dims, modification(1, 800, 600));
        registry.register("k", dims, modification(1, 800, 600).with_context(ContextId(5)));

        assert_eq!(registry.get("k").unwrap().modifications.len(), 2);
    }

    #[test]
    fn register_without_id_matches_on_resolution() {
        let mut registry = ModificationRegistry::empty();
        let dims = Size::new(1600, 1200);
        let crop = Rect::new(0, 0, 1600, 1200);
        registry.register("k", dims, Modification::new(Size::new(800, 600), None));
        registry.register("k", dims, Modification::new(Size::new(800, 600), Some(crop)));
        registry.register("k", dims, Modification::new(Size::new(400, 300), None));

        let mods = &registry.get("k").unwrap().modifications;
        assert_eq!(mods.len(), 2);
        assert_eq!(mods[0].crop, Some(crop));
    }

    // =========================================================================
    // Candidates
    // =========================================================================

    #[test]
    fn candidates_for_unknown_key_are_empty() {
        assert!(ModificationRegistry::empty().candidates("nope").is_empty());
    }

    #[test]
    fn candidates_fill_unknown_sides_from_image_ratio() {
        let mut registry = ModificationRegistry::empty();
        let dims = Size::new(1600, 1200);
        registry.register("k", dims, modification(1, 800, 0));
        registry.register("k", dims, modification(2, 0, 300));
        registry.register("k", dims, modification(3, 100, 100));

        let sizes: Vec<Size> = registry.candidates("k").into_iter().map(|(_, s)| s).collect();
        assert_eq!(
            sizes,
            vec![Size::new(800, 600), Size::new(400, 300), Size::new(100, 100)]
        );
    }

    // =========================================================================
    // hash_file
    // =========================================================================

    #[test]
    fn hash_file_is_content_based() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.jpg");
        let b = tmp.path().join("b.jpg");
        fs::write(&a, b"same bytes").unwrap();
        fs::write(&b, b"same bytes").unwrap();

        let hash = hash_file(&a).unwrap();
        assert_eq!(hash, hash_file(&b).unwrap());
        assert_eq!(hash.len(), 64);
    }

    #[test]
    fn hash_file_missing_errors() {
        assert!(hash_file(Path::new("/nonexistent/file.jpg")).is_err());
    }
}
