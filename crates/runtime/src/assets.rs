//! Directory-backed asset store.
//!
//! Asset names in the book are bare stems ("background", "click"); this
//! store resolves them against a resources directory by probing a fixed
//! extension list per asset kind, the way the original project resolved
//! names against its resources folder.

use std::fs;
use std::path::PathBuf;

use storybook_engine::{AssetKind, AssetStore};

/// Extensions probed per asset kind, in priority order.
fn extensions(kind: AssetKind) -> &'static [&'static str] {
    match kind {
        AssetKind::Image => &["png", "jpg", "jpeg"],
        AssetKind::Animation => &["anim.json", "json"],
        AssetKind::Music | AssetKind::Sfx => &["ogg", "wav", "mp3", "flac"],
    }
}

/// Rejects names that would escape the resources directory.
fn sanitized(name: &str) -> Result<&str, String> {
    if name.is_empty() {
        return Err("asset name is empty".to_string());
    }
    if name.starts_with('/') || name.starts_with('\\') || name.contains("..") {
        return Err(format!("asset name '{name}' escapes the resources directory"));
    }
    Ok(name)
}

/// Asset store rooted in a resources directory on disk.
#[derive(Clone, Debug)]
pub struct DirAssetStore {
    root: PathBuf,
}

impl DirAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

impl AssetStore for DirAssetStore {
    fn load_bytes(&self, name: &str, kind: AssetKind) -> Result<Vec<u8>, String> {
        let name = sanitized(name)?;
        for ext in extensions(kind) {
            let path = self.root.join(format!("{name}.{ext}"));
            if path.is_file() {
                return fs::read(&path).map_err(|err| format!("asset '{name}': {err}"));
            }
        }
        Err(format!("asset not found: {name}"))
    }

    fn exists(&self, name: &str, kind: AssetKind) -> bool {
        sanitized(name).is_ok_and(|name| {
            extensions(kind)
                .iter()
                .any(|ext| self.root.join(format!("{name}.{ext}")).is_file())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probes_extensions_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("background.jpg"), b"jpg bytes").unwrap();
        fs::write(dir.path().join("background.png"), b"png bytes").unwrap();

        let store = DirAssetStore::new(dir.path());
        assert_eq!(
            store.load_bytes("background", AssetKind::Image).unwrap(),
            b"png bytes"
        );
        assert!(store.exists("background", AssetKind::Image));
    }

    #[test]
    fn missing_asset_is_an_error_not_a_panic() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirAssetStore::new(dir.path());
        assert!(store.load_bytes("ghost", AssetKind::Sfx).is_err());
        assert!(!store.exists("ghost", AssetKind::Sfx));
    }

    #[test]
    fn rejects_escaping_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirAssetStore::new(dir.path());
        assert!(store.load_bytes("../secret", AssetKind::Image).is_err());
        assert!(store.load_bytes("/etc/passwd", AssetKind::Image).is_err());
        assert!(store.load_bytes("", AssetKind::Image).is_err());
    }

    #[test]
    fn kind_selects_the_extension_set() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("theme.ogg"), b"music").unwrap();

        let store = DirAssetStore::new(dir.path());
        assert!(store.exists("theme", AssetKind::Music));
        assert!(!store.exists("theme", AssetKind::Image));
    }
}
