//! Asset resolution contract.
//!
//! The book stores only asset *names*; binary data never enters the model.
//! Backends resolve names on every page load, and a name that fails to
//! resolve is treated as "no image/sound", not an error.

use std::collections::HashMap;
use std::sync::Arc;

/// Kind of named asset the book references.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Image,
    Animation,
    Music,
    Sfx,
}

/// Resolves asset names to raw bytes.
pub trait AssetStore {
    fn load_bytes(&self, name: &str, kind: AssetKind) -> Result<Vec<u8>, String>;

    /// Cheap existence probe; the navigator uses this to warn about
    /// unresolvable names without pulling the bytes in.
    fn exists(&self, name: &str, kind: AssetKind) -> bool {
        self.load_bytes(name, kind).is_ok()
    }
}

impl<T: AssetStore + ?Sized> AssetStore for Arc<T> {
    fn load_bytes(&self, name: &str, kind: AssetKind) -> Result<Vec<u8>, String> {
        (**self).load_bytes(name, kind)
    }

    fn exists(&self, name: &str, kind: AssetKind) -> bool {
        (**self).exists(name, kind)
    }
}

impl<T: AssetStore + ?Sized> AssetStore for Box<T> {
    fn load_bytes(&self, name: &str, kind: AssetKind) -> Result<Vec<u8>, String> {
        (**self).load_bytes(name, kind)
    }

    fn exists(&self, name: &str, kind: AssetKind) -> bool {
        (**self).exists(name, kind)
    }
}

/// In-memory asset store for tests and headless hosts.
#[derive(Debug, Default)]
pub struct MemoryAssetStore {
    assets: HashMap<String, Vec<u8>>,
}

impl MemoryAssetStore {
    pub fn insert(&mut self, name: impl Into<String>, data: Vec<u8>) {
        self.assets.insert(name.into(), data);
    }
}

impl AssetStore for MemoryAssetStore {
    fn load_bytes(&self, name: &str, _kind: AssetKind) -> Result<Vec<u8>, String> {
        self.assets
            .get(name)
            .cloned()
            .ok_or_else(|| format!("asset not found: {name}"))
    }
}
