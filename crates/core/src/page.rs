//! Story page node.

use serde::{Deserialize, Serialize};

use crate::ids::{BranchId, PageId};

/// A navigable screen: named background art, optional animation and music,
/// plus the ordered list of outgoing branch hotspots.
///
/// # Contract
/// - **Invariant**: after a committed mutation, every id in `branches`
///   resolves to a live branch owned by this page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoryPage {
    pub id: PageId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_music: Option<String>,
    #[serde(default)]
    pub branches: Vec<BranchId>,
}

impl StoryPage {
    /// Creates a page with a fresh id and no branches.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: PageId::new(),
            name: name.into(),
            background: None,
            animation: None,
            background_music: None,
            branches: Vec::new(),
        }
    }
}
