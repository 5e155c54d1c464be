//! Story branch edge: a clickable hotspot placed on a page.

use serde::{Deserialize, Serialize};

use crate::ids::{BranchId, PageId};

/// Number of logical grid columns a page is divided into for hit testing.
pub const GRID_COLUMNS: u32 = 16;
/// Number of logical grid rows.
pub const GRID_ROWS: u32 = 12;

/// Default transition length in milliseconds for a new branch.
pub const DEFAULT_TRANSITION_LENGTH_MS: u32 = 1000;

/// Position of a hotspot in grid cells, origin at the bottom-left.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: u32,
    pub y: u32,
}

impl GridPoint {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Extent of a hotspot in grid cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridExtent {
    pub width: u32,
    pub height: u32,
}

impl GridExtent {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for GridExtent {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// Visual effect played when a branch is traversed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// Page switches immediately.
    #[default]
    None,
    /// Screen fades out, the page switches, the screen fades back in.
    Fade,
    /// The next page's image slides in over the current one.
    Slide,
}

/// A directed edge in the story graph.
///
/// Branches are owned by the book's branch collection; the navigator's
/// visible set holds copies keyed by id, refreshed on every page load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoryBranch {
    pub id: BranchId,
    #[serde(default)]
    pub location: GridPoint,
    #[serde(default)]
    pub size: GridExtent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Target page. Deletion cascades keep this pointing at a live page.
    pub next_page_id: PageId,
    pub next_page_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sfx: Option<String>,
    #[serde(default)]
    pub transition: TransitionKind,
    #[serde(default = "default_transition_length_ms")]
    pub transition_length_ms: u32,
    /// Outgoing page image, used only by `Slide`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_image: Option<String>,
    /// Incoming page image, used only by `Slide`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_image: Option<String>,
    /// Variable names that must all read `true` for the branch to show.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pre_variables: Vec<String>,
    /// Variable names set `true` when the branch is traversed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post_variables: Vec<String>,
    /// Variable names set `false` when the branch is traversed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reverse_variables: Vec<String>,
}

fn default_transition_length_ms() -> u32 {
    DEFAULT_TRANSITION_LENGTH_MS
}

impl StoryBranch {
    /// Hit test against a logical grid cell.
    ///
    /// Inclusive on the low edge, exclusive on the high edge; a zero-extent
    /// branch catches every cell.
    pub fn contains_cell(&self, x: u32, y: u32) -> bool {
        if self.is_catch_all() {
            return true;
        }
        self.location.x <= x
            && x < self.location.x + self.size.width
            && self.location.y <= y
            && y < self.location.y + self.size.height
    }

    /// True when the branch has zero width or height and so accepts any
    /// click on the page.
    pub fn is_catch_all(&self) -> bool {
        self.size.width == 0 || self.size.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hotspot(x: u32, y: u32, width: u32, height: u32) -> StoryBranch {
        StoryBranch {
            id: BranchId::new(),
            location: GridPoint::new(x, y),
            size: GridExtent::new(width, height),
            image: None,
            next_page_id: PageId::new(),
            next_page_name: "target".to_string(),
            sfx: None,
            transition: TransitionKind::None,
            transition_length_ms: DEFAULT_TRANSITION_LENGTH_MS,
            current_image: None,
            next_image: None,
            pre_variables: Vec::new(),
            post_variables: Vec::new(),
            reverse_variables: Vec::new(),
        }
    }

    #[test]
    fn hit_test_is_inclusive_low_exclusive_high() {
        let branch = hotspot(2, 3, 2, 2);
        assert!(branch.contains_cell(2, 3));
        assert!(branch.contains_cell(3, 4));
        assert!(!branch.contains_cell(4, 3));
        assert!(!branch.contains_cell(2, 5));
        assert!(!branch.contains_cell(1, 3));
    }

    #[test]
    fn zero_extent_catches_everything() {
        let branch = hotspot(5, 5, 0, 3);
        assert!(branch.is_catch_all());
        assert!(branch.contains_cell(0, 0));
        assert!(branch.contains_cell(15, 11));
    }

    #[test]
    fn missing_transition_fields_use_defaults() {
        let json = format!(
            r#"{{"id":"{}","next_page_id":"{}","next_page_name":"Chapter 2"}}"#,
            BranchId::new(),
            PageId::new()
        );
        let branch: StoryBranch = serde_json::from_str(&json).unwrap();
        assert_eq!(branch.transition, TransitionKind::None);
        assert_eq!(branch.transition_length_ms, DEFAULT_TRANSITION_LENGTH_MS);
        assert_eq!(branch.size, GridExtent::new(1, 1));
    }
}
