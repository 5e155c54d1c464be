//! Story graph: pages, branches, and the global variable store.
//!
//! The book is the single source of truth for the graph. Every mutation
//! here preserves referential integrity: a committed book never holds a
//! branch pointing at a dead page, nor a page listing a dead branch.
//!
//! # Contracts
//! - **Invariant**: pages and branches are unique by id; insertion order is
//!   display/iteration order.
//! - **Invariant**: `StoryBranch::next_page_id` resolves to a live page.
//! - **Invariant**: every id in `StoryPage::branches` resolves to a live
//!   branch.

use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::branch::{GridExtent, GridPoint, StoryBranch, TransitionKind, DEFAULT_TRANSITION_LENGTH_MS};
use crate::ids::{BranchId, PageId};
use crate::page::StoryPage;
use crate::variables::VariableStore;

/// Background asset name given to a synthesized default page.
pub const DEFAULT_PAGE_BACKGROUND: &str = "background";

/// Authoring input for a new branch hotspot.
#[derive(Clone, Debug, PartialEq)]
pub struct BranchDraft {
    pub location: GridPoint,
    pub size: GridExtent,
    pub image: Option<String>,
    pub sfx: Option<String>,
    pub transition: TransitionKind,
    pub transition_length_ms: u32,
    pub current_image: Option<String>,
    pub next_image: Option<String>,
    /// Display name of the page the branch leads to; empty synthesizes
    /// `"Next Page N"`.
    pub target_page_name: String,
}

impl Default for BranchDraft {
    fn default() -> Self {
        Self {
            location: GridPoint::default(),
            size: GridExtent::default(),
            image: None,
            sfx: None,
            transition: TransitionKind::None,
            transition_length_ms: DEFAULT_TRANSITION_LENGTH_MS,
            current_image: None,
            next_image: None,
            target_page_name: String::new(),
        }
    }
}

/// The complete story graph.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryBook {
    #[serde(default)]
    pub pages: Vec<StoryPage>,
    #[serde(default)]
    pub branches: Vec<StoryBranch>,
    #[serde(default)]
    pub variables: VariableStore,
}

impl StoryBook {
    /// Creates an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a page by id.
    pub fn page(&self, id: PageId) -> Option<&StoryPage> {
        self.pages.iter().find(|page| page.id == id)
    }

    /// Looks up a page by id, mutably.
    pub fn page_mut(&mut self, id: PageId) -> Option<&mut StoryPage> {
        self.pages.iter_mut().find(|page| page.id == id)
    }

    /// Looks up a branch by id.
    pub fn branch(&self, id: BranchId) -> Option<&StoryBranch> {
        self.branches.iter().find(|branch| branch.id == id)
    }

    /// First page in display order, if any.
    pub fn first_page(&self) -> Option<&StoryPage> {
        self.pages.first()
    }

    /// Id of the first page whose name matches exactly (case-sensitive).
    pub fn page_id_by_name(&self, name: &str) -> Option<PageId> {
        self.pages.iter().find(|page| page.name == name).map(|page| page.id)
    }

    fn page_id_by_name_ci(&self, name: &str) -> Option<PageId> {
        let wanted = name.to_lowercase();
        self.pages
            .iter()
            .find(|page| page.name.to_lowercase() == wanted)
            .map(|page| page.id)
    }

    /// Creates a branch from `source` to the page named in the draft.
    ///
    /// An empty target name is synthesized as `"Next Page N"` where `N` is
    /// the page count at call time. The target is matched case-insensitively
    /// against existing pages and reused when found, otherwise a new page is
    /// created. A missing source page is a caller error: it is logged and
    /// the source link skipped, but the branch is still created.
    ///
    /// Returns a copy of the created branch so callers can fold it into any
    /// live projection.
    pub fn add_branch_to_page(&mut self, source: PageId, draft: BranchDraft) -> StoryBranch {
        let mut target_name = draft.target_page_name.trim().to_string();
        if target_name.is_empty() {
            target_name = format!("Next Page {}", self.pages.len());
        }

        let target_id = match self.page_id_by_name_ci(&target_name) {
            Some(existing) => existing,
            None => {
                let page = StoryPage::new(target_name.clone());
                let id = page.id;
                self.pages.push(page);
                id
            }
        };

        let branch = StoryBranch {
            id: BranchId::new(),
            location: draft.location,
            size: draft.size,
            image: draft.image,
            next_page_id: target_id,
            next_page_name: target_name,
            sfx: draft.sfx,
            transition: draft.transition,
            transition_length_ms: draft.transition_length_ms,
            current_image: draft.current_image,
            next_image: draft.next_image,
            pre_variables: Vec::new(),
            post_variables: Vec::new(),
            reverse_variables: Vec::new(),
        };

        match self.page_mut(source) {
            Some(page) => page.branches.push(branch.id),
            None => warn!("source page {source} not found; branch {} left unattached", branch.id),
        }
        self.branches.push(branch.clone());
        branch
    }

    /// Reconciles an edited page projection back into the book.
    ///
    /// The name is overwritten unconditionally; background, animation and
    /// music are written only when they actually change (empty clears). Each
    /// snapshot is matched against the branch collection by id and its
    /// mutable fields overwritten; a snapshot whose id is unknown is a
    /// referential-integrity error that is logged without aborting the rest
    /// of the update. Returns `false` only when the page itself is unknown.
    pub fn update_page(
        &mut self,
        id: PageId,
        name: &str,
        background: Option<&str>,
        animation: Option<&str>,
        background_music: Option<&str>,
        snapshots: &[StoryBranch],
    ) -> bool {
        let Some(page) = self.pages.iter_mut().find(|page| page.id == id) else {
            error!("page {id} updated, unable to find it in the book");
            return false;
        };

        page.name = name.to_string();
        apply_field(&mut page.background, background);
        apply_field(&mut page.animation, animation);
        apply_field(&mut page.background_music, background_music);

        for snapshot in snapshots {
            match self.branches.iter_mut().find(|branch| branch.id == snapshot.id) {
                Some(branch) => {
                    branch.location = snapshot.location;
                    branch.size = snapshot.size;
                    branch.image = snapshot.image.clone();
                    branch.sfx = snapshot.sfx.clone();
                    branch.transition = snapshot.transition;
                    branch.transition_length_ms = snapshot.transition_length_ms;
                    branch.current_image = snapshot.current_image.clone();
                    branch.next_image = snapshot.next_image.clone();
                    branch.pre_variables = snapshot.pre_variables.clone();
                    branch.post_variables = snapshot.post_variables.clone();
                    branch.reverse_variables = snapshot.reverse_variables.clone();
                }
                None => error!("branch {} not found in the book during update", snapshot.id),
            }
        }
        true
    }

    /// Removes a branch and scrubs its id from every page's branch list.
    ///
    /// Returns `true` when a branch was actually removed.
    pub fn delete_branch(&mut self, id: BranchId) -> bool {
        let before = self.branches.len();
        self.branches.retain(|branch| branch.id != id);
        for page in &mut self.pages {
            page.branches.retain(|listed| *listed != id);
        }
        self.branches.len() != before
    }

    /// Removes a page, cascading over every branch it lists and every
    /// branch targeting it, then scrubs the removed branch ids from the
    /// remaining pages.
    ///
    /// Returns `true` when the page existed.
    pub fn delete_page(&mut self, id: PageId) -> bool {
        let Some(page) = self.page(id) else {
            warn!("page {id} not found; nothing deleted");
            return false;
        };
        let listed = page.branches.clone();

        let mut removed: Vec<BranchId> = Vec::new();
        self.branches.retain(|branch| {
            let doomed = branch.next_page_id == id || listed.contains(&branch.id);
            if doomed {
                removed.push(branch.id);
            }
            !doomed
        });

        self.pages.retain(|page| page.id != id);
        for page in &mut self.pages {
            page.branches.retain(|listed| !removed.contains(listed));
        }
        true
    }

    /// True when every precondition variable of the branch reads `true`.
    /// A precondition naming an unset variable blocks the branch.
    pub fn show_branch(&self, branch: &StoryBranch) -> bool {
        branch.pre_variables.iter().all(|name| self.variables.is_true(name))
    }

    /// Sets every post-variable of the branch to `true`.
    pub fn set_variables(&mut self, branch: &StoryBranch) {
        for name in &branch.post_variables {
            self.variables.set_true(name);
        }
    }

    /// Sets every reverse-variable of the branch to `false`.
    pub fn clear_variables(&mut self, branch: &StoryBranch) {
        for name in &branch.reverse_variables {
            self.variables.set_false(name);
        }
    }

    /// Appends a synthesized `"Default"` page and returns its id.
    pub fn synthesize_default_page(&mut self) -> PageId {
        let mut page = StoryPage::new("Default");
        page.background = Some(DEFAULT_PAGE_BACKGROUND.to_string());
        let id = page.id;
        self.pages.push(page);
        id
    }
}

/// Writes `value` into `slot` only when it differs; empty input clears.
fn apply_field(slot: &mut Option<String>, value: Option<&str>) {
    let incoming = value.filter(|value| !value.is_empty());
    if slot.as_deref() != incoming {
        *slot = incoming.map(str::to_string);
    }
}

#[cfg(test)]
#[path = "tests/book_tests.rs"]
mod tests;
