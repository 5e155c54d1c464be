//! Page navigation and edit orchestration.
//!
//! The navigator is an explicit state machine driven by the host's event
//! pump: the host calls `on_activate` once, then `on_input_event` for
//! clicks and `on_tick` every frame. There is no global registration and
//! no singleton; collaborators are handed in at construction and the
//! navigator is passed by reference to whoever needs it.
//!
//! # Contracts
//! - **Invariant**: while `Displaying(id)`, `id` resolves to a live page.
//! - **Invariant**: the visible branch list is a projection of the current
//!   page's branches, re-derived on every navigation and edit commit.
//! - A started transition always runs to completion; input received while
//!   `Transitioning` is dropped.

use std::collections::VecDeque;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::assets::{AssetKind, AssetStore};
use crate::audio::Audio;
use crate::book::{BranchDraft, StoryBook};
use crate::branch::{StoryBranch, TransitionKind, GRID_COLUMNS, GRID_ROWS};
use crate::ids::{BranchId, PageId};
use crate::page::StoryPage;
use crate::render::{PageView, Presenter};
use crate::store::BookStore;
use crate::transition::{SlideDirection, Transition};

/// Navigation machine states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigatorState {
    Uninitialized,
    Displaying(PageId),
    Transitioning { from: PageId, to: PageId },
}

/// Notifications drained by the host after pumping the navigator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BookEvent {
    PageChanged {
        page: PageId,
        /// Branch that was traversed; `None` for direct jumps and the
        /// initial load.
        via: Option<BranchId>,
    },
}

/// Page-level field edits pushed back from the authoring surface.
#[derive(Clone, Debug, Default)]
pub struct PageEdit {
    pub name: String,
    pub background: Option<String>,
    pub animation: Option<String>,
    pub background_music: Option<String>,
    pub branches: Vec<StoryBranch>,
}

/// Runtime controller over a [`StoryBook`].
pub struct Navigator {
    book: StoryBook,
    store: BookStore,
    assets: Box<dyn AssetStore>,
    presenter: Box<dyn Presenter>,
    audio: Box<dyn Audio>,
    state: NavigatorState,
    /// First page ever displayed; "back" bottoms out here.
    home: Option<PageId>,
    back_stack: Vec<PageId>,
    view: PageView,
    transition: Transition,
    /// Branch whose navigation is deferred until the transition completes.
    pending: Option<StoryBranch>,
    events: VecDeque<BookEvent>,
}

impl Navigator {
    pub fn new(
        store: BookStore,
        assets: Box<dyn AssetStore>,
        presenter: Box<dyn Presenter>,
        audio: Box<dyn Audio>,
    ) -> Self {
        Self {
            book: StoryBook::new(),
            store,
            assets,
            presenter,
            audio,
            state: NavigatorState::Uninitialized,
            home: None,
            back_stack: Vec::new(),
            view: PageView::default(),
            transition: Transition::idle(),
            pending: None,
            events: VecDeque::new(),
        }
    }

    pub fn book(&self) -> &StoryBook {
        &self.book
    }

    pub fn view(&self) -> &PageView {
        &self.view
    }

    pub fn state(&self) -> NavigatorState {
        self.state
    }

    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    /// Page the navigator considers current; the outgoing page while a
    /// transition is running.
    pub fn current_page(&self) -> Option<PageId> {
        match self.state {
            NavigatorState::Uninitialized => None,
            NavigatorState::Displaying(id) => Some(id),
            NavigatorState::Transitioning { from, .. } => Some(from),
        }
    }

    pub fn can_back(&self) -> bool {
        self.view.can_back
    }

    /// Drains pending notifications, oldest first.
    pub fn take_events(&mut self) -> Vec<BookEvent> {
        self.events.drain(..).collect()
    }

    /// Loads the persisted book — healing an absent or corrupt document
    /// with a fresh one — and displays the first page.
    pub fn on_activate(&mut self) {
        if !matches!(self.state, NavigatorState::Uninitialized) {
            warn!("navigator already activated");
            return;
        }

        self.book = if self.store.exists() {
            match self.store.read_book() {
                Ok(book) => book,
                Err(err) => {
                    warn!("book load failed ({err}); starting a fresh book");
                    let book = StoryBook::new();
                    self.persist(&book);
                    book
                }
            }
        } else {
            info!("no book document at {}; creating one", self.store.path().display());
            let book = StoryBook::new();
            self.persist(&book);
            book
        };

        let first = match self.book.first_page() {
            Some(page) => page.id,
            None => {
                let id = self.book.synthesize_default_page();
                self.save();
                id
            }
        };
        self.apply_page(first, None);
    }

    /// Screen-space click, translated into the 16x12 logical grid and
    /// hit-tested against the visible branches in list order. A click that
    /// lands on no hotspot counts as a background click and goes home.
    pub fn on_input_event(&mut self, x: f32, y: f32, viewport_width: f32, viewport_height: f32) {
        if matches!(self.state, NavigatorState::Transitioning { .. }) {
            return;
        }
        if viewport_width <= 0.0 || viewport_height <= 0.0 {
            return;
        }

        let cell_x = (x / (viewport_width / GRID_COLUMNS as f32)).floor();
        let cell_y = (y / (viewport_height / GRID_ROWS as f32)).floor();
        let hit = if cell_x < 0.0 || cell_y < 0.0 {
            None
        } else {
            let (cell_x, cell_y) = (cell_x as u32, cell_y as u32);
            self.view
                .branches
                .iter()
                .find(|branch| branch.contains_cell(cell_x, cell_y))
                .map(|branch| branch.id)
        };
        self.branch_clicked(hit);
    }

    /// Advances a running transition; on completion performs the deferred
    /// page load.
    pub fn on_tick(&mut self, dt: Duration) {
        if !self.transition.tick(dt) {
            return;
        }
        if let Some(branch) = self.pending.take() {
            let target = branch.next_page_id;
            self.navigate(target, Some(&branch), true);
        }
    }

    /// Activates a branch from the visible set, or goes home on a
    /// background click (`None`).
    pub fn branch_clicked(&mut self, id: Option<BranchId>) {
        if matches!(self.state, NavigatorState::Transitioning { .. }) {
            return;
        }

        let Some(id) = id else {
            if let Some(home) = self.home {
                self.load_page(home, None);
            }
            return;
        };

        let Some(branch) = self.view.branches.iter().find(|branch| branch.id == id).cloned() else {
            warn!("clicked branch {id} is not in the visible set");
            return;
        };

        // Set before clear: a variable named in both lists ends up false.
        self.book.set_variables(&branch);
        self.book.clear_variables(&branch);
        if !branch.post_variables.is_empty() || !branch.reverse_variables.is_empty() {
            self.save();
        }

        if let Some(sfx) = branch.sfx.as_deref() {
            if self.assets.exists(sfx, AssetKind::Sfx) {
                self.audio.play_sfx(sfx);
            } else {
                warn!("unable to load sfx '{sfx}'");
            }
        }

        match branch.transition {
            TransitionKind::None => {
                let target = branch.next_page_id;
                self.load_page(target, Some(&branch));
            }
            TransitionKind::Fade => {
                self.begin_transition(Transition::begin_fade(branch.transition_length_ms), branch);
            }
            TransitionKind::Slide => {
                let transition = Transition::begin_slide(
                    branch.transition_length_ms,
                    SlideDirection::Left,
                    branch.current_image.clone(),
                    branch.next_image.clone(),
                );
                self.begin_transition(transition, branch);
            }
        }
    }

    /// Navigates to `id`. Loading the already-current page is a no-op; a
    /// dangling id falls back to the book's first page.
    pub fn load_page(&mut self, id: PageId, via: Option<&StoryBranch>) {
        if matches!(self.state, NavigatorState::Transitioning { .. }) {
            warn!("navigation requested mid-transition; dropped");
            return;
        }
        self.navigate(id, via, false);
    }

    /// Pops the back-stack, or returns to the home page when it is empty.
    pub fn load_back(&mut self) {
        match self.back_stack.pop() {
            Some(id) => self.load_page(id, None),
            None => {
                if let Some(home) = self.home {
                    self.load_page(home, None);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Editor-facing wrappers: mutate the book, persist, refresh the view.
    // ------------------------------------------------------------------

    /// Adds a branch to the current page and persists the book.
    pub fn add_branch_to_page(&mut self, draft: BranchDraft) -> Option<StoryBranch> {
        let current = self.current_page()?;
        let branch = self.book.add_branch_to_page(current, draft);
        self.save();
        self.refresh_projection();
        Some(branch)
    }

    /// Deletes a branch everywhere and persists the book.
    pub fn delete_branch(&mut self, id: BranchId) {
        if self.book.delete_branch(id) {
            self.save();
        }
        self.refresh_projection();
    }

    /// Deletes a page with its cascade and persists the book. When the
    /// current page dies, navigation falls back to the first remaining
    /// page, or a freshly synthesized default page if none remain.
    pub fn delete_page(&mut self, id: PageId) {
        let was_current = self.current_page() == Some(id);
        if !self.book.delete_page(id) {
            return;
        }
        if self.book.pages.is_empty() {
            self.book.synthesize_default_page();
        }
        self.save();

        self.back_stack.retain(|entry| *entry != id);
        if self.home == Some(id) {
            self.home = self.book.first_page().map(|page| page.id);
        }

        if was_current {
            let fallback = match self.book.first_page() {
                Some(page) => page.id,
                None => return,
            };
            self.navigate(fallback, None, true);
        } else {
            self.refresh_projection();
        }
    }

    /// Full resync after the authoring surface edited the current page:
    /// reconcile the edit into the book, persist, redraw.
    pub fn book_updated(&mut self, edit: &PageEdit) {
        let Some(current) = self.current_page() else {
            return;
        };
        if !self.book.update_page(
            current,
            &edit.name,
            edit.background.as_deref(),
            edit.animation.as_deref(),
            edit.background_music.as_deref(),
            &edit.branches,
        ) {
            error!("book update failed");
            return;
        }
        self.save();
        self.refresh_projection();
    }

    /// Swaps in a whole book (undo/redo restore), persists it, and heals
    /// the current-page pointer if the restored book no longer has it.
    pub fn replace_book(&mut self, book: StoryBook) {
        self.book = book;
        if self.book.pages.is_empty() {
            self.book.synthesize_default_page();
        }
        self.save();

        match self.current_page() {
            Some(current) if self.book.page(current).is_some() => self.refresh_projection(),
            _ => {
                if let Some(first) = self.book.first_page().map(|page| page.id) {
                    self.navigate(first, None, true);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn begin_transition(&mut self, transition: Transition, branch: StoryBranch) {
        let NavigatorState::Displaying(from) = self.state else {
            return;
        };
        self.state = NavigatorState::Transitioning {
            from,
            to: branch.next_page_id,
        };
        self.transition = transition;
        self.pending = Some(branch);
    }

    /// Navigation with the redundant-load guard; `force` bypasses the
    /// guard so a deferred or healing load still applies.
    fn navigate(&mut self, id: PageId, via: Option<&StoryBranch>, force: bool) {
        if !force && self.current_page() == Some(id) {
            return;
        }

        let target = if self.book.page(id).is_some() {
            id
        } else {
            match self.book.first_page() {
                Some(first) => {
                    warn!("page {id} not in the book; falling back to '{}'", first.name);
                    first.id
                }
                None => {
                    error!("book has no pages to fall back to");
                    return;
                }
            }
        };

        // Forward navigation (the current page has an edge into the target)
        // records the page we are leaving.
        if let Some(previous) = self.current_page() {
            if self.view.branches.iter().any(|branch| branch.next_page_id == target) {
                self.back_stack.push(previous);
            }
        }

        self.apply_page(target, via);
    }

    /// Unconditionally makes `id` the displayed page and rebuilds the
    /// projection. `id` must resolve.
    fn apply_page(&mut self, id: PageId, via: Option<&StoryBranch>) {
        let Some(page) = self.book.page(id).cloned() else {
            error!("page {id} vanished while applying it");
            return;
        };

        self.state = NavigatorState::Displaying(id);
        if self.home.is_none() {
            self.home = Some(id);
        }

        self.probe_asset(page.background.as_deref(), AssetKind::Image);
        self.probe_asset(page.animation.as_deref(), AssetKind::Animation);
        self.probe_asset(page.background_music.as_deref(), AssetKind::Music);

        self.view = PageView {
            page: Some(id),
            name: page.name.clone(),
            background: page.background.clone(),
            animation: page.animation.clone(),
            background_music: page.background_music.clone(),
            branches: self.visible_branches(&page),
            can_back: self.home != Some(id),
        };

        self.audio.play_music(self.view.background_music.as_deref());
        self.presenter.update_draw(&self.view);
        self.events.push_back(BookEvent::PageChanged {
            page: id,
            via: via.map(|branch| branch.id),
        });
    }

    /// Rebuilds the visible projection of the current page after an edit,
    /// without firing navigation side effects.
    fn refresh_projection(&mut self) {
        let Some(current) = self.current_page() else {
            return;
        };
        let Some(page) = self.book.page(current).cloned() else {
            return;
        };
        self.view.name = page.name.clone();
        self.view.background = page.background.clone();
        self.view.animation = page.animation.clone();
        self.view.background_music = page.background_music.clone();
        self.view.branches = self.visible_branches(&page);
        self.presenter.update_draw(&self.view);
    }

    /// Branches of `page` that pass variable gating, in book order. A
    /// listed id with no backing branch is logged and skipped.
    fn visible_branches(&self, page: &StoryPage) -> Vec<StoryBranch> {
        for listed in &page.branches {
            if self.book.branch(*listed).is_none() {
                warn!("page '{}' lists missing branch {listed}", page.name);
            }
        }

        let mut visible = Vec::new();
        for branch in &self.book.branches {
            if !page.branches.contains(&branch.id) || !self.book.show_branch(branch) {
                continue;
            }
            self.probe_asset(branch.image.as_deref(), AssetKind::Image);
            visible.push(branch.clone());
        }
        visible
    }

    fn probe_asset(&self, name: Option<&str>, kind: AssetKind) {
        if let Some(name) = name {
            if !name.is_empty() && !self.assets.exists(name, kind) {
                warn!("unable to load {kind:?} asset '{name}'");
            }
        }
    }

    fn save(&self) {
        self.persist(&self.book);
    }

    fn persist(&self, book: &StoryBook) {
        if let Err(err) = self.store.save_book(book) {
            error!("book save failed: {err}");
        }
    }
}

#[cfg(test)]
#[path = "tests/navigator_tests.rs"]
mod tests;
