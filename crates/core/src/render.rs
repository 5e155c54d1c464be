//! Presentation collaborator contract.

use crate::branch::StoryBranch;
use crate::ids::PageId;

/// Read-mostly projection of the page being displayed.
///
/// Asset fields carry names only; the presenter resolves them. The branch
/// list holds the branches that passed variable gating, in book order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageView {
    pub page: Option<PageId>,
    pub name: String,
    pub background: Option<String>,
    pub animation: Option<String>,
    pub background_music: Option<String>,
    pub branches: Vec<StoryBranch>,
    pub can_back: bool,
}

/// Redraw surface the navigator notifies after every navigation or edit.
pub trait Presenter {
    fn update_draw(&mut self, view: &PageView);
}

impl<T: Presenter + ?Sized> Presenter for Box<T> {
    fn update_draw(&mut self, view: &PageView) {
        (**self).update_draw(view);
    }
}

/// Presenter that discards draws; for headless hosts and tests.
#[derive(Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn update_draw(&mut self, _view: &PageView) {}
}
