use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use super::*;
use crate::{GridExtent, GridPoint, MemoryAssetStore, NullPresenter, SilentAudio, BOOK_FILE_NAME};

#[derive(Clone, Default)]
struct AudioLog(Rc<RefCell<Vec<String>>>);

struct RecordingAudio(AudioLog);

impl Audio for RecordingAudio {
    fn play_music(&mut self, name: Option<&str>) {
        self.0 .0.borrow_mut().push(format!("music:{}", name.unwrap_or("-")));
    }

    fn play_sfx(&mut self, name: &str) {
        self.0 .0.borrow_mut().push(format!("sfx:{name}"));
    }

    fn stop_music(&mut self) {
        self.0 .0.borrow_mut().push("stop".to_string());
    }
}

fn navigator_in(dir: &Path) -> Navigator {
    Navigator::new(
        BookStore::in_dir(dir),
        Box::new(MemoryAssetStore::default()),
        Box::new(NullPresenter),
        Box::new(SilentAudio),
    )
}

fn activated(dir: &Path) -> Navigator {
    let mut navigator = navigator_in(dir);
    navigator.on_activate();
    navigator.take_events();
    navigator
}

fn add_target(navigator: &mut Navigator, name: &str) -> (BranchId, PageId) {
    let branch = navigator
        .add_branch_to_page(BranchDraft {
            target_page_name: name.to_string(),
            ..BranchDraft::default()
        })
        .unwrap();
    (branch.id, branch.next_page_id)
}

#[test]
fn activate_synthesizes_and_persists_a_default_page() {
    let dir = tempfile::tempdir().unwrap();
    let mut navigator = navigator_in(dir.path());
    navigator.on_activate();

    assert_eq!(navigator.view().name, "Default");
    assert!(!navigator.can_back());
    assert!(dir.path().join(BOOK_FILE_NAME).exists());

    let events = navigator.take_events();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], BookEvent::PageChanged { via: None, .. }));
}

#[test]
fn activate_twice_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut navigator = activated(dir.path());
    let page_count = navigator.book().pages.len();
    navigator.on_activate();
    assert_eq!(navigator.book().pages.len(), page_count);
    assert!(navigator.take_events().is_empty());
}

#[test]
fn loading_the_current_page_is_a_noop() {
    let dir = tempfile::tempdir().unwrap();
    let mut navigator = activated(dir.path());
    let current = navigator.current_page().unwrap();

    navigator.load_page(current, None);
    assert!(navigator.take_events().is_empty());
}

#[test]
fn forward_navigation_pushes_the_back_stack() {
    let dir = tempfile::tempdir().unwrap();
    let mut navigator = activated(dir.path());
    let (_branch, chapter_two) = add_target(&mut navigator, "Chapter 2");

    navigator.load_page(chapter_two, None);
    assert_eq!(navigator.view().name, "Chapter 2");
    assert!(navigator.can_back());

    navigator.load_back();
    assert_eq!(navigator.view().name, "Default");
    assert!(!navigator.can_back());
}

#[test]
fn jump_without_an_edge_does_not_push() {
    let dir = tempfile::tempdir().unwrap();
    let mut navigator = activated(dir.path());
    let default = navigator.current_page().unwrap();
    let (_branch, chapter_two) = add_target(&mut navigator, "Chapter 2");

    navigator.load_page(chapter_two, None);
    // Chapter 2 has no edge back to Default: a direct jump, no push.
    navigator.load_page(default, None);
    navigator.take_events();

    // The only stacked entry is Default itself, so going back is a no-op.
    navigator.load_back();
    assert_eq!(navigator.view().name, "Default");
    assert!(navigator.take_events().is_empty());
}

#[test]
fn dangling_page_id_falls_back_to_the_first_page() {
    let dir = tempfile::tempdir().unwrap();
    let mut navigator = activated(dir.path());

    navigator.load_page(PageId::new(), None);
    assert_eq!(navigator.view().name, "Default");
    let events = navigator.take_events();
    assert_eq!(events.len(), 1);
}

#[test]
fn background_click_returns_home() {
    let dir = tempfile::tempdir().unwrap();
    let mut navigator = activated(dir.path());
    let (_branch, chapter_two) = add_target(&mut navigator, "Chapter 2");

    navigator.load_page(chapter_two, None);
    navigator.branch_clicked(None);
    assert_eq!(navigator.view().name, "Default");
}

#[test]
fn input_events_hit_test_against_the_grid() {
    let dir = tempfile::tempdir().unwrap();
    let mut navigator = activated(dir.path());
    let branch = navigator
        .add_branch_to_page(BranchDraft {
            location: GridPoint::new(2, 3),
            size: GridExtent::new(2, 2),
            target_page_name: "Chapter 2".to_string(),
            ..BranchDraft::default()
        })
        .unwrap();

    // 1600x1200 viewport: cells are 100x100; (350, 450) lands in cell (3, 4).
    navigator.on_input_event(350.0, 450.0, 1600.0, 1200.0);
    assert_eq!(navigator.current_page(), Some(branch.next_page_id));

    // Chapter 2 has no hotspots, so any click is a background click home.
    navigator.on_input_event(350.0, 450.0, 1600.0, 1200.0);
    assert_eq!(navigator.view().name, "Default");
}

#[test]
fn gated_branches_leave_the_visible_set_but_not_the_book() {
    let dir = tempfile::tempdir().unwrap();
    let mut navigator = activated(dir.path());
    let branch = navigator
        .add_branch_to_page(BranchDraft {
            target_page_name: "Vault".to_string(),
            ..BranchDraft::default()
        })
        .unwrap();

    let mut gated = branch.clone();
    gated.pre_variables = vec!["hasKey".to_string()];
    let edit = PageEdit {
        name: navigator.view().name.clone(),
        background: navigator.view().background.clone(),
        animation: None,
        background_music: None,
        branches: vec![gated],
    };
    navigator.book_updated(&edit);

    assert!(navigator.view().branches.is_empty());
    assert!(navigator.book().branch(branch.id).is_some());

    // Clicking the hidden branch does nothing.
    navigator.branch_clicked(Some(branch.id));
    assert_eq!(navigator.view().name, "Default");
}

#[test]
fn traversal_sets_variables_that_unlock_other_branches() {
    let dir = tempfile::tempdir().unwrap();
    let mut navigator = activated(dir.path());
    let unlock = navigator
        .add_branch_to_page(BranchDraft {
            target_page_name: "Intro".to_string(),
            ..BranchDraft::default()
        })
        .unwrap();
    let vault = navigator
        .add_branch_to_page(BranchDraft {
            location: GridPoint::new(8, 0),
            target_page_name: "Vault".to_string(),
            ..BranchDraft::default()
        })
        .unwrap();

    let mut unlock_edit = unlock.clone();
    unlock_edit.post_variables = vec!["seenIntro".to_string()];
    let mut vault_edit = vault.clone();
    vault_edit.pre_variables = vec!["seenIntro".to_string()];
    let edit = PageEdit {
        name: "Default".to_string(),
        background: navigator.view().background.clone(),
        animation: None,
        background_music: None,
        branches: vec![unlock_edit, vault_edit],
    };
    navigator.book_updated(&edit);
    assert_eq!(navigator.view().branches.len(), 1);

    navigator.branch_clicked(Some(unlock.id));
    assert!(navigator.book().variables.is_true("seenIntro"));

    navigator.load_back();
    assert_eq!(navigator.view().branches.len(), 2);
}

#[test]
fn fade_defers_the_load_and_drops_input() {
    let dir = tempfile::tempdir().unwrap();
    let mut navigator = activated(dir.path());
    let branch = navigator
        .add_branch_to_page(BranchDraft {
            transition: TransitionKind::Fade,
            transition_length_ms: 1000,
            target_page_name: "Chapter 2".to_string(),
            ..BranchDraft::default()
        })
        .unwrap();

    navigator.branch_clicked(Some(branch.id));
    assert!(matches!(navigator.state(), NavigatorState::Transitioning { .. }));
    assert_eq!(navigator.view().name, "Default");

    // Mid-transition input and navigation are ignored.
    navigator.branch_clicked(Some(branch.id));
    navigator.load_page(branch.next_page_id, None);
    assert_eq!(navigator.view().name, "Default");

    navigator.on_tick(Duration::from_millis(1000));
    assert!(matches!(navigator.state(), NavigatorState::Transitioning { .. }));
    navigator.on_tick(Duration::from_millis(1000));

    assert_eq!(navigator.view().name, "Chapter 2");
    let events = navigator.take_events();
    assert!(events.iter().any(|event| matches!(
        event,
        BookEvent::PageChanged { via: Some(id), .. } if *id == branch.id
    )));

    // The traversal was a forward navigation, so back works.
    navigator.load_back();
    assert_eq!(navigator.view().name, "Default");
}

#[test]
fn deleting_the_current_page_lands_on_a_live_page() {
    let dir = tempfile::tempdir().unwrap();
    let mut navigator = activated(dir.path());
    let (_branch, chapter_two) = add_target(&mut navigator, "Chapter 2");

    navigator.load_page(chapter_two, None);
    navigator.delete_page(chapter_two);

    assert_eq!(navigator.view().name, "Default");
    assert!(navigator.book().page(chapter_two).is_none());
}

#[test]
fn deleting_every_page_synthesizes_a_default() {
    let dir = tempfile::tempdir().unwrap();
    let mut navigator = activated(dir.path());
    let default = navigator.current_page().unwrap();

    navigator.delete_page(default);
    assert_eq!(navigator.book().pages.len(), 1);
    assert_eq!(navigator.view().name, "Default");
    assert_ne!(navigator.current_page(), Some(default));
}

#[test]
fn sfx_plays_only_when_the_asset_resolves() {
    let dir = tempfile::tempdir().unwrap();
    let log = AudioLog::default();
    let mut assets = MemoryAssetStore::default();
    assets.insert("click", vec![1, 2, 3]);
    let mut navigator = Navigator::new(
        BookStore::in_dir(dir.path()),
        Box::new(assets),
        Box::new(NullPresenter),
        Box::new(RecordingAudio(log.clone())),
    );
    navigator.on_activate();

    let heard = navigator
        .add_branch_to_page(BranchDraft {
            sfx: Some("click".to_string()),
            target_page_name: "Chapter 2".to_string(),
            ..BranchDraft::default()
        })
        .unwrap();
    navigator.branch_clicked(Some(heard.id));
    assert!(log.0.borrow().iter().any(|entry| entry == "sfx:click"));

    navigator.load_back();
    let missing = navigator
        .add_branch_to_page(BranchDraft {
            location: GridPoint::new(8, 0),
            sfx: Some("ghost".to_string()),
            target_page_name: "Chapter 3".to_string(),
            ..BranchDraft::default()
        })
        .unwrap();
    navigator.branch_clicked(Some(missing.id));
    assert!(!log.0.borrow().iter().any(|entry| entry == "sfx:ghost"));
}
