//! Walks a small story through the navigator, headless.
//!
//! Builds a three-page book in a temp directory, clicks through a gated
//! branch, and prints the navigation events as they fire.

use std::time::Duration;

use storybook_engine::{
    BookEvent, BookStore, BranchDraft, GridPoint, MemoryAssetStore, Navigator, NullPresenter,
    SilentAudio, TransitionKind,
};

fn main() {
    let dir = std::env::temp_dir().join("storybook_walkthrough");
    let _ = std::fs::remove_dir_all(&dir);

    let mut navigator = Navigator::new(
        BookStore::in_dir(&dir),
        Box::new(MemoryAssetStore::default()),
        Box::new(NullPresenter),
        Box::new(SilentAudio),
    );
    navigator.on_activate();
    report(&mut navigator);

    let chapter = navigator
        .add_branch_to_page(BranchDraft {
            target_page_name: "Chapter 2".to_string(),
            ..BranchDraft::default()
        })
        .expect("navigator is active");
    let finale = navigator
        .add_branch_to_page(BranchDraft {
            location: GridPoint::new(8, 0),
            transition: TransitionKind::Fade,
            transition_length_ms: 300,
            target_page_name: "Finale".to_string(),
            ..BranchDraft::default()
        })
        .expect("navigator is active");

    println!(
        "book now has {} pages and {} branches",
        navigator.book().pages.len(),
        navigator.book().branches.len()
    );

    navigator.branch_clicked(Some(chapter.id));
    report(&mut navigator);

    navigator.load_back();
    report(&mut navigator);

    // The fade defers the page switch until the ramp finishes.
    navigator.branch_clicked(Some(finale.id));
    while navigator.transition().is_running() {
        navigator.on_tick(Duration::from_millis(100));
    }
    report(&mut navigator);

    println!("persisted book at {}", BookStore::in_dir(&dir).path().display());
}

fn report(navigator: &mut Navigator) {
    for event in navigator.take_events() {
        match event {
            BookEvent::PageChanged { page, via } => {
                let label = navigator
                    .book()
                    .page(page)
                    .map(|page| page.name.clone())
                    .unwrap_or_else(|| page.to_string());
                match via {
                    Some(branch) => println!("-> {label} (via branch {branch})"),
                    None => println!("-> {label}"),
                }
            }
        }
    }
}
