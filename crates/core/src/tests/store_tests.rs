use super::*;
use crate::book::BranchDraft;
use crate::error::BookError;

fn sample_book() -> StoryBook {
    let mut book = StoryBook::new();
    let default = book.synthesize_default_page();
    let draft = BranchDraft {
        target_page_name: "Chapter 2".to_string(),
        ..BranchDraft::default()
    };
    book.add_branch_to_page(default, draft);
    book.variables.set_true("seenIntro");
    book
}

#[test]
fn round_trips_the_whole_document() {
    let dir = tempfile::tempdir().unwrap();
    let store = BookStore::in_dir(dir.path());
    let book = sample_book();

    store.save_book(&book).unwrap();
    let loaded = store.read_book().unwrap();
    assert_eq!(loaded, book);
}

#[test]
fn save_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let store = BookStore::new(dir.path().join("data").join("stories").join(BOOK_FILE_NAME));

    store.save_book(&StoryBook::new()).unwrap();
    assert!(store.exists());
}

#[test]
fn missing_document_reads_as_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = BookStore::in_dir(dir.path());
    assert!(matches!(store.read_book(), Err(BookError::StoreIo(_))));
}

#[test]
fn corrupt_document_reads_as_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = BookStore::in_dir(dir.path());
    std::fs::write(store.path(), "not a book {").unwrap();
    assert!(matches!(store.read_book(), Err(BookError::StoreParse(_))));
}

#[test]
fn overwrite_leaves_no_temp_file_behind() {
    let dir = tempfile::tempdir().unwrap();
    let store = BookStore::in_dir(dir.path());

    store.save_book(&StoryBook::new()).unwrap();
    let replacement = sample_book();
    store.save_book(&replacement).unwrap();

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .filter(|name| name.to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
    assert_eq!(store.read_book().unwrap(), replacement);
}
