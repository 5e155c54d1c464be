use super::*;

fn draft(target: &str) -> BranchDraft {
    BranchDraft {
        target_page_name: target.to_string(),
        ..BranchDraft::default()
    }
}

fn book_with_default() -> (StoryBook, PageId) {
    let mut book = StoryBook::new();
    let id = book.synthesize_default_page();
    (book, id)
}

#[test]
fn fresh_book_is_empty() {
    let book = StoryBook::new();
    assert!(book.pages.is_empty());
    assert!(book.branches.is_empty());
    assert!(book.variables.is_empty());
}

#[test]
fn synthesized_default_page() {
    let (book, id) = book_with_default();
    let page = book.page(id).unwrap();
    assert_eq!(page.name, "Default");
    assert_eq!(page.background.as_deref(), Some(DEFAULT_PAGE_BACKGROUND));
    assert!(page.branches.is_empty());
}

#[test]
fn add_branch_synthesizes_target_name_from_page_count() {
    let (mut book, source) = book_with_default();
    let branch = book.add_branch_to_page(source, draft(""));

    assert_eq!(branch.next_page_name, "Next Page 1");
    assert_eq!(book.pages.len(), 2);
    let target = book.page(branch.next_page_id).unwrap();
    assert_eq!(target.name, "Next Page 1");
}

#[test]
fn add_branch_links_source_and_collection() {
    let (mut book, source) = book_with_default();
    let branch = book.add_branch_to_page(source, draft("Chapter 2"));

    assert!(book.page(source).unwrap().branches.contains(&branch.id));
    assert!(book.branch(branch.id).is_some());
    assert_eq!(book.page(branch.next_page_id).unwrap().name, "Chapter 2");
}

#[test]
fn add_branch_reuses_existing_page_case_insensitively() {
    let (mut book, source) = book_with_default();
    let first = book.add_branch_to_page(source, draft("Chapter 2"));
    let pages_before = book.pages.len();

    let second = book.add_branch_to_page(source, draft("chapter 2"));
    assert_eq!(book.pages.len(), pages_before);
    assert_eq!(second.next_page_id, first.next_page_id);
}

#[test]
fn add_branch_with_missing_source_leaves_branch_unattached() {
    let (mut book, _source) = book_with_default();
    let branch = book.add_branch_to_page(PageId::new(), draft("Orphan Target"));

    assert!(book.branch(branch.id).is_some());
    assert!(book.pages.iter().all(|page| !page.branches.contains(&branch.id)));
}

#[test]
fn page_id_by_name_is_exact_and_case_sensitive() {
    let (mut book, _source) = book_with_default();
    let page = StoryPage::new("Chapter 2");
    let id = page.id;
    book.pages.push(page);

    assert_eq!(book.page_id_by_name("Chapter 2"), Some(id));
    assert_eq!(book.page_id_by_name("chapter 2"), None);
    assert_eq!(book.page_id_by_name("NAME_NOT_PRESENT"), None);
}

#[test]
fn update_page_unknown_page_fails() {
    let (mut book, _source) = book_with_default();
    assert!(!book.update_page(PageId::new(), "Renamed", None, None, None, &[]));
}

#[test]
fn update_page_overwrites_name_and_changed_fields() {
    let (mut book, id) = book_with_default();
    assert!(book.update_page(id, "Opening", Some("forest"), None, Some("theme"), &[]));

    let page = book.page(id).unwrap();
    assert_eq!(page.name, "Opening");
    assert_eq!(page.background.as_deref(), Some("forest"));
    assert_eq!(page.background_music.as_deref(), Some("theme"));

    // Empty input clears a set field.
    assert!(book.update_page(id, "Opening", Some(""), None, Some("theme"), &[]));
    assert_eq!(book.page(id).unwrap().background, None);
}

#[test]
fn update_page_applies_known_snapshots_and_skips_unknown() {
    let (mut book, source) = book_with_default();
    let branch = book.add_branch_to_page(source, draft("Chapter 2"));

    let mut snapshot = branch.clone();
    snapshot.location = GridPoint::new(4, 7);
    snapshot.pre_variables = vec!["hasKey".to_string()];

    let mut unknown = branch.clone();
    unknown.id = BranchId::new();

    assert!(book.update_page(source, "Default", None, None, None, &[unknown, snapshot]));
    let stored = book.branch(branch.id).unwrap();
    assert_eq!(stored.location, GridPoint::new(4, 7));
    assert_eq!(stored.pre_variables, vec!["hasKey".to_string()]);
}

#[test]
fn delete_branch_scrubs_page_lists() {
    let (mut book, source) = book_with_default();
    let branch = book.add_branch_to_page(source, draft("Chapter 2"));

    assert!(book.delete_branch(branch.id));
    assert!(book.branch(branch.id).is_none());
    assert!(book.pages.iter().all(|page| !page.branches.contains(&branch.id)));
    assert!(!book.delete_branch(branch.id));
}

#[test]
fn delete_page_cascades_over_sources_and_targets() {
    let (mut book, default) = book_with_default();
    let into = book.add_branch_to_page(default, draft("Chapter 2"));
    let chapter_two = into.next_page_id;
    let out_of = book.add_branch_to_page(chapter_two, draft("Chapter 3"));
    let chapter_three = out_of.next_page_id;
    let back_in = book.add_branch_to_page(chapter_three, draft("Chapter 2"));

    assert!(book.delete_page(chapter_two));

    assert!(book.page(chapter_two).is_none());
    // Branch into the page, branch listed by the page, branch back into it:
    // all gone, and no page still lists them.
    for id in [into.id, out_of.id, back_in.id] {
        assert!(book.branch(id).is_none());
        assert!(book.pages.iter().all(|page| !page.branches.contains(&id)));
    }
    assert!(book.page(chapter_three).is_some());
}

#[test]
fn delete_page_unknown_is_a_noop() {
    let (mut book, _default) = book_with_default();
    assert!(!book.delete_page(PageId::new()));
    assert_eq!(book.pages.len(), 1);
}

#[test]
fn show_branch_requires_every_precondition() {
    let (mut book, source) = book_with_default();
    let mut branch = book.add_branch_to_page(source, draft("Chapter 2"));
    assert!(book.show_branch(&branch));

    branch.pre_variables = vec!["sawIntro".to_string(), "hasKey".to_string()];
    assert!(!book.show_branch(&branch));

    book.variables.set_true("sawIntro");
    assert!(!book.show_branch(&branch));

    book.variables.set_true("hasKey");
    assert!(book.show_branch(&branch));

    book.variables.set_false("hasKey");
    assert!(!book.show_branch(&branch));
}

#[test]
fn set_then_clear_leaves_shared_variable_false() {
    let (mut book, source) = book_with_default();
    let mut branch = book.add_branch_to_page(source, draft("Chapter 2"));
    branch.post_variables = vec!["torchLit".to_string(), "doorOpen".to_string()];
    branch.reverse_variables = vec!["torchLit".to_string()];

    book.set_variables(&branch);
    book.clear_variables(&branch);

    assert!(!book.variables.is_true("torchLit"));
    assert!(book.variables.is_true("doorOpen"));
}
