//! Table of contents window.
//!
//! The first page with no incoming branch is the root; its children are
//! listed as an indented tree with a cycle guard. Any further root is a
//! page the reader can never reach, listed separately with a delete
//! button.

use eframe::egui;

use storybook_engine::{PageId, StoryBook};

use crate::app::EditorApp;

const INDENT_STEP: f32 = 14.0;

pub(crate) fn window(ctx: &egui::Context, app: &mut EditorApp, open: &mut bool) {
    egui::Window::new("Table of Content")
        .open(open)
        .default_width(320.0)
        .show(ctx, |ui| content_ui(ui, app));
}

fn content_ui(ui: &mut egui::Ui, app: &mut EditorApp) {
    let book = app.navigator.book().clone();
    let roots = root_pages(&book);
    let mut doomed: Option<PageId> = None;

    match roots.first().and_then(|id| book.page(*id)) {
        Some(root) => {
            ui.label(egui::RichText::new(format!("Root: {}", root.name)).strong());
            let mut trail = vec![root.id];
            children_ui(ui, &book, root.id, 1, &mut trail, &mut doomed);
        }
        None => {
            ui.label("Every page has an incoming branch; no root to walk.");
        }
    }

    if roots.len() > 1 {
        ui.separator();
        ui.label(egui::RichText::new("Unreachable Pages").strong());
        for id in roots.iter().skip(1) {
            let Some(page) = book.page(*id) else {
                continue;
            };
            ui.horizontal(|ui| {
                ui.label(&page.name);
                if ui.small_button("Delete").clicked() {
                    doomed = Some(page.id);
                }
            });
        }
    }

    if let Some(id) = doomed {
        app.snapshot_undo();
        app.navigator.delete_page(id);
        app.sync_from_view();
    }
}

fn children_ui(
    ui: &mut egui::Ui,
    book: &StoryBook,
    page: PageId,
    depth: usize,
    trail: &mut Vec<PageId>,
    doomed: &mut Option<PageId>,
) {
    let Some(page) = book.page(page) else {
        return;
    };
    for listed in &page.branches {
        let Some(branch) = book.branch(*listed) else {
            continue;
        };
        let Some(child) = book.page(branch.next_page_id) else {
            continue;
        };

        ui.horizontal(|ui| {
            ui.add_space(depth as f32 * INDENT_STEP);
            ui.label(&child.name);
            if ui.small_button("Delete").clicked() {
                *doomed = Some(child.id);
            }
        });

        if trail.contains(&child.id) {
            ui.horizontal(|ui| {
                ui.add_space((depth + 1) as f32 * INDENT_STEP);
                ui.label("...");
            });
        } else {
            trail.push(child.id);
            children_ui(ui, book, child.id, depth + 1, trail, doomed);
            trail.pop();
        }
    }
}

/// Pages with no incoming branch, in book order. The first is the story's
/// root; the rest are unreachable.
pub(crate) fn root_pages(book: &StoryBook) -> Vec<PageId> {
    book.pages
        .iter()
        .filter(|page| !book.branches.iter().any(|branch| branch.next_page_id == page.id))
        .map(|page| page.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use storybook_engine::BranchDraft;

    #[test]
    fn root_is_the_page_nothing_points_at() {
        let mut book = StoryBook::new();
        let default = book.synthesize_default_page();
        let branch = book.add_branch_to_page(
            default,
            BranchDraft {
                target_page_name: "Chapter 2".to_string(),
                ..BranchDraft::default()
            },
        );

        let roots = root_pages(&book);
        assert_eq!(roots, vec![default]);
        assert!(!roots.contains(&branch.next_page_id));
    }

    #[test]
    fn orphan_pages_show_up_as_extra_roots() {
        let mut book = StoryBook::new();
        let default = book.synthesize_default_page();
        let orphan = storybook_engine::StoryPage::new("Lost Chapter");
        let orphan_id = orphan.id;
        book.pages.push(orphan);

        let roots = root_pages(&book);
        assert_eq!(roots, vec![default, orphan_id]);
    }
}
