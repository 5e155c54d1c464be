//! Inspector panel: current page fields, the visible branch list, and the
//! new-branch form.

use eframe::egui;

use storybook_engine::{BranchId, PageId, TransitionKind, GRID_COLUMNS, GRID_ROWS};

use crate::app::EditorApp;

/// Deferred row actions, applied after the list borrow ends.
enum RowAction {
    GoTo(PageId),
    Delete(BranchId),
}

impl EditorApp {
    pub(crate) fn inspector_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("Inspector");
        ui.separator();

        egui::ScrollArea::vertical().show(ui, |ui| {
            self.page_section(ui);
            ui.separator();
            self.branch_section(ui);
            ui.separator();
            self.new_branch_section(ui);
        });
    }

    fn page_section(&mut self, ui: &mut egui::Ui) {
        ui.label("Page Name:");
        ui.text_edit_singleline(&mut self.page_buffers.name);
        ui.label("Background:");
        ui.text_edit_singleline(&mut self.page_buffers.background);
        ui.label("Animation:");
        ui.text_edit_singleline(&mut self.page_buffers.animation);
        ui.label("Background Music:");
        ui.text_edit_singleline(&mut self.page_buffers.background_music);

        ui.horizontal(|ui| {
            if ui.button("Apply").clicked() {
                self.commit_page_edit();
            }
            if ui.button("Revert").clicked() {
                self.sync_from_view();
            }
        });
    }

    fn branch_section(&mut self, ui: &mut egui::Ui) {
        if self.branch_rows.is_empty() {
            ui.label("No branches on this page.");
            return;
        }

        let mut action = None;
        let mut edited = false;
        for row in &mut self.branch_rows {
            let title = format!("Branch: {}", row.branch.next_page_name);
            egui::CollapsingHeader::new(title)
                .id_source(row.branch.id)
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label("Location");
                        edited |= ui
                            .add(
                                egui::DragValue::new(&mut row.branch.location.x)
                                    .clamp_range(0..=GRID_COLUMNS - 1),
                            )
                            .changed();
                        edited |= ui
                            .add(
                                egui::DragValue::new(&mut row.branch.location.y)
                                    .clamp_range(0..=GRID_ROWS - 1),
                            )
                            .changed();
                        ui.label("Size");
                        edited |= ui
                            .add(
                                egui::DragValue::new(&mut row.branch.size.width)
                                    .clamp_range(0..=GRID_COLUMNS),
                            )
                            .changed();
                        edited |= ui
                            .add(
                                egui::DragValue::new(&mut row.branch.size.height)
                                    .clamp_range(0..=GRID_ROWS),
                            )
                            .changed();
                    });

                    ui.label("Image:");
                    edited |= ui.text_edit_singleline(&mut row.image).changed();
                    ui.label("Sound Effect:");
                    edited |= ui.text_edit_singleline(&mut row.sfx).changed();

                    ui.horizontal(|ui| {
                        ui.label("Transition");
                        egui::ComboBox::from_id_source((row.branch.id, "transition"))
                            .selected_text(transition_label(row.branch.transition))
                            .show_ui(ui, |ui| {
                                for kind in [
                                    TransitionKind::None,
                                    TransitionKind::Fade,
                                    TransitionKind::Slide,
                                ] {
                                    edited |= ui
                                        .selectable_value(
                                            &mut row.branch.transition,
                                            kind,
                                            transition_label(kind),
                                        )
                                        .changed();
                                }
                            });
                        ui.label("ms");
                        edited |= ui
                            .add(
                                egui::DragValue::new(&mut row.branch.transition_length_ms)
                                    .clamp_range(0..=60_000),
                            )
                            .changed();
                    });

                    if row.branch.transition == TransitionKind::Slide {
                        ui.label("Current Image:");
                        edited |= ui.text_edit_singleline(&mut row.current_image).changed();
                        ui.label("Next Image:");
                        edited |= ui.text_edit_singleline(&mut row.next_image).changed();
                    }

                    ui.label("Required Variables:");
                    edited |= ui.text_edit_singleline(&mut row.pre).changed();
                    ui.label("Set Variables:");
                    edited |= ui.text_edit_singleline(&mut row.post).changed();
                    ui.label("Clear Variables:");
                    edited |= ui.text_edit_singleline(&mut row.reverse).changed();

                    ui.horizontal(|ui| {
                        if ui.small_button("Go To").clicked() {
                            action = Some(RowAction::GoTo(row.branch.next_page_id));
                        }
                        if ui.small_button("Delete").clicked() {
                            action = Some(RowAction::Delete(row.branch.id));
                        }
                    });
                });
        }

        if edited {
            ui.label(egui::RichText::new("Unapplied branch edits").weak());
        }
        if ui.button("Apply Branch Edits").clicked() {
            self.commit_page_edit();
        }

        match action {
            Some(RowAction::GoTo(page)) => {
                self.navigator.load_page(page, None);
            }
            Some(RowAction::Delete(branch)) => {
                self.snapshot_undo();
                self.navigator.delete_branch(branch);
                self.sync_from_view();
            }
            None => {}
        }
    }

    fn new_branch_section(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("New Branch").strong());

        ui.label("Next Page Name:");
        ui.text_edit_singleline(&mut self.form.target_name);
        ui.horizontal(|ui| {
            ui.label("Location");
            ui.add(egui::DragValue::new(&mut self.form.location.x).clamp_range(0..=GRID_COLUMNS - 1));
            ui.add(egui::DragValue::new(&mut self.form.location.y).clamp_range(0..=GRID_ROWS - 1));
            ui.label("Size");
            ui.add(egui::DragValue::new(&mut self.form.size.width).clamp_range(0..=GRID_COLUMNS));
            ui.add(egui::DragValue::new(&mut self.form.size.height).clamp_range(0..=GRID_ROWS));
        });
        ui.label("Image:");
        ui.text_edit_singleline(&mut self.form.image);
        ui.label("Sound Effect:");
        ui.text_edit_singleline(&mut self.form.sfx);

        ui.horizontal(|ui| {
            ui.label("Transition");
            egui::ComboBox::from_id_source("new_branch_transition")
                .selected_text(transition_label(self.form.transition))
                .show_ui(ui, |ui| {
                    for kind in [
                        TransitionKind::None,
                        TransitionKind::Fade,
                        TransitionKind::Slide,
                    ] {
                        ui.selectable_value(&mut self.form.transition, kind, transition_label(kind));
                    }
                });
            ui.label("ms");
            ui.add(egui::DragValue::new(&mut self.form.transition_length_ms).clamp_range(0..=60_000));
        });
        if self.form.transition == TransitionKind::Slide {
            ui.label("Current Image:");
            ui.text_edit_singleline(&mut self.form.current_image);
            ui.label("Next Image:");
            ui.text_edit_singleline(&mut self.form.next_image);
        }

        if ui.button("Create").clicked() {
            self.snapshot_undo();
            self.navigator.add_branch_to_page(self.form.to_draft());
            self.form = Default::default();
            self.sync_from_view();
        }
    }
}

fn transition_label(kind: TransitionKind) -> &'static str {
    match kind {
        TransitionKind::None => "None",
        TransitionKind::Fade => "Fade",
        TransitionKind::Slide => "Slide",
    }
}

/// Empty or whitespace-only input clears an optional asset field.
pub(crate) fn none_if_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parses a comma-separated variable list, dropping empty entries.
pub(crate) fn split_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
