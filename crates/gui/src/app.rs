//! Authoring application shell.
//!
//! The central panel previews the current page on the 16x12 hotspot grid
//! and forwards clicks to the navigator; the side panel hosts the
//! inspector; the table of contents opens as a floating window. The
//! immediate-mode UI redraws from `Navigator::view` every frame, so the
//! navigator runs with a null presenter here.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use eframe::egui;
use tracing::warn;

use storybook_engine::{
    Audio, BookEvent, BookStore, BranchDraft, GridExtent, GridPoint, Navigator, NullPresenter,
    PageEdit, SilentAudio, StoryBranch, TransitionKind, TransitionPhase, GRID_COLUMNS, GRID_ROWS,
};
use storybook_runtime::{DirAssetStore, RodioAudio};

use crate::inspector::none_if_empty;
use crate::persist::EditorPreferences;
use crate::table_of_content;
use crate::undo::UndoStack;

/// Runs the authoring tool against the default book location.
pub fn run_editor() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("Story Book Editor"),
        ..Default::default()
    };

    eframe::run_native(
        "Story Book Editor",
        options,
        Box::new(|_cc| Box::new(EditorApp::with_default_paths())),
    )
}

fn default_book_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "storybook")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

fn prefs_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "storybook")
        .map(|dirs| dirs.config_dir().join("editor.json"))
        .unwrap_or_else(|| PathBuf::from("editor.json"))
}

/// Editable buffers for the current page's fields.
#[derive(Clone, Debug, Default)]
pub(crate) struct PageBuffers {
    pub name: String,
    pub background: String,
    pub animation: String,
    pub background_music: String,
}

/// One inspector row per visible branch: the branch snapshot plus string
/// buffers for its optional and list-valued fields.
#[derive(Clone, Debug)]
pub(crate) struct BranchRow {
    pub branch: StoryBranch,
    pub image: String,
    pub sfx: String,
    pub current_image: String,
    pub next_image: String,
    pub pre: String,
    pub post: String,
    pub reverse: String,
}

impl BranchRow {
    pub fn from_branch(branch: &StoryBranch) -> Self {
        Self {
            image: branch.image.clone().unwrap_or_default(),
            sfx: branch.sfx.clone().unwrap_or_default(),
            current_image: branch.current_image.clone().unwrap_or_default(),
            next_image: branch.next_image.clone().unwrap_or_default(),
            pre: branch.pre_variables.join(", "),
            post: branch.post_variables.join(", "),
            reverse: branch.reverse_variables.join(", "),
            branch: branch.clone(),
        }
    }

    /// Folds the string buffers back into a branch snapshot for
    /// `book_updated`.
    pub fn to_snapshot(&self) -> StoryBranch {
        let mut snapshot = self.branch.clone();
        snapshot.image = none_if_empty(&self.image);
        snapshot.sfx = none_if_empty(&self.sfx);
        snapshot.current_image = none_if_empty(&self.current_image);
        snapshot.next_image = none_if_empty(&self.next_image);
        snapshot.pre_variables = crate::inspector::split_names(&self.pre);
        snapshot.post_variables = crate::inspector::split_names(&self.post);
        snapshot.reverse_variables = crate::inspector::split_names(&self.reverse);
        snapshot
    }
}

/// Input state of the "new branch" form.
#[derive(Clone, Debug)]
pub(crate) struct BranchForm {
    pub location: GridPoint,
    pub size: GridExtent,
    pub image: String,
    pub sfx: String,
    pub transition: TransitionKind,
    pub transition_length_ms: u32,
    pub current_image: String,
    pub next_image: String,
    pub target_name: String,
}

impl Default for BranchForm {
    fn default() -> Self {
        Self {
            location: GridPoint::default(),
            size: GridExtent::default(),
            image: String::new(),
            sfx: String::new(),
            transition: TransitionKind::None,
            transition_length_ms: storybook_engine::DEFAULT_TRANSITION_LENGTH_MS,
            current_image: String::new(),
            next_image: String::new(),
            target_name: String::new(),
        }
    }
}

impl BranchForm {
    pub fn to_draft(&self) -> BranchDraft {
        BranchDraft {
            location: self.location,
            size: self.size,
            image: none_if_empty(&self.image),
            sfx: none_if_empty(&self.sfx),
            transition: self.transition,
            transition_length_ms: self.transition_length_ms,
            current_image: none_if_empty(&self.current_image),
            next_image: none_if_empty(&self.next_image),
            target_page_name: self.target_name.trim().to_string(),
        }
    }
}

/// The authoring application.
pub struct EditorApp {
    pub(crate) navigator: Navigator,
    pub(crate) undo: UndoStack,
    pub(crate) page_buffers: PageBuffers,
    pub(crate) branch_rows: Vec<BranchRow>,
    pub(crate) form: BranchForm,
    pub(crate) show_toc: bool,
    prefs: EditorPreferences,
}

impl EditorApp {
    /// Builds the app over `book_dir`, with assets resolved from its
    /// `resources` subdirectory. Audio falls back to silent when no output
    /// device is available.
    pub fn new(book_dir: &Path) -> Self {
        let assets = DirAssetStore::new(book_dir.join("resources"));
        let audio: Box<dyn Audio> = match RodioAudio::new(Arc::new(assets.clone())) {
            Ok(audio) => Box::new(audio),
            Err(err) => {
                warn!("audio disabled: {err}");
                Box::new(SilentAudio)
            }
        };
        let mut navigator = Navigator::new(
            BookStore::in_dir(book_dir),
            Box::new(assets),
            Box::new(NullPresenter),
            audio,
        );
        navigator.on_activate();
        navigator.take_events();

        let mut app = Self {
            navigator,
            undo: UndoStack::new(),
            page_buffers: PageBuffers::default(),
            branch_rows: Vec::new(),
            form: BranchForm::default(),
            show_toc: false,
            prefs: EditorPreferences {
                book_dir: Some(book_dir.to_path_buf()),
                show_toc: false,
            },
        };
        app.sync_from_view();
        app
    }

    /// Restores the last session's preferences and opens the book they
    /// point at.
    pub fn with_default_paths() -> Self {
        let prefs = EditorPreferences::load_from(&prefs_path()).unwrap_or_else(|err| {
            warn!("preferences load failed: {err}");
            EditorPreferences::default()
        });
        let book_dir = prefs.book_dir.clone().unwrap_or_else(default_book_dir);

        let mut app = Self::new(&book_dir);
        app.show_toc = prefs.show_toc;
        app.prefs.show_toc = prefs.show_toc;
        if let Err(err) = app.prefs.save_to(&prefs_path()) {
            warn!("preferences save failed: {err}");
        }
        app
    }

    /// Re-seeds the editable buffers from the navigator's projection.
    pub(crate) fn sync_from_view(&mut self) {
        let view = self.navigator.view();
        self.page_buffers = PageBuffers {
            name: view.name.clone(),
            background: view.background.clone().unwrap_or_default(),
            animation: view.animation.clone().unwrap_or_default(),
            background_music: view.background_music.clone().unwrap_or_default(),
        };
        self.branch_rows = view.branches.iter().map(BranchRow::from_branch).collect();
    }

    pub(crate) fn snapshot_undo(&mut self) {
        self.undo.push(self.navigator.book().clone());
    }

    /// Commits the inspector buffers through the full resync path.
    pub(crate) fn commit_page_edit(&mut self) {
        self.snapshot_undo();
        let edit = PageEdit {
            name: self.page_buffers.name.clone(),
            background: none_if_empty(&self.page_buffers.background),
            animation: none_if_empty(&self.page_buffers.animation),
            background_music: none_if_empty(&self.page_buffers.background_music),
            branches: self.branch_rows.iter().map(BranchRow::to_snapshot).collect(),
        };
        self.navigator.book_updated(&edit);
        self.sync_from_view();
    }

    fn toolbar_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Story Book");
            ui.separator();

            if ui.add_enabled(self.undo.can_undo(), egui::Button::new("Undo")).clicked() {
                if let Some(previous) = self.undo.undo(self.navigator.book().clone()) {
                    self.navigator.replace_book(previous);
                    self.sync_from_view();
                }
            }
            if ui.add_enabled(self.undo.can_redo(), egui::Button::new("Redo")).clicked() {
                if let Some(next) = self.undo.redo(self.navigator.book().clone()) {
                    self.navigator.replace_book(next);
                    self.sync_from_view();
                }
            }
            ui.separator();

            if ui
                .add_enabled(self.navigator.can_back(), egui::Button::new("Back"))
                .clicked()
            {
                self.navigator.load_back();
            }
            ui.toggle_value(&mut self.show_toc, "Table of Content");

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let book = self.navigator.book();
                ui.label(format!(
                    "{} pages · {} branches",
                    book.pages.len(),
                    book.branches.len()
                ));
            });
        });
    }

    fn preview_ui(&mut self, ui: &mut egui::Ui) {
        let view = self.navigator.view().clone();
        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click());
        let rect = response.rect;

        painter.rect_filled(rect, 4.0, egui::Color32::from_gray(24));
        let cell_width = rect.width() / GRID_COLUMNS as f32;
        let cell_height = rect.height() / GRID_ROWS as f32;
        let grid_stroke = egui::Stroke::new(0.5, egui::Color32::from_gray(48));
        for column in 0..=GRID_COLUMNS {
            let x = rect.min.x + column as f32 * cell_width;
            painter.line_segment(
                [egui::pos2(x, rect.min.y), egui::pos2(x, rect.max.y)],
                grid_stroke,
            );
        }
        for row in 0..=GRID_ROWS {
            let y = rect.min.y + row as f32 * cell_height;
            painter.line_segment(
                [egui::pos2(rect.min.x, y), egui::pos2(rect.max.x, y)],
                grid_stroke,
            );
        }

        let caption = match &view.background {
            Some(background) => format!("{} (bg: {background})", view.name),
            None => view.name.clone(),
        };
        painter.text(
            rect.left_top() + egui::vec2(8.0, 8.0),
            egui::Align2::LEFT_TOP,
            caption,
            egui::FontId::proportional(13.0),
            egui::Color32::from_gray(160),
        );

        for branch in &view.branches {
            // Authoring coordinates have a bottom-left origin.
            let width = branch.size.width.max(1) as f32 * cell_width;
            let height = branch.size.height.max(1) as f32 * cell_height;
            let min_x = rect.min.x + branch.location.x as f32 * cell_width;
            let max_y = rect.max.y - branch.location.y as f32 * cell_height;
            let branch_rect = egui::Rect::from_min_max(
                egui::pos2(min_x, max_y - height),
                egui::pos2(min_x + width, max_y),
            );
            painter.rect_stroke(
                branch_rect,
                2.0,
                egui::Stroke::new(1.5, egui::Color32::LIGHT_BLUE),
            );
            painter.text(
                branch_rect.center(),
                egui::Align2::CENTER_CENTER,
                &branch.next_page_name,
                egui::FontId::proportional(12.0),
                egui::Color32::LIGHT_BLUE,
            );
        }

        let transition = self.navigator.transition();
        match transition.phase() {
            TransitionPhase::FadingOut | TransitionPhase::FadingIn => {
                let alpha = (transition.alpha() * 255.0) as u8;
                painter.rect_filled(rect, 0.0, egui::Color32::from_black_alpha(alpha));
            }
            TransitionPhase::Sliding => {
                let incoming_x = rect.min.x + rect.width() * transition.offset();
                let incoming = egui::Rect::from_min_max(
                    egui::pos2(incoming_x, rect.min.y),
                    egui::pos2(incoming_x + rect.width(), rect.max.y),
                );
                painter.rect_filled(incoming, 0.0, egui::Color32::from_gray(40));
                if let (_, Some(next)) = transition.slide_images() {
                    painter.text(
                        incoming.left_center() + egui::vec2(12.0, 0.0),
                        egui::Align2::LEFT_CENTER,
                        next,
                        egui::FontId::proportional(13.0),
                        egui::Color32::from_gray(160),
                    );
                }
            }
            TransitionPhase::Idle => {}
        }

        if response.clicked() {
            if let Some(pointer) = response.interact_pointer_pos() {
                let local = pointer - rect.min;
                // Flip into the bottom-left origin the hit test expects.
                self.navigator
                    .on_input_event(local.x, rect.height() - local.y, rect.width(), rect.height());
            }
        }
    }
}

impl eframe::App for EditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let dt = ctx.input(|input| input.stable_dt).min(0.1);
        self.navigator.on_tick(Duration::from_secs_f32(dt));
        if self.navigator.transition().is_running() {
            ctx.request_repaint();
        }
        for event in self.navigator.take_events() {
            match event {
                BookEvent::PageChanged { .. } => self.sync_from_view(),
            }
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar_ui(ui));
        egui::SidePanel::right("inspector")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| self.inspector_ui(ui));

        if self.show_toc {
            let mut open = true;
            table_of_content::window(ctx, self, &mut open);
            self.show_toc = open;
        }

        egui::CentralPanel::default().show(ctx, |ui| self.preview_ui(ui));

        if self.prefs.show_toc != self.show_toc {
            self.prefs.show_toc = self.show_toc;
            if let Err(err) = self.prefs.save_to(&prefs_path()) {
                warn!("preferences save failed: {err}");
            }
        }
    }
}
