mod app;
mod inspector;
mod persist;
mod table_of_content;
mod undo;

pub use app::{run_editor, EditorApp};
pub use persist::{EditorPreferences, PersistError};
pub use undo::UndoStack;
