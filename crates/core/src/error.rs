use miette::Diagnostic;
use thiserror::Error;

pub type BookResult<T> = Result<T, BookError>;

/// Errors surfaced by the story book core.
///
/// Referential-integrity misses inside graph mutations are logged and the
/// offending step skipped rather than raised, so the only fallible surface
/// is the persistence path.
#[derive(Debug, Error, Diagnostic)]
pub enum BookError {
    #[error("book store io error: {0}")]
    #[diagnostic(code("storybook.store_io"))]
    StoreIo(#[from] std::io::Error),
    #[error("book document malformed: {0}")]
    #[diagnostic(code("storybook.store_parse"))]
    StoreParse(#[from] serde_json::Error),
}
