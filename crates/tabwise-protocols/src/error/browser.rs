//! Browser port errors.

use thiserror::Error;

use crate::types::TabId;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Tab not found: {0}")]
    TabNotFound(TabId),

    #[error("Bookmark not found: {0}")]
    BookmarkNotFound(String),

    #[error("Browser API unavailable: {0}")]
    Unavailable(String),

    #[error("Browser operation failed: {0}")]
    OperationFailed(String),
}
