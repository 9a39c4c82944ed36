//! Store error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Navigation to {url} refused: {depth} nested location changes")]
    RedirectLoop { url: String, depth: usize },

    #[error("History error: {0}")]
    History(#[from] waymark_history::HistoryError),
}
