use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cache schema violation: {0}")]
    Schema(String),

    #[error("Snapshot path has no file name: {path}")]
    InvalidPath { path: String },
}

impl LedgerError {
    /// Errors a run can absorb by falling back to a fresh-start snapshot.
    pub fn is_recoverable(&self) -> bool {
        match self {
            LedgerError::Json(_) => true,
            LedgerError::Schema(_) => true,
            LedgerError::Io(_) => true,
            LedgerError::InvalidPath { .. } => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
