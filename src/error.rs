use thiserror::Error;

#[derive(Error, Debug)]
pub enum BankClassifyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("No category with index {index} (valid: 0..{count})")]
    UnknownCategoryIndex { index: i64, count: usize },

    #[error("Invalid category name: {0:?}")]
    InvalidCategoryName(String),

    #[error("No guess to accept; enter a category number or a new name")]
    NothingToAccept,

    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    #[error("No importer recognizes file: {0}")]
    NoImporter(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

impl BankClassifyError {
    /// Errors the labeling loop answers with a re-prompt instead of aborting.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UnknownCategoryIndex { .. } | Self::InvalidCategoryName(_) | Self::NothingToAccept
        )
    }
}

pub type Result<T> = std::result::Result<T, BankClassifyError>;
