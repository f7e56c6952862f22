use thiserror::Error;

#[derive(Error, Debug)]
pub enum TangochoError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(Box<csv::Error>),

    #[error("Failed to load file: {0}")]
    FailedToLoadFile(String),

    #[error("Failed to load unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Invalid word: {0}")]
    InvalidWord(String),

    #[error("TangochoError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for TangochoError {
    fn from(error: std::io::Error) -> Self {
        TangochoError::Io(Box::new(error))
    }
}

impl From<csv::Error> for TangochoError {
    fn from(error: csv::Error) -> Self {
        TangochoError::Csv(Box::new(error))
    }
}
