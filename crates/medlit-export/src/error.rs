use medlit_common::MedlitError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XLSX archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;

impl From<ExportError> for MedlitError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::UnsupportedFormat(format) => MedlitError::UnsupportedFormat(format),
            ExportError::Json(e) => MedlitError::Serialization(e),
            other => MedlitError::Other(anyhow::Error::new(other)),
        }
    }
}

