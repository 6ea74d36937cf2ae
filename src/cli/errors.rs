use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unknown MS²PIP model: {model}. Available: {available}")]
    UnknownModel { model: String, available: String },

    #[error("MS2 error tolerance must be a positive number, got: {value}")]
    InvalidFragError { value: f64 },

    #[error(transparent)]
    Library(#[from] ms2rescore_gui::Error),
}
