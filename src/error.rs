//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Configuration mistakes made in the form are reported through
//! [`Error::Configuration`], which always names the offending field so the user
//! can correct it and resubmit. I/O, JSON and external-process failures are
//! converted into their own variants.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration in field `{field}`: {reason}")]
    Configuration { field: &'static str, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing required argument: {arg}")]
    MissingArgument { arg: String },

    #[error("External error: {0}")]
    External(String),
}

impl Error {
    pub fn configuration<R: Into<String>>(field: &'static str, reason: R) -> Self {
        Error::Configuration {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the form field at fault, for configuration errors.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Error::Configuration { field, .. } => Some(field),
            _ => None,
        }
    }
}
