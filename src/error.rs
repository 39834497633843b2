//! Error categories surfaced to the UI layer.
//!
//! Only two kinds exist: a remote call failed, or the user's input was
//! rejected before anything was sent. Neither is fatal; both end up as an
//! inline message next to the control that triggered them.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Network or remote failure (non-2xx, unreadable body, `success: false`)
    #[error("remote request failed: {0}")]
    Remote(String),

    /// Input rejected locally before submission
    #[error("validation failed: {0}")]
    Validation(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Message suitable for showing inline in the UI.
    ///
    /// Remote failures never leak backend details to the user; validation
    /// failures are shown verbatim since they describe the user's own input.
    pub fn user_message(&self) -> &str {
        match self {
            AppError::Remote(_) => "Something went wrong. Please try again later.",
            AppError::Validation(msg) => msg,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Remote(err.to_string())
    }
}
