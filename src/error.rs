//! Error types.
//!
//! - `FetchError`: a single series could not be loaded (non-fatal; the series is
//!   dropped from the reload)
//! - `CatalogError`: the descriptor configuration is invalid
//! - `AppError`: what the binary reports, with a process exit code

use thiserror::Error;

use crate::domain::Category;

/// Why one series is unavailable for this reload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("series identifier must not be empty")]
    InvalidIdentifier,
    #[error("request for {series_id} failed: {reason}")]
    Request { series_id: String, reason: String },
    #[error("request for {series_id} returned status {status}")]
    Status { series_id: String, status: u16 },
    #[error("failed to decode response for {series_id}: {reason}")]
    Decode { series_id: String, reason: String },
    #[error("invalid observation date '{date}' in {series_id}")]
    InvalidDate { series_id: String, date: String },
    #[error("no valid observations for {series_id}")]
    Empty { series_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("empty series identifier in category {category}")]
    EmptyIdentifier { category: Category },
    #[error("series {id} has an empty name")]
    EmptyName { id: String },
    #[error("series {id} is listed twice in category {category}")]
    Duplicate { category: Category, id: String },
    #[error("unknown category '{0}'")]
    UnknownCategory(String),
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        AppError::new(2, format!("Invalid catalog: {err}"))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
