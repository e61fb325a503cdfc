//! Error types for configuration loading and spreadsheet import.
//!
//! Schedule generation itself never fails: degenerate input yields an
//! empty schedule. Only the file-shaped boundaries report errors.

use thiserror::Error;

/// Errors raised while loading a [`TermConfig`](crate::models::TermConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the configuration file failed.
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration is not valid JSON for the term model.
    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while importing a workbook.
///
/// Import is all-or-nothing: the first problem aborts the whole operation
/// and the caller decides whether to keep its previous configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ImportError {
    /// The workbook contains no recognised sheet.
    #[error("Workbook contains no recognised sheets")]
    EmptyWorkbook,

    /// A sheet lacks a column that is required to read its rows.
    #[error("Sheet '{sheet}' is missing required column '{field}'")]
    MissingColumn { sheet: String, field: String },

    /// A cell could not be interpreted.
    #[error("Sheet '{sheet}', row {row}: {message}")]
    InvalidValue {
        sheet: String,
        row: usize,
        message: String,
    },

    /// A structured matrix workbook does not have the expected layout.
    #[error("Malformed matrix sheet: {message}")]
    MalformedMatrix { message: String },
}

impl ImportError {
    pub(crate) fn invalid(sheet: &str, row: usize, message: impl Into<String>) -> Self {
        ImportError::InvalidValue {
            sheet: sheet.to_string(),
            row,
            message: message.into(),
        }
    }

    pub(crate) fn missing(sheet: &str, field: &str) -> Self {
        ImportError::MissingColumn {
            sheet: sheet.to_string(),
            field: field.to_string(),
        }
    }
}
