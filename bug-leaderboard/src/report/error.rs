//! Report error types.

use crate::store::StoreError;
use thiserror::Error;

/// Document template error.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Handlebars rendering error.
    #[error("Template rendering error: {0}")]
    RenderError(#[from] handlebars::RenderError),

    /// Template registration error.
    #[error("Template registration error: {0}")]
    RegistrationError(#[from] handlebars::TemplateError),
}

/// Errors that can occur while building the report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Reading the stored issues failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Merging the partition tables into the document failed.
    #[error(transparent)]
    Template(#[from] TemplateError),
}
