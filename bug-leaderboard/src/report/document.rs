//! Report document rendering using Handlebars.

use super::error::TemplateError;
use chrono::{DateTime, Utc};
use handlebars::{no_escape, Handlebars};
use serde::Serialize;

/// Built-in document template.
pub const DEFAULT_DOCUMENT_TEMPLATE: &str = include_str!("template.md");

/// One rendered partition section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionSection {
    pub name: String,
    pub table: String,
}

/// Data available to the document template.
#[derive(Debug, Clone, Serialize)]
pub struct ReportDocument {
    /// Project display name.
    pub project: String,
    pub partitions: Vec<PartitionSection>,
    /// Generation time, see [`format_timestamp`].
    pub updated_at: String,
}

/// Formats the generation timestamp as `YYYY-MM-DDTHH:MM:SS-00:00`.
#[must_use]
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%S-00:00").to_string()
}

/// Creates a configured Handlebars registry.
///
/// The registry is configured with:
/// - No HTML escaping (for markdown output)
/// - Strict mode (catches missing variables)
#[must_use]
pub fn create_handlebars_registry() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();

    // Tables carry raw markup
    hbs.register_escape_fn(no_escape);
    hbs.set_strict_mode(true);

    hbs
}

/// Name the document template is registered under.
const DOCUMENT: &str = "document";

/// Merges partition tables into the final document.
pub struct DocumentRenderer {
    handlebars: Handlebars<'static>,
}

impl DocumentRenderer {
    /// Compiles the document template.
    ///
    /// # Errors
    ///
    /// Returns an error if the template is malformed.
    pub fn new(template: &str) -> Result<Self, TemplateError> {
        let mut handlebars = create_handlebars_registry();
        handlebars.register_template_string(DOCUMENT, template)?;
        Ok(Self { handlebars })
    }

    /// Renders the document.
    ///
    /// # Errors
    ///
    /// Returns an error if the template references a variable the document
    /// doesn't provide.
    pub fn render(&self, document: &ReportDocument) -> Result<String, TemplateError> {
        Ok(self.handlebars.render(DOCUMENT, document)?)
    }
}
