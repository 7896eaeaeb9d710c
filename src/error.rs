//! Errors raised while resolving a resource name

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::template::Span;

/// Longest accepted resource name
pub const MAX_NAME_LENGTH: usize = 90;
/// Shortest accepted resource name
pub const MIN_NAME_LENGTH: usize = 3;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NamingError {
    /// Neither the call nor the defaults name a resource type
    #[error("resource type required: set resource_type.fullname or a default resource type")]
    MissingResourceType,

    #[error("no naming pattern found for resource type: {resource_type}")]
    MissingPattern { resource_type: String },

    #[error("resource name contains unresolved components {}: {result}", placeholders.join(", "))]
    Unresolved {
        /// Unresolved placeholders as written, in template order
        placeholders: Vec<String>,
        /// Their positions in the template, when known
        spans: Vec<Span>,
        result: String,
    },

    #[error("resource name cannot be empty")]
    Empty,

    #[error("resource name exceeds 90 characters ({length}): {name}")]
    TooLong { name: String, length: usize },

    #[error("resource name must be at least 3 characters long ({length}): {name}")]
    TooShort { name: String, length: usize },
}

impl NamingError {
    /// Short title of the failure
    pub fn summary(&self) -> &'static str {
        match self {
            NamingError::MissingResourceType => "Missing Required Parameter",
            NamingError::MissingPattern { .. } => "Missing Pattern",
            NamingError::Unresolved { .. } => "Unresolved Components",
            NamingError::Empty => "Empty Name",
            NamingError::TooLong { .. } => "Name Too Long",
            NamingError::TooShort { .. } => "Name Too Short",
        }
    }

    /// Format the error against the template it came from using ariadne
    ///
    /// Unresolved placeholders are labelled inside the template; every other
    /// variant renders as a plain report.
    pub fn format(&self, template: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        let mut report = Report::build(ReportKind::Error, filename, 0)
            .with_config(Config::default().with_color(false))
            .with_message(format!("{}: {}", self.summary(), self));

        if let NamingError::Unresolved {
            placeholders,
            spans,
            ..
        } = self
        {
            for (placeholder, span) in placeholders.iter().zip(spans) {
                report = report.with_label(
                    Label::new((filename, span.clone()))
                        .with_message(format!("cannot resolve {}", placeholder))
                        .with_color(Color::Red),
                );
            }
        }

        match report
            .finish()
            .write((filename, Source::from(template)), &mut buf)
        {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}
