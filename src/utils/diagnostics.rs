use crate::utils::error::{ErrorCategory, TransitError};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Warning,
    Error,
}

/// One structured diagnostic record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub category: ErrorCategory,
    pub subject: Option<String>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            Level::Warning => "warning",
            Level::Error => "error",
        };
        write!(f, "{}: {}", level, self.message)
    }
}

/// Collector handed to the builders and the engine instead of writing to
/// stderr directly. The process boundary decides how to print it.
#[derive(Debug, Default)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, category: ErrorCategory, subject: impl Into<String>, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}", message);
        self.records.push(Diagnostic {
            level: Level::Warning,
            category,
            subject: Some(subject.into()),
            message,
        });
    }

    pub fn error(&mut self, error: &TransitError) {
        self.records.push(Diagnostic {
            level: Level::Error,
            category: error.category(),
            subject: error.subject().map(str::to_string),
            message: error.to_string(),
        });
    }

    pub fn records(&self) -> &[Diagnostic] {
        &self.records
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter().filter(|d| d.level == Level::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter().filter(|d| d.level == Level::Error)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_record_keeps_subject() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.error(&TransitError::NonNumericConstant {
            name: "A".into(),
            value: "abc".into(),
        });

        assert!(diagnostics.has_errors());
        let record = &diagnostics.records()[0];
        assert_eq!(record.category, ErrorCategory::Expression);
        assert_eq!(record.subject.as_deref(), Some("A"));
        assert_eq!(record.to_string(), "error: Constant 'A' is not a number (value 'abc')");
    }

    #[test]
    fn test_warnings_do_not_count_as_errors() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.warn(ErrorCategory::Document, "X", "constant 'X' redeclared");

        assert!(!diagnostics.has_errors());
        assert_eq!(diagnostics.warnings().count(), 1);
        assert!(!diagnostics.is_empty());
    }
}
