//! Validation diagnostics
//!
//! A [`ValidationResult`] is an ordered collection of severity-tagged
//! [`ValidationMessage`]s plus a free-form context map. Every workflow phase
//! produces one; the orchestrator merges them into a single run-level result.
//!
//! The persisted/transmitted JSON shape is
//! `{"errors": [...], "warnings": [...], "infos": [...], "context": {...}}`
//! with each message rendered as `{"severity", "field", "text", "context"}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Context key listing the phases that contributed at least one error
pub const PHASES_WITH_ERRORS_KEY: &str = "phases_with_errors";

/// Severity of a single diagnostic message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            other => Err(format!("Invalid severity: '{other}'")),
        }
    }
}

/// Continue/abort classification of an error message
///
/// Collaborators may tag their errors explicitly; untagged errors are
/// classified by keyword matching in the error propagator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Data corruption, constraint violation, resource or connectivity failure
    Critical,
    /// Malformed or missing field, unsupported value, type mismatch
    Major,
    /// Recorded for visibility only
    Minor,
}

impl ErrorSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorSeverity::Critical => "critical",
            ErrorSeverity::Major => "major",
            ErrorSeverity::Minor => "minor",
        }
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a phase does when it meets an error of a given severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    Continue,
    Abort,
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disposition::Continue => f.write_str("continue"),
            Disposition::Abort => f.write_str("abort"),
        }
    }
}

/// Machine-readable message codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageCode {
    InvalidFileFormat,
    MissingRequiredField,
    DuplicateEntry,
    ParseError,
    DatabaseError,
    ExternalServiceError,
    UnknownError,
}

impl MessageCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageCode::InvalidFileFormat => "INVALID_FILE_FORMAT",
            MessageCode::MissingRequiredField => "MISSING_REQUIRED_FIELD",
            MessageCode::DuplicateEntry => "DUPLICATE_ENTRY",
            MessageCode::ParseError => "PARSE_ERROR",
            MessageCode::DatabaseError => "DATABASE_ERROR",
            MessageCode::ExternalServiceError => "EXTERNAL_SERVICE_ERROR",
            MessageCode::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

impl fmt::Display for MessageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INVALID_FILE_FORMAT" => Ok(MessageCode::InvalidFileFormat),
            "MISSING_REQUIRED_FIELD" => Ok(MessageCode::MissingRequiredField),
            "DUPLICATE_ENTRY" => Ok(MessageCode::DuplicateEntry),
            "PARSE_ERROR" => Ok(MessageCode::ParseError),
            "DATABASE_ERROR" => Ok(MessageCode::DatabaseError),
            "EXTERNAL_SERVICE_ERROR" => Ok(MessageCode::ExternalServiceError),
            "UNKNOWN_ERROR" => Ok(MessageCode::UnknownError),
            other => Err(format!("Invalid message code: '{other}'")),
        }
    }
}

/// A single diagnostic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationMessage {
    pub severity: Severity,
    pub field: String,
    pub text: String,
    #[serde(default)]
    pub context: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<MessageCode>,
    /// Explicit classification; takes precedence over keyword matching
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorSeverity>,
}

impl ValidationMessage {
    pub fn new(severity: Severity, field: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            severity,
            field: field.into(),
            text: text.into(),
            context: BTreeMap::new(),
            code: None,
            kind: None,
        }
    }

    pub fn with_code(mut self, code: MessageCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_kind(mut self, kind: ErrorSeverity) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

/// Ordered diagnostics grouped by severity, plus a context map
///
/// # Examples
///
/// ```
/// use shiftsync::domain::validation::ValidationResult;
///
/// let mut first = ValidationResult::new();
/// first.add_error("shift_date", "invalid date");
///
/// let mut second = ValidationResult::new();
/// second.add_warning("row_12", "unknown shift type");
///
/// let merged = ValidationResult::merge([Some(&first), None, Some(&second)]);
/// assert_eq!(merged.error_count(), 1);
/// assert_eq!(merged.warning_count(), 1);
/// assert!(!merged.is_valid());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    #[serde(default)]
    pub errors: Vec<ValidationMessage>,
    #[serde(default)]
    pub warnings: Vec<ValidationMessage>,
    #[serde(default)]
    pub infos: Vec<ValidationMessage>,
    #[serde(default)]
    pub context: BTreeMap<String, Value>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, field: impl Into<String>, text: impl Into<String>) {
        self.errors
            .push(ValidationMessage::new(Severity::Error, field, text));
    }

    pub fn add_warning(&mut self, field: impl Into<String>, text: impl Into<String>) {
        self.warnings
            .push(ValidationMessage::new(Severity::Warning, field, text));
    }

    pub fn add_info(&mut self, field: impl Into<String>, text: impl Into<String>) {
        self.infos
            .push(ValidationMessage::new(Severity::Info, field, text));
    }

    /// Appends a prebuilt message to the sequence matching its severity
    pub fn push(&mut self, message: ValidationMessage) {
        match message.severity {
            Severity::Error => self.errors.push(message),
            Severity::Warning => self.warnings.push(message),
            Severity::Info => self.infos.push(message),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    pub fn info_count(&self) -> usize {
        self.infos.len()
    }

    /// Total number of messages across all severities
    pub fn count(&self) -> usize {
        self.error_count() + self.warning_count() + self.info_count()
    }

    /// True when there are no errors; warnings and infos do not count
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn set_context(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.context.insert(key.into(), value.into());
    }

    pub fn get_context(&self, key: &str) -> Option<&Value> {
        self.context.get(key)
    }

    /// Iterates every message in error, warning, info order
    pub fn messages(&self) -> impl Iterator<Item = &ValidationMessage> {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .chain(self.infos.iter())
    }

    /// Appends another result's messages and overlays its context
    pub fn merge_from(&mut self, other: &ValidationResult) {
        self.errors.extend(other.errors.iter().cloned());
        self.warnings.extend(other.warnings.iter().cloned());
        self.infos.extend(other.infos.iter().cloned());
        for (key, value) in &other.context {
            self.context.insert(key.clone(), value.clone());
        }
    }

    /// Merges any number of results in order, skipping absent inputs
    ///
    /// Message order follows input order; for context keys present in more
    /// than one input the last one wins.
    pub fn merge<'a, I>(results: I) -> ValidationResult
    where
        I: IntoIterator<Item = Option<&'a ValidationResult>>,
    {
        let mut merged = ValidationResult::new();
        for result in results.into_iter().flatten() {
            merged.merge_from(result);
        }
        merged
    }

    /// Returns a copy with every message field qualified as `prefix:field`
    pub fn with_field_prefix(&self, prefix: &str) -> ValidationResult {
        let qualify = |messages: &[ValidationMessage]| -> Vec<ValidationMessage> {
            messages
                .iter()
                .map(|m| ValidationMessage {
                    field: format!("{prefix}:{}", m.field),
                    ..m.clone()
                })
                .collect()
        };

        ValidationResult {
            errors: qualify(&self.errors),
            warnings: qualify(&self.warnings),
            infos: qualify(&self.infos),
            context: self.context.clone(),
        }
    }
}
