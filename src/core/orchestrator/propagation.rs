//! Error classification and continue/abort decisions
//!
//! Every error message is classified as critical, major or minor. An
//! explicit [`ErrorSeverity`] tag on the message wins; untagged messages fall
//! back to case-insensitive keyword matching. The resulting severity is then
//! looked up in a per-phase [`SeverityPolicy`].
//!
//! | severity | import | scrape   | coverage |
//! |----------|--------|----------|----------|
//! | critical | abort  | abort    | abort    |
//! | major    | abort  | continue | continue |
//! | minor    | continue | continue | continue |

use super::phase::Phase;
use crate::config::{ClassificationConfig, PhasePolicyConfig, PolicyConfig};
use crate::domain::{
    Disposition, ErrorSeverity, ShiftSyncError, ValidationMessage, ValidationResult,
    PHASES_WITH_ERRORS_KEY,
};
use std::collections::BTreeMap;

/// Keywords marking corruption, constraint, resource and connectivity failures
pub const DEFAULT_CRITICAL_PATTERNS: &[&str] = &[
    "invalid file format",
    "invalid zip",
    "parse error",
    "parsing failed",
    "cannot parse",
    "malformed",
    "corrupted",
    "duplicate",
    "constraint violation",
    "unique constraint",
    "foreign key",
    "integrity constraint",
    "no space left",
    "disk full",
    "out of memory",
    "permission denied",
    "connection refused",
    "connection timeout",
];

/// Keywords marking malformed values, unsupported values and missing fields
pub const DEFAULT_MAJOR_PATTERNS: &[&str] = &[
    "invalid date",
    "invalid format",
    "invalid shift",
    "unsupported",
    "not supported",
    "missing required",
    "missing field",
    "required field",
    "invalid type",
    "type mismatch",
];

/// Phase × severity → continue/abort table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeverityPolicy {
    rules: BTreeMap<(Phase, ErrorSeverity), Disposition>,
}

impl SeverityPolicy {
    /// The built-in table: critical aborts everywhere, major aborts only the
    /// import phase, minor never aborts
    pub fn new() -> Self {
        let mut rules = BTreeMap::new();
        for phase in Phase::ALL {
            rules.insert((phase, ErrorSeverity::Critical), Disposition::Abort);
            rules.insert((phase, ErrorSeverity::Major), Disposition::Continue);
            rules.insert((phase, ErrorSeverity::Minor), Disposition::Continue);
        }
        rules.insert((Phase::Import, ErrorSeverity::Major), Disposition::Abort);
        Self { rules }
    }

    /// Built-in table with the configured overrides applied
    pub fn from_config(config: &PolicyConfig) -> Self {
        let mut policy = Self::new();
        for (phase, overrides) in [
            (Phase::Import, &config.import),
            (Phase::Scrape, &config.scrape),
            (Phase::Coverage, &config.coverage),
        ] {
            policy.apply_overrides(phase, overrides);
        }
        policy
    }

    fn apply_overrides(&mut self, phase: Phase, overrides: &PhasePolicyConfig) {
        for (severity, disposition) in [
            (ErrorSeverity::Critical, overrides.critical),
            (ErrorSeverity::Major, overrides.major),
            (ErrorSeverity::Minor, overrides.minor),
        ] {
            if let Some(disposition) = disposition {
                self.rules.insert((phase, severity), disposition);
            }
        }
    }

    /// Replaces one entry of the table
    pub fn with_rule(
        mut self,
        phase: Phase,
        severity: ErrorSeverity,
        disposition: Disposition,
    ) -> Self {
        self.rules.insert((phase, severity), disposition);
        self
    }

    pub fn disposition(&self, phase: Phase, severity: ErrorSeverity) -> Disposition {
        self.rules
            .get(&(phase, severity))
            .copied()
            .unwrap_or(Disposition::Abort)
    }
}

impl Default for SeverityPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Merges diagnostics and decides whether a run may proceed past a phase
#[derive(Debug, Clone)]
pub struct ErrorPropagator {
    critical_patterns: Vec<String>,
    major_patterns: Vec<String>,
    policy: SeverityPolicy,
}

impl ErrorPropagator {
    /// Propagator with the built-in keyword lists and policy table
    pub fn new() -> Self {
        Self {
            critical_patterns: lowercase_all(DEFAULT_CRITICAL_PATTERNS.iter().copied()),
            major_patterns: lowercase_all(DEFAULT_MAJOR_PATTERNS.iter().copied()),
            policy: SeverityPolicy::new(),
        }
    }

    /// Propagator built from the `[classification]` and `[policy]` sections
    pub fn from_config(classification: &ClassificationConfig, policy: &PolicyConfig) -> Self {
        Self {
            critical_patterns: lowercase_all(
                classification.critical_patterns.iter().map(String::as_str),
            ),
            major_patterns: lowercase_all(classification.major_patterns.iter().map(String::as_str)),
            policy: SeverityPolicy::from_config(policy),
        }
    }

    pub fn with_patterns(mut self, critical: &[&str], major: &[&str]) -> Self {
        self.critical_patterns = lowercase_all(critical.iter().copied());
        self.major_patterns = lowercase_all(major.iter().copied());
        self
    }

    pub fn with_policy(mut self, policy: SeverityPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &SeverityPolicy {
        &self.policy
    }

    /// Keyword classification of a raw error text
    pub fn classify_text(&self, text: &str) -> ErrorSeverity {
        let lower = text.to_lowercase();
        if self.critical_patterns.iter().any(|p| lower.contains(p)) {
            ErrorSeverity::Critical
        } else if self.major_patterns.iter().any(|p| lower.contains(p)) {
            ErrorSeverity::Major
        } else {
            ErrorSeverity::Minor
        }
    }

    /// Explicit tag first, keyword matching otherwise
    pub fn classify_message(&self, message: &ValidationMessage) -> ErrorSeverity {
        message
            .kind
            .unwrap_or_else(|| self.classify_text(&message.text))
    }

    /// Warnings are always minor; anything else is classified by its text
    pub fn classify_error(&self, error: &ShiftSyncError) -> ErrorSeverity {
        if error.is_warning() {
            ErrorSeverity::Minor
        } else {
            self.classify_text(&error.to_string())
        }
    }

    /// Most severe classification among the result's errors
    pub fn worst_severity(&self, result: &ValidationResult) -> Option<ErrorSeverity> {
        result
            .errors
            .iter()
            .map(|m| self.classify_message(m))
            .min()
    }

    pub fn is_critical_error(&self, result: &ValidationResult) -> bool {
        self.worst_severity(result) == Some(ErrorSeverity::Critical)
    }

    /// True when a non-critical error is major
    pub fn is_major_error(&self, result: &ValidationResult) -> bool {
        result
            .errors
            .iter()
            .any(|m| self.classify_message(m) == ErrorSeverity::Major)
    }

    /// True when there are no critical or major errors
    pub fn is_minor_error(&self, result: &ValidationResult) -> bool {
        matches!(self.worst_severity(result), None | Some(ErrorSeverity::Minor))
    }

    /// True unless some error's severity maps to abort for `phase`
    pub fn should_continue(&self, result: &ValidationResult, phase: Phase) -> bool {
        result.errors.iter().all(|m| {
            self.policy.disposition(phase, self.classify_message(m)) == Disposition::Continue
        })
    }

    /// Merges results in order, skipping absent ones
    pub fn merge_validation_results<'a, I>(&self, results: I) -> ValidationResult
    where
        I: IntoIterator<Item = Option<&'a ValidationResult>>,
    {
        ValidationResult::merge(results)
    }

    /// Merges per-phase results, recording which phases had errors
    ///
    /// Errors without a field are attributed to their phase. The
    /// `phases_with_errors` context key holds a comma-separated list and is
    /// only set when at least one phase had errors.
    pub fn merge_with_phase_context(
        &self,
        results: &BTreeMap<Phase, ValidationResult>,
    ) -> ValidationResult {
        let mut merged = ValidationResult::new();
        let mut phases_with_errors = Vec::new();

        for (phase, result) in results {
            if result.has_errors() {
                phases_with_errors.push(phase.as_str());
            }

            let mut attributed = result.clone();
            for error in &mut attributed.errors {
                if error.field.is_empty() {
                    error.field = phase.as_str().to_string();
                }
            }
            merged.merge_from(&attributed);
        }

        if !phases_with_errors.is_empty() {
            merged.set_context(PHASES_WITH_ERRORS_KEY, phases_with_errors.join(","));
        }

        merged
    }
}

impl Default for ErrorPropagator {
    fn default() -> Self {
        Self::new()
    }
}

fn lowercase_all<'a>(patterns: impl Iterator<Item = &'a str>) -> Vec<String> {
    patterns.map(|p| p.trim().to_lowercase()).collect()
}
