//! Integration tests for error classification and continuation rules

use shiftsync::config::{ClassificationConfig, PhasePolicyConfig, PolicyConfig};
use shiftsync::core::orchestrator::{ErrorPropagator, Phase, SeverityPolicy};
use shiftsync::domain::{
    Disposition, ErrorSeverity, Severity, ShiftSyncError, ValidationMessage, ValidationResult,
};
use test_case::test_case;

fn with_error(text: &str) -> ValidationResult {
    let mut result = ValidationResult::new();
    result.add_error("field", text);
    result
}

#[test_case("missing required field"; "missing required")]
#[test_case("Invalid Date '2025-13-01'"; "invalid date mixed case")]
#[test_case("type mismatch in column C"; "type mismatch")]
fn test_major_blocks_import_only(text: &str) {
    let propagator = ErrorPropagator::new();
    let result = with_error(text);

    assert!(propagator.is_major_error(&result));
    assert!(!propagator.should_continue(&result, Phase::Import));
    assert!(propagator.should_continue(&result, Phase::Scrape));
    assert!(propagator.should_continue(&result, Phase::Coverage));
}

#[test_case(Phase::Import)]
#[test_case(Phase::Scrape)]
#[test_case(Phase::Coverage)]
fn test_critical_blocks_every_phase(phase: Phase) {
    let propagator = ErrorPropagator::new();
    let result = with_error("duplicate key value violates unique constraint");

    assert!(propagator.is_critical_error(&result));
    assert!(!propagator.should_continue(&result, phase));
}

#[test]
fn test_minor_and_empty_continue() {
    let propagator = ErrorPropagator::new();

    assert!(propagator.is_minor_error(&ValidationResult::new()));
    assert!(propagator.should_continue(&ValidationResult::new(), Phase::Import));

    let minor = with_error("shift note truncated");
    assert!(propagator.is_minor_error(&minor));
    assert!(propagator.should_continue(&minor, Phase::Import));
}

#[test]
fn test_warnings_never_block() {
    let propagator = ErrorPropagator::new();
    let mut result = ValidationResult::new();
    result.add_warning("field", "corrupted cell ignored");

    assert!(propagator.should_continue(&result, Phase::Import));
}

#[test]
fn test_explicit_tag_beats_keywords() {
    let propagator = ErrorPropagator::new();
    let mut result = ValidationResult::new();
    result.push(
        ValidationMessage::new(Severity::Error, "row 2", "parse error in optional note")
            .with_kind(ErrorSeverity::Minor),
    );

    assert!(!propagator.is_critical_error(&result));
    assert!(propagator.should_continue(&result, Phase::Import));
}

#[test]
fn test_warning_error_is_minor() {
    let propagator = ErrorPropagator::new();
    let error = ShiftSyncError::warning("connection timeout on retry 1");
    assert_eq!(propagator.classify_error(&error), ErrorSeverity::Minor);
}

#[test]
fn test_custom_patterns_and_policy() {
    let classification = ClassificationConfig {
        critical_patterns: vec!["roster locked".to_string()],
        major_patterns: vec!["unknown unit".to_string()],
    };
    let policy = PolicyConfig {
        scrape: PhasePolicyConfig {
            major: Some(Disposition::Abort),
            ..Default::default()
        },
        ..Default::default()
    };
    let propagator = ErrorPropagator::from_config(&classification, &policy);

    assert!(propagator.is_critical_error(&with_error("Roster Locked by admin")));
    // Default keywords no longer apply
    assert!(!propagator.is_critical_error(&with_error("parse error")));

    let major = with_error("unknown unit 4B");
    assert!(!propagator.should_continue(&major, Phase::Scrape));
    assert!(propagator.should_continue(&major, Phase::Coverage));
}

#[test]
fn test_policy_table_defaults() {
    let policy = SeverityPolicy::default();
    for phase in Phase::ALL {
        assert_eq!(
            policy.disposition(phase, ErrorSeverity::Critical),
            Disposition::Abort
        );
        assert_eq!(
            policy.disposition(phase, ErrorSeverity::Minor),
            Disposition::Continue
        );
    }
    assert_eq!(
        policy.disposition(Phase::Import, ErrorSeverity::Major),
        Disposition::Abort
    );
    assert_eq!(
        policy.disposition(Phase::Scrape, ErrorSeverity::Major),
        Disposition::Continue
    );
}
