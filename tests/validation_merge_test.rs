//! Integration tests for merging diagnostics across phases

use shiftsync::core::orchestrator::{ErrorPropagator, Phase};
use shiftsync::domain::{
    MessageCode, Severity, ValidationMessage, ValidationResult, PHASES_WITH_ERRORS_KEY,
};
use std::collections::BTreeMap;

fn result(errors: usize, warnings: usize, infos: usize) -> ValidationResult {
    let mut result = ValidationResult::new();
    for i in 0..errors {
        result.add_error(format!("e{i}"), "error");
    }
    for i in 0..warnings {
        result.add_warning(format!("w{i}"), "warning");
    }
    for i in 0..infos {
        result.add_info(format!("i{i}"), "info");
    }
    result
}

#[test]
fn test_merged_counts_are_sums() {
    let inputs = [result(2, 1, 0), result(0, 3, 4), result(1, 0, 1)];

    let merged = ValidationResult::merge([
        None,
        Some(&inputs[0]),
        Some(&inputs[1]),
        None,
        Some(&inputs[2]),
        None,
    ]);

    assert_eq!(merged.error_count(), 3);
    assert_eq!(merged.warning_count(), 4);
    assert_eq!(merged.info_count(), 5);
    assert_eq!(merged.count(), 12);
    assert_eq!(merged.messages().count(), merged.count());
    assert!(!merged.is_valid());
}

#[test]
fn test_merge_of_nothing_is_empty_and_valid() {
    let merged = ValidationResult::merge(std::iter::empty::<Option<&ValidationResult>>());
    assert_eq!(merged.count(), 0);
    assert!(merged.is_valid());

    let only_absent = ValidationResult::merge([None, None]);
    assert_eq!(only_absent, ValidationResult::new());
}

#[test]
fn test_merge_preserves_order_and_last_context_wins() {
    let mut first = result(1, 0, 0);
    first.errors[0].field = "first".to_string();
    first.set_context("rows", 10);
    let mut second = result(1, 0, 0);
    second.errors[0].field = "second".to_string();
    second.set_context("rows", 20);

    let merged = ValidationResult::merge([Some(&first), Some(&second)]);
    assert_eq!(merged.errors[0].field, "first");
    assert_eq!(merged.errors[1].field, "second");
    assert_eq!(merged.get_context("rows"), Some(&serde_json::json!(20)));

    let reversed = ValidationResult::merge([Some(&second), Some(&first)]);
    assert_eq!(reversed.get_context("rows"), Some(&serde_json::json!(10)));
}

#[test]
fn test_phase_context_lists_phases_with_errors() {
    let propagator = ErrorPropagator::new();
    let mut per_phase = BTreeMap::new();
    per_phase.insert(Phase::Import, result(0, 2, 1));
    per_phase.insert(Phase::Scrape, result(1, 0, 0));
    per_phase.insert(Phase::Coverage, result(2, 0, 0));

    let merged = propagator.merge_with_phase_context(&per_phase);

    assert_eq!(merged.error_count(), 3);
    assert_eq!(merged.warning_count(), 2);
    assert_eq!(
        merged.get_context(PHASES_WITH_ERRORS_KEY),
        Some(&serde_json::json!("AMION_SCRAPE,COVERAGE_CALCULATION"))
    );
}

#[test]
fn test_phase_context_absent_without_errors() {
    let propagator = ErrorPropagator::new();
    let mut per_phase = BTreeMap::new();
    per_phase.insert(Phase::Import, result(0, 1, 1));

    let merged = propagator.merge_with_phase_context(&per_phase);
    assert!(merged.get_context(PHASES_WITH_ERRORS_KEY).is_none());
}

#[test]
fn test_unfielded_errors_are_attributed_to_phase() {
    let propagator = ErrorPropagator::new();
    let mut scrape = ValidationResult::new();
    scrape.add_error("", "session expired");

    let mut per_phase = BTreeMap::new();
    per_phase.insert(Phase::Scrape, scrape);

    let merged = propagator.merge_with_phase_context(&per_phase);
    assert_eq!(merged.errors[0].field, "AMION_SCRAPE");
}

#[test]
fn test_message_json_shape() {
    let mut result = ValidationResult::new();
    result.push(
        ValidationMessage::new(Severity::Error, "ods:row 4", "missing required field")
            .with_code(MessageCode::MissingRequiredField)
            .with_context("column", "D"),
    );

    let json = serde_json::to_value(&result).unwrap();
    let message = &json["errors"][0];
    assert_eq!(message["severity"], "error");
    assert_eq!(message["field"], "ods:row 4");
    assert_eq!(message["text"], "missing required field");
    assert_eq!(message["context"]["column"], "D");
    assert_eq!(message["code"], "MISSING_REQUIRED_FIELD");
    assert!(json["warnings"].as_array().unwrap().is_empty());
    assert!(json["infos"].as_array().unwrap().is_empty());
    assert!(json["context"].as_object().unwrap().is_empty());
}
