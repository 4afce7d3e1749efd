//! Property-based tests for p4 output parsers
//!
//! Uses proptest to verify parsers handle arbitrary input without panicking.
//! Reference: https://lib.rs/crates/proptest

use proptest::prelude::*;
use p4flow::p4::parser::{classify_severity, extract_trust_fingerprint, parse_tagged, Parser};
use p4flow::workflow::{validate_description, DESCRIPTION_PLACEHOLDER};

// =============================================================================
// Strategy generators for realistic-ish p4 output
// =============================================================================

/// Generate a depot path
fn depot_path_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.-]{1,20}(/[a-zA-Z0-9_.-]{1,20}){0,4}".prop_map(|s| format!("//depot/{s}"))
}

/// Generate a tagged field key
fn field_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9]{0,20}".prop_map(|s| s.to_string())
}

/// Generate a single-line field value with no leading field marker
fn field_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 _/#:.-]{0,60}".prop_map(|s| s.to_string())
}

/// Generate a server fingerprint (20 colon-separated hex octets)
fn fingerprint_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec("[0-9A-F]{2}", 20).prop_map(|octets| octets.join(":"))
}

// =============================================================================
// Robustness tests: parsers should never panic on arbitrary input
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Tagged-output parser should not panic on arbitrary input
    #[test]
    fn tagged_parser_does_not_panic(input in ".*") {
        let _ = parse_tagged(&input);
    }

    /// Opened-file parser should not panic on arbitrary tagged input
    #[test]
    fn opened_parser_does_not_panic(input in ".*") {
        let records = parse_tagged(&input);
        // Should return Ok or Err, never panic
        let _ = Parser::parse_opened(&records, "user", "workspace");
    }

    /// Filelog parser should not panic on arbitrary tagged input
    #[test]
    fn filelog_parser_does_not_panic(input in ".*") {
        let records = parse_tagged(&input);
        let _ = Parser::parse_filelog(&records);
    }

    /// Change-form parser should not panic on arbitrary input
    #[test]
    fn change_spec_parser_does_not_panic(input in ".*") {
        let _ = Parser::parse_change_spec(&input);
    }

    /// Severity classifier should not panic on arbitrary stderr text
    #[test]
    fn severity_classifier_does_not_panic(input in ".*") {
        let _ = classify_severity(&input);
    }

    /// Fingerprint extractor should not panic on arbitrary stderr text
    #[test]
    fn fingerprint_extractor_does_not_panic(input in ".*") {
        let _ = extract_trust_fingerprint(&input);
    }
}

// =============================================================================
// Structured input tests: parsers handle well-formed input correctly
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Tagged parser round-trips rendered field lines
    #[test]
    fn tagged_parser_handles_structured_records(
        fields in proptest::collection::vec(
            (field_key_strategy(), field_value_strategy()),
            1..8,
        ),
    ) {
        let mut output = String::new();
        for (key, value) in &fields {
            output.push_str(&format!("... {key} {value}\n"));
        }

        let records = parse_tagged(&output);
        prop_assert_eq!(records.len(), 1, "one block should yield one record");
        for (key, value) in &fields {
            // First occurrence wins on duplicate keys
            let parsed = records[0].get(key);
            prop_assert!(parsed.is_some(), "field {} should survive", key);
            if fields.iter().filter(|(k, _)| k == key).count() == 1 {
                prop_assert_eq!(parsed, Some(value.as_str()));
            }
        }
    }

    /// Blank lines split tagged output into records
    #[test]
    fn tagged_parser_splits_records_on_blank_lines(
        paths in proptest::collection::vec(depot_path_strategy(), 1..6),
    ) {
        let output: String = paths
            .iter()
            .map(|path| format!("... depotFile {path}\n... action edit\n\n"))
            .collect();

        let records = parse_tagged(&output);
        prop_assert_eq!(records.len(), paths.len());
        for (record, path) in records.iter().zip(&paths) {
            prop_assert_eq!(record.get("depotFile"), Some(path.as_str()));
        }
    }

    /// Opened parser accepts well-formed records for the known actions
    #[test]
    fn opened_parser_handles_structured_input(
        depot_path in depot_path_strategy(),
        action in prop::sample::select(vec!["add", "edit", "delete"]),
        locked in prop::bool::ANY,
    ) {
        let lock_line = if locked { "... ourLock\n" } else { "" };
        let output = format!(
            "... depotFile {depot_path}\n\
             ... clientFile /ws/file.ma\n\
             ... action {action}\n\
             ... type binary\n\
             {lock_line}\n"
        );

        let files = Parser::parse_opened(&parse_tagged(&output), "tmercer", "tmercer-ws")
            .expect("well-formed record should parse");
        prop_assert_eq!(files.len(), 1);
        prop_assert_eq!(&files[0].depot_path, &depot_path);
        prop_assert_eq!(files[0].action.to_string(), action);
        prop_assert_eq!(files[0].locked, locked);
        prop_assert_eq!(&files[0].user, "tmercer");
    }

    /// Fingerprint extraction finds a fingerprint wherever it sits in the
    /// trust prompt
    #[test]
    fn fingerprint_is_extracted_from_surrounding_text(
        fingerprint in fingerprint_strategy(),
        prefix in "[a-zA-Z ]{0,40}",
        suffix in "[a-zA-Z ]{0,40}",
    ) {
        let stderr = format!("{prefix} {fingerprint} {suffix}");
        prop_assert_eq!(extract_trust_fingerprint(&stderr), Some(fingerprint));
    }
}

// =============================================================================
// Description validation properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Any description containing an angle bracket is invalid
    #[test]
    fn angle_brackets_always_invalid(
        prefix in "[a-zA-Z0-9 ]{0,30}",
        bracket in prop::sample::select(vec!['<', '>']),
        suffix in "[a-zA-Z0-9 ]{0,30}",
    ) {
        let text = format!("{prefix}{bracket}{suffix}");
        prop_assert!(!validate_description(&text));
    }

    /// Whitespace-only descriptions are invalid
    #[test]
    fn whitespace_only_always_invalid(text in "[ \t\n]{0,20}") {
        prop_assert!(!validate_description(&text));
    }

    /// Ordinary non-empty text without angle brackets is valid
    #[test]
    fn plain_text_is_valid(text in "[a-zA-Z0-9][a-zA-Z0-9 _#.,-]{0,60}") {
        prop_assert!(validate_description(&text));
    }
}

// =============================================================================
// Edge case tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Tagged parser handles very long lines
    #[test]
    fn tagged_parser_handles_long_lines(len in 100usize..10000) {
        let input = format!("... key {}", "a".repeat(len));
        let records = parse_tagged(&input);
        prop_assert_eq!(records.len(), 1);
    }

    /// Tagged parser handles unicode
    #[test]
    fn tagged_parser_handles_unicode(s in "\\PC{1,100}") {
        let _ = parse_tagged(&s);
    }

    /// Continuation lines before any field are ignored, not panicked on
    #[test]
    fn tagged_parser_handles_leading_continuations(
        lines in proptest::collection::vec("[a-z ]{0,30}", 1..5),
    ) {
        let input = lines.join("\n");
        let _ = parse_tagged(&input);
    }
}

#[test]
fn placeholder_is_never_a_valid_description() {
    assert!(!validate_description(DESCRIPTION_PLACEHOLDER));
}
