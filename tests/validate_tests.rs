// tests for generate input validation

use twintone::{MAX_QUERY_CHARS, Validation};

#[test]
fn test_valid_input() {
    let v = Validation::check("abc123", "Explain blockchain");
    assert!(v.is_ok());
    assert!(v.errors.is_empty());
}

#[test]
fn test_empty_user_id() {
    let v = Validation::check("", "Explain blockchain");
    assert!(!v.is_ok());
    assert!(v.errors[0].contains("user id"));
}

#[test]
fn test_whitespace_query() {
    let v = Validation::check("abc123", "   \n\t");
    assert_eq!(v.errors.len(), 1);
    assert!(v.errors[0].contains("whitespace"));
}

#[test]
fn test_both_missing() {
    let v = Validation::required("", "");
    assert_eq!(v.errors.len(), 2);
    assert!(v.message().contains("; "));
}

#[test]
fn test_query_length_limit() {
    let at_limit = "a".repeat(MAX_QUERY_CHARS);
    assert!(Validation::check("u", &at_limit).is_ok());

    let over = "a".repeat(MAX_QUERY_CHARS + 1);
    let v = Validation::check("u", &over);
    assert!(v.errors[0].contains("exceed"));
}

#[test]
fn test_non_printable_query() {
    let v = Validation::check("u", "what is \u{7}this");
    assert!(v.errors[0].contains("invalid characters"));

    let v = Validation::check("u", "qu'est-ce que c'est? é");
    assert!(!v.is_ok());
}

#[test]
fn test_gateway_rules_skip_limits() {
    // length and charset limits belong to the ui
    let long = "é".repeat(MAX_QUERY_CHARS * 2);
    assert!(Validation::required("u", &long).is_ok());
}
