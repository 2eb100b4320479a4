//! Name comparison helpers
//!
//! Plan, action, and step names are matched trim- and case-insensitively
//! throughout the core. Every lookup and duplicate check folds through
//! [`normalized`] so the rules cannot drift between crates.

/// Returns the canonical comparison form of a name: trimmed and
/// lowercased.
pub fn normalized(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Returns true if two names are equal under trim- and case-folding.
pub fn names_match(a: &str, b: &str) -> bool {
    normalized(a) == normalized(b)
}

/// Returns true if the optional string is absent, empty, or whitespace.
pub fn is_blank(value: Option<&str>) -> bool {
    match value {
        Some(s) => s.trim().is_empty(),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_folds_case_and_whitespace() {
        assert_eq!(normalized("  Deploy "), "deploy");
        assert!(names_match("deploy", " DEPLOY"));
        assert!(!names_match("deploy", "deployment"));
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(None));
        assert!(is_blank(Some("")));
        assert!(is_blank(Some("   ")));
        assert!(!is_blank(Some("a")));
    }
}
