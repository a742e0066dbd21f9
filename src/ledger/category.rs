/// Canonical category suggestions surfaced by the presentation layer.
///
/// The set is advisory, not closed: the ledger accepts any non-empty
/// category string, and new names simply appear alongside these.
pub const SUGGESTED_CATEGORIES: [&str; 10] = [
    "Salary",
    "Bonus",
    "Investment",
    "Food",
    "Transport",
    "Entertainment",
    "Utilities",
    "Healthcare",
    "Shopping",
    "Other",
];

/// Whether a category name matches one of the canonical suggestions.
pub fn is_suggested(name: &str) -> bool {
    let name = name.trim();
    SUGGESTED_CATEGORIES
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestions_match_case_insensitively() {
        assert!(is_suggested("food"));
        assert!(is_suggested(" Salary "));
        assert!(!is_suggested("Rocketry"));
    }
}
