//! Common text helpers shared across passes.

/// Keep at most `max` chars, marking a cut with a trailing `...`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

/// Split a comma-separated attribute value, dropping blanks.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("abcdefghijk", 10), "abcdefghij...");
        // counts chars, not bytes
        assert_eq!(truncate("ééé", 2), "éé...");
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("ExtA, ExtB ,,ExtC"), vec!["ExtA", "ExtB", "ExtC"]);
        assert!(split_list("  ").is_empty());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some(" x ")), Some("x".to_string()));
        assert_eq!(non_blank(Some("  ")), None);
        assert_eq!(non_blank(None), None);
    }
}
