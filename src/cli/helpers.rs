//! Shared helper functions for CLI output

/// Truncate a string to `max_len` characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("A-db-B_(1)", 20), "A-db-B_(1)");
        assert_eq!(truncate_str("{[<]CC(c1ccccc1)[>]}", 10), "{[<]CC(...");
        assert_eq!(truncate_str("hi", 2), "hi");
        assert_eq!(truncate_str("ÅÅÅÅÅ", 4), "Å...");
    }
}
