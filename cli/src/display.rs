//! Terminal formatting helpers.

/// Longest snippet printed for a hit.
pub const SNIPPET_CHARS: usize = 120;

/// First non-blank line of `text`, cut to [`SNIPPET_CHARS`] characters.
pub fn snippet(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .chars()
        .take(SNIPPET_CHARS)
        .collect()
}

/// Heading line followed by a rule.
pub fn header(title: &str) {
    println!("=== shelfwise: {title} ===");
}

pub fn rule() {
    println!("{}", "-".repeat(50));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_snippet_takes_first_line() {
        assert_eq!(snippet("\n  First line.  \nSecond line."), "First line.");
        assert_eq!(snippet(""), "");
    }

    #[test]
    fn test_snippet_is_char_bounded() {
        let long = "é".repeat(200);
        assert_eq!(snippet(&long).chars().count(), SNIPPET_CHARS);
    }
}
