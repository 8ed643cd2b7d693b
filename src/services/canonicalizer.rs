//! Text canonicalization for comparison-stable fields

/// Collapse every run of whitespace (including line breaks and non-breaking
/// spaces) into a single ASCII space and trim the ends.
///
/// Pure, total, and idempotent. Applied to every textual field before it is
/// stored or fingerprinted.
pub fn canonicalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace_runs() {
        assert_eq!(canonicalize("a  b\t\tc"), "a b c");
        assert_eq!(canonicalize("a\r\n\r\nb"), "a b");
    }

    #[test]
    fn test_handles_non_breaking_space() {
        assert_eq!(canonicalize("a\u{00A0}\u{00A0}b"), "a b");
    }

    #[test]
    fn test_trims_ends() {
        assert_eq!(canonicalize("  hello  "), "hello");
        assert_eq!(canonicalize("\n\thello\n"), "hello");
    }

    #[test]
    fn test_empty_and_whitespace_only() {
        assert_eq!(canonicalize(""), "");
        assert_eq!(canonicalize(" \n\u{00A0} "), "");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "plain",
            "  leading and\n trailing  ",
            "multi\u{00A0}byte\u{3000}spaces",
            "",
        ];
        for s in samples {
            let once = canonicalize(s);
            assert_eq!(canonicalize(&once), once);
        }
    }
}
