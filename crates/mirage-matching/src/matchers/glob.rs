//! Glob compilation for field and header-value patterns.
//!
//! `*` matches any run of characters (including none), `?` matches exactly
//! one. Patterns are anchored at both ends and match case-insensitively, so
//! a scheme pattern `H*` accepts `http`.

use globset::{GlobBuilder, GlobMatcher};

/// Compile a glob pattern into a reusable matcher.
pub(crate) fn compile(pattern: &str) -> Result<GlobMatcher, globset::Error> {
    GlobBuilder::new(pattern)
        .case_insensitive(true)
        .literal_separator(false)
        .build()
        .map(|glob| glob.compile_matcher())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_matches_any_run() {
        let matcher = compile("*.com").unwrap();
        assert!(matcher.is_match("testhost.com"));
        assert!(matcher.is_match(".com"));
        assert!(!matcher.is_match("testhost.org"));
    }

    #[test]
    fn test_question_mark_matches_one_character() {
        let matcher = compile("v?").unwrap();
        assert!(matcher.is_match("v1"));
        assert!(!matcher.is_match("v12"));
        assert!(!matcher.is_match("v"));
    }

    #[test]
    fn test_match_is_anchored() {
        let matcher = compile("host").unwrap();
        assert!(matcher.is_match("host"));
        assert!(!matcher.is_match("somehost"));
        assert!(!matcher.is_match("hostname"));
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let matcher = compile("H*").unwrap();
        assert!(matcher.is_match("http"));
        assert!(matcher.is_match("HTTPS"));
        assert!(!matcher.is_match("ftp"));
    }

    #[test]
    fn test_star_crosses_path_separators() {
        let matcher = compile("/api/*").unwrap();
        assert!(matcher.is_match("/api/v1/users"));
    }
}
