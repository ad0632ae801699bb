//! Fuzzy choice matching for prompt filters.

/// Subsequence match: every non-blank character of `input` must appear in
/// `text` in the same order, with arbitrary gaps. Blank characters in the
/// input are ignored, so "ks pod" still narrows down to "kube-system" pods.
/// An empty input matches everything.
pub fn is_match(text: &str, input: &str) -> bool {
    let mut haystack = text.chars();
    input
        .chars()
        .filter(|c| !c.is_whitespace())
        .all(|needle| haystack.by_ref().any(|c| c == needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_matches_everything() {
        assert!(is_match("anything", ""));
        assert!(is_match("", ""));
        assert!(is_match("pod-a", " \t "));
    }

    #[test]
    fn test_subsequence_with_gaps() {
        assert!(is_match("kube-system", "ksys"));
        assert!(is_match("nginx-deployment-7fb96c846b", "ngxdep"));
        assert!(is_match("pod-a", "pod-a"));
    }

    #[test]
    fn test_order_matters() {
        assert!(!is_match("kube-system", "sk"));
        assert!(!is_match("abc", "cba"));
    }

    #[test]
    fn test_missing_character_fails() {
        assert!(!is_match("default", "defz"));
        assert!(!is_match("", "a"));
    }

    #[test]
    fn test_blank_characters_are_dropped() {
        assert!(is_match("kube-system", "k s"));
        assert!(is_match("pod-a", "pod a"));
    }

    #[test]
    fn test_case_sensitive() {
        assert!(!is_match("default", "DEF"));
        assert!(is_match("CrashLoopBackOff", "CLB"));
    }

    #[test]
    fn test_special_characters_are_literal() {
        assert!(is_match("pod.with.dots", "p.w"));
        assert!(!is_match("podxwithxdots", "p.w"));
        assert!(is_match("job[1]", "[1]"));
    }
}
