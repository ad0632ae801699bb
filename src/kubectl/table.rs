//! Whitespace-delimited text table parsing.
//!
//! kubectl's default output is a header line followed by data lines whose
//! columns are separated by runs of spaces. The parser stays column-name
//! agnostic; callers address fields by position.

/// Split a raw text blob into rows of whitespace-separated fields.
///
/// Empty lines are skipped. Short rows are returned as-is; callers must
/// index defensively.
pub fn parse(raw: &str) -> Vec<Vec<String>> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.split_whitespace().map(str::to_string).collect())
        .collect()
}
