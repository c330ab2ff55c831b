use regex::Regex;
use tracing::debug;

use crate::error::ExtractError;

/// The dedented body of one routine, line by line.
///
/// Blank lines are kept as a single space so that joining the block for
/// display never collapses them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBlock {
    lines: Vec<String>,
}

impl SourceBlock {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn join(&self) -> String {
        self.lines.join("\n")
    }
}

/// Pulls a named routine body out of raw source text
pub struct BlockExtractor {
    marker: Regex,
    closing_regex: Regex,
}

impl BlockExtractor {
    pub fn new(routine_marker: &str) -> Result<Self, ExtractError> {
        let marker = Regex::new(routine_marker).map_err(|e| ExtractError::InvalidMarker {
            pattern: routine_marker.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            marker,
            closing_regex: Regex::new(r"^\}").expect("Invalid closing brace regex"),
        })
    }

    /// Extract the body following the first line matching the marker.
    ///
    /// The body ends at the first later line starting with `}` in column 0.
    /// Nested braces are not tracked, so a `}` in column 0 anywhere inside
    /// the body ends it early.
    pub fn extract(&self, source: &str) -> Result<SourceBlock, ExtractError> {
        let lines: Vec<&str> = source.split('\n').collect();

        let start = lines
            .iter()
            .position(|line| self.marker.is_match(line))
            .map(|ix| ix + 1)
            .ok_or_else(|| ExtractError::MarkerNotFound(self.marker.as_str().to_string()))?;

        let end = lines[start..]
            .iter()
            .position(|line| self.closing_regex.is_match(line))
            .map(|offset| start + offset)
            .unwrap_or(lines.len());

        debug!("Extracted routine body from lines {}..{}", start + 1, end);

        let body: Vec<&str> = lines[start..end]
            .iter()
            .map(|line| line.trim_end_matches('\r'))
            .collect();

        Ok(SourceBlock { lines: dedent(&body) })
    }
}

/// Strip the common leading whitespace of all non-blank lines.
///
/// Widths are counted in characters. Blank lines come back as `" "`.
pub fn dedent<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let min = lines
        .iter()
        .map(|line| line.as_ref())
        .filter(|line| !line.trim().is_empty())
        .map(leading_whitespace)
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|line| {
            let line = line.as_ref();
            let stripped = match line.char_indices().nth(min) {
                Some((offset, _)) => &line[offset..],
                None => "",
            };
            if stripped.is_empty() {
                " ".to_string()
            } else {
                stripped.to_string()
            }
        })
        .collect()
}

fn leading_whitespace(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "fn helper() {}\n\
pub fn examples(t: &mut dyn TraceSink) {\n    // one\n    let x = 1;\n\n        nested();\n}\n\nfn after() {}\n";

    #[test]
    fn test_extract_body_between_marker_and_column_zero_brace() {
        let extractor = BlockExtractor::new(r"fn examples\b").unwrap();
        let block = extractor.extract(SOURCE).unwrap();

        assert_eq!(
            block.lines(),
            &["// one", "let x = 1;", " ", "    nested();"]
        );
    }

    #[test]
    fn test_marker_not_found() {
        let extractor = BlockExtractor::new("fn missing").unwrap();
        assert_eq!(
            extractor.extract(SOURCE),
            Err(ExtractError::MarkerNotFound("fn missing".to_string()))
        );
    }

    #[test]
    fn test_invalid_marker_is_reported() {
        assert!(matches!(
            BlockExtractor::new("fn (examples"),
            Err(ExtractError::InvalidMarker { .. })
        ));
    }

    #[test]
    fn test_column_zero_brace_truncates_early() {
        let source = "function examples() {\n    var s = '\n}';\n    trace(s);\n}\n";
        let extractor = BlockExtractor::new("function examples").unwrap();
        let block = extractor.extract(source).unwrap();
        assert_eq!(block.lines(), &["var s = '"]);
    }

    #[test]
    fn test_unterminated_body_runs_to_end() {
        let extractor = BlockExtractor::new("function examples").unwrap();
        let block = extractor.extract("function examples() {\n  a();\n  b();").unwrap();
        assert_eq!(block.join(), "a();\nb();");
    }

    #[test]
    fn test_dedent_strips_minimum_ignoring_blank_lines() {
        let lines = ["  a", "  b", "    c", ""];
        assert_eq!(dedent(&lines), vec!["a", "b", "  c", " "]);
    }

    #[test]
    fn test_dedent_is_idempotent() {
        let once = dedent(&["    x = 1", "      y", "", "    z"]);
        let twice = dedent(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_dedent_counts_multibyte_whitespace_as_one_column() {
        assert_eq!(dedent(&["\u{a0}x = 1", " y = 2"]), vec!["x = 1", "y = 2"]);
        assert_eq!(
            dedent(&["\u{3000}\u{3000}a", "\u{3000}b"]),
            vec!["\u{3000}a", "b"]
        );
    }

    #[test]
    fn test_whitespace_only_lines_become_placeholders() {
        assert_eq!(dedent(&["    a", "  ", "    b"]), vec!["a", " ", "b"]);
    }
}
