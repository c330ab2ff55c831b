use regex::Regex;
use tracing::debug;

use crate::error::MergeError;
use super::segmenter::escape_markup;

const OUTPUT_OPEN: &str = ";\n <span class=\"output\">&rarr; ";
const OUTPUT_CLOSE: &str = "</span>";

/// Interleaves escaped example code with the output each trace call produced
pub struct OutputMerger {
    /// Quoted label hint at the start of a call site: `'label', ` or `"label", `
    label_regex: Regex,

    /// Line comments in the merged markup
    comment_regex: Regex,

    /// Token opening a trace call, restored on call sites left unannotated
    trace_marker: String,

    /// Token closing a trace call
    call_close: String,
}

impl OutputMerger {
    pub fn new(trace_marker: &str, call_close: &str) -> Self {
        Self {
            label_regex: Regex::new(r#"^(?:'([^'\n]*)'|"([^"\n]*)"), "#)
                .expect("Invalid label hint regex"),
            comment_regex: Regex::new(r"//.*").expect("Invalid line comment regex"),
            trace_marker: trace_marker.to_string(),
            call_close: call_close.to_string(),
        }
    }

    /// Merge segments with captured outputs into one annotated markup string.
    ///
    /// `segments[0]` is the preamble; `segments[i]` pairs with `outputs[i - 1]`.
    /// Any difference between the number of call sites and outputs is an error.
    pub fn merge(&self, segments: &[String], outputs: &[String]) -> Result<String, MergeError> {
        let calls = segments.len().saturating_sub(1);
        if outputs.len() < calls {
            return Err(MergeError::MissingOutput {
                index: outputs.len(),
                available: outputs.len(),
            });
        }
        if outputs.len() > calls {
            return Err(MergeError::UnusedOutputs {
                unused: outputs.len() - calls,
            });
        }

        Ok(self.merge_available(segments, outputs))
    }

    /// Annotate every call site that has a captured output.
    ///
    /// Call sites past the last output keep their trace call as written.
    /// Outputs past the last call site are dropped.
    pub fn merge_available(&self, segments: &[String], outputs: &[String]) -> String {
        let mut chunks = Vec::with_capacity(segments.len() * 5);
        let mut iter = segments.iter();

        if let Some(preamble) = iter.next() {
            chunks.push(preamble.clone());
        }

        for (index, segment) in iter.enumerate() {
            let Some(raw_output) = outputs.get(index) else {
                chunks.push(self.trace_marker.clone());
                chunks.push(segment.clone());
                continue;
            };
            let (segment, output) = self.elide_label(segment, escape_markup(raw_output));

            let (code, rest) = match segment.find(&self.call_close) {
                Some(pos) => (&segment[..pos], &segment[pos + self.call_close.len()..]),
                None => (segment, ""),
            };

            chunks.push(code.to_string());
            chunks.push(OUTPUT_OPEN.to_string());
            chunks.push(output.trim().to_string());
            chunks.push(OUTPUT_CLOSE.to_string());
            chunks.push(rest.to_string());
        }

        let merged = chunks.concat();
        self.comment_regex
            .replace_all(&merged, "<span class=\"comment\">$0</span>")
            .into_owned()
    }

    /// Drop a label hint from the call site when the output repeats it
    fn elide_label<'a>(&self, segment: &'a str, output: String) -> (&'a str, String) {
        let Some(caps) = self.label_regex.captures(segment) else {
            return (segment, output);
        };
        let label = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
            .unwrap_or_default();

        let quoted = format!("\"{}\"", label);
        if output.starts_with(&quoted) {
            debug!("Eliding label hint {}", quoted);
            let hint_len = caps.get(0).map(|m| m.end()).unwrap_or(0);
            (&segment[hint_len..], output[quoted.len()..].to_string())
        } else {
            (segment, output)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::segmenter::segment;

    fn merge(code: &str, outputs: &[&str]) -> Result<String, MergeError> {
        let segments = segment(&escape_markup(code), "trace(");
        let outputs: Vec<String> = outputs.iter().map(|s| s.to_string()).collect();
        OutputMerger::new("trace(", ");").merge(&segments, &outputs)
    }

    #[test]
    fn test_label_is_elided_when_output_repeats_it() {
        let html = merge("trace('halve 10', halve(10));", &["\"halve 10\" 5"]).unwrap();
        assert_eq!(html, "halve(10);\n <span class=\"output\">&rarr; 5</span>");
    }

    #[test]
    fn test_label_only_call_is_fully_elided() {
        let html = merge("trace('x', 1+1);", &["\"x\" 2"]).unwrap();
        assert_eq!(html, "1+1;\n <span class=\"output\">&rarr; 2</span>");
    }

    #[test]
    fn test_label_kept_when_output_differs() {
        let html = merge("trace('y', 1+1);", &["2"]).unwrap();
        assert!(html.starts_with("'y', 1+1;"));
        assert!(html.contains("&rarr; 2</span>"));
    }

    #[test]
    fn test_double_quoted_labels_are_recognized() {
        let html = merge("trace(\"f2 3 ->\", f2(3, 4));", &["\"f2 3 ->\" 1,3,2,4"]).unwrap();
        assert_eq!(html, "f2(3, 4);\n <span class=\"output\">&rarr; 1,3,2,4</span>");
    }

    #[test]
    fn test_preamble_and_trailing_code_survive() {
        let html = merge("var a = 1;\ntrace(a);\nnext();", &["1"]).unwrap();
        assert_eq!(
            html,
            "var a = 1;\na;\n <span class=\"output\">&rarr; 1</span>\nnext();"
        );
    }

    #[test]
    fn test_comments_are_wrapped_everywhere() {
        let html = merge("// setup\ntrace(f(2)); // twice\n", &["function"]).unwrap();
        assert_eq!(
            html,
            "<span class=\"comment\">// setup</span>\nf(2);\n <span class=\"output\">&rarr; function</span> \
<span class=\"comment\">// twice</span>\n"
        );
    }

    #[test]
    fn test_outputs_are_escaped() {
        let html = merge("trace(tag);", &["<b>"]).unwrap();
        assert!(html.contains("&rarr; &lt;b&gt;</span>"));
    }

    #[test]
    fn test_segment_and_output_counts_align() {
        let code = "trace(a);\ntrace(b);\ntrace(c);";
        let segments = segment(code, "trace(");
        assert_eq!(segments.len(), 4);
        let outputs = vec!["1".to_string(), "2".to_string(), "3".to_string()];
        assert!(OutputMerger::new("trace(", ");").merge(&segments, &outputs).is_ok());
    }

    #[test]
    fn test_missing_output_is_reported() {
        assert_eq!(
            merge("trace(a);\ntrace(b);", &["1"]),
            Err(MergeError::MissingOutput { index: 1, available: 1 })
        );
    }

    #[test]
    fn test_unused_outputs_are_reported() {
        assert_eq!(
            merge("trace(a);", &["1", "2"]),
            Err(MergeError::UnusedOutputs { unused: 1 })
        );
    }

    #[test]
    fn test_partial_outputs_annotate_leading_call_sites() {
        let segments = segment("trace(a);\ntrace(b);\ntrace(c);", "trace(");
        let outputs = vec!["1".to_string()];
        let html = OutputMerger::new("trace(", ");").merge_available(&segments, &outputs);
        assert_eq!(
            html,
            "a;\n <span class=\"output\">&rarr; 1</span>\ntrace(b);\ntrace(c);"
        );
    }

    #[test]
    fn test_extra_outputs_are_dropped_when_merging_available() {
        let segments = segment("trace(a);", "trace(");
        let outputs = vec!["1".to_string(), "2".to_string()];
        let html = OutputMerger::new("trace(", ");").merge_available(&segments, &outputs);
        assert_eq!(html, "a;\n <span class=\"output\">&rarr; 1</span>");
    }

    #[test]
    fn test_missing_close_token_keeps_whole_segment() {
        let html = merge("trace(a)", &["1"]).unwrap();
        assert_eq!(html, "a);\n <span class=\"output\">&rarr; 1</span>");
    }
}
