use super::comments::CommentRecord;
use super::segmenter::escape_markup;

/// Render one record as API documentation markup
pub fn format_record(record: &CommentRecord) -> String {
    let mut spans = Vec::new();

    if let Some(target) = &record.target {
        spans.push(format!("<span class=\"target\">{}</span>", target));
    }
    spans.push(format!("<span class=\"fname\">{}</span>", record.name));
    if let Some(args) = &record.args {
        spans.push(format!("(<var>{}</var>)", args));
    }
    if let Some(signature) = &record.signature {
        spans.push(format!(
            "<div class=\"signature\"><span class=\"label\">Signature:</span> {}</div>",
            escape_markup(signature)
        ));
    }
    spans.push("<div class=\"description\">".to_string());
    spans.push(record.description.join("<br/>"));
    spans.push("</div>".to_string());
    spans.push("<br/>".to_string());

    spans.concat()
}

/// Render every record, one per line
pub fn format_records(records: &[CommentRecord]) -> String {
    records.iter().map(format_record).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> CommentRecord {
        CommentRecord {
            description: vec!["First.".to_string(), "Second.".to_string()],
            target: None,
            name: "add".to_string(),
            args: Some("a, b".to_string()),
            signature: None,
        }
    }

    #[test]
    fn test_format_minimal_record() {
        assert_eq!(
            format_record(&record()),
            "<span class=\"fname\">add</span>(<var>a, b</var>)\
<div class=\"description\">First.<br/>Second.</div><br/>"
        );
    }

    #[test]
    fn test_format_full_record_in_fixed_order() {
        let mut rec = record();
        rec.target = Some("list.".to_string());
        rec.signature = Some("(a, b) -> a<b>".to_string());

        let html = format_record(&rec);
        let target = html.find("class=\"target\">list.</span>").unwrap();
        let fname = html.find("class=\"fname\"").unwrap();
        let args = html.find("(<var>").unwrap();
        let signature = html.find("Signature:</span> (a, b) -&gt; a&lt;b&gt;</div>").unwrap();
        let description = html.find("class=\"description\"").unwrap();

        assert!(target < fname && fname < args && args < signature && signature < description);
    }

    #[test]
    fn test_variable_has_no_parentheses() {
        let mut rec = record();
        rec.args = None;
        assert!(!format_record(&rec).contains("(<var>"));
    }

    #[test]
    fn test_format_records_joins_with_newlines() {
        let html = format_records(&[record(), record()]);
        assert_eq!(html.matches('\n').count(), 1);
    }
}
