/// Escape text for inclusion in HTML markup.
///
/// Only `&`, `<` and `>` are escaped. Quotes survive so that label hints in
/// the code still compare equal to the quoted strings in captured output.
pub fn escape_markup(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Split escaped code at every occurrence of the trace marker.
///
/// Returns one more segment than there are markers; the first is the
/// preamble before any trace call.
pub fn segment(markup: &str, trace_marker: &str) -> Vec<String> {
    if trace_marker.is_empty() {
        return vec![markup.to_string()];
    }
    markup.split(trace_marker).map(str::to_string).collect()
}
