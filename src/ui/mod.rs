// HTML rendering for pages and widgets.
// Every widget is a pure function of its inputs; the navbar's menu flag is
// the only state kept here.

pub mod correction;
pub mod footer;
pub mod navbar;
pub mod pages;
pub mod prediction;

/// Escape text for use in HTML element content and quoted attribute values
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("Tadasana"), "Tadasana");
        assert_eq!(
            escape(r#"<b>"back" & 'arms'</b>"#),
            "&lt;b&gt;&quot;back&quot; &amp; &#39;arms&#39;&lt;/b&gt;"
        );
    }
}
