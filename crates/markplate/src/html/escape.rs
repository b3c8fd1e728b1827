//! HTML escaping.

/// Appends `text` to `out`, escaping `&`, `<`, `>` and `"`.
pub fn escape_html(out: &mut String, text: &str) {
    let mut last = 0;
    for (i, b) in text.bytes().enumerate() {
        let replacement = match b {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            _ => continue,
        };
        out.push_str(&text[last..i]);
        out.push_str(replacement);
        last = i + 1;
    }
    out.push_str(&text[last..]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escaped(text: &str) -> String {
        let mut out = String::new();
        escape_html(&mut out, text);
        out
    }

    #[test]
    fn test_escape_specials() {
        assert_eq!(escaped(r#"<a href="x">&</a>"#), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    }

    #[test]
    fn test_escape_passthrough() {
        assert_eq!(escaped("plain text, ünïcode"), "plain text, ünïcode");
        assert_eq!(escaped(""), "");
    }

    #[test]
    fn test_escape_appends() {
        let mut out = String::from("x");
        escape_html(&mut out, "<");
        assert_eq!(out, "x&lt;");
    }
}
