//! Transport decoding and HTML-to-text conversion.
//!
//! Line structure matters downstream: card-style notifications are parsed
//! line by line, and the `·` glyph separates role from company/location, so
//! it survives cleanup while decorative glyphs do not.

use std::sync::OnceLock;

use base64::Engine;
use regex::Regex;

// Compile-once regex patterns via OnceLock.
fn re_soft_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"=\r?\n").unwrap())
}

fn re_qp_escape() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"=([0-9A-Fa-f]{2})").unwrap())
}

fn re_br() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<br\s*/?>").unwrap())
}

fn re_block_close() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)</(?:p|div|li|tr|table|h[1-6])>").unwrap())
}

fn re_script() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<script.*?</script>").unwrap())
}

fn re_style() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<style.*?</style>").unwrap())
}

fn re_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").unwrap())
}

fn re_hspace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t]+").unwrap())
}

fn re_blank_lines() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{2,}").unwrap())
}

fn re_glyphs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // bullet/arrow glyphs stripped from lines; `·` is NOT here on purpose
    RE.get_or_init(|| Regex::new(r"[|•▶︎▸]+").unwrap())
}

fn re_whitespace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// Decode a transport-encoded body chunk to UTF-8 text.
///
/// Gmail delivers URL-safe base64 without padding; padded and standard
/// alphabets are accepted too. If the decoded text still carries
/// quoted-printable residue (`=0A`, `=3D`, soft line breaks), that layer is
/// decoded as well. Malformed input yields an empty string, never an error.
pub fn decode_transport(data: &str) -> String {
    use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};

    let trimmed = data.trim();
    let bytes = match URL_SAFE_NO_PAD.decode(trimmed.trim_end_matches('=')) {
        Ok(b) => b,
        Err(_) => match STANDARD.decode(trimmed) {
            Ok(b) => b,
            Err(_) => return String::new(),
        },
    };

    let text = String::from_utf8_lossy(&bytes).into_owned();
    if looks_quoted_printable(&text) {
        decode_quoted_printable(&text)
    } else {
        text
    }
}

/// Whether a decoded body still contains quoted-printable escapes.
pub fn looks_quoted_printable(s: &str) -> bool {
    s.contains("=0A") || s.contains("=3D") || re_soft_break().is_match(s)
}

/// Decode quoted-printable escapes: soft line breaks removed, `=XX` hex
/// escapes replaced by the byte they encode.
pub fn decode_quoted_printable(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }
    let joined = re_soft_break().replace_all(input, "");
    re_qp_escape()
        .replace_all(&joined, |caps: &regex::Captures| {
            let byte = u8::from_str_radix(&caps[1], 16).unwrap_or(b'?');
            char::from(byte).to_string()
        })
        .into_owned()
}

/// Convert HTML to line-aware plain text.
///
/// `<br>` and closing block tags become newlines before the remaining tags
/// are stripped, so paragraph structure survives for the line-based
/// heuristics downstream.
pub fn html_to_text(html: &str) -> String {
    let s = re_br().replace_all(html, "\n");
    let s = re_block_close().replace_all(&s, "\n");
    let s = re_script().replace_all(&s, " ");
    let s = re_style().replace_all(&s, " ");
    let s = re_tag().replace_all(&s, " ");
    let s = s.replace("&nbsp;", " ");
    let s = s.replace("&amp;", "&").replace("&lt;", "<").replace("&gt;", ">");
    let s = re_hspace().replace_all(&s, " ");
    let s = re_blank_lines().replace_all(&s, "\n");
    s.trim().to_string()
}

/// Trim a line, collapse internal whitespace and strip decorative glyphs.
/// The `·` separator is preserved: it delimits role from company/location
/// in card-style notifications.
pub fn clean_line(s: &str) -> String {
    let s = re_glyphs().replace_all(s, " ");
    let s = re_whitespace().replace_all(&s, " ");
    s.trim().to_string()
}

/// Split text into cleaned, non-empty lines.
pub fn split_lines(text: &str) -> Vec<String> {
    text.replace('\r', "")
        .split('\n')
        .map(clean_line)
        .filter(|l| !l.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};

    #[test]
    fn test_decode_transport_unpadded() {
        let data = URL_SAFE_NO_PAD.encode("Hello, Bewerbung!");
        assert_eq!(decode_transport(&data), "Hello, Bewerbung!");
    }

    #[test]
    fn test_decode_transport_padded() {
        let data = URL_SAFE.encode("padded body");
        assert_eq!(decode_transport(&data), "padded body");
    }

    #[test]
    fn test_decode_transport_malformed_is_empty() {
        assert_eq!(decode_transport("!!not base64!!"), "");
        assert_eq!(decode_transport(""), "");
    }

    #[test]
    fn test_decode_transport_handles_quoted_printable_layer() {
        let qp = "Thank you =\r\nfor applying=0A";
        let data = URL_SAFE_NO_PAD.encode(qp);
        assert_eq!(decode_transport(&data), "Thank you for applying\n");
    }

    #[test]
    fn test_decode_quoted_printable_escapes() {
        assert_eq!(decode_quoted_printable("a=3Db"), "a=b");
        assert_eq!(decode_quoted_printable("line=\nwrap"), "linewrap");
        assert_eq!(decode_quoted_printable(""), "");
    }

    #[test]
    fn test_html_to_text_keeps_paragraphs_as_lines() {
        let lines = split_lines(&html_to_text("<p>Hello</p><p>World</p>"));
        assert_eq!(lines, vec!["Hello".to_string(), "World".to_string()]);
    }

    #[test]
    fn test_html_to_text_br_and_entities() {
        let text = html_to_text("Tom&nbsp;&amp;&nbsp;Jerry<br>Second &lt;line&gt;");
        let lines = split_lines(&text);
        assert_eq!(lines, vec!["Tom & Jerry".to_string(), "Second <line>".to_string()]);
    }

    #[test]
    fn test_html_to_text_drops_script_and_style() {
        let text = html_to_text(
            "<style>p { color: red; }</style><p>Visible</p><script>alert('x')</script>",
        );
        assert_eq!(text, "Visible");
    }

    #[test]
    fn test_clean_line_preserves_middle_dot() {
        assert_eq!(clean_line("  Acme Corp · Berlin  "), "Acme Corp · Berlin");
        assert_eq!(clean_line("• View | job ▸"), "View job");
    }

    #[test]
    fn test_split_lines_drops_empty() {
        let lines = split_lines("one\r\n\r\n  two  \n\n");
        assert_eq!(lines, vec!["one".to_string(), "two".to_string()]);
    }
}
