//! Plain-text body extraction from the MIME tree.
//!
//! Depth-first traversal collecting every `text/plain` and (stripped)
//! `text/html` leaf in order. When no text leaf is found the first
//! data-bearing leaf is used as a last resort, so attachment-only or
//! oddly-typed single-part messages still yield something. Never fails.

use crate::message::MimePart;

use super::text;

/// Extract one newline-joined plain-text representation of the message.
pub fn extract_body_text(root: Option<&MimePart>) -> String {
    let Some(root) = root else {
        return String::new();
    };

    let mut texts: Vec<String> = Vec::new();
    collect_text(root, &mut texts);

    if texts.is_empty() {
        if let Some((mime_type, data)) = first_data_leaf(root) {
            texts.push(decode_leaf(mime_type, data));
        }
    }

    texts.join("\n").trim().to_string()
}

fn collect_text(part: &MimePart, out: &mut Vec<String>) {
    match part {
        MimePart::Leaf { mime_type, data } => {
            if !data.is_empty()
                && (mime_type.starts_with("text/plain") || mime_type.starts_with("text/html"))
            {
                out.push(decode_leaf(mime_type, data));
            }
        }
        MimePart::Composite { parts } => {
            for child in parts {
                collect_text(child, out);
            }
        }
    }
}

/// First leaf carrying any body data, in traversal order.
fn first_data_leaf(part: &MimePart) -> Option<(&str, &str)> {
    match part {
        MimePart::Leaf { mime_type, data } => {
            if data.is_empty() {
                None
            } else {
                Some((mime_type.as_str(), data.as_str()))
            }
        }
        MimePart::Composite { parts } => parts.iter().find_map(first_data_leaf),
    }
}

fn decode_leaf(mime_type: &str, data: &str) -> String {
    let raw = text::decode_transport(data);
    if mime_type.starts_with("text/html") {
        text::html_to_text(&raw)
    } else {
        raw
    }
}
