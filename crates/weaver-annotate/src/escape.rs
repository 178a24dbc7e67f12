//! Escaping for literal text and attribute values.
//!
//! Thin wrappers over `markdown-weaver-escape`. Text escaping covers `&`, `<`
//! and `>`; attribute escaping adds `"` so values are safe inside double quotes.
//! Everything else, multi-byte characters included, passes through untouched.

use markdown_weaver_escape::{StrWrite, escape_html, escape_html_body_text};

/// Escape `s` for use as markup text content.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    // Writing into a String won't fail
    let _ = escape_html_body_text(&mut out, s);
    out
}

/// Escape `s` for use inside a double-quoted attribute value.
pub fn escape_attribute(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let _ = escape_html(&mut out, s);
    out
}

/// Streaming form of [`escape_text`].
pub fn write_escaped_text<W: StrWrite>(writer: &mut W, s: &str) -> Result<(), W::Error> {
    escape_html_body_text(writer, s)
}

/// Streaming form of [`escape_attribute`].
pub fn write_escaped_attribute<W: StrWrite>(writer: &mut W, s: &str) -> Result<(), W::Error> {
    escape_html(writer, s)
}
