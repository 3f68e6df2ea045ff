//! Raw Markup Helpers
//!
//! Small scanners over the source text of an already well-formed
//! document. They never validate; the XML parser has done that.

/// Slice the start tag beginning at byte offset `start` (which must point at `<`).
///
/// Quoted attribute values may contain `>`, so quotes are tracked.
pub fn opening_tag(text: &str, start: usize) -> &str {
    let rest = &text[start..];
    let mut quote: Option<u8> = None;

    for (i, b) in rest.bytes().enumerate() {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'>') => return &rest[..=i],
            (None, _) => {}
        }
    }

    rest
}

/// Qualified tag name of a start tag, prefix included (`svg:rect`)
pub fn qualified_name(tag: &str) -> &str {
    let name = tag.strip_prefix('<').unwrap_or(tag);
    let end = name
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .unwrap_or(name.len());
    &name[..end]
}
