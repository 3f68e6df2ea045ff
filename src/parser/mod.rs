//! SVG Parser
//!
//! Thin layer over `roxmltree`: repairs the one known entity typo,
//! parses the XML and extracts graphic elements into owned data.

pub mod ast;
pub mod markup;

use std::borrow::Cow;
use std::fmt;

pub use ast::{Element, ElementKind, SvgTree, TextPosition};

/// Malformed entity that authoring tools emit instead of `&quot;`
pub const MALFORMED_QUOTE_ENTITY: &str = "&quote";

/// XML syntax error reported by the parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    /// 1-based position of the error
    pub position: TextPosition,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ParseError {}

impl From<roxmltree::Error> for ParseError {
    fn from(err: roxmltree::Error) -> Self {
        let pos = err.pos();
        Self {
            message: err.to_string(),
            position: TextPosition {
                line: pos.row,
                column: pos.col,
            },
        }
    }
}

/// Replace every literal `&quote` with a double quote.
///
/// Best-effort repair only; no other entity is touched. Line breaks are
/// never added or removed, so line numbers survive the rewrite.
pub fn normalize_entities(text: &str) -> Cow<'_, str> {
    if text.contains(MALFORMED_QUOTE_ENTITY) {
        Cow::Owned(text.replace(MALFORMED_QUOTE_ENTITY, "\""))
    } else {
        Cow::Borrowed(text)
    }
}

/// Parse XML text and collect every graphic element.
///
/// Elements are matched on their qualified name, so `svg:rect` is not a
/// `rect`. Unknown tags are skipped.
pub fn parse_document(text: &str) -> Result<SvgTree, ParseError> {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    let doc = roxmltree::Document::parse_with_options(text, options)?;

    let mut tree = SvgTree::new();
    for node in doc.descendants().filter(|n| n.is_element()) {
        let range = node.range();
        let opening = markup::opening_tag(text, range.start);
        let Some(kind) = ElementKind::from_tag_name(markup::qualified_name(opening)) else {
            continue;
        };

        let attributes = node
            .attributes()
            .filter(|attr| attr.namespace().is_none())
            .map(|attr| (attr.name().to_string(), attr.value().to_string()))
            .collect();

        let pos = doc.text_pos_at(range.start);
        tree.push(Element {
            kind,
            attributes,
            opening_tag: opening.to_string(),
            snippet: text[range].to_string(),
            position: TextPosition {
                line: pos.row,
                column: pos.col,
            },
        });
    }

    log::trace!("parsed {} graphic elements", tree.len());
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_replaces_only_the_typo() {
        let text = r#"<text>a &quote b &quot; c</text>"#;
        assert_eq!(normalize_entities(text), r#"<text>a " b &quot; c</text>"#);
        assert!(matches!(normalize_entities("<svg/>"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_parse_collects_graphic_elements() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg">
  <g id="layer">
    <rect id="r1" data-zoneid="z1"/>
    <path id="p1" d="M0 0"><title>outline</title></path>
  </g>
  <text>ignored</text>
</svg>"#;

        let tree = parse_document(svg).expect("valid svg");
        assert_eq!(tree.len(), 2);

        let rect = &tree.elements_of(ElementKind::Rect)[0];
        assert_eq!(rect.attribute("data-zoneid"), Some("z1"));
        assert_eq!(rect.opening_tag, r#"<rect id="r1" data-zoneid="z1"/>"#);
        assert_eq!(rect.position, TextPosition { line: 3, column: 5 });

        let path = &tree.elements_of(ElementKind::Path)[0];
        assert_eq!(
            path.snippet,
            r#"<path id="p1" d="M0 0"><title>outline</title></path>"#
        );
        assert_eq!(path.opening_tag, r#"<path id="p1" d="M0 0">"#);
    }

    #[test]
    fn test_parse_skips_prefixed_elements_and_attributes() {
        let svg = r#"<svg xmlns:x="urn:x"><x:rect/><rect x:data-zoneid="a"/></svg>"#;
        let tree = parse_document(svg).expect("valid svg");
        let rects = tree.elements_of(ElementKind::Rect);
        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0].attribute("data-zoneid"), None);
    }

    #[test]
    fn test_parse_decodes_entities_in_values() {
        let svg = r#"<svg><circle data-zoneid="a&amp;quote"/></svg>"#;
        let tree = parse_document(svg).expect("valid svg");
        let circle = &tree.elements_of(ElementKind::Circle)[0];
        assert_eq!(circle.attribute("data-zoneid"), Some("a&quote"));
    }

    #[test]
    fn test_parse_error_reports_position() {
        let err = parse_document("<svg>\n<rect>\n</svg>").unwrap_err();
        assert!(!err.message.is_empty());
        assert!(err.position.line >= 2);
    }

    #[test]
    fn test_parse_allows_doctype() {
        let svg = r#"<?xml version="1.0"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">
<svg><line/></svg>"#;
        let tree = parse_document(svg).expect("doctype accepted");
        assert_eq!(tree.elements_of(ElementKind::Line).len(), 1);
    }
}
