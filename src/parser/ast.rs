//! Parsed SVG Structure
//!
//! Owned, minimal types for the graphic elements pulled out of an SVG
//! document. No validation logic here - pure data representation.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Graphic element kinds subject to attribute validation.
///
/// Declaration order is the scan order used by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Path,
    Polygon,
    Rect,
    Circle,
    Ellipse,
    Line,
    Polyline,
}

impl ElementKind {
    pub const ALL: [ElementKind; 7] = [
        ElementKind::Path,
        ElementKind::Polygon,
        ElementKind::Rect,
        ElementKind::Circle,
        ElementKind::Ellipse,
        ElementKind::Line,
        ElementKind::Polyline,
    ];

    /// Tag name as written in markup
    pub fn tag_name(self) -> &'static str {
        match self {
            ElementKind::Path => "path",
            ElementKind::Polygon => "polygon",
            ElementKind::Rect => "rect",
            ElementKind::Circle => "circle",
            ElementKind::Ellipse => "ellipse",
            ElementKind::Line => "line",
            ElementKind::Polyline => "polyline",
        }
    }

    /// Exact, case-sensitive lookup by qualified tag name
    pub fn from_tag_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag_name() == name)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag_name())
    }
}

/// 1-based row and column of an element's `<` in the parsed text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextPosition {
    pub line: u32,
    pub column: u32,
}

/// A graphic element extracted from the document
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub kind: ElementKind,
    /// Unprefixed attributes in source order
    pub attributes: Vec<(String, String)>,
    /// Full source markup of the element, children included
    pub snippet: String,
    /// Start tag markup, from `<` through the closing `>` or `/>`
    pub opening_tag: String,
    pub position: TextPosition,
}

impl Element {
    /// Value of an unprefixed attribute, if present
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value.as_str())
    }

    /// `id` attribute, used for labelling in editors
    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }
}

/// Graphic elements of a document, grouped by kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SvgTree {
    elements: BTreeMap<ElementKind, Vec<Element>>,
}

impl SvgTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, element: Element) {
        self.elements.entry(element.kind).or_default().push(element);
    }

    /// Elements of one kind, in document order
    pub fn elements_of(&self, kind: ElementKind) -> &[Element] {
        self.elements.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All elements, kind by kind in scan order
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        ElementKind::ALL
            .into_iter()
            .flat_map(move |kind| self.elements_of(kind).iter())
    }

    /// All elements in document order, regardless of kind
    pub fn in_document_order(&self) -> Vec<&Element> {
        let mut all: Vec<&Element> = self.iter().collect();
        all.sort_by_key(|e| (e.position.line, e.position.column));
        all
    }

    pub fn len(&self) -> usize {
        self.elements.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
