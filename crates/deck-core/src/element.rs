//! Leaf element model: the tagged sum type described in spec §3's
//! element table, plus the recursive list-item tree nested lists need.

use serde::{Deserialize, Serialize};

use crate::directive::Directives;
use crate::geometry::{LogicalPosition, LogicalSize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    Title,
    Subtitle,
    Text,
    BulletList,
    OrderedList,
    Table,
    Code,
    Image,
    Footer,
}

impl ElementKind {
    /// Whether the overflow handler may invoke `split_leaf` on an
    /// element of this kind. `Image` and `Footer` are the two
    /// non-splittable kinds named in spec §3/§4.5.
    pub fn is_splittable(&self) -> bool {
        !matches!(self, ElementKind::Image | ElementKind::Footer)
    }

    pub fn is_text_like(&self) -> bool {
        matches!(
            self,
            ElementKind::Title | ElementKind::Subtitle | ElementKind::Text | ElementKind::Footer
        )
    }
}

/// One inline formatting run over a `[start, end)` byte range of the
/// owning text's string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattingRun {
    pub start: usize,
    pub end: usize,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

/// One item of a `BulletList`/`OrderedList`, recursively nestable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    pub text: String,
    pub runs: Vec<FormattingRun>,
    pub directives: Directives,
    pub children: Vec<ListItem>,
}

impl ListItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            runs: Vec::new(),
            directives: Directives::new(),
            children: Vec::new(),
        }
    }

    /// Depth of the deepest nested child, 0 for a leaf item.
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|c| 1 + c.depth())
            .max()
            .unwrap_or(0)
    }
}

/// Kind-specific payload of an `Element`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElementContent {
    /// Shared by Title / Subtitle / Text / Footer, per spec §3's table.
    Text {
        text: String,
        runs: Vec<FormattingRun>,
        heading_level: Option<u8>,
    },
    List {
        items: Vec<ListItem>,
    },
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
        /// One entry per retained data row (post directive-only-row
        /// merge, which is a parser-side concern — see SPEC_FULL §3).
        row_directives: Vec<Directives>,
    },
    Code {
        code: String,
        language: Option<String>,
    },
    Image {
        source: Option<String>,
        alt: String,
    },
}

/// A leaf element. Every kind shares the common attributes from spec §3:
/// an object id, optional position/size, a directives map, and the
/// `overflow_moved` circuit-breaker flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub kind: ElementKind,
    pub object_id: String,
    pub position: Option<LogicalPosition>,
    pub size: Option<LogicalSize>,
    pub directives: Directives,
    pub overflow_moved: bool,
    pub content: ElementContent,
}

impl Element {
    pub fn new(kind: ElementKind, object_id: impl Into<String>, content: ElementContent) -> Self {
        Self {
            kind,
            object_id: object_id.into(),
            position: None,
            size: None,
            directives: Directives::new(),
            overflow_moved: false,
            content,
        }
    }

    pub fn text(kind: ElementKind, object_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(
            kind,
            object_id,
            ElementContent::Text {
                text: text.into(),
                runs: Vec::new(),
                heading_level: None,
            },
        )
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.content {
            ElementContent::Text { text, .. } => Some(text.as_str()),
            _ => None,
        }
    }

    /// Every text-bearing shape must be emitted non-autofit downstream
    /// (spec §6's request-builder contract). The engine does not emit
    /// requests, but exposes the fact for the (out-of-scope) builder.
    pub fn requires_explicit_no_autofit(&self) -> bool {
        self.kind.is_text_like()
    }

    /// A hosted placeholder URL for an `Image` with no `source` set, at
    /// its laid-out pixel dimensions. Returns `None` for a non-`Image`
    /// element, or an `Image` that already has a source.
    pub fn placeholder_url(&self) -> Option<String> {
        match &self.content {
            ElementContent::Image { source: None, alt } => {
                let size = self.size.unwrap_or(crate::geometry::LogicalSize::new(320.0, 180.0));
                Some(crate::placeholder::placeholder_image_url(
                    size.width.round() as u32,
                    size.height.round() as u32,
                    alt,
                ))
            }
            _ => None,
        }
    }
}
