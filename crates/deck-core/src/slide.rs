//! `Slide` and `Deck`: the top-level containers the layout calculator,
//! overflow detector/handler and pagination manager all operate on.

use serde::{Deserialize, Serialize};

use crate::directive::Directives;
use crate::element::{Element, ElementKind};
use crate::section::Section;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub object_id: String,
    pub layout_key: Option<String>,
    /// Flat, traversal-order view of every leaf in `root_section`,
    /// populated by the layout calculator. The calculator never adds
    /// or removes children from `root_section` itself — this list is
    /// derived, not authoritative.
    pub elements: Vec<Element>,
    pub root_section: Section,
    pub title_directives: Directives,
    pub subtitle_directives: Directives,
    pub base_directives: Directives,
    pub is_continuation: bool,
    /// Set by the pagination manager when `MAX_PASSES` is reached
    /// before a terminal state (spec §7's `PaginationGaveUp`, carried
    /// as a flag rather than an error per the non-fatal policy there).
    pub pagination_gave_up: bool,
}

impl Slide {
    pub fn new(object_id: impl Into<String>, root_section: Section) -> Self {
        Self {
            object_id: object_id.into(),
            layout_key: None,
            elements: Vec::new(),
            root_section,
            title_directives: Directives::new(),
            subtitle_directives: Directives::new(),
            base_directives: Directives::new(),
            is_continuation: false,
            pagination_gave_up: false,
        }
    }

    fn meta_element(&self, kind: ElementKind) -> Option<&Element> {
        self.elements.iter().find(|e| e.kind == kind)
    }

    pub fn title(&self) -> Option<&Element> {
        self.meta_element(ElementKind::Title)
    }

    pub fn subtitle(&self) -> Option<&Element> {
        self.meta_element(ElementKind::Subtitle)
    }

    pub fn footer(&self) -> Option<&Element> {
        self.meta_element(ElementKind::Footer)
    }

    /// A subtitle belonging to a slide whose `layout_key` names a layout
    /// that provides a SUBTITLE placeholder must be emitted downstream
    /// as a placeholder insertion rather than a freestanding shape
    /// (spec §6's request-builder contract). The engine only exposes
    /// the boolean; emitting the actual request is out of scope.
    pub fn subtitle_is_placeholder(&self) -> bool {
        self.layout_key.is_some() && self.subtitle().is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub slides: Vec<Slide>,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, slide: Slide) {
        self.slides.push(slide);
    }
}
