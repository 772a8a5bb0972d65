//! Geometry, directive, element/section/slide data model and error
//! taxonomy shared by the MarkdownDeck layout engine crates.
//!
//! This crate has no layout logic of its own — it is the contract the
//! (out-of-scope) parser produces and the layout engine consumes and
//! mutates in place as it lays out and paginates a slide.

pub mod config;
pub mod directive;
pub mod element;
pub mod error;
pub mod geometry;
pub mod placeholder;
pub mod section;
pub mod slide;

pub use config::{EngineConfig, OverflowStrategy};
pub use directive::{ColorValue, DirectiveValue, Directives, HorizontalAlign, WidthMode};
pub use element::{Element, ElementContent, ElementKind, FormattingRun, ListItem};
pub use error::{DeckError, ProgrammingError};
pub use geometry::{EdgeInsets, LogicalPosition, LogicalRect, LogicalSize};
pub use placeholder::placeholder_image_url;
pub use section::{Node, Section, SectionGrammarViolation, SectionKind};
pub use slide::{Deck, Slide};
