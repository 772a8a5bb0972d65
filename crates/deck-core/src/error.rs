//! The error taxonomy from spec §7.
//!
//! `Grammar` and `Programming` are the only variants that ever surface
//! as an `Err` a caller must handle. Two further cases from §7 are
//! deliberately absent as variants here, documented in prose instead:
//! `MeasurementUnavailable` is recovered from internally by
//! `deck-text` (logged via `log::warn!`, never propagated past a font
//! load failure), and `PaginationGaveUp` is never returned at all — it
//! surfaces as `Slide::pagination_gave_up`. Neither has a caller that
//! would ever match on it, so no dead variant is carried for them.

use thiserror::Error;

use crate::section::SectionGrammarViolation;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgrammingError {
    #[error("Element::split invoked on a non-splittable element kind")]
    ImageSplitInvoked,
    #[error("column found outside of a row during layout: {0}")]
    ColumnOutsideRow(String),
    #[error("section nested directly inside another section during layout: {0}")]
    NestedSection(String),
}

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("grammar violation: {0}")]
    Grammar(#[from] SectionGrammarViolation),

    #[error("programming error: {0}")]
    Programming(#[from] ProgrammingError),
}
