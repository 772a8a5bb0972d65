//! Font-metrics text measurement and greedy line wrapping.
//!
//! This crate owns everything the layout calculator needs to ask "how
//! big is this text": a pluggable [`font::FontMetricsProvider`], the
//! greedy wrapper in [`wrap`], and the process-wide memoizing
//! [`cache`] that makes repeated `text_bbox` calls during pagination
//! cheap.

pub mod cache;
pub mod font;
pub mod wrap;

pub use font::{load_or_fallback, ConservativeMonospaceMetrics, FontLoadError, FontMetricsProvider, TtfFontMetricsProvider};
pub use wrap::{text_bbox, wrap_lines, WrappedLine, WrappedText};
