//! Leaf split protocol (spec §4.5): given a leaf and an available
//! height, produce a fitted prefix and an overflow remainder.
//!
//! `ElementKind::is_splittable()` is the single source of truth the
//! handler consults before ever reaching this module; calling
//! [`split_leaf`] on a non-splittable kind directly is the one
//! documented misuse that returns `ProgrammingError::ImageSplitInvoked`
//! (spec §4.5's "Image: split must raise a programming-error signal").

use deck_core::{
    Element, ElementContent, EngineConfig, ListItem, ProgrammingError,
};
use deck_text::FontMetricsProvider;

use crate::metrics;

/// Outcome of attempting to split one leaf at `available_height`.
///
/// - `fitted: None, overflow: Some(_)` — nothing meaningful fit; the
///   whole (unchanged) element is the overflow.
/// - `fitted: Some(_), overflow: None` — the element already fit
///   entirely; no split was necessary.
/// - `fitted: Some(_), overflow: Some(_)` — a genuine split; both
///   halves carry fresh object ids per spec §4.5.
pub struct SplitAttempt {
    pub fitted: Option<Element>,
    pub overflow: Option<Element>,
}

impl SplitAttempt {
    fn whole_overflows(element: &Element) -> Self {
        Self { fitted: None, overflow: Some(element.clone()) }
    }

    fn whole_fits(element: &Element) -> Self {
        Self { fitted: Some(element.clone()), overflow: None }
    }
}

fn fitted_id(original: &str) -> String {
    format!("{original}-fit")
}

fn overflow_id(original: &str) -> String {
    format!("{original}-overflow")
}

/// Attempts to split `element` so its fitted part's height is at most
/// `available_height`. Returns `Err` only for the non-splittable kinds
/// (spec §4.5); callers are expected to have already checked
/// `element.kind.is_splittable()` via the overflow handler.
pub fn split_leaf(
    element: &Element,
    available_height: f32,
    config: &EngineConfig,
    provider: &dyn FontMetricsProvider,
) -> Result<SplitAttempt, ProgrammingError> {
    if !element.kind.is_splittable() {
        return Err(ProgrammingError::ImageSplitInvoked);
    }

    match &element.content {
        ElementContent::Text { .. } => Ok(split_text(element, available_height, config, provider)),
        ElementContent::List { items } => Ok(split_list(element, items, available_height, config, provider)),
        ElementContent::Table { headers, rows, row_directives } => {
            Ok(split_table(element, headers, rows, row_directives, available_height, config, provider))
        }
        ElementContent::Code { code, language } => {
            Ok(split_code(element, code, language.as_deref(), available_height, config))
        }
        ElementContent::Image { .. } => unreachable!("Image is not splittable, checked above"),
    }
}

fn split_text(
    element: &Element,
    available_height: f32,
    config: &EngineConfig,
    provider: &dyn FontMetricsProvider,
) -> SplitAttempt {
    let (font_size, line_height, padding, min_height) = metrics::text_typography(element, config);
    let width = element.size.map(|s| s.width).unwrap_or(0.0);
    let text = element.as_text().unwrap_or("").to_string();

    let wrap_width = (width - 2.0 * padding).max(0.0);
    let wrapped = deck_text::wrap_lines(provider, &text, font_size, Some(wrap_width));
    let line_height_px = font_size * line_height;
    let usable = (available_height - 2.0 * padding).max(0.0);
    let max_lines = if line_height_px > 0.0 {
        (usable / line_height_px).floor() as usize
    } else {
        0
    };
    let total_lines = wrapped.lines.len().max(1);

    if max_lines == 0 {
        return SplitAttempt::whole_overflows(element);
    }
    if max_lines >= total_lines {
        return SplitAttempt::whole_fits(element);
    }

    let split_byte = wrapped.lines[max_lines - 1].end;
    let fitted_text = text[..split_byte].trim_end().to_string();
    let overflow_text = text[split_byte..].trim_start().to_string();

    let mut fitted = element.clone();
    fitted.object_id = fitted_id(&element.object_id);
    let fitted_height = metrics::text_height(&fitted_text, font_size, line_height, padding, min_height, width, provider);
    fitted.size = Some(deck_core::LogicalSize::new(width, fitted_height));
    fitted.position = None;
    if let ElementContent::Text { text, .. } = &mut fitted.content {
        *text = fitted_text;
    }

    let mut overflow = element.clone();
    overflow.object_id = overflow_id(&element.object_id);
    overflow.position = None;
    overflow.size = None;
    if let ElementContent::Text { text, .. } = &mut overflow.content {
        *text = overflow_text;
    }

    SplitAttempt { fitted: Some(fitted), overflow: Some(overflow) }
}

fn split_list(
    element: &Element,
    items: &[ListItem],
    available_height: f32,
    config: &EngineConfig,
    provider: &dyn FontMetricsProvider,
) -> SplitAttempt {
    let width = element.size.map(|s| s.width).unwrap_or(0.0);

    let mut cumulative = 0.0_f32;
    let mut split_at = items.len();
    for (i, item) in items.iter().enumerate() {
        let h = metrics::list_item_subtree_height(item, 0, width, config, provider);
        if cumulative + h > available_height {
            split_at = i;
            break;
        }
        cumulative += h;
    }

    if split_at == 0 {
        return SplitAttempt::whole_overflows(element);
    }
    if split_at == items.len() {
        return SplitAttempt::whole_fits(element);
    }

    let (fitted_items, overflow_items) = items.split_at(split_at);

    let mut fitted = element.clone();
    fitted.object_id = fitted_id(&element.object_id);
    fitted.position = None;
    if let ElementContent::List { items } = &mut fitted.content {
        *items = fitted_items.to_vec();
    }
    let fitted_height = metrics::list_height(fitted_items, width, config, provider);
    fitted.size = Some(deck_core::LogicalSize::new(width, fitted_height));

    let mut overflow = element.clone();
    overflow.object_id = overflow_id(&element.object_id);
    overflow.position = None;
    overflow.size = None;
    if let ElementContent::List { items } = &mut overflow.content {
        *items = overflow_items.to_vec();
    }

    SplitAttempt { fitted: Some(fitted), overflow: Some(overflow) }
}

fn split_table(
    element: &Element,
    headers: &[String],
    rows: &[Vec<String>],
    row_directives: &[deck_core::Directives],
    available_height: f32,
    config: &EngineConfig,
    provider: &dyn FontMetricsProvider,
) -> SplitAttempt {
    let width = element.size.map(|s| s.width).unwrap_or(0.0);
    let (header_height, row_heights) = metrics::table_row_heights(headers, rows, width, config, provider);
    let header_h = header_height.unwrap_or(0.0);

    let mut cumulative = header_h;
    let mut split_at = rows.len();
    for (i, h) in row_heights.iter().enumerate() {
        if cumulative + h > available_height {
            split_at = i;
            break;
        }
        cumulative += h;
    }

    // Per spec §4.5: if fewer than one data row fits alongside the
    // (possibly duplicated) header, escalate by returning "nothing fits".
    if split_at == 0 {
        return SplitAttempt::whole_overflows(element);
    }
    if split_at == rows.len() {
        return SplitAttempt::whole_fits(element);
    }

    let fitted_rows = rows[..split_at].to_vec();
    let overflow_rows = rows[split_at..].to_vec();
    let fitted_directives = row_directives.get(..split_at).unwrap_or(&[]).to_vec();
    let overflow_directives = row_directives.get(split_at..).unwrap_or(&[]).to_vec();

    let mut fitted = element.clone();
    fitted.object_id = fitted_id(&element.object_id);
    fitted.position = None;
    if let ElementContent::Table { rows, row_directives, .. } = &mut fitted.content {
        *rows = fitted_rows.clone();
        *row_directives = fitted_directives;
    }
    let fitted_height = metrics::table_height(headers, &fitted_rows, width, config, provider);
    fitted.size = Some(deck_core::LogicalSize::new(width, fitted_height));

    // The overflow part duplicates the header (spec §4.5: "the overflow
    // part must duplicate the header").
    let mut overflow = element.clone();
    overflow.object_id = overflow_id(&element.object_id);
    overflow.position = None;
    overflow.size = None;
    if let ElementContent::Table { rows, row_directives, .. } = &mut overflow.content {
        *rows = overflow_rows;
        *row_directives = overflow_directives;
    }

    SplitAttempt { fitted: Some(fitted), overflow: Some(overflow) }
}

fn split_code(
    element: &Element,
    code: &str,
    language: Option<&str>,
    available_height: f32,
    config: &EngineConfig,
) -> SplitAttempt {
    let width = element.size.map(|s| s.width).unwrap_or(0.0);
    let overhead = metrics::code_overhead(language, config);
    let visual_counts = metrics::code_visual_line_counts(code, width, config);
    let source_lines: Vec<&str> = code.split('\n').collect();

    let mut cumulative_visual = 0usize;
    let mut split_at = source_lines.len();
    for (i, count) in visual_counts.iter().enumerate() {
        let candidate_height = (cumulative_visual + count) as f32 * config.code_line_height + overhead;
        if candidate_height > available_height {
            split_at = i;
            break;
        }
        cumulative_visual += count;
    }

    if split_at == 0 {
        return SplitAttempt::whole_overflows(element);
    }
    if split_at == source_lines.len() {
        return SplitAttempt::whole_fits(element);
    }

    let fitted_code = source_lines[..split_at].join("\n");
    let overflow_code = source_lines[split_at..].join("\n");

    let mut fitted = element.clone();
    fitted.object_id = fitted_id(&element.object_id);
    fitted.position = None;
    if let ElementContent::Code { code, .. } = &mut fitted.content {
        *code = fitted_code.clone();
    }
    let fitted_height = metrics::code_height(&fitted_code, language, width, config);
    fitted.size = Some(deck_core::LogicalSize::new(width, fitted_height));

    let mut overflow = element.clone();
    overflow.object_id = overflow_id(&element.object_id);
    overflow.position = None;
    overflow.size = None;
    if let ElementContent::Code { code, .. } = &mut overflow.content {
        *code = overflow_code;
    }

    SplitAttempt { fitted: Some(fitted), overflow: Some(overflow) }
}
