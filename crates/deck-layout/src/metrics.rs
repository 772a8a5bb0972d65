//! Per-kind height calculators (spec §4.2). Every function here is a
//! pure `fn(content, available_width, ...) -> f32`, taking no mutable
//! state of its own — the only shared state touched is the font
//! metrics cache, hidden behind `deck_text::text_bbox`.

use deck_core::{Element, ElementContent, ElementKind, EngineConfig, ListItem};
use deck_text::FontMetricsProvider;

/// Resolved typography for a text-bearing element: `(font_size,
/// line_height_multiplier, padding, min_height)`.
pub fn text_typography(element: &Element, config: &EngineConfig) -> (f32, f32, f32, f32) {
    let default_font_size = match element.kind {
        ElementKind::Title => config.title_font_size,
        ElementKind::Subtitle => config.subtitle_font_size,
        _ => config.text_font_size,
    };
    let font_size = element.directives.font_size().unwrap_or(default_font_size);
    let line_height = element
        .directives
        .line_spacing()
        .unwrap_or(config.text_line_height);
    let padding = config.text_padding;
    let min_height = font_size * line_height;
    (font_size, line_height, padding, min_height)
}

/// Height of a Title/Subtitle/Text/Footer element (spec §4.2's first
/// bullet): `text_bbox(...).height + 2*padding`, floored at
/// `min_height`.
pub fn text_height(
    text: &str,
    font_size: f32,
    line_height: f32,
    padding: f32,
    min_height: f32,
    available_width: f32,
    provider: &dyn FontMetricsProvider,
) -> f32 {
    let wrap_width = (available_width - 2.0 * padding).max(0.0);
    let (_, h) = deck_text::text_bbox(provider, text, font_size, Some(wrap_width), line_height);
    (h + 2.0 * padding).max(min_height)
}

/// Height of one list item's own text line, plus its nested children's
/// subtree height (spec §4.2's List bullet). `depth` is the item's
/// nesting depth below the list root, used to shrink its effective
/// width by `indent_per_level * depth`.
pub fn list_item_subtree_height(
    item: &ListItem,
    depth: usize,
    available_width: f32,
    config: &EngineConfig,
    provider: &dyn FontMetricsProvider,
) -> f32 {
    let own_width = (available_width - config.list_indent_per_level * depth as f32).max(1.0);
    let (_, own_height) =
        deck_text::text_bbox(provider, &item.text, config.text_font_size, Some(own_width), config.text_line_height);
    let own_height = own_height + config.list_item_spacing;

    let children_height: f32 = item
        .children
        .iter()
        .map(|child| list_item_subtree_height(child, depth + 1, available_width, config, provider))
        .sum();

    own_height + children_height
}

/// Height of a whole list: the sum of each top-level item's subtree
/// height.
pub fn list_height(
    items: &[ListItem],
    available_width: f32,
    config: &EngineConfig,
    provider: &dyn FontMetricsProvider,
) -> f32 {
    items
        .iter()
        .map(|item| list_item_subtree_height(item, 0, available_width, config, provider))
        .sum()
}

/// Column width shared by every cell in a table laid out at
/// `available_width` (spec §4.2's Table bullet).
pub fn table_column_width(n_cols: usize, available_width: f32, config: &EngineConfig) -> f32 {
    let n_cols = n_cols.max(1);
    ((available_width - config.table_padding) / n_cols as f32).max(1.0)
}

/// Heights of the header row (if headers are non-empty) and of each
/// data row, measured at equal column widths. Shared by the metrics
/// calculator (which sums them) and the leaf-split protocol (which
/// needs a prefix sum to find where to cut).
pub fn table_row_heights(
    headers: &[String],
    rows: &[Vec<String>],
    available_width: f32,
    config: &EngineConfig,
    provider: &dyn FontMetricsProvider,
) -> (Option<f32>, Vec<f32>) {
    let n_cols = headers
        .len()
        .max(rows.iter().map(Vec::len).max().unwrap_or(0))
        .max(1);
    let col_width = table_column_width(n_cols, available_width, config);

    let row_height = |cells: &[String]| -> f32 {
        let tallest = cells
            .iter()
            .map(|cell| {
                let (_, h) = deck_text::text_bbox(
                    provider,
                    cell,
                    config.text_font_size,
                    Some(col_width),
                    config.text_line_height,
                );
                h
            })
            .fold(0.0_f32, f32::max);
        tallest + config.table_cell_padding
    };

    let header_height = if headers.is_empty() {
        None
    } else {
        Some(row_height(headers))
    };
    let row_heights = rows.iter().map(|r| row_height(r)).collect();
    (header_height, row_heights)
}

/// Total table height: header (if any) plus every data row.
pub fn table_height(
    headers: &[String],
    rows: &[Vec<String>],
    available_width: f32,
    config: &EngineConfig,
    provider: &dyn FontMetricsProvider,
) -> f32 {
    let (header_height, row_heights) = table_row_heights(headers, rows, available_width, config, provider);
    header_height.unwrap_or(0.0) + row_heights.iter().sum::<f32>()
}

/// Number of visual (wrapped) lines a source code line of `len_chars`
/// occupies, given `chars_per_line`. An empty line always counts as
/// exactly one visual line.
fn visual_lines_for(len_chars: usize, chars_per_line: usize) -> usize {
    if len_chars == 0 {
        1
    } else {
        (len_chars + chars_per_line - 1) / chars_per_line.max(1)
    }
}

/// Visual line count contributed by each source line of `code`, in
/// order. Used both to sum a code block's total height and, by the
/// split protocol, to find the largest prefix of source lines whose
/// rendered height fits an available height.
pub fn code_visual_line_counts(code: &str, available_width: f32, config: &EngineConfig) -> Vec<usize> {
    let effective_width = (available_width - 16.0).max(1.0);
    let chars_per_line = ((effective_width / config.code_char_width).floor() as usize).max(1);
    code.split('\n')
        .map(|line| visual_lines_for(line.chars().count(), chars_per_line))
        .collect()
}

/// Fixed overhead added on top of the visual-line contribution: top +
/// bottom padding, plus the language label strip when a non-"text"
/// language tag is present.
pub fn code_overhead(language: Option<&str>, config: &EngineConfig) -> f32 {
    let has_label = language
        .map(|lang| !lang.eq_ignore_ascii_case("text"))
        .unwrap_or(false);
    config.code_block_padding + if has_label { config.code_language_label_height } else { 0.0 }
}

/// Total code block height (spec §4.2's Code bullet), floored at
/// `40.0`, with an empty block short-circuiting to `30.0` per
/// `original_source/layout/metrics/code.py`.
pub fn code_height(code: &str, language: Option<&str>, available_width: f32, config: &EngineConfig) -> f32 {
    if code.is_empty() {
        return 30.0;
    }
    let visual_lines: usize = code_visual_line_counts(code, available_width, config).iter().sum();
    let height =
        visual_lines as f32 * config.code_line_height + code_overhead(language, config);
    height.max(40.0)
}

/// Resolves an `Image`'s own `(width, height)`. Images are sized from
/// their own `width`/`height` directives when present, independent of
/// the column's assigned width; absent a directive, they default to
/// half the slide body's corresponding dimension (spec §4.2's Image
/// bullet / SPEC_FULL §4.2). Aspect ratio is never probed.
pub fn image_size(element: &Element, body_width: f32, body_height: f32) -> (f32, f32) {
    let width = element
        .directives
        .width()
        .and_then(|v| v.as_points().or_else(|| v.as_fraction_of(body_width)))
        .unwrap_or(body_width * 0.5);
    let height = element
        .directives
        .height()
        .and_then(|v| v.as_points().or_else(|| v.as_fraction_of(body_height)))
        .unwrap_or(body_height * 0.5);
    (width.max(1.0), height.max(1.0))
}

/// Dispatches on `element.content` to compute the element's height at
/// `available_width`. For `Image`, `available_width`/`available_height`
/// are ignored in favor of `image_size`'s own-directive resolution;
/// callers that need an image's width should call `image_size`
/// directly.
pub fn element_height(
    element: &Element,
    available_width: f32,
    config: &EngineConfig,
    provider: &dyn FontMetricsProvider,
) -> f32 {
    match &element.content {
        ElementContent::Text { text, .. } => {
            let (font_size, line_height, padding, min_height) = text_typography(element, config);
            text_height(text, font_size, line_height, padding, min_height, available_width, provider)
        }
        ElementContent::List { items } => list_height(items, available_width, config, provider),
        ElementContent::Table { headers, rows, .. } => {
            table_height(headers, rows, available_width, config, provider)
        }
        ElementContent::Code { code, language } => {
            code_height(code, language.as_deref(), available_width, config)
        }
        ElementContent::Image { .. } => {
            let (_, h) = image_size(element, available_width, available_width);
            h
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{ElementKind};
    use deck_text::ConservativeMonospaceMetrics;

    fn provider() -> ConservativeMonospaceMetrics {
        ConservativeMonospaceMetrics::default()
    }

    #[test]
    fn text_height_is_floored_at_min_height() {
        let config = EngineConfig::default();
        let element = Element::text(ElementKind::Text, "e1", "hi");
        let (font_size, line_height, padding, min_height) = text_typography(&element, &config);
        let h = text_height("hi", font_size, line_height, padding, min_height, 400.0, &provider());
        assert!(h >= min_height);
    }

    #[test]
    fn code_empty_block_is_30_points() {
        let config = EngineConfig::default();
        assert_eq!(code_height("", None, 300.0, &config), 30.0);
    }

    #[test]
    fn code_height_grows_with_more_lines() {
        let config = EngineConfig::default();
        let one_line = code_height("let x = 1;", Some("rust"), 300.0, &config);
        let five_lines = code_height(
            "let x = 1;\nlet y = 2;\nlet z = 3;\nlet w = 4;\nlet v = 5;",
            Some("rust"),
            300.0,
            &config,
        );
        assert!(five_lines > one_line);
    }

    #[test]
    fn code_language_label_adds_height_over_plain_text() {
        let config = EngineConfig::default();
        let plain = code_height("one line here", Some("text"), 300.0, &config);
        let labeled = code_height("one line here", Some("rust"), 300.0, &config);
        assert!(labeled > plain);
    }

    #[test]
    fn table_height_sums_header_and_rows() {
        let config = EngineConfig::default();
        let headers = vec!["H1".to_string(), "H2".to_string()];
        let rows = vec![
            vec!["a".to_string(), "b".to_string()],
            vec!["c".to_string(), "d".to_string()],
        ];
        let (header_h, row_hs) = table_row_heights(&headers, &rows, 300.0, &config, &provider());
        assert!(header_h.is_some());
        assert_eq!(row_hs.len(), 2);
        let total = table_height(&headers, &rows, 300.0, &config, &provider());
        assert!((total - (header_h.unwrap() + row_hs.iter().sum::<f32>())).abs() < 1e-3);
    }

    #[test]
    fn image_defaults_to_half_body_dimensions() {
        let element = Element::new(
            ElementKind::Image,
            "img1",
            ElementContent::Image { source: None, alt: "x".into() },
        );
        let (w, h) = image_size(&element, 600.0, 400.0);
        assert!((w - 300.0).abs() < 1e-3);
        assert!((h - 200.0).abs() < 1e-3);
    }
}
