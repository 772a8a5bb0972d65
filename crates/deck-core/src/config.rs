//! `EngineConfig`: the configuration surface enumerated in spec §9,
//! expanded with the zone-height/spacing constants spec §4.3 calls
//! "Constants" — in this reimplementation they're configuration, not
//! magic numbers, so a host can tune them without forking the engine.

use serde::{Deserialize, Serialize};

use crate::geometry::EdgeInsets;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverflowStrategy {
    Standard,
}

impl Default for OverflowStrategy {
    fn default() -> Self {
        OverflowStrategy::Standard
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub slide_width: f32,
    pub slide_height: f32,
    pub margins: EdgeInsets,
    pub max_passes: usize,
    pub default_strategy: OverflowStrategy,

    pub vertical_spacing: f32,
    pub column_gap: f32,
    pub title_zone_height: f32,
    pub subtitle_zone_height: f32,
    pub footer_zone_height: f32,

    /// Default font sizes per spec §4.2's table, overridable per
    /// element via the `fontsize` directive.
    pub title_font_size: f32,
    pub subtitle_font_size: f32,
    pub text_font_size: f32,
    /// Default line-height multiplier, overridable via `line-spacing`.
    pub text_line_height: f32,
    /// Inner padding applied on all sides of a Text/Title/Subtitle/
    /// Footer element's measured bounding box.
    pub text_padding: f32,

    /// Per-item vertical spacing inside lists, and the horizontal
    /// indent applied per nesting depth.
    pub list_item_spacing: f32,
    pub list_indent_per_level: f32,

    /// Subtracted once from `available_width` before dividing evenly
    /// across columns (spec §4.2: "equal column widths
    /// `(available_width - padding)/n_cols`").
    pub table_padding: f32,
    /// Added to the tallest cell in a row to get the row's height.
    pub table_cell_padding: f32,

    /// Monospace character-metrics heuristic for code blocks (spec
    /// §4.2 / §9's first Open Question).
    pub code_char_width: f32,
    pub code_line_height: f32,
    pub code_block_padding: f32,
    pub code_language_label_height: f32,

    /// Bound on the font-metrics memoization cache (spec §4.1).
    pub font_cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            slide_width: 720.0,
            slide_height: 405.0,
            margins: EdgeInsets::all(50.0),
            max_passes: 50,
            default_strategy: OverflowStrategy::Standard,

            vertical_spacing: 10.0,
            column_gap: 10.0,
            title_zone_height: 60.0,
            subtitle_zone_height: 40.0,
            footer_zone_height: 30.0,

            title_font_size: 28.0,
            subtitle_font_size: 18.0,
            text_font_size: 14.0,
            text_line_height: 1.2,
            text_padding: 5.0,

            list_item_spacing: 4.0,
            list_indent_per_level: 18.0,

            table_padding: 16.0,
            table_cell_padding: 8.0,

            code_char_width: 8.0,
            code_line_height: 16.0,
            code_block_padding: 10.0,
            code_language_label_height: 15.0,

            font_cache_capacity: 4096,
        }
    }
}
