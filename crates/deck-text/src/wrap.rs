//! Greedy whitespace wrapping with hard character breaks for
//! over-long words, and the memoized `text_bbox` entry point from
//! spec §4.1.
//!
//! The state-machine shape (advance a caret, decide "does the next
//! token fit" at each token, flush a line on overflow) is grounded on
//! `azul-text-layout::text_layout::position_words`'s
//! `LineCaretIntersection` caret-advance loop, simplified from full
//! glyph-shaped word positioning down to plain advance-width summation
//! since this engine never renders glyphs itself.

use crate::font::FontMetricsProvider;

/// One wrapped visual line, as a half-open byte range into the
/// original source string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrappedLine {
    pub start: usize,
    pub end: usize,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WrappedText {
    pub lines: Vec<WrappedLine>,
    /// Width of the widest line.
    pub width: f32,
    pub height: f32,
}

fn measure_run(provider: &dyn FontMetricsProvider, text: &str, font_size_pt: f32) -> f32 {
    text.chars().map(|c| provider.char_advance(c, font_size_pt)).sum()
}

struct WrapState {
    lines: Vec<WrappedLine>,
    cur_start: usize,
    cur_end: usize,
    cur_width: f32,
    widest: f32,
}

impl WrapState {
    fn new(start: usize) -> Self {
        Self {
            lines: Vec::new(),
            cur_start: start,
            cur_end: start,
            cur_width: 0.0,
            widest: 0.0_f32,
        }
    }

    fn flush(&mut self) {
        self.widest = self.widest.max(self.cur_width);
        self.lines.push(WrappedLine {
            start: self.cur_start,
            end: self.cur_end,
            width: self.cur_width,
        });
    }

    fn reset_line(&mut self, start: usize) {
        self.cur_start = start;
        self.cur_end = start;
        self.cur_width = 0.0;
    }

    /// Accounts for a run of whitespace between two words. A space
    /// that would overflow the current line is dropped rather than
    /// carried onto the next line, matching ordinary text-wrapping
    /// behavior (no dangling leading space on a wrapped line).
    fn add_space(&mut self, width: f32, end: usize, max_width: Option<f32>) {
        if self.cur_width <= 0.0 {
            // leading whitespace on an otherwise-empty line: drop it.
            return;
        }
        let tentative = self.cur_width + width;
        if let Some(mw) = max_width {
            if tentative > mw {
                self.flush();
                self.reset_line(end);
                return;
            }
        }
        self.cur_width = tentative;
        self.cur_end = end;
    }

    /// Accounts for one word, breaking it at the character level if it
    /// alone is wider than `max_width` (spec §4.5: "a single very long
    /// line must be splittable by wrapping — the engine must never
    /// treat an un-newlined paragraph as atomic").
    fn add_word(
        &mut self,
        provider: &dyn FontMetricsProvider,
        font_size_pt: f32,
        max_width: Option<f32>,
        start: usize,
        end: usize,
        text: &str,
    ) {
        let word_width = measure_run(provider, text, font_size_pt);

        if self.cur_width > 0.0 {
            let tentative = self.cur_width + word_width;
            let fits = max_width.map(|mw| tentative <= mw).unwrap_or(true);
            if fits {
                self.cur_width = tentative;
                self.cur_end = end;
                return;
            }
            self.flush();
            self.reset_line(start);
        }

        // `self.cur_width == 0.0` here: word is first on its line.
        if let Some(mw) = max_width {
            if word_width > mw {
                let mut seg_start = start;
                let mut seg_width = 0.0_f32;
                for (offset, ch) in text.char_indices() {
                    let byte_idx = start + offset;
                    let ch_width = provider.char_advance(ch, font_size_pt);
                    if seg_width > 0.0 && seg_width + ch_width > mw {
                        self.widest = self.widest.max(seg_width);
                        self.lines.push(WrappedLine {
                            start: seg_start,
                            end: byte_idx,
                            width: seg_width,
                        });
                        seg_start = byte_idx;
                        seg_width = ch_width;
                    } else {
                        seg_width += ch_width;
                    }
                }
                self.cur_start = seg_start;
                self.cur_end = end;
                self.cur_width = seg_width;
                return;
            }
        }

        self.cur_width = word_width;
        self.cur_end = end;
    }
}

/// Wraps `text` at whitespace boundaries to fit within `max_width`
/// (`None` means unbounded — a single line per source paragraph).
/// Explicit `\n` line breaks are always honored as hard breaks.
pub fn wrap_lines(
    provider: &dyn FontMetricsProvider,
    text: &str,
    font_size_pt: f32,
    max_width: Option<f32>,
) -> WrappedText {
    let mut offset = 0usize;
    let mut state = WrapState::new(0);

    for paragraph in split_keep_offsets(text) {
        let mut token_start = paragraph.start;
        let mut in_space = false;
        let mut run_start = paragraph.start;

        for (byte_idx, ch) in text[paragraph.start..paragraph.end].char_indices() {
            let abs_idx = paragraph.start + byte_idx;
            let is_ws = ch.is_whitespace();
            if abs_idx == paragraph.start {
                in_space = is_ws;
                run_start = abs_idx;
            } else if is_ws != in_space {
                emit_token(&mut state, provider, font_size_pt, max_width, text, run_start, abs_idx, in_space);
                run_start = abs_idx;
                in_space = is_ws;
            }
            token_start = abs_idx + ch.len_utf8();
        }
        if run_start < paragraph.end {
            emit_token(
                &mut state,
                provider,
                font_size_pt,
                max_width,
                text,
                run_start,
                paragraph.end,
                in_space,
            );
        }
        let _ = token_start;

        state.flush();
        state.reset_line(paragraph.end);
        offset = paragraph.end;
    }
    let _ = offset;

    let line_count = state.lines.len().max(1);
    WrappedText {
        width: state.widest,
        height: line_count as f32 * font_size_pt,
        lines: state.lines,
    }
}

#[allow(clippy::too_many_arguments)]
fn emit_token(
    state: &mut WrapState,
    provider: &dyn FontMetricsProvider,
    font_size_pt: f32,
    max_width: Option<f32>,
    text: &str,
    start: usize,
    end: usize,
    is_space: bool,
) {
    if is_space {
        let width = measure_run(provider, &text[start..end], font_size_pt);
        state.add_space(width, end, max_width);
    } else {
        state.add_word(provider, font_size_pt, max_width, start, end, &text[start..end]);
    }
}

struct ByteRange {
    start: usize,
    end: usize,
}

/// Splits `text` on `\n`, returning each paragraph's byte range
/// (excluding the separator itself). Mirrors the "Return" word type in
/// `azul-text-layout`'s word splitter, simplified since this engine
/// doesn't need to distinguish `\r\n` from `\n` beyond treating `\r` as
/// ordinary (whitespace) content.
fn split_keep_offsets(text: &str) -> Vec<ByteRange> {
    if text.is_empty() {
        return vec![ByteRange { start: 0, end: 0 }];
    }
    let mut paragraphs = Vec::new();
    let mut start = 0usize;
    for (idx, ch) in text.char_indices() {
        if ch == '\n' {
            paragraphs.push(ByteRange { start, end: idx });
            start = idx + 1;
        }
    }
    paragraphs.push(ByteRange { start, end: text.len() });
    paragraphs
}

/// The lines-height formula applies `line_height_multiplier` on top of
/// the raw line count × font size computed by `wrap_lines`.
fn apply_line_height(raw_height: f32, line_count: usize, line_height_multiplier: f32) -> f32 {
    let _ = raw_height;
    line_count as f32 * line_height_multiplier
}

/// Measures `text_bbox(text, font_size_pt, max_width, line_height_multiplier)`
/// per spec §4.1, memoized in the process-wide cache from `crate::cache`.
pub fn text_bbox(
    provider: &dyn FontMetricsProvider,
    text: &str,
    font_size_pt: f32,
    max_width: Option<f32>,
    line_height_multiplier: f32,
) -> (f32, f32) {
    crate::cache::get_or_compute(
        provider.name(),
        text,
        font_size_pt,
        max_width,
        line_height_multiplier,
        || {
            let wrapped = wrap_lines(provider, text, font_size_pt, max_width);
            let line_count = wrapped.lines.len().max(1);
            let height = apply_line_height(wrapped.height, line_count, line_height_multiplier)
                * font_size_pt;
            (wrapped.width, height)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::ConservativeMonospaceMetrics;

    fn provider() -> ConservativeMonospaceMetrics {
        ConservativeMonospaceMetrics::default()
    }

    #[test]
    fn empty_string_returns_single_line_height() {
        crate::cache::clear();
        let (w, h) = text_bbox(&provider(), "", 20.0, Some(200.0), 1.0);
        assert_eq!(w, 0.0);
        assert!((h - 20.0).abs() < 1e-3);
    }

    #[test]
    fn unbounded_width_keeps_text_on_one_line() {
        let wrapped = wrap_lines(&provider(), "a short line of text", 14.0, None);
        assert_eq!(wrapped.lines.len(), 1);
    }

    #[test]
    fn explicit_newlines_always_break() {
        let wrapped = wrap_lines(&provider(), "line one\nline two\nline three", 14.0, None);
        assert_eq!(wrapped.lines.len(), 3);
    }

    #[test]
    fn long_word_is_broken_by_characters() {
        let provider = provider();
        // One huge "word" with no whitespace at all must still wrap.
        let word: String = std::iter::repeat('x').take(200).collect();
        let wrapped = wrap_lines(&provider, &word, 14.0, Some(50.0));
        assert!(wrapped.lines.len() > 1, "a long word must be split across lines");
        for line in &wrapped.lines {
            assert!(line.width <= 50.0 + 1e-3);
        }
    }

    #[test]
    fn greedy_wrap_respects_max_width() {
        let provider = provider();
        let text = "one two three four five six seven eight";
        let wrapped = wrap_lines(&provider, text, 14.0, Some(60.0));
        assert!(wrapped.lines.len() > 1);
        for line in &wrapped.lines {
            assert!(line.width <= 60.0 + 1e-3);
        }
    }

    #[test]
    fn lines_cover_the_source_text_in_order() {
        let provider = provider();
        let text = "alpha beta gamma";
        let wrapped = wrap_lines(&provider, text, 14.0, Some(40.0));
        let mut last_end = 0;
        for line in &wrapped.lines {
            assert!(line.start >= last_end);
            last_end = line.end;
        }
        assert_eq!(last_end, text.len());
    }
}
