//! Overflow handler (spec §4.6): given a slide that the detector
//! classified as `Overflows`, produces a fitted slide whose body no
//! longer overflows and, where anything had to be moved out, a
//! continuation slide carrying the rest.
//!
//! Children are walked in order,
//! accumulating height, until the next child would exceed the
//! available height. That child is the split candidate:
//! - a `Section`/`Row`/`Column` recurses into its own children at the
//!   same rule;
//! - a splittable leaf is handed to [`crate::split::split_leaf`];
//! - an `Image` (or any non-splittable leaf) that doesn't fit is moved
//!   whole to the continuation, with `overflow_moved` set — the
//!   circuit breaker that keeps a too-tall non-splittable element from
//!   looping forever through the pagination manager.
//!
//! A `row`'s columns are split independently at the same available
//! height rather than sequentially (spec §4.6's "Row handling");
//! columns that end up empty on either side are kept (not dropped) so
//! the row's column count and widths stay stable.
//!
//! Title/Subtitle/Footer are carved out of `root_section.children`
//! before the walk starts (they sit outside the body rectangle, so
//! they must not eat into `available_height`) and spliced back into
//! both the fitted and the continuation slide, per spec §4.6 point 4
//! ("the continuation slide inherits... title/subtitle/footer").

use deck_core::{DeckError, Element, ElementKind, EngineConfig, LogicalSize, Node, ProgrammingError, Section, SectionKind, Slide};
use deck_text::FontMetricsProvider;

use crate::calculator;
use crate::detector;

/// Title/Subtitle/Footer are pulled out of `root_section.children`
/// before the handler walks the body: the calculator pins them to
/// fixed zones outside the body rectangle, so they must not consume
/// the body's accumulation budget, and spec §4.6 point 4 has the
/// continuation slide inherit them rather than split them.
fn is_meta_leaf(node: &Node) -> bool {
    matches!(
        node,
        Node::Leaf(e) if matches!(e.kind, ElementKind::Title | ElementKind::Subtitle | ElementKind::Footer)
    )
}

/// Result of one overflow-handling pass over a slide.
pub struct HandlerOutcome {
    pub fitted: Slide,
    pub continuation: Option<Slide>,
}

fn node_height(node: &Node) -> f32 {
    node.size().map(|s| s.height).unwrap_or(0.0)
}

/// Height `kind`'s children would occupy stacked the way the
/// calculator stacks them, given each child's own already-measured
/// height. Used to patch up a fitted container's size after its
/// children list was pruned, since the fitted half of a slide is not
/// re-laid-out (only the continuation is).
fn recompute_container_height(kind: SectionKind, children: &[Node], config: &EngineConfig) -> f32 {
    match kind {
        SectionKind::Row => children.iter().map(node_height).fold(0.0_f32, f32::max),
        SectionKind::Column | SectionKind::Section => {
            let n = children.len();
            let sum: f32 = children.iter().map(node_height).sum();
            let spacing = if n > 1 { config.vertical_spacing * (n - 1) as f32 } else { 0.0 };
            sum + spacing
        }
    }
}

/// Splits a vertically-stacked child list at `available_height`.
/// Returns `(fitted_children, continuation_children, moved_anything)`.
fn split_sequential(
    children: &[Node],
    available_height: f32,
    config: &EngineConfig,
    provider: &dyn FontMetricsProvider,
) -> Result<(Vec<Node>, Vec<Node>, bool), ProgrammingError> {
    let mut fitted = Vec::new();
    let mut continuation = Vec::new();
    let mut accumulated = 0.0_f32;
    let mut moved = false;
    let n = children.len();
    let mut i = 0;

    while i < n {
        let child = &children[i];
        let h = node_height(child);

        if accumulated + h <= available_height {
            fitted.push(child.clone());
            accumulated += h;
            i += 1;
            continue;
        }

        let remaining = (available_height - accumulated).max(0.0);

        match child {
            Node::Container(section) => {
                let (fit_c, cont_c, child_moved) =
                    split_section_children(section.kind, &section.children, remaining, config, provider)?;

                if !child_moved {
                    // The container's own recorded height was a loose
                    // upper bound (e.g. a row's max-column height); at
                    // `remaining` every one of its children actually
                    // fits. Keep it whole and keep accumulating.
                    fitted.push(child.clone());
                    accumulated += h;
                    i += 1;
                    continue;
                }

                if !fit_c.is_empty() {
                    let mut fitted_section = section.clone();
                    let width = section.size.map(|s| s.width).unwrap_or(0.0);
                    fitted_section.children = fit_c;
                    fitted_section.size = Some(LogicalSize::new(
                        width,
                        recompute_container_height(section.kind, &fitted_section.children, config),
                    ));
                    fitted.push(Node::Container(fitted_section));
                }

                if !cont_c.is_empty() {
                    let mut cont_section = section.clone();
                    cont_section.children = cont_c;
                    cont_section.position = None;
                    cont_section.size = None;
                    continuation.push(Node::Container(cont_section));
                }
                moved = true;

                i += 1;
                if i < n {
                    continuation.extend(children[i..].iter().cloned());
                }
                break;
            }
            Node::Leaf(element) => {
                if element.kind.is_splittable() {
                    let attempt = crate::split::split_leaf(element, remaining, config, provider)?;
                    match (attempt.fitted, attempt.overflow) {
                        (Some(f), None) => {
                            let fh = f.size.map(|s| s.height).unwrap_or(0.0);
                            fitted.push(Node::Leaf(f));
                            accumulated += fh;
                            i += 1;
                            continue;
                        }
                        (Some(f), Some(o)) => {
                            fitted.push(Node::Leaf(f));
                            continuation.push(Node::Leaf(o));
                            moved = true;
                            i += 1;
                            if i < n {
                                continuation.extend(children[i..].iter().cloned());
                            }
                            break;
                        }
                        (None, Some(mut o)) => {
                            o.overflow_moved = true;
                            continuation.push(Node::Leaf(o));
                            moved = true;
                            i += 1;
                            if i < n {
                                continuation.extend(children[i..].iter().cloned());
                            }
                            break;
                        }
                        (None, None) => {
                            unreachable!("split_leaf always returns a fit, an overflow, or both")
                        }
                    }
                } else {
                    let mut moved_element: Element = element.clone();
                    moved_element.overflow_moved = true;
                    continuation.push(Node::Leaf(moved_element));
                    moved = true;
                    i += 1;
                    if i < n {
                        continuation.extend(children[i..].iter().cloned());
                    }
                    break;
                }
            }
        }
    }

    Ok((fitted, continuation, moved))
}

/// Splits a row's columns independently at the same `available_height`,
/// preserving empty columns on either side to keep the row's column
/// count and widths stable.
fn split_row_columns(
    columns: &[Node],
    available_height: f32,
    config: &EngineConfig,
    provider: &dyn FontMetricsProvider,
) -> Result<(Vec<Node>, Vec<Node>, bool), ProgrammingError> {
    let mut fitted_cols = Vec::with_capacity(columns.len());
    let mut continuation_cols = Vec::with_capacity(columns.len());
    let mut moved = false;

    for col_node in columns {
        match col_node {
            Node::Container(col_section) => {
                let (fit_c, cont_c, child_moved) = split_section_children(
                    col_section.kind,
                    &col_section.children,
                    available_height,
                    config,
                    provider,
                )?;
                moved |= child_moved;

                let width = col_section.size.map(|s| s.width).unwrap_or(0.0);

                let mut fitted_col = col_section.clone();
                fitted_col.children = fit_c;
                fitted_col.size = Some(LogicalSize::new(
                    width,
                    recompute_container_height(col_section.kind, &fitted_col.children, config),
                ));
                fitted_cols.push(Node::Container(fitted_col));

                let mut cont_col = col_section.clone();
                cont_col.children = cont_c;
                cont_col.position = None;
                cont_col.size = None;
                continuation_cols.push(Node::Container(cont_col));
            }
            Node::Leaf(_) => {
                // Defensive: a bare leaf directly under a row (outside
                // a column). Treated as a single-item sequential split
                // so the same fit/overflow rules apply uniformly.
                let single = std::slice::from_ref(col_node);
                let (fit_c, cont_c, child_moved) =
                    split_sequential(single, available_height, config, provider)?;
                moved |= child_moved;
                fitted_cols.extend(fit_c);
                continuation_cols.extend(cont_c);
            }
        }
    }

    Ok((fitted_cols, continuation_cols, moved))
}

/// Dispatches a container's children to the row or sequential splitter
/// according to its `kind`.
fn split_section_children(
    kind: SectionKind,
    children: &[Node],
    available_height: f32,
    config: &EngineConfig,
    provider: &dyn FontMetricsProvider,
) -> Result<(Vec<Node>, Vec<Node>, bool), ProgrammingError> {
    match kind {
        SectionKind::Row => split_row_columns(children, available_height, config, provider),
        SectionKind::Section | SectionKind::Column => split_sequential(children, available_height, config, provider),
    }
}

/// Attempts to resolve `slide`'s overflow by moving a suffix of its
/// body content into a continuation slide. If nothing could be moved
/// (spec §4.6 point 5 — e.g. a measurement rounding edge, or a single
/// non-splittable leaf that fills the whole body on its own),
/// `continuation` is `None` and the caller treats `slide` as terminal.
pub fn handle_overflow(
    slide: &Slide,
    config: &EngineConfig,
    provider: &dyn FontMetricsProvider,
) -> Result<HandlerOutcome, DeckError> {
    let body_y = slide.root_section.position.map(|p| p.y).unwrap_or(config.margins.top);
    let available_height = (detector::body_bottom(slide, config) - body_y).max(0.0);

    let meta: Vec<Node> = slide.root_section.children.iter().filter(|c| is_meta_leaf(c)).cloned().collect();
    let body: Vec<Node> = slide.root_section.children.iter().filter(|c| !is_meta_leaf(c)).cloned().collect();

    let (fitted_body, continuation_body, moved) =
        split_section_children(slide.root_section.kind, &body, available_height, config, provider)?;

    if !moved || continuation_body.is_empty() {
        return Ok(HandlerOutcome { fitted: slide.clone(), continuation: None });
    }

    let mut fitted_slide = slide.clone();
    let width = slide.root_section.size.map(|s| s.width).unwrap_or(0.0);
    fitted_slide.root_section.children =
        meta.iter().cloned().chain(fitted_body.iter().cloned()).collect();
    fitted_slide.root_section.size = Some(LogicalSize::new(
        width,
        recompute_container_height(slide.root_section.kind, &fitted_body, config),
    ));
    fitted_slide.elements = calculator::flatten_elements(&fitted_slide.root_section);

    let mut continuation_section: Section = slide.root_section.clone();
    continuation_section.children = meta.into_iter().chain(continuation_body.into_iter()).collect();
    continuation_section.position = None;
    continuation_section.size = None;

    let mut continuation_slide = slide.clone();
    continuation_slide.object_id = format!("{}-cont", slide.object_id);
    continuation_slide.root_section = continuation_section;
    continuation_slide.is_continuation = true;
    continuation_slide.elements = Vec::new();

    Ok(HandlerOutcome { fitted: fitted_slide, continuation: Some(continuation_slide) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{ElementKind, LogicalPosition, Node};
    use deck_text::ConservativeMonospaceMetrics;

    fn provider() -> ConservativeMonospaceMetrics {
        ConservativeMonospaceMetrics::default()
    }

    fn laid_out_slide(children: Vec<Node>, config: &EngineConfig, provider: &dyn FontMetricsProvider) -> Slide {
        let root = Section::new("root", SectionKind::Section).with_children(children);
        let mut slide = Slide::new("s1", root);
        crate::calculator::layout_slide(&mut slide, config, provider).unwrap();
        slide
    }

    #[test]
    fn non_overflowing_slide_moves_nothing() {
        let config = EngineConfig::default();
        let a = Element::text(ElementKind::Text, "a", "hello");
        let slide = laid_out_slide(vec![Node::Leaf(a)], &config, &provider());

        let outcome = handle_overflow(&slide, &config, &provider()).unwrap();
        assert!(outcome.continuation.is_none());
        assert_eq!(outcome.fitted.elements.len(), 1);
    }

    #[test]
    fn long_paragraph_splits_into_fitted_and_continuation() {
        let mut config = EngineConfig::default();
        config.slide_height = 200.0;
        config.margins = deck_core::EdgeInsets::all(20.0);
        config.footer_zone_height = 0.0;

        let text = "word ".repeat(500);
        let a = Element::text(ElementKind::Text, "a", text.trim());
        let slide = laid_out_slide(vec![Node::Leaf(a)], &config, &provider());

        // This paragraph is taller than the whole body at this slide height.
        assert_eq!(detector::classify(&slide, &config), detector::Classification::Overflows);

        let outcome = handle_overflow(&slide, &config, &provider()).unwrap();
        let continuation = outcome.continuation.expect("should produce a continuation");
        assert!(continuation.is_continuation);
        assert_eq!(continuation.object_id, "s1-cont");
        assert!(!outcome.fitted.elements.is_empty() || outcome.fitted.root_section.leaf_count() == 0);
    }

    #[test]
    fn non_splittable_leaf_moves_whole_with_flag_set() {
        let mut config = EngineConfig::default();
        config.slide_height = 120.0;
        config.margins = deck_core::EdgeInsets::all(10.0);
        config.footer_zone_height = 0.0;

        let mut image = Element::new(
            ElementKind::Image,
            "img1",
            deck_core::ElementContent::Image { source: None, alt: "x".into() },
        );
        image.directives.insert("height", deck_core::DirectiveValue::Points(5000.0));
        let slide = laid_out_slide(vec![Node::Leaf(image)], &config, &provider());

        assert_eq!(detector::classify(&slide, &config), detector::Classification::Overflows);
        let outcome = handle_overflow(&slide, &config, &provider()).unwrap();

        if let Some(continuation) = outcome.continuation {
            let moved_image = continuation
                .root_section
                .children
                .iter()
                .find_map(Node::as_leaf)
                .expect("image should be in continuation");
            assert!(moved_image.overflow_moved);
        } else {
            // Nothing could be moved at all (image alone already filled
            // the whole body): terminal, per spec §4.6 point 5.
            assert_eq!(outcome.fitted.object_id, slide.object_id);
        }
    }

    #[test]
    fn row_preserves_column_count_across_split() {
        let mut config = EngineConfig::default();
        config.slide_height = 160.0;
        config.margins = deck_core::EdgeInsets::all(10.0);
        config.footer_zone_height = 0.0;

        let left_text = "left ".repeat(400);
        let left = Element::text(ElementKind::Text, "left", left_text.trim());
        let right = Element::text(ElementKind::Text, "right", "short");

        let col_a = Section::new("col_a", SectionKind::Column).with_children(vec![Node::Leaf(left)]);
        let col_b = Section::new("col_b", SectionKind::Column).with_children(vec![Node::Leaf(right)]);
        let row = Section::new("row", SectionKind::Row)
            .with_children(vec![Node::Container(col_a), Node::Container(col_b)]);

        let slide = laid_out_slide(vec![Node::Container(row)], &config, &provider());
        assert_eq!(detector::classify(&slide, &config), detector::Classification::Overflows);

        let outcome = handle_overflow(&slide, &config, &provider()).unwrap();
        if let Some(continuation) = outcome.continuation {
            if let Some(Node::Container(row)) = continuation.root_section.children.first() {
                assert_eq!(row.children.len(), 2, "both columns must survive the split");
            }
        }
        let _ = LogicalPosition::new(0.0, 0.0);
    }

    #[test]
    fn title_and_footer_are_inherited_by_both_halves_not_consumed_by_the_body_budget() {
        let mut config = EngineConfig::default();
        config.slide_height = 200.0;
        config.margins = deck_core::EdgeInsets::all(20.0);
        config.footer_zone_height = 30.0;

        let title = Element::text(ElementKind::Title, "t", "Title");
        let footer = Element::text(ElementKind::Footer, "f", "Footer");
        let text = "word ".repeat(500);
        let body = Element::text(ElementKind::Text, "b", text.trim());

        let slide = laid_out_slide(
            vec![Node::Leaf(title), Node::Leaf(body), Node::Leaf(footer)],
            &config,
            &provider(),
        );
        assert_eq!(detector::classify(&slide, &config), detector::Classification::Overflows);

        let outcome = handle_overflow(&slide, &config, &provider()).unwrap();
        let continuation = outcome.continuation.expect("long body must still produce a continuation");

        let fitted_title = outcome.fitted.elements.iter().find(|e| e.kind == ElementKind::Title);
        let cont_title = continuation.root_section.children.iter().find(|c| is_meta_leaf(c));
        assert!(fitted_title.is_some(), "fitted slide must keep the title");
        assert!(cont_title.is_some(), "continuation must inherit the title");

        let fitted_footer = outcome.fitted.elements.iter().find(|e| e.kind == ElementKind::Footer);
        assert!(fitted_footer.is_some(), "fitted slide must keep the footer");
        let cont_footer_count = continuation
            .root_section
            .children
            .iter()
            .filter(|c| matches!(c, Node::Leaf(e) if e.kind == ElementKind::Footer))
            .count();
        assert_eq!(cont_footer_count, 1, "continuation must inherit exactly one footer, not zero or two");
    }
}
