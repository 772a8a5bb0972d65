//! Top-down layout of a Slide's section tree (spec §4.3).
//!
//! Title/Subtitle/Footer are modeled as ordinary `Leaf` children of
//! `root_section` (so the tree stays the single value `Slide` owns per
//! spec §3's lifecycle note), but the calculator special-cases them:
//! they are pulled out of the vertical flow and pinned to their fixed
//! reserved zones, while every other direct or nested child flows
//! through the ordinary row/column/section rules within the body
//! rectangle — see DESIGN.md for the reasoning behind this split.

use deck_core::{
    DeckError, Directives, Element, EngineConfig, HorizontalAlign, LogicalPosition, LogicalSize,
    Node, Section, SectionKind, Slide, WidthMode,
};
use deck_text::FontMetricsProvider;

use crate::metrics;
use crate::width;

struct LayoutCtx<'a> {
    config: &'a EngineConfig,
    provider: &'a dyn FontMetricsProvider,
    /// The slide body's nominal width/height, used as the sizing basis
    /// for `Image` elements regardless of how deeply they're nested
    /// (spec §4.2: images default to half the *slide body's* dimensions,
    /// not their immediate container's).
    body_width: f32,
    body_height_ref: f32,
}

fn is_meta_leaf(node: &Node) -> bool {
    matches!(
        node,
        Node::Leaf(e) if matches!(
            e.kind,
            deck_core::ElementKind::Title | deck_core::ElementKind::Subtitle | deck_core::ElementKind::Footer
        )
    )
}

/// Lays out `slide.root_section` in place: assigns `position`/`size` to
/// every Section and visible leaf, and populates `slide.elements` with
/// the flat traversal-order view spec §3 requires. Never adds or
/// removes children.
pub fn layout_slide(
    slide: &mut Slide,
    config: &EngineConfig,
    provider: &dyn FontMetricsProvider,
) -> Result<(), DeckError> {
    slide.root_section.validate()?;

    deck_text::cache::init(config.font_cache_capacity);

    let content_width = (config.slide_width - config.margins.horizontal()).max(0.0);
    let body_x = config.margins.left;

    let mut title_present = false;
    let mut subtitle_present = false;
    let mut footer_present = false;
    for child in &slide.root_section.children {
        if let Node::Leaf(e) = child {
            match e.kind {
                deck_core::ElementKind::Title => title_present = true,
                deck_core::ElementKind::Subtitle => subtitle_present = true,
                deck_core::ElementKind::Footer => footer_present = true,
                _ => {}
            }
        }
    }

    let title_y = config.margins.top;
    let subtitle_y = title_y + if title_present { config.title_zone_height } else { 0.0 };
    let body_y = subtitle_y + if subtitle_present { config.subtitle_zone_height } else { 0.0 };
    let footer_y = config.slide_height - config.margins.bottom - config.footer_zone_height;

    let nominal_body_height = (config.slide_height
        - config.margins.vertical()
        - if title_present { config.title_zone_height } else { 0.0 }
        - if subtitle_present { config.subtitle_zone_height } else { 0.0 }
        - if footer_present { config.footer_zone_height } else { 0.0 })
    .max(0.0);

    let ctx = LayoutCtx {
        config,
        provider,
        body_width: content_width,
        body_height_ref: nominal_body_height,
    };

    let body_child_count = slide
        .root_section
        .children
        .iter()
        .filter(|c| !is_meta_leaf(c))
        .count();
    let mut body_index = 0usize;
    let mut y_cursor = body_y;

    for child in slide.root_section.children.iter_mut() {
        if let Node::Leaf(e) = child {
            match e.kind {
                deck_core::ElementKind::Title => {
                    e.position = Some(LogicalPosition::new(body_x, title_y));
                    e.size = Some(LogicalSize::new(content_width, config.title_zone_height));
                    continue;
                }
                deck_core::ElementKind::Subtitle => {
                    e.position = Some(LogicalPosition::new(body_x, subtitle_y));
                    e.size = Some(LogicalSize::new(content_width, config.subtitle_zone_height));
                    continue;
                }
                deck_core::ElementKind::Footer => {
                    e.position = Some(LogicalPosition::new(body_x, footer_y));
                    e.size = Some(LogicalSize::new(content_width, config.footer_zone_height));
                    continue;
                }
                _ => {}
            }
        }

        let origin = LogicalPosition::new(body_x, y_cursor);
        let height = layout_node(child, origin, content_width, &ctx)?;
        y_cursor += height;
        body_index += 1;
        if body_index < body_child_count {
            y_cursor += config.vertical_spacing;
        }
    }

    let body_height = (y_cursor - body_y).max(0.0);
    slide.root_section.position = Some(LogicalPosition::new(body_x, body_y));
    slide.root_section.size = Some(LogicalSize::new(content_width, body_height));

    let mut elements = Vec::new();
    for child in &slide.root_section.children {
        collect_elements(child, &mut elements);
    }
    slide.elements = elements;

    Ok(())
}

/// Lays out one node at `origin` within `width`, returning its height.
fn layout_node(
    node: &mut Node,
    origin: LogicalPosition,
    width: f32,
    ctx: &LayoutCtx<'_>,
) -> Result<f32, DeckError> {
    match node {
        Node::Leaf(element) => Ok(layout_leaf(element, origin, width, ctx)),
        Node::Container(section) => layout_section(section, origin, width, ctx),
    }
}

fn layout_leaf(element: &mut Element, origin: LogicalPosition, width: f32, ctx: &LayoutCtx<'_>) -> f32 {
    if element.kind == deck_core::ElementKind::Image {
        let (w, h) = metrics::image_size(element, ctx.body_width, ctx.body_height_ref);
        element.position = Some(origin);
        element.size = Some(LogicalSize::new(w, h));
        return h;
    }

    let own_width = match WidthMode::from_directive(element.directives.width()) {
        WidthMode::Absolute(pt) => pt,
        WidthMode::Proportional(frac) => frac * width,
        WidthMode::Implicit => width,
    };

    let measured_height = metrics::element_height(element, own_width, ctx.config, ctx.provider);
    let height = element
        .directives
        .height()
        .and_then(|v| v.as_points())
        .unwrap_or(measured_height);

    let slack = (width - own_width).max(0.0);
    let x_offset = match element.directives.align() {
        HorizontalAlign::Left => 0.0,
        HorizontalAlign::Center => slack / 2.0,
        HorizontalAlign::Right => slack,
    };

    element.position = Some(LogicalPosition::new(origin.x + x_offset, origin.y));
    element.size = Some(LogicalSize::new(own_width, height));
    height
}

fn layout_section(
    section: &mut Section,
    origin: LogicalPosition,
    width: f32,
    ctx: &LayoutCtx<'_>,
) -> Result<f32, DeckError> {
    section.position = Some(origin);

    match section.kind {
        SectionKind::Row => {
            let n = section.children.len();
            let gap = ctx.config.column_gap;
            let inner_width = (width - gap * n.saturating_sub(1) as f32).max(0.0);
            let directive_refs: Vec<&Directives> =
                section.children.iter().map(Node::directives).collect();
            let column_widths = width::resolve_column_widths(&directive_refs, inner_width);

            let mut x = origin.x;
            let mut tallest = 0.0_f32;
            for (child, column_width) in section.children.iter_mut().zip(column_widths.iter()) {
                let child_origin = LogicalPosition::new(x, origin.y);
                let h = layout_node(child, child_origin, *column_width, ctx)?;
                tallest = tallest.max(h);
                x += column_width + gap;
            }
            section.size = Some(LogicalSize::new(width, tallest));
            Ok(tallest)
        }
        SectionKind::Column | SectionKind::Section => {
            let n = section.children.len();
            let spacing = ctx.config.vertical_spacing;
            let mut y = origin.y;
            for (i, child) in section.children.iter_mut().enumerate() {
                let child_origin = LogicalPosition::new(origin.x, y);
                let h = layout_node(child, child_origin, width, ctx)?;
                y += h;
                if i + 1 < n {
                    y += spacing;
                }
            }
            let total_height = (y - origin.y).max(0.0);
            section.size = Some(LogicalSize::new(width, total_height));
            Ok(total_height)
        }
    }
}

fn collect_elements(node: &Node, out: &mut Vec<Element>) {
    match node {
        Node::Leaf(e) => out.push(e.clone()),
        Node::Container(s) => {
            for child in &s.children {
                collect_elements(child, out);
            }
        }
    }
}

/// Re-derives the flat traversal-order leaf list for `section`, the
/// same way [`layout_slide`] populates `Slide::elements`. Used by the
/// overflow handler to refresh a fitted slide's `elements` after it
/// prunes `root_section.children` without a full re-layout.
pub fn flatten_elements(section: &Section) -> Vec<Element> {
    let mut out = Vec::new();
    for child in &section.children {
        collect_elements(child, &mut out);
    }
    out
}
