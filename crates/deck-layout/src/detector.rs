//! Overflow detector (spec §4.4): classifies an already-positioned
//! slide as fitting, overflowing, or degenerate.

use deck_core::{EngineConfig, Slide};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Fits,
    Overflows,
    Degenerate,
}

/// Bottom edge of the body area: the slide height minus the bottom
/// margin and, if the slide carries a Footer, the footer zone as well.
pub fn body_bottom(slide: &Slide, config: &EngineConfig) -> f32 {
    let footer_reserved = if slide.footer().is_some() {
        config.footer_zone_height
    } else {
        0.0
    };
    config.slide_height - config.margins.bottom - footer_reserved
}

/// Classifies `slide` per spec §4.4. A degenerate root (non-positive
/// size, or zero visible leaves) is checked first and short-circuits
/// the fits/overflows comparison regardless of its numeric position.
pub fn classify(slide: &Slide, config: &EngineConfig) -> Classification {
    let (position, size) = match (slide.root_section.position, slide.root_section.size) {
        (Some(p), Some(s)) => (p, s),
        _ => return Classification::Degenerate,
    };

    if size.width <= 0.0 || size.height <= 0.0 || slide.root_section.leaf_count() == 0 {
        return Classification::Degenerate;
    }

    if position.y + size.height <= body_bottom(slide, config) {
        Classification::Fits
    } else {
        Classification::Overflows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{Element, ElementKind, LogicalPosition, LogicalSize, Node, Section, SectionKind};

    fn positioned_slide(height: f32, config: &EngineConfig) -> Slide {
        let mut leaf = Element::text(ElementKind::Text, "t", "hi");
        leaf.position = Some(LogicalPosition::new(50.0, 50.0));
        leaf.size = Some(LogicalSize::new(620.0, height));
        let mut root = Section::new("root", SectionKind::Section)
            .with_children(vec![Node::Leaf(leaf)]);
        root.position = Some(LogicalPosition::new(50.0, 50.0));
        root.size = Some(LogicalSize::new(620.0, height));
        let _ = config;
        Slide::new("s1", root)
    }

    #[test]
    fn fits_when_within_body_bottom() {
        let config = EngineConfig::default();
        let slide = positioned_slide(100.0, &config);
        assert_eq!(classify(&slide, &config), Classification::Fits);
    }

    #[test]
    fn overflows_when_past_body_bottom() {
        let config = EngineConfig::default();
        let slide = positioned_slide(1000.0, &config);
        assert_eq!(classify(&slide, &config), Classification::Overflows);
    }

    #[test]
    fn degenerate_when_zero_height() {
        let config = EngineConfig::default();
        let mut slide = positioned_slide(0.0, &config);
        slide.root_section.size = Some(LogicalSize::new(620.0, 0.0));
        assert_eq!(classify(&slide, &config), Classification::Degenerate);
    }

    #[test]
    fn degenerate_when_unpositioned() {
        let config = EngineConfig::default();
        let root = Section::new("root", SectionKind::Section);
        let slide = Slide::new("s1", root);
        assert_eq!(classify(&slide, &config), Classification::Degenerate);
    }
}
