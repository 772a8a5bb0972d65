//! Pagination manager (spec §4.7): drives the detect/handle loop until
//! every produced slide fits (or is degenerate), bounded by
//! `config.max_passes`.

use deck_core::{EngineConfig, Slide};
use deck_text::FontMetricsProvider;

use crate::calculator;
use crate::detector::{self, Classification};
use crate::handler;

/// Processes one input slide into the ordered sequence of output
/// slides it expands into. `slide` must already be laid out (its
/// `root_section` positioned) by [`calculator::layout_slide`] before
/// this is called.
///
/// ```text
/// queue := [slide]
/// result := []
/// while queue non-empty and passes < max_passes:
///     s := queue.pop_front()
///     match classify(s):
///         Fits | Degenerate => result.push(s)
///         Overflows =>
///             (fitted, continuation) := handle_overflow(s)
///             if continuation is none: result.push(s)   # terminal
///             else:
///                 layout(continuation)
///                 result.push(fitted)
///                 queue.push_front(continuation)
///                 passes += 1
/// ```
///
/// A pass only counts as progress if the continuation has strictly
/// fewer leaves, or a strictly smaller body height, than the slide it
/// came from. If a pass makes no progress, the loop stops and the
/// stalled slide is still emitted (it may still overflow) rather than
/// dropped, so every leaf from the input — including a single
/// non-splittable element too tall for any body — is guaranteed to
/// appear somewhere in the output per spec §8's non-splittable
/// preservation property. `Slide::pagination_gave_up` is set on it to
/// record that the manager gave up rather than terminating cleanly.
pub fn process_slide(slide: Slide, config: &EngineConfig, provider: &dyn FontMetricsProvider) -> Vec<Slide> {
    let mut queue = std::collections::VecDeque::new();
    queue.push_back(slide);
    let mut result = Vec::new();
    let mut passes = 0usize;

    while let Some(s) = queue.pop_front() {
        match detector::classify(&s, config) {
            Classification::Fits | Classification::Degenerate => {
                result.push(s);
                continue;
            }
            Classification::Overflows => {}
        }

        if passes >= config.max_passes {
            log::warn!(
                "pagination reached max_passes ({}) while slide '{}' still overflows; emitting as-is",
                config.max_passes,
                s.object_id
            );
            let mut stalled = s;
            stalled.pagination_gave_up = true;
            result.push(stalled);
            continue;
        }

        let outcome = match handler::handle_overflow(&s, config, provider) {
            Ok(outcome) => outcome,
            Err(err) => {
                log::error!("overflow handler failed for slide '{}': {err}", s.object_id);
                let mut stalled = s;
                stalled.pagination_gave_up = true;
                result.push(stalled);
                continue;
            }
        };

        let mut continuation = match outcome.continuation {
            Some(c) => c,
            None => {
                // Spec §4.6 point 5: nothing could be moved. Treat as
                // terminal — emit the slide unchanged, overflow and
                // all, so its content is never silently dropped.
                result.push(outcome.fitted);
                continue;
            }
        };

        if let Err(err) = calculator::layout_slide(&mut continuation, config, provider) {
            log::error!("re-layout of continuation slide failed: {err}");
            let mut stalled = outcome.fitted;
            stalled.pagination_gave_up = true;
            result.push(stalled);
            continue;
        }

        let made_progress = continuation.root_section.leaf_count() < s.root_section.leaf_count()
            || continuation
                .root_section
                .size
                .zip(s.root_section.size)
                .map(|(c, o)| c.height < o.height)
                .unwrap_or(false);

        if !made_progress {
            log::warn!(
                "pagination made no progress splitting slide '{}'; emitting remainder as-is",
                s.object_id
            );
            result.push(outcome.fitted);
            let mut stalled = continuation;
            stalled.pagination_gave_up = true;
            result.push(stalled);
            continue;
        }

        result.push(outcome.fitted);
        queue.push_front(continuation);
        passes += 1;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{Element, ElementKind, Node, Section, SectionKind};
    use deck_text::ConservativeMonospaceMetrics;

    fn provider() -> ConservativeMonospaceMetrics {
        ConservativeMonospaceMetrics::default()
    }

    #[test]
    fn fitting_slide_produces_exactly_one_output() {
        let config = EngineConfig::default();
        let a = Element::text(ElementKind::Text, "a", "hello world");
        let root = Section::new("root", SectionKind::Section).with_children(vec![Node::Leaf(a)]);
        let mut slide = Slide::new("s1", root);
        calculator::layout_slide(&mut slide, &config, &provider()).unwrap();

        let out = process_slide(slide, &config, &provider());
        assert_eq!(out.len(), 1);
        assert!(!out[0].pagination_gave_up);
    }

    #[test]
    fn long_paragraph_paginates_into_multiple_slides() {
        let mut config = EngineConfig::default();
        config.slide_height = 200.0;
        config.margins = deck_core::EdgeInsets::all(20.0);
        config.footer_zone_height = 0.0;

        let text = "word ".repeat(600);
        let a = Element::text(ElementKind::Text, "a", text.trim());
        let root = Section::new("root", SectionKind::Section).with_children(vec![Node::Leaf(a)]);
        let mut slide = Slide::new("s1", root);
        calculator::layout_slide(&mut slide, &config, &provider()).unwrap();

        let out = process_slide(slide, &config, &provider());
        assert!(out.len() >= 2, "a paragraph much taller than the body must paginate");
        for s in &out {
            assert_ne!(detector::classify(s, &config), Classification::Overflows);
        }
    }

    #[test]
    fn pathological_oversized_image_terminates_and_is_preserved() {
        let mut config = EngineConfig::default();
        config.slide_height = 100.0;
        config.margins = deck_core::EdgeInsets::all(10.0);
        config.footer_zone_height = 0.0;
        config.max_passes = 5;

        let mut image = Element::new(
            ElementKind::Image,
            "img1",
            deck_core::ElementContent::Image { source: None, alt: "x".into() },
        );
        image.directives.insert("height", deck_core::DirectiveValue::Points(10_000.0));
        let root = Section::new("root", SectionKind::Section).with_children(vec![Node::Leaf(image)]);
        let mut slide = Slide::new("s1", root);
        calculator::layout_slide(&mut slide, &config, &provider()).unwrap();

        let out = process_slide(slide, &config, &provider());
        assert!(!out.is_empty());
        let image_count: usize = out
            .iter()
            .map(|s| s.elements.iter().filter(|e| e.kind == ElementKind::Image).count())
            .sum();
        assert_eq!(image_count, 1, "the image must appear exactly once across the output deck");
    }
}
