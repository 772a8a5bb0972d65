//! Width resolution for a `row`'s `column` children (spec §4.3).
//!
//! Grounded on the `Between`/`EqualTo`/`Unconstrained` three-way split
//! `azul-layout/src/old/layout_solver.rs`'s `WhConstraint` resolver
//! uses for min/max flex-basis resolution, generalized here to the
//! spec's absolute/proportional/implicit vocabulary (`WidthMode`).

use deck_core::{Directives, WidthMode};

/// Resolves the width of each column in `column_directives`, given the
/// row's `inner_width` (already net of inter-column gaps).
///
/// 1. Absolute columns consume their literal points.
/// 2. Proportional columns consume `fraction * inner_width`.
/// 3. Remaining width splits evenly across implicit columns.
/// 4. If consumed width exceeds `inner_width`, implicit columns get
///    zero and a warning is logged — never an error.
pub fn resolve_column_widths(column_directives: &[&Directives], inner_width: f32) -> Vec<f32> {
    let modes: Vec<WidthMode> = column_directives
        .iter()
        .map(|d| WidthMode::from_directive(d.width()))
        .collect();

    let mut consumed = 0.0_f32;
    let mut n_implicit = 0usize;
    for mode in &modes {
        match mode {
            WidthMode::Absolute(pt) => consumed += pt,
            WidthMode::Proportional(frac) => consumed += frac * inner_width,
            WidthMode::Implicit => n_implicit += 1,
        }
    }

    if consumed > inner_width {
        log::warn!(
            "row width directives consume {consumed:.2}pt, exceeding inner width {inner_width:.2}pt; implicit columns receive 0"
        );
    }

    let remaining = (inner_width - consumed).max(0.0);
    let implicit_share = if n_implicit > 0 {
        remaining / n_implicit as f32
    } else {
        0.0
    };

    modes
        .into_iter()
        .map(|mode| match mode {
            WidthMode::Absolute(pt) => pt,
            WidthMode::Proportional(frac) => frac * inner_width,
            WidthMode::Implicit => implicit_share,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::DirectiveValue;

    fn directives_with_width(value: Option<DirectiveValue>) -> Directives {
        let mut d = Directives::new();
        if let Some(v) = value {
            d.insert("width", v);
        }
        d
    }

    #[test]
    fn layout_v_01_mixed_widths() {
        // "Left" (implicit), "Middle" (25%), "Right" (150pt absolute).
        // slide 720, margins 50/50 => row width 620, 2 gaps of 10 => inner 600.
        let left = directives_with_width(None);
        let middle = directives_with_width(Some(DirectiveValue::Percent(25.0)));
        let right = directives_with_width(Some(DirectiveValue::Points(150.0)));
        let widths = resolve_column_widths(&[&left, &middle, &right], 600.0);
        assert!((widths[0] - 300.0).abs() < 1e-9);
        assert!((widths[1] - 150.0).abs() < 1e-9);
        assert!((widths[2] - 150.0).abs() < 1e-9);
    }

    #[test]
    fn layout_v_01b_equal_50_50() {
        let a = directives_with_width(Some(DirectiveValue::Percent(50.0)));
        let b = directives_with_width(Some(DirectiveValue::Percent(50.0)));
        let widths = resolve_column_widths(&[&a, &b], 610.0);
        assert!((widths[0] - 305.0).abs() < 1e-9);
        assert!((widths[1] - 305.0).abs() < 1e-9);
    }

    #[test]
    fn overconsumed_row_gives_implicit_columns_zero() {
        let a = directives_with_width(Some(DirectiveValue::Points(500.0)));
        let b = directives_with_width(Some(DirectiveValue::Points(500.0)));
        let c = directives_with_width(None);
        let widths = resolve_column_widths(&[&a, &b, &c], 600.0);
        assert_eq!(widths[2], 0.0);
    }

    #[test]
    fn no_implicit_columns_leaves_remaining_width_unused() {
        let a = directives_with_width(Some(DirectiveValue::Points(100.0)));
        let widths = resolve_column_widths(&[&a], 600.0);
        assert_eq!(widths, vec![100.0]);
    }
}
