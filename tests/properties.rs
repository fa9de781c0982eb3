//! Property tests for the shaping solvers

use knitshape::domain::armcap::play_beads;
use knitshape::domain::rounding::{round_count, FLOATING_POINT_NOISE};
use knitshape::domain::{
    calculate_armhole_shaping, compute_armcap_shaping, compute_armhole_circumference, compute_compound_edge_shaping,
    compute_edge_shaping_in_rows, compute_marker_shaping, find_best_approximation, Gauge, MarkerShapingOptions,
    RepeatConstraint, RoundingDirection, ShapingLimits,
};
use proptest::prelude::*;

fn direction() -> impl Strategy<Value = RoundingDirection> {
    prop_oneof![
        Just(RoundingDirection::Up),
        Just(RoundingDirection::Down),
        Just(RoundingDirection::Nearest),
        Just(RoundingDirection::AnyDirection),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn solved_edge_shaping_fits_and_shapes_exactly(
        smaller in 0u32..200,
        events in 0u32..60,
        total_rows in 0.0f64..300.0,
        even_spacing in any::<bool>(),
        max_between in proptest::option::of(0u32..20),
    ) {
        let larger = smaller + 2 * events;
        let outcome = compute_edge_shaping_in_rows(larger, smaller, total_rows, even_spacing, max_between);

        if outcome.constraints_met() {
            let shaping = outcome.shaping();
            prop_assert!(f64::from(shaping.num_total_rows()) <= total_rows + FLOATING_POINT_NOISE);
            prop_assert_eq!(larger - smaller, 2 * shaping.num_total_shaping_rows());
        } else {
            prop_assert!(outcome.best_larger_stitches().is_some());
        }
    }

    #[test]
    fn approximation_lands_on_the_repeat(
        target in 0.5f64..60.0,
        rate in 2.0f64..10.0,
        direction in direction(),
        modulus in 1u32..12,
        offset in 0u32..12,
    ) {
        let repeat = RepeatConstraint::new(offset, modulus);
        if let Ok(count) = find_best_approximation(target, rate, direction, 0.5, Some(repeat)) {
            prop_assert_eq!(count % modulus, offset % modulus);
        }
    }

    #[test]
    fn compound_rates_stay_within_one(
        smaller in 0u32..200,
        events in 2u32..60,
        height in 0.5f64..30.0,
        rows_per_inch in 3.0f64..12.0,
    ) {
        let gauge = Gauge::new(5.0, rows_per_inch).unwrap();
        let larger = smaller + 2 * events;
        let outcome = compute_compound_edge_shaping(larger, smaller, height, &gauge);
        let shaping = outcome.shaping();

        if shaping.num_alternate_shaping_rows > 0 {
            prop_assert!(shaping.num_standard_shaping_rows.abs_diff(shaping.num_alternate_shaping_rows) <= 1);
            let standard_gap = shaping.rows_between_standard_shaping_rows.unwrap();
            let alternate_gap = shaping.rows_after_alternate_shaping_rows.unwrap();
            prop_assert!(standard_gap.abs_diff(alternate_gap) <= 1);
        }
        if outcome.constraints_met() {
            let budget = round_count(gauge.rows_in(height), RoundingDirection::Down);
            prop_assert!(i64::from(shaping.num_total_rows()) <= budget);
            prop_assert_eq!(larger - smaller, shaping.stitches_shaped());
        }
    }

    #[test]
    fn bead_game_uses_exactly_the_target_rows(decreases in 0u32..40, rows in 0u32..200) {
        if let Some(beads) = play_beads(decreases, rows) {
            prop_assert_eq!(beads.rows(), rows);
            prop_assert_eq!(beads.decreases(), decreases);
            prop_assert!(beads.four <= 1);
        }
    }

    #[test]
    fn sleeve_cap_beads_match_cap_rows(
        armhole_n in 6u32..20,
        depth in 6.0f64..11.0,
        bicep in 40u32..90,
        stitches_per_inch in 4.0f64..7.0,
        rows_per_inch in 5.0f64..9.0,
    ) {
        let gauge = Gauge::new(stitches_per_inch, rows_per_inch).unwrap();
        let limits = ShapingLimits::default();
        if let Ok(armhole) = calculate_armhole_shaping(
            armhole_n,
            depth,
            &gauge,
            limits.max_armhole_shaping_height_percentage,
        ) {
            let circumference = 2.0 * compute_armhole_circumference(&gauge, &armhole, depth);
            if let Ok(cap) = compute_armcap_shaping(&gauge, &armhole, circumference, bicep, &limits) {
                prop_assert_eq!(cap.beads.rows(), cap.target_rows);
                prop_assert_eq!(cap.beads.decreases(), cap.armscye_e);
            }
        }
    }

    #[test]
    fn armhole_shaping_uses_every_stitch_within_height(
        armhole_n in 1u32..60,
        depth in 3.0f64..14.0,
        stitches_per_inch in 2.0f64..9.0,
        rows_per_inch in 2.0f64..12.0,
    ) {
        let gauge = Gauge::new(stitches_per_inch, rows_per_inch).unwrap();
        let max_pct = ShapingLimits::default().max_armhole_shaping_height_percentage;
        if let Ok(shaping) = calculate_armhole_shaping(armhole_n, depth, &gauge, max_pct) {
            prop_assert_eq!(shaping.x + shaping.y + shaping.z, armhole_n);
            prop_assert!(shaping.shaping_height(&gauge) < max_pct * depth);
        }
    }

    #[test]
    fn more_rows_never_break_edge_shaping(
        smaller in 0u32..200,
        events in 0u32..60,
        total_rows in 0.0f64..200.0,
        extra in 0.0f64..100.0,
        even_spacing in any::<bool>(),
    ) {
        let larger = smaller + 2 * events;
        let tight = compute_edge_shaping_in_rows(larger, smaller, total_rows, even_spacing, None);
        let roomy = compute_edge_shaping_in_rows(larger, smaller, total_rows + extra, even_spacing, None);
        prop_assert!(!tight.constraints_met() || roomy.constraints_met());
    }

    #[test]
    fn more_height_never_breaks_marker_shaping(
        smaller in 40u32..200,
        events in 0u32..30,
        height in 0.5f64..12.0,
        extra in 0.0f64..6.0,
    ) {
        let gauge = Gauge::new(5.0, 7.0).unwrap();
        let options = MarkerShapingOptions::default();
        let larger = smaller + 2 * events;
        let tight = compute_marker_shaping(larger, smaller, height, &gauge, &options);
        let roomy = compute_marker_shaping(larger, smaller, height + extra, &gauge, &options);
        prop_assert!(!tight.constraints_met() || roomy.constraints_met());
    }
}
