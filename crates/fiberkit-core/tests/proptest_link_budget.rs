//! Property-based tests for the link budget engine.
//!
//! Covers the SOM identity over arbitrary finite inputs, monotonicity of
//! the margin grading, and determinism of nearest-wavelength resolution.

use fiberkit_core::link_budget::MarginGrade;
use fiberkit_core::tables::{MM_ATTENUATION, SM_ATTENUATION};
use fiberkit_core::wavelength::nearest_entry;
use fiberkit_core::LinkBudgetParams;
use proptest::prelude::*;

fn fiber_type() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("SM"), Just("MM"), Just("sm"), Just("XX"), Just("MM-OM3")]
}

fn optional_loss() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![Just(None), (0.0f64..2.0).prop_map(Some)]
}

proptest! {
    #[test]
    fn som_identity_holds(
        tx in -20.0f64..20.0,
        rx in -45.0f64..-5.0,
        length in 0.0f64..200.0,
        wavelength in 600u32..1700,
        fiber in fiber_type(),
        connectors in 0u32..40,
        splices in 0u32..200,
        connector_loss in optional_loss(),
        splice_loss in optional_loss(),
        fiber_loss in optional_loss(),
        margin in 0.0f64..10.0,
    ) {
        let mut params = LinkBudgetParams::new(tx, rx, length)
            .wavelength(wavelength)
            .fiber_type(fiber)
            .connectors(connectors)
            .splices(splices)
            .safety_margin(margin);
        params.connector_loss_db = connector_loss;
        params.splice_loss_db = splice_loss;
        params.fiber_loss_db_per_km = fiber_loss;

        let input = params.resolve();
        let r = input.calculate();

        let atten = input.attenuation().value;
        let c_loss = input.connector_loss().value;
        let s_loss = input.splice_loss().value;
        let expected = (tx - rx)
            - (length * atten + f64::from(connectors) * c_loss + f64::from(splices) * s_loss)
            - margin;

        prop_assert!((r.som_db - expected).abs() < 1e-9, "som {} vs {}", r.som_db, expected);
        prop_assert!(
            (r.total_loss_db
                - (r.fiber_loss_total_db + r.connector_loss_total_db + r.splice_loss_total_db))
                .abs()
                < 1e-9
        );
        prop_assert_eq!(r.status, MarginGrade::classify(r.som_db).status());
    }

    #[test]
    fn overrides_are_used_verbatim(
        c in 0.0f64..2.0,
        s in 0.0f64..1.0,
        f in 0.0f64..5.0,
    ) {
        let input = LinkBudgetParams::new(0.0, -28.0, 1.0)
            .connector_loss(c)
            .splice_loss(s)
            .fiber_loss(f)
            .resolve();
        prop_assert_eq!(input.connector_loss().value, c);
        prop_assert_eq!(input.splice_loss().value, s);
        prop_assert_eq!(input.attenuation().value, f);
    }

    #[test]
    fn grading_is_monotonic(a in -50.0f64..50.0, b in -50.0f64..50.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(MarginGrade::classify(lo) <= MarginGrade::classify(hi));
        prop_assert!(MarginGrade::classify(lo).status() <= MarginGrade::classify(hi).status());
    }

    #[test]
    fn nearest_entry_is_deterministic_and_minimal(wavelength in any::<u32>()) {
        for table in [SM_ATTENUATION, MM_ATTENUATION] {
            let first = nearest_entry(table, wavelength);
            prop_assert_eq!(first, nearest_entry(table, wavelength));

            let (nm, _) = first.unwrap();
            let best = nm.abs_diff(wavelength);
            for (other, _) in table {
                let d = other.abs_diff(wavelength);
                prop_assert!(d >= best);
                // Equal distance only to a longer wavelength.
                if d == best {
                    prop_assert!(*other >= nm);
                }
            }
        }
    }

    #[test]
    fn unsupported_fiber_always_uses_sm_1310(wavelength in any::<u32>()) {
        let input = LinkBudgetParams::new(0.0, -28.0, 1.0)
            .fiber_type("XX")
            .wavelength(wavelength)
            .resolve();
        prop_assert_eq!(input.attenuation().value, 0.35);
        prop_assert!(input.is_fallback());
    }
}
