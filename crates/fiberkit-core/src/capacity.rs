//! Infrastructure capacity planning: cable strand counts and conduit fill.

use std::f64::consts::PI;

use serde::Serialize;

/// Standard cable strand counts, ascending.
pub const STANDARD_COUNTS: &[u32] = &[6, 12, 24, 48, 72, 144, 288, 432, 576];

pub const DEFAULT_REDUNDANCY: f64 = 1.5;
pub const DEFAULT_GROWTH: f64 = 1.3;

/// Maximum conduit fill (%) by number of cables, per TIA duct guidance.
pub const MAX_FILL_ONE_CABLE: f64 = 53.0;
pub const MAX_FILL_TWO_CABLES: f64 = 31.0;
pub const MAX_FILL_MANY_CABLES: f64 = 40.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrandCount {
    /// Duplex strands for the endpoints alone.
    pub base_strands: u32,
    pub with_redundancy: f64,
    pub with_growth: f64,
    pub recommended_count: u32,
    /// Requirement exceeds the largest standard count; the largest count
    /// is recommended anyway.
    pub saturated: bool,
}

/// Size a cable for `endpoints` duplex links with redundancy and growth
/// factors applied.
pub fn strand_count(endpoints: u32, redundancy: f64, growth: f64) -> StrandCount {
    let base_strands = endpoints.saturating_mul(2);
    let with_redundancy = f64::from(base_strands) * redundancy;
    let with_growth = with_redundancy * growth;

    let largest = STANDARD_COUNTS[STANDARD_COUNTS.len() - 1];
    let (recommended_count, saturated) = match STANDARD_COUNTS
        .iter()
        .copied()
        .find(|&c| f64::from(c) >= with_growth)
    {
        Some(c) => (c, false),
        None => {
            tracing::warn!(
                required = with_growth,
                recommended = largest,
                "strand requirement exceeds largest standard cable"
            );
            (largest, true)
        }
    };

    StrandCount {
        base_strands,
        with_redundancy,
        with_growth,
        recommended_count,
        saturated,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConduitFill {
    /// Inner cross-section, in the square of the diameter unit.
    pub conduit_area: f64,
    pub cable_area_total: f64,
    pub fill_percent: f64,
    pub max_fill_percent: f64,
    pub compliant: bool,
}

/// Maximum allowed fill for a given number of cables.
pub fn max_fill_percent(cable_count: u32) -> f64 {
    match cable_count {
        1 => MAX_FILL_ONE_CABLE,
        2 => MAX_FILL_TWO_CABLES,
        _ => MAX_FILL_MANY_CABLES,
    }
}

fn circle_area(diameter: f64) -> f64 {
    PI * (diameter / 2.0).powi(2)
}

/// Fill percentage of `cable_count` round cables in a round conduit.
/// Diameters share whatever unit the caller uses.
pub fn conduit_fill(conduit_diameter: f64, cable_diameter: f64, cable_count: u32) -> ConduitFill {
    let conduit_area = circle_area(conduit_diameter);
    let cable_area_total = circle_area(cable_diameter) * f64::from(cable_count);
    let fill_percent = cable_area_total / conduit_area * 100.0;
    let max_fill_percent = max_fill_percent(cable_count);

    ConduitFill {
        conduit_area,
        cable_area_total,
        fill_percent,
        max_fill_percent,
        compliant: fill_percent <= max_fill_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strand_count_rounds_up_to_standard() {
        // 10 endpoints → 20 × 1.5 × 1.3 = 39 → 48
        let r = strand_count(10, DEFAULT_REDUNDANCY, DEFAULT_GROWTH);
        assert_eq!(r.base_strands, 20);
        assert!((r.with_redundancy - 30.0).abs() < 1e-9);
        assert!((r.with_growth - 39.0).abs() < 1e-9);
        assert_eq!(r.recommended_count, 48);
        assert!(!r.saturated);
    }

    #[test]
    fn strand_count_exact_standard_value() {
        let r = strand_count(6, 1.0, 1.0);
        assert_eq!(r.recommended_count, 12);
    }

    #[test]
    fn strand_count_zero_endpoints() {
        let r = strand_count(0, DEFAULT_REDUNDANCY, DEFAULT_GROWTH);
        assert_eq!(r.recommended_count, 6);
    }

    #[test]
    fn strand_count_saturates() {
        let r = strand_count(500, DEFAULT_REDUNDANCY, DEFAULT_GROWTH);
        assert_eq!(r.recommended_count, 576);
        assert!(r.saturated);
    }

    #[test]
    fn max_fill_by_cable_count() {
        assert_eq!(max_fill_percent(1), 53.0);
        assert_eq!(max_fill_percent(2), 31.0);
        assert_eq!(max_fill_percent(3), 40.0);
        assert_eq!(max_fill_percent(12), 40.0);
        assert_eq!(max_fill_percent(0), 40.0);
    }

    #[test]
    fn conduit_single_cable() {
        // (10 / 20)^2 = 25 %
        let r = conduit_fill(20.0, 10.0, 1);
        assert!((r.fill_percent - 25.0).abs() < 1e-9);
        assert!(r.compliant);
    }

    #[test]
    fn conduit_two_cables_over_limit() {
        // 2 × (8 / 20)^2 = 32 % > 31 %
        let r = conduit_fill(20.0, 8.0, 2);
        assert!((r.fill_percent - 32.0).abs() < 1e-9);
        assert_eq!(r.max_fill_percent, 31.0);
        assert!(!r.compliant);
    }

    #[test]
    fn conduit_many_cables() {
        // 4 × (5 / 20)^2 = 25 %
        let r = conduit_fill(20.0, 5.0, 4);
        assert!((r.fill_percent - 25.0).abs() < 1e-9);
        assert!((r.cable_area_total - 4.0 * PI * 6.25).abs() < 1e-9);
        assert!(r.compliant);
    }

    #[test]
    fn conduit_zero_diameter_does_not_panic() {
        let r = conduit_fill(0.0, 5.0, 1);
        assert!(r.fill_percent.is_infinite());
        assert!(!r.compliant);
    }
}
