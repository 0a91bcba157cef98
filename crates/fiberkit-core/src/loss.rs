//! Standalone component loss calculator: connectors, splices and fiber
//! runs, each looked up independently of a full link budget.
//!
//! Unknown connector or splice styles fall back to the FOA typical value
//! and unknown fiber subtypes to the singlemode table. Every result
//! carries a `recognized` flag so the fallback is visible to the caller.

use serde::Serialize;

use crate::tables::{
    lookup, CONNECTOR_LOSS_TYPICAL, CONNECTOR_TYPES, FIBER_SUBTYPE_ATTENUATION,
    FUSION_SPLICE_TYPICAL, SM_ATTENUATION, SPLICE_TYPES,
};
use crate::wavelength::nearest_entry;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectorLoss {
    pub connector_type: String,
    pub count: u32,
    pub loss_per_connector_db: f64,
    pub total_loss_db: f64,
    pub recognized: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpliceLoss {
    pub splice_type: String,
    pub count: u32,
    pub loss_per_splice_db: f64,
    pub total_loss_db: f64,
    pub recognized: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FiberAttenuation {
    pub fiber_type: String,
    /// Requested wavelength, not the table entry it resolved to.
    pub wavelength_nm: u32,
    pub resolved_wavelength_nm: u32,
    pub length_km: f64,
    pub attenuation_db_per_km: f64,
    pub total_loss_db: f64,
    pub recognized: bool,
}

/// Loss of `count` mated pairs of the given connector style. The style
/// is matched case-insensitively (`"lc-apc"` is `LC-APC`).
pub fn connector_loss(connector_type: &str, count: u32) -> ConnectorLoss {
    let key = connector_type.trim().to_ascii_uppercase();
    let (loss_per, recognized) = match lookup(CONNECTOR_TYPES, &key) {
        Some(db) => (db, true),
        None => {
            tracing::warn!(
                connector_type,
                loss_db = CONNECTOR_LOSS_TYPICAL,
                "unknown connector type, using FOA typical loss"
            );
            (CONNECTOR_LOSS_TYPICAL, false)
        }
    };
    ConnectorLoss {
        connector_type: connector_type.to_string(),
        count,
        loss_per_connector_db: loss_per,
        total_loss_db: loss_per * f64::from(count),
        recognized,
    }
}

/// Loss of `count` splices made with the given method (`fusion` or
/// `mechanical`, case-insensitive).
pub fn splice_loss(splice_type: &str, count: u32) -> SpliceLoss {
    let key = splice_type.trim().to_ascii_lowercase();
    let (loss_per, recognized) = match lookup(SPLICE_TYPES, &key) {
        Some(db) => (db, true),
        None => {
            tracing::warn!(
                splice_type,
                loss_db = FUSION_SPLICE_TYPICAL,
                "unknown splice type, using fusion typical loss"
            );
            (FUSION_SPLICE_TYPICAL, false)
        }
    };
    SpliceLoss {
        splice_type: splice_type.to_string(),
        count,
        loss_per_splice_db: loss_per,
        total_loss_db: loss_per * f64::from(count),
        recognized,
    }
}

/// Attenuation of a `length_km` run of the given fiber subtype (`SM`,
/// `MM-OM1` .. `MM-OM5`) at the nearest tabulated wavelength.
pub fn fiber_attenuation(fiber_type: &str, wavelength_nm: u32, length_km: f64) -> FiberAttenuation {
    let (table, recognized) = match lookup(FIBER_SUBTYPE_ATTENUATION, fiber_type) {
        Some(table) => (table, true),
        None => {
            tracing::warn!(fiber_type, "unknown fiber subtype, using singlemode table");
            (SM_ATTENUATION, false)
        }
    };
    // Static tables are never empty; the fallback only guards the type.
    let (resolved_wavelength_nm, atten_per_km) =
        nearest_entry(table, wavelength_nm).unwrap_or(SM_ATTENUATION[0]);

    FiberAttenuation {
        fiber_type: fiber_type.to_string(),
        wavelength_nm,
        resolved_wavelength_nm,
        length_km,
        attenuation_db_per_km: atten_per_km,
        total_loss_db: atten_per_km * length_km,
        recognized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connector_known_types() {
        let r = connector_loss("LC-APC", 4);
        assert_eq!(r.loss_per_connector_db, 0.30);
        assert!((r.total_loss_db - 1.2).abs() < 1e-9);
        assert!(r.recognized);

        let r = connector_loss("mpo", 2);
        assert_eq!(r.loss_per_connector_db, 0.50);
        assert_eq!(r.connector_type, "mpo");
    }

    #[test]
    fn connector_unknown_uses_foa_typical() {
        let r = connector_loss("E2000", 2);
        assert_eq!(r.loss_per_connector_db, 0.75);
        assert_eq!(r.total_loss_db, 1.5);
        assert!(!r.recognized);
    }

    #[test]
    fn splice_types() {
        assert_eq!(splice_loss("Mechanical", 1).loss_per_splice_db, 0.3);
        assert_eq!(splice_loss("fusion", 10).total_loss_db, 1.0);
        let unknown = splice_loss("ribbon", 3);
        assert_eq!(unknown.loss_per_splice_db, 0.1);
        assert!(!unknown.recognized);
    }

    #[test]
    fn zero_count_is_zero_loss() {
        assert_eq!(connector_loss("ST", 0).total_loss_db, 0.0);
        assert_eq!(splice_loss("fusion", 0).total_loss_db, 0.0);
    }

    #[test]
    fn fiber_subtypes() {
        let r = fiber_attenuation("SM", 1550, 20.0);
        assert_eq!(r.attenuation_db_per_km, 0.25);
        assert_eq!(r.total_loss_db, 5.0);

        let r = fiber_attenuation("MM-OM4", 850, 0.3);
        assert_eq!(r.attenuation_db_per_km, 3.0);
        assert_eq!(r.resolved_wavelength_nm, 850);
        assert!((r.total_loss_db - 0.9).abs() < 1e-9);
        assert!(r.recognized);
    }

    #[test]
    fn multimode_grades_share_attenuation() {
        for grade in ["MM-OM1", "MM-OM2", "MM-OM3", "MM-OM4", "MM-OM5"] {
            assert_eq!(fiber_attenuation(grade, 1300, 1.0).attenuation_db_per_km, 1.0);
        }
    }

    #[test]
    fn fiber_unknown_subtype_uses_sm_table_with_nearest_wavelength() {
        let r = fiber_attenuation("OS1a", 1550, 10.0);
        assert!(!r.recognized);
        assert_eq!(r.attenuation_db_per_km, 0.25);
        assert_eq!(r.resolved_wavelength_nm, 1550);

        // Plain "MM" is a link budget family, not a loss calculator subtype.
        assert!(!fiber_attenuation("MM", 850, 1.0).recognized);
    }

    #[test]
    fn fiber_tie_resolves_to_shorter_wavelength() {
        let r = fiber_attenuation("MM-OM3", 1075, 1.0);
        assert_eq!(r.resolved_wavelength_nm, 850);
        assert_eq!(r.wavelength_nm, 1075);
    }
}
