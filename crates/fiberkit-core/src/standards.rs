//! FOA / TIA quick reference.
//!
//! The FOA loss figures are built from the same constants the link budget
//! engine uses, so the printed reference cannot drift from the math.

use serde::Serialize;

use crate::tables::{
    CONNECTOR_LOSS_MAX, CONNECTOR_LOSS_TYPICAL, FUSION_SPLICE_MAX, FUSION_SPLICE_TYPICAL,
    MECHANICAL_SPLICE_MAX, MECHANICAL_SPLICE_TYPICAL, SAFETY_MARGIN_MIN, SAFETY_MARGIN_PREFERRED,
};

/// One FOA reference item with its two bounding values (dB).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FoaValue {
    pub component: &'static str,
    pub lower_label: &'static str,
    pub lower_db: f64,
    pub upper_label: &'static str,
    pub upper_db: f64,
}

pub const FOA_STANDARDS: &[FoaValue] = &[
    FoaValue {
        component: "Connector loss",
        lower_label: "Typical",
        lower_db: CONNECTOR_LOSS_TYPICAL,
        upper_label: "Maximum",
        upper_db: CONNECTOR_LOSS_MAX,
    },
    FoaValue {
        component: "Fusion splice",
        lower_label: "Typical",
        lower_db: FUSION_SPLICE_TYPICAL,
        upper_label: "Maximum",
        upper_db: FUSION_SPLICE_MAX,
    },
    FoaValue {
        component: "Mechanical splice",
        lower_label: "Typical",
        lower_db: MECHANICAL_SPLICE_TYPICAL,
        upper_label: "Maximum",
        upper_db: MECHANICAL_SPLICE_MAX,
    },
    FoaValue {
        component: "Safety margin",
        lower_label: "Minimum",
        lower_db: SAFETY_MARGIN_MIN,
        upper_label: "Preferred",
        upper_db: SAFETY_MARGIN_PREFERRED,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FiberSpec {
    pub name: &'static str,
    pub core_um: u32,
    pub wavelengths_nm: &'static [u32],
    /// `(wavelength_nm, dB/km)` pairs.
    pub attenuation: &'static [(u32, f64)],
    /// Effective modal bandwidth at 850 nm, MHz·km. Not meaningful for
    /// singlemode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bandwidth_mhz_km: Option<u32>,
}

pub const FIBER_TYPES: &[FiberSpec] = &[
    FiberSpec {
        name: "SM (OS2)",
        core_um: 9,
        wavelengths_nm: &[1310, 1550],
        attenuation: &[(1310, 0.35), (1550, 0.25)],
        bandwidth_mhz_km: None,
    },
    FiberSpec {
        name: "MM OM3",
        core_um: 50,
        wavelengths_nm: &[850],
        attenuation: &[(850, 3.0)],
        bandwidth_mhz_km: Some(2000),
    },
    FiberSpec {
        name: "MM OM4",
        core_um: 50,
        wavelengths_nm: &[850],
        attenuation: &[(850, 3.0)],
        bandwidth_mhz_km: Some(4700),
    },
];
