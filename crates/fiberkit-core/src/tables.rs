//! Constant tables: FOA typical/maximum losses and fiber attenuation.
//!
//! All tables are read-only statics. Attenuation tables are ordered slices
//! of `(wavelength_nm, dB/km)` pairs sorted by ascending wavelength; the
//! nearest-wavelength lookup in [`crate::wavelength`] relies on that order
//! to break ties toward the shorter wavelength.

use serde::Serialize;

/// `(wavelength_nm, attenuation_db_per_km)` pairs, ascending by wavelength.
pub type AttenuationTable = &'static [(u32, f64)];

// ─── FOA scalar defaults ────────────────────────────────────────────────────

/// Mated connector pair, typical (dB).
pub const CONNECTOR_LOSS_TYPICAL: f64 = 0.75;
/// Mated connector pair, maximum (dB).
pub const CONNECTOR_LOSS_MAX: f64 = 1.0;
pub const FUSION_SPLICE_TYPICAL: f64 = 0.1;
pub const FUSION_SPLICE_MAX: f64 = 0.3;
pub const MECHANICAL_SPLICE_TYPICAL: f64 = 0.3;
pub const MECHANICAL_SPLICE_MAX: f64 = 0.5;
pub const SAFETY_MARGIN_MIN: f64 = 3.0;
pub const SAFETY_MARGIN_PREFERRED: f64 = 6.0;

/// Attenuation used when the fiber type is not in [`FiberFamily`]
/// (singlemode at 1310 nm).
pub const UNSUPPORTED_FIBER_ATTENUATION: f64 = 0.35;

pub const DEFAULT_WAVELENGTH_NM: u32 = 1310;

// ─── Fiber attenuation ──────────────────────────────────────────────────────

pub const SM_ATTENUATION: AttenuationTable = &[(1310, 0.35), (1550, 0.25)];
pub const MM_ATTENUATION: AttenuationTable = &[(850, 3.0), (1300, 1.0)];

/// Fiber family understood by the link budget engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FiberFamily {
    #[serde(rename = "SM")]
    Singlemode,
    #[serde(rename = "MM")]
    Multimode,
}

impl FiberFamily {
    /// Parse a fiber type token (`"SM"`, `"mm"`, ...). Returns `None` for
    /// anything else; callers decide how to fall back.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if token.eq_ignore_ascii_case("SM") {
            Some(FiberFamily::Singlemode)
        } else if token.eq_ignore_ascii_case("MM") {
            Some(FiberFamily::Multimode)
        } else {
            None
        }
    }

    pub fn attenuation_table(self) -> AttenuationTable {
        match self {
            FiberFamily::Singlemode => SM_ATTENUATION,
            FiberFamily::Multimode => MM_ATTENUATION,
        }
    }
}

impl std::fmt::Display for FiberFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FiberFamily::Singlemode => write!(f, "SM"),
            FiberFamily::Multimode => write!(f, "MM"),
        }
    }
}

/// Per-subtype attenuation used by the standalone loss calculator.
///
/// The multimode grades currently carry identical figures; OM3/OM4/OM5
/// differ in bandwidth, not in the attenuation this table models.
pub const FIBER_SUBTYPE_ATTENUATION: &[(&str, AttenuationTable)] = &[
    ("SM", SM_ATTENUATION),
    ("MM-OM1", MM_ATTENUATION),
    ("MM-OM2", MM_ATTENUATION),
    ("MM-OM3", MM_ATTENUATION),
    ("MM-OM4", MM_ATTENUATION),
    ("MM-OM5", MM_ATTENUATION),
];

// ─── Connectors and splices ─────────────────────────────────────────────────

/// Typical insertion loss per mated pair, by connector style (dB).
pub const CONNECTOR_TYPES: &[(&str, f64)] = &[
    ("SC-UPC", 0.25),
    ("SC-APC", 0.30),
    ("LC-UPC", 0.25),
    ("LC-APC", 0.30),
    ("ST", 0.50),
    ("FC-UPC", 0.30),
    ("FC-APC", 0.35),
    ("MPO", 0.50),
];

/// Typical loss per splice, by splicing method (dB).
pub const SPLICE_TYPES: &[(&str, f64)] = &[
    ("fusion", FUSION_SPLICE_TYPICAL),
    ("mechanical", MECHANICAL_SPLICE_TYPICAL),
];

/// Exact-key lookup in one of the string-keyed tables above.
pub(crate) fn lookup<T: Copy>(table: &[(&'static str, T)], key: &str) -> Option<T> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}
