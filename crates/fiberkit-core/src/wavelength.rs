//! Wavelength handling: nearest-table-entry resolution, the transmission
//! window reference, chromatic dispersion and the CWDM channel grid.

use serde::Serialize;

/// Resolve `wavelength_nm` to the table entry with the smallest absolute
/// distance.
///
/// Ties go to the shorter wavelength: the table is ordered ascending and
/// the first minimum wins (e.g. 1075 nm on the MM table, equidistant from
/// 850 and 1300, resolves to 850). Returns `None` only for an empty table.
pub fn nearest_entry(table: &[(u32, f64)], wavelength_nm: u32) -> Option<(u32, f64)> {
    table
        .iter()
        .copied()
        .min_by_key(|&(nm, _)| nm.abs_diff(wavelength_nm))
}

// ─── Reference data ─────────────────────────────────────────────────────────

/// Dispersion coefficient assumed for wavelengths outside the reference
/// (standard SMF at 1550 nm), ps/(nm·km).
pub const DEFAULT_DISPERSION_PS_NM_KM: f64 = 17.0;

/// Reference data for a common operating wavelength.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WavelengthInfo {
    pub wavelength_nm: u32,
    pub window: &'static str,
    pub fiber: &'static str,
    /// Chromatic dispersion coefficient, ps/(nm·km).
    pub dispersion_ps_nm_km: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attenuation_mm_db_per_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attenuation_sm_db_per_km: Option<f64>,
}

pub const WAVELENGTHS: &[WavelengthInfo] = &[
    WavelengthInfo {
        wavelength_nm: 850,
        window: "First",
        fiber: "MM",
        dispersion_ps_nm_km: 0.0,
        attenuation_mm_db_per_km: Some(3.0),
        attenuation_sm_db_per_km: None,
    },
    WavelengthInfo {
        wavelength_nm: 1300,
        window: "Second",
        fiber: "MM/SM",
        dispersion_ps_nm_km: 0.0,
        attenuation_mm_db_per_km: Some(1.0),
        attenuation_sm_db_per_km: Some(0.35),
    },
    WavelengthInfo {
        wavelength_nm: 1310,
        window: "O-band",
        fiber: "SM",
        dispersion_ps_nm_km: 0.0,
        attenuation_mm_db_per_km: None,
        attenuation_sm_db_per_km: Some(0.35),
    },
    WavelengthInfo {
        wavelength_nm: 1550,
        window: "C-band",
        fiber: "SM",
        dispersion_ps_nm_km: 17.0,
        attenuation_mm_db_per_km: None,
        attenuation_sm_db_per_km: Some(0.25),
    },
];

/// Exact lookup in the reference; no nearest-match here.
pub fn wavelength_info(wavelength_nm: u32) -> Option<&'static WavelengthInfo> {
    WAVELENGTHS.iter().find(|w| w.wavelength_nm == wavelength_nm)
}

/// Accumulated chromatic dispersion over `length_km`, in ps/nm.
pub fn chromatic_dispersion(wavelength_nm: u32, length_km: f64) -> f64 {
    let coefficient = match wavelength_info(wavelength_nm) {
        Some(info) => info.dispersion_ps_nm_km,
        None => {
            tracing::debug!(
                wavelength_nm,
                coefficient = DEFAULT_DISPERSION_PS_NM_KM,
                "wavelength not in reference, assuming standard SMF dispersion"
            );
            DEFAULT_DISPERSION_PS_NM_KM
        }
    };
    coefficient * length_km
}

// ─── CWDM (ITU-T G.694.2) ───────────────────────────────────────────────────

pub const CWDM_FIRST_NM: u32 = 1270;
pub const CWDM_LAST_NM: u32 = 1610;
pub const CWDM_SPACING_NM: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CwdmChannel {
    /// 1-based channel number.
    pub channel: u32,
    pub wavelength_nm: u32,
}

pub fn cwdm_channels() -> Vec<CwdmChannel> {
    (CWDM_FIRST_NM..=CWDM_LAST_NM)
        .step_by(CWDM_SPACING_NM as usize)
        .zip(1..)
        .map(|(wavelength_nm, channel)| CwdmChannel {
            channel,
            wavelength_nm,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{MM_ATTENUATION, SM_ATTENUATION};

    #[test]
    fn exact_key_returns_its_value() {
        assert_eq!(nearest_entry(SM_ATTENUATION, 1310), Some((1310, 0.35)));
        assert_eq!(nearest_entry(SM_ATTENUATION, 1550), Some((1550, 0.25)));
        assert_eq!(nearest_entry(MM_ATTENUATION, 850), Some((850, 3.0)));
    }

    #[test]
    fn nearest_key_wins() {
        assert_eq!(nearest_entry(SM_ATTENUATION, 1490), Some((1550, 0.25)));
        assert_eq!(nearest_entry(SM_ATTENUATION, 1400), Some((1310, 0.35)));
        assert_eq!(nearest_entry(MM_ATTENUATION, 1310), Some((1300, 1.0)));
        assert_eq!(nearest_entry(MM_ATTENUATION, 0), Some((850, 3.0)));
        assert_eq!(nearest_entry(SM_ATTENUATION, u32::MAX), Some((1550, 0.25)));
    }

    #[test]
    fn tie_picks_shorter_wavelength() {
        // 1430 is 120 nm from both 1310 and 1550.
        assert_eq!(nearest_entry(SM_ATTENUATION, 1430), Some((1310, 0.35)));
        // 1075 is 225 nm from both 850 and 1300.
        assert_eq!(nearest_entry(MM_ATTENUATION, 1075), Some((850, 3.0)));
    }

    #[test]
    fn resolution_is_idempotent() {
        for nm in [0, 850, 1075, 1310, 1430, 1625] {
            assert_eq!(
                nearest_entry(SM_ATTENUATION, nm),
                nearest_entry(SM_ATTENUATION, nm)
            );
        }
    }

    #[test]
    fn empty_table_has_no_entry() {
        assert_eq!(nearest_entry(&[], 1310), None);
    }

    #[test]
    fn info_is_exact_match_only() {
        assert_eq!(wavelength_info(1550).map(|w| w.window), Some("C-band"));
        assert_eq!(wavelength_info(1300).map(|w| w.fiber), Some("MM/SM"));
        assert!(wavelength_info(1551).is_none());
    }

    #[test]
    fn dispersion_uses_reference_or_default() {
        assert_eq!(chromatic_dispersion(1550, 40.0), 680.0);
        assert_eq!(chromatic_dispersion(1310, 40.0), 0.0);
        assert_eq!(chromatic_dispersion(1590, 10.0), 170.0);
    }

    #[test]
    fn cwdm_grid() {
        let channels = cwdm_channels();
        assert_eq!(channels.len(), 18);
        assert_eq!(
            channels[0],
            CwdmChannel {
                channel: 1,
                wavelength_nm: 1270
            }
        );
        assert_eq!(
            channels[17],
            CwdmChannel {
                channel: 18,
                wavelength_nm: 1610
            }
        );
        assert!(channels.windows(2).all(|w| w[1].wavelength_nm - w[0].wavelength_nm == 20));
    }
}
