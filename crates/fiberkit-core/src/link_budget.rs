//! # Link Budget Engine
//!
//! Computes the System Operating Margin (SOM) of a fiber link and grades
//! it PASS / MARGINAL / FAIL.
//!
//! Usage is two-step: [`LinkBudgetParams`] carries the caller's numbers
//! and optional overrides, [`LinkBudgetParams::resolve`] fixes the
//! effective per-unit losses exactly once, and [`calculate`] turns the
//! resulting [`LinkBudgetInput`] into a [`LinkBudgetResult`].
//!
//! ```
//! use fiberkit_core::{LinkBudgetParams, LinkStatus};
//!
//! let input = LinkBudgetParams::new(0.0, -28.0, 10.0)
//!     .connectors(4)
//!     .splices(2)
//!     .resolve();
//! let result = input.calculate();
//! assert_eq!(result.status, LinkStatus::Pass);
//! assert!((result.som_db - 18.3).abs() < 1e-9);
//! ```

use serde::Serialize;

use crate::tables::{
    FiberFamily, CONNECTOR_LOSS_TYPICAL, DEFAULT_WAVELENGTH_NM, FUSION_SPLICE_TYPICAL,
    SAFETY_MARGIN_MIN, UNSUPPORTED_FIBER_ATTENUATION,
};
use crate::wavelength::nearest_entry;

/// SOM at or above which the margin is graded excellent (dB).
pub const EXCELLENT_SOM_DB: f64 = 6.0;
/// SOM at or above which the margin is graded good (dB).
pub const GOOD_SOM_DB: f64 = 3.0;
/// SOM at or above which the link still closes (dB).
pub const MARGINAL_SOM_DB: f64 = 0.0;

// ─── Parameters ─────────────────────────────────────────────────────────────

/// Caller-supplied link description, before any table lookups.
///
/// `new` fills the same defaults as the command line: 1310 nm, `"SM"`,
/// no connectors or splices, no overrides, 3 dB safety margin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkBudgetParams {
    pub tx_power_dbm: f64,
    pub rx_sensitivity_dbm: f64,
    pub fiber_length_km: f64,
    pub wavelength_nm: u32,
    /// Fiber type token; `"SM"` and `"MM"` are recognised.
    pub fiber_type: String,
    pub connector_count: u32,
    pub splice_count: u32,
    pub connector_loss_db: Option<f64>,
    pub splice_loss_db: Option<f64>,
    pub fiber_loss_db_per_km: Option<f64>,
    pub safety_margin_db: f64,
}

impl LinkBudgetParams {
    pub fn new(tx_power_dbm: f64, rx_sensitivity_dbm: f64, fiber_length_km: f64) -> Self {
        Self {
            tx_power_dbm,
            rx_sensitivity_dbm,
            fiber_length_km,
            wavelength_nm: DEFAULT_WAVELENGTH_NM,
            fiber_type: FiberFamily::Singlemode.to_string(),
            connector_count: 0,
            splice_count: 0,
            connector_loss_db: None,
            splice_loss_db: None,
            fiber_loss_db_per_km: None,
            safety_margin_db: SAFETY_MARGIN_MIN,
        }
    }

    pub fn wavelength(mut self, wavelength_nm: u32) -> Self {
        self.wavelength_nm = wavelength_nm;
        self
    }

    pub fn fiber_type(mut self, fiber_type: impl Into<String>) -> Self {
        self.fiber_type = fiber_type.into();
        self
    }

    pub fn connectors(mut self, count: u32) -> Self {
        self.connector_count = count;
        self
    }

    pub fn splices(mut self, count: u32) -> Self {
        self.splice_count = count;
        self
    }

    /// Per-connector loss override (dB). `0.0` is a valid override.
    pub fn connector_loss(mut self, db: f64) -> Self {
        self.connector_loss_db = Some(db);
        self
    }

    /// Per-splice loss override (dB). `0.0` is a valid override.
    pub fn splice_loss(mut self, db: f64) -> Self {
        self.splice_loss_db = Some(db);
        self
    }

    /// Attenuation coefficient override (dB/km).
    pub fn fiber_loss(mut self, db_per_km: f64) -> Self {
        self.fiber_loss_db_per_km = Some(db_per_km);
        self
    }

    pub fn safety_margin(mut self, db: f64) -> Self {
        self.safety_margin_db = db;
        self
    }

    /// Fix the effective attenuation, connector loss and splice loss.
    ///
    /// Each value comes from the override when present, otherwise from the
    /// standard table (attenuation: nearest wavelength for the fiber
    /// family) or the FOA typical default. An unrecognised fiber type
    /// without an attenuation override gets the singlemode 1310 nm figure;
    /// that case is logged and tagged [`ValueSource::UnsupportedFiberType`].
    pub fn resolve(self) -> LinkBudgetInput {
        let fiber_family = FiberFamily::parse(&self.fiber_type);
        if let Some(family) = fiber_family.filter(|f| f.to_string() != self.fiber_type) {
            tracing::debug!(
                fiber_type = %self.fiber_type,
                fiber_family = %family,
                "fiber type normalized"
            );
        }

        let attenuation = if let Some(db_per_km) = self.fiber_loss_db_per_km {
            Resolved::overridden(db_per_km)
        } else if let Some((family, (wavelength_nm, db_per_km))) = fiber_family.and_then(|f| {
            nearest_entry(f.attenuation_table(), self.wavelength_nm).map(|entry| (f, entry))
        }) {
            Resolved {
                value: db_per_km,
                source: ValueSource::Table {
                    fiber: family,
                    wavelength_nm,
                },
            }
        } else {
            tracing::warn!(
                fiber_type = %self.fiber_type,
                attenuation_db_per_km = UNSUPPORTED_FIBER_ATTENUATION,
                "unsupported fiber type, using singlemode 1310 nm attenuation"
            );
            Resolved {
                value: UNSUPPORTED_FIBER_ATTENUATION,
                source: ValueSource::UnsupportedFiberType,
            }
        };

        let connector_loss = self
            .connector_loss_db
            .map_or(Resolved::default_value(CONNECTOR_LOSS_TYPICAL), Resolved::overridden);
        let splice_loss = self
            .splice_loss_db
            .map_or(Resolved::default_value(FUSION_SPLICE_TYPICAL), Resolved::overridden);

        tracing::debug!(
            fiber_type = %self.fiber_type,
            wavelength_nm = self.wavelength_nm,
            attenuation_db_per_km = attenuation.value,
            attenuation_source = ?attenuation.source,
            connector_loss_db = connector_loss.value,
            splice_loss_db = splice_loss.value,
            "link budget input resolved"
        );

        LinkBudgetInput {
            params: self,
            fiber_family,
            attenuation,
            connector_loss,
            splice_loss,
        }
    }
}

// ─── Resolved input ─────────────────────────────────────────────────────────

/// Where an effective per-unit loss came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueSource {
    /// Explicit caller override.
    Override,
    /// Standard attenuation table entry (the nearest wavelength).
    Table {
        fiber: FiberFamily,
        wavelength_nm: u32,
    },
    /// FOA typical value.
    Default,
    /// Fiber type not recognised; singlemode 1310 nm attenuation used.
    UnsupportedFiberType,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Resolved {
    pub value: f64,
    pub source: ValueSource,
}

impl Resolved {
    fn overridden(value: f64) -> Self {
        Self {
            value,
            source: ValueSource::Override,
        }
    }

    fn default_value(value: f64) -> Self {
        Self {
            value,
            source: ValueSource::Default,
        }
    }
}

/// Immutable, fully resolved link description.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkBudgetInput {
    params: LinkBudgetParams,
    fiber_family: Option<FiberFamily>,
    attenuation: Resolved,
    connector_loss: Resolved,
    splice_loss: Resolved,
}

impl LinkBudgetInput {
    pub fn params(&self) -> &LinkBudgetParams {
        &self.params
    }

    /// Recognised fiber family, `None` for an unsupported type token.
    pub fn fiber_family(&self) -> Option<FiberFamily> {
        self.fiber_family
    }

    /// Effective attenuation coefficient (dB/km) and its origin.
    pub fn attenuation(&self) -> Resolved {
        self.attenuation
    }

    /// Effective loss per connector (dB) and its origin.
    pub fn connector_loss(&self) -> Resolved {
        self.connector_loss
    }

    /// Effective loss per splice (dB) and its origin.
    pub fn splice_loss(&self) -> Resolved {
        self.splice_loss
    }

    /// True when the attenuation is the unsupported-fiber fallback rather
    /// than a genuine table entry or override.
    pub fn is_fallback(&self) -> bool {
        self.attenuation.source == ValueSource::UnsupportedFiberType
    }

    pub fn calculate(&self) -> LinkBudgetResult {
        calculate(self)
    }
}

// ─── Result ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LinkStatus {
    Fail,
    Marginal,
    Pass,
}

impl std::fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkStatus::Fail => write!(f, "FAIL"),
            LinkStatus::Marginal => write!(f, "MARGINAL"),
            LinkStatus::Pass => write!(f, "PASS"),
        }
    }
}

/// Margin grade, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginGrade {
    Insufficient,
    Low,
    Good,
    Excellent,
}

impl MarginGrade {
    /// Grade a SOM value. First matching threshold wins; NaN grades as
    /// insufficient.
    pub fn classify(som_db: f64) -> Self {
        if som_db >= EXCELLENT_SOM_DB {
            MarginGrade::Excellent
        } else if som_db >= GOOD_SOM_DB {
            MarginGrade::Good
        } else if som_db >= MARGINAL_SOM_DB {
            MarginGrade::Low
        } else {
            MarginGrade::Insufficient
        }
    }

    pub fn status(self) -> LinkStatus {
        match self {
            MarginGrade::Excellent | MarginGrade::Good => LinkStatus::Pass,
            MarginGrade::Low => LinkStatus::Marginal,
            MarginGrade::Insufficient => LinkStatus::Fail,
        }
    }

    pub fn detail(self) -> &'static str {
        match self {
            MarginGrade::Excellent => "Excellent margin",
            MarginGrade::Good => "Good margin",
            MarginGrade::Low => "Low margin - monitor",
            MarginGrade::Insufficient => "Insufficient margin",
        }
    }
}

/// Outcome of one link budget calculation. All values in dB.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkBudgetResult {
    pub power_budget_db: f64,
    pub fiber_loss_total_db: f64,
    pub connector_loss_total_db: f64,
    pub splice_loss_total_db: f64,
    pub total_loss_db: f64,
    pub safety_margin_db: f64,
    /// System Operating Margin.
    pub som_db: f64,
    pub grade: MarginGrade,
    pub status: LinkStatus,
    pub status_detail: &'static str,
    pub attenuation_source: ValueSource,
}

/// Compute the link budget for a resolved input. Total over finite inputs;
/// negative lengths are not rejected.
pub fn calculate(input: &LinkBudgetInput) -> LinkBudgetResult {
    let p = &input.params;

    let power_budget_db = p.tx_power_dbm - p.rx_sensitivity_dbm;

    let fiber_loss_total_db = p.fiber_length_km * input.attenuation.value;
    let connector_loss_total_db = f64::from(p.connector_count) * input.connector_loss.value;
    let splice_loss_total_db = f64::from(p.splice_count) * input.splice_loss.value;
    let total_loss_db = fiber_loss_total_db + connector_loss_total_db + splice_loss_total_db;

    let som_db = power_budget_db - total_loss_db - p.safety_margin_db;
    let grade = MarginGrade::classify(som_db);

    LinkBudgetResult {
        power_budget_db,
        fiber_loss_total_db,
        connector_loss_total_db,
        splice_loss_total_db,
        total_loss_db,
        safety_margin_db: p.safety_margin_db,
        som_db,
        grade,
        status: grade.status(),
        status_detail: grade.detail(),
        attenuation_source: input.attenuation.source,
    }
}
