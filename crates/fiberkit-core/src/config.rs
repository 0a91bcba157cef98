//! TOML scenario files: named batches of link budgets.
//!
//! ```toml
//! version = 1
//!
//! [defaults]
//! wavelength_nm = 1550
//! safety_margin_db = 6.0
//!
//! [[links]]
//! name = "campus-backbone"
//! tx_power_dbm = 0.0
//! rx_sensitivity_dbm = -28.0
//! fiber_length_km = 10.0
//! connector_count = 4
//! splice_count = 2
//! ```
//!
//! Per-link keys override `[defaults]`, which override the builder
//! defaults of [`LinkBudgetParams::new`].

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::{FiberError, FiberResult};
use crate::link_budget::{LinkBudgetInput, LinkBudgetParams, LinkBudgetResult};

pub const CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioFileInput {
    pub version: u32,
    pub defaults: LinkDefaultsInput,
    pub links: Vec<LinkScenarioInput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinkDefaultsInput {
    pub wavelength_nm: Option<u32>,
    pub fiber_type: Option<String>,
    pub connector_loss_db: Option<f64>,
    pub splice_loss_db: Option<f64>,
    pub fiber_loss_db_per_km: Option<f64>,
    pub safety_margin_db: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinkScenarioInput {
    pub name: Option<String>,
    pub tx_power_dbm: Option<f64>,
    pub rx_sensitivity_dbm: Option<f64>,
    pub fiber_length_km: Option<f64>,
    pub wavelength_nm: Option<u32>,
    pub fiber_type: Option<String>,
    pub connector_count: Option<u32>,
    pub splice_count: Option<u32>,
    pub connector_loss_db: Option<f64>,
    pub splice_loss_db: Option<f64>,
    pub fiber_loss_db_per_km: Option<f64>,
    pub safety_margin_db: Option<f64>,
}

/// One named, resolved link.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub input: LinkBudgetInput,
}

impl Scenario {
    pub fn calculate(&self) -> LinkBudgetResult {
        self.input.calculate()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioSet {
    pub version: u32,
    pub scenarios: Vec<Scenario>,
}

fn required(value: Option<f64>, field: &str, link: &str) -> FiberResult<f64> {
    value.ok_or_else(|| FiberError::InvalidConfig(format!("link {link:?}: missing {field}")))
}

impl LinkScenarioInput {
    /// Trimmed, non-empty name as written in the file.
    fn explicit_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }

    fn resolve(self, name: String, defaults: &LinkDefaultsInput) -> FiberResult<Scenario> {
        let mut params = LinkBudgetParams::new(
            required(self.tx_power_dbm, "tx_power_dbm", &name)?,
            required(self.rx_sensitivity_dbm, "rx_sensitivity_dbm", &name)?,
            required(self.fiber_length_km, "fiber_length_km", &name)?,
        )
        .connectors(self.connector_count.unwrap_or(0))
        .splices(self.splice_count.unwrap_or(0));

        if let Some(nm) = self.wavelength_nm.or(defaults.wavelength_nm) {
            params = params.wavelength(nm);
        }
        if let Some(fiber) = self.fiber_type.or_else(|| defaults.fiber_type.clone()) {
            params = params.fiber_type(fiber);
        }
        if let Some(margin) = self.safety_margin_db.or(defaults.safety_margin_db) {
            params = params.safety_margin(margin);
        }
        params.connector_loss_db = self.connector_loss_db.or(defaults.connector_loss_db);
        params.splice_loss_db = self.splice_loss_db.or(defaults.splice_loss_db);
        params.fiber_loss_db_per_km = self.fiber_loss_db_per_km.or(defaults.fiber_loss_db_per_km);

        Ok(Scenario {
            name,
            input: params.resolve(),
        })
    }
}

impl ScenarioFileInput {
    pub fn resolve(self) -> FiberResult<ScenarioSet> {
        let version = if self.version == 0 {
            CONFIG_VERSION
        } else {
            self.version
        };
        if version != CONFIG_VERSION {
            return Err(FiberError::InvalidConfig(format!(
                "unsupported config version {version}"
            )));
        }

        // Names are settled before any link is resolved: a repeated
        // explicit name drops the later entry, and generated `link-N`
        // names never take a name written elsewhere in the file.
        let explicit: HashSet<String> = self
            .links
            .iter()
            .filter_map(|l| l.explicit_name().map(str::to_string))
            .collect();
        let mut used = HashSet::new();
        let mut scenarios = Vec::new();
        for (idx, link) in self.links.into_iter().enumerate() {
            let name = match link.explicit_name() {
                Some(name) => {
                    if !used.insert(name.to_string()) {
                        tracing::warn!(name, "duplicate scenario name, keeping the first");
                        continue;
                    }
                    name.to_string()
                }
                None => {
                    let name = (idx + 1..)
                        .map(|n| format!("link-{n}"))
                        .find(|n| !explicit.contains(n) && !used.contains(n))
                        .unwrap_or_default();
                    used.insert(name.clone());
                    name
                }
            };
            scenarios.push(link.resolve(name, &self.defaults)?);
        }

        Ok(ScenarioSet { version, scenarios })
    }
}

impl ScenarioSet {
    pub fn from_toml_str(input: &str) -> FiberResult<Self> {
        if input.trim().is_empty() {
            return Ok(ScenarioSet {
                version: CONFIG_VERSION,
                scenarios: Vec::new(),
            });
        }
        let parsed: ScenarioFileInput = toml::from_str(input)
            .map_err(|e| FiberError::InvalidConfig(format!("invalid scenario TOML: {e}")))?;
        parsed.resolve()
    }

    pub fn from_file(path: impl AsRef<Path>) -> FiberResult<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| FiberError::unavailable(path, e))?;
        Self::from_toml_str(&contents)
    }

    /// Calculate every scenario, in file order.
    pub fn calculate_all(&self) -> Vec<(&str, LinkBudgetResult)> {
        self.scenarios
            .iter()
            .map(|s| (s.name.as_str(), s.calculate()))
            .collect()
    }
}
