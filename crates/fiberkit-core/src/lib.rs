//! # fiberkit-core
//!
//! Fiber-optic link engineering calculators.
//!
//! Every calculator maps a handful of numeric inputs and categorical
//! lookups (fiber type, wavelength, connector/splice type) through fixed
//! FOA / TIA constants to a plain result struct. Nothing here performs
//! I/O except the OTDR event loader and the scenario file loader.
//!
//! ## Crate structure
//!
//! - [`tables`] — Attenuation tables and FOA scalar defaults
//! - [`wavelength`] — Nearest-wavelength resolution, dispersion, CWDM grid
//! - [`link_budget`] — Link budget engine (SOM + PASS/MARGINAL/FAIL)
//! - [`loss`] — Standalone connector, splice and fiber loss calculator
//! - [`capacity`] — Strand count sizing and conduit fill
//! - [`standards`] — FOA / fiber type quick reference
//! - [`otdr`] — Analysis of structured OTDR trace events
//! - [`config`] — TOML scenario files for batches of link budgets
//! - [`error`] — Error type for the fallible parts of the toolkit

pub mod capacity;
pub mod config;
pub mod error;
pub mod link_budget;
pub mod loss;
pub mod otdr;
pub mod standards;
pub mod tables;
pub mod wavelength;

pub use error::{FiberError, FiberResult};
pub use link_budget::{
    calculate, LinkBudgetInput, LinkBudgetParams, LinkBudgetResult, LinkStatus, ValueSource,
};
