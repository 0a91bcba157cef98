//! # fiberkit
//!
//! Command-line front end for the fiber link engineering calculators.
//!
//! ## Usage
//!
//! ```bash
//! # Link budget for a 10 km singlemode run
//! fiberkit link-budget --tx-power 0 --rx-sensitivity -28 --fiber-length 10 \
//!   --connectors 4 --splices 2
//!
//! # Component losses
//! fiberkit loss connector --type LC-APC --count 4
//! fiberkit loss fiber --type MM-OM3 --wavelength 850 --length 0.3
//!
//! # Batch of links from a TOML file, as JSON
//! fiberkit --json scenarios links.toml
//! ```
//!
//! Logs go to stderr; set `RUST_LOG=debug` to see how each value was
//! resolved.

mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fiberkit_core::capacity::{self, DEFAULT_GROWTH, DEFAULT_REDUNDANCY};
use fiberkit_core::config::ScenarioSet;
use fiberkit_core::tables::{DEFAULT_WAVELENGTH_NM, SAFETY_MARGIN_MIN};
use fiberkit_core::{loss, otdr, wavelength, LinkBudgetParams};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Fiber optic link engineering toolkit (FOA / TIA values).
#[derive(Parser, Debug)]
#[command(name = "fiberkit", version, about = "Fiber optic link engineering toolkit")]
struct Cli {
    /// Print results as JSON instead of tables.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    /// Disable ANSI color in table output.
    #[arg(long, global = true, default_value_t = false)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Link budget and System Operating Margin.
    LinkBudget(LinkBudgetArgs),

    /// Connector, splice or fiber loss.
    #[command(subcommand)]
    Loss(LossCommand),

    /// Wavelength reference, dispersion and CWDM grid.
    #[command(subcommand)]
    Wavelength(WavelengthCommand),

    /// Strand count sizing and conduit fill.
    #[command(subcommand)]
    Capacity(CapacityCommand),

    /// FOA loss values and fiber type reference.
    Standards {
        #[arg(long, value_enum, default_value_t = StandardsSection::All)]
        show: StandardsSection,
    },

    /// Analyze OTDR trace events (JSON) and optionally run a link budget
    /// with the measured values.
    Otdr {
        /// JSON array of trace events.
        file: PathBuf,

        /// Transmitter power (dBm); with --rx-sensitivity, runs a link budget.
        #[arg(long, allow_negative_numbers = true, requires = "rx_sensitivity")]
        tx_power: Option<f64>,

        /// Receiver sensitivity (dBm).
        #[arg(long, allow_negative_numbers = true, requires = "tx_power")]
        rx_sensitivity: Option<f64>,

        /// Wavelength (nm) for the link budget.
        #[arg(long, default_value_t = DEFAULT_WAVELENGTH_NM)]
        wavelength: u32,

        /// Fiber type for the link budget.
        #[arg(long, default_value = "SM")]
        fiber_type: String,
    },

    /// Link budgets for every link in a TOML scenario file.
    Scenarios {
        file: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct LinkBudgetArgs {
    /// Transmitter power (dBm).
    #[arg(long, allow_negative_numbers = true)]
    tx_power: f64,

    /// Receiver sensitivity (dBm).
    #[arg(long, allow_negative_numbers = true)]
    rx_sensitivity: f64,

    /// Fiber length (km).
    #[arg(long, allow_negative_numbers = true)]
    fiber_length: f64,

    /// Wavelength (nm).
    #[arg(long, default_value_t = DEFAULT_WAVELENGTH_NM)]
    wavelength: u32,

    /// Fiber type: SM or MM.
    #[arg(long, default_value = "SM")]
    fiber_type: String,

    /// Number of mated connector pairs.
    #[arg(long, default_value_t = 0)]
    connectors: u32,

    /// Number of splices.
    #[arg(long, default_value_t = 0)]
    splices: u32,

    /// Loss per connector (dB), FOA typical if omitted.
    #[arg(long)]
    connector_loss: Option<f64>,

    /// Loss per splice (dB), fusion typical if omitted.
    #[arg(long)]
    splice_loss: Option<f64>,

    /// Fiber attenuation (dB/km), standard table if omitted.
    #[arg(long)]
    fiber_loss: Option<f64>,

    /// Required safety margin (dB).
    #[arg(long, default_value_t = SAFETY_MARGIN_MIN)]
    safety_margin: f64,
}

impl LinkBudgetArgs {
    fn into_params(self) -> LinkBudgetParams {
        let mut params = LinkBudgetParams::new(self.tx_power, self.rx_sensitivity, self.fiber_length)
            .wavelength(self.wavelength)
            .fiber_type(self.fiber_type)
            .connectors(self.connectors)
            .splices(self.splices)
            .safety_margin(self.safety_margin);
        params.connector_loss_db = self.connector_loss;
        params.splice_loss_db = self.splice_loss;
        params.fiber_loss_db_per_km = self.fiber_loss;
        params
    }
}

#[derive(Subcommand, Debug)]
enum LossCommand {
    /// Loss of mated connector pairs.
    Connector {
        /// SC-UPC, SC-APC, LC-UPC, LC-APC, ST, FC-UPC, FC-APC or MPO.
        #[arg(long = "type")]
        connector_type: String,
        #[arg(long, default_value_t = 1)]
        count: u32,
    },
    /// Loss of splices.
    Splice {
        /// fusion or mechanical.
        #[arg(long = "type")]
        splice_type: String,
        #[arg(long, default_value_t = 1)]
        count: u32,
    },
    /// Attenuation of a fiber run.
    Fiber {
        /// SM, MM-OM1, MM-OM2, MM-OM3, MM-OM4 or MM-OM5.
        #[arg(long = "type")]
        fiber_type: String,
        /// Wavelength (nm).
        #[arg(long)]
        wavelength: u32,
        /// Length (km).
        #[arg(long)]
        length: f64,
    },
}

#[derive(Subcommand, Debug)]
enum WavelengthCommand {
    /// Transmission window and attenuation for a wavelength.
    Info {
        #[arg(long)]
        wavelength: u32,
    },
    /// Accumulated chromatic dispersion.
    Dispersion {
        #[arg(long)]
        wavelength: u32,
        /// Length (km).
        #[arg(long)]
        length: f64,
    },
    /// List the CWDM channel grid.
    Cwdm,
}

#[derive(Subcommand, Debug)]
enum CapacityCommand {
    /// Recommended cable strand count.
    Strands {
        #[arg(long)]
        endpoints: u32,
        #[arg(long, default_value_t = DEFAULT_REDUNDANCY)]
        redundancy: f64,
        #[arg(long, default_value_t = DEFAULT_GROWTH)]
        growth: f64,
    },
    /// Conduit fill percentage and compliance.
    Conduit {
        /// Conduit inner diameter (mm).
        #[arg(long)]
        conduit_diameter: f64,
        /// Cable outer diameter (mm).
        #[arg(long)]
        cable_diameter: f64,
        #[arg(long, default_value_t = 1)]
        cable_count: u32,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum StandardsSection {
    Foa,
    Fibers,
    All,
}

/// Where results go: pretty JSON or rendered tables.
struct Output {
    json: bool,
    color: bool,
}

impl Output {
    fn emit<T: Serialize>(&self, value: &T, table: impl FnOnce(bool) -> String) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            print!("{}", table(self.color));
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    // ── Logging ─────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let out = Output {
        json: cli.json,
        color: !cli.no_color,
    };

    tracing::debug!(command = ?cli.command, json = out.json, "fiberkit starting");

    match cli.command {
        Command::LinkBudget(args) => {
            let input = args.into_params().resolve();
            let result = input.calculate();
            out.emit(&render::LinkBudgetReport::new(None, &input, &result), |color| {
                render::link_budget(&input, &result, color)
            })?;
        }

        Command::Loss(LossCommand::Connector {
            connector_type,
            count,
        }) => {
            let r = loss::connector_loss(&connector_type, count);
            out.emit(&r, |color| render::connector_loss(&r, color))?;
        }
        Command::Loss(LossCommand::Splice { splice_type, count }) => {
            let r = loss::splice_loss(&splice_type, count);
            out.emit(&r, |color| render::splice_loss(&r, color))?;
        }
        Command::Loss(LossCommand::Fiber {
            fiber_type,
            wavelength,
            length,
        }) => {
            let r = loss::fiber_attenuation(&fiber_type, wavelength, length);
            out.emit(&r, |color| render::fiber_attenuation(&r, color))?;
        }

        Command::Wavelength(WavelengthCommand::Info { wavelength }) => {
            let info = wavelength::wavelength_info(wavelength);
            out.emit(&info, |color| render::wavelength_info(wavelength, info, color))?;
        }
        Command::Wavelength(WavelengthCommand::Dispersion { wavelength, length }) => {
            let ps_per_nm = wavelength::chromatic_dispersion(wavelength, length);
            out.emit(
                &serde_json::json!({
                    "wavelength_nm": wavelength,
                    "length_km": length,
                    "dispersion_ps_per_nm": ps_per_nm,
                }),
                |_| render::dispersion(wavelength, length, ps_per_nm),
            )?;
        }
        Command::Wavelength(WavelengthCommand::Cwdm) => {
            let channels = wavelength::cwdm_channels();
            out.emit(&channels, |color| render::cwdm(&channels, color))?;
        }

        Command::Capacity(CapacityCommand::Strands {
            endpoints,
            redundancy,
            growth,
        }) => {
            let r = capacity::strand_count(endpoints, redundancy, growth);
            out.emit(&r, |color| render::strand_count(endpoints, &r, color))?;
        }
        Command::Capacity(CapacityCommand::Conduit {
            conduit_diameter,
            cable_diameter,
            cable_count,
        }) => {
            let r = capacity::conduit_fill(conduit_diameter, cable_diameter, cable_count);
            out.emit(&r, |color| render::conduit_fill(cable_count, &r, color))?;
        }

        Command::Standards { show } => {
            let foa = matches!(show, StandardsSection::Foa | StandardsSection::All);
            let fibers = matches!(show, StandardsSection::Fibers | StandardsSection::All);
            out.emit(
                &serde_json::json!({
                    "foa": foa.then_some(fiberkit_core::standards::FOA_STANDARDS),
                    "fiber_types": fibers.then_some(fiberkit_core::standards::FIBER_TYPES),
                }),
                |color| {
                    let mut text = String::new();
                    if foa {
                        text.push_str(&render::foa_standards(color));
                    }
                    if foa && fibers {
                        text.push('\n');
                    }
                    if fibers {
                        text.push_str(&render::fiber_types(color));
                    }
                    text
                },
            )?;
        }

        Command::Otdr {
            file,
            tx_power,
            rx_sensitivity,
            wavelength,
            fiber_type,
        } => {
            let events = otdr::load_events(&file)?;
            let analysis = otdr::analyze(&events)?;
            tracing::info!(path = %file.display(), events = events.len(), "trace analyzed");

            match tx_power.zip(rx_sensitivity) {
                Some((tx, rx)) => {
                    let input = analysis
                        .link_budget_params(tx, rx)
                        .wavelength(wavelength)
                        .fiber_type(fiber_type)
                        .resolve();
                    let result = input.calculate();
                    out.emit(
                        &serde_json::json!({
                            "analysis": &analysis,
                            "link_budget": render::LinkBudgetReport::new(None, &input, &result),
                        }),
                        |color| {
                            format!(
                                "{}\n{}",
                                render::trace_analysis(&analysis, color),
                                render::link_budget(&input, &result, color)
                            )
                        },
                    )?;
                }
                None => out.emit(&analysis, |color| render::trace_analysis(&analysis, color))?,
            }
        }

        Command::Scenarios { file } => {
            let set = ScenarioSet::from_file(&file)?;
            tracing::info!(path = %file.display(), links = set.scenarios.len(), "scenarios loaded");
            let results = set.calculate_all();
            let reports: Vec<_> = set
                .scenarios
                .iter()
                .zip(&results)
                .map(|(s, (name, r))| render::LinkBudgetReport::new(Some(*name), &s.input, r))
                .collect();
            out.emit(&reports, |color| render::scenario_summary(&results, color))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn link_budget_args_accept_negative_power() {
        let cli = Cli::try_parse_from([
            "fiberkit",
            "link-budget",
            "--tx-power",
            "-3",
            "--rx-sensitivity",
            "-28",
            "--fiber-length",
            "50",
            "--wavelength",
            "1550",
            "--splices",
            "10",
        ])
        .unwrap();
        let Command::LinkBudget(args) = cli.command else {
            panic!("expected link-budget");
        };
        let params = args.into_params();
        assert_eq!(params.tx_power_dbm, -3.0);
        assert_eq!(params.rx_sensitivity_dbm, -28.0);
        assert_eq!(params.wavelength_nm, 1550);
        assert_eq!(params.splice_count, 10);
        assert_eq!(params.fiber_type, "SM");
        assert_eq!(params.safety_margin_db, SAFETY_MARGIN_MIN);
        assert_eq!(params.connector_loss_db, None);
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from(["fiberkit", "wavelength", "cwdm", "--json"]).unwrap();
        assert!(cli.json);
        assert!(!cli.no_color);
    }

    #[test]
    fn otdr_budget_needs_both_powers() {
        assert!(Cli::try_parse_from(["fiberkit", "otdr", "trace.json", "--tx-power", "0"]).is_err());
        assert!(Cli::try_parse_from([
            "fiberkit",
            "otdr",
            "trace.json",
            "--tx-power",
            "0",
            "--rx-sensitivity",
            "-28",
        ])
        .is_ok());
    }
}
