//! Text rendering for calculator results.
//!
//! Every numeric field is printed with two decimals and a unit suffix.
//! Link status is colored PASS green, MARGINAL yellow, FAIL red when
//! color output is enabled.

use std::fmt::{self, Write};

use fiberkit_core::capacity::{ConduitFill, StrandCount};
use fiberkit_core::loss::{ConnectorLoss, FiberAttenuation, SpliceLoss};
use fiberkit_core::otdr::TraceAnalysis;
use fiberkit_core::standards::{FIBER_TYPES, FOA_STANDARDS};
use fiberkit_core::wavelength::{CwdmChannel, WavelengthInfo};
use fiberkit_core::{LinkBudgetInput, LinkBudgetResult, LinkStatus, ValueSource};
use serde::Serialize;

// ─── Table ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Green,
    Yellow,
    Red,
}

impl Color {
    fn code(self) -> &'static str {
        match self {
            Color::Green => "32",
            Color::Yellow => "33",
            Color::Red => "31",
        }
    }
}

pub fn status_color(status: LinkStatus) -> Color {
    match status {
        LinkStatus::Pass => Color::Green,
        LinkStatus::Marginal => Color::Yellow,
        LinkStatus::Fail => Color::Red,
    }
}

#[derive(Debug, Clone)]
struct Cell {
    text: String,
    color: Option<Color>,
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell { text, color: None }
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::from(text.to_string())
    }
}

/// Column-aligned plain text table. The first column is left aligned,
/// the rest right aligned.
struct Table {
    title: String,
    header: Option<Vec<Cell>>,
    rows: Vec<Vec<Cell>>,
    color: bool,
}

impl Table {
    fn new(title: impl Into<String>, color: bool) -> Self {
        Self {
            title: title.into(),
            header: None,
            rows: Vec::new(),
            color,
        }
    }

    fn header<const N: usize>(mut self, cols: [&str; N]) -> Self {
        self.header = Some(cols.into_iter().map(Cell::from).collect());
        self
    }

    fn row<const N: usize>(&mut self, cols: [Cell; N]) {
        self.rows.push(cols.into());
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths = Vec::new();
        for row in self.header.iter().chain(self.rows.iter()) {
            for (i, cell) in row.iter().enumerate() {
                let w = cell.text.chars().count();
                match widths.get_mut(i) {
                    Some(cur) if *cur < w => *cur = w,
                    Some(_) => {}
                    None => widths.push(w),
                }
            }
        }
        widths
    }

    fn write_row(&self, f: &mut fmt::Formatter<'_>, row: &[Cell], widths: &[usize]) -> fmt::Result {
        let mut line = String::new();
        for (i, (cell, width)) in row.iter().zip(widths.iter().copied()).enumerate() {
            if i > 0 {
                line.push_str("  ");
            }
            let padded = if i == 0 {
                format!("{:<width$}", cell.text)
            } else {
                format!("{:>width$}", cell.text)
            };
            match cell.color.filter(|_| self.color) {
                Some(c) => write!(line, "\x1b[{}m{padded}\x1b[0m", c.code())?,
                None => line.push_str(&padded),
            }
        }
        f.write_str(line.trim_end())?;
        f.write_char('\n')
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();
        let total = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);

        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "-".repeat(total.max(self.title.chars().count())))?;
        if let Some(header) = &self.header {
            self.write_row(f, header, &widths)?;
        }
        for row in &self.rows {
            self.write_row(f, row, &widths)?;
        }
        Ok(())
    }
}

fn db(v: f64) -> Cell {
    format!("{v:.2} dB").into()
}

fn dbm(v: f64) -> Cell {
    format!("{v:.2} dBm").into()
}

fn km(v: f64) -> Cell {
    format!("{v:.2} km").into()
}

fn nm(v: u32) -> Cell {
    format!("{v} nm").into()
}

fn source_note(source: ValueSource) -> &'static str {
    match source {
        ValueSource::Override => "override",
        ValueSource::Table { .. } => "standard table",
        ValueSource::Default => "FOA typical",
        ValueSource::UnsupportedFiberType => "unsupported fiber type, SM 1310 nm assumed",
    }
}

// ─── Link budget ────────────────────────────────────────────────────────────

/// JSON shape of a link budget: parameters, effective values, result.
#[derive(Serialize)]
pub struct LinkBudgetReport<'a> {
    pub name: Option<&'a str>,
    pub params: &'a fiberkit_core::LinkBudgetParams,
    pub attenuation: fiberkit_core::link_budget::Resolved,
    pub connector_loss: fiberkit_core::link_budget::Resolved,
    pub splice_loss: fiberkit_core::link_budget::Resolved,
    pub result: &'a LinkBudgetResult,
}

impl<'a> LinkBudgetReport<'a> {
    pub fn new(name: Option<&'a str>, input: &'a LinkBudgetInput, result: &'a LinkBudgetResult) -> Self {
        Self {
            name,
            params: input.params(),
            attenuation: input.attenuation(),
            connector_loss: input.connector_loss(),
            splice_loss: input.splice_loss(),
            result,
        }
    }
}

pub fn link_budget(input: &LinkBudgetInput, result: &LinkBudgetResult, color: bool) -> String {
    let p = input.params();
    let mut out = String::new();

    let mut params = Table::new("Input Parameters", color);
    params.row(["Transmitter Power".into(), dbm(p.tx_power_dbm)]);
    params.row(["Receiver Sensitivity".into(), dbm(p.rx_sensitivity_dbm)]);
    params.row(["Available Power Budget".into(), db(result.power_budget_db)]);
    params.row(["Fiber Length".into(), km(p.fiber_length_km)]);
    params.row(["Wavelength".into(), nm(p.wavelength_nm)]);
    params.row(["Fiber Type".into(), p.fiber_type.as_str().into()]);
    writeln!(out, "{params}").unwrap();

    let mut losses = Table::new("Loss Breakdown", color).header([
        "Component",
        "Quantity",
        "Unit Loss",
        "Total Loss",
    ]);
    let atten = input.attenuation();
    losses.row([
        "Fiber".into(),
        km(p.fiber_length_km),
        format!("{:.2} dB/km", atten.value).into(),
        db(result.fiber_loss_total_db),
    ]);
    if p.connector_count > 0 {
        losses.row([
            "Connectors".into(),
            p.connector_count.to_string().into(),
            format!("{:.2} dB/ea", input.connector_loss().value).into(),
            db(result.connector_loss_total_db),
        ]);
    }
    if p.splice_count > 0 {
        losses.row([
            "Splices".into(),
            p.splice_count.to_string().into(),
            format!("{:.2} dB/ea", input.splice_loss().value).into(),
            db(result.splice_loss_total_db),
        ]);
    }
    losses.row([
        "Total System Loss".into(),
        "".into(),
        "".into(),
        db(result.total_loss_db),
    ]);
    writeln!(out, "{losses}").unwrap();

    let mut margin = Table::new("Margin Analysis", color);
    margin.row(["Safety Margin (Required)".into(), db(result.safety_margin_db)]);
    margin.row(["System Operating Margin (SOM)".into(), db(result.som_db)]);
    margin.row([
        "Status".into(),
        Cell {
            text: format!("{} - {}", result.status, result.status_detail),
            color: Some(status_color(result.status)),
        },
    ]);
    write!(out, "{margin}").unwrap();

    if input.is_fallback() {
        writeln!(
            out,
            "\nnote: fiber type {:?} is not supported; attenuation is the {}",
            p.fiber_type,
            source_note(atten.source)
        )
        .unwrap();
    }
    out
}

/// One summary line per scenario.
pub fn scenario_summary(rows: &[(&str, LinkBudgetResult)], color: bool) -> String {
    let mut table = Table::new("Link Scenarios", color).header([
        "Link",
        "Power Budget",
        "Total Loss",
        "Safety Margin",
        "SOM",
        "Status",
    ]);
    for (name, r) in rows {
        table.row([
            (*name).into(),
            db(r.power_budget_db),
            db(r.total_loss_db),
            db(r.safety_margin_db),
            db(r.som_db),
            Cell {
                text: r.status.to_string(),
                color: Some(status_color(r.status)),
            },
        ]);
    }
    table.to_string()
}

// ─── Loss calculator ────────────────────────────────────────────────────────

fn unrecognized_suffix(recognized: bool) -> &'static str {
    if recognized {
        ""
    } else {
        " (unrecognized, default used)"
    }
}

pub fn connector_loss(r: &ConnectorLoss, color: bool) -> String {
    let mut t = Table::new("Connector Loss", color);
    t.row([
        "Connector Type".into(),
        format!("{}{}", r.connector_type, unrecognized_suffix(r.recognized)).into(),
    ]);
    t.row(["Count".into(), r.count.to_string().into()]);
    t.row(["Loss per Connector".into(), db(r.loss_per_connector_db)]);
    t.row(["Total Loss".into(), db(r.total_loss_db)]);
    t.to_string()
}

pub fn splice_loss(r: &SpliceLoss, color: bool) -> String {
    let mut t = Table::new("Splice Loss", color);
    t.row([
        "Splice Type".into(),
        format!("{}{}", r.splice_type, unrecognized_suffix(r.recognized)).into(),
    ]);
    t.row(["Count".into(), r.count.to_string().into()]);
    t.row(["Loss per Splice".into(), db(r.loss_per_splice_db)]);
    t.row(["Total Loss".into(), db(r.total_loss_db)]);
    t.to_string()
}

pub fn fiber_attenuation(r: &FiberAttenuation, color: bool) -> String {
    let mut t = Table::new("Fiber Loss", color);
    t.row([
        "Fiber Type".into(),
        format!("{}{}", r.fiber_type, unrecognized_suffix(r.recognized)).into(),
    ]);
    t.row(["Wavelength".into(), nm(r.wavelength_nm)]);
    t.row(["Table Wavelength".into(), nm(r.resolved_wavelength_nm)]);
    t.row(["Length".into(), km(r.length_km)]);
    t.row([
        "Attenuation".into(),
        format!("{:.2} dB/km", r.attenuation_db_per_km).into(),
    ]);
    t.row(["Total Loss".into(), db(r.total_loss_db)]);
    t.to_string()
}

// ─── Wavelength ─────────────────────────────────────────────────────────────

pub fn wavelength_info(wavelength_nm: u32, info: Option<&WavelengthInfo>, color: bool) -> String {
    let mut t = Table::new(format!("Wavelength {wavelength_nm} nm"), color);
    let na = || Cell::from("N/A");
    let atten = |v: Option<f64>| v.map_or_else(na, |v| format!("{v:.2} dB/km").into());
    t.row(["Window".into(), info.map_or_else(na, |i| i.window.into())]);
    t.row(["Fiber".into(), info.map_or_else(na, |i| i.fiber.into())]);
    t.row([
        "Dispersion".into(),
        info.map_or_else(na, |i| format!("{:.2} ps/(nm·km)", i.dispersion_ps_nm_km).into()),
    ]);
    t.row([
        "Attenuation (MM)".into(),
        atten(info.and_then(|i| i.attenuation_mm_db_per_km)),
    ]);
    t.row([
        "Attenuation (SM)".into(),
        atten(info.and_then(|i| i.attenuation_sm_db_per_km)),
    ]);
    t.to_string()
}

pub fn dispersion(wavelength_nm: u32, length_km: f64, ps_per_nm: f64) -> String {
    format!(
        "Chromatic dispersion at {wavelength_nm} nm over {length_km:.2} km: {ps_per_nm:.2} ps/nm\n"
    )
}

pub fn cwdm(channels: &[CwdmChannel], color: bool) -> String {
    let mut t = Table::new("CWDM Channels", color).header(["Channel", "Wavelength"]);
    for ch in channels {
        t.row([format!("Ch {:2}", ch.channel).into(), nm(ch.wavelength_nm)]);
    }
    t.to_string()
}

// ─── Capacity ───────────────────────────────────────────────────────────────

pub fn strand_count(endpoints: u32, r: &StrandCount, color: bool) -> String {
    let mut t = Table::new("Strand Count", color);
    t.row(["Endpoints".into(), endpoints.to_string().into()]);
    t.row(["Base Strands (duplex)".into(), r.base_strands.to_string().into()]);
    t.row(["With Redundancy".into(), format!("{:.2}", r.with_redundancy).into()]);
    t.row(["With Growth".into(), format!("{:.2}", r.with_growth).into()]);
    t.row([
        "Recommended Count".into(),
        if r.saturated {
            format!("{} (largest standard cable)", r.recommended_count).into()
        } else {
            r.recommended_count.to_string().into()
        },
    ]);
    t.to_string()
}

pub fn conduit_fill(cable_count: u32, r: &ConduitFill, color: bool) -> String {
    let mut t = Table::new("Conduit Fill", color);
    t.row(["Cables".into(), cable_count.to_string().into()]);
    t.row(["Conduit Area".into(), format!("{:.2}", r.conduit_area).into()]);
    t.row(["Cable Area (total)".into(), format!("{:.2}", r.cable_area_total).into()]);
    t.row(["Fill".into(), format!("{:.2} %", r.fill_percent).into()]);
    t.row(["Maximum Fill".into(), format!("{:.2} %", r.max_fill_percent).into()]);
    t.row([
        "Compliant".into(),
        Cell {
            text: (if r.compliant { "Yes" } else { "No" }).to_string(),
            color: Some(if r.compliant { Color::Green } else { Color::Red }),
        },
    ]);
    t.to_string()
}

// ─── Standards ──────────────────────────────────────────────────────────────

pub fn foa_standards(color: bool) -> String {
    let mut t = Table::new("FOA Standard Loss Values", color).header(["Component", "", ""]);
    for v in FOA_STANDARDS {
        t.row([
            v.component.into(),
            format!("{}: {:.2} dB", v.lower_label, v.lower_db).into(),
            format!("{}: {:.2} dB", v.upper_label, v.upper_db).into(),
        ]);
    }
    t.to_string()
}

pub fn fiber_types(color: bool) -> String {
    let mut t = Table::new("Fiber Type Specifications", color).header([
        "Fiber",
        "Core",
        "Wavelengths",
        "Attenuation",
        "Bandwidth",
    ]);
    for spec in FIBER_TYPES {
        let wavelengths = spec
            .wavelengths_nm
            .iter()
            .map(|w| format!("{w} nm"))
            .collect::<Vec<_>>()
            .join(", ");
        let attenuation = spec
            .attenuation
            .iter()
            .map(|(w, a)| format!("{a:.2} dB/km @ {w}"))
            .collect::<Vec<_>>()
            .join(", ");
        t.row([
            spec.name.into(),
            format!("{} µm", spec.core_um).into(),
            wavelengths.into(),
            attenuation.into(),
            spec.bandwidth_mhz_km
                .map_or_else(|| "-".to_string(), |b| format!("{b} MHz·km"))
                .into(),
        ]);
    }
    t.to_string()
}

// ─── OTDR ───────────────────────────────────────────────────────────────────

pub fn trace_analysis(a: &TraceAnalysis, color: bool) -> String {
    let mut t = Table::new("OTDR Trace Analysis", color);
    t.row(["Fiber Length".into(), format!("{:.3} km", a.fiber_length_km).into()]);
    t.row(["Total Event Loss".into(), db(a.total_loss_db)]);
    t.row(["Connectors".into(), a.connector_count.to_string().into()]);
    t.row(["Splices".into(), a.splice_count.to_string().into()]);
    t.row(["Avg Connector Loss".into(), db(a.avg_connector_loss_db)]);
    t.row(["Avg Splice Loss".into(), db(a.avg_splice_loss_db)]);
    t.row(["Loss per km".into(), format!("{:.2} dB/km", a.loss_per_km_db).into()]);
    t.to_string()
}
