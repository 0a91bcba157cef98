//! # OTDR event analysis
//!
//! Summarises a list of OTDR trace events (connectors, splices, end of
//! fiber) into the figures a link budget needs. Events arrive already
//! decoded, as a JSON array; binary `.sor` decoding is not done here.
//!
//! ```json
//! [
//!   { "distance_km": 0.0,   "kind": "start",     "loss_db": 0.0 },
//!   { "distance_km": 0.523, "kind": "connector", "loss_db": 0.45, "reflectance_db": -45.2 },
//!   { "distance_km": 2.156, "kind": "splice",    "loss_db": 0.12 },
//!   { "distance_km": 5.234, "kind": "end",       "loss_db": 0.0,  "reflectance_db": -18.5 }
//! ]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FiberError, FiberResult};
use crate::link_budget::LinkBudgetParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Start,
    Connector,
    Splice,
    End,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtdrEvent {
    pub distance_km: f64,
    pub kind: EventKind,
    #[serde(default)]
    pub loss_db: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflectance_db: Option<f64>,
}

/// Load trace events from a JSON file.
///
/// A missing or unreadable file is [`FiberError::ResourceUnavailable`].
pub fn load_events(path: impl AsRef<Path>) -> FiberResult<Vec<OtdrEvent>> {
    let path = path.as_ref();
    let contents =
        std::fs::read_to_string(path).map_err(|e| FiberError::unavailable(path, e))?;
    let events: Vec<OtdrEvent> = serde_json::from_str(&contents)?;
    tracing::debug!(path = %path.display(), events = events.len(), "loaded OTDR events");
    Ok(events)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceAnalysis {
    /// Distance of the farthest event.
    pub fiber_length_km: f64,
    pub total_loss_db: f64,
    pub connector_count: u32,
    pub splice_count: u32,
    /// Mean connector loss, 0 when the trace has no connectors.
    pub avg_connector_loss_db: f64,
    /// Mean splice loss, 0 when the trace has no splices.
    pub avg_splice_loss_db: f64,
    /// Total loss over length, 0 for a zero-length trace.
    pub loss_per_km_db: f64,
}

fn count_and_mean(events: &[OtdrEvent], kind: EventKind) -> (u32, f64) {
    let (count, sum) = events
        .iter()
        .filter(|e| e.kind == kind)
        .fold((0u32, 0.0), |(n, s), e| (n + 1, s + e.loss_db));
    let mean = if count > 0 { sum / f64::from(count) } else { 0.0 };
    (count, mean)
}

/// Summarise a trace. Fails only when there are no events.
pub fn analyze(events: &[OtdrEvent]) -> FiberResult<TraceAnalysis> {
    if events.is_empty() {
        return Err(FiberError::EmptyTrace);
    }

    let fiber_length_km = events
        .iter()
        .map(|e| e.distance_km)
        .fold(f64::NEG_INFINITY, f64::max);
    let total_loss_db: f64 = events.iter().map(|e| e.loss_db).sum();
    let (connector_count, avg_connector_loss_db) = count_and_mean(events, EventKind::Connector);
    let (splice_count, avg_splice_loss_db) = count_and_mean(events, EventKind::Splice);

    let loss_per_km_db = if fiber_length_km > 0.0 {
        total_loss_db / fiber_length_km
    } else {
        0.0
    };

    Ok(TraceAnalysis {
        fiber_length_km,
        total_loss_db,
        connector_count,
        splice_count,
        avg_connector_loss_db,
        avg_splice_loss_db,
        loss_per_km_db,
    })
}

impl TraceAnalysis {
    /// Link budget parameters using the measured length, event counts and
    /// mean event losses in place of the FOA defaults. Wavelength and fiber
    /// type keep the builder defaults; adjust them on the returned value.
    pub fn link_budget_params(&self, tx_power_dbm: f64, rx_sensitivity_dbm: f64) -> LinkBudgetParams {
        let mut params = LinkBudgetParams::new(tx_power_dbm, rx_sensitivity_dbm, self.fiber_length_km)
            .connectors(self.connector_count)
            .splices(self.splice_count);
        if self.connector_count > 0 {
            params = params.connector_loss(self.avg_connector_loss_db);
        }
        if self.splice_count > 0 {
            params = params.splice_loss(self.avg_splice_loss_db);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link_budget::ValueSource;

    fn event(distance_km: f64, kind: EventKind, loss_db: f64) -> OtdrEvent {
        OtdrEvent {
            distance_km,
            kind,
            loss_db,
            reflectance_db: None,
        }
    }

    fn sample_trace() -> Vec<OtdrEvent> {
        vec![
            event(0.0, EventKind::Start, 0.0),
            event(0.523, EventKind::Connector, 0.45),
            event(2.156, EventKind::Splice, 0.12),
            event(4.892, EventKind::Connector, 0.52),
            event(5.234, EventKind::End, 0.0),
        ]
    }

    #[test]
    fn analyze_sample_trace() {
        let a = analyze(&sample_trace()).unwrap();
        assert_eq!(a.fiber_length_km, 5.234);
        assert!((a.total_loss_db - 1.09).abs() < 1e-9);
        assert_eq!(a.connector_count, 2);
        assert_eq!(a.splice_count, 1);
        assert!((a.avg_connector_loss_db - 0.485).abs() < 1e-9);
        assert!((a.avg_splice_loss_db - 0.12).abs() < 1e-9);
        assert!((a.loss_per_km_db - 1.09 / 5.234).abs() < 1e-9);
    }

    #[test]
    fn analyze_empty_trace_is_error() {
        assert!(matches!(analyze(&[]), Err(FiberError::EmptyTrace)));
    }

    #[test]
    fn analyze_without_connectors_or_length() {
        let a = analyze(&[event(0.0, EventKind::Start, 0.0)]).unwrap();
        assert_eq!(a.connector_count, 0);
        assert_eq!(a.avg_connector_loss_db, 0.0);
        assert_eq!(a.avg_splice_loss_db, 0.0);
        assert_eq!(a.loss_per_km_db, 0.0);
    }

    #[test]
    fn trace_feeds_link_budget() {
        let a = analyze(&sample_trace()).unwrap();
        let input = a.link_budget_params(0.0, -28.0).resolve();
        assert_eq!(input.params().connector_count, 2);
        assert_eq!(input.params().splice_count, 1);
        assert_eq!(input.connector_loss().source, ValueSource::Override);
        assert!((input.connector_loss().value - 0.485).abs() < 1e-9);

        let r = input.calculate();
        assert!((r.connector_loss_total_db - 0.97).abs() < 1e-9);
        assert!((r.splice_loss_total_db - 0.12).abs() < 1e-9);
    }

    #[test]
    fn trace_without_splices_keeps_default_splice_loss() {
        let a = analyze(&[
            event(0.0, EventKind::Start, 0.0),
            event(1.0, EventKind::End, 0.0),
        ])
        .unwrap();
        let input = a.link_budget_params(0.0, -28.0).resolve();
        assert_eq!(input.splice_loss().source, ValueSource::Default);
    }

    #[test]
    fn events_parse_from_json() {
        let json = r#"[
            {"distance_km": 0.0, "kind": "start"},
            {"distance_km": 1.5, "kind": "connector", "loss_db": 0.4, "reflectance_db": -50.0}
        ]"#;
        let events: Vec<OtdrEvent> = serde_json::from_str(json).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].loss_db, 0.0);
        assert_eq!(events[1].kind, EventKind::Connector);
        assert_eq!(events[1].reflectance_db, Some(-50.0));
    }

    #[test]
    fn missing_file_is_resource_unavailable() {
        let err = load_events("/nonexistent/fiberkit/trace.json").unwrap_err();
        assert!(matches!(err, FiberError::ResourceUnavailable { .. }));
        assert!(err.to_string().contains("input resource unavailable"));
    }
}
