//! In-memory stand-ins for the host traits (§6), used by this crate's own
//! tests and available to embedders for integration tests of their own
//! rule text. Mirrors the teacher's `impls::test_utils::fixtures` module:
//! small, hand-built fixtures rather than a full simulator.

use std::collections::HashMap;

use crate::host::{
    HistoryStore, LinkHistoryAttr, NetworkState, NodeHistoryAttr, ReportSink, SymbolTable, Warning,
};
use crate::types::LinkKind;

/// Compares two floats within an absolute tolerance. Carried over from the
/// teacher's `approx_eq` test fixture helper.
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

/// A hand-populated network used in place of a real hydraulic solver.
#[derive(Debug, Clone)]
pub struct MockNetwork {
    node_depth: Vec<f64>,
    node_invert_elevation: Vec<f64>,
    node_volume: Vec<f64>,
    node_lateral_inflow: Vec<f64>,
    link_kind: Vec<LinkKind>,
    link_direction: Vec<f64>,
    link_flow: Vec<f64>,
    link_depth: Vec<f64>,
    link_setting: Vec<f64>,
    link_target_setting: Vec<f64>,
    link_time_last_set: Vec<f64>,
}

impl MockNetwork {
    pub fn new(node_count: usize, link_count: usize) -> Self {
        MockNetwork {
            node_depth: vec![0.0; node_count],
            node_invert_elevation: vec![0.0; node_count],
            node_volume: vec![0.0; node_count],
            node_lateral_inflow: vec![0.0; node_count],
            link_kind: vec![LinkKind::Pump; link_count],
            link_direction: vec![1.0; link_count],
            link_flow: vec![0.0; link_count],
            link_depth: vec![0.0; link_count],
            link_setting: vec![0.0; link_count],
            link_target_setting: vec![0.0; link_count],
            link_time_last_set: vec![0.0; link_count],
        }
    }

    pub fn set_node_depth(&mut self, node: usize, value: f64) {
        self.node_depth[node] = value;
    }

    pub fn set_node_invert_elevation(&mut self, node: usize, value: f64) {
        self.node_invert_elevation[node] = value;
    }

    pub fn set_node_volume(&mut self, node: usize, value: f64) {
        self.node_volume[node] = value;
    }

    pub fn set_node_lateral_inflow(&mut self, node: usize, value: f64) {
        self.node_lateral_inflow[node] = value;
    }

    pub fn set_link_kind(&mut self, link: usize, kind: LinkKind) {
        self.link_kind[link] = kind;
    }

    pub fn set_link_direction(&mut self, link: usize, value: f64) {
        self.link_direction[link] = value;
    }

    pub fn set_link_flow(&mut self, link: usize, value: f64) {
        self.link_flow[link] = value;
    }

    pub fn set_link_depth(&mut self, link: usize, value: f64) {
        self.link_depth[link] = value;
    }

    pub fn set_link_setting(&mut self, link: usize, value: f64) {
        self.link_setting[link] = value;
    }

    pub fn set_link_time_last_set(&mut self, link: usize, value: f64) {
        self.link_time_last_set[link] = value;
    }
}

impl NetworkState for MockNetwork {
    fn node_count(&self) -> usize {
        self.node_depth.len()
    }

    fn link_count(&self) -> usize {
        self.link_kind.len()
    }

    fn node_depth(&self, node: usize) -> f64 {
        self.node_depth[node]
    }

    fn node_invert_elevation(&self, node: usize) -> f64 {
        self.node_invert_elevation[node]
    }

    fn node_volume(&self, node: usize) -> f64 {
        self.node_volume[node]
    }

    fn node_lateral_inflow(&self, node: usize) -> f64 {
        self.node_lateral_inflow[node]
    }

    fn link_kind(&self, link: usize) -> LinkKind {
        self.link_kind[link]
    }

    fn link_direction(&self, link: usize) -> f64 {
        self.link_direction[link]
    }

    fn link_flow(&self, link: usize) -> f64 {
        self.link_flow[link]
    }

    fn link_depth(&self, link: usize) -> f64 {
        self.link_depth[link]
    }

    fn link_setting(&self, link: usize) -> f64 {
        self.link_setting[link]
    }

    fn link_target_setting(&self, link: usize) -> f64 {
        self.link_target_setting[link]
    }

    fn set_link_target_setting(&mut self, link: usize, value: f64) {
        self.link_target_setting[link] = value;
        self.link_setting[link] = value;
    }

    fn link_time_last_set(&self, link: usize) -> f64 {
        self.link_time_last_set[link]
    }
}

/// A hand-populated results history in place of a real binary output file.
#[derive(Debug, Clone, Default)]
pub struct MockHistory {
    pub report_step: f64,
    node_records: HashMap<usize, Vec<(f64, f64, f64)>>, // (depth, head, inflow) per period
    link_records: HashMap<usize, Vec<(f64, f64)>>,       // (flow, depth) per period
    periods: usize,
}

impl MockHistory {
    pub fn new(report_step: f64) -> Self {
        MockHistory {
            report_step,
            node_records: HashMap::new(),
            link_records: HashMap::new(),
            periods: 0,
        }
    }

    pub fn push_node_period(&mut self, node: usize, depth: f64, head: f64, inflow: f64) {
        self.node_records
            .entry(node)
            .or_default()
            .push((depth, head, inflow));
    }

    pub fn push_link_period(&mut self, link: usize, flow: f64, depth: f64) {
        self.link_records.entry(link).or_default().push((flow, depth));
    }

    pub fn set_periods(&mut self, n: usize) {
        self.periods = n;
    }
}

impl HistoryStore for MockHistory {
    fn n_periods(&self) -> usize {
        self.periods
    }

    fn report_step(&self) -> f64 {
        self.report_step
    }

    fn node_value(&self, node: usize, attr: NodeHistoryAttr, period: usize) -> Option<f64> {
        let record = self.node_records.get(&node)?.get(period)?;
        Some(match attr {
            NodeHistoryAttr::Depth => record.0,
            NodeHistoryAttr::Head => record.1,
            NodeHistoryAttr::Inflow => record.2,
        })
    }

    fn link_value(&self, link: usize, attr: LinkHistoryAttr, period: usize) -> Option<f64> {
        let record = self.link_records.get(&link)?.get(period)?;
        Some(match attr {
            LinkHistoryAttr::Flow => record.0,
            LinkHistoryAttr::Depth => record.1,
        })
    }
}

/// Records every warning/control action it receives, for test assertions.
#[derive(Debug, Default, Clone)]
pub struct RecordingReportSink {
    pub warnings: Vec<(String, Warning, String)>,
    pub actions: Vec<(String, usize, f64, f64)>,
}

impl ReportSink for RecordingReportSink {
    fn warn(&mut self, rule_id: &str, warning: Warning, detail: &str) {
        self.warnings.push((rule_id.to_string(), warning, detail.to_string()));
    }

    fn control_action(&mut self, rule_id: &str, link: usize, new_setting: f64, time: f64) {
        self.actions.push((rule_id.to_string(), link, new_setting, time));
    }
}

/// A hand-populated name -> index table standing in for the project's
/// symbol resolver (§6), used by the rule compiler's tests.
#[derive(Debug, Default, Clone)]
pub struct MockSymbols {
    nodes: HashMap<String, usize>,
    links: HashMap<String, usize>,
    curves: HashMap<String, usize>,
    series: HashMap<String, usize>,
    link_kinds: HashMap<usize, LinkKind>,
}

impl MockSymbols {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, name: &str, index: usize) -> &mut Self {
        self.nodes.insert(name.to_string(), index);
        self
    }

    pub fn add_link(&mut self, name: &str, index: usize, kind: LinkKind) -> &mut Self {
        self.links.insert(name.to_string(), index);
        self.link_kinds.insert(index, kind);
        self
    }

    pub fn add_curve(&mut self, name: &str, index: usize) -> &mut Self {
        self.curves.insert(name.to_string(), index);
        self
    }

    pub fn add_time_series(&mut self, name: &str, index: usize) -> &mut Self {
        self.series.insert(name.to_string(), index);
        self
    }
}

impl SymbolTable for MockSymbols {
    fn find_node(&self, name: &str) -> Option<usize> {
        self.nodes.get(name).copied()
    }

    fn find_link(&self, name: &str) -> Option<usize> {
        self.links.get(name).copied()
    }

    fn find_curve(&self, name: &str) -> Option<usize> {
        self.curves.get(name).copied()
    }

    fn find_time_series(&self, name: &str) -> Option<usize> {
        self.series.get(name).copied()
    }

    fn link_kind(&self, link: usize) -> LinkKind {
        self.link_kinds.get(&link).copied().unwrap_or(LinkKind::Conduit)
    }
}

/// A curve/time-series table backed by plain lookup tables, for tests of
/// C9's modulated setters.
#[derive(Debug, Default, Clone)]
pub struct MockTables {
    pub curves: HashMap<usize, Vec<(f64, f64)>>,
    pub series: HashMap<usize, Vec<(f64, f64)>>,
}

impl crate::host::CurveTable for MockTables {
    fn lookup(&self, curve: usize, x: f64) -> f64 {
        let Some(points) = self.curves.get(&curve) else {
            return 0.0;
        };
        interpolate(points, x, false)
    }
}

impl crate::host::TimeSeriesTable for MockTables {
    fn lookup(&self, series: usize, t: f64, extend: bool) -> f64 {
        let Some(points) = self.series.get(&series) else {
            return 0.0;
        };
        interpolate(points, t, extend)
    }
}

fn interpolate(points: &[(f64, f64)], x: f64, extend: bool) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    if x <= points[0].0 {
        return points[0].1;
    }
    let last = points.len() - 1;
    if x >= points[last].0 {
        return if extend { points[last].1 } else { points[last].1 };
    }
    for w in points.windows(2) {
        let (x0, y0) = w[0];
        let (x1, y1) = w[1];
        if x >= x0 && x <= x1 {
            if (x1 - x0).abs() < f64::EPSILON {
                return y0;
            }
            return y0 + (y1 - y0) * (x - x0) / (x1 - x0);
        }
    }
    points[last].1
}

/// `rstest` fixtures for integration-style tests elsewhere in the crate,
/// mirroring the teacher's `impls::test_utils::fixtures` module (its `ph`
/// fixture opens a small `.inp` project; these open a small hand-built
/// network instead, since this crate has no project file format of its
/// own).
#[cfg(test)]
pub mod fixtures {
    use super::{MockHistory, MockNetwork, MockSymbols, MockTables};
    use crate::types::LinkKind;
    use rstest::fixture;

    /// One node (`N1`) and one pump (`P1`), both at index 0.
    #[fixture]
    pub fn symbols() -> MockSymbols {
        let mut s = MockSymbols::new();
        s.add_node("N1", 0);
        s.add_link("P1", 0, LinkKind::Pump);
        s
    }

    #[fixture]
    pub fn network() -> MockNetwork {
        let mut net = MockNetwork::new(1, 1);
        net.set_link_kind(0, LinkKind::Pump);
        net
    }

    #[fixture]
    pub fn history() -> MockHistory {
        MockHistory::new(60.0)
    }

    #[fixture]
    pub fn tables() -> MockTables {
        MockTables::default()
    }
}
