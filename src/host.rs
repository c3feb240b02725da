//! Host contracts (§6): the external collaborators the engine reads from
//! and reports through. A real simulator implements these against its own
//! network state, symbol table, and results store; [`crate::testing`]
//! supplies simple in-memory stand-ins for tests.

use crate::types::LinkKind;

/// Live hydraulic/hydrologic network state (§4.2). Indices are 0-based.
pub trait NetworkState {
    fn node_count(&self) -> usize;
    fn link_count(&self) -> usize;

    /// `newDepth[node] * UCF(LENGTH)` is applied by the resolver, not here;
    /// this returns the raw internal-unit depth.
    fn node_depth(&self, node: usize) -> f64;
    fn node_invert_elevation(&self, node: usize) -> f64;
    fn node_volume(&self, node: usize) -> f64;
    fn node_lateral_inflow(&self, node: usize) -> f64;

    fn link_kind(&self, link: usize) -> LinkKind;
    /// Flow direction, `+1.0` or `-1.0`, applied before `UCF(FLOW)`.
    fn link_direction(&self, link: usize) -> f64;
    fn link_flow(&self, link: usize) -> f64;
    fn link_depth(&self, link: usize) -> f64;
    /// Current control setting in `[0, 1]` (pumps unclamped on the upper
    /// end; §3).
    fn link_setting(&self, link: usize) -> f64;
    fn link_target_setting(&self, link: usize) -> f64;
    fn set_link_target_setting(&mut self, link: usize, value: f64);
    /// Elapsed-time timestamp (days) at which `link`'s setting last changed
    /// sign relative to zero (used by `TimeOpen`/`TimeClosed`).
    fn link_time_last_set(&self, link: usize) -> f64;
}

/// Name -> index lookup for nodes, links, curves, and time series (§6).
pub trait SymbolTable {
    fn find_node(&self, name: &str) -> Option<usize>;
    fn find_link(&self, name: &str) -> Option<usize>;
    fn find_curve(&self, name: &str) -> Option<usize>;
    fn find_time_series(&self, name: &str) -> Option<usize>;
    /// The underlying type of a resolved link, needed by the compiler
    /// (C4) to validate that an action's `<link-kind>` keyword matches the
    /// object actually found by name (§4.4).
    fn link_kind(&self, link: usize) -> LinkKind;
}

/// Attributes the `BACK` operator can query on a past node record.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NodeHistoryAttr {
    Depth,
    Head,
    Inflow,
}

/// Attributes the `BACK` operator can query on a past link record.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LinkHistoryAttr {
    Flow,
    Depth,
}

/// Read-only access to the binary results history (C3, §4.3).
pub trait HistoryStore {
    /// Number of report periods written so far.
    fn n_periods(&self) -> usize;
    /// Report step length, in seconds.
    fn report_step(&self) -> f64;

    /// Value of `attr` for `node` at report period `period` (0-based,
    /// `period < n_periods()`).
    fn node_value(&self, node: usize, attr: NodeHistoryAttr, period: usize) -> Option<f64>;
    /// Value of `attr` for `link` at report period `period`.
    fn link_value(&self, link: usize, attr: LinkHistoryAttr, period: usize) -> Option<f64>;
}

/// Curve lookup for curve-driven actions (C9, §4.9).
pub trait CurveTable {
    /// Linear interpolation of `curve`'s y for the given x.
    fn lookup(&self, curve: usize, x: f64) -> f64;
}

/// Time series lookup for time-series-driven actions (C9, §4.9).
pub trait TimeSeriesTable {
    /// Value of `series` at simulation time `t` (days). When `extend` is
    /// true and `t` runs past the series' last entry, the last value holds.
    fn lookup(&self, series: usize, t: f64, extend: bool) -> f64;
}

/// A warning/report code the engine can raise against [`ReportSink`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Warning {
    /// RHS attribute didn't match LHS attribute in a premise (§4.4, §7).
    MismatchedAttribute,
    /// The value resolver returned `Missing` for a premise.
    MissingValue,
    /// A stack op ran with an unmet precondition (underflow on a binary op,
    /// or an empty stack for a unary op).
    StackPrecondition,
    /// A `BACK` query's offset exceeded `Nperiods`.
    HistoryOutOfRange,
    /// A stack-side-effecting premise was skipped by short-circuiting.
    StackOpShortCircuited,
}

/// Sink for host-visible diagnostics and committed control actions (§6).
pub trait ReportSink {
    fn warn(&mut self, rule_id: &str, warning: Warning, detail: &str);
    /// Fired once per action actually committed by the arbiter (§4.6 step
    /// 3): the link's `targetSetting` changed as a result of `rule_id`.
    fn control_action(&mut self, rule_id: &str, link: usize, new_setting: f64, time: f64);
}

/// A `ReportSink` that discards everything. Useful for tests that don't
/// care about diagnostics.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReportSink;

impl ReportSink for NullReportSink {
    fn warn(&mut self, _rule_id: &str, _warning: Warning, _detail: &str) {}
    fn control_action(&mut self, _rule_id: &str, _link: usize, _new_setting: f64, _time: f64) {}
}
