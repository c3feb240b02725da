//! C5 — Premise Evaluator: evaluates a single premise — comparison or
//! stack op — against the resolver, history reader, and RPN stack (§4.5).

use crate::history::{self, HistoryAttr};
use crate::host::{HistoryStore, NetworkState, ReportSink, Warning};
use crate::resolver::{EvalClock, Resolver};
use crate::stack::Stack;
use crate::types::units::UnitSystem;
use crate::types::{Attribute, CmpOp, ObjectKind, Premise, Relation, StackOp};

/// Process-wide per-step mutable state a premise reads and mutates: the
/// RPN stack and the most recent comparison operands (§3, §9). Named
/// explicitly as a context object rather than left as implicit globals, per
/// DESIGN.md's resolution of the `SetPoint`/`ControlValue` coupling.
#[derive(Debug, Clone, Default)]
pub struct EvalContext {
    pub stack: Stack,
    pub set_point: f64,
    pub control_value: f64,
    pub clock: EvalClock,
}

impl EvalContext {
    pub fn new(clock: EvalClock) -> Self {
        EvalContext {
            stack: Stack::new(),
            set_point: 0.0,
            control_value: 0.0,
            clock,
        }
    }
}

/// Evaluates one premise. Returns whether the premise holds; side effects
/// (stack pushes/pops, `SetPoint`/`ControlValue` updates) land in `ctx`.
/// `tstep_days` is the simulation step length, used by the time-windowed
/// comparator (§4.5 step 6) and the `BACK` offset computation (step 5).
pub fn evaluate<N, U, H, R>(
    premise: &Premise,
    ctx: &mut EvalContext,
    resolver: &Resolver<N, U>,
    history_store: &H,
    tstep_days: f64,
    rule_id: &str,
    report: &mut R,
) -> bool
where
    N: NetworkState,
    U: UnitSystem,
    H: HistoryStore,
    R: ReportSink,
{
    if premise.lhs_attr == Attribute::StackResult || premise.lhs_attr == Attribute::StackOp {
        return evaluate_stack_premise(premise, ctx, rule_id, report);
    }

    let lhs_value = resolver.resolve(premise.lhs, premise.lhs_attr, &ctx.clock);
    let rhs_value = match premise.rhs {
        Some((robj, rattr)) => {
            if rattr != premise.lhs_attr {
                report.warn(
                    rule_id,
                    Warning::MismatchedAttribute,
                    "RHS attribute does not match LHS attribute",
                );
            }
            resolver.resolve(robj, rattr, &ctx.clock)
        }
        None => Some(premise.immediate_value),
    };

    let (Some(lhs_value), Some(rhs_value)) = (lhs_value, rhs_value) else {
        report.warn(rule_id, Warning::MissingValue, "premise operand unresolved");
        return false;
    };

    match premise.relation {
        Relation::Stack(StackOp::Enter) => {
            ctx.stack.push(lhs_value);
            true
        }
        Relation::Stack(StackOp::Back) => {
            evaluate_back(premise, ctx, history_store, rule_id, report)
        }
        Relation::Stack(_) => {
            report.warn(
                rule_id,
                Warning::StackPrecondition,
                "RPN operator invalid for a non-stack object reference",
            );
            false
        }
        Relation::Cmp(op) => {
            ctx.set_point = rhs_value;
            ctx.control_value = lhs_value;
            if is_time_windowed(premise.lhs_attr) {
                time_windowed_compare(op, lhs_value, rhs_value, tstep_days)
            } else {
                strict_compare(op, lhs_value, rhs_value)
            }
        }
    }
}

fn evaluate_stack_premise<R: ReportSink>(
    premise: &Premise,
    ctx: &mut EvalContext,
    rule_id: &str,
    report: &mut R,
) -> bool {
    match premise.relation {
        Relation::Stack(StackOp::Enter) => {
            ctx.stack.push(premise.immediate_value);
            true
        }
        Relation::Stack(op) => {
            let ok = ctx.stack.apply(op, premise.immediate_value);
            if !ok {
                report.warn(
                    rule_id,
                    Warning::StackPrecondition,
                    "RPN operator precondition failed",
                );
            }
            ok
        }
        Relation::Cmp(op) => strict_compare(op, ctx.stack.peek(), premise.immediate_value),
    }
}

fn evaluate_back<H: HistoryStore, R: ReportSink>(
    premise: &Premise,
    ctx: &mut EvalContext,
    history_store: &H,
    rule_id: &str,
    report: &mut R,
) -> bool {
    // §9 open question: BACK on Time/ClockTime is undefined; we error
    // rather than guess at a day-fraction offset.
    if matches!(
        premise.lhs_attr,
        Attribute::Time | Attribute::ClockTime | Attribute::TimeOpen | Attribute::TimeClosed
    ) {
        report.warn(
            rule_id,
            Warning::HistoryOutOfRange,
            "BACK is undefined for Time/ClockTime attributes",
        );
        return false;
    }

    let report_step = history_store.report_step();
    if report_step <= 0.0 {
        return false;
    }
    let step_offset = (premise.immediate_value / report_step).round() as i64;

    let Some(history_attr) = map_history_attr(premise.lhs.kind, premise.lhs_attr) else {
        report.warn(
            rule_id,
            Warning::HistoryOutOfRange,
            "attribute not available from history store",
        );
        return false;
    };
    let Some(index) = premise.lhs.index else {
        return false;
    };

    match history::read_past(history_store, premise.lhs.kind, index, history_attr, step_offset) {
        Some(value) => {
            ctx.stack.push(value);
            true
        }
        None => {
            report.warn(
                rule_id,
                Warning::HistoryOutOfRange,
                &format!("BACK offset {step_offset} exceeds recorded history"),
            );
            false
        }
    }
}

fn map_history_attr(kind: ObjectKind, attr: Attribute) -> Option<HistoryAttr> {
    use crate::host::{LinkHistoryAttr, NodeHistoryAttr};
    match (kind, attr) {
        (ObjectKind::Node, Attribute::Depth) => Some(HistoryAttr::Node(NodeHistoryAttr::Depth)),
        (ObjectKind::Node, Attribute::Head) => Some(HistoryAttr::Node(NodeHistoryAttr::Head)),
        (ObjectKind::Node, Attribute::Inflow) => Some(HistoryAttr::Node(NodeHistoryAttr::Inflow)),
        (k, Attribute::Flow) if k.is_link_family() => {
            Some(HistoryAttr::Link(LinkHistoryAttr::Flow))
        }
        (k, Attribute::Depth) if k.is_link_family() => {
            Some(HistoryAttr::Link(LinkHistoryAttr::Depth))
        }
        _ => None,
    }
}

fn is_time_windowed(attr: Attribute) -> bool {
    matches!(
        attr,
        Attribute::Time | Attribute::ClockTime | Attribute::TimeOpen | Attribute::TimeClosed
    )
}

fn time_windowed_compare(op: CmpOp, lhs: f64, rhs: f64, tstep_days: f64) -> bool {
    let half = tstep_days / 2.0;
    match op {
        CmpOp::Eq => lhs >= rhs - half && lhs < rhs + half,
        CmpOp::Ne => !(lhs >= rhs - half && lhs < rhs + half),
        _ => strict_compare(op, lhs, rhs),
    }
}

fn strict_compare(op: CmpOp, lhs: f64, rhs: f64) -> bool {
    match op {
        CmpOp::Eq => lhs == rhs,
        CmpOp::Ne => lhs != rhs,
        CmpOp::Lt => lhs < rhs,
        CmpOp::Le => lhs <= rhs,
        CmpOp::Gt => lhs > rhs,
        CmpOp::Ge => lhs >= rhs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockHistory, MockNetwork, RecordingReportSink};
    use crate::types::units::UsUnits;
    use crate::types::{ObjectRef, PremiseKind};

    fn base_premise(lhs: ObjectRef, lhs_attr: Attribute, relation: Relation, value: f64) -> Premise {
        Premise {
            kind: PremiseKind::And,
            lhs,
            lhs_attr,
            rhs: None,
            relation,
            immediate_value: value,
        }
    }

    #[test]
    fn simple_threshold_fires() {
        let mut net = MockNetwork::new(1, 0);
        net.set_node_depth(0, 5.0);
        let units = UsUnits;
        let resolver = Resolver::new(&net, &units);
        let history = MockHistory::new(60.0);
        let mut ctx = EvalContext::default();
        let mut sink = RecordingReportSink::default();
        let p = base_premise(
            ObjectRef::node(0),
            Attribute::Depth,
            Relation::Cmp(CmpOp::Gt),
            4.5,
        );
        assert!(evaluate(&p, &mut ctx, &resolver, &history, 1.0, "R1", &mut sink));
        assert_eq!(ctx.control_value, 5.0);
        assert_eq!(ctx.set_point, 4.5);
    }

    #[test]
    fn missing_value_degrades_to_false() {
        let net = MockNetwork::new(1, 0);
        let units = UsUnits;
        let resolver = Resolver::new(&net, &units);
        let history = MockHistory::new(60.0);
        let mut ctx = EvalContext::default();
        let mut sink = RecordingReportSink::default();
        // TimeOpen on a closed link (setting defaults to 0) is Missing.
        let p = base_premise(
            ObjectRef::link(ObjectKind::Pump, 0),
            Attribute::TimeOpen,
            Relation::Cmp(CmpOp::Gt),
            0.0,
        );
        let net2 = MockNetwork::new(0, 1);
        let resolver2 = Resolver::new(&net2, &units);
        assert!(!evaluate(&p, &mut ctx, &resolver2, &history, 1.0, "R1", &mut sink));
        assert_eq!(sink.warnings.len(), 1);
    }

    #[test]
    fn enter_pushes_resolved_value() {
        let mut net = MockNetwork::new(1, 0);
        net.set_node_depth(0, 3.0);
        let units = UsUnits;
        let resolver = Resolver::new(&net, &units);
        let history = MockHistory::new(60.0);
        let mut ctx = EvalContext::default();
        let mut sink = RecordingReportSink::default();
        let p = base_premise(
            ObjectRef::node(0),
            Attribute::Depth,
            Relation::Stack(StackOp::Enter),
            0.0,
        );
        assert!(evaluate(&p, &mut ctx, &resolver, &history, 1.0, "R1", &mut sink));
        assert_eq!(ctx.stack.peek(), 3.0);
    }

    #[test]
    fn back_reads_history_and_pushes() {
        let net = MockNetwork::new(1, 0);
        let units = UsUnits;
        let resolver = Resolver::new(&net, &units);
        let mut history = MockHistory::new(60.0);
        for d in [1.0, 1.5, 2.0, 2.5, 2.8, 3.0] {
            history.push_node_period(0, d, 0.0, 0.0);
        }
        history.set_periods(6);
        let mut ctx = EvalContext::default();
        let mut sink = RecordingReportSink::default();
        // 300 seconds back at a 60s report step -> offset 5 -> period 0.
        let p = base_premise(
            ObjectRef::node(0),
            Attribute::Depth,
            Relation::Stack(StackOp::Back),
            300.0,
        );
        assert!(evaluate(&p, &mut ctx, &resolver, &history, 1.0, "R1", &mut sink));
        assert_eq!(ctx.stack.peek(), 1.0);
    }

    #[test]
    fn back_offset_exceeding_history_is_false() {
        let net = MockNetwork::new(1, 0);
        let units = UsUnits;
        let resolver = Resolver::new(&net, &units);
        let mut history = MockHistory::new(60.0);
        history.push_node_period(0, 1.0, 0.0, 0.0);
        history.set_periods(1);
        let mut ctx = EvalContext::default();
        let mut sink = RecordingReportSink::default();
        let p = base_premise(
            ObjectRef::node(0),
            Attribute::Depth,
            Relation::Stack(StackOp::Back),
            6000.0,
        );
        assert!(!evaluate(&p, &mut ctx, &resolver, &history, 1.0, "R1", &mut sink));
    }

    #[test]
    fn time_window_eq_fires_within_half_tstep() {
        let net = MockNetwork::new(1, 0);
        let units = UsUnits;
        let resolver = Resolver::new(&net, &units);
        let history = MockHistory::new(60.0);
        let mut ctx = EvalContext::default();
        ctx.clock.elapsed_time = 12.05;
        let mut sink = RecordingReportSink::default();
        let p = base_premise(
            ObjectRef::simulation(),
            Attribute::Time,
            Relation::Cmp(CmpOp::Eq),
            12.0,
        );
        // tstep of 0.2 days -> window [11.9, 12.1)
        assert!(evaluate(&p, &mut ctx, &resolver, &history, 0.2, "R1", &mut sink));
    }

    #[test]
    fn stack_result_relation_compares_against_peek() {
        let net = MockNetwork::new(0, 0);
        let units = UsUnits;
        let resolver = Resolver::new(&net, &units);
        let history = MockHistory::new(60.0);
        let mut ctx = EvalContext::default();
        ctx.stack.push(5.0);
        let mut sink = RecordingReportSink::default();
        let p = base_premise(
            ObjectRef::stack(),
            Attribute::StackResult,
            Relation::Cmp(CmpOp::Gt),
            4.0,
        );
        assert!(evaluate(&p, &mut ctx, &resolver, &history, 1.0, "R1", &mut sink));
    }
}
