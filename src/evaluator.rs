//! C6 — Rule Evaluator: the per-step driver. Clears the stack, walks each
//! rule's premises with AND/OR short-circuit, selects the THEN or ELSE
//! branch, and submits candidate actions to the arbiter (§4.6).

use crate::arbiter::Arbiter;
use crate::host::{CurveTable, HistoryStore, NetworkState, ReportSink, TimeSeriesTable, Warning};
use crate::modulated;
use crate::pid;
use crate::premise::{self, EvalContext};
use crate::resolver::{EvalClock, Resolver};
use crate::types::units::UnitSystem;
use crate::types::{Action, ActionAttribute, ActionSource, PremiseKind, Rule};

/// Runs one simulation step against `rules`, mutating each action's PID
/// history in place and writing surviving settings back to `network`.
/// Returns the count of links whose target setting actually changed
/// (§4.6 step 3).
#[allow(clippy::too_many_arguments)]
pub fn evaluate_step<N, U, H, C, T, R>(
    rules: &mut [Rule],
    network: &mut N,
    units: &U,
    history: &H,
    curves: &C,
    series: &T,
    report: &mut R,
    clock: EvalClock,
    tstep_days: f64,
) -> usize
where
    N: NetworkState,
    U: UnitSystem,
    H: HistoryStore,
    C: CurveTable,
    T: TimeSeriesTable,
    R: ReportSink,
{
    let mut ctx = EvalContext::new(clock);
    let mut arbiter = Arbiter::new();

    // The stack is process-wide across rules within a step (§4.6): side
    // effects from rule k are visible to rule k+1, so ctx is shared across
    // this whole loop rather than reset per rule.
    for rule in rules.iter_mut() {
        let resolver = Resolver::new(network, units);
        let fired = run_premises(rule, &mut ctx, &resolver, history, tstep_days, report);
        let actions = if fired {
            &mut rule.then_actions
        } else {
            &mut rule.else_actions
        };
        for action in actions.iter_mut() {
            let Some(link) = action.link.index else {
                continue;
            };
            let value = compute_action_value(action, &ctx, network, curves, series, clock.elapsed_time, tstep_days);
            arbiter.submit(&rule.id, rule.priority, link, value);
        }
    }

    commit(&arbiter, network, report, clock.elapsed_time)
}

/// Evaluates a rule's premise list in authored order, honoring the
/// AND/OR short-circuit rules of §4.6.
fn run_premises<N, U, H, R>(
    rule: &Rule,
    ctx: &mut EvalContext,
    resolver: &Resolver<N, U>,
    history: &H,
    tstep_days: f64,
    report: &mut R,
) -> bool
where
    N: NetworkState,
    U: UnitSystem,
    H: HistoryStore,
    R: ReportSink,
{
    let mut result = true;
    for (idx, premise) in rule.premises.iter().enumerate() {
        match premise.kind {
            PremiseKind::And => {
                if !result {
                    // Short-circuit: a failed AND stops the rest of the
                    // premise list, including any stack side effects that
                    // follow it (§9 open question, resolved: preserve the
                    // original's short-circuit behavior).
                    if premise.relation.is_stack() {
                        report.warn(
                            &rule.id,
                            Warning::StackOpShortCircuited,
                            &format!("premise {idx} skipped by short-circuit"),
                        );
                    }
                    break;
                }
                result = premise::evaluate(premise, ctx, resolver, history, tstep_days, &rule.id, report);
            }
            PremiseKind::Or => {
                if !result {
                    result = premise::evaluate(premise, ctx, resolver, history, tstep_days, &rule.id, report);
                }
            }
        }
    }
    result
}

fn compute_action_value<N, C, T>(
    action: &mut Action,
    ctx: &EvalContext,
    network: &N,
    curves: &C,
    series: &T,
    current_time: f64,
    tstep_days: f64,
) -> f64
where
    N: NetworkState,
    C: CurveTable,
    T: TimeSeriesTable,
{
    match action.attribute {
        ActionAttribute::Status => action.direct_value,
        ActionAttribute::Setting => match action.source {
            ActionSource::Literal => action.direct_value,
            _ => modulated::resolve(
                action.source,
                curves,
                series,
                &ctx.stack,
                ctx.control_value,
                current_time,
            ),
        },
        ActionAttribute::Pid | ActionAttribute::Pid2 | ActionAttribute::Pid3 => {
            let link = action.link.index.expect("PID action must target a resolved link");
            let link_kind = network.link_kind(link);
            let target_setting = network.link_target_setting(link);
            let coeffs = action
                .pid_coeffs
                .expect("PID action clauses always carry gains (§3 invariant)");
            let (setting, history) = pid::update(
                action.attribute,
                coeffs,
                action.pid_history,
                ctx.set_point,
                ctx.control_value,
                target_setting,
                tstep_days,
                link_kind,
            );
            action.pid_history = history;
            setting
        }
    }
}

fn commit<N, R>(arbiter: &Arbiter, network: &mut N, report: &mut R, time: f64) -> usize
where
    N: NetworkState,
    R: ReportSink,
{
    let mut committed = 0;
    for candidate in arbiter.candidates() {
        let current = network.link_target_setting(candidate.link);
        if current != candidate.value {
            network.set_link_target_setting(candidate.link, candidate.value);
            report.control_action(&candidate.rule_id, candidate.link, candidate.value, time);
            committed += 1;
        }
    }
    committed
}
