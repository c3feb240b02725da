//! Rule Engine: owns the compiled [`Rule`] set and drives one evaluation
//! step at a time (§4.6). The library's top-level entry point, analogous to
//! the teacher's `EPANET` project wrapper around an opened `.inp` file.

use crate::compiler::RuleSet;
use crate::error::Result;
use crate::evaluator;
use crate::host::{CurveTable, HistoryStore, NetworkState, ReportSink, SymbolTable, TimeSeriesTable};
use crate::resolver::EvalClock;
use crate::types::units::UnitSystem;
use crate::types::Rule;

/// Owns a compiled rule set and evaluates it one step at a time. Holds no
/// host state itself — `network`/`history`/`curves`/`series`/`report` are
/// borrowed fresh on each [`RuleEngine::evaluate`] call, the way the
/// original re-reads live network arrays every time step rather than
/// caching them.
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    rules: Vec<Rule>,
}

impl RuleEngine {
    pub fn new() -> Self {
        RuleEngine { rules: Vec::new() }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Compiles one `RULE ... PRIORITY ...` block and adds it to the set.
    pub fn add_rule_text<S: SymbolTable>(&mut self, text: &str, symbols: &S) -> Result<()> {
        let rule = RuleSet::compile(text, symbols)?;
        log::info!("compiled rule {} ({} premises)", rule.id, rule.premises.len());
        self.rules.push(rule);
        Ok(())
    }

    /// Compiles every rule block in a multi-rule document, splitting on
    /// blank lines between `RULE` blocks.
    pub fn add_rules_text<S: SymbolTable>(&mut self, text: &str, symbols: &S) -> Result<()> {
        for block in text.split("\n\n") {
            if block.trim().is_empty() {
                continue;
            }
            self.add_rule_text(block, symbols)?;
        }
        Ok(())
    }

    /// Runs one simulation step: evaluates every rule's premises, arbitrates
    /// conflicting actions by priority, and commits surviving settings to
    /// `network`. Returns the number of links whose target setting changed.
    #[allow(clippy::too_many_arguments)]
    pub fn evaluate<N, U, H, C, T, R>(
        &mut self,
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
        log::debug!(
            "evaluating {} rules at t={:.4}d",
            self.rules.len(),
            clock.elapsed_time
        );
        let committed = evaluator::evaluate_step(
            &mut self.rules,
            network,
            units,
            history,
            curves,
            series,
            report,
            clock,
            tstep_days,
        );
        if committed > 0 {
            log::info!("{committed} link setting(s) changed by rule evaluation");
        }
        committed
    }
}
