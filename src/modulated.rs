//! C9 — Modulated Setters: curve- or time-series-driven action values, plus
//! the `STACK` driver that dereferences the current top of stack (§4.9).

use crate::host::{CurveTable, TimeSeriesTable};
use crate::stack::Stack;
use crate::types::ActionSource;

/// Computes the current value for an action whose `source` is not a plain
/// literal. `control_value` is the most recent LHS comparison operand
/// (§3), consumed by curve lookups; `current_time` is elapsed simulation
/// time in days, consumed by time-series lookups.
pub fn resolve<C: CurveTable, T: TimeSeriesTable>(
    source: ActionSource,
    curves: &C,
    series: &T,
    stack: &Stack,
    control_value: f64,
    current_time: f64,
) -> f64 {
    match source {
        ActionSource::Literal => unreachable!("modulated::resolve called for a literal action"),
        ActionSource::Curve(curve) => curves.lookup(curve, control_value),
        ActionSource::TimeSeries(ts) => series.lookup(ts, current_time, true),
        ActionSource::StackResult => {
            let top = stack.peek();
            if top.is_nan() {
                0.0
            } else {
                top
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTables;

    #[test]
    fn curve_lookup_uses_control_value() {
        let mut tables = MockTables::default();
        tables.curves.insert(0, vec![(0.0, 0.0), (10.0, 100.0)]);
        let stack = Stack::new();
        let v = resolve(
            ActionSource::Curve(0),
            &tables,
            &tables,
            &stack,
            5.0,
            0.0,
        );
        assert_eq!(v, 50.0);
    }

    #[test]
    fn stack_driver_reads_top_of_stack() {
        let tables = MockTables::default();
        let mut stack = Stack::new();
        stack.push(5.0);
        let v = resolve(ActionSource::StackResult, &tables, &tables, &stack, 0.0, 0.0);
        assert_eq!(v, 5.0);
    }

    #[test]
    fn stack_driver_on_empty_stack_is_zero() {
        let tables = MockTables::default();
        let stack = Stack::new();
        let v = resolve(ActionSource::StackResult, &tables, &tables, &stack, 0.0, 0.0);
        assert_eq!(v, 0.0);
    }
}
