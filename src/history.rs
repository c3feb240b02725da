//! C3 — History Reader: fetches a persisted attribute value from a past
//! report period against the results store (§4.3).

use crate::host::{HistoryStore, LinkHistoryAttr, NodeHistoryAttr};
use crate::types::ObjectKind;

/// The object kinds `BACK` is ever queried against, and the attribute it
/// reads. The premise evaluator (C5) maps a premise's `lhs_attr` onto one
/// of these before calling [`read_past`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HistoryAttr {
    Node(NodeHistoryAttr),
    Link(LinkHistoryAttr),
}

/// Given a past report-step offset, fetches the object's attribute reading
/// at that period (§4.3). `step_offset` counts back from the most recent
/// period: `period = n_periods - step_offset`. Returns `None` (the
/// caller's premise degrades to `false`) when `step_offset` is non-positive
/// relative to `n_periods`, or the store has nothing for that slot.
pub fn read_past<H: HistoryStore>(
    store: &H,
    kind: ObjectKind,
    index: usize,
    attr: HistoryAttr,
    step_offset: i64,
) -> Option<f64> {
    if step_offset < 0 {
        return None;
    }
    let n_periods = store.n_periods() as i64;
    let n = n_periods - step_offset;
    if n <= 0 {
        return None;
    }
    let period = (n - 1) as usize;
    match (kind, attr) {
        (ObjectKind::Node, HistoryAttr::Node(a)) => store.node_value(index, a, period),
        (_, HistoryAttr::Link(a)) if kind.is_link_family() => store.link_value(index, a, period),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockHistory;

    #[test]
    fn reads_depth_n_periods_back() {
        let mut h = MockHistory::new(60.0);
        h.push_node_period(0, 1.0, 101.0, 0.1);
        h.push_node_period(0, 2.0, 102.0, 0.2);
        h.push_node_period(0, 2.5, 102.5, 0.3);
        h.set_periods(3);
        // step_offset 0 -> most recent period (index 2)
        let v = read_past(&h, ObjectKind::Node, 0, HistoryAttr::Node(NodeHistoryAttr::Depth), 0);
        assert_eq!(v, Some(2.5));
        // step_offset 2 -> period 0
        let v = read_past(&h, ObjectKind::Node, 0, HistoryAttr::Node(NodeHistoryAttr::Depth), 2);
        assert_eq!(v, Some(1.0));
    }

    #[test]
    fn offset_exceeding_nperiods_is_none() {
        let mut h = MockHistory::new(60.0);
        h.push_node_period(0, 1.0, 101.0, 0.1);
        h.set_periods(1);
        let v = read_past(&h, ObjectKind::Node, 0, HistoryAttr::Node(NodeHistoryAttr::Depth), 5);
        assert_eq!(v, None);
    }

    #[test]
    fn link_kind_with_node_attr_is_none() {
        let mut h = MockHistory::new(60.0);
        h.push_node_period(0, 1.0, 101.0, 0.1);
        h.set_periods(1);
        let v = read_past(&h, ObjectKind::Pump, 0, HistoryAttr::Node(NodeHistoryAttr::Depth), 0);
        assert_eq!(v, None);
    }
}
