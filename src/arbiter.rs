//! C7 — Action Arbiter: collects candidate actions and resolves conflicts
//! by rule priority across rules touching the same link (§4.7).

use std::collections::HashMap;

/// One candidate setting for a link, submitted by a firing rule's action.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub rule_id: String,
    pub priority: f64,
    pub link: usize,
    pub value: f64,
    order: usize,
}

/// Per-step candidate action list (§3). At most one candidate survives per
/// link: on conflict, the rule with strictly greater priority wins; ties
/// keep whichever rule submitted first.
#[derive(Debug, Default)]
pub struct Arbiter {
    candidates: HashMap<usize, Candidate>,
    next_order: usize,
}

impl Arbiter {
    pub fn new() -> Self {
        Arbiter::default()
    }

    pub fn clear(&mut self) {
        self.candidates.clear();
        self.next_order = 0;
    }

    /// Submits a candidate action for `link`. Replaces the existing
    /// candidate only if `priority` is strictly greater.
    pub fn submit(&mut self, rule_id: &str, priority: f64, link: usize, value: f64) {
        let order = self.next_order;
        self.next_order += 1;
        match self.candidates.get(&link) {
            Some(existing) if priority <= existing.priority => {}
            _ => {
                self.candidates.insert(
                    link,
                    Candidate {
                        rule_id: rule_id.to_string(),
                        priority,
                        link,
                        value,
                        order,
                    },
                );
            }
        }
    }

    pub fn candidates(&self) -> impl Iterator<Item = &Candidate> {
        let mut sorted: Vec<&Candidate> = self.candidates.values().collect();
        sorted.sort_by_key(|c| c.order);
        sorted.into_iter()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn higher_priority_wins_regardless_of_order() {
        let mut a = Arbiter::new();
        a.submit("low", 1.0, 0, 0.3);
        a.submit("high", 10.0, 0, 0.8);
        let c: Vec<_> = a.candidates().collect();
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].rule_id, "high");
        assert_eq!(c[0].value, 0.8);
    }

    #[test]
    fn tie_keeps_earlier_submitter() {
        let mut a = Arbiter::new();
        a.submit("first", 5.0, 0, 1.0);
        a.submit("second", 5.0, 0, 2.0);
        let c: Vec<_> = a.candidates().collect();
        assert_eq!(c[0].rule_id, "first");
    }

    #[test]
    fn independent_links_both_survive() {
        let mut a = Arbiter::new();
        a.submit("r1", 1.0, 0, 1.0);
        a.submit("r2", 1.0, 1, 2.0);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn clear_empties_candidates() {
        let mut a = Arbiter::new();
        a.submit("r1", 1.0, 0, 1.0);
        a.clear();
        assert!(a.is_empty());
    }
}
