//! C4 — Rule Compiler: parses tokenized clauses (`RULE/IF/AND/OR/THEN/
//! ELSE/PRIORITY`) into a [`Rule`] with a premise list and two action
//! lists (§4.4).

use chrono::{NaiveDate, NaiveTime, Timelike};

use crate::error::{ControlError, Result};
use crate::host::SymbolTable;
use crate::types::{
    Action, ActionAttribute, ActionSource, Attribute, ObjectKind, ObjectRef, PidCoeffs,
    PidHistory, Premise, PremiseKind, Relation, Rule, StackOp,
};

/// FSM state the clause interpreter is in, named after the keyword that
/// produced it (§4.4). `Priority` doubles as the idle state before a
/// rule's first clause and after its last.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum InputState {
    Priority,
    Rule,
    If,
    Then,
    Else,
}

/// A set of rules under construction. Clauses for rule `r` arrive in
/// sequence (mirroring `controls_addRuleClause`'s one-clause-at-a-time
/// contract); a single `InputState` tracks progress across the whole set,
/// since the host feeds one rule's clauses to completion before starting
/// the next.
pub struct RuleSet {
    rules: Vec<Rule>,
    state: InputState,
    current: usize,
}

impl RuleSet {
    /// Preallocates `n` rule slots, mirroring `controls_create(n)`.
    pub fn new(n: usize) -> Self {
        RuleSet {
            rules: (0..n).map(|i| Rule::new(format!("RULE{i}"))).collect(),
            state: InputState::Priority,
            current: 0,
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn into_rules(self) -> Vec<Rule> {
        self.rules
    }

    /// Feeds one already-tokenized clause, e.g. `("RULE", ["R1"])` or
    /// `("IF", ["NODE", "N1", "DEPTH", ">", "4.5"])`. The direct analogue
    /// of `controls_addRuleClause`.
    pub fn add_clause<S: SymbolTable>(
        &mut self,
        r: usize,
        keyword: &str,
        tokens: &[&str],
        symbols: &S,
    ) -> Result<()> {
        let rule_id_for_errors = self
            .rules
            .get(r)
            .map(|rule| rule.id.clone())
            .unwrap_or_else(|| format!("RULE{r}"));

        match keyword.to_ascii_uppercase().as_str() {
            "RULE" => {
                self.expect_state(InputState::Priority, keyword, &rule_id_for_errors)?;
                let id = *tokens
                    .first()
                    .ok_or_else(|| too_few(&rule_id_for_errors, keyword, tokens))?;
                self.current = r;
                self.rules[r].id = id.to_string();
                self.state = InputState::Rule;
            }
            "IF" => {
                self.expect_state(InputState::Rule, keyword, &rule_id_for_errors)?;
                let premise = parse_premise(PremiseKind::And, tokens, &rule_id_for_errors, symbols)?;
                self.rules[self.current].premises.push(premise);
                self.state = InputState::If;
            }
            "AND" => match self.state {
                InputState::If => {
                    let premise =
                        parse_premise(PremiseKind::And, tokens, &rule_id_for_errors, symbols)?;
                    self.rules[self.current].premises.push(premise);
                }
                InputState::Then => {
                    let action = parse_action(tokens, &rule_id_for_errors, symbols)?;
                    self.rules[self.current].then_actions.push(action);
                }
                InputState::Else => {
                    let action = parse_action(tokens, &rule_id_for_errors, symbols)?;
                    self.rules[self.current].else_actions.push(action);
                }
                _ => return Err(bad_state(&rule_id_for_errors, keyword, self.state)),
            },
            "OR" => {
                self.expect_state(InputState::If, keyword, &rule_id_for_errors)?;
                let premise = parse_premise(PremiseKind::Or, tokens, &rule_id_for_errors, symbols)?;
                self.rules[self.current].premises.push(premise);
            }
            "THEN" => {
                self.expect_state(InputState::If, keyword, &rule_id_for_errors)?;
                let action = parse_action(tokens, &rule_id_for_errors, symbols)?;
                self.rules[self.current].then_actions.push(action);
                self.state = InputState::Then;
            }
            "ELSE" => {
                self.expect_state(InputState::Then, keyword, &rule_id_for_errors)?;
                let action = parse_action(tokens, &rule_id_for_errors, symbols)?;
                self.rules[self.current].else_actions.push(action);
                self.state = InputState::Else;
            }
            "PRIORITY" => {
                if !matches!(self.state, InputState::Then | InputState::Else) {
                    return Err(bad_state(&rule_id_for_errors, keyword, self.state));
                }
                let token = tokens
                    .first()
                    .ok_or_else(|| too_few(&rule_id_for_errors, keyword, tokens))?;
                let priority: f64 = token.parse().map_err(|_| ControlError::BadNumber {
                    rule_id: rule_id_for_errors.clone(),
                    token: token.to_string(),
                })?;
                self.rules[self.current].priority = priority;
                self.state = InputState::Priority;
            }
            other => {
                return Err(ControlError::BadKeyword {
                    rule_id: rule_id_for_errors,
                    token: other.to_string(),
                })
            }
        }
        Ok(())
    }

    fn expect_state(&self, expected: InputState, keyword: &str, rule_id: &str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(bad_state(rule_id, keyword, self.state))
        }
    }

    /// Line-splits and whitespace-tokenizes a full `RULE ... IF ... THEN
    /// ... ELSE ... PRIORITY ...` block and compiles it into one [`Rule`].
    /// A stand-in for a host's own tokenizer (§1 treats text tokenization
    /// as an external collaborator) — convenient for tests and small
    /// embedders, not a claim of canonicity.
    pub fn compile<S: SymbolTable>(text: &str, symbols: &S) -> Result<Rule> {
        let mut set = RuleSet::new(1);
        for line in text.lines() {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            let Some((keyword, rest)) = tokens.split_first() else {
                continue;
            };
            set.add_clause(0, keyword, rest, symbols)?;
        }
        Ok(set.into_rules().into_iter().next().unwrap())
    }
}

fn bad_state(rule_id: &str, keyword: &str, state: InputState) -> ControlError {
    ControlError::BadState {
        rule_id: rule_id.to_string(),
        keyword: keyword.to_string(),
        state: format!("{state:?}"),
    }
}

fn too_few(rule_id: &str, keyword: &str, tokens: &[&str]) -> ControlError {
    ControlError::TooFewItems {
        rule_id: rule_id.to_string(),
        clause: format!("{keyword} {}", tokens.join(" ")),
    }
}

fn resolve_object_index<S: SymbolTable>(kind: ObjectKind, name: &str, symbols: &S) -> Option<usize> {
    if kind == ObjectKind::Node {
        symbols.find_node(name)
    } else if kind.is_link_family() {
        symbols.find_link(name)
    } else {
        None
    }
}

fn parse_premise<S: SymbolTable>(
    premise_kind: PremiseKind,
    tokens: &[&str],
    rule_id: &str,
    symbols: &S,
) -> Result<Premise> {
    let mut idx = 0usize;
    let kind_token = *tokens
        .first()
        .ok_or_else(|| too_few(rule_id, "IF/AND/OR", tokens))?;
    let obj_kind = ObjectKind::from_keyword(kind_token).ok_or_else(|| ControlError::BadKeyword {
        rule_id: rule_id.to_string(),
        token: kind_token.to_string(),
    })?;
    idx += 1;

    let lhs = if obj_kind.has_name() {
        let name = *tokens
            .get(idx)
            .ok_or_else(|| too_few(rule_id, "IF/AND/OR", tokens))?;
        idx += 1;
        let index = resolve_object_index(obj_kind, name, symbols).ok_or_else(|| {
            ControlError::BadName {
                rule_id: rule_id.to_string(),
                token: name.to_string(),
            }
        })?;
        ObjectRef {
            kind: obj_kind,
            index: Some(index),
        }
    } else {
        ObjectRef {
            kind: obj_kind,
            index: None,
        }
    };

    let attr_token = *tokens
        .get(idx)
        .ok_or_else(|| too_few(rule_id, "IF/AND/OR", tokens))?;
    idx += 1;
    let lhs_attr = Attribute::from_keyword(attr_token).ok_or_else(|| ControlError::BadKeyword {
        rule_id: rule_id.to_string(),
        token: attr_token.to_string(),
    })?;
    if !lhs_attr.valid_for(obj_kind) {
        return Err(ControlError::BadRule {
            rule_id: rule_id.to_string(),
            reason: format!("{lhs_attr:?} is not a valid attribute for {obj_kind:?}"),
        });
    }

    let rel_token = *tokens
        .get(idx)
        .ok_or_else(|| too_few(rule_id, "IF/AND/OR", tokens))?;
    idx += 1;
    let relation = Relation::from_token(rel_token).ok_or_else(|| ControlError::BadKeyword {
        rule_id: rule_id.to_string(),
        token: rel_token.to_string(),
    })?;

    let rhs_tokens = &tokens[idx..];
    // Only [ENTER] and [BACK] take an operand token; other stack ops
    // (binary/unary arithmetic, stack comparisons) act on values already on
    // the stack and carry no trailing literal.
    let operand_required = matches!(
        relation,
        Relation::Cmp(_) | Relation::Stack(StackOp::Enter) | Relation::Stack(StackOp::Back)
    );
    let (rhs, immediate_value) = if rhs_tokens.is_empty() && !operand_required {
        (None, 0.0)
    } else {
        parse_rhs(lhs_attr, rhs_tokens, rule_id, symbols)?
    };

    Ok(Premise {
        kind: premise_kind,
        lhs,
        lhs_attr,
        rhs,
        relation,
        immediate_value,
    })
}

fn parse_rhs<S: SymbolTable>(
    lhs_attr: Attribute,
    tokens: &[&str],
    rule_id: &str,
    symbols: &S,
) -> Result<(Option<(ObjectRef, Attribute)>, f64)> {
    let head = *tokens
        .first()
        .ok_or_else(|| too_few(rule_id, "IF/AND/OR", tokens))?;

    if let Some(obj_kind) = ObjectKind::from_keyword(head) {
        let mut idx = 1usize;
        let object_ref = if obj_kind.has_name() {
            let name = *tokens
                .get(idx)
                .ok_or_else(|| too_few(rule_id, "IF/AND/OR", tokens))?;
            idx += 1;
            let index = resolve_object_index(obj_kind, name, symbols).ok_or_else(|| {
                ControlError::BadName {
                    rule_id: rule_id.to_string(),
                    token: name.to_string(),
                }
            })?;
            ObjectRef {
                kind: obj_kind,
                index: Some(index),
            }
        } else {
            ObjectRef {
                kind: obj_kind,
                index: None,
            }
        };
        let attr_token = *tokens
            .get(idx)
            .ok_or_else(|| too_few(rule_id, "IF/AND/OR", tokens))?;
        let rhs_attr = Attribute::from_keyword(attr_token).ok_or_else(|| ControlError::BadKeyword {
            rule_id: rule_id.to_string(),
            token: attr_token.to_string(),
        })?;
        // A mismatched RHS attribute is a warning, not an error (§4.4);
        // the premise evaluator (C5) reports it at evaluation time since
        // the compiler has no `ReportSink` of its own.
        Ok((Some((object_ref, rhs_attr)), 0.0))
    } else {
        Ok((None, parse_literal(lhs_attr, head, rule_id)?))
    }
}

fn parse_literal(attr: Attribute, token: &str, rule_id: &str) -> Result<f64> {
    if token == "---" {
        return Ok(0.0);
    }
    match attr {
        Attribute::Status => match token.to_ascii_uppercase().as_str() {
            "OFF" | "CLOSED" => Ok(0.0),
            "ON" | "OPEN" => Ok(1.0),
            _ => Err(ControlError::BadKeyword {
                rule_id: rule_id.to_string(),
                token: token.to_string(),
            }),
        },
        Attribute::Time | Attribute::ClockTime | Attribute::TimeOpen | Attribute::TimeClosed => {
            parse_clock_literal(token, rule_id)
        }
        Attribute::Date => parse_date_literal(token, rule_id),
        Attribute::Day => parse_ranged_number(token, rule_id, 1.0, 7.0),
        Attribute::Month => parse_ranged_number(token, rule_id, 1.0, 12.0),
        _ => token.parse::<f64>().map_err(|_| ControlError::BadNumber {
            rule_id: rule_id.to_string(),
            token: token.to_string(),
        }),
    }
}

fn parse_ranged_number(token: &str, rule_id: &str, lo: f64, hi: f64) -> Result<f64> {
    let value: f64 = token.parse().map_err(|_| ControlError::BadNumber {
        rule_id: rule_id.to_string(),
        token: token.to_string(),
    })?;
    if value < lo || value > hi {
        return Err(ControlError::BadNumber {
            rule_id: rule_id.to_string(),
            token: token.to_string(),
        });
    }
    Ok(value)
}

/// Parses an `HH:MM:SS` literal into a day fraction `[0, 1)`.
fn parse_clock_literal(token: &str, rule_id: &str) -> Result<f64> {
    let time = NaiveTime::parse_from_str(token, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(token, "%H:%M"))
        .map_err(|_| ControlError::BadDateTime {
            rule_id: rule_id.to_string(),
            token: token.to_string(),
        })?;
    Ok(time.num_seconds_from_midnight() as f64 / 86_400.0)
}

/// Parses an `MM/DD/YYYY` literal into a whole-day count since a fixed
/// epoch. The original's date arithmetic runs against a project-wide
/// calendar utility (§1, external collaborator); this stand-in only needs
/// a stable, monotonic day count for comparisons.
fn parse_date_literal(token: &str, rule_id: &str) -> Result<f64> {
    let date = NaiveDate::parse_from_str(token, "%m/%d/%Y").map_err(|_| ControlError::BadDateTime {
        rule_id: rule_id.to_string(),
        token: token.to_string(),
    })?;
    Ok(date.num_days_from_ce() as f64)
}

fn parse_number(token: &str, rule_id: &str) -> Result<f64> {
    token.parse().map_err(|_| ControlError::BadNumber {
        rule_id: rule_id.to_string(),
        token: token.to_string(),
    })
}

fn parse_status_literal(token: &str, kind: crate::types::LinkKind, rule_id: &str) -> Result<f64> {
    use crate::types::LinkKind;
    match (kind, token.to_ascii_uppercase().as_str()) {
        (LinkKind::Pump, "OFF") => Ok(0.0),
        (LinkKind::Pump, "ON") => Ok(1.0),
        (LinkKind::Conduit, "CLOSED") => Ok(0.0),
        (LinkKind::Conduit, "OPEN") => Ok(1.0),
        _ => Err(ControlError::BadAction {
            rule_id: rule_id.to_string(),
            reason: format!("{token} is not a valid STATUS literal for {kind:?}"),
        }),
    }
}

fn parse_action<S: SymbolTable>(tokens: &[&str], rule_id: &str, symbols: &S) -> Result<Action> {
    if tokens.len() < 4 {
        return Err(too_few(rule_id, "THEN/ELSE", tokens));
    }
    let kind_token = tokens[0];
    let obj_kind = ObjectKind::from_keyword(kind_token).ok_or_else(|| ControlError::BadKeyword {
        rule_id: rule_id.to_string(),
        token: kind_token.to_string(),
    })?;
    if !obj_kind.is_link_family() {
        return Err(ControlError::BadAction {
            rule_id: rule_id.to_string(),
            reason: format!("{obj_kind:?} is not a link-family object"),
        });
    }
    let name = tokens[1];
    let index = symbols.find_link(name).ok_or_else(|| ControlError::BadName {
        rule_id: rule_id.to_string(),
        token: name.to_string(),
    })?;
    let actual_kind = symbols.link_kind(index);
    if !actual_kind.matches(obj_kind) {
        return Err(ControlError::BadAction {
            rule_id: rule_id.to_string(),
            reason: format!("{name} is not a {obj_kind:?}"),
        });
    }

    let attr_token = tokens[2];
    if tokens[3] != "=" {
        return Err(too_few(rule_id, "THEN/ELSE", tokens));
    }
    let driver_tokens = &tokens[4..];
    let link_ref = ObjectRef::link(obj_kind, index);

    match attr_token.to_ascii_uppercase().as_str() {
        "STATUS" => {
            let token = driver_tokens
                .first()
                .ok_or_else(|| too_few(rule_id, "THEN/ELSE", tokens))?;
            let value = parse_status_literal(token, actual_kind, rule_id)?;
            Ok(Action {
                rule_index: 0,
                link: link_ref,
                attribute: ActionAttribute::Status,
                source: ActionSource::Literal,
                direct_value: value,
                pid_coeffs: None,
                pid_history: PidHistory::default(),
            })
        }
        "SETTING" => {
            use crate::types::LinkKind;
            match actual_kind {
                LinkKind::Orifice | LinkKind::Weir | LinkKind::Outlet | LinkKind::Pump => {}
                LinkKind::Conduit => {
                    return Err(ControlError::BadAction {
                        rule_id: rule_id.to_string(),
                        reason: format!("{name} is a conduit; conduits take STATUS, not SETTING"),
                    })
                }
            }
            parse_setting_driver(driver_tokens, link_ref, actual_kind, rule_id, symbols)
        }
        other => Err(ControlError::BadKeyword {
            rule_id: rule_id.to_string(),
            token: other.to_string(),
        }),
    }
}

fn parse_setting_driver<S: SymbolTable>(
    tokens: &[&str],
    link_ref: ObjectRef,
    actual_kind: crate::types::LinkKind,
    rule_id: &str,
    symbols: &S,
) -> Result<Action> {
    use crate::types::LinkKind;

    let head = *tokens
        .first()
        .ok_or_else(|| too_few(rule_id, "THEN/ELSE", tokens))?;
    let mk = |attribute, source, direct_value, pid_coeffs| Action {
        rule_index: 0,
        link: link_ref,
        attribute,
        source,
        direct_value,
        pid_coeffs,
        pid_history: PidHistory::default(),
    };

    match head.to_ascii_uppercase().as_str() {
        "CURVE" => {
            let name = tokens.get(1).ok_or_else(|| too_few(rule_id, "THEN/ELSE", tokens))?;
            let idx = symbols.find_curve(name).ok_or_else(|| ControlError::BadName {
                rule_id: rule_id.to_string(),
                token: name.to_string(),
            })?;
            Ok(mk(ActionAttribute::Setting, ActionSource::Curve(idx), 0.0, None))
        }
        "TIMESERIES" => {
            let name = tokens.get(1).ok_or_else(|| too_few(rule_id, "THEN/ELSE", tokens))?;
            let idx = symbols
                .find_time_series(name)
                .ok_or_else(|| ControlError::BadName {
                    rule_id: rule_id.to_string(),
                    token: name.to_string(),
                })?;
            Ok(mk(ActionAttribute::Setting, ActionSource::TimeSeries(idx), 0.0, None))
        }
        "STACK" => Ok(mk(ActionAttribute::Setting, ActionSource::StackResult, 0.0, None)),
        head_upper @ ("PID" | "PID2" | "PID3") => {
            if tokens.len() < 4 {
                return Err(too_few(rule_id, "THEN/ELSE", tokens));
            }
            let attribute = match head_upper {
                "PID" => ActionAttribute::Pid,
                "PID2" => ActionAttribute::Pid2,
                _ => ActionAttribute::Pid3,
            };
            let kp = parse_number(tokens[1], rule_id)?;
            let ki = parse_number(tokens[2], rule_id)?;
            let kd = parse_number(tokens[3], rule_id)?;
            Ok(Action {
                rule_index: 0,
                link: link_ref,
                attribute,
                source: ActionSource::Literal,
                direct_value: 0.0,
                pid_coeffs: Some(PidCoeffs { kp, ki, kd }),
                pid_history: PidHistory::default(),
            })
        }
        _ => {
            let value = parse_number(head, rule_id)?;
            if actual_kind != LinkKind::Pump && !(0.0..=1.0).contains(&value) {
                return Err(ControlError::BadAction {
                    rule_id: rule_id.to_string(),
                    reason: format!("setting {value} is outside [0, 1]"),
                });
            }
            Ok(mk(ActionAttribute::Setting, ActionSource::Literal, value, None))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockSymbols;
    use crate::types::{CmpOp, LinkKind, StackOp};

    fn symbols() -> MockSymbols {
        let mut s = MockSymbols::new();
        s.add_node("N1", 0);
        s.add_link("P1", 0, LinkKind::Pump);
        s.add_link("W1", 1, LinkKind::Weir);
        s.add_link("O1", 2, LinkKind::Orifice);
        s.add_link("C1", 3, LinkKind::Conduit);
        s
    }

    #[test]
    fn compiles_simple_threshold_rule() {
        let symbols = symbols();
        let text = "RULE R1\nIF NODE N1 DEPTH > 4.5\nTHEN PUMP P1 STATUS = ON\nELSE PUMP P1 STATUS = OFF\nPRIORITY 5";
        let rule = RuleSet::compile(text, &symbols).unwrap();
        assert_eq!(rule.id, "R1");
        assert_eq!(rule.priority, 5.0);
        assert_eq!(rule.premises.len(), 1);
        assert_eq!(rule.then_actions.len(), 1);
        assert_eq!(rule.else_actions.len(), 1);
        assert_eq!(rule.then_actions[0].direct_value, 1.0);
        assert_eq!(rule.else_actions[0].direct_value, 0.0);
    }

    #[test]
    fn compiles_rpn_stack_rule() {
        let symbols = symbols();
        let text = "RULE R2\nIF STACK OP [ENTER] 2.0\nAND STACK OP [ENTER] 3.0\nAND STACK OP [+]\nAND STACK RESULT > 4.0\nTHEN ORIFICE O1 SETTING = STACK";
        let rule = RuleSet::compile(text, &symbols).unwrap();
        assert_eq!(rule.premises.len(), 4);
        assert_eq!(rule.premises[0].relation, Relation::Stack(StackOp::Enter));
        assert_eq!(rule.premises[3].relation, Relation::Cmp(CmpOp::Gt));
        assert!(matches!(
            rule.then_actions[0].source,
            ActionSource::StackResult
        ));
    }

    #[test]
    fn compiles_pid_action() {
        let symbols = symbols();
        let text = "RULE R3\nIF NODE N1 DEPTH < 2.0\nTHEN ORIFICE O1 SETTING = PID 1.0 10.0 0.0";
        let rule = RuleSet::compile(text, &symbols).unwrap();
        let coeffs = rule.then_actions[0].pid_coeffs.unwrap();
        assert_eq!(coeffs.kp, 1.0);
        assert_eq!(coeffs.ki, 10.0);
        assert_eq!(rule.then_actions[0].attribute, ActionAttribute::Pid);
    }

    #[test]
    fn unknown_keyword_is_bad_keyword_error() {
        let symbols = symbols();
        let mut set = RuleSet::new(1);
        set.add_clause(0, "RULE", &["R1"], &symbols).unwrap();
        let err = set.add_clause(0, "WHEN", &["NODE", "N1", "DEPTH", ">", "1"], &symbols);
        assert!(matches!(err, Err(ControlError::BadKeyword { .. })));
    }

    #[test]
    fn clause_in_wrong_state_is_bad_state() {
        let symbols = symbols();
        let mut set = RuleSet::new(1);
        // IF before RULE.
        let err = set.add_clause(0, "IF", &["NODE", "N1", "DEPTH", ">", "1"], &symbols);
        assert!(matches!(err, Err(ControlError::BadState { .. })));
    }

    #[test]
    fn flow_attribute_invalid_on_node_is_bad_rule() {
        let symbols = symbols();
        let mut set = RuleSet::new(1);
        set.add_clause(0, "RULE", &["R1"], &symbols).unwrap();
        let err = set.add_clause(0, "IF", &["NODE", "N1", "FLOW", ">", "1"], &symbols);
        assert!(matches!(err, Err(ControlError::BadRule { .. })));
    }

    #[test]
    fn setting_literal_out_of_range_is_bad_action() {
        let symbols = symbols();
        let mut set = RuleSet::new(1);
        set.add_clause(0, "RULE", &["R1"], &symbols).unwrap();
        set.add_clause(0, "IF", &["NODE", "N1", "DEPTH", ">", "1"], &symbols)
            .unwrap();
        let err = set.add_clause(0, "THEN", &["WEIR", "W1", "SETTING", "=", "1.5"], &symbols);
        assert!(matches!(err, Err(ControlError::BadAction { .. })));
    }

    #[test]
    fn conduit_setting_action_is_bad_action() {
        // Conduits are STATUS-only (OPEN/CLOSED); SETTING belongs to
        // ORIFICE|WEIR|OUTLET (plus PID/curve/stack drivers on a PUMP).
        let symbols = symbols();
        let mut set = RuleSet::new(1);
        set.add_clause(0, "RULE", &["R1"], &symbols).unwrap();
        set.add_clause(0, "IF", &["NODE", "N1", "DEPTH", ">", "1"], &symbols)
            .unwrap();
        let err = set.add_clause(0, "THEN", &["CONDUIT", "C1", "SETTING", "=", "0.5"], &symbols);
        assert!(matches!(err, Err(ControlError::BadAction { .. })));

        let err = set.add_clause(0, "THEN", &["LINK", "C1", "SETTING", "=", "0.5"], &symbols);
        assert!(matches!(err, Err(ControlError::BadAction { .. })));
    }

    #[test]
    fn unresolved_name_is_bad_name() {
        let symbols = symbols();
        let mut set = RuleSet::new(1);
        set.add_clause(0, "RULE", &["R1"], &symbols).unwrap();
        let err = set.add_clause(0, "IF", &["NODE", "NOPE", "DEPTH", ">", "1"], &symbols);
        assert!(matches!(err, Err(ControlError::BadName { .. })));
    }

    #[test]
    fn dont_care_placeholder_parses_as_zero() {
        let symbols = symbols();
        let mut set = RuleSet::new(1);
        set.add_clause(0, "RULE", &["R1"], &symbols).unwrap();
        set.add_clause(0, "IF", &["NODE", "N1", "DEPTH", ">", "---"], &symbols)
            .unwrap();
        assert_eq!(set.rules()[0].premises[0].immediate_value, 0.0);
    }

    #[test]
    fn time_literal_parses_to_day_fraction() {
        let symbols = symbols();
        let mut set = RuleSet::new(1);
        set.add_clause(0, "RULE", &["R1"], &symbols).unwrap();
        set.add_clause(
            0,
            "IF",
            &["SIMULATION", "CLOCKTIME", "=", "06:00:00"],
            &symbols,
        )
        .unwrap();
        assert!((set.rules()[0].premises[0].immediate_value - 0.25).abs() < 1e-9);
    }

    #[test]
    fn actions_are_stored_in_authored_order() {
        // Deviates intentionally from the original's head-insertion linked
        // list (DESIGN.md): evaluation order matches authoring order.
        let symbols = symbols();
        let mut set = RuleSet::new(1);
        set.add_clause(0, "RULE", &["R1"], &symbols).unwrap();
        set.add_clause(0, "IF", &["NODE", "N1", "DEPTH", ">", "1"], &symbols)
            .unwrap();
        set.add_clause(0, "THEN", &["PUMP", "P1", "STATUS", "=", "ON"], &symbols)
            .unwrap();
        set.add_clause(0, "AND", &["WEIR", "W1", "SETTING", "=", "0.5"], &symbols)
            .unwrap();
        let rule = &set.rules()[0];
        assert_eq!(rule.then_actions[0].link.kind, ObjectKind::Pump);
        assert_eq!(rule.then_actions[1].link.kind, ObjectKind::Weir);
    }
}
