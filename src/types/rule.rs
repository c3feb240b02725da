//! Rules, premises, and actions: the compiled form of rule text (§3).

use super::attribute::Attribute;
use super::object::ObjectRef;
use super::relation::Relation;

/// Logical connective joining a premise to the rest of its rule's premise
/// list. The compiler always records the clause introduced by `IF` with
/// kind `And` (§4.4); `Or` premises are evaluated only when the running
/// result is currently `false` (§4.6).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PremiseKind {
    And,
    Or,
}

/// One clause of a rule's `IF`/`AND`/`OR` block.
#[derive(Debug, Clone)]
pub struct Premise {
    pub kind: PremiseKind,
    pub lhs: ObjectRef,
    pub lhs_attr: Attribute,
    /// `Some` when the RHS is itself an object/attribute reference;
    /// `None` when the RHS is the literal `immediate_value`.
    pub rhs: Option<(ObjectRef, Attribute)>,
    pub relation: Relation,
    /// Literal RHS (or RPN operand) when `rhs` is `None`.
    pub immediate_value: f64,
}

/// The attribute an action assigns. PID laws are recorded here rather than
/// folded into `Setting`, following the original's decision to keep the
/// `PID`/`PID2`/`PID3` tags distinct from a plain `SETTING` driver.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ActionAttribute {
    Status,
    Setting,
    Pid,
    Pid2,
    Pid3,
}

/// Where an action's `Status`/`Setting` value comes from. Exactly one
/// driver applies per action (§3).
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ActionSource {
    /// `direct_value` on the owning [`Action`] is used as-is.
    Literal,
    Curve(usize),
    TimeSeries(usize),
    /// Use the current top of the RPN stack at firing time (`STACK`).
    StackResult,
}

/// Mutable PID controller history, scoped to the owning action clause (not
/// the rule, not the link) — two rules driving the same link with
/// independent PID actions keep independent histories, matching the
/// original's per-`TAction` `e1`/`e2`/`e3` fields.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct PidHistory {
    pub e1: f64,
    pub e2: f64,
    pub e3: f64,
}

/// PID gains for a `PID`/`PID2`/`PID3` action.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PidCoeffs {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

/// One clause of a rule's `THEN`/`ELSE` block.
#[derive(Debug, Clone)]
pub struct Action {
    pub rule_index: usize,
    pub link: ObjectRef,
    pub attribute: ActionAttribute,
    /// Present for `Status`/`Setting`; ignored for PID attributes.
    pub source: ActionSource,
    /// Literal value when `source == Literal`; for `Status` this is `0.0`
    /// (OFF/CLOSED) or `1.0` (ON/OPEN); for `Setting` it must lie in
    /// `[0, 1]` on non-pump links.
    pub direct_value: f64,
    /// `Some` iff `attribute` is `Pid`/`Pid2`/`Pid3`.
    pub pid_coeffs: Option<PidCoeffs>,
    pub pid_history: PidHistory,
}

impl Action {
    pub fn is_pid(&self) -> bool {
        matches!(
            self.attribute,
            ActionAttribute::Pid | ActionAttribute::Pid2 | ActionAttribute::Pid3
        )
    }
}

/// A compiled rule: a priority, a premise sequence, and two action lists.
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: String,
    /// Defaults to `0.0` when no `PRIORITY` clause is given.
    pub priority: f64,
    pub premises: Vec<Premise>,
    pub then_actions: Vec<Action>,
    pub else_actions: Vec<Action>,
}

impl Rule {
    pub fn new(id: impl Into<String>) -> Self {
        Rule {
            id: id.into(),
            priority: 0.0,
            premises: Vec::new(),
            then_actions: Vec::new(),
            else_actions: Vec::new(),
        }
    }
}
