//! Attribute keywords a premise or action can reference (§3).

use super::object::ObjectKind;

#[cfg(test)]
use strum_macros::EnumIter;

/// An attribute a premise's LHS/RHS or an action's target can reference.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(test, derive(EnumIter))]
pub enum Attribute {
    Depth,
    Head,
    Volume,
    Inflow,
    Flow,
    Status,
    Setting,
    TimeOpen,
    TimeClosed,
    Time,
    Date,
    ClockTime,
    Day,
    Month,
    /// Pseudo-attribute: LHS is the stack's top-of-stack value.
    StackResult,
    /// Pseudo-attribute: LHS is the stack itself (an RPN operator clause).
    StackOp,
}

impl Attribute {
    /// Matches a keyword case-insensitively against the attribute keyword
    /// table (`DEPTH`, `HEAD`, `VOLUME`, `INFLOW`, `FLOW`, `STATUS`,
    /// `SETTING`, `TIMEOPEN`, `TIMECLOSED`, `TIME`, `DATE`, `CLOCKTIME`,
    /// `DAY`, `MONTH`, `RESULT`, `OP`).
    pub fn from_keyword(word: &str) -> Option<Self> {
        Some(match word.to_ascii_uppercase().as_str() {
            "DEPTH" => Attribute::Depth,
            "HEAD" => Attribute::Head,
            "VOLUME" => Attribute::Volume,
            "INFLOW" => Attribute::Inflow,
            "FLOW" => Attribute::Flow,
            "STATUS" => Attribute::Status,
            "SETTING" => Attribute::Setting,
            "TIMEOPEN" => Attribute::TimeOpen,
            "TIMECLOSED" => Attribute::TimeClosed,
            "TIME" => Attribute::Time,
            "DATE" => Attribute::Date,
            "CLOCKTIME" => Attribute::ClockTime,
            "DAY" => Attribute::Day,
            "MONTH" => Attribute::Month,
            "RESULT" => Attribute::StackResult,
            "OP" => Attribute::StackOp,
            _ => return None,
        })
    }

    /// Whether `self` is a legal attribute for an object of kind `kind`,
    /// per the per-kind whitelist in §3/§4.4: `FLOW` is invalid on a node,
    /// `HEAD` is invalid on a link, etc.
    pub fn valid_for(self, kind: ObjectKind) -> bool {
        use Attribute::*;
        match kind {
            ObjectKind::Node => matches!(self, Depth | Head | Volume | Inflow),
            ObjectKind::Link => matches!(self, Status | Depth | Flow | TimeOpen | TimeClosed),
            ObjectKind::Conduit => matches!(self, Status | Depth | Flow | TimeOpen | TimeClosed),
            ObjectKind::Pump => matches!(self, Status | Flow | TimeOpen | TimeClosed),
            ObjectKind::Orifice | ObjectKind::Weir | ObjectKind::Outlet => {
                matches!(self, Setting | Flow | Depth | TimeOpen | TimeClosed)
            }
            ObjectKind::Simulation => matches!(self, Time | Date | ClockTime | Day | Month),
            ObjectKind::Stack => matches!(self, StackResult | StackOp),
        }
    }
}
