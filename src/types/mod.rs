pub mod attribute;
pub mod object;
pub mod relation;
pub mod rule;
pub mod units;

pub use attribute::Attribute;
pub use object::{LinkKind, ObjectKind, ObjectRef};
pub use relation::{CmpOp, Relation, StackOp};
pub use rule::{
    Action, ActionAttribute, ActionSource, PidCoeffs, PidHistory, Premise, PremiseKind, Rule,
};
pub use units::{Quantity, UnitSystem};
