//! A rule-based control engine for storm-water/sewer network simulators.
//!
//! Rule text in the `RULE ... IF ... THEN ... ELSE ... PRIORITY ...` form is
//! compiled into [`types::Rule`] values ([`compiler`]), then evaluated one
//! simulation step at a time against a host's live network state
//! ([`resolver`], [`premise`], [`evaluator`]), arbitrated by priority when
//! two rules target the same link ([`arbiter`]), and committed through PID
//! control laws or curve/time-series/RPN-stack drivers ([`pid`],
//! [`modulated`]). [`engine::RuleEngine`] ties the pipeline together.
//!
//! The engine owns no simulator state of its own: a host implements the
//! traits in [`host`] against its own node/link arrays, results history, and
//! curve/time-series tables. [`testing`] supplies in-memory stand-ins for
//! tests and small embedders.

pub mod arbiter;
pub mod compiler;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod history;
pub mod host;
pub mod limits;
pub mod modulated;
pub mod pid;
pub mod premise;
pub mod resolver;
pub mod stack;
pub mod types;

pub mod testing;

pub use engine::RuleEngine;
pub use error::{ControlError, ErrorCode, Result};
