//! C2 — Value Resolver: maps an `(object, attribute)` reference to a live
//! scalar from network state, with unit conversion (§4.2).

use crate::host::NetworkState;
use crate::types::{Attribute, LinkKind, ObjectKind, ObjectRef, Quantity, UnitSystem};

/// Per-step evaluation context: current date/time and the most recent
/// comparison operands (§3's "shared evaluation context"). Named explicitly
/// per DESIGN.md's resolution of the `SetPoint`/`ControlValue` open
/// question, rather than left as implicit globals.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvalClock {
    /// Whole days since epoch.
    pub current_date: f64,
    /// Day fraction, `[0, 1)`.
    pub clock_time: f64,
    /// Elapsed simulation time, in days.
    pub elapsed_time: f64,
}

impl EvalClock {
    pub fn day_of_week(&self) -> u32 {
        (self.current_date.rem_euclid(7.0)) as u32 + 1
    }

    pub fn month(&self) -> u32 {
        // A host's real calendar utility replaces this; this stand-in keeps
        // the value in [1, 12] for testing purposes.
        ((self.current_date / 30.0).rem_euclid(12.0)) as u32 + 1
    }
}

/// Resolves a single `(object, attribute)` reference to a live value.
pub struct Resolver<'a, N: NetworkState, U: UnitSystem> {
    pub network: &'a N,
    pub units: &'a U,
}

impl<'a, N: NetworkState, U: UnitSystem> Resolver<'a, N, U> {
    pub fn new(network: &'a N, units: &'a U) -> Self {
        Resolver { network, units }
    }

    /// Returns `None` (the spec's `Missing`) when the object reference is
    /// inconsistent with the attribute, or the attribute's precondition
    /// fails (e.g. `TimeOpen` on a closed link).
    pub fn resolve(&self, obj: ObjectRef, attr: Attribute, clock: &EvalClock) -> Option<f64> {
        match obj.kind {
            ObjectKind::Node => self.resolve_node(obj.index?, attr),
            ObjectKind::Link
            | ObjectKind::Conduit
            | ObjectKind::Pump
            | ObjectKind::Orifice
            | ObjectKind::Weir
            | ObjectKind::Outlet => self.resolve_link(obj.index?, obj.kind, attr, clock),
            ObjectKind::Simulation => self.resolve_simulation(attr, clock),
            ObjectKind::Stack => None, // stack pseudo-attributes never go through the resolver
        }
    }

    fn resolve_node(&self, node: usize, attr: Attribute) -> Option<f64> {
        match attr {
            Attribute::Depth => Some(self.network.node_depth(node) * self.units.ucf(Quantity::Length)),
            Attribute::Head => {
                let head = self.network.node_depth(node) + self.network.node_invert_elevation(node);
                Some(head * self.units.ucf(Quantity::Length))
            }
            Attribute::Volume => Some(self.network.node_volume(node) * self.units.ucf(Quantity::Volume)),
            Attribute::Inflow => {
                Some(self.network.node_lateral_inflow(node) * self.units.ucf(Quantity::Flow))
            }
            _ => None,
        }
    }

    fn resolve_link(
        &self,
        link: usize,
        kind: ObjectKind,
        attr: Attribute,
        clock: &EvalClock,
    ) -> Option<f64> {
        let actual_kind = self.network.link_kind(link);
        if !actual_kind.matches(kind) {
            return None;
        }
        match attr {
            Attribute::Flow => {
                let direction = self.network.link_direction(link);
                Some(direction * self.network.link_flow(link) * self.units.ucf(Quantity::Flow))
            }
            Attribute::Depth => Some(self.network.link_depth(link) * self.units.ucf(Quantity::Length)),
            Attribute::Status => match actual_kind {
                LinkKind::Conduit | LinkKind::Pump => Some(if self.network.link_setting(link) > 0.0 {
                    1.0
                } else {
                    0.0
                }),
                _ => None,
            },
            Attribute::Setting => match actual_kind {
                LinkKind::Orifice | LinkKind::Weir | LinkKind::Outlet => {
                    Some(self.network.link_setting(link))
                }
                _ => None,
            },
            Attribute::TimeOpen => {
                if self.network.link_setting(link) > 0.0 {
                    Some(clock.current_date + clock.clock_time - self.network.link_time_last_set(link))
                } else {
                    None
                }
            }
            Attribute::TimeClosed => {
                if self.network.link_setting(link) <= 0.0 {
                    Some(clock.current_date + clock.clock_time - self.network.link_time_last_set(link))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    fn resolve_simulation(&self, attr: Attribute, clock: &EvalClock) -> Option<f64> {
        match attr {
            Attribute::Time => Some(clock.elapsed_time),
            Attribute::Date => Some(clock.current_date),
            Attribute::ClockTime => Some(clock.clock_time),
            Attribute::Day => Some(clock.day_of_week() as f64),
            Attribute::Month => Some(clock.month() as f64),
            _ => None,
        }
    }
}
