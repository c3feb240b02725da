//! Object references: the `(kind, index)` pairs premises and actions target.

#[cfg(test)]
use strum_macros::EnumIter;

/// The kind of network object a premise or action clause refers to (§3).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(EnumIter))]
pub enum ObjectKind {
    Node,
    Link,
    Conduit,
    Pump,
    Orifice,
    Weir,
    Outlet,
    Simulation,
    Stack,
}

impl ObjectKind {
    /// Matches a keyword case-insensitively against the object keyword table
    /// (`NODE`, `LINK`, `CONDUIT`, `PUMP`, `ORIFICE`, `WEIR`, `OUTLET`,
    /// `SIMULATION`, `STACK`).
    pub fn from_keyword(word: &str) -> Option<Self> {
        Some(match word.to_ascii_uppercase().as_str() {
            "NODE" => ObjectKind::Node,
            "LINK" => ObjectKind::Link,
            "CONDUIT" => ObjectKind::Conduit,
            "PUMP" => ObjectKind::Pump,
            "ORIFICE" => ObjectKind::Orifice,
            "WEIR" => ObjectKind::Weir,
            "OUTLET" => ObjectKind::Outlet,
            "SIMULATION" => ObjectKind::Simulation,
            "STACK" => ObjectKind::Stack,
            _ => return None,
        })
    }

    /// True for the "link-family" kinds: a generic `LINK` clause plus each
    /// specific underlying link type.
    pub fn is_link_family(self) -> bool {
        matches!(
            self,
            ObjectKind::Link
                | ObjectKind::Conduit
                | ObjectKind::Pump
                | ObjectKind::Orifice
                | ObjectKind::Weir
                | ObjectKind::Outlet
        )
    }

    /// True when a name token is expected after this keyword. `SIMULATION`
    /// and `STACK` clauses never carry a name (§4.4).
    pub fn has_name(self) -> bool {
        !matches!(self, ObjectKind::Simulation | ObjectKind::Stack)
    }
}

/// The underlying type of a link in network state, used to validate that an
/// action's `<link-kind>` keyword matches the object actually found by name
/// (e.g. an `ORIFICE` clause naming a pipe is a semantic error).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LinkKind {
    Conduit,
    Pump,
    Orifice,
    Weir,
    Outlet,
}

impl LinkKind {
    /// Whether `kind` (as written in rule text) is consistent with this
    /// link's actual underlying type. A generic `LINK` clause matches any
    /// link kind.
    pub fn matches(self, kind: ObjectKind) -> bool {
        match kind {
            ObjectKind::Link => true,
            ObjectKind::Conduit => self == LinkKind::Conduit,
            ObjectKind::Pump => self == LinkKind::Pump,
            ObjectKind::Orifice => self == LinkKind::Orifice,
            ObjectKind::Weir => self == LinkKind::Weir,
            ObjectKind::Outlet => self == LinkKind::Outlet,
            _ => false,
        }
    }
}

/// A resolved reference to a network object, node, link, or the pseudo
/// objects `Simulation`/`Stack` that carry no index.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub kind: ObjectKind,
    /// `None` for `Simulation`/`Stack`; `Some(index)` otherwise. Index is
    /// 0-based into the host's node/link arrays.
    pub index: Option<usize>,
}

impl ObjectRef {
    pub fn node(index: usize) -> Self {
        ObjectRef {
            kind: ObjectKind::Node,
            index: Some(index),
        }
    }

    pub fn link(kind: ObjectKind, index: usize) -> Self {
        debug_assert!(kind.is_link_family());
        ObjectRef {
            kind,
            index: Some(index),
        }
    }

    pub fn simulation() -> Self {
        ObjectRef {
            kind: ObjectKind::Simulation,
            index: None,
        }
    }

    pub fn stack() -> Self {
        ObjectRef {
            kind: ObjectKind::Stack,
            index: None,
        }
    }

    pub fn is_node(&self) -> bool {
        self.kind == ObjectKind::Node
    }

    pub fn is_link(&self) -> bool {
        self.kind.is_link_family()
    }
}
