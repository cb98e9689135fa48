use super::{BlockId, ConnectionId, Coordinate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The wire type of a connection point.
///
/// `Next` and `Input` are the superior (parent-side) sockets; `Previous` and
/// `Output` are the inferior (child-side) plugs. A statement input is a `Next`
/// connection that hangs off an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    Previous,
    Next,
    Input,
    Output,
}

impl ConnectionType {
    pub fn is_superior(self) -> bool {
        matches!(self, ConnectionType::Next | ConnectionType::Input)
    }

    /// The only wire type this one can be joined to.
    pub fn opposite(self) -> ConnectionType {
        match self {
            ConnectionType::Previous => ConnectionType::Next,
            ConnectionType::Next => ConnectionType::Previous,
            ConnectionType::Input => ConnectionType::Output,
            ConnectionType::Output => ConnectionType::Input,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionType::Previous => "previous",
            ConnectionType::Next => "next",
            ConnectionType::Input => "input",
            ConnectionType::Output => "output",
        }
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A connection point owned by exactly one block.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub(crate) id: ConnectionId,
    pub(crate) block: BlockId,
    pub(crate) kind: ConnectionType,
    pub(crate) input: Option<usize>,
    pub(crate) check: Option<Vec<String>>,
    pub(crate) target: Option<ConnectionId>,
    pub(crate) offset: Coordinate,
}

impl Connection {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// The block this connection belongs to.
    pub fn source_block(&self) -> BlockId {
        self.block
    }

    pub fn kind(&self) -> ConnectionType {
        self.kind
    }

    /// Index of the input this connection belongs to, if any.
    pub fn parent_input(&self) -> Option<usize> {
        self.input
    }

    pub fn check(&self) -> Option<&[String]> {
        self.check.as_deref()
    }

    pub fn target(&self) -> Option<ConnectionId> {
        self.target
    }

    pub fn offset(&self) -> Coordinate {
        self.offset
    }

    pub fn is_connected(&self) -> bool {
        self.target.is_some()
    }

    pub fn is_superior(&self) -> bool {
        self.kind.is_superior()
    }
}
