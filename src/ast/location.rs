use crate::graph::{
    BlockId, ConnectionId, ConnectionType, Coordinate, FieldId, Workspace, WorkspaceId,
};
use std::fmt;

/// A typed pointer into the program graph.
///
/// Locations hold ids, not references, so they stay cheap to copy but can go
/// stale when the element they name is deleted; see [`Location::is_valid`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Location {
    /// An editable value on a block.
    Field(FieldId),
    /// A whole block.
    Block(BlockId),
    /// A connection point. `role` is `Input` for connections that hang off
    /// an input (value or statement), and the wire type otherwise.
    Connection {
        id: ConnectionId,
        role: ConnectionType,
    },
    /// A top-level chain, named by its first block.
    Stack(BlockId),
    /// A free point on a workspace.
    Workspace {
        workspace: WorkspaceId,
        at: Coordinate,
    },
}

/// The five kinds of [`Location`], without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationKind {
    Field,
    Block,
    Connection,
    Stack,
    Workspace,
}

impl LocationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationKind::Field => "field",
            LocationKind::Block => "block",
            LocationKind::Connection => "connection",
            LocationKind::Stack => "stack",
            LocationKind::Workspace => "workspace",
        }
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Location {
    // --- Constructors ---

    /// A connection location, or `None` if the connection does not exist.
    pub fn for_connection(workspace: &Workspace, id: ConnectionId) -> Option<Location> {
        let connection = workspace.connection(id)?;
        let role = if connection.parent_input().is_some() {
            ConnectionType::Input
        } else {
            connection.kind()
        };
        Some(Location::Connection { id, role })
    }

    /// The connection location of a block's input row, if the row has one.
    pub fn for_input(workspace: &Workspace, block: BlockId, index: usize) -> Option<Location> {
        let connection = workspace.block(block)?.inputs().get(index)?.connection()?;
        Location::for_connection(workspace, connection)
    }

    pub fn for_field(workspace: &Workspace, id: FieldId) -> Option<Location> {
        workspace.field(id).map(|_| Location::Field(id))
    }

    pub fn for_block(workspace: &Workspace, id: BlockId) -> Option<Location> {
        workspace.contains_block(id).then_some(Location::Block(id))
    }

    /// A stack location. Only blocks without a parent start a stack.
    pub fn for_stack(workspace: &Workspace, id: BlockId) -> Option<Location> {
        let block = workspace.block(id)?;
        block.parent().is_none().then_some(Location::Stack(id))
    }

    pub fn on_workspace(workspace: &Workspace, at: Coordinate) -> Location {
        Location::Workspace {
            workspace: workspace.id(),
            at,
        }
    }

    /// The topmost location of a block: its previous or output connection,
    /// or the block itself when it has neither.
    pub fn top_of(workspace: &Workspace, block: BlockId) -> Option<Location> {
        match workspace.block(block)?.top_connection() {
            Some(top) => Location::for_connection(workspace, top),
            None => Some(Location::Block(block)),
        }
    }

    // --- Inspection ---

    pub fn kind(&self) -> LocationKind {
        match self {
            Location::Field(_) => LocationKind::Field,
            Location::Block(_) => LocationKind::Block,
            Location::Connection { .. } => LocationKind::Connection,
            Location::Stack(_) => LocationKind::Stack,
            Location::Workspace { .. } => LocationKind::Workspace,
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, Location::Connection { .. })
    }

    pub fn connection_id(&self) -> Option<ConnectionId> {
        match self {
            Location::Connection { id, .. } => Some(*id),
            _ => None,
        }
    }

    pub fn role(&self) -> Option<ConnectionType> {
        match self {
            Location::Connection { role, .. } => Some(*role),
            _ => None,
        }
    }

    /// The block this location belongs to. Workspace points have none.
    pub fn source_block(&self, workspace: &Workspace) -> Option<BlockId> {
        match self {
            Location::Field(id) => workspace.field(*id).map(|f| f.source_block()),
            Location::Block(id) | Location::Stack(id) => {
                workspace.contains_block(*id).then_some(*id)
            }
            Location::Connection { id, .. } => workspace.source_block(*id),
            Location::Workspace { .. } => None,
        }
    }

    /// Whether the element this location names still exists in `workspace`
    /// (and, for stacks, still starts a top-level chain).
    pub fn is_valid(&self, workspace: &Workspace) -> bool {
        match self {
            Location::Field(id) => workspace.field(*id).is_some(),
            Location::Block(id) => workspace.contains_block(*id),
            Location::Connection { id, .. } => workspace.connection(*id).is_some(),
            Location::Stack(id) => Location::for_stack(workspace, *id).is_some(),
            Location::Workspace { workspace: ws, .. } => *ws == workspace.id(),
        }
    }
}
