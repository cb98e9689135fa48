use super::{BlockId, ConnectionId, Coordinate};

/// A change to the graph, recorded for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphEvent {
    Created {
        block: BlockId,
    },
    Deleted {
        block: BlockId,
    },
    Connected {
        parent: ConnectionId,
        child: ConnectionId,
    },
    Disconnected {
        parent: ConnectionId,
        child: ConnectionId,
    },
    Moved {
        block: BlockId,
        from: Coordinate,
        to: Coordinate,
    },
    BroughtToFront {
        block: BlockId,
    },
    /// The block's inputs were replaced.
    Mutated {
        block: BlockId,
    },
}
