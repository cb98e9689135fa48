use crate::ast::LocationKind;
use crate::graph::{BlockId, ConnectionId, ConnectionType, FieldId};
use crate::log::LogLevel;
use thiserror::Error;

/// Why two connections cannot be joined.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("Target connection {0} does not exist")]
    TargetMissing(ConnectionId),

    #[error("Attempted to connect a block to itself")]
    SelfConnection,

    #[error("Attempt to connect incompatible types: a {from} connection cannot join a {to} connection")]
    WrongType {
        from: ConnectionType,
        to: ConnectionType,
    },

    #[error("Connection checks failed: {superior:?} does not accept {inferior:?}")]
    ChecksFailed {
        superior: Vec<String>,
        inferior: Vec<String>,
    },

    #[error("Connecting non-shadow to shadow block")]
    ShadowParent,

    #[error("Block {0} is already below block {1}; joining them would close a loop")]
    WouldCreateCycle(BlockId, BlockId),
}

/// Errors raised by the connection graph itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Block {0} does not exist")]
    BlockNotFound(BlockId),

    #[error("Connection {0} does not exist")]
    ConnectionNotFound(ConnectionId),

    #[error("Field {0} does not exist")]
    FieldNotFound(FieldId),

    #[error("Connection {0} is not connected")]
    NotConnected(ConnectionId),

    #[error("Block type '{0}' is not registered")]
    UnknownBlockType(String),

    #[error(transparent)]
    Incompatible(#[from] ConnectionError),
}

/// A keyboard action that could not be carried out.
///
/// None of these are fatal: the action becomes a no-op and the error is
/// reported through the logger at [`NavigationError::level`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NavigationError {
    #[error("Cannot insert with no marked node")]
    NoMarker,

    #[error("Cannot insert with no cursor node")]
    NoCursor,

    #[error("Cannot attach a field to anything else")]
    FieldCannotMove,

    #[error("Cannot move the workspace")]
    WorkspaceCannotMove,

    #[error("Cannot attach anything to a {0}")]
    InvalidAnchor(LocationKind),

    #[error("Cannot move a block by its {0} connection to the workspace")]
    ConnectionToWorkspace(ConnectionType),

    #[error("Cannot move a shadow block to the workspace")]
    ShadowToWorkspace,

    #[error("Cannot move a shadow block out of its parent")]
    ShadowMove,

    #[error("Marker and cursor are on different workspaces")]
    DifferentWorkspaces,

    #[error("Block {0} cannot be inserted at the marked location")]
    CannotInsert(BlockId),

    #[error("Connection failed with error: {0}")]
    ConnectionFailed(#[from] ConnectionError),

    #[error("Cannot disconnect blocks when the cursor is not on a connection")]
    NotOnConnection,

    #[error("Cannot disconnect unconnected connection")]
    NotConnected,

    #[error("Cannot disconnect a shadow block")]
    ShadowDisconnect,

    #[error("Cannot mark a {0}")]
    CannotMark(LocationKind),

    #[error("No block is selected in the flyout")]
    NoFlyoutSelection,

    #[error("Something went wrong while inserting a block from the flyout: {0}")]
    FlyoutInsert(Box<NavigationError>),

    #[error("{0} is not a valid location for this operation")]
    StaleLocation(LocationKind),

    #[error("Unknown action '{0}'")]
    UnknownAction(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl NavigationError {
    /// The severity this error is reported at.
    pub fn level(&self) -> LogLevel {
        match self {
            NavigationError::NotOnConnection
            | NavigationError::NotConnected
            | NavigationError::ShadowDisconnect => LogLevel::Log,
            NavigationError::Graph(_) => LogLevel::Error,
            _ => LogLevel::Warn,
        }
    }
}

/// Errors raised while loading block, toolbox or configuration definitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("Failed to parse definition JSON: {0}")]
    JsonParseError(String),

    #[error("Category '{category}' refers to unregistered block type '{type_name}'")]
    UnknownBlockType { category: String, type_name: String },

    #[error("A {expected} toolbox was expected, found a {found} toolbox")]
    WrongToolboxKind {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Blocks must be placed inside a category in a category toolbox (found '{0}')")]
    UncategorizedBlock(String),
}
