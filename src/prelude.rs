//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the kumiki crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use kumiki::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let definitions = BlockDefinition::list_from_json(&std::fs::read_to_string("blocks.json")?)?;
//! let toolbox = ToolboxDefinition::from_json(&std::fs::read_to_string("toolbox.json")?)?;
//!
//! let workspace = Workspace::builder().with_definitions(definitions).build();
//! toolbox.validate(&workspace)?;
//!
//! let mut navigator = Navigator::builder(workspace)
//!     .with_toolbox(Toolbox::from_definition(&toolbox)?)
//!     .build();
//! navigator.on_key_press(&KeyEvent::new("KeyK").with_shift().with_ctrl());
//! # Ok(())
//! # }
//! ```

// Graph
pub use crate::graph::{
    Block, BlockId, ConnectionChecker, ConnectionId, ConnectionType, Coordinate,
    DefaultConnectionChecker, FieldId, InputKind, Workspace, WorkspaceId,
};

// Locations
pub use crate::ast::{DisplayLocation, DisplayWorkspace, Location, LocationKind};

// Definitions and configuration
pub use crate::config::NavigationConfig;
pub use crate::definition::{BlockDefinition, InputDefinition, ToolboxDefinition};

// Navigation session
pub use crate::navigation::{
    Action, Cursor, FieldHandler, FocusState, KeyEvent, KeyMap, Marker, Navigator,
};
pub use crate::toolbox::{Category, Flyout, Toolbox};

// Diagnostics
pub use crate::error::{ConnectionError, DefinitionError, GraphError, NavigationError};
pub use crate::log::{LogLevel, Logger};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
