//! # Kumiki - Keyboard Navigation for Block Editors
//!
//! **Kumiki** drives a block-based visual programming editor from the
//! keyboard. It models the program as a graph of blocks joined through
//! typed connection points, lets a cursor walk that graph one structural
//! step at a time, and resolves "attach this here" requests between two
//! arbitrary locations into a concrete, type-checked join.
//!
//! ## Core Workflow
//!
//! 1.  **Declare Block Types**: Describe each block's connections, inputs and
//!     fields with a [`definition::BlockDefinition`], in code or from JSON.
//! 2.  **Build a Workspace**: Register the definitions on a
//!     [`graph::Workspace`] and create blocks.
//! 3.  **Start a Session**: Wrap the workspace in a [`navigation::Navigator`]
//!     with `Navigator::builder`, optionally adding a toolbox, a flyout, a
//!     key map and a logging callback.
//! 4.  **Feed Input**: Pass key presses to `on_key_press` (or actions to
//!     `on_action`). The navigator moves the cursor, switches focus between
//!     workspace, toolbox and flyout, and edits the graph. Failed requests
//!     are reported through the logger and leave everything unchanged.
//!
//! ## Quick Start
//!
//! ```rust
//! use kumiki::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let statement = BlockDefinition::new("statement")
//!         .with_previous(None)
//!         .with_next(None);
//!     let workspace = Workspace::builder().with_block_type(statement).build();
//!     let mut navigator = Navigator::builder(workspace).build();
//!
//!     let first = navigator
//!         .workspace_mut()
//!         .new_block_at("statement", Coordinate::new(0.0, 0.0))?;
//!     let second = navigator
//!         .workspace_mut()
//!         .new_block_at("statement", Coordinate::new(200.0, 0.0))?;
//!
//!     // Turning keyboard navigation on puts the cursor on the first stack.
//!     navigator.on_action(Action::ToggleKeyboardNav);
//!
//!     // Mark the bottom of the first block...
//!     let next = navigator
//!         .workspace()
//!         .block(first)
//!         .and_then(|b| b.next_connection())
//!         .ok_or("block has no next connection")?;
//!     let location = Location::for_connection(navigator.workspace(), next);
//!     navigator.set_cursor_location(location);
//!     navigator.on_action(Action::Mark);
//!
//!     // ...then insert the second stack there.
//!     navigator.set_cursor_location(Some(Location::Stack(second)));
//!     navigator.on_action(Action::Insert);
//!
//!     assert_eq!(navigator.workspace().parent(second), Some(first));
//!     println!("{}", DisplayWorkspace { workspace: navigator.workspace(), cursor: Some(second) });
//!     Ok(())
//! }
//! ```

pub mod ast;
pub mod config;
pub mod definition;
pub mod error;
pub mod graph;
pub mod log;
pub mod navigation;
pub mod prelude;
pub mod toolbox;
