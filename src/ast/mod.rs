//! The location model: typed pointers into a [`Workspace`](crate::graph::Workspace)
//! and the structural moves between them.

mod display;
mod location;
mod traversal;

pub use display::{DisplayLocation, DisplayWorkspace};
pub use location::{Location, LocationKind};
