//! Declarative descriptions of block types and toolbox contents, loadable
//! from JSON.

mod block;
mod toolbox;

pub use block::*;
pub use toolbox::*;
