use super::FocusState;
use crate::ast::Location;
use crate::graph::BlockId;

/// A change to the navigation session, recorded for the presentation layer
/// so it can redraw cursor, marker and highlight visuals.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationEvent {
    CursorMoved {
        from: Option<Location>,
        to: Option<Location>,
    },
    MarkerMoved {
        to: Option<Location>,
    },
    FocusChanged {
        from: FocusState,
        to: FocusState,
    },
    FlyoutSelectionChanged {
        block: Option<BlockId>,
    },
    ToolboxSelectionChanged {
        path: Option<Vec<usize>>,
    },
    KeyboardAccessibilityChanged {
        enabled: bool,
    },
}
