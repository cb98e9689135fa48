use crate::ast::Location;
use crate::config::NavigationConfig;
use crate::graph::{BlockId, ConnectionType, Workspace};
use crate::toolbox::Flyout;

/// The user's current position in the workspace.
///
/// Moves that have no destination leave the cursor where it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cursor {
    location: Option<Location>,
    visible: bool,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// Moves the cursor and shows it at the new location (or hides it when
    /// `location` is `None`).
    pub fn set_location(&mut self, location: Option<Location>) {
        self.location = location;
        self.visible = location.is_some();
    }

    /// Hides the cursor without forgetting where it is.
    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    fn go(&mut self, destination: Option<Location>) -> bool {
        match destination {
            Some(location) => {
                self.set_location(Some(location));
                true
            }
            None => false,
        }
    }

    pub fn next(&mut self, workspace: &Workspace, config: &NavigationConfig) -> bool {
        let destination = self.location.and_then(|l| l.next(workspace, config));
        self.go(destination)
    }

    pub fn prev(&mut self, workspace: &Workspace, config: &NavigationConfig) -> bool {
        let destination = self.location.and_then(|l| l.prev(workspace, config));
        self.go(destination)
    }

    /// Steps into the current element. From a block's previous or output
    /// connection the step starts at the block itself.
    pub fn step_in(&mut self, workspace: &Workspace, config: &NavigationConfig) -> bool {
        let Some(mut current) = self.location else {
            return false;
        };
        if let Location::Connection {
            id,
            role: ConnectionType::Previous | ConnectionType::Output,
        } = current
        {
            match workspace.source_block(id) {
                Some(block) => current = Location::Block(block),
                None => return false,
            }
        }
        let destination = current.step_in(workspace, config);
        self.go(destination)
    }

    /// Steps out of the current element. Landing on a block moves on to its
    /// top connection when it has one.
    pub fn step_out(&mut self, workspace: &Workspace, config: &NavigationConfig) -> bool {
        let destination = self
            .location
            .and_then(|l| l.step_out(workspace, config))
            .map(|l| match l {
                Location::Block(block) => Location::top_of(workspace, block).unwrap_or(l),
                other => other,
            });
        self.go(destination)
    }
}

/// The anchor an insert attaches to.
///
/// Any location can be stored; whether it is a usable anchor is decided when
/// an insert runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Marker {
    location: Option<Location>,
    visible: bool,
}

impl Marker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    pub fn set_location(&mut self, location: Option<Location>) {
        self.location = location;
        self.visible = location.is_some();
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// The highlighted template in the flyout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlyoutCursor {
    block: Option<BlockId>,
}

impl FlyoutCursor {
    pub fn block(&self) -> Option<BlockId> {
        self.block
    }

    pub fn set_block(&mut self, block: Option<BlockId>) {
        self.block = block;
    }

    pub fn clear(&mut self) {
        self.block = None;
    }

    fn step(&mut self, flyout: &Flyout, forward: bool) -> bool {
        match self.block.and_then(|b| flyout.neighbour(b, forward)) {
            Some(block) => {
                self.block = Some(block);
                true
            }
            None => false,
        }
    }

    /// Highlights the next template; stays on the last one.
    pub fn next(&mut self, flyout: &Flyout) -> bool {
        self.step(flyout, true)
    }

    /// Highlights the previous template; stays on the first one.
    pub fn prev(&mut self, flyout: &Flyout) -> bool {
        self.step(flyout, false)
    }
}
