//! Joining, inserting and detaching blocks from keyboard locations.
//!
//! Every operation validates before it mutates. A failed operation leaves
//! the graph untouched and is reported through the logger.

use super::Navigator;
use crate::ast::{Location, LocationKind};
use crate::definition::InputDefinition;
use crate::error::NavigationError;
use crate::graph::{BlockId, ConnectionId, ConnectionType, Coordinate, Workspace};

type Result<T> = std::result::Result<T, NavigationError>;

impl Navigator {
    /// Attaches whatever the cursor is on to the marked location.
    ///
    /// On success the cursor moves to the top of the moved block and the
    /// marker is removed. Failures are reported and change nothing.
    pub fn modify(&mut self) -> bool {
        match self.modify_with(self.marker.location(), self.cursor.location()) {
            Ok(block) => {
                self.finish_modify(block);
                true
            }
            Err(error) => {
                self.logger.report(&error);
                false
            }
        }
    }

    fn finish_modify(&mut self, block: BlockId) {
        let top = Location::top_of(&self.workspace, block);
        self.set_cursor_location(top);
        self.remove_mark();
    }

    /// Attaches `cursor` to `marker` and returns the block that moved.
    pub fn modify_with(
        &mut self,
        marker: Option<Location>,
        cursor: Option<Location>,
    ) -> Result<BlockId> {
        let marker = marker.ok_or(NavigationError::NoMarker)?;
        let cursor = cursor.ok_or(NavigationError::NoCursor)?;

        match marker {
            Location::Field(_) | Location::Block(_) | Location::Stack(_) => {
                return Err(NavigationError::InvalidAnchor(marker.kind()));
            }
            Location::Connection { .. } | Location::Workspace { .. } => {}
        }
        match cursor {
            Location::Field(_) => return Err(NavigationError::FieldCannotMove),
            Location::Workspace { .. } => return Err(NavigationError::WorkspaceCannotMove),
            _ => {}
        }
        if let Location::Workspace { workspace, .. } = marker {
            if workspace != self.workspace.id() {
                return Err(NavigationError::DifferentWorkspaces);
            }
        }
        for location in [marker, cursor] {
            if !location.is_valid(&self.workspace) {
                return Err(NavigationError::StaleLocation(location.kind()));
            }
        }

        match (marker, cursor) {
            (Location::Connection { id: dest, .. }, Location::Connection { id: moving, .. }) => {
                self.connect(moving, dest)
            }
            (
                Location::Connection { id: dest, .. },
                Location::Block(block) | Location::Stack(block),
            ) => self.insert_block(block, dest),
            (Location::Workspace { at, .. }, _) => self.move_block_to_workspace(cursor, at),
            _ => Err(NavigationError::InvalidAnchor(marker.kind())),
        }
    }

    /// Drops the block under `cursor` at a free point of the workspace,
    /// detaching it from its parent first.
    fn move_block_to_workspace(&mut self, cursor: Location, at: Coordinate) -> Result<BlockId> {
        if let Location::Connection { role, .. } = cursor {
            if matches!(role, ConnectionType::Input | ConnectionType::Next) {
                return Err(NavigationError::ConnectionToWorkspace(role));
            }
        }
        let block = cursor
            .source_block(&self.workspace)
            .ok_or(NavigationError::StaleLocation(cursor.kind()))?;
        if self.workspace.is_shadow(block) {
            return Err(NavigationError::ShadowToWorkspace);
        }
        if self.workspace.parent(block).is_some() {
            self.workspace.unplug(block)?;
        }
        self.workspace.move_to(block, at)?;
        tracing::debug!(%block, %at, "moved block to workspace");
        Ok(block)
    }

    /// Joins two connections, trying the other connection of each block
    /// when the given pair does not fit. Returns the moving block.
    pub fn connect(&mut self, moving: ConnectionId, dest: ConnectionId) -> Result<BlockId> {
        let moving_block = self
            .workspace
            .source_block(moving)
            .ok_or(NavigationError::StaleLocation(LocationKind::Connection))?;
        self.ensure_movable(moving_block)?;

        let candidates = [
            (
                inferior_connection(&self.workspace, moving),
                superior_connection(&self.workspace, dest),
            ),
            (
                superior_connection(&self.workspace, moving),
                inferior_connection(&self.workspace, dest),
            ),
            (Some(moving), Some(dest)),
        ];
        for (a, b) in candidates {
            if let (Some(a), Some(b)) = (a, b) {
                if self.move_and_connect(a, b)? {
                    return Ok(moving_block);
                }
            }
        }

        match self.workspace.can_connect(dest, moving) {
            Err(reason) => Err(NavigationError::ConnectionFailed(reason)),
            Ok(()) => Err(NavigationError::CannotInsert(moving_block)),
        }
    }

    /// A shadow stays in the input it fills.
    fn ensure_movable(&self, block: BlockId) -> Result<()> {
        if self.workspace.is_shadow(block) && self.workspace.parent(block).is_some() {
            return Err(NavigationError::ShadowMove);
        }
        Ok(())
    }

    /// Joins `moving` to `dest` if they are compatible. Returns `false`
    /// without touching the graph otherwise.
    fn move_and_connect(&mut self, moving: ConnectionId, dest: ConnectionId) -> Result<bool> {
        if self.workspace.can_connect(moving, dest).is_err() {
            return Ok(false);
        }
        let (Some(moving_block), Some(dest_block)) = (
            self.workspace.source_block(moving),
            self.workspace.source_block(dest),
        ) else {
            return Ok(false);
        };

        self.disconnect_child(moving_block, dest_block)?;
        let dest_is_superior = self
            .workspace
            .connection(dest)
            .is_some_and(|c| c.is_superior());
        if !dest_is_superior {
            self.workspace.position_near_connection(moving, dest)?;
        }
        self.workspace.connect(dest, moving)?;
        tracing::debug!(%moving, %dest, "connected");
        Ok(true)
    }

    /// When both blocks hang in the same tree, cuts the descendant one loose
    /// so the new join cannot close a cycle.
    fn disconnect_child(&mut self, moving_block: BlockId, dest_block: BlockId) -> Result<()> {
        if self.workspace.root(moving_block) != self.workspace.root(dest_block) {
            return Ok(());
        }
        let descendant = if self.workspace.descendants(moving_block).contains(&dest_block) {
            dest_block
        } else if self.workspace.descendants(dest_block).contains(&moving_block) {
            moving_block
        } else {
            return Ok(());
        };
        if self.workspace.parent(descendant).is_some() {
            self.workspace.unplug(descendant)?;
        }
        Ok(())
    }

    /// Attaches a whole block to `dest`, picking the block's connection
    /// that fits the destination's wire type.
    pub fn insert_block(&mut self, block: BlockId, dest: ConnectionId) -> Result<BlockId> {
        let dest_kind = self
            .workspace
            .connection(dest)
            .ok_or(NavigationError::StaleLocation(LocationKind::Connection))?
            .kind();
        self.ensure_movable(block)?;
        let b = self
            .workspace
            .block(block)
            .ok_or(NavigationError::StaleLocation(LocationKind::Block))?;

        let offered: Vec<ConnectionId> = match dest_kind {
            ConnectionType::Previous => b.next_connection().into_iter().collect(),
            ConnectionType::Next => b.previous_connection().into_iter().collect(),
            ConnectionType::Input => b.output_connection().into_iter().collect(),
            ConnectionType::Output => b
                .inputs()
                .iter()
                .filter_map(|i| i.connection())
                .filter(|c| {
                    self.workspace
                        .connection(*c)
                        .is_some_and(|c| c.kind() == ConnectionType::Input)
                })
                .collect(),
        };

        for connection in offered {
            if self.connect(connection, dest).is_ok() {
                return Ok(block);
            }
        }
        Err(NavigationError::CannotInsert(block))
    }

    /// Splits the join under the cursor. The child side is nudged away, the
    /// parent tree raised to the front and the cursor left on the freed
    /// parent connection.
    pub fn disconnect_blocks(&mut self) -> bool {
        match self.try_disconnect_blocks() {
            Ok(()) => true,
            Err(error) => {
                self.logger.report(&error);
                false
            }
        }
    }

    fn try_disconnect_blocks(&mut self) -> Result<()> {
        let Some(Location::Connection { id, .. }) = self.cursor.location() else {
            return Err(NavigationError::NotOnConnection);
        };
        let connection = self
            .workspace
            .connection(id)
            .ok_or(NavigationError::NotOnConnection)?;
        let target = connection.target().ok_or(NavigationError::NotConnected)?;
        let (superior, inferior) = if connection.is_superior() {
            (id, target)
        } else {
            (target, id)
        };

        let inferior_block = self
            .workspace
            .source_block(inferior)
            .ok_or(NavigationError::NotConnected)?;
        if self.workspace.is_shadow(inferior_block) {
            return Err(NavigationError::ShadowDisconnect);
        }

        self.workspace.disconnect(superior)?;
        self.workspace.bump_away_from(inferior, superior);
        if let Some(parent) = self.workspace.source_block(superior) {
            self.workspace.bring_to_front(parent);
        }
        let location = Location::for_connection(&self.workspace, superior);
        self.set_cursor_location(location);
        Ok(())
    }

    /// Deletes a block with its subtree, first moving the cursor and marker
    /// off anything that is about to disappear.
    pub fn delete_block(&mut self, block: BlockId) -> Result<()> {
        self.workspace
            .block(block)
            .ok_or(NavigationError::StaleLocation(LocationKind::Block))?;
        self.move_cursor_on_block_delete(block);
        self.workspace.delete_block(block)?;
        Ok(())
    }

    /// Relocates the cursor and marker ahead of deleting `deleted`.
    ///
    /// A pointer on the deleted block moves to the connection it hung from,
    /// or to its position when it was a top block. A pointer on any block
    /// inside the deleted subtree moves to that block's position.
    pub fn move_cursor_on_block_delete(&mut self, deleted: BlockId) {
        if let Some(to) = relocate_on_delete(&self.workspace, self.cursor.location(), deleted) {
            self.set_cursor_location(Some(to));
        }
        if let Some(to) = relocate_on_delete(&self.workspace, self.marker.location(), deleted) {
            self.set_marker_location(Some(to));
        }
    }

    /// Reshapes a block, keeping the cursor and marker valid.
    pub fn mutate_block(&mut self, block: BlockId, inputs: &[InputDefinition]) -> Result<()> {
        self.workspace
            .block(block)
            .ok_or(NavigationError::StaleLocation(LocationKind::Block))?;
        self.move_cursor_on_block_mutation(block);
        self.workspace.set_inputs(block, inputs)?;
        if self
            .marker
            .location()
            .is_some_and(|l| !l.is_valid(&self.workspace))
        {
            self.remove_mark();
        }
        Ok(())
    }

    /// Lifts the cursor to the block level when it sits on a field or
    /// connection of `mutated`.
    pub fn move_cursor_on_block_mutation(&mut self, mutated: BlockId) {
        let Some(location) = self.cursor.location() else {
            return;
        };
        let inside = matches!(location, Location::Field(_) | Location::Connection { .. })
            && location.source_block(&self.workspace) == Some(mutated);
        if inside {
            self.set_cursor_location(Some(Location::Block(mutated)));
        }
    }

    /// Copies the highlighted flyout template into the workspace and
    /// attaches it at the marker.
    ///
    /// On success focus returns to the workspace with the cursor on the new
    /// block. On failure the copy is removed and focus stays in the flyout.
    pub fn insert_from_flyout(&mut self) -> bool {
        match self.try_insert_from_flyout() {
            Ok(block) => {
                self.focus_workspace();
                self.finish_modify(block);
                true
            }
            Err(error) => {
                self.logger.report(&error);
                false
            }
        }
    }

    fn try_insert_from_flyout(&mut self) -> Result<BlockId> {
        let template = self
            .flyout_cursor
            .block()
            .ok_or(NavigationError::NoFlyoutSelection)?;
        let flyout = self.flyout.as_ref().ok_or(NavigationError::NoFlyoutSelection)?;
        let block = flyout.create_block(template, &mut self.workspace)?;

        match self.modify_with(self.marker.location(), Some(Location::Block(block))) {
            Ok(moved) => Ok(moved),
            Err(error) => {
                self.workspace.delete_block(block)?;
                Err(NavigationError::FlyoutInsert(Box::new(error)))
            }
        }
    }
}

/// The child-side connection of a connection's block: the connection itself
/// when it is inferior, else the block's previous or output connection.
pub fn inferior_connection(
    workspace: &Workspace,
    connection: ConnectionId,
) -> Option<ConnectionId> {
    let c = workspace.connection(connection)?;
    if !c.is_superior() {
        return Some(connection);
    }
    let block = workspace.block(c.source_block())?;
    block.previous_connection().or(block.output_connection())
}

/// The parent-side connection: the connection itself when it is superior,
/// else whatever it is joined to.
pub fn superior_connection(
    workspace: &Workspace,
    connection: ConnectionId,
) -> Option<ConnectionId> {
    let c = workspace.connection(connection)?;
    if c.is_superior() {
        Some(connection)
    } else {
        c.target()
    }
}

fn relocate_on_delete(
    workspace: &Workspace,
    location: Option<Location>,
    deleted: BlockId,
) -> Option<Location> {
    let current = location?.source_block(workspace)?;
    if current == deleted {
        let block = workspace.block(deleted)?;
        let attachment = block
            .top_connection()
            .and_then(|c| workspace.target(c))
            .filter(|_| block.parent().is_some());
        return match attachment {
            Some(target) => Location::for_connection(workspace, target),
            None => Some(Location::on_workspace(workspace, block.position())),
        };
    }
    if workspace.descendants(deleted).contains(&current) {
        let position = workspace.block(current)?.position();
        return Some(Location::on_workspace(workspace, position));
    }
    None
}
