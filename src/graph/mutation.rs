use super::*;
use crate::definition::InputDefinition;

impl Workspace {
    /// Joins two connections.
    ///
    /// The superior side becomes the parent. The inferior side is detached
    /// from any previous parent first, and a block already occupying the
    /// superior side is re-attached below the new child when possible,
    /// deleted when it is a shadow, or bumped away otherwise. Nothing is
    /// mutated when the pair is incompatible or when the parent block
    /// already hangs below the child block.
    pub fn connect(&mut self, a: ConnectionId, b: ConnectionId) -> Result<(), GraphError> {
        self.can_connect(a, b)?;

        let (parent, child) = if self.require_connection(a)?.is_superior() {
            (a, b)
        } else {
            (b, a)
        };
        if self.target(parent) == Some(child) {
            return Ok(());
        }
        let parent_block = self.require_connection(parent)?.block;
        let child_block = self.require_connection(child)?.block;
        if self.descendants(child_block).contains(&parent_block) {
            return Err(ConnectionError::WouldCreateCycle(parent_block, child_block).into());
        }

        if self.target(child).is_some() {
            self.disconnect(child)?;
        }
        let orphan = match self.target_block(parent) {
            Some(orphan) => {
                self.disconnect(parent)?;
                Some(orphan)
            }
            None => None,
        };

        self.link(parent, child);
        self.align_child(parent, child)?;

        if let Some(orphan) = orphan {
            self.reattach_orphan(orphan, parent, child_block)?;
        }
        Ok(())
    }

    fn link(&mut self, parent: ConnectionId, child: ConnectionId) {
        let (Some(parent_block), Some(child_block)) =
            (self.source_block(parent), self.source_block(child))
        else {
            return;
        };
        if let Some(c) = self.connections.get_mut(&parent) {
            c.target = Some(child);
        }
        if let Some(c) = self.connections.get_mut(&child) {
            c.target = Some(parent);
        }
        if let Some(b) = self.blocks.get_mut(&child_block) {
            b.parent = Some(parent_block);
        }
        self.draw_order.retain(|b| *b != child_block);
        self.events.push(GraphEvent::Connected { parent, child });
        tracing::trace!(%parent, %child, "connected");
    }

    /// Moves the child tree so its connection sits on the parent's.
    fn align_child(&mut self, parent: ConnectionId, child: ConnectionId) -> Result<(), GraphError> {
        let (Some(to), Some(from), Some(block)) = (
            self.connection_position(parent),
            self.connection_position(child),
            self.source_block(child),
        ) else {
            return Ok(());
        };
        let delta = to - from;
        if delta == Coordinate::default() {
            return Ok(());
        }
        self.move_by(block, delta.x, delta.y)
    }

    fn reattach_orphan(
        &mut self,
        orphan: BlockId,
        parent: ConnectionId,
        child_block: BlockId,
    ) -> Result<(), GraphError> {
        if self.is_shadow(orphan) {
            return self.delete_block(orphan);
        }

        let orphan_block = self.require_block(orphan)?;
        let slot = match self.require_connection(parent)?.kind {
            ConnectionType::Input => orphan_block.output.and_then(|plug| {
                self.last_connection_in_row(child_block, plug)
                    .map(|slot| (slot, plug))
            }),
            ConnectionType::Next => orphan_block.previous.and_then(|plug| {
                self.last_connection_in_stack(child_block, plug)
                    .map(|slot| (slot, plug))
            }),
            _ => None,
        };

        if let Some((slot, plug)) = slot {
            if self.can_connect(slot, plug).is_ok() {
                return self.connect(slot, plug);
            }
        }
        if let Some(plug) = self.require_block(orphan)?.top_connection() {
            self.bump_away_from(plug, parent);
        }
        Ok(())
    }

    /// Follows the only compatible value input of each block down the row,
    /// returning the first free (or shadow-occupied) one.
    fn last_connection_in_row(&self, start: BlockId, plug: ConnectionId) -> Option<ConnectionId> {
        let mut current = start;
        loop {
            let slot = self.single_connection(current, plug)?;
            match self.target_block(slot) {
                Some(block) if !self.is_shadow(block) => current = block,
                _ => return Some(slot),
            }
        }
    }

    fn single_connection(&self, block: BlockId, plug: ConnectionId) -> Option<ConnectionId> {
        let plug = self.connections.get(&plug)?;
        let candidates: Vec<ConnectionId> = self
            .blocks
            .get(&block)?
            .inputs
            .iter()
            .filter_map(|i| i.connection)
            .filter(|c| {
                self.connections.get(c).is_some_and(|slot| {
                    slot.kind == ConnectionType::Input && self.checker.check_types(slot, plug)
                })
            })
            .collect();
        match candidates.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Walks down the next-chain starting at `start` to its last free next
    /// connection.
    fn last_connection_in_stack(&self, start: BlockId, plug: ConnectionId) -> Option<ConnectionId> {
        let plug = self.connections.get(&plug)?;
        let mut current = start;
        loop {
            let next = self.blocks.get(&current)?.next?;
            match self.target_block(next) {
                Some(block) if !self.is_shadow(block) => current = block,
                _ => {
                    let slot = self.connections.get(&next)?;
                    return self.checker.check_types(slot, plug).then_some(next);
                }
            }
        }
    }

    /// Severs the join at `connection`. The child subtree becomes a top
    /// block and keeps its position.
    pub fn disconnect(&mut self, connection: ConnectionId) -> Result<(), GraphError> {
        let c = self.require_connection(connection)?;
        let target = c.target.ok_or(GraphError::NotConnected(connection))?;
        let (parent, child) = if c.is_superior() {
            (connection, target)
        } else {
            (target, connection)
        };

        for id in [parent, child] {
            if let Some(c) = self.connections.get_mut(&id) {
                c.target = None;
            }
        }
        let child_block = self.require_connection(child)?.block;
        if let Some(b) = self.blocks.get_mut(&child_block) {
            b.parent = None;
        }
        self.draw_order.push(child_block);
        self.events.push(GraphEvent::Disconnected { parent, child });
        tracing::trace!(%parent, %child, "disconnected");
        Ok(())
    }

    /// Detaches a block (with everything below it) from its parent.
    pub fn unplug(&mut self, block: BlockId) -> Result<(), GraphError> {
        let b = self.require_block(block)?;
        if b.parent.is_none() {
            return Ok(());
        }
        match b.top_connection() {
            Some(top) => self.disconnect(top),
            None => Ok(()),
        }
    }

    pub fn move_by(&mut self, block: BlockId, dx: f64, dy: f64) -> Result<(), GraphError> {
        self.require_block(block)?;
        self.translate_tree(block, dx, dy);
        Ok(())
    }

    /// Shifts a block and its subtree. Does nothing for an unknown block.
    fn translate_tree(&mut self, block: BlockId, dx: f64, dy: f64) {
        let Some(from) = self.blocks.get(&block).map(|b| b.position) else {
            return;
        };
        for id in self.descendants(block) {
            if let Some(b) = self.blocks.get_mut(&id) {
                b.position = b.position.translate(dx, dy);
            }
        }
        let to = from.translate(dx, dy);
        self.events.push(GraphEvent::Moved { block, from, to });
    }

    /// Moves a block and its subtree so the block's origin sits at `to`.
    pub fn move_to(&mut self, block: BlockId, to: Coordinate) -> Result<(), GraphError> {
        let delta = to - self.require_block(block)?.position;
        self.move_by(block, delta.x, delta.y)
    }

    /// Moves the root of `moving`'s tree so that `moving` lands on `dest`.
    pub fn position_near_connection(
        &mut self,
        moving: ConnectionId,
        dest: ConnectionId,
    ) -> Result<(), GraphError> {
        let from = self
            .connection_position(moving)
            .ok_or(GraphError::ConnectionNotFound(moving))?;
        let to = self
            .connection_position(dest)
            .ok_or(GraphError::ConnectionNotFound(dest))?;
        let root = self.root(self.require_connection(moving)?.block);
        let delta = to - from;
        self.move_by(root, delta.x, delta.y)
    }

    /// Nudges the tree holding `dynamic` so it no longer overlaps `fixed`.
    pub fn bump_away_from(&mut self, dynamic: ConnectionId, fixed: ConnectionId) {
        let (Some(from), Some(anchor), Some(block)) = (
            self.connection_position(dynamic),
            self.connection_position(fixed),
            self.source_block(dynamic),
        ) else {
            return;
        };
        let root = self.root(block);
        let dx = anchor.x + self.snap_radius - from.x;
        let dy = anchor.y + self.snap_radius - from.y;
        self.translate_tree(root, dx, dy);
    }

    /// Raises the tree holding `block` to the top of the draw order.
    pub fn bring_to_front(&mut self, block: BlockId) {
        let root = self.root(block);
        if let Some(index) = self.draw_order.iter().position(|b| *b == root) {
            let id = self.draw_order.remove(index);
            self.draw_order.push(id);
            self.events.push(GraphEvent::BroughtToFront { block: root });
        }
    }

    /// Removes a block and its whole subtree.
    pub fn delete_block(&mut self, block: BlockId) -> Result<(), GraphError> {
        self.unplug(block)?;
        for id in self.descendants(block) {
            let Some(removed) = self.blocks.remove(&id) else {
                continue;
            };
            for connection in removed.connections() {
                self.connections.remove(&connection);
            }
            for input in &removed.inputs {
                for field in &input.fields {
                    self.fields.remove(field);
                }
            }
            self.events.push(GraphEvent::Deleted { block: id });
        }
        self.draw_order.retain(|b| *b != block);
        tracing::trace!(%block, "deleted block");
        Ok(())
    }

    /// Removes every block.
    pub fn clear(&mut self) -> Result<(), GraphError> {
        for block in self.top_blocks(false) {
            self.delete_block(block)?;
        }
        Ok(())
    }

    /// Replaces the inputs of a block, changing its shape.
    ///
    /// Inputs are matched by name and kind; a matching input keeps its
    /// connection (and attached child, when still type-compatible). Children
    /// of inputs that disappear are disconnected and bumped away.
    pub fn set_inputs(
        &mut self,
        block: BlockId,
        inputs: &[InputDefinition],
    ) -> Result<(), GraphError> {
        let b = self
            .blocks
            .get_mut(&block)
            .ok_or(GraphError::BlockNotFound(block))?;
        let old_inputs = std::mem::take(&mut b.inputs);
        let mut remaining: Vec<Option<Input>> = old_inputs.into_iter().map(Some).collect();

        let mut new_inputs = Vec::with_capacity(inputs.len());
        for (index, definition) in inputs.iter().enumerate() {
            let reused = remaining
                .iter_mut()
                .find(|slot| {
                    slot.as_ref()
                        .is_some_and(|i| i.name == definition.name && i.kind == definition.kind)
                })
                .and_then(Option::take);

            let mut input = self.add_input(block, index, definition);
            if let Some(old) = reused {
                // Keep the old connection so the attached child survives.
                if let Some(fresh) = input.connection.take() {
                    self.connections.remove(&fresh);
                }
                if let Some(kept) = old.connection {
                    if let Some(c) = self.connections.get_mut(&kept) {
                        c.input = Some(index);
                        c.check = definition.check.clone();
                        c.offset = definition.offset;
                    }
                    input.connection = Some(kept);
                }
                for field in old.fields {
                    self.fields.remove(&field);
                }
            }
            new_inputs.push(input);
        }

        for old in remaining.into_iter().flatten() {
            if let Some(connection) = old.connection {
                self.drop_connection(connection)?;
            }
            for field in old.fields {
                self.fields.remove(&field);
            }
        }

        // A kept connection may have a narrower check now.
        let kept: Vec<ConnectionId> = new_inputs.iter().filter_map(|i| i.connection).collect();
        for connection in kept {
            let compatible = match (self.connections.get(&connection), self.target(connection)) {
                (Some(slot), Some(target)) => self
                    .connections
                    .get(&target)
                    .is_some_and(|t| self.checker.check_types(slot, t)),
                _ => true,
            };
            if !compatible {
                self.drop_child(connection)?;
            }
        }

        if let Some(b) = self.blocks.get_mut(&block) {
            b.inputs = new_inputs;
        }
        self.events.push(GraphEvent::Mutated { block });
        Ok(())
    }

    fn drop_child(&mut self, connection: ConnectionId) -> Result<(), GraphError> {
        if let Some(target) = self.target(connection) {
            self.disconnect(connection)?;
            self.bump_away_from(target, connection);
        }
        Ok(())
    }

    fn drop_connection(&mut self, connection: ConnectionId) -> Result<(), GraphError> {
        self.drop_child(connection)?;
        self.connections.remove(&connection);
        Ok(())
    }

    /// Deep-copies a block and its subtree from another workspace, keeping
    /// positions. Returns the id of the copied root.
    pub fn copy_block_from(
        &mut self,
        source: &Workspace,
        block: BlockId,
    ) -> Result<BlockId, GraphError> {
        let originals = source.descendants(block);
        if originals.is_empty() {
            return Err(GraphError::BlockNotFound(block));
        }

        let mut connection_map: AHashMap<ConnectionId, ConnectionId> = AHashMap::new();
        let mut block_map: AHashMap<BlockId, BlockId> = AHashMap::new();
        for original in &originals {
            let copy =
                self.copy_single(source.require_block(*original)?, source, &mut connection_map);
            block_map.insert(*original, copy);
        }

        for original in &originals {
            let connections: Vec<ConnectionId> =
                source.require_block(*original)?.connections().collect();
            for connection in connections {
                let Some(c) = source.connection(connection) else {
                    continue;
                };
                if let (true, Some(target)) = (c.is_superior(), c.target) {
                    if let (Some(parent), Some(child)) =
                        (connection_map.get(&connection), connection_map.get(&target))
                    {
                        self.link(*parent, *child);
                    }
                }
            }
        }

        block_map
            .get(&block)
            .copied()
            .ok_or(GraphError::BlockNotFound(block))
    }

    fn copy_single(
        &mut self,
        original: &Block,
        source: &Workspace,
        connection_map: &mut AHashMap<ConnectionId, ConnectionId>,
    ) -> BlockId {
        let id = BlockId(self.next_block_id);
        self.next_block_id += 1;

        let mut copy_connection = |ws: &mut Workspace, old: ConnectionId| -> Option<ConnectionId> {
            let c = source.connection(old)?;
            let new = ConnectionId(ws.next_connection_id);
            ws.next_connection_id += 1;
            ws.connections.insert(
                new,
                Connection {
                    id: new,
                    block: id,
                    kind: c.kind,
                    input: c.input,
                    check: c.check.clone(),
                    target: None,
                    offset: c.offset,
                },
            );
            connection_map.insert(old, new);
            Some(new)
        };

        let previous = original.previous.and_then(|c| copy_connection(self, c));
        let next = original.next.and_then(|c| copy_connection(self, c));
        let output = original.output.and_then(|c| copy_connection(self, c));
        let mut inputs = Vec::with_capacity(original.inputs.len());
        for input in &original.inputs {
            let connection = input.connection.and_then(|c| copy_connection(self, c));
            let fields = input
                .fields
                .iter()
                .filter_map(|f| source.field(*f))
                .map(|f| {
                    let new = FieldId(self.next_field_id);
                    self.next_field_id += 1;
                    self.fields.insert(
                        new,
                        Field {
                            id: new,
                            block: id,
                            ..f.clone()
                        },
                    );
                    new
                })
                .collect();
            inputs.push(Input {
                name: input.name.clone(),
                kind: input.kind,
                connection,
                fields,
            });
        }

        self.blocks.insert(
            id,
            Block {
                id,
                type_name: original.type_name.clone(),
                shadow: original.shadow,
                position: original.position,
                parent: None,
                previous,
                next,
                output,
                inputs,
            },
        );
        self.draw_order.push(id);
        self.events.push(GraphEvent::Created { block: id });
        id
    }
}
