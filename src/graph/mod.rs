//! The connection graph: blocks, their connection points and fields.
//!
//! Elements are stored in id-keyed arenas. A block records its parent as an
//! id; children are derived from the targets of its superior connections, so
//! every traversal walks ids rather than pointers. Ids are never reused, which
//! makes a stale id resolve to "missing" instead of to an unrelated element.

use crate::definition::{BlockDefinition, ConnectionDefinition};
use crate::error::{ConnectionError, GraphError};
use ahash::AHashMap;
use itertools::Itertools;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

mod block;
mod checker;
mod connection;
mod coordinate;
mod event;
mod mutation;

pub use block::*;
pub use checker::*;
pub use connection::*;
pub use coordinate::*;
pub use event::*;

macro_rules! define_ids {
    ( $( ($name:ident, $prefix:expr) ),* $(,)? ) => {
        $(
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
            pub struct $name(pub(crate) u32);

            impl $name {
                pub fn index(self) -> u32 {
                    self.0
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}{}", $prefix, self.0)
                }
            }
        )*
    };
}

define_ids! {
    (WorkspaceId, "ws"),
    (BlockId, "#"),
    (ConnectionId, "c"),
    (FieldId, "f"),
}

static NEXT_WORKSPACE_ID: AtomicU32 = AtomicU32::new(0);

pub const DEFAULT_SNAP_RADIUS: f64 = 28.0;

/// Used to order top blocks: a slight tilt so that blocks on the same row are
/// read left to right.
const TOP_BLOCK_TILT_DEGREES: f64 = 3.0;

/// A surface holding a forest of blocks.
pub struct Workspace {
    id: WorkspaceId,
    pub(crate) blocks: AHashMap<BlockId, Block>,
    pub(crate) connections: AHashMap<ConnectionId, Connection>,
    pub(crate) fields: AHashMap<FieldId, Field>,
    registry: AHashMap<String, BlockDefinition>,
    checker: Box<dyn ConnectionChecker>,
    /// Top blocks from back to front.
    pub(crate) draw_order: Vec<BlockId>,
    pub(crate) events: Vec<GraphEvent>,
    pub(crate) snap_radius: f64,
    next_block_id: u32,
    next_connection_id: u32,
    next_field_id: u32,
}

pub struct WorkspaceBuilder {
    registry: AHashMap<String, BlockDefinition>,
    checker: Box<dyn ConnectionChecker>,
    snap_radius: f64,
}

impl Default for WorkspaceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkspaceBuilder {
    pub fn new() -> Self {
        Self {
            registry: AHashMap::new(),
            checker: Box::new(DefaultConnectionChecker),
            snap_radius: DEFAULT_SNAP_RADIUS,
        }
    }

    pub fn with_block_type(mut self, definition: BlockDefinition) -> Self {
        self.registry
            .insert(definition.type_name.clone(), definition);
        self
    }

    pub fn with_definitions(
        mut self,
        definitions: impl IntoIterator<Item = BlockDefinition>,
    ) -> Self {
        for definition in definitions {
            self = self.with_block_type(definition);
        }
        self
    }

    pub fn with_checker(mut self, checker: Box<dyn ConnectionChecker>) -> Self {
        self.checker = checker;
        self
    }

    /// Distance used when bumping a displaced tree away from a connection.
    pub fn with_snap_radius(mut self, snap_radius: f64) -> Self {
        self.snap_radius = snap_radius;
        self
    }

    pub fn build(self) -> Workspace {
        Workspace {
            id: WorkspaceId(NEXT_WORKSPACE_ID.fetch_add(1, Ordering::Relaxed)),
            blocks: AHashMap::new(),
            connections: AHashMap::new(),
            fields: AHashMap::new(),
            registry: self.registry,
            checker: self.checker,
            draw_order: Vec::new(),
            events: Vec::new(),
            snap_radius: self.snap_radius,
            next_block_id: 0,
            next_connection_id: 0,
            next_field_id: 0,
        }
    }
}

impl Workspace {
    pub fn builder() -> WorkspaceBuilder {
        WorkspaceBuilder::new()
    }

    pub fn id(&self) -> WorkspaceId {
        self.id
    }

    pub fn definition(&self, type_name: &str) -> Option<&BlockDefinition> {
        self.registry.get(type_name)
    }

    pub fn definitions(&self) -> impl Iterator<Item = &BlockDefinition> {
        self.registry.values()
    }

    pub fn register_block_type(&mut self, definition: BlockDefinition) {
        self.registry
            .insert(definition.type_name.clone(), definition);
    }

    pub fn snap_radius(&self) -> f64 {
        self.snap_radius
    }

    pub fn set_snap_radius(&mut self, snap_radius: f64) {
        self.snap_radius = snap_radius;
    }

    pub fn checker(&self) -> &dyn ConnectionChecker {
        self.checker.as_ref()
    }

    /// Creates a top-level block of a registered type at the origin.
    pub fn new_block(&mut self, type_name: &str) -> Result<BlockId, GraphError> {
        self.new_block_at(type_name, Coordinate::default())
    }

    pub fn new_block_at(
        &mut self,
        type_name: &str,
        position: Coordinate,
    ) -> Result<BlockId, GraphError> {
        self.instantiate(type_name, position, false)
    }

    /// Creates a shadow block: a placeholder that may not be relocated or
    /// left disconnected by keyboard actions.
    pub fn new_shadow_block(&mut self, type_name: &str) -> Result<BlockId, GraphError> {
        self.instantiate(type_name, Coordinate::default(), true)
    }

    fn instantiate(
        &mut self,
        type_name: &str,
        position: Coordinate,
        shadow: bool,
    ) -> Result<BlockId, GraphError> {
        let definition = self
            .registry
            .get(type_name)
            .cloned()
            .ok_or_else(|| GraphError::UnknownBlockType(type_name.to_string()))?;

        let id = BlockId(self.next_block_id);
        self.next_block_id += 1;

        let previous = definition
            .previous
            .as_ref()
            .map(|def| self.add_connection(id, ConnectionType::Previous, None, def));
        let next = definition
            .next
            .as_ref()
            .map(|def| self.add_connection(id, ConnectionType::Next, None, def));
        let output = definition
            .output
            .as_ref()
            .map(|def| self.add_connection(id, ConnectionType::Output, None, def));
        let inputs = definition
            .inputs
            .iter()
            .enumerate()
            .map(|(index, def)| self.add_input(id, index, def))
            .collect();

        self.blocks.insert(
            id,
            Block {
                id,
                type_name: definition.type_name,
                shadow,
                position,
                parent: None,
                previous,
                next,
                output,
                inputs,
            },
        );
        self.draw_order.push(id);
        self.events.push(GraphEvent::Created { block: id });
        tracing::trace!(block = %id, type_name, "created block");
        Ok(id)
    }

    pub(crate) fn add_input(
        &mut self,
        block: BlockId,
        index: usize,
        definition: &crate::definition::InputDefinition,
    ) -> Input {
        let connection = match definition.kind {
            InputKind::Value => Some(ConnectionType::Input),
            InputKind::Statement => Some(ConnectionType::Next),
            InputKind::Dummy => None,
        }
        .map(|kind| {
            self.add_connection(
                block,
                kind,
                Some(index),
                &ConnectionDefinition {
                    check: definition.check.clone(),
                    offset: definition.offset,
                },
            )
        });

        let fields = definition
            .fields
            .iter()
            .map(|def| {
                let id = FieldId(self.next_field_id);
                self.next_field_id += 1;
                self.fields.insert(
                    id,
                    Field {
                        id,
                        block,
                        input: index,
                        name: def.name.clone(),
                        value: def.value.clone(),
                        editable: def.editable,
                    },
                );
                id
            })
            .collect();

        Input {
            name: definition.name.clone(),
            kind: definition.kind,
            connection,
            fields,
        }
    }

    fn add_connection(
        &mut self,
        block: BlockId,
        kind: ConnectionType,
        input: Option<usize>,
        definition: &ConnectionDefinition,
    ) -> ConnectionId {
        let id = ConnectionId(self.next_connection_id);
        self.next_connection_id += 1;
        self.connections.insert(
            id,
            Connection {
                id,
                block,
                kind,
                input,
                check: definition.check.clone(),
                target: None,
                offset: definition.offset,
            },
        );
        id
    }

    // --- Lookups ---

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(&id)
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&id)
    }

    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.fields.get(&id)
    }

    pub(crate) fn require_block(&self, id: BlockId) -> Result<&Block, GraphError> {
        self.blocks.get(&id).ok_or(GraphError::BlockNotFound(id))
    }

    pub(crate) fn require_connection(&self, id: ConnectionId) -> Result<&Connection, GraphError> {
        self.connections
            .get(&id)
            .ok_or(GraphError::ConnectionNotFound(id))
    }

    pub fn contains_block(&self, id: BlockId) -> bool {
        self.blocks.contains_key(&id)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn source_block(&self, connection: ConnectionId) -> Option<BlockId> {
        self.connections.get(&connection).map(|c| c.block)
    }

    pub fn target(&self, connection: ConnectionId) -> Option<ConnectionId> {
        self.connections.get(&connection).and_then(|c| c.target)
    }

    /// The block joined to the other end of `connection`, if any.
    pub fn target_block(&self, connection: ConnectionId) -> Option<BlockId> {
        self.target(connection)
            .and_then(|target| self.source_block(target))
    }

    pub fn is_shadow(&self, block: BlockId) -> bool {
        self.blocks.get(&block).is_some_and(|b| b.shadow)
    }

    pub fn parent(&self, block: BlockId) -> Option<BlockId> {
        self.blocks.get(&block).and_then(|b| b.parent)
    }

    /// The outermost ancestor of `block` (itself when it has no parent).
    pub fn root(&self, block: BlockId) -> BlockId {
        let mut current = block;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// Blocks attached to this block's inputs and next connection, in
    /// declaration order.
    pub fn children(&self, block: BlockId) -> Vec<BlockId> {
        let Some(b) = self.blocks.get(&block) else {
            return Vec::new();
        };
        b.inputs
            .iter()
            .filter_map(|i| i.connection)
            .chain(b.next)
            .filter_map(|c| self.target_block(c))
            .collect()
    }

    /// The block and everything below it, depth first.
    pub fn descendants(&self, block: BlockId) -> Vec<BlockId> {
        let mut result = Vec::new();
        if !self.blocks.contains_key(&block) {
            return result;
        }
        let mut stack = vec![block];
        while let Some(current) = stack.pop() {
            result.push(current);
            let children = self.children(current);
            stack.extend(children.into_iter().rev());
        }
        result
    }

    pub fn next_block(&self, block: BlockId) -> Option<BlockId> {
        self.blocks
            .get(&block)
            .and_then(|b| b.next)
            .and_then(|c| self.target_block(c))
    }

    /// Blocks without a parent. When `ordered`, they are sorted top to
    /// bottom with a slight left-to-right tilt; otherwise they follow draw
    /// order.
    pub fn top_blocks(&self, ordered: bool) -> Vec<BlockId> {
        if !ordered {
            return self.draw_order.clone();
        }
        let tilt = TOP_BLOCK_TILT_DEGREES.to_radians().sin();
        self.draw_order
            .iter()
            .copied()
            .sorted_by(|a, b| {
                let key = |id: &BlockId| {
                    self.blocks
                        .get(id)
                        .map_or(f64::MAX, |b| b.position.y + tilt * b.position.x)
                };
                key(a).total_cmp(&key(b)).then(a.cmp(b))
            })
            .collect()
    }

    /// Absolute position of a connection point.
    pub fn connection_position(&self, connection: ConnectionId) -> Option<Coordinate> {
        let c = self.connections.get(&connection)?;
        let block = self.blocks.get(&c.block)?;
        Some(block.position + c.offset)
    }

    pub fn set_field_value(&mut self, field: FieldId, value: &str) -> Result<(), GraphError> {
        let f = self
            .fields
            .get_mut(&field)
            .ok_or(GraphError::FieldNotFound(field))?;
        f.value = value.to_string();
        Ok(())
    }

    /// Checks whether two connections could be joined, without joining them.
    pub fn can_connect(&self, a: ConnectionId, b: ConnectionId) -> Result<(), ConnectionError> {
        self.checker.can_connect(self, a, b)
    }

    /// Returns and clears the mutations recorded since the last call.
    pub fn drain_events(&mut self) -> Vec<GraphEvent> {
        std::mem::take(&mut self.events)
    }
}

impl fmt::Debug for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workspace")
            .field("id", &self.id)
            .field("blocks", &self.blocks.len())
            .field("top_blocks", &self.draw_order)
            .finish()
    }
}
