use super::{BlockId, ConnectionId, Coordinate, FieldId};
use serde::{Deserialize, Serialize};

/// How an input row accepts children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// Accepts a block through its output connection.
    Value,
    /// Accepts a stack of blocks through their previous connection.
    Statement,
    /// Holds fields only.
    Dummy,
}

/// One row of a block: its fields followed by an optional connection.
#[derive(Debug, Clone, PartialEq)]
pub struct Input {
    pub(crate) name: String,
    pub(crate) kind: InputKind,
    pub(crate) connection: Option<ConnectionId>,
    pub(crate) fields: Vec<FieldId>,
}

impl Input {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> InputKind {
        self.kind
    }

    pub fn connection(&self) -> Option<ConnectionId> {
        self.connection
    }

    pub fn fields(&self) -> &[FieldId] {
        &self.fields
    }
}

/// An editable (or decorative) value shown on a block.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub(crate) id: FieldId,
    pub(crate) block: BlockId,
    pub(crate) input: usize,
    pub(crate) name: String,
    pub(crate) value: String,
    pub(crate) editable: bool,
}

impl Field {
    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn source_block(&self) -> BlockId {
        self.block
    }

    /// Index of the input row holding this field.
    pub fn parent_input(&self) -> usize {
        self.input
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }
}

/// A node of the program graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub(crate) id: BlockId,
    pub(crate) type_name: String,
    pub(crate) shadow: bool,
    pub(crate) position: Coordinate,
    pub(crate) parent: Option<BlockId>,
    pub(crate) previous: Option<ConnectionId>,
    pub(crate) next: Option<ConnectionId>,
    pub(crate) output: Option<ConnectionId>,
    pub(crate) inputs: Vec<Input>,
}

impl Block {
    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn is_shadow(&self) -> bool {
        self.shadow
    }

    pub fn position(&self) -> Coordinate {
        self.position
    }

    pub fn parent(&self) -> Option<BlockId> {
        self.parent
    }

    pub fn previous_connection(&self) -> Option<ConnectionId> {
        self.previous
    }

    pub fn next_connection(&self) -> Option<ConnectionId> {
        self.next
    }

    pub fn output_connection(&self) -> Option<ConnectionId> {
        self.output
    }

    /// The connection through which this block hangs off its parent.
    pub fn top_connection(&self) -> Option<ConnectionId> {
        self.previous.or(self.output)
    }

    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    pub fn input(&self, name: &str) -> Option<&Input> {
        self.inputs.iter().find(|i| i.name == name)
    }

    /// All connections of this block in declaration order.
    pub fn connections(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        self.output
            .into_iter()
            .chain(self.previous)
            .chain(self.inputs.iter().filter_map(|i| i.connection))
            .chain(self.next)
    }
}
