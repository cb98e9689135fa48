use crate::error::DefinitionError;
use crate::graph::{Coordinate, InputKind};
use serde::{Deserialize, Serialize};

/// Declares the shape of one block type: its connections, inputs and fields.
///
/// Definitions are registered on a [`crate::graph::Workspace`] and used to
/// instantiate blocks by type name.
///
/// ```rust
/// use kumiki::definition::{BlockDefinition, InputDefinition};
///
/// let print = BlockDefinition::new("text_print")
///     .with_previous(None)
///     .with_next(None)
///     .with_input(InputDefinition::value("TEXT").with_check(&["String"]));
/// assert_eq!(print.inputs.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDefinition {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub previous: Option<ConnectionDefinition>,
    #[serde(default)]
    pub next: Option<ConnectionDefinition>,
    #[serde(default)]
    pub output: Option<ConnectionDefinition>,
    #[serde(default)]
    pub inputs: Vec<InputDefinition>,
}

/// A connection declared on a block type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConnectionDefinition {
    /// Accepted type names; `None` accepts anything.
    #[serde(default)]
    pub check: Option<Vec<String>>,
    /// Position of the connection relative to the block origin.
    #[serde(default)]
    pub offset: Coordinate,
}

/// An input row declared on a block type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputDefinition {
    pub name: String,
    pub kind: InputKind,
    #[serde(default)]
    pub check: Option<Vec<String>>,
    #[serde(default)]
    pub offset: Coordinate,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default = "default_editable")]
    pub editable: bool,
}

fn default_editable() -> bool {
    true
}

fn checks(check: &[&str]) -> Option<Vec<String>> {
    Some(check.iter().map(|c| c.to_string()).collect())
}

impl BlockDefinition {
    pub fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            previous: None,
            next: None,
            output: None,
            inputs: Vec::new(),
        }
    }

    pub fn with_previous(mut self, check: Option<&[&str]>) -> Self {
        self.previous = Some(ConnectionDefinition {
            check: check.and_then(checks),
            offset: Coordinate::default(),
        });
        self
    }

    pub fn with_next(mut self, check: Option<&[&str]>) -> Self {
        self.next = Some(ConnectionDefinition {
            check: check.and_then(checks),
            offset: Coordinate::new(0.0, 40.0),
        });
        self
    }

    pub fn with_output(mut self, check: Option<&[&str]>) -> Self {
        self.output = Some(ConnectionDefinition {
            check: check.and_then(checks),
            offset: Coordinate::default(),
        });
        self
    }

    pub fn with_input(mut self, input: InputDefinition) -> Self {
        self.inputs.push(input);
        self
    }

    /// Parses a single definition from JSON.
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        serde_json::from_str(json).map_err(|e| DefinitionError::JsonParseError(e.to_string()))
    }

    /// Parses a JSON array of definitions.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, DefinitionError> {
        serde_json::from_str(json).map_err(|e| DefinitionError::JsonParseError(e.to_string()))
    }
}

impl InputDefinition {
    fn new(name: &str, kind: InputKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            check: None,
            offset: Coordinate::default(),
            fields: Vec::new(),
        }
    }

    pub fn value(name: &str) -> Self {
        Self::new(name, InputKind::Value)
    }

    pub fn statement(name: &str) -> Self {
        Self::new(name, InputKind::Statement)
    }

    pub fn dummy(name: &str) -> Self {
        Self::new(name, InputKind::Dummy)
    }

    pub fn with_check(mut self, check: &[&str]) -> Self {
        self.check = checks(check);
        self
    }

    pub fn with_offset(mut self, offset: Coordinate) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields.push(FieldDefinition {
            name: name.to_string(),
            value: value.to_string(),
            editable: true,
        });
        self
    }

    /// Adds a non-editable label; labels are skipped by keyboard navigation.
    pub fn with_label(mut self, text: &str) -> Self {
        self.fields.push(FieldDefinition {
            name: String::new(),
            value: text.to_string(),
            editable: false,
        });
        self
    }
}
