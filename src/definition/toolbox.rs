use crate::error::DefinitionError;
use crate::graph::Workspace;
use serde::{Deserialize, Serialize};

/// Whether a toolbox is a tree of categories or a single flat flyout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolboxKind {
    CategoryToolbox,
    FlyoutToolbox,
}

impl ToolboxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolboxKind::CategoryToolbox => "category",
            ToolboxKind::FlyoutToolbox => "flyout",
        }
    }
}

/// One entry of a toolbox: a category or a block template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ToolboxItem {
    Category {
        name: String,
        #[serde(default)]
        contents: Vec<ToolboxItem>,
        #[serde(default)]
        expanded: bool,
    },
    Block {
        #[serde(rename = "type")]
        type_name: String,
    },
}

/// The declared contents of a toolbox.
///
/// ```rust
/// use kumiki::definition::{ToolboxDefinition, ToolboxKind};
///
/// let toolbox = ToolboxDefinition::from_json(r#"{
///     "kind": "categoryToolbox",
///     "contents": [
///         { "kind": "category", "name": "Logic", "contents": [
///             { "kind": "block", "type": "controls_if" }
///         ] }
///     ]
/// }"#).unwrap();
/// assert_eq!(toolbox.kind, ToolboxKind::CategoryToolbox);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolboxDefinition {
    pub kind: ToolboxKind,
    #[serde(default)]
    pub contents: Vec<ToolboxItem>,
}

impl ToolboxDefinition {
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        serde_json::from_str(json).map_err(|e| DefinitionError::JsonParseError(e.to_string()))
    }

    /// A flyout toolbox listing `types` in order.
    pub fn flyout(types: &[&str]) -> Self {
        Self {
            kind: ToolboxKind::FlyoutToolbox,
            contents: types
                .iter()
                .map(|t| ToolboxItem::Block {
                    type_name: t.to_string(),
                })
                .collect(),
        }
    }

    /// Checks that every block type is registered on `workspace` and that
    /// the contents match the toolbox kind.
    pub fn validate(&self, workspace: &Workspace) -> Result<(), DefinitionError> {
        for item in &self.contents {
            match (self.kind, item) {
                (ToolboxKind::CategoryToolbox, ToolboxItem::Block { type_name }) => {
                    return Err(DefinitionError::UncategorizedBlock(type_name.clone()));
                }
                (ToolboxKind::FlyoutToolbox, ToolboxItem::Category { .. }) => {
                    return Err(DefinitionError::WrongToolboxKind {
                        expected: ToolboxKind::FlyoutToolbox.as_str(),
                        found: ToolboxKind::CategoryToolbox.as_str(),
                    });
                }
                _ => validate_item(item, "", workspace)?,
            }
        }
        Ok(())
    }

    /// The block types of a flyout toolbox.
    pub fn flyout_blocks(&self) -> Result<Vec<String>, DefinitionError> {
        if self.kind != ToolboxKind::FlyoutToolbox {
            return Err(DefinitionError::WrongToolboxKind {
                expected: ToolboxKind::FlyoutToolbox.as_str(),
                found: self.kind.as_str(),
            });
        }
        Ok(self
            .contents
            .iter()
            .filter_map(|item| match item {
                ToolboxItem::Block { type_name } => Some(type_name.clone()),
                ToolboxItem::Category { .. } => None,
            })
            .collect())
    }
}

fn validate_item(
    item: &ToolboxItem,
    category: &str,
    workspace: &Workspace,
) -> Result<(), DefinitionError> {
    match item {
        ToolboxItem::Block { type_name } => {
            if workspace.definition(type_name).is_none() {
                return Err(DefinitionError::UnknownBlockType {
                    category: category.to_string(),
                    type_name: type_name.clone(),
                });
            }
        }
        ToolboxItem::Category { name, contents, .. } => {
            for child in contents {
                validate_item(child, name, workspace)?;
            }
        }
    }
    Ok(())
}
