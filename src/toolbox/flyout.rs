use crate::definition::BlockDefinition;
use crate::error::GraphError;
use crate::graph::{BlockId, Coordinate, Workspace};

/// The palette of template blocks.
///
/// Templates live in the flyout's own workspace and are copied into the
/// main workspace when inserted.
#[derive(Debug)]
pub struct Flyout {
    workspace: Workspace,
    templates: Vec<BlockId>,
    visible: bool,
    gap: f64,
}

impl Flyout {
    pub fn new(definitions: impl IntoIterator<Item = BlockDefinition>, gap: f64) -> Self {
        Self {
            workspace: Workspace::builder().with_definitions(definitions).build(),
            templates: Vec::new(),
            visible: false,
            gap,
        }
    }

    /// A flyout able to show every block type registered on `workspace`.
    pub fn for_workspace(workspace: &Workspace, gap: f64) -> Self {
        Self::new(workspace.definitions().cloned(), gap)
    }

    /// Replaces the templates with one block per type, laid out top to
    /// bottom, and shows the flyout.
    pub fn show<S: AsRef<str>>(&mut self, types: &[S]) -> Result<(), GraphError> {
        self.workspace.clear()?;
        self.templates.clear();

        let mut y = 0.0;
        for type_name in types {
            let block = self
                .workspace
                .new_block_at(type_name.as_ref(), Coordinate::new(0.0, y))?;
            y += self.height_of(block) + self.gap;
            self.templates.push(block);
        }
        self.workspace.drain_events();
        self.visible = true;
        tracing::debug!(templates = self.templates.len(), "flyout shown");
        Ok(())
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Template blocks from top to bottom.
    pub fn templates(&self) -> &[BlockId] {
        &self.templates
    }

    pub fn first_template(&self) -> Option<BlockId> {
        self.templates.first().copied()
    }

    /// The template after (`forward`) or before `current`, without
    /// wrapping.
    pub fn neighbour(&self, current: BlockId, forward: bool) -> Option<BlockId> {
        let index = self.templates.iter().position(|b| *b == current)?;
        let target = if forward {
            index.checked_add(1)?
        } else {
            index.checked_sub(1)?
        };
        self.templates.get(target).copied()
    }

    /// Copies a template into `target`, returning the new block.
    pub fn create_block(
        &self,
        template: BlockId,
        target: &mut Workspace,
    ) -> Result<BlockId, GraphError> {
        if !self.templates.contains(&template) {
            return Err(GraphError::BlockNotFound(template));
        }
        target.copy_block_from(&self.workspace, template)
    }

    /// Vertical extent of a block, measured by its lowest connection.
    fn height_of(&self, block: BlockId) -> f64 {
        let Some(origin) = self.workspace.block(block).map(|b| b.position()) else {
            return 0.0;
        };
        self.workspace
            .block(block)
            .into_iter()
            .flat_map(|b| b.connections())
            .filter_map(|c| self.workspace.connection_position(c))
            .map(|p| p.y - origin.y)
            .fold(0.0, f64::max)
    }
}
