use super::Location;
use crate::graph::{BlockId, InputKind, Workspace};
use std::fmt;

/// Renders a location with the names of the elements it points at.
pub struct DisplayLocation<'a> {
    pub location: &'a Location,
    pub workspace: &'a Workspace,
}

impl<'a> fmt::Display for DisplayLocation<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ws = self.workspace;
        match *self.location {
            Location::Workspace { at, .. } => write!(f, "workspace {}", at),
            Location::Stack(block) => write!(f, "stack {}", BlockLabel(ws, block)),
            Location::Block(block) => write!(f, "block {}", BlockLabel(ws, block)),
            Location::Field(id) => match ws.field(id) {
                Some(field) => write!(
                    f,
                    "field {}={:?} on {}",
                    field.name(),
                    field.value(),
                    BlockLabel(ws, field.source_block())
                ),
                None => write!(f, "field {} <deleted>", id),
            },
            Location::Connection { id, role } => match ws.connection(id) {
                Some(connection) => {
                    write!(f, "{} connection {}", role, id)?;
                    if let Some(input) = connection
                        .parent_input()
                        .and_then(|i| ws.block(connection.source_block())?.inputs().get(i))
                    {
                        write!(f, " \"{}\"", input.name())?;
                    }
                    write!(f, " on {}", BlockLabel(ws, connection.source_block()))
                }
                None => write!(f, "connection {} <deleted>", id),
            },
        }
    }
}

struct BlockLabel<'a>(&'a Workspace, BlockId);

impl<'a> fmt::Display for BlockLabel<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.block(self.1) {
            Some(block) if block.is_shadow() => {
                write!(f, "{} ({}, shadow)", self.1, block.type_name())
            }
            Some(block) => write!(f, "{} ({})", self.1, block.type_name()),
            None => write!(f, "{} <deleted>", self.1),
        }
    }
}

/// Prints every stack of a workspace as a tree, in navigation order.
///
/// Blocks nested in inputs appear under the input's name; the blocks
/// following a block in its stack are printed as its siblings. The block
/// under `cursor`, if any, is flagged with `<`.
pub struct DisplayWorkspace<'a> {
    pub workspace: &'a Workspace,
    pub cursor: Option<BlockId>,
}

impl<'a> fmt::Display for DisplayWorkspace<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.workspace.id())?;
        let tops = self.workspace.top_blocks(true);
        for (i, top) in tops.iter().enumerate() {
            let position = self
                .workspace
                .block(*top)
                .map(|b| b.position())
                .unwrap_or_default();
            let is_last = i + 1 == tops.len();
            let branch = if is_last { "└── " } else { "├── " };
            writeln!(f, "{}stack at {}", branch, position)?;
            let prefix = if is_last { "    " } else { "│   " };
            self.fmt_chain(f, *top, prefix)?;
        }
        Ok(())
    }
}

impl<'a> DisplayWorkspace<'a> {
    /// Formats a block and every block after it in the same chain.
    fn fmt_chain(&self, f: &mut fmt::Formatter<'_>, first: BlockId, prefix: &str) -> fmt::Result {
        let mut chain = vec![first];
        while let Some(next) = chain.last().and_then(|b| self.workspace.next_block(*b)) {
            chain.push(next);
        }
        for (i, block) in chain.iter().enumerate() {
            self.fmt_as_tree(f, *block, prefix, i + 1 == chain.len())?;
        }
        Ok(())
    }

    fn fmt_as_tree(
        &self,
        f: &mut fmt::Formatter<'_>,
        block: BlockId,
        prefix: &str,
        is_last: bool,
    ) -> fmt::Result {
        let node_marker = if is_last { "└── " } else { "├── " };
        let flag = if self.cursor == Some(block) { " <" } else { "" };
        writeln!(f, "{}{}{}{}", prefix, node_marker, BlockLabel(self.workspace, block), flag)?;

        let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
        let Some(inputs) = self.workspace.block(block).map(|b| b.inputs()) else {
            return Ok(());
        };
        let shown: Vec<_> = inputs
            .iter()
            .filter(|i| i.kind() != InputKind::Dummy || !i.fields().is_empty())
            .collect();
        for (i, input) in shown.iter().enumerate() {
            let last_input = i + 1 == shown.len();
            let marker = if last_input { "└── " } else { "├── " };
            write!(f, "{}{}{}", child_prefix, marker, input.name())?;
            for field in input.fields().iter().filter_map(|id| self.workspace.field(*id)) {
                write!(f, " [{}={}]", field.name(), field.value())?;
            }
            writeln!(f)?;
            let input_prefix =
                format!("{}{}", child_prefix, if last_input { "    " } else { "│   " });
            if let Some(child) = input.connection().and_then(|c| self.workspace.target_block(c)) {
                self.fmt_chain(f, child, &input_prefix)?;
            }
        }
        Ok(())
    }
}
