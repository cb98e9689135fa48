//! Structural moves between locations.
//!
//! Each move reads the current location and returns the neighbouring one, or
//! `None` when no move exists. Moves never loop: every step either follows a
//! single edge of the graph or scans a block's input rows once.

use super::Location;
use crate::config::NavigationConfig;
use crate::graph::{BlockId, ConnectionId, ConnectionType, FieldId, Workspace};

impl Location {
    /// The next sibling: down a stack, or right along a block's rows.
    pub fn next(&self, workspace: &Workspace, config: &NavigationConfig) -> Option<Location> {
        match *self {
            Location::Stack(block) => between_stacks(workspace, block, true),
            Location::Field(field) => next_for_field(workspace, config, field),
            Location::Block(block) => {
                let next = workspace.block(block)?.next_connection()?;
                Location::for_connection(workspace, next)
            }
            Location::Connection { id, role } => match role {
                ConnectionType::Output => None,
                ConnectionType::Input => next_for_input(workspace, config, id),
                ConnectionType::Previous => {
                    Location::for_block(workspace, workspace.source_block(id)?)
                }
                ConnectionType::Next => {
                    Location::for_connection(workspace, workspace.target(id)?)
                }
            },
            Location::Workspace { .. } => None,
        }
    }

    /// The previous sibling: up a stack, or left along a block's rows.
    pub fn prev(&self, workspace: &Workspace, config: &NavigationConfig) -> Option<Location> {
        match *self {
            Location::Stack(block) => between_stacks(workspace, block, false),
            Location::Field(field) => prev_for_field(workspace, config, field),
            Location::Block(block) => {
                let top = workspace.block(block)?.top_connection()?;
                Location::for_connection(workspace, top)
            }
            Location::Connection { id, role } => match role {
                ConnectionType::Output => None,
                ConnectionType::Input => prev_for_input(workspace, config, id),
                ConnectionType::Previous => {
                    let target = workspace.target(id)?;
                    // A statement input is reached by stepping out, not back.
                    if workspace.connection(target)?.parent_input().is_some() {
                        return None;
                    }
                    Location::for_connection(workspace, target)
                }
                ConnectionType::Next => Location::for_block(workspace, workspace.source_block(id)?),
            },
            Location::Workspace { .. } => None,
        }
    }

    /// The first child.
    pub fn step_in(&self, workspace: &Workspace, config: &NavigationConfig) -> Option<Location> {
        match *self {
            Location::Workspace { .. } => {
                let first = *workspace.top_blocks(true).first()?;
                Location::for_stack(workspace, first)
            }
            Location::Stack(block) => Location::top_of(workspace, block),
            Location::Block(block) => first_field_or_input(workspace, config, block),
            Location::Connection {
                id,
                role: ConnectionType::Input,
            } => Location::for_connection(workspace, workspace.target(id)?),
            Location::Connection { .. } | Location::Field(_) => None,
        }
    }

    /// The parent.
    pub fn step_out(&self, workspace: &Workspace, config: &NavigationConfig) -> Option<Location> {
        match *self {
            Location::Workspace { .. } => None,
            Location::Stack(block) => {
                let position = workspace.block(block)?.position();
                Some(Location::on_workspace(
                    workspace,
                    position.translate(0.0, config.stack_out_offset_y),
                ))
            }
            Location::Field(field) => {
                Location::for_block(workspace, workspace.field(field)?.source_block())
            }
            Location::Block(block) => out_of_block(workspace, block),
            Location::Connection { id, role } => {
                let block = workspace.source_block(id)?;
                match role {
                    ConnectionType::Output => match workspace.target(id) {
                        Some(target) => Location::for_connection(workspace, target),
                        None => Location::for_stack(workspace, block),
                    },
                    ConnectionType::Input => Location::for_block(workspace, block),
                    ConnectionType::Previous | ConnectionType::Next => {
                        out_of_block(workspace, block)
                    }
                }
            }
        }
    }
}

fn between_stacks(workspace: &Workspace, block: BlockId, forward: bool) -> Option<Location> {
    let root = workspace.root(block);
    let tops = workspace.top_blocks(true);
    let index = tops.iter().position(|b| *b == root)?;
    let target = if forward {
        index.checked_add(1)?
    } else {
        index.checked_sub(1)?
    };
    Location::for_stack(workspace, *tops.get(target)?)
}

/// Climbs previous-to-next joins to the first block of the enclosing
/// sub-stack.
fn top_of_substack(workspace: &Workspace, block: BlockId) -> BlockId {
    let mut current = block;
    while let Some(parent_next) = workspace
        .block(current)
        .and_then(|b| b.previous_connection())
        .and_then(|c| workspace.target(c))
        .filter(|t| {
            workspace
                .connection(*t)
                .is_some_and(|c| c.kind() == ConnectionType::Next && c.parent_input().is_none())
        })
    {
        match workspace.source_block(parent_next) {
            Some(parent) => current = parent,
            None => break,
        }
    }
    current
}

/// The enclosing input of a block's sub-stack, or its stack when it is not
/// nested in an input.
fn out_of_block(workspace: &Workspace, block: BlockId) -> Option<Location> {
    let top = top_of_substack(workspace, block);
    let enclosing = workspace
        .block(top)?
        .top_connection()
        .and_then(|c| workspace.target(c))
        .filter(|t| {
            workspace
                .connection(*t)
                .is_some_and(|c| c.parent_input().is_some())
        });
    match enclosing {
        Some(input) => Location::for_connection(workspace, input),
        None => Location::for_stack(workspace, top),
    }
}

fn is_navigable(workspace: &Workspace, config: &NavigationConfig, field: FieldId) -> bool {
    workspace
        .field(field)
        .is_some_and(|f| f.is_editable() || config.navigate_all_fields)
}

/// Scans the rows of `block` starting at row `row`, field `first_field`, for
/// the first navigable field or input connection.
fn scan_forward(
    workspace: &Workspace,
    config: &NavigationConfig,
    block: BlockId,
    row: usize,
    first_field: usize,
) -> Option<Location> {
    let inputs = workspace.block(block)?.inputs();
    for (index, input) in inputs.iter().enumerate().skip(row) {
        let start = if index == row { first_field } else { 0 };
        if let Some(field) = input
            .fields()
            .iter()
            .skip(start)
            .find(|f| is_navigable(workspace, config, **f))
        {
            return Some(Location::Field(*field));
        }
        if let Some(connection) = input.connection() {
            return Location::for_connection(workspace, connection);
        }
    }
    None
}

/// Scans the rows of `block` backwards from row `row`. On that row only the
/// fields before `field_end` are considered and its own connection is
/// skipped.
fn scan_backward(
    workspace: &Workspace,
    config: &NavigationConfig,
    block: BlockId,
    row: usize,
    field_end: usize,
) -> Option<Location> {
    let inputs = workspace.block(block)?.inputs();
    for index in (0..=row.min(inputs.len().checked_sub(1)?)).rev() {
        let input = &inputs[index];
        if index != row {
            if let Some(connection) = input.connection() {
                return Location::for_connection(workspace, connection);
            }
        }
        let end = if index == row {
            field_end.min(input.fields().len())
        } else {
            input.fields().len()
        };
        if let Some(field) = input.fields()[..end]
            .iter()
            .rev()
            .find(|f| is_navigable(workspace, config, **f))
        {
            return Some(Location::Field(*field));
        }
    }
    None
}

fn first_field_or_input(
    workspace: &Workspace,
    config: &NavigationConfig,
    block: BlockId,
) -> Option<Location> {
    scan_forward(workspace, config, block, 0, 0)
}

fn field_position(workspace: &Workspace, field: FieldId) -> Option<(BlockId, usize, usize)> {
    let f = workspace.field(field)?;
    let input = workspace.block(f.source_block())?.inputs().get(f.parent_input())?;
    let index = input.fields().iter().position(|id| *id == field)?;
    Some((f.source_block(), f.parent_input(), index))
}

fn next_for_field(
    workspace: &Workspace,
    config: &NavigationConfig,
    field: FieldId,
) -> Option<Location> {
    let (block, row, index) = field_position(workspace, field)?;
    scan_forward(workspace, config, block, row, index + 1)
}

fn prev_for_field(
    workspace: &Workspace,
    config: &NavigationConfig,
    field: FieldId,
) -> Option<Location> {
    let (block, row, index) = field_position(workspace, field)?;
    scan_backward(workspace, config, block, row, index)
}

fn next_for_input(
    workspace: &Workspace,
    config: &NavigationConfig,
    connection: ConnectionId,
) -> Option<Location> {
    let c = workspace.connection(connection)?;
    scan_forward(workspace, config, c.source_block(), c.parent_input()? + 1, 0)
}

fn prev_for_input(
    workspace: &Workspace,
    config: &NavigationConfig,
    connection: ConnectionId,
) -> Option<Location> {
    let c = workspace.connection(connection)?;
    scan_backward(workspace, config, c.source_block(), c.parent_input()?, usize::MAX)
}
