//! Common test utilities for building block definitions, workspaces and
//! navigation sessions.
use kumiki::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

/// Every diagnostic a navigator reported, in order.
pub type Logs = Rc<RefCell<Vec<(LogLevel, String)>>>;

/// The block types shared by the tests.
///
/// - `statement`: previous + next, nothing else.
/// - `controls_if`: previous + next, a Boolean value input `IF0` behind an
///   "if" label and a statement input `DO0`.
/// - `logic_boolean`: Boolean output with an editable `BOOL` field.
/// - `logic_negate`: Boolean output with a single Boolean input `BOOL`.
/// - `math_number`: Number output with an editable `NUM` field.
/// - `math_arithmetic`: Number output with Number inputs `A` and `B`.
/// - `text_print`: previous + next, an unchecked value input `TEXT`.
/// - `hat`: a next connection only.
#[allow(dead_code)]
pub fn block_definitions() -> Vec<BlockDefinition> {
    vec![
        BlockDefinition::new("statement").with_previous(None).with_next(None),
        BlockDefinition::new("controls_if")
            .with_previous(None)
            .with_next(None)
            .with_input(
                InputDefinition::value("IF0")
                    .with_check(&["Boolean"])
                    .with_label("if"),
            )
            .with_input(
                InputDefinition::statement("DO0")
                    .with_label("do")
                    .with_offset(Coordinate::new(20.0, 30.0)),
            ),
        BlockDefinition::new("logic_boolean")
            .with_output(Some(&["Boolean"]))
            .with_input(InputDefinition::dummy("").with_field("BOOL", "TRUE")),
        BlockDefinition::new("logic_negate")
            .with_output(Some(&["Boolean"]))
            .with_input(
                InputDefinition::value("BOOL")
                    .with_check(&["Boolean"])
                    .with_label("not"),
            ),
        BlockDefinition::new("math_number")
            .with_output(Some(&["Number"]))
            .with_input(InputDefinition::dummy("").with_field("NUM", "0")),
        BlockDefinition::new("math_arithmetic")
            .with_output(Some(&["Number"]))
            .with_input(InputDefinition::value("A").with_check(&["Number"]))
            .with_input(
                InputDefinition::value("B")
                    .with_check(&["Number"])
                    .with_field("OP", "ADD")
                    .with_offset(Coordinate::new(60.0, 0.0)),
            ),
        BlockDefinition::new("text_print")
            .with_previous(None)
            .with_next(None)
            .with_input(InputDefinition::value("TEXT").with_label("print")),
        BlockDefinition::new("hat").with_next(None),
    ]
}

#[allow(dead_code)]
pub fn create_workspace() -> Workspace {
    Workspace::builder()
        .with_definitions(block_definitions())
        .build()
}

/// A navigator over `workspace` whose diagnostics are captured.
#[allow(dead_code)]
pub fn create_navigator(workspace: Workspace) -> (Navigator, Logs) {
    let logs: Logs = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&logs);
    let navigator = Navigator::builder(workspace)
        .with_logging_callback(Box::new(move |level, message| {
            sink.borrow_mut().push((level, message.to_string()));
        }))
        .build();
    (navigator, logs)
}

/// A navigator with a two-level toolbox:
/// Logic (`controls_if`, `logic_boolean`), Math with children Numbers
/// (`math_number`) and Operators (`math_arithmetic`), and Text
/// (`text_print`).
#[allow(dead_code)]
pub fn create_navigator_with_toolbox(workspace: Workspace) -> (Navigator, Logs) {
    let toolbox = Toolbox::new(vec![
        Category::new("Logic")
            .with_block("controls_if")
            .with_block("logic_boolean"),
        Category::new("Math")
            .with_child(Category::new("Numbers").with_block("math_number"))
            .with_child(Category::new("Operators").with_block("math_arithmetic")),
        Category::new("Text").with_block("text_print"),
    ]);
    let logs: Logs = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&logs);
    let navigator = Navigator::builder(workspace)
        .with_toolbox(toolbox)
        .with_logging_callback(Box::new(move |level, message| {
            sink.borrow_mut().push((level, message.to_string()));
        }))
        .build();
    (navigator, logs)
}

/// A navigator for a toolbox-less editor whose flyout shows `types`.
#[allow(dead_code)]
pub fn create_navigator_with_flyout(workspace: Workspace, types: &[&str]) -> (Navigator, Logs) {
    let mut flyout = Flyout::new(block_definitions(), 24.0);
    flyout.show(types).expect("flyout types are registered");
    let logs: Logs = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&logs);
    let navigator = Navigator::builder(workspace)
        .with_flyout(flyout)
        .with_logging_callback(Box::new(move |level, message| {
            sink.borrow_mut().push((level, message.to_string()));
        }))
        .build();
    (navigator, logs)
}

#[allow(dead_code)]
pub fn previous_of(workspace: &Workspace, block: BlockId) -> ConnectionId {
    workspace.block(block).unwrap().previous_connection().unwrap()
}

#[allow(dead_code)]
pub fn next_of(workspace: &Workspace, block: BlockId) -> ConnectionId {
    workspace.block(block).unwrap().next_connection().unwrap()
}

#[allow(dead_code)]
pub fn output_of(workspace: &Workspace, block: BlockId) -> ConnectionId {
    workspace.block(block).unwrap().output_connection().unwrap()
}

#[allow(dead_code)]
pub fn input_of(workspace: &Workspace, block: BlockId, name: &str) -> ConnectionId {
    workspace
        .block(block)
        .unwrap()
        .input(name)
        .unwrap()
        .connection()
        .unwrap()
}

#[allow(dead_code)]
pub fn connection_location(workspace: &Workspace, connection: ConnectionId) -> Location {
    Location::for_connection(workspace, connection).unwrap()
}

/// Everything a keyboard action may change about the graph: each block's
/// parent and position, and each connection's target.
#[allow(dead_code)]
pub fn snapshot(
    workspace: &Workspace,
) -> Vec<(BlockId, Option<BlockId>, Coordinate, Vec<Option<ConnectionId>>)> {
    let mut blocks: Vec<BlockId> = workspace
        .top_blocks(false)
        .into_iter()
        .flat_map(|top| workspace.descendants(top))
        .collect();
    blocks.sort();
    blocks
        .into_iter()
        .map(|id| {
            let block = workspace.block(id).unwrap();
            let targets = block.connections().map(|c| workspace.target(c)).collect();
            (id, block.parent(), block.position(), targets)
        })
        .collect()
}

#[allow(dead_code)]
pub fn warnings(logs: &Logs) -> Vec<String> {
    logs.borrow()
        .iter()
        .filter(|(level, _)| *level == LogLevel::Warn)
        .map(|(_, message)| message.clone())
        .collect()
}
