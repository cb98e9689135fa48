//! Tests for location traversal and the cursor's movement rules.
mod common;
use common::*;
use kumiki::prelude::*;

/// `controls_if` at the origin with a boolean in `IF0`, a statement in
/// `DO0` and a statement after it, plus a second stack further down.
struct Program {
    ws: Workspace,
    if_block: BlockId,
    cond: BlockId,
    body: BlockId,
    after: BlockId,
    other: BlockId,
}

fn program() -> Program {
    let mut ws = create_workspace();
    let if_block = ws.new_block_at("controls_if", Coordinate::new(0.0, 0.0)).unwrap();
    let cond = ws.new_block("logic_boolean").unwrap();
    let body = ws.new_block("statement").unwrap();
    let after = ws.new_block("statement").unwrap();
    ws.connect(input_of(&ws, if_block, "IF0"), output_of(&ws, cond)).unwrap();
    ws.connect(input_of(&ws, if_block, "DO0"), previous_of(&ws, body)).unwrap();
    ws.connect(next_of(&ws, if_block), previous_of(&ws, after)).unwrap();
    let other = ws.new_block_at("statement", Coordinate::new(0.0, 300.0)).unwrap();
    Program {
        ws,
        if_block,
        cond,
        body,
        after,
        other,
    }
}

fn cursor_at(location: Location) -> Cursor {
    let mut cursor = Cursor::new();
    cursor.set_location(Some(location));
    cursor
}

#[test]
fn test_workspace_in_reaches_first_stack() {
    let p = program();
    let config = NavigationConfig::default();
    let origin = Location::on_workspace(&p.ws, Coordinate::new(0.0, 0.0));

    assert_eq!(origin.step_in(&p.ws, &config), Some(Location::Stack(p.if_block)));
    assert_eq!(origin.next(&p.ws, &config), None);
    assert_eq!(origin.step_out(&p.ws, &config), None);
}

#[test]
fn test_stacks_are_siblings_without_wrapping() {
    let p = program();
    let config = NavigationConfig::default();
    let first = Location::Stack(p.if_block);
    let second = Location::Stack(p.other);

    assert_eq!(first.next(&p.ws, &config), Some(second));
    assert_eq!(second.next(&p.ws, &config), None);
    assert_eq!(second.prev(&p.ws, &config), Some(first));
    assert_eq!(first.prev(&p.ws, &config), None);
}

#[test]
fn test_stack_in_and_out() {
    let p = program();
    let config = NavigationConfig::default();
    let stack = Location::Stack(p.if_block);

    assert_eq!(
        stack.step_in(&p.ws, &config),
        Some(connection_location(&p.ws, previous_of(&p.ws, p.if_block)))
    );
    assert_eq!(
        stack.step_out(&p.ws, &config),
        Some(Location::on_workspace(&p.ws, Coordinate::new(0.0, -20.0)))
    );
}

#[test]
fn test_cursor_in_from_previous_enters_block_rows() {
    let p = program();
    let config = NavigationConfig::default();
    let mut cursor = cursor_at(connection_location(&p.ws, previous_of(&p.ws, p.if_block)));

    assert!(cursor.step_in(&p.ws, &config));
    // The "if" label is skipped: only editable fields are stops.
    let if0 = input_of(&p.ws, p.if_block, "IF0");
    assert_eq!(
        cursor.location(),
        Some(Location::Connection {
            id: if0,
            role: ConnectionType::Input
        })
    );
}

#[test]
fn test_labels_are_stops_when_configured() {
    let p = program();
    let config = NavigationConfig {
        navigate_all_fields: true,
        ..Default::default()
    };
    let block = Location::Block(p.if_block);
    let label = p.ws.block(p.if_block).unwrap().inputs()[0].fields()[0];

    assert_eq!(block.step_in(&p.ws, &config), Some(Location::Field(label)));
    assert_eq!(
        Location::Field(label).next(&p.ws, &config),
        Some(connection_location(&p.ws, input_of(&p.ws, p.if_block, "IF0")))
    );
}

#[test]
fn test_inputs_are_siblings_on_their_block() {
    let p = program();
    let config = NavigationConfig::default();
    let if0 = connection_location(&p.ws, input_of(&p.ws, p.if_block, "IF0"));
    let do0 = connection_location(&p.ws, input_of(&p.ws, p.if_block, "DO0"));

    assert_eq!(if0.next(&p.ws, &config), Some(do0));
    assert_eq!(do0.next(&p.ws, &config), None);
    assert_eq!(do0.prev(&p.ws, &config), Some(if0));
    assert_eq!(if0.prev(&p.ws, &config), None);
    assert_eq!(if0.step_out(&p.ws, &config), Some(Location::Block(p.if_block)));
}

#[test]
fn test_value_input_in_and_back_out() {
    let p = program();
    let config = NavigationConfig::default();
    let if0 = input_of(&p.ws, p.if_block, "IF0");
    let mut cursor = cursor_at(connection_location(&p.ws, if0));

    assert!(cursor.step_in(&p.ws, &config));
    assert_eq!(
        cursor.location(),
        Some(connection_location(&p.ws, output_of(&p.ws, p.cond)))
    );

    // In from an output starts at the block, landing on its field.
    assert!(cursor.step_in(&p.ws, &config));
    let field = p.ws.block(p.cond).unwrap().inputs()[0].fields()[0];
    assert_eq!(cursor.location(), Some(Location::Field(field)));
    assert!(!cursor.step_in(&p.ws, &config));
    assert!(!cursor.next(&p.ws, &config));

    // Out of a field lands on the block, then moves on to its output.
    assert!(cursor.step_out(&p.ws, &config));
    assert_eq!(
        cursor.location(),
        Some(connection_location(&p.ws, output_of(&p.ws, p.cond)))
    );
    assert!(cursor.step_out(&p.ws, &config));
    assert_eq!(cursor.location(), Some(connection_location(&p.ws, if0)));
    assert!(cursor.step_out(&p.ws, &config));
    assert_eq!(
        cursor.location(),
        Some(connection_location(&p.ws, previous_of(&p.ws, p.if_block)))
    );
}

#[test]
fn test_walk_down_a_stack() {
    let p = program();
    let config = NavigationConfig::default();
    let mut cursor = cursor_at(connection_location(&p.ws, previous_of(&p.ws, p.if_block)));

    assert!(cursor.next(&p.ws, &config));
    assert_eq!(cursor.location(), Some(Location::Block(p.if_block)));
    assert!(cursor.next(&p.ws, &config));
    assert_eq!(
        cursor.location(),
        Some(connection_location(&p.ws, next_of(&p.ws, p.if_block)))
    );
    assert!(cursor.next(&p.ws, &config));
    assert_eq!(
        cursor.location(),
        Some(connection_location(&p.ws, previous_of(&p.ws, p.after)))
    );

    assert!(cursor.prev(&p.ws, &config));
    assert_eq!(
        cursor.location(),
        Some(connection_location(&p.ws, next_of(&p.ws, p.if_block)))
    );
}

#[test]
fn test_walk_ends_at_the_bottom() {
    let p = program();
    let config = NavigationConfig::default();
    let mut cursor = cursor_at(Location::Block(p.after));

    assert!(cursor.next(&p.ws, &config));
    assert!(!cursor.next(&p.ws, &config), "an unconnected next has no successor");
    assert_eq!(
        cursor.location(),
        Some(connection_location(&p.ws, next_of(&p.ws, p.after)))
    );
}

#[test]
fn test_statement_body_in_and_out() {
    let p = program();
    let config = NavigationConfig::default();
    let do0 = connection_location(&p.ws, input_of(&p.ws, p.if_block, "DO0"));
    let body_top = connection_location(&p.ws, previous_of(&p.ws, p.body));

    assert_eq!(do0.step_in(&p.ws, &config), Some(body_top));
    // Back to the statement input is an "out", not a "previous".
    assert_eq!(body_top.prev(&p.ws, &config), None);
    assert_eq!(body_top.step_out(&p.ws, &config), Some(do0));
}

#[test]
fn test_out_of_a_chain_reaches_its_stack() {
    let p = program();
    let config = NavigationConfig::default();
    let bottom = connection_location(&p.ws, next_of(&p.ws, p.after));

    assert_eq!(bottom.step_out(&p.ws, &config), Some(Location::Stack(p.if_block)));
}

#[test]
fn test_traversal_is_loop_free() {
    let p = program();
    let config = NavigationConfig::default();
    let mut cursor = cursor_at(Location::Stack(p.if_block));
    let mut steps = 0;
    while cursor.next(&p.ws, &config) {
        steps += 1;
        assert!(steps < 10);
    }
    assert_eq!(cursor.location(), Some(Location::Stack(p.other)));
}

#[test]
fn test_set_location_controls_visibility() {
    let p = program();
    let mut cursor = cursor_at(Location::Block(p.cond));
    assert!(cursor.is_visible());

    cursor.hide();
    assert!(!cursor.is_visible());
    assert_eq!(cursor.location(), Some(Location::Block(p.cond)));

    cursor.set_location(None);
    assert!(!cursor.is_visible());
    assert_eq!(cursor.location(), None);
}

#[test]
fn test_stale_locations_do_not_move() {
    let mut p = program();
    let config = NavigationConfig::default();
    let location = connection_location(&p.ws, output_of(&p.ws, p.cond));
    p.ws.delete_block(p.cond).unwrap();

    assert!(!location.is_valid(&p.ws));
    let mut cursor = cursor_at(location);
    assert!(!cursor.step_out(&p.ws, &config));
    assert!(!cursor.step_in(&p.ws, &config));
}

#[test]
fn test_display_location() {
    let p = program();
    let if0 = connection_location(&p.ws, input_of(&p.ws, p.if_block, "IF0"));
    let text = DisplayLocation {
        location: &if0,
        workspace: &p.ws,
    }
    .to_string();
    assert!(text.starts_with("input connection"));
    assert!(text.contains("\"IF0\""));
    assert!(text.contains("controls_if"));
}

#[test]
fn test_display_workspace_prints_nested_blocks() {
    let p = program();
    let text = DisplayWorkspace {
        workspace: &p.ws,
        cursor: Some(p.body),
    }
    .to_string();
    assert!(text.contains("controls_if"));
    assert!(text.contains("IF0"));
    assert!(text.contains("[BOOL=TRUE]"));
    assert!(text.contains("(statement) <"));
    assert_eq!(text.matches("stack at").count(), 2);
}
