//! Tests for the connection graph: joins, orphans, deletion and reshaping.
mod common;
use common::*;
use kumiki::graph::GraphEvent;
use kumiki::prelude::*;

#[test]
fn test_connect_is_symmetric_and_aligns_child() {
    let mut ws = create_workspace();
    let a = ws.new_block_at("statement", Coordinate::new(0.0, 0.0)).unwrap();
    let b = ws.new_block_at("statement", Coordinate::new(100.0, 100.0)).unwrap();

    ws.connect(next_of(&ws, a), previous_of(&ws, b)).unwrap();

    assert_eq!(ws.target(next_of(&ws, a)), Some(previous_of(&ws, b)));
    assert_eq!(ws.target(previous_of(&ws, b)), Some(next_of(&ws, a)));
    assert_eq!(ws.parent(b), Some(a));
    assert_eq!(ws.top_blocks(false), vec![a]);
    assert_eq!(ws.block(b).unwrap().position(), Coordinate::new(0.0, 40.0));
}

#[test]
fn test_connect_order_of_arguments_does_not_matter() {
    let mut ws = create_workspace();
    let a = ws.new_block("statement").unwrap();
    let b = ws.new_block("statement").unwrap();

    ws.connect(previous_of(&ws, b), next_of(&ws, a)).unwrap();
    assert_eq!(ws.parent(b), Some(a));
    assert_eq!(ws.children(a), vec![b]);
}

#[test]
fn test_connect_rejects_same_wire_type() {
    let mut ws = create_workspace();
    let a = ws.new_block("statement").unwrap();
    let b = ws.new_block("statement").unwrap();
    let before = snapshot(&ws);

    let result = ws.connect(next_of(&ws, a), next_of(&ws, b));
    assert!(matches!(
        result,
        Err(GraphError::Incompatible(ConnectionError::WrongType { .. }))
    ));
    assert_eq!(snapshot(&ws), before);
}

#[test]
fn test_connect_rejects_mismatched_checks() {
    let mut ws = create_workspace();
    let if_block = ws.new_block("controls_if").unwrap();
    let number = ws.new_block("math_number").unwrap();

    let result = ws.connect(input_of(&ws, if_block, "IF0"), output_of(&ws, number));
    assert_eq!(
        result,
        Err(GraphError::Incompatible(ConnectionError::ChecksFailed {
            superior: vec!["Boolean".to_string()],
            inferior: vec!["Number".to_string()],
        }))
    );
    assert_eq!(ws.parent(number), None);
}

#[test]
fn test_connect_rejects_self_connection() {
    let mut ws = create_workspace();
    let a = ws.new_block("statement").unwrap();
    let result = ws.can_connect(next_of(&ws, a), previous_of(&ws, a));
    assert_eq!(result, Err(ConnectionError::SelfConnection));
}

#[test]
fn test_connect_rejects_cycle() {
    let mut ws = create_workspace();
    let a = ws.new_block("statement").unwrap();
    let b = ws.new_block("statement").unwrap();
    ws.connect(next_of(&ws, a), previous_of(&ws, b)).unwrap();
    ws.drain_events();
    let before = snapshot(&ws);

    let result = ws.connect(next_of(&ws, b), previous_of(&ws, a));
    assert_eq!(
        result,
        Err(GraphError::Incompatible(ConnectionError::WouldCreateCycle(b, a)))
    );
    assert_eq!(snapshot(&ws), before);
    assert_eq!(ws.root(b), a);
    assert!(ws.drain_events().is_empty());
}

#[test]
fn test_connect_rejects_cycle_through_value_inputs() {
    let mut ws = create_workspace();
    let outer = ws.new_block("logic_negate").unwrap();
    let middle = ws.new_block("logic_negate").unwrap();
    let inner = ws.new_block("logic_negate").unwrap();
    ws.connect(input_of(&ws, outer, "BOOL"), output_of(&ws, middle)).unwrap();
    ws.connect(input_of(&ws, middle, "BOOL"), output_of(&ws, inner)).unwrap();
    let before = snapshot(&ws);

    let result = ws.connect(input_of(&ws, inner, "BOOL"), output_of(&ws, outer));
    assert!(matches!(
        result,
        Err(GraphError::Incompatible(ConnectionError::WouldCreateCycle(parent, child)))
            if parent == inner && child == outer
    ));
    assert_eq!(snapshot(&ws), before);
    assert_eq!(ws.descendants(outer), vec![outer, middle, inner]);
}

#[test]
fn test_shadow_parent_rejects_real_child() {
    let mut ws = create_workspace();
    let shadow = ws.new_shadow_block("math_arithmetic").unwrap();
    let number = ws.new_block("math_number").unwrap();
    let result = ws.can_connect(input_of(&ws, shadow, "A"), output_of(&ws, number));
    assert_eq!(result, Err(ConnectionError::ShadowParent));
}

#[test]
fn test_statement_orphan_is_reattached_below_new_child() {
    let mut ws = create_workspace();
    let a = ws.new_block("statement").unwrap();
    let b = ws.new_block("statement").unwrap();
    let c = ws.new_block("statement").unwrap();
    ws.connect(next_of(&ws, a), previous_of(&ws, b)).unwrap();

    ws.connect(next_of(&ws, a), previous_of(&ws, c)).unwrap();

    assert_eq!(ws.next_block(a), Some(c));
    assert_eq!(ws.next_block(c), Some(b));
    assert_eq!(ws.top_blocks(false), vec![a]);
}

#[test]
fn test_value_orphan_is_bumped_when_it_cannot_be_reattached() {
    let mut ws = create_workspace();
    let if_block = ws.new_block_at("controls_if", Coordinate::new(0.0, 0.0)).unwrap();
    let first = ws.new_block("logic_boolean").unwrap();
    let second = ws.new_block("logic_boolean").unwrap();
    let if0 = input_of(&ws, if_block, "IF0");
    ws.connect(if0, output_of(&ws, first)).unwrap();

    ws.connect(if0, output_of(&ws, second)).unwrap();

    assert_eq!(ws.target(if0), Some(output_of(&ws, second)));
    assert_eq!(ws.parent(first), None);
    assert_eq!(ws.block(first).unwrap().position(), Coordinate::new(28.0, 28.0));
}

#[test]
fn test_value_orphan_moves_into_single_compatible_input() {
    let mut ws = create_workspace();
    let print = ws.new_block("text_print").unwrap();
    let boolean = ws.new_block("logic_boolean").unwrap();
    let negate = ws.new_block("logic_negate").unwrap();
    let text = input_of(&ws, print, "TEXT");
    ws.connect(text, output_of(&ws, boolean)).unwrap();

    ws.connect(text, output_of(&ws, negate)).unwrap();

    assert_eq!(ws.target_block(text), Some(negate));
    assert_eq!(ws.parent(boolean), Some(negate));
    assert_eq!(ws.target_block(input_of(&ws, negate, "BOOL")), Some(boolean));
}

#[test]
fn test_value_orphan_is_bumped_when_several_inputs_fit() {
    let mut ws = create_workspace();
    let print = ws.new_block("text_print").unwrap();
    let number = ws.new_block("math_number").unwrap();
    let sum = ws.new_block("math_arithmetic").unwrap();
    let text = input_of(&ws, print, "TEXT");
    ws.connect(text, output_of(&ws, number)).unwrap();

    ws.connect(text, output_of(&ws, sum)).unwrap();

    assert_eq!(ws.target_block(text), Some(sum));
    assert_eq!(ws.parent(number), None);
}

#[test]
fn test_shadow_orphan_is_deleted() {
    let mut ws = create_workspace();
    let sum = ws.new_block("math_arithmetic").unwrap();
    let shadow = ws.new_shadow_block("math_number").unwrap();
    let a = input_of(&ws, sum, "A");
    ws.connect(a, output_of(&ws, shadow)).unwrap();
    let real = ws.new_block("math_number").unwrap();

    ws.connect(a, output_of(&ws, real)).unwrap();

    assert!(!ws.contains_block(shadow));
    assert_eq!(ws.target_block(a), Some(real));
}

#[test]
fn test_disconnect_makes_child_a_top_block() {
    let mut ws = create_workspace();
    let a = ws.new_block("statement").unwrap();
    let b = ws.new_block("statement").unwrap();
    ws.connect(next_of(&ws, a), previous_of(&ws, b)).unwrap();
    let position = ws.block(b).unwrap().position();

    ws.disconnect(previous_of(&ws, b)).unwrap();

    assert_eq!(ws.parent(b), None);
    assert_eq!(ws.target(next_of(&ws, a)), None);
    assert_eq!(ws.block(b).unwrap().position(), position);
    assert_eq!(ws.top_blocks(false), vec![a, b]);
    assert_eq!(
        ws.disconnect(previous_of(&ws, b)),
        Err(GraphError::NotConnected(previous_of(&ws, b)))
    );
}

#[test]
fn test_move_translates_subtree() {
    let mut ws = create_workspace();
    let a = ws.new_block("statement").unwrap();
    let b = ws.new_block("statement").unwrap();
    ws.connect(next_of(&ws, a), previous_of(&ws, b)).unwrap();

    ws.move_to(a, Coordinate::new(10.0, 20.0)).unwrap();

    assert_eq!(ws.block(a).unwrap().position(), Coordinate::new(10.0, 20.0));
    assert_eq!(ws.block(b).unwrap().position(), Coordinate::new(10.0, 60.0));
}

#[test]
fn test_delete_removes_whole_subtree() {
    let mut ws = create_workspace();
    let a = ws.new_block("controls_if").unwrap();
    let b = ws.new_block("logic_boolean").unwrap();
    let c = ws.new_block("statement").unwrap();
    ws.connect(input_of(&ws, a, "IF0"), output_of(&ws, b)).unwrap();
    ws.connect(next_of(&ws, a), previous_of(&ws, c)).unwrap();
    ws.drain_events();

    ws.delete_block(a).unwrap();

    assert!(ws.is_empty());
    let deleted: Vec<_> = ws
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            GraphEvent::Deleted { block } => Some(block),
            _ => None,
        })
        .collect();
    assert_eq!(deleted.len(), 3);
    assert!(deleted.contains(&c));
}

#[test]
fn test_delete_child_keeps_parent() {
    let mut ws = create_workspace();
    let a = ws.new_block("statement").unwrap();
    let b = ws.new_block("statement").unwrap();
    ws.connect(next_of(&ws, a), previous_of(&ws, b)).unwrap();

    ws.delete_block(b).unwrap();

    assert_eq!(ws.block_count(), 1);
    assert_eq!(ws.target(next_of(&ws, a)), None);
}

#[test]
fn test_descendants_are_depth_first_with_self_first() {
    let mut ws = create_workspace();
    let a = ws.new_block("controls_if").unwrap();
    let cond = ws.new_block("logic_boolean").unwrap();
    let body = ws.new_block("statement").unwrap();
    let after = ws.new_block("statement").unwrap();
    ws.connect(input_of(&ws, a, "IF0"), output_of(&ws, cond)).unwrap();
    ws.connect(input_of(&ws, a, "DO0"), previous_of(&ws, body)).unwrap();
    ws.connect(next_of(&ws, a), previous_of(&ws, after)).unwrap();

    assert_eq!(ws.descendants(a), vec![a, cond, body, after]);
    assert_eq!(ws.root(body), a);
}

#[test]
fn test_top_blocks_are_ordered_by_tilted_rows() {
    let mut ws = create_workspace();
    let low = ws.new_block_at("statement", Coordinate::new(0.0, 100.0)).unwrap();
    let high = ws.new_block_at("statement", Coordinate::new(0.0, 0.0)).unwrap();
    let right = ws.new_block_at("statement", Coordinate::new(500.0, 10.0)).unwrap();

    assert_eq!(ws.top_blocks(false), vec![low, high, right]);
    assert_eq!(ws.top_blocks(true), vec![high, right, low]);
}

#[test]
fn test_set_inputs_keeps_matching_children_and_bumps_the_rest() {
    let mut ws = create_workspace();
    let if_block = ws.new_block("controls_if").unwrap();
    let cond = ws.new_block("logic_boolean").unwrap();
    let body = ws.new_block("statement").unwrap();
    let if0 = input_of(&ws, if_block, "IF0");
    ws.connect(if0, output_of(&ws, cond)).unwrap();
    ws.connect(input_of(&ws, if_block, "DO0"), previous_of(&ws, body)).unwrap();

    ws.set_inputs(
        if_block,
        &[
            InputDefinition::value("IF0").with_check(&["Boolean"]),
            InputDefinition::statement("ELSE"),
        ],
    )
    .unwrap();

    assert_eq!(input_of(&ws, if_block, "IF0"), if0);
    assert_eq!(ws.target_block(if0), Some(cond));
    assert_eq!(ws.parent(body), None);
    assert!(ws.block(if_block).unwrap().input("DO0").is_none());
    assert!(ws.drain_events().contains(&GraphEvent::Mutated { block: if_block }));
}

#[test]
fn test_copy_block_from_other_workspace() {
    let mut source = create_workspace();
    let if_block = source.new_block("controls_if").unwrap();
    let cond = source.new_block("logic_boolean").unwrap();
    source
        .connect(input_of(&source, if_block, "IF0"), output_of(&source, cond))
        .unwrap();

    let mut target = create_workspace();
    target.new_block("statement").unwrap();
    let copy = target.copy_block_from(&source, if_block).unwrap();

    assert_eq!(target.block_count(), 3);
    assert_eq!(target.block(copy).unwrap().type_name(), "controls_if");
    let copied_cond = target.target_block(input_of(&target, copy, "IF0")).unwrap();
    assert_eq!(target.block(copied_cond).unwrap().type_name(), "logic_boolean");
    assert_eq!(target.parent(copied_cond), Some(copy));
    assert_eq!(target.top_blocks(false).len(), 2);
}

#[test]
fn test_unknown_block_type() {
    let mut ws = create_workspace();
    assert_eq!(
        ws.new_block("nope"),
        Err(GraphError::UnknownBlockType("nope".to_string()))
    );
}
