//! Integration tests for the press/drag/release cycle.

use exprtree::domain::{DragError, DragSession, ExprArena, ExpressionParser};
use exprtree::util::testing::init_test_setup;

fn session(input: &str) -> DragSession {
    init_test_setup();
    DragSession::new(ExpressionParser::new().parse(input).unwrap()).unwrap()
}

#[test]
fn given_focused_term_when_dragging_and_dropping_then_tree_is_rearranged() {
    let mut session = session("a+b+c");
    let a = session.focus_child(0).unwrap();
    assert_eq!(session.focused(), a);

    assert_eq!(session.begin_drag().unwrap(), 3);
    assert!(session.is_dragging());
    assert_eq!(session.chosen().and_then(|p| p.slot()), Some(0));

    // Host metric: the pointer is over the last slot
    let chosen = session.update(|p| if p.slot() == Some(2) { 0.0 } else { 10.0 });
    assert_eq!(chosen, Some(2));

    let focus = session.drop_focused().unwrap();
    assert!(!session.is_dragging());
    assert_eq!(session.tree().to_infix(), "b+c+a");
    assert_eq!(session.tree().ghost(), None);
    assert_eq!(session.focused(), focus);
    assert_eq!(session.tree().path_of(focus), Some(vec![2]));
}

#[test]
fn given_nested_focus_when_dropping_then_only_that_level_changes() {
    let mut session = session("4*(z+5*x)");
    session.focus_child(1).unwrap();
    session.focus_child(0).unwrap();
    session.focus_child(1).unwrap();

    session.begin_drag().unwrap();
    session.update(|p| p.slot().map_or(f64::NAN, |slot| slot as f64));
    session.drop_focused().unwrap();

    assert_eq!(session.tree().to_infix(), "4*(5*x+z)");
}

#[test]
fn given_drag_without_update_when_dropping_then_tree_is_unchanged() {
    let mut session = session("x*y*z");
    session.focus_child(1).unwrap();
    session.begin_drag().unwrap();
    session.drop_focused().unwrap();
    assert_eq!(session.into_tree().to_infix(), "x*y*z");
}

#[test]
fn given_root_focus_when_beginning_drag_then_root_not_movable() {
    let mut session = session("a+b");
    assert_eq!(session.begin_drag(), Err(DragError::RootNotMovable));
    assert!(!session.is_dragging());
}

#[test]
fn given_active_drag_when_refocusing_then_rejected() {
    let mut session = session("a+b");
    let b = session.focus_child(1).unwrap();
    session.begin_drag().unwrap();

    assert_eq!(session.begin_drag(), Err(DragError::DragInProgress));
    assert_eq!(session.focus_child(0), Err(DragError::DragInProgress));
    assert_eq!(session.focus_parent(), None);
    assert_eq!(session.focused(), b);
}

#[test]
fn given_cancelled_drag_when_dropping_then_not_dragging() {
    let mut session = session("a+b+c");
    session.focus_child(2).unwrap();
    session.begin_drag().unwrap();
    session.update(|p| p.slot().unwrap_or(0) as f64);
    session.cancel();

    assert_eq!(session.drop_focused(), Err(DragError::NotDragging));
    assert!(session.candidates().is_empty());
    assert_eq!(session.tree().to_infix(), "a+b+c");
}

#[test]
fn given_navigation_when_moving_focus_then_follows_links() {
    let mut session = session("a+b*c");
    let root = session.focused();
    assert_eq!(session.focus_child(5), Err(DragError::UnknownNode));

    let product = session.focus_child(1).unwrap();
    session.focus_child(0).unwrap();
    assert_eq!(session.focus_parent(), Some(product));
    assert_eq!(session.focus_parent(), Some(root));
    assert_eq!(session.focus_parent(), None);
}

#[test]
fn given_empty_tree_when_starting_session_then_empty_tree_error() {
    assert!(matches!(
        DragSession::new(ExprArena::new()),
        Err(DragError::EmptyTree)
    ));
}

#[test]
fn given_node_of_same_shaped_tree_when_focusing_then_unknown_node() {
    let mut session = session("a+b");
    let other = ExpressionParser::new().parse("x+y").unwrap();
    let y = other.node_at_path(&[1]).unwrap();
    let root = session.focused();

    assert_eq!(session.focus(other.id(), y), Err(DragError::UnknownNode));
    assert_eq!(session.focused(), root);

    let b = session.tree().node_at_path(&[1]).unwrap();
    let tree_id = session.tree().id();
    assert_eq!(session.focus(tree_id, b), Ok(()));
    assert_eq!(session.focused(), b);
}

#[test]
fn given_handle_from_before_drop_when_focusing_then_unknown_node() {
    let mut session = session("a+b+c");
    let before = session.tree().id();
    let a = session.focus_child(0).unwrap();
    session.begin_drag().unwrap();
    session.drop_focused().unwrap();

    assert_ne!(session.tree().id(), before);
    assert_eq!(session.focus(before, a), Err(DragError::UnknownNode));
}
