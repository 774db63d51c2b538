use gridkit_designer::{format_operation, Operation, OperationType, UndoRedoManager};
use proptest::prelude::*;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

fn op(n: usize) -> Operation {
    Operation::new(
        OperationType::Transform,
        format!("op {}", n),
        "panel-0-0",
        json!({ "step": n }),
        json!({ "step": n + 1 }),
    )
}

fn descriptions(ops: &[Operation]) -> Vec<String> {
    ops.iter().map(|o| o.description.clone()).collect()
}

#[test]
fn test_undo_redo_manager_creation() {
    let manager = UndoRedoManager::new(50);
    assert!(!manager.can_undo());
    assert!(!manager.can_redo());
    assert_eq!(manager.undo_depth(), 0);
    assert_eq!(manager.redo_depth(), 0);
    assert_eq!(manager.max_stack_size(), 50);
    assert_eq!(UndoRedoManager::default().max_stack_size(), 50);
}

#[test]
fn test_undo_returns_operation_for_caller() {
    let mut manager = UndoRedoManager::new(50);
    let pushed = op(1);
    manager.push_operation(pushed.clone());

    let undone = manager.undo().unwrap();
    assert_eq!(undone, pushed);
    assert_eq!(undone.before, json!({ "step": 1 }));
    assert!(manager.can_redo());

    let redone = manager.redo().unwrap();
    assert_eq!(redone, pushed);
    assert!(!manager.can_redo());
}

#[test]
fn test_empty_stacks_return_none() {
    let mut manager = UndoRedoManager::new(5);
    assert!(manager.undo().is_none());
    assert!(manager.redo().is_none());
}

#[test]
fn test_push_clears_redo() {
    let mut manager = UndoRedoManager::new(50);
    manager.push_operation(op(1));
    manager.push_operation(op(2));
    manager.undo();
    assert!(manager.can_redo());

    manager.push_operation(op(3));
    assert!(!manager.can_redo());
    assert_eq!(descriptions(manager.undo_stack()), vec!["op 1", "op 3"]);
}

#[test]
fn test_bound_of_two_keeps_newest() {
    let mut manager = UndoRedoManager::new(2);
    manager.push_operation(op(1));
    manager.push_operation(op(2));
    manager.push_operation(op(3));
    assert_eq!(descriptions(manager.undo_stack()), vec!["op 2", "op 3"]);
}

#[test]
fn test_set_max_stack_size_applies_on_next_push() {
    let mut manager = UndoRedoManager::new(10);
    for n in 0..5 {
        manager.push_operation(op(n));
    }
    manager.set_max_stack_size(2);
    assert_eq!(manager.undo_depth(), 5);

    manager.push_operation(op(5));
    assert_eq!(descriptions(manager.undo_stack()), vec!["op 4", "op 5"]);
}

#[test]
fn test_clear_history() {
    let mut manager = UndoRedoManager::new(10);
    manager.push_operation(op(1));
    manager.push_operation(op(2));
    manager.undo();
    manager.clear_history();
    assert!(!manager.can_undo());
    assert!(!manager.can_redo());
}

#[test]
fn test_peek_descriptions() {
    let mut manager = UndoRedoManager::new(10);
    assert_eq!(manager.peek_undo(), None);
    manager.push_operation(op(1));
    manager.push_operation(op(2));
    assert_eq!(manager.peek_undo(), Some("op 2"));
    manager.undo();
    assert_eq!(manager.peek_undo(), Some("op 1"));
    assert_eq!(manager.peek_redo(), Some("op 2"));
}

#[test]
fn test_subscribers_see_depths() {
    let mut manager = UndoRedoManager::new(10);
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    manager.subscribe(move |state| {
        sink.borrow_mut()
            .push((state.undo_stack.len(), state.redo_stack.len()))
    });
    manager.push_operation(op(1));
    manager.undo();
    manager.redo();
    assert_eq!(*log.borrow(), vec![(0, 0), (1, 0), (0, 1), (1, 0)]);
}

#[test]
fn test_operation_serializes() {
    let original = op(7);
    let json = serde_json::to_string(&original).unwrap();
    assert!(json.contains("\"op_type\":\"transform\""));
    let parsed: Operation = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, original);
}

#[test]
fn test_format_operation() {
    let operation = op(1);
    let text = format_operation(&operation);
    assert!(text.starts_with('['));
    assert!(text.ends_with("Transform (panel-0-0): op 1"));
    assert_eq!(text, operation.to_string());
}

proptest! {
    #[test]
    fn prop_undo_then_redo_round_trips(count in 1usize..30, undos in 0usize..30) {
        let mut manager = UndoRedoManager::new(100);
        for n in 0..count {
            manager.push_operation(op(n));
        }
        let snapshot = manager.undo_stack().to_vec();
        let undos = undos.min(count);
        for _ in 0..undos {
            prop_assert!(manager.undo().is_some());
        }
        for _ in 0..undos {
            prop_assert!(manager.redo().is_some());
        }
        prop_assert_eq!(manager.undo_stack(), snapshot.as_slice());
        prop_assert!(!manager.can_redo());
    }

    #[test]
    fn prop_history_never_exceeds_bound(bound in 1usize..20, count in 0usize..60) {
        let mut manager = UndoRedoManager::new(bound);
        for n in 0..count {
            manager.push_operation(op(n));
            prop_assert!(manager.undo_depth() <= bound);
        }
        let expected: Vec<String> = (count.saturating_sub(bound)..count)
            .map(|n| format!("op {}", n))
            .collect();
        prop_assert_eq!(descriptions(manager.undo_stack()), expected);
    }

    #[test]
    fn prop_push_after_undo_invalidates_redo(count in 1usize..10, undos in 1usize..10) {
        let mut manager = UndoRedoManager::new(100);
        for n in 0..count {
            manager.push_operation(op(n));
        }
        for _ in 0..undos.min(count) {
            manager.undo();
        }
        manager.push_operation(op(999));
        prop_assert!(!manager.can_redo());
        prop_assert!(manager.redo().is_none());
    }
}
