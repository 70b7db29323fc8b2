use layout_editor_core::{
    Command, CursorCommand, EditorStateManager, FacilityLayout, GridPosition, GridSize,
    HistoryCommand, LayoutCommand, ObjectKind, StateChange, StateChangeType,
};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};

fn manager(width: u32, height: u32) -> EditorStateManager {
    EditorStateManager::with_layout(
        FacilityLayout::new("Hall", "study", GridSize::new(width, height)).unwrap(),
    )
}

fn recorded(manager: &mut EditorStateManager) -> Arc<Mutex<Vec<StateChange>>> {
    let changes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&changes);
    manager.subscribe(move |change| sink.lock().unwrap().push(change.clone()));
    changes
}

fn kinds(changes: &Arc<Mutex<Vec<StateChange>>>) -> Vec<StateChangeType> {
    changes
        .lock()
        .unwrap()
        .iter()
        .map(|change| change.change_type)
        .collect()
}

#[test]
fn test_layout_changes_carry_new_layout_and_versions() {
    let mut manager = manager(3, 3);
    let changes = recorded(&mut manager);

    manager
        .execute(Command::Layout(LayoutCommand::Place {
            kind: ObjectKind::Seat,
        }))
        .unwrap();

    let changes = changes.lock().unwrap();
    assert_eq!(changes.len(), 1);
    let change = &changes[0];
    assert_eq!(change.change_type, StateChangeType::LayoutModified);
    assert_eq!((change.old_version, change.new_version), (0, 1));
    let layout = change.layout.as_ref().unwrap();
    assert_eq!(layout.objects.len(), 1);
    assert_eq!(manager.version(), 1);
}

#[test]
fn test_no_op_commands_do_not_notify() {
    let mut manager = manager(3, 3);
    let changes = recorded(&mut manager);

    // Nothing to delete, cursor already at the top-left edge
    manager
        .execute(Command::Layout(LayoutCommand::Delete))
        .unwrap();
    manager
        .execute(Command::Cursor(CursorCommand::MoveBy { dx: -1, dy: -1 }))
        .unwrap();
    manager
        .execute(Command::Cursor(CursorCommand::ClearSelection))
        .unwrap();

    assert!(changes.lock().unwrap().is_empty());
    assert_eq!(manager.version(), 0);
    assert!(!manager.is_modified());
}

#[test]
fn test_cursor_and_selection_changes_are_distinguished() {
    let mut manager = manager(4, 4);
    let changes = recorded(&mut manager);

    manager
        .execute(Command::Cursor(CursorCommand::MoveBy { dx: 1, dy: 0 }))
        .unwrap();
    manager
        .execute(Command::Cursor(CursorCommand::ExtendSelection { dx: 1, dy: 1 }))
        .unwrap();
    manager
        .execute(Command::Cursor(CursorCommand::ClearSelection))
        .unwrap();

    assert_eq!(
        kinds(&changes),
        vec![
            StateChangeType::CursorMoved,
            StateChangeType::SelectionChanged,
            StateChangeType::SelectionChanged,
        ]
    );
    assert_eq!(manager.version(), 3);
}

#[test]
fn test_keyboard_range_selection_then_place() {
    let mut manager = manager(5, 5);
    manager
        .execute(Command::Cursor(CursorCommand::MoveTo {
            position: GridPosition::new(1, 1),
        }))
        .unwrap();
    for _ in 0..2 {
        manager
            .execute(Command::Cursor(CursorCommand::ExtendSelection { dx: 1, dy: 0 }))
            .unwrap();
    }
    manager
        .execute(Command::Cursor(CursorCommand::ExtendSelection { dx: 0, dy: 1 }))
        .unwrap();

    let cursor = manager.get_cursor_state();
    assert_eq!(cursor.position, GridPosition::new(3, 2));
    assert_eq!(cursor.anchor, Some(GridPosition::new(1, 1)));
    assert_eq!(cursor.selected_cells.len(), 6);

    manager
        .execute(Command::Layout(LayoutCommand::Place {
            kind: ObjectKind::Object,
        }))
        .unwrap();
    let summary = manager.get_layout_state().summary;
    assert_eq!(summary.object_count, 6);
    assert_eq!(summary.empty_cell_count, 19);
}

#[test]
fn test_modified_flag_follows_save_point() {
    let mut manager = manager(3, 3);
    assert!(!manager.get_layout_state().is_modified);

    manager
        .execute(Command::Layout(LayoutCommand::Place {
            kind: ObjectKind::Seat,
        }))
        .unwrap();
    assert!(manager.is_modified());

    manager.mark_saved();
    assert!(!manager.is_modified());

    manager
        .execute(Command::History(HistoryCommand::Undo))
        .unwrap();
    assert!(manager.is_modified());

    manager
        .execute(Command::History(HistoryCommand::Redo))
        .unwrap();
    assert!(!manager.is_modified());
}

#[test]
fn test_undo_redo_state_reporting() {
    let mut manager = manager(3, 3);
    for kind in [ObjectKind::Seat, ObjectKind::Space] {
        manager
            .execute(Command::Layout(LayoutCommand::Place { kind }))
            .unwrap();
    }
    manager
        .execute(Command::History(HistoryCommand::Undo))
        .unwrap();

    let state = manager.get_undo_redo_state();
    assert!(state.can_undo);
    assert!(state.can_redo);
    assert_eq!(state.undo_depth, 1);
    assert_eq!(state.redo_depth, 1);
    assert_eq!(state.history_len, 3);
}
