use layout_editor_core::{
    Command, CommandError, CommandExecutor, CursorCommand, EditorConfig, FacilityLayout,
    GridPosition, GridSize, HistoryCommand, LayoutCommand, ObjectKind,
};
use pretty_assertions::assert_eq;

fn executor() -> CommandExecutor {
    CommandExecutor::with_layout(FacilityLayout::new("Hall", "", GridSize::new(5, 5)).unwrap())
}

fn place_at(executor: &mut CommandExecutor, x: u32, y: u32, kind: ObjectKind) {
    executor
        .execute(Command::Cursor(CursorCommand::MoveTo {
            position: GridPosition::new(x, y),
        }))
        .unwrap();
    executor
        .execute(Command::Layout(LayoutCommand::Place { kind }))
        .unwrap();
}

fn undo(executor: &mut CommandExecutor) {
    executor.execute(Command::History(HistoryCommand::Undo)).unwrap();
}

fn redo(executor: &mut CommandExecutor) {
    executor.execute(Command::History(HistoryCommand::Redo)).unwrap();
}

#[test]
fn test_undo_redo_single_placement() {
    let mut executor = executor();
    place_at(&mut executor, 1, 1, ObjectKind::Seat);
    assert!(executor.can_undo());
    assert!(!executor.can_redo());

    undo(&mut executor);
    assert!(executor.layout().objects.is_empty());
    assert!(!executor.can_undo());
    assert!(executor.can_redo());

    redo(&mut executor);
    assert_eq!(executor.layout().objects.len(), 1);
    assert!(executor.can_undo());
    assert!(!executor.can_redo());
}

#[test]
fn test_undo_after_n_placements_restores_n_minus_one() {
    let mut executor = executor();
    let mut states = vec![executor.layout().clone()];
    for i in 0..4 {
        place_at(&mut executor, i, 0, ObjectKind::Seat);
        states.push(executor.layout().clone());
    }

    undo(&mut executor);
    assert_eq!(executor.layout(), &states[3]);
    undo(&mut executor);
    assert_eq!(executor.layout(), &states[2]);

    redo(&mut executor);
    assert_eq!(executor.layout(), &states[3]);
    redo(&mut executor);
    assert_eq!(executor.layout(), &states[4]);
}

#[test]
fn test_new_edit_after_undo_discards_redo() {
    let mut executor = executor();
    place_at(&mut executor, 0, 0, ObjectKind::Seat);
    place_at(&mut executor, 1, 0, ObjectKind::Seat);
    undo(&mut executor);
    assert_eq!(executor.redo_depth(), 1);

    place_at(&mut executor, 2, 0, ObjectKind::Object);
    assert_eq!(executor.redo_depth(), 0);
    assert_eq!(
        executor.execute(Command::History(HistoryCommand::Redo)),
        Err(CommandError::NothingToRedo)
    );

    let positions: Vec<GridPosition> = executor
        .layout()
        .objects
        .iter()
        .map(|o| o.position())
        .collect();
    assert_eq!(positions, vec![GridPosition::new(0, 0), GridPosition::new(2, 0)]);
}

#[test]
fn test_nothing_to_undo() {
    let mut executor = executor();
    assert_eq!(
        executor.execute(Command::History(HistoryCommand::Undo)),
        Err(CommandError::NothingToUndo)
    );
}

#[test]
fn test_history_capacity_from_config() {
    let config = EditorConfig {
        max_history: 3,
        ..EditorConfig::default()
    };
    let mut executor = CommandExecutor::new(
        FacilityLayout::new("Hall", "", GridSize::new(5, 5)).unwrap(),
        &config,
    );
    for i in 0..5 {
        place_at(&mut executor, i, 0, ObjectKind::Seat);
    }

    assert_eq!(executor.history().len(), 3);
    undo(&mut executor);
    undo(&mut executor);
    assert!(!executor.can_undo());
    assert_eq!(executor.layout().objects.len(), 3);
}

#[test]
fn test_counter_survives_undo() {
    // Undo restores the snapshot including its seat counter, so names are re-issued
    // deterministically.
    let mut executor = executor();
    place_at(&mut executor, 0, 0, ObjectKind::Seat);
    place_at(&mut executor, 1, 0, ObjectKind::Seat);
    undo(&mut executor);
    place_at(&mut executor, 3, 3, ObjectKind::Seat);

    assert_eq!(
        executor
            .layout()
            .object_at(GridPosition::new(3, 3))
            .and_then(|o| o.name()),
        Some("A-02")
    );
}

#[test]
fn test_undo_clamps_selection_after_resize() {
    let mut executor = executor();
    executor
        .execute(Command::Layout(LayoutCommand::Resize {
            size: GridSize::new(8, 8),
        }))
        .unwrap();
    executor
        .execute(Command::Cursor(CursorCommand::MoveTo {
            position: GridPosition::new(7, 7),
        }))
        .unwrap();
    executor
        .execute(Command::Cursor(CursorCommand::ToggleCell {
            position: GridPosition::new(6, 6),
        }))
        .unwrap();

    undo(&mut executor);
    assert_eq!(executor.layout().grid_size, GridSize::new(5, 5));
    assert_eq!(
        executor.selection().current_position(),
        GridPosition::new(4, 4)
    );
    assert!(executor.selection().selected_cells().is_empty());
}
