use layout_editor_core::{
    Command, CursorCommand, EditorStateManager, FacilityLayout, GridPosition, GridSize,
    LayoutCommand, LayoutError, ObjectKind, SeatStatus, StateChangeType,
};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};

fn edited_layout() -> FacilityLayout {
    let mut manager = EditorStateManager::with_layout(
        FacilityLayout::new("Hall", "study", GridSize::new(4, 3)).unwrap(),
    );
    manager
        .execute(Command::Cursor(CursorCommand::SelectRect {
            from: GridPosition::new(0, 0),
            to: GridPosition::new(1, 0),
        }))
        .unwrap();
    manager
        .execute(Command::Layout(LayoutCommand::Place {
            kind: ObjectKind::Seat,
        }))
        .unwrap();
    manager
        .execute(Command::Layout(LayoutCommand::SetSeatStatus {
            status: SeatStatus::Reserved,
        }))
        .unwrap();
    manager
        .execute(Command::Cursor(CursorCommand::ClearSelection))
        .unwrap();
    manager
        .execute(Command::Cursor(CursorCommand::MoveTo {
            position: GridPosition::new(3, 2),
        }))
        .unwrap();
    manager
        .execute(Command::Layout(LayoutCommand::Place {
            kind: ObjectKind::Object,
        }))
        .unwrap();
    manager.layout().clone()
}

#[test]
fn test_json_document_preserves_layout() {
    let layout = edited_layout();
    let json = layout.to_json_pretty().unwrap();
    let loaded = FacilityLayout::from_json(&json).unwrap();

    assert_eq!(loaded, layout);
    assert_eq!(loaded.next_seat_index, 2);
    assert_eq!(loaded.summary().seats_with_status(SeatStatus::Reserved), 2);
}

#[test]
fn test_json_field_names() {
    let layout = edited_layout();
    let value: serde_json::Value = serde_json::from_str(&layout.to_json().unwrap()).unwrap();

    assert_eq!(value["gridSize"]["width"], 4);
    assert_eq!(value["category"], "study");
    assert!(value["createdAt"].is_string());
    let kinds: Vec<&str> = value["objects"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["type"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["seat", "seat", "object"]);
}

#[test]
fn test_duplicate_cells_are_rejected_on_load() {
    let layout = edited_layout();
    let mut value: serde_json::Value = serde_json::from_str(&layout.to_json().unwrap()).unwrap();
    value["objects"][1]["position"] = value["objects"][0]["position"].clone();

    let err = FacilityLayout::from_json(&value.to_string()).unwrap_err();
    assert!(matches!(err, LayoutError::DuplicatePosition(p) if p == GridPosition::new(0, 0)));
}

#[test]
fn test_load_layout_resets_history_and_notifies() {
    let mut manager = EditorStateManager::with_layout(
        FacilityLayout::new("Empty", "", GridSize::new(2, 2)).unwrap(),
    );
    manager
        .execute(Command::Layout(LayoutCommand::Place {
            kind: ObjectKind::Seat,
        }))
        .unwrap();

    let changes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&changes);
    manager.subscribe(move |change| {
        sink.lock()
            .unwrap()
            .push((change.change_type, change.layout.as_ref().map(|l| l.name.clone())));
    });

    manager.load_layout(edited_layout());

    assert_eq!(
        *changes.lock().unwrap(),
        vec![(StateChangeType::LayoutModified, Some("Hall".to_string()))]
    );
    assert!(!manager.get_undo_redo_state().can_undo);
    assert!(!manager.is_modified());
    assert_eq!(manager.selection().current_position(), GridPosition::new(0, 0));
}

fn place_seat_at(manager: &mut EditorStateManager, position: GridPosition) -> String {
    manager
        .execute(Command::Cursor(CursorCommand::MoveTo { position }))
        .unwrap();
    manager
        .execute(Command::Layout(LayoutCommand::Place {
            kind: ObjectKind::Seat,
        }))
        .unwrap();
    manager
        .layout()
        .object_at(position)
        .and_then(|o| o.name())
        .unwrap()
        .to_string()
}

#[test]
fn test_document_without_seat_counter_continues_naming() {
    let mut value: serde_json::Value =
        serde_json::from_str(&edited_layout().to_json().unwrap()).unwrap();
    value.as_object_mut().unwrap().remove("nextSeatIndex");

    let loaded = FacilityLayout::from_json(&value.to_string()).unwrap();
    assert_eq!(loaded.next_seat_index, 2);

    let mut manager = EditorStateManager::with_layout(loaded);
    assert_eq!(place_seat_at(&mut manager, GridPosition::new(2, 0)), "A-03");
}

#[test]
fn test_stale_seat_counter_is_raised_past_custom_names() {
    let mut value: serde_json::Value =
        serde_json::from_str(&edited_layout().to_json().unwrap()).unwrap();
    value["nextSeatIndex"] = 0.into();
    value["objects"][0]["name"] = "Window".into();
    value["objects"][1]["name"] = "Aisle".into();

    let loaded = FacilityLayout::from_json(&value.to_string()).unwrap();
    assert_eq!(loaded.next_seat_index, 2);

    let mut manager = EditorStateManager::with_layout(loaded);
    let name = place_seat_at(&mut manager, GridPosition::new(0, 1));
    assert_eq!(name, "A-03");

    let names: Vec<&str> = manager
        .layout()
        .objects_of_type(ObjectKind::Seat)
        .into_iter()
        .filter_map(|seat| seat.name())
        .collect();
    assert_eq!(names, vec!["Window", "Aisle", "A-03"]);
}

#[test]
fn test_seat_counter_follows_highest_parsed_name() {
    let mut value: serde_json::Value =
        serde_json::from_str(&edited_layout().to_json().unwrap()).unwrap();
    value.as_object_mut().unwrap().remove("nextSeatIndex");
    value["objects"][1]["name"] = "B-04".into();

    let loaded = FacilityLayout::from_json(&value.to_string()).unwrap();
    assert_eq!(loaded.next_seat_index, 14);
}
