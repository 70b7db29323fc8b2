//! Editor State Interface
//!
//! Provides a state query interface for the layout editor, used for frontend
//! rendering and state synchronization.
//!
//! # Overview
//!
//! - **State Queries**: layout, cursor/selection and undo/redo state
//! - **Version Tracking**: the version number increases on every effective change
//! - **Change Notifications**: subscribers receive every change, and layout
//!   changes carry the new layout snapshot (the `onLayoutChange` hook of a frontend)
//!
//! # Example
//!
//! ```rust
//! use layout_editor_core::{
//!     Command, EditorStateManager, FacilityLayout, GridSize, LayoutCommand, ObjectKind,
//!     StateChangeType,
//! };
//! use std::sync::{Arc, Mutex};
//!
//! let layout = FacilityLayout::new("Hall", "", GridSize::new(4, 4)).unwrap();
//! let mut manager = EditorStateManager::with_layout(layout);
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! manager.subscribe(move |change| {
//!     if let Some(layout) = &change.layout {
//!         sink.lock().unwrap().push(layout.objects.len());
//!     }
//! });
//!
//! manager.execute(Command::Layout(LayoutCommand::Place { kind: ObjectKind::Object })).unwrap();
//! assert_eq!(*seen.lock().unwrap(), vec![1]);
//! assert_eq!(manager.version(), 1);
//! assert!(manager.get_layout_state().is_modified);
//! ```

use crate::commands::{Command, CommandError, CommandExecutor, CommandResult};
use crate::config::EditorConfig;
use crate::grid::{GridObject, GridPosition, GridSize};
use crate::layout::{FacilityLayout, LayoutSummary};
use crate::selection::CellSelection;
use crate::snapshot::LayoutGrid;
use std::sync::Arc;

/// Layout state
#[derive(Debug, Clone)]
pub struct LayoutState {
    /// Layout id
    pub id: String,
    /// Layout name
    pub name: String,
    /// Layout category
    pub category: String,
    /// Grid bounds
    pub grid_size: GridSize,
    /// Per-kind counts
    pub summary: LayoutSummary,
    /// Whether the layout differs from the last saved snapshot
    pub is_modified: bool,
    /// State version number (incremented after each effective change)
    pub version: u64,
}

/// Cursor state
#[derive(Debug, Clone)]
pub struct CursorState {
    /// Cursor cell
    pub position: GridPosition,
    /// Selected cells in row-major order
    pub selected_cells: Vec<GridPosition>,
    /// Range selection anchor
    pub anchor: Option<GridPosition>,
    /// Object under the cursor
    pub object: Option<GridObject>,
}

/// Undo/redo stack state
#[derive(Debug, Clone)]
pub struct UndoRedoState {
    /// Can undo
    pub can_undo: bool,
    /// Can redo
    pub can_redo: bool,
    /// Undo depth
    pub undo_depth: usize,
    /// Redo depth
    pub redo_depth: usize,
    /// Stored snapshots
    pub history_len: usize,
}

/// Complete editor state snapshot
#[derive(Debug, Clone)]
pub struct EditorState {
    /// Layout state
    pub layout: LayoutState,
    /// Cursor state
    pub cursor: CursorState,
    /// Undo/redo state
    pub undo_redo: UndoRedoState,
}

/// State change type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChangeType {
    /// Layout content modified (edit, undo, redo or load)
    LayoutModified,
    /// Cursor moved
    CursorMoved,
    /// Selection changed
    SelectionChanged,
}

/// State change record
#[derive(Debug, Clone)]
pub struct StateChange {
    /// Change type
    pub change_type: StateChangeType,
    /// Old version number
    pub old_version: u64,
    /// New version number
    pub new_version: u64,
    /// New active layout, for layout changes
    pub layout: Option<Arc<FacilityLayout>>,
}

impl StateChange {
    /// Create a new state change record without a layout snapshot.
    pub fn new(change_type: StateChangeType, old_version: u64, new_version: u64) -> Self {
        Self {
            change_type,
            old_version,
            new_version,
            layout: None,
        }
    }

    /// Attach the new layout to this change record.
    pub fn with_layout(mut self, layout: Arc<FacilityLayout>) -> Self {
        self.layout = Some(layout);
        self
    }
}

/// State change callback function type
pub type StateChangeCallback = Box<dyn FnMut(&StateChange) + Send>;

/// Editor state manager
///
/// `EditorStateManager` wraps the [`CommandExecutor`] and adds version tracking
/// and change notifications. It follows a unidirectional data flow:
///
/// 1. The frontend executes commands via [`execute()`](EditorStateManager::execute)
/// 2. Effective changes bump the version number and trigger subscribed callbacks
/// 3. The frontend re-renders from [`snapshot()`](EditorStateManager::snapshot) or the
///    various `get_*_state()` methods
///
/// Commands that succeed without changing anything (deleting an empty cell, moving
/// the cursor against the grid edge) neither bump the version nor notify.
pub struct EditorStateManager {
    /// Command executor
    executor: CommandExecutor,
    /// State version number
    state_version: u64,
    /// State change callback list
    callbacks: Vec<StateChangeCallback>,
}

impl EditorStateManager {
    /// Create a new state manager
    pub fn new(layout: FacilityLayout, config: &EditorConfig) -> Self {
        Self {
            executor: CommandExecutor::new(layout, config),
            state_version: 0,
            callbacks: Vec::new(),
        }
    }

    /// Create a state manager with the default configuration
    pub fn with_layout(layout: FacilityLayout) -> Self {
        Self::new(layout, &EditorConfig::default())
    }

    /// Active layout
    pub fn layout(&self) -> &FacilityLayout {
        self.executor.layout()
    }

    /// Cursor and selection
    pub fn selection(&self) -> &CellSelection {
        self.executor.selection()
    }

    /// Underlying executor
    pub fn executor(&self) -> &CommandExecutor {
        &self.executor
    }

    /// Execute a command and trigger state change notifications when something changed.
    pub fn execute(&mut self, command: Command) -> Result<CommandResult, CommandError> {
        let cursor_before = self.executor.selection().current_position();
        let selection_before = self.executor.selection().selected_cells().clone();

        let is_cursor_command = matches!(command, Command::Cursor(_));
        let result = self.executor.execute(command)?;

        if result.changed_layout() {
            self.notify_layout_change();
        } else if is_cursor_command {
            let selection = self.executor.selection();
            let selection_changed = selection.selected_cells() != &selection_before;
            let cursor_moved = selection.current_position() != cursor_before;
            if selection_changed {
                self.notify_change(StateChangeType::SelectionChanged);
            } else if cursor_moved {
                self.notify_change(StateChangeType::CursorMoved);
            }
        }

        Ok(result)
    }

    /// Replace the document and restart history (e.g. after opening a file).
    pub fn load_layout(&mut self, layout: FacilityLayout) {
        self.executor.load_layout(layout);
        self.notify_layout_change();
    }

    /// Get current version number
    pub fn version(&self) -> u64 {
        self.state_version
    }

    /// Whether the layout differs from the last saved snapshot
    pub fn is_modified(&self) -> bool {
        !self.executor.is_clean()
    }

    /// Mark the active layout as saved
    pub fn mark_saved(&mut self) {
        self.executor.mark_clean();
    }

    /// Subscribe to state change notifications
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&StateChange) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Get complete editor state snapshot
    pub fn get_full_state(&self) -> EditorState {
        EditorState {
            layout: self.get_layout_state(),
            cursor: self.get_cursor_state(),
            undo_redo: self.get_undo_redo_state(),
        }
    }

    /// Get layout state
    pub fn get_layout_state(&self) -> LayoutState {
        let layout = self.executor.layout();
        LayoutState {
            id: layout.id.clone(),
            name: layout.name.clone(),
            category: layout.category.clone(),
            grid_size: layout.grid_size,
            summary: layout.summary(),
            is_modified: self.is_modified(),
            version: self.state_version,
        }
    }

    /// Get cursor state
    pub fn get_cursor_state(&self) -> CursorState {
        let selection = self.executor.selection();
        CursorState {
            position: selection.current_position(),
            selected_cells: selection.selected_cells().iter().copied().collect(),
            anchor: selection.anchor(),
            object: self.executor.object_at_cursor().cloned(),
        }
    }

    /// Get undo/redo state
    pub fn get_undo_redo_state(&self) -> UndoRedoState {
        UndoRedoState {
            can_undo: self.executor.can_undo(),
            can_redo: self.executor.can_redo(),
            undo_depth: self.executor.undo_depth(),
            redo_depth: self.executor.redo_depth(),
            history_len: self.executor.history().len(),
        }
    }

    /// Render-ready snapshot of the whole grid
    pub fn snapshot(&self) -> LayoutGrid {
        LayoutGrid::from_layout(self.executor.layout(), self.executor.selection())
    }

    fn notify_layout_change(&mut self) {
        let layout = Arc::new(self.executor.layout().clone());
        let old_version = self.bump_version();
        let change = StateChange::new(
            StateChangeType::LayoutModified,
            old_version,
            self.state_version,
        )
        .with_layout(layout);
        self.dispatch(&change);
    }

    fn notify_change(&mut self, change_type: StateChangeType) {
        let old_version = self.bump_version();
        let change = StateChange::new(change_type, old_version, self.state_version);
        self.dispatch(&change);
    }

    fn bump_version(&mut self) -> u64 {
        let old_version = self.state_version;
        self.state_version += 1;
        old_version
    }

    fn dispatch(&mut self, change: &StateChange) {
        tracing::trace!(
            change_type = ?change.change_type,
            version = change.new_version,
            "state change"
        );
        for callback in &mut self.callbacks {
            callback(change);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{CursorCommand, HistoryCommand, LayoutCommand};
    use crate::grid::ObjectKind;
    use std::sync::Mutex;

    fn manager() -> EditorStateManager {
        EditorStateManager::with_layout(
            FacilityLayout::new("Hall", "study", GridSize::new(4, 4)).unwrap(),
        )
    }

    fn recorder(manager: &mut EditorStateManager) -> Arc<Mutex<Vec<StateChangeType>>> {
        let changes = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&changes);
        manager.subscribe(move |change| sink.lock().unwrap().push(change.change_type));
        changes
    }

    #[test]
    fn test_initial_state() {
        let manager = manager();
        let state = manager.get_full_state();

        assert_eq!(state.layout.version, 0);
        assert!(!state.layout.is_modified);
        assert_eq!(state.cursor.position, GridPosition::new(0, 0));
        assert!(state.cursor.object.is_none());
        assert!(!state.undo_redo.can_undo);
        assert_eq!(state.undo_redo.history_len, 1);
    }

    #[test]
    fn test_change_types() {
        let mut manager = manager();
        let changes = recorder(&mut manager);

        manager
            .execute(Command::Cursor(CursorCommand::MoveBy { dx: 1, dy: 0 }))
            .unwrap();
        manager
            .execute(Command::Cursor(CursorCommand::ExtendSelection { dx: 1, dy: 0 }))
            .unwrap();
        manager
            .execute(Command::Layout(LayoutCommand::Place {
                kind: ObjectKind::Seat,
            }))
            .unwrap();

        assert_eq!(
            *changes.lock().unwrap(),
            vec![
                StateChangeType::CursorMoved,
                StateChangeType::SelectionChanged,
                StateChangeType::LayoutModified,
            ]
        );
        assert_eq!(manager.version(), 3);
        assert_eq!(manager.layout().objects.len(), 2);
    }

    #[test]
    fn test_noops_do_not_bump_version() {
        let mut manager = manager();
        let changes = recorder(&mut manager);

        manager
            .execute(Command::Cursor(CursorCommand::MoveBy { dx: -1, dy: -1 }))
            .unwrap();
        manager
            .execute(Command::Layout(LayoutCommand::Delete))
            .unwrap();

        assert_eq!(manager.version(), 0);
        assert!(changes.lock().unwrap().is_empty());
    }

    #[test]
    fn test_modified_follows_clean_point() {
        let mut manager = manager();
        manager
            .execute(Command::Layout(LayoutCommand::Place {
                kind: ObjectKind::Object,
            }))
            .unwrap();
        assert!(manager.is_modified());

        manager.mark_saved();
        assert!(!manager.get_layout_state().is_modified);

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
    fn test_errors_do_not_notify() {
        let mut manager = manager();
        let changes = recorder(&mut manager);

        assert!(
            manager
                .execute(Command::History(HistoryCommand::Undo))
                .is_err()
        );
        assert!(changes.lock().unwrap().is_empty());
    }
}
