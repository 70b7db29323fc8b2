//! Command Interface Layer
//!
//! Provides a unified command interface for convenient frontend integration.
//!
//! # Overview
//!
//! [`CommandExecutor`] is the primary entry point of the layout editor. It owns the
//! snapshot history and the cursor/selection, and supports the following kinds of
//! operations:
//!
//! - **Layout Editing**: place, delete and rename objects, change seat state, resize
//! - **Cursor Operations**: move the cursor and build multi-cell selections
//! - **History**: undo and redo over full layout snapshots
//!
//! Every layout edit is all-or-nothing: target cells are bounds-checked before the
//! layout is touched, and an edit that would not change anything leaves no history
//! entry behind.
//!
//! # Example
//!
//! ```rust
//! use layout_editor_core::{
//!     Command, CommandExecutor, CursorCommand, FacilityLayout, GridPosition, GridSize,
//!     HistoryCommand, LayoutCommand, ObjectKind,
//! };
//!
//! let layout = FacilityLayout::new("Hall", "study", GridSize::new(5, 5)).unwrap();
//! let mut executor = CommandExecutor::with_layout(layout);
//!
//! executor.execute(Command::Cursor(CursorCommand::MoveTo {
//!     position: GridPosition::new(2, 2),
//! })).unwrap();
//! executor.execute(Command::Layout(LayoutCommand::Place { kind: ObjectKind::Seat })).unwrap();
//!
//! let seat = executor.layout().object_at(GridPosition::new(2, 2)).unwrap();
//! assert_eq!(seat.name(), Some("A-01"));
//!
//! executor.execute(Command::History(HistoryCommand::Undo)).unwrap();
//! assert!(executor.layout().objects.is_empty());
//! ```

use crate::config::{EditorConfig, SeatNaming};
use crate::grid::{
    GridObject, GridPosition, GridSize, MAX_GRID_SIZE, MIN_GRID_SIZE, ObjectKind, Seat,
    SeatStatus, default_object_name, positional_seat_name,
};
use crate::history::LayoutHistory;
use crate::layout::{FacilityLayout, generate_id};
use crate::selection::CellSelection;
use std::collections::HashSet;

/// Layout editing commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutCommand {
    /// Place a new object of `kind` on every target cell, replacing what was there.
    Place {
        /// Kind of object to create.
        kind: ObjectKind,
    },
    /// Remove every object on the target cells.
    Delete,
    /// Rename a seat or generic object.
    Rename {
        /// Id of the object to rename.
        object_id: String,
        /// New name (trimmed; must not be empty).
        name: String,
    },
    /// Set the status of every seat on the target cells.
    SetSeatStatus {
        /// New status.
        status: SeatStatus,
    },
    /// Set the reservable flag of every seat on the target cells.
    SetSeatReservable {
        /// New flag.
        reservable: bool,
    },
    /// Change the grid bounds; objects that no longer fit are dropped.
    Resize {
        /// New grid size.
        size: GridSize,
    },
    /// Put a space marker on every empty cell.
    FillEmptyWithSpaces,
    /// Remove all objects.
    Clear,
    /// Rename the layout itself.
    RenameLayout {
        /// New layout name (trimmed; must not be empty).
        name: String,
    },
    /// Change the layout category.
    SetCategory {
        /// New category (trimmed; may be empty).
        category: String,
    },
}

/// Cursor and selection commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorCommand {
    /// Move the cursor to an absolute cell.
    MoveTo {
        /// Target cell.
        position: GridPosition,
    },
    /// Move the cursor by a signed offset (clamped to the grid).
    MoveBy {
        /// Column offset.
        dx: i32,
        /// Row offset.
        dy: i32,
    },
    /// Add the cell to the selection, or remove it if already selected.
    ToggleCell {
        /// Cell to toggle.
        position: GridPosition,
    },
    /// Add the cell to the selection.
    SelectCell {
        /// Cell to add.
        position: GridPosition,
    },
    /// Replace the selection with an inclusive rectangle.
    SelectRect {
        /// First corner.
        from: GridPosition,
        /// Opposite corner.
        to: GridPosition,
    },
    /// Move the cursor and select the rectangle between the anchor and the cursor.
    ExtendSelection {
        /// Column offset.
        dx: i32,
        /// Row offset.
        dy: i32,
    },
    /// Select every cell.
    SelectAll,
    /// Drop the selection.
    ClearSelection,
}

/// History commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryCommand {
    /// Step back to the previous snapshot.
    Undo,
    /// Step forward to the next snapshot.
    Redo,
}

/// Editor command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Layout editing commands
    Layout(LayoutCommand),
    /// Cursor and selection commands
    Cursor(CursorCommand),
    /// Undo/redo
    History(HistoryCommand),
}

/// Command execution result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Cursor or selection command completed.
    Success,
    /// The command was valid but changed nothing; no history entry was recorded.
    Unchanged,
    /// The layout changed and a snapshot was recorded (or the history cursor moved).
    LayoutChanged,
    /// Objects were placed; ids in target order.
    Placed {
        /// Ids of the new objects.
        object_ids: Vec<String>,
    },
    /// Objects were removed.
    Removed {
        /// Number of removed objects.
        count: usize,
    },
}

impl CommandResult {
    /// Whether the active layout differs from before the command.
    pub fn changed_layout(&self) -> bool {
        matches!(
            self,
            CommandResult::LayoutChanged
                | CommandResult::Placed { .. }
                | CommandResult::Removed { .. }
        )
    }
}

/// Command error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// A target cell lies outside the grid.
    #[error("position ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        /// Column.
        x: u32,
        /// Row.
        y: u32,
        /// Grid width.
        width: u32,
        /// Grid height.
        height: u32,
    },
    /// No object with the given id.
    #[error("object not found: {0}")]
    ObjectNotFound(String),
    /// Name was empty after trimming.
    #[error("name cannot be empty")]
    EmptyName,
    /// The object has no name (spaces).
    #[error("object {0} cannot be named")]
    NotNameable(String),
    /// Requested grid size is out of range.
    #[error("invalid grid size {width}x{height} (allowed {min}..={max})", min = MIN_GRID_SIZE, max = MAX_GRID_SIZE)]
    InvalidGridSize {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// History cursor is already at the oldest snapshot.
    #[error("nothing to undo")]
    NothingToUndo,
    /// History cursor is already at the newest snapshot.
    #[error("nothing to redo")]
    NothingToRedo,
}

/// Command executor
///
/// `CommandExecutor` is the main interface for the editor, responsible for:
///
/// - Executing layout, cursor and history commands
/// - Keeping the snapshot history and the cursor/selection consistent
/// - Rejecting invalid edits before anything is mutated
///
/// # Example
///
/// ```rust
/// use layout_editor_core::{
///     Command, CommandExecutor, CommandError, CursorCommand, FacilityLayout, GridPosition,
///     GridSize,
/// };
///
/// let layout = FacilityLayout::new("Hall", "", GridSize::new(3, 3)).unwrap();
/// let mut executor = CommandExecutor::with_layout(layout);
///
/// let err = executor
///     .execute(Command::Cursor(CursorCommand::MoveTo { position: GridPosition::new(3, 0) }))
///     .unwrap_err();
/// assert!(matches!(err, CommandError::OutOfBounds { x: 3, y: 0, .. }));
/// ```
pub struct CommandExecutor {
    /// Snapshot history; the active layout is the entry at the cursor.
    history: LayoutHistory,
    /// Cursor and selection
    selection: CellSelection,
    /// Seat naming strategy for placements
    seat_naming: SeatNaming,
    /// Command history, oldest first
    command_history: Vec<Command>,
    /// Maximum number of commands kept in `command_history`
    command_history_limit: usize,
}

impl CommandExecutor {
    /// Create an executor for `layout` using the given configuration.
    pub fn new(layout: FacilityLayout, config: &EditorConfig) -> Self {
        Self {
            history: LayoutHistory::new(layout, config.max_history),
            selection: CellSelection::new(),
            seat_naming: config.seat_naming,
            command_history: Vec::new(),
            command_history_limit: config.max_history.max(1),
        }
    }

    /// Create an executor with the default configuration.
    pub fn with_layout(layout: FacilityLayout) -> Self {
        Self::new(layout, &EditorConfig::default())
    }

    /// Execute command
    pub fn execute(&mut self, command: Command) -> Result<CommandResult, CommandError> {
        self.record_command(&command);
        tracing::debug!(?command, "execute");

        let result = match command {
            Command::Layout(layout_cmd) => self.execute_layout(layout_cmd),
            Command::Cursor(cursor_cmd) => self.execute_cursor(cursor_cmd),
            Command::History(history_cmd) => self.execute_history(history_cmd),
        };

        if let Err(err) = &result {
            tracing::warn!(%err, "command rejected");
        }
        result
    }

    /// Batch execute commands, stopping at the first error
    pub fn execute_batch(
        &mut self,
        commands: Vec<Command>,
    ) -> Result<Vec<CommandResult>, CommandError> {
        let mut results = Vec::new();

        for command in commands {
            let result = self.execute(command)?;
            results.push(result);
        }

        Ok(results)
    }

    /// Get command history (the most recent `max_history` commands)
    pub fn get_command_history(&self) -> &[Command] {
        &self.command_history
    }

    fn record_command(&mut self, command: &Command) {
        self.command_history.push(command.clone());
        if self.command_history.len() > self.command_history_limit {
            let excess = self.command_history.len() - self.command_history_limit;
            self.command_history.drain(..excess);
        }
    }

    /// Active layout.
    pub fn layout(&self) -> &FacilityLayout {
        self.history.current()
    }

    /// Cursor and selection.
    pub fn selection(&self) -> &CellSelection {
        &self.selection
    }

    /// Snapshot history.
    pub fn history(&self) -> &LayoutHistory {
        &self.history
    }

    /// Seat naming strategy.
    pub fn seat_naming(&self) -> SeatNaming {
        self.seat_naming
    }

    /// Change the seat naming strategy for later placements.
    pub fn set_seat_naming(&mut self, seat_naming: SeatNaming) {
        self.seat_naming = seat_naming;
    }

    /// Object under the cursor.
    pub fn object_at_cursor(&self) -> Option<&GridObject> {
        self.layout().object_at(self.selection.current_position())
    }

    /// Can undo
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Can redo
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Undo depth
    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    /// Redo depth
    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }

    /// Whether the active layout is the last saved one (for dirty tracking)
    pub fn is_clean(&self) -> bool {
        self.history.is_clean()
    }

    /// Mark the active layout as saved
    pub fn mark_clean(&mut self) {
        self.history.mark_clean();
    }

    /// Replace the document (e.g. after loading a file). History and selection restart.
    pub fn load_layout(&mut self, layout: FacilityLayout) {
        tracing::info!(id = %layout.id, name = %layout.name, "layout loaded");
        self.history.reset(layout);
        self.selection = CellSelection::new();
    }

    fn commit(&mut self, mut layout: FacilityLayout) {
        layout.touch();
        let grid_size = layout.grid_size;
        self.history.push(layout);
        self.selection.clamp_to(grid_size);
    }

    fn check_position(&self, position: GridPosition) -> Result<(), CommandError> {
        let layout = self.layout();
        if layout.is_position_valid(position) {
            Ok(())
        } else {
            Err(CommandError::OutOfBounds {
                x: position.x,
                y: position.y,
                width: layout.grid_size.width,
                height: layout.grid_size.height,
            })
        }
    }

    /// Target cells, all bounds-checked before any mutation.
    fn checked_targets(&self) -> Result<Vec<GridPosition>, CommandError> {
        let targets = self.selection.targets();
        for position in &targets {
            self.check_position(*position)?;
        }
        Ok(targets)
    }

    fn next_name(
        &self,
        layout: &mut FacilityLayout,
        kind: ObjectKind,
        position: GridPosition,
    ) -> String {
        match (kind, self.seat_naming) {
            (ObjectKind::Seat, SeatNaming::Counter) => {
                let name = default_object_name(kind, layout.next_seat_index);
                layout.next_seat_index += 1;
                name
            }
            (ObjectKind::Seat, SeatNaming::Position) => positional_seat_name(position),
            _ => default_object_name(kind, layout.objects.len()),
        }
    }

    // Private method: execute layout command
    fn execute_layout(&mut self, command: LayoutCommand) -> Result<CommandResult, CommandError> {
        match command {
            LayoutCommand::Place { kind } => self.execute_place(kind),
            LayoutCommand::Delete => self.execute_delete(),
            LayoutCommand::Rename { object_id, name } => self.execute_rename(&object_id, &name),
            LayoutCommand::SetSeatStatus { status } => {
                self.update_target_seats(|seat| {
                    if seat.status == status {
                        false
                    } else {
                        seat.status = status;
                        true
                    }
                })
            }
            LayoutCommand::SetSeatReservable { reservable } => {
                self.update_target_seats(|seat| {
                    if seat.reservable == reservable {
                        false
                    } else {
                        seat.reservable = reservable;
                        true
                    }
                })
            }
            LayoutCommand::Resize { size } => self.execute_resize(size),
            LayoutCommand::FillEmptyWithSpaces => self.execute_fill_empty(),
            LayoutCommand::Clear => self.execute_clear(),
            LayoutCommand::RenameLayout { name } => self.execute_rename_layout(&name),
            LayoutCommand::SetCategory { category } => self.execute_set_category(&category),
        }
    }

    fn execute_place(&mut self, kind: ObjectKind) -> Result<CommandResult, CommandError> {
        let targets = self.checked_targets()?;
        let mut layout = self.layout().clone();
        let mut object_ids = Vec::with_capacity(targets.len());

        for position in targets {
            // At most one object per cell: evict the previous occupant first.
            layout.objects.retain(|object| object.position() != position);

            let name = self.next_name(&mut layout, kind, position);
            let id = generate_id(kind.id_prefix());
            object_ids.push(id.clone());
            layout
                .objects
                .push(GridObject::new(kind, id, name, position));
        }

        tracing::debug!(%kind, count = object_ids.len(), "placed objects");
        self.commit(layout);
        Ok(CommandResult::Placed { object_ids })
    }

    fn execute_delete(&mut self) -> Result<CommandResult, CommandError> {
        let targets: HashSet<GridPosition> = self.checked_targets()?.into_iter().collect();
        let mut layout = self.layout().clone();

        let before = layout.objects.len();
        layout
            .objects
            .retain(|object| !targets.contains(&object.position()));
        let count = before - layout.objects.len();

        if count == 0 {
            return Ok(CommandResult::Unchanged);
        }

        self.commit(layout);
        Ok(CommandResult::Removed { count })
    }

    fn execute_rename(
        &mut self,
        object_id: &str,
        name: &str,
    ) -> Result<CommandResult, CommandError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CommandError::EmptyName);
        }

        let index = self
            .layout()
            .objects
            .iter()
            .position(|object| object.id() == object_id)
            .ok_or_else(|| CommandError::ObjectNotFound(object_id.to_string()))?;

        let object = &self.layout().objects[index];
        match object.name() {
            None => return Err(CommandError::NotNameable(object_id.to_string())),
            Some(current) if current == name => return Ok(CommandResult::Unchanged),
            Some(_) => {}
        }

        let mut layout = self.layout().clone();
        layout.objects[index].set_name(name.to_string());
        self.commit(layout);
        Ok(CommandResult::LayoutChanged)
    }

    fn update_target_seats<F>(&mut self, mut update: F) -> Result<CommandResult, CommandError>
    where
        F: FnMut(&mut Seat) -> bool,
    {
        let targets: HashSet<GridPosition> = self.checked_targets()?.into_iter().collect();
        let mut layout = self.layout().clone();

        let mut changed = false;
        for object in layout
            .objects
            .iter_mut()
            .filter(|object| targets.contains(&object.position()))
        {
            if let Some(seat) = object.as_seat_mut() {
                changed |= update(seat);
            }
        }

        if !changed {
            return Ok(CommandResult::Unchanged);
        }

        self.commit(layout);
        Ok(CommandResult::LayoutChanged)
    }

    fn execute_resize(&mut self, size: GridSize) -> Result<CommandResult, CommandError> {
        if !size.is_valid_grid() {
            return Err(CommandError::InvalidGridSize {
                width: size.width,
                height: size.height,
            });
        }
        if size == self.layout().grid_size {
            return Ok(CommandResult::Unchanged);
        }

        let mut layout = self.layout().clone();
        layout.grid_size = size;
        layout.objects.retain(|object| {
            let position = object.position();
            position.x < size.width && position.y < size.height
        });

        tracing::debug!(%size, "resized grid");
        self.commit(layout);
        Ok(CommandResult::LayoutChanged)
    }

    fn execute_fill_empty(&mut self) -> Result<CommandResult, CommandError> {
        let mut layout = self.layout().clone();
        let occupied: HashSet<GridPosition> =
            layout.objects.iter().map(|object| object.position()).collect();

        let empty: Vec<GridPosition> = layout
            .grid_size
            .positions()
            .filter(|position| !occupied.contains(position))
            .collect();
        if empty.is_empty() {
            return Ok(CommandResult::Unchanged);
        }

        for position in empty {
            layout.objects.push(GridObject::new(
                ObjectKind::Space,
                generate_id(ObjectKind::Space.id_prefix()),
                String::new(),
                position,
            ));
        }

        self.commit(layout);
        Ok(CommandResult::LayoutChanged)
    }

    fn execute_clear(&mut self) -> Result<CommandResult, CommandError> {
        let count = self.layout().objects.len();
        if count == 0 {
            return Ok(CommandResult::Unchanged);
        }

        let mut layout = self.layout().clone();
        layout.objects.clear();
        self.commit(layout);
        Ok(CommandResult::Removed { count })
    }

    fn execute_rename_layout(&mut self, name: &str) -> Result<CommandResult, CommandError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CommandError::EmptyName);
        }
        if self.layout().name == name {
            return Ok(CommandResult::Unchanged);
        }

        let mut layout = self.layout().clone();
        layout.name = name.to_string();
        self.commit(layout);
        Ok(CommandResult::LayoutChanged)
    }

    fn execute_set_category(&mut self, category: &str) -> Result<CommandResult, CommandError> {
        let category = category.trim();
        if self.layout().category == category {
            return Ok(CommandResult::Unchanged);
        }

        let mut layout = self.layout().clone();
        layout.category = category.to_string();
        self.commit(layout);
        Ok(CommandResult::LayoutChanged)
    }

    // Private method: execute cursor command
    fn execute_cursor(&mut self, command: CursorCommand) -> Result<CommandResult, CommandError> {
        let grid_size = self.layout().grid_size;

        match command {
            CursorCommand::MoveTo { position } => {
                self.check_position(position)?;
                self.selection.set_current(position);
            }
            CursorCommand::MoveBy { dx, dy } => {
                self.selection.move_by(dx, dy, grid_size);
            }
            CursorCommand::ToggleCell { position } => {
                self.check_position(position)?;
                self.selection.toggle(position);
            }
            CursorCommand::SelectCell { position } => {
                self.check_position(position)?;
                self.selection.select(position);
            }
            CursorCommand::SelectRect { from, to } => {
                self.check_position(from)?;
                self.check_position(to)?;
                self.selection.clear();
                self.selection.select_rect(from, to);
            }
            CursorCommand::ExtendSelection { dx, dy } => {
                self.selection.extend_by(dx, dy, grid_size);
            }
            CursorCommand::SelectAll => self.selection.select_all(grid_size),
            CursorCommand::ClearSelection => self.selection.clear(),
        }

        Ok(CommandResult::Success)
    }

    // Private method: execute history command
    fn execute_history(&mut self, command: HistoryCommand) -> Result<CommandResult, CommandError> {
        let grid_size = match command {
            HistoryCommand::Undo => self
                .history
                .undo()
                .map(|layout| layout.grid_size)
                .ok_or(CommandError::NothingToUndo)?,
            HistoryCommand::Redo => self
                .history
                .redo()
                .map(|layout| layout.grid_size)
                .ok_or(CommandError::NothingToRedo)?,
        };

        self.selection.clamp_to(grid_size);
        Ok(CommandResult::LayoutChanged)
    }
}
