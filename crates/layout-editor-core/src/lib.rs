#![warn(missing_docs)]
//! Layout Editor Core - Headless Facility Layout Editing Kernel
//!
//! # Overview
//!
//! `layout-editor-core` is a headless editor kernel for facility floor plans: a
//! 2D grid on which seats, space markers and generic objects are placed. It
//! covers state management, editing commands and undo/redo history, and leaves
//! rendering to the upper layer, which receives a cell grid snapshot.
//!
//! # Core Features
//!
//! - **Immutable Layout Snapshots**: every edit produces a new [`FacilityLayout`]
//! - **Linear Undo/Redo**: full snapshots with a movable cursor and redo truncation
//! - **Multi-cell Editing**: place, delete and update seats across a selection
//! - **Modal Renaming**: [`NamingSession`] validates names before they are committed
//! - **State Tracking**: version numbers and change notifications
//! - **JSON Persistence**: validated load/save of layout documents
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  State Management & Naming Workflow         │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Command Interface (placement, cursor)      │  ← Editing
//! ├─────────────────────────────────────────────┤
//! │  History (snapshots + cursor)               │  ← Undo/Redo
//! ├─────────────────────────────────────────────┤
//! │  Layout Model & Factory                     │  ← Document
//! ├─────────────────────────────────────────────┤
//! │  Grid Utilities                             │  ← Pure Queries
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use layout_editor_core::{
//!     Command, CursorCommand, EditorStateManager, FacilityLayout, GridPosition, GridSize,
//!     HistoryCommand, LayoutCommand, ObjectKind,
//! };
//!
//! let layout = FacilityLayout::new("Reading room", "study", GridSize::new(5, 5)).unwrap();
//! let mut manager = EditorStateManager::with_layout(layout);
//!
//! // Select a 2x1 block and place seats on it
//! manager.execute(Command::Cursor(CursorCommand::SelectRect {
//!     from: GridPosition::new(0, 0),
//!     to: GridPosition::new(1, 0),
//! })).unwrap();
//! manager.execute(Command::Layout(LayoutCommand::Place { kind: ObjectKind::Seat })).unwrap();
//! assert_eq!(manager.get_layout_state().summary.seat_count, 2);
//!
//! // Undo it again
//! manager.execute(Command::History(HistoryCommand::Undo)).unwrap();
//! assert_eq!(manager.get_layout_state().summary.seat_count, 0);
//! ```
//!
//! # Module Description
//!
//! - [`grid`] - Coordinates, object types and pure grid queries
//! - [`layout`] - Layout model, factory, validation and JSON persistence
//! - [`history`] - Linear snapshot history
//! - [`selection`] - Cursor and multi-cell selection
//! - [`commands`] - Unified command interface
//! - [`naming`] - Modal rename workflow
//! - [`state`] - State management and query interface
//! - [`snapshot`] - Render-ready grid snapshot
//! - [`config`] - Editor configuration

pub mod commands;
pub mod config;
pub mod grid;
pub mod history;
pub mod layout;
pub mod naming;
pub mod selection;
pub mod snapshot;
pub mod state;

pub use commands::{
    Command, CommandError, CommandExecutor, CommandResult, CursorCommand, HistoryCommand,
    LayoutCommand,
};
pub use config::{ConfigError, EditorConfig, SeatNaming};
pub use grid::{
    DEFAULT_OBJECT_NAME, FacilityObject, GridObject, GridPosition, GridSize, MAX_GRID_SIZE,
    MIN_GRID_SIZE, ObjectKind, Seat, SeatStatus, Space, counter_seat_index, default_object_name,
    is_position_valid, object_at, objects_of_type, positional_seat_name, sort_objects_by_position,
};
pub use history::LayoutHistory;
pub use layout::{FacilityLayout, LayoutError, LayoutSummary, generate_id};
pub use naming::{NamingSession, NamingState};
pub use selection::CellSelection;
pub use snapshot::{GridCell, GridRow, LayoutGrid, clip_label};
pub use state::{
    CursorState, EditorState, EditorStateManager, LayoutState, StateChange, StateChangeCallback,
    StateChangeType, UndoRedoState,
};
