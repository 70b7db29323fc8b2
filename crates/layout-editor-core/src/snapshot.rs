//! Headless Output Snapshot
//!
//! Provides the data a renderer needs to draw the grid: one cell per grid
//! position, with the occupying object's kind, label and seat state, plus cursor
//! and selection flags.

use crate::grid::{GridObject, GridPosition, GridSize, ObjectKind, SeatStatus};
use crate::layout::FacilityLayout;
use crate::selection::CellSelection;
use unicode_width::UnicodeWidthChar;

/// Cell information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    /// Grid position
    pub position: GridPosition,
    /// Kind of the occupying object (`None` for an empty cell)
    pub kind: Option<ObjectKind>,
    /// Id of the occupying object
    pub object_id: Option<String>,
    /// Display label (empty for spaces and empty cells)
    pub label: String,
    /// Seat status, for seats
    pub status: Option<SeatStatus>,
    /// Whether the occupying object is reservable
    pub reservable: bool,
    /// Cursor is on this cell
    pub is_cursor: bool,
    /// Cell is part of the selection
    pub is_selected: bool,
}

impl GridCell {
    fn empty(position: GridPosition) -> Self {
        Self {
            position,
            kind: None,
            object_id: None,
            label: String::new(),
            status: None,
            reservable: false,
            is_cursor: false,
            is_selected: false,
        }
    }

    fn from_object(object: &GridObject) -> Self {
        Self {
            position: object.position(),
            kind: Some(object.kind()),
            object_id: Some(object.id().to_string()),
            label: object.name().unwrap_or_default().to_string(),
            status: object.as_seat().map(|seat| seat.status),
            reservable: object.is_reservable(),
            is_cursor: false,
            is_selected: false,
        }
    }

    /// Single-character marker for compact renderers.
    pub fn symbol(&self) -> char {
        match self.kind {
            Some(ObjectKind::Seat) => 'S',
            Some(ObjectKind::Object) => '#',
            Some(ObjectKind::Space) => '.',
            None => ' ',
        }
    }
}

/// Headless grid row
#[derive(Debug, Clone)]
pub struct GridRow {
    /// Row index
    pub y: u32,
    /// Cells, left to right
    pub cells: Vec<GridCell>,
}

/// Headless grid snapshot
#[derive(Debug, Clone)]
pub struct LayoutGrid {
    /// Grid bounds
    pub grid_size: GridSize,
    /// Rows, top to bottom
    pub rows: Vec<GridRow>,
}

impl LayoutGrid {
    /// Build a snapshot of `layout` with the cursor/selection flags of `selection`.
    pub fn from_layout(layout: &FacilityLayout, selection: &CellSelection) -> Self {
        let grid_size = layout.grid_size;
        let mut rows: Vec<GridRow> = (0..grid_size.height)
            .map(|y| GridRow {
                y,
                cells: (0..grid_size.width)
                    .map(|x| GridCell::empty(GridPosition::new(x, y)))
                    .collect(),
            })
            .collect();

        for object in &layout.objects {
            if let Some(cell) = cell_mut(&mut rows, object.position()) {
                *cell = GridCell::from_object(object);
            }
        }

        if let Some(cell) = cell_mut(&mut rows, selection.current_position()) {
            cell.is_cursor = true;
        }
        for position in selection.selected_cells() {
            if let Some(cell) = cell_mut(&mut rows, *position) {
                cell.is_selected = true;
            }
        }

        Self { grid_size, rows }
    }

    /// Cell at `position`.
    pub fn cell(&self, position: GridPosition) -> Option<&GridCell> {
        self.rows
            .get(position.y as usize)
            .and_then(|row| row.cells.get(position.x as usize))
    }
}

fn cell_mut(rows: &mut [GridRow], position: GridPosition) -> Option<&mut GridCell> {
    rows.get_mut(position.y as usize)
        .and_then(|row| row.cells.get_mut(position.x as usize))
}

/// Clip `label` to at most `max_width` terminal columns, counting wide (CJK)
/// characters as two.
pub fn clip_label(label: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut clipped = String::new();
    for ch in label.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width {
            break;
        }
        width += ch_width;
        clipped.push(ch);
    }
    clipped
}
