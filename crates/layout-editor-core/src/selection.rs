//! Cursor and multi-cell selection.

use crate::grid::{GridPosition, GridSize};
use std::collections::BTreeSet;

/// Cursor plus an optional set of selected cells.
///
/// When the selection is empty, edits target the cursor cell alone.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CellSelection {
    current: GridPosition,
    selected: BTreeSet<GridPosition>,
    /// Rectangle anchor for keyboard range selection.
    anchor: Option<GridPosition>,
}

impl CellSelection {
    /// Cursor at `(0, 0)`, nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cursor cell.
    pub fn current_position(&self) -> GridPosition {
        self.current
    }

    /// Selected cells in row-major order.
    pub fn selected_cells(&self) -> &BTreeSet<GridPosition> {
        &self.selected
    }

    /// Whether `position` is part of the selection.
    pub fn is_selected(&self, position: GridPosition) -> bool {
        self.selected.contains(&position)
    }

    /// Range selection anchor, if a rectangle is being extended.
    pub fn anchor(&self) -> Option<GridPosition> {
        self.anchor
    }

    /// Cells an edit applies to: the selection, or the cursor cell when nothing is selected.
    pub fn targets(&self) -> Vec<GridPosition> {
        if self.selected.is_empty() {
            vec![self.current]
        } else {
            self.selected.iter().copied().collect()
        }
    }

    /// Move the cursor without touching the selected cells.
    ///
    /// A plain move ends keyboard range selection; the next extend anchors here.
    pub fn set_current(&mut self, position: GridPosition) {
        self.current = position;
        self.anchor = None;
    }

    /// Move the cursor by a signed offset, clamped to the grid. Returns the new cursor.
    pub fn move_by(&mut self, dx: i32, dy: i32, grid_size: GridSize) -> GridPosition {
        self.current = offset_clamped(self.current, dx, dy, grid_size);
        self.anchor = None;
        self.current
    }

    /// Add or remove a single cell.
    pub fn toggle(&mut self, position: GridPosition) {
        if !self.selected.remove(&position) {
            self.selected.insert(position);
        }
        self.anchor = None;
    }

    /// Add a single cell.
    pub fn select(&mut self, position: GridPosition) {
        self.selected.insert(position);
        self.anchor = None;
    }

    /// Replace the selection with the rectangle spanned by two corners (inclusive).
    pub fn select_rect(&mut self, from: GridPosition, to: GridPosition) {
        self.selected = rect_cells(from, to).collect();
    }

    /// Keyboard range selection: anchor at the cursor on first use, move the cursor,
    /// then select the rectangle between anchor and cursor.
    pub fn extend_by(&mut self, dx: i32, dy: i32, grid_size: GridSize) {
        let anchor = *self.anchor.get_or_insert(self.current);
        self.current = offset_clamped(self.current, dx, dy, grid_size);
        self.select_rect(anchor, self.current);
    }

    /// Select every cell of the grid.
    pub fn select_all(&mut self, grid_size: GridSize) {
        self.selected = grid_size.positions().collect();
        self.anchor = None;
    }

    /// Drop the selection (the cursor stays put).
    pub fn clear(&mut self) {
        self.selected.clear();
        self.anchor = None;
    }

    /// Clamp the cursor and drop selected cells that no longer fit `grid_size`.
    pub fn clamp_to(&mut self, grid_size: GridSize) {
        self.current = GridPosition::new(
            self.current.x.min(grid_size.width.saturating_sub(1)),
            self.current.y.min(grid_size.height.saturating_sub(1)),
        );
        self.selected
            .retain(|p| p.x < grid_size.width && p.y < grid_size.height);
        if let Some(anchor) = self.anchor
            && (anchor.x >= grid_size.width || anchor.y >= grid_size.height)
        {
            self.anchor = None;
        }
    }
}

fn offset_clamped(position: GridPosition, dx: i32, dy: i32, grid_size: GridSize) -> GridPosition {
    let clamp = |value: u32, delta: i32, limit: u32| -> u32 {
        let max = i64::from(limit.saturating_sub(1));
        (i64::from(value) + i64::from(delta)).clamp(0, max) as u32
    };
    GridPosition::new(
        clamp(position.x, dx, grid_size.width),
        clamp(position.y, dy, grid_size.height),
    )
}

/// All cells of the inclusive rectangle spanned by two corners.
pub fn rect_cells(a: GridPosition, b: GridPosition) -> impl Iterator<Item = GridPosition> {
    let (x0, x1) = (a.x.min(b.x), a.x.max(b.x));
    let (y0, y1) = (a.y.min(b.y), a.y.max(b.y));
    (y0..=y1).flat_map(move |y| (x0..=x1).map(move |x| GridPosition::new(x, y)))
}
