//! Linear undo/redo history of layout snapshots.
//!
//! Every committed edit stores the complete resulting layout. Undo and redo only
//! move a cursor; pushing a new snapshot while the cursor is not at the end
//! discards the redo tail.

use crate::layout::FacilityLayout;

/// Default number of snapshots kept (including the initial one).
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// Snapshot list plus cursor
#[derive(Debug, Clone)]
pub struct LayoutHistory {
    entries: Vec<FacilityLayout>,
    index: usize,
    max_entries: usize,
    /// Clean point tracking. Uses an entry index as the saved position; `None` once
    /// the saved snapshot has been discarded.
    clean_index: Option<usize>,
}

impl LayoutHistory {
    /// Start a history whose only entry is `initial`.
    ///
    /// `max_entries` is clamped to at least 1.
    pub fn new(initial: FacilityLayout, max_entries: usize) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
            max_entries: max_entries.max(1),
            clean_index: Some(0),
        }
    }

    /// Layout at the cursor.
    pub fn current(&self) -> &FacilityLayout {
        &self.entries[self.index]
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: the initial snapshot is never dropped without a replacement.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cursor position within the snapshot list.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Capacity.
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Can undo
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    /// Can redo
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Number of undo steps available.
    pub fn undo_depth(&self) -> usize {
        self.index
    }

    /// Number of redo steps available.
    pub fn redo_depth(&self) -> usize {
        self.entries.len() - self.index - 1
    }

    /// Whether the cursor sits on the last saved snapshot.
    pub fn is_clean(&self) -> bool {
        self.clean_index == Some(self.index)
    }

    /// Mark the current snapshot as saved.
    pub fn mark_clean(&mut self) {
        self.clean_index = Some(self.index);
    }

    /// Append a snapshot after the cursor, dropping any redo entries.
    pub fn push(&mut self, layout: FacilityLayout) {
        if self.can_redo() {
            // A clean point in the redo area becomes unreachable.
            if let Some(clean_index) = self.clean_index
                && clean_index > self.index
            {
                self.clean_index = None;
            }
            self.entries.truncate(self.index + 1);
        }

        self.entries.push(layout);
        self.index = self.entries.len() - 1;

        if self.entries.len() > self.max_entries {
            let overflow = self.entries.len() - self.max_entries;
            self.entries.drain(..overflow);
            self.index -= overflow;
            self.clean_index = match self.clean_index {
                Some(clean_index) if clean_index >= overflow => Some(clean_index - overflow),
                _ => None,
            };
        }

        tracing::debug!(
            entries = self.entries.len(),
            index = self.index,
            "history push"
        );
    }

    /// Step back; returns the layout now at the cursor.
    pub fn undo(&mut self) -> Option<&FacilityLayout> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        tracing::debug!(index = self.index, "history undo");
        Some(self.current())
    }

    /// Step forward; returns the layout now at the cursor.
    pub fn redo(&mut self) -> Option<&FacilityLayout> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        tracing::debug!(index = self.index, "history redo");
        Some(self.current())
    }

    /// Drop all snapshots and restart from `layout` (used when a document is loaded).
    pub fn reset(&mut self, layout: FacilityLayout) {
        self.entries.clear();
        self.entries.push(layout);
        self.index = 0;
        self.clean_index = Some(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridSize;

    fn layout(name: &str) -> FacilityLayout {
        FacilityLayout::new(name, "", GridSize::new(2, 2)).unwrap()
    }

    #[test]
    fn test_undo_redo_moves_cursor() {
        let mut history = LayoutHistory::new(layout("v0"), 10);
        history.push(layout("v1"));
        history.push(layout("v2"));

        assert_eq!(history.current().name, "v2");
        assert_eq!(history.undo().map(|l| l.name.clone()), Some("v1".to_string()));
        assert_eq!(history.undo().map(|l| l.name.clone()), Some("v0".to_string()));
        assert!(history.undo().is_none());
        assert_eq!(history.redo_depth(), 2);

        assert_eq!(history.redo().map(|l| l.name.clone()), Some("v1".to_string()));
        assert_eq!(history.undo_depth(), 1);
    }

    #[test]
    fn test_push_after_undo_truncates_redo() {
        let mut history = LayoutHistory::new(layout("v0"), 10);
        history.push(layout("v1"));
        history.push(layout("v2"));
        history.undo();
        history.undo();

        history.push(layout("v3"));
        assert!(!history.can_redo());
        assert_eq!(history.len(), 2);
        assert_eq!(history.current().name, "v3");
        assert_eq!(history.undo().map(|l| l.name.clone()), Some("v0".to_string()));
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut history = LayoutHistory::new(layout("v0"), 3);
        for i in 1..=5 {
            history.push(layout(&format!("v{i}")));
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.undo_depth(), 2);
        history.undo();
        assert_eq!(history.undo().map(|l| l.name.clone()), Some("v3".to_string()));
        assert!(!history.can_undo());
    }

    #[test]
    fn test_clean_point_tracking() {
        let mut history = LayoutHistory::new(layout("v0"), 10);
        assert!(history.is_clean());

        history.push(layout("v1"));
        assert!(!history.is_clean());
        history.mark_clean();
        assert!(history.is_clean());

        history.undo();
        assert!(!history.is_clean());
        history.redo();
        assert!(history.is_clean());

        // Saved snapshot lives in the redo area and is discarded.
        history.undo();
        history.push(layout("v2"));
        assert!(!history.is_clean());
        history.undo();
        assert!(!history.is_clean());
    }

    #[test]
    fn test_clean_point_lost_when_trimmed() {
        let mut history = LayoutHistory::new(layout("v0"), 2);
        history.push(layout("v1"));
        history.push(layout("v2"));
        history.undo();
        assert!(!history.is_clean());
    }
}
