//! Facility layout model
//!
//! A [`FacilityLayout`] is a named, sized grid plus the objects placed on it.
//! Layouts are plain values: every editing operation produces a new layout, and
//! the history keeps full snapshots.
//!
//! # Example
//!
//! ```rust
//! use layout_editor_core::{FacilityLayout, GridPosition, GridSize, ObjectKind};
//!
//! let layout = FacilityLayout::filled_with_spaces("Hall", "reading-room", GridSize::new(3, 2)).unwrap();
//! assert_eq!(layout.objects.len(), 6);
//! assert_eq!(
//!     layout.object_at(GridPosition::new(2, 1)).map(|o| o.kind()),
//!     Some(ObjectKind::Space)
//! );
//! ```

use crate::grid::{
    GridObject, GridPosition, GridSize, MAX_GRID_SIZE, MIN_GRID_SIZE, ObjectKind, SeatStatus,
    counter_seat_index, is_position_valid, object_at, objects_of_type,
};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

/// Default rendering size of one cell, in pixels.
pub const DEFAULT_CELL_SIZE: u32 = 40;

const ID_SUFFIX_LEN: usize = 6;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

static ID_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Layout validation / persistence errors
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    /// Grid dimensions outside `MIN_GRID_SIZE..=MAX_GRID_SIZE`.
    #[error("invalid grid size {width}x{height} (allowed {min}..={max})", min = MIN_GRID_SIZE, max = MAX_GRID_SIZE)]
    InvalidGridSize {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// An object sits outside the grid.
    #[error("object {id} at {position} is outside the {grid_size} grid")]
    OutOfBounds {
        /// Offending object id.
        id: String,
        /// Its position.
        position: GridPosition,
        /// Layout bounds.
        grid_size: GridSize,
    },
    /// Two objects share one cell.
    #[error("cell {0} is occupied by more than one object")]
    DuplicatePosition(GridPosition),
    /// Two objects share one id.
    #[error("object id {0} is used more than once")]
    DuplicateId(String),
    /// Only 1x1 objects are supported.
    #[error("object {id} has unsupported size {size}")]
    UnsupportedSize {
        /// Offending object id.
        id: String,
        /// Its footprint.
        size: GridSize,
    },
    /// Malformed JSON document.
    #[error("invalid layout document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Generate an id of the form `<prefix>-<unix millis>-<base36 suffix>`.
///
/// The suffix mixes a process-wide sequence number with random characters, so ids
/// generated within the same millisecond in one process never repeat.
pub fn generate_id(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let sequence = ID_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let mut rng = rand::thread_rng();
    let random: String = (0..ID_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    let id = format!("{prefix}-{millis}-{}{random}", to_base36(sequence));
    tracing::trace!(%id, "generated id");
    id
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    digits.into_iter().map(char::from).collect()
}

/// Aggregated counts over a layout
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutSummary {
    /// Number of seats.
    pub seat_count: usize,
    /// Number of space markers.
    pub space_count: usize,
    /// Number of generic objects.
    pub object_count: usize,
    /// Seats that can be reserved.
    pub reservable_seat_count: usize,
    /// Seat count per status (every status present, possibly zero).
    pub seats_by_status: BTreeMap<SeatStatus, usize>,
    /// Cells with no object at all.
    pub empty_cell_count: usize,
}

impl LayoutSummary {
    /// Number of seats with the given status.
    pub fn seats_with_status(&self, status: SeatStatus) -> usize {
        self.seats_by_status.get(&status).copied().unwrap_or(0)
    }
}

/// A named grid plus its placed objects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityLayout {
    /// Unique id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-text classification (reading room, meeting room, ...).
    pub category: String,
    /// Grid bounds.
    pub grid_size: GridSize,
    /// Placed objects, in insertion order.
    pub objects: Vec<GridObject>,
    /// Rendering size of one cell, in pixels.
    #[serde(default = "default_cell_size")]
    pub cell_size: u32,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Monotonic counter feeding counter-based seat names.
    #[serde(default)]
    pub next_seat_index: usize,
}

fn default_cell_size() -> u32 {
    DEFAULT_CELL_SIZE
}

impl FacilityLayout {
    /// Create an empty layout.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        grid_size: GridSize,
    ) -> Result<Self, LayoutError> {
        if !grid_size.is_valid_grid() {
            return Err(LayoutError::InvalidGridSize {
                width: grid_size.width,
                height: grid_size.height,
            });
        }

        let now = Utc::now();
        Ok(Self {
            id: generate_id("layout"),
            name: name.into(),
            category: category.into(),
            grid_size,
            objects: Vec::new(),
            cell_size: DEFAULT_CELL_SIZE,
            created_at: now,
            updated_at: now,
            next_seat_index: 0,
        })
    }

    /// Create a layout where every cell holds a space marker.
    pub fn filled_with_spaces(
        name: impl Into<String>,
        category: impl Into<String>,
        grid_size: GridSize,
    ) -> Result<Self, LayoutError> {
        let mut layout = Self::new(name, category, grid_size)?;
        layout.objects = grid_size
            .positions()
            .map(|position| {
                GridObject::new(
                    ObjectKind::Space,
                    generate_id(ObjectKind::Space.id_prefix()),
                    String::new(),
                    position,
                )
            })
            .collect();
        Ok(layout)
    }

    /// Builder-style cell size override.
    pub fn with_cell_size(mut self, cell_size: u32) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Object at `position`, if any.
    pub fn object_at(&self, position: GridPosition) -> Option<&GridObject> {
        object_at(&self.objects, position)
    }

    /// Object with the given id, if any.
    pub fn object_by_id(&self, id: &str) -> Option<&GridObject> {
        self.objects.iter().find(|object| object.id() == id)
    }

    /// Bounds check against this layout's grid.
    pub fn is_position_valid(&self, position: GridPosition) -> bool {
        is_position_valid(self.grid_size, position)
    }

    /// All objects of `kind`.
    pub fn objects_of_type(&self, kind: ObjectKind) -> Vec<&GridObject> {
        objects_of_type(&self.objects, kind)
    }

    /// Refresh `updated_at`.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Check structural invariants; returns the first violation found.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if !self.grid_size.is_valid_grid() {
            return Err(LayoutError::InvalidGridSize {
                width: self.grid_size.width,
                height: self.grid_size.height,
            });
        }

        let mut positions = HashSet::with_capacity(self.objects.len());
        let mut ids = HashSet::with_capacity(self.objects.len());
        for object in &self.objects {
            if object.size() != GridSize::unit() {
                return Err(LayoutError::UnsupportedSize {
                    id: object.id().to_string(),
                    size: object.size(),
                });
            }
            if !self.is_position_valid(object.position()) {
                return Err(LayoutError::OutOfBounds {
                    id: object.id().to_string(),
                    position: object.position(),
                    grid_size: self.grid_size,
                });
            }
            if !positions.insert(object.position()) {
                return Err(LayoutError::DuplicatePosition(object.position()));
            }
            if !ids.insert(object.id()) {
                return Err(LayoutError::DuplicateId(object.id().to_string()));
            }
        }

        Ok(())
    }

    /// Counts per kind and per seat status.
    pub fn summary(&self) -> LayoutSummary {
        let mut summary = LayoutSummary::default();
        for status in SeatStatus::ALL {
            summary.seats_by_status.insert(status, 0);
        }

        for object in &self.objects {
            match object {
                GridObject::Seat(seat) => {
                    summary.seat_count += 1;
                    if seat.reservable {
                        summary.reservable_seat_count += 1;
                    }
                    *summary.seats_by_status.entry(seat.status).or_insert(0) += 1;
                }
                GridObject::Space(_) => summary.space_count += 1,
                GridObject::Object(_) => summary.object_count += 1,
            }
        }

        summary.empty_cell_count = self
            .grid_size
            .cell_count()
            .saturating_sub(self.objects.len());
        summary
    }

    /// Compact JSON document.
    pub fn to_json(&self) -> Result<String, LayoutError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Pretty-printed JSON document.
    pub fn to_json_pretty(&self) -> Result<String, LayoutError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate a JSON document.
    ///
    /// The seat counter is raised past every seat already in the document, so
    /// files written without `nextSeatIndex` never hand out a name twice.
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let mut layout: FacilityLayout = serde_json::from_str(json)?;
        layout.validate()?;
        layout.reconcile_seat_counter();
        Ok(layout)
    }

    fn reconcile_seat_counter(&mut self) {
        let seats = self.objects_of_type(ObjectKind::Seat);
        let floor = seats
            .iter()
            .filter_map(|seat| seat.name().and_then(counter_seat_index))
            .map(|index| index.saturating_add(1))
            .max()
            .unwrap_or(0)
            .max(seats.len());

        if self.next_seat_index < floor {
            tracing::debug!(
                from = self.next_seat_index,
                to = floor,
                "raised seat counter"
            );
            self.next_seat_index = floor;
        }
    }
}
