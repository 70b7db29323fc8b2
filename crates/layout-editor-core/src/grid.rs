//! Grid primitives and pure queries over placed objects.
//!
//! Everything in this module is side-effect free: lookups scan the object list,
//! and ordering helpers return new vectors instead of sorting in place.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Smallest allowed grid dimension.
pub const MIN_GRID_SIZE: u32 = 1;

/// Largest allowed grid dimension (a 30x30 grid holds at most 900 cells).
pub const MAX_GRID_SIZE: u32 = 30;

/// Display name given to freshly placed generic objects.
pub const DEFAULT_OBJECT_NAME: &str = "사물";

/// Number of seats that share one letter block under counter naming (`A-01`..`A-10`).
pub const SEATS_PER_LETTER: usize = 10;

/// Cell coordinates (column `x`, row `y`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    /// Zero-based column.
    pub x: u32,
    /// Zero-based row.
    pub y: u32,
}

impl GridPosition {
    /// Create a new grid position.
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl Ord for GridPosition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then_with(|| self.x.cmp(&other.x))
    }
}

impl PartialOrd for GridPosition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Width x height, used both for grid bounds and for object footprints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
}

impl GridSize {
    /// Create a new size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The single-cell footprint every object currently has.
    pub fn unit() -> Self {
        Self::new(1, 1)
    }

    /// Whether both dimensions are inside `MIN_GRID_SIZE..=MAX_GRID_SIZE`.
    pub fn is_valid_grid(&self) -> bool {
        (MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.width)
            && (MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.height)
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Iterate all cells in row-major order.
    pub fn positions(self) -> impl Iterator<Item = GridPosition> {
        let width = self.width;
        (0..self.height).flat_map(move |y| (0..width).map(move |x| GridPosition::new(x, y)))
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Discriminant of [`GridObject`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// A bookable seat.
    Seat,
    /// An explicit empty cell marker.
    Space,
    /// Furniture or an obstacle.
    Object,
}

impl ObjectKind {
    /// Prefix used when generating ids for objects of this kind.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            ObjectKind::Seat => "seat",
            ObjectKind::Space => "space",
            ObjectKind::Object => "object",
        }
    }

    /// Whether objects of this kind carry a display name.
    pub fn is_nameable(&self) -> bool {
        !matches!(self, ObjectKind::Space)
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id_prefix())
    }
}

/// Seat availability
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    /// Free to book.
    #[default]
    Available,
    /// Currently in use.
    Occupied,
    /// Booked ahead of time.
    Reserved,
    /// Out of service.
    Disabled,
}

impl SeatStatus {
    /// All statuses, in display order.
    pub const ALL: [SeatStatus; 4] = [
        SeatStatus::Available,
        SeatStatus::Occupied,
        SeatStatus::Reserved,
        SeatStatus::Disabled,
    ];
}

/// Seat payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    /// Unique id.
    pub id: String,
    /// Display name, e.g. `A-01`.
    pub name: String,
    /// Footprint (always 1x1).
    pub size: GridSize,
    /// Cell occupied by the seat.
    pub position: GridPosition,
    /// Availability.
    #[serde(default)]
    pub status: SeatStatus,
    /// Whether the seat can be reserved.
    pub reservable: bool,
}

/// Space payload (placeholder for an empty cell)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    /// Unique id.
    pub id: String,
    /// Footprint (always 1x1).
    pub size: GridSize,
    /// Cell occupied by the marker.
    pub position: GridPosition,
}

/// Generic object payload (furniture, pillars, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityObject {
    /// Unique id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Footprint (always 1x1).
    pub size: GridSize,
    /// Cell occupied by the object.
    pub position: GridPosition,
}

/// Something placed on the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GridObject {
    /// A seat.
    Seat(Seat),
    /// An empty cell marker.
    Space(Space),
    /// A generic object.
    Object(FacilityObject),
}

impl GridObject {
    /// Build a new object of `kind` at `position`.
    ///
    /// Seats start out available and reservable. `name` is ignored for spaces.
    pub fn new(kind: ObjectKind, id: String, name: String, position: GridPosition) -> Self {
        let size = GridSize::unit();
        match kind {
            ObjectKind::Seat => GridObject::Seat(Seat {
                id,
                name,
                size,
                position,
                status: SeatStatus::Available,
                reservable: true,
            }),
            ObjectKind::Space => GridObject::Space(Space { id, size, position }),
            ObjectKind::Object => GridObject::Object(FacilityObject {
                id,
                name,
                size,
                position,
            }),
        }
    }

    /// Object id.
    pub fn id(&self) -> &str {
        match self {
            GridObject::Seat(seat) => &seat.id,
            GridObject::Space(space) => &space.id,
            GridObject::Object(object) => &object.id,
        }
    }

    /// Discriminant.
    pub fn kind(&self) -> ObjectKind {
        match self {
            GridObject::Seat(_) => ObjectKind::Seat,
            GridObject::Space(_) => ObjectKind::Space,
            GridObject::Object(_) => ObjectKind::Object,
        }
    }

    /// Occupied cell.
    pub fn position(&self) -> GridPosition {
        match self {
            GridObject::Seat(seat) => seat.position,
            GridObject::Space(space) => space.position,
            GridObject::Object(object) => object.position,
        }
    }

    /// Footprint.
    pub fn size(&self) -> GridSize {
        match self {
            GridObject::Seat(seat) => seat.size,
            GridObject::Space(space) => space.size,
            GridObject::Object(object) => object.size,
        }
    }

    /// Display name; `None` for spaces.
    pub fn name(&self) -> Option<&str> {
        match self {
            GridObject::Seat(seat) => Some(&seat.name),
            GridObject::Space(_) => None,
            GridObject::Object(object) => Some(&object.name),
        }
    }

    /// Replace the display name. Returns `false` for spaces, which have none.
    pub fn set_name(&mut self, name: String) -> bool {
        match self {
            GridObject::Seat(seat) => {
                seat.name = name;
                true
            }
            GridObject::Space(_) => false,
            GridObject::Object(object) => {
                object.name = name;
                true
            }
        }
    }

    /// Only seats can ever be reservable.
    pub fn is_reservable(&self) -> bool {
        match self {
            GridObject::Seat(seat) => seat.reservable,
            GridObject::Space(_) | GridObject::Object(_) => false,
        }
    }

    /// Seat payload, if this is a seat.
    pub fn as_seat(&self) -> Option<&Seat> {
        match self {
            GridObject::Seat(seat) => Some(seat),
            _ => None,
        }
    }

    /// Mutable seat payload, if this is a seat.
    pub fn as_seat_mut(&mut self) -> Option<&mut Seat> {
        match self {
            GridObject::Seat(seat) => Some(seat),
            _ => None,
        }
    }
}

/// Find the object occupying `position`.
pub fn object_at(objects: &[GridObject], position: GridPosition) -> Option<&GridObject> {
    objects.iter().find(|object| object.position() == position)
}

/// Bounds check against the grid size.
pub fn is_position_valid(grid_size: GridSize, position: GridPosition) -> bool {
    position.x < grid_size.width && position.y < grid_size.height
}

/// All objects of the given kind, in storage order.
pub fn objects_of_type(objects: &[GridObject], kind: ObjectKind) -> Vec<&GridObject> {
    objects.iter().filter(|object| object.kind() == kind).collect()
}

/// Default display name for the `index`-th object of `kind`.
///
/// Seats are named in letter blocks of [`SEATS_PER_LETTER`]: `0 -> A-01`,
/// `9 -> A-10`, `10 -> B-01`. Objects get [`DEFAULT_OBJECT_NAME`], spaces have no name.
pub fn default_object_name(kind: ObjectKind, index: usize) -> String {
    match kind {
        ObjectKind::Seat => {
            let block = index / SEATS_PER_LETTER;
            let number = index % SEATS_PER_LETTER + 1;
            format!("{}-{:02}", letter_label(block), number)
        }
        ObjectKind::Object => DEFAULT_OBJECT_NAME.to_string(),
        ObjectKind::Space => String::new(),
    }
}

/// Counter index encoded in a seat name of the form produced by
/// [`default_object_name`] (`A-01 -> 0`, `B-01 -> 10`). Other names give `None`.
pub fn counter_seat_index(name: &str) -> Option<usize> {
    let (letters, number) = name.split_once('-')?;
    if letters.is_empty() || !letters.bytes().all(|b| b.is_ascii_uppercase()) {
        return None;
    }
    if number.len() != 2 || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let number: usize = number.parse().ok()?;
    if !(1..=SEATS_PER_LETTER).contains(&number) {
        return None;
    }

    let block = letters.bytes().try_fold(0usize, |acc, b| {
        acc.checked_mul(26)?.checked_add(usize::from(b - b'A') + 1)
    })? - 1;
    block
        .checked_mul(SEATS_PER_LETTER)?
        .checked_add(number - 1)
}

/// Seat name derived from the cell: row letter plus 1-based column (`(2, 0) -> A-03`).
pub fn positional_seat_name(position: GridPosition) -> String {
    format!("{}-{:02}", letter_label(position.y as usize), position.x + 1)
}

/// Spreadsheet-style letters: 0 -> A, 25 -> Z, 26 -> AA.
pub fn letter_label(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.reverse();
    letters.into_iter().map(char::from).collect()
}

/// Objects ordered by row, then column. The input is left untouched.
pub fn sort_objects_by_position(objects: &[GridObject]) -> Vec<GridObject> {
    let mut sorted = objects.to_vec();
    sorted.sort_by_key(|object| object.position());
    sorted
}
