//! Pieces module - tetromino rotation shapes and the piece catalog
//!
//! Each rotation shape is stored tight to its bounding box: cell offsets are
//! relative to the box's top-left corner, so a shape anchored at `(x, y)` spans
//! columns `x..x + width` and rows `y..y + height`.
//!
//! Pieces only carry their *distinct* rotations (the O piece has one, I/S/Z have
//! two, T/J/L have four). Rotation index 0 is the spawn orientation.

use crate::types::{Point, Size};

/// One orientation of a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationShape {
    /// Bounding box of the occupied cells.
    pub size: Size,
    /// Occupied cells, relative to the bounding box's top-left corner.
    pub cells: &'static [Point],
}

impl RotationShape {
    pub const fn new(width: i32, height: i32, cells: &'static [Point]) -> Self {
        Self {
            size: Size::new(width, height),
            cells,
        }
    }

    /// Absolute cells covered when the shape is anchored at `at`.
    pub fn cells_at(&self, at: Point) -> impl Iterator<Item = Point> + '_ {
        self.cells.iter().map(move |&c| at.offset(c))
    }
}

/// A catalog entry: identity, display name, and its rotation shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub id: usize,
    pub name: &'static str,
    pub rotations: &'static [RotationShape],
}

impl Piece {
    /// Number of cells the piece occupies (same in every rotation).
    pub fn pip_count(&self) -> usize {
        self.rotations.first().map_or(0, |r| r.cells.len())
    }
}

/// Read-only lookup of pieces by id.
///
/// Ids are dense: every id in `0..piece_count()` is valid.
pub trait PieceCatalog {
    fn piece_count(&self) -> usize;

    /// Look up a piece. Panics if `id >= piece_count()`.
    fn piece(&self, id: usize) -> &Piece;

    /// Rotation shape for a placement's piece and rotation index.
    fn rotation(&self, id: usize, rotation: usize) -> &RotationShape {
        &self.piece(id).rotations[rotation]
    }
}

macro_rules! pt {
    ($x:expr, $y:expr) => {
        Point { x: $x, y: $y }
    };
}

const I_ROTATIONS: [RotationShape; 2] = [
    // flat
    RotationShape::new(4, 1, &[pt!(0, 0), pt!(1, 0), pt!(2, 0), pt!(3, 0)]),
    // upright
    RotationShape::new(1, 4, &[pt!(0, 0), pt!(0, 1), pt!(0, 2), pt!(0, 3)]),
];

const O_ROTATIONS: [RotationShape; 1] =
    [RotationShape::new(2, 2, &[pt!(0, 0), pt!(1, 0), pt!(0, 1), pt!(1, 1)])];

const T_ROTATIONS: [RotationShape; 4] = [
    RotationShape::new(3, 2, &[pt!(1, 0), pt!(0, 1), pt!(1, 1), pt!(2, 1)]),
    RotationShape::new(2, 3, &[pt!(0, 0), pt!(0, 1), pt!(1, 1), pt!(0, 2)]),
    RotationShape::new(3, 2, &[pt!(0, 0), pt!(1, 0), pt!(2, 0), pt!(1, 1)]),
    RotationShape::new(2, 3, &[pt!(1, 0), pt!(0, 1), pt!(1, 1), pt!(1, 2)]),
];

const S_ROTATIONS: [RotationShape; 2] = [
    RotationShape::new(3, 2, &[pt!(1, 0), pt!(2, 0), pt!(0, 1), pt!(1, 1)]),
    RotationShape::new(2, 3, &[pt!(0, 0), pt!(0, 1), pt!(1, 1), pt!(1, 2)]),
];

const Z_ROTATIONS: [RotationShape; 2] = [
    RotationShape::new(3, 2, &[pt!(0, 0), pt!(1, 0), pt!(1, 1), pt!(2, 1)]),
    RotationShape::new(2, 3, &[pt!(1, 0), pt!(0, 1), pt!(1, 1), pt!(0, 2)]),
];

const J_ROTATIONS: [RotationShape; 4] = [
    RotationShape::new(3, 2, &[pt!(0, 0), pt!(0, 1), pt!(1, 1), pt!(2, 1)]),
    RotationShape::new(2, 3, &[pt!(0, 0), pt!(1, 0), pt!(0, 1), pt!(0, 2)]),
    RotationShape::new(3, 2, &[pt!(0, 0), pt!(1, 0), pt!(2, 0), pt!(2, 1)]),
    RotationShape::new(2, 3, &[pt!(1, 0), pt!(1, 1), pt!(0, 2), pt!(1, 2)]),
];

const L_ROTATIONS: [RotationShape; 4] = [
    RotationShape::new(3, 2, &[pt!(2, 0), pt!(0, 1), pt!(1, 1), pt!(2, 1)]),
    RotationShape::new(2, 3, &[pt!(0, 0), pt!(0, 1), pt!(0, 2), pt!(1, 2)]),
    RotationShape::new(3, 2, &[pt!(0, 0), pt!(1, 0), pt!(2, 0), pt!(0, 1)]),
    RotationShape::new(2, 3, &[pt!(0, 0), pt!(1, 0), pt!(1, 1), pt!(1, 2)]),
];

/// The seven standard tetrominoes, ids 0-6 in the order I, O, T, S, Z, J, L.
pub static STANDARD_PIECES: [Piece; 7] = [
    Piece { id: 0, name: "I", rotations: &I_ROTATIONS },
    Piece { id: 1, name: "O", rotations: &O_ROTATIONS },
    Piece { id: 2, name: "T", rotations: &T_ROTATIONS },
    Piece { id: 3, name: "S", rotations: &S_ROTATIONS },
    Piece { id: 4, name: "Z", rotations: &Z_ROTATIONS },
    Piece { id: 5, name: "J", rotations: &J_ROTATIONS },
    Piece { id: 6, name: "L", rotations: &L_ROTATIONS },
];

/// Catalog over [`STANDARD_PIECES`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardPieces;

impl PieceCatalog for StandardPieces {
    fn piece_count(&self) -> usize {
        STANDARD_PIECES.len()
    }

    fn piece(&self, id: usize) -> &Piece {
        &STANDARD_PIECES[id]
    }
}

impl StandardPieces {
    /// Id of the piece with the given name ("I", "O", ...).
    pub fn id_of(name: &str) -> Option<usize> {
        STANDARD_PIECES
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .map(|p| p.id)
    }
}
