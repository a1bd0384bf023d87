//! Shared types module - grid geometry, placements, and simulation events
//!
//! This crate defines the plain data passed between the solver, the event
//! generator, and the display backends. Nothing here owns behavior beyond small
//! constructors and accessors.
//!
//! # Board Dimensions
//!
//! Standard playfield dimensions:
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 is the top)
//!
//! # Animation Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `ROTATION_STEP_MS` | 300 | Time spent on each rotation step |
//! | `SLOW_DROP_MS` | 1000 | Gravity period while rotating and sliding |
//! | `HORIZONTAL_STEP_MS` | 150 | Time spent on each one-column slide |
//! | `FAST_DROP_WAIT_MS` | 750 | Pause before the fast drop starts |
//! | `FAST_DROP_STEP_MS` | 150 | Time per row during the fast drop |
//! | `CLEAR_HOLD_MS` | 500 | How long a clear frame stays on screen |
//!
//! # Examples
//!
//! ```
//! use infinitetris_types::{PlacedPiece, Point, Size, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let size = Size::new(BOARD_WIDTH, BOARD_HEIGHT);
//! assert!(size.contains(Point::new(9, 19)));
//! assert!(!size.contains(Point::new(10, 0)));
//!
//! let placed = PlacedPiece::new(0, 1, Point::new(4, 16));
//! assert_eq!(placed.position.y, 16);
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: i32 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: i32 = 20;

/// Time spent showing each rotation step before the next one.
pub const ROTATION_STEP_MS: u32 = 300;

/// Gravity period while the piece is still rotating or sliding.
pub const SLOW_DROP_MS: u32 = 1000;

/// Time spent on each one-column horizontal slide.
pub const HORIZONTAL_STEP_MS: u32 = 150;

/// Pause between the end of sliding and the start of the fast drop.
pub const FAST_DROP_WAIT_MS: u32 = 750;

/// Time per row once the fast drop has started.
pub const FAST_DROP_STEP_MS: u32 = 150;

/// How long a frame showing a row clearance is held.
pub const CLEAR_HOLD_MS: u32 = 500;

/// Largest clearance a single placement can trigger (tallest piece is 4 rows).
pub const MAX_CLEARANCE_ROWS: usize = 4;

/// Relative weights used when ordering clearance sizes for a run.
///
/// Entries are `(rows, weight)`. Larger clearances are preferred.
pub const CLEARANCE_WEIGHTS: [(usize, u32); 4] = [(4, 50), (3, 25), (2, 15), (1, 10)];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_defaults() {
        assert_eq!(ROTATION_STEP_MS, 300);
        assert_eq!(SLOW_DROP_MS, 1000);
        assert_eq!(HORIZONTAL_STEP_MS, 150);
        assert_eq!(FAST_DROP_WAIT_MS, 750);
        assert_eq!(FAST_DROP_STEP_MS, 150);
    }

    #[test]
    fn clearance_weights_cover_every_size() {
        let mut rows: Vec<usize> = CLEARANCE_WEIGHTS.iter().map(|&(r, _)| r).collect();
        rows.sort_unstable();
        assert_eq!(rows, (1..=MAX_CLEARANCE_ROWS).collect::<Vec<_>>());
        assert_eq!(CLEARANCE_WEIGHTS.iter().map(|&(_, w)| w).sum::<u32>(), 100);
    }

    #[test]
    fn event_json_is_tagged() {
        let event = SimulationEvent::Appear(AppearEvent {
            piece_id: 3,
            placement: PlacedPiece::new(2, 0, Point::new(4, 0)),
            duration_ms: 1000,
        });
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.starts_with(r#"{"type":"appear""#), "{json}");

        let back: SimulationEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}

/// A cell coordinate on the grid: `x` is the column, `y` the row (0 = top).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset this point by another point.
    pub const fn offset(self, by: Point) -> Self {
        Self {
            x: self.x + by.x,
            y: self.y + by.y,
        }
    }
}

/// Width and height of a grid or of a rotation shape's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Whether `pt` lies inside a grid of this size.
    pub const fn contains(self, pt: Point) -> bool {
        pt.x >= 0 && pt.x < self.width && pt.y >= 0 && pt.y < self.height
    }

    /// Number of cells in a grid of this size.
    pub fn area(self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize)
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(BOARD_WIDTH, BOARD_HEIGHT)
    }
}

/// A piece resting (or shown) at a position: catalog id, rotation index, and
/// the top-left anchor of the rotation shape's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacedPiece {
    pub id: usize,
    pub rotation: usize,
    pub position: Point,
}

impl PlacedPiece {
    pub const fn new(id: usize, rotation: usize, position: Point) -> Self {
        Self {
            id,
            rotation,
            position,
        }
    }

    /// The same piece and rotation at another anchor.
    pub const fn moved_to(self, position: Point) -> Self {
        Self { position, ..self }
    }
}

/// A piece instance entering the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppearEvent {
    /// Unique id of this piece instance within an event stream.
    pub piece_id: usize,
    pub placement: PlacedPiece,
    /// How long the piece stays at `placement` before the next event.
    pub duration_ms: u32,
}

/// A piece instance moving from one placement to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveEvent {
    pub piece_id: usize,
    pub before: PlacedPiece,
    pub after: PlacedPiece,
    /// How long the piece stays at `after` before the next event.
    pub duration_ms: u32,
}

/// Completed rows being removed from the board.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClearEvent {
    pub rows: BTreeSet<i32>,
}

/// One step of a simulation, consumed in order by a display backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SimulationEvent {
    Appear(AppearEvent),
    Move(MoveEvent),
    Clear(ClearEvent),
}

impl SimulationEvent {
    /// Piece instance this event refers to, if any.
    pub fn piece_id(&self) -> Option<usize> {
        match self {
            SimulationEvent::Appear(e) => Some(e.piece_id),
            SimulationEvent::Move(e) => Some(e.piece_id),
            SimulationEvent::Clear(_) => None,
        }
    }

    /// Display time attached to the event. Clear frames use [`CLEAR_HOLD_MS`].
    pub fn duration_ms(&self) -> u32 {
        match self {
            SimulationEvent::Appear(e) => e.duration_ms,
            SimulationEvent::Move(e) => e.duration_ms,
            SimulationEvent::Clear(_) => CLEAR_HOLD_MS,
        }
    }
}
