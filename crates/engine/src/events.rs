//! Keyframe/event generator.
//!
//! Turns solver placements into animation events. Each piece spawns at the top
//! center in rotation 0, rotates one step at a time, slides toward its target
//! column, waits, then fast-drops into place. Slow gravity pulls it down one row
//! every [`SLOW_DROP_MS`] while it rotates and slides.
//!
//! The trajectory is sampled as `(placement, elapsed_ms)` keyframes. Repeated
//! placements are merged, then each keyframe becomes one event whose duration
//! is the time until the next keyframe. The final event of a piece has nothing
//! after it and gets a duration of 0.

use infinitetris_core::types::{
    AppearEvent, MoveEvent, PlacedPiece, Point, SimulationEvent, Size, FAST_DROP_STEP_MS,
    FAST_DROP_WAIT_MS, HORIZONTAL_STEP_MS, ROTATION_STEP_MS, SLOW_DROP_MS,
};
use infinitetris_core::PieceCatalog;

/// A sampled point on a piece's trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keyframe {
    pub placement: PlacedPiece,
    pub at_ms: u32,
}

/// Builds event streams, numbering piece instances across calls.
#[derive(Debug, Clone)]
pub struct MoveEventGenerator {
    size: Size,
    next_piece_id: usize,
}

impl MoveEventGenerator {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            next_piece_id: 0,
        }
    }

    /// Instance id the next generated piece will get.
    pub fn next_piece_id(&self) -> usize {
        self.next_piece_id
    }

    /// Events for every placement, in order. Each placement gets a fresh
    /// instance id.
    ///
    /// Panics if `placements` is empty.
    pub fn generate_move_events<C: PieceCatalog + ?Sized>(
        &mut self,
        placements: &[PlacedPiece],
        catalog: &C,
    ) -> Vec<SimulationEvent> {
        assert!(!placements.is_empty(), "no placements to animate");

        let mut events = Vec::new();
        for placement in placements {
            let piece_id = self.next_piece_id;
            self.next_piece_id += 1;
            let keyframes = self.keyframes_for(placement, catalog);
            events.extend(events_for_keyframes(&keyframes, piece_id));
        }
        events
    }

    /// Spawn anchor for a piece: rotation 0, horizontally centered, top row.
    pub fn spawn_position<C: PieceCatalog + ?Sized>(&self, piece_id: usize, catalog: &C) -> Point {
        let width = catalog.rotation(piece_id, 0).size.width;
        Point::new((self.size.width - width) / 2, 0)
    }

    /// Trajectory of one piece from spawn to `target`.
    pub fn keyframes_for<C: PieceCatalog + ?Sized>(
        &self,
        target: &PlacedPiece,
        catalog: &C,
    ) -> Vec<Keyframe> {
        let spawn = self.spawn_position(target.id, catalog);
        let mut track = Trajectory::new(target.position.y);
        let mut y = spawn.y;

        // Rotate in place.
        for rotation in 0..=target.rotation {
            let at = PlacedPiece::new(target.id, rotation, Point::new(spawn.x, y));
            track.push(at);
            track.elapsed += ROTATION_STEP_MS;
            track.gravity(&mut y, at);
        }

        // Slide toward the target column.
        let target_x = target.position.x;
        let step = if spawn.x <= target_x { 1 } else { -1 };
        let mut x = spawn.x;
        loop {
            let at = PlacedPiece::new(target.id, target.rotation, Point::new(x, y));
            track.push(at);
            track.elapsed += HORIZONTAL_STEP_MS;
            track.gravity(&mut y, at);
            if x == target_x {
                break;
            }
            x += step;
        }

        // Pause, then drop fast into the resting row.
        track.elapsed += FAST_DROP_WAIT_MS;
        let column = target.moved_to(Point::new(target_x, y));
        track.gravity(&mut y, column);
        while y < target.position.y {
            y += 1;
            track.push(column.moved_to(Point::new(target_x, y)));
            track.elapsed += FAST_DROP_STEP_MS;
        }

        track.push(*target);
        track.keyframes
    }
}

/// Keyframe accumulator with the slow gravity clock.
struct Trajectory {
    keyframes: Vec<Keyframe>,
    elapsed: u32,
    last_drop: u32,
    floor_y: i32,
}

impl Trajectory {
    fn new(floor_y: i32) -> Self {
        Self {
            keyframes: Vec::new(),
            elapsed: 0,
            last_drop: 0,
            floor_y,
        }
    }

    fn push(&mut self, placement: PlacedPiece) {
        self.keyframes.push(Keyframe {
            placement,
            at_ms: self.elapsed,
        });
    }

    /// Drop one row if a gravity period has passed since the last drop. The
    /// piece never sinks past its resting row.
    fn gravity(&mut self, y: &mut i32, at: PlacedPiece) {
        // Intentional clamp: gravity never drops the piece below floor_y.
        if self.elapsed - self.last_drop > SLOW_DROP_MS && *y < self.floor_y {
            *y += 1;
            self.last_drop += SLOW_DROP_MS;
            self.keyframes.push(Keyframe {
                placement: at.moved_to(Point::new(at.position.x, *y)),
                at_ms: self.last_drop,
            });
        }
    }
}

/// Convert keyframes into one Appear followed by Moves.
///
/// Consecutive keyframes with the same placement collapse into the first of
/// them. Every event lasts until the next keyframe; the last one lasts 0 ms.
pub fn events_for_keyframes(keyframes: &[Keyframe], piece_id: usize) -> Vec<SimulationEvent> {
    let mut distinct: Vec<Keyframe> = Vec::with_capacity(keyframes.len());
    for frame in keyframes {
        if distinct.last().map(|k| k.placement) != Some(frame.placement) {
            distinct.push(*frame);
        }
    }

    let duration_after = |i: usize| -> u32 {
        distinct
            .get(i + 1)
            .map_or(0, |next| next.at_ms.saturating_sub(distinct[i].at_ms))
    };

    let mut events = Vec::with_capacity(distinct.len());
    for (i, frame) in distinct.iter().enumerate() {
        let event = if i == 0 {
            SimulationEvent::Appear(AppearEvent {
                piece_id,
                placement: frame.placement,
                duration_ms: duration_after(i),
            })
        } else {
            SimulationEvent::Move(MoveEvent {
                piece_id,
                before: distinct[i - 1].placement,
                after: frame.placement,
                duration_ms: duration_after(i),
            })
        };
        events.push(event);
    }
    events
}
