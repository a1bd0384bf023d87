//! DisplayBoard: the event stream replayed onto a grid of piece instances.
//!
//! Each cell holds the instance id of the piece occupying it. Instances carry
//! their tetromino (for color) and how many of their cells are still on the
//! board; an instance is dropped once every cell has been cleared.

use std::collections::HashMap;

use anyhow::{bail, Result};
use tracing::warn;

use crate::core::{Board, Grid, PieceCatalog, StandardPieces};
use crate::fb::Rgb;
use crate::types::{AppearEvent, ClearEvent, MoveEvent, PlacedPiece, Point, SimulationEvent, Size};

/// Color for a standard tetromino id (I, O, T, S, Z, J, L order).
pub fn piece_color(piece_id: usize) -> Rgb {
    match piece_id {
        0 => Rgb::new(39, 147, 230),
        1 => Rgb::new(220, 220, 20),
        2 => Rgb::new(159, 23, 227),
        3 => Rgb::new(23, 227, 43),
        4 => Rgb::new(235, 20, 20),
        5 => Rgb::new(23, 47, 227),
        6 => Rgb::new(247, 110, 5),
        _ => Rgb::new(160, 160, 160),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Instance {
    piece: usize,
    remaining: usize,
}

#[derive(Debug, Clone)]
pub struct DisplayBoard<C = StandardPieces> {
    grid: Grid<usize>,
    instances: HashMap<usize, Instance>,
    catalog: C,
}

impl DisplayBoard {
    pub fn new(size: Size) -> Self {
        Self::with_catalog(size, StandardPieces)
    }
}

impl<C: PieceCatalog> DisplayBoard<C> {
    pub fn with_catalog(size: Size, catalog: C) -> Self {
        Self {
            grid: Grid::new(size),
            instances: HashMap::new(),
            catalog,
        }
    }

    pub fn size(&self) -> Size {
        self.grid.size()
    }

    /// Instance id at `pt`, if occupied.
    pub fn instance_at(&self, pt: Point) -> Option<usize> {
        self.grid.get(pt)
    }

    pub fn color_at(&self, pt: Point) -> Option<Rgb> {
        let instance = self.grid.get(pt)?;
        self.instances
            .get(&instance)
            .map(|inst| piece_color(inst.piece))
    }

    /// Number of piece instances with at least one cell on the board.
    pub fn live_instances(&self) -> usize {
        self.instances.len()
    }

    /// Occupancy only, comparable with the solver's board.
    pub fn to_board(&self) -> Board {
        let mut board = Board::new(self.grid.size());
        for (pt, cell) in self.grid.iter() {
            if cell.is_some() {
                board.fill(pt);
            }
        }
        board
    }

    pub fn apply(&mut self, event: &SimulationEvent) -> Result<()> {
        match event {
            SimulationEvent::Appear(e) => self.update_for_appear(e),
            SimulationEvent::Move(e) => self.update_for_move(e),
            SimulationEvent::Clear(e) => {
                self.update_for_clear(e);
                Ok(())
            }
        }
    }

    pub fn update_for_appear(&mut self, event: &AppearEvent) -> Result<()> {
        self.place(event.piece_id, &event.placement)?;
        self.instances.insert(
            event.piece_id,
            Instance {
                piece: event.placement.id,
                remaining: self.catalog.piece(event.placement.id).pip_count(),
            },
        );
        Ok(())
    }

    pub fn update_for_move(&mut self, event: &MoveEvent) -> Result<()> {
        let before = self.catalog.rotation(event.before.id, event.before.rotation);
        self.grid.remove_piece(before, event.before.position);
        self.place(event.piece_id, &event.after)
    }

    /// Remove the cleared rows, shifting everything above down, and forget
    /// instances with no cells left.
    pub fn update_for_clear(&mut self, event: &ClearEvent) {
        for &row in &event.rows {
            for x in 0..self.grid.width() {
                let Some(instance) = self.grid.get(Point::new(x, row)) else {
                    continue;
                };
                if let Some(inst) = self.instances.get_mut(&instance) {
                    inst.remaining = inst.remaining.saturating_sub(1);
                    if inst.remaining == 0 {
                        self.instances.remove(&instance);
                    }
                }
            }
        }

        let cleared = self.grid.clear_completed_rows();
        if cleared != event.rows {
            warn!(expected = ?event.rows, actual = ?cleared, "display board out of sync");
        }
    }

    fn place(&mut self, instance: usize, placement: &PlacedPiece) -> Result<()> {
        let shape = self.catalog.rotation(placement.id, placement.rotation);
        if !self.grid.add_piece_with(shape, placement.position, instance) {
            bail!(
                "piece {instance} cannot be placed at ({}, {})",
                placement.position.x,
                placement.position.y
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn appear(instance: usize, piece: usize, rotation: usize, x: i32, y: i32) -> SimulationEvent {
        SimulationEvent::Appear(AppearEvent {
            piece_id: instance,
            placement: PlacedPiece::new(piece, rotation, Point::new(x, y)),
            duration_ms: 0,
        })
    }

    #[test]
    fn appear_and_move_track_instance() {
        let mut board = DisplayBoard::new(Size::new(10, 20));
        board.apply(&appear(7, 1, 0, 4, 0)).unwrap();
        assert_eq!(board.instance_at(Point::new(4, 0)), Some(7));
        assert_eq!(board.color_at(Point::new(5, 1)), Some(Rgb::new(220, 220, 20)));

        let before = PlacedPiece::new(1, 0, Point::new(4, 0));
        board
            .apply(&SimulationEvent::Move(MoveEvent {
                piece_id: 7,
                before,
                after: before.moved_to(Point::new(4, 1)),
                duration_ms: 0,
            }))
            .unwrap();
        assert_eq!(board.instance_at(Point::new(4, 0)), None);
        assert_eq!(board.instance_at(Point::new(4, 2)), Some(7));
    }

    #[test]
    fn collision_is_an_error() {
        let mut board = DisplayBoard::new(Size::new(10, 20));
        board.apply(&appear(0, 1, 0, 0, 18)).unwrap();
        assert!(board.apply(&appear(1, 1, 0, 1, 18)).is_err());
    }

    #[test]
    fn clear_forgets_fully_cleared_instances() {
        let mut board = DisplayBoard::new(Size::new(4, 4));
        // Flat I fills the bottom row; O sits on top of it.
        board.apply(&appear(0, 0, 0, 0, 3)).unwrap();
        board.apply(&appear(1, 1, 0, 0, 1)).unwrap();
        assert_eq!(board.live_instances(), 2);

        board.apply(&SimulationEvent::Clear(ClearEvent {
            rows: BTreeSet::from([3]),
        }))
        .unwrap();

        assert_eq!(board.live_instances(), 1);
        assert_eq!(board.instance_at(Point::new(0, 3)), Some(1));
        assert_eq!(board.instance_at(Point::new(0, 1)), None);
        assert_eq!(board.to_board().filled_count(), 4);
    }
}
