//! Board module - manages the placement grid
//!
//! The grid stores one optional value per cell in a flat row-major `Vec`.
//! The solver only needs occupancy, so it works on [`Board`] (`Grid<()>`);
//! display code tags each cell with the id of the piece instance that filled it.
//!
//! Coordinates: (x, y) where x is the column (left to right) and y is the row
//! (top to bottom). The floor is row `height - 1`.

use std::collections::BTreeSet;

use crate::pieces::RotationShape;
use crate::types::{Point, Size};

/// Occupancy-only board used by the solver.
pub type Board = Grid<()>;

/// A fixed-size grid where each cell is empty or holds a `T`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    size: Size,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Option<T>>,
}

impl<T: Copy> Grid<T> {
    /// Create a new empty grid
    pub fn new(size: Size) -> Self {
        Self {
            size,
            cells: vec![None; size.area()],
        }
    }

    /// Calculate flat index from a point
    #[inline(always)]
    fn index(&self, pt: Point) -> Option<usize> {
        if !self.size.contains(pt) {
            return None;
        }
        Some((pt.y as usize) * (self.size.width as usize) + (pt.x as usize))
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> i32 {
        self.size.width
    }

    pub fn height(&self) -> i32 {
        self.size.height
    }

    /// Value stored at `pt`. Returns None if out of bounds or empty.
    pub fn get(&self, pt: Point) -> Option<T> {
        self.index(pt).and_then(|idx| self.cells[idx])
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_filled(&self, pt: Point) -> bool {
        matches!(self.index(pt), Some(idx) if self.cells[idx].is_some())
    }

    /// Whether every cell of `shape` anchored at `at` is in bounds and empty.
    pub fn fits(&self, shape: &RotationShape, at: Point) -> bool {
        shape
            .cells_at(at)
            .all(|pt| matches!(self.index(pt), Some(idx) if self.cells[idx].is_none()))
    }

    /// Fill the cells of `shape` anchored at `at` with `value`.
    ///
    /// Returns false, leaving the grid untouched, if any cell is out of bounds
    /// or already filled.
    pub fn add_piece_with(&mut self, shape: &RotationShape, at: Point, value: T) -> bool {
        if !self.fits(shape, at) {
            return false;
        }
        for pt in shape.cells_at(at) {
            if let Some(idx) = self.index(pt) {
                self.cells[idx] = Some(value);
            }
        }
        true
    }

    /// Empty the cells of `shape` anchored at `at`.
    ///
    /// This undoes a prior successful add of the same shape at the same anchor.
    pub fn remove_piece(&mut self, shape: &RotationShape, at: Point) {
        for pt in shape.cells_at(at) {
            if let Some(idx) = self.index(pt) {
                self.cells[idx] = None;
            }
        }
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: i32) -> bool {
        if y < 0 || y >= self.size.height {
            return false;
        }
        let width = self.size.width as usize;
        let start = y as usize * width;
        self.cells[start..start + width].iter().all(|cell| cell.is_some())
    }

    /// Number of rows from the topmost occupied row down to the floor.
    ///
    /// An empty grid has filled height 0.
    pub fn filled_height(&self) -> i32 {
        let width = self.size.width.max(1) as usize;
        match self.cells.iter().position(|cell| cell.is_some()) {
            Some(idx) => self.size.height - (idx / width) as i32,
            None => 0,
        }
    }

    /// Number of filled cells on the grid.
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Clear all full rows, shifting the rows above them down.
    ///
    /// Returns the indices the cleared rows had before the shift.
    pub fn clear_completed_rows(&mut self) -> BTreeSet<i32> {
        let mut cleared = BTreeSet::new();
        let width = self.size.width as usize;
        let mut write_y = self.size.height as usize;

        // Scan from bottom to top
        for read_y in (0..self.size.height as usize).rev() {
            if self.is_row_full(read_y as i32) {
                cleared.insert(read_y as i32);
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, write_y * width);
                }
            }
        }

        // Clear the remaining rows at the top
        self.cells[..write_y * width].fill(None);

        cleared
    }

    /// Iterate over every cell as `(point, value)`, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Option<T>)> + '_ {
        let width = self.size.width.max(1);
        self.cells.iter().enumerate().map(move |(idx, cell)| {
            let idx = idx as i32;
            (Point::new(idx % width, idx / width), *cell)
        })
    }
}

impl Board {
    /// Fill the cells of `shape` anchored at `at`. See [`Grid::add_piece_with`].
    pub fn add_piece(&mut self, shape: &RotationShape, at: Point) -> bool {
        self.add_piece_with(shape, at, ())
    }

    /// Mark a single cell as filled. Returns false if out of bounds.
    pub fn fill(&mut self, pt: Point) -> bool {
        match self.index(pt) {
            Some(idx) => {
                self.cells[idx] = Some(());
                true
            }
            None => false,
        }
    }

    /// Build a board from text rows, top row first: `#` is filled, anything
    /// else is empty. Rows must all have the same width.
    ///
    /// ```
    /// use infinitetris_core::Board;
    /// use infinitetris_core::types::Point;
    ///
    /// let board = Board::from_rows(&["....", "##.#"]);
    /// assert!(board.is_filled(Point::new(0, 1)));
    /// assert!(!board.is_filled(Point::new(2, 1)));
    /// assert_eq!(board.filled_height(), 1);
    /// ```
    pub fn from_rows(rows: &[&str]) -> Self {
        let width = rows.first().map_or(0, |r| r.chars().count()) as i32;
        assert!(
            rows.iter().all(|r| r.chars().count() as i32 == width),
            "all rows must have the same width"
        );
        let mut board = Board::new(Size::new(width, rows.len() as i32));
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == '#' {
                    board.fill(Point::new(x as i32, y as i32));
                }
            }
        }
        board
    }

    /// Render the board as text rows in the format accepted by [`Board::from_rows`].
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.height())
            .map(|y| {
                (0..self.width())
                    .map(|x| if self.is_filled(Point::new(x, y)) { '#' } else { '.' })
                    .collect()
            })
            .collect()
    }
}
