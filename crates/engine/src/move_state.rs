//! Search-state enumerator.
//!
//! A [`MoveState`] is one node of the solver's search: three shuffled orders
//! (pieces, rotations, columns) plus a cursor into each. Advancing works like an
//! odometer where the column is the fastest digit, then rotation, then piece.

use infinitetris_core::{PieceCatalog, RandomSource};

/// Number of rotation slots shuffled per state. Pieces with fewer distinct
/// rotations skip the slots they don't have.
pub const ROTATION_SLOTS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveState {
    piece_order: Vec<usize>,
    rotation_order: Vec<usize>,
    column_order: Vec<usize>,
    piece_idx: usize,
    rotation_idx: usize,
    column_idx: usize,
}

impl MoveState {
    /// Draw a fresh state: one shuffle each for pieces, rotations, and columns,
    /// in that order.
    pub fn random<R, C>(rng: &mut R, catalog: &C, column_count: usize) -> Self
    where
        R: RandomSource + ?Sized,
        C: PieceCatalog + ?Sized,
    {
        Self::from_orders(
            rng.permutation(catalog.piece_count()),
            rng.permutation(ROTATION_SLOTS),
            rng.permutation(column_count),
            catalog,
        )
    }

    /// Build a state from explicit orders. Each order must be non-empty.
    pub fn from_orders<C: PieceCatalog + ?Sized>(
        piece_order: Vec<usize>,
        rotation_order: Vec<usize>,
        column_order: Vec<usize>,
        catalog: &C,
    ) -> Self {
        assert!(
            !piece_order.is_empty() && !rotation_order.is_empty() && !column_order.is_empty(),
            "move state orders must be non-empty"
        );
        let mut state = Self {
            piece_order,
            rotation_order,
            column_order,
            piece_idx: 0,
            rotation_idx: 0,
            column_idx: 0,
        };
        state.reset_rotation(catalog);
        state
    }

    pub fn piece_id(&self) -> usize {
        self.piece_order[self.piece_idx]
    }

    pub fn rotation(&self) -> usize {
        self.rotation_order[self.rotation_idx]
    }

    pub fn column(&self) -> usize {
        self.column_order[self.column_idx]
    }

    /// Point the rotation cursor at the first slot valid for the current piece.
    fn reset_rotation<C: PieceCatalog + ?Sized>(&mut self, catalog: &C) {
        let count = catalog.piece(self.piece_id()).rotations.len();
        if let Some(idx) = self.rotation_order.iter().position(|&r| r < count) {
            self.rotation_idx = idx;
        }
    }

    /// Advance to the next untried (piece, rotation, column).
    ///
    /// Returns false once every combination has been visited; the state is
    /// left unchanged in that case.
    pub fn increment<C: PieceCatalog + ?Sized>(&mut self, catalog: &C) -> bool {
        if self.column_idx + 1 < self.column_order.len() {
            self.column_idx += 1;
            return true;
        }

        let count = catalog.piece(self.piece_id()).rotations.len();
        let next_rotation = self.rotation_order[self.rotation_idx + 1..]
            .iter()
            .position(|&r| r < count);
        if let Some(offset) = next_rotation {
            self.rotation_idx += offset + 1;
            self.column_idx = 0;
            return true;
        }

        if self.piece_idx + 1 < self.piece_order.len() {
            self.piece_idx += 1;
            self.reset_rotation(catalog);
            self.column_idx = 0;
            return true;
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infinitetris_core::{LcgRandom, StandardPieces};

    #[test]
    fn starts_on_valid_rotation() {
        // O has a single rotation, so the first valid slot is wherever 0 landed.
        let o = StandardPieces::id_of("O").unwrap();
        let state = MoveState::from_orders(vec![o], vec![3, 2, 0, 1], vec![0], &StandardPieces);
        assert_eq!(state.rotation(), 0);
    }

    #[test]
    fn column_is_fastest_digit() {
        let t = StandardPieces::id_of("T").unwrap();
        let mut state =
            MoveState::from_orders(vec![t], vec![1, 0, 2, 3], vec![2, 0, 1], &StandardPieces);
        let mut seen = vec![(state.rotation(), state.column())];
        while state.increment(&StandardPieces) {
            seen.push((state.rotation(), state.column()));
        }
        assert_eq!(
            seen,
            vec![
                (1, 2), (1, 0), (1, 1),
                (0, 2), (0, 0), (0, 1),
                (2, 2), (2, 0), (2, 1),
                (3, 2), (3, 0), (3, 1),
            ]
        );
    }

    #[test]
    fn piece_change_resets_rotation_and_column() {
        let i = StandardPieces::id_of("I").unwrap();
        let o = StandardPieces::id_of("O").unwrap();
        let mut state =
            MoveState::from_orders(vec![i, o], vec![3, 1, 0, 2], vec![0, 1], &StandardPieces);
        assert_eq!((state.piece_id(), state.rotation()), (i, 1));

        // I: rotation 1 then 0, two columns each.
        for _ in 0..3 {
            assert!(state.increment(&StandardPieces));
        }
        assert_eq!((state.piece_id(), state.rotation(), state.column()), (i, 0, 1));

        assert!(state.increment(&StandardPieces));
        assert_eq!((state.piece_id(), state.rotation(), state.column()), (o, 0, 0));
        assert!(state.increment(&StandardPieces));
        assert!(!state.increment(&StandardPieces));
    }

    #[test]
    fn exhausts_after_every_combination() {
        let mut rng = LcgRandom::new(5);
        let mut state = MoveState::random(&mut rng, &StandardPieces, 10);
        let combos: usize = (0..StandardPieces.piece_count())
            .map(|id| StandardPieces.piece(id).rotations.len() * 10)
            .sum();

        for call in 1..combos {
            assert!(state.increment(&StandardPieces), "call {call} ended early");
        }
        assert!(!state.increment(&StandardPieces));
    }
}
