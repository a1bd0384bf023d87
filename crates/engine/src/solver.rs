//! Placement solver - randomized depth-first search for a clearance
//!
//! [`MoveSolver::run_until_next_clear`] keeps dropping pieces onto its board
//! until one placement completes exactly the requested number of rows. Each
//! search node is a [`MoveState`]; accepted placements and the states that
//! produced them are kept on two parallel stacks so a dead end can be undone
//! one piece at a time.
//!
//! # Pruning
//!
//! A dropped piece is kept only if:
//!
//! 1. it completes either no rows or exactly the requested number of rows
//! 2. the stack stays within the [`SolverPolicy`] growth bounds
//! 3. no column it touches ends up with a filled cell above a gap
//!
//! The solver never clears rows itself. After a successful run the completed
//! rows are still on the board; callers clear them through [`MoveSolver::board_mut`]
//! before asking for the next clearance.

use arrayvec::ArrayVec;
use tracing::{debug, trace};

use infinitetris_core::types::{PlacedPiece, Point, MAX_CLEARANCE_ROWS};
use infinitetris_core::{Board, PieceCatalog, RandomSource, RotationShape, StandardPieces};

use crate::move_state::MoveState;
use crate::policy::{PolicyProvider, SolverPolicy, StandardPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SolverState {
    Placing,
    Backtracking,
    Done,
}

/// How an accepted placement affects the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementOutcome {
    Normal,
    /// The placement completes this many rows.
    Clearance(usize),
}

/// Counters for the most recent run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Search nodes drawn (one set of shuffles each).
    pub nodes: u64,
    /// Choices that found a resting row and were validated.
    pub attempts: u64,
    /// Validated choices that failed a pruning rule.
    pub rejections: u64,
    pub backtracks: u64,
    /// The run gave up after exceeding its node limit.
    pub limit_reached: bool,
}

pub struct MoveSolver<R, P = StandardPolicy, C = StandardPieces> {
    board: Board,
    rng: R,
    policy_provider: P,
    catalog: C,

    state: SolverState,
    current: Option<MoveState>,
    previous: Vec<MoveState>,
    moves: Vec<PlacedPiece>,

    required_clearance: usize,
    initial_height: i32,
    policy: SolverPolicy,
    node_limit: Option<u64>,
    stats: SearchStats,
}

impl<R: RandomSource> MoveSolver<R> {
    /// Solver over `board` with the standard pieces and growth policy.
    pub fn new(board: Board, rng: R) -> Self {
        Self::with_parts(board, rng, StandardPolicy, StandardPieces)
    }
}

impl<R, P, C> MoveSolver<R, P, C>
where
    R: RandomSource,
    P: PolicyProvider,
    C: PieceCatalog,
{
    pub fn with_parts(board: Board, rng: R, policy_provider: P, catalog: C) -> Self {
        Self {
            board,
            rng,
            policy_provider,
            catalog,
            state: SolverState::Done,
            current: None,
            previous: Vec::new(),
            moves: Vec::new(),
            required_clearance: MAX_CLEARANCE_ROWS,
            initial_height: 0,
            policy: SolverPolicy::default(),
            node_limit: None,
            stats: SearchStats::default(),
        }
    }

    /// Give up a run once it has drawn more than `limit` search nodes.
    /// Unlimited by default.
    pub fn with_node_limit(mut self, limit: Option<u64>) -> Self {
        self.node_limit = limit;
        self
    }

    pub fn node_limit(&self) -> Option<u64> {
        self.node_limit
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable access for the caller's row clearing between runs.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Policy computed for the most recent run.
    pub fn policy(&self) -> SolverPolicy {
        self.policy
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Search for placements ending in a clearance of exactly
    /// `required_clearance` rows.
    ///
    /// On success the placements stay on the board (completed rows included)
    /// and are returned in order. An empty result means every sequence was
    /// exhausted, or the node limit was hit; the board is then back to its
    /// state before the call.
    ///
    /// Panics if `required_clearance` is not in `1..=MAX_CLEARANCE_ROWS`.
    pub fn run_until_next_clear(&mut self, required_clearance: usize) -> Vec<PlacedPiece> {
        assert!(
            (1..=MAX_CLEARANCE_ROWS).contains(&required_clearance),
            "clearance count {required_clearance} outside 1..={MAX_CLEARANCE_ROWS}"
        );

        self.required_clearance = required_clearance;
        self.current = None;
        self.previous.clear();
        self.moves.clear();
        self.stats = SearchStats::default();
        self.initial_height = self.board.filled_height();
        self.policy = self.policy_provider.policy(&self.board);
        self.state = SolverState::Placing;

        while self.state != SolverState::Done {
            if self.node_limit.is_some_and(|limit| self.stats.nodes > limit) {
                self.abandon();
                break;
            }
            match self.state {
                SolverState::Placing => self.place_next_piece(),
                SolverState::Backtracking => self.backtrack(),
                SolverState::Done => {}
            }
        }

        if self.stats.limit_reached {
            debug!(
                required = required_clearance,
                nodes = self.stats.nodes,
                backtracks = self.stats.backtracks,
                "search abandoned at node limit"
            );
        } else if self.moves.is_empty() {
            debug!(
                required = required_clearance,
                nodes = self.stats.nodes,
                backtracks = self.stats.backtracks,
                "search exhausted without a clearance"
            );
        } else {
            debug!(
                required = required_clearance,
                pieces = self.moves.len(),
                nodes = self.stats.nodes,
                attempts = self.stats.attempts,
                rejections = self.stats.rejections,
                backtracks = self.stats.backtracks,
                "clearance found"
            );
        }

        std::mem::take(&mut self.moves)
    }

    /// Advance the current search node, drawing a new one if there is none.
    fn increment_state(&mut self) -> bool {
        match self.current.as_mut() {
            Some(state) => state.increment(&self.catalog),
            None => {
                let columns = self.board.width().max(0) as usize;
                self.current = Some(MoveState::random(&mut self.rng, &self.catalog, columns));
                self.stats.nodes += 1;
                true
            }
        }
    }

    fn place_next_piece(&mut self) {
        if !self.increment_state() {
            self.current = None;
            self.state = SolverState::Backtracking;
            return;
        }
        let Some(current) = self.current.as_ref() else {
            return;
        };

        let piece_id = current.piece_id();
        let rotation_idx = current.rotation();
        let column = current.column() as i32;
        let shape = *self.catalog.rotation(piece_id, rotation_idx);

        let Some(row) = self.landing_row(&shape, column) else {
            return;
        };
        let pos = Point::new(column, row);
        if !self.board.add_piece(&shape, pos) {
            return;
        }

        self.stats.attempts += 1;
        let Some(outcome) = self.validate_placement(&shape, pos) else {
            self.stats.rejections += 1;
            self.board.remove_piece(&shape, pos);
            return;
        };

        trace!(piece_id, rotation_idx, x = pos.x, y = pos.y, ?outcome, "placed");
        self.moves.push(PlacedPiece::new(piece_id, rotation_idx, pos));
        if let Some(state) = self.current.take() {
            self.previous.push(state);
        }
        if let PlacementOutcome::Clearance(_) = outcome {
            self.state = SolverState::Done;
        }
    }

    /// Lowest anchor row at which `shape` fits in `column`, scanning upward
    /// from the floor.
    fn landing_row(&self, shape: &RotationShape, column: i32) -> Option<i32> {
        let lowest = self.board.height() - shape.size.height;
        (0..=lowest)
            .rev()
            .find(|&row| self.board.fits(shape, Point::new(column, row)))
    }

    /// Check a piece that was just added at `pos` against the pruning rules.
    fn validate_placement(&self, shape: &RotationShape, pos: Point) -> Option<PlacementOutcome> {
        let board_height = self.board.height();
        let top_row = pos.y;

        // Rows the piece can complete lie within its four tallest rows.
        let last_row = (top_row + MAX_CLEARANCE_ROWS as i32 - 1).min(board_height - 1);
        let cleared: ArrayVec<i32, MAX_CLEARANCE_ROWS> = (top_row..=last_row)
            .filter(|&row| self.board.is_row_full(row))
            .collect();
        if !cleared.is_empty() && cleared.len() != self.required_clearance {
            return None;
        }

        let new_height = board_height - top_row;
        if new_height - self.initial_height > self.policy.max_intermediate_growth {
            return None;
        }
        let settled_height = new_height - cleared.len() as i32;
        if settled_height - self.initial_height > self.policy.max_final_growth {
            return None;
        }

        for col in pos.x..pos.x + shape.size.width {
            let mut gap_seen = false;
            for row in (top_row..board_height).rev() {
                if cleared.contains(&row) {
                    continue;
                }
                if self.board.is_filled(Point::new(col, row)) {
                    if gap_seen {
                        return None;
                    }
                } else {
                    gap_seen = true;
                }
            }
        }

        if cleared.is_empty() {
            Some(PlacementOutcome::Normal)
        } else {
            Some(PlacementOutcome::Clearance(cleared.len()))
        }
    }

    /// Undo every placement of the current run.
    fn abandon(&mut self) {
        while let Some(last) = self.moves.pop() {
            let shape = *self.catalog.rotation(last.id, last.rotation);
            self.board.remove_piece(&shape, last.position);
        }
        self.previous.clear();
        self.current = None;
        self.stats.limit_reached = true;
        self.state = SolverState::Done;
    }

    fn backtrack(&mut self) {
        let Some(state) = self.previous.pop() else {
            self.state = SolverState::Done;
            return;
        };
        self.stats.backtracks += 1;
        self.current = Some(state);
        if let Some(last) = self.moves.pop() {
            let shape = *self.catalog.rotation(last.id, last.rotation);
            self.board.remove_piece(&shape, last.position);
        }
        self.state = SolverState::Placing;
    }
}

/// Rows of `board` that are completely filled, top to bottom.
pub fn completed_rows(board: &Board) -> Vec<i32> {
    (0..board.height()).filter(|&row| board.is_row_full(row)).collect()
}
