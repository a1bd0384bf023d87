//! Solver tests - clearance search against its pruning invariants

use infinitetris::core::{Board, LcgRandom, PieceCatalog, StandardPieces};
use infinitetris::engine::{completed_rows, FixedPolicy, MoveSolver, SolverPolicy};
use infinitetris::types::{PlacedPiece, Point, Size};

/// Columns with a filled cell above an empty one, ignoring `skip` rows.
fn overhang_columns(board: &Board, skip: &[i32]) -> Vec<i32> {
    (0..board.width())
        .filter(|&x| {
            let mut gap = false;
            for y in (0..board.height()).rev() {
                if skip.contains(&y) {
                    continue;
                }
                if board.is_filled(Point::new(x, y)) {
                    if gap {
                        return true;
                    }
                } else {
                    gap = true;
                }
            }
            false
        })
        .collect()
}

fn add(board: &mut Board, placement: &PlacedPiece) -> bool {
    board.add_piece(
        StandardPieces.rotation(placement.id, placement.rotation),
        placement.position,
    )
}

#[test]
fn test_empty_board_four_row_clear_keeps_invariants() {
    let mut solver = MoveSolver::new(Board::new(Size::new(10, 20)), LcgRandom::new(2024));
    let moves = solver.run_until_next_clear(4);
    assert!(!moves.is_empty());

    let policy = solver.policy();
    assert_eq!(policy, SolverPolicy::new(16, 6));

    // Replay on a fresh board and check every intermediate state.
    let mut replay = Board::new(Size::new(10, 20));
    let (last, intermediate) = moves.split_last().unwrap();
    for (i, placement) in intermediate.iter().enumerate() {
        assert!(add(&mut replay, placement), "placement {i} collides");
        assert!(completed_rows(&replay).is_empty(), "placement {i} cleared rows");
        assert!(overhang_columns(&replay, &[]).is_empty(), "placement {i} overhangs");
        assert!(replay.filled_height() <= policy.max_final_growth);
    }

    assert!(add(&mut replay, last));
    let cleared = completed_rows(&replay);
    assert_eq!(cleared.len(), 4);
    assert!(overhang_columns(&replay, &cleared).is_empty());
    assert!(replay.filled_height() <= policy.max_intermediate_growth);
    assert_eq!(&replay, solver.board());

    replay.clear_completed_rows();
    assert!(replay.filled_height() <= policy.max_final_growth);
}

#[test]
fn test_same_seed_same_placements() {
    let run = |seed| {
        let mut solver = MoveSolver::new(Board::new(Size::new(10, 20)), LcgRandom::new(seed));
        solver.run_until_next_clear(2)
    };
    let first = run(77);
    assert!(!first.is_empty());
    assert_eq!(first, run(77));
}

#[test]
fn test_exhausted_search_leaks_no_cells() {
    let mut rows = vec![".........."; 19];
    rows.push("#####.....");
    let board = Board::from_rows(&rows);
    let before = board.filled_count();

    // Two rows of room can never hold a four-row clear.
    let policy = FixedPolicy(SolverPolicy::new(1, 1));
    let mut solver = MoveSolver::with_parts(board.clone(), LcgRandom::new(5), policy, StandardPieces);

    assert!(solver.run_until_next_clear(4).is_empty());
    assert!(solver.stats().backtracks > 0);
    assert_eq!(solver.board().filled_count(), before);
    assert_eq!(solver.board(), &board);
}

#[test]
fn test_last_placement_round_trips() {
    let mut solver = MoveSolver::new(Board::new(Size::new(10, 20)), LcgRandom::new(9));
    let moves = solver.run_until_next_clear(1);
    let last = *moves.last().unwrap();
    let shape = *StandardPieces.rotation(last.id, last.rotation);

    let with_piece = solver.board().clone();
    solver.board_mut().remove_piece(&shape, last.position);
    assert_ne!(solver.board(), &with_piece);
    assert!(solver.board_mut().add_piece(&shape, last.position));
    assert_eq!(solver.board(), &with_piece);
}

#[test]
fn test_consecutive_runs_start_from_cleared_board() {
    let mut solver = MoveSolver::new(Board::new(Size::new(10, 20)), LcgRandom::new(3));

    for required in [4, 2, 3] {
        let moves = solver.run_until_next_clear(required);
        assert!(!moves.is_empty(), "no clear of {required}");
        assert_eq!(completed_rows(solver.board()).len(), required);
        solver.board_mut().clear_completed_rows();
        assert!(overhang_columns(solver.board(), &[]).is_empty());
    }
}

#[test]
fn test_stats_track_the_latest_run() {
    let mut solver = MoveSolver::new(Board::new(Size::new(10, 20)), LcgRandom::new(12));
    let moves = solver.run_until_next_clear(3);
    let stats = solver.stats();

    assert!(stats.nodes >= moves.len() as u64);
    assert!(stats.attempts >= moves.len() as u64);
    assert!(!stats.limit_reached);
}
