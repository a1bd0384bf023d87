use criterion::{black_box, criterion_group, criterion_main, Criterion};
use infinitetris::core::{Board, LcgRandom, StandardPieces};
use infinitetris::engine::{MoveEventGenerator, MoveSolver};
use infinitetris::types::{PlacedPiece, Point, Size};

fn bench_tetris_from_empty(c: &mut Criterion) {
    c.bench_function("solve_4_rows_empty_board", |b| {
        b.iter(|| {
            let mut solver = MoveSolver::new(Board::new(Size::new(10, 20)), LcgRandom::new(2024));
            black_box(solver.run_until_next_clear(black_box(4)))
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut board = Board::new(Size::new(10, 20));
            // Fill bottom 4 rows
            for y in 16..20 {
                for x in 0..10 {
                    board.fill(Point::new(x, y));
                }
            }
            board.clear_completed_rows()
        })
    });
}

fn bench_keyframes(c: &mut Criterion) {
    let gen = MoveEventGenerator::new(Size::new(10, 20));
    let target = PlacedPiece::new(2, 2, Point::new(0, 18));

    c.bench_function("keyframes_t_piece", |b| {
        b.iter(|| gen.keyframes_for(black_box(&target), &StandardPieces))
    });
}

fn bench_generate_events(c: &mut Criterion) {
    let mut solver = MoveSolver::new(Board::new(Size::new(10, 20)), LcgRandom::new(2024));
    let moves = solver.run_until_next_clear(4);

    c.bench_function("events_for_clearance", |b| {
        b.iter(|| {
            let mut gen = MoveEventGenerator::new(Size::new(10, 20));
            gen.generate_move_events(black_box(&moves), &StandardPieces)
        })
    });
}

criterion_group!(
    benches,
    bench_tetris_from_empty,
    bench_line_clear,
    bench_keyframes,
    bench_generate_events
);
criterion_main!(benches);
