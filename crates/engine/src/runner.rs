//! Clearance loop.
//!
//! The [`Runner`] asks the solver for one clearance at a time, turns the
//! placements into events, clears the completed rows, and hands everything to
//! an [`Animator`].

use std::fmt;

use tracing::{debug, info};

use infinitetris_core::types::{ClearEvent, SimulationEvent, Size, CLEARANCE_WEIGHTS};
use infinitetris_core::{PieceCatalog, RandomSource};

use crate::events::MoveEventGenerator;
use crate::policy::PolicyProvider;
use crate::solver::MoveSolver;

/// Consumer of the event stream.
pub trait Animator {
    /// When true the runner computes every clearance before playback starts
    /// and passes the full stream to [`Animator::prepare`].
    fn requires_precomputation(&self) -> bool {
        false
    }

    fn prepare(&mut self, size: Size, all_events: Option<&[SimulationEvent]>) -> anyhow::Result<()>;

    fn animate_event(&mut self, event: &SimulationEvent) -> anyhow::Result<()>;

    fn finalize(&mut self) -> anyhow::Result<()>;

    /// Playback was stopped early; the runner stops producing events.
    fn is_finished(&self) -> bool {
        false
    }
}

impl<A: Animator + ?Sized> Animator for Box<A> {
    fn requires_precomputation(&self) -> bool {
        (**self).requires_precomputation()
    }

    fn prepare(&mut self, size: Size, all_events: Option<&[SimulationEvent]>) -> anyhow::Result<()> {
        (**self).prepare(size, all_events)
    }

    fn animate_event(&mut self, event: &SimulationEvent) -> anyhow::Result<()> {
        (**self).animate_event(event)
    }

    fn finalize(&mut self) -> anyhow::Result<()> {
        (**self).finalize()
    }

    fn is_finished(&self) -> bool {
        (**self).is_finished()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunError {
    /// No clearance size could be reached from the current board.
    ClearanceUnreachable,
}

impl RunError {
    pub fn code(self) -> &'static str {
        match self {
            RunError::ClearanceUnreachable => "clearance_unreachable",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            RunError::ClearanceUnreachable => "no clearance size is reachable from this board",
        }
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for RunError {}

/// Clearance sizes in weighted random order, each size exactly once.
pub fn clearance_order<R: RandomSource + ?Sized>(rng: &mut R) -> Vec<usize> {
    let mut remaining = CLEARANCE_WEIGHTS.to_vec();
    let mut order = Vec::with_capacity(remaining.len());

    while !remaining.is_empty() {
        let total: u32 = remaining.iter().map(|&(_, w)| w).sum();
        let mut pick = rng.uniform_int(0..total as usize) as u32;
        let idx = remaining
            .iter()
            .position(|&(_, w)| {
                if pick < w {
                    true
                } else {
                    pick -= w;
                    false
                }
            })
            .unwrap_or(remaining.len() - 1);
        order.push(remaining.remove(idx).0);
    }
    order
}

/// Clearance-order draws tried before a clearance counts as unreachable.
pub const DEFAULT_MAX_ROUNDS: usize = 3;

/// Totals for one [`Runner::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub clears: usize,
    pub events: usize,
    pub pieces: usize,
}

pub struct Runner<R, P, C, A> {
    solver: MoveSolver<R, P, C>,
    generator: MoveEventGenerator,
    animator: A,
    max_rounds: usize,
}

impl<R, P, C, A> Runner<R, P, C, A>
where
    R: RandomSource,
    P: PolicyProvider,
    C: PieceCatalog,
    A: Animator,
{
    pub fn new(solver: MoveSolver<R, P, C>, animator: A) -> Self {
        let generator = MoveEventGenerator::new(solver.board().size());
        Self {
            solver,
            generator,
            animator,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    /// How many fresh clearance orders to try per clearance. Only matters when
    /// the solver has a node limit; an exhaustive search fails the same way
    /// every time.
    pub fn with_max_rounds(mut self, rounds: usize) -> Self {
        self.max_rounds = rounds.max(1);
        self
    }

    pub fn solver(&self) -> &MoveSolver<R, P, C> {
        &self.solver
    }

    pub fn animator(&self) -> &A {
        &self.animator
    }

    pub fn into_parts(self) -> (MoveSolver<R, P, C>, A) {
        (self.solver, self.animator)
    }

    /// Produce `clears` clearances and play them. The animator is finalized
    /// even when a clearance can't be reached.
    pub fn run(&mut self, clears: usize) -> anyhow::Result<RunSummary> {
        let size = self.solver.board().size();
        let mut summary = RunSummary::default();

        let played = if self.animator.requires_precomputation() {
            self.run_precomputed(size, clears, &mut summary)
        } else {
            self.run_streaming(size, clears, &mut summary)
        };
        let finalized = self.animator.finalize();

        played?;
        finalized?;
        info!(
            clears = summary.clears,
            events = summary.events,
            pieces = summary.pieces,
            "run complete"
        );
        Ok(summary)
    }

    fn run_precomputed(
        &mut self,
        size: Size,
        clears: usize,
        summary: &mut RunSummary,
    ) -> anyhow::Result<()> {
        let mut all = Vec::new();
        for _ in 0..clears {
            all.extend(self.next_clearance(summary)?);
        }

        self.animator.prepare(size, Some(&all))?;
        for event in &all {
            if self.animator.is_finished() {
                break;
            }
            self.animator.animate_event(event)?;
        }
        Ok(())
    }

    fn run_streaming(
        &mut self,
        size: Size,
        clears: usize,
        summary: &mut RunSummary,
    ) -> anyhow::Result<()> {
        self.animator.prepare(size, None)?;
        for _ in 0..clears {
            if self.animator.is_finished() {
                debug!("animator finished early");
                break;
            }
            for event in self.next_clearance(summary)? {
                self.animator.animate_event(&event)?;
                if self.animator.is_finished() {
                    break;
                }
            }
        }
        Ok(())
    }

    /// Events for the next clearance, ending with its Clear event.
    fn next_clearance(&mut self, summary: &mut RunSummary) -> Result<Vec<SimulationEvent>, RunError> {
        for round in 0..self.max_rounds {
            let order = clearance_order(self.solver.rng_mut());
            for rows in order {
                if let Some(events) = self.try_clearance(rows, summary) {
                    return Ok(events);
                }
                debug!(rows, round, "clearance size unreachable, trying next");
            }
        }

        Err(RunError::ClearanceUnreachable)
    }

    fn try_clearance(&mut self, rows: usize, summary: &mut RunSummary) -> Option<Vec<SimulationEvent>> {
        let placements = self.solver.run_until_next_clear(rows);
        if placements.is_empty() {
            return None;
        }

        let mut events = self
            .generator
            .generate_move_events(&placements, self.solver.catalog());
        let cleared = self.solver.board_mut().clear_completed_rows();
        info!(
            clear = summary.clears + 1,
            rows = cleared.len(),
            pieces = placements.len(),
            nodes = self.solver.stats().nodes,
            "clearance"
        );
        events.push(SimulationEvent::Clear(ClearEvent { rows: cleared }));

        summary.clears += 1;
        summary.pieces += placements.len();
        summary.events += events.len();
        Some(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infinitetris_core::{Board, LcgRandom};

    use crate::policy::{FixedPolicy, SolverPolicy};

    #[derive(Default)]
    struct Recorder {
        prepared: Option<Option<usize>>,
        precompute: bool,
        events: Vec<SimulationEvent>,
        finalized: usize,
        stop_after: Option<usize>,
    }

    impl Animator for Recorder {
        fn requires_precomputation(&self) -> bool {
            self.precompute
        }

        fn prepare(&mut self, _size: Size, all: Option<&[SimulationEvent]>) -> anyhow::Result<()> {
            self.prepared = Some(all.map(<[SimulationEvent]>::len));
            Ok(())
        }

        fn animate_event(&mut self, event: &SimulationEvent) -> anyhow::Result<()> {
            self.events.push(event.clone());
            Ok(())
        }

        fn finalize(&mut self) -> anyhow::Result<()> {
            self.finalized += 1;
            Ok(())
        }

        fn is_finished(&self) -> bool {
            self.stop_after.is_some_and(|n| self.events.len() >= n)
        }
    }

    fn clear_count(events: &[SimulationEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, SimulationEvent::Clear(_)))
            .count()
    }

    #[test]
    fn clearance_order_is_a_permutation() {
        let mut rng = LcgRandom::new(3);
        for _ in 0..50 {
            let mut order = clearance_order(&mut rng);
            order.sort_unstable();
            assert_eq!(order, vec![1, 2, 3, 4]);
        }
    }

    #[test]
    fn clearance_order_favors_tetrises() {
        let mut rng = LcgRandom::new(11);
        let firsts = (0..1000)
            .filter(|_| clearance_order(&mut rng)[0] == 4)
            .count();
        // Weight 50 of 100.
        assert!((400..600).contains(&firsts), "four first {firsts} times");
    }

    #[test]
    fn streaming_run_emits_one_clear_per_clearance() {
        let solver = MoveSolver::new(Board::new(Size::new(10, 20)), LcgRandom::new(42));
        let mut runner = Runner::new(solver, Recorder::default());

        let summary = runner.run(2).unwrap();
        let recorder = runner.animator();

        assert_eq!(summary.clears, 2);
        assert_eq!(summary.events, recorder.events.len());
        assert_eq!(clear_count(&recorder.events), 2);
        assert_eq!(recorder.prepared, Some(None));
        assert_eq!(recorder.finalized, 1);
        assert!(matches!(recorder.events.last(), Some(SimulationEvent::Clear(_))));
    }

    #[test]
    fn precomputed_run_prepares_full_stream() {
        let solver = MoveSolver::new(Board::new(Size::new(10, 20)), LcgRandom::new(7));
        let recorder = Recorder {
            precompute: true,
            ..Recorder::default()
        };
        let mut runner = Runner::new(solver, recorder);

        let summary = runner.run(1).unwrap();
        let recorder = runner.animator();
        assert_eq!(recorder.prepared, Some(Some(summary.events)));
        assert_eq!(recorder.events.len(), summary.events);
    }

    #[test]
    fn early_stop_ends_streaming() {
        let solver = MoveSolver::new(Board::new(Size::new(10, 20)), LcgRandom::new(42));
        let recorder = Recorder {
            stop_after: Some(1),
            ..Recorder::default()
        };
        let mut runner = Runner::new(solver, recorder);

        runner.run(3).unwrap();
        assert_eq!(runner.animator().events.len(), 1);
        assert_eq!(runner.animator().finalized, 1);
    }

    #[test]
    fn unreachable_clearance_still_finalizes() {
        let solver = MoveSolver::with_parts(
            Board::new(Size::new(4, 4)),
            LcgRandom::new(1),
            FixedPolicy(SolverPolicy::new(0, 0)),
            infinitetris_core::StandardPieces,
        );
        let mut runner = Runner::new(solver, Recorder::default());

        let err = runner.run(1).unwrap_err();
        assert_eq!(
            err.downcast_ref::<RunError>(),
            Some(&RunError::ClearanceUnreachable)
        );
        assert_eq!(runner.animator().finalized, 1);
        assert!(runner.animator().events.is_empty());
    }
}
