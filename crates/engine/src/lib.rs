//! Placement engine - search, trajectories, and the clearance loop
//!
//! - [`solver`]: randomized backtracking search for a placement sequence that
//!   ends in an exact clearance
//! - [`move_state`]: the per-node (piece, rotation, column) odometer
//! - [`policy`]: growth bounds the search must respect
//! - [`events`]: keyframes and Appear/Move events for each placement
//! - [`runner`]: repeated clearances driving an [`Animator`]

pub mod events;
pub mod move_state;
pub mod policy;
pub mod runner;
pub mod solver;

pub use events::{Keyframe, MoveEventGenerator};
pub use move_state::MoveState;
pub use policy::{FixedPolicy, PolicyProvider, SolverPolicy, StandardPolicy};
pub use runner::{clearance_order, Animator, RunError, RunSummary, Runner};
pub use solver::{completed_rows, MoveSolver, PlacementOutcome, SearchStats};
