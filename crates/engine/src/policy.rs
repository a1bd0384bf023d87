//! Growth policy.
//!
//! The solver rejects placements that grow the stack too far above the height
//! the board had when the run started. The bounds come from a
//! [`PolicyProvider`], evaluated once per run.

use infinitetris_core::Board;

/// Rows the stack may reach before a clearance is found.
pub const STANDARD_INTERMEDIATE_CEILING: i32 = 16;

/// Rows the stack may occupy once the clearance has been applied.
pub const STANDARD_FINAL_CEILING: i32 = 15;

/// Hard cap on net growth left behind by one run.
pub const STANDARD_FINAL_CAP: i32 = 6;

/// Growth bounds for one solver run, relative to the starting filled height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolverPolicy {
    /// Max growth right after a placement, before any clearance.
    pub max_intermediate_growth: i32,
    /// Max growth after the placement's clearance (if any) is applied.
    pub max_final_growth: i32,
}

impl SolverPolicy {
    pub const fn new(max_intermediate_growth: i32, max_final_growth: i32) -> Self {
        Self {
            max_intermediate_growth,
            max_final_growth,
        }
    }
}

pub trait PolicyProvider {
    fn policy(&self, initial_board: &Board) -> SolverPolicy;
}

/// Keeps the stack inside the visible window of a 20-row board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardPolicy;

impl PolicyProvider for StandardPolicy {
    fn policy(&self, initial_board: &Board) -> SolverPolicy {
        let height = initial_board.filled_height();
        SolverPolicy {
            max_intermediate_growth: (STANDARD_INTERMEDIATE_CEILING - height).max(0),
            max_final_growth: (STANDARD_FINAL_CEILING - height).min(STANDARD_FINAL_CAP).max(0),
        }
    }
}

/// The same bounds regardless of board state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedPolicy(pub SolverPolicy);

impl PolicyProvider for FixedPolicy {
    fn policy(&self, _initial_board: &Board) -> SolverPolicy {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infinitetris_core::types::Size;

    fn board_with_height(height: usize) -> Board {
        let mut rows = vec![".........."; 20];
        for row in rows.iter_mut().rev().take(height) {
            *row = "#.........";
        }
        Board::from_rows(&rows)
    }

    #[test]
    fn empty_board_caps_final_growth() {
        let policy = StandardPolicy.policy(&Board::new(Size::new(10, 20)));
        assert_eq!(policy, SolverPolicy::new(16, 6));
    }

    #[test]
    fn tall_board_tightens_both_bounds() {
        assert_eq!(StandardPolicy.policy(&board_with_height(5)), SolverPolicy::new(11, 6));
        assert_eq!(StandardPolicy.policy(&board_with_height(12)), SolverPolicy::new(4, 3));
    }

    #[test]
    fn bounds_never_go_negative() {
        assert_eq!(StandardPolicy.policy(&board_with_height(18)), SolverPolicy::new(0, 0));
    }

    #[test]
    fn fixed_policy_ignores_board() {
        let fixed = FixedPolicy(SolverPolicy::new(2, 1));
        assert_eq!(fixed.policy(&board_with_height(10)), SolverPolicy::new(2, 1));
    }
}
