use crate::board::Board;
use crate::types::Score;

/// Static position judgment, Red-positive. Must be deterministic so
/// duplicate searches of one board agree.
pub trait Evaluator {
    fn evaluate(&self, board: &Board) -> Score;
}

/// Joint policy/value estimate over the flat action space.
/// Used by MCTS to guide tree exploration via PUCT.
pub trait Oracle: Send + Sync {
    /// Returns one prior per action index plus a value in `[-1, 1]`, both
    /// from the mover's perspective of the encoded canonical board. The
    /// prior vector must have [`crate::types::ACTION_SPACE`] entries;
    /// masking to legal moves is the caller's job.
    fn predict(&self, encoded: &[f32]) -> (Vec<f32>, f32);
}

/// Flat priors and a neutral value. Baseline before any trained network
/// is available.
pub struct UniformOracle;

impl Oracle for UniformOracle {
    fn predict(&self, _encoded: &[f32]) -> (Vec<f32>, f32) {
        let p = 1.0 / crate::types::ACTION_SPACE as f32;
        (vec![p; crate::types::ACTION_SPACE], 0.0)
    }
}
