use crate::board::Board;
use crate::types::{Move, Player, Score};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchLimits {
    pub depth: Option<u8>,
    pub simulations: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub score: Score,
    pub nodes_searched: u64,
}

/// Raised through `Result` when the abort flag trips mid-search. Carries
/// no payload; callers discard the partial computation and report no
/// best move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbortSearch;

/// Caller-owned signals threaded through one search call: a cooperative
/// abort flag, polled at search entry points, and a progress sink fed
/// (completed, total) after each finished root move.
#[derive(Default)]
pub struct SearchControl<'a> {
    pub abort: Option<&'a dyn Fn() -> bool>,
    pub progress: Option<&'a mut dyn FnMut(usize, usize)>,
}

impl SearchControl<'_> {
    pub fn aborted(&self) -> bool {
        self.abort.map(|flag| flag()).unwrap_or(false)
    }
}

pub trait Searcher {
    fn search(&mut self, board: &Board, to_move: Player, limits: SearchLimits) -> SearchResult;
}
