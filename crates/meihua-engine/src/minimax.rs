use meihua_core::{
    board::Board,
    eval::Evaluator,
    legality::{legal_captures, legal_moves},
    search::{AbortSearch, SearchControl, SearchLimits, SearchResult, Searcher},
    types::{Move, Player, Score},
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::classical::ClassicalEval;

/// Magnitude returned for decided positions; far above any material sum
/// and far below the window bounds.
const TERMINAL_SCORE: i32 = 10_000;
const INF: i32 = 1_000_000;
const DEFAULT_DEPTH: u8 = 2;

#[derive(Debug, Clone, Copy)]
pub struct MinimaxConfig {
    pub depth: u8,
    /// Fixes the root shuffle for reproducible play. `None` draws from
    /// entropy on every call.
    pub seed: Option<u64>,
}

impl Default for MinimaxConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinimaxResult {
    pub best_move: Option<Move>,
    pub score: Score,
    pub nodes: u64,
}

/// Fixed-depth negamax with alpha-beta pruning and a capture-only
/// quiescence extension at the horizon. Works on canonical boards, so
/// one routine serves both sides; returned moves are absolute.
pub struct MinimaxSearcher {
    eval: Box<dyn Evaluator>,
    config: MinimaxConfig,
    nodes: u64,
}

impl std::fmt::Debug for MinimaxSearcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MinimaxSearcher")
            .field("eval", &"<Evaluator>")
            .field("config", &self.config)
            .field("nodes", &self.nodes)
            .finish()
    }
}

impl MinimaxSearcher {
    pub fn new(config: MinimaxConfig) -> Self {
        Self::with_eval(config, Box::new(ClassicalEval::new()))
    }

    pub fn with_eval(config: MinimaxConfig, eval: Box<dyn Evaluator>) -> Self {
        Self {
            eval,
            config,
            nodes: 0,
        }
    }

    /// Picks a move for `to_move`. `None` means the mover has no legal
    /// move, or the abort flag tripped before the search finished.
    pub fn best_move(
        &mut self,
        board: &Board,
        to_move: Player,
        control: &mut SearchControl<'_>,
    ) -> Option<Move> {
        self.search_with_control(board, to_move, control).best_move
    }

    pub fn search_with_control(
        &mut self,
        board: &Board,
        to_move: Player,
        control: &mut SearchControl<'_>,
    ) -> MinimaxResult {
        self.search_at_depth(board, to_move, self.config.depth, control)
    }

    fn search_at_depth(
        &mut self,
        board: &Board,
        to_move: Player,
        depth: u8,
        control: &mut SearchControl<'_>,
    ) -> MinimaxResult {
        self.nodes = 0;

        let root = board.canonical(to_move);
        let mut moves = legal_moves(&root, Player::Red);
        if moves.is_empty() {
            return MinimaxResult {
                best_move: None,
                score: Score(-TERMINAL_SCORE),
                nodes: self.nodes,
            };
        }

        // The shuffle only varies play among equally-scored moves. Every
        // root child is searched with a full window, so the chosen score
        // never depends on visit order.
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        moves.shuffle(&mut rng);

        let total = moves.len();
        let mut best: Option<Move> = None;
        let mut best_score = -INF;

        for (index, mv) in moves.iter().copied().enumerate() {
            if control.aborted() {
                return self.aborted_result();
            }

            let mut child = root.clone();
            child.apply_move(mv);
            let child = child.canonical(Player::Black);

            let score = match self.negamax(&child, depth.saturating_sub(1), -INF, INF, control) {
                Ok(score) => -score,
                Err(AbortSearch) => return self.aborted_result(),
            };

            if score > best_score {
                best_score = score;
                best = Some(mv);
            }

            if let Some(progress) = control.progress.as_mut() {
                progress(index + 1, total);
            }
        }

        let best = best.map(|mv| match to_move {
            Player::Red => mv,
            Player::Black => mv.mirrored(),
        });

        MinimaxResult {
            best_move: best,
            score: Score(best_score),
            nodes: self.nodes,
        }
    }

    /// `board` is canonical: the mover plays the positive pieces. Score
    /// is from the mover's viewpoint.
    fn negamax(
        &mut self,
        board: &Board,
        depth: u8,
        mut alpha: i32,
        beta: i32,
        control: &SearchControl<'_>,
    ) -> Result<i32, AbortSearch> {
        self.bump_nodes(control)?;

        if board.king_square(Player::Red).is_none() {
            return Ok(-TERMINAL_SCORE);
        }
        if board.king_square(Player::Black).is_none() {
            return Ok(TERMINAL_SCORE);
        }

        let moves = legal_moves(board, Player::Red);
        if moves.is_empty() {
            return Ok(-TERMINAL_SCORE);
        }

        if depth == 0 {
            return self.quiescence(board, alpha, beta, control);
        }

        let mut best = -INF;
        for mv in moves {
            let mut child = board.clone();
            child.apply_move(mv);
            let child = child.canonical(Player::Black);

            let score = -self.negamax(&child, depth - 1, -beta, -alpha, control)?;

            if score > best {
                best = score;
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                break;
            }
        }

        Ok(best)
    }

    /// Resolves hanging captures before trusting the static score, so a
    /// depth cutoff cannot hide an immediate recapture.
    fn quiescence(
        &mut self,
        board: &Board,
        mut alpha: i32,
        beta: i32,
        control: &SearchControl<'_>,
    ) -> Result<i32, AbortSearch> {
        self.bump_nodes(control)?;

        if board.king_square(Player::Red).is_none() {
            return Ok(-TERMINAL_SCORE);
        }
        if board.king_square(Player::Black).is_none() {
            return Ok(TERMINAL_SCORE);
        }

        let stand_pat = self.eval.evaluate(board).0;
        if stand_pat >= beta {
            return Ok(beta);
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        for mv in legal_captures(board, Player::Red) {
            let mut child = board.clone();
            child.apply_move(mv);
            let child = child.canonical(Player::Black);

            let score = -self.quiescence(&child, -beta, -alpha, control)?;

            if score >= beta {
                return Ok(beta);
            }
            if score > alpha {
                alpha = score;
            }
        }

        Ok(alpha)
    }

    fn bump_nodes(&mut self, control: &SearchControl<'_>) -> Result<(), AbortSearch> {
        self.nodes = self.nodes.saturating_add(1);
        if control.aborted() {
            return Err(AbortSearch);
        }
        Ok(())
    }

    fn aborted_result(&self) -> MinimaxResult {
        MinimaxResult {
            best_move: None,
            score: Score(0),
            nodes: self.nodes,
        }
    }
}

impl Default for MinimaxSearcher {
    fn default() -> Self {
        Self::new(MinimaxConfig::default())
    }
}

impl Searcher for MinimaxSearcher {
    fn search(&mut self, board: &Board, to_move: Player, limits: SearchLimits) -> SearchResult {
        let depth = limits.depth.unwrap_or(self.config.depth);
        let result = self.search_at_depth(board, to_move, depth, &mut SearchControl::default());
        SearchResult {
            best_move: result.best_move,
            score: result.score,
            nodes_searched: result.nodes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meihua_core::fen::{parse_fen, STARTING_POSITION};
    use meihua_core::types::Square;

    fn searcher(depth: u8) -> MinimaxSearcher {
        MinimaxSearcher::new(MinimaxConfig {
            depth,
            seed: Some(1),
        })
    }

    #[test]
    fn takes_the_hanging_rook() {
        let state = parse_fen("5k3/9/9/9/R7r/9/9/9/9/3K5 w").expect("valid fen");
        let mut searcher = searcher(2);

        let best = searcher
            .best_move(&state.board, state.turn, &mut SearchControl::default())
            .expect("a legal move exists");

        assert_eq!(
            best,
            Move::new(Square::new_unchecked(5, 0), Square::new_unchecked(5, 8))
        );
    }

    #[test]
    fn checkmated_side_has_no_move() {
        let state = parse_fen("3k5/9/9/9/9/9/9/9/r8/r3K4 w").expect("valid fen");
        let mut searcher = searcher(2);
        let result =
            searcher.search_with_control(&state.board, state.turn, &mut SearchControl::default());

        assert_eq!(result.best_move, None);
        assert_eq!(result.score, Score(-TERMINAL_SCORE));
    }

    #[test]
    fn abort_flag_suppresses_the_result() {
        let state = parse_fen(STARTING_POSITION).expect("valid fen");
        let mut searcher = searcher(3);
        let abort = || true;
        let mut control = SearchControl {
            abort: Some(&abort),
            progress: None,
        };

        assert_eq!(searcher.best_move(&state.board, state.turn, &mut control), None);
    }

    #[test]
    fn progress_runs_over_every_root_move() {
        let state = parse_fen(STARTING_POSITION).expect("valid fen");
        let total_moves = legal_moves(&state.board, state.turn).len();

        let mut reports: Vec<(usize, usize)> = Vec::new();
        let mut sink = |done: usize, total: usize| reports.push((done, total));
        let mut control = SearchControl {
            abort: None,
            progress: Some(&mut sink),
        };

        let mut searcher = searcher(1);
        searcher
            .best_move(&state.board, state.turn, &mut control)
            .expect("start position has moves");

        assert_eq!(reports.len(), total_moves);
        assert_eq!(reports.first(), Some(&(1, total_moves)));
        assert_eq!(reports.last(), Some(&(total_moves, total_moves)));
    }

    #[test]
    fn fixed_seed_reproduces_the_choice() {
        let state = parse_fen(STARTING_POSITION).expect("valid fen");

        let pick = |seed: u64| {
            let mut searcher = MinimaxSearcher::new(MinimaxConfig {
                depth: 2,
                seed: Some(seed),
            });
            searcher.best_move(&state.board, state.turn, &mut SearchControl::default())
        };

        assert_eq!(pick(42), pick(42));
    }

    #[test]
    fn black_best_move_is_absolute_and_legal() {
        let fen = "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR b";
        let state = parse_fen(fen).expect("valid fen");
        let mut searcher = searcher(1);

        let best = searcher
            .best_move(&state.board, state.turn, &mut SearchControl::default())
            .expect("black has moves");

        assert!(legal_moves(&state.board, Player::Black).contains(&best));
    }

    #[test]
    fn pruning_matches_the_full_width_value() {
        let fen = "rnbakabn1/8r/1c4nc1/p1p1p1p1p/9/9/P1P1P1P1P/2N1C2C1/9/R1BAKABNR w";
        let state = parse_fen(fen).expect("valid fen");
        let root = state.board.canonical(state.turn);

        let mut searcher = searcher(2);
        let control = SearchControl::default();
        let pruned = searcher
            .negamax(&root, 2, -INF, INF, &control)
            .expect("no abort flag set");
        let reference = full_width(&mut searcher, &root, 2);

        assert_eq!(pruned, reference);
    }

    /// Plain negamax over the same tree with no pruning window.
    fn full_width(searcher: &mut MinimaxSearcher, board: &Board, depth: u8) -> i32 {
        if board.king_square(Player::Red).is_none() {
            return -TERMINAL_SCORE;
        }
        if board.king_square(Player::Black).is_none() {
            return TERMINAL_SCORE;
        }

        let moves = legal_moves(board, Player::Red);
        if moves.is_empty() {
            return -TERMINAL_SCORE;
        }

        if depth == 0 {
            return searcher
                .quiescence(board, -INF, INF, &SearchControl::default())
                .unwrap_or(0);
        }

        let mut best = -INF;
        for mv in moves {
            let mut child = board.clone();
            child.apply_move(mv);
            let child = child.canonical(Player::Black);
            best = best.max(-full_width(searcher, &child, depth - 1));
        }
        best
    }
}
