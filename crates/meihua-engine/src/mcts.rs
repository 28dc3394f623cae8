use std::collections::HashMap;

use meihua_core::{
    board::{Board, Signature},
    eval::{Oracle, UniformOracle},
    legality::{legal_moves, outcome},
    search::{SearchLimits, SearchResult, Searcher},
    types::{Move, Player, Score, ACTION_SPACE},
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::encoding::encode_board;

const DEFAULT_SIMULATIONS: u32 = 800;
const DEFAULT_CPUCT: f32 = 1.0;
const DEFAULT_TEMPERATURE: f32 = 1.0;
/// Recursion ceiling for a single playout. Perpetual-chase lines never
/// terminate on their own, so past this depth a playout scores neutral.
const MAX_PLAYOUT_DEPTH: u32 = 500;
const EPS: f32 = 1e-8;

#[derive(Debug, Clone, Copy)]
pub struct MctsConfig {
    pub simulations: u32,
    /// Exploration weight on the prior term of the selection formula.
    pub c_puct: f32,
    pub temperature: f32,
    pub max_depth: u32,
    /// Fixes tie-breaking and move sampling for reproducible play.
    /// `None` draws from entropy on every call.
    pub seed: Option<u64>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            simulations: DEFAULT_SIMULATIONS,
            c_puct: DEFAULT_CPUCT,
            temperature: DEFAULT_TEMPERATURE,
            max_depth: MAX_PLAYOUT_DEPTH,
            seed: None,
        }
    }
}

/// Oracle-guided Monte Carlo tree search. Playouts walk canonical boards
/// so one routine serves both sides; statistics are keyed by board
/// signature and rebuilt from scratch on every top-level call.
pub struct MctsSearcher {
    oracle: Box<dyn Oracle>,
    config: MctsConfig,
    tree: HashMap<Signature, StateNode>,
    terminals: HashMap<Signature, f32>,
    nodes: u64,
}

impl std::fmt::Debug for MctsSearcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MctsSearcher")
            .field("oracle", &"<Oracle>")
            .field("config", &self.config)
            .field("tree", &self.tree.len())
            .field("nodes", &self.nodes)
            .finish()
    }
}

impl MctsSearcher {
    pub fn new(config: MctsConfig) -> Self {
        Self::with_oracle(config, Box::new(UniformOracle))
    }

    pub fn with_oracle(config: MctsConfig, oracle: Box<dyn Oracle>) -> Self {
        Self {
            oracle,
            config,
            tree: HashMap::new(),
            terminals: HashMap::new(),
            nodes: 0,
        }
    }

    /// Runs `simulations` playouts from `board` and returns the visit
    /// distribution over all 8100 actions, indexed in absolute
    /// coordinates for either side. Temperature 0 collapses the mass
    /// onto a single most-visited action (ties broken at random);
    /// otherwise counts are raised to `1/temperature` and renormalized.
    /// A position with no legal moves yields an all-zero vector.
    pub fn action_probabilities(
        &mut self,
        board: &Board,
        to_move: Player,
        simulations: u32,
        temperature: f32,
    ) -> Vec<f32> {
        let mut rng = self.seeded_rng();
        self.probabilities_with_rng(board, to_move, simulations, temperature, &mut rng)
    }

    /// Samples one move from the shaped visit distribution. `None` means
    /// the mover has no legal moves.
    pub fn best_move(
        &mut self,
        board: &Board,
        to_move: Player,
        simulations: u32,
        temperature: f32,
    ) -> Option<Move> {
        let mut rng = self.seeded_rng();
        let probs = self.probabilities_with_rng(board, to_move, simulations, temperature, &mut rng);
        sample_action(&probs, &mut rng).map(|action| Move::from_action_index(action as u16))
    }

    fn probabilities_with_rng(
        &mut self,
        board: &Board,
        to_move: Player,
        simulations: u32,
        temperature: f32,
        rng: &mut StdRng,
    ) -> Vec<f32> {
        let root = board.canonical(to_move);
        self.tree.clear();
        self.terminals.clear();
        self.nodes = 0;
        for _ in 0..simulations {
            self.simulate(&root, 0);
        }

        let mut counts = vec![0.0_f32; ACTION_SPACE];
        if let Some(node) = self.tree.get(&root.signature()) {
            for edge in &node.edges {
                counts[absolute_action(edge.mv, to_move)] = edge.visits as f32;
            }
        }
        shape_distribution(counts, temperature, rng)
    }

    /// One playout. Descends by the selection formula until it reaches a
    /// terminal or unexpanded board, then backs the leaf value up the
    /// visited path with each ply negating for the side change.
    fn simulate(&mut self, board: &Board, depth: u32) -> f32 {
        self.nodes += 1;
        if depth > self.config.max_depth {
            return 0.0;
        }
        let sig = board.signature();

        let terminal = match self.terminals.get(&sig) {
            Some(&value) => value,
            None => {
                let value = outcome(board, Player::Red).map_or(0.0, |o| o.value() as f32);
                self.terminals.insert(sig, value);
                value
            }
        };
        if terminal != 0.0 {
            return -terminal;
        }

        if !self.tree.contains_key(&sig) {
            let moves = legal_moves(board, Player::Red);
            let (policy, value) = self.oracle.predict(&encode_board(board));
            let edges = prior_edges(&policy, &moves);
            self.tree.insert(sig, StateNode { visits: 0, edges });
            return -value;
        }

        let (edge_index, mv) = {
            let node = &self.tree[&sig];
            let index = select_edge(node, self.config.c_puct);
            (index, node.edges[index].mv)
        };

        let mut child = board.clone();
        child.apply_move(mv);
        let child = child.canonical(Player::Black);
        let value = self.simulate(&child, depth + 1);

        if let Some(node) = self.tree.get_mut(&sig) {
            let edge = &mut node.edges[edge_index];
            let visits = edge.visits as f32;
            edge.value = (visits * edge.value + value) / (visits + 1.0);
            edge.visits += 1;
            node.visits += 1;
        }
        -value
    }

    fn root_score(&self, board: &Board, to_move: Player, action: usize) -> Score {
        let root = board.canonical(to_move);
        let canonical = match to_move {
            Player::Red => action,
            Player::Black => {
                usize::from(Move::from_action_index(action as u16).mirrored().action_index())
            }
        };
        let value = self
            .tree
            .get(&root.signature())
            .and_then(|node| {
                node.edges
                    .iter()
                    .find(|edge| usize::from(edge.mv.action_index()) == canonical)
                    .map(|edge| edge.value)
            })
            .unwrap_or(0.0);
        Score((value * 100.0) as i32)
    }

    fn seeded_rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl Default for MctsSearcher {
    fn default() -> Self {
        Self::new(MctsConfig::default())
    }
}

impl Searcher for MctsSearcher {
    fn search(&mut self, board: &Board, to_move: Player, limits: SearchLimits) -> SearchResult {
        let simulations = limits.simulations.unwrap_or(self.config.simulations);
        let mut rng = self.seeded_rng();
        let probs =
            self.probabilities_with_rng(board, to_move, simulations, self.config.temperature, &mut rng);
        let chosen = sample_action(&probs, &mut rng);
        SearchResult {
            best_move: chosen.map(|action| Move::from_action_index(action as u16)),
            score: chosen.map_or(Score(0), |action| self.root_score(board, to_move, action)),
            nodes_searched: self.nodes,
        }
    }
}

struct StateNode {
    /// Playouts backed up through this board so far.
    visits: u32,
    /// Legal replies in ascending action order, so equal selection
    /// scores resolve the same way on every platform.
    edges: Vec<Edge>,
}

struct Edge {
    mv: Move,
    prior: f32,
    visits: u32,
    /// Running mean of every value backed up through this edge.
    value: f32,
}

fn select_edge(node: &StateNode, c_puct: f32) -> usize {
    let sqrt_visits = (node.visits as f32 + EPS).sqrt();
    let mut best = f32::NEG_INFINITY;
    let mut best_index = 0;
    for (index, edge) in node.edges.iter().enumerate() {
        let bonus = c_puct * edge.prior * sqrt_visits;
        let score = if edge.visits > 0 {
            edge.value + bonus / (1.0 + edge.visits as f32)
        } else {
            bonus + EPS
        };
        if score > best {
            best = score;
            best_index = index;
        }
    }
    best_index
}

fn prior_edges(policy: &[f32], moves: &[Move]) -> Vec<Edge> {
    let mut edges: Vec<Edge> = moves
        .iter()
        .map(|&mv| Edge {
            mv,
            prior: policy
                .get(usize::from(mv.action_index()))
                .copied()
                .unwrap_or(0.0),
            visits: 0,
            value: 0.0,
        })
        .collect();
    edges.sort_by_key(|edge| edge.mv.action_index());

    let mass: f32 = edges.iter().map(|edge| edge.prior).sum();
    if mass > 0.0 {
        for edge in &mut edges {
            edge.prior /= mass;
        }
    } else if !edges.is_empty() {
        // The oracle put no mass on any legal move; spread it evenly.
        let uniform = 1.0 / edges.len() as f32;
        for edge in &mut edges {
            edge.prior = uniform;
        }
    }
    edges
}

fn absolute_action(mv: Move, to_move: Player) -> usize {
    let action = match to_move {
        Player::Red => mv.action_index(),
        Player::Black => mv.mirrored().action_index(),
    };
    usize::from(action)
}

fn shape_distribution(mut counts: Vec<f32>, temperature: f32, rng: &mut StdRng) -> Vec<f32> {
    if temperature <= f32::EPSILON {
        let top = counts.iter().fold(0.0_f32, |acc, &count| acc.max(count));
        if top <= 0.0 {
            return counts;
        }
        let mut leaders = Vec::new();
        for (index, &count) in counts.iter().enumerate() {
            if count == top {
                leaders.push(index);
            }
        }
        let pick = leaders[rng.gen_range(0..leaders.len())];
        let mut probs = vec![0.0_f32; counts.len()];
        probs[pick] = 1.0;
        return probs;
    }

    if (temperature - 1.0).abs() > f32::EPSILON {
        let power = 1.0 / temperature;
        for count in &mut counts {
            *count = count.powf(power);
        }
    }
    let total: f32 = counts.iter().sum();
    if total > 0.0 {
        for count in &mut counts {
            *count /= total;
        }
    }
    counts
}

fn sample_action(probs: &[f32], rng: &mut StdRng) -> Option<usize> {
    let total: f32 = probs.iter().sum();
    if total <= 0.0 {
        return None;
    }
    let mut draw = rng.gen::<f32>() * total;
    let mut last_seen = None;
    for (index, &p) in probs.iter().enumerate() {
        if p <= 0.0 {
            continue;
        }
        last_seen = Some(index);
        draw -= p;
        if draw <= 0.0 {
            return Some(index);
        }
    }
    // Rounding can leave a sliver of the draw unspent.
    last_seen
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use meihua_core::fen::parse_fen;
    use meihua_core::legality::legal_moves as absolute_legal_moves;

    use super::*;

    const MATED_FEN: &str = "3k5/9/9/9/9/9/9/9/r8/r3K4 w";

    fn searcher(seed: u64) -> MctsSearcher {
        MctsSearcher::new(MctsConfig {
            seed: Some(seed),
            ..MctsConfig::default()
        })
    }

    fn legal_actions(board: &Board, to_move: Player) -> HashSet<usize> {
        absolute_legal_moves(board, to_move)
            .iter()
            .map(|mv| usize::from(mv.action_index()))
            .collect()
    }

    #[test]
    fn uniform_oracle_spreads_mass_over_legal_moves() {
        let board = Board::starting();
        let mut mcts = searcher(3);
        let probs = mcts.action_probabilities(&board, Player::Red, 64, 1.0);

        assert_eq!(probs.len(), ACTION_SPACE);
        let total: f32 = probs.iter().sum();
        assert!((total - 1.0).abs() < 1e-4);

        let legal = legal_actions(&board, Player::Red);
        for (action, &p) in probs.iter().enumerate() {
            if p > 0.0 {
                assert!(legal.contains(&action), "illegal action {action} got mass");
            }
        }
    }

    #[test]
    fn every_simulation_past_the_first_backs_up_through_the_root() {
        let board = Board::starting();
        let mut mcts = searcher(3);
        mcts.action_probabilities(&board, Player::Red, 24, 1.0);

        // The first playout only expands the root; each later one walks
        // through it exactly once.
        let root = &mcts.tree[&board.signature()];
        assert_eq!(root.visits, 23);
        let edge_visits: u32 = root.edges.iter().map(|edge| edge.visits).sum();
        assert_eq!(edge_visits, 23);
    }

    #[test]
    fn checkmated_root_gets_an_empty_distribution() {
        let parsed = parse_fen(MATED_FEN).unwrap();
        let mut mcts = searcher(3);

        let probs = mcts.action_probabilities(&parsed.board, parsed.turn, 32, 1.0);
        assert!(probs.iter().all(|&p| p == 0.0));
        assert_eq!(mcts.best_move(&parsed.board, parsed.turn, 32, 1.0), None);
    }

    #[test]
    fn black_distributions_use_absolute_actions() {
        let board = Board::starting();
        let mut mcts = searcher(9);
        let probs = mcts.action_probabilities(&board, Player::Black, 48, 1.0);

        let legal = legal_actions(&board, Player::Black);
        let mut seen = 0;
        for (action, &p) in probs.iter().enumerate() {
            if p > 0.0 {
                assert!(legal.contains(&action), "illegal action {action} got mass");
                seen += 1;
            }
        }
        assert!(seen > 0);
    }

    #[test]
    fn seeded_sampling_reproduces_the_choice() {
        let board = Board::starting();
        let first = searcher(17).best_move(&board, Player::Red, 48, 1.0);
        let second = searcher(17).best_move(&board, Player::Red, 48, 1.0);

        assert_eq!(first, second);
        let legal = legal_actions(&board, Player::Red);
        assert!(legal.contains(&usize::from(first.unwrap().action_index())));
    }

    #[test]
    fn temperature_zero_is_a_one_hot_distribution() {
        let board = Board::starting();
        let mut mcts = searcher(5);
        let probs = mcts.action_probabilities(&board, Player::Red, 64, 0.0);

        let nonzero: Vec<usize> = (0..probs.len()).filter(|&a| probs[a] > 0.0).collect();
        assert_eq!(nonzero.len(), 1);
        assert_eq!(probs[nonzero[0]], 1.0);
        assert!(legal_actions(&board, Player::Red).contains(&nonzero[0]));
    }

    #[test]
    fn searcher_adapter_plays_a_legal_move() {
        let board = Board::starting();
        let mut mcts = searcher(7);
        let limits = SearchLimits {
            simulations: Some(32),
            ..SearchLimits::default()
        };

        let result = mcts.search(&board, Player::Red, limits);
        let best = result.best_move.unwrap();
        assert!(legal_actions(&board, Player::Red).contains(&usize::from(best.action_index())));
        assert!(result.nodes_searched >= 32);
        assert!(result.score.0.abs() <= 100);
    }
}
