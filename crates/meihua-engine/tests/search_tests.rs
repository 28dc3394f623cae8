use meihua_core::board::Board;
use meihua_core::fen::{parse_fen, STARTING_POSITION};
use meihua_core::legality::legal_moves;
use meihua_core::search::{SearchControl, SearchLimits, Searcher};
use meihua_core::types::Player;
use meihua_engine::{MinimaxConfig, MinimaxSearcher};

fn searcher(depth: u8) -> MinimaxSearcher {
    MinimaxSearcher::new(MinimaxConfig {
        depth,
        seed: Some(1),
    })
}

fn count_pieces(board: &Board, side: Player) -> usize {
    board
        .occupied()
        .filter(|&(square, _)| board.side_at(square) == Some(side))
        .count()
}

#[test]
fn search_returns_legal_move() {
    let state = parse_fen(STARTING_POSITION).unwrap();
    let mut minimax = searcher(2);

    let result = minimax.search(
        &state.board,
        state.turn,
        SearchLimits {
            depth: Some(2),
            ..SearchLimits::default()
        },
    );

    let best_move = result.best_move.expect("search should return a move");
    assert!(legal_moves(&state.board, state.turn).contains(&best_move));
    assert!(state.board.side_at(best_move.to) != Some(Player::Red));
    assert!(result.nodes_searched > 0);
}

#[test]
fn search_finds_winning_capture() {
    let state = parse_fen("5k3/9/9/9/R7r/9/9/9/9/3K5 w").unwrap();
    let mut minimax = searcher(2);
    let before_black_pieces = count_pieces(&state.board, Player::Black);

    let best_move = minimax
        .best_move(&state.board, state.turn, &mut SearchControl::default())
        .expect("search should find the capture");

    let mut board = state.board.clone();
    board.apply_move(best_move);
    let after_black_pieces = count_pieces(&board, Player::Black);
    assert!(after_black_pieces < before_black_pieces);
}

#[test]
fn search_recognizes_checkmated_side() {
    let state = parse_fen("3k5/9/9/9/9/9/9/9/r8/r3K4 w").unwrap();
    let mut minimax = searcher(2);

    let result = minimax.search(&state.board, state.turn, SearchLimits::default());

    assert!(result.best_move.is_none());
    assert!(result.score.0 <= -9_000);
}

#[test]
fn searcher_trait_returns_result() {
    let state = parse_fen(STARTING_POSITION).unwrap();
    let mut minimax = searcher(2);

    let result = Searcher::search(
        &mut minimax,
        &state.board,
        state.turn,
        SearchLimits {
            depth: Some(1),
            ..SearchLimits::default()
        },
    );

    assert!(result.best_move.is_some());
    assert!(result.nodes_searched > 0);
}

#[test]
fn baseline_depth_and_nps() {
    use std::time::Instant;

    let state = parse_fen(STARTING_POSITION).unwrap();

    for depth in [1, 2, 3] {
        let mut minimax = searcher(depth);
        let start = Instant::now();
        let result = minimax.search(&state.board, state.turn, SearchLimits::default());
        let elapsed = start.elapsed();
        eprintln!(
            "Depth {}: {} nodes in {:.3}s ({:.0} NPS)",
            depth,
            result.nodes_searched,
            elapsed.as_secs_f64(),
            result.nodes_searched as f64 / elapsed.as_secs_f64()
        );
        assert!(result.nodes_searched > 0);
    }
}
