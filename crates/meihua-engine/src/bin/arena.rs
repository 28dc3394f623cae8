use std::sync::{Arc, Mutex};
use std::thread;

use meihua_core::game::Game;
use meihua_core::search::{SearchLimits, Searcher};
use meihua_core::types::{Outcome, Player};
use meihua_engine::mcts::{MctsConfig, MctsSearcher};
use meihua_engine::minimax::{MinimaxConfig, MinimaxSearcher};

const MOVE_LIMIT: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchResult {
    MctsWin,
    MinimaxWin,
    Draw,
}

fn side_name(player: Player) -> &'static str {
    match player {
        Player::Red => "Red",
        Player::Black => "Black",
    }
}

fn result_name(result: MatchResult) -> &'static str {
    match result {
        MatchResult::MctsWin => "MCTS win",
        MatchResult::MinimaxWin => "Minimax win",
        MatchResult::Draw => "Draw",
    }
}

fn infer_result(game: &Game, mcts_side: Player, reached_move_limit: bool) -> MatchResult {
    if reached_move_limit {
        return MatchResult::Draw;
    }
    let winner = match game.outcome() {
        Some(Outcome::Win) => game.turn(),
        Some(Outcome::Loss) => game.turn().opponent(),
        None => return MatchResult::Draw,
    };
    if winner == mcts_side {
        MatchResult::MctsWin
    } else {
        MatchResult::MinimaxWin
    }
}

fn play_game(mcts_sims: u32, minimax_depth: u8, mcts_is_red: bool) -> (u32, MatchResult) {
    let mut game = Game::new();
    // Temperature 0 makes MCTS play its most-visited move; variety comes
    // from tie-breaks and the minimax root shuffle.
    let mut mcts = MctsSearcher::new(MctsConfig {
        simulations: mcts_sims,
        temperature: 0.0,
        ..MctsConfig::default()
    });
    let mut minimax = MinimaxSearcher::new(MinimaxConfig {
        depth: minimax_depth,
        ..MinimaxConfig::default()
    });

    let mcts_side = if mcts_is_red {
        Player::Red
    } else {
        Player::Black
    };
    let mcts_limits = SearchLimits {
        simulations: Some(mcts_sims),
        ..SearchLimits::default()
    };
    let minimax_limits = SearchLimits {
        depth: Some(minimax_depth),
        ..SearchLimits::default()
    };

    let mut moves_played = 0u32;
    while !game.is_over() && moves_played < MOVE_LIMIT {
        let result = if game.turn() == mcts_side {
            mcts.search(game.board(), game.turn(), mcts_limits)
        } else {
            minimax.search(game.board(), game.turn(), minimax_limits)
        };

        let Some(mv) = result.best_move else {
            break;
        };

        game.play(mv).unwrap();
        moves_played = moves_played.saturating_add(1);
    }

    let reached_move_limit = moves_played >= MOVE_LIMIT && !game.is_over();
    let outcome = infer_result(&game, mcts_side, reached_move_limit);
    (moves_played, outcome)
}

fn elo_diff(mcts_wins: u32, draws: u32, total_games: u32) -> f64 {
    if total_games == 0 {
        return 0.0;
    }
    let win_rate = (mcts_wins as f64 + draws as f64 * 0.5) / total_games as f64;
    if win_rate <= 0.0 {
        f64::NEG_INFINITY
    } else if win_rate >= 1.0 {
        f64::INFINITY
    } else {
        -400.0 * (1.0 / win_rate - 1.0).log10()
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let num_games: u32 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(100);
    let mcts_sims: u32 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(400);
    let minimax_depth: u8 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(2);
    let num_threads: usize = args.get(4).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
        thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
    });

    let completed = Arc::new(Mutex::new(0u32));
    let results: Arc<Mutex<Vec<(u32, bool, u32, MatchResult)>>> =
        Arc::new(Mutex::new(Vec::with_capacity(num_games as usize)));

    eprintln!(
        "Running {num_games} arena games with MCTS sims={mcts_sims}, minimax depth={minimax_depth} on {num_threads} threads..."
    );

    let handles: Vec<_> = (0..num_threads)
        .map(|thread_id| {
            let completed = Arc::clone(&completed);
            let results = Arc::clone(&results);

            thread::spawn(move || loop {
                let game_num = {
                    let mut c = completed.lock().unwrap();
                    if *c >= num_games {
                        break;
                    }
                    *c += 1;
                    *c
                };

                let mcts_is_red = game_num % 2 == 1;
                let (moves, result) = play_game(mcts_sims, minimax_depth, mcts_is_red);

                eprintln!(
                    "[t{thread_id}] Game {game_num}/{num_games}: {moves} moves, {} (MCTS={})",
                    result_name(result),
                    side_name(if mcts_is_red {
                        Player::Red
                    } else {
                        Player::Black
                    })
                );

                results
                    .lock()
                    .unwrap()
                    .push((game_num, mcts_is_red, moves, result));
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("thread panicked");
    }

    let mut all_results = Arc::try_unwrap(results).unwrap().into_inner().unwrap();
    all_results.sort_by_key(|(game_num, _, _, _)| *game_num);

    let mut mcts_wins = 0u32;
    let mut minimax_wins = 0u32;
    let mut draws = 0u32;
    for (_, _, _, result) in all_results {
        match result {
            MatchResult::MctsWin => mcts_wins = mcts_wins.saturating_add(1),
            MatchResult::MinimaxWin => minimax_wins = minimax_wins.saturating_add(1),
            MatchResult::Draw => draws = draws.saturating_add(1),
        }
    }

    let elo = elo_diff(mcts_wins, draws, num_games);
    eprintln!(
        "MCTS: {mcts_wins}W/{minimax_wins}L/{draws}D | Minimax: {minimax_wins}W/{mcts_wins}L/{draws}D | Elo diff: {elo:+.1}"
    );
}
