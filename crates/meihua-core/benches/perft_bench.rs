use criterion::{black_box, criterion_group, criterion_main, Criterion};
use meihua_core::fen::{apply_move_to_fen, parse_fen, STARTING_POSITION};
use meihua_core::legality::legal_moves;

const MIDGAME_POSITION: &str =
    "rnbakabn1/8r/1c4nc1/p1p1p1p1p/9/9/P1P1P1P1P/2N1C2C1/9/R1BAKABNR w";

fn perft(fen: &str, depth: u32) -> u64 {
    let state = parse_fen(fen).expect("valid fen");
    let moves = legal_moves(&state.board, state.turn);
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0;
    for mv in moves {
        let next = apply_move_to_fen(fen, mv).expect("legal move applies");
        nodes += perft(&next, depth - 1);
    }
    nodes
}

fn perft_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");
    group.sample_size(10);

    group.bench_function("perft_1_starting_position", |b| {
        b.iter(|| perft(black_box(STARTING_POSITION), 1))
    });

    group.bench_function("perft_2_starting_position", |b| {
        b.iter(|| perft(black_box(STARTING_POSITION), 2))
    });

    group.bench_function("perft_2_midgame_position", |b| {
        b.iter(|| perft(black_box(MIDGAME_POSITION), 2))
    });

    group.finish();
}

criterion_group!(benches, perft_benchmarks);
criterion_main!(benches);
