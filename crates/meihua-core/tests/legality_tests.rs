use meihua_core::board::Board;
use meihua_core::fen::{parse_fen, STARTING_POSITION};
use meihua_core::legality::{in_check, is_legal, kings_facing, legal_captures, legal_moves, outcome};
use meihua_core::movegen::pseudo_legal_moves;
use meihua_core::types::{Move, Outcome, PieceKind, Player, Square};

fn sq(row: u8, col: u8) -> Square {
    Square::new(row, col).expect("valid square")
}

fn mv(from: (u8, u8), to: (u8, u8)) -> Move {
    Move::new(sq(from.0, from.1), sq(to.0, to.1))
}

fn board(fen: &str) -> (Board, Player) {
    let parsed = parse_fen(fen).expect("valid fen");
    (parsed.board, parsed.turn)
}

#[test]
fn opening_position_is_quiet() {
    let (start, turn) = board(STARTING_POSITION);
    assert!(!in_check(&start, Player::Red));
    assert!(!in_check(&start, Player::Black));
    assert!(!kings_facing(&start));
    assert_eq!(outcome(&start, turn), None);
    assert_eq!(
        legal_moves(&start, turn).len(),
        pseudo_legal_moves(&start, turn).len()
    );
    assert!(legal_captures(&start, turn).is_empty());
}

#[test]
fn checked_king_may_not_stay_on_the_attacked_file() {
    let (pos, turn) = board("4k4/9/9/9/4r4/9/9/9/9/4K4 w");
    assert!(in_check(&pos, turn));

    let legal = legal_moves(&pos, turn);
    assert_eq!(legal.len(), 2);
    for m in &legal {
        assert_eq!(m.from, sq(0, 4));
        assert_ne!(m.to.col, 4, "stayed on the rook's file: {m}");
    }
    assert!(!is_legal(&pos, turn, mv((0, 4), (1, 4))));
}

#[test]
fn pinned_piece_cannot_expose_the_king() {
    // The horse shields the king from the rook and may not move at all.
    let (pos, turn) = board("4k4/9/9/9/4r4/9/9/4H4/9/4K4 w");
    assert!(!in_check(&pos, turn));

    let legal = legal_moves(&pos, turn);
    assert!(legal.iter().all(|m| m.from == sq(0, 4)));
    assert_eq!(legal.len(), 3);
    assert!(!is_legal(&pos, turn, mv((2, 4), (4, 3))));
    assert!(!is_legal(&pos, turn, mv((2, 4), (0, 3))));
}

#[test]
fn flying_general_moves_are_rejected() {
    let (pos, turn) = board("4k4/9/9/9/9/9/9/9/9/3K5 w");
    assert!(!kings_facing(&pos));

    let legal = legal_moves(&pos, turn);
    assert_eq!(legal.len(), 1);
    assert_eq!(legal[0], mv((0, 3), (1, 3)));
    // Stepping onto the open file would face the enemy king directly.
    assert!(!is_legal(&pos, turn, mv((0, 3), (0, 4))));

    let mut faced = pos.clone();
    faced.apply_move(mv((0, 3), (0, 4)));
    assert!(kings_facing(&faced));
}

#[test]
fn facing_kings_are_not_check_but_constrain_movement() {
    let (pos, turn) = board("4k4/9/9/9/9/9/9/9/9/4K4 w");
    assert!(kings_facing(&pos));
    assert!(!in_check(&pos, turn));

    // Only the two sidesteps break the confrontation.
    let legal = legal_moves(&pos, turn);
    assert_eq!(legal.len(), 2);
    assert!(legal.iter().all(|m| m.to.col != 4));
}

#[test]
fn checkmate_leaves_no_legal_reply() {
    let (pos, turn) = board("3k5/9/9/9/9/9/9/9/r8/r3K4 w");
    assert!(in_check(&pos, turn));
    assert!(legal_moves(&pos, turn).is_empty());
    assert_eq!(outcome(&pos, turn), Some(Outcome::Loss));
}

#[test]
fn stalemate_counts_as_a_loss() {
    let (pos, turn) = board("4rk3/9/9/9/9/9/9/9/8r/3K5 w");
    assert!(!in_check(&pos, turn));
    assert!(legal_moves(&pos, turn).is_empty());
    assert_eq!(outcome(&pos, turn), Some(Outcome::Loss));
}

#[test]
fn missing_king_decides_without_move_generation() {
    let mut lone = Board::empty();
    lone.set_piece(sq(9, 4), PieceKind::King.signed(Player::Black));

    assert_eq!(outcome(&lone, Player::Red), Some(Outcome::Loss));
    assert_eq!(outcome(&lone, Player::Black), Some(Outcome::Win));
    assert!(in_check(&lone, Player::Red));
}

#[test]
fn legal_captures_are_the_capture_subset() {
    let (pos, turn) = board("3k5/9/9/9/C2p2r2/9/9/9/9/4K4 w");
    let captures = legal_captures(&pos, turn);

    assert_eq!(captures.len(), 1);
    assert_eq!(captures[0], mv((5, 0), (5, 6)));
    assert!(legal_moves(&pos, turn).contains(&captures[0]));
}
