use crate::board::{Board, FILES, RANKS};
use crate::types::{Move, MoveList, PieceKind, Player, Square};

pub const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
pub const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Horse jumps as (blocking leg, destination) offsets. The leg is the
/// orthogonally adjacent square the jump passes over.
pub const HORSE_JUMPS: [((i8, i8), (i8, i8)); 8] = [
    ((1, 0), (2, 1)),
    ((1, 0), (2, -1)),
    ((-1, 0), (-2, 1)),
    ((-1, 0), (-2, -1)),
    ((0, 1), (1, 2)),
    ((0, 1), (-1, 2)),
    ((0, -1), (1, -2)),
    ((0, -1), (-1, -2)),
];

/// Elephant steps as (blocking eye, destination) offsets. The eye is the
/// diagonal midpoint of the two-square step.
pub const ELEPHANT_STEPS: [((i8, i8), (i8, i8)); 4] = [
    ((1, 1), (2, 2)),
    ((1, -1), (2, -2)),
    ((-1, 1), (-2, 2)),
    ((-1, -1), (-2, -2)),
];

/// Every geometrically valid move for `turn`, ignoring check and the
/// facing-kings rule. Legality filtering lives in [`crate::legality`].
pub fn pseudo_legal_moves(board: &Board, turn: Player) -> MoveList {
    generate(board, turn, false)
}

/// The capture subset of [`pseudo_legal_moves`].
pub fn pseudo_legal_captures(board: &Board, turn: Player) -> MoveList {
    generate(board, turn, true)
}

pub fn in_palace(square: Square, player: Player) -> bool {
    let row_ok = match player {
        Player::Red => square.row <= 2,
        Player::Black => square.row >= 7,
    };
    row_ok && (3..=5).contains(&square.col)
}

/// Whether `square` is on `player`'s own half. The river runs between
/// rows 4 and 5.
pub fn own_side_of_river(square: Square, player: Player) -> bool {
    match player {
        Player::Red => square.row <= 4,
        Player::Black => square.row >= 5,
    }
}

fn generate(board: &Board, turn: Player, captures_only: bool) -> MoveList {
    let mut moves = MoveList::new();
    for (from, code) in board.occupied() {
        if code.signum() != turn.sign() {
            continue;
        }
        let Some(kind) = PieceKind::from_code(code.abs()) else {
            continue;
        };
        match kind {
            PieceKind::King => king_moves(board, turn, from, captures_only, &mut moves),
            PieceKind::Advisor => advisor_moves(board, turn, from, captures_only, &mut moves),
            PieceKind::Elephant => elephant_moves(board, turn, from, captures_only, &mut moves),
            PieceKind::Horse => horse_moves(board, turn, from, captures_only, &mut moves),
            PieceKind::Rook => rook_moves(board, turn, from, captures_only, &mut moves),
            PieceKind::Cannon => cannon_moves(board, turn, from, captures_only, &mut moves),
            PieceKind::Pawn => pawn_moves(board, turn, from, captures_only, &mut moves),
        }
    }
    moves
}

fn king_moves(board: &Board, turn: Player, from: Square, captures_only: bool, out: &mut MoveList) {
    for (dr, dc) in ORTHOGONALS {
        let Some(to) = offset(from, dr, dc) else {
            continue;
        };
        if in_palace(to, turn) {
            push_step(board, turn, from, to, captures_only, out);
        }
    }
}

fn advisor_moves(
    board: &Board,
    turn: Player,
    from: Square,
    captures_only: bool,
    out: &mut MoveList,
) {
    for (dr, dc) in DIAGONALS {
        let Some(to) = offset(from, dr, dc) else {
            continue;
        };
        if in_palace(to, turn) {
            push_step(board, turn, from, to, captures_only, out);
        }
    }
}

fn elephant_moves(
    board: &Board,
    turn: Player,
    from: Square,
    captures_only: bool,
    out: &mut MoveList,
) {
    for ((er, ec), (dr, dc)) in ELEPHANT_STEPS {
        let Some(eye) = offset(from, er, ec) else {
            continue;
        };
        let Some(to) = offset(from, dr, dc) else {
            continue;
        };
        if !board.is_empty_at(eye) || !own_side_of_river(to, turn) {
            continue;
        }
        push_step(board, turn, from, to, captures_only, out);
    }
}

fn horse_moves(board: &Board, turn: Player, from: Square, captures_only: bool, out: &mut MoveList) {
    for ((lr, lc), (dr, dc)) in HORSE_JUMPS {
        let Some(leg) = offset(from, lr, lc) else {
            continue;
        };
        let Some(to) = offset(from, dr, dc) else {
            continue;
        };
        if board.is_empty_at(leg) {
            push_step(board, turn, from, to, captures_only, out);
        }
    }
}

fn rook_moves(board: &Board, turn: Player, from: Square, captures_only: bool, out: &mut MoveList) {
    for (dr, dc) in ORTHOGONALS {
        let mut cursor = from;
        while let Some(to) = offset(cursor, dr, dc) {
            let code = board.piece_at(to);
            if code == 0 {
                if !captures_only {
                    let _ = out.try_push(Move::new(from, to));
                }
                cursor = to;
                continue;
            }
            if code.signum() != turn.sign() {
                let _ = out.try_push(Move::new(from, to));
            }
            break;
        }
    }
}

fn cannon_moves(board: &Board, turn: Player, from: Square, captures_only: bool, out: &mut MoveList) {
    for (dr, dc) in ORTHOGONALS {
        let mut cursor = from;
        let mut screened = false;
        while let Some(to) = offset(cursor, dr, dc) {
            let code = board.piece_at(to);
            cursor = to;
            if code == 0 {
                if !screened && !captures_only {
                    let _ = out.try_push(Move::new(from, to));
                }
                continue;
            }
            if !screened {
                // First piece along the ray becomes the screen.
                screened = true;
                continue;
            }
            if code.signum() != turn.sign() {
                let _ = out.try_push(Move::new(from, to));
            }
            break;
        }
    }
}

fn pawn_moves(board: &Board, turn: Player, from: Square, captures_only: bool, out: &mut MoveList) {
    if let Some(to) = offset(from, turn.sign(), 0) {
        push_step(board, turn, from, to, captures_only, out);
    }
    if !own_side_of_river(from, turn) {
        for dc in [-1, 1] {
            if let Some(to) = offset(from, 0, dc) {
                push_step(board, turn, from, to, captures_only, out);
            }
        }
    }
}

fn push_step(
    board: &Board,
    turn: Player,
    from: Square,
    to: Square,
    captures_only: bool,
    out: &mut MoveList,
) {
    let code = board.piece_at(to);
    if code == 0 {
        if !captures_only {
            let _ = out.try_push(Move::new(from, to));
        }
    } else if code.signum() != turn.sign() {
        let _ = out.try_push(Move::new(from, to));
    }
}

fn offset(from: Square, dr: i8, dc: i8) -> Option<Square> {
    let row = from.row as i8 + dr;
    let col = from.col as i8 + dc;
    if (0..RANKS as i8).contains(&row) && (0..FILES as i8).contains(&col) {
        Some(Square::new_unchecked(row as u8, col as u8))
    } else {
        None
    }
}
