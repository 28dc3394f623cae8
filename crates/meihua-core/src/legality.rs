use crate::board::Board;
use crate::movegen::{pseudo_legal_captures, pseudo_legal_moves};
use crate::types::{Move, MoveList, Outcome, Player, Square};

/// Whether `player`'s king is attacked. A board missing that king also
/// reports check, matching the terminal convention in [`outcome`].
pub fn in_check(board: &Board, player: Player) -> bool {
    let Some(king) = board.king_square(player) else {
        return true;
    };
    pseudo_legal_captures(board, player.opponent())
        .iter()
        .any(|mv| mv.to == king)
}

/// Whether the two kings stand on the same file with nothing between
/// them. Such a position is never allowed to arise.
pub fn kings_facing(board: &Board) -> bool {
    let (Some(red), Some(black)) = (
        board.king_square(Player::Red),
        board.king_square(Player::Black),
    ) else {
        return false;
    };
    if red.col != black.col {
        return false;
    }
    let (lo, hi) = if red.row < black.row {
        (red.row, black.row)
    } else {
        (black.row, red.row)
    };
    ((lo + 1)..hi).all(|row| board.is_empty_at(Square::new_unchecked(row, red.col)))
}

/// Pseudo-legal moves narrowed to the ones that leave the mover's king
/// safe and the kings apart.
pub fn legal_moves(board: &Board, turn: Player) -> MoveList {
    filter_legal(board, turn, pseudo_legal_moves(board, turn))
}

/// The capture subset of [`legal_moves`].
pub fn legal_captures(board: &Board, turn: Player) -> MoveList {
    filter_legal(board, turn, pseudo_legal_captures(board, turn))
}

pub fn is_legal(board: &Board, turn: Player, mv: Move) -> bool {
    legal_moves(board, turn).contains(&mv)
}

/// Terminal test from the viewpoint of the side to move: a missing king
/// decides immediately, otherwise zero legal moves loses (checkmate and
/// stalemate alike). `None` while the game is live.
pub fn outcome(board: &Board, to_move: Player) -> Option<Outcome> {
    if board.king_square(to_move).is_none() {
        return Some(Outcome::Loss);
    }
    if board.king_square(to_move.opponent()).is_none() {
        return Some(Outcome::Win);
    }
    if legal_moves(board, to_move).is_empty() {
        return Some(Outcome::Loss);
    }
    None
}

fn filter_legal(board: &Board, turn: Player, candidates: MoveList) -> MoveList {
    let mut probe = board.clone();
    let mut legal = MoveList::new();
    for mv in candidates {
        let captured = probe.apply_move(mv);
        if !in_check(&probe, turn) && !kings_facing(&probe) {
            let _ = legal.try_push(mv);
        }
        probe.undo_move(mv, captured);
    }
    legal
}
