use meihua_core::{
    board::Board,
    eval::Evaluator,
    types::{PieceKind, Score, Square},
};

/// Material values indexed by piece code. The king dwarfs everything
/// else so any line that wins it dominates the sum.
const PIECE_VALUES: [i32; 8] = [
    0,     // empty
    10000, // King
    20,    // Advisor
    20,    // Elephant
    45,    // Horse
    90,    // Rook
    50,    // Cannon
    10,    // Pawn
];

/// Piece-square tables, Red perspective: row 0 is Red's back rank.
/// Black reads the same tables through a vertical mirror.
///
/// Pawns gain nothing before the river and the most while pressing the
/// enemy palace.
const PAWN_PST: [[i32; 9]; 10] = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 2, 0, 2, 0, 2, 0, 2, 0],
    [10, 20, 20, 20, 20, 20, 20, 20, 10],
    [20, 30, 40, 50, 60, 50, 40, 30, 20],
    [20, 30, 40, 50, 60, 50, 40, 30, 20],
    [10, 20, 30, 30, 30, 30, 30, 20, 10],
    [0, 10, 20, 20, 20, 20, 20, 10, 0],
];

/// Rooks want open river ranks and the files in front of the palace.
const ROOK_PST: [[i32; 9]; 10] = [
    [-5, 0, 0, 0, 0, 0, 0, 0, -5],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [5, 5, 5, 5, 5, 5, 5, 5, 5],
    [5, 5, 5, 5, 5, 5, 5, 5, 5],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 5, 5, 5, 0, 0, 0],
    [-5, 0, 0, 5, 5, 5, 0, 0, -5],
];

/// Horses are strongest in the center, weakest on rims where legs are
/// easily blocked.
const HORSE_PST: [[i32; 9]; 10] = [
    [-5, -5, -5, -5, -5, -5, -5, -5, -5],
    [-5, 0, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 5, 5, 5, 5, 5, 0, -5],
    [-5, 5, 10, 15, 15, 15, 10, 5, -5],
    [-5, 5, 10, 15, 15, 15, 10, 5, -5],
    [-5, 5, 12, 18, 18, 18, 12, 5, -5],
    [-5, 5, 10, 15, 15, 15, 10, 5, -5],
    [-5, 5, 5, 8, 8, 8, 5, 5, -5],
    [-5, 0, 3, 5, 5, 5, 3, 0, -5],
    [-5, -5, -5, -5, -5, -5, -5, -5, -5],
];

/// Cannons like their home mounts and the middle files.
const CANNON_PST: [[i32; 9]; 10] = [
    [0, 0, 1, 3, 3, 3, 1, 0, 0],
    [0, 1, 1, 2, 2, 2, 1, 1, 0],
    [3, 3, 5, 5, 8, 5, 5, 3, 3],
    [0, 1, 2, 3, 5, 3, 2, 1, 0],
    [0, 1, 5, 5, 5, 5, 5, 1, 0],
    [0, 1, 5, 5, 5, 5, 5, 1, 0],
    [0, 1, 2, 3, 3, 3, 2, 1, 0],
    [1, 1, 1, 1, 1, 1, 1, 1, 1],
    [2, 2, 2, 2, 2, 2, 2, 2, 2],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
];

/// Elephants never cross the river; only their defensive posts score.
const ELEPHANT_PST: [[i32; 9]; 10] = [
    [0, 0, 1, 0, 0, 0, 1, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 3, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 1, 0, 0, 0, 1, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
];

const ADVISOR_PST: [[i32; 9]; 10] = [
    [0, 0, 0, 1, 3, 1, 0, 0, 0],
    [0, 0, 0, 0, 3, 0, 0, 0, 0],
    [0, 0, 0, 1, 3, 1, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
];

const KING_PST: [[i32; 9]; 10] = [
    [0, 0, 0, 1, 1, 1, 0, 0, 0],
    [0, 0, 0, 2, 5, 2, 0, 0, 0],
    [0, 0, 0, 1, 1, 1, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
];

/// Two cannons covering one line, and a cannon trained down the king
/// file, are standard attacking formations.
const CANNON_PAIR_BONUS: i32 = 25;
const CANNON_CENTRAL_FILE_BONUS: i32 = 40;
const CENTRAL_FILE: u8 = 4;

#[derive(Debug, Clone, Copy)]
pub struct ClassicalEval;

impl ClassicalEval {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ClassicalEval {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator for ClassicalEval {
    fn evaluate(&self, board: &Board) -> Score {
        let mut score: i32 = 0;
        let mut red_cannons: Vec<Square> = Vec::with_capacity(2);
        let mut black_cannons: Vec<Square> = Vec::with_capacity(2);

        for (square, code) in board.occupied() {
            let Some(kind) = PieceKind::from_code(code.abs()) else {
                continue;
            };
            let base = piece_value(kind);
            let table = pst(kind);

            if code > 0 {
                score += base + table[square.row as usize][square.col as usize];
                if kind == PieceKind::Cannon {
                    red_cannons.push(square);
                }
            } else {
                score -= base + table[square.mirrored().row as usize][square.col as usize];
                if kind == PieceKind::Cannon {
                    black_cannons.push(square);
                }
            }
        }

        score += cannon_patterns(&red_cannons);
        score -= cannon_patterns(&black_cannons);

        Score(score)
    }
}

#[inline]
fn piece_value(kind: PieceKind) -> i32 {
    PIECE_VALUES[kind.code() as usize]
}

fn pst(kind: PieceKind) -> &'static [[i32; 9]; 10] {
    match kind {
        PieceKind::King => &KING_PST,
        PieceKind::Advisor => &ADVISOR_PST,
        PieceKind::Elephant => &ELEPHANT_PST,
        PieceKind::Horse => &HORSE_PST,
        PieceKind::Rook => &ROOK_PST,
        PieceKind::Cannon => &CANNON_PST,
        PieceKind::Pawn => &PAWN_PST,
    }
}

fn cannon_patterns(cannons: &[Square]) -> i32 {
    let mut bonus = 0i32;
    for (i, a) in cannons.iter().enumerate() {
        for b in &cannons[i + 1..] {
            if a.row == b.row || a.col == b.col {
                bonus += CANNON_PAIR_BONUS;
            }
        }
    }
    for cannon in cannons {
        if cannon.col == CENTRAL_FILE {
            bonus += CANNON_CENTRAL_FILE_BONUS;
        }
    }
    bonus
}
