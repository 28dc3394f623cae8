use std::fmt;

use crate::types::{Move, PieceKind, Player, Square};

pub const RANKS: usize = 10;
pub const FILES: usize = 9;

/// Content-addressed serialization of a board: the 90 cells in row-major
/// order, one byte each. Equal boards always produce equal signatures, so
/// this keys the MCTS statistics maps.
pub type Signature = [u8; RANKS * FILES];

/// Row 0 is Red's back rank, row 9 Black's. See [`PieceKind`] for the
/// magnitude encoding; sign is the owning side.
const STARTING_CELLS: [[i8; FILES]; RANKS] = [
    [5, 4, 3, 2, 1, 2, 3, 4, 5],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 6, 0, 0, 0, 0, 0, 6, 0],
    [7, 0, 7, 0, 7, 0, 7, 0, 7],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [-7, 0, -7, 0, -7, 0, -7, 0, -7],
    [0, -6, 0, 0, 0, 0, 0, -6, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [-5, -4, -3, -2, -1, -2, -3, -4, -5],
];

/// A 10x9 grid of signed piece codes. Value-like: searches clone it or
/// mutate through exact [`Board::apply_move`]/[`Board::undo_move`] pairs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[i8; FILES]; RANKS],
}

impl Board {
    pub const fn empty() -> Self {
        Self {
            cells: [[0; FILES]; RANKS],
        }
    }

    pub const fn starting() -> Self {
        Self {
            cells: STARTING_CELLS,
        }
    }

    pub const fn piece_at(&self, square: Square) -> i8 {
        self.cells[square.row as usize][square.col as usize]
    }

    pub fn set_piece(&mut self, square: Square, code: i8) {
        debug_assert!(code.unsigned_abs() <= 7, "invalid piece code {code}");
        self.cells[square.row as usize][square.col as usize] = code;
    }

    pub const fn is_empty_at(&self, square: Square) -> bool {
        self.piece_at(square) == 0
    }

    pub fn side_at(&self, square: Square) -> Option<Player> {
        Player::from_sign(self.piece_at(square).signum())
    }

    pub fn kind_at(&self, square: Square) -> Option<PieceKind> {
        PieceKind::from_code(self.piece_at(square).abs())
    }

    /// Moves the piece on `mv.from` to `mv.to`, returning whatever occupied
    /// the destination. The source must hold a piece.
    pub fn apply_move(&mut self, mv: Move) -> i8 {
        let piece = self.piece_at(mv.from);
        debug_assert!(piece != 0, "apply_move from an empty square");
        let captured = self.piece_at(mv.to);
        self.set_piece(mv.to, piece);
        self.set_piece(mv.from, 0);
        captured
    }

    /// Exact inverse of [`Board::apply_move`] given its return value.
    pub fn undo_move(&mut self, mv: Move, captured: i8) {
        let piece = self.piece_at(mv.to);
        self.set_piece(mv.from, piece);
        self.set_piece(mv.to, captured);
    }

    /// The board as seen by `to_move`: identity for Red, vertical mirror
    /// plus sign negation for Black, so the mover's pieces are always
    /// positive with their back rank at row 0.
    pub fn canonical(&self, to_move: Player) -> Board {
        match to_move {
            Player::Red => self.clone(),
            Player::Black => self.mirrored_negated(),
        }
    }

    /// Inverse of [`Board::canonical`] (the transform is an involution).
    pub fn decanonical(&self, to_move: Player) -> Board {
        self.canonical(to_move)
    }

    fn mirrored_negated(&self) -> Board {
        let mut cells = [[0; FILES]; RANKS];
        for (row, rank) in self.cells.iter().enumerate() {
            for (col, &code) in rank.iter().enumerate() {
                cells[RANKS - 1 - row][col] = -code;
            }
        }
        Board { cells }
    }

    pub fn signature(&self) -> Signature {
        let mut bytes = [0u8; RANKS * FILES];
        for (row, rank) in self.cells.iter().enumerate() {
            for (col, &code) in rank.iter().enumerate() {
                bytes[row * FILES + col] = code as u8;
            }
        }
        bytes
    }

    pub fn king_square(&self, player: Player) -> Option<Square> {
        let target = PieceKind::King.signed(player);
        self.occupied().find_map(|(square, code)| {
            if code == target {
                Some(square)
            } else {
                None
            }
        })
    }

    /// All non-empty squares with their signed codes, row-major.
    pub fn occupied(&self) -> impl Iterator<Item = (Square, i8)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, rank)| {
            rank.iter().enumerate().filter_map(move |(col, &code)| {
                if code == 0 {
                    None
                } else {
                    Some((Square::new_unchecked(row as u8, col as u8), code))
                }
            })
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, rank) in self.cells.iter().enumerate().rev() {
            write!(f, "{row} ")?;
            for &code in rank {
                let ch = match PieceKind::from_code(code.abs()) {
                    Some(kind) if code > 0 => kind.fen_code().to_ascii_uppercase(),
                    Some(kind) => kind.fen_code(),
                    None => '.',
                };
                write!(f, " {ch}")?;
            }
            writeln!(f)?;
        }
        write!(f, "   0 1 2 3 4 5 6 7 8")
    }
}
