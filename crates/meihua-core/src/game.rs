use thiserror::Error;

use crate::board::Board;
use crate::fen::{encode_fen, parse_fen, FenError, ParsedFen};
use crate::legality::{in_check, is_legal, legal_moves, outcome};
use crate::types::{Move, MoveList, Outcome, Player};

/// One committed ply with enough state to take it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry {
    pub mv: Move,
    pub captured: i8,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("illegal move {0}")]
    IllegalMove(Move),
    #[error("game is already over")]
    GameOver,
    #[error("no moves to take back")]
    EmptyHistory,
    #[error(transparent)]
    Fen(#[from] FenError),
}

/// A playable game: board, side to move, and an undo history. Search
/// code works on [`Board`] directly; this facade is for drivers that
/// need rule enforcement.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    turn: Player,
    history: Vec<HistoryEntry>,
}

impl Game {
    pub fn new() -> Self {
        Self {
            board: Board::starting(),
            turn: Player::Red,
            history: Vec::new(),
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, GameError> {
        let ParsedFen { board, turn } = parse_fen(fen)?;
        Ok(Self {
            board,
            turn,
            history: Vec::new(),
        })
    }

    pub fn load(&mut self, fen: &str) -> Result<(), GameError> {
        *self = Self::from_fen(fen)?;
        Ok(())
    }

    pub fn fen(&self) -> String {
        encode_fen(&ParsedFen {
            board: self.board.clone(),
            turn: self.turn,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Player {
        self.turn
    }

    pub fn moves(&self) -> MoveList {
        if self.is_over() {
            MoveList::new()
        } else {
            legal_moves(&self.board, self.turn)
        }
    }

    pub fn play(&mut self, mv: Move) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        if !is_legal(&self.board, self.turn, mv) {
            return Err(GameError::IllegalMove(mv));
        }
        let captured = self.board.apply_move(mv);
        self.history.push(HistoryEntry { mv, captured });
        self.turn = self.turn.opponent();
        Ok(())
    }

    pub fn undo(&mut self) -> Result<(), GameError> {
        let entry = self.history.pop().ok_or(GameError::EmptyHistory)?;
        self.board.undo_move(entry.mv, entry.captured);
        self.turn = self.turn.opponent();
        Ok(())
    }

    pub fn in_check(&self) -> bool {
        in_check(&self.board, self.turn)
    }

    /// Verdict for the side to move, `None` while the game is live.
    pub fn outcome(&self) -> Option<Outcome> {
        outcome(&self.board, self.turn)
    }

    pub fn is_over(&self) -> bool {
        self.outcome().is_some()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn move_number(&self) -> u32 {
        (self.history.len() / 2) as u32 + 1
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
