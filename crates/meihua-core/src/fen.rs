use crate::board::{Board, FILES, RANKS};
use crate::movegen::in_palace;
use crate::types::{Move, PieceKind, Player, Square};
use thiserror::Error;

pub const STARTING_POSITION: &str =
    "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w";

/// Ranks run from row 9 (Black's back rank) down to row 0, uppercase is
/// Red. The second field is the side to move, `w`/`r` for Red and `b`
/// for Black; extra fields after it are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFen {
    pub board: Board,
    pub turn: Player,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid fen")]
    Invalid,
    #[error("{0}")]
    Validation(String),
    #[error("invalid piece")]
    InvalidPiece,
}

pub fn validate_fen(fen: &str) -> Result<(), FenError> {
    let parts: Vec<&str> = fen.split_whitespace().collect();
    if parts.len() < 2 {
        return Err(FenError::Validation(format!(
            "expected 2 fields, received {}",
            parts.len()
        )));
    }

    let ranks: Vec<&str> = parts[0].split('/').collect();
    if ranks.len() != RANKS {
        return Err(FenError::Validation(format!(
            "1st field (piece placement) is invalid [expected 10 ranks, received {}]",
            ranks.len()
        )));
    }

    for (i, rank) in ranks.iter().enumerate() {
        let mut count = 0usize;
        for ch in rank.chars() {
            if let Some(n) = ch.to_digit(10) {
                count += n as usize;
            } else if PieceKind::from_fen_code(ch.to_ascii_lowercase()).is_some() {
                count += 1;
            } else {
                return Err(FenError::Validation(
                    "1st field (piece placement) is invalid [invalid piece]".to_string(),
                ));
            }
        }
        if count != FILES {
            return Err(FenError::Validation(format!(
                "1st field (piece placement) is invalid [expected 9 files, received {}] in rank: {}",
                count,
                i + 1
            )));
        }
    }

    if !matches!(parts[1], "w" | "r" | "b") {
        return Err(FenError::Validation(format!(
            "2nd field (active player) is invalid [expected 'w' or 'b', received {}]",
            parts[1]
        )));
    }

    Ok(())
}

pub fn parse_fen(fen: &str) -> Result<ParsedFen, FenError> {
    validate_fen(fen)?;
    let parts: Vec<&str> = fen.split_whitespace().collect();

    let mut board = Board::empty();
    for (i, rank_desc) in parts[0].split('/').enumerate() {
        let row = (RANKS - 1 - i) as u8;
        let mut col = 0u8;
        for ch in rank_desc.chars() {
            if let Some(n) = ch.to_digit(10) {
                col += n as u8;
            } else {
                let square = Square::new(row, col).ok_or(FenError::Invalid)?;
                board.set_piece(square, decode_piece(ch)?);
                col += 1;
            }
        }
    }

    for player in [Player::Red, Player::Black] {
        let target = PieceKind::King.signed(player);
        let mut kings = board
            .occupied()
            .filter(|&(_, code)| code == target)
            .map(|(square, _)| square);
        let Some(king) = kings.next() else {
            return Err(FenError::Validation(format!(
                "expected exactly one {} king, found 0",
                side_name(player)
            )));
        };
        if kings.next().is_some() {
            return Err(FenError::Validation(format!(
                "expected exactly one {} king, found several",
                side_name(player)
            )));
        }
        if !in_palace(king, player) {
            return Err(FenError::Validation(format!(
                "{} king outside its palace",
                side_name(player)
            )));
        }
    }

    let turn = if parts[1] == "b" {
        Player::Black
    } else {
        Player::Red
    };

    Ok(ParsedFen { board, turn })
}

pub fn encode_fen(state: &ParsedFen) -> String {
    let mut placement = String::new();
    for row in (0..RANKS).rev() {
        let mut empties = 0u32;
        for col in 0..FILES {
            let code = state.board.piece_at(Square::new_unchecked(row as u8, col as u8));
            if code == 0 {
                empties += 1;
                continue;
            }
            if empties > 0 {
                placement.push(char::from_digit(empties, 10).unwrap_or('1'));
                empties = 0;
            }
            placement.push(encode_piece(code));
        }
        if empties > 0 {
            placement.push(char::from_digit(empties, 10).unwrap_or('1'));
        }
        if row > 0 {
            placement.push('/');
        }
    }

    format!("{placement} {}", state.turn.to_code())
}

pub fn apply_move_to_fen(fen: &str, mv: Move) -> Result<String, FenError> {
    let mut parsed = parse_fen(fen)?;
    if parsed.board.is_empty_at(mv.from) {
        return Err(FenError::Invalid);
    }
    let _ = parsed.board.apply_move(mv);
    parsed.turn = parsed.turn.opponent();
    Ok(encode_fen(&parsed))
}

fn decode_piece(ch: char) -> Result<i8, FenError> {
    let kind = PieceKind::from_fen_code(ch.to_ascii_lowercase()).ok_or(FenError::InvalidPiece)?;
    let player = if ch.is_ascii_uppercase() {
        Player::Red
    } else {
        Player::Black
    };
    Ok(kind.signed(player))
}

fn encode_piece(code: i8) -> char {
    let ch = PieceKind::from_code(code.abs())
        .map(PieceKind::fen_code)
        .unwrap_or('?');
    if code > 0 {
        ch.to_ascii_uppercase()
    } else {
        ch
    }
}

fn side_name(player: Player) -> &'static str {
    match player {
        Player::Red => "red",
        Player::Black => "black",
    }
}
