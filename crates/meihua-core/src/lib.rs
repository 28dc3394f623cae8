pub mod board;
pub mod eval;
pub mod fen;
pub mod game;
pub mod legality;
pub mod movegen;
pub mod search;
pub mod types;

pub use board::{Board, Signature, FILES, RANKS};
pub use eval::{Evaluator, Oracle, UniformOracle};
pub use fen::{
    apply_move_to_fen, encode_fen, parse_fen, validate_fen, FenError, ParsedFen, STARTING_POSITION,
};
pub use game::{Game, GameError, HistoryEntry};
pub use legality::{in_check, is_legal, kings_facing, legal_captures, legal_moves, outcome};
pub use movegen::{in_palace, own_side_of_river, pseudo_legal_captures, pseudo_legal_moves};
pub use search::{AbortSearch, SearchControl, SearchLimits, SearchResult, Searcher};
pub use types::{Move, MoveList, Outcome, PieceKind, Player, Score, Square, ACTION_SPACE};
