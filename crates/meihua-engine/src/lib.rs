pub mod classical;
pub mod encoding;
pub mod mcts;
pub mod minimax;

pub use classical::ClassicalEval;
pub use encoding::{encode_board, BOARD_AREA, ENCODING_SIZE, NUM_PLANES};
pub use mcts::{MctsConfig, MctsSearcher};
pub use minimax::{MinimaxConfig, MinimaxResult, MinimaxSearcher};
