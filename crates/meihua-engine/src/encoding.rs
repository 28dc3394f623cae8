use meihua_core::board::{Board, FILES, RANKS};

const PLANES_PER_SIDE: usize = 7;

pub const NUM_PLANES: usize = 2 * PLANES_PER_SIDE;
pub const BOARD_AREA: usize = RANKS * FILES;
pub const ENCODING_SIZE: usize = NUM_PLANES * BOARD_AREA;

/// One-hot occupancy tensor for a canonical board: seven planes for the
/// mover's pieces ordered by kind code, then seven for the opponent's.
/// Planes are laid out contiguously, each in row-major square order.
pub fn encode_board(board: &Board) -> Vec<f32> {
    let mut tensor = vec![0.0_f32; ENCODING_SIZE];
    for (square, code) in board.occupied() {
        let kind = usize::from(code.unsigned_abs()) - 1;
        let plane = if code > 0 {
            kind
        } else {
            PLANES_PER_SIDE + kind
        };
        tensor[plane * BOARD_AREA + square.index()] = 1.0;
    }
    tensor
}

#[cfg(test)]
mod tests {
    use meihua_core::types::Player;

    use super::*;

    #[test]
    fn tensor_shape_is_fixed() {
        assert_eq!(ENCODING_SIZE, 1260);
        assert_eq!(encode_board(&Board::starting()).len(), ENCODING_SIZE);
    }

    #[test]
    fn starting_board_sets_one_cell_per_piece() {
        let tensor = encode_board(&Board::starting());
        let ones = tensor.iter().filter(|&&v| v == 1.0).count();
        assert_eq!(ones, 32);
        assert!(tensor.iter().all(|&v| v == 0.0 || v == 1.0));
    }

    #[test]
    fn kings_land_on_their_side_planes() {
        let tensor = encode_board(&Board::starting());
        // Red king on (0,4) in plane 0, black king on (9,4) in plane 7.
        assert_eq!(tensor[4], 1.0);
        assert_eq!(tensor[7 * BOARD_AREA + 9 * FILES + 4], 1.0);
    }

    #[test]
    fn symmetric_start_encodes_the_same_for_both_movers() {
        let board = Board::starting();
        let red = encode_board(&board.canonical(Player::Red));
        let black = encode_board(&board.canonical(Player::Black));
        assert_eq!(red, black);
    }
}
