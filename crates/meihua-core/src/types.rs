use std::fmt;

use arrayvec::ArrayVec;

/// Flattened move space: 90 origin squares x 90 destination squares.
pub const ACTION_SPACE: usize = 8100;

#[repr(i8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    Red = 1,
    Black = -1,
}

impl Player {
    pub const fn sign(self) -> i8 {
        self as i8
    }

    pub const fn opponent(self) -> Self {
        match self {
            Self::Red => Self::Black,
            Self::Black => Self::Red,
        }
    }

    pub const fn from_sign(sign: i8) -> Option<Self> {
        match sign {
            1 => Some(Self::Red),
            -1 => Some(Self::Black),
            _ => None,
        }
    }

    pub const fn to_code(self) -> char {
        match self {
            Self::Red => 'w',
            Self::Black => 'b',
        }
    }

    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'w' | 'r' => Some(Self::Red),
            'b' => Some(Self::Black),
            _ => None,
        }
    }
}

#[repr(i8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    King = 1,
    Advisor = 2,
    Elephant = 3,
    Horse = 4,
    Rook = 5,
    Cannon = 6,
    Pawn = 7,
}

impl PieceKind {
    pub const ALL: [Self; 7] = [
        Self::King,
        Self::Advisor,
        Self::Elephant,
        Self::Horse,
        Self::Rook,
        Self::Cannon,
        Self::Pawn,
    ];

    pub const fn code(self) -> i8 {
        self as i8
    }

    /// Kind from an unsigned magnitude 1..=7.
    pub const fn from_code(code: i8) -> Option<Self> {
        match code {
            1 => Some(Self::King),
            2 => Some(Self::Advisor),
            3 => Some(Self::Elephant),
            4 => Some(Self::Horse),
            5 => Some(Self::Rook),
            6 => Some(Self::Cannon),
            7 => Some(Self::Pawn),
            _ => None,
        }
    }

    /// Signed cell value for this kind owned by `player`.
    pub const fn signed(self, player: Player) -> i8 {
        self.code() * player.sign()
    }

    pub const fn fen_code(self) -> char {
        match self {
            Self::King => 'k',
            Self::Advisor => 'a',
            Self::Elephant => 'b',
            Self::Horse => 'n',
            Self::Rook => 'r',
            Self::Cannon => 'c',
            Self::Pawn => 'p',
        }
    }

    pub const fn from_fen_code(code: char) -> Option<Self> {
        match code {
            'k' => Some(Self::King),
            'a' => Some(Self::Advisor),
            'b' | 'e' => Some(Self::Elephant),
            'n' | 'h' => Some(Self::Horse),
            'r' => Some(Self::Rook),
            'c' => Some(Self::Cannon),
            'p' => Some(Self::Pawn),
            _ => None,
        }
    }
}

/// Grid coordinate: `row` 0..=9 (row 0 is Red's back rank), `col` 0..=8.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    pub row: u8,
    pub col: u8,
}

impl Square {
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row <= 9 && col <= 8 {
            Some(Self { row, col })
        } else {
            None
        }
    }

    pub const fn new_unchecked(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Row-major flat index in 0..90.
    pub const fn index(self) -> usize {
        self.row as usize * 9 + self.col as usize
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        if index < 90 {
            Some(Self {
                row: (index / 9) as u8,
                col: (index % 9) as u8,
            })
        } else {
            None
        }
    }

    /// The same square seen from the opposite edge (row 0 <-> row 9).
    pub const fn mirrored(self) -> Self {
        Self {
            row: 9 - self.row,
            col: self.col,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }

    /// Encodes into the flat action space:
    /// `(from.row*9 + from.col) * 90 + (to.row*9 + to.col)`.
    pub const fn action_index(self) -> u16 {
        (self.from.index() * 90 + self.to.index()) as u16
    }

    /// Inverse of [`Move::action_index`]. Out-of-range indices are a caller
    /// bug, not recoverable input.
    pub fn from_action_index(action: u16) -> Self {
        assert!(
            (action as usize) < ACTION_SPACE,
            "action index {action} outside action space"
        );
        let from = usize::from(action) / 90;
        let to = usize::from(action) % 90;
        Self {
            from: Square::new_unchecked((from / 9) as u8, (from % 9) as u8),
            to: Square::new_unchecked((to / 9) as u8, (to % 9) as u8),
        }
    }

    /// Both endpoints mirrored; maps a canonical-frame move back into
    /// absolute coordinates for Black (and vice versa).
    pub const fn mirrored(self) -> Self {
        Self {
            from: self.from.mirrored(),
            to: self.to.mirrored(),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{})->({},{})",
            self.from.row, self.from.col, self.to.row, self.to.col
        )
    }
}

/// Terminal verdict for the side to move. Xiangqi scores a stalemated side
/// as lost, so there is no draw variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Win,
    Loss,
}

impl Outcome {
    pub const fn value(self) -> i32 {
        match self {
            Self::Win => 1,
            Self::Loss => -1,
        }
    }
}

#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Score(pub i32);

pub type MoveList = ArrayVec<Move, 128>;
