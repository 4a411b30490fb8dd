//! Board square representation.
//!
//! The board is 11 files (a-k) by 12 ranks (1-12). Squares are stored in a
//! padded 16x16 index space so that stepping off any edge lands on an index
//! that is cheap to reject.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of files on the board.
pub const FILE_COUNT: u8 = 11;
/// Number of ranks on the board.
pub const RANK_COUNT: u8 = 12;

/// A file (column) on the board, from A to K.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
    I = 8,
    J = 9,
    K = 10,
}

impl File {
    /// All files in order.
    pub const ALL: [File; 11] = [
        File::A,
        File::B,
        File::C,
        File::D,
        File::E,
        File::F,
        File::G,
        File::H,
        File::I,
        File::J,
        File::K,
    ];

    /// Creates a file from index (0-10).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < FILE_COUNT {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Creates a file from a character ('a'-'k' or 'A'-'K').
    #[inline]
    pub const fn from_char(c: char) -> Option<Self> {
        let lower = c.to_ascii_lowercase();
        if lower >= 'a' && lower <= 'k' {
            Self::from_index(lower as u8 - b'a')
        } else {
            None
        }
    }

    /// Returns the index (0-10).
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Returns the character representation.
    #[inline]
    pub const fn to_char(self) -> char {
        (b'a' + self as u8) as char
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A rank (row) on the board, from 1 to 12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Rank {
    R1 = 0,
    R2 = 1,
    R3 = 2,
    R4 = 3,
    R5 = 4,
    R6 = 5,
    R7 = 6,
    R8 = 7,
    R9 = 8,
    R10 = 9,
    R11 = 10,
    R12 = 11,
}

impl Rank {
    /// All ranks in order.
    pub const ALL: [Rank; 12] = [
        Rank::R1,
        Rank::R2,
        Rank::R3,
        Rank::R4,
        Rank::R5,
        Rank::R6,
        Rank::R7,
        Rank::R8,
        Rank::R9,
        Rank::R10,
        Rank::R11,
        Rank::R12,
    ];

    /// Creates a rank from index (0-11).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < RANK_COUNT {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Parses a rank number ("1" to "12").
    pub fn from_str_number(s: &str) -> Option<Self> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let n: u8 = s.parse().ok()?;
        if n == 0 {
            return None;
        }
        Self::from_index(n - 1)
    }

    /// Returns the index (0-11).
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Returns the human rank number (1-12).
    #[inline]
    pub const fn number(self) -> u8 {
        self as u8 + 1
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// A step between neighbouring squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Direction {
    file: i8,
    rank: i8,
}

impl Direction {
    pub const NORTH: Direction = Direction { file: 0, rank: 1 };
    pub const SOUTH: Direction = Direction { file: 0, rank: -1 };
    pub const EAST: Direction = Direction { file: 1, rank: 0 };
    pub const WEST: Direction = Direction { file: -1, rank: 0 };
    pub const NORTH_EAST: Direction = Direction { file: 1, rank: 1 };
    pub const NORTH_WEST: Direction = Direction { file: -1, rank: 1 };
    pub const SOUTH_EAST: Direction = Direction { file: 1, rank: -1 };
    pub const SOUTH_WEST: Direction = Direction { file: -1, rank: -1 };

    /// The four orthogonal directions.
    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::NORTH,
        Direction::SOUTH,
        Direction::EAST,
        Direction::WEST,
    ];

    /// The four diagonal directions.
    pub const DIAGONAL: [Direction; 4] = [
        Direction::NORTH_EAST,
        Direction::NORTH_WEST,
        Direction::SOUTH_EAST,
        Direction::SOUTH_WEST,
    ];

    /// All eight directions, orthogonal first.
    pub const ALL: [Direction; 8] = [
        Direction::NORTH,
        Direction::SOUTH,
        Direction::EAST,
        Direction::WEST,
        Direction::NORTH_EAST,
        Direction::NORTH_WEST,
        Direction::SOUTH_EAST,
        Direction::SOUTH_WEST,
    ];

    /// Offset in the padded index space.
    #[inline]
    pub const fn delta(self) -> i16 {
        self.rank as i16 * 16 + self.file as i16
    }

    #[inline]
    pub const fn is_diagonal(self) -> bool {
        self.file != 0 && self.rank != 0
    }

    /// Returns the direction leading from `from` to `to` if the two squares
    /// share a file, a rank, or a diagonal.
    pub fn between(from: Square, to: Square) -> Option<Direction> {
        if from == to {
            return None;
        }
        let df = to.file_index() as i8 - from.file_index() as i8;
        let dr = to.rank_index() as i8 - from.rank_index() as i8;
        if df != 0 && dr != 0 && df.abs() != dr.abs() {
            return None;
        }
        Some(Direction {
            file: df.signum(),
            rank: dr.signum(),
        })
    }
}

/// Error returned when a square name cannot be parsed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid square: {0}")]
pub struct ParseSquareError(pub String);

/// A square on the board.
///
/// The index is `rank * 16 + file`, leaving files 11-15 and ranks 12-15 of
/// the padded space unused.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Square(u8);

impl Square {
    /// Size of the padded index space.
    pub const PADDED_SIZE: usize = 256;

    /// Creates a square from file and rank.
    #[inline]
    pub const fn new(file: File, rank: Rank) -> Self {
        Square(rank.index() * 16 + file.index())
    }

    /// Creates a square from zero-based file and rank indices.
    #[inline]
    pub const fn from_coords(file: u8, rank: u8) -> Option<Self> {
        if file < FILE_COUNT && rank < RANK_COUNT {
            Some(Square(rank * 16 + file))
        } else {
            None
        }
    }

    /// Creates a square from a padded index, rejecting padding cells.
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        Self::from_coords(index & 0x0F, index >> 4)
    }

    /// Parses a square from algebraic notation (e.g., "e4", "k12").
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let file = File::from_char(chars.next()?)?;
        let rank = Rank::from_str_number(chars.as_str())?;
        Some(Square::new(file, rank))
    }

    /// Returns the padded index.
    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Returns the zero-based file index.
    #[inline]
    pub const fn file_index(self) -> u8 {
        self.0 & 0x0F
    }

    /// Returns the zero-based rank index.
    #[inline]
    pub const fn rank_index(self) -> u8 {
        self.0 >> 4
    }

    /// Returns the file of this square.
    #[inline]
    pub const fn file(self) -> File {
        File::ALL[self.file_index() as usize]
    }

    /// Returns the rank of this square.
    #[inline]
    pub const fn rank(self) -> Rank {
        Rank::ALL[self.rank_index() as usize]
    }

    /// Steps one square in `direction`, returning `None` off the board.
    #[inline]
    pub const fn offset(self, direction: Direction) -> Option<Square> {
        let index = self.0 as i16 + direction.delta();
        if index < 0 || index >= Self::PADDED_SIZE as i16 {
            return None;
        }
        Self::from_index(index as u8)
    }

    /// Absolute file and rank distances to `other`.
    #[inline]
    pub const fn distance(self, other: Square) -> (u8, u8) {
        (
            self.file_index().abs_diff(other.file_index()),
            self.rank_index().abs_diff(other.rank_index()),
        )
    }

    /// Iterates over all 132 board squares, rank 1 first.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..RANK_COUNT).flat_map(|rank| (0..FILE_COUNT).map(move |file| Square(rank * 16 + file)))
    }

    /// Returns the algebraic notation for this square.
    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.file(), self.rank())
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self.to_algebraic())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

impl From<Square> for String {
    fn from(square: Square) -> Self {
        square.to_algebraic()
    }
}

impl TryFrom<String> for Square {
    type Error = ParseSquareError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Square::from_algebraic(&value).ok_or(ParseSquareError(value))
    }
}

impl std::str::FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_algebraic(s).ok_or_else(|| ParseSquareError(s.to_string()))
    }
}
