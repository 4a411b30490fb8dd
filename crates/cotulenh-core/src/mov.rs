//! Move representation.

use crate::{Color, Piece, Square};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bitset describing what kind of move this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MoveFlags(u8);

impl MoveFlags {
    pub const NONE: MoveFlags = MoveFlags(0);
    /// The mover replaces the captured piece on the target square.
    pub const CAPTURE: MoveFlags = MoveFlags(0b0_0001);
    /// The target is removed and the mover stays on its origin.
    pub const STAY_CAPTURE: MoveFlags = MoveFlags(0b0_0010);
    /// The target is removed together with the mover.
    pub const SUICIDE_CAPTURE: MoveFlags = MoveFlags(0b0_0100);
    /// The mover joins a friendly piece on the target square.
    pub const COMBINATION: MoveFlags = MoveFlags(0b0_1000);
    /// Part of a stack moves out while the rest stays.
    pub const DEPLOY: MoveFlags = MoveFlags(0b1_0000);

    const CAPTURES: u8 = 0b0_0111;

    /// Creates flags from raw bits.
    #[inline]
    pub const fn new(bits: u8) -> Self {
        MoveFlags(bits & 0b1_1111)
    }

    /// Returns true if every bit of `other` is set.
    #[inline]
    pub const fn contains(self, other: MoveFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns these flags with `other` added.
    #[inline]
    pub const fn with(self, other: MoveFlags) -> Self {
        MoveFlags(self.0 | other.0)
    }

    /// True for any of the three capture shapes.
    #[inline]
    pub const fn is_capture(self) -> bool {
        self.0 & Self::CAPTURES != 0
    }

    #[inline]
    pub const fn is_deploy(self) -> bool {
        self.contains(Self::DEPLOY)
    }

    /// Returns the raw flags.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

/// A move of one piece, or of part of a stack.
///
/// `piece` is what travels: the whole stack for an ordinary move, a single
/// unit or sub-stack for a deploy step. `captured` is filled for every
/// capture shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    color: Color,
    from: Square,
    to: Square,
    piece: Piece,
    captured: Option<Piece>,
    flags: MoveFlags,
}

impl Move {
    #[inline]
    pub const fn new(
        color: Color,
        from: Square,
        to: Square,
        piece: Piece,
        captured: Option<Piece>,
        flags: MoveFlags,
    ) -> Self {
        Move {
            color,
            from,
            to,
            piece,
            captured,
            flags,
        }
    }

    /// Returns the same move with a different travelling piece.
    #[inline]
    pub const fn with_piece(self, piece: Piece) -> Self {
        Move { piece, ..self }
    }

    #[inline]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Returns the source square.
    #[inline]
    pub const fn from(&self) -> Square {
        self.from
    }

    /// Returns the destination square.
    #[inline]
    pub const fn to(&self) -> Square {
        self.to
    }

    #[inline]
    pub const fn piece(&self) -> Piece {
        self.piece
    }

    #[inline]
    pub const fn captured(&self) -> Option<Piece> {
        self.captured
    }

    #[inline]
    pub const fn flags(&self) -> MoveFlags {
        self.flags
    }

    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.flags.is_capture()
    }

    #[inline]
    pub const fn is_deploy(&self) -> bool {
        self.flags.is_deploy()
    }

    #[inline]
    pub const fn is_stay_capture(&self) -> bool {
        self.flags.contains(MoveFlags::STAY_CAPTURE)
    }

    #[inline]
    pub const fn is_suicide_capture(&self) -> bool {
        self.flags.contains(MoveFlags::SUICIDE_CAPTURE)
    }

    #[inline]
    pub const fn is_combination(&self) -> bool {
        self.flags.contains(MoveFlags::COMBINATION)
    }

    /// True if the travelling piece ends up on the destination square.
    #[inline]
    pub const fn lands(&self) -> bool {
        !self.is_stay_capture() && !self.is_suicide_capture()
    }

    fn separator(&self) -> char {
        if self.is_stay_capture() {
            '_'
        } else if self.is_suicide_capture() {
            '@'
        } else if self.flags.contains(MoveFlags::CAPTURE) {
            'x'
        } else if self.is_combination() {
            '&'
        } else {
            '-'
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_deploy() {
            write!(f, ">")?;
        }
        write!(
            f,
            "{}{}{}{}",
            self.piece,
            self.from,
            self.separator(),
            self.to
        )
    }
}
