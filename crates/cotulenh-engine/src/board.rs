//! Board occupancy and the commander index.
//!
//! The board is a mailbox over the padded 16x16 square space. Besides the
//! pieces it keeps each color's commander square and a dirty flag that tells
//! [`Position`](crate::Position) when the air-defense zones must be rebuilt.

use crate::rules::PieceRules;
use crate::GameError;
use cotulenh_core::{Color, File, Piece, PieceKind, Rank, Square, Unit};
use std::fmt;

/// Piece placement on the 11x12 board.
#[derive(Clone)]
pub struct Board {
    squares: [Option<Piece>; Square::PADDED_SIZE],
    commanders: [Option<Square>; 2],
    defense_dirty: bool,
}

impl Board {
    /// Creates an empty board.
    pub fn empty() -> Self {
        Board {
            squares: [None; Square::PADDED_SIZE],
            commanders: [None; 2],
            defense_dirty: true,
        }
    }

    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        const RED_SETUP: [(File, Rank, PieceKind); 19] = [
            (File::G, Rank::R1, PieceKind::Commander),
            (File::B, Rank::R2, PieceKind::Navy),
            (File::E, Rank::R2, PieceKind::AirForce),
            (File::F, Rank::R2, PieceKind::Headquarter),
            (File::H, Rank::R2, PieceKind::Headquarter),
            (File::I, Rank::R2, PieceKind::AirForce),
            (File::D, Rank::R3, PieceKind::Artillery),
            (File::G, Rank::R3, PieceKind::Missile),
            (File::J, Rank::R3, PieceKind::Artillery),
            (File::C, Rank::R4, PieceKind::Navy),
            (File::E, Rank::R4, PieceKind::AntiAir),
            (File::F, Rank::R4, PieceKind::Tank),
            (File::H, Rank::R4, PieceKind::Tank),
            (File::I, Rank::R4, PieceKind::AntiAir),
            (File::C, Rank::R5, PieceKind::Infantry),
            (File::D, Rank::R5, PieceKind::Engineer),
            (File::G, Rank::R5, PieceKind::Militia),
            (File::J, Rank::R5, PieceKind::Engineer),
            (File::K, Rank::R5, PieceKind::Infantry),
        ];

        let mut board = Board::empty();
        for (file, rank, kind) in RED_SETUP {
            let red = Square::new(file, rank);
            let blue = Square::new(file, Rank::ALL[Rank::ALL.len() - 1 - rank.index() as usize]);
            board.write(red, Some(Piece::new(kind, Color::Red)));
            board.write(blue, Some(Piece::new(kind, Color::Blue)));
        }
        board
    }

    /// Returns the piece on a square.
    #[inline]
    pub fn get(&self, square: Square) -> Option<Piece> {
        self.squares[square.index() as usize]
    }

    /// Places a piece, or clears the square when `piece` is `None`.
    ///
    /// Returns the piece that was there before.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::TerrainViolation`] without touching the board if
    /// any unit of the piece cannot stand on the square.
    pub fn set(&mut self, square: Square, piece: Option<Piece>) -> Result<Option<Piece>, GameError> {
        if let Some(piece) = piece {
            if !piece.can_stand_on(square.terrain()) {
                return Err(GameError::TerrainViolation { square, piece });
            }
        }
        Ok(self.write(square, piece))
    }

    /// Clears a square and returns what was on it.
    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        self.write(square, None)
    }

    /// Square holding the commander of `color`, carried or not.
    #[inline]
    pub fn commander_square(&self, color: Color) -> Option<Square> {
        self.commanders[color.index()]
    }

    /// Writes a square without validation, keeping the commander index and
    /// the defense flag current.
    pub(crate) fn write(&mut self, square: Square, piece: Option<Piece>) -> Option<Piece> {
        let slot = &mut self.squares[square.index() as usize];
        let before = std::mem::replace(slot, piece);

        for color in Color::ALL {
            if self.commanders[color.index()] == Some(square) {
                self.commanders[color.index()] = None;
            }
        }
        if let Some(piece) = piece {
            if piece.contains(PieceKind::Commander) {
                self.commanders[piece.color().index()] = Some(square);
            }
        }

        if before.is_some_and(has_defender) || piece.is_some_and(has_defender) {
            self.defense_dirty = true;
        }
        before
    }

    /// True if a defense-capable unit was added or removed since the last
    /// air-defense rebuild.
    #[inline]
    pub fn is_defense_dirty(&self) -> bool {
        self.defense_dirty
    }

    #[inline]
    pub(crate) fn mark_defense_clean(&mut self) {
        self.defense_dirty = false;
    }

    /// Iterates over every occupied square.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|sq| self.get(sq).map(|piece| (sq, piece)))
    }

    /// Iterates over the pieces of one color.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color() == color)
    }

    /// Iterates over every unit of one color, passengers included.
    pub fn units_of(&self, color: Color) -> impl Iterator<Item = (Square, Unit)> + '_ {
        self.pieces_of(color)
            .flat_map(|(sq, piece)| piece.units().into_iter().map(move |unit| (sq, unit)))
    }

    /// True if the commander of `color` rides inside a stack.
    pub fn is_commander_carried(&self, color: Color) -> bool {
        self.commander_square(color)
            .and_then(|sq| self.get(sq))
            .is_some_and(|piece| piece.carries(PieceKind::Commander))
    }
}

fn has_defender(piece: Piece) -> bool {
    piece
        .units()
        .iter()
        .any(|unit| PieceRules::base(unit.kind).defense_radius > 0)
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.squares == other.squares && self.commanders == other.commanders
    }
}

impl Eq for Board {}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.pieces()).finish()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.iter().rev() {
            write!(f, "{:>2} ", rank.number())?;
            for file in File::ALL {
                match self.get(Square::new(file, *rank)) {
                    Some(piece) => write!(f, "{:>6}", piece.to_string())?,
                    None => write!(f, "{:>6}", ".")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "   ")?;
        for file in File::ALL {
            write!(f, "{:>6}", file.to_char())?;
        }
        writeln!(f)
    }
}
