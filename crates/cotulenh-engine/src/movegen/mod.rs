//! Move generation.
//!
//! Pseudo-legal moves come from casting rays per piece; see [`ray`] for the
//! per-square rules. Stacks additionally offer one deploy move set per unit,
//! and an open deploy session restricts generation to the units it has not
//! moved yet.

mod attacks;
pub mod perft;
mod ray;

use crate::{DeploySession, Position};
use cotulenh_core::{Color, Move, Piece, PieceKind, Square, Unit};

pub use attacks::{attackers, commander_in_sight, is_commander_exposed, is_square_attacked};
pub(crate) use ray::piece_moves;

/// A growable list of moves.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct MoveList {
    moves: Vec<Move>,
}

impl MoveList {
    /// Creates an empty move list.
    #[inline]
    pub fn new() -> Self {
        MoveList {
            moves: Vec::with_capacity(64),
        }
    }

    /// Adds a move to the list.
    #[inline]
    pub fn push(&mut self, m: Move) {
        self.moves.push(m);
    }

    /// Returns the number of moves.
    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Returns true if the list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Returns a slice of the moves.
    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.moves.iter()
    }

    /// Returns true if the list holds `m`.
    pub fn contains(&self, m: &Move) -> bool {
        self.moves.contains(m)
    }

    /// Clears the move list.
    #[inline]
    pub fn clear(&mut self) {
        self.moves.clear();
    }

    /// Retains only moves for which the predicate returns true.
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        self.moves.retain(f);
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.moves[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = std::vec::IntoIter<Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.into_iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Narrows generated moves to one origin square and/or one piece kind.
///
/// The kind matches the travelling piece's carrier, so a filter on a
/// passenger kind selects that passenger's deploy moves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveFilter {
    pub square: Option<Square>,
    pub kind: Option<PieceKind>,
}

impl MoveFilter {
    /// Moves from one square.
    pub fn square(square: Square) -> Self {
        MoveFilter {
            square: Some(square),
            kind: None,
        }
    }

    /// Moves of one piece kind.
    pub fn kind(kind: PieceKind) -> Self {
        MoveFilter {
            square: None,
            kind: Some(kind),
        }
    }

    /// Returns true if `m` passes the filter.
    pub fn matches(&self, m: &Move) -> bool {
        self.square.map_or(true, |square| m.from() == square)
            && self.kind.map_or(true, |kind| m.piece().kind() == kind)
    }
}

/// Generates pseudo-legal moves for `color`.
///
/// Commander safety is not checked here; see
/// [`legal_moves`](crate::legality::legal_moves).
pub fn generate_moves(
    position: &mut Position,
    color: Color,
    session: Option<&DeploySession>,
) -> MoveList {
    position.sync_air_defense();
    let position: &Position = position;
    let board = position.board();
    let mut moves = MoveList::new();

    match session {
        None => {
            for (square, piece) in board.pieces_of(color) {
                piece_moves(position, square, piece, false, &mut moves);
                if piece.is_stack() {
                    deploy_moves(position, square, piece, &piece.units(), &mut moves);
                }
            }
        }
        Some(session) => {
            let square = session.stack_square();
            if let Some(piece) = board.get(square).filter(|p| p.color() == color) {
                deploy_moves(position, square, piece, &session.remaining(), &mut moves);
            }
        }
    }
    moves
}

/// Deploy moves of every unit of `stack` that is still to move.
///
/// A departure that would leave an invalid stack behind is dropped, except
/// for stay captures which leave the stack untouched.
fn deploy_moves(
    position: &Position,
    square: Square,
    stack: Piece,
    remaining: &[Unit],
    moves: &mut MoveList,
) {
    let mut unit_moves = MoveList::new();
    for unit in stack.units() {
        if !remaining.iter().any(|r| r.kind == unit.kind) {
            continue;
        }
        let residual_ok = match stack.without(&[unit.kind]) {
            Ok(None) => true,
            Ok(Some(residual)) => residual.can_stand_on(square.terrain()),
            Err(_) => false,
        };

        unit_moves.clear();
        piece_moves(position, square, Piece::single(unit), true, &mut unit_moves);
        for m in &unit_moves {
            if residual_ok || m.is_stay_capture() {
                moves.push(*m);
            }
        }
    }
}
