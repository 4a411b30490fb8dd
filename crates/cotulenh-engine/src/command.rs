//! Reversible move application.
//!
//! A [`MoveCommand`] is prepared against a board, which validates the move
//! and records the before/after contents of every square it touches.
//! Executing and undoing the command then cannot fail. Commands must be
//! undone in the reverse order they were executed.

use crate::{Board, GameError, Position};
use cotulenh_core::{Move, Piece, PieceKind, Square};
use smallvec::SmallVec;
use std::ops::{Deref, DerefMut};

/// Contents of one square before and after a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SquareChange {
    pub square: Square,
    pub before: Option<Piece>,
    pub after: Option<Piece>,
}

impl SquareChange {
    #[inline]
    pub fn apply(&self, board: &mut Board) {
        board.write(self.square, self.after);
    }

    #[inline]
    pub fn revert(&self, board: &mut Board) {
        board.write(self.square, self.before);
    }
}

/// A validated move with the square changes it makes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveCommand {
    mv: Move,
    changes: SmallVec<[SquareChange; 2]>,
}

impl MoveCommand {
    /// Validates `mv` against `board` and records its effect.
    ///
    /// # Errors
    ///
    /// * [`GameError::EmptySquare`] if nothing stands on the origin.
    /// * [`GameError::IllegalMove`] if the origin does not hold the moving
    ///   units or the destination does not match the move's shape.
    /// * [`GameError::InvalidStackComposition`] if the units left behind or
    ///   the merged destination stack break the carrier table.
    /// * [`GameError::TerrainViolation`] if a resulting piece cannot stand
    ///   where it ends up.
    pub fn prepare(board: &Board, mv: &Move) -> Result<Self, GameError> {
        let from = mv.from();
        let to = mv.to();
        let origin = board.get(from).ok_or(GameError::EmptySquare(from))?;
        let target = board.get(to);

        if origin.color() != mv.color() {
            return Err(illegal(mv, "wrong color on origin"));
        }
        for unit in mv.piece().units() {
            if origin.unit(unit.kind) != Some(unit) {
                return Err(illegal(mv, "origin does not hold the moving units"));
            }
        }

        let kinds: SmallVec<[PieceKind; 3]> = mv.piece().units().iter().map(|u| u.kind).collect();
        let mut changes = SmallVec::new();

        if mv.is_capture() {
            match target {
                Some(piece) if piece.color() != mv.color() && Some(piece) == mv.captured() => {}
                _ => return Err(illegal(mv, "capture target mismatch")),
            }
        }

        if mv.is_stay_capture() {
            changes.push(SquareChange {
                square: to,
                before: target,
                after: None,
            });
            return Ok(MoveCommand { mv: *mv, changes });
        }

        let residual = origin.without(&kinds)?;
        if let Some(residual) = residual {
            if !residual.can_stand_on(from.terrain()) {
                return Err(GameError::TerrainViolation {
                    square: from,
                    piece: residual,
                });
            }
        }
        changes.push(SquareChange {
            square: from,
            before: Some(origin),
            after: residual,
        });

        let landed = if mv.is_suicide_capture() {
            None
        } else if mv.is_combination() {
            match target {
                Some(piece) if piece.color() == mv.color() => Some(piece.combine(mv.piece())?),
                _ => return Err(illegal(mv, "combination needs a friendly piece")),
            }
        } else if mv.is_capture() {
            Some(mv.piece())
        } else {
            if target.is_some() {
                return Err(illegal(mv, "destination is occupied"));
            }
            Some(mv.piece())
        };

        if let Some(piece) = landed {
            if !piece.can_stand_on(to.terrain()) {
                return Err(GameError::TerrainViolation { square: to, piece });
            }
        }
        changes.push(SquareChange {
            square: to,
            before: target,
            after: landed,
        });

        Ok(MoveCommand { mv: *mv, changes })
    }

    /// The move this command applies.
    #[inline]
    pub fn mv(&self) -> &Move {
        &self.mv
    }

    #[inline]
    pub fn changes(&self) -> &[SquareChange] {
        &self.changes
    }

    /// Applies the recorded changes.
    pub fn execute(&self, board: &mut Board) {
        for change in &self.changes {
            change.apply(board);
        }
    }

    /// Restores every touched square, last change first.
    pub fn undo(&self, board: &mut Board) {
        for change in self.changes.iter().rev() {
            change.revert(board);
        }
    }
}

fn illegal(mv: &Move, reason: &str) -> GameError {
    GameError::IllegalMove(format!("{}: {}", mv, reason))
}

/// Moves applied to a position for as long as the guard lives.
///
/// Dropping the guard undoes every applied move in reverse order, on every
/// exit path.
pub struct ScopedChanges<'a> {
    position: &'a mut Position,
    commands: Vec<MoveCommand>,
}

impl<'a> ScopedChanges<'a> {
    pub fn new(position: &'a mut Position) -> Self {
        ScopedChanges {
            position,
            commands: Vec::new(),
        }
    }

    /// Opens a guard with one move applied.
    pub fn apply(position: &'a mut Position, mv: &Move) -> Result<Self, GameError> {
        let mut scope = Self::new(position);
        scope.push(mv)?;
        Ok(scope)
    }

    /// Applies one more move. On error nothing changes.
    pub fn push(&mut self, mv: &Move) -> Result<(), GameError> {
        let command = MoveCommand::prepare(self.position.board(), mv)?;
        command.execute(self.position.board_mut());
        self.commands.push(command);
        Ok(())
    }
}

impl Deref for ScopedChanges<'_> {
    type Target = Position;

    fn deref(&self) -> &Position {
        &*self.position
    }
}

impl DerefMut for ScopedChanges<'_> {
    fn deref_mut(&mut self) -> &mut Position {
        &mut *self.position
    }
}

impl Drop for ScopedChanges<'_> {
    fn drop(&mut self) {
        while let Some(command) = self.commands.pop() {
            command.undo(self.position.board_mut());
        }
    }
}
