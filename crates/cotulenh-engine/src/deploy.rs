//! Deploy sessions.
//!
//! A stack may split over several moves within one turn. The first deploy
//! move opens a [`DeploySession`]; each step is applied to the board right
//! away and the turn passes only when the session is committed, either
//! automatically once every unit is accounted for or through
//! [`GameState::commit`].

use crate::game::{MoveOutcome, TurnMoves};
use crate::legality::{is_commander_attacked, is_commander_in_danger};
use crate::movegen::generate_moves;
use crate::{GameError, GameState, MoveCommand, ScopedChanges};
use cotulenh_core::{Color, Move, MoveFlags, Piece, PieceKind, Square, Units};
use smallvec::SmallVec;

/// Piece kinds named by a commit.
pub type Kinds = SmallVec<[PieceKind; 3]>;

/// An open multi-move turn splitting one stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploySession {
    stack_square: Square,
    turn: Color,
    original: Piece,
    commands: Vec<MoveCommand>,
    stay: Option<Kinds>,
}

impl DeploySession {
    /// Opens a session for `original` standing on `stack_square`.
    pub fn new(stack_square: Square, turn: Color, original: Piece) -> Self {
        DeploySession {
            stack_square,
            turn,
            original,
            commands: Vec::new(),
            stay: None,
        }
    }

    #[inline]
    pub fn stack_square(&self) -> Square {
        self.stack_square
    }

    #[inline]
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// The stack as it stood before the first step.
    #[inline]
    pub fn original(&self) -> Piece {
        self.original
    }

    /// Steps applied so far, in order.
    pub fn moves(&self) -> impl Iterator<Item = &Move> + '_ {
        self.commands.iter().map(MoveCommand::mv)
    }

    pub fn commands(&self) -> &[MoveCommand] {
        &self.commands
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Units of the original stack that no step has used yet.
    pub fn remaining(&self) -> Units {
        self.original
            .units()
            .into_iter()
            .filter(|unit| !self.moves().any(|m| m.piece().contains(unit.kind)))
            .collect()
    }

    /// Kinds of [`remaining`](Self::remaining).
    pub fn remaining_kinds(&self) -> Kinds {
        self.remaining().iter().map(|unit| unit.kind).collect()
    }

    /// Kinds left on the stack square when the session was committed.
    pub fn stay(&self) -> Option<&[PieceKind]> {
        self.stay.as_deref()
    }

    pub(crate) fn push(&mut self, command: MoveCommand) {
        self.commands.push(command);
    }

    pub(crate) fn pop(&mut self) -> Option<MoveCommand> {
        self.commands.pop()
    }

    pub(crate) fn reopen(&mut self) {
        self.stay = None;
    }
}

/// A unit still on the stack square that may join an earlier step's piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecombineOption {
    /// Where the earlier step landed.
    pub square: Square,
    /// Kind of the unit that catches up.
    pub kind: PieceKind,
}

impl GameState {
    /// Commits the open session, leaving `staying` on the stack square.
    ///
    /// # Errors
    ///
    /// * [`GameError::NoSessionActive`] without an open session.
    /// * [`GameError::StayingMismatch`] unless `staying` names exactly the
    ///   remaining units.
    /// * [`GameError::CommanderInDanger`] if the finished deploy would leave
    ///   the commander in danger. The session stays open.
    pub fn commit(&mut self, staying: &[PieceKind]) -> Result<(), GameError> {
        let session = self.session.as_ref().ok_or(GameError::NoSessionActive)?;
        let mut expected = session.remaining_kinds();
        let mut given: Kinds = staying.iter().copied().collect();
        expected.sort();
        given.sort();
        if expected != given {
            return Err(GameError::StayingMismatch);
        }
        if is_commander_in_danger(&mut self.position, self.turn) {
            return Err(GameError::CommanderInDanger(self.turn));
        }

        let mut session = self.session.take().ok_or(GameError::NoSessionActive)?;
        tracing::debug!(
            "{} commits deploy from {} after {} steps",
            self.turn,
            session.stack_square(),
            session.len()
        );
        session.stay = Some(given);
        self.finish_turn(TurnMoves::Deploy(session));
        Ok(())
    }

    /// Commits the open session with every remaining unit staying.
    pub fn commit_session(&mut self) -> Result<(), GameError> {
        let staying = self
            .session
            .as_ref()
            .ok_or(GameError::NoSessionActive)?
            .remaining_kinds();
        self.commit(&staying)
    }

    /// Takes back the last step of the open session.
    ///
    /// Removing the only step closes the session.
    pub fn undo_deploy_move(&mut self) -> Result<(), GameError> {
        let session = self.session.as_mut().ok_or(GameError::NoSessionActive)?;
        let command = session.pop().ok_or(GameError::NothingToUndo)?;
        command.undo(self.position.board_mut());
        if session.is_empty() {
            self.session = None;
            tracing::debug!("{} deploy closed by undo", self.turn);
        }
        Ok(())
    }

    /// Undoes every step and closes the session.
    pub fn cancel_session(&mut self) -> Result<(), GameError> {
        if self.session.is_none() {
            return Err(GameError::NoSessionActive);
        }
        self.abandon_session();
        tracing::debug!("{} deploy cancelled", self.turn);
        Ok(())
    }

    /// Ways a remaining unit can join a piece deployed earlier this turn.
    pub fn recombine_options(&mut self) -> Vec<RecombineOption> {
        let Some(session) = self.session.as_ref() else {
            return Vec::new();
        };
        let stack_square = session.stack_square();
        let color = session.turn();
        let remaining = session.remaining();
        let mut targets: SmallVec<[Square; 3]> = SmallVec::new();
        for m in session.moves() {
            if m.lands() && !targets.contains(&m.to()) {
                targets.push(m.to());
            }
        }
        let Some(stack) = self.board().get(stack_square) else {
            return Vec::new();
        };

        let mut options = Vec::new();
        for unit in remaining {
            if stack.unit(unit.kind) != Some(unit) {
                continue;
            }
            let residual_ok = match stack.without(&[unit.kind]) {
                Ok(None) => true,
                Ok(Some(residual)) => residual.can_stand_on(stack_square.terrain()),
                Err(_) => false,
            };
            if !residual_ok {
                continue;
            }

            for &square in &targets {
                let Some(current) = self.board().get(square).filter(|p| p.color() == color)
                else {
                    continue;
                };
                let Ok(combined) = current.combine(Piece::single(unit)) else {
                    continue;
                };
                if !combined.can_stand_on(square.terrain()) {
                    continue;
                }
                if combined.contains(PieceKind::Commander) {
                    let trial = Move::new(
                        color,
                        stack_square,
                        square,
                        Piece::single(unit),
                        None,
                        MoveFlags::DEPLOY.with(MoveFlags::COMBINATION),
                    );
                    let safe = match ScopedChanges::apply(&mut self.position, &trial) {
                        Ok(mut scope) => !is_commander_attacked(&mut scope, color),
                        Err(_) => false,
                    };
                    if !safe {
                        continue;
                    }
                }
                options.push(RecombineOption {
                    square,
                    kind: unit.kind,
                });
            }
        }
        options
    }

    /// Merges a remaining unit into the piece an earlier step moved.
    ///
    /// The session is rebuilt from scratch with the earlier step carrying
    /// the unit, then settled like any other step.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidRecombineTarget`] if `option` is not one
    /// of [`recombine_options`](Self::recombine_options). The session is
    /// left as it was.
    pub fn recombine(&mut self, option: RecombineOption) -> Result<MoveOutcome, GameError> {
        let invalid = GameError::InvalidRecombineTarget {
            square: option.square,
            kind: option.kind,
        };
        if self.session.is_none() {
            return Err(GameError::NoSessionActive);
        }
        if !self.recombine_options().contains(&option) {
            return Err(invalid);
        }

        let session = self.session.as_ref().ok_or(GameError::NoSessionActive)?;
        let original: Vec<Move> = session.moves().copied().collect();
        let index = original
            .iter()
            .rposition(|m| m.to() == option.square && m.lands())
            .ok_or_else(|| invalid.clone())?;
        let unit = session
            .original()
            .unit(option.kind)
            .ok_or_else(|| invalid.clone())?;
        let merged = original[index]
            .piece()
            .combine(Piece::single(unit))
            .map_err(|_| invalid.clone())?;
        let mut replay = original.clone();
        replay[index] = original[index].with_piece(merged);

        self.abandon_session();
        if let Err(err) = self.replay_deploy(&replay) {
            tracing::debug!("recombine replay failed: {}", err);
            self.abandon_session();
            self.replay_deploy(&original)?;
            return Err(invalid);
        }
        tracing::debug!("{} recombined onto {}", option.kind, option.square);
        self.settle_session()
    }

    /// Applies one validated deploy step, opening the session if needed.
    pub(crate) fn deploy_step(&mut self, mv: &Move) -> Result<MoveOutcome, GameError> {
        self.replay_deploy(std::slice::from_ref(mv))?;
        self.settle_session()
    }

    /// Applies deploy steps without consulting the move generator.
    ///
    /// Stops at the first step that fails; earlier steps stay applied.
    pub(crate) fn replay_deploy(&mut self, moves: &[Move]) -> Result<(), GameError> {
        for mv in moves {
            if !mv.is_deploy() {
                return Err(GameError::IllegalMove(mv.to_string()));
            }
            if let Some(session) = &self.session {
                if mv.from() != session.stack_square() {
                    return Err(GameError::SessionAlreadyActive(session.stack_square()));
                }
            }
            let command = MoveCommand::prepare(self.position.board(), mv)?;
            let session = match self.session.take() {
                Some(session) => session,
                None => {
                    let original = self
                        .board()
                        .get(mv.from())
                        .ok_or(GameError::EmptySquare(mv.from()))?;
                    tracing::debug!("{} opens deploy from {}", self.turn, mv.from());
                    DeploySession::new(mv.from(), self.turn, original)
                }
            };
            command.execute(self.position.board_mut());
            let session = self.session.insert(session);
            session.push(command);
        }
        Ok(())
    }

    /// Decides whether the session goes on, waits, or commits.
    ///
    /// Taking the enemy commander ends the turn at once, the remaining units
    /// staying on the stack square.
    pub(crate) fn settle_session(&mut self) -> Result<MoveOutcome, GameError> {
        if self.session.is_some() && self.commander_captured().is_some() {
            let mut session = self.session.take().ok_or(GameError::NoSessionActive)?;
            session.stay = Some(session.remaining_kinds());
            tracing::debug!(
                "{} took the commander from {}, deploy closed",
                self.turn,
                session.stack_square()
            );
            self.finish_turn(TurnMoves::Deploy(session));
            return Ok(MoveOutcome::TurnComplete);
        }
        let Some(session) = self.session.as_ref() else {
            return Err(GameError::NoSessionActive);
        };
        if !session.remaining().is_empty()
            && !generate_moves(&mut self.position, self.turn, Some(session)).is_empty()
        {
            return Ok(MoveOutcome::DeployInProgress);
        }
        if !self.config.auto_commit {
            return Ok(MoveOutcome::AwaitingCommit);
        }

        match self.commit_session() {
            Ok(()) => Ok(MoveOutcome::TurnComplete),
            Err(GameError::CommanderInDanger(color)) => {
                tracing::debug!("{} deploy commit rejected, commander in danger", color);
                Ok(MoveOutcome::CommitRejected)
            }
            Err(err) => Err(err),
        }
    }

    /// Undoes and drops the open session, if any.
    fn abandon_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            while let Some(command) = session.pop() {
                command.undo(self.position.board_mut());
            }
        }
    }
}
