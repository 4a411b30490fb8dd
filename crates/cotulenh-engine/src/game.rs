//! Full game management with history tracking.
//!
//! The [`GameState`] struct drives a game: it generates legal moves, applies
//! and undoes them, runs deploy sessions and answers game-over queries.

use crate::legality::{self, has_legal_turn, legal_moves};
use crate::movegen::{attackers, MoveFilter, MoveList};
use crate::rules::{GameResult, WinReason};
use crate::{Board, DeploySession, EngineConfig, GameError, MoveCommand, Position, SquareChange};
use cotulenh_core::{Color, Move, Square};

/// What happened after [`GameState::make_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The turn passed to the other side.
    TurnComplete,
    /// A deploy step was applied and more units may still move.
    DeployInProgress,
    /// Every unit is accounted for; waiting for an explicit commit.
    AwaitingCommit,
    /// The deploy could not be committed because the commander would be in
    /// danger. The session stays open.
    CommitRejected,
}

/// The moves of a finished turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnMoves {
    /// A whole piece moved.
    Single(MoveCommand),
    /// A committed deploy session.
    Deploy(DeploySession),
}

/// A finished turn in game history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnRecord {
    /// Side that played the turn.
    pub color: Color,
    pub moves: TurnMoves,
    /// Heroic promotions applied when the turn ended.
    pub promotions: Vec<SquareChange>,
}

impl TurnRecord {
    /// The moves of the turn in play order.
    pub fn played(&self) -> Vec<Move> {
        match &self.moves {
            TurnMoves::Single(command) => vec![*command.mv()],
            TurnMoves::Deploy(session) => session.moves().copied().collect(),
        }
    }
}

/// A complete game with history tracking.
///
/// All board mutation goes through [`MoveCommand`]s, so every turn in the
/// history can be undone exactly.
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) position: Position,
    pub(crate) turn: Color,
    pub(crate) session: Option<DeploySession>,
    pub(crate) history: Vec<TurnRecord>,
    pub(crate) move_number: u32,
    pub(crate) config: EngineConfig,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Creates a new game with the standard starting position.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Creates a new standard game with the given configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        let mut game = Self::from_board(Board::startpos(), Color::Red);
        game.config = config;
        game
    }

    /// Creates a game from a custom board.
    pub fn from_board(board: Board, turn: Color) -> Self {
        GameState {
            position: Position::new(board),
            turn,
            session: None,
            history: Vec::new(),
            move_number: 1,
            config: EngineConfig::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EngineConfig) {
        self.config = config;
    }

    /// Returns a reference to the current position.
    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }

    #[inline]
    pub fn board(&self) -> &Board {
        self.position.board()
    }

    /// Side to move.
    #[inline]
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// Starts at 1 and increments after Blue's turn.
    #[inline]
    pub fn move_number(&self) -> u32 {
        self.move_number
    }

    /// Finished turns, oldest first.
    pub fn history(&self) -> &[TurnRecord] {
        &self.history
    }

    /// The open deploy session, if any.
    #[inline]
    pub fn session(&self) -> Option<&DeploySession> {
        self.session.as_ref()
    }

    /// Returns all legal moves, or none once the game is over.
    ///
    /// While a deploy session is open only the session's remaining units
    /// move.
    pub fn moves(&mut self) -> MoveList {
        if self.result().is_some() {
            return MoveList::new();
        }
        legal_moves(&mut self.position, self.turn, self.session.as_ref())
    }

    /// Returns the legal moves that pass `filter`.
    pub fn moves_filtered(&mut self, filter: &MoveFilter) -> MoveList {
        let mut moves = self.moves();
        moves.retain(|m| filter.matches(m));
        moves
    }

    /// Plays a move.
    ///
    /// A deploy move opens a session, or continues the open one. The turn
    /// passes once the move completes it.
    ///
    /// # Errors
    ///
    /// * [`GameError::SessionAlreadyActive`] if a session is open and `mv`
    ///   is not a deploy from its stack square.
    /// * [`GameError::GameAlreadyOver`] if the game has ended.
    /// * [`GameError::IllegalMove`] if `mv` is not a legal move.
    pub fn make_move(&mut self, mv: &Move) -> Result<MoveOutcome, GameError> {
        match self.session.as_ref().map(DeploySession::stack_square) {
            Some(stack_square) => {
                if !mv.is_deploy() || mv.from() != stack_square {
                    return Err(GameError::SessionAlreadyActive(stack_square));
                }
            }
            None => {
                if self.result().is_some() {
                    return Err(GameError::GameAlreadyOver);
                }
            }
        }

        let legal = legal_moves(&mut self.position, self.turn, self.session.as_ref());
        if !legal.contains(mv) {
            return Err(GameError::IllegalMove(mv.to_string()));
        }

        if mv.is_deploy() {
            return self.deploy_step(mv);
        }

        let command = MoveCommand::prepare(self.position.board(), mv)?;
        command.execute(self.position.board_mut());
        self.finish_turn(TurnMoves::Single(command));
        Ok(MoveOutcome::TurnComplete)
    }

    /// Takes back the most recent move.
    ///
    /// Inside a deploy session this pops the last step. Otherwise the last
    /// finished turn is reverted; for a deploy turn that means its last step,
    /// with the session reopened on the steps before it.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NothingToUndo`] at the start of the game.
    pub fn undo(&mut self) -> Result<(), GameError> {
        if self.session.is_some() {
            return self.undo_deploy_move();
        }

        let record = self.history.pop().ok_or(GameError::NothingToUndo)?;
        let board = self.position.board_mut();
        for change in record.promotions.iter().rev() {
            change.revert(board);
        }
        match record.moves {
            TurnMoves::Single(command) => command.undo(board),
            TurnMoves::Deploy(mut session) => {
                if let Some(command) = session.pop() {
                    command.undo(board);
                }
                session.reopen();
                if !session.is_empty() {
                    self.session = Some(session);
                }
            }
        }

        self.turn = record.color;
        if record.color == Color::Blue {
            self.move_number = self.move_number.saturating_sub(1);
        }
        Ok(())
    }

    /// True if the side to move has its commander in danger.
    pub fn is_check(&mut self) -> bool {
        self.is_commander_in_danger(self.turn)
    }

    /// True if the side to move is in danger with no safe turn.
    pub fn is_checkmate(&mut self) -> bool {
        self.session.is_none() && self.is_check() && !has_legal_turn(&mut self.position, self.turn)
    }

    /// True if the side to move is safe but has no safe turn.
    pub fn is_stalemate(&mut self) -> bool {
        self.session.is_none()
            && self.commander_captured().is_none()
            && !self.is_check()
            && !has_legal_turn(&mut self.position, self.turn)
    }

    /// Returns the game result if the game is over.
    ///
    /// A game is never over while a deploy session is open, unless a
    /// commander has been captured.
    pub fn result(&mut self) -> Option<GameResult> {
        if let Some(loser) = self.commander_captured() {
            return Some(GameResult::Win {
                winner: loser.opposite(),
                reason: WinReason::CommanderCaptured,
            });
        }
        if self.session.is_some() || has_legal_turn(&mut self.position, self.turn) {
            return None;
        }
        if self.is_check() {
            Some(GameResult::Win {
                winner: self.turn.opposite(),
                reason: WinReason::Checkmate,
            })
        } else {
            Some(GameResult::Stalemate)
        }
    }

    /// True if the commander of `color` is attacked or exposed on the
    /// current board.
    pub fn is_commander_in_danger(&mut self, color: Color) -> bool {
        legality::is_commander_in_danger(&mut self.position, color)
    }

    /// True if air units of `against` are unsafe on `square`.
    pub fn is_defended(&mut self, square: Square, against: Color) -> bool {
        self.position.is_defended(square, against)
    }

    pub(crate) fn commander_captured(&self) -> Option<Color> {
        Color::ALL
            .into_iter()
            .find(|color| self.board().commander_square(*color).is_none())
    }

    /// Records a finished turn and passes the move.
    pub(crate) fn finish_turn(&mut self, moves: TurnMoves) {
        let color = self.turn;
        let promotions = if self.config.heroic_promotion {
            self.promote_attackers(color)
        } else {
            Vec::new()
        };
        self.history.push(TurnRecord {
            color,
            moves,
            promotions,
        });
        if color == Color::Blue {
            self.move_number += 1;
        }
        self.turn = color.opposite();
        tracing::debug!("{} turn complete, move {}", color, self.move_number);
    }

    /// Makes every unit of `color` that attacks the enemy commander heroic.
    fn promote_attackers(&mut self, color: Color) -> Vec<SquareChange> {
        self.position.sync_air_defense();
        let Some(target) = self.board().commander_square(color.opposite()) else {
            return Vec::new();
        };

        let found = attackers(&self.position, target, color);
        let mut changes = Vec::new();
        for (square, unit) in found {
            if unit.heroic {
                continue;
            }
            let before = self.board().get(square);
            let change = SquareChange {
                square,
                before,
                after: before.map(|piece| piece.promote(unit.kind)),
            };
            change.apply(self.position.board_mut());
            tracing::debug!("{} on {} becomes heroic", unit, square);
            changes.push(change);
        }
        changes
    }
}
