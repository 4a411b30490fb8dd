//! Error type for engine operations.

use cotulenh_core::{Color, Piece, PieceKind, Square, StackError};
use thiserror::Error;

/// Errors reported by the board, the command layer and the game driver.
///
/// Every failing operation leaves the game exactly as it was before the call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    /// A piece would stand on terrain one of its units cannot occupy.
    #[error("{piece} cannot stand on {square}")]
    TerrainViolation { square: Square, piece: Piece },

    /// The carrier table rejects the stack.
    #[error("invalid stack: {0}")]
    InvalidStackComposition(#[from] StackError),

    /// The commander of this color would be attacked or exposed.
    #[error("{0} commander would be in danger")]
    CommanderInDanger(Color),

    #[error("no deploy session is active")]
    NoSessionActive,

    /// A deploy session from this square must be finished first.
    #[error("deploy session from {0} is still active")]
    SessionAlreadyActive(Square),

    #[error("cannot recombine {kind} onto {square}")]
    InvalidRecombineTarget { square: Square, kind: PieceKind },

    /// The move is not legal in the current position.
    #[error("illegal move: {0}")]
    IllegalMove(String),

    /// The staying units do not match the units left on the stack square.
    #[error("staying units do not match the remaining units")]
    StayingMismatch,

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("no piece on {0}")]
    EmptySquare(Square),

    /// The game has already ended.
    #[error("game has already ended")]
    GameAlreadyOver,
}
