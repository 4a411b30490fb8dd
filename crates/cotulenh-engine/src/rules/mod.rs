//! Game rules: the movement table and game outcomes.

mod movement;

pub use movement::{PieceRules, UNLIMITED};

use cotulenh_core::Color;
use serde::{Deserialize, Serialize};

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// One side won.
    Win { winner: Color, reason: WinReason },
    /// No legal turn while the commander is safe.
    Stalemate,
}

/// How a game was won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinReason {
    /// The loser has no legal turn and the commander is in danger.
    Checkmate,
    /// The loser's commander was taken off the board.
    CommanderCaptured,
}

impl GameResult {
    /// Returns the winner, if any.
    pub const fn winner(self) -> Option<Color> {
        match self {
            GameResult::Win { winner, .. } => Some(winner),
            GameResult::Stalemate => None,
        }
    }
}
