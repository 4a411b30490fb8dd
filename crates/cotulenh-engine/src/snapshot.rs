//! Serializable game snapshots.
//!
//! A [`Snapshot`] stores the board as it stood before any open deploy
//! session, plus the session's steps. Restoring replays those steps, so a
//! game saved mid-deploy resumes with the same session open.

use crate::{Board, GameError, GameState};
use cotulenh_core::{Color, Move, Piece, Square};
use serde::{Deserialize, Serialize};

/// One occupied square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedPiece {
    pub square: Square,
    pub piece: Piece,
}

/// An open deploy session: its stack square and the steps taken so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploySnapshot {
    pub square: Square,
    pub moves: Vec<Move>,
}

/// Everything needed to resume a game, history excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub turn: Color,
    pub move_number: u32,
    pub pieces: Vec<PlacedPiece>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deploy: Option<DeploySnapshot>,
}

impl GameState {
    /// Captures the current game.
    pub fn snapshot(&self) -> Snapshot {
        let mut board = self.board().clone();
        let deploy = self.session().map(|session| {
            for command in session.commands().iter().rev() {
                command.undo(&mut board);
            }
            DeploySnapshot {
                square: session.stack_square(),
                moves: session.moves().copied().collect(),
            }
        });

        Snapshot {
            turn: self.turn,
            move_number: self.move_number,
            pieces: board
                .pieces()
                .map(|(square, piece)| PlacedPiece { square, piece })
                .collect(),
            deploy,
        }
    }

    /// Restores a game from a snapshot, replaying any open deploy.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::TerrainViolation`] for a piece that cannot stand
    /// on its square, or the error of the first deploy step that cannot be
    /// replayed.
    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Self, GameError> {
        let mut board = Board::empty();
        for placed in &snapshot.pieces {
            board.set(placed.square, Some(placed.piece))?;
        }

        let mut game = GameState::from_board(board, snapshot.turn);
        game.move_number = snapshot.move_number;
        if let Some(deploy) = &snapshot.deploy {
            if let Some(stray) = deploy.moves.iter().find(|m| m.from() != deploy.square) {
                return Err(GameError::IllegalMove(stray.to_string()));
            }
            game.replay_deploy(&deploy.moves)?;
        }
        Ok(game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cotulenh_core::PieceKind;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn startpos_round_trip() {
        let game = GameState::new();
        let snapshot = game.snapshot();
        assert_eq!(snapshot.pieces.len(), 38);
        assert!(snapshot.deploy.is_none());

        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: Snapshot = serde_json::from_str(&json).unwrap();
        let restored = GameState::from_snapshot(&parsed).unwrap();
        assert_eq!(restored.board(), game.board());
        assert_eq!(restored.turn(), Color::Red);
    }

    #[test]
    fn resume_mid_deploy() {
        let stack = Piece::new(PieceKind::Navy, Color::Red)
            .combine(Piece::new(PieceKind::AirForce, Color::Red))
            .unwrap()
            .combine(Piece::new(PieceKind::Tank, Color::Red))
            .unwrap();
        let mut board = Board::empty();
        board
            .set(sq("g1"), Some(Piece::new(PieceKind::Commander, Color::Red)))
            .unwrap();
        board.set(sq("c3"), Some(stack)).unwrap();
        board
            .set(sq("k12"), Some(Piece::new(PieceKind::Commander, Color::Blue)))
            .unwrap();
        let mut game = GameState::from_board(board, Color::Red);

        let navy = game
            .moves()
            .into_iter()
            .find(|m| m.is_deploy() && m.piece().kind() == PieceKind::Navy && m.to() == sq("c5"))
            .unwrap();
        game.make_move(&navy).unwrap();

        let snapshot = game.snapshot();
        let deploy = snapshot.deploy.as_ref().unwrap();
        assert_eq!(deploy.square, sq("c3"));
        assert_eq!(deploy.moves, vec![navy]);
        // The stored board is the one before the deploy started.
        assert!(snapshot
            .pieces
            .iter()
            .any(|p| p.square == sq("c3") && p.piece == stack));

        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: Snapshot = serde_json::from_str(&json).unwrap();
        let mut restored = GameState::from_snapshot(&parsed).unwrap();
        assert_eq!(restored.board(), game.board());
        assert_eq!(restored.session(), game.session());
        assert_eq!(restored.moves(), game.moves());
    }

    #[test]
    fn bad_terrain_is_rejected() {
        let snapshot = Snapshot {
            turn: Color::Red,
            move_number: 1,
            pieces: vec![PlacedPiece {
                square: sq("f5"),
                piece: Piece::new(PieceKind::Navy, Color::Red),
            }],
            deploy: None,
        };
        assert!(matches!(
            GameState::from_snapshot(&snapshot),
            Err(GameError::TerrainViolation { .. })
        ));
    }
}
