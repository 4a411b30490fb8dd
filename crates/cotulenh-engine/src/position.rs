//! Board plus its derived air-defense zones.

use crate::{AirDefense, Board};
use cotulenh_core::{Color, Square};

/// The board and the air-defense cache computed from it.
///
/// The cache is refreshed by [`sync_air_defense`](Position::sync_air_defense)
/// whenever the board flags a change to a defense-capable unit, so readers
/// always see zones of the board as it is now, including mid-deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    board: Board,
    air_defense: AirDefense,
}

impl Position {
    /// Wraps a board, building its zones.
    pub fn new(mut board: Board) -> Self {
        let air_defense = AirDefense::build(&board);
        board.mark_defense_clean();
        Position { board, air_defense }
    }

    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        Self::new(Board::startpos())
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Zones as of the last sync. Callers sync first.
    #[inline]
    pub(crate) fn air_defense(&self) -> &AirDefense {
        debug_assert!(
            !self.board.is_defense_dirty(),
            "air defense read before sync"
        );
        &self.air_defense
    }

    /// Rebuilds the zones if the board changed a defender since the last
    /// rebuild.
    pub fn sync_air_defense(&mut self) {
        if self.board.is_defense_dirty() {
            self.air_defense = AirDefense::build(&self.board);
            self.board.mark_defense_clean();
            tracing::trace!("air defense rebuilt");
        }
    }

    /// Zones of the board as it is now, rebuilt first if stale.
    pub fn zones(&mut self) -> &AirDefense {
        self.sync_air_defense();
        &self.air_defense
    }

    /// True if air units of `against` are unsafe on `square`.
    pub fn is_defended(&mut self, square: Square, against: Color) -> bool {
        self.sync_air_defense();
        self.air_defense.is_defended(square, against)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cotulenh_core::{Piece, PieceKind};

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn startpos_defense() {
        let mut position = Position::startpos();
        // Red anti-air on e4 and i4, missile on g3.
        assert!(position.is_defended(sq("e5"), Color::Blue));
        assert!(position.is_defended(sq("g5"), Color::Blue));
        assert!(!position.is_defended(sq("k7"), Color::Blue));
        assert!(position.is_defended(sq("e9"), Color::Red));
    }

    #[test]
    fn cache_follows_board_changes() {
        let mut position = Position::new(Board::empty());
        assert!(!position.is_defended(sq("f7"), Color::Blue));

        position
            .board_mut()
            .set(sq("f6"), Some(Piece::new(PieceKind::AntiAir, Color::Red)))
            .unwrap();
        assert!(position.is_defended(sq("f7"), Color::Blue));

        position.board_mut().remove(sq("f6"));
        assert!(!position.is_defended(sq("f7"), Color::Blue));
        assert_eq!(
            position.air_defense(),
            &AirDefense::build(position.board())
        );
    }

    #[test]
    fn zones_rebuild_after_an_unsynced_change() {
        let mut position = Position::new(Board::empty());
        position
            .board_mut()
            .set(sq("f5"), Some(Piece::new(PieceKind::AntiAir, Color::Red)))
            .unwrap();
        assert!(position.board().is_defense_dirty());

        let expected = AirDefense::build(position.board());
        assert_eq!(position.zones(), &expected);
        assert!(!position.board().is_defense_dirty());
    }
}
