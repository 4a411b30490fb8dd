//! Commander safety.
//!
//! A commander is in danger when an enemy unit can capture it or when it
//! faces the enemy commander across an open file or rank. Candidate moves
//! are tried on the real position inside a [`ScopedChanges`] guard and
//! reverted before the next candidate.

use crate::movegen::{generate_moves, is_commander_exposed, is_square_attacked, MoveList};
use crate::{DeploySession, Position, ScopedChanges};
use cotulenh_core::{Color, Move};

/// True if some enemy unit has a capture on the commander of `color`.
pub fn is_commander_attacked(position: &mut Position, color: Color) -> bool {
    position.sync_air_defense();
    match position.board().commander_square(color) {
        Some(square) => is_square_attacked(position, square, color.opposite()),
        None => false,
    }
}

/// True if the commander of `color` is attacked or exposed.
pub fn is_commander_in_danger(position: &mut Position, color: Color) -> bool {
    is_commander_exposed(position.board(), color) || is_commander_attacked(position, color)
}

/// True if playing `mv` leaves the mover's commander out of danger.
///
/// Moves that cannot be applied count as unsafe.
pub fn is_safe_after(position: &mut Position, mv: &Move) -> bool {
    match ScopedChanges::apply(position, mv) {
        Ok(mut scope) => !is_commander_in_danger(&mut scope, mv.color()),
        Err(_) => false,
    }
}

/// Generates legal moves for `color`.
///
/// Whole-piece moves are filtered for commander safety. Deploy steps are
/// kept as generated: a step may pass through danger as long as the
/// finished deploy is safe, which is checked when the session commits.
pub fn legal_moves(
    position: &mut Position,
    color: Color,
    session: Option<&DeploySession>,
) -> MoveList {
    let mut moves = generate_moves(position, color, session);
    moves.retain(|m| m.is_deploy() || is_safe_after(position, m));
    moves
}

/// True if `color` can complete a safe turn.
///
/// A deploy step counts when stopping right after it, with the rest of the
/// stack staying, is safe.
pub fn has_legal_turn(position: &mut Position, color: Color) -> bool {
    let moves = generate_moves(position, color, None);
    moves.iter().any(|m| is_safe_after(position, m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Board;
    use cotulenh_core::{Piece, PieceKind, Square};

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn position(pieces: &[(&str, PieceKind, Color)]) -> Position {
        let mut board = Board::empty();
        for (square, kind, color) in pieces {
            board.set(sq(square), Some(Piece::new(*kind, *color))).unwrap();
        }
        Position::new(board)
    }

    #[test]
    fn startpos_is_quiet() {
        let mut position = Position::startpos();
        assert!(!is_commander_in_danger(&mut position, Color::Red));
        assert!(!is_commander_in_danger(&mut position, Color::Blue));
    }

    #[test]
    fn pinned_blocker_cannot_leave_the_file() {
        let mut position = position(&[
            ("f1", PieceKind::Commander, Color::Red),
            ("f5", PieceKind::Infantry, Color::Red),
            ("f12", PieceKind::Commander, Color::Blue),
        ]);
        let moves = legal_moves(&mut position, Color::Red, None);
        let infantry: Vec<&Move> = moves.iter().filter(|m| m.from() == sq("f5")).collect();
        assert!(!infantry.is_empty());
        assert!(infantry.iter().all(|m| m.to().file_index() == sq("f5").file_index()));
    }

    #[test]
    fn attacked_commander_must_react() {
        let mut position = position(&[
            ("f1", PieceKind::Commander, Color::Red),
            ("f3", PieceKind::Tank, Color::Blue),
            ("k12", PieceKind::Commander, Color::Blue),
        ]);
        assert!(is_commander_attacked(&mut position, Color::Red));
        let moves = legal_moves(&mut position, Color::Red, None);
        assert!(!moves.is_empty());
        for m in &moves {
            assert!(is_safe_after(&mut position, m));
        }
        assert!(has_legal_turn(&mut position, Color::Red));
    }

    #[test]
    fn filtering_leaves_position_unchanged() {
        let mut position = Position::startpos();
        let before = position.clone();
        let _ = legal_moves(&mut position, Color::Red, None);
        position.sync_air_defense();
        assert_eq!(position, before);
    }
}
