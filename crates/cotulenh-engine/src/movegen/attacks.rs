//! Attack detection and the flying-general rule.

use super::ray::ray_moves;
use super::MoveList;
use crate::rules::PieceRules;
use crate::{Board, Position};
use cotulenh_core::{Color, Direction, Piece, PieceKind, Square, Unit};
use smallvec::SmallVec;

/// Units of `by` that have a capture of any shape on `target`.
///
/// Passengers attack as well as carriers. Zones must be in sync.
pub fn attackers(position: &Position, target: Square, by: Color) -> SmallVec<[(Square, Unit); 4]> {
    let mut found = SmallVec::new();
    let mut moves = MoveList::new();
    for (square, unit) in position.board().units_of(by) {
        let Some(direction) = Direction::between(square, target) else {
            continue;
        };
        let rules = PieceRules::for_unit(unit);
        if direction.is_diagonal() && !rules.diagonal {
            continue;
        }
        let (df, dr) = square.distance(target);
        if df.max(dr) > rules.capture_range_toward(direction, true) {
            continue;
        }

        moves.clear();
        ray_moves(
            position,
            square,
            Piece::single(unit),
            direction,
            false,
            &mut moves,
        );
        if moves.iter().any(|m| m.is_capture() && m.to() == target) {
            found.push((square, unit));
        }
    }
    found
}

/// True if any unit of `by` attacks `target`.
pub fn is_square_attacked(position: &Position, target: Square, by: Color) -> bool {
    !attackers(position, target, by).is_empty()
}

/// True if a visible commander of `color` on `square` would face the enemy
/// commander along an open file or rank.
///
/// `vacated` is treated as empty, for a commander that is leaving it.
pub fn commander_in_sight(
    board: &Board,
    color: Color,
    square: Square,
    vacated: Option<Square>,
) -> bool {
    let enemy = color.opposite();
    let Some(enemy_square) = board.commander_square(enemy) else {
        return false;
    };
    if enemy_square == square || is_hidden(board, enemy) {
        return false;
    }
    let Some(direction) = Direction::between(square, enemy_square) else {
        return false;
    };
    if direction.is_diagonal() {
        return false;
    }

    let mut current = square;
    while let Some(next) = current.offset(direction) {
        if next == enemy_square {
            return true;
        }
        if Some(next) != vacated && board.get(next).is_some() {
            return false;
        }
        current = next;
    }
    false
}

/// True if the commander of `color` is in open line of sight of the enemy
/// commander.
pub fn is_commander_exposed(board: &Board, color: Color) -> bool {
    match board.commander_square(color) {
        Some(square) if !is_hidden(board, color) => commander_in_sight(board, color, square, None),
        _ => false,
    }
}

fn is_hidden(board: &Board, color: Color) -> bool {
    PieceRules::base(PieceKind::Commander).hidden_when_carried && board.is_commander_carried(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn position(pieces: &[(&str, Piece)]) -> Position {
        let mut board = Board::empty();
        for (square, piece) in pieces {
            board.set(sq(square), Some(*piece)).unwrap();
        }
        Position::new(board)
    }

    fn red(kind: PieceKind) -> Piece {
        Piece::new(kind, Color::Red)
    }

    fn blue(kind: PieceKind) -> Piece {
        Piece::new(kind, Color::Blue)
    }

    #[test]
    fn tank_attacks_two_squares_away() {
        let pos = position(&[
            ("f5", blue(PieceKind::Commander)),
            ("f3", red(PieceKind::Tank)),
        ]);
        assert!(is_square_attacked(&pos, sq("f5"), Color::Red));
        let found = attackers(&pos, sq("f5"), Color::Red);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, sq("f3"));
    }

    #[test]
    fn blocked_tank_does_not_attack() {
        let pos = position(&[
            ("f5", blue(PieceKind::Commander)),
            ("f4", blue(PieceKind::Infantry)),
            ("f3", red(PieceKind::Tank)),
        ]);
        let found = attackers(&pos, sq("f5"), Color::Red);
        assert!(found.is_empty());
    }

    #[test]
    fn passengers_attack() {
        let stack = red(PieceKind::Navy).combine(red(PieceKind::Tank)).unwrap();
        let pos = position(&[("c5", stack), ("e5", blue(PieceKind::Commander))]);
        let found = attackers(&pos, sq("e5"), Color::Red);
        let kinds: Vec<PieceKind> = found.iter().map(|(_, unit)| unit.kind).collect();
        assert!(kinds.contains(&PieceKind::Tank));
        assert!(kinds.contains(&PieceKind::Navy));
    }

    #[test]
    fn exposure_on_open_file() {
        let pos = position(&[
            ("f1", red(PieceKind::Commander)),
            ("f12", blue(PieceKind::Commander)),
        ]);
        assert!(is_commander_exposed(pos.board(), Color::Red));
        assert!(is_commander_exposed(pos.board(), Color::Blue));

        let pos = position(&[
            ("f1", red(PieceKind::Commander)),
            ("f6", red(PieceKind::Infantry)),
            ("f12", blue(PieceKind::Commander)),
        ]);
        assert!(!is_commander_exposed(pos.board(), Color::Red));
        assert!(commander_in_sight(
            pos.board(),
            Color::Red,
            sq("f1"),
            Some(sq("f6"))
        ));
    }

    #[test]
    fn carried_commander_is_hidden() {
        let stack = red(PieceKind::Tank)
            .combine(red(PieceKind::Commander))
            .unwrap();
        let pos = position(&[("f1", stack), ("f12", blue(PieceKind::Commander))]);
        assert!(!is_commander_exposed(pos.board(), Color::Red));
        assert!(!is_commander_exposed(pos.board(), Color::Blue));
    }

    #[test]
    fn diagonal_alignment_is_not_exposure() {
        let pos = position(&[
            ("e1", red(PieceKind::Commander)),
            ("h4", blue(PieceKind::Commander)),
        ]);
        assert!(!is_commander_exposed(pos.board(), Color::Red));
    }
}
