//! Ray casting for a single piece.
//!
//! Every rule difference between kinds comes from [`PieceRules`]; this file
//! only walks squares and applies the flags.

use super::attacks::commander_in_sight;
use super::MoveList;
use crate::air_defense::AirOutcome;
use crate::rules::PieceRules;
use crate::Position;
use cotulenh_core::{Direction, Move, MoveFlags, Piece, PieceKind, Square};

/// Generates the moves of `piece` standing on (or deploying from) `from`.
pub(crate) fn piece_moves(
    position: &Position,
    from: Square,
    piece: Piece,
    deploy: bool,
    moves: &mut MoveList,
) {
    let rules = PieceRules::for_unit(piece.carrier());
    for &direction in rules.directions() {
        ray_moves(position, from, piece, direction, deploy, moves);
    }
}

/// Generates the moves of `piece` along one direction.
pub(crate) fn ray_moves(
    position: &Position,
    from: Square,
    piece: Piece,
    direction: Direction,
    deploy: bool,
    moves: &mut MoveList,
) {
    let board = position.board();
    let color = piece.color();
    let rules = PieceRules::for_unit(piece.carrier());
    let heavy = piece
        .units()
        .iter()
        .any(|unit| PieceRules::base(unit.kind).heavy);
    let move_range = rules.move_range_toward(direction);
    let reach = rules.reach_toward(direction);
    let base_flags = if deploy {
        MoveFlags::DEPLOY
    } else {
        MoveFlags::NONE
    };

    // The origin is empty after the move only if the whole piece leaves.
    let vacated = board
        .get(from)
        .is_some_and(|origin| origin.len() == piece.len())
        .then_some(from);
    let exposed = |square: Square| {
        rules.flying_general && commander_in_sight(board, color, square, vacated)
    };
    let air_safe = |distance: u8, exclude: Option<Square>| {
        !rules.air_defense_gated
            || position
                .air_defense()
                .flight(from, direction, distance, color, exclude)
                == AirOutcome::SafePass
    };

    let mut previous = from;
    let mut distance = 0u8;
    let mut piece_blocked = false;
    let mut terrain_blocked = false;

    while distance < reach {
        let Some(current) = previous.offset(direction) else {
            break;
        };
        distance += 1;

        let terrain = current.terrain();
        let standable = piece.can_stand_on(terrain);
        if !rules.ignores_terrain {
            if !standable && !rules.shoots_over_terrain {
                terrain_blocked = true;
            }
            if heavy && previous.crosses_river(current) && !previous.is_bridge_step(current) {
                terrain_blocked = true;
            }
        }

        match board.get(current) {
            None => {
                if distance <= move_range
                    && !piece_blocked
                    && !terrain_blocked
                    && standable
                    && air_safe(distance, None)
                    && !exposed(current)
                {
                    moves.push(Move::new(color, from, current, piece, None, base_flags));
                }
            }
            Some(target) if target.color() != color => {
                let target_is_navy = target.kind() == PieceKind::Navy;
                let capture_range = rules.capture_range_toward(direction, target_is_navy);
                if distance <= capture_range && (!piece_blocked || rules.capture_ignores_blocking)
                {
                    let can_occupy = distance <= move_range
                        && standable
                        && !terrain_blocked
                        && (!piece_blocked || rules.move_ignores_blocking)
                        && !exposed(current);
                    push_captures(
                        moves,
                        Move::new(color, from, current, piece, Some(target), base_flags),
                        &rules,
                        can_occupy,
                        deploy,
                        || {
                            position.air_defense().flight(
                                from,
                                direction,
                                distance,
                                color,
                                Some(current),
                            )
                        },
                    );
                }
                if !rules.move_ignores_blocking {
                    piece_blocked = true;
                }
            }
            Some(target) => {
                if distance <= move_range && !piece_blocked && !terrain_blocked {
                    if let Ok(combined) = target.combine(piece) {
                        if combined.can_stand_on(terrain) && air_safe(distance, None) {
                            moves.push(Move::new(
                                color,
                                from,
                                current,
                                piece,
                                None,
                                base_flags.with(MoveFlags::COMBINATION),
                            ));
                        }
                    }
                }
                if !rules.move_ignores_blocking {
                    piece_blocked = true;
                }
            }
        }

        if piece_blocked && !rules.capture_ignores_blocking {
            break;
        }
        previous = current;
    }
}

/// Emits the capture shapes allowed for one target.
fn push_captures(
    moves: &mut MoveList,
    template: Move,
    rules: &PieceRules,
    can_occupy: bool,
    deploy: bool,
    flight: impl FnOnce() -> AirOutcome,
) {
    let base = template.flags();
    let shaped = |shape: MoveFlags| {
        Move::new(
            template.color(),
            template.from(),
            template.to(),
            template.piece(),
            template.captured(),
            base.with(shape),
        )
    };

    if !rules.air_defense_gated {
        if can_occupy {
            moves.push(shaped(MoveFlags::CAPTURE));
        } else {
            moves.push(shaped(MoveFlags::STAY_CAPTURE));
        }
        return;
    }

    match flight() {
        AirOutcome::SafePass => {
            if can_occupy {
                moves.push(shaped(MoveFlags::CAPTURE));
            }
            if !can_occupy || (!deploy && rules.both_capture_shapes) {
                moves.push(shaped(MoveFlags::STAY_CAPTURE));
            }
        }
        AirOutcome::Kamikaze => moves.push(shaped(MoveFlags::SUICIDE_CAPTURE)),
        AirOutcome::Destroyed => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Board;
    use cotulenh_core::{Color, Unit};

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

    fn moves_from(position: &Position, square: &str) -> Vec<Move> {
        let mut moves = MoveList::new();
        let piece = position.board().get(sq(square)).unwrap();
        piece_moves(position, sq(square), piece, false, &mut moves);
        moves.into_iter().collect()
    }

    fn targets(moves: &[Move]) -> Vec<String> {
        let mut squares: Vec<String> = moves.iter().map(|m| m.to().to_string()).collect();
        squares.sort();
        squares
    }

    #[test]
    fn infantry_steps_orthogonally() {
        let pos = position(&[("f5", PieceKind::Infantry, Color::Red)]);
        let moves = moves_from(&pos, "f5");
        assert_eq!(targets(&moves), vec!["e5", "f4", "f6", "g5"]);
    }

    #[test]
    fn heroic_infantry_gains_diagonals() {
        let mut board = Board::empty();
        board
            .set(
                sq("f5"),
                Some(Piece::single(Unit::heroic(PieceKind::Infantry, Color::Red))),
            )
            .unwrap();
        let pos = Position::new(board);
        let moves = moves_from(&pos, "f5");
        assert!(moves.iter().any(|m| m.to() == sq("g6")));
        assert!(moves.iter().any(|m| m.to() == sq("f7")));
    }

    #[test]
    fn tank_is_blocked_by_adjacent_friend() {
        let pos = position(&[
            ("d3", PieceKind::Tank, Color::Red),
            ("d4", PieceKind::Infantry, Color::Red),
            ("d5", PieceKind::Infantry, Color::Blue),
        ]);
        let moves = moves_from(&pos, "d3");
        assert!(moves.iter().all(|m| m.to() != sq("d5")));
        assert!(moves
            .iter()
            .any(|m| m.to() == sq("d4") && m.is_combination()));
    }

    #[test]
    fn navy_stays_when_shelling_land() {
        let pos = position(&[
            ("c3", PieceKind::Navy, Color::Red),
            ("f3", PieceKind::Tank, Color::Blue),
        ]);
        let moves = moves_from(&pos, "c3");
        let captures: Vec<&Move> = moves.iter().filter(|m| m.is_capture()).collect();
        assert_eq!(captures.len(), 1);
        assert!(captures[0].is_stay_capture());
        assert_eq!(captures[0].to(), sq("f3"));
        // Navy cannot move onto land.
        assert!(moves
            .iter()
            .filter(|m| !m.is_capture())
            .all(|m| m.to().terrain().admits_naval()));
    }

    #[test]
    fn naval_gun_is_one_short() {
        let pos = position(&[
            ("c3", PieceKind::Navy, Color::Red),
            ("g3", PieceKind::Tank, Color::Blue),
        ]);
        let moves = moves_from(&pos, "c3");
        assert!(moves.iter().all(|m| !m.is_capture()));

        let pos = position(&[
            ("b3", PieceKind::Navy, Color::Red),
            ("b7", PieceKind::Navy, Color::Blue),
        ]);
        let moves = moves_from(&pos, "b3");
        assert!(moves
            .iter()
            .any(|m| m.to() == sq("b7") && m.flags().contains(MoveFlags::CAPTURE)));
    }

    #[test]
    fn artillery_fires_over_blockers() {
        let pos = position(&[
            ("f3", PieceKind::Artillery, Color::Red),
            ("f4", PieceKind::Infantry, Color::Red),
            ("f6", PieceKind::Infantry, Color::Blue),
        ]);
        let moves = moves_from(&pos, "f3");
        let capture = moves.iter().find(|m| m.to() == sq("f6")).unwrap();
        assert!(capture.is_stay_capture());
        assert!(moves.iter().all(|m| m.to() != sq("f5")));
    }

    #[test]
    fn heavy_units_cross_only_on_bridges() {
        let pos = position(&[
            ("f6", PieceKind::Artillery, Color::Red),
            ("g6", PieceKind::Artillery, Color::Red),
        ]);
        let over_bridge = moves_from(&pos, "f6");
        assert!(over_bridge.iter().any(|m| m.to() == sq("f7")));
        assert!(over_bridge.iter().all(|m| m.to() != sq("e7")));

        let off_bridge = moves_from(&pos, "g6");
        assert!(off_bridge.iter().all(|m| m.to().rank_index() <= 5));
    }

    #[test]
    fn air_force_strikes_defended_navy_from_its_edge() {
        let pos = position(&[
            ("d2", PieceKind::AirForce, Color::Blue),
            ("b2", PieceKind::Navy, Color::Red),
        ]);
        let moves = moves_from(&pos, "d2");
        let strikes: Vec<&Move> = moves.iter().filter(|m| m.to() == sq("b2")).collect();
        assert_eq!(strikes.len(), 1);
        assert!(strikes[0].is_stay_capture());
        // c2 is inside the navy zone.
        assert!(moves.iter().all(|m| m.to() != sq("c2")));
    }

    #[test]
    fn air_force_suicide_into_second_defender_zone() {
        let pos = position(&[
            ("f2", PieceKind::AirForce, Color::Blue),
            ("f5", PieceKind::Infantry, Color::Red),
            ("g5", PieceKind::AntiAir, Color::Red),
        ]);
        let moves = moves_from(&pos, "f2");
        let strike = moves.iter().find(|m| m.to() == sq("f5")).unwrap();
        assert!(strike.is_suicide_capture());
        assert!(moves.iter().all(|m| m.to() != sq("f6")));
    }

    #[test]
    fn air_force_takes_both_shapes_on_land() {
        let pos = position(&[
            ("f2", PieceKind::AirForce, Color::Blue),
            ("f5", PieceKind::Infantry, Color::Red),
        ]);
        let moves = moves_from(&pos, "f2");
        let shapes: Vec<MoveFlags> = moves
            .iter()
            .filter(|m| m.to() == sq("f5"))
            .map(|m| m.flags())
            .collect();
        assert_eq!(shapes, vec![MoveFlags::CAPTURE, MoveFlags::STAY_CAPTURE]);
    }

    #[test]
    fn commander_avoids_open_file() {
        let pos = position(&[
            ("f1", PieceKind::Commander, Color::Red),
            ("g12", PieceKind::Commander, Color::Blue),
        ]);
        let moves = moves_from(&pos, "f1");
        assert!(moves.iter().all(|m| m.to() != sq("g1")));
        assert!(!moves.iter().any(|m| m.to() == sq("f12")));
        assert!(moves.iter().any(|m| m.to() == sq("e1")));
        assert!(moves.iter().any(|m| m.to() == sq("f11")));
    }
}
