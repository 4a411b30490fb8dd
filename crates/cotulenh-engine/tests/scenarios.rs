//! End-to-end rule scenarios driven through `GameState`.

use cotulenh_engine::core::{Color, Move, Piece, PieceKind, Square};
use cotulenh_engine::{
    AirDefense, Board, EngineConfig, GameState, MoveFilter, MoveOutcome, RecombineOption,
};

fn sq(s: &str) -> Square {
    Square::from_algebraic(s).unwrap()
}

fn red(kind: PieceKind) -> Piece {
    Piece::new(kind, Color::Red)
}

fn blue(kind: PieceKind) -> Piece {
    Piece::new(kind, Color::Blue)
}

/// A game with both commanders out of each other's way plus `pieces`.
fn game_with(pieces: &[(&str, Piece)], turn: Color) -> GameState {
    let mut board = Board::empty();
    board.set(sq("g1"), Some(red(PieceKind::Commander))).unwrap();
    board.set(sq("h12"), Some(blue(PieceKind::Commander))).unwrap();
    for (square, piece) in pieces {
        board.set(sq(square), Some(*piece)).unwrap();
    }
    GameState::from_board(board, turn)
}

fn moves_from(game: &mut GameState, square: &str) -> Vec<Move> {
    game.moves_filtered(&MoveFilter::square(sq(square)))
        .into_iter()
        .collect()
}

#[test]
fn tank_cannot_pass_its_own_infantry() {
    let mut game = game_with(
        &[
            ("d3", red(PieceKind::Tank)),
            ("d4", red(PieceKind::Infantry)),
            ("d5", blue(PieceKind::Infantry)),
        ],
        Color::Red,
    );
    let moves = moves_from(&mut game, "d3");
    assert!(!moves.is_empty());
    assert!(
        moves.iter().all(|m| m.to() != sq("d5")),
        "d5 should be unreachable, got {:?}",
        moves
    );
}

#[test]
fn navy_shells_land_without_moving() {
    let mut game = game_with(
        &[("c3", red(PieceKind::Navy)), ("f3", blue(PieceKind::Tank))],
        Color::Red,
    );
    let capture = moves_from(&mut game, "c3")
        .into_iter()
        .find(|m| m.to() == sq("f3"))
        .unwrap();
    assert!(capture.is_stay_capture());

    assert_eq!(game.make_move(&capture), Ok(MoveOutcome::TurnComplete));
    assert_eq!(game.board().get(sq("c3")), Some(red(PieceKind::Navy)));
    assert_eq!(game.board().get(sq("f3")), None);
    assert_eq!(game.turn(), Color::Blue);
}

#[test]
fn air_force_strike_on_defended_navy_stays_home() {
    let mut game = game_with(
        &[
            ("d2", blue(PieceKind::AirForce)),
            ("b2", red(PieceKind::Navy)),
        ],
        Color::Blue,
    );
    let strikes: Vec<Move> = moves_from(&mut game, "d2")
        .into_iter()
        .filter(|m| m.to() == sq("b2"))
        .collect();
    assert_eq!(strikes.len(), 1);
    assert!(strikes[0].is_stay_capture());
    assert!(!strikes[0].is_suicide_capture());

    game.make_move(&strikes[0]).unwrap();
    assert_eq!(game.board().get(sq("d2")), Some(blue(PieceKind::AirForce)));
    assert_eq!(game.board().get(sq("b2")), None);
}

#[test]
fn air_force_catches_up_with_the_navy() {
    let stack = red(PieceKind::Navy)
        .combine(red(PieceKind::AirForce))
        .unwrap()
        .combine(red(PieceKind::Tank))
        .unwrap();
    let mut game = game_with(&[("c3", stack)], Color::Red);

    let step = |game: &mut GameState, kind: PieceKind, to: &str| {
        let mv = game
            .moves()
            .into_iter()
            .find(|m| m.is_deploy() && m.piece().kind() == kind && m.to() == sq(to))
            .unwrap();
        game.make_move(&mv).unwrap()
    };
    assert_eq!(
        step(&mut game, PieceKind::Navy, "c5"),
        MoveOutcome::DeployInProgress
    );
    assert_eq!(
        step(&mut game, PieceKind::Tank, "c4"),
        MoveOutcome::DeployInProgress
    );

    let outcome = game
        .recombine(RecombineOption {
            square: sq("c5"),
            kind: PieceKind::AirForce,
        })
        .unwrap();
    assert_eq!(outcome, MoveOutcome::TurnComplete);

    let navy = game.board().get(sq("c5")).unwrap();
    assert_eq!(navy.kind(), PieceKind::Navy);
    let passengers: Vec<PieceKind> = navy.passengers().map(|unit| unit.kind).collect();
    assert_eq!(passengers, vec![PieceKind::AirForce]);
    assert_eq!(game.board().get(sq("c4")), Some(red(PieceKind::Tank)));
    assert_eq!(game.board().get(sq("c3")), None);
    assert!(game.session().is_none());
    assert_eq!(game.turn(), Color::Blue);
}

#[test]
fn recombined_deploy_matches_direct_moves() {
    let stack = red(PieceKind::Navy)
        .combine(red(PieceKind::AirForce))
        .unwrap()
        .combine(red(PieceKind::Tank))
        .unwrap();
    let mut game = game_with(&[("c3", stack)], Color::Red);
    let expected = {
        let mut board = game.board().clone();
        board.remove(sq("c3"));
        board
            .set(
                sq("c5"),
                Some(red(PieceKind::Navy).combine(red(PieceKind::AirForce)).unwrap()),
            )
            .unwrap();
        board.set(sq("c4"), Some(red(PieceKind::Tank))).unwrap();
        board
    };

    for (kind, to) in [(PieceKind::Navy, "c5"), (PieceKind::Tank, "c4")] {
        let mv = game
            .moves()
            .into_iter()
            .find(|m| m.is_deploy() && m.piece().kind() == kind && m.to() == sq(to))
            .unwrap();
        game.make_move(&mv).unwrap();
    }
    game.recombine(RecombineOption {
        square: sq("c5"),
        kind: PieceKind::AirForce,
    })
    .unwrap();

    assert_eq!(game.board(), &expected);
    assert_eq!(game.history().len(), 1);
    assert_eq!(game.history()[0].played().len(), 2);
}

#[test]
fn defense_follows_a_moving_anti_air() {
    let mut game = game_with(&[("f5", red(PieceKind::AntiAir))], Color::Red);
    assert!(game.is_defended(sq("f4"), Color::Blue));
    assert!(!game.is_defended(sq("f7"), Color::Blue));

    let mv = moves_from(&mut game, "f5")
        .into_iter()
        .find(|m| m.to() == sq("f6"))
        .unwrap();
    game.make_move(&mv).unwrap();
    assert!(!game.is_defended(sq("f4"), Color::Blue));
    assert!(game.is_defended(sq("f7"), Color::Blue));

    game.undo().unwrap();
    assert!(game.is_defended(sq("f4"), Color::Blue));
    assert!(!game.is_defended(sq("f7"), Color::Blue));
}

#[test]
fn zones_are_current_after_a_quiet_move() {
    let mut game = game_with(&[("f5", red(PieceKind::AntiAir))], Color::Red);
    game.set_config(EngineConfig {
        heroic_promotion: false,
        ..EngineConfig::default()
    });
    let mv = moves_from(&mut game, "f5")
        .into_iter()
        .find(|m| m.to() == sq("f6"))
        .unwrap();
    game.make_move(&mv).unwrap();

    let mut position = game.position().clone();
    let fresh = AirDefense::build(position.board());
    assert_eq!(position.zones(), &fresh);
    assert!(position.is_defended(sq("f7"), Color::Blue));
    assert!(!position.is_defended(sq("f4"), Color::Blue));
}

#[test]
fn commander_may_not_face_the_enemy_commander() {
    let mut game = game_with(&[], Color::Red);
    let moves = moves_from(&mut game, "g1");
    assert!(moves.iter().all(|m| m.to().file_index() != sq("h1").file_index()));
    assert!(moves.iter().any(|m| m.to() == sq("f1")));
}
