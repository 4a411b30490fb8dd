//! Perft (performance test) for move generator validation.
//!
//! Perft counts the leaf nodes of the move tree at a given depth. Every
//! deploy step is a node of its own, so a deploy turn of three steps spans
//! three plies. The game is walked with make/undo and left as it was found.

use crate::GameState;

/// Counts the number of leaf nodes at the given depth.
pub fn perft(game: &mut GameState, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = game.moves();

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for m in &moves {
        if game.make_move(m).is_err() {
            continue;
        }
        nodes += perft(game, depth - 1);
        let undone = game.undo();
        debug_assert!(undone.is_ok(), "undo failed after {}", m);
    }
    nodes
}

/// Perft with divide - shows node count for each move at depth-1.
/// Useful for debugging to identify which moves have incorrect counts.
pub fn perft_divide(game: &mut GameState, depth: u32) -> Vec<(String, u64)> {
    let moves = game.moves();
    let mut results = Vec::with_capacity(moves.len());

    for m in &moves {
        if game.make_move(m).is_err() {
            continue;
        }
        let nodes = if depth > 1 {
            perft(game, depth - 1)
        } else {
            1
        };
        let undone = game.undo();
        debug_assert!(undone.is_ok(), "undo failed after {}", m);
        results.push((m.to_string(), nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Board;
    use cotulenh_core::{Color, Piece, PieceKind, Square};

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn perft_startpos_depth_1() {
        let mut game = GameState::new();
        let expected = game.moves().len() as u64;
        assert!(expected > 0);
        assert_eq!(perft(&mut game, 1), expected);
    }

    #[test]
    fn perft_is_symmetric_at_the_start() {
        // Blue's army mirrors Red's across the river.
        let mut game = GameState::new();
        let red = perft(&mut game, 1);
        let mut blue = GameState::from_board(Board::startpos(), Color::Blue);
        assert_eq!(perft(&mut blue, 1), red);
    }

    #[test]
    fn perft_leaves_the_game_untouched() {
        let mut game = GameState::new();
        let before = game.snapshot();
        let nodes = perft(&mut game, 2);
        assert!(nodes > 0);
        assert_eq!(game.snapshot(), before);
        assert!(game.history().is_empty());
    }

    #[test]
    fn deploy_steps_are_plies() {
        // A lone stack of navy and tank: the tank's deploy opens a session
        // whose only follow-ups are the navy's steps.
        let stack = Piece::new(PieceKind::Navy, Color::Red)
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
        let before = game.snapshot();

        let divide = perft_divide(&mut game, 2);
        assert_eq!(divide.iter().map(|(_, n)| n).sum::<u64>(), perft(&mut game, 2));
        assert!(divide.iter().any(|(mv, _)| mv.starts_with('>')));
        assert_eq!(game.snapshot(), before);
    }
}
