//! Rules engine for Co Tu Lenh.
//!
//! This crate provides:
//! - [`Board`] - piece placement on the 11x12 board with a commander index
//! - [`Position`] - the board plus its cached air-defense zones
//! - [`GameState`] - complete game management with history tracking
//! - [`DeploySession`] - multi-move turns that split a stack
//! - [`PieceRules`] - the per-kind movement table
//! - Move generation, legality checks and reversible move commands
//!
//! # Architecture
//!
//! Pieces and stacks live in `cotulenh-core`. Here, moves are generated by
//! casting rays per unit under the flags of [`PieceRules`]; candidate moves
//! are tried on the live position through [`ScopedChanges`], which undoes
//! them when dropped. Every change to the board goes through a
//! [`MoveCommand`], so any turn can be taken back exactly.
//!
//! # Example
//!
//! ```
//! use cotulenh_engine::{GameState, MoveOutcome};
//!
//! let mut game = GameState::new();
//! let moves = game.moves();
//! println!("Legal moves from the starting position: {}", moves.len());
//!
//! let first = moves[0];
//! assert_eq!(game.make_move(&first), Ok(MoveOutcome::TurnComplete));
//! game.undo().unwrap();
//! ```

mod air_defense;
mod board;
mod command;
mod config;
mod deploy;
mod error;
mod game;
pub mod legality;
pub mod movegen;
mod position;
pub mod rules;
mod snapshot;

pub use air_defense::{AirDefense, AirDefenseWalk, AirOutcome};
pub use board::Board;
pub use command::{MoveCommand, ScopedChanges, SquareChange};
pub use config::{ConfigError, EngineConfig};
pub use deploy::{DeploySession, Kinds, RecombineOption};
pub use error::GameError;
pub use game::{GameState, MoveOutcome, TurnMoves, TurnRecord};
pub use movegen::{generate_moves, MoveFilter, MoveList};
pub use position::Position;
pub use rules::{GameResult, PieceRules, WinReason};
pub use snapshot::{DeploySnapshot, PlacedPiece, Snapshot};

pub use cotulenh_core as core;
