//! Core types for the Co Tu Lenh board game.
//!
//! This crate provides the fundamental types used across the engine:
//! - [`Color`], [`PieceKind`] and [`Unit`] for individual pieces
//! - [`Piece`] for a carrier with its passengers
//! - [`Square`], [`File`], [`Rank`] and [`Direction`] for board coordinates
//! - [`Terrain`] for water, coast and land
//! - [`Move`] and [`MoveFlags`] for move representation

mod color;
mod mov;
mod piece;
mod square;
mod stack;
mod terrain;

pub use color::Color;
pub use mov::{Move, MoveFlags};
pub use piece::{PieceKind, Unit};
pub use square::{Direction, File, ParseSquareError, Rank, Square, FILE_COUNT, RANK_COUNT};
pub use stack::{carrier_slots, Piece, StackError, Units};
pub use terrain::Terrain;
