//! Core grid module - board storage, piece geometry, and randomness
//!
//! This crate holds the collaborators the placement solver works against. It has
//! **zero dependencies** on rendering or I/O:
//!
//! - **Deterministic**: a seeded [`LcgRandom`] reproduces the same shuffles
//! - **Testable**: every board operation is a pure in-memory mutation
//! - **Small**: a 10x20 board is a flat `Vec` of 200 cells
//!
//! # Module Structure
//!
//! - [`board`]: generic grid with piece add/remove, row queries, and row clearing
//! - [`pieces`]: tetromino rotation shapes and the piece catalog trait
//! - [`rng`]: the random source trait with seeded and system implementations
//!
//! # Example
//!
//! ```
//! use infinitetris_core::{Board, PieceCatalog, StandardPieces};
//! use infinitetris_core::types::{Point, Size};
//!
//! let mut board = Board::new(Size::new(10, 20));
//! let i_piece = StandardPieces.piece(0);
//! let flat = &i_piece.rotations[0];
//!
//! assert!(board.add_piece(flat, Point::new(0, 19)));
//! assert_eq!(board.filled_height(), 1);
//!
//! board.remove_piece(flat, Point::new(0, 19));
//! assert_eq!(board.filled_count(), 0);
//! ```

pub mod board;
pub mod pieces;
pub mod rng;

pub use infinitetris_types as types;

pub use board::{Board, Grid};
pub use pieces::{Piece, PieceCatalog, RotationShape, StandardPieces};
pub use rng::{LcgRandom, RandomSource, SystemRandom};
