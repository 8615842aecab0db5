//! Bit-packed Othello board engine.
//!
//! ## Overview
//!
//! - [`bitboard`]: 9×8 bit layout, directions, flood-fill move generation
//!   and disc flipping
//! - [`state`]: [`BoardState`], the copyable position snapshot
//! - [`engine`]: [`Board`], which applies moves, handles passes and scores
//!   finished games
//!
//! ## Usage
//!
//! ```
//! use othello_mcts::board::{Board, Move};
//! use othello_mcts::core::{GameRng, Side};
//!
//! let mut board = Board::new();
//! let mut rng = GameRng::new(7);
//!
//! assert_eq!(board.legal_moves().len(), 4);
//!
//! // Illegal or sentinel requests fall back to a random legal move
//! let played = board.play(Move::NONE, &mut rng);
//! assert!(!played.is_none());
//! assert_eq!(board.turn(), Side::White);
//! ```

pub mod bitboard;
pub mod engine;
pub mod state;

pub use bitboard::{
    flips_for, generate_moves, render_mask, Direction, LegalMoves, Move, MoveIter, DIRECTIONS,
    IN_BOARD_MASK,
};
pub use engine::{Board, GameResult};
pub use state::{BoardError, BoardState};
