//! The board engine: move application, turn passing and scoring.
//!
//! `Board` wraps a [`BoardState`] together with the cached game result. It
//! is `Copy`, so the search engine snapshots and restores it by assignment.

use serde::{Deserialize, Serialize};

use super::bitboard::{flips_for, LegalMoves, Move, BOARD_SIZE};
use super::state::{BoardError, BoardState};
use crate::core::{GameRng, Side};

/// Result of a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    /// One side has more discs.
    Winner(Side),
    /// Equal disc counts.
    Draw,
}

impl GameResult {
    /// Result from a Black-minus-White disc difference.
    #[must_use]
    pub const fn from_difference(difference: i32) -> Self {
        if difference > 0 {
            GameResult::Winner(Side::Black)
        } else if difference < 0 {
            GameResult::Winner(Side::White)
        } else {
            GameResult::Draw
        }
    }

    /// Signed winner: `+1` Black, `-1` White, `0` draw.
    #[must_use]
    pub const fn sign(self) -> i8 {
        match self {
            GameResult::Winner(side) => side.sign(),
            GameResult::Draw => 0,
        }
    }

    /// Check if `side` won.
    #[must_use]
    pub fn is_winner(self, side: Side) -> bool {
        self == GameResult::Winner(side)
    }
}

impl std::fmt::Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameResult::Winner(side) => write!(f, "{} wins", side),
            GameResult::Draw => write!(f, "Draw"),
        }
    }
}

/// Othello board engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Board {
    state: BoardState,
    result: Option<GameResult>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// A board at the starting position.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: BoardState::initial(),
            result: None,
        }
    }

    /// A board bound to `state`.
    ///
    /// Fails if the state breaks the layout invariants, or if the side to
    /// move has no legal move while the opponent has one (a pass that was
    /// never applied).
    pub fn from_state(state: BoardState) -> Result<Self, BoardError> {
        let mut board = Self::new();
        board.set_state(state)?;
        Ok(board)
    }

    /// Return to the starting position.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Copy of the current state.
    #[must_use]
    pub const fn get_state(&self) -> BoardState {
        self.state
    }

    /// Replace the current state with a copy of `state`.
    ///
    /// The terminal flag is recomputed from the position. On error the
    /// board is left unchanged.
    pub fn set_state(&mut self, state: BoardState) -> Result<(), BoardError> {
        state.validate()?;

        let result = if !state.legal_moves().is_empty() {
            None
        } else if state.legal_moves_for(state.turn().opponent()).is_empty() {
            Some(GameResult::from_difference(state.disc_difference()))
        } else {
            return Err(BoardError::StrandedTurn(state.turn()));
        };

        self.state = state;
        self.result = result;
        Ok(())
    }

    /// Side to move.
    #[inline]
    #[must_use]
    pub const fn turn(&self) -> Side {
        self.state.turn()
    }

    /// Disc count for `side`.
    #[must_use]
    pub const fn count(&self, side: Side) -> u32 {
        self.state.count(side)
    }

    /// Check if every cell is occupied.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.state.is_full()
    }

    /// Check if neither side can move.
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.result.is_some()
    }

    /// Final result, or `None` while the game continues.
    #[inline]
    #[must_use]
    pub const fn winner(&self) -> Option<GameResult> {
        self.result
    }

    /// Legal moves for the side to move, per direction and combined.
    #[must_use]
    pub fn legal_moves(&self) -> LegalMoves {
        self.state.legal_moves()
    }

    /// Legal moves for the side to move, in ascending position order.
    #[must_use]
    pub fn legal_move_list(&self) -> Vec<Move> {
        self.legal_moves().iter().collect()
    }

    /// Check if `mv` is legal for the side to move.
    #[must_use]
    pub fn is_legal(&self, mv: Move) -> bool {
        self.legal_moves().contains(mv)
    }

    /// Play `mv` for the side to move and return the move actually played.
    ///
    /// If `mv` is not legal (including [`Move::NONE`]) a legal move is drawn
    /// uniformly from `rng` instead. Use [`Board::try_play`] when an illegal
    /// request should be an error.
    ///
    /// # Panics
    ///
    /// Panics if the game is over, or if the side to move has no legal move
    /// on a board that is not terminal. The latter means the turn/pass
    /// bookkeeping is corrupt.
    pub fn play(&mut self, mv: Move, rng: &mut GameRng) -> Move {
        let moves = self.checked_moves();
        let mv = if moves.contains(mv) {
            mv
        } else {
            Self::random_from(&moves, rng)
        };
        self.apply(mv, &moves);
        mv
    }

    /// Play a uniformly random legal move and return it.
    ///
    /// Same distribution as `play(Move::NONE, rng)`.
    ///
    /// # Panics
    ///
    /// Same conditions as [`Board::play`].
    pub fn play_random(&mut self, rng: &mut GameRng) -> Move {
        let moves = self.checked_moves();
        let mv = Self::random_from(&moves, rng);
        self.apply(mv, &moves);
        mv
    }

    /// Play `mv`, rejecting illegal moves instead of substituting one.
    pub fn try_play(&mut self, mv: Move) -> Result<(), BoardError> {
        if self.is_terminal() {
            return Err(BoardError::GameOver);
        }
        let moves = self.legal_moves();
        if !moves.contains(mv) {
            return Err(BoardError::IllegalMove(mv));
        }
        self.apply(mv, &moves);
        Ok(())
    }

    /// Owner of a cell, if any.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<Side> {
        self.state.cell(row, col)
    }

    /// Grid rendering with legal moves marked `*`.
    #[must_use]
    pub fn render_with_moves(&self) -> String {
        let moves = self.legal_moves();
        let mut out = String::with_capacity(BOARD_SIZE * BOARD_SIZE * 2);
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let c = match self.cell(row, col) {
                    Some(Side::Black) => 'X',
                    Some(Side::White) => 'O',
                    None => match Move::from_coords(row, col) {
                        Some(mv) if !self.is_terminal() && moves.contains(mv) => '*',
                        _ => '.',
                    },
                };
                out.push(c);
                out.push(if col + 1 < BOARD_SIZE { ' ' } else { '\n' });
            }
        }
        out
    }

    fn checked_moves(&self) -> LegalMoves {
        assert!(!self.is_terminal(), "cannot play on a finished game");
        let moves = self.legal_moves();
        assert!(
            !moves.is_empty(),
            "{} to move has no legal move on a non-terminal board",
            self.turn()
        );
        moves
    }

    fn random_from(moves: &LegalMoves, rng: &mut GameRng) -> Move {
        match rng.choose_bit(moves.all) {
            Some(position) => Move::new(position as u8),
            None => unreachable!("caller checked for an empty move set"),
        }
    }

    /// Place, flip, then hand the turn over (or back, on a pass).
    fn apply(&mut self, mv: Move, moves: &LegalMoves) {
        let side = self.state.turn();
        let mover = self.state.discs(side) | mv.bit();
        let opponent = self.state.discs(side.opponent());
        let flipped = flips_for(mv, mover, opponent, moves);

        self.state.set_discs(side, mover | flipped);
        self.state.set_discs(side.opponent(), opponent & !flipped);
        self.advance_turn();
    }

    fn advance_turn(&mut self) {
        let next = self.state.turn().opponent();
        self.state.set_turn(next);
        if !self.state.legal_moves().is_empty() {
            return;
        }

        // Pass: the other side moves again
        self.state.set_turn(next.opponent());
        if self.state.legal_moves().is_empty() {
            self.result = Some(GameResult::from_difference(self.state.disc_difference()));
        }
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.state)
    }
}
