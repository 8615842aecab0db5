//! Plain board state: two disc masks and the side to move.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::bitboard::{cell_index, generate_moves, LegalMoves, Move, BOARD_SIZE, IN_BOARD_MASK};
use crate::core::Side;

/// Errors raised when a board state or a strict move request is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("disc masks overlap: {0:#x}")]
    Overlap(u128),

    #[error("discs set outside the board: {0:#x}")]
    OffBoard(u128),

    #[error("{0} to move has no legal move while the opponent does")]
    StrandedTurn(Side),

    #[error("illegal move {0}")]
    IllegalMove(Move),

    #[error("game is already over")]
    GameOver,
}

/// Snapshot of a position.
///
/// `Copy`: snapshots never alias each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardState {
    /// Disc masks indexed by [`Side::index`].
    discs: [u128; 2],
    turn: Side,
}

impl Default for BoardState {
    fn default() -> Self {
        Self::initial()
    }
}

impl BoardState {
    /// The standard starting position, Black to move.
    #[must_use]
    pub const fn initial() -> Self {
        let black = (1u128 << cell_index(4, 3)) | (1u128 << cell_index(3, 4));
        let white = (1u128 << cell_index(3, 3)) | (1u128 << cell_index(4, 4));
        Self {
            discs: [black, white],
            turn: Side::Black,
        }
    }

    /// Build a state from raw masks, checking the layout invariants.
    pub fn new(black: u128, white: u128, turn: Side) -> Result<Self, BoardError> {
        let state = Self {
            discs: [black, white],
            turn,
        };
        state.validate()?;
        Ok(state)
    }

    /// Check that the masks are disjoint and stay on the board.
    pub fn validate(&self) -> Result<(), BoardError> {
        let [black, white] = self.discs;
        let overlap = black & white;
        if overlap != 0 {
            return Err(BoardError::Overlap(overlap));
        }
        let off_board = (black | white) & !IN_BOARD_MASK;
        if off_board != 0 {
            return Err(BoardError::OffBoard(off_board));
        }
        Ok(())
    }

    /// Side to move.
    #[inline]
    #[must_use]
    pub const fn turn(&self) -> Side {
        self.turn
    }

    /// Disc mask for `side`.
    #[inline]
    #[must_use]
    pub const fn discs(&self, side: Side) -> u128 {
        self.discs[side.index()]
    }

    /// Disc mask of the side to move.
    #[inline]
    #[must_use]
    pub const fn mover_discs(&self) -> u128 {
        self.discs(self.turn)
    }

    /// Disc mask of the side not to move.
    #[inline]
    #[must_use]
    pub const fn opponent_discs(&self) -> u128 {
        self.discs(self.turn.opponent())
    }

    /// Occupied cells.
    #[inline]
    #[must_use]
    pub const fn occupied(&self) -> u128 {
        self.discs[0] | self.discs[1]
    }

    /// Disc count for `side`.
    #[must_use]
    pub const fn count(&self, side: Side) -> u32 {
        self.discs(side).count_ones()
    }

    /// Black count minus White count.
    #[must_use]
    pub const fn disc_difference(&self) -> i32 {
        self.count(Side::Black) as i32 - self.count(Side::White) as i32
    }

    /// Check if every cell is occupied.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.occupied() == IN_BOARD_MASK
    }

    /// Owner of a cell, if any.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<Side> {
        let mv = Move::from_coords(row, col)?;
        Side::ALL.into_iter().find(|&side| self.discs(side) & mv.bit() != 0)
    }

    /// Legal moves for the side to move.
    #[must_use]
    pub fn legal_moves(&self) -> LegalMoves {
        self.legal_moves_for(self.turn)
    }

    /// Legal moves for `side`, regardless of whose turn it is.
    #[must_use]
    pub fn legal_moves_for(&self, side: Side) -> LegalMoves {
        generate_moves(self.discs(side), self.discs(side.opponent()))
    }

    pub(crate) fn set_discs(&mut self, side: Side, mask: u128) {
        self.discs[side.index()] = mask;
    }

    pub(crate) fn set_turn(&mut self, turn: Side) {
        self.turn = turn;
    }
}

impl std::fmt::Display for BoardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let c = match self.cell(row, col) {
                    Some(Side::Black) => 'X',
                    Some(Side::White) => 'O',
                    None => '.',
                };
                write!(f, "{}", c)?;
                if col + 1 < BOARD_SIZE {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_position() {
        let state = BoardState::initial();
        assert_eq!(state.turn(), Side::Black);
        assert_eq!(state.discs(Side::Black), (1 << 30) | (1 << 40));
        assert_eq!(state.discs(Side::White), (1 << 31) | (1 << 39));
        assert_eq!(state.count(Side::Black), 2);
        assert_eq!(state.count(Side::White), 2);
        assert_eq!(state.disc_difference(), 0);
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_cells() {
        let state = BoardState::initial();
        assert_eq!(state.cell(3, 3), Some(Side::White));
        assert_eq!(state.cell(3, 4), Some(Side::Black));
        assert_eq!(state.cell(4, 3), Some(Side::Black));
        assert_eq!(state.cell(4, 4), Some(Side::White));
        assert_eq!(state.cell(0, 0), None);
        assert_eq!(state.cell(9, 0), None);
    }

    #[test]
    fn test_new_rejects_overlap() {
        let err = BoardState::new(1 << 30, (1 << 30) | (1 << 31), Side::Black).unwrap_err();
        assert_eq!(err, BoardError::Overlap(1 << 30));
    }

    #[test]
    fn test_new_rejects_off_board() {
        // Bit 8 is the sentinel of column 0
        let err = BoardState::new(1 << 8, 0, Side::Black).unwrap_err();
        assert_eq!(err, BoardError::OffBoard(1 << 8));

        let err = BoardState::new(0, 1 << 72, Side::White).unwrap_err();
        assert_eq!(err, BoardError::OffBoard(1 << 72));
    }

    #[test]
    fn test_mover_and_opponent() {
        let state = BoardState::new(1 << 30, 1 << 31, Side::White).unwrap();
        assert_eq!(state.mover_discs(), 1 << 31);
        assert_eq!(state.opponent_discs(), 1 << 30);
    }

    #[test]
    fn test_full_board() {
        let state = BoardState::new(IN_BOARD_MASK, 0, Side::Black).unwrap();
        assert!(state.is_full());
        assert!(!BoardState::initial().is_full());
    }

    #[test]
    fn test_display() {
        let rendered = format!("{}", BoardState::initial());
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[3], ". . . O X . . .");
        assert_eq!(lines[4], ". . . X O . . .");
    }
}
