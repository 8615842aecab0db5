//! Side identification.
//!
//! Othello has exactly two sides. `Black` moves first and is encoded as `+1`,
//! `White` as `-1`, matching the signed winner convention used for scoring.

use serde::{Deserialize, Serialize};

/// One of the two sides of an Othello game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// First mover, `+1`.
    Black,
    /// Second mover, `-1`.
    White,
}

impl Side {
    /// Both sides in move order.
    pub const ALL: [Side; 2] = [Side::Black, Side::White];

    /// Signed encoding: `+1` for Black, `-1` for White.
    #[inline]
    #[must_use]
    pub const fn sign(self) -> i8 {
        match self {
            Side::Black => 1,
            Side::White => -1,
        }
    }

    /// Array index: 0 for Black, 1 for White.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Side::Black => 0,
            Side::White => 1,
        }
    }

    /// The other side.
    #[inline]
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::Black => Side::White,
            Side::White => Side::Black,
        }
    }

    /// Decode the signed encoding. Returns `None` for anything but `±1`.
    #[must_use]
    pub const fn from_sign(sign: i8) -> Option<Self> {
        match sign {
            1 => Some(Side::Black),
            -1 => Some(Side::White),
            _ => None,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Black => write!(f, "Black"),
            Side::White => write!(f, "White"),
        }
    }
}
