//! Bit-packed board layout and the flood-fill primitives.
//!
//! ## Layout
//!
//! The 8×8 board is stored in the low 72 bits of a `u128`, as eight groups of
//! nine bits. Group `col` holds column `col`; inside a group, bit `7 - row`
//! holds row `row` (row 0 is the top of the board). The ninth bit of every
//! group is a sentinel that is never set, so a one-bit shift cannot carry a
//! disc from the bottom of one column into the top of the next.
//!
//! ```text
//! cell (row, col)  ->  bit col * 9 + 7 - row
//! ```
//!
//! The four axes are shift widths 1 (vertical), 9 (horizontal), 8 and 10
//! (diagonals), each taken in both shift senses. Shifts that leave the
//! board either fall on a sentinel bit or past bit 71, and every step is
//! masked with [`IN_BOARD_MASK`].

use serde::{Deserialize, Serialize};

/// Number of rows and columns.
pub const BOARD_SIZE: usize = 8;

/// Bits per column group, including the sentinel.
pub const GROUP_WIDTH: u32 = 9;

/// Total bits in the layout.
pub const LAYOUT_BITS: u32 = 72;

/// Mask of the 64 valid cells.
pub const IN_BOARD_MASK: u128 = 0x7f_bfdf_eff7_fbfd_feff;

/// Bit index of a cell.
#[inline]
#[must_use]
pub const fn cell_index(row: usize, col: usize) -> u32 {
    (col as u32) * GROUP_WIDTH + 7 - row as u32
}

/// A board position in `0..72`, or the [`Move::NONE`] sentinel.
///
/// Positions that fall on a sentinel bit are representable but never legal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Move(pub u8);

impl Move {
    /// Sentinel: no explicit target, the board picks a random legal move.
    pub const NONE: Move = Move(LAYOUT_BITS as u8);

    /// Create a move from a raw bit index.
    #[must_use]
    pub const fn new(position: u8) -> Self {
        Self(position)
    }

    /// Create a move from grid coordinates. Returns `None` off the board.
    #[must_use]
    pub const fn from_coords(row: usize, col: usize) -> Option<Self> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(Self(cell_index(row, col) as u8))
        } else {
            None
        }
    }

    /// Grid coordinates `(row, col)`, or `None` for the sentinel and for
    /// sentinel-bit positions.
    #[must_use]
    pub const fn coords(self) -> Option<(usize, usize)> {
        if self.0 as u32 >= LAYOUT_BITS {
            return None;
        }
        let col = self.0 as u32 / GROUP_WIDTH;
        let offset = self.0 as u32 % GROUP_WIDTH;
        if offset > 7 {
            return None;
        }
        Some(((7 - offset) as usize, col as usize))
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 as u32 >= LAYOUT_BITS
    }

    /// Get the raw position.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Single-bit mask for this position; zero for the sentinel.
    #[inline]
    #[must_use]
    pub const fn bit(self) -> u128 {
        if self.is_none() {
            0
        } else {
            1u128 << self.0
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.coords() {
            Some((row, col)) => write!(f, "{}{}", (b'a' + col as u8) as char, BOARD_SIZE - row),
            None if self.is_none() => write!(f, "Move(NONE)"),
            None => write!(f, "Move(#{})", self.0),
        }
    }
}

/// One of the eight flood-fill directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Direction {
    /// Shift width: 1, 8, 9 or 10.
    pub shift: u32,
    /// `true` for right shifts (towards bit 0).
    pub downward: bool,
}

impl Direction {
    const fn new(shift: u32, downward: bool) -> Self {
        Self { shift, downward }
    }

    /// Move every bit of `mask` one step along this direction.
    #[inline]
    #[must_use]
    pub const fn step(self, mask: u128) -> u128 {
        if self.downward {
            mask >> self.shift
        } else {
            mask << self.shift
        }
    }

    /// Same axis, opposite sense.
    #[inline]
    #[must_use]
    pub const fn reverse(self) -> Self {
        Self::new(self.shift, !self.downward)
    }
}

/// All eight directions: the four axes shifted down, then shifted up.
pub const DIRECTIONS: [Direction; 8] = [
    Direction::new(1, true),
    Direction::new(8, true),
    Direction::new(9, true),
    Direction::new(10, true),
    Direction::new(1, false),
    Direction::new(8, false),
    Direction::new(9, false),
    Direction::new(10, false),
];

/// Legal moves for one side, kept per direction for flipping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LegalMoves {
    /// Moves found along each of [`DIRECTIONS`].
    pub by_direction: [u128; 8],
    /// Union of all directions.
    pub all: u128,
}

impl LegalMoves {
    /// Check if `mv` is legal.
    #[inline]
    #[must_use]
    pub const fn contains(&self, mv: Move) -> bool {
        self.all & mv.bit() != 0
    }

    /// Check if there are no legal moves.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.all == 0
    }

    /// Number of legal moves.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.all.count_ones() as usize
    }

    /// Iterate legal moves in ascending position order.
    pub fn iter(&self) -> MoveIter {
        MoveIter { bits: self.all }
    }
}

/// Flood-fill move generation.
///
/// For each direction, start from the mover's discs stepped once onto
/// adjacent opponent discs, then keep stepping through opponent discs. The
/// first empty in-board cell reached after at least one opponent disc is a
/// legal move.
#[must_use]
pub fn generate_moves(mover: u128, opponent: u128) -> LegalMoves {
    let mut moves = LegalMoves::default();

    for (i, dir) in DIRECTIONS.iter().enumerate() {
        let mut found = 0;
        let mut frontier = opponent & dir.step(mover);
        while frontier != 0 {
            frontier = dir.step(frontier) & !mover & IN_BOARD_MASK;
            let empty = frontier & !opponent;
            frontier &= !empty;
            found |= empty;
        }
        moves.by_direction[i] = found;
        moves.all |= found;
    }

    moves
}

/// Discs flipped by playing `mv`, given the moves generated for the mover.
///
/// Walks back from `mv` along every direction that produced it, collecting
/// opponent discs until the run ends at one of the mover's discs.
#[must_use]
pub fn flips_for(mv: Move, mover: u128, opponent: u128, moves: &LegalMoves) -> u128 {
    let origin = mv.bit();
    let mut flipped = 0;

    for (i, dir) in DIRECTIONS.iter().enumerate() {
        if moves.by_direction[i] & origin == 0 {
            continue;
        }
        let back = dir.reverse();
        let mut cursor = origin;
        loop {
            cursor = back.step(cursor) & !mover & opponent & IN_BOARD_MASK;
            if cursor == 0 {
                break;
            }
            flipped |= cursor;
        }
    }

    flipped
}

/// Iterator over the set bits of a mask, as moves.
#[derive(Clone, Debug)]
pub struct MoveIter {
    bits: u128,
}

impl MoveIter {
    /// Iterate the set bits of `bits`.
    #[must_use]
    pub const fn new(bits: u128) -> Self {
        Self { bits }
    }
}

impl Iterator for MoveIter {
    type Item = Move;

    fn next(&mut self) -> Option<Move> {
        if self.bits == 0 {
            return None;
        }
        let position = self.bits.trailing_zeros();
        self.bits &= self.bits - 1;
        Some(Move(position as u8))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.bits.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for MoveIter {}

/// Render a raw 72-bit mask as a grid for debugging.
///
/// The first line is the sentinel bit of each column, followed by the eight
/// board rows from top to bottom.
#[must_use]
pub fn render_mask(mask: u128) -> String {
    let mut out = String::with_capacity(10 * 17);
    for offset in (0..GROUP_WIDTH).rev() {
        for col in 0..BOARD_SIZE as u32 {
            let bit = col * GROUP_WIDTH + offset;
            out.push(if mask >> bit & 1 == 1 { '1' } else { '0' });
            if col + 1 < BOARD_SIZE as u32 {
                out.push(' ');
            }
        }
        out.push('\n');
    }
    out
}
