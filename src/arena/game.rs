//! Single matches between two search engines.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::{Board, GameResult, Move};
use crate::core::{GameRng, Side};
use crate::mcts::{MCTSConfig, MCTSSearch, SearchError};

use super::ArenaError;

/// Outcome of one finished match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Final result.
    pub result: GameResult,

    /// Every move played, in order. Passes are not recorded.
    pub moves: Vec<Move>,

    /// Final Black disc count.
    pub black_discs: u32,

    /// Final White disc count.
    pub white_discs: u32,
}

impl MatchRecord {
    /// +1 if Black won, -1 if White won, 0 on a draw.
    #[must_use]
    pub fn winner_sign(&self) -> i8 {
        self.result.sign()
    }

    /// Number of moves played.
    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Check if no move was played.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// Play a full game on a fresh board.
///
/// The engine for the side to move is asked for every move, so a pass hands
/// the next move back to the same engine. `rng` only backs the board's
/// fallback for moves that turn out to be illegal.
pub fn play_match(
    black: &mut MCTSSearch,
    white: &mut MCTSSearch,
    rng: &mut GameRng,
) -> Result<MatchRecord, SearchError> {
    let mut board = Board::new();
    let mut moves = Vec::with_capacity(60);

    let result = loop {
        if let Some(result) = board.winner() {
            break result;
        }

        let engine = match board.turn() {
            Side::Black => &mut *black,
            Side::White => &mut *white,
        };
        let mv = engine.run_search(&board.get_state())?;
        moves.push(board.play(mv, rng));
    };

    debug!(%result, moves = moves.len(), "match finished");

    Ok(MatchRecord {
        result,
        moves,
        black_discs: board.count(Side::Black),
        white_discs: board.count(Side::White),
    })
}

/// Build fresh engines from two configs and play one match.
///
/// Both engines and the board draw from forks of `seed`, so the outcome
/// depends only on the configs and the seed.
pub fn play_configured_match(
    black: &MCTSConfig,
    white: &MCTSConfig,
    seed: u64,
) -> Result<MatchRecord, ArenaError> {
    let mut rng = GameRng::new(seed);
    let mut black = MCTSSearch::new(black.clone())?.with_rng(rng.fork());
    let mut white = MCTSSearch::new(white.clone())?.with_rng(rng.fork());

    Ok(play_match(&mut black, &mut white, &mut rng)?)
}
