//! Round-robin tournaments between configured players.
//!
//! Every ordered pairing (i, j), a player against itself included, plays
//! `games_per_pairing` matches with player i as Black. The matches of a
//! pairing run in parallel on the rayon pool; each one builds its own board
//! and engines, so nothing mutable is shared between threads.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::board::GameResult;
use crate::core::Side;

use super::config::TournamentConfig;
use super::game::play_configured_match;
use super::ArenaError;

/// File name of the JSON results.
pub const RESULTS_JSON: &str = "results.json";

/// File name of the bincode results.
pub const RESULTS_BIN: &str = "results.bin";

/// Aggregated outcome matrices, indexed `[black player][white player]`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentResults {
    /// Matches won by the first player (Black).
    pub wins_first: Vec<Vec<u32>>,

    /// Matches won by the second player (White).
    pub wins_second: Vec<Vec<u32>>,

    /// Drawn matches.
    pub draws: Vec<Vec<u32>>,
}

impl TournamentResults {
    /// Zeroed matrices for `players` players.
    pub fn new(players: usize) -> Self {
        Self {
            wins_first: vec![vec![0; players]; players],
            wins_second: vec![vec![0; players]; players],
            draws: vec![vec![0; players]; players],
        }
    }

    /// Number of players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.wins_first.len()
    }

    /// Count one match of `black` against `white`.
    pub fn record(&mut self, black: usize, white: usize, result: GameResult) {
        match result {
            GameResult::Winner(Side::Black) => self.wins_first[black][white] += 1,
            GameResult::Winner(Side::White) => self.wins_second[black][white] += 1,
            GameResult::Draw => self.draws[black][white] += 1,
        }
    }

    /// Matches played with `black` as Black against `white`.
    #[must_use]
    pub fn games(&self, black: usize, white: usize) -> u32 {
        self.wins_first[black][white] + self.wins_second[black][white] + self.draws[black][white]
    }

    /// Wins of `player` from either seat.
    #[must_use]
    pub fn total_wins(&self, player: usize) -> u32 {
        let as_black: u32 = self.wins_first[player].iter().sum();
        let as_white: u32 = self.wins_second.iter().map(|row| row[player]).sum();
        as_black + as_white
    }

    /// Write `results.json` and `results.bin` into `dir`, creating it if
    /// needed.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<(), ArenaError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        self.write_json(File::create(dir.join(RESULTS_JSON))?)?;
        self.write_bin(File::create(dir.join(RESULTS_BIN))?)?;

        info!(dir = %dir.display(), "saved tournament results");
        Ok(())
    }

    /// Write pretty JSON to `writer`, flushing before returning.
    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), ArenaError> {
        let mut writer = BufWriter::new(writer);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Write bincode to `writer`, flushing before returning.
    pub fn write_bin<W: Write>(&self, writer: W) -> Result<(), ArenaError> {
        let mut writer = BufWriter::new(writer);
        bincode::serialize_into(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Read results written by [`TournamentResults::save`] as JSON.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ArenaError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Read results written by [`TournamentResults::save`] as bincode.
    pub fn load_bin(path: impl AsRef<Path>) -> Result<Self, ArenaError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(bincode::deserialize_from(reader)?)
    }
}

/// A validated round-robin tournament.
#[derive(Clone, Debug)]
pub struct Tournament {
    config: TournamentConfig,
}

impl Tournament {
    /// Validate the config and build the tournament.
    pub fn new(config: TournamentConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    /// Seed of game `game` in the pairing `black` vs `white`.
    ///
    /// Depends only on the base seed and the indices, so results do not
    /// depend on thread scheduling.
    #[must_use]
    pub fn match_seed(&self, black: usize, white: usize, game: u32) -> u64 {
        let players = self.config.players.len() as u64;
        let pairing = black as u64 * players + white as u64;
        let index = pairing * u64::from(self.config.games_per_pairing) + u64::from(game);
        self.config
            .seed
            .wrapping_add((index + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }

    /// Play every pairing and aggregate the results.
    pub fn run(&self) -> Result<TournamentResults, ArenaError> {
        let players = &self.config.players;
        let n = players.len();
        let pairings = n * n;
        let mut results = TournamentResults::new(n);

        for black in 0..n {
            for white in 0..n {
                let outcomes = (0..self.config.games_per_pairing)
                    .into_par_iter()
                    .map(|game| {
                        let seed = self.match_seed(black, white, game);
                        play_configured_match(&players[black], &players[white], seed)
                            .map(|record| record.result)
                    })
                    .collect::<Result<Vec<_>, ArenaError>>()?;

                for result in outcomes {
                    results.record(black, white, result);
                }

                info!(
                    pairing = black * n + white + 1,
                    of = pairings,
                    black,
                    white,
                    black_wins = results.wins_first[black][white],
                    white_wins = results.wins_second[black][white],
                    draws = results.draws[black][white],
                    "pairing finished"
                );
            }
        }

        Ok(results)
    }
}
