//! Self-play results storage and reporting

use anyhow::{Context, Result};
use game_core::{Color, GameKind};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::match_runner::MatchConfig;

/// One finished (or abandoned) game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_num: u32,
    pub game: GameKind,
    /// None when the ply cap was hit first
    pub winner: Option<Color>,
    pub plies: u32,
}

/// Per-variant totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSummary {
    pub game: GameKind,
    pub games: u32,
    pub white_wins: u32,
    pub black_wins: u32,
    pub unfinished: u32,
    pub total_plies: u32,
}

impl VariantSummary {
    fn new(game: GameKind) -> Self {
        Self {
            game,
            games: 0,
            white_wins: 0,
            black_wins: 0,
            unfinished: 0,
            total_plies: 0,
        }
    }

    pub fn average_plies(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_plies as f64 / self.games as f64
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelfPlayResults {
    pub name: String,
    pub config: MatchConfig,
    pub games: Vec<GameRecord>,
}

impl SelfPlayResults {
    pub fn new(name: &str, config: MatchConfig) -> Self {
        Self {
            name: name.to_string(),
            config,
            games: Vec::new(),
        }
    }

    pub fn add_game(&mut self, record: GameRecord) {
        self.games.push(record);
    }

    /// Totals per variant, in the order variants first appear.
    pub fn summaries(&self) -> Vec<VariantSummary> {
        let mut out: Vec<VariantSummary> = Vec::new();
        for record in &self.games {
            let idx = match out.iter().position(|s| s.game == record.game) {
                Some(idx) => idx,
                None => {
                    out.push(VariantSummary::new(record.game));
                    out.len() - 1
                }
            };
            let summary = &mut out[idx];
            summary.games += 1;
            summary.total_plies += record.plies;
            match record.winner {
                Some(Color::White) => summary.white_wins += 1,
                Some(Color::Black) => summary.black_wins += 1,
                None => summary.unfinished += 1,
            }
        }
        out
    }

    /// Save results to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize results")?;
        std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Load results from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&contents).context("failed to parse results")
    }

    pub fn generate_report(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!("=== Self-play: {} ===\n\n", self.name));
        report.push_str(&format!(
            "Config: {} games/variant, {} ply cap, seed {}\n\n",
            self.config.num_games, self.config.max_plies, self.config.seed
        ));
        report.push_str(&format!(
            "{:<8} {:>6} {:>6} {:>6} {:>10} {:>10}\n",
            "Variant", "Games", "White", "Black", "Unfinished", "Avg plies"
        ));
        report.push_str(&"-".repeat(52));
        report.push('\n');
        for s in self.summaries() {
            report.push_str(&format!(
                "{:<8} {:>6} {:>6} {:>6} {:>10} {:>10.1}\n",
                s.game.to_string(),
                s.games,
                s.white_wins,
                s.black_wins,
                s.unfinished,
                s.average_plies()
            ));
        }
        report
    }

    pub fn print_report(&self) {
        println!("{}", self.generate_report());
    }
}
