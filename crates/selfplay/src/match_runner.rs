//! Match runner: two client sessions playing each other through a relay

use game_core::{Action, Color, Game, GameKind, PlayerId};
use relay::{router, RoomStore};
use serde::{Deserialize, Serialize};
use session::{LinkError, RelayLink, Session, SessionConfig, SessionError, SessionState};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::link::RouterLink;
use crate::results::{GameRecord, SelfPlayResults};

#[derive(Debug, Error)]
pub enum SelfPlayError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Link(#[from] LinkError),
    #[error("game {game_num} stalled: {reason}")]
    Stalled { game_num: u32, reason: String },
    #[error("game {game_num}: host and guest boards differ after ply {ply}")]
    Diverged { game_num: u32, ply: u32 },
}

/// Configuration for a self-play run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Games per variant
    pub num_games: u32,
    /// Plies after which a game is abandoned as unfinished
    pub max_plies: u32,
    /// Turn timer length; every move is the forced one, so short is fine
    pub turn_ticks: u32,
    /// Seed for the relay and both sessions
    pub seed: u64,
    /// Print progress during the run
    pub verbose: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            num_games: 10,
            max_plies: 300,
            turn_ticks: 1,
            seed: 0,
            verbose: true,
        }
    }
}

pub struct MatchRunner {
    config: MatchConfig,
}

/// Send one action and feed the answer back. True if the relay took it.
async fn exchange(link: &RouterLink, session: &mut Session, action: Action) -> bool {
    match link.request(action).await {
        Ok(reply) => {
            session.handle_reply(reply);
            true
        }
        Err(e) => {
            session.handle_request_error(&e);
            false
        }
    }
}

async fn drain(link: &RouterLink, session: &mut Session) {
    let player = session.player_id().clone();
    match link.poll(&player).await {
        Ok(pushes) => {
            for push in pushes {
                session.handle_push(push);
            }
        }
        Err(e) => session.handle_poll_error(&e),
    }
}

impl MatchRunner {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Play `num_games` of every variant in `kinds`.
    pub async fn run(&self, name: &str, kinds: &[GameKind]) -> Result<SelfPlayResults, SelfPlayError> {
        let mut results = SelfPlayResults::new(name, self.config.clone());
        let mut game_num = 0;
        for &kind in kinds {
            for i in 0..self.config.num_games {
                game_num += 1;
                let record = self.play_game(kind, game_num).await?;
                if self.config.verbose {
                    let outcome = match record.winner {
                        Some(color) => format!("{color} wins"),
                        None => "unfinished".to_string(),
                    };
                    println!(
                        "{} game {}/{}: {} after {} plies",
                        kind,
                        i + 1,
                        self.config.num_games,
                        outcome,
                        record.plies
                    );
                }
                results.add_game(record);
            }
        }
        Ok(results)
    }

    /// Set up a room for two fresh sessions and let the turn timer play every
    /// move until someone wins or the ply cap is hit.
    pub async fn play_game(&self, kind: GameKind, game_num: u32) -> Result<GameRecord, SelfPlayError> {
        let seed = self.config.seed.wrapping_add(u64::from(game_num) * 3);
        let store = Arc::new(RoomStore::with_seed(seed));
        let link = RouterLink::new(router(store));
        let session_config = SessionConfig {
            turn_ticks: self.config.turn_ticks.max(1),
            ..SessionConfig::default()
        };
        let mut host = Session::with_seed(
            &session_config,
            PlayerId::new(format!("host-{game_num}")),
            seed.wrapping_add(1),
        );
        let mut guest = Session::with_seed(
            &session_config,
            PlayerId::new(format!("guest-{game_num}")),
            seed.wrapping_add(2),
        );
        let stalled = |reason: &str, session: &Session| SelfPlayError::Stalled {
            game_num,
            reason: format!("{reason} ({})", session.notice().unwrap_or("no notice")),
        };

        let create = host.host_game("Host", kind)?;
        exchange(&link, &mut host, create).await;
        let code = host
            .room_code()
            .cloned()
            .ok_or_else(|| stalled("room was not created", &host))?;

        let join = guest.join_game(code.as_str(), "Guest")?;
        exchange(&link, &mut guest, join).await;
        drain(&link, &mut host).await;
        if let Some(start) = host.start()? {
            exchange(&link, &mut host, start).await;
        }
        drain(&link, &mut guest).await;
        if host.state() != SessionState::InProgress || guest.state() != SessionState::InProgress {
            return Err(stalled("game did not start", &guest));
        }
        info!(room = %code, %kind, game_num, "self-play game started");

        let mut plies = 0;
        let tick_budget = (self.config.max_plies + 1) * (session_config.turn_ticks + 1);
        for _ in 0..tick_budget {
            for side in [&mut host, &mut guest] {
                if let Some(action) = side.tick() {
                    if exchange(&link, side, action).await {
                        plies += 1;
                    }
                }
            }
            drain(&link, &mut host).await;
            drain(&link, &mut guest).await;

            if host.game().map(Game::board) != guest.game().map(Game::board) {
                return Err(SelfPlayError::Diverged { game_num, ply: plies });
            }
            if let SessionState::Ended { winner } = host.state() {
                debug!(%winner, plies, "game over");
                return Ok(self.record(kind, game_num, Some(winner), plies));
            }
            if plies >= self.config.max_plies {
                break;
            }
        }
        Ok(self.record(kind, game_num, None, plies))
    }

    fn record(&self, kind: GameKind, game_num: u32, winner: Option<Color>, plies: u32) -> GameRecord {
        GameRecord {
            game_num,
            game: kind,
            winner,
            plies,
        }
    }
}

#[cfg(test)]
#[path = "match_runner_tests.rs"]
mod match_runner_tests;
