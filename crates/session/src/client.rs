//! Async driver that owns a [`Session`] and connects it to a relay.
//!
//! One task runs [`Client::run`]. It is the only writer of the session and
//! multiplexes frontend commands, the turn-timer tick and relay polling.
//! After every event it publishes a fresh [`ViewModel`].

use game_core::{Action, GameKind, Square};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::link::RelayLink;
use crate::session::Session;
use crate::view::{render, ViewModel};

/// What a frontend can ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Host { name: String, game: GameKind },
    Join { code: String, name: String },
    PlayLocal(GameKind),
    Start,
    Select(Square),
    Reset,
    BackToMenu,
    Shutdown,
}

pub struct Client<L> {
    link: L,
    session: Session,
    views: watch::Sender<ViewModel>,
    tick: Duration,
    poll: Duration,
}

fn interval(period: Duration) -> Interval {
    // The first tick would otherwise fire immediately.
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

impl<L: RelayLink> Client<L> {
    pub fn new(link: L, session: Session, config: &SessionConfig) -> (Self, watch::Receiver<ViewModel>) {
        let (views, rx) = watch::channel(render(&session));
        let client = Self {
            link,
            session,
            views,
            tick: config.tick(),
            poll: config.poll_interval(),
        };
        (client, rx)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run until `Shutdown` arrives or every command sender is dropped, then
    /// hand the session back. Dropping the loop drops the tick, so no forced
    /// move can fire afterwards.
    pub async fn run(mut self, mut commands: mpsc::Receiver<Command>) -> Session {
        let mut tick = interval(self.tick);
        let mut poll = interval(self.poll);
        info!(player = %self.session.player_id(), "client started");

        loop {
            tokio::select! {
                cmd = commands.recv() => match cmd {
                    None | Some(Command::Shutdown) => break,
                    Some(cmd) => self.on_command(cmd).await,
                },
                _ = tick.tick() => {
                    if let Some(action) = self.session.tick() {
                        self.send(action).await;
                    }
                }
                _ = poll.tick(), if self.session.in_room() => self.poll().await,
            }
            self.publish();
        }

        info!("client stopped");
        self.session
    }

    async fn on_command(&mut self, cmd: Command) {
        debug!(?cmd, "command");
        let result = match cmd {
            Command::Host { name, game } => self.session.host_game(&name, game).map(Some),
            Command::Join { code, name } => self.session.join_game(&code, &name).map(Some),
            Command::PlayLocal(kind) => self.session.start_local(kind).map(|()| None),
            Command::Start => self.session.start(),
            Command::Select(sq) => Ok(self.session.select(sq)),
            Command::Reset => self.session.reset(),
            Command::BackToMenu => Ok(self.session.back_to_menu()),
            Command::Shutdown => Ok(None),
        };
        match result {
            Ok(Some(action)) => self.send(action).await,
            Ok(None) => {}
            Err(e) => {
                debug!(error = %e, "command refused");
                self.session.set_notice(e.to_string());
            }
        }
    }

    async fn send(&mut self, action: Action) {
        let name = action.name();
        // The session already left; whatever the relay says no longer applies.
        let leaving = matches!(action, Action::LeaveRoom { .. });
        match self.link.request(action).await {
            Ok(reply) if leaving => debug!(?reply, "left room"),
            Ok(reply) => self.session.handle_reply(reply),
            Err(e) if leaving => debug!(error = %e, "leave_room failed"),
            Err(e) => {
                warn!(action = name, error = %e, "request failed");
                self.session.handle_request_error(&e);
            }
        }
    }

    async fn poll(&mut self) {
        let player = self.session.player_id().clone();
        match self.link.poll(&player).await {
            Ok(pushes) => {
                for push in pushes {
                    self.session.handle_push(push);
                }
            }
            Err(e) => self.session.handle_poll_error(&e),
        }
    }

    fn publish(&self) {
        self.views.send_replace(render(&self.session));
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod client_tests;
