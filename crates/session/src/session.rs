//! Per-client game session.
//!
//! A [`Session`] owns everything one player sees: lobby state, the local
//! copy of the game, the turn timer and the square selection. It never talks
//! to the network itself. Operations that need the relay return the
//! [`Action`] to send, and the caller feeds replies, pushes and transport
//! failures back in through `handle_*`.

use game_core::{
    validate_name, Action, Color, ErrorCode, Game, GameKind, GameResult, Move, MoveMessage,
    PlayerId, Push, Reply, Role, RoomCode, Square,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::link::LinkError;
use crate::turn_timer::{TimerEvent, TurnTimer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    Lobby,
    WaitingForOpponent,
    WaitingForHostToStart,
    InProgress,
    Ended { winner: Color },
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Lobby => write!(f, "in the lobby"),
            SessionState::WaitingForOpponent => write!(f, "waiting for an opponent"),
            SessionState::WaitingForHostToStart => write!(f, "waiting for the host to start"),
            SessionState::InProgress => write!(f, "a game is in progress"),
            SessionState::Ended { winner } => write!(f, "the game is over ({winner} won)"),
        }
    }
}

/// Where the opponent sits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Both colors play on this client.
    Local,
    Online { role: Role, room: RoomCode },
}

/// Snapshot taken before an optimistic online move, restored if the relay
/// never accepts it.
#[derive(Debug, Clone)]
struct PendingMove {
    before: Game,
    timer: TurnTimer,
}

pub struct Session {
    player_id: PlayerId,
    state: SessionState,
    mode: Option<Mode>,
    game: Option<Game>,
    host_name: Option<String>,
    guest_name: Option<String>,
    timer: TurnTimer,
    pending: Option<PendingMove>,
    selection: Option<Square>,
    destinations: Vec<Square>,
    notice: Option<String>,
    rng: StdRng,
}

impl Session {
    pub fn new(config: &SessionConfig) -> Self {
        Self::with_parts(config, PlayerId::generate(), StdRng::from_entropy())
    }

    /// Deterministic session for tests and self-play: fixed identity and a
    /// seeded source for forced moves.
    pub fn with_seed(config: &SessionConfig, player_id: PlayerId, seed: u64) -> Self {
        Self::with_parts(config, player_id, StdRng::seed_from_u64(seed))
    }

    fn with_parts(config: &SessionConfig, player_id: PlayerId, rng: StdRng) -> Self {
        Self {
            player_id,
            state: SessionState::Lobby,
            mode: None,
            game: None,
            host_name: None,
            guest_name: None,
            timer: TurnTimer::new(config.turn_ticks),
            pending: None,
            selection: None,
            destinations: Vec::new(),
            notice: None,
            rng,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn player_id(&self) -> &PlayerId {
        &self.player_id
    }

    pub fn mode(&self) -> Option<&Mode> {
        self.mode.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        match &self.mode {
            Some(Mode::Online { role, .. }) => Some(*role),
            _ => None,
        }
    }

    pub fn room_code(&self) -> Option<&RoomCode> {
        match &self.mode {
            Some(Mode::Online { room, .. }) => Some(room),
            _ => None,
        }
    }

    pub fn in_room(&self) -> bool {
        matches!(self.mode, Some(Mode::Online { .. }))
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    pub fn host_name(&self) -> Option<&str> {
        self.host_name.as_deref()
    }

    pub fn guest_name(&self) -> Option<&str> {
        self.guest_name.as_deref()
    }

    pub fn timer(&self) -> &TurnTimer {
        &self.timer
    }

    pub fn move_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn selection(&self) -> Option<Square> {
        self.selection
    }

    pub fn destinations(&self) -> &[Square] {
        &self.destinations
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, text: impl Into<String>) {
        self.notice = Some(text.into());
    }

    /// The color this client plays online. `None` offline, where both are.
    pub fn my_color(&self) -> Option<Color> {
        match (&self.mode, &self.game) {
            (Some(Mode::Online { role, .. }), Some(game)) => Some(role.color(game.kind())),
            _ => None,
        }
    }

    pub fn is_my_turn(&self) -> bool {
        let Some(game) = &self.game else {
            return false;
        };
        match &self.mode {
            Some(Mode::Local) => true,
            Some(Mode::Online { .. }) => self.my_color() == Some(game.current_player()),
            None => false,
        }
    }

    // ---- lobby ----

    /// Validate the name and build the `create_room` request. State changes
    /// only once the relay answers with `room_created`.
    pub fn host_game(&self, name: &str, kind: GameKind) -> Result<Action, SessionError> {
        self.require(SessionState::Lobby)?;
        let host_name = validate_name(name)?;
        Ok(Action::CreateRoom {
            host_name,
            player_id: self.player_id.clone(),
            game: kind,
        })
    }

    pub fn join_game(&self, code: &str, name: &str) -> Result<Action, SessionError> {
        self.require(SessionState::Lobby)?;
        let room_code = RoomCode::parse(code)?;
        let guest_name = validate_name(name)?;
        Ok(Action::JoinRoom {
            room_code,
            guest_name,
            player_id: self.player_id.clone(),
        })
    }

    /// Hot-seat game on this client.
    pub fn start_local(&mut self, kind: GameKind) -> Result<(), SessionError> {
        self.require(SessionState::Lobby)?;
        self.mode = Some(Mode::Local);
        self.game = Some(Game::new(kind));
        self.notice = None;
        self.state = SessionState::WaitingForHostToStart;
        info!(game = %kind, "local game prepared");
        Ok(())
    }

    /// Start the game. Offline this begins play at once; online it returns
    /// the `start_game` request and play begins on the relay's answer.
    pub fn start(&mut self) -> Result<Option<Action>, SessionError> {
        self.require(SessionState::WaitingForHostToStart)?;
        match self.mode.clone() {
            Some(Mode::Local) => {
                self.begin_game();
                Ok(None)
            }
            Some(Mode::Online { role, room }) => {
                if role != Role::Host {
                    return Err(SessionError::NotHost);
                }
                if self.guest_name.is_none() {
                    return Err(SessionError::NoOpponent);
                }
                Ok(Some(Action::StartGame {
                    room_code: room,
                    player_id: self.player_id.clone(),
                }))
            }
            None => Err(SessionError::WrongState(self.state)),
        }
    }

    /// Back to a fresh board. Online the host returns to waiting for the
    /// guest, who is sent a `game_reset`.
    pub fn reset(&mut self) -> Result<Option<Action>, SessionError> {
        let allowed = matches!(
            self.state,
            SessionState::WaitingForHostToStart
                | SessionState::InProgress
                | SessionState::Ended { .. }
        );
        if !allowed {
            return Err(SessionError::WrongState(self.state));
        }
        let action = match &self.mode {
            Some(Mode::Local) => None,
            Some(Mode::Online { role, room }) => {
                if *role != Role::Host {
                    return Err(SessionError::NotHost);
                }
                Some(Action::ResetGame {
                    room_code: room.clone(),
                    player_id: self.player_id.clone(),
                })
            }
            None => return Err(SessionError::WrongState(self.state)),
        };
        self.clear_board();
        self.state = if action.is_some() {
            self.guest_name = None;
            SessionState::WaitingForOpponent
        } else {
            SessionState::WaitingForHostToStart
        };
        info!(state = %self.state, "game reset");
        Ok(action)
    }

    /// Abandon whatever is going on and return to the lobby. Online this
    /// yields the `leave_room` request so the peer hears about it.
    pub fn back_to_menu(&mut self) -> Option<Action> {
        let action = match self.mode.take() {
            Some(Mode::Online { room, .. }) => Some(Action::LeaveRoom {
                room_code: room,
                player_id: self.player_id.clone(),
            }),
            _ => None,
        };
        self.timer.stop();
        self.game = None;
        self.host_name = None;
        self.guest_name = None;
        self.pending = None;
        self.clear_selection();
        self.notice = None;
        self.state = SessionState::Lobby;
        action
    }

    // ---- play ----

    /// Handle a click on `sq`: select an own piece, move the selected piece,
    /// or place a stone. Anything else clears the selection.
    pub fn select(&mut self, sq: Square) -> Option<Action> {
        if self.state != SessionState::InProgress || !self.is_my_turn() || self.pending.is_some() {
            self.clear_selection();
            return None;
        }
        let (kind, occupant, current) = match &self.game {
            Some(game) => (game.kind(), game.board().get(sq), game.current_player()),
            None => return None,
        };

        if kind == GameKind::Omok {
            self.clear_selection();
            return self.try_move(Move::place(sq));
        }

        if occupant.map(|pc| pc.color) == Some(current) {
            self.selection = Some(sq);
            self.destinations = self
                .game
                .as_ref()
                .map(|game| game.legal_destinations(sq))
                .unwrap_or_default();
            return None;
        }

        let chosen = self.selection.filter(|_| self.destinations.contains(&sq));
        self.clear_selection();
        match chosen {
            Some(from) => self.try_move(Move::step(from, sq)),
            None => None,
        }
    }

    fn try_move(&mut self, mv: Move) -> Option<Action> {
        match self.submit_move(mv) {
            Ok(action) => action,
            Err(e) => {
                debug!(%mv, error = %e, "move refused");
                None
            }
        }
    }

    /// Play `mv` for the side to move. Online the move is applied locally
    /// right away and the returned `game_move` must be sent; a later send
    /// failure rolls it back.
    pub fn submit_move(&mut self, mv: Move) -> Result<Option<Action>, SessionError> {
        if self.state != SessionState::InProgress {
            return Err(SessionError::WrongState(self.state));
        }
        if self.pending.is_some() {
            return Err(SessionError::MovePending);
        }
        if !self.is_my_turn() {
            return Err(SessionError::NotYourTurn);
        }
        let game = self
            .game
            .as_mut()
            .ok_or(SessionError::WrongState(self.state))?;
        let before = game.clone();
        let mover = game.current_player();
        let applied = game.play(mv)?;
        let result = applied.result;
        self.clear_selection();

        let action = match &self.mode {
            Some(Mode::Online { room, .. }) => {
                self.pending = Some(PendingMove {
                    before,
                    timer: self.timer.clone(),
                });
                Some(Action::GameMove(MoveMessage::new(
                    room.clone(),
                    self.player_id.clone(),
                    mv,
                    mover,
                    &applied,
                )))
            }
            _ => None,
        };
        info!(%mv, %mover, "move played");
        self.after_turn(result);
        Ok(action)
    }

    /// The relay did not take the pending move: put the board and timer back
    /// as they were before it.
    pub fn send_failed(&mut self) {
        if let Some(pending) = self.pending.take() {
            warn!("move was not delivered, rolling back");
            self.game = Some(pending.before);
            self.timer = pending.timer;
            self.state = SessionState::InProgress;
            self.notice = Some("Move could not be sent, try again".to_string());
        }
    }

    /// Advance the turn timer by one tick. When it runs out on this client's
    /// turn a uniformly random legal move is played for it.
    pub fn tick(&mut self) -> Option<Action> {
        if self.state != SessionState::InProgress {
            return None;
        }
        match self.timer.tick() {
            TimerEvent::Expired if self.is_my_turn() && self.pending.is_none() => {
                self.force_random_move()
            }
            TimerEvent::Expired => {
                debug!("turn timer expired on the opponent's turn");
                None
            }
            _ => None,
        }
    }

    fn force_random_move(&mut self) -> Option<Action> {
        let moves = self
            .game
            .as_ref()
            .map(Game::legal_moves)
            .unwrap_or_default();
        let Some(&mv) = moves.choose(&mut self.rng) else {
            warn!("turn timer expired with no legal move available");
            return None;
        };
        info!(%mv, "turn timer expired, playing a random move");
        self.clear_selection();
        self.try_move(mv)
    }

    // ---- relay input ----

    pub fn handle_reply(&mut self, reply: Reply) {
        match reply {
            Reply::RoomCreated {
                room_code,
                host_name,
                game,
            } => {
                if self.state != SessionState::Lobby {
                    warn!(room = %room_code, "room_created outside the lobby, ignored");
                    return;
                }
                info!(room = %room_code, game = %game, "hosting room");
                self.mode = Some(Mode::Online {
                    role: Role::Host,
                    room: room_code,
                });
                self.host_name = Some(host_name);
                self.guest_name = None;
                self.game = Some(Game::new(game));
                self.notice = None;
                self.state = SessionState::WaitingForOpponent;
            }
            Reply::RoomJoined {
                room_code,
                role,
                host_name,
                guest_name,
                game,
                started,
                board,
                current_player,
                winner,
            } => {
                if self.state != SessionState::Lobby {
                    warn!(room = %room_code, "room_joined outside the lobby, ignored");
                    return;
                }
                info!(room = %room_code, ?role, started, "joined room");
                let mut state = Game::new(game);
                if let (Some(board), Some(current)) = (board, current_player) {
                    let result = match winner {
                        Some(w) => GameResult::Won(w),
                        None => GameResult::InProgress,
                    };
                    state.mirror(board, current, None, None, result);
                }
                self.mode = Some(Mode::Online {
                    role,
                    room: room_code,
                });
                self.game = Some(state);
                self.host_name = Some(host_name);
                let has_guest = guest_name.is_some();
                self.guest_name = guest_name;
                self.notice = None;
                self.state = match (started, winner) {
                    (true, Some(winner)) => SessionState::Ended { winner },
                    (true, None) => {
                        self.timer.restart();
                        SessionState::InProgress
                    }
                    (false, _) if has_guest => SessionState::WaitingForHostToStart,
                    (false, _) => SessionState::WaitingForOpponent,
                };
            }
            Reply::GameStart { room_code } => {
                if self.room_code() == Some(&room_code)
                    && self.state == SessionState::WaitingForHostToStart
                {
                    self.begin_game();
                }
            }
            Reply::Accepted => {
                if self.pending.take().is_some() {
                    debug!("move accepted by relay");
                }
            }
            Reply::Error { code, message } => self.rejected(code, message),
        }
    }

    pub fn handle_push(&mut self, push: Push) {
        match push {
            Push::PlayerJoined { guest_name } => {
                if self.role() == Some(Role::Host) && self.state == SessionState::WaitingForOpponent {
                    info!(guest = %guest_name, "opponent joined");
                    self.notice = Some(format!("{guest_name} joined"));
                    self.guest_name = Some(guest_name);
                    self.state = SessionState::WaitingForHostToStart;
                }
            }
            Push::GameStart { room_code } => {
                if self.room_code() == Some(&room_code)
                    && self.state == SessionState::WaitingForHostToStart
                {
                    self.begin_game();
                }
            }
            Push::GameMove(msg) => self.apply_remote_move(msg),
            Push::GameReset { room_code } => {
                if self.role() == Some(Role::Guest) && self.room_code() == Some(&room_code) {
                    info!(room = %room_code, "host reset the game");
                    self.clear_board();
                    self.notice = Some("The host reset the game".to_string());
                    self.state = SessionState::WaitingForHostToStart;
                }
            }
            Push::GuestLeft { name } => {
                if self.role() == Some(Role::Host) {
                    info!(guest = %name, "opponent left the room");
                    self.clear_board();
                    self.guest_name = None;
                    self.notice = Some(format!("{name} left the room"));
                    self.state = SessionState::WaitingForOpponent;
                }
            }
            Push::PeerDisconnected { name } => {
                warn!(peer = %name, "opponent disconnected");
                self.notice = Some(format!("{name} disconnected"));
            }
        }
    }

    /// A request could not be completed. Rolls back a pending move.
    pub fn handle_request_error(&mut self, err: &LinkError) {
        match err {
            LinkError::Rejected { code, message } => self.rejected(*code, message.clone()),
            LinkError::Unreachable(reason) => {
                warn!(%reason, "request failed");
                if self.pending.is_some() {
                    self.send_failed();
                } else {
                    self.notice = Some(format!("Relay unreachable: {reason}"));
                }
            }
        }
    }

    /// Polling failed. A vanished room sends the player back to the lobby;
    /// transient failures only leave a notice.
    pub fn handle_poll_error(&mut self, err: &LinkError) {
        match err.code() {
            Some(ErrorCode::RoomNotFound) | Some(ErrorCode::NotInRoom) => self.room_vanished(),
            _ => {
                debug!(error = %err, "poll failed");
                self.notice = Some(err.to_string());
            }
        }
    }

    fn rejected(&mut self, code: ErrorCode, message: String) {
        warn!(?code, %message, "relay rejected request");
        if code == ErrorCode::RoomNotFound && self.in_room() {
            self.room_vanished();
            return;
        }
        self.send_failed();
        self.notice = Some(message);
    }

    fn room_vanished(&mut self) {
        if !self.in_room() {
            return;
        }
        warn!("room no longer exists on the relay");
        // Nothing to tell the relay; the leave_room request is dropped.
        let _ = self.back_to_menu();
        self.notice = Some("The room no longer exists".to_string());
    }

    fn apply_remote_move(&mut self, msg: MoveMessage) {
        if self.state != SessionState::InProgress || self.room_code() != Some(&msg.room_code) {
            debug!(state = %self.state, "ignoring game_move");
            return;
        }
        if msg.player_id == self.player_id {
            return;
        }
        let Some(game) = self.game.as_mut() else {
            return;
        };
        let (rows, cols) = game.kind().dimensions();
        if msg.board.rows() != rows || msg.board.cols() != cols {
            warn!(rows = msg.board.rows(), cols = msg.board.cols(), "ignoring move for another board");
            return;
        }
        let result = msg.result();
        let mv = msg.mv();
        game.mirror(msg.board, msg.next_player, Some(mv), msg.captured_piece, result);
        debug!(%mv, "opponent moved");
        self.pending = None;
        self.clear_selection();
        self.after_turn(result);
    }

    // ---- internals ----

    fn require(&self, state: SessionState) -> Result<(), SessionError> {
        if self.state == state {
            Ok(())
        } else {
            Err(SessionError::WrongState(self.state))
        }
    }

    fn begin_game(&mut self) {
        if let Some(game) = &mut self.game {
            game.reset();
            info!(game = %game.kind(), "game started");
        }
        self.pending = None;
        self.clear_selection();
        self.notice = None;
        self.timer.restart();
        self.state = SessionState::InProgress;
    }

    fn after_turn(&mut self, result: GameResult) {
        match result.winner() {
            Some(winner) => {
                info!(%winner, "game over");
                self.timer.stop();
                self.state = SessionState::Ended { winner };
            }
            None => self.timer.restart(),
        }
    }

    fn clear_board(&mut self) {
        if let Some(game) = &mut self.game {
            game.reset();
        }
        self.timer.stop();
        self.pending = None;
        self.clear_selection();
    }

    fn clear_selection(&mut self) {
        self.selection = None;
        self.destinations.clear();
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
