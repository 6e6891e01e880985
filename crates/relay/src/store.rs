//! Room bookkeeping and per-player message queues.
//!
//! All state sits behind one async mutex, so every operation (including the
//! check-then-seat of a join) is atomic with respect to the others. Queues
//! are drained on read: a message is delivered at most once.

use game_core::{
    validate_name, Action, ErrorCode, GameKind, MoveMessage, PlayerId, Push, Reply, Role,
    RoomCode,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::codes;
use crate::error::RelayError;
use crate::room::{Room, Seat, Snapshot};

type Queues = HashMap<PlayerId, VecDeque<Push>>;

fn enqueue(queues: &mut Queues, player: &PlayerId, push: Push) {
    queues.entry(player.clone()).or_default().push_back(push);
}

pub struct RoomStore {
    inner: Mutex<Inner>,
}

struct Inner {
    rooms: HashMap<RoomCode, Room>,
    /// Which room each seated player belongs to.
    players: HashMap<PlayerId, RoomCode>,
    queues: Queues,
    rng: StdRng,
}

impl Default for RoomStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomStore {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            inner: Mutex::new(Inner {
                rooms: HashMap::new(),
                players: HashMap::new(),
                queues: HashMap::new(),
                rng,
            }),
        }
    }

    /// Dispatch one client action.
    pub async fn handle(&self, action: Action) -> Result<Reply, RelayError> {
        match action {
            Action::CreateRoom {
                host_name,
                player_id,
                game,
            } => self.create_room(&host_name, player_id, game).await,
            Action::JoinRoom {
                room_code,
                guest_name,
                player_id,
            } => self.join_room(&room_code, &guest_name, player_id).await,
            Action::StartGame {
                room_code,
                player_id,
            } => self.start_game(&room_code, &player_id).await,
            Action::GameMove(msg) => self.relay_move(msg).await,
            Action::ResetGame {
                room_code,
                player_id,
            } => self.reset_game(&room_code, &player_id).await,
            Action::LeaveRoom {
                room_code,
                player_id,
            } => self.leave_room(&room_code, &player_id).await,
        }
    }

    pub async fn create_room(
        &self,
        host_name: &str,
        player: PlayerId,
        game: GameKind,
    ) -> Result<Reply, RelayError> {
        let host_name = validate_name(host_name)?;
        let mut inner = self.inner.lock().await;
        inner.create_room(host_name, player, game, Instant::now())
    }

    pub async fn join_room(
        &self,
        code: &RoomCode,
        guest_name: &str,
        player: PlayerId,
    ) -> Result<Reply, RelayError> {
        let guest_name = validate_name(guest_name)?;
        let mut inner = self.inner.lock().await;
        inner.join_room(code, guest_name, player, Instant::now())
    }

    pub async fn start_game(&self, code: &RoomCode, player: &PlayerId) -> Result<Reply, RelayError> {
        self.inner.lock().await.start_game(code, player, Instant::now())
    }

    /// Record the move as the room's snapshot and forward it to the opponent.
    pub async fn relay_move(&self, msg: MoveMessage) -> Result<Reply, RelayError> {
        self.inner.lock().await.relay_move(msg, Instant::now())
    }

    pub async fn reset_game(&self, code: &RoomCode, player: &PlayerId) -> Result<Reply, RelayError> {
        self.inner.lock().await.reset_game(code, player, Instant::now())
    }

    /// Queue `push` for the other participant of `player`'s room.
    pub async fn send_to_opponent(
        &self,
        code: &RoomCode,
        player: &PlayerId,
        push: Push,
    ) -> Result<Reply, RelayError> {
        let mut inner = self.inner.lock().await;
        inner.send_to_opponent(code, player, push, Instant::now())?;
        Ok(Reply::Accepted)
    }

    pub async fn leave_room(&self, code: &RoomCode, player: &PlayerId) -> Result<Reply, RelayError> {
        self.inner.lock().await.leave_room(code, player, Instant::now())
    }

    /// Drain everything queued for `player`. Also counts as a sign of life.
    pub async fn poll_messages(&self, player: &PlayerId) -> Result<Vec<Push>, RelayError> {
        self.inner.lock().await.poll_messages(player, Instant::now())
    }

    /// Delete rooms idle for at least `max_idle`, with their players' queues.
    pub async fn sweep_idle(&self, max_idle: Duration) -> Vec<RoomCode> {
        self.inner.lock().await.sweep_idle(Instant::now(), max_idle)
    }

    /// Tell the opponent of every seat silent for `threshold` that its peer
    /// is gone. Each absence is reported once.
    pub async fn report_absent(&self, threshold: Duration) -> usize {
        self.inner.lock().await.report_absent(Instant::now(), threshold)
    }

    pub async fn room_count(&self) -> usize {
        self.inner.lock().await.rooms.len()
    }

    pub async fn room(&self, code: &RoomCode) -> Option<Room> {
        self.inner.lock().await.rooms.get(code).cloned()
    }
}

impl Inner {
    fn room_mut(&mut self, code: &RoomCode) -> Result<&mut Room, RelayError> {
        self.rooms
            .get_mut(code)
            .ok_or(RelayError::Rejected(ErrorCode::RoomNotFound))
    }

    fn create_room(
        &mut self,
        host_name: String,
        player: PlayerId,
        game: GameKind,
        now: Instant,
    ) -> Result<Reply, RelayError> {
        self.detach(&player, now);
        let rooms = &self.rooms;
        let code = codes::allocate(&mut self.rng, rooms.len(), |c| rooms.contains_key(c))
            .ok_or(RelayError::CodesExhausted)?;
        let host = Seat::new(player.clone(), host_name.clone(), now);
        self.rooms
            .insert(code.clone(), Room::new(code.clone(), game, host, now));
        self.players.insert(player.clone(), code.clone());
        self.queues.insert(player, VecDeque::new());
        info!(room = %code, host = %host_name, %game, "room created");
        Ok(Reply::RoomCreated {
            room_code: code,
            host_name,
            game,
        })
    }

    fn join_room(
        &mut self,
        code: &RoomCode,
        guest_name: String,
        player: PlayerId,
        now: Instant,
    ) -> Result<Reply, RelayError> {
        let room = self.room_mut(code)?;
        if let Some(role) = room.role_of(&player) {
            room.touch(role, now);
            let reply = room.joined_reply(role);
            self.players.insert(player.clone(), code.clone());
            info!(room = %code, ?role, player = %player, "player reconnected");
            return Ok(reply);
        }
        if room.guest.is_some() {
            return Err(ErrorCode::RoomFull.into());
        }

        self.detach(&player, now);
        let room = self.room_mut(code)?;
        room.guest = Some(Seat::new(player.clone(), guest_name.clone(), now));
        room.clear_game();
        room.last_activity = now;
        let host = room.host.player.clone();
        let reply = room.joined_reply(Role::Guest);
        self.players.insert(player.clone(), code.clone());
        self.queues.insert(player, VecDeque::new());
        enqueue(&mut self.queues, &host, Push::PlayerJoined {
            guest_name: guest_name.clone(),
        });
        info!(room = %code, guest = %guest_name, "guest joined");
        Ok(reply)
    }

    fn start_game(&mut self, code: &RoomCode, player: &PlayerId, now: Instant) -> Result<Reply, RelayError> {
        let room = self.room_mut(code)?;
        match room.role_of(player) {
            None => return Err(ErrorCode::NotInRoom.into()),
            Some(Role::Guest) => return Err(ErrorCode::NotHost.into()),
            Some(Role::Host) => {}
        }
        let guest = match &room.guest {
            Some(seat) => seat.player.clone(),
            None => return Err(ErrorCode::NoGuest.into()),
        };
        room.clear_game();
        room.started = true;
        room.touch(Role::Host, now);
        enqueue(&mut self.queues, &guest, Push::GameStart {
            room_code: code.clone(),
        });
        info!(room = %code, "game started");
        Ok(Reply::GameStart {
            room_code: code.clone(),
        })
    }

    fn relay_move(&mut self, msg: MoveMessage, now: Instant) -> Result<Reply, RelayError> {
        let room = self.room_mut(&msg.room_code)?;
        if room.role_of(&msg.player_id).is_none() {
            return Err(ErrorCode::NotInRoom.into());
        }
        if !room.started {
            return Err(ErrorCode::GameNotStarted.into());
        }
        if room.guest.is_none() {
            return Err(ErrorCode::NoGuest.into());
        }
        let (rows, cols) = room.game.dimensions();
        if msg.board.rows() != rows || msg.board.cols() != cols {
            return Err(RelayError::Invalid(format!(
                "board is {}x{}, this room plays {}",
                msg.board.rows(),
                msg.board.cols(),
                room.game
            )));
        }
        room.snapshot = Some(Snapshot {
            board: msg.board.clone(),
            next_player: msg.next_player,
            winner: msg.winner,
        });
        let code = msg.room_code.clone();
        let player = msg.player_id.clone();
        debug!(room = %code, mv = %msg.mv(), "relaying move");
        self.send_to_opponent(&code, &player, Push::GameMove(msg), now)?;
        Ok(Reply::Accepted)
    }

    fn reset_game(&mut self, code: &RoomCode, player: &PlayerId, now: Instant) -> Result<Reply, RelayError> {
        let room = self.room_mut(code)?;
        match room.role_of(player) {
            None => return Err(ErrorCode::NotInRoom.into()),
            Some(Role::Guest) => return Err(ErrorCode::NotHost.into()),
            Some(Role::Host) => {}
        }
        room.clear_game();
        room.touch(Role::Host, now);
        let host = room.host.player.clone();
        if let Some(guest) = room.guest.clone() {
            enqueue(&mut self.queues, &guest.player, Push::GameReset {
                room_code: code.clone(),
            });
            // The host went back to waiting; tell it the guest is still here.
            enqueue(&mut self.queues, &host, Push::PlayerJoined {
                guest_name: guest.name,
            });
        }
        info!(room = %code, "game reset");
        Ok(Reply::Accepted)
    }

    fn send_to_opponent(
        &mut self,
        code: &RoomCode,
        player: &PlayerId,
        push: Push,
        now: Instant,
    ) -> Result<(), RelayError> {
        let room = self.room_mut(code)?;
        let role = room
            .role_of(player)
            .ok_or(RelayError::Rejected(ErrorCode::NotInRoom))?;
        room.touch(role, now);
        let opponent = room
            .seat(role.other())
            .map(|seat| seat.player.clone())
            .ok_or(RelayError::Rejected(ErrorCode::NoGuest))?;
        enqueue(&mut self.queues, &opponent, push);
        Ok(())
    }

    fn leave_room(&mut self, code: &RoomCode, player: &PlayerId, now: Instant) -> Result<Reply, RelayError> {
        let room = self.room_mut(code)?;
        let role = room
            .role_of(player)
            .ok_or(RelayError::Rejected(ErrorCode::NotInRoom))?;
        room.last_activity = now;
        let notify = match role {
            Role::Guest => {
                let name = room.guest.take().map(|g| g.name).unwrap_or_default();
                room.clear_game();
                Some((room.host.player.clone(), Push::GuestLeft { name }))
            }
            Role::Host => {
                // The seat is kept so the host can come back with the code.
                room.host.reported_absent = true;
                let name = room.host.name.clone();
                room.guest
                    .as_ref()
                    .map(|g| (g.player.clone(), Push::PeerDisconnected { name }))
            }
        };
        if let Some((peer, push)) = notify {
            enqueue(&mut self.queues, &peer, push);
        }
        if self.players.get(player) == Some(code) {
            self.players.remove(player);
        }
        self.queues.remove(player);
        info!(room = %code, ?role, player = %player, "player left");
        Ok(Reply::Accepted)
    }

    /// Leave whatever room `player` currently sits in before taking a new seat.
    fn detach(&mut self, player: &PlayerId, now: Instant) {
        if let Some(code) = self.players.get(player).cloned() {
            if let Err(e) = self.leave_room(&code, player, now) {
                debug!(room = %code, player = %player, error = %e, "could not leave previous room");
            }
        }
    }

    fn poll_messages(&mut self, player: &PlayerId, now: Instant) -> Result<Vec<Push>, RelayError> {
        if let Some(code) = self.players.get(player) {
            if let Some(room) = self.rooms.get_mut(code) {
                if let Some(role) = room.role_of(player) {
                    room.seen(role, now);
                }
            }
        }
        let drained: Vec<Push> = self
            .queues
            .get_mut(player)
            .map(|q| q.drain(..).collect())
            .unwrap_or_default();
        if drained.is_empty() && !self.players.contains_key(player) {
            return Err(ErrorCode::RoomNotFound.into());
        }
        Ok(drained)
    }

    fn sweep_idle(&mut self, now: Instant, max_idle: Duration) -> Vec<RoomCode> {
        let expired: Vec<RoomCode> = self
            .rooms
            .values()
            .filter(|room| room.is_idle(now, max_idle))
            .map(|room| room.code.clone())
            .collect();
        for code in &expired {
            let Some(room) = self.rooms.remove(code) else {
                continue;
            };
            for player in room.players() {
                if self.players.get(player) == Some(code) {
                    self.players.remove(player);
                    self.queues.remove(player);
                }
            }
            info!(room = %code, "idle room removed");
        }
        expired
    }

    fn report_absent(&mut self, now: Instant, threshold: Duration) -> usize {
        let mut reported = 0;
        for room in self.rooms.values_mut() {
            let Some(guest) = room.guest.as_mut() else {
                continue;
            };
            if flag_absent(&mut room.host, guest, &mut self.queues, now, threshold) {
                reported += 1;
            }
            if flag_absent(guest, &room.host, &mut self.queues, now, threshold) {
                reported += 1;
            }
        }
        reported
    }
}

fn flag_absent(seat: &mut Seat, peer: &Seat, queues: &mut Queues, now: Instant, threshold: Duration) -> bool {
    if seat.reported_absent || now.saturating_duration_since(seat.last_seen) < threshold {
        return false;
    }
    seat.reported_absent = true;
    info!(player = %seat.player, "player stopped polling");
    enqueue(queues, &peer.player, Push::PeerDisconnected {
        name: seat.name.clone(),
    });
    true
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod store_tests;
