use game_core::{Board, Color, GameKind, PlayerId, Reply, Role, RoomCode};
use std::time::Duration;
use tokio::time::Instant;

/// One participant of a room.
#[derive(Debug, Clone)]
pub struct Seat {
    pub player: PlayerId,
    pub name: String,
    pub last_seen: Instant,
    /// Set once the opponent has been told this seat went away; cleared when
    /// the player shows up again.
    pub reported_absent: bool,
}

impl Seat {
    pub fn new(player: PlayerId, name: String, now: Instant) -> Self {
        Self {
            player,
            name,
            last_seen: now,
            reported_absent: false,
        }
    }

    pub fn seen(&mut self, now: Instant) {
        self.last_seen = now;
        self.reported_absent = false;
    }
}

/// Last board the relay forwarded, handed to reconnecting players.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub board: Board,
    pub next_player: Color,
    pub winner: Option<Color>,
}

#[derive(Debug, Clone)]
pub struct Room {
    pub code: RoomCode,
    pub game: GameKind,
    pub host: Seat,
    pub guest: Option<Seat>,
    pub started: bool,
    pub snapshot: Option<Snapshot>,
    pub last_activity: Instant,
}

impl Room {
    pub fn new(code: RoomCode, game: GameKind, host: Seat, now: Instant) -> Self {
        Self {
            code,
            game,
            host,
            guest: None,
            started: false,
            snapshot: None,
            last_activity: now,
        }
    }

    pub fn role_of(&self, player: &PlayerId) -> Option<Role> {
        if self.host.player == *player {
            Some(Role::Host)
        } else if self.guest.as_ref().is_some_and(|g| g.player == *player) {
            Some(Role::Guest)
        } else {
            None
        }
    }

    pub fn seat(&self, role: Role) -> Option<&Seat> {
        match role {
            Role::Host => Some(&self.host),
            Role::Guest => self.guest.as_ref(),
        }
    }

    pub fn seat_mut(&mut self, role: Role) -> Option<&mut Seat> {
        match role {
            Role::Host => Some(&mut self.host),
            Role::Guest => self.guest.as_mut(),
        }
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerId> {
        std::iter::once(&self.host.player).chain(self.guest.iter().map(|g| &g.player))
    }

    /// Record activity by `role`.
    pub fn touch(&mut self, role: Role, now: Instant) {
        self.last_activity = now;
        self.seen(role, now);
    }

    /// A poll by `role`. Refreshes presence, not room activity.
    pub fn seen(&mut self, role: Role, now: Instant) {
        if let Some(seat) = self.seat_mut(role) {
            seat.seen(now);
        }
    }

    pub fn is_idle(&self, now: Instant, max_idle: Duration) -> bool {
        now.saturating_duration_since(self.last_activity) >= max_idle
    }

    /// Back to a fresh, unstarted game.
    pub fn clear_game(&mut self) {
        self.started = false;
        self.snapshot = None;
    }

    pub fn joined_reply(&self, role: Role) -> Reply {
        let snapshot = self.snapshot.as_ref();
        Reply::RoomJoined {
            room_code: self.code.clone(),
            role,
            host_name: self.host.name.clone(),
            guest_name: self.guest.as_ref().map(|g| g.name.clone()),
            game: self.game,
            started: self.started,
            board: snapshot.map(|s| s.board.clone()),
            current_player: snapshot.map(|s| s.next_player),
            winner: snapshot.and_then(|s| s.winner),
        }
    }
}
