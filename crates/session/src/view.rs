//! Presentation snapshot of a [`Session`].
//!
//! [`render`] is a pure projection; frontends draw a [`ViewModel`] and send
//! commands back, they never read session internals.

use game_core::{Color, GameKind, Piece, Role, RoomCode, Square};
use serde::Serialize;

use crate::session::{Mode, Session, SessionState};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellView {
    pub row: u8,
    pub col: u8,
    pub piece: Option<Piece>,
    /// Board letter, upper case for the side moving up the board.
    pub letter: Option<char>,
    pub selected: bool,
    pub destination: bool,
    pub last_move: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    pub state: SessionState,
    pub game: Option<GameKind>,
    /// Row-major; empty when no game is loaded.
    pub cells: Vec<Vec<CellView>>,
    pub captured_by_white: Vec<Piece>,
    pub captured_by_black: Vec<Piece>,
    pub turn: Option<Color>,
    pub my_color: Option<Color>,
    pub my_turn: bool,
    /// Ticks left on the turn timer while it runs.
    pub time_left: Option<u32>,
    pub room_code: Option<RoomCode>,
    pub host_name: Option<String>,
    pub guest_name: Option<String>,
    pub can_start: bool,
    pub can_reset: bool,
    pub status: String,
    pub notice: Option<String>,
}

/// How a color is called in a given game.
pub fn color_label(game: GameKind, color: Color) -> &'static str {
    match (game, color) {
        (GameKind::Janggi, Color::White) => "Cho",
        (GameKind::Janggi, Color::Black) => "Han",
        (_, Color::White) => "White",
        (_, Color::Black) => "Black",
    }
}

pub fn render(session: &Session) -> ViewModel {
    let game = session.game();
    let last = game.and_then(|g| g.last_move());
    let last_squares: Vec<Square> = last
        .map(|mv| mv.from().into_iter().chain(Some(mv.to())).collect())
        .unwrap_or_default();

    let cells = match game {
        Some(g) => {
            let board = g.board();
            (0..board.rows())
                .map(|row| {
                    (0..board.cols())
                        .map(|col| {
                            let sq = Square::new(row, col);
                            let piece = board.get(sq);
                            CellView {
                                row,
                                col,
                                piece,
                                letter: piece.map(Piece::letter),
                                selected: session.selection() == Some(sq),
                                destination: session.destinations().contains(&sq),
                                last_move: last_squares.contains(&sq),
                            }
                        })
                        .collect()
                })
                .collect()
        }
        None => Vec::new(),
    };

    let state = session.state();
    let in_play = matches!(state, SessionState::InProgress | SessionState::Ended { .. });
    let is_host = match session.mode() {
        Some(Mode::Local) => true,
        Some(Mode::Online { role, .. }) => *role == Role::Host,
        None => false,
    };
    let has_opponent = session.guest_name().is_some() || session.mode() == Some(&Mode::Local);

    ViewModel {
        state,
        game: game.map(|g| g.kind()),
        cells,
        captured_by_white: game
            .map(|g| g.ledger().captured_by(Color::White).to_vec())
            .unwrap_or_default(),
        captured_by_black: game
            .map(|g| g.ledger().captured_by(Color::Black).to_vec())
            .unwrap_or_default(),
        turn: game.filter(|_| in_play).map(|g| g.current_player()),
        my_color: session.my_color(),
        my_turn: state == SessionState::InProgress && session.is_my_turn(),
        time_left: session
            .timer()
            .is_running()
            .then(|| session.timer().remaining()),
        room_code: session.room_code().cloned(),
        host_name: session.host_name().map(str::to_string),
        guest_name: session.guest_name().map(str::to_string),
        can_start: state == SessionState::WaitingForHostToStart && is_host && has_opponent,
        can_reset: is_host && state != SessionState::Lobby && state != SessionState::WaitingForOpponent,
        status: status_line(session),
        notice: session.notice().map(str::to_string),
    }
}

fn status_line(session: &Session) -> String {
    let kind = session.game().map(|g| g.kind());
    let local = session.mode() == Some(&Mode::Local);
    match session.state() {
        SessionState::Lobby => "Host, join or play locally".to_string(),
        SessionState::WaitingForOpponent => match session.room_code() {
            Some(code) => format!("Room {code}: waiting for an opponent"),
            None => "Waiting for an opponent".to_string(),
        },
        SessionState::WaitingForHostToStart => match session.role() {
            Some(Role::Host) => format!(
                "{} joined, start when ready",
                session.guest_name().unwrap_or("Opponent")
            ),
            Some(Role::Guest) => format!(
                "Waiting for {} to start",
                session.host_name().unwrap_or("the host")
            ),
            None => "Start when ready".to_string(),
        },
        SessionState::InProgress => {
            let (Some(kind), Some(game)) = (kind, session.game()) else {
                return String::new();
            };
            if local {
                format!("{} to move", color_label(kind, game.current_player()))
            } else if session.is_my_turn() {
                "Your move".to_string()
            } else {
                "Opponent's move".to_string()
            }
        }
        SessionState::Ended { winner } => {
            let label = kind.map(|k| color_label(k, winner)).unwrap_or("Nobody");
            match session.my_color() {
                Some(mine) if mine == winner => format!("{label} wins. You win!"),
                Some(_) => format!("{label} wins. You lose."),
                None => format!("{label} wins"),
            }
        }
    }
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod view_tests;
