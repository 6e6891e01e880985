use super::*;
use crate::executor::apply_move;
use serde_json::json;

#[test]
fn test_room_code_parse() {
    assert_eq!(RoomCode::parse("12345").unwrap().as_str(), "12345");
    assert_eq!(RoomCode::parse(" 99999 ").unwrap().as_str(), "99999");
    for bad in ["1234", "123456", "1234a", "01234", ""] {
        assert_eq!(
            RoomCode::parse(bad),
            Err(ValidationError::MalformedRoomCode(bad.to_string()))
        );
    }
    assert!(RoomCode::from_number(9_999).is_none());
    assert!(RoomCode::from_number(100_000).is_none());
    assert_eq!(RoomCode::from_number(10_000).unwrap().as_str(), "10000");
}

#[test]
fn test_room_code_rejected_when_deserializing() {
    assert!(serde_json::from_value::<RoomCode>(json!("12ab5")).is_err());
    assert!(serde_json::from_value::<RoomCode>(json!("54321")).is_ok());
}

#[test]
fn test_validate_name() {
    assert_eq!(validate_name("  Kim "), Ok("Kim".to_string()));
    assert_eq!(validate_name("a"), Err(ValidationError::NameTooShort));
    assert_eq!(validate_name("   "), Err(ValidationError::NameTooShort));
    assert_eq!(
        validate_name("abcdefghijklm"),
        Err(ValidationError::NameTooLong)
    );
}

#[test]
fn test_action_wire_shape() {
    let action = Action::JoinRoom {
        room_code: RoomCode::parse("24680").unwrap(),
        guest_name: "Lee".into(),
        player_id: PlayerId::new("p-2"),
    };
    let value = serde_json::to_value(&action).unwrap();
    assert_eq!(
        value,
        json!({
            "type": "join_room",
            "roomCode": "24680",
            "guestName": "Lee",
            "playerId": "p-2",
        })
    );
    let parsed: Action = serde_json::from_value(value).unwrap();
    assert_eq!(parsed, action);
}

#[test]
fn test_error_reply_shape() {
    let value = serde_json::to_value(Reply::error(ErrorCode::RoomFull)).unwrap();
    assert_eq!(
        value,
        json!({"type": "error", "code": "room_full", "message": "room full"})
    );
}

#[test]
fn test_move_message_reconstructs_board_on_peer() {
    let mut board = Board::initial(GameKind::Chess);
    board.put(Square::new(2, 3), Some(Piece::new(PieceKind::Knight, Color::White)));
    let mv = Move::step(Square::new(2, 3), Square::new(0, 4));
    let applied = apply_move(GameKind::Chess.rules(), &board, mv, Color::White);
    let msg = MoveMessage::new(
        RoomCode::parse("13579").unwrap(),
        PlayerId::new("host"),
        mv,
        Color::White,
        &applied,
    );

    let text = serde_json::to_string(&Push::GameMove(msg.clone())).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["type"], "game_move");
    assert_eq!(value["fromRow"], 2);
    assert_eq!(value["toCol"], 4);
    assert_eq!(value["capturedPiece"], json!({"kind": "king", "color": "black"}));
    assert_eq!(value["nextPlayer"], "black");

    let received = match serde_json::from_str::<Push>(&text).unwrap() {
        Push::GameMove(m) => m,
        other => panic!("unexpected push {other:?}"),
    };
    assert_eq!(received, msg);
    assert_eq!(received.mv(), mv);
    for sq in applied.board.squares() {
        assert_eq!(received.board.get(sq), applied.board.get(sq));
    }
}

#[test]
fn test_placement_message_has_no_source() {
    let board = Board::initial(GameKind::Omok);
    let mv = Move::place(Square::new(7, 7));
    let applied = apply_move(GameKind::Omok.rules(), &board, mv, Color::Black);
    let msg = MoveMessage::new(
        RoomCode::parse("11111").unwrap(),
        PlayerId::new("guest"),
        mv,
        Color::Black,
        &applied,
    );
    let value = serde_json::to_value(&msg).unwrap();
    assert!(value["fromRow"].is_null());
    let back: MoveMessage = serde_json::from_value(value).unwrap();
    assert_eq!(back.mv(), mv);
    assert_eq!(back.result(), GameResult::InProgress);
}

#[test]
fn test_role_colors() {
    assert_eq!(Role::Host.color(GameKind::Chess), Color::White);
    assert_eq!(Role::Guest.color(GameKind::Chess), Color::Black);
    assert_eq!(Role::Host.color(GameKind::Omok), Color::Black);
    assert_eq!(Role::Guest.color(GameKind::Janggi), Color::Black);
}
