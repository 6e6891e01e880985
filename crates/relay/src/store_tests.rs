use super::*;
use game_core::{apply_move, Board, Color, Move, Square};
use std::collections::HashSet;
use std::sync::Arc;

fn pid(s: &str) -> PlayerId {
    PlayerId::new(s)
}

async fn created(store: &RoomStore, game: GameKind) -> RoomCode {
    match store.create_room("Kim", pid("host"), game).await.unwrap() {
        Reply::RoomCreated { room_code, .. } => room_code,
        other => panic!("expected room_created, got {other:?}"),
    }
}

/// Room with both seats taken and the game started; queues drained.
async fn playing(store: &RoomStore, game: GameKind) -> RoomCode {
    let code = created(store, game).await;
    store.join_room(&code, "Lee", pid("guest")).await.unwrap();
    store.start_game(&code, &pid("host")).await.unwrap();
    store.poll_messages(&pid("host")).await.unwrap();
    store.poll_messages(&pid("guest")).await.unwrap();
    code
}

fn opening_move(code: &RoomCode, player: &str, game: GameKind) -> MoveMessage {
    let board = Board::initial(game);
    let (mv, mover) = match game {
        GameKind::Omok => (Move::place(Square::new(7, 7)), Color::Black),
        _ => (Move::step(Square::new(6, 0), Square::new(5, 0)), Color::White),
    };
    let applied = apply_move(game.rules(), &board, mv, mover);
    MoveMessage::new(code.clone(), pid(player), mv, mover, &applied)
}

#[tokio::test]
async fn test_create_room() {
    let store = RoomStore::with_seed(1);
    let code = created(&store, GameKind::Janggi).await;
    let room = store.room(&code).await.unwrap();
    assert_eq!(room.game, GameKind::Janggi);
    assert_eq!(room.host.name, "Kim");
    assert!(room.guest.is_none());
    assert!(!room.started);
    assert_eq!(store.poll_messages(&pid("host")).await.unwrap(), vec![]);
}

#[tokio::test]
async fn test_create_rejects_bad_name() {
    let store = RoomStore::with_seed(1);
    let err = store.create_room("K", pid("host"), GameKind::Chess).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(store.room_count().await, 0);
}

#[tokio::test]
async fn test_concurrent_creates_get_distinct_codes() {
    let store = Arc::new(RoomStore::with_seed(7));
    let mut handles = Vec::new();
    for i in 0..200 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .create_room("Host", pid(&format!("p{i}")), GameKind::Omok)
                .await
        }));
    }
    let mut codes = HashSet::new();
    for handle in handles {
        match handle.await.unwrap().unwrap() {
            Reply::RoomCreated { room_code, .. } => assert!(codes.insert(room_code)),
            other => panic!("unexpected {other:?}"),
        }
    }
    assert_eq!(store.room_count().await, 200);
}

#[tokio::test]
async fn test_join_notifies_host() {
    let store = RoomStore::with_seed(2);
    let code = created(&store, GameKind::Chess).await;
    let reply = store.join_room(&code, "Lee", pid("guest")).await.unwrap();
    match reply {
        Reply::RoomJoined {
            room_code,
            role,
            host_name,
            guest_name,
            game,
            started,
            ..
        } => {
            assert_eq!(room_code, code);
            assert_eq!(role, Role::Guest);
            assert_eq!(host_name, "Kim");
            assert_eq!(guest_name.as_deref(), Some("Lee"));
            assert_eq!(game, GameKind::Chess);
            assert!(!started);
        }
        other => panic!("expected room_joined, got {other:?}"),
    }
    assert_eq!(
        store.poll_messages(&pid("host")).await.unwrap(),
        vec![Push::PlayerJoined {
            guest_name: "Lee".into()
        }]
    );
}

#[tokio::test]
async fn test_join_errors() {
    let store = RoomStore::with_seed(3);
    let missing = RoomCode::parse("12345").unwrap();
    let err = store.join_room(&missing, "Lee", pid("guest")).await.unwrap_err();
    assert_eq!(err, RelayError::Rejected(ErrorCode::RoomNotFound));

    let code = created(&store, GameKind::Chess).await;
    store.join_room(&code, "Lee", pid("guest")).await.unwrap();
    let err = store.join_room(&code, "Park", pid("third")).await.unwrap_err();
    assert_eq!(err, RelayError::Rejected(ErrorCode::RoomFull));
    assert_eq!(store.room(&code).await.unwrap().guest.unwrap().name, "Lee");
}

#[tokio::test]
async fn test_rejoin_returns_snapshot() {
    let store = RoomStore::with_seed(4);
    let code = playing(&store, GameKind::Chess).await;
    let msg = opening_move(&code, "host", GameKind::Chess);
    store.relay_move(msg.clone()).await.unwrap();

    let reply = store.join_room(&code, "Lee", pid("guest")).await.unwrap();
    match reply {
        Reply::RoomJoined {
            role,
            started,
            board,
            current_player,
            winner,
            ..
        } => {
            assert_eq!(role, Role::Guest);
            assert!(started);
            assert_eq!(board, Some(msg.board));
            assert_eq!(current_player, Some(Color::Black));
            assert_eq!(winner, None);
        }
        other => panic!("expected room_joined, got {other:?}"),
    }
}

#[tokio::test]
async fn test_start_rules() {
    let store = RoomStore::with_seed(5);
    let code = created(&store, GameKind::Omok).await;
    assert_eq!(
        store.start_game(&code, &pid("host")).await.unwrap_err(),
        RelayError::Rejected(ErrorCode::NoGuest)
    );
    store.join_room(&code, "Lee", pid("guest")).await.unwrap();
    assert_eq!(
        store.start_game(&code, &pid("guest")).await.unwrap_err(),
        RelayError::Rejected(ErrorCode::NotHost)
    );
    assert_eq!(
        store.start_game(&code, &pid("stranger")).await.unwrap_err(),
        RelayError::Rejected(ErrorCode::NotInRoom)
    );
    assert_eq!(
        store.start_game(&code, &pid("host")).await.unwrap(),
        Reply::GameStart {
            room_code: code.clone()
        }
    );
    let guest_queue = store.poll_messages(&pid("guest")).await.unwrap();
    assert_eq!(guest_queue, vec![Push::GameStart { room_code: code }]);
}

#[tokio::test]
async fn test_move_forwarded_once() {
    let store = RoomStore::with_seed(6);
    let code = playing(&store, GameKind::Omok).await;
    let msg = opening_move(&code, "host", GameKind::Omok);
    assert_eq!(store.relay_move(msg.clone()).await.unwrap(), Reply::Accepted);

    assert_eq!(
        store.poll_messages(&pid("guest")).await.unwrap(),
        vec![Push::GameMove(msg)]
    );
    assert!(store.poll_messages(&pid("guest")).await.unwrap().is_empty());
    assert!(store.poll_messages(&pid("host")).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_move_before_start_rejected() {
    let store = RoomStore::with_seed(7);
    let code = created(&store, GameKind::Chess).await;
    store.join_room(&code, "Lee", pid("guest")).await.unwrap();
    let err = store
        .relay_move(opening_move(&code, "host", GameKind::Chess))
        .await
        .unwrap_err();
    assert_eq!(err, RelayError::Rejected(ErrorCode::GameNotStarted));
}

#[tokio::test]
async fn test_move_with_wrong_board_rejected() {
    let store = RoomStore::with_seed(8);
    let code = playing(&store, GameKind::Chess).await;
    let err = store
        .relay_move(opening_move(&code, "host", GameKind::Omok))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn test_turn_order_not_enforced() {
    let store = RoomStore::with_seed(9);
    let code = playing(&store, GameKind::Chess).await;
    store
        .relay_move(opening_move(&code, "guest", GameKind::Chess))
        .await
        .unwrap();
    assert_eq!(store.poll_messages(&pid("host")).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_reset_notifies_both() {
    let store = RoomStore::with_seed(10);
    let code = playing(&store, GameKind::Chess).await;
    store
        .relay_move(opening_move(&code, "host", GameKind::Chess))
        .await
        .unwrap();
    store.poll_messages(&pid("guest")).await.unwrap();

    assert_eq!(
        store.reset_game(&code, &pid("guest")).await.unwrap_err(),
        RelayError::Rejected(ErrorCode::NotHost)
    );
    store.reset_game(&code, &pid("host")).await.unwrap();
    let room = store.room(&code).await.unwrap();
    assert!(!room.started);
    assert!(room.snapshot.is_none());
    assert_eq!(
        store.poll_messages(&pid("guest")).await.unwrap(),
        vec![Push::GameReset {
            room_code: code.clone()
        }]
    );
    assert_eq!(
        store.poll_messages(&pid("host")).await.unwrap(),
        vec![Push::PlayerJoined {
            guest_name: "Lee".into()
        }]
    );
}

#[tokio::test]
async fn test_send_to_opponent_requires_membership() {
    let store = RoomStore::with_seed(11);
    let code = created(&store, GameKind::Chess).await;
    let push = Push::PeerDisconnected { name: "x".into() };
    assert_eq!(
        store
            .send_to_opponent(&code, &pid("host"), push.clone())
            .await
            .unwrap_err(),
        RelayError::Rejected(ErrorCode::NoGuest)
    );
    assert_eq!(
        store
            .send_to_opponent(&code, &pid("nobody"), push)
            .await
            .unwrap_err(),
        RelayError::Rejected(ErrorCode::NotInRoom)
    );
}

#[tokio::test]
async fn test_guest_leave_frees_seat() {
    let store = RoomStore::with_seed(12);
    let code = playing(&store, GameKind::Janggi).await;
    store.leave_room(&code, &pid("guest")).await.unwrap();

    assert_eq!(
        store.poll_messages(&pid("host")).await.unwrap(),
        vec![Push::GuestLeft { name: "Lee".into() }]
    );
    assert_eq!(
        store.poll_messages(&pid("guest")).await.unwrap_err(),
        RelayError::Rejected(ErrorCode::RoomNotFound)
    );
    let room = store.room(&code).await.unwrap();
    assert!(room.guest.is_none());
    assert!(!room.started);
    store.join_room(&code, "Park", pid("third")).await.unwrap();
}

#[tokio::test]
async fn test_host_leave_keeps_room() {
    let store = RoomStore::with_seed(13);
    let code = playing(&store, GameKind::Chess).await;
    store.leave_room(&code, &pid("host")).await.unwrap();
    assert_eq!(
        store.poll_messages(&pid("guest")).await.unwrap(),
        vec![Push::PeerDisconnected { name: "Kim".into() }]
    );
    assert_eq!(store.room_count().await, 1);
    // The host can come back with the code.
    match store.join_room(&code, "Kim", pid("host")).await.unwrap() {
        Reply::RoomJoined { role, .. } => assert_eq!(role, Role::Host),
        other => panic!("expected room_joined, got {other:?}"),
    }
}

#[tokio::test]
async fn test_creating_again_leaves_old_room() {
    let store = RoomStore::with_seed(14);
    let old = playing(&store, GameKind::Chess).await;
    store.create_room("Lee", pid("guest"), GameKind::Omok).await.unwrap();
    assert!(store.room(&old).await.unwrap().guest.is_none());
    assert_eq!(store.room_count().await, 2);
}

#[tokio::test]
async fn test_poll_unknown_player() {
    let store = RoomStore::with_seed(15);
    assert_eq!(
        store.poll_messages(&pid("ghost")).await.unwrap_err(),
        RelayError::Rejected(ErrorCode::RoomNotFound)
    );
}

#[tokio::test(start_paused = true)]
async fn test_sweep_idle_rooms() {
    let store = RoomStore::with_seed(16);
    let stale = playing(&store, GameKind::Chess).await;
    tokio::time::advance(Duration::from_secs(20 * 60)).await;
    let fresh = match store.create_room("Park", pid("other"), GameKind::Omok).await.unwrap() {
        Reply::RoomCreated { room_code, .. } => room_code,
        other => panic!("unexpected {other:?}"),
    };
    tokio::time::advance(Duration::from_secs(10 * 60)).await;

    let removed = store.sweep_idle(Duration::from_secs(30 * 60)).await;
    assert_eq!(removed, vec![stale.clone()]);
    assert!(store.room(&stale).await.is_none());
    assert!(store.room(&fresh).await.is_some());
    assert_eq!(
        store.poll_messages(&pid("guest")).await.unwrap_err(),
        RelayError::Rejected(ErrorCode::RoomNotFound)
    );
    assert!(store.join_room(&stale, "Lee", pid("guest")).await.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_polling_does_not_keep_room_alive() {
    let store = RoomStore::with_seed(17);
    let code = playing(&store, GameKind::Chess).await;
    for _ in 0..29 {
        tokio::time::advance(Duration::from_secs(60)).await;
        store.poll_messages(&pid("host")).await.unwrap();
        store.poll_messages(&pid("guest")).await.unwrap();
    }
    assert!(store.sweep_idle(Duration::from_secs(30 * 60)).await.is_empty());
    // Polls still count as presence.
    assert_eq!(store.report_absent(Duration::from_secs(30)).await, 0);

    tokio::time::advance(Duration::from_secs(60)).await;
    store.poll_messages(&pid("host")).await.unwrap();
    assert_eq!(store.sweep_idle(Duration::from_secs(30 * 60)).await, vec![code.clone()]);
    assert!(store.room(&code).await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_move_keeps_room_alive() {
    let store = RoomStore::with_seed(19);
    let code = playing(&store, GameKind::Chess).await;
    tokio::time::advance(Duration::from_secs(20 * 60)).await;
    store
        .relay_move(opening_move(&code, "host", GameKind::Chess))
        .await
        .unwrap();
    tokio::time::advance(Duration::from_secs(20 * 60)).await;
    assert!(store.sweep_idle(Duration::from_secs(30 * 60)).await.is_empty());
    assert!(store.room(&code).await.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_absent_player_reported_once() {
    let store = RoomStore::with_seed(18);
    let _code = playing(&store, GameKind::Chess).await;
    tokio::time::advance(Duration::from_secs(20)).await;
    store.poll_messages(&pid("host")).await.unwrap();
    tokio::time::advance(Duration::from_secs(15)).await;

    assert_eq!(store.report_absent(Duration::from_secs(30)).await, 1);
    assert_eq!(store.report_absent(Duration::from_secs(30)).await, 0);
    assert_eq!(
        store.poll_messages(&pid("host")).await.unwrap(),
        vec![Push::PeerDisconnected { name: "Lee".into() }]
    );

    // Showing up again re-arms the report.
    store.poll_messages(&pid("guest")).await.unwrap();
    tokio::time::advance(Duration::from_secs(31)).await;
    assert_eq!(store.report_absent(Duration::from_secs(30)).await, 2);
}

#[tokio::test]
async fn test_handle_dispatch() {
    let store = RoomStore::with_seed(19);
    let reply = store
        .handle(Action::CreateRoom {
            host_name: "Kim".into(),
            player_id: pid("host"),
            game: GameKind::Chess,
        })
        .await
        .unwrap();
    let Reply::RoomCreated { room_code, .. } = reply else {
        panic!("expected room_created");
    };
    let err = store
        .handle(Action::StartGame {
            room_code,
            player_id: pid("host"),
        })
        .await
        .unwrap_err();
    assert_eq!(err.status(), axum::http::StatusCode::CONFLICT);
}
