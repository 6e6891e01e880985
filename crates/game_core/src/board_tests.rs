use super::*;

#[test]
fn test_initial_dimensions() {
    for kind in GameKind::ALL {
        let board = Board::initial(kind);
        assert_eq!((board.rows(), board.cols()), kind.dimensions());
    }
    assert_eq!(GameKind::Chess.dimensions(), (8, 8));
    assert_eq!(GameKind::Janggi.dimensions(), (10, 9));
    assert_eq!(GameKind::Omok.dimensions(), (15, 15));
}

#[test]
fn test_chess_start_layout() {
    let board = Board::initial(GameKind::Chess);
    assert_eq!(board.piece_count(), 32);
    assert_eq!(
        board.get(Square::new(7, 4)),
        Some(Piece::new(PieceKind::King, Color::White))
    );
    assert_eq!(
        board.get(Square::new(0, 3)),
        Some(Piece::new(PieceKind::Queen, Color::Black))
    );
    assert_eq!(
        board.get(Square::new(6, 0)),
        Some(Piece::new(PieceKind::Pawn, Color::White))
    );
}

#[test]
fn test_janggi_start_layout() {
    let board = Board::initial(GameKind::Janggi);
    assert_eq!(board.piece_count(), 32);
    assert_eq!(
        board.find(Piece::new(PieceKind::General, Color::White)),
        Some(Square::new(8, 4))
    );
    assert_eq!(
        board.find(Piece::new(PieceKind::General, Color::Black)),
        Some(Square::new(1, 4))
    );
    assert_eq!(
        board.get(Square::new(7, 1)),
        Some(Piece::new(PieceKind::Cannon, Color::White))
    );
}

#[test]
fn test_omok_starts_empty() {
    assert_eq!(Board::initial(GameKind::Omok).piece_count(), 0);
}

#[test]
fn test_out_of_bounds_get_is_empty() {
    let board = Board::initial(GameKind::Chess);
    assert_eq!(board.get(Square::new(8, 0)), None);
    assert!(!board.contains(Square::new(0, 8)));
}

#[test]
fn test_put_returns_previous_occupant() {
    let mut board = Board::empty(3, 3);
    let sq = Square::new(1, 1);
    let white = Piece::stone(Color::White);
    let black = Piece::stone(Color::Black);
    assert_eq!(board.put(sq, Some(white)), None);
    assert_eq!(board.put(sq, Some(black)), Some(white));
    assert_eq!(board.take(sq), Some(black));
    assert!(board.is_empty_at(sq));
}

#[test]
fn test_diagram_round_trip() {
    let diagram = "\
        rnbqkbnr
        pppppppp
        ........
        ........
        ........
        ........
        PPPPPPPP
        RNBQKBNR";
    let board = Board::from_diagram(GameKind::Chess, diagram).unwrap();
    assert_eq!(board, Board::initial(GameKind::Chess));
    let rendered = board.to_string();
    assert_eq!(Board::from_diagram(GameKind::Chess, &rendered).unwrap(), board);
}

#[test]
fn test_diagram_rejects_wrong_size() {
    let err = Board::from_diagram(GameKind::Chess, "....\n....").unwrap_err();
    assert!(matches!(err, BoardError::WrongDimensions { .. }));
}

#[test]
fn test_diagram_rejects_foreign_letter() {
    let err = Board::from_diagram(GameKind::Omok, "x").unwrap_err();
    assert_eq!(err, BoardError::InvalidLetter('x'));
}

#[test]
fn test_snapshot_json_preserves_grid() {
    let mut board = Board::initial(GameKind::Janggi);
    board.take(Square::new(9, 0));
    let json = serde_json::to_string(&board).unwrap();
    let back: Board = serde_json::from_str(&json).unwrap();
    assert_eq!(back, board);
    for sq in board.squares() {
        assert_eq!(back.get(sq), board.get(sq));
    }
}

#[test]
fn test_snapshot_rejects_ragged_rows() {
    let json = r#"{"cells":[[null,null],[null]]}"#;
    let err = serde_json::from_str::<Board>(json).unwrap_err();
    assert!(err.to_string().contains("row 1"));
}

#[test]
fn test_snapshot_rejects_oversized_grid() {
    let snapshot = BoardSnapshot {
        cells: vec![vec![None; 256]; 2],
    };
    assert_eq!(
        Board::try_from(snapshot).unwrap_err(),
        BoardError::TooLarge { rows: 2, cols: 256 }
    );
    let empty = BoardSnapshot { cells: Vec::new() };
    assert_eq!(Board::try_from(empty).unwrap_err(), BoardError::Empty);
}
