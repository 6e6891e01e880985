use super::*;
use crate::rules::is_legal_move;

fn empty() -> Board {
    Board::empty(ROWS, COLS)
}

fn put(b: &mut Board, sq: (u8, u8), kind: PieceKind, color: Color) {
    b.put(Square::new(sq.0, sq.1), Some(Piece::new(kind, color)));
}

fn legal(b: &Board, from: (u8, u8), to: (u8, u8)) -> bool {
    let from = Square::new(from.0, from.1);
    let mover = b.get(from).map(|p| p.color).unwrap_or(Color::White);
    is_legal_move(GameKind::Janggi, b, from, Square::new(to.0, to.1), mover)
}

#[test]
fn test_palace_geometry() {
    assert_eq!(Palace::containing(Square::new(8, 4)), Some(Palace::BOTTOM));
    assert_eq!(Palace::containing(Square::new(0, 3)), Some(Palace::TOP));
    assert_eq!(Palace::containing(Square::new(3, 4)), None);
    assert_eq!(Palace::containing(Square::new(8, 6)), None);
    assert!(Palace::BOTTOM.on_diagonal(Square::new(7, 3)));
    assert!(Palace::BOTTOM.on_diagonal(Square::new(8, 4)));
    assert!(!Palace::BOTTOM.on_diagonal(Square::new(8, 3)));
}

#[test]
fn test_general_stays_in_palace() {
    let mut b = empty();
    put(&mut b, (7, 4), PieceKind::General, Color::White);
    assert!(legal(&b, (7, 4), (8, 4)));
    assert!(legal(&b, (7, 4), (7, 3)));
    assert!(!legal(&b, (7, 4), (6, 4)));
    assert!(!legal(&b, (7, 4), (9, 4)));
}

#[test]
fn test_guard_diagonal_only_through_center() {
    let mut b = empty();
    put(&mut b, (8, 4), PieceKind::Guard, Color::White);
    assert!(legal(&b, (8, 4), (7, 3)));
    assert!(legal(&b, (8, 4), (9, 5)));

    let mut side = empty();
    put(&mut side, (8, 3), PieceKind::Guard, Color::White);
    assert!(legal(&side, (8, 3), (8, 4)));
    assert!(legal(&side, (8, 3), (9, 3)));
    assert!(!legal(&side, (8, 3), (7, 4)));
    assert!(!legal(&side, (8, 3), (9, 4)));
}

#[test]
fn test_horse_blocked_on_long_leg() {
    let mut b = empty();
    put(&mut b, (5, 4), PieceKind::Horse, Color::White);
    assert!(legal(&b, (5, 4), (3, 5)));
    assert!(legal(&b, (5, 4), (4, 6)));

    put(&mut b, (4, 4), PieceKind::Soldier, Color::Black);
    assert!(!legal(&b, (5, 4), (3, 5)));
    assert!(!legal(&b, (5, 4), (3, 3)));
    // the short-leg side is unaffected
    assert!(legal(&b, (5, 4), (4, 6)));
}

#[test]
fn test_chess_knight_ignores_the_same_blocker() {
    let mut b = Board::empty(8, 8);
    b.put(Square::new(5, 4), Some(Piece::new(PieceKind::Knight, Color::White)));
    b.put(Square::new(4, 4), Some(Piece::new(PieceKind::Pawn, Color::Black)));
    assert!(is_legal_move(
        GameKind::Chess,
        &b,
        Square::new(5, 4),
        Square::new(3, 5),
        Color::White
    ));
}

#[test]
fn test_elephant_needs_both_legs_clear() {
    let mut b = empty();
    put(&mut b, (5, 4), PieceKind::Elephant, Color::White);
    assert!(legal(&b, (5, 4), (2, 2)));
    assert!(legal(&b, (5, 4), (3, 1)));
    assert!(!legal(&b, (5, 4), (3, 3)));

    let mut first = b.clone();
    put(&mut first, (4, 4), PieceKind::Soldier, Color::Black);
    assert!(!legal(&first, (5, 4), (2, 2)));

    let mut second = b.clone();
    put(&mut second, (3, 3), PieceKind::Soldier, Color::Black);
    assert!(!legal(&second, (5, 4), (2, 2)));
}

#[test]
fn test_chariot_orthogonal_and_palace_diagonal() {
    let mut b = empty();
    put(&mut b, (9, 3), PieceKind::Chariot, Color::White);
    assert!(legal(&b, (9, 3), (0, 3)));
    assert!(legal(&b, (9, 3), (9, 8)));
    assert!(legal(&b, (9, 3), (7, 5)));
    assert!(legal(&b, (9, 3), (8, 4)));

    put(&mut b, (8, 4), PieceKind::Soldier, Color::Black);
    assert!(!legal(&b, (9, 3), (7, 5)));
    assert!(legal(&b, (9, 3), (8, 4)));

    let mut open = empty();
    put(&mut open, (5, 0), PieceKind::Chariot, Color::White);
    assert!(!legal(&open, (5, 0), (4, 1)));
}

#[test]
fn test_chariot_orthogonal_path_clear() {
    let mut b = empty();
    put(&mut b, (9, 0), PieceKind::Chariot, Color::White);
    put(&mut b, (6, 0), PieceKind::Soldier, Color::Black);
    assert!(legal(&b, (9, 0), (6, 0)));
    assert!(!legal(&b, (9, 0), (5, 0)));
}

#[test]
fn test_cannon_needs_exactly_one_screen() {
    let mut b = empty();
    put(&mut b, (9, 0), PieceKind::Cannon, Color::White);
    assert!(!legal(&b, (9, 0), (5, 0)), "no screen");

    put(&mut b, (7, 0), PieceKind::Soldier, Color::White);
    assert!(legal(&b, (9, 0), (5, 0)));
    assert!(!legal(&b, (9, 0), (8, 0)), "adjacent move has no screen");

    put(&mut b, (6, 0), PieceKind::Soldier, Color::Black);
    assert!(!legal(&b, (9, 0), (5, 0)), "two screens");
    assert!(legal(&b, (9, 0), (6, 0)), "capture over one screen");
}

#[test]
fn test_cannon_never_jumps_or_captures_cannon() {
    let mut b = empty();
    put(&mut b, (9, 0), PieceKind::Cannon, Color::White);
    put(&mut b, (7, 0), PieceKind::Cannon, Color::Black);
    assert!(!legal(&b, (9, 0), (5, 0)));
    assert!(!legal(&b, (9, 0), (7, 0)));

    let mut target = empty();
    put(&mut target, (9, 0), PieceKind::Cannon, Color::White);
    put(&mut target, (7, 0), PieceKind::Horse, Color::White);
    put(&mut target, (5, 0), PieceKind::Cannon, Color::Black);
    assert!(!legal(&target, (9, 0), (5, 0)));
}

#[test]
fn test_cannon_palace_diagonal() {
    let mut b = empty();
    put(&mut b, (9, 3), PieceKind::Cannon, Color::White);
    put(&mut b, (8, 4), PieceKind::Guard, Color::White);
    assert!(legal(&b, (9, 3), (7, 5)));

    let mut off = empty();
    put(&mut off, (6, 3), PieceKind::Cannon, Color::White);
    put(&mut off, (5, 4), PieceKind::Soldier, Color::White);
    assert!(!legal(&off, (6, 3), (4, 5)));
}

#[test]
fn test_soldier_forward_and_sideways() {
    let mut b = empty();
    put(&mut b, (5, 4), PieceKind::Soldier, Color::White);
    assert!(legal(&b, (5, 4), (4, 4)));
    assert!(legal(&b, (5, 4), (5, 3)));
    assert!(legal(&b, (5, 4), (5, 5)));
    assert!(!legal(&b, (5, 4), (6, 4)));
    assert!(!legal(&b, (5, 4), (4, 3)));
    assert!(!legal(&b, (5, 4), (3, 4)));

    let mut black = empty();
    put(&mut black, (4, 4), PieceKind::Soldier, Color::Black);
    assert!(legal(&black, (4, 4), (5, 4)));
    assert!(!legal(&black, (4, 4), (3, 4)));
}

#[test]
fn test_soldier_palace_diagonal_forward() {
    let mut b = empty();
    put(&mut b, (2, 3), PieceKind::Soldier, Color::White);
    put(&mut b, (2, 4), PieceKind::Soldier, Color::White);
    assert!(legal(&b, (2, 3), (1, 4)));
    assert!(!legal(&b, (2, 4), (1, 3)), "side midpoint is off the diagonals");

    let mut center = empty();
    put(&mut center, (1, 4), PieceKind::Soldier, Color::White);
    assert!(legal(&center, (1, 4), (0, 5)));
    assert!(!legal(&center, (1, 4), (2, 5)), "never backwards");
}

#[test]
fn test_general_capture_ends_game() {
    let rules = JanggiRules;
    let b = empty();
    let mv = Move::step(Square::new(2, 4), Square::new(1, 4));
    let general = Some(Piece::new(PieceKind::General, Color::Black));
    let guard = Some(Piece::new(PieceKind::Guard, Color::Black));
    assert_eq!(rules.outcome(&b, mv, Color::White, general), GameResult::Won(Color::White));
    assert_eq!(rules.outcome(&b, mv, Color::White, guard), GameResult::InProgress);
    assert_eq!(rules.outcome(&b, mv, Color::White, None), GameResult::InProgress);
}
