//! Tests for Chomp board rules through the public API.

use strictly_chomp::{
    Board, COLS, ChompInvariants, InvariantSet, MoveError, Position, ROWS, apply_chomp,
    is_poison_eaten, legal_moves,
};

fn pos(row: usize, col: usize) -> Position {
    Position::new(row, col).expect("in range")
}

#[test]
fn test_start_board_offers_every_cell() {
    let board = Board::new();
    assert_eq!(legal_moves(&board).len(), 28);
    assert_eq!(board.legal_moves(), legal_moves(&board));
}

#[test]
fn test_peer_bite_scenario() {
    let mut board = Board::new();
    let eaten = apply_chomp(&mut board, pos(1, 2));

    // Rows 1-3, columns 2-6.
    assert_eq!(eaten, 3 * 5);
    assert_eq!(
        board.render(),
        "XXXXXXX\n\
         XX.....\n\
         XX.....\n\
         XX.....\n"
    );
}

#[test]
fn test_legal_moves_never_contain_eaten_cells() {
    let mut board = Board::new();
    for anchor in [pos(3, 3), pos(2, 5), pos(0, 4), pos(1, 1)] {
        apply_chomp(&mut board, anchor);
        for mv in legal_moves(&board) {
            assert!(board.is_present(mv), "{mv} listed but eaten");
        }
        assert_eq!(legal_moves(&board).len(), board.remaining());
    }
}

#[test]
fn test_poison_legal_until_eaten() {
    let mut board = Board::new();
    // Whittle the bar down to the poison alone.
    for anchor in [pos(0, 1), pos(1, 0)] {
        assert!(legal_moves(&board).contains(&Position::POISON));
        board.chomp(anchor).expect("legal bite");
    }
    assert_eq!(legal_moves(&board), vec![Position::POISON]);

    board.chomp(Position::POISON).expect("poison is still legal");
    assert!(is_poison_eaten(&board));
    assert!(legal_moves(&board).is_empty());
    assert_eq!(
        board.chomp(Position::POISON),
        Err(MoveError::AlreadyEaten(Position::POISON))
    );
}

#[test]
fn test_every_single_bite_keeps_invariants() {
    for anchor in Position::all() {
        let mut board = Board::new();
        board.chomp(anchor).expect("full board accepts any bite");
        assert!(ChompInvariants::check_all(&board).is_ok(), "after {anchor}");
        assert_eq!(
            board.remaining(),
            ROWS * COLS - (ROWS - anchor.row()) * (COLS - anchor.col())
        );
    }
}

#[test]
fn test_parse_user_entry() {
    assert_eq!("2 3".parse::<Position>(), Ok(pos(2, 3)));
    assert_eq!(
        "9 9".parse::<Position>(),
        Err(MoveError::OutOfBounds { row: 9, col: 9 })
    );
    assert!(matches!(
        "two three".parse::<Position>(),
        Err(MoveError::Unparseable(_))
    ));
}
