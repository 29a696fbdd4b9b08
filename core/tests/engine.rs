use std::collections::BTreeSet;

use fireworks_core::*;
use web_time::{Duration, Instant};

fn engine(size: Coord2, mines: &[Coord2]) -> BoardEngine {
    BoardEngine::with_board(Board::from_mine_coords(size, mines).unwrap())
}

fn revealed_cells(engine: &BoardEngine) -> BTreeSet<Coord2> {
    iter_coords(engine.size())
        .filter(|&coords| engine.is_revealed(coords))
        .collect()
}

#[test]
fn every_preset_generates_consistent_boards() {
    for difficulty in Difficulty::ALL {
        for seed in 0..8 {
            let engine = BoardEngine::new(difficulty, seed);
            let board = engine.board();
            let config = difficulty.config();

            assert_eq!(board.size(), config.size);
            assert_eq!(board.iter_mines().count(), usize::from(config.mines));
            assert_eq!(engine.remaining_mines(), config.mines as isize);

            for coords in iter_coords(board.size()) {
                if board.contains_mine(coords) {
                    assert_eq!(board[coords], MINE);
                    continue;
                }
                let expected = board
                    .iter_neighbors(coords)
                    .filter(|&pos| board[pos] == MINE)
                    .count();
                assert_eq!(board[coords] as usize, expected, "{:?} seed {}", coords, seed);
            }
        }
    }
}

#[test]
fn fresh_session_is_idle_with_stopped_clock() {
    let engine = BoardEngine::new(Difficulty::Intermediate, 11);

    assert_eq!(engine.status(), Status::Idle);
    assert_eq!(engine.timer_state(), TimerState::Idle);
    assert_eq!(engine.elapsed_secs(), 0);
    assert_eq!(engine.remaining_mines(), 40);
    assert!(revealed_cells(&engine).is_empty());
}

#[test]
fn revealing_a_mine_loses_and_uncovers_all_mines() {
    let mines = [(0, 0), (3, 4), (7, 1), (8, 8)];
    let mut engine = engine((9, 9), &mines);

    let changes = engine.reveal((3, 4));

    assert_eq!(engine.status(), Status::Lost);
    assert_eq!(changes.status_change(), Some(Status::Lost));
    for mine in mines {
        assert!(engine.is_revealed(mine));
        assert!(changes.contains(mine));
        assert_eq!(engine.cell_display(mine), Some(CellDisplay::Mine));
    }
}

#[test]
fn single_mine_board_is_won_by_one_reveal() {
    let mut engine = engine((9, 9), &[(0, 0)]);

    let changes = engine.reveal((8, 8));

    assert_eq!(engine.status(), Status::Won);
    assert_eq!(changes.status_change(), Some(Status::Won));
    for coords in iter_coords((9, 9)) {
        if coords == (0, 0) {
            assert!(!engine.is_revealed(coords));
            assert_eq!(engine.cell_display(coords), Some(CellDisplay::Flagged));
        } else {
            assert!(engine.is_revealed(coords), "{:?}", coords);
        }
    }
    assert_eq!(changes.cells().len(), 81);
    assert_eq!(engine.remaining_mines(), 0);
}

#[test]
fn revealing_every_safe_cell_wins() {
    let mines = [(0, 1), (2, 2), (3, 0)];
    let mut engine = engine((4, 4), &mines);

    let safe: Vec<_> = iter_coords((4, 4))
        .filter(|coords| !mines.contains(coords))
        .collect();
    for coords in safe {
        engine.reveal(coords);
    }

    assert_eq!(engine.status(), Status::Won);
    assert_eq!(engine.remaining_mines(), 0);
    for mine in mines {
        assert_eq!(engine.cell_display(mine), Some(CellDisplay::Flagged));
    }
}

#[test]
fn flag_then_unflag_restores_counter() {
    let mut engine = engine((4, 4), &[(1, 1)]);

    let before = engine.remaining_mines();
    engine.toggle_flag((2, 3));
    assert_eq!(engine.remaining_mines(), before - 1);
    engine.toggle_flag((2, 3));

    assert_eq!(engine.remaining_mines(), before);
    assert_eq!(engine.cell_display((2, 3)), Some(CellDisplay::Hidden));
}

#[test]
fn flood_fill_stays_inside_its_region() {
    // a full column of mines splits the board in two
    let wall: Vec<Coord2> = (0..5).map(|row| (row, 2)).collect();
    let mut engine = engine((5, 5), &wall);

    let changes = engine.reveal((0, 0));

    let expected: BTreeSet<Coord2> = iter_coords((5, 5)).filter(|&(_, col)| col < 2).collect();
    assert_eq!(revealed_cells(&engine), expected);
    assert_eq!(changes.cells().len(), expected.len());
    assert_eq!(engine.status(), Status::InProgress);
}

#[test]
fn flood_fill_reveals_zero_region_and_its_border() {
    let mut engine = engine((6, 6), &[(5, 5), (3, 5)]);

    engine.reveal((0, 0));

    for coords in iter_coords((6, 6)) {
        let board = engine.board();
        let touches_zero = board[coords] == 0
            || board
                .iter_neighbors(coords)
                .any(|pos| board[pos] == 0);
        let expect = !board.contains_mine(coords) && touches_zero;
        assert_eq!(engine.is_revealed(coords), expect, "{:?}", coords);
    }
}

#[test]
fn flood_fill_handles_large_open_board() {
    let mut engine = engine((255, 255), &[(254, 254)]);

    let changes = engine.reveal((0, 0));

    assert_eq!(changes.cells().len(), 255 * 255);
    assert_eq!(engine.status(), Status::Won);
}

#[test]
fn no_mutation_after_game_over() {
    let mut engine = engine((3, 3), &[(0, 0), (2, 2)]);

    engine.reveal((0, 0));
    assert_eq!(engine.status(), Status::Lost);
    let remaining = engine.remaining_mines();
    let revealed = revealed_cells(&engine);

    assert!(engine.reveal((0, 2)).is_empty());
    assert!(engine.toggle_flag((2, 0)).is_empty());
    assert_eq!(engine.remaining_mines(), remaining);
    assert_eq!(revealed_cells(&engine), revealed);
    assert_eq!(engine.status(), Status::Lost);
}

#[test]
fn no_mutation_after_win() {
    let mines = [(0, 0), (2, 2)];
    let mut engine = engine((3, 3), &mines);

    for coords in [(0, 1), (0, 2), (1, 0), (1, 1), (1, 2), (2, 0), (2, 1)] {
        engine.reveal(coords);
    }
    assert_eq!(engine.status(), Status::Won);
    assert_eq!(engine.remaining_mines(), 0);
    let revealed = revealed_cells(&engine);

    assert!(engine.toggle_flag((0, 0)).is_empty());
    assert!(engine.reveal((0, 0)).is_empty());
    assert!(engine.reveal((2, 2)).is_empty());

    for coords in mines {
        assert!(engine.is_flagged(coords));
        assert_eq!(engine.cell_display(coords), Some(CellDisplay::Flagged));
    }
    assert_eq!(engine.remaining_mines(), 0);
    assert_eq!(revealed_cells(&engine), revealed);
    assert_eq!(engine.status(), Status::Won);
    assert_eq!(engine.triggered_mine(), None);
}

#[test]
fn timer_counts_from_first_action_until_game_end() {
    let mut engine = engine((1, 3), &[(0, 0)]);
    let session = engine.session_id();
    let t0 = Instant::now();

    assert!(!engine.tick_at(session, t0 + Duration::from_secs(3)));
    engine.toggle_flag_at((0, 0), t0);
    assert!(engine.tick_at(session, t0 + Duration::from_secs(2)));
    assert_eq!(engine.elapsed_secs(), 2);

    engine.reveal_at((0, 2), t0 + Duration::from_millis(5500));
    assert_eq!(engine.status(), Status::Won);
    assert_eq!(engine.elapsed_secs(), 5);

    assert!(!engine.tick_at(session, t0 + Duration::from_secs(9)));
    assert_eq!(engine.elapsed_secs(), 5);
}

#[test]
fn tick_from_previous_session_is_ignored() {
    let mut engine = BoardEngine::new(Difficulty::Beginner, 5);
    let t0 = Instant::now();
    engine.toggle_flag_at((0, 0), t0);
    let stale = engine.session_id();

    engine.reset(Difficulty::Beginner, 6);
    engine.toggle_flag_at((0, 0), t0);

    assert!(!engine.tick_at(stale, t0 + Duration::from_secs(4)));
    assert_eq!(engine.elapsed_secs(), 0);
    assert!(engine.tick_at(engine.session_id(), t0 + Duration::from_secs(4)));
    assert_eq!(engine.elapsed_secs(), 4);
}

#[test]
fn reset_with_board_replaces_a_finished_game() {
    let mut engine = engine((2, 2), &[(0, 0)]);
    engine.reveal((0, 0));
    assert!(engine.is_over());

    engine.reset_with_board(Board::from_mine_coords((2, 2), &[(1, 1)]).unwrap());

    assert_eq!(engine.status(), Status::Idle);
    assert_eq!(engine.triggered_mine(), None);
    assert!(revealed_cells(&engine).is_empty());
    assert_eq!(engine.difficulty(), None);
}
