use std::time::Duration;

use queens_master_board::{self as board, query, Board};
use queens_master_core::{
    BoundsError, Cell, CellCoord, CellPatch, CellState, Colour, Command, EditError, Event, Grid,
    GridSize, SnapshotError, DEFAULT_COLOUR, MAX_DIMENSION, MIN_DIMENSION,
};

fn run(board: &mut Board, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    board::apply(board, command, &mut events);
    events
}

fn painted_board() -> Board {
    let mut board = Board::new();
    let _ = run(
        &mut board,
        Command::Resize {
            rows: 4,
            columns: 4,
        },
    );
    let _ = run(
        &mut board,
        Command::SetCell {
            cell: CellCoord::new(1, 1),
            patch: CellPatch {
                colour: Some(Colour::new("#c2658b")),
                state: Some(CellState::Queen),
            },
        },
    );
    board
}

#[test]
fn resize_produces_default_cells_for_every_supported_size() {
    let mut board = Board::new();
    for rows in MIN_DIMENSION..=MAX_DIMENSION {
        for columns in MIN_DIMENSION..=MAX_DIMENSION {
            let events = run(&mut board, Command::Resize { rows, columns });
            let size = GridSize::new(rows, columns);
            assert_eq!(events, vec![Event::GridResized { size }]);

            let grid = query::grid(&board);
            assert_eq!(grid.size(), size);
            assert_eq!(grid.cells().count(), size.cell_count());
            assert!(
                grid.cells().all(|(_, cell)| *cell == Cell::default()),
                "resized {size} grid must hold only default cells",
            );
        }
    }
}

#[test]
fn resize_discards_previous_content() {
    let mut board = painted_board();
    let _ = run(
        &mut board,
        Command::Resize {
            rows: 5,
            columns: 4,
        },
    );
    assert_eq!(
        query::cell(&board, CellCoord::new(1, 1)),
        Some(&Cell::default()),
        "resizing must not preserve painted cells",
    );
}

#[test]
fn out_of_range_resize_keeps_prior_grid() {
    let mut board = painted_board();
    let before = query::grid(&board).clone();

    for (rows, columns) in [(0, 4), (3, 4), (4, 11), (MAX_DIMENSION + 1, MAX_DIMENSION)] {
        let events = run(&mut board, Command::Resize { rows, columns });
        assert_eq!(
            events,
            vec![Event::ResizeRejected {
                rows,
                columns,
                reason: BoundsError::DimensionOutOfRange { rows, columns },
            }],
        );
        assert_eq!(query::grid(&board), &before, "rejected resize must not mutate");
    }
}

#[test]
fn clear_resets_cells_at_current_dimensions() {
    let mut board = painted_board();
    let events = run(&mut board, Command::Clear);
    assert_eq!(
        events,
        vec![Event::GridCleared {
            size: GridSize::new(4, 4)
        }]
    );
    assert_eq!(query::grid(&board), &Grid::filled(GridSize::new(4, 4)));
}

#[test]
fn set_cell_is_local_and_reports_change() {
    let mut board = painted_board();
    let before = query::grid(&board).clone();
    let target = CellCoord::new(2, 3);

    let events = run(
        &mut board,
        Command::SetCell {
            cell: target,
            patch: CellPatch::state(CellState::Marked),
        },
    );

    assert_eq!(
        events,
        vec![Event::CellChanged {
            cell: target,
            before: Cell::default(),
            after: Cell::new(Colour::new(DEFAULT_COLOUR), CellState::Marked),
        }]
    );
    let after = query::grid(&board);
    for ((coord, old), (_, new)) in before.cells().zip(after.cells()) {
        if coord != target {
            assert_eq!(old, new, "cell {coord} must not change");
        }
    }
}

#[test]
fn set_cell_outside_grid_is_rejected() {
    let mut board = painted_board();
    let before = query::grid(&board).clone();
    let events = run(
        &mut board,
        Command::SetCell {
            cell: CellCoord::new(0, 4),
            patch: CellPatch::state(CellState::Queen),
        },
    );
    assert_eq!(
        events,
        vec![Event::EditRejected {
            reason: EditError::OutOfBounds(BoundsError::CellOutOfRange {
                cell: CellCoord::new(0, 4),
                size: GridSize::new(4, 4),
            }),
        }]
    );
    assert_eq!(query::grid(&board), &before);
}

#[test]
fn painting_current_colour_is_silent() {
    let mut board = painted_board();
    let events = run(
        &mut board,
        Command::PaintCell {
            cell: CellCoord::new(1, 1),
            colour: Colour::new("#c2658b"),
        },
    );
    assert!(events.is_empty(), "repeated paint must not emit a change");

    let events = run(
        &mut board,
        Command::PaintCell {
            cell: CellCoord::new(1, 1),
            colour: Colour::new("#6082b5"),
        },
    );
    assert_eq!(
        events,
        vec![Event::CellChanged {
            cell: CellCoord::new(1, 1),
            before: Cell::new(Colour::new("#c2658b"), CellState::Queen),
            after: Cell::new(Colour::new("#6082b5"), CellState::Queen),
        }],
        "paint must keep the state untouched",
    );
}

#[test]
fn cycling_walks_the_state_ring() {
    let mut board = Board::new();
    let cell = CellCoord::new(0, 0);
    let mut observed = Vec::new();
    for _ in 0..4 {
        let _ = run(&mut board, Command::CycleCellState { cell });
        observed.push(query::cell(&board, cell).map(|cell| cell.state));
    }
    assert_eq!(
        observed,
        vec![
            Some(CellState::Marked),
            Some(CellState::Queen),
            Some(CellState::Empty),
            Some(CellState::Marked),
        ]
    );
}

#[test]
fn set_all_states_keeps_colours() {
    let mut board = painted_board();
    let events = run(
        &mut board,
        Command::SetAllStates {
            state: CellState::Empty,
        },
    );
    assert_eq!(
        events,
        vec![Event::StatesReset {
            state: CellState::Empty
        }]
    );
    assert_eq!(
        query::cell(&board, CellCoord::new(1, 1)),
        Some(&Cell::new(Colour::new("#c2658b"), CellState::Empty))
    );
}

#[test]
fn edit_lock_refuses_user_edits_but_accepts_snapshots() {
    let mut board = painted_board();
    let _ = run(&mut board, Command::SetEditLock { locked: true });
    let before = query::grid(&board).clone();

    let refused = [
        Command::PaintCell {
            cell: CellCoord::new(0, 0),
            colour: Colour::new("#e2ba45"),
        },
        Command::CycleCellState {
            cell: CellCoord::new(0, 0),
        },
        Command::SetCell {
            cell: CellCoord::new(0, 0),
            patch: CellPatch::state(CellState::Queen),
        },
        Command::SetAllStates {
            state: CellState::Marked,
        },
        Command::LoadGrid {
            grid: Grid::filled(GridSize::new(4, 4)),
        },
    ];
    for command in refused {
        let events = run(&mut board, command.clone());
        assert_eq!(
            events,
            vec![Event::EditRejected {
                reason: EditError::ReplayInProgress
            }],
            "{command:?} must be refused while locked",
        );
    }
    assert_eq!(query::grid(&board), &before);

    let snapshot = before.with_all_states(CellState::Marked);
    let events = run(
        &mut board,
        Command::ApplySnapshot {
            index: 3,
            grid: snapshot.clone(),
        },
    );
    assert_eq!(events, vec![Event::SnapshotApplied { index: 3 }]);
    assert_eq!(query::grid(&board), &snapshot);
}

#[test]
fn snapshot_with_foreign_dimensions_is_rejected() {
    let mut board = painted_board();
    let events = run(
        &mut board,
        Command::ApplySnapshot {
            index: 0,
            grid: Grid::filled(GridSize::new(5, 5)),
        },
    );
    assert_eq!(
        events,
        vec![Event::SnapshotRejected {
            index: 0,
            reason: SnapshotError::SizeMismatch {
                expected: GridSize::new(4, 4),
                found: GridSize::new(5, 5),
            },
        }]
    );
}

#[test]
fn load_grid_adopts_supported_dimensions_only() {
    let mut board = Board::new();
    let loaded = Grid::filled(GridSize::new(6, 5)).with_all_states(CellState::Queen);
    let events = run(
        &mut board,
        Command::LoadGrid {
            grid: loaded.clone(),
        },
    );
    assert_eq!(
        events,
        vec![Event::GridLoaded {
            size: GridSize::new(6, 5)
        }]
    );
    assert_eq!(query::grid(&board), &loaded);

    let events = run(
        &mut board,
        Command::LoadGrid {
            grid: Grid::filled(GridSize::new(2, 2)),
        },
    );
    assert!(matches!(
        events.as_slice(),
        [Event::EditRejected {
            reason: EditError::OutOfBounds(BoundsError::DimensionOutOfRange { .. })
        }]
    ));
    assert_eq!(query::grid(&board), &loaded);
}

#[test]
fn tick_is_broadcast_as_time_advanced() {
    let mut board = Board::new();
    let dt = Duration::from_millis(16);
    assert_eq!(
        run(&mut board, Command::Tick { dt }),
        vec![Event::TimeAdvanced { dt }]
    );
}
