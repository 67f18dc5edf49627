use queens_master_board::{self as board, query, Board};
use queens_master_core::{CellCoord, CellState, Colour, Command, Event, Grid, GridSize};
use queens_master_system_editor::{Editor, EditorInput};

fn click(editor: &mut Editor, events: &[Event], grid: &Grid, cell: CellCoord) -> Vec<Command> {
    let mut commands = Vec::new();
    editor.handle(events, EditorInput::click(cell), grid, &mut commands);
    commands
}

#[test]
fn click_without_paint_cycles_state() {
    let mut editor = Editor::new();
    let grid = Grid::filled(GridSize::new(4, 4));
    let cell = CellCoord::new(2, 1);

    assert_eq!(
        click(&mut editor, &[], &grid, cell),
        vec![Command::CycleCellState { cell }],
    );
}

#[test]
fn click_with_paint_recolours_cell() {
    let mut editor = Editor::new();
    editor.select_colour(Colour::new("#e2ba45"));
    let grid = Grid::filled(GridSize::new(4, 4));
    let cell = CellCoord::new(0, 3);

    assert_eq!(
        click(&mut editor, &[], &grid, cell),
        vec![Command::PaintCell {
            cell,
            colour: Colour::new("#e2ba45"),
        }],
    );
}

#[test]
fn painting_matching_colour_emits_nothing() {
    let mut editor = Editor::new();
    editor.select_colour(Colour::default());
    let grid = Grid::filled(GridSize::new(4, 4));

    assert!(
        click(&mut editor, &[], &grid, CellCoord::new(1, 1)).is_empty(),
        "repainting a cell with its own colour must be a no-op",
    );
}

#[test]
fn selecting_active_colour_toggles_selection_off() {
    let mut editor = Editor::new();
    editor.select_colour(Colour::new("#9178d0"));
    assert_eq!(editor.selected_colour(), Some(&Colour::new("#9178d0")));

    editor.select_colour(Colour::new("#9178d0"));
    assert_eq!(editor.selected_colour(), None);

    editor.select_colour(Colour::new("#9178d0"));
    editor.select_colour(Colour::new("#47b3b0"));
    assert_eq!(editor.selected_colour(), Some(&Colour::new("#47b3b0")));

    editor.clear_selection();
    assert_eq!(editor.selected_colour(), None);
}

#[test]
fn clicks_outside_grid_are_ignored() {
    let mut editor = Editor::new();
    let grid = Grid::filled(GridSize::new(4, 4));
    assert!(click(&mut editor, &[], &grid, CellCoord::new(4, 0)).is_empty());
}

#[test]
fn clicks_are_suppressed_while_replay_holds_board() {
    let mut editor = Editor::new();
    let grid = Grid::filled(GridSize::new(4, 4));
    let cell = CellCoord::new(0, 0);

    let locked = [Event::EditLockChanged { locked: true }];
    assert!(click(&mut editor, &locked, &grid, cell).is_empty());
    assert!(editor.is_suppressed());
    assert!(click(&mut editor, &[], &grid, cell).is_empty());

    let released = [Event::EditLockChanged { locked: false }];
    assert_eq!(
        click(&mut editor, &released, &grid, cell),
        vec![Command::CycleCellState { cell }],
    );
}

#[test]
fn emitted_commands_drive_the_board_through_the_state_ring() {
    let mut board = Board::new();
    let mut editor = Editor::new();
    let cell = CellCoord::new(3, 3);
    let mut states = Vec::new();

    for _ in 0..3 {
        let commands = click(&mut editor, &[], query::grid(&board), cell);
        for command in commands {
            let mut events = Vec::new();
            board::apply(&mut board, command, &mut events);
        }
        states.push(query::cell(&board, cell).map(|cell| cell.state));
    }

    assert_eq!(
        states,
        vec![
            Some(CellState::Marked),
            Some(CellState::Queen),
            Some(CellState::Empty),
        ]
    );
}
