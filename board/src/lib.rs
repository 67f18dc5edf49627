#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative board state management for Queens Master.
//!
//! The board owns the single shared [`Grid`]. Every mutation arrives as a
//! [`Command`] through [`apply`], which reports what changed as [`Event`]
//! values. While a replay holds the edit lock, user-class edits are refused
//! and only replay snapshots may write to the grid.

use queens_master_core::{
    BoundsError, CellCoord, CellPatch, CellState, Command, EditError, Event, Grid, GridSize,
    SnapshotError,
};

/// Represents the authoritative Queens Master board state.
#[derive(Debug)]
pub struct Board {
    grid: Grid,
    edit_locked: bool,
}

impl Board {
    /// Creates a default-sized board with every cell at its default.
    #[must_use]
    pub fn new() -> Self {
        Self::with_grid(Grid::default())
    }

    /// Creates a board seeded with the provided grid.
    #[must_use]
    pub fn with_grid(grid: Grid) -> Self {
        Self {
            grid,
            edit_locked: false,
        }
    }

    fn accepts_edits(&self, out_events: &mut Vec<Event>) -> bool {
        if self.edit_locked {
            out_events.push(Event::EditRejected {
                reason: EditError::ReplayInProgress,
            });
            return false;
        }
        true
    }

    fn patch_cell(&mut self, cell: CellCoord, patch: &CellPatch, out_events: &mut Vec<Event>) {
        let Some(before) = self.grid.cell(cell).cloned() else {
            out_events.push(Event::EditRejected {
                reason: EditError::OutOfBounds(BoundsError::CellOutOfRange {
                    cell,
                    size: self.grid.size(),
                }),
            });
            return;
        };

        let after = before.merged(patch);
        if after == before {
            return;
        }

        match self.grid.with_cell(cell, patch) {
            Ok(grid) => {
                self.grid = grid;
                out_events.push(Event::CellChanged {
                    cell,
                    before,
                    after,
                });
            }
            Err(reason) => out_events.push(Event::EditRejected {
                reason: reason.into(),
            }),
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the board, mutating state deterministically.
pub fn apply(board: &mut Board, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Resize { rows, columns } => match GridSize::checked(rows, columns) {
            Ok(size) => {
                board.grid = Grid::filled(size);
                out_events.push(Event::GridResized { size });
            }
            Err(reason) => out_events.push(Event::ResizeRejected {
                rows,
                columns,
                reason,
            }),
        },
        Command::Clear => {
            let size = board.grid.size();
            board.grid = Grid::filled(size);
            out_events.push(Event::GridCleared { size });
        }
        Command::SetCell { cell, patch } => {
            if board.accepts_edits(out_events) {
                board.patch_cell(cell, &patch, out_events);
            }
        }
        Command::PaintCell { cell, colour } => {
            if board.accepts_edits(out_events) {
                board.patch_cell(cell, &CellPatch::colour(colour), out_events);
            }
        }
        Command::CycleCellState { cell } => {
            if board.accepts_edits(out_events) {
                let next = board
                    .grid
                    .cell(cell)
                    .map_or(CellState::Empty, |current| current.state.next());
                board.patch_cell(cell, &CellPatch::state(next), out_events);
            }
        }
        Command::SetAllStates { state } => {
            if board.accepts_edits(out_events) {
                board.grid = board.grid.with_all_states(state);
                out_events.push(Event::StatesReset { state });
            }
        }
        Command::LoadGrid { grid } => {
            if !board.accepts_edits(out_events) {
                return;
            }
            let size = grid.size();
            if let Err(reason) = GridSize::checked(size.rows(), size.columns()) {
                out_events.push(Event::EditRejected {
                    reason: reason.into(),
                });
                return;
            }
            board.grid = grid;
            out_events.push(Event::GridLoaded { size });
        }
        Command::ApplySnapshot { index, grid } => {
            let expected = board.grid.size();
            let found = grid.size();
            if expected != found {
                out_events.push(Event::SnapshotRejected {
                    index,
                    reason: SnapshotError::SizeMismatch { expected, found },
                });
                return;
            }
            board.grid = grid;
            out_events.push(Event::SnapshotApplied { index });
        }
        Command::SetEditLock { locked } => {
            if board.edit_locked != locked {
                board.edit_locked = locked;
                out_events.push(Event::EditLockChanged { locked });
            }
        }
        Command::Tick { dt } => out_events.push(Event::TimeAdvanced { dt }),
    }
}

/// Query functions that provide read-only access to the board state.
pub mod query {
    use queens_master_core::{Cell, CellCoord, Grid, GridSize};

    use super::Board;

    /// Provides read-only access to the current grid.
    #[must_use]
    pub fn grid(board: &Board) -> &Grid {
        &board.grid
    }

    /// Dimensions of the current grid.
    #[must_use]
    pub fn size(board: &Board) -> GridSize {
        board.grid.size()
    }

    /// Returns the cell at the provided location, if it exists.
    #[must_use]
    pub fn cell(board: &Board, cell: CellCoord) -> Option<&Cell> {
        board.grid.cell(cell)
    }

    /// Reports whether a replay currently suspends user edits.
    #[must_use]
    pub fn is_edit_locked(board: &Board) -> bool {
        board.edit_locked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_board_uses_default_dimensions() {
        let board = Board::new();
        assert_eq!(query::size(&board), GridSize::default());
        assert!(!query::is_edit_locked(&board));
    }

    #[test]
    fn lock_event_only_fires_on_change() {
        let mut board = Board::new();
        let mut events = Vec::new();
        apply(&mut board, Command::SetEditLock { locked: true }, &mut events);
        apply(&mut board, Command::SetEditLock { locked: true }, &mut events);
        assert_eq!(events, vec![Event::EditLockChanged { locked: true }]);
    }
}
