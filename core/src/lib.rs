#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Queens Master board engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative board, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the board executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! observers to react to. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::{fmt, sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest supported number of rows or columns.
pub const MIN_DIMENSION: u32 = 4;

/// Largest supported number of rows or columns.
pub const MAX_DIMENSION: u32 = 10;

/// Number of rows and columns on a freshly created board.
pub const DEFAULT_DIMENSION: u32 = 8;

/// Colour token painted into every freshly initialised cell.
pub const DEFAULT_COLOUR: &str = "#a7bed9";

/// Delay between two consecutive replay snapshots.
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(1000);

/// Paint colours offered to the player when colouring regions.
pub const PALETTE: [&str; 10] = [
    "#c2658b", "#6082b5", "#acd995", "#a7bed9", "#47b3b0", "#67bce6", "#9178d0", "#e6a8c0",
    "#e2ba45", "brown",
];

/// Commands that express all permissible board mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Rebuilds the grid at the requested dimensions with default cells.
    Resize {
        /// Requested number of rows.
        rows: u32,
        /// Requested number of columns.
        columns: u32,
    },
    /// Resets every cell to the default colour and state, keeping dimensions.
    Clear,
    /// Merges the provided patch into a single cell.
    SetCell {
        /// Cell receiving the patch.
        cell: CellCoord,
        /// Fields to overwrite; absent fields are left untouched.
        patch: CellPatch,
    },
    /// Paints a cell with a colour, leaving its state untouched.
    PaintCell {
        /// Cell receiving the paint.
        cell: CellCoord,
        /// Colour applied to the cell.
        colour: Colour,
    },
    /// Advances a cell one step along `empty → marked → queen → empty`.
    CycleCellState {
        /// Cell whose state is cycled.
        cell: CellCoord,
    },
    /// Replaces the state of every cell while preserving colours.
    SetAllStates {
        /// State written into every cell.
        state: CellState,
    },
    /// Replaces the whole grid, typically with a solver's final board.
    LoadGrid {
        /// Grid that becomes the board content.
        grid: Grid,
    },
    /// Writes a replay snapshot onto the board.
    ApplySnapshot {
        /// Position of the snapshot within its step sequence.
        index: usize,
        /// Snapshot content.
        grid: Grid,
    },
    /// Engages or releases the lock that suspends user edits during a replay.
    SetEditLock {
        /// Whether user edits are suspended.
        locked: bool,
    },
    /// Advances the clock by the provided delta time.
    Tick {
        /// Duration of time that elapsed since the previous tick.
        dt: Duration,
    },
}

/// Events broadcast by the board after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the clock advanced.
    TimeAdvanced {
        /// Duration of time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the grid was rebuilt at new dimensions.
    GridResized {
        /// Dimensions of the rebuilt grid.
        size: GridSize,
    },
    /// Reports that a resize request fell outside the supported range.
    ResizeRejected {
        /// Rows requested by the caller.
        rows: u32,
        /// Columns requested by the caller.
        columns: u32,
        /// Specific reason the resize failed.
        reason: BoundsError,
    },
    /// Confirms that every cell was reset to its default.
    GridCleared {
        /// Dimensions of the cleared grid.
        size: GridSize,
    },
    /// Confirms that the grid content was replaced wholesale.
    GridLoaded {
        /// Dimensions of the loaded grid.
        size: GridSize,
    },
    /// Confirms that a single cell changed.
    CellChanged {
        /// Location of the cell.
        cell: CellCoord,
        /// Cell content before the change.
        before: Cell,
        /// Cell content after the change.
        after: Cell,
    },
    /// Confirms that every cell state was overwritten.
    StatesReset {
        /// State now held by every cell.
        state: CellState,
    },
    /// Reports that a user edit was refused.
    EditRejected {
        /// Specific reason the edit failed.
        reason: EditError,
    },
    /// Confirms that a replay snapshot is now displayed.
    SnapshotApplied {
        /// Position of the snapshot within its step sequence.
        index: usize,
    },
    /// Reports that a replay snapshot could not be displayed.
    SnapshotRejected {
        /// Position of the snapshot within its step sequence.
        index: usize,
        /// Specific reason the snapshot was refused.
        reason: SnapshotError,
    },
    /// Announces that the edit lock was engaged or released.
    EditLockChanged {
        /// Whether user edits are now suspended.
        locked: bool,
    },
}

/// Opaque colour token, usually a hex string such as `#ff0000`.
///
/// Colours carry no meaning beyond identity: two cells belong to the same
/// region exactly when their tokens compare equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Colour(String);

impl Colour {
    /// Wraps the provided token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Borrows the raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the default paint palette in display order.
    #[must_use]
    pub fn palette() -> Vec<Self> {
        PALETTE.iter().copied().map(Self::new).collect()
    }
}

impl Default for Colour {
    fn default() -> Self {
        Self::new(DEFAULT_COLOUR)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Colour {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for Colour {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// Occupancy state of a single cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellState {
    /// Nothing placed in the cell.
    #[default]
    Empty,
    /// Cell ruled out for a queen.
    Marked,
    /// Cell holds a queen.
    Queen,
}

impl CellState {
    /// Returns the state that follows in the click cycle.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Empty => Self::Marked,
            Self::Marked => Self::Queen,
            Self::Queen => Self::Empty,
        }
    }

    /// Wire name of the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Marked => "marked",
            Self::Queen => "queen",
        }
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Colour and occupancy of one board position.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Region colour of the cell.
    pub colour: Colour,
    /// Occupancy state of the cell.
    pub state: CellState,
}

impl Cell {
    /// Creates a cell from its two fields.
    #[must_use]
    pub fn new(colour: Colour, state: CellState) -> Self {
        Self { colour, state }
    }

    /// Returns a copy of the cell with the patch's fields overlaid.
    #[must_use]
    pub fn merged(&self, patch: &CellPatch) -> Self {
        Self {
            colour: patch.colour.clone().unwrap_or_else(|| self.colour.clone()),
            state: patch.state.unwrap_or(self.state),
        }
    }
}

/// Partial cell update; `None` fields keep their current value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellPatch {
    /// Replacement colour, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colour: Option<Colour>,
    /// Replacement state, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<CellState>,
}

impl CellPatch {
    /// Patch that only overwrites the colour.
    #[must_use]
    pub fn colour(colour: Colour) -> Self {
        Self {
            colour: Some(colour),
            state: None,
        }
    }

    /// Patch that only overwrites the state.
    #[must_use]
    pub const fn state(state: CellState) -> Self {
        Self {
            colour: None,
            state: Some(state),
        }
    }

    /// Reports whether the patch leaves every field untouched.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.colour.is_none() && self.state.is_none()
    }
}

/// Location of a single grid cell expressed as row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Dimensions of a grid measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    rows: u32,
    columns: u32,
}

impl GridSize {
    /// Creates a size descriptor without validating it against the supported range.
    #[must_use]
    pub const fn new(rows: u32, columns: u32) -> Self {
        Self { rows, columns }
    }

    /// Creates a size descriptor, rejecting dimensions outside
    /// [`MIN_DIMENSION`]`..=`[`MAX_DIMENSION`].
    pub fn checked(rows: u32, columns: u32) -> Result<Self, BoundsError> {
        let size = Self::new(rows, columns);
        if size.is_supported() {
            Ok(size)
        } else {
            Err(BoundsError::DimensionOutOfRange { rows, columns })
        }
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Total number of cells.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    /// Reports whether both dimensions lie within the supported range.
    #[must_use]
    pub const fn is_supported(&self) -> bool {
        self.rows >= MIN_DIMENSION
            && self.rows <= MAX_DIMENSION
            && self.columns >= MIN_DIMENSION
            && self.columns <= MAX_DIMENSION
    }

    /// Reports whether the cell lies inside a grid of this size.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.row() < self.rows && cell.column() < self.columns
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION, DEFAULT_DIMENSION)
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.columns)
    }
}

/// Rectangular matrix of cells representing the puzzle board.
///
/// A grid always holds at least one row and every row has the same length.
/// Mutating helpers return fresh grids so callers holding earlier values keep
/// observing the content they captured.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Cell>>", into = "Vec<Vec<Cell>>")]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    /// Builds a grid of the given size with every cell at its default.
    #[must_use]
    pub fn filled(size: GridSize) -> Self {
        let row = vec![Cell::default(); size.columns() as usize];
        Self {
            rows: vec![row; size.rows() as usize],
        }
    }

    /// Adopts the provided rows after checking that they form a rectangle.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, GridShapeError> {
        let expected = rows.first().map_or(0, Vec::len);
        if expected == 0 {
            return Err(GridShapeError::Empty);
        }
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != expected)
        {
            return Err(GridShapeError::Ragged {
                row,
                expected,
                found: cells.len(),
            });
        }
        Ok(Self { rows })
    }

    /// Dimensions of the grid.
    #[must_use]
    pub fn size(&self) -> GridSize {
        let rows = u32::try_from(self.rows.len()).unwrap_or(u32::MAX);
        let columns = u32::try_from(self.rows.first().map_or(0, Vec::len)).unwrap_or(u32::MAX);
        GridSize::new(rows, columns)
    }

    /// Returns the cell at the provided location, if it exists.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<&Cell> {
        self.rows
            .get(cell.row() as usize)
            .and_then(|row| row.get(cell.column() as usize))
    }

    /// Returns a new grid equal to this one except for the patched cell.
    pub fn with_cell(&self, cell: CellCoord, patch: &CellPatch) -> Result<Self, BoundsError> {
        let size = self.size();
        let current = self
            .cell(cell)
            .ok_or(BoundsError::CellOutOfRange { cell, size })?;
        let merged = current.merged(patch);
        let mut rows = self.rows.clone();
        rows[cell.row() as usize][cell.column() as usize] = merged;
        Ok(Self { rows })
    }

    /// Returns a new grid with every state replaced and colours preserved.
    #[must_use]
    pub fn with_all_states(&self, state: CellState) -> Self {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| Cell::new(cell.colour.clone(), state))
                    .collect()
            })
            .collect();
        Self { rows }
    }

    /// Iterator over the rows in top-to-bottom order.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Iterator over every cell together with its location, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, &Cell)> {
        self.rows.iter().zip(0u32..).flat_map(|(row, row_index)| {
            row.iter()
                .zip(0u32..)
                .map(move |(cell, column)| (CellCoord::new(row_index, column), cell))
        })
    }

    /// Counts the cells currently holding the provided state.
    #[must_use]
    pub fn count_state(&self, state: CellState) -> usize {
        self.cells().filter(|(_, cell)| cell.state == state).count()
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::filled(GridSize::default())
    }
}

impl TryFrom<Vec<Vec<Cell>>> for Grid {
    type Error = GridShapeError;

    fn try_from(rows: Vec<Vec<Cell>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<Grid> for Vec<Vec<Cell>> {
    fn from(grid: Grid) -> Self {
        grid.rows
    }
}

/// One frame of a solver's recorded solution trace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Board content after the solver's action.
    pub grid: Grid,
    /// State the solver wrote during this action.
    pub state: CellState,
    /// Terse description of the action, see the message parser.
    pub message: String,
}

/// Ordered, immutable trace returned by the solver for one solve request.
///
/// Cloning is cheap: clones share the underlying steps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Step>", into = "Vec<Step>")]
pub struct StepSequence {
    steps: Arc<[Step]>,
}

impl StepSequence {
    /// Freezes the provided steps into a sequence.
    #[must_use]
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Arc::from(steps),
        }
    }

    /// Number of steps in the sequence.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Reports whether the sequence holds no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns the step at the provided index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Returns the terminal step, which carries the solved board.
    #[must_use]
    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    /// Iterator over the steps in playback order.
    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }
}

impl Default for StepSequence {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl From<Vec<Step>> for StepSequence {
    fn from(steps: Vec<Step>) -> Self {
        Self::new(steps)
    }
}

impl From<StepSequence> for Vec<Step> {
    fn from(sequence: StepSequence) -> Self {
        sequence.steps.to_vec()
    }
}

/// Display form of a step description: text plus the colours it mentions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedMessage {
    /// Human-readable text with colour markers removed.
    pub message: String,
    /// Colours referenced by the description, in order of appearance.
    pub colours: Vec<Colour>,
}

impl ParsedMessage {
    /// Creates a message that references no colours.
    #[must_use]
    pub fn plain(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            colours: Vec::new(),
        }
    }
}

/// Reasons a size or location falls outside the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum BoundsError {
    /// Requested dimensions fall outside the supported range.
    #[error(
        "grid dimensions {}x{} are outside the supported range {}..={}",
        .rows,
        .columns,
        MIN_DIMENSION,
        MAX_DIMENSION
    )]
    DimensionOutOfRange {
        /// Rows requested by the caller.
        rows: u32,
        /// Columns requested by the caller.
        columns: u32,
    },
    /// Cell location lies outside the current grid.
    #[error("cell {cell} lies outside the {size} grid")]
    CellOutOfRange {
        /// Location supplied by the caller.
        cell: CellCoord,
        /// Dimensions of the grid at the time of the request.
        size: GridSize,
    },
}

/// Reasons a list of rows cannot form a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum GridShapeError {
    /// No rows, or rows without cells.
    #[error("grid contains no cells")]
    Empty,
    /// Rows of differing lengths.
    #[error("row {row} holds {found} cells, expected {expected}")]
    Ragged {
        /// Index of the first offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
}

/// Reasons a user edit may be rejected by the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum EditError {
    /// The edit targeted a cell outside the grid.
    #[error(transparent)]
    OutOfBounds(#[from] BoundsError),
    /// A replay currently owns the board.
    #[error("replay in progress; edits are suspended until it finishes or is cancelled")]
    ReplayInProgress,
}

/// Reasons a replay snapshot may be rejected by the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum SnapshotError {
    /// The snapshot's dimensions differ from the board's.
    #[error("snapshot is {found}, board is {expected}")]
    SizeMismatch {
        /// Dimensions of the board.
        expected: GridSize,
        /// Dimensions of the snapshot.
        found: GridSize,
    },
}

#[cfg(test)]
mod tests {
    use super::{
        BoundsError, Cell, CellCoord, CellPatch, CellState, Colour, Grid, GridShapeError,
        GridSize, Step, StepSequence, DEFAULT_COLOUR,
    };

    #[test]
    fn state_cycle_wraps_after_queen() {
        assert_eq!(CellState::Empty.next(), CellState::Marked);
        assert_eq!(CellState::Marked.next(), CellState::Queen);
        assert_eq!(CellState::Queen.next(), CellState::Empty);
    }

    #[test]
    fn checked_size_enforces_supported_range() {
        assert!(GridSize::checked(4, 10).is_ok());
        assert_eq!(
            GridSize::checked(3, 8),
            Err(BoundsError::DimensionOutOfRange {
                rows: 3,
                columns: 8
            })
        );
        assert!(GridSize::checked(8, 11).is_err());
        assert!(GridSize::checked(0, 0).is_err());
    }

    #[test]
    fn filled_grid_uses_default_cells() {
        let grid = Grid::filled(GridSize::new(5, 7));
        assert_eq!(grid.size(), GridSize::new(5, 7));
        assert_eq!(grid.cells().count(), 35);
        assert!(grid
            .cells()
            .all(|(_, cell)| cell.colour.as_str() == DEFAULT_COLOUR
                && cell.state == CellState::Empty));
    }

    #[test]
    fn with_cell_leaves_source_untouched() {
        let original = Grid::filled(GridSize::new(4, 4));
        let target = CellCoord::new(1, 2);
        let patched = original
            .with_cell(target, &CellPatch::state(CellState::Queen))
            .expect("cell inside grid");

        assert_eq!(original.cell(target).map(|cell| cell.state), Some(CellState::Empty));
        assert_eq!(patched.cell(target).map(|cell| cell.state), Some(CellState::Queen));
        let changed: Vec<_> = original
            .cells()
            .zip(patched.cells())
            .filter(|((_, a), (_, b))| a != b)
            .map(|((coord, _), _)| coord)
            .collect();
        assert_eq!(changed, vec![target], "only the patched cell may differ");
    }

    #[test]
    fn with_cell_rejects_out_of_range() {
        let grid = Grid::filled(GridSize::new(4, 5));
        let error = grid
            .with_cell(CellCoord::new(4, 0), &CellPatch::default())
            .expect_err("row 4 is outside a 4-row grid");
        assert_eq!(
            error,
            BoundsError::CellOutOfRange {
                cell: CellCoord::new(4, 0),
                size: GridSize::new(4, 5),
            }
        );
    }

    #[test]
    fn with_all_states_preserves_colours() {
        let painted = Grid::filled(GridSize::new(4, 4))
            .with_cell(
                CellCoord::new(0, 0),
                &CellPatch {
                    colour: Some(Colour::new("#ff0000")),
                    state: Some(CellState::Marked),
                },
            )
            .expect("cell inside grid");
        let reset = painted.with_all_states(CellState::Empty);
        assert_eq!(
            reset.cell(CellCoord::new(0, 0)),
            Some(&Cell::new(Colour::new("#ff0000"), CellState::Empty))
        );
        assert_eq!(reset.count_state(CellState::Empty), 16);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let rows = vec![vec![Cell::default(); 4], vec![Cell::default(); 3]];
        assert_eq!(
            Grid::from_rows(rows),
            Err(GridShapeError::Ragged {
                row: 1,
                expected: 4,
                found: 3
            })
        );
        assert_eq!(Grid::from_rows(Vec::new()), Err(GridShapeError::Empty));
    }

    #[test]
    fn step_wire_format_matches_solver_contract() {
        let json = r##"[
            {"grid": [[{"colour": "#c2658b", "state": "queen"}, {"colour": "#c2658b", "state": "marked"}]],
             "state": "queen",
             "message": "Placing queen(s) ['#c2658b']"}
        ]"##;
        let steps: StepSequence = serde_json::from_str(json).expect("valid trace");
        assert_eq!(steps.len(), 1);
        let step: &Step = steps.get(0).expect("first step");
        assert_eq!(step.state, CellState::Queen);
        assert_eq!(step.grid.size(), GridSize::new(1, 2));

        let encoded = serde_json::to_value(&steps).expect("serializable");
        assert_eq!(encoded[0]["grid"][0][1]["state"], "marked");
    }

    #[test]
    fn ragged_wire_grid_fails_to_decode() {
        let json = r##"{"grid": [[{"colour": "#fff", "state": "empty"}], []], "state": "empty", "message": ""}"##;
        assert!(serde_json::from_str::<Step>(json).is_err());
    }
}
