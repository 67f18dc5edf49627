#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure editing system that turns cell clicks into paint and state-cycle commands.

use queens_master_core::{CellCoord, Colour, Command, Event, Grid};

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EditorInput {
    /// Cell clicked by the player on this frame, if any.
    pub click: Option<CellCoord>,
}

impl EditorInput {
    /// Creates an input descriptor for a click on the provided cell.
    #[must_use]
    pub const fn click(cell: CellCoord) -> Self {
        Self { click: Some(cell) }
    }
}

/// Editing system that translates clicks plus the selected paint into commands.
///
/// With a paint colour selected a click recolours the cell; without one it
/// cycles the cell state. Clicks are dropped while a replay holds the board.
#[derive(Debug, Clone, Default)]
pub struct Editor {
    selected: Option<Colour>,
    edit_locked: bool,
}

impl Editor {
    /// Creates a new editor with no paint selected.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            selected: None,
            edit_locked: false,
        }
    }

    /// Selects a paint colour, or clears the selection when it is already active.
    pub fn select_colour(&mut self, colour: Colour) {
        if self.selected.as_ref() == Some(&colour) {
            self.selected = None;
        } else {
            self.selected = Some(colour);
        }
    }

    /// Drops the paint selection so clicks cycle states again.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Currently selected paint colour.
    #[must_use]
    pub fn selected_colour(&self) -> Option<&Colour> {
        self.selected.as_ref()
    }

    /// Reports whether clicks are currently being suppressed.
    #[must_use]
    pub const fn is_suppressed(&self) -> bool {
        self.edit_locked
    }

    /// Consumes board events and adapter input to emit edit commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        input: EditorInput,
        grid: &Grid,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if let Event::EditLockChanged { locked } = event {
                self.edit_locked = *locked;
            }
        }

        if self.edit_locked {
            return;
        }

        let Some(cell) = input.click else {
            return;
        };
        let Some(current) = grid.cell(cell) else {
            return;
        };

        match &self.selected {
            Some(colour) if *colour == current.colour => {}
            Some(colour) => out.push(Command::PaintCell {
                cell,
                colour: colour.clone(),
            }),
            None => out.push(Command::CycleCellState { cell }),
        }
    }
}
