#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Board surface that wires the board, the editing and replay systems and the
//! solver gateway together.
//!
//! Every operation turns into board commands which are pumped until the
//! systems stop producing follow-ups. Observers are notified of each board
//! event and of every change to the replay status.

use std::time::Duration;

use queens_master_board::{self as board, query, Board};
use queens_master_core::{
    BoundsError, CellCoord, CellPatch, CellState, Colour, Command, EditError, Event, Grid,
    ParsedMessage, StepSequence, DEFAULT_STEP_DELAY,
};
use queens_master_gateway::{GatewayError, SolveRequest, SolverGateway};
use queens_master_system_editor::{Editor, EditorInput};
use queens_master_system_messages as messages;
use queens_master_system_replay::{
    Config, Replay, ReplayError, ReplaySession, ReplayStatus, ReplayTimer,
};
use thiserror::Error;

/// Receives change notifications from a [`BoardSurface`].
pub trait SurfaceObserver {
    /// Called for every event the board emits, in order.
    fn board_changed(&mut self, _event: &Event) {}

    /// Called whenever the replay status differs from the last notification.
    ///
    /// Every index the replay passes through is reported, in order, even when
    /// a single [`BoardSurface::advance`] crosses several steps.
    fn replay_changed(&mut self, _status: ReplayStatus) {}
}

/// Handle returned by [`BoardSurface::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Failures reported by board surface operations.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// A dimension or coordinate fell outside the supported range.
    #[error(transparent)]
    Bounds(#[from] BoundsError),
    /// The board refused an edit.
    #[error(transparent)]
    Edit(#[from] EditError),
    /// The replay refused a transition.
    #[error(transparent)]
    Replay(#[from] ReplayError),
    /// No solution has been installed since the grid was last reset.
    #[error("there is no solution to replay")]
    NothingToReplay,
    /// The solver could not produce a solution.
    #[error("solve request failed: {0}")]
    Gateway(#[from] GatewayError),
}

/// Interactive board backed by the replay engine.
pub struct BoardSurface {
    board: Board,
    editor: Editor,
    replay: Replay,
    solution: Option<StepSequence>,
    observers: Vec<(SubscriptionId, Box<dyn SurfaceObserver>)>,
    next_subscription: u64,
}

impl Default for BoardSurface {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_DELAY)
    }
}

impl BoardSurface {
    /// Creates a surface with the default board and the given replay cadence.
    #[must_use]
    pub fn new(step_delay: Duration) -> Self {
        Self {
            board: Board::new(),
            editor: Editor::new(),
            replay: Replay::new(Config::new(step_delay)),
            solution: None,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Registers an observer for board and replay notifications.
    pub fn subscribe(&mut self, observer: Box<dyn SurfaceObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, observer));
        id
    }

    /// Removes an observer. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(candidate, _)| *candidate != id);
        self.observers.len() != before
    }

    /// Current grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        query::grid(&self.board)
    }

    /// Paint colour applied by clicks, if any.
    #[must_use]
    pub fn selected_colour(&self) -> Option<&Colour> {
        self.editor.selected_colour()
    }

    /// Last solution returned by the solver, if still valid for the grid.
    #[must_use]
    pub fn solution(&self) -> Option<&StepSequence> {
        self.solution.as_ref()
    }

    /// Replay progress. Before a replay starts the step count reflects the
    /// installed solution.
    #[must_use]
    pub fn replay_status(&self) -> ReplayStatus {
        let status = self.replay.status();
        if self.replay.session().is_some() {
            return status;
        }
        ReplayStatus {
            step_count: self.solution.as_ref().map_or(0, StepSequence::len),
            ..status
        }
    }

    /// Parsed narration of the step currently on the board.
    #[must_use]
    pub fn current_message(&self) -> Option<ParsedMessage> {
        self.replay
            .current_step()
            .map(|step| messages::parse(&step.message))
    }

    /// Replaces the grid with an empty one of the given size.
    pub fn resize(&mut self, rows: u32, columns: u32) -> Result<(), SurfaceError> {
        self.transition(|surface| {
            let events = surface.execute(vec![Command::Resize { rows, columns }]);
            match events.iter().find_map(|event| match event {
                Event::ResizeRejected { reason, .. } => Some(*reason),
                _ => None,
            }) {
                Some(reason) => Err(reason.into()),
                None => Ok(()),
            }
        })
    }

    /// Resets every cell to the default colour and the empty state.
    pub fn clear(&mut self) {
        self.transition(|surface| {
            let _ = surface.execute(vec![Command::Clear]);
        });
    }

    /// Selects a paint colour, or deselects it when it is already selected.
    pub fn select_colour(&mut self, colour: Colour) {
        self.editor.select_colour(colour);
    }

    /// Drops the paint selection so clicks cycle cell states.
    pub fn clear_colour_selection(&mut self) {
        self.editor.clear_selection();
    }

    /// Handles a click: paints with the selected colour or cycles the state.
    pub fn click(&mut self, cell: CellCoord) -> Result<(), SurfaceError> {
        if self.editor.is_suppressed() {
            tracing::warn!(%cell, "click ignored while a replay holds the board");
            return Err(EditError::ReplayInProgress.into());
        }
        let size = query::size(&self.board);
        if !size.contains(cell) {
            return Err(BoundsError::CellOutOfRange { cell, size }.into());
        }

        let mut commands = Vec::new();
        self.editor.handle(
            &[],
            EditorInput::click(cell),
            query::grid(&self.board),
            &mut commands,
        );
        let events = self.execute(commands);
        rejection(&events)
    }

    /// Overwrites the given fields of one cell.
    pub fn set_cell(&mut self, cell: CellCoord, patch: CellPatch) -> Result<(), SurfaceError> {
        let events = self.execute(vec![Command::SetCell { cell, patch }]);
        rejection(&events)
    }

    /// Sets every cell's state, keeping colours.
    pub fn set_all_states(&mut self, state: CellState) -> Result<(), SurfaceError> {
        let events = self.execute(vec![Command::SetAllStates { state }]);
        rejection(&events)
    }

    /// Submits the grid to the solver and installs the returned solution.
    ///
    /// Any previous replay and solution are dropped before the request is sent.
    /// On failure the grid is left as it was. Returns the number of steps.
    pub async fn solve<G>(&mut self, gateway: &G) -> Result<usize, SurfaceError>
    where
        G: SolverGateway + ?Sized,
    {
        self.transition(|surface| {
            let mut commands = Vec::new();
            surface.replay.discard(&mut commands);
            let _ = surface.execute(commands);
            surface.solution = None;
        });

        let request = SolveRequest::from_grid(self.grid());
        match gateway.solve(&request).await {
            Ok(steps) => {
                tracing::info!(steps = steps.len(), "solver returned a solution");
                self.install_solution(steps)
            }
            Err(error) => {
                tracing::warn!(%error, "solve request failed");
                Err(error.into())
            }
        }
    }

    /// Installs a solution: the final step becomes the board's resting state and
    /// the sequence becomes available for replay.
    pub fn install_solution(&mut self, steps: StepSequence) -> Result<usize, SurfaceError> {
        self.transition(|surface| {
            let mut commands = Vec::new();
            surface.replay.discard(&mut commands);
            if let Some(last) = steps.last() {
                commands.push(Command::LoadGrid {
                    grid: last.grid.clone(),
                });
            }
            let events = surface.execute(commands);
            rejection(&events)?;

            let count = steps.len();
            surface.solution = Some(steps);
            Ok(count)
        })
    }

    /// Starts replaying the installed solution from its first step.
    pub fn start_replay(&mut self) -> Result<(), SurfaceError> {
        let steps = self.solution.clone().ok_or(SurfaceError::NothingToReplay)?;
        self.transition(|surface| {
            let mut commands = Vec::new();
            surface.replay.start(steps, &mut commands)?;
            let _ = surface.execute(commands);
            Ok(())
        })
    }

    /// Holds the replay at its current step.
    pub fn pause_replay(&mut self) -> Result<(), SurfaceError> {
        self.transition(|surface| Ok(surface.replay.pause()?))
    }

    /// Continues a paused replay after a full step delay.
    pub fn resume_replay(&mut self) -> Result<(), SurfaceError> {
        self.transition(|surface| Ok(surface.replay.resume()?))
    }

    /// Pauses a playing replay or resumes a paused one.
    pub fn toggle_pause(&mut self) -> Result<(), SurfaceError> {
        self.transition(|surface| Ok(surface.replay.toggle_pause()?))
    }

    /// Stops the replay, leaving the last shown snapshot on the board.
    pub fn cancel_replay(&mut self) -> Result<(), SurfaceError> {
        self.transition(|surface| {
            let mut commands = Vec::new();
            surface.replay.cancel(&mut commands)?;
            let _ = surface.execute(commands);
            Ok(())
        })
    }

    /// Lets `dt` of time pass, firing any replay steps that become due.
    ///
    /// Time is fed to the board in slices that end on timer deadlines, so a
    /// long `dt` produces one replay notification per step it crosses.
    pub fn advance(&mut self, dt: Duration) {
        let mut left = dt;
        loop {
            let slice = self
                .replay
                .session()
                .and_then(ReplaySession::timer)
                .map(ReplayTimer::remaining)
                .filter(|remaining| !remaining.is_zero())
                .map_or(left, |remaining| remaining.min(left));
            self.transition(|surface| {
                let _ = surface.execute(vec![Command::Tick { dt: slice }]);
            });
            left = left.saturating_sub(slice);
            if left.is_zero() {
                break;
            }
        }
    }

    fn transition<T>(&mut self, operation: impl FnOnce(&mut Self) -> T) -> T {
        let before = self.replay_status();
        let result = operation(self);
        let after = self.replay_status();
        if before != after {
            if before.phase != after.phase {
                tracing::info!(
                    from = %before.phase,
                    to = %after.phase,
                    steps = after.step_count,
                    "replay phase changed"
                );
            } else {
                tracing::debug!(index = ?after.current_index, "replay advanced");
            }
            for (_, observer) in &mut self.observers {
                observer.replay_changed(after);
            }
        }
        result
    }

    fn execute(&mut self, commands: Vec<Command>) -> Vec<Event> {
        let mut emitted = Vec::new();
        let mut pending = commands;
        while !pending.is_empty() {
            let mut events = Vec::new();
            for command in pending.drain(..) {
                board::apply(&mut self.board, command, &mut events);
            }

            for event in &events {
                match event {
                    Event::TimeAdvanced { .. } => continue,
                    Event::GridResized { .. } | Event::GridCleared { .. } => self.solution = None,
                    Event::EditRejected { reason } => {
                        tracing::warn!(%reason, "edit rejected");
                    }
                    Event::ResizeRejected { reason, .. } => {
                        tracing::warn!(%reason, "resize rejected");
                    }
                    Event::SnapshotRejected { index, reason } => {
                        tracing::warn!(index, %reason, "snapshot rejected, stopping replay");
                    }
                    _ => {}
                }
                for (_, observer) in &mut self.observers {
                    observer.board_changed(event);
                }
            }

            self.replay.handle(&events, &mut pending);
            self.editor.handle(
                &events,
                EditorInput::default(),
                query::grid(&self.board),
                &mut pending,
            );
            emitted.extend(events);
        }
        emitted
    }
}

fn rejection(events: &[Event]) -> Result<(), SurfaceError> {
    match events.iter().find_map(|event| match event {
        Event::EditRejected { reason } => Some(*reason),
        _ => None,
    }) {
        Some(reason) => Err(reason.into()),
        None => Ok(()),
    }
}
