#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Replay system that plays a solver's step sequence back onto the board.
//!
//! The replay is a four-phase machine: idle, playing, paused and finished.
//! Starting writes the first snapshot immediately and arms a single-shot
//! [`ReplayTimer`]. Every time the timer fires the next snapshot is applied
//! and a fresh timer is armed, until the sequence runs out. Time only reaches
//! the system through [`Event::TimeAdvanced`], so playback is deterministic
//! for a given event stream.

use std::{fmt, time::Duration};

use queens_master_core::{CellState, Command, Event, Step, StepSequence, DEFAULT_STEP_DELAY};
use thiserror::Error;

/// Configuration parameters required to construct the replay system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    step_delay: Duration,
}

impl Config {
    /// Creates a new configuration using the provided delay between snapshots.
    #[must_use]
    pub const fn new(step_delay: Duration) -> Self {
        Self { step_delay }
    }

    /// Delay between two consecutive snapshots.
    #[must_use]
    pub const fn step_delay(&self) -> Duration {
        self.step_delay
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_DELAY)
    }
}

/// Lifecycle phase of the replay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReplayPhase {
    /// No replay has started, or the last one was cancelled.
    Idle,
    /// Snapshots advance automatically.
    Playing,
    /// Playback holds its position.
    Paused,
    /// Every snapshot has been shown; nothing further is scheduled.
    Finished,
}

impl fmt::Display for ReplayPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Finished => "finished",
        })
    }
}

/// Transition a caller may request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReplayAction {
    /// Begin playback of a new sequence.
    Start,
    /// Hold the current position.
    Pause,
    /// Continue from the held position.
    Resume,
    /// Abandon playback.
    Cancel,
}

impl fmt::Display for ReplayAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Cancel => "cancel",
        })
    }
}

/// Reasons a replay transition may be refused. Refusals leave the replay untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum ReplayError {
    /// The transition is not available from the current phase.
    #[error("cannot {action} a replay that is {phase}")]
    InvalidTransition {
        /// Transition that was requested.
        action: ReplayAction,
        /// Phase the replay was in.
        phase: ReplayPhase,
    },
    /// A replay needs at least one step.
    #[error("step sequence is empty")]
    EmptySequence,
}

/// Point-in-time summary of the replay for observers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ReplayStatus {
    /// Current lifecycle phase.
    pub phase: ReplayPhase,
    /// Index of the displayed snapshot; `None` before a replay starts.
    /// Equals `step_count` once finished.
    pub current_index: Option<usize>,
    /// Number of steps in the installed sequence.
    pub step_count: usize,
}

/// Outcome of advancing a [`ReplayTimer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerOutcome {
    /// The deadline has not been reached.
    Pending,
    /// The deadline passed; `overshoot` is the time elapsed beyond it.
    Fired {
        /// Time elapsed past the deadline.
        overshoot: Duration,
    },
}

/// Cancellable single-shot countdown scheduling the next replay advance.
///
/// At most one timer is outstanding per session. Dropping the handle cancels it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayTimer {
    remaining: Duration,
}

impl ReplayTimer {
    /// Arms a timer that fires once `delay` has elapsed.
    #[must_use]
    pub const fn armed(delay: Duration) -> Self {
        Self { remaining: delay }
    }

    /// Time left before the timer fires.
    #[must_use]
    pub const fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Counts `dt` against the deadline.
    pub fn advance(&mut self, dt: Duration) -> TimerOutcome {
        if dt >= self.remaining {
            let overshoot = dt - self.remaining;
            self.remaining = Duration::ZERO;
            TimerOutcome::Fired { overshoot }
        } else {
            self.remaining -= dt;
            TimerOutcome::Pending
        }
    }
}

/// Ephemeral playback state over one step sequence.
#[derive(Clone, Debug)]
pub struct ReplaySession {
    steps: StepSequence,
    current_index: Option<usize>,
    is_playing: bool,
    timer: Option<ReplayTimer>,
}

impl ReplaySession {
    /// Sequence being played back.
    #[must_use]
    pub fn steps(&self) -> &StepSequence {
        &self.steps
    }

    /// Index of the displayed snapshot; `None` while idle.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// Reports whether snapshots advance automatically.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Outstanding timer, if one is armed.
    #[must_use]
    pub fn timer(&self) -> Option<&ReplayTimer> {
        self.timer.as_ref()
    }

    /// Lifecycle phase derived from the index and play flag.
    #[must_use]
    pub fn phase(&self) -> ReplayPhase {
        match self.current_index {
            None => ReplayPhase::Idle,
            Some(index) if index >= self.steps.len() => ReplayPhase::Finished,
            Some(_) if self.is_playing => ReplayPhase::Playing,
            Some(_) => ReplayPhase::Paused,
        }
    }
}

/// Replay controller that converts a step sequence into timed board snapshots.
#[derive(Debug)]
pub struct Replay {
    step_delay: Duration,
    session: Option<ReplaySession>,
}

impl Default for Replay {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Replay {
    /// Creates a new replay system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            step_delay: config.step_delay(),
            session: None,
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> ReplayPhase {
        self.session
            .as_ref()
            .map_or(ReplayPhase::Idle, ReplaySession::phase)
    }

    /// Active session, if a sequence has been started and not discarded.
    #[must_use]
    pub fn session(&self) -> Option<&ReplaySession> {
        self.session.as_ref()
    }

    /// Summary suitable for change notifications.
    #[must_use]
    pub fn status(&self) -> ReplayStatus {
        ReplayStatus {
            phase: self.phase(),
            current_index: self.session.as_ref().and_then(|s| s.current_index),
            step_count: self.session.as_ref().map_or(0, |s| s.steps.len()),
        }
    }

    /// Step whose snapshot is on the board. Once finished this is the final step.
    #[must_use]
    pub fn current_step(&self) -> Option<&Step> {
        let session = self.session.as_ref()?;
        let index = session.current_index?;
        session.steps.get(index).or_else(|| session.steps.last())
    }

    /// Begins playback of `steps` from the first snapshot.
    ///
    /// Only available while idle or finished. Emits a state reset (colours are
    /// kept), engages the edit lock and writes the first snapshot.
    pub fn start(&mut self, steps: StepSequence, out: &mut Vec<Command>) -> Result<(), ReplayError> {
        match self.phase() {
            ReplayPhase::Idle | ReplayPhase::Finished => {}
            phase => {
                return Err(ReplayError::InvalidTransition {
                    action: ReplayAction::Start,
                    phase,
                })
            }
        }
        let Some(first) = steps.get(0) else {
            return Err(ReplayError::EmptySequence);
        };

        out.push(Command::SetAllStates {
            state: CellState::Empty,
        });
        out.push(Command::SetEditLock { locked: true });
        out.push(Command::ApplySnapshot {
            index: 0,
            grid: first.grid.clone(),
        });

        self.session = Some(ReplaySession {
            steps,
            current_index: Some(0),
            is_playing: true,
            timer: Some(ReplayTimer::armed(self.step_delay)),
        });
        Ok(())
    }

    /// Holds the current position and cancels the outstanding timer.
    pub fn pause(&mut self) -> Result<(), ReplayError> {
        let session = self.session_in(ReplayPhase::Playing, ReplayAction::Pause)?;
        session.is_playing = false;
        session.timer = None;
        Ok(())
    }

    /// Continues from the held position after a fresh full delay.
    pub fn resume(&mut self) -> Result<(), ReplayError> {
        let step_delay = self.step_delay;
        let session = self.session_in(ReplayPhase::Paused, ReplayAction::Resume)?;
        session.is_playing = true;
        session.timer = Some(ReplayTimer::armed(step_delay));
        Ok(())
    }

    /// Pauses a playing replay or resumes a paused one.
    pub fn toggle_pause(&mut self) -> Result<(), ReplayError> {
        match self.phase() {
            ReplayPhase::Paused => self.resume(),
            _ => self.pause(),
        }
    }

    /// Returns to idle from any other phase.
    ///
    /// The last applied snapshot stays on the board.
    pub fn cancel(&mut self, out: &mut Vec<Command>) -> Result<(), ReplayError> {
        let phase = self.phase();
        if phase == ReplayPhase::Idle {
            return Err(ReplayError::InvalidTransition {
                action: ReplayAction::Cancel,
                phase,
            });
        }
        self.halt(out);
        Ok(())
    }

    /// Rewinds a live session to idle and releases the board. Idle sessions
    /// are left untouched.
    fn halt(&mut self, out: &mut Vec<Command>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.phase() == ReplayPhase::Idle {
            return;
        }
        session.current_index = None;
        session.is_playing = false;
        session.timer = None;
        out.push(Command::SetEditLock { locked: false });
    }

    /// Drops the session entirely, releasing the board if it was held.
    pub fn discard(&mut self, out: &mut Vec<Command>) {
        if let Some(session) = self.session.take() {
            if matches!(session.phase(), ReplayPhase::Playing | ReplayPhase::Paused) {
                out.push(Command::SetEditLock { locked: false });
            }
        }
    }

    /// Consumes board events, advancing playback as time passes.
    ///
    /// Resizing or clearing the grid discards the session. A rejected snapshot
    /// cancels playback.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        let mut elapsed = Duration::ZERO;
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => elapsed = elapsed.saturating_add(*dt),
                Event::GridResized { .. } | Event::GridCleared { .. } => {
                    self.discard(out);
                    elapsed = Duration::ZERO;
                }
                Event::SnapshotRejected { .. } => {
                    self.halt(out);
                    elapsed = Duration::ZERO;
                }
                _ => {}
            }
        }

        if !elapsed.is_zero() {
            self.advance(elapsed, out);
        }
    }

    fn advance(&mut self, elapsed: Duration, out: &mut Vec<Command>) {
        let step_delay = self.step_delay;
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !session.is_playing {
            return;
        }

        let mut budget = elapsed;
        while let Some(timer) = session.timer.as_mut() {
            let TimerOutcome::Fired { overshoot } = timer.advance(budget) else {
                break;
            };
            budget = overshoot;

            let next = session.current_index.map_or(0, |index| index + 1);
            session.current_index = Some(next);
            match session.steps.get(next) {
                Some(step) => {
                    out.push(Command::ApplySnapshot {
                        index: next,
                        grid: step.grid.clone(),
                    });
                    session.timer = Some(ReplayTimer::armed(step_delay));
                }
                None => {
                    session.is_playing = false;
                    session.timer = None;
                    out.push(Command::SetEditLock { locked: false });
                }
            }
        }
    }

    fn session_in(
        &mut self,
        expected: ReplayPhase,
        action: ReplayAction,
    ) -> Result<&mut ReplaySession, ReplayError> {
        let phase = self.phase();
        match self.session.as_mut() {
            Some(session) if phase == expected => Ok(session),
            _ => Err(ReplayError::InvalidTransition { action, phase }),
        }
    }
}
