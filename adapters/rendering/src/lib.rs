#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Queens Master adapters.

use anyhow::Result as AnyResult;
use queens_master_core::{CellCoord, CellState, Colour, Grid, GridSize, ParsedMessage};
use std::{error::Error, fmt};

/// Amount marked cells are washed towards white so they read as eliminated.
pub const MARKED_LIGHTEN: f32 = 0.45;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Neutral grey used for colour tokens that cannot be interpreted.
    pub const FALLBACK: Self = Self::from_rgb_u8(128, 128, 128);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Interprets a cell colour token, rejecting tokens it does not understand.
    ///
    /// Accepted forms are `#rrggbb`, `#rgb` and a handful of CSS colour names.
    pub fn try_from_colour(colour: &Colour) -> Result<Self, RenderingError> {
        let token = colour.as_str().trim();
        let rgb = match token.strip_prefix('#') {
            Some(hex) => parse_hex(hex),
            None => named_rgb(token),
        };
        rgb.map(|(red, green, blue)| Self::from_rgb_u8(red, green, blue))
            .ok_or_else(|| RenderingError::UnrecognisedColour {
                token: token.to_owned(),
            })
    }

    /// Interprets a cell colour token, falling back to [`Color::FALLBACK`].
    #[must_use]
    pub fn from_colour(colour: &Colour) -> Self {
        Self::try_from_colour(colour).unwrap_or(Self::FALLBACK)
    }

    /// Returns the color quantised to byte channels.
    #[must_use]
    pub fn to_rgb_u8(self) -> (u8, u8, u8) {
        (
            channel_to_u8(self.red),
            channel_to_u8(self.green),
            channel_to_u8(self.blue),
        )
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Black or white, whichever stays legible on top of this color.
    #[must_use]
    pub fn contrasting(self) -> Self {
        let luminance = 0.299 * self.red + 0.587 * self.green + 0.114 * self.blue;
        if luminance > 0.55 {
            Self::from_rgb_u8(0, 0, 0)
        } else {
            Self::from_rgb_u8(255, 255, 255)
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

fn channel_to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    if !hex.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |index: usize| u8::from_str_radix(&hex[index..=index], 16).ok();
    let byte = |index: usize| u8::from_str_radix(&hex[index..index + 2], 16).ok();
    match hex.len() {
        3 => Some((nibble(0)? * 17, nibble(1)? * 17, nibble(2)? * 17)),
        6 => Some((byte(0)?, byte(2)?, byte(4)?)),
        _ => None,
    }
}

fn named_rgb(name: &str) -> Option<(u8, u8, u8)> {
    let rgb = match name.to_ascii_lowercase().as_str() {
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "grey" | "gray" => (128, 128, 128),
        "brown" => (165, 42, 42),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "blue" => (0, 0, 255),
        "orange" => (255, 165, 0),
        "yellow" => (255, 255, 0),
        "purple" => (128, 0, 128),
        _ => return None,
    };
    Some(rgb)
}

/// Presentation of a single board cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellPresentation {
    /// Location of the cell.
    pub coord: CellCoord,
    /// Background fill derived from the cell colour and state.
    pub fill: Color,
    /// Glyph-bearing state of the cell.
    pub state: CellState,
}

/// Row-major snapshot of the board ready to be drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct BoardScene {
    size: GridSize,
    cells: Vec<CellPresentation>,
}

impl BoardScene {
    /// Builds the scene for the provided grid.
    #[must_use]
    pub fn from_grid(grid: &Grid) -> Self {
        let cells = grid
            .cells()
            .map(|(coord, cell)| {
                let base = Color::from_colour(&cell.colour);
                let fill = match cell.state {
                    CellState::Marked => base.lighten(MARKED_LIGHTEN),
                    CellState::Empty | CellState::Queen => base,
                };
                CellPresentation {
                    coord,
                    fill,
                    state: cell.state,
                }
            })
            .collect();
        Self {
            size: grid.size(),
            cells,
        }
    }

    /// Dimensions of the presented board.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Looks up the presentation of a single cell.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Option<&CellPresentation> {
        if !self.size.contains(coord) {
            return None;
        }
        let index = coord.row() as usize * self.size.columns() as usize + coord.column() as usize;
        self.cells.get(index)
    }

    /// Iterates over the rows of the board from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[CellPresentation]> {
        self.cells.chunks(self.size.columns().max(1) as usize)
    }
}

/// Colour reference rendered next to a message.
#[derive(Clone, Debug, PartialEq)]
pub struct Swatch {
    /// Token as reported by the solver.
    pub colour: Colour,
    /// Interpreted display color.
    pub fill: Color,
}

/// Solver narration ready to be drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct MessagePresentation {
    /// Display text.
    pub text: String,
    /// Colours referenced by the message, in order.
    pub swatches: Vec<Swatch>,
}

impl MessagePresentation {
    /// Builds the presentation of a parsed solver message.
    #[must_use]
    pub fn from_parsed(parsed: &ParsedMessage) -> Self {
        let swatches = parsed
            .colours
            .iter()
            .map(|colour| Swatch {
                colour: colour.clone(),
                fill: Color::from_colour(colour),
            })
            .collect();
        Self {
            text: parsed.message.clone(),
            swatches,
        }
    }
}

/// Progress of an ongoing or finished replay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplayIndicator {
    /// Human readable phase name.
    pub phase: String,
    /// Zero-based index of the displayed step, if any.
    pub position: Option<usize>,
    /// Total number of steps in the replayed sequence.
    pub step_count: usize,
}

impl fmt::Display for ReplayIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(index) => write!(
                f,
                "replay {} (step {}/{})",
                self.phase,
                index + 1,
                self.step_count
            ),
            None => write!(f, "replay {} ({} steps)", self.phase, self.step_count),
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Heading drawn above the board.
    pub title: String,
    /// Board content that should be displayed.
    pub board: BoardScene,
    /// Solver narration for the displayed step, if any.
    pub message: Option<MessagePresentation>,
    /// Replay progress, if a replay exists.
    pub replay: Option<ReplayIndicator>,
}

impl Presentation {
    /// Constructs a presentation showing only the board.
    #[must_use]
    pub fn new<T>(title: T, board: BoardScene) -> Self
    where
        T: Into<String>,
    {
        Self {
            title: title.into(),
            board,
            message: None,
            replay: None,
        }
    }

    /// Attaches solver narration to the presentation.
    #[must_use]
    pub fn with_message(mut self, message: MessagePresentation) -> Self {
        self.message = Some(message);
        self
    }

    /// Attaches replay progress to the presentation.
    #[must_use]
    pub fn with_replay(mut self, replay: ReplayIndicator) -> Self {
        self.replay = Some(replay);
        self
    }
}

/// Rendering backend capable of presenting Queens Master boards.
pub trait RenderingBackend {
    /// Draws a single frame of the provided presentation.
    fn present(&mut self, presentation: &Presentation) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// The colour token is neither hexadecimal nor a known colour name.
    UnrecognisedColour {
        /// Token that failed interpretation.
        token: String,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognisedColour { token } => {
                write!(f, "unrecognised colour token `{token}`")
            }
        }
    }
}

impl Error for RenderingError {}
