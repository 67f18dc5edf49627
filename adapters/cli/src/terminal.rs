use std::io::Write;

use anyhow::{Context, Result};
use queens_master_core::CellState;
use queens_master_rendering::{Color, Presentation, RenderingBackend};

const RESET: &str = "\x1b[0m";
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Backend that draws frames as text, optionally with 24-bit ANSI colour.
#[derive(Debug)]
pub(crate) struct TerminalBackend<W> {
    out: W,
    ansi: bool,
}

impl<W: Write> TerminalBackend<W> {
    /// Creates a backend writing to `out`.
    pub(crate) const fn new(out: W, ansi: bool) -> Self {
        Self { out, ansi }
    }

    fn glyph(state: CellState) -> &'static str {
        match state {
            CellState::Empty => "[ ]",
            CellState::Marked => "[X]",
            CellState::Queen => "[Q]",
        }
    }

    fn painted(&self, text: &str, fill: Color) -> String {
        if !self.ansi {
            return text.to_owned();
        }
        let (red, green, blue) = fill.to_rgb_u8();
        let (fg_red, fg_green, fg_blue) = fill.contrasting().to_rgb_u8();
        format!(
            "\x1b[48;2;{red};{green};{blue}m\x1b[38;2;{fg_red};{fg_green};{fg_blue}m{text}{RESET}"
        )
    }

    fn frame(&self, presentation: &Presentation) -> String {
        let mut frame = String::new();
        if self.ansi {
            frame.push_str(CLEAR_SCREEN);
        }
        frame.push_str(&presentation.title);
        frame.push('\n');

        for row in presentation.board.rows() {
            for cell in row {
                frame.push_str(&self.painted(Self::glyph(cell.state), cell.fill));
            }
            frame.push('\n');
        }

        if let Some(message) = &presentation.message {
            frame.push_str(&message.text);
            for swatch in &message.swatches {
                frame.push(' ');
                frame.push_str(&self.painted("  ", swatch.fill));
                frame.push(' ');
                frame.push_str(swatch.colour.as_str());
            }
            frame.push('\n');
        }
        if let Some(replay) = &presentation.replay {
            frame.push_str(&replay.to_string());
            frame.push('\n');
        }
        frame
    }
}

impl<W: Write> RenderingBackend for TerminalBackend<W> {
    fn present(&mut self, presentation: &Presentation) -> Result<()> {
        let frame = self.frame(presentation);
        self.out
            .write_all(frame.as_bytes())
            .and_then(|()| self.out.flush())
            .context("failed to write frame to the terminal")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use queens_master_core::{CellCoord, CellPatch, Colour, Grid, GridSize, ParsedMessage};
    use queens_master_rendering::{BoardScene, MessagePresentation, ReplayIndicator};

    fn sample() -> Presentation {
        let grid = Grid::filled(GridSize::new(4, 4))
            .with_cell(CellCoord::new(0, 0), &CellPatch::state(CellState::Queen))
            .and_then(|grid| {
                grid.with_cell(CellCoord::new(0, 1), &CellPatch::state(CellState::Marked))
            })
            .expect("cells inside grid");
        Presentation::new("Queens Master", BoardScene::from_grid(&grid))
            .with_message(MessagePresentation::from_parsed(&ParsedMessage {
                message: "Placing queen".to_owned(),
                colours: vec![Colour::new("#ff0000")],
            }))
            .with_replay(ReplayIndicator {
                phase: "playing".to_owned(),
                position: Some(0),
                step_count: 5,
            })
    }

    #[test]
    fn plain_frames_use_cell_glyphs() {
        let mut buffer = Vec::new();
        TerminalBackend::new(&mut buffer, false)
            .present(&sample())
            .expect("writing to a vector succeeds");

        let text = String::from_utf8(buffer).expect("frame is utf-8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Queens Master",
                "[Q][X][ ][ ]",
                "[ ][ ][ ][ ]",
                "[ ][ ][ ][ ]",
                "[ ][ ][ ][ ]",
                "Placing queen    #ff0000",
                "replay playing (step 1/5)",
            ]
        );
    }

    #[test]
    fn ansi_frames_paint_cell_backgrounds() {
        let mut buffer = Vec::new();
        TerminalBackend::new(&mut buffer, true)
            .present(&sample())
            .expect("writing to a vector succeeds");

        let text = String::from_utf8(buffer).expect("frame is utf-8");
        assert!(text.starts_with(CLEAR_SCREEN));
        assert!(
            text.contains("\x1b[48;2;255;0;0m"),
            "swatch uses the message colour as background"
        );
        assert!(text.contains(&format!("[Q]{RESET}")));
    }
}
