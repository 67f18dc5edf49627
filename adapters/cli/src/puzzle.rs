use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{bail, Context, Result};
use queens_master_core::{CellCoord, CellPatch, Colour, GridSize};
use queens_master_surface::BoardSurface;
use serde::Deserialize;

const SUPPORTED_PUZZLE_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PuzzleFile {
    version: u32,
    palette: BTreeMap<String, String>,
    layout: Vec<String>,
}

/// Colour regions of a puzzle, one colour per cell in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Puzzle {
    size: GridSize,
    regions: Vec<Colour>,
}

impl Puzzle {
    /// Reads and validates a puzzle file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read puzzle file at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid puzzle file {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        let file: PuzzleFile =
            toml::from_str(contents).context("failed to parse puzzle toml contents")?;
        if file.version != SUPPORTED_PUZZLE_VERSION {
            bail!(
                "unsupported puzzle version {}; expected {}",
                file.version,
                SUPPORTED_PUZZLE_VERSION
            );
        }

        let mut palette = BTreeMap::new();
        for (key, colour) in file.palette {
            let mut letters = key.chars();
            let (Some(letter), None) = (letters.next(), letters.next()) else {
                bail!("palette key `{key}` must be a single letter");
            };
            let _ = palette.insert(letter, Colour::new(colour));
        }

        let Some(first) = file.layout.first() else {
            bail!("puzzle layout has no rows");
        };
        let columns = first.chars().count();
        let rows = file.layout.len();
        let size = GridSize::checked(
            u32::try_from(rows).unwrap_or(u32::MAX),
            u32::try_from(columns).unwrap_or(u32::MAX),
        )
        .context("puzzle layout has an unsupported size")?;

        let mut regions = Vec::with_capacity(size.cell_count());
        for (row, line) in file.layout.iter().enumerate() {
            let found = line.chars().count();
            if found != columns {
                bail!("layout row {row} has {found} cells, expected {columns}");
            }
            for (column, letter) in line.chars().enumerate() {
                let Some(colour) = palette.get(&letter) else {
                    bail!("layout row {row} column {column} uses `{letter}`, which is not in the palette");
                };
                regions.push(colour.clone());
            }
        }

        Ok(Self { size, regions })
    }

    /// Board dimensions described by the layout.
    pub(crate) const fn size(&self) -> GridSize {
        self.size
    }

    /// Resizes the surface to the layout and paints every region.
    pub(crate) fn paint(&self, surface: &mut BoardSurface) -> Result<()> {
        surface
            .resize(self.size.rows(), self.size.columns())
            .context("failed to resize the board to the puzzle")?;
        let columns = self.size.columns() as usize;
        for (index, colour) in self.regions.iter().enumerate() {
            let cell = CellCoord::new((index / columns) as u32, (index % columns) as u32);
            surface
                .set_cell(cell, CellPatch::colour(colour.clone()))
                .with_context(|| format!("failed to paint cell {cell}"))?;
        }
        Ok(())
    }
}
