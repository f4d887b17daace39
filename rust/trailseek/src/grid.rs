use crate::errors::{
    Result,
    TrailError,
};
use serde::{
    Serialize,
    Serializer,
};
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Elevation of a single grid cell.
pub type Elevation = i64;

/// Position of a cell in the grid; rendered as `r{row}_c{col}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId {
    pub row: usize,
    pub col: usize,
}

impl CellId {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl Display for CellId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "r{}_c{}", self.row, self.col)
    }
}

impl Serialize for CellId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Direction of a 4-adjacent neighbor.
///
/// The declaration order is the scan order used everywhere a neighbor
/// enumeration has to be reproducible (edge order, tie-breaks).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    East,
    West,
    South,
}

impl Direction {
    pub const SCAN_ORDER: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::West,
        Direction::South,
    ];
}

/// A rectangular, row-major grid of elevations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElevationGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Elevation>,
}

impl ElevationGrid {
    /// Builds a grid from the declared dimensions and the row data.
    ///
    /// Fails if the declared dimensions are zero or do not match the
    /// number of rows or the length of any row.
    pub fn new(rows: usize, cols: usize, data: Vec<Vec<Elevation>>) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(TrailError::malformed(format!(
                "dimensions must be positive, got {}x{}",
                rows, cols
            )));
        }
        if data.len() != rows {
            return Err(TrailError::malformed(format!(
                "declared {} rows but found {}",
                rows,
                data.len()
            )));
        }

        // Sized by the data, never by the declared dimensions.
        let mut cells = Vec::new();
        for (r, row) in data.into_iter().enumerate() {
            if row.len() != cols {
                return Err(TrailError::malformed(format!(
                    "row {} has {} columns, expected {}",
                    r,
                    row.len(),
                    cols
                )));
            }
            cells.extend(row);
        }

        Ok(Self { rows, cols, cells })
    }

    /// Reads and parses a grid file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|source| TrailError::InputNotFound {
                path: path.to_path_buf(),
                source,
            })?;
        debug!("Read {} bytes from {}", contents.len(), path.display());
        contents.parse()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false for a constructed grid, which has at least one cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Row-major index of a cell. The caller guarantees the cell is in bounds.
    pub fn index_of(&self, cell: CellId) -> usize {
        cell.row * self.cols + cell.col
    }

    pub fn cell_at(&self, index: usize) -> CellId {
        CellId::new(index / self.cols, index % self.cols)
    }

    pub fn get(&self, cell: CellId) -> Option<Elevation> {
        if cell.row >= self.rows || cell.col >= self.cols {
            return None;
        }
        self.cells.get(self.index_of(cell)).copied()
    }

    /// The cell one step away in `direction`, if it lies inside the grid.
    pub fn step(&self, cell: CellId, direction: Direction) -> Option<CellId> {
        let CellId { row, col } = cell;
        match direction {
            Direction::North if row > 0 => Some(CellId::new(row - 1, col)),
            Direction::East if col + 1 < self.cols => Some(CellId::new(row, col + 1)),
            Direction::West if col > 0 => Some(CellId::new(row, col - 1)),
            Direction::South if row + 1 < self.rows => Some(CellId::new(row + 1, col)),
            _ => None,
        }
    }

    /// Existing 4-adjacent neighbors of `cell` in scan order.
    /// Out-of-bounds directions are skipped, not padded.
    pub fn neighbors(&self, cell: CellId) -> impl Iterator<Item = (CellId, Elevation)> + '_ {
        Direction::SCAN_ORDER.into_iter().filter_map(move |d| {
            let n = self.step(cell, d)?;
            Some((n, self.cells[self.index_of(n)]))
        })
    }

    /// Cells in row-major order together with their elevation.
    pub fn iter_cells(&self) -> impl Iterator<Item = (CellId, Elevation)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, v)| (self.cell_at(i), *v))
    }
}

fn parse_dimension(token: Option<&str>, name: &str) -> Result<usize> {
    let token = token
        .ok_or_else(|| TrailError::malformed(format!("missing {} count in header", name)))?;
    let value: i64 = token.parse().map_err(|_| {
        TrailError::malformed(format!("{} count '{}' is not an integer", name, token))
    })?;
    if value <= 0 {
        return Err(TrailError::malformed(format!(
            "{} count must be positive, got {}",
            name, value
        )));
    }
    usize::try_from(value).map_err(|_| {
        TrailError::malformed(format!("{} count {} is too large", name, value))
    })
}

impl FromStr for ElevationGrid {
    type Err = TrailError;

    /// Parses the text encoding: a header line `R C` followed by `R` lines
    /// of `C` whitespace separated integers. Blank lines are ignored.
    fn from_str(s: &str) -> Result<Self> {
        let mut lines = s
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        let (_, header) = lines
            .next()
            .ok_or_else(|| TrailError::malformed("empty grid source"))?;
        let mut header_tokens = header.split_whitespace();
        let rows = parse_dimension(header_tokens.next(), "row")?;
        let cols = parse_dimension(header_tokens.next(), "column")?;
        if let Some(extra) = header_tokens.next() {
            return Err(TrailError::malformed(format!(
                "unexpected token '{}' in header",
                extra
            )));
        }

        let data = lines
            .map(|(line_no, line)| {
                line.split_whitespace()
                    .map(|tok| {
                        tok.parse::<Elevation>().map_err(|_| {
                            TrailError::malformed(format!(
                                "line {}: '{}' is not an integer",
                                line_no + 1,
                                tok
                            ))
                        })
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        ElevationGrid::new(rows, cols, data)
    }
}
