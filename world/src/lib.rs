#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative map state for Pipes.
//!
//! The [`Map`] exclusively owns a dense, row-major grid of [`Cell`] values.
//! Neighbours are derived through coordinate arithmetic rather than stored,
//! so the grid never contains references between cells. Placement and undo
//! replace whole cells; water propagation only flips fill flags.

use std::fmt;

use pipes_core::{Cell, CellKind, Coordinate, MapError, Pipe, PlacementError, TerminationKind};
use tracing::debug;

mod flow;
mod generation;
mod layout;

pub use generation::MAX_GENERATED_SIDE;
pub use layout::parse_layout;

use flow::FlowProgress;

/// Grid of cells with exactly one source and one sink.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Map {
    rows: i32,
    cols: i32,
    cells: Vec<Cell>,
    source: Coordinate,
    sink: Coordinate,
    flow: FlowProgress,
}

impl Map {
    /// Builds a map from a row-major list of cells.
    ///
    /// Every cell must carry the coordinate of its position, and exactly one
    /// source and one sink must be present.
    pub fn from_cells(rows: i32, cols: i32, cells: Vec<Cell>) -> Result<Self, MapError> {
        let expected = cell_count(rows, cols);
        if cells.len() != expected {
            return Err(MapError::DimensionMismatch {
                expected,
                found: cells.len(),
            });
        }

        let mut source = None;
        let mut sink = None;
        for (index, cell) in cells.iter().enumerate() {
            let position = coordinate_at(index, cols);
            if cell.coord() != position {
                return Err(MapError::MisplacedCell {
                    expected: position,
                    found: cell.coord(),
                });
            }

            match cell.termination_info() {
                Some((TerminationKind::Source, _)) => {
                    if source.replace(position).is_some() {
                        return Err(MapError::DuplicateSource(position));
                    }
                }
                Some((TerminationKind::Sink, _)) => {
                    if sink.replace(position).is_some() {
                        return Err(MapError::DuplicateSink(position));
                    }
                }
                None => {}
            }
        }

        let source = source.ok_or(MapError::MissingSource)?;
        let sink = sink.ok_or(MapError::MissingSink)?;
        Ok(Self::assemble(rows, cols, cells, source, sink))
    }

    /// Builds a map from its textual layout, one line per row.
    pub fn from_layout(rows: i32, cols: i32, layout: &str) -> Result<Self, MapError> {
        let cells = parse_layout(rows, cols, layout)?;
        Self::from_cells(rows, cols, cells)
    }

    fn assemble(
        rows: i32,
        cols: i32,
        cells: Vec<Cell>,
        source: Coordinate,
        sink: Coordinate,
    ) -> Self {
        Self {
            rows,
            cols,
            cells,
            source,
            sink,
            flow: FlowProgress::default(),
        }
    }

    /// Number of rows, walls included.
    #[must_use]
    pub const fn rows(&self) -> i32 {
        self.rows
    }

    /// Number of columns, walls included.
    #[must_use]
    pub const fn cols(&self) -> i32 {
        self.cols
    }

    /// All cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Coordinate of the source cell.
    #[must_use]
    pub const fn source(&self) -> Coordinate {
        self.source
    }

    /// Coordinate of the sink cell.
    #[must_use]
    pub const fn sink(&self) -> Coordinate {
        self.sink
    }

    /// Cell at `coord`, if it lies within the grid.
    #[must_use]
    pub fn cell(&self, coord: Coordinate) -> Option<&Cell> {
        self.index(coord).and_then(|index| self.cells.get(index))
    }

    /// Whether `coord` lies inside the wall border.
    #[must_use]
    pub const fn is_interior(&self, coord: Coordinate) -> bool {
        coord.row() >= 1
            && coord.row() <= self.rows - 2
            && coord.col() >= 1
            && coord.col() <= self.cols - 2
    }

    /// Places `pipe` on an empty fillable interior cell.
    pub fn place_pipe(&mut self, coord: Coordinate, pipe: Pipe) -> Result<(), PlacementError> {
        if !self.is_interior(coord) {
            return Err(PlacementError::OutOfBounds);
        }

        match self.cell(coord).map(Cell::kind) {
            Some(CellKind::Fillable { pipe: None }) => {}
            Some(CellKind::Fillable { pipe: Some(_) }) => return Err(PlacementError::Occupied),
            Some(_) => return Err(PlacementError::NotFillable),
            None => return Err(PlacementError::OutOfBounds),
        }

        self.replace(Cell::with_pipe(coord, pipe));
        debug!(
            target: "pipes::map",
            row = coord.row(),
            col = coord.col(),
            shape = %pipe.shape(),
            "map.pipe.placed"
        );
        Ok(())
    }

    /// Places `pipe` at `coord`, reporting only whether it succeeded.
    ///
    /// Recording the placement for undo is the caller's responsibility.
    pub fn try_place_pipe(&mut self, coord: Coordinate, pipe: Pipe) -> bool {
        self.place_pipe(coord, pipe).is_ok()
    }

    /// Replaces the cell at `coord` with an empty fillable cell.
    pub fn undo(&mut self, coord: Coordinate) -> Result<(), MapError> {
        match self.cell(coord) {
            Some(cell) if cell.is_fillable() => {
                self.replace(Cell::fillable(coord));
                debug!(
                    target: "pipes::map",
                    row = coord.row(),
                    col = coord.col(),
                    "map.pipe.removed"
                );
                Ok(())
            }
            _ => Err(MapError::InvalidUndoTarget(coord)),
        }
    }

    fn replace(&mut self, cell: Cell) {
        if let Some(slot) = self
            .index(cell.coord())
            .and_then(|index| self.cells.get_mut(index))
        {
            *slot = cell;
        }
    }

    fn cell_mut(&mut self, coord: Coordinate) -> Option<&mut Cell> {
        self.index(coord)
            .and_then(move |index| self.cells.get_mut(index))
    }

    fn index(&self, coord: Coordinate) -> Option<usize> {
        if coord.row() < 0 || coord.col() < 0 || coord.row() >= self.rows || coord.col() >= self.cols
        {
            return None;
        }

        let row = usize::try_from(coord.row()).ok()?;
        let col = usize::try_from(coord.col()).ok()?;
        let width = usize::try_from(self.cols).ok()?;
        row.checked_mul(width)?.checked_add(col)
    }
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = usize::try_from(self.cols).unwrap_or(1).max(1);
        for row in self.cells.chunks(width) {
            for cell in row {
                write!(f, "{}", cell.to_single_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn cell_count(rows: i32, cols: i32) -> usize {
    let rows = usize::try_from(rows).unwrap_or(0);
    let cols = usize::try_from(cols).unwrap_or(0);
    rows.saturating_mul(cols)
}

fn coordinate_at(index: usize, cols: i32) -> Coordinate {
    let width = usize::try_from(cols).unwrap_or(1).max(1);
    let row = i32::try_from(index / width).unwrap_or(i32::MAX);
    let col = i32::try_from(index % width).unwrap_or(i32::MAX);
    Coordinate::new(row, col)
}
