#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Placement history used to undo pipe placements.

use pipes_core::{Cell, Coordinate, Pipe};

/// Snapshot of a fillable cell taken right after a pipe was placed on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    coord: Coordinate,
    pipe: Pipe,
}

impl Placement {
    /// Records `pipe` placed at `coord`.
    #[must_use]
    pub const fn new(coord: Coordinate, pipe: Pipe) -> Self {
        Self { coord, pipe }
    }

    /// Captures a placement from a fillable cell holding a pipe.
    #[must_use]
    pub fn from_cell(cell: &Cell) -> Option<Self> {
        cell.pipe().map(|pipe| Self::new(cell.coord(), *pipe))
    }

    /// Cell the pipe was placed on.
    #[must_use]
    pub const fn coord(&self) -> Coordinate {
        self.coord
    }

    /// Pipe as it was when placed.
    #[must_use]
    pub const fn pipe(&self) -> Pipe {
        self.pipe
    }
}

/// Stack of placements, most recent last, with a count of successful pops.
#[derive(Clone, Debug, Default)]
pub struct CellStack {
    placements: Vec<Placement>,
    undo_count: u32,
}

impl CellStack {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a placement.
    pub fn push(&mut self, placement: Placement) {
        self.placements.push(placement);
    }

    /// Most recent placement without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&Placement> {
        self.placements.last()
    }

    /// Removes the most recent placement and counts the undo.
    pub fn pop(&mut self) -> Option<Placement> {
        let placement = self.placements.pop()?;
        self.undo_count += 1;
        Some(placement)
    }

    /// Number of placements popped so far.
    #[must_use]
    pub const fn undo_count(&self) -> u32 {
        self.undo_count
    }

    /// Number of placements recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// Whether no placement is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}
