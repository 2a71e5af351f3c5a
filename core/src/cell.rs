//! Grid tiles and the variants they come in.

use serde::{Deserialize, Serialize};

use crate::{Coordinate, Direction, Pipe};

const WALL_GLYPH: char = '\u{2588}';
const EMPTY_GLYPH: char = '.';

/// Role of a termination cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminationKind {
    /// Where water enters the map.
    Source,
    /// Where water must arrive.
    Sink,
}

/// Content of a grid tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Opaque tile that blocks flow and never holds a pipe.
    Wall,
    /// Tile the player may place a pipe on.
    Fillable {
        /// Pipe held by the tile, if one was placed.
        pipe: Option<Pipe>,
    },
    /// Source or sink endpoint.
    Termination {
        /// Whether this is the source or the sink.
        kind: TerminationKind,
        /// Direction water leaves the source or enters the sink through.
        pointing_to: Direction,
        /// Whether water has reached this endpoint.
        filled: bool,
    },
}

/// A single tile of the map, pinned to the coordinate it was created at.
///
/// Cells are replaced rather than rewritten when their content changes: a
/// fillable cell that received a pipe is a new cell. The only in-place
/// mutation is the fill flag of a held pipe or of a termination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    coord: Coordinate,
    kind: CellKind,
}

impl Cell {
    /// Creates a wall tile.
    #[must_use]
    pub const fn wall(coord: Coordinate) -> Self {
        Self {
            coord,
            kind: CellKind::Wall,
        }
    }

    /// Creates an empty fillable tile.
    #[must_use]
    pub const fn fillable(coord: Coordinate) -> Self {
        Self {
            coord,
            kind: CellKind::Fillable { pipe: None },
        }
    }

    /// Creates a fillable tile already holding `pipe`.
    #[must_use]
    pub const fn with_pipe(coord: Coordinate, pipe: Pipe) -> Self {
        Self {
            coord,
            kind: CellKind::Fillable { pipe: Some(pipe) },
        }
    }

    /// Creates an unfilled source or sink tile.
    #[must_use]
    pub const fn termination(
        coord: Coordinate,
        pointing_to: Direction,
        kind: TerminationKind,
    ) -> Self {
        Self {
            coord,
            kind: CellKind::Termination {
                kind,
                pointing_to,
                filled: false,
            },
        }
    }

    /// Parses a map-file glyph.
    ///
    /// Arrow glyphs produce a termination of `termination_kind`; they are
    /// rejected when no kind is supplied. Returns `None` for unknown glyphs.
    #[must_use]
    pub fn from_char(
        glyph: char,
        coord: Coordinate,
        termination_kind: Option<TerminationKind>,
    ) -> Option<Self> {
        let pointing_to = match glyph {
            'W' => return Some(Self::wall(coord)),
            '.' => return Some(Self::fillable(coord)),
            '^' => Direction::Up,
            'v' => Direction::Down,
            '<' => Direction::Left,
            '>' => Direction::Right,
            _ => return None,
        };
        termination_kind.map(|kind| Self::termination(coord, pointing_to, kind))
    }

    /// Coordinate assigned at construction.
    #[must_use]
    pub const fn coord(&self) -> Coordinate {
        self.coord
    }

    /// Content of the tile.
    #[must_use]
    pub const fn kind(&self) -> &CellKind {
        &self.kind
    }

    /// Whether a pipe could ever live on this tile.
    #[must_use]
    pub const fn is_fillable(&self) -> bool {
        matches!(self.kind, CellKind::Fillable { .. })
    }

    /// Pipe held by a fillable tile.
    #[must_use]
    pub const fn pipe(&self) -> Option<&Pipe> {
        match &self.kind {
            CellKind::Fillable { pipe } => pipe.as_ref(),
            _ => None,
        }
    }

    /// Kind and direction of a termination tile.
    #[must_use]
    pub const fn termination_info(&self) -> Option<(TerminationKind, Direction)> {
        match self.kind {
            CellKind::Termination {
                kind, pointing_to, ..
            } => Some((kind, pointing_to)),
            _ => None,
        }
    }

    /// Whether water has reached this tile.
    #[must_use]
    pub const fn is_filled(&self) -> bool {
        match &self.kind {
            CellKind::Wall => false,
            CellKind::Fillable { pipe } => match pipe {
                Some(pipe) => pipe.is_filled(),
                None => false,
            },
            CellKind::Termination { filled, .. } => *filled,
        }
    }

    /// Marks the held pipe or the termination as filled.
    ///
    /// Returns `false` for walls and empty fillable tiles, which cannot hold
    /// water.
    pub fn set_filled(&mut self) -> bool {
        match &mut self.kind {
            CellKind::Wall | CellKind::Fillable { pipe: None } => false,
            CellKind::Fillable { pipe: Some(pipe) } => {
                pipe.set_filled();
                true
            }
            CellKind::Termination { filled, .. } => {
                *filled = true;
                true
            }
        }
    }

    /// Terminal glyph for the tile.
    #[must_use]
    pub const fn to_single_char(&self) -> char {
        match &self.kind {
            CellKind::Wall => WALL_GLYPH,
            CellKind::Fillable { pipe: None } => EMPTY_GLYPH,
            CellKind::Fillable { pipe: Some(pipe) } => pipe.to_single_char(),
            CellKind::Termination {
                pointing_to,
                filled,
                ..
            } => match (pointing_to, filled) {
                (Direction::Up, true) => '\u{25B2}',
                (Direction::Down, true) => '\u{25BC}',
                (Direction::Left, true) => '\u{25C0}',
                (Direction::Right, true) => '\u{25B6}',
                (Direction::Up, false) => '\u{25B3}',
                (Direction::Down, false) => '\u{25BD}',
                (Direction::Left, false) => '\u{25C1}',
                (Direction::Right, false) => '\u{25B7}',
            },
        }
    }

    /// Map-file glyph for the tile. Placed pipes are not part of the layout.
    #[must_use]
    pub const fn to_serialized_rep(&self) -> &'static str {
        match &self.kind {
            CellKind::Wall => "W",
            CellKind::Fillable { .. } => ".",
            CellKind::Termination { pointing_to, .. } => match pointing_to {
                Direction::Up => "^",
                Direction::Down => "v",
                Direction::Left => "<",
                Direction::Right => ">",
            },
        }
    }
}
