#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Pipes engine.
//!
//! This crate defines the value types every other crate speaks in: grid
//! [`Coordinate`]s and [`Direction`]s, pipe segments ([`Pipe`]), the closed set
//! of grid tiles ([`Cell`]), and the message surface used by adapters.
//! Adapters submit [`Command`] values to the game facade, which mutates the
//! authoritative map and reports what happened as a stream of [`Event`]s.

use std::ops::Add;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod cell;
mod pipe;

pub use cell::{Cell, CellKind, TerminationKind};
pub use pipe::{ParsePipeError, Pipe, PipeShape};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Pipes. Connect the source to the sink before the water overflows.";

/// Location of a single grid cell expressed as row and column indices.
///
/// Coordinates are signed so that offsetting a border cell by a unit
/// direction yields an out-of-grid coordinate instead of wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    row: i32,
    col: i32,
}

impl Coordinate {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Zero-based row index.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Zero-based column index.
    #[must_use]
    pub const fn col(&self) -> i32 {
        self.col
    }

    /// Combines two coordinates component-wise.
    #[must_use]
    pub const fn add(self, other: Coordinate) -> Self {
        Self {
            row: self.row + other.row,
            col: self.col + other.col,
        }
    }

    /// Neighbouring coordinate one step away in `direction`.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        self.add(direction.offset())
    }
}

impl Add for Coordinate {
    type Output = Coordinate;

    fn add(self, rhs: Coordinate) -> Self::Output {
        Coordinate::new(self.row + rhs.row, self.col + rhs.col)
    }
}

/// The four cardinal directions a pipe or termination can point towards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices.
    Up,
    /// Toward increasing row indices.
    Down,
    /// Toward decreasing column indices.
    Left,
    /// Toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in declaration order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Unit offset expressed as a coordinate delta.
    #[must_use]
    pub const fn offset(self) -> Coordinate {
        match self {
            Self::Up => Coordinate::new(-1, 0),
            Self::Down => Coordinate::new(1, 0),
            Self::Left => Coordinate::new(0, -1),
            Self::Right => Coordinate::new(0, 1),
        }
    }

    /// Direction rotated clockwise by a quarter turn.
    #[must_use]
    pub const fn rotate_clockwise(self) -> Self {
        match self {
            Self::Up => Self::Right,
            Self::Right => Self::Down,
            Self::Down => Self::Left,
            Self::Left => Self::Up,
        }
    }
}

/// Commands that express every permissible mutation of a running game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Places the pipe at the front of the queue onto the provided cell.
    PlacePipe {
        /// Cell that should receive the pipe.
        cell: Coordinate,
    },
    /// Discards the pipe at the front of the queue.
    SkipPipe,
    /// Reverts the most recent placement that water has not reached yet.
    UndoStep,
    /// Starts the round driver.
    StartCountdown,
    /// Stops the round driver permanently.
    StopCountdown,
    /// Advances the round driver by a single tick.
    Tick,
    /// Propagates water up to the round driver's current distance.
    UpdateState,
}

/// Events broadcast by the game after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a pipe was placed onto the map.
    PipePlaced {
        /// Cell that received the pipe.
        cell: Coordinate,
        /// Shape of the placed pipe.
        shape: PipeShape,
    },
    /// Reports that a placement request was rejected.
    PlacementRejected {
        /// Cell provided in the request.
        cell: Coordinate,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that the front pipe of the queue was discarded.
    PipeSkipped {
        /// Shape of the discarded pipe.
        shape: PipeShape,
    },
    /// Confirms that a placement was reverted.
    StepUndone {
        /// Cell that was emptied.
        cell: Coordinate,
        /// Shape of the pipe returned to the queue.
        shape: PipeShape,
    },
    /// Reports that an undo request was rejected.
    UndoRejected {
        /// Specific reason the undo failed.
        reason: UndoRejection,
    },
    /// The number of player steps changed.
    StepsChanged {
        /// Steps taken so far, undos included.
        steps: u32,
    },
    /// The number of successful undos changed.
    UndoCountChanged {
        /// Successful undos so far.
        undos: u32,
    },
    /// The round driver ticked.
    TimeAdvanced {
        /// Ticks elapsed since the driver started.
        ticks: u64,
    },
    /// Water advanced by one unit of distance.
    FlowAdvanced {
        /// Distance reported by the round driver after the flow.
        distance: i32,
    },
    /// Water propagation resolved up to a distance.
    TilesFilled {
        /// Distance the map was filled to.
        distance: i32,
        /// Number of tiles newly filled by the final propagation step.
        newly_filled: usize,
    },
    /// A connected path from source to sink exists.
    RoundWon,
    /// A round elapsed without water progressing.
    RoundLost,
}

/// Reasons a pipe placement may be rejected by the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The coordinate lies on the wall border or outside the grid.
    #[error("cell lies outside the playable interior")]
    OutOfBounds,
    /// The targeted cell cannot hold a pipe.
    #[error("cell cannot hold a pipe")]
    NotFillable,
    /// The targeted cell already holds a pipe.
    #[error("cell already holds a pipe")]
    Occupied,
}

/// Reasons an undo request may be rejected by the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum UndoRejection {
    /// No placement is recorded in the history.
    #[error("nothing to undo")]
    NothingToUndo,
    /// Water already passed through the most recent placement.
    #[error("water already flows through the most recent pipe")]
    AlreadyFilled,
}

/// Errors raised while constructing or mutating a map.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MapError {
    /// The map is too small to hold a wall border around a playable interior
    /// with room for a source and its first tile.
    #[error("a {rows}x{cols} map is too small to hold a source and a sink")]
    TooSmall {
        /// Requested row count.
        rows: i32,
        /// Requested column count.
        cols: i32,
    },
    /// The requested dimensions exceed what a generated map may span.
    #[error("a {rows}x{cols} map is too large to generate")]
    TooLarge {
        /// Requested row count.
        rows: i32,
        /// Requested column count.
        cols: i32,
    },
    /// The number of supplied cells does not match the requested dimensions.
    #[error("expected {expected} cells but {found} were supplied")]
    DimensionMismatch {
        /// Cells required by the dimensions.
        expected: usize,
        /// Cells actually supplied.
        found: usize,
    },
    /// A cell reports a coordinate that differs from its grid position.
    #[error("cell at {expected:?} reports coordinate {found:?}")]
    MisplacedCell {
        /// Grid position of the cell.
        expected: Coordinate,
        /// Coordinate stored in the cell.
        found: Coordinate,
    },
    /// No source termination cell was found.
    #[error("map has no source")]
    MissingSource,
    /// No sink termination cell was found.
    #[error("map has no sink")]
    MissingSink,
    /// More than one source termination cell was found.
    #[error("map has a second source at {0:?}")]
    DuplicateSource(Coordinate),
    /// More than one sink termination cell was found.
    #[error("map has a second sink at {0:?}")]
    DuplicateSink(Coordinate),
    /// The layout text ended before every row was read.
    #[error("layout is missing row {row}")]
    MissingRow {
        /// Zero-based index of the missing row.
        row: i32,
    },
    /// A layout row is shorter than the column count.
    #[error("layout row {row} has {found} columns, expected {expected}")]
    ShortRow {
        /// Zero-based index of the short row.
        row: i32,
        /// Columns required.
        expected: i32,
        /// Columns present.
        found: i32,
    },
    /// A layout glyph does not name any cell.
    #[error("unknown glyph {glyph:?} at {coord:?}")]
    UnknownGlyph {
        /// Position of the glyph.
        coord: Coordinate,
        /// Offending character.
        glyph: char,
    },
    /// Undo was requested on a cell that can never hold a pipe.
    #[error("cannot undo on non-fillable cell at {0:?}")]
    InvalidUndoTarget(Coordinate),
    /// Random source/sink placement did not succeed within the retry budget.
    #[error("could not place source and sink after {attempts} attempts")]
    GenerationExhausted {
        /// Attempts made before giving up.
        attempts: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::{Coordinate, Direction, PipeShape};
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn opposite_is_an_involution() {
        for direction in Direction::ALL {
            assert_ne!(direction.opposite(), direction);
            assert_eq!(direction.opposite().opposite(), direction);
        }
    }

    #[test]
    fn offsets_of_opposites_cancel() {
        let origin = Coordinate::new(3, 4);
        for direction in Direction::ALL {
            let there_and_back = origin.step(direction).step(direction.opposite());
            assert_eq!(there_and_back, origin);
        }
    }

    #[test]
    fn clockwise_rotation_cycles_through_all_directions() {
        let mut direction = Direction::Up;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(direction);
            direction = direction.rotate_clockwise();
        }
        assert_eq!(direction, Direction::Up);
        assert_eq!(
            seen,
            vec![
                Direction::Up,
                Direction::Right,
                Direction::Down,
                Direction::Left
            ]
        );
    }

    #[test]
    fn coordinate_add_matches_operator() {
        let a = Coordinate::new(2, -1);
        let b = Coordinate::new(-3, 5);
        assert_eq!(a + b, Coordinate::new(-1, 4));
        assert_eq!(a.add(b), a + b);
    }

    #[test]
    fn coordinate_round_trips_through_bincode() {
        assert_round_trip(&Coordinate::new(7, 11));
    }

    #[test]
    fn pipe_shape_round_trips_through_bincode() {
        assert_round_trip(&PipeShape::BottomLeft);
    }
}
