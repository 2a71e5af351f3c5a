//! Pipe segments and the shapes they come in.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Direction;

/// Fixed geometry of a pipe segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PipeShape {
    /// Connects left and right.
    Horizontal,
    /// Connects up and down.
    Vertical,
    /// Connects up and left.
    TopLeft,
    /// Connects up and right.
    TopRight,
    /// Connects down and left.
    BottomLeft,
    /// Connects down and right.
    BottomRight,
    /// Connects all four directions.
    Cross,
}

impl PipeShape {
    /// Every shape in declaration order.
    pub const ALL: [PipeShape; 7] = [
        PipeShape::Horizontal,
        PipeShape::Vertical,
        PipeShape::TopLeft,
        PipeShape::TopRight,
        PipeShape::BottomLeft,
        PipeShape::BottomRight,
        PipeShape::Cross,
    ];

    /// Directions this shape opens toward.
    #[must_use]
    pub const fn connections(self) -> &'static [Direction] {
        match self {
            Self::Horizontal => &[Direction::Left, Direction::Right],
            Self::Vertical => &[Direction::Up, Direction::Down],
            Self::TopLeft => &[Direction::Up, Direction::Left],
            Self::TopRight => &[Direction::Up, Direction::Right],
            Self::BottomLeft => &[Direction::Down, Direction::Left],
            Self::BottomRight => &[Direction::Down, Direction::Right],
            Self::Cross => &[
                Direction::Up,
                Direction::Down,
                Direction::Left,
                Direction::Right,
            ],
        }
    }

    /// Two-letter code used by map files.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Horizontal => "HZ",
            Self::Vertical => "VT",
            Self::TopLeft => "TL",
            Self::TopRight => "TR",
            Self::BottomLeft => "BL",
            Self::BottomRight => "BR",
            Self::Cross => "CR",
        }
    }

    /// Box-drawing glyph; heavy lines when filled, double lines otherwise.
    #[must_use]
    pub const fn glyph(self, filled: bool) -> char {
        match (self, filled) {
            (Self::Horizontal, true) => '\u{2501}',
            (Self::Vertical, true) => '\u{2503}',
            (Self::TopLeft, true) => '\u{251B}',
            (Self::TopRight, true) => '\u{2517}',
            (Self::BottomLeft, true) => '\u{2513}',
            (Self::BottomRight, true) => '\u{250F}',
            (Self::Cross, true) => '\u{254B}',
            (Self::Horizontal, false) => '\u{2550}',
            (Self::Vertical, false) => '\u{2551}',
            (Self::TopLeft, false) => '\u{255D}',
            (Self::TopRight, false) => '\u{255A}',
            (Self::BottomLeft, false) => '\u{2557}',
            (Self::BottomRight, false) => '\u{2554}',
            (Self::Cross, false) => '\u{256C}',
        }
    }
}

impl FromStr for PipeShape {
    type Err = ParsePipeError;

    fn from_str(rep: &str) -> Result<Self, Self::Err> {
        let rep = rep.trim();
        Self::ALL
            .into_iter()
            .find(|shape| shape.code() == rep)
            .ok_or_else(|| ParsePipeError::UnknownShape(rep.to_owned()))
    }
}

impl fmt::Display for PipeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when a pipe code cannot be recognised.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParsePipeError {
    /// The code does not name any known shape.
    #[error("unknown pipe shape '{0}'")]
    UnknownShape(String),
}

/// A pipe segment: an immutable shape plus a fill flag that only ever turns on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pipe {
    shape: PipeShape,
    filled: bool,
}

impl Pipe {
    /// Creates an unfilled pipe of the provided shape.
    #[must_use]
    pub const fn new(shape: PipeShape) -> Self {
        Self {
            shape,
            filled: false,
        }
    }

    /// Shape chosen at creation.
    #[must_use]
    pub const fn shape(&self) -> PipeShape {
        self.shape
    }

    /// Whether water has reached this pipe.
    #[must_use]
    pub const fn is_filled(&self) -> bool {
        self.filled
    }

    /// Marks the pipe as filled. Repeated calls have no further effect.
    pub fn set_filled(&mut self) {
        self.filled = true;
    }

    /// Directions this pipe opens toward.
    #[must_use]
    pub const fn connections(&self) -> &'static [Direction] {
        self.shape.connections()
    }

    /// Whether the pipe opens toward `direction`.
    #[must_use]
    pub fn connects(&self, direction: Direction) -> bool {
        self.connections().contains(&direction)
    }

    /// Terminal glyph reflecting shape and fill state.
    #[must_use]
    pub const fn to_single_char(&self) -> char {
        self.shape.glyph(self.filled)
    }

    /// Map-file code of the pipe's shape.
    #[must_use]
    pub const fn to_serialized_rep(&self) -> &'static str {
        self.shape.code()
    }
}

impl FromStr for Pipe {
    type Err = ParsePipeError;

    fn from_str(rep: &str) -> Result<Self, Self::Err> {
        rep.parse().map(Pipe::new)
    }
}
