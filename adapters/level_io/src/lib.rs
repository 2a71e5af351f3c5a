#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Map files for Pipes.
//!
//! A map file holds the row count, the column count and the countdown delay,
//! each on its own line, followed by one line per grid row and an optional
//! comma-separated list of pipe codes that seeds the queue. Blank lines and
//! lines starting with `#` are skipped anywhere in the file.

use std::{
    fmt::Write as _,
    fs,
    io,
    num::ParseIntError,
    path::{Path, PathBuf},
};

use pipes_core::{MapError, ParsePipeError, Pipe};
use pipes_world::Map;
use thiserror::Error;
use tracing::info;

mod catalog;

pub use catalog::{LevelCatalog, LEVEL_EXTENSION};

/// Errors raised while reading, writing or browsing map files.
#[derive(Debug, Error)]
pub enum LevelError {
    /// The file could not be read or written.
    #[error("cannot access {}", path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The file ended before a required field.
    #[error("unexpected end of file while reading {what}")]
    UnexpectedEof {
        /// Field being read.
        what: String,
    },
    /// A header field is not an integer.
    #[error("invalid {field} '{value}'")]
    InvalidInteger {
        /// Header field being read.
        field: &'static str,
        /// Offending text.
        value: String,
        /// Underlying parse failure.
        #[source]
        source: ParseIntError,
    },
    /// The grid does not describe a valid map.
    #[error("invalid map layout")]
    Layout(#[from] MapError),
    /// The trailing pipe list names an unknown shape.
    #[error("invalid pipe list")]
    Pipe(#[from] ParsePipeError),
    /// A level was selected by a blank name.
    #[error("level name must not be blank")]
    BlankLevelName,
    /// A level was selected that the catalog does not list.
    #[error("unknown level '{0}'")]
    UnknownLevel(String),
}

/// Contents of a map file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelProperties {
    map: Map,
    delay: i32,
    pipes: Option<Vec<Pipe>>,
}

impl LevelProperties {
    /// Bundles a map with its countdown and optional fixed pipe sequence.
    #[must_use]
    pub fn new(map: Map, delay: i32, pipes: Option<Vec<Pipe>>) -> Self {
        Self { map, delay, pipes }
    }

    /// Map described by the file.
    #[must_use]
    pub fn map(&self) -> &Map {
        &self.map
    }

    /// Flow rounds before water leaves the source.
    #[must_use]
    pub fn delay(&self) -> i32 {
        self.delay
    }

    /// Pipes that seed the queue, front first.
    #[must_use]
    pub fn pipes(&self) -> Option<&[Pipe]> {
        self.pipes.as_deref()
    }

    /// Splits the properties into their parts.
    #[must_use]
    pub fn into_parts(self) -> (Map, i32, Option<Vec<Pipe>>) {
        (self.map, self.delay, self.pipes)
    }
}

/// Parses the contents of a map file.
pub fn parse_level(text: &str) -> Result<LevelProperties, LevelError> {
    let mut lines = text
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'));

    let rows = parse_header(lines.next(), "number of rows")?;
    let cols = parse_header(lines.next(), "number of columns")?;
    let delay = parse_header(lines.next(), "amount of delay")?;

    let mut layout = String::new();
    for row in 0..rows {
        let line = lines.next().ok_or_else(|| LevelError::UnexpectedEof {
            what: format!("row {row} of the map"),
        })?;
        layout.push_str(line);
        layout.push('\n');
    }
    let map = Map::from_layout(rows, cols, &layout)?;

    let pipes = lines.next().map(parse_pipes).transpose()?;

    Ok(LevelProperties { map, delay, pipes })
}

/// Reads and parses a map file.
pub fn load_level(path: &Path) -> Result<LevelProperties, LevelError> {
    let text = fs::read_to_string(path).map_err(|source| LevelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let level = parse_level(&text)?;
    info!(
        target: "pipes::levels",
        path = %path.display(),
        rows = level.map.rows(),
        cols = level.map.cols(),
        delay = level.delay,
        "level.loaded"
    );
    Ok(level)
}

/// Renders properties in the map-file format.
#[must_use]
pub fn serialize_level(level: &LevelProperties) -> String {
    let map = &level.map;
    let mut out = String::new();
    let _ = writeln!(out, "{}", map.rows());
    let _ = writeln!(out, "{}", map.cols());
    let _ = writeln!(out, "{}", level.delay);

    let width = usize::try_from(map.cols()).unwrap_or(1).max(1);
    for row in map.cells().chunks(width) {
        for cell in row {
            out.push_str(cell.to_serialized_rep());
        }
        out.push('\n');
    }

    if let Some(pipes) = &level.pipes {
        let codes: Vec<&str> = pipes.iter().map(Pipe::to_serialized_rep).collect();
        out.push_str(&codes.join(","));
        out.push('\n');
    }
    out
}

/// Writes properties to `path` in the map-file format.
pub fn save_level(path: &Path, level: &LevelProperties) -> Result<(), LevelError> {
    fs::write(path, serialize_level(level)).map_err(|source| LevelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(target: "pipes::levels", path = %path.display(), "level.saved");
    Ok(())
}

fn parse_header(line: Option<&str>, field: &'static str) -> Result<i32, LevelError> {
    let line = line.ok_or_else(|| LevelError::UnexpectedEof {
        what: field.to_owned(),
    })?;
    line.trim()
        .parse()
        .map_err(|source| LevelError::InvalidInteger {
            field,
            value: line.to_owned(),
            source,
        })
}

fn parse_pipes(line: &str) -> Result<Vec<Pipe>, ParsePipeError> {
    line.split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::parse::<Pipe>)
        .collect()
}
