//! Textual map layouts.

use pipes_core::{Cell, Coordinate, MapError, TerminationKind};

/// Parses `rows` lines of at least `cols` glyphs into row-major cells.
///
/// Arrows on the border become the sink and arrows in the interior become
/// the source. Characters past `cols` and lines past `rows` are ignored.
pub fn parse_layout(rows: i32, cols: i32, layout: &str) -> Result<Vec<Cell>, MapError> {
    let mut lines = layout.lines();
    let mut cells = Vec::new();

    for row in 0..rows {
        let line = lines.next().ok_or(MapError::MissingRow { row })?;
        let found = i32::try_from(line.chars().count()).unwrap_or(i32::MAX);
        if found < cols {
            return Err(MapError::ShortRow {
                row,
                expected: cols,
                found,
            });
        }

        for (col, glyph) in (0..cols).zip(line.chars()) {
            let coord = Coordinate::new(row, col);
            let on_border = row == 0 || col == 0 || row == rows - 1 || col == cols - 1;
            let kind = if on_border {
                TerminationKind::Sink
            } else {
                TerminationKind::Source
            };
            let cell = Cell::from_char(glyph, coord, Some(kind))
                .ok_or(MapError::UnknownGlyph { coord, glyph })?;
            cells.push(cell);
        }
    }

    Ok(cells)
}
