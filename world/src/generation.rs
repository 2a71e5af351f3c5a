//! Random map generation.

use pipes_core::{Cell, Coordinate, Direction, MapError, TerminationKind};
use rand::Rng;
use tracing::debug;

use crate::Map;

/// Rejection-sampling budget for each termination.
const MAX_ATTEMPTS: u32 = 10_000;

/// Longest side, walls included, a generated map may have.
pub const MAX_GENERATED_SIDE: i32 = 1_024;

impl Map {
    /// Generates a walled map with a randomly placed source and sink.
    ///
    /// `rows` and `cols` include the wall border. The source sits in the
    /// interior and points at another interior tile; the sink sits on the
    /// border, off the corners, pointing out of the map.
    pub fn generate<R>(rows: i32, cols: i32, rng: &mut R) -> Result<Self, MapError>
    where
        R: Rng + ?Sized,
    {
        if rows < 3 || cols < 3 || (rows < 4 && cols < 4) {
            return Err(MapError::TooSmall { rows, cols });
        }
        if rows > MAX_GENERATED_SIDE || cols > MAX_GENERATED_SIDE {
            return Err(MapError::TooLarge { rows, cols });
        }

        let (source, source_direction) = pick_source(rows, cols, rng)?;
        let (sink, sink_direction) = pick_sink(rows, cols, source, rng)?;

        let mut cells = Vec::new();
        for row in 0..rows {
            for col in 0..cols {
                let coord = Coordinate::new(row, col);
                let cell = if coord == source {
                    Cell::termination(coord, source_direction, TerminationKind::Source)
                } else if coord == sink {
                    Cell::termination(coord, sink_direction, TerminationKind::Sink)
                } else if on_border(rows, cols, coord) {
                    Cell::wall(coord)
                } else {
                    Cell::fillable(coord)
                };
                cells.push(cell);
            }
        }

        debug!(
            target: "pipes::map",
            rows,
            cols,
            source_row = source.row(),
            source_col = source.col(),
            sink_row = sink.row(),
            sink_col = sink.col(),
            "map.generated"
        );
        Ok(Self::assemble(rows, cols, cells, source, sink))
    }
}

fn on_border(rows: i32, cols: i32, coord: Coordinate) -> bool {
    coord.row() == 0 || coord.col() == 0 || coord.row() == rows - 1 || coord.col() == cols - 1
}

fn pick_source<R>(rows: i32, cols: i32, rng: &mut R) -> Result<(Coordinate, Direction), MapError>
where
    R: Rng + ?Sized,
{
    for _ in 0..MAX_ATTEMPTS {
        let coord = Coordinate::new(rng.gen_range(0..rows), rng.gen_range(0..cols));
        let direction = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
        if on_border(rows, cols, coord) || on_border(rows, cols, coord.step(direction)) {
            continue;
        }
        return Ok((coord, direction));
    }

    Err(MapError::GenerationExhausted {
        attempts: MAX_ATTEMPTS,
    })
}

fn pick_sink<R>(
    rows: i32,
    cols: i32,
    source: Coordinate,
    rng: &mut R,
) -> Result<(Coordinate, Direction), MapError>
where
    R: Rng + ?Sized,
{
    for _ in 0..MAX_ATTEMPTS {
        let on_row_edge = rng.gen_bool(0.5);
        let far_edge = rng.gen_bool(0.5);

        let (coord, direction) = if on_row_edge {
            let row = if far_edge { rows - 1 } else { 0 };
            let direction = if far_edge { Direction::Down } else { Direction::Up };
            (Coordinate::new(row, rng.gen_range(1..cols - 1)), direction)
        } else {
            let col = if far_edge { cols - 1 } else { 0 };
            let direction = if far_edge {
                Direction::Right
            } else {
                Direction::Left
            };
            (Coordinate::new(rng.gen_range(1..rows - 1), col), direction)
        };

        if coord.row() == coord.col() || coord.step(direction.opposite()) == source {
            continue;
        }
        return Ok((coord, direction));
    }

    Err(MapError::GenerationExhausted {
        attempts: MAX_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn rejects_maps_without_an_interior() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            Map::generate(2, 8, &mut rng),
            Err(MapError::TooSmall { rows: 2, cols: 8 })
        );
        assert_eq!(
            Map::generate(3, 3, &mut rng),
            Err(MapError::TooSmall { rows: 3, cols: 3 })
        );
    }

    #[test]
    fn rejects_maps_beyond_the_side_limit() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            Map::generate(i32::MAX, 5, &mut rng),
            Err(MapError::TooLarge {
                rows: i32::MAX,
                cols: 5
            })
        );
        assert!(Map::generate(MAX_GENERATED_SIDE, 4, &mut rng).is_ok());
    }

    #[test]
    fn same_seed_generates_same_map() {
        let first = Map::generate(10, 10, &mut ChaCha8Rng::seed_from_u64(42)).expect("generates");
        let second = Map::generate(10, 10, &mut ChaCha8Rng::seed_from_u64(42)).expect("generates");
        assert_eq!(first, second);
    }

    #[test]
    fn smallest_corridor_still_generates() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let map = Map::generate(3, 4, &mut rng).expect("room for source and one tile");
        assert!(map.is_interior(map.source()));
    }
}
