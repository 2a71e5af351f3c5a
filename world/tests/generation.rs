use pipes_core::{Cell, CellKind, Coordinate, Pipe, PipeShape, PlacementError, TerminationKind};
use pipes_world::Map;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const SEEDS: std::ops::Range<u64> = 0..200;

fn on_border(map: &Map, coord: Coordinate) -> bool {
    coord.row() == 0
        || coord.col() == 0
        || coord.row() == map.rows() - 1
        || coord.col() == map.cols() - 1
}

#[test]
fn generated_maps_have_one_source_and_one_sink() {
    for seed in SEEDS {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let map = Map::generate(8, 10, &mut rng).expect("generation succeeds");

        let terminations: Vec<_> = map
            .cells()
            .iter()
            .filter_map(Cell::termination_info)
            .map(|(kind, _)| kind)
            .collect();
        let sources = terminations
            .iter()
            .filter(|kind| **kind == TerminationKind::Source)
            .count();
        let sinks = terminations
            .iter()
            .filter(|kind| **kind == TerminationKind::Sink)
            .count();

        assert_eq!(sources, 1, "seed {seed}");
        assert_eq!(sinks, 1, "seed {seed}");
        assert_eq!(map.cells().len(), 80, "seed {seed}");
    }
}

#[test]
fn generated_source_points_at_interior_tile() {
    for seed in SEEDS {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let map = Map::generate(6, 7, &mut rng).expect("generation succeeds");
        let source = map.source();
        let (_, direction) = map
            .cell(source)
            .and_then(Cell::termination_info)
            .expect("source is a termination");

        assert!(map.is_interior(source), "seed {seed}: source {source:?}");
        assert!(
            map.is_interior(source.step(direction)),
            "seed {seed}: source points at the border"
        );
    }
}

#[test]
fn generated_sink_sits_on_border_pointing_outward() {
    for seed in SEEDS {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let map = Map::generate(7, 9, &mut rng).expect("generation succeeds");
        let sink = map.sink();
        let (_, direction) = map
            .cell(sink)
            .and_then(Cell::termination_info)
            .expect("sink is a termination");

        assert!(on_border(&map, sink), "seed {seed}: sink {sink:?}");
        assert_ne!(sink.row(), sink.col(), "seed {seed}");
        assert!(
            map.cell(sink.step(direction)).is_none(),
            "seed {seed}: sink must point out of the grid"
        );
        assert_ne!(
            sink.step(direction.opposite()),
            map.source(),
            "seed {seed}: sink must not face the source"
        );
    }
}

#[test]
fn generated_border_is_walled_apart_from_the_sink() {
    for seed in SEEDS.take(50) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let map = Map::generate(5, 5, &mut rng).expect("generation succeeds");

        for cell in map.cells() {
            let coord = cell.coord();
            if coord == map.sink() {
                continue;
            }
            if on_border(&map, coord) {
                assert_eq!(cell.kind(), &CellKind::Wall, "seed {seed}: {coord:?}");
            } else if coord != map.source() {
                assert!(cell.is_fillable(), "seed {seed}: {coord:?}");
            }
        }
    }
}

#[test]
fn placement_accepts_exactly_the_empty_interior() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut map = Map::generate(6, 6, &mut rng).expect("generation succeeds");
    let pipe = Pipe::new(PipeShape::Cross);

    for row in -1..=6 {
        for col in -1..=6 {
            let coord = Coordinate::new(row, col);
            let expected = if !map.is_interior(coord) {
                Err(PlacementError::OutOfBounds)
            } else if coord == map.source() {
                Err(PlacementError::NotFillable)
            } else {
                Ok(())
            };
            assert_eq!(map.place_pipe(coord, pipe), expected, "{coord:?}");
        }
    }

    let occupied = map
        .cells()
        .iter()
        .find(|cell| cell.pipe().is_some())
        .map(Cell::coord)
        .expect("at least one pipe was placed");
    assert_eq!(
        map.place_pipe(occupied, pipe),
        Err(PlacementError::Occupied)
    );
}
