//! Water propagation and path queries over the map.

use std::collections::{HashSet, VecDeque};

use pipes_core::{Cell, CellKind, Coordinate, Direction, TerminationKind};
use tracing::debug;

use crate::Map;

/// Progress of the water front through a map.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct FlowProgress {
    filled_tiles: HashSet<Coordinate>,
    prev_filled_tiles: usize,
    prev_filled_distance: Option<i32>,
}

impl Map {
    /// Marks the source as filled.
    pub fn fill_begin_tile(&mut self) {
        let source = self.source;
        if let Some(cell) = self.cell_mut(source) {
            let _ = cell.set_filled();
        }
    }

    /// Advances the water front until it has covered `distance` steps.
    ///
    /// Each step is resolved once. Step 0 fills the source, step 1 the tile
    /// the source points at, and every later step pushes water one tile
    /// further along connected pipes. A blocked step records zero newly
    /// filled tiles and stays pending, so a pipe placed afterwards can still
    /// receive water on the next call.
    pub fn fill_tiles(&mut self, distance: i32) {
        loop {
            let step = self.flow.prev_filled_distance.map_or(0, |prev| prev + 1);
            if step > distance {
                return;
            }

            let Some(newly_filled) = self.fill_step(step) else {
                self.flow.prev_filled_tiles = 0;
                debug!(target: "pipes::map", step, "map.flow.blocked");
                return;
            };

            self.flow.prev_filled_tiles = newly_filled;
            self.flow.prev_filled_distance = Some(step);
            debug!(target: "pipes::map", step, newly_filled, "map.flow.step");
        }
    }

    /// Fills every tile reachable from the source, the sink included.
    pub fn fill_all(&mut self) {
        let source = self.source;
        let mut visited = HashSet::from([source]);
        let mut queue = VecDeque::from([source]);
        self.fill_tile(source);

        while let Some(coord) = queue.pop_front() {
            for next in self.flow_targets(coord) {
                if visited.insert(next) {
                    self.fill_tile(next);
                    queue.push_back(next);
                }
            }
        }
    }

    /// Whether placed pipes form a route from the source to the sink.
    ///
    /// The search follows the source's pointing direction and each pipe's
    /// connections without asking the next pipe to connect back, so it only
    /// answers whether the outlets chain into the sink.
    #[must_use]
    pub fn check_path(&self) -> bool {
        let mut visited = HashSet::from([self.source]);
        let mut queue = VecDeque::from([self.source]);

        while let Some(coord) = queue.pop_front() {
            if coord == self.sink {
                return true;
            }
            for next in self.exits(coord) {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        false
    }

    /// Whether the most recent propagation step filled nothing.
    #[must_use]
    pub fn has_lost(&self) -> bool {
        self.flow.prev_filled_tiles == 0
    }

    /// Coordinates water has reached through propagation.
    #[must_use]
    pub fn filled_tiles(&self) -> &HashSet<Coordinate> {
        &self.flow.filled_tiles
    }

    /// Tiles newly filled by the most recent propagation step.
    #[must_use]
    pub fn last_filled_count(&self) -> usize {
        self.flow.prev_filled_tiles
    }

    /// Last step the water front resolved, if any.
    #[must_use]
    pub fn filled_distance(&self) -> Option<i32> {
        self.flow.prev_filled_distance
    }

    fn fill_step(&mut self, step: i32) -> Option<usize> {
        match step {
            0 => {
                self.fill_tile(self.source);
                Some(1)
            }
            1 => {
                let first = self
                    .flow_targets(self.source)
                    .into_iter()
                    .find(|coord| self.cell(*coord).is_some_and(Cell::is_fillable))?;
                self.fill_tile(first);
                Some(1)
            }
            _ => {
                let frontier: Vec<Coordinate> = self.flow.filled_tiles.iter().copied().collect();
                let before = self.flow.filled_tiles.len();
                for coord in frontier.iter().copied() {
                    if self.cell(coord).and_then(Cell::pipe).is_none() {
                        continue;
                    }
                    for next in self.flow_targets(coord) {
                        let reachable = self.cell(next).is_some_and(Cell::is_fillable);
                        if reachable && !frontier.contains(&next) {
                            self.fill_tile(next);
                        }
                    }
                }
                Some(self.flow.filled_tiles.len() - before)
            }
        }
    }

    fn fill_tile(&mut self, coord: Coordinate) {
        if let Some(cell) = self.cell_mut(coord) {
            let _ = cell.set_filled();
        }
        let _ = self.flow.filled_tiles.insert(coord);
    }

    /// Directions water leaves `coord` through.
    fn outlets(&self, coord: Coordinate) -> &[Direction] {
        match self.cell(coord).map(Cell::kind) {
            Some(CellKind::Termination {
                kind: TerminationKind::Source,
                pointing_to,
                ..
            }) => std::slice::from_ref(pointing_to),
            Some(CellKind::Fillable { pipe: Some(pipe) }) => pipe.connections(),
            _ => &[],
        }
    }

    /// Neighbours the outlets of `coord` point at.
    fn exits(&self, coord: Coordinate) -> Vec<Coordinate> {
        self.outlets(coord)
            .iter()
            .map(|&direction| coord.step(direction))
            .collect()
    }

    /// Neighbours water can move into from `coord`.
    fn flow_targets(&self, coord: Coordinate) -> Vec<Coordinate> {
        self.outlets(coord)
            .iter()
            .filter(|&&direction| self.accepts(coord.step(direction), direction))
            .map(|&direction| coord.step(direction))
            .collect()
    }

    /// Whether water travelling in `heading` can enter the tile at `coord`.
    fn accepts(&self, coord: Coordinate, heading: Direction) -> bool {
        match self.cell(coord).map(Cell::kind) {
            Some(CellKind::Fillable { pipe: Some(pipe) }) => pipe.connects(heading.opposite()),
            Some(CellKind::Termination {
                kind: TerminationKind::Sink,
                ..
            }) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use pipes_core::{Pipe, PipeShape};

    use super::*;

    // Source points right at (1,1); sink on the right border at (1,4).
    const CORRIDOR: &str = "WWWWW\nW>..>\nW...W\nWWWWW";

    fn corridor() -> Map {
        Map::from_layout(4, 5, CORRIDOR).expect("valid layout")
    }

    fn place(map: &mut Map, row: i32, col: i32, shape: PipeShape) {
        assert!(
            map.try_place_pipe(Coordinate::new(row, col), Pipe::new(shape)),
            "placement at ({row}, {col}) should succeed"
        );
    }

    #[test]
    fn step_zero_registers_the_source() {
        let mut map = corridor();
        map.fill_tiles(0);

        assert!(map.filled_tiles().contains(&map.source()));
        assert_eq!(map.last_filled_count(), 1);
        assert_eq!(map.filled_distance(), Some(0));
    }

    #[test]
    fn repeated_distance_is_a_no_op() {
        let mut map = corridor();
        place(&mut map, 1, 2, PipeShape::Horizontal);
        map.fill_tiles(1);
        let filled = map.filled_tiles().clone();

        map.fill_tiles(1);

        assert_eq!(map.filled_tiles(), &filled);
        assert_eq!(map.last_filled_count(), 1);
    }

    #[test]
    fn blocked_first_step_is_retried() {
        let mut map = corridor();
        map.fill_tiles(1);
        assert!(map.has_lost(), "no pipe next to the source");
        assert_eq!(map.filled_distance(), Some(0));

        place(&mut map, 1, 2, PipeShape::Horizontal);
        map.fill_tiles(1);

        assert!(!map.has_lost());
        assert!(map
            .cell(Coordinate::new(1, 2))
            .is_some_and(Cell::is_filled));
    }

    #[test]
    fn pipe_facing_away_from_source_does_not_fill() {
        let mut map = corridor();
        place(&mut map, 1, 2, PipeShape::Vertical);
        map.fill_tiles(1);

        assert!(map.has_lost());
        assert!(!map.filled_tiles().contains(&Coordinate::new(1, 2)));
    }

    #[test]
    fn water_follows_connected_pipes_one_tile_per_step() {
        let mut map = corridor();
        place(&mut map, 1, 2, PipeShape::BottomLeft);
        place(&mut map, 2, 2, PipeShape::TopRight);
        place(&mut map, 2, 3, PipeShape::Horizontal);

        map.fill_tiles(2);
        assert!(map.filled_tiles().contains(&Coordinate::new(2, 2)));
        assert!(!map.filled_tiles().contains(&Coordinate::new(2, 3)));

        map.fill_tiles(3);
        assert!(map.filled_tiles().contains(&Coordinate::new(2, 3)));
        assert_eq!(map.last_filled_count(), 1);

        map.fill_tiles(4);
        assert!(map.has_lost(), "horizontal pipe ends at a wall");
    }

    #[test]
    fn check_path_needs_outlets_to_reach_the_sink() {
        let mut map = corridor();
        place(&mut map, 1, 2, PipeShape::Horizontal);
        assert!(!map.check_path());

        place(&mut map, 1, 3, PipeShape::Horizontal);
        assert!(map.check_path());
    }

    #[test]
    fn check_path_follows_outlets_without_a_connection_back() {
        // Source points right into a vertical pipe; sink on the bottom border.
        let mut map = Map::from_layout(4, 4, "WWWW\nW>.W\nW..W\nWWvW").expect("valid layout");
        place(&mut map, 1, 2, PipeShape::Vertical);
        assert!(!map.check_path(), "vertical pipe alone does not reach the sink");

        place(&mut map, 2, 2, PipeShape::Vertical);
        assert!(map.check_path());

        map.fill_tiles(1);
        assert!(
            !map.filled_tiles().contains(&Coordinate::new(1, 2)),
            "water still needs the pipe to face the source"
        );
    }

    #[test]
    fn repeated_distance_past_the_first_pipe_is_a_no_op() {
        let mut map = corridor();
        place(&mut map, 1, 2, PipeShape::BottomLeft);
        place(&mut map, 2, 2, PipeShape::TopRight);
        place(&mut map, 2, 3, PipeShape::Horizontal);
        map.fill_tiles(3);
        let filled = map.filled_tiles().clone();
        let count = map.last_filled_count();

        map.fill_tiles(3);

        assert_eq!(map.filled_tiles(), &filled);
        assert_eq!(filled.len(), 4);
        assert_eq!(map.last_filled_count(), count);
        assert_eq!(map.filled_distance(), Some(3));
    }

    #[test]
    fn fill_all_reaches_the_sink() {
        let mut map = corridor();
        place(&mut map, 1, 2, PipeShape::Horizontal);
        place(&mut map, 1, 3, PipeShape::Horizontal);
        place(&mut map, 2, 2, PipeShape::Cross);

        map.fill_all();

        let sink = map.sink();
        assert!(map.cell(sink).is_some_and(Cell::is_filled));
        assert!(map.filled_tiles().contains(&sink));
        assert!(
            !map.filled_tiles().contains(&Coordinate::new(2, 2)),
            "cross below a horizontal pipe is not connected"
        );
    }

    #[test]
    fn negative_distance_fills_nothing() {
        let mut map = corridor();
        map.fill_tiles(-3);
        assert!(map.filled_tiles().is_empty());
        assert_eq!(map.filled_distance(), None);
    }
}
