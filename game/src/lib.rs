#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Game facade coordinating the map, the pipe queue, the placement history
//! and the round driver.
//!
//! Every mutation reports what it changed by appending [`Event`] values to a
//! caller-supplied buffer. Adapters that prefer a message stream can submit
//! [`Command`] values through [`apply`] instead of calling methods directly.

use pipes_core::{Cell, Command, Coordinate, Event, MapError, Pipe, UndoRejection};
use pipes_system_flow_timer::FlowTimer;
use pipes_system_history::{CellStack, Placement};
use pipes_system_queue::{PipeQueue, QueueError};
use pipes_world::Map;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, info};

mod config;

pub use config::{GameConfig, DEFAULT_COLS, DEFAULT_ROWS};
pub use pipes_system_flow_timer::FlowPhase;

/// Errors surfaced by the facade.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    /// The map rejected a construction or undo request.
    #[error(transparent)]
    Map(#[from] MapError),
    /// The pipe queue ran dry.
    #[error(transparent)]
    Queue(#[from] QueueError),
}

/// Outcome of the current round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameStatus {
    /// Neither won nor lost yet.
    Playing,
    /// Water has a connected route to the sink.
    Won,
    /// A flow round passed without water progressing.
    Lost,
}

/// A single round of Pipes.
#[derive(Debug)]
pub struct Game {
    map: Map,
    queue: PipeQueue,
    history: CellStack,
    timer: FlowTimer,
    steps: u32,
    status: GameStatus,
}

impl Game {
    /// Generates a random board with `rows` by `cols` playable tiles.
    ///
    /// The wall border is added around the requested interior.
    pub fn generate(rows: i32, cols: i32, config: &GameConfig) -> Result<Self, GameError> {
        let mut rng = match config.seed() {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let (Some(walled_rows), Some(walled_cols)) = (rows.checked_add(2), cols.checked_add(2))
        else {
            return Err(MapError::TooLarge { rows, cols }.into());
        };
        let map = Map::generate(walled_rows, walled_cols, &mut rng)?;
        let queue = PipeQueue::with_seed(rng.gen(), Vec::<Pipe>::new());
        Ok(Self::assemble(map, queue, config))
    }

    /// Starts a round on an existing map with an optional fixed pipe sequence.
    #[must_use]
    pub fn from_map(map: Map, pipes: Vec<Pipe>, config: &GameConfig) -> Self {
        let queue = match config.seed() {
            Some(seed) => PipeQueue::with_seed(seed, pipes),
            None => PipeQueue::new(pipes),
        };
        Self::assemble(map, queue, config)
    }

    /// Starts a round on a map described by its textual layout.
    pub fn from_layout(
        rows: i32,
        cols: i32,
        layout: &str,
        pipes: Vec<Pipe>,
        config: &GameConfig,
    ) -> Result<Self, GameError> {
        let map = Map::from_layout(rows, cols, layout)?;
        Ok(Self::from_map(map, pipes, config))
    }

    fn assemble(map: Map, queue: PipeQueue, config: &GameConfig) -> Self {
        Self {
            map,
            queue,
            history: CellStack::new(),
            timer: FlowTimer::new(config.delay(), config.flow_duration()),
            steps: 0,
            status: GameStatus::Playing,
        }
    }

    /// Registers a callback invoked with the tick count on every driver tick.
    pub fn add_on_tick_handler<F>(&mut self, handler: F)
    where
        F: FnMut(u64) + Send + 'static,
    {
        self.timer.add_on_tick_handler(handler);
    }

    /// Registers a callback invoked with the new distance on every flow round.
    pub fn add_on_flow_handler<F>(&mut self, handler: F)
    where
        F: FnMut(i32) + Send + 'static,
    {
        self.timer.add_on_flow_handler(handler);
    }

    /// Starts the round driver.
    pub fn start_countdown(&mut self) {
        self.timer.start();
    }

    /// Stops the round driver for good.
    pub fn stop_countdown(&mut self) {
        self.timer.stop();
    }

    /// Places the front pipe of the queue at `coord`.
    ///
    /// Returns `Ok(false)` and leaves all state untouched when the map
    /// rejects the placement.
    pub fn place_pipe(
        &mut self,
        coord: Coordinate,
        out_events: &mut Vec<Event>,
    ) -> Result<bool, GameError> {
        let pipe = self.queue.peek()?;
        if let Err(reason) = self.map.place_pipe(coord, pipe) {
            debug!(
                target: "pipes::game",
                row = coord.row(),
                col = coord.col(),
                %reason,
                "game.placement.rejected"
            );
            out_events.push(Event::PlacementRejected {
                cell: coord,
                reason,
            });
            return Ok(false);
        }

        let _ = self.queue.consume()?;
        let placement = self
            .map
            .cell(coord)
            .and_then(Placement::from_cell)
            .unwrap_or_else(|| Placement::new(coord, pipe));
        self.history.push(placement);
        self.steps += 1;

        out_events.push(Event::PipePlaced {
            cell: coord,
            shape: pipe.shape(),
        });
        out_events.push(Event::StepsChanged { steps: self.steps });
        Ok(true)
    }

    /// Discards the front pipe of the queue.
    pub fn skip_pipe(&mut self, out_events: &mut Vec<Event>) -> Result<(), GameError> {
        let pipe = self.queue.consume()?;
        self.steps += 1;
        debug!(target: "pipes::game", shape = %pipe.shape(), "game.pipe.skipped");

        out_events.push(Event::PipeSkipped {
            shape: pipe.shape(),
        });
        out_events.push(Event::StepsChanged { steps: self.steps });
        Ok(())
    }

    /// Reverts the most recent placement unless water already reached it.
    ///
    /// A rejected undo changes nothing, counters included.
    pub fn undo_step(&mut self, out_events: &mut Vec<Event>) -> Result<bool, GameError> {
        let Some(placement) = self.history.peek().copied() else {
            out_events.push(Event::UndoRejected {
                reason: UndoRejection::NothingToUndo,
            });
            return Ok(false);
        };

        let coord = placement.coord();
        if self.map.cell(coord).is_some_and(Cell::is_filled) {
            debug!(
                target: "pipes::game",
                row = coord.row(),
                col = coord.col(),
                "game.undo.rejected_filled"
            );
            out_events.push(Event::UndoRejected {
                reason: UndoRejection::AlreadyFilled,
            });
            return Ok(false);
        }

        self.map.undo(coord)?;
        let _ = self.history.pop();
        self.queue.undo(placement.pipe());
        self.steps += 1;

        out_events.push(Event::StepUndone {
            cell: coord,
            shape: placement.pipe().shape(),
        });
        out_events.push(Event::StepsChanged { steps: self.steps });
        out_events.push(Event::UndoCountChanged {
            undos: self.history.undo_count(),
        });
        Ok(true)
    }

    /// Propagates water up to the driver's current distance.
    ///
    /// Nothing happens while the countdown is still running.
    pub fn update_state(&mut self, out_events: &mut Vec<Event>) {
        let distance = self.timer.distance();
        if distance < 0 {
            return;
        }
        if distance == 0 {
            self.map.fill_begin_tile();
        }
        self.map.fill_tiles(distance);

        out_events.push(Event::TilesFilled {
            distance,
            newly_filled: self.map.last_filled_count(),
        });
    }

    /// Whether a connected route to the sink exists.
    ///
    /// The first time it does, the driver stops and the whole route fills.
    pub fn has_won(&mut self, out_events: &mut Vec<Event>) -> bool {
        if !self.map.check_path() {
            return false;
        }

        self.timer.stop();
        if self.status == GameStatus::Playing {
            self.map.fill_all();
            self.status = GameStatus::Won;
            info!(target: "pipes::game", steps = self.steps, "game.won");
            out_events.push(Event::RoundWon);
        }
        true
    }

    /// Whether the last flow round failed to move water forward.
    ///
    /// Always `false` until water has started flowing.
    pub fn has_lost(&mut self, out_events: &mut Vec<Event>) -> bool {
        if self.timer.distance() <= 0 || !self.map.has_lost() {
            return false;
        }

        self.timer.stop();
        if self.status == GameStatus::Playing {
            self.status = GameStatus::Lost;
            info!(
                target: "pipes::game",
                distance = self.timer.distance(),
                steps = self.steps,
                "game.lost"
            );
            out_events.push(Event::RoundLost);
        }
        true
    }

    /// Advances the round driver by one tick.
    ///
    /// When the tick completes a flow round, water is propagated and the
    /// win and loss conditions are evaluated.
    pub fn tick(&mut self, out_events: &mut Vec<Event>) {
        let Some(report) = self.timer.tick() else {
            return;
        };
        out_events.push(Event::TimeAdvanced {
            ticks: report.ticks(),
        });

        if let Some(distance) = report.flowed_to() {
            out_events.push(Event::FlowAdvanced { distance });
            self.update_state(out_events);
            if !self.has_won(out_events) {
                let _ = self.has_lost(out_events);
            }
        }
    }

    /// Steps taken so far, undos included.
    #[must_use]
    pub const fn steps(&self) -> u32 {
        self.steps
    }

    /// Successful undos so far.
    #[must_use]
    pub const fn undo_count(&self) -> u32 {
        self.history.undo_count()
    }

    /// Flow distance reported by the round driver.
    #[must_use]
    pub const fn distance(&self) -> i32 {
        self.timer.distance()
    }

    /// Ticks elapsed since the round driver started.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.timer.ticks()
    }

    /// Stage of the round driver.
    #[must_use]
    pub const fn phase(&self) -> FlowPhase {
        self.timer.phase()
    }

    /// Outcome of the round so far.
    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    /// Read-only view of the map.
    #[must_use]
    pub const fn map(&self) -> &Map {
        &self.map
    }

    /// Read-only view of the upcoming pipes.
    #[must_use]
    pub const fn queue(&self) -> &PipeQueue {
        &self.queue
    }
}

/// Applies `command` to `game`, appending the resulting events.
pub fn apply(
    game: &mut Game,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), GameError> {
    match command {
        Command::PlacePipe { cell } => {
            let _ = game.place_pipe(cell, out_events)?;
        }
        Command::SkipPipe => game.skip_pipe(out_events)?,
        Command::UndoStep => {
            let _ = game.undo_step(out_events)?;
        }
        Command::StartCountdown => game.start_countdown(),
        Command::StopCountdown => game.stop_countdown(),
        Command::Tick => game.tick(out_events),
        Command::UpdateState => game.update_state(out_events),
    }
    Ok(())
}
