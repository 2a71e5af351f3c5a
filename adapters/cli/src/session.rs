//! Interactive loop connecting console input to a shared game.

use std::{
    io::{BufRead, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use anyhow::{anyhow, Context, Result};
use pipes_core::{Command, Event};
use pipes_game::{self as game, Game, GameStatus};
use pipes_level_io::{load_level, save_level, LevelCatalog, LevelProperties};
use tracing::{info, warn};

use crate::{
    display::{describe, render_game},
    input::{parse_input, Input, HELP},
    settings::Settings,
    ticker::Ticker,
};

/// Builds a round from a map file, using the file's delay.
pub(crate) fn game_from_level(path: &Path, settings: &Settings) -> Result<(Game, i32)> {
    let level =
        load_level(path).with_context(|| format!("failed to load level {}", path.display()))?;
    let (map, delay, pipes) = level.into_parts();
    let config = settings.game_config().with_delay(delay);
    Ok((Game::from_map(map, pipes.unwrap_or_default(), &config), delay))
}

/// Console session over one game at a time.
pub(crate) struct Session {
    game: Arc<Mutex<Game>>,
    delay: i32,
    settings: Settings,
    catalog: LevelCatalog,
    ticker: Option<Ticker>,
}

impl Session {
    /// Wraps `game`, whose countdown lasts `delay` rounds.
    pub(crate) fn new(game: Game, delay: i32, settings: Settings, catalog: LevelCatalog) -> Self {
        Self {
            game: Arc::new(Mutex::new(game)),
            delay,
            settings,
            catalog,
            ticker: None,
        }
    }

    /// Reads commands from `input` until the player quits or input ends.
    pub(crate) fn run<R, W>(&mut self, input: R, out: &mut W) -> Result<()>
    where
        R: BufRead,
        W: Write,
    {
        writeln!(out, "Enter \":h\" for the list of commands.")?;
        self.start_round(out)?;

        for line in input.lines() {
            let line = line.context("failed to read from the console")?;
            let parsed = match parse_input(&line) {
                Ok(parsed) => parsed,
                Err(message) => {
                    writeln!(out, "{message}")?;
                    continue;
                }
            };

            match parsed {
                Input::Quit => break,
                Input::Help => writeln!(out, "{HELP}")?,
                Input::NextLevel => self.next_level(out)?,
                Input::Save(path) => self.save(&path, out)?,
                Input::Place(cell) => self.play(Some(Command::PlacePipe { cell }), out)?,
                Input::Skip => self.play(Some(Command::SkipPipe), out)?,
                Input::Undo => self.play(Some(Command::UndoStep), out)?,
                Input::Wait => self.play(None, out)?,
            }
        }

        self.stop_ticker();
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Game>> {
        self.game
            .lock()
            .map_err(|_| anyhow!("game state lock poisoned"))
    }

    fn start_round<W: Write>(&mut self, out: &mut W) -> Result<()> {
        {
            let mut game = self.lock()?;
            game.start_countdown();
            write!(out, "{}", render_game(&game))?;
        }

        if self.settings.realtime {
            let ticker = Ticker::spawn(
                Arc::clone(&self.game),
                self.settings.tick_interval(),
                report_ticks,
            );
            self.ticker = Some(ticker);
        }
        Ok(())
    }

    fn stop_ticker(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.stop();
        }
    }

    fn play<W: Write>(&mut self, command: Option<Command>, out: &mut W) -> Result<()> {
        let mut game = self.lock()?;
        if game.status() != GameStatus::Playing {
            writeln!(
                out,
                "The round is over. Enter \":n\" for the next level or \":q\" to quit."
            )?;
            return Ok(());
        }

        let mut events = Vec::new();
        if let Some(command) = command {
            game::apply(&mut game, command, &mut events)?;
        }
        if !self.settings.realtime {
            game.tick(&mut events);
        }
        if !game.has_won(&mut events) {
            let _ = game.has_lost(&mut events);
        }

        for message in events.iter().filter_map(describe) {
            writeln!(out, "{message}")?;
        }
        if events.contains(&Event::RoundWon) {
            let steps = game.steps();
            let noun = if steps == 1 { "step" } else { "steps" };
            writeln!(out, "Solved in {steps} {noun}.")?;
        }
        write!(out, "{}", render_game(&game))?;
        Ok(())
    }

    fn next_level<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let Some(name) = self.catalog.advance().map(str::to_owned) else {
            writeln!(out, "No more levels.")?;
            return Ok(());
        };
        let Some(path) = self.catalog.current_path() else {
            return Ok(());
        };

        match game_from_level(&path, &self.settings) {
            Ok((next, delay)) => {
                self.stop_ticker();
                *self.lock()? = next;
                self.delay = delay;
                info!(target: "pipes::levels", level = %name, "levels.switched");
                writeln!(out, "Loaded {name}.")?;
                self.start_round(out)
            }
            Err(error) => {
                warn!(target: "pipes::levels", level = %name, error = %format!("{error:#}"), "levels.load_failed");
                writeln!(out, "Cannot load {name}: {error:#}")?;
                Ok(())
            }
        }
    }

    fn save<W: Write>(&self, path: &Path, out: &mut W) -> Result<()> {
        let level = {
            let game = self.lock()?;
            LevelProperties::new(
                game.map().clone(),
                self.delay,
                Some(game.queue().iter().copied().collect()),
            )
        };

        match save_level(path, &level) {
            Ok(()) => writeln!(out, "Saved to {}.", path.display())?,
            Err(error) => writeln!(out, "Cannot save: {error}")?,
        }
        Ok(())
    }
}

fn report_ticks(game: &Game, events: &[Event]) {
    let messages: Vec<String> = events.iter().filter_map(describe).collect();
    let flowed = events
        .iter()
        .any(|event| matches!(event, Event::FlowAdvanced { .. }));
    if messages.is_empty() && !flowed {
        return;
    }

    println!();
    for message in messages {
        println!("{message}");
    }
    print!("{}", render_game(game));
}
