//! Background thread that ticks a shared game at a fixed interval.

use std::{
    sync::{
        mpsc::{self, RecvTimeoutError, Sender},
        Arc, Mutex,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use pipes_core::Event;
use pipes_game::Game;
use tracing::{debug, warn};

/// Handle to a running ticker thread.
///
/// Dropping or stopping the handle joins the thread, so no tick reaches the
/// game after [`Ticker::stop`] returns.
#[derive(Debug)]
pub(crate) struct Ticker {
    shutdown: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Spawns a thread that ticks `game` every `interval` and hands the
    /// resulting events to `report` while the game lock is held.
    pub(crate) fn spawn<F>(game: Arc<Mutex<Game>>, interval: Duration, mut report: F) -> Self
    where
        F: FnMut(&Game, &[Event]) + Send + 'static,
    {
        let (shutdown, stopped) = mpsc::channel::<()>();
        let handle = thread::spawn(move || loop {
            match stopped.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }

            let Ok(mut game) = game.lock() else {
                warn!(target: "pipes::game", "ticker.lock_poisoned");
                break;
            };
            let mut events = Vec::new();
            game.tick(&mut events);
            if !events.is_empty() {
                report(&game, &events);
            }
        });
        debug!(target: "pipes::game", interval_ms = interval.as_millis(), "ticker.started");

        Self {
            shutdown: Some(shutdown),
            handle: Some(handle),
        }
    }

    /// Stops the thread and waits for it to finish.
    pub(crate) fn stop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!(target: "pipes::game", "ticker.panicked");
            }
            debug!(target: "pipes::game", "ticker.stopped");
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pipes_game::GameConfig;

    use super::*;

    fn shared_game() -> Arc<Mutex<Game>> {
        let game = Game::from_layout(
            4,
            4,
            "WWWW\nW>.<\nW..W\nWWWW",
            Vec::new(),
            &GameConfig::new(1_000, 1_000, Some(3)),
        )
        .expect("valid layout");
        Arc::new(Mutex::new(game))
    }

    #[test]
    fn no_tick_lands_after_stop() {
        let game = shared_game();
        game.lock().expect("lock").start_countdown();
        let reports = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&reports);

        let mut ticker = Ticker::spawn(Arc::clone(&game), Duration::from_millis(1), move |_, _| {
            let _ = counter.fetch_add(1, Ordering::SeqCst);
        });
        while reports.load(Ordering::SeqCst) < 3 {
            thread::sleep(Duration::from_millis(1));
        }
        ticker.stop();

        let ticks_at_stop = game.lock().expect("lock").ticks();
        thread::sleep(Duration::from_millis(20));
        assert_eq!(game.lock().expect("lock").ticks(), ticks_at_stop);
        assert!(ticks_at_stop >= 3);
    }

    #[test]
    fn idle_game_is_not_reported() {
        let game = shared_game();
        let reports = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&reports);

        let ticker = Ticker::spawn(Arc::clone(&game), Duration::from_millis(1), move |_, _| {
            let _ = counter.fetch_add(1, Ordering::SeqCst);
        });
        thread::sleep(Duration::from_millis(20));
        drop(ticker);

        assert_eq!(reports.load(Ordering::SeqCst), 0);
        assert_eq!(game.lock().expect("lock").ticks(), 0);
    }
}
