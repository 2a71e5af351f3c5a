#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Upcoming-pipe queue with a fixed lookahead.
//!
//! The queue always exposes at least [`LOOKAHEAD`] pipes after construction
//! and after every [`PipeQueue::consume`]. Pipes returned through
//! [`PipeQueue::undo`] go to the front and may push the length above the
//! lookahead until the next consume.

use std::collections::VecDeque;

use pipes_core::{Pipe, PipeShape};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// Number of upcoming pipes kept available.
pub const LOOKAHEAD: usize = 5;

/// Errors raised by the queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum QueueError {
    /// The queue held no pipes, which the top-up logic should never allow.
    #[error("pipe queue is empty")]
    Empty,
}

/// Queue of pipes the player places or skips, front first.
#[derive(Clone, Debug)]
pub struct PipeQueue {
    pipes: VecDeque<Pipe>,
    rng: ChaCha8Rng,
}

impl PipeQueue {
    /// Creates a queue starting with `seed_pipes`, topped up from entropy.
    #[must_use]
    pub fn new<I>(seed_pipes: I) -> Self
    where
        I: IntoIterator<Item = Pipe>,
    {
        Self::with_rng(ChaCha8Rng::from_entropy(), seed_pipes)
    }

    /// Creates a queue whose generated pipes follow a reproducible stream.
    #[must_use]
    pub fn with_seed<I>(seed: u64, seed_pipes: I) -> Self
    where
        I: IntoIterator<Item = Pipe>,
    {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed), seed_pipes)
    }

    fn with_rng<I>(rng: ChaCha8Rng, seed_pipes: I) -> Self
    where
        I: IntoIterator<Item = Pipe>,
    {
        let mut queue = Self {
            pipes: seed_pipes.into_iter().map(|pipe| Pipe::new(pipe.shape())).collect(),
            rng,
        };
        queue.top_up();
        queue
    }

    /// Pipe at the front of the queue.
    pub fn peek(&self) -> Result<Pipe, QueueError> {
        self.pipes.front().copied().ok_or(QueueError::Empty)
    }

    /// Removes the front pipe and refills the lookahead.
    pub fn consume(&mut self) -> Result<Pipe, QueueError> {
        let pipe = self.pipes.pop_front().ok_or(QueueError::Empty)?;
        self.top_up();
        Ok(pipe)
    }

    /// Returns a pipe to the front of the queue.
    pub fn undo(&mut self, pipe: Pipe) {
        self.pipes.push_front(Pipe::new(pipe.shape()));
    }

    /// Number of pipes currently queued.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pipes.len()
    }

    /// Whether the queue holds no pipes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }

    /// Queued pipes, front first.
    pub fn iter(&self) -> impl Iterator<Item = &Pipe> + '_ {
        self.pipes.iter()
    }

    fn top_up(&mut self) {
        while self.pipes.len() < LOOKAHEAD {
            let shape = PipeShape::ALL[self.rng.gen_range(0..PipeShape::ALL.len())];
            self.pipes.push_back(Pipe::new(shape));
        }
    }
}
