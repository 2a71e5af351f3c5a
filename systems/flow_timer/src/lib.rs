#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Round driver that turns external ticks into flow rounds.
//!
//! The driver owns no clock. An embedding scheduler calls [`FlowTimer::tick`]
//! at whatever cadence it likes; every `flow_duration` ticks the flow
//! distance advances by one. Distance starts at `-delay`, reaches zero when
//! water leaves the source and counts propagation layers afterwards.

use std::fmt;

use tracing::debug;

/// Rounds before water starts moving, unless configured otherwise.
pub const DEFAULT_DELAY: i32 = 10;

/// Ticks per flow round, unless configured otherwise.
pub const DEFAULT_FLOW_DURATION: u32 = 5;

type TickHandler = Box<dyn FnMut(u64) + Send>;
type FlowHandler = Box<dyn FnMut(i32) + Send>;

/// Observable stage of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowPhase {
    /// The driver has not been started.
    Idle,
    /// Started, water has not left the source yet.
    CountingDown,
    /// Water is moving through the map.
    Flowing,
    /// Stopped after a win or loss. Terminal.
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RunState {
    Idle,
    Running,
    Stopped,
}

/// Result of a tick that reached a running driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickReport {
    ticks: u64,
    flowed_to: Option<i32>,
}

impl TickReport {
    /// Ticks elapsed since the driver started.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// New distance when this tick completed a flow round.
    #[must_use]
    pub const fn flowed_to(&self) -> Option<i32> {
        self.flowed_to
    }
}

/// Tick counter and flow distance with observer hooks.
pub struct FlowTimer {
    state: RunState,
    ticks: u64,
    distance: i32,
    flow_duration: u64,
    tick_handlers: Vec<TickHandler>,
    flow_handlers: Vec<FlowHandler>,
}

impl FlowTimer {
    /// Creates an idle driver.
    ///
    /// A `flow_duration` of zero is treated as one tick per round.
    #[must_use]
    pub fn new(delay: i32, flow_duration: u32) -> Self {
        Self {
            state: RunState::Idle,
            ticks: 0,
            distance: delay.saturating_neg(),
            flow_duration: u64::from(flow_duration.max(1)),
            tick_handlers: Vec::new(),
            flow_handlers: Vec::new(),
        }
    }

    /// Registers a callback invoked with the tick count on every tick.
    pub fn add_on_tick_handler<F>(&mut self, handler: F)
    where
        F: FnMut(u64) + Send + 'static,
    {
        self.tick_handlers.push(Box::new(handler));
    }

    /// Registers a callback invoked with the new distance on every flow round.
    pub fn add_on_flow_handler<F>(&mut self, handler: F)
    where
        F: FnMut(i32) + Send + 'static,
    {
        self.flow_handlers.push(Box::new(handler));
    }

    /// Starts counting ticks. No effect once running or stopped.
    pub fn start(&mut self) {
        if self.state == RunState::Idle {
            self.state = RunState::Running;
            debug!(target: "pipes::timer", distance = self.distance, "timer.started");
        }
    }

    /// Stops the driver for good; later ticks are ignored.
    pub fn stop(&mut self) {
        if self.state != RunState::Stopped {
            self.state = RunState::Stopped;
            debug!(target: "pipes::timer", ticks = self.ticks, "timer.stopped");
        }
    }

    /// Advances the driver by one tick.
    ///
    /// Returns `None` without invoking any callback unless the driver is
    /// running.
    pub fn tick(&mut self) -> Option<TickReport> {
        if self.state != RunState::Running {
            return None;
        }

        self.ticks += 1;
        let ticks = self.ticks;
        for handler in &mut self.tick_handlers {
            handler(ticks);
        }

        let flowed_to = (ticks % self.flow_duration == 0).then(|| {
            self.distance = self.distance.saturating_add(1);
            self.distance
        });
        if let Some(distance) = flowed_to {
            for handler in &mut self.flow_handlers {
                handler(distance);
            }
        }

        Some(TickReport { ticks, flowed_to })
    }

    /// Current stage of the round.
    #[must_use]
    pub const fn phase(&self) -> FlowPhase {
        match self.state {
            RunState::Idle => FlowPhase::Idle,
            RunState::Stopped => FlowPhase::Stopped,
            RunState::Running if self.distance > 0 => FlowPhase::Flowing,
            RunState::Running => FlowPhase::CountingDown,
        }
    }

    /// Whether ticks are currently counted.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// Ticks elapsed since the driver started.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Current flow distance; negative while counting down.
    #[must_use]
    pub const fn distance(&self) -> i32 {
        self.distance
    }
}

impl Default for FlowTimer {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY, DEFAULT_FLOW_DURATION)
    }
}

impl fmt::Debug for FlowTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowTimer")
            .field("state", &self.state)
            .field("ticks", &self.ticks)
            .field("distance", &self.distance)
            .field("flow_duration", &self.flow_duration)
            .field("tick_handlers", &self.tick_handlers.len())
            .field("flow_handlers", &self.flow_handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_flow_duration_flows_every_tick() {
        let mut timer = FlowTimer::new(1, 0);
        timer.start();

        let report = timer.tick().expect("running");
        assert_eq!(report.flowed_to(), Some(0));
    }

    #[test]
    fn default_matches_documented_constants() {
        let timer = FlowTimer::default();
        assert_eq!(timer.distance(), -DEFAULT_DELAY);
        assert_eq!(timer.phase(), FlowPhase::Idle);
    }
}
