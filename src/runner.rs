//! Fixed-rate host loop
//!
//! Drives [`tick`] at `Settings::tick_hz`. The clock is sampled once per tick
//! and the same timestamp is handed to input sampling, the simulation and the
//! presented frame, so effect timers and the laser cooldown see one consistent
//! `now` per tick.

use std::time::{Duration, Instant};

use crate::settings::Settings;
use crate::sim::{Frame, GameState, TickInput, tick};

/// Monotonic millisecond clock
pub trait Clock {
    fn now_ms(&self) -> u64;

    /// Block until `deadline_ms` (no-op if already past)
    fn sleep_until(&mut self, deadline_ms: u64);
}

/// Wall clock backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn sleep_until(&mut self, deadline_ms: u64) {
        let now = self.now_ms();
        if deadline_ms > now {
            std::thread::sleep(Duration::from_millis(deadline_ms - now));
        }
    }
}

/// Per-tick input provider
pub trait InputSource {
    /// Sample input for the next tick. `None` asks the loop to quit.
    fn sample(&mut self, frame: &Frame<'_>) -> Option<TickInput>;
}

impl<F> InputSource for F
where
    F: FnMut(&Frame<'_>) -> Option<TickInput>,
{
    fn sample(&mut self, frame: &Frame<'_>) -> Option<TickInput> {
        self(frame)
    }
}

/// Receives one frame after every tick
pub trait FrameSink {
    fn present(&mut self, frame: &Frame<'_>);
}

/// Outcome of a [`GameLoop::run`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub score: u64,
    pub level: u32,
    pub lives: u32,
    pub game_over: bool,
}

/// Owns a session and runs it at a fixed rate
#[derive(Debug)]
pub struct GameLoop {
    pub state: GameState,
    pub settings: Settings,
}

impl GameLoop {
    pub fn new(settings: Settings) -> Self {
        Self {
            state: GameState::from_settings(&settings),
            settings,
        }
    }

    /// Run until the input source quits or `max_ticks` is reached
    pub fn run<I, S, C>(&mut self, input: &mut I, sink: &mut S, clock: &mut C) -> RunSummary
    where
        I: InputSource,
        S: FrameSink,
        C: Clock,
    {
        let period_ms = self.settings.tick_period_ms();
        let start_ms = clock.now_ms();
        let mut ticks: u64 = 0;

        log::info!(
            "Running at {} Hz (seed {})",
            self.settings.tick_hz,
            self.state.seed
        );

        loop {
            if self.settings.max_ticks.is_some_and(|max| ticks >= max) {
                log::info!("Tick limit reached");
                break;
            }

            let now_ms = clock.now_ms();
            let Some(tick_input) = input.sample(&self.state.frame(now_ms)) else {
                log::info!("Quit requested");
                break;
            };

            tick(&mut self.state, &tick_input, now_ms);
            ticks += 1;
            sink.present(&self.state.frame(now_ms));

            let deadline = start_ms + (ticks as f64 * period_ms).round() as u64;
            clock.sleep_until(deadline);
        }

        let summary = self.summary(ticks);
        log::info!(
            "Run finished after {} ticks: score {}, level {}, lives {}",
            summary.ticks,
            summary.score,
            summary.level,
            summary.lives
        );
        summary
    }

    fn summary(&self, ticks: u64) -> RunSummary {
        RunSummary {
            ticks,
            score: self.state.score,
            level: self.state.level,
            lives: self.state.lives,
            game_over: self.state.is_game_over(),
        }
    }
}
