//! Involuntary blink timer
//!
//! Counts blink-eligible time and runs a close/hold/open pulse whenever the
//! randomized interval elapses. The timer only ever sees time the owner
//! chooses to feed it, so a suppressed (frozen) stretch does not count
//! toward the next blink.

use crate::config::BlinkConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Lower bound on a sampled interval so a degenerate config cannot spin
const MIN_INTERVAL: f32 = 0.05;

/// Where the eyelids are in a blink pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkPhase {
    Idle,
    Closing,
    Closed,
    Opening,
}

/// Blink pulse generator
#[derive(Debug)]
pub struct BlinkTimer {
    config: BlinkConfig,
    rng: StdRng,
    phase: BlinkPhase,
    phase_elapsed: f32,
    accumulated: f32,
    next_blink_at: f32,
    blink_count: u64,
}

impl BlinkTimer {
    pub fn new(config: BlinkConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let next_blink_at = sample_interval(&config, &mut rng);
        Self {
            config,
            rng,
            phase: BlinkPhase::Idle,
            phase_elapsed: 0.0,
            accumulated: 0.0,
            next_blink_at,
            blink_count: 0,
        }
    }

    /// Advance by `delta` seconds of blink-eligible time.
    ///
    /// Time left over after a phase ends carries into the following phase.
    /// At most one blink starts per call: once a pulse has run, leftover
    /// idle time is capped at the next interval so the following call
    /// starts the next blink.
    pub fn update(&mut self, delta: f32) {
        if !delta.is_finite() || delta <= 0.0 {
            return;
        }

        let mut remaining = delta;
        let mut started = false;
        while remaining > 0.0 {
            match self.phase {
                BlinkPhase::Idle => {
                    if !self.config.enabled {
                        return;
                    }
                    let until_blink = (self.next_blink_at - self.accumulated).max(0.0);
                    if started {
                        self.accumulated += remaining.min(until_blink);
                        return;
                    }
                    if remaining < until_blink {
                        self.accumulated += remaining;
                        return;
                    }
                    started = true;
                    remaining -= until_blink;
                    self.accumulated = 0.0;
                    self.blink_count += 1;
                    debug!("Blink #{} started", self.blink_count);
                    self.enter(BlinkPhase::Closing);
                }
                BlinkPhase::Closing => {
                    self.advance_phase(&mut remaining, self.config.close_duration, BlinkPhase::Closed)
                }
                BlinkPhase::Closed => {
                    self.advance_phase(&mut remaining, self.config.hold_duration, BlinkPhase::Opening)
                }
                BlinkPhase::Opening => {
                    self.advance_phase(&mut remaining, self.config.open_duration, BlinkPhase::Idle);
                    if self.phase == BlinkPhase::Idle {
                        self.next_blink_at = sample_interval(&self.config, &mut self.rng);
                        debug!("Blink finished, next in {:.2}s", self.next_blink_at);
                    }
                }
            }
        }
    }

    fn advance_phase(&mut self, remaining: &mut f32, duration: f32, next: BlinkPhase) {
        let left = (duration - self.phase_elapsed).max(0.0);
        if *remaining < left {
            self.phase_elapsed += *remaining;
            *remaining = 0.0;
        } else {
            *remaining -= left;
            self.enter(next);
        }
    }

    fn enter(&mut self, phase: BlinkPhase) {
        self.phase = phase;
        self.phase_elapsed = 0.0;
    }

    /// Eyelid weight in [0, 1]
    pub fn weight(&self) -> f32 {
        match self.phase {
            BlinkPhase::Idle => 0.0,
            BlinkPhase::Closing => ramp(self.phase_elapsed, self.config.close_duration),
            BlinkPhase::Closed => 1.0,
            BlinkPhase::Opening => 1.0 - ramp(self.phase_elapsed, self.config.open_duration),
        }
    }

    pub fn is_blinking(&self) -> bool {
        self.phase != BlinkPhase::Idle
    }

    pub fn phase(&self) -> BlinkPhase {
        self.phase
    }

    /// Blink-eligible time gathered since the last blink
    pub fn accumulated(&self) -> f32 {
        self.accumulated
    }

    /// Eligible time at which the next blink starts
    pub fn next_blink_at(&self) -> f32 {
        self.next_blink_at
    }

    /// Number of blinks started so far
    pub fn blink_count(&self) -> u64 {
        self.blink_count
    }
}

fn ramp(elapsed: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        return 1.0;
    }
    (elapsed / duration).clamp(0.0, 1.0)
}

fn sample_interval(config: &BlinkConfig, rng: &mut StdRng) -> f32 {
    let min = config.interval_min.max(MIN_INTERVAL);
    let max = config.interval_max.max(min);
    if max > min {
        rng.gen_range(min..=max)
    } else {
        min
    }
}
