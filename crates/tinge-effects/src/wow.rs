//! Wow engine: LFO-modulated delay for tape-transport pitch instability.
//!
//! Wow is the slow (sub-1 Hz) cyclical pitch variation of a tape machine
//! whose transport speed drifts. It is simulated by running the signal
//! through a short delay line whose length is modulated by a sine LFO:
//! a lengthening delay lowers pitch, a shortening one raises it.
//!
//! Both channels share one LFO, advanced once per sample tick, while each
//! channel owns its delay line. This keeps stereo wow phase-correlated —
//! the image wobbles as a whole instead of smearing into independent
//! per-channel flutter. That correlation is intentional; do not "fix" it
//! by giving each channel its own oscillator.

use tinge_core::{InterpolatedDelay, Lfo, ms_to_samples};

/// Wow LFO rate in Hz.
const WOW_FREQUENCY_HZ: f32 = 0.5;

/// Fixed base delay in milliseconds.
///
/// The modulation swings the delay above this floor, so the instantaneous
/// delay never drops below the base.
const BASE_DELAY_MS: f32 = 5.0;

/// Maximum modulation span above the base delay, in milliseconds.
const MAX_MODULATION_MS: f32 = 45.0;

/// Depth below this is treated as "off" and bypassed entirely.
const DEPTH_EPSILON: f32 = 0.001;

/// Maximum number of channels the engine supports.
const MAX_CHANNELS: usize = 2;

/// Tape-transport speed variation as modulated fractional delay.
///
/// # Example
///
/// ```rust
/// use tinge_effects::WowEngine;
///
/// let mut wow = WowEngine::new(48000.0);
/// wow.set_depth(50.0);
///
/// let left = wow.process(0.5, 0);
/// let right = wow.process(0.5, 1);
/// ```
#[derive(Debug, Clone)]
pub struct WowEngine {
    delay_lines: [InterpolatedDelay; MAX_CHANNELS],
    lfo: Lfo,
    /// Normalized depth in [0, 1]
    depth: f32,
    sample_rate: f32,
    /// LFO value held for the current sample tick, shared across channels
    tick_modulation: f32,
    /// Delay requested for the current tick, in samples (diagnostics/tests)
    current_delay: f32,
}

impl WowEngine {
    /// Create a wow engine sized for the given sample rate.
    ///
    /// The delay lines are allocated here, once; processing never allocates.
    pub fn new(sample_rate: f32) -> Self {
        let capacity = Self::capacity_for(sample_rate);
        Self {
            delay_lines: [
                InterpolatedDelay::new(capacity),
                InterpolatedDelay::new(capacity),
            ],
            lfo: Lfo::new(sample_rate, WOW_FREQUENCY_HZ),
            depth: 0.0,
            sample_rate,
            tick_modulation: 0.0,
            current_delay: 0.0,
        }
    }

    /// Buffer capacity covering base + full modulation, plus headroom for
    /// interpolation neighbours.
    fn capacity_for(sample_rate: f32) -> usize {
        ms_to_samples(BASE_DELAY_MS + MAX_MODULATION_MS, sample_rate) as usize + 2
    }

    /// Set modulation depth as a percentage (0-100), clamped.
    pub fn set_depth(&mut self, depth_percent: f32) {
        self.depth = depth_percent.clamp(0.0, 100.0) / 100.0;
    }

    /// Current normalized depth in [0, 1].
    pub fn depth(&self) -> f32 {
        self.depth
    }

    /// Delay requested for the most recent tick, in samples.
    ///
    /// Zero while the engine is bypassed (depth under the epsilon).
    pub fn current_delay_samples(&self) -> f32 {
        self.current_delay
    }

    /// Process one sample for one channel.
    ///
    /// Channel 0 advances the shared LFO and caches its value; the other
    /// channel reuses the cached value so every channel in one sample tick
    /// sees the identical modulation.
    #[inline]
    pub fn process(&mut self, input: f32, channel: usize) -> f32 {
        if self.depth <= DEPTH_EPSILON {
            // Pure pass-through: no latency, no noise floor when off
            return input;
        }
        if channel >= MAX_CHANNELS {
            return input;
        }

        if channel == 0 {
            self.tick_modulation = self.lfo.next_unipolar();
        }

        let delay_ms = BASE_DELAY_MS + self.tick_modulation * self.depth * MAX_MODULATION_MS;
        let max_delay = (self.delay_lines[channel].capacity() - 1) as f32;
        let delay_samples = ms_to_samples(delay_ms, self.sample_rate).clamp(1.0, max_delay);
        self.current_delay = delay_samples;

        self.delay_lines[channel].write_read(input, delay_samples)
    }

    /// Clear the delay lines and LFO phase.
    pub fn reset(&mut self) {
        for line in &mut self.delay_lines {
            line.clear();
        }
        self.lfo.reset();
        self.tick_modulation = 0.0;
        self.current_delay = 0.0;
    }

    /// Resize for a new sample rate. Prepare-time only: this reallocates.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        let capacity = Self::capacity_for(sample_rate);
        self.delay_lines = [
            InterpolatedDelay::new(capacity),
            InterpolatedDelay::new(capacity),
        ];
        self.lfo.set_sample_rate(sample_rate);
        self.lfo.set_frequency(WOW_FREQUENCY_HZ);
        self.reset();
    }
}

impl Default for WowEngine {
    fn default() -> Self {
        Self::new(48000.0)
    }
}
