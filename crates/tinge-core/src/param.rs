//! Parameter smoothing for zipper-free changes.
//!
//! Audio parameters (wow depth, drive, tone, cutoff frequency) need smooth
//! transitions to avoid audible "zipper noise" when values change. This
//! module provides [`SmoothedParam`] for sample-accurate exponential
//! smoothing.
//!
//! Smoothing is the sole mechanism that converts discontinuous cross-thread
//! parameter writes into a control signal safe to apply sample-by-sample:
//! the control surface stores targets into an atomic parameter store, the
//! audio thread pulls them once per block into a smoother's target, and the
//! smoother approaches the target one step per sample.
//!
//! ## Usage
//!
//! ```rust
//! use tinge_core::SmoothedParam;
//!
//! let mut depth = SmoothedParam::with_config(0.0, 48000.0, 10.0);
//!
//! // Set new target - smoothing happens automatically
//! depth.set_target(0.5);
//!
//! // In audio callback, get smoothed value each sample
//! for _ in 0..480 { // 10ms at 48kHz
//!     let smoothed = depth.advance();
//!     // Use smoothed for processing...
//! }
//! ```

use crate::flush_denormal;
use libm::expf;

/// A parameter with built-in exponential smoothing (one-pole lowpass).
///
/// The smoothed value approaches the target monotonically and never
/// overshoots, since the coefficient always lies in (0, 1].
#[derive(Debug, Clone)]
pub struct SmoothedParam {
    /// Current smoothed value
    current: f32,
    /// Target value we're smoothing towards
    target: f32,
    /// Smoothing coefficient (1 = instant, near 0 = very slow)
    coeff: f32,
    /// Sample rate in Hz
    sample_rate: f32,
    /// Smoothing time in milliseconds
    smoothing_time_ms: f32,
}

impl SmoothedParam {
    /// Create a new smoothed parameter with initial value.
    ///
    /// Smoothing is disabled by default (instant changes). Call
    /// [`set_sample_rate`](Self::set_sample_rate) and
    /// [`set_smoothing_time_ms`](Self::set_smoothing_time_ms) to enable.
    pub fn new(initial: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            coeff: 1.0, // No smoothing until configured
            sample_rate: 44100.0,
            smoothing_time_ms: 0.0,
        }
    }

    /// Create a smoothed parameter with full configuration.
    ///
    /// # Arguments
    /// * `initial` - Initial parameter value
    /// * `sample_rate` - Sample rate in Hz
    /// * `smoothing_time_ms` - Smoothing time constant in milliseconds
    pub fn with_config(initial: f32, sample_rate: f32, smoothing_time_ms: f32) -> Self {
        let mut param = Self::new(initial);
        param.sample_rate = sample_rate;
        param.smoothing_time_ms = smoothing_time_ms;
        param.recalculate_coeff();
        param
    }

    /// Standard 10 ms smoothing, good for gain-style parameters.
    pub fn standard(initial: f32, sample_rate: f32) -> Self {
        Self::with_config(initial, sample_rate, 10.0)
    }

    /// Set the target value (parameter will smooth towards this).
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Set target and immediately snap to it (no smoothing).
    #[inline]
    pub fn set_immediate(&mut self, value: f32) {
        self.target = value;
        self.current = value;
    }

    /// Update sample rate and recalculate smoothing coefficient.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coeff();
    }

    /// Set smoothing time in milliseconds.
    ///
    /// Typical values:
    /// - 0.0 ms: No smoothing (instant)
    /// - 10-20 ms: Fast, good for gain/drive/tone
    /// - 50 ms: Medium, good for filter cutoff
    /// - 100+ ms: Slow, for modulation-depth parameters
    pub fn set_smoothing_time_ms(&mut self, time_ms: f32) {
        self.smoothing_time_ms = time_ms;
        self.recalculate_coeff();
    }

    /// Get the next smoothed value (advances by one sample).
    ///
    /// Call this once per sample in your audio processing loop.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        // One-pole lowpass: y[n] = y[n-1] + coeff * (target - y[n-1])
        self.current = flush_denormal(self.current + self.coeff * (self.target - self.current));
        self.current
    }

    /// Get the current smoothed value without advancing.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Get the target value.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Check if the parameter has reached its target (within epsilon).
    #[inline]
    pub fn is_settled(&self) -> bool {
        (self.current - self.target).abs() < 1e-6
    }

    /// Skip ahead to the target value immediately.
    ///
    /// Used at stream (re)start so playback doesn't begin with a long fade
    /// from a stale pre-roll value.
    #[inline]
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
    }

    /// Recalculate the smoothing coefficient from sample rate and time.
    ///
    /// A one-pole lowpass has the difference equation
    /// `y[n] = y[n-1] + coeff * (target - y[n-1])`, a first-order IIR with
    /// pole at `(1 - coeff)`. The time constant tau (time to reach 63.2% of
    /// target) relates to the coefficient by
    ///
    ///   `coeff = 1 - exp(-1 / (tau * sample_rate))`
    ///
    /// where `tau = smoothing_time_ms / 1000`. After 5*tau the parameter has
    /// reached 99.3% of the target.
    ///
    /// Non-positive time or sample rate yields `coeff = 1` (instant
    /// tracking) rather than a NaN coefficient.
    fn recalculate_coeff(&mut self) {
        if self.smoothing_time_ms <= 0.0 || self.sample_rate <= 0.0 {
            self.coeff = 1.0; // Instant (no smoothing)
        } else {
            let time_constant = self.smoothing_time_ms / 1000.0;
            let samples = time_constant * self.sample_rate;
            self.coeff = 1.0 - expf(-1.0 / samples);
        }
    }
}

impl Default for SmoothedParam {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instant_when_no_smoothing() {
        let mut param = SmoothedParam::new(1.0);
        param.set_sample_rate(48000.0);
        param.set_smoothing_time_ms(0.0);

        param.set_target(0.5);
        let val = param.advance();
        assert!((val - 0.5).abs() < 1e-6, "Should snap instantly");
    }

    #[test]
    fn converges_to_target() {
        let mut param = SmoothedParam::with_config(0.0, 48000.0, 10.0);
        param.set_target(1.0);

        // Run for 50ms (5x the time constant) - should be very close
        for _ in 0..(48000 * 50 / 1000) {
            param.advance();
        }

        assert!(
            (param.get() - 1.0).abs() < 0.01,
            "Should converge to target, got {}",
            param.get()
        );
    }

    #[test]
    fn gradual_exponential_approach() {
        let mut param = SmoothedParam::with_config(0.0, 48000.0, 10.0);
        param.set_target(1.0);

        // After one time constant (~10ms), should be about 63% of the way
        let samples_for_time_constant = (48000.0 * 0.010) as usize;
        for _ in 0..samples_for_time_constant {
            param.advance();
        }

        let expected = 1.0 - expf(-1.0); // ~0.632
        assert!(
            (param.get() - expected).abs() < 0.05,
            "After one time constant, expected ~{}, got {}",
            expected,
            param.get()
        );
    }

    #[test]
    fn monotone_no_overshoot() {
        let mut param = SmoothedParam::with_config(0.0, 48000.0, 5.0);
        param.set_target(1.0);

        let mut prev = param.get();
        for _ in 0..4800 {
            let v = param.advance();
            assert!(v >= prev, "Must approach monotonically: {prev} -> {v}");
            assert!(v <= 1.0, "Must never overshoot target, got {v}");
            prev = v;
        }
    }

    #[test]
    fn degenerate_config_is_instant() {
        // Zero sample rate must not produce NaN
        let mut param = SmoothedParam::with_config(0.0, 0.0, 10.0);
        param.set_target(2.0);
        let v = param.advance();
        assert!(v.is_finite());
        assert!((v - 2.0).abs() < 1e-6, "Should track instantly, got {v}");

        // Negative smoothing time likewise
        let mut param = SmoothedParam::with_config(0.0, 48000.0, -5.0);
        param.set_target(-1.0);
        assert!((param.advance() + 1.0).abs() < 1e-6);
    }

    #[test]
    fn snap_to_target_is_immediate() {
        let mut param = SmoothedParam::with_config(0.0, 48000.0, 100.0);
        param.set_target(0.7);
        param.advance();
        assert!(param.get() < 0.1, "100ms smoothing should still be far off");

        param.snap_to_target();
        assert_eq!(param.get(), 0.7);
        assert!(param.is_settled());
    }
}
