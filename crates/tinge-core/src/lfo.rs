//! Low-frequency sine oscillator for the wow engine.
//!
//! Tape wow is a slow (sub-1 Hz) cyclical pitch variation. The wow engine
//! drives every channel's delay line from a single shared [`Lfo`] so stereo
//! modulation stays phase-correlated rather than decaying into independent
//! per-channel flutter.

use core::f32::consts::TAU;
use libm::sinf;

/// Phase-accumulating sine oscillator.
///
/// Generates values at sub-audio rates; phase wraps in [0, 1) so long
/// sessions never lose precision to an unbounded phase accumulator.
///
/// # Example
///
/// ```rust
/// use tinge_core::Lfo;
///
/// let mut lfo = Lfo::new(48000.0, 0.5); // 0.5 Hz
/// let value = lfo.next();               // in [-1.0, 1.0]
/// ```
#[derive(Debug, Clone)]
pub struct Lfo {
    /// Current phase position [0.0, 1.0)
    phase: f32,
    /// Phase increment per sample
    phase_inc: f32,
    /// Sample rate in Hz
    sample_rate: f32,
}

impl Lfo {
    /// Create a new sine LFO with the given sample rate and frequency.
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        Self {
            phase: 0.0,
            phase_inc: freq_hz / sample_rate,
            sample_rate,
        }
    }

    /// Set frequency in Hz.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.phase_inc = freq_hz / self.sample_rate;
    }

    /// Get current frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.phase_inc * self.sample_rate
    }

    /// Reset phase to 0.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Get current phase (0.0 - 1.0).
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Get the next LFO value (-1.0 to 1.0), advancing one sample.
    #[inline]
    pub fn next(&mut self) -> f32 {
        let output = sinf(self.phase * TAU);

        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        output
    }

    /// Get the next value scaled to unipolar range (0.0 to 1.0).
    #[inline]
    pub fn next_unipolar(&mut self) -> f32 {
        (self.next() + 1.0) * 0.5
    }

    /// Update the sample rate, preserving the configured frequency.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        let freq = self.phase_inc * self.sample_rate;
        self.sample_rate = sample_rate;
        self.set_frequency(freq);
    }
}

impl Default for Lfo {
    fn default() -> Self {
        Self::new(48000.0, 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completes_one_cycle_per_second_at_1hz() {
        let mut lfo = Lfo::new(44100.0, 1.0);

        for _ in 0..44100 {
            lfo.next();
        }

        // Phase should be very close to 0 or 1 (wrapped around)
        let phase_error = lfo.phase.min((lfo.phase - 1.0).abs());
        assert!(phase_error < 0.01);
    }

    #[test]
    fn output_stays_in_range() {
        let mut lfo = Lfo::new(44100.0, 5.0);

        for _ in 0..10000 {
            let value = lfo.next();
            assert!((-1.0..=1.0).contains(&value), "Out of range: {value}");
        }
    }

    #[test]
    fn unipolar_stays_in_range() {
        let mut lfo = Lfo::new(44100.0, 5.0);

        for _ in 0..10000 {
            let value = lfo.next_unipolar();
            assert!((0.0..=1.0).contains(&value), "Out of range: {value}");
        }
    }

    #[test]
    fn sample_rate_change_preserves_frequency() {
        let mut lfo = Lfo::new(44100.0, 0.5);
        lfo.set_sample_rate(96000.0);
        assert!((lfo.frequency() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn reset_restarts_phase() {
        let mut lfo = Lfo::new(48000.0, 2.0);
        for _ in 0..1000 {
            lfo.next();
        }
        lfo.reset();
        assert_eq!(lfo.phase(), 0.0);
        // First sample after reset is sin(0) = 0
        assert!(lfo.next().abs() < 1e-6);
    }
}
