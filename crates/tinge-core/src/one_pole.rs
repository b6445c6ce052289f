//! One-pole lowpass filter for HF damping.
//!
//! A single-pole IIR lowpass with the difference equation:
//!
//! ```text
//! y[n] = x[n] + coeff * (y[n-1] - x[n])
//!      = (1 - coeff) * x[n] + coeff * y[n-1]
//! ```
//!
//! The saturation stage uses this in coefficient space: tape self-erases
//! high frequencies harder as the signal drives the medium deeper, so its
//! damping coefficient rises with drive instead of being derived from a
//! fixed cutoff frequency. The cutoff-based constructor serves the cases
//! where a frequency is the natural parameter.
//!
//! DC gain is exactly 1 for any coefficient in [0, 1), so the filter never
//! changes steady-state levels.
//!
//! # Reference
//!
//! Julius O. Smith III, "Introduction to Digital Filters with Audio
//! Applications", Section: One-Pole Filter.

use crate::flush_denormal;
use libm::expf;

/// One-pole (6 dB/oct) lowpass filter.
///
/// # Invariants
///
/// - `coeff` is always in [0, 1) for stable operation
/// - `state` is flushed to zero when below 1e-20 (denormal protection)
#[derive(Debug, Clone)]
pub struct OnePole {
    state: f32,
    coeff: f32,
}

impl OnePole {
    /// Create a one-pole lowpass from a cutoff frequency.
    ///
    /// `coeff = exp(-2π * freq / sample_rate)`; higher cutoff means a lower
    /// coefficient and less filtering.
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        Self {
            state: 0.0,
            coeff: expf(-core::f32::consts::TAU * freq_hz / sample_rate),
        }
    }

    /// Create a one-pole lowpass directly from its feedback coefficient.
    ///
    /// The coefficient is clamped to [0, 0.9999]; 0 is a bypass, values
    /// approaching 1 filter ever more heavily.
    pub fn from_coefficient(coeff: f32) -> Self {
        Self {
            state: 0.0,
            coeff: coeff.clamp(0.0, 0.9999),
        }
    }

    /// Set the feedback coefficient directly (clamped to [0, 0.9999]).
    #[inline]
    pub fn set_coefficient(&mut self, coeff: f32) {
        self.coeff = coeff.clamp(0.0, 0.9999);
    }

    /// Current feedback coefficient.
    #[inline]
    pub fn coefficient(&self) -> f32 {
        self.coeff
    }

    /// Process one sample through the lowpass filter.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        // y[n] = x[n] + coeff * (y[n-1] - x[n])
        self.state = flush_denormal(input + self.coeff * (self.state - input));
        self.state
    }

    /// Reset filter state to zero.
    pub fn reset(&mut self) {
        self.state = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_dc() {
        let mut lp = OnePole::new(48000.0, 1000.0);
        let mut out = 0.0;
        for _ in 0..48000 {
            out = lp.process(1.0);
        }
        assert!((out - 1.0).abs() < 1e-3, "DC gain must be unity, got {out}");
    }

    #[test]
    fn coefficient_dc_gain_is_unity() {
        // Same property in coefficient space, the form the saturator uses
        let mut lp = OnePole::from_coefficient(0.98);
        let mut out = 0.0;
        for _ in 0..100000 {
            out = lp.process(0.5);
        }
        assert!((out - 0.5).abs() < 1e-3, "DC gain must be unity, got {out}");
    }

    #[test]
    fn attenuates_above_cutoff() {
        let mut lp = OnePole::new(48000.0, 500.0);
        let mut sum = 0.0;
        let n = 4800;
        for i in 0..n {
            let x = libm::sinf(core::f32::consts::TAU * 10000.0 * i as f32 / 48000.0);
            sum += lp.process(x).abs();
        }
        let avg = sum / n as f32;
        assert!(avg < 0.1, "10 kHz should be well attenuated, avg {avg}");
    }

    #[test]
    fn higher_coefficient_filters_harder() {
        let mut gentle = OnePole::from_coefficient(0.9);
        let mut heavy = OnePole::from_coefficient(0.98);

        let mut gentle_sum = 0.0;
        let mut heavy_sum = 0.0;
        let n = 4800;
        for i in 0..n {
            let x = libm::sinf(core::f32::consts::TAU * 5000.0 * i as f32 / 48000.0);
            gentle_sum += gentle.process(x).abs();
            heavy_sum += heavy.process(x).abs();
        }
        assert!(
            heavy_sum < gentle_sum,
            "Higher coefficient must damp more: {heavy_sum} vs {gentle_sum}"
        );
    }

    #[test]
    fn coefficient_clamped() {
        let lp = OnePole::from_coefficient(1.5);
        assert!(lp.coefficient() < 1.0);
        let lp = OnePole::from_coefficient(-0.5);
        assert_eq!(lp.coefficient(), 0.0);
    }

    #[test]
    fn reset_clears_state() {
        let mut lp = OnePole::new(48000.0, 1000.0);
        for _ in 0..100 {
            lp.process(1.0);
        }
        lp.reset();
        assert_eq!(lp.process(0.0), 0.0);
    }
}
