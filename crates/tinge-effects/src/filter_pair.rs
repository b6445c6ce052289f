//! Resonant low-cut / high-cut filter pair.
//!
//! A second-order high-pass ("low cut") and low-pass ("high cut"), each
//! independently configurable by cutoff frequency and resonance. The chain
//! runs the low cut ahead of the saturation stage and the high cut after
//! the wow engine, both block-wise: coefficients are recomputed once per
//! block from the smoothed parameter values sampled at block start, then
//! the whole block runs through fixed coefficients.

use tinge_core::{Biquad, highpass_coefficients, lowpass_coefficients};

/// Defensive cutoff floor in Hz. Below a few tens of Hz the high-pass
/// coefficients degenerate toward an unstable pole pair at DC.
const MIN_CUTOFF_HZ: f32 = 16.0;

/// Resonance (Q) limits shared by both filters.
const MIN_Q: f32 = 0.1;
const MAX_Q: f32 = 10.0;

/// Number of channels with independent filter state.
const MAX_CHANNELS: usize = 2;

/// High-pass and low-pass biquad pair with per-channel state.
///
/// # Example
///
/// ```rust
/// use tinge_effects::ResonantFilterPair;
///
/// let mut filters = ResonantFilterPair::new(48000.0);
/// filters.set_low_cut(80.0, 0.707);
/// filters.set_high_cut(12000.0, 0.707);
///
/// let mut block = [0.1f32; 64];
/// filters.process_low_cut(0, &mut block);
/// filters.process_high_cut(0, &mut block);
/// ```
#[derive(Debug, Clone)]
pub struct ResonantFilterPair {
    low_cut: [Biquad; MAX_CHANNELS],
    high_cut: [Biquad; MAX_CHANNELS],
    sample_rate: f32,
}

impl ResonantFilterPair {
    /// Create the pair with wide-open defaults (20 Hz low cut, 20 kHz high
    /// cut, Butterworth Q).
    pub fn new(sample_rate: f32) -> Self {
        let mut pair = Self {
            low_cut: [Biquad::new(), Biquad::new()],
            high_cut: [Biquad::new(), Biquad::new()],
            sample_rate,
        };
        pair.set_low_cut(20.0, 0.707);
        pair.set_high_cut(20000.0, 0.707);
        pair
    }

    /// Clamp a cutoff into the stable range for this sample rate.
    fn clamp_cutoff(&self, freq: f32) -> f32 {
        freq.clamp(MIN_CUTOFF_HZ, self.sample_rate * 0.49)
    }

    /// Recompute the low-cut (high-pass) coefficients.
    ///
    /// Called once per block with the smoothed values sampled at block
    /// start. Both channels share coefficients; state stays per-channel.
    pub fn set_low_cut(&mut self, cutoff_hz: f32, q: f32) {
        let cutoff = self.clamp_cutoff(cutoff_hz);
        let q = q.clamp(MIN_Q, MAX_Q);
        let (b0, b1, b2, a0, a1, a2) = highpass_coefficients(cutoff, q, self.sample_rate);
        for biquad in &mut self.low_cut {
            biquad.set_coefficients(b0, b1, b2, a0, a1, a2);
        }
    }

    /// Recompute the high-cut (low-pass) coefficients.
    pub fn set_high_cut(&mut self, cutoff_hz: f32, q: f32) {
        let cutoff = self.clamp_cutoff(cutoff_hz);
        let q = q.clamp(MIN_Q, MAX_Q);
        let (b0, b1, b2, a0, a1, a2) = lowpass_coefficients(cutoff, q, self.sample_rate);
        for biquad in &mut self.high_cut {
            biquad.set_coefficients(b0, b1, b2, a0, a1, a2);
        }
    }

    /// Run one channel's block through the low-cut filter in place.
    #[inline]
    pub fn process_low_cut(&mut self, channel: usize, buffer: &mut [f32]) {
        if channel >= MAX_CHANNELS {
            return;
        }
        for sample in buffer.iter_mut() {
            *sample = self.low_cut[channel].process(*sample);
        }
    }

    /// Run one channel's block through the high-cut filter in place.
    #[inline]
    pub fn process_high_cut(&mut self, channel: usize, buffer: &mut [f32]) {
        if channel >= MAX_CHANNELS {
            return;
        }
        for sample in buffer.iter_mut() {
            *sample = self.high_cut[channel].process(*sample);
        }
    }

    /// Clear all filter history.
    ///
    /// Required whenever the stream is reprepared so no stale state is
    /// carried across a sample-rate change.
    pub fn reset(&mut self) {
        for biquad in &mut self.low_cut {
            biquad.clear();
        }
        for biquad in &mut self.high_cut {
            biquad.clear();
        }
    }

    /// Adopt a new sample rate and reset. Callers re-apply their cutoffs
    /// afterwards (the chain does this on every block anyway).
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.reset();
        self.set_low_cut(20.0, 0.707);
        self.set_high_cut(20000.0, 0.707);
    }
}

impl Default for ResonantFilterPair {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine_block(freq: f32, sample_rate: f32, len: usize, offset: usize) -> Vec<f32> {
        (0..len)
            .map(|i| libm::sinf(core::f32::consts::TAU * freq * (offset + i) as f32 / sample_rate))
            .collect()
    }

    fn rms(buffer: &[f32]) -> f32 {
        let sum: f32 = buffer.iter().map(|x| x * x).sum();
        libm::sqrtf(sum / buffer.len() as f32)
    }

    #[test]
    fn low_cut_removes_rumble() {
        let sample_rate = 48000.0;
        let mut filters = ResonantFilterPair::new(sample_rate);
        filters.set_low_cut(400.0, 0.707);

        // 30 Hz rumble, processed in 512-sample blocks like the chain does
        let mut last_rms = 0.0;
        for block_idx in 0..20 {
            let mut block = sine_block(30.0, sample_rate, 512, block_idx * 512);
            filters.process_low_cut(0, &mut block);
            last_rms = rms(&block);
        }

        assert!(
            last_rms < 0.05,
            "30 Hz should be well below a 400 Hz low cut, rms {last_rms}"
        );
    }

    #[test]
    fn high_cut_removes_hiss() {
        let sample_rate = 48000.0;
        let mut filters = ResonantFilterPair::new(sample_rate);
        filters.set_high_cut(2000.0, 0.707);

        let mut last_rms = 0.0;
        for block_idx in 0..20 {
            let mut block = sine_block(16000.0, sample_rate, 512, block_idx * 512);
            filters.process_high_cut(0, &mut block);
            last_rms = rms(&block);
        }

        assert!(
            last_rms < 0.05,
            "16 kHz should be well below a 2 kHz high cut, rms {last_rms}"
        );
    }

    #[test]
    fn passband_is_transparent() {
        let sample_rate = 48000.0;
        let mut filters = ResonantFilterPair::new(sample_rate);
        filters.set_low_cut(20.0, 0.707);
        filters.set_high_cut(20000.0, 0.707);

        let mut last_rms = 0.0;
        for block_idx in 0..20 {
            let mut block = sine_block(1000.0, sample_rate, 512, block_idx * 512);
            filters.process_low_cut(0, &mut block);
            filters.process_high_cut(0, &mut block);
            last_rms = rms(&block);
        }

        let expected = 1.0 / libm::sqrtf(2.0);
        assert!(
            (last_rms - expected).abs() < 0.02,
            "1 kHz should pass nearly untouched, rms {last_rms}"
        );
    }

    #[test]
    fn cutoff_clamped_to_safe_floor() {
        let mut filters = ResonantFilterPair::new(48000.0);
        // Degenerate requests must not produce NaN output
        filters.set_low_cut(0.0, 0.707);
        filters.set_high_cut(-100.0, 50.0);

        let mut block = vec![1.0f32; 512];
        filters.process_low_cut(0, &mut block);
        filters.process_high_cut(0, &mut block);
        for sample in &block {
            assert!(sample.is_finite());
        }
    }

    #[test]
    fn channels_have_independent_state() {
        let sample_rate = 48000.0;
        let mut filters = ResonantFilterPair::new(sample_rate);
        filters.set_low_cut(1000.0, 2.0);

        // Drive channel 0 hard, leave channel 1 silent
        let mut loud = vec![1.0f32; 256];
        filters.process_low_cut(0, &mut loud);

        let mut silent = vec![0.0f32; 256];
        filters.process_low_cut(1, &mut silent);
        for sample in &silent {
            assert_eq!(*sample, 0.0, "Channel 1 must not inherit channel 0 state");
        }
    }

    #[test]
    fn out_of_range_channel_is_ignored() {
        let mut filters = ResonantFilterPair::new(48000.0);
        let mut block = vec![0.5f32; 64];
        filters.process_low_cut(7, &mut block);
        assert!(block.iter().all(|&x| x == 0.5));
    }

    #[test]
    fn reset_clears_history() {
        let mut filters = ResonantFilterPair::new(48000.0);
        filters.set_low_cut(500.0, 5.0);

        let mut block = vec![1.0f32; 256];
        filters.process_low_cut(0, &mut block);
        filters.reset();

        let mut silence = vec![0.0f32; 256];
        filters.process_low_cut(0, &mut silence);
        for sample in &silence {
            assert_eq!(*sample, 0.0);
        }
    }
}
