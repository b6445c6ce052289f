//! Fixed-topology tape emulation chain.
//!
//! Wires the stages into the canonical order:
//!
//! ```text
//! input -> low cut (block) -> [saturation -> tone -> wow] (per sample)
//!       -> high cut (block) -> output
//! ```
//!
//! The chain owns one exponential smoother per continuous parameter and
//! pulls targets from a shared [`TapeParams`] store once per block. Every
//! smoother advances once per processed sample, so automation follows with
//! sample accuracy and never steps audibly; the resonant filters alone
//! amortize their coefficient updates to once per block, using the smoothed
//! values sampled at block start.
//!
//! Processing never allocates, never locks, and never panics. Bypass is
//! checked once per block and leaves the buffer untouched.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::sync::Arc;

use crate::{ResonantFilterPair, TapeParams, TapeSaturation, ToneControl, WowEngine};
use tinge_core::{SmoothedParam, sanitize};

/// Modulation-depth parameters get the slowest smoothing: wow depth changes
/// push the delay-line length around, so a fast ramp would itself sound
/// like pitch wobble.
const WOW_SMOOTHING_MS: f32 = 100.0;

/// Filter cutoff and resonance smoothing.
const FILTER_SMOOTHING_MS: f32 = 50.0;

/// Drive and tone respond audibly faster, so they track more tightly.
const DRIVE_TONE_SMOOTHING_MS: f32 = 20.0;

/// Channels the chain processes (stereo).
const MAX_CHANNELS: usize = 2;

/// The complete tape emulation signal chain for one plugin instance.
///
/// Each instance owns its entire DSP state exclusively; nothing is shared
/// between concurrently-running instances except the parameter store the
/// caller chooses to hand in.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use tinge_effects::{TapeChain, TapeParam, TapeParams};
///
/// let params = Arc::new(TapeParams::new());
/// let mut chain = TapeChain::new(Arc::clone(&params));
/// chain.prepare(48000.0, 512);
///
/// params.set(TapeParam::Drive, 40.0);
///
/// let mut left = [0.1f32; 512];
/// let mut right = [0.1f32; 512];
/// chain.process_block(&mut [&mut left, &mut right]);
/// ```
pub struct TapeChain {
    params: Arc<TapeParams>,

    wow: WowEngine,
    saturation: [TapeSaturation; MAX_CHANNELS],
    tone: [ToneControl; MAX_CHANNELS],
    filters: ResonantFilterPair,

    wow_smoother: SmoothedParam,
    drive_smoother: SmoothedParam,
    tone_smoother: SmoothedParam,
    low_cut_freq_smoother: SmoothedParam,
    low_cut_q_smoother: SmoothedParam,
    high_cut_freq_smoother: SmoothedParam,
    high_cut_q_smoother: SmoothedParam,

    sample_rate: f32,
    max_block_size: usize,
}

impl TapeChain {
    /// Create a chain bound to a parameter store.
    ///
    /// The chain is usable immediately at 48 kHz defaults, but hosts call
    /// [`prepare`](Self::prepare) with the real stream configuration before
    /// processing.
    pub fn new(params: Arc<TapeParams>) -> Self {
        let sample_rate = 48000.0;
        let snapshot = params.snapshot();

        Self {
            wow: WowEngine::new(sample_rate),
            saturation: [TapeSaturation::new(), TapeSaturation::new()],
            tone: [ToneControl::new(sample_rate), ToneControl::new(sample_rate)],
            filters: ResonantFilterPair::new(sample_rate),

            wow_smoother: SmoothedParam::with_config(snapshot.wow, sample_rate, WOW_SMOOTHING_MS),
            drive_smoother: SmoothedParam::with_config(
                snapshot.drive,
                sample_rate,
                DRIVE_TONE_SMOOTHING_MS,
            ),
            tone_smoother: SmoothedParam::with_config(
                snapshot.tone,
                sample_rate,
                DRIVE_TONE_SMOOTHING_MS,
            ),
            low_cut_freq_smoother: SmoothedParam::with_config(
                snapshot.low_cut_freq,
                sample_rate,
                FILTER_SMOOTHING_MS,
            ),
            low_cut_q_smoother: SmoothedParam::with_config(
                snapshot.low_cut_q,
                sample_rate,
                FILTER_SMOOTHING_MS,
            ),
            high_cut_freq_smoother: SmoothedParam::with_config(
                snapshot.high_cut_freq,
                sample_rate,
                FILTER_SMOOTHING_MS,
            ),
            high_cut_q_smoother: SmoothedParam::with_config(
                snapshot.high_cut_q,
                sample_rate,
                FILTER_SMOOTHING_MS,
            ),

            params,
            sample_rate,
            max_block_size: 512,
        }
    }

    /// The parameter store this chain reads from.
    pub fn params(&self) -> &Arc<TapeParams> {
        &self.params
    }

    /// Configured sample rate.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Maximum block size declared at prepare time.
    pub fn max_block_size(&self) -> usize {
        self.max_block_size
    }

    /// Prepare for a stream: size buffers, retune smoothers, clear state.
    ///
    /// This is the only place the chain allocates. A prepare call is a full
    /// reset point; smoothers snap to the current parameter targets so
    /// playback doesn't fade in from a stale pre-roll value.
    pub fn prepare(&mut self, sample_rate: f32, max_block_size: usize) {
        // Guard against degenerate host configs; smoothers and filters
        // self-correct, the wow delay just needs a positive rate.
        let sample_rate = if sample_rate > 0.0 { sample_rate } else { 48000.0 };
        self.sample_rate = sample_rate;
        self.max_block_size = max_block_size.max(1);

        self.wow.set_sample_rate(sample_rate);
        for tone in &mut self.tone {
            tone.set_sample_rate(sample_rate);
        }
        self.filters.set_sample_rate(sample_rate);

        let snapshot = self.params.snapshot();

        self.wow_smoother.set_sample_rate(sample_rate);
        self.wow_smoother.set_smoothing_time_ms(WOW_SMOOTHING_MS);
        self.wow_smoother.set_immediate(snapshot.wow);

        self.drive_smoother.set_sample_rate(sample_rate);
        self.drive_smoother
            .set_smoothing_time_ms(DRIVE_TONE_SMOOTHING_MS);
        self.drive_smoother.set_immediate(snapshot.drive);

        self.tone_smoother.set_sample_rate(sample_rate);
        self.tone_smoother
            .set_smoothing_time_ms(DRIVE_TONE_SMOOTHING_MS);
        self.tone_smoother.set_immediate(snapshot.tone);

        self.low_cut_freq_smoother.set_sample_rate(sample_rate);
        self.low_cut_freq_smoother
            .set_smoothing_time_ms(FILTER_SMOOTHING_MS);
        self.low_cut_freq_smoother
            .set_immediate(snapshot.low_cut_freq);

        self.low_cut_q_smoother.set_sample_rate(sample_rate);
        self.low_cut_q_smoother
            .set_smoothing_time_ms(FILTER_SMOOTHING_MS);
        self.low_cut_q_smoother.set_immediate(snapshot.low_cut_q);

        self.high_cut_freq_smoother.set_sample_rate(sample_rate);
        self.high_cut_freq_smoother
            .set_smoothing_time_ms(FILTER_SMOOTHING_MS);
        self.high_cut_freq_smoother
            .set_immediate(snapshot.high_cut_freq);

        self.high_cut_q_smoother.set_sample_rate(sample_rate);
        self.high_cut_q_smoother
            .set_smoothing_time_ms(FILTER_SMOOTHING_MS);
        self.high_cut_q_smoother.set_immediate(snapshot.high_cut_q);

        self.reset();

        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, max_block_size, "tape chain prepared");
    }

    /// Reset all DSP state to quiescence without touching parameters.
    pub fn reset(&mut self) {
        self.wow.reset();
        for saturation in &mut self.saturation {
            saturation.reset();
        }
        for tone in &mut self.tone {
            tone.reset();
        }
        self.filters.reset();

        self.wow_smoother.snap_to_target();
        self.drive_smoother.snap_to_target();
        self.tone_smoother.snap_to_target();
        self.low_cut_freq_smoother.snap_to_target();
        self.low_cut_q_smoother.snap_to_target();
        self.high_cut_freq_smoother.snap_to_target();
        self.high_cut_q_smoother.snap_to_target();
    }

    /// Process a planar block in place.
    ///
    /// Accepts up to two channel slices; extra channels pass through
    /// untouched. All slices must have equal length (the frame count),
    /// which may be anything up to the prepared maximum.
    pub fn process_block(&mut self, channels: &mut [&mut [f32]]) {
        let snapshot = self.params.snapshot();

        if snapshot.bypass {
            // Bit-for-bit transparent: the buffer is untouched.
            return;
        }

        // Pull the latest targets; at worst one block stale.
        self.wow_smoother.set_target(snapshot.wow);
        self.drive_smoother.set_target(snapshot.drive);
        self.tone_smoother.set_target(snapshot.tone);
        self.low_cut_freq_smoother.set_target(snapshot.low_cut_freq);
        self.low_cut_q_smoother.set_target(snapshot.low_cut_q);
        self.high_cut_freq_smoother
            .set_target(snapshot.high_cut_freq);
        self.high_cut_q_smoother.set_target(snapshot.high_cut_q);

        // Filter coefficients: once per block, from the smoothed values as
        // they stand at block start.
        self.filters
            .set_low_cut(self.low_cut_freq_smoother.get(), self.low_cut_q_smoother.get());
        self.filters.set_high_cut(
            self.high_cut_freq_smoother.get(),
            self.high_cut_q_smoother.get(),
        );

        let active_channels = channels.len().min(MAX_CHANNELS);
        let frames = channels.iter().map(|c| c.len()).min().unwrap_or(0);

        // Stage 1: low cut, block-wise per channel
        for ch in 0..active_channels {
            self.filters.process_low_cut(ch, &mut channels[ch][..frames]);
        }

        // Stage 2: saturation -> tone -> wow, sample by sample so the
        // smoothers track with sample accuracy
        for frame in 0..frames {
            let wow_depth = self.wow_smoother.advance();
            let drive = self.drive_smoother.advance();
            let tone = self.tone_smoother.advance();
            self.low_cut_freq_smoother.advance();
            self.low_cut_q_smoother.advance();
            self.high_cut_freq_smoother.advance();
            self.high_cut_q_smoother.advance();

            self.wow.set_depth(wow_depth);

            for ch in 0..active_channels {
                self.saturation[ch].set_drive(drive);
                self.tone[ch].set_tone(tone);

                let mut sample = channels[ch][frame];
                sample = self.saturation[ch].process_sample(sample);
                sample = self.tone[ch].process_sample(sample);
                sample = self.wow.process(sample, ch);
                channels[ch][frame] = sanitize(sample);
            }
        }

        // Stage 3: high cut, block-wise per channel, then a final sanitize
        // so nothing non-finite or denormal ever reaches the host buffer
        for ch in 0..active_channels {
            self.filters
                .process_high_cut(ch, &mut channels[ch][..frames]);
            for sample in &mut channels[ch][..frames] {
                *sample = sanitize(*sample);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TapeParam;

    fn make_chain() -> (Arc<TapeParams>, TapeChain) {
        let params = Arc::new(TapeParams::new());
        let mut chain = TapeChain::new(Arc::clone(&params));
        chain.prepare(48000.0, 512);
        (params, chain)
    }

    fn sine(freq: f32, sample_rate: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| libm::sinf(core::f32::consts::TAU * freq * i as f32 / sample_rate))
            .collect()
    }

    #[test]
    fn bypass_is_bit_transparent() {
        let (params, mut chain) = make_chain();
        params.set(TapeParam::Drive, 80.0);
        params.set(TapeParam::Wow, 50.0);
        params.set_bypass(true);

        let original = sine(440.0, 48000.0, 512);
        let mut left = original.clone();
        let mut right = original.clone();
        chain.process_block(&mut [&mut left, &mut right]);

        assert_eq!(left, original);
        assert_eq!(right, original);
    }

    #[test]
    fn neutral_settings_are_nearly_transparent() {
        let (_params, mut chain) = make_chain();

        // Defaults: wow 0, drive 0, tone 0, filters wide open. Only the
        // wide-open cut filters touch the signal, and barely.
        let original = sine(1000.0, 48000.0, 4096);
        let mut buffer = original.clone();

        for block in buffer.chunks_mut(512) {
            chain.process_block(&mut [block]);
        }

        // Compare steady-state RMS, skipping the filter settle
        let in_rms: f32 = original[2048..].iter().map(|x| x * x).sum::<f32>();
        let out_rms: f32 = buffer[2048..].iter().map(|x| x * x).sum::<f32>();
        let gain_db = 10.0 * libm::log10f(out_rms / in_rms);
        assert!(
            gain_db.abs() < 0.1,
            "Neutral chain should be ~transparent, got {gain_db} dB"
        );
    }

    #[test]
    fn no_nan_across_parameter_grid() {
        let signals: [Vec<f32>; 4] = [
            vec![0.0; 1024],                  // silence
            vec![0.5; 1024],                  // DC
            sine(18000.0, 48000.0, 1024),     // near-Nyquist
            sine(100.0, 48000.0, 1024),       // audible
        ];

        for wow in [0.0, 50.0, 100.0] {
            for drive in [0.0, 50.0, 100.0] {
                for tone in [-100.0, 0.0, 100.0] {
                    for signal in &signals {
                        let (params, mut chain) = make_chain();
                        params.set(TapeParam::Wow, wow);
                        params.set(TapeParam::Drive, drive);
                        params.set(TapeParam::Tone, tone);
                        params.set(TapeParam::LowCutFreq, 200.0);
                        params.set(TapeParam::LowCutQ, 10.0);
                        params.set(TapeParam::HighCutFreq, 5000.0);
                        params.set(TapeParam::HighCutQ, 10.0);

                        let mut left = signal.clone();
                        let mut right = signal.clone();
                        for offset in (0..signal.len()).step_by(512) {
                            let end = (offset + 512).min(signal.len());
                            chain.process_block(&mut [
                                &mut left[offset..end],
                                &mut right[offset..end],
                            ]);
                        }

                        for &sample in left.iter().chain(right.iter()) {
                            assert!(
                                sample.is_finite(),
                                "Non-finite output: wow {wow}, drive {drive}, tone {tone}"
                            );
                            assert!(
                                sample == 0.0 || sample.abs() >= 1e-20,
                                "Denormal leaked: wow {wow}, drive {drive}, tone {tone}"
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn impulse_lands_inside_wow_delay_window() {
        // Spec scenario: 48 kHz / 512, wow 100%, everything else neutral,
        // impulse at sample 1000 in a 4096-sample buffer.
        let (params, mut chain) = make_chain();
        params.set(TapeParam::Wow, 100.0);
        chain.prepare(48000.0, 512); // snap the wow smoother to 100%

        let mut buffer = vec![0.0f32; 4096];
        buffer[1000] = 1.0;

        for offset in (0..4096).step_by(512) {
            chain.process_block(&mut [&mut buffer[offset..offset + 512]]);
        }

        let peak = buffer
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.abs().partial_cmp(&b.1.abs()).unwrap())
            .map(|(i, _)| i)
            .unwrap();

        let min_pos = 1000 + (0.005f32 * 48000.0).round() as usize;
        let max_pos = 1000 + (0.050f32 * 48000.0).round() as usize;
        assert!(
            (min_pos..=max_pos).contains(&peak),
            "Peak at {peak}, expected within [{min_pos}, {max_pos}]"
        );
    }

    #[test]
    fn save_restore_produces_identical_output() {
        let (params, mut chain) = make_chain();
        params.set(TapeParam::Wow, 35.0);
        params.set(TapeParam::Drive, 60.0);
        params.set(TapeParam::Tone, 25.0);
        params.set(TapeParam::LowCutFreq, 90.0);
        params.set(TapeParam::HighCutFreq, 14000.0);
        chain.prepare(48000.0, 512);

        let saved = params.snapshot();

        // Fresh instance restored from the snapshot
        let restored_params = Arc::new(TapeParams::new());
        restored_params.restore(&saved);
        let mut restored_chain = TapeChain::new(Arc::clone(&restored_params));
        restored_chain.prepare(48000.0, 512);

        let input = sine(330.0, 48000.0, 2048);
        let mut a = input.clone();
        let mut b = input;
        for offset in (0..2048).step_by(512) {
            chain.process_block(&mut [&mut a[offset..offset + 512]]);
            restored_chain.process_block(&mut [&mut b[offset..offset + 512]]);
        }

        for (x, y) in a.iter().zip(b.iter()) {
            assert!(
                (x - y).abs() < 1e-6,
                "Restored instance must match: {x} vs {y}"
            );
        }
    }

    #[test]
    fn instances_do_not_cross_talk() {
        let input = sine(440.0, 48000.0, 2048);

        // Reference: a neutral chain run on its own
        let (_params_ref, mut reference) = make_chain();
        let mut expected = input.clone();
        for offset in (0..2048).step_by(512) {
            reference.process_block(&mut [&mut expected[offset..offset + 512]]);
        }

        // The same neutral chain, now interleaved with a cranked instance
        let (params_a, mut chain_a) = make_chain();
        params_a.set(TapeParam::Drive, 100.0);
        params_a.set(TapeParam::Wow, 100.0);
        let (_params_b, mut chain_b) = make_chain();

        let mut loud = input.clone();
        let mut clean = input;
        for offset in (0..2048).step_by(512) {
            chain_a.process_block(&mut [&mut loud[offset..offset + 512]]);
            chain_b.process_block(&mut [&mut clean[offset..offset + 512]]);
        }

        // Chain B never saw chain A's settings or state
        assert_eq!(clean, expected, "Interleaving instances must not interact");
        assert!(
            loud.iter().zip(clean.iter()).any(|(a, b)| (a - b).abs() > 0.01),
            "The cranked instance should sound different"
        );
    }

    #[test]
    fn short_and_uneven_blocks_are_fine() {
        let (params, mut chain) = make_chain();
        params.set(TapeParam::Drive, 50.0);
        params.set(TapeParam::Wow, 50.0);

        let mut buffer = sine(440.0, 48000.0, 1000);
        let mut offset = 0;
        for block_len in [1, 7, 64, 128, 300, 500] {
            let end = (offset + block_len).min(buffer.len());
            chain.process_block(&mut [&mut buffer[offset..end]]);
            offset = end;
        }

        for &sample in &buffer {
            assert!(sample.is_finite());
        }
    }
}
