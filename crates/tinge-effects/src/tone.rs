//! Tilt tone control built from complementary shelving filters.
//!
//! A single knob pivots the spectrum around two fixed shelf frequencies: a
//! low shelf at 250 Hz and a high shelf at 5 kHz. A positive (bright)
//! setting cuts the lows and boosts the highs by the same amount; a
//! negative (dark) setting does the reverse. The equal-and-opposite gains
//! are what make it a tilt rather than a pair of independent tone knobs.

use tinge_core::{Biquad, high_shelf_coefficients, low_shelf_coefficients};

/// Low shelf midpoint frequency in Hz.
const LOW_SHELF_HZ: f32 = 250.0;

/// High shelf midpoint frequency in Hz.
const HIGH_SHELF_HZ: f32 = 5000.0;

/// Shelf steepness.
const SHELF_Q: f32 = 0.707;

/// Maximum boost/cut at either end, in dB.
const MAX_GAIN_DB: f32 = 6.0;

/// Tone changes smaller than this don't trigger coefficient recomputation,
/// and a setting this close to neutral bypasses the stage entirely.
const TONE_EPSILON: f32 = 0.001;

/// Tilt equalizer: one knob, dark to bright.
///
/// # Example
///
/// ```rust
/// use tinge_effects::ToneControl;
///
/// let mut tone = ToneControl::new(48000.0);
/// tone.set_tone(75.0); // bright: cut lows, boost highs
/// let output = tone.process_sample(0.5);
/// ```
#[derive(Debug, Clone)]
pub struct ToneControl {
    low_shelf: Biquad,
    high_shelf: Biquad,
    /// Normalized tone in [-1, 1]
    current_tone: f32,
    sample_rate: f32,
}

impl ToneControl {
    /// Create a tone control at the neutral setting.
    pub fn new(sample_rate: f32) -> Self {
        let mut tone = Self {
            low_shelf: Biquad::new(),
            high_shelf: Biquad::new(),
            current_tone: 0.0,
            sample_rate,
        };
        tone.update_coefficients();
        tone
    }

    /// Set tone as a percentage (-100 dark .. +100 bright), clamped.
    ///
    /// Coefficients are only recomputed when the normalized value moves by
    /// more than a small epsilon, so calling this every sample with a
    /// smoothed value stays cheap once the smoother settles.
    pub fn set_tone(&mut self, tone_percent: f32) {
        let new_tone = tone_percent.clamp(-100.0, 100.0) / 100.0;

        if (new_tone - self.current_tone).abs() > TONE_EPSILON {
            self.current_tone = new_tone;
            self.update_coefficients();
        }
    }

    /// Current normalized tone in [-1, 1].
    pub fn tone(&self) -> f32 {
        self.current_tone
    }

    /// Process one sample through both shelves in series.
    #[inline]
    pub fn process_sample(&mut self, input: f32) -> f32 {
        if self.current_tone.abs() <= TONE_EPSILON {
            // Transparent at neutral: near-zero deviation guaranteed
            return input;
        }

        let after_low = self.low_shelf.process(input);
        self.high_shelf.process(after_low)
    }

    /// Clear both shelf filters' state.
    pub fn reset(&mut self) {
        self.low_shelf.clear();
        self.high_shelf.clear();
    }

    /// Update for a new sample rate. Clears state and recomputes shelves.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.reset();
        self.update_coefficients();
    }

    fn update_coefficients(&mut self) {
        let gain_db = self.current_tone * MAX_GAIN_DB;

        // Complementary gains: bright cuts lows and boosts highs, dark the
        // reverse
        let (b0, b1, b2, a0, a1, a2) =
            low_shelf_coefficients(LOW_SHELF_HZ, SHELF_Q, -gain_db, self.sample_rate);
        self.low_shelf.set_coefficients(b0, b1, b2, a0, a1, a2);

        let (b0, b1, b2, a0, a1, a2) =
            high_shelf_coefficients(HIGH_SHELF_HZ, SHELF_Q, gain_db, self.sample_rate);
        self.high_shelf.set_coefficients(b0, b1, b2, a0, a1, a2);
    }
}

impl Default for ToneControl {
    fn default() -> Self {
        Self::new(48000.0)
    }
}
