//! Tape saturation: normalized tanh waveshaping with drive-dependent damping.
//!
//! Models magnetic-tape compression: a soft nonlinearity whose knee hardens
//! with drive, the medium's self-erasure of high frequencies under heavier
//! saturation, and a gentle output trim so the stage's level does not grow
//! unbounded across the drive range.
//!
//! The nonlinearity is normalized by its value at the drive gain itself,
//! `tanh(x * g) / tanh(g)`, so at vanishingly small input levels the stage
//! still yields a linear gain of `g`. Without that normalization the
//! perceived loudness jumps discontinuously as drive changes.

use tinge_core::{OnePole, sanitize, soft_clip};

/// Drive gain span: 0% maps to 1x, 100% maps to 10x.
const DRIVE_GAIN_SPAN: f32 = 9.0;

/// Damping coefficient at zero drive.
const HF_ROLLOFF_BASE: f32 = 0.9;

/// Additional damping coefficient at full drive.
const HF_ROLLOFF_SPAN: f32 = 0.08;

/// Output trim removed at full drive.
const LEVEL_TRIM_SPAN: f32 = 0.05;

/// Drive below this is treated as "off" and bypassed entirely.
const DRIVE_EPSILON: f32 = 0.001;

/// Soft tape-style saturation stage.
///
/// # Example
///
/// ```rust
/// use tinge_effects::TapeSaturation;
///
/// let mut tape = TapeSaturation::new();
/// tape.set_drive(60.0);
/// let output = tape.process_sample(0.5);
/// ```
#[derive(Debug, Clone)]
pub struct TapeSaturation {
    /// Normalized drive in [0, 1]
    drive: f32,
    /// HF damping filter, coefficient tracks drive
    rolloff: OnePole,
}

impl TapeSaturation {
    /// Create a saturation stage at zero drive (transparent).
    pub fn new() -> Self {
        Self {
            drive: 0.0,
            rolloff: OnePole::from_coefficient(HF_ROLLOFF_BASE),
        }
    }

    /// Set drive as a percentage (0-100), clamped.
    ///
    /// Also retunes the damping filter: more drive means a higher damping
    /// coefficient, i.e. darker highs.
    pub fn set_drive(&mut self, drive_percent: f32) {
        self.drive = drive_percent.clamp(0.0, 100.0) / 100.0;
        self.rolloff
            .set_coefficient(HF_ROLLOFF_BASE + HF_ROLLOFF_SPAN * self.drive);
    }

    /// Current normalized drive in [0, 1].
    pub fn drive(&self) -> f32 {
        self.drive
    }

    /// Linear gain applied ahead of the nonlinearity for the current drive.
    #[inline]
    pub fn drive_gain(&self) -> f32 {
        1.0 + self.drive * DRIVE_GAIN_SPAN
    }

    /// Process one sample.
    #[inline]
    pub fn process_sample(&mut self, input: f32) -> f32 {
        if self.drive <= DRIVE_EPSILON {
            return input;
        }

        // Neutralize incoming hazards before they reach the damper's state
        let input = sanitize(input);
        let gain = self.drive_gain();

        // Normalized soft clip: low-level gain equals the drive gain
        let saturated = soft_clip(input * gain) / soft_clip(gain);

        // Drive-dependent HF self-erasure
        let damped = self.rolloff.process(saturated);

        // Gentle level trim as drive rises
        let trimmed = damped * (1.0 - self.drive * LEVEL_TRIM_SPAN);

        sanitize(trimmed)
    }

    /// Zero the damping filter state.
    pub fn reset(&mut self) {
        self.rolloff.reset();
    }
}

impl Default for TapeSaturation {
    fn default() -> Self {
        Self::new()
    }
}
