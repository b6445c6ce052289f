//! Smoothed gain utility.
//!
//! The simplest member of the effect family: a single dB-valued gain with
//! exponential smoothing so level changes never click. Doubles as the
//! reference implementation of the [`Effect`] + [`ParameterInfo`] pair.

use tinge_core::{
    Effect, ParamDescriptor, ParamUnit, ParameterInfo, SmoothedParam, db_to_linear, linear_to_db,
};

/// Gain range in dB.
const MIN_GAIN_DB: f32 = -20.0;
const MAX_GAIN_DB: f32 = 20.0;

/// Smoothed gain stage.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Gain | -20.0–20.0 dB | 0.0 |
///
/// # Example
///
/// ```rust
/// use tinge_effects::Gain;
/// use tinge_core::Effect;
///
/// let mut gain = Gain::new(48000.0);
/// gain.set_gain_db(-6.0);
/// let output = gain.process(0.5);
/// ```
#[derive(Debug, Clone)]
pub struct Gain {
    /// Linear gain with smoothing
    level: SmoothedParam,
}

impl Gain {
    /// Create a unity-gain stage.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            level: SmoothedParam::standard(1.0, sample_rate),
        }
    }

    /// Set gain in dB, clamped to [-20, +20].
    pub fn set_gain_db(&mut self, db: f32) {
        self.level
            .set_target(db_to_linear(db.clamp(MIN_GAIN_DB, MAX_GAIN_DB)));
    }

    /// Current gain target in dB.
    pub fn gain_db(&self) -> f32 {
        linear_to_db(self.level.target())
    }
}

impl Default for Gain {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl Effect for Gain {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        input * self.level.advance()
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.level.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.level.snap_to_target();
    }
}

impl ParameterInfo for Gain {
    fn param_count(&self) -> usize {
        1
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(ParamDescriptor {
                name: "Gain",
                short_name: "Gain",
                unit: ParamUnit::Decibels,
                min: MIN_GAIN_DB,
                max: MAX_GAIN_DB,
                default: 0.0,
                step: 0.5,
            }),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.gain_db(),
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        if index == 0 {
            self.set_gain_db(value);
        }
    }
}
