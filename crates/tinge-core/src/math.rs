//! Mathematical utility functions for DSP.
//!
//! Provides common DSP math operations optimized for real-time audio
//! processing. All functions are allocation-free and suitable for `no_std`.
//!
//! # Level Conversions
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear gain
//!
//! # Numerical Safety
//!
//! - [`flush_denormal`] - Replace subnormal-range values with zero
//! - [`sanitize`] - Replace NaN/infinite values with zero, flush denormals
//!
//! The tape chain calls [`sanitize`] on every sample it writes back to the
//! host buffer, so accumulated filter error can never reach the output.

use libm::{expf, logf, tanhf};

/// Convert decibels to linear gain.
///
/// # Example
/// ```rust
/// use tinge_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// The input is floored at 1e-10 so silence maps to -200 dB instead of -inf.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    // 20 * log10(linear) = 20 * ln(linear) / ln(10)
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Soft clip using hyperbolic tangent.
///
/// Smooth saturation that approaches ±1 asymptotically, producing primarily
/// odd harmonics. The tape saturation stage builds on this with drive-gain
/// normalization.
#[inline]
pub fn soft_clip(x: f32) -> f32 {
    tanhf(x)
}

/// Linear interpolation between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Convert milliseconds to samples.
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> f32 {
    ms * sample_rate / 1000.0
}

/// Convert samples to milliseconds.
#[inline]
pub fn samples_to_ms(samples: f32, sample_rate: f32) -> f32 {
    samples * 1000.0 / sample_rate
}

/// Flush subnormal (denormalized) floats to zero.
///
/// Subnormal floats (~1e-38 to 1e-45) cause severe CPU performance
/// degradation on most architectures. This function replaces values below
/// 1e-20 with zero, providing margin before the IEEE 754 subnormal range
/// begins.
///
/// Use this in feedback loops (one-pole dampers, biquads, delay lines)
/// where signal can decay indefinitely toward zero.
///
/// Reference: IEEE 754-2008, Section 3.4 (Subnormal numbers)
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Sanitize a sample before it leaves a processing stage.
///
/// NaN and infinite values become zero; subnormal-range values are flushed.
/// A real-time audio path has no error channel, so numerical hazards are
/// neutralized in place rather than propagated.
#[inline]
pub fn sanitize(x: f32) -> f32 {
    if x.is_finite() { flush_denormal(x) } else { 0.0 }
}
