//! Tinge Core - DSP primitives for the tinge tape-colour engine
//!
//! This crate provides the foundational building blocks for the tape emulation
//! chain, designed for real-time audio processing with zero allocation in the
//! audio path.
//!
//! # Core Abstractions
//!
//! ## Effect System
//!
//! - [`Effect`] - Object-safe trait with the `prepare`-style sample-rate,
//!   process, and reset capability set
//!
//! ## Parameter Smoothing
//!
//! Zipper-free parameter changes for click-free automation:
//!
//! - [`SmoothedParam`] - Exponential smoothing (RC-like response)
//!
//! ## Filters
//!
//! - [`Biquad`] - Second-order IIR filter with RBJ cookbook coefficients,
//!   including low/high shelves for tilt-style tone controls
//! - [`OnePole`] - Single-pole lowpass for HF damping
//!
//! ## Delay Lines
//!
//! - [`InterpolatedDelay`] - Variable-length delay with fractional
//!   interpolated reads, the backbone of wow/pitch modulation
//!
//! ## Modulation
//!
//! - [`Lfo`] - Sine low-frequency oscillator with phase accumulation
//!
//! ## Utilities
//!
//! - Math functions: [`db_to_linear`], [`linear_to_db`], [`soft_clip`],
//!   [`flush_denormal`], [`sanitize`], etc.
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible for embedded audio applications.
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! tinge-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations in audio processing paths
//! - **No dependencies on std**: Pure `no_std` with `libm` for math
//! - **Silent self-correction**: configuration hazards (zero sample rate,
//!   non-positive smoothing time) default to safe values instead of failing

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod biquad;
pub mod delay;
pub mod effect;
pub mod lfo;
pub mod math;
pub mod one_pole;
pub mod param;
pub mod param_info;

// Re-export main types at crate root
pub use biquad::{
    Biquad, high_shelf_coefficients, highpass_coefficients, low_shelf_coefficients,
    lowpass_coefficients,
};
pub use delay::{Interpolation, InterpolatedDelay};
pub use effect::Effect;
pub use lfo::Lfo;
pub use math::{
    db_to_linear, flush_denormal, lerp, linear_to_db, ms_to_samples, samples_to_ms, sanitize,
    soft_clip,
};
pub use one_pole::OnePole;
pub use param::SmoothedParam;
pub use param_info::{ParamDescriptor, ParamUnit, ParameterInfo};
