//! Tinge Effects - the tape emulation signal chain
//!
//! Builds the tape-colour processor out of the primitives in `tinge-core`:
//!
//! - [`WowEngine`] - LFO-modulated fractional delay simulating transport
//!   speed drift, phase-correlated across channels
//! - [`TapeSaturation`] - normalized tanh waveshaping with drive-dependent
//!   HF damping and gentle level trim
//! - [`ToneControl`] - tilt equalizer from complementary 250 Hz / 5 kHz
//!   shelves
//! - [`ResonantFilterPair`] - resonant low-cut and high-cut biquads with
//!   per-block coefficient updates
//! - [`TapeChain`] - the fixed-topology orchestrator tying it all together
//!   with per-sample parameter smoothing and block-level bypass
//! - [`TapeParams`] - the lock-free parameter surface shared with the
//!   control thread
//! - [`Gain`] - the standalone smoothed gain utility
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use tinge_effects::{TapeChain, TapeParam, TapeParams};
//!
//! let params = Arc::new(TapeParams::new());
//! let mut chain = TapeChain::new(Arc::clone(&params));
//! chain.prepare(48000.0, 512);
//!
//! // Control thread side:
//! params.set(TapeParam::Drive, 35.0);
//! params.set(TapeParam::Wow, 20.0);
//!
//! // Audio thread side:
//! let mut left = [0.0f32; 512];
//! let mut right = [0.0f32; 512];
//! chain.process_block(&mut [&mut left, &mut right]);
//! ```
//!
//! # Real-time guarantees
//!
//! `TapeChain::process_block` never allocates, never locks, and never
//! panics. Cross-thread parameter traffic goes exclusively through the
//! atomics in [`TapeParams`]; exponential smoothing inside the chain turns
//! those discontinuous writes into click-free control signals.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod chain;
pub mod filter_pair;
pub mod gain;
pub mod params;
pub mod saturation;
pub mod tone;
pub mod wow;

pub use chain::TapeChain;
pub use filter_pair::ResonantFilterPair;
pub use gain::Gain;
pub use params::{DESCRIPTORS, PARAM_COUNT, STRING_IDS, TapeParam, TapeParamSnapshot, TapeParams};
pub use saturation::TapeSaturation;
pub use tone::ToneControl;
pub use wow::WowEngine;
