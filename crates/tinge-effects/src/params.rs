//! Lock-free parameter surface for the tape chain.
//!
//! A control surface (GUI, automation) writes parameter targets from its own
//! thread; the audio thread reads them once per block. [`TapeParams`] stores
//! each value as an `AtomicU32` holding the f32 bit pattern, so the audio
//! thread can never observe a torn value — at worst it reads a target one
//! block stale. Out-of-range writes are clamped here, at the boundary where
//! values enter the system, so everything downstream can assume validated
//! ranges.
//!
//! No mutexes, condition variables, or queues: smoothing inside the chain
//! is what turns these discontinuous writes into artifact-free control
//! signals.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use tinge_core::{ParamDescriptor, ParamUnit};

/// Parameter indices into [`TapeParams`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum TapeParam {
    /// Wow depth in percent (0-100)
    Wow = 0,
    /// Saturation drive in percent (0-100)
    Drive = 1,
    /// Tilt tone in percent (-100 dark .. +100 bright)
    Tone = 2,
    /// Low-cut (high-pass) cutoff in Hz
    LowCutFreq = 3,
    /// Low-cut resonance (Q)
    LowCutQ = 4,
    /// High-cut (low-pass) cutoff in Hz
    HighCutFreq = 5,
    /// High-cut resonance (Q)
    HighCutQ = 6,
}

/// Number of continuous parameters (bypass is a separate flag).
pub const PARAM_COUNT: usize = 7;

/// Descriptor table, indexed by [`TapeParam`].
///
/// Doubles as the clamp source for writes and the display surface for the
/// CLI's parameter listing.
pub const DESCRIPTORS: [ParamDescriptor; PARAM_COUNT] = [
    ParamDescriptor {
        name: "Wow",
        short_name: "Wow",
        unit: ParamUnit::Percent,
        min: 0.0,
        max: 100.0,
        default: 0.0,
        step: 0.1,
    },
    ParamDescriptor {
        name: "Drive",
        short_name: "Drive",
        unit: ParamUnit::Percent,
        min: 0.0,
        max: 100.0,
        default: 0.0,
        step: 0.1,
    },
    ParamDescriptor {
        name: "Tone",
        short_name: "Tone",
        unit: ParamUnit::Percent,
        min: -100.0,
        max: 100.0,
        default: 0.0,
        step: 0.1,
    },
    ParamDescriptor {
        name: "Low Cut",
        short_name: "LowCut",
        unit: ParamUnit::Hertz,
        min: 20.0,
        max: 2000.0,
        default: 20.0,
        step: 1.0,
    },
    ParamDescriptor {
        name: "Low Cut Q",
        short_name: "LowCutQ",
        unit: ParamUnit::Ratio,
        min: 0.1,
        max: 10.0,
        default: 0.707,
        step: 0.01,
    },
    ParamDescriptor {
        name: "High Cut",
        short_name: "HighCut",
        unit: ParamUnit::Hertz,
        min: 1000.0,
        max: 20000.0,
        default: 20000.0,
        step: 1.0,
    },
    ParamDescriptor {
        name: "High Cut Q",
        short_name: "HighCutQ",
        unit: ParamUnit::Ratio,
        min: 0.1,
        max: 10.0,
        default: 0.707,
        step: 0.01,
    },
];

/// Stable string identifiers, indexed by [`TapeParam`].
pub const STRING_IDS: [&str; PARAM_COUNT] = [
    "wow",
    "drive",
    "tone",
    "lowCutFreq",
    "lowCutQ",
    "highCutFreq",
    "highCutQ",
];

/// Plain-value copy of every parameter, read once per block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapeParamSnapshot {
    /// Wow depth in percent
    pub wow: f32,
    /// Drive in percent
    pub drive: f32,
    /// Tone in percent
    pub tone: f32,
    /// Low-cut cutoff in Hz
    pub low_cut_freq: f32,
    /// Low-cut Q
    pub low_cut_q: f32,
    /// High-cut cutoff in Hz
    pub high_cut_freq: f32,
    /// High-cut Q
    pub high_cut_q: f32,
    /// Bypass flag
    pub bypass: bool,
}

/// Thread-safe parameter store for one tape chain instance.
///
/// Values live in atomics holding f32 bit patterns. The control surface
/// calls the setters; the audio thread calls [`snapshot`](Self::snapshot)
/// at block start.
#[derive(Debug)]
pub struct TapeParams {
    values: [AtomicU32; PARAM_COUNT],
    bypass: AtomicBool,
}

impl TapeParams {
    /// Create a store initialized to every descriptor's default.
    pub fn new() -> Self {
        Self {
            values: core::array::from_fn(|i| AtomicU32::new(DESCRIPTORS[i].default.to_bits())),
            bypass: AtomicBool::new(false),
        }
    }

    /// Write a parameter value, clamped to its descriptor range.
    ///
    /// Safe to call from any thread; the audio thread sees the new target
    /// at its next block boundary.
    pub fn set(&self, param: TapeParam, value: f32) {
        let index = param as usize;
        let clamped = DESCRIPTORS[index].clamp(value);
        self.values[index].store(clamped.to_bits(), Ordering::Release);
    }

    /// Read a parameter value.
    pub fn get(&self, param: TapeParam) -> f32 {
        f32::from_bits(self.values[param as usize].load(Ordering::Acquire))
    }

    /// Set the bypass flag.
    pub fn set_bypass(&self, bypassed: bool) {
        self.bypass.store(bypassed, Ordering::Release);
    }

    /// Read the bypass flag.
    pub fn bypassed(&self) -> bool {
        self.bypass.load(Ordering::Acquire)
    }

    /// Look up a parameter by its stable string identifier.
    pub fn param_by_string_id(id: &str) -> Option<TapeParam> {
        use TapeParam::{Drive, HighCutFreq, HighCutQ, LowCutFreq, LowCutQ, Tone, Wow};
        const ALL: [TapeParam; PARAM_COUNT] =
            [Wow, Drive, Tone, LowCutFreq, LowCutQ, HighCutFreq, HighCutQ];
        STRING_IDS
            .iter()
            .position(|&s| s == id)
            .map(|index| ALL[index])
    }

    /// Read all parameters at once. Called once per block by the chain.
    pub fn snapshot(&self) -> TapeParamSnapshot {
        TapeParamSnapshot {
            wow: self.get(TapeParam::Wow),
            drive: self.get(TapeParam::Drive),
            tone: self.get(TapeParam::Tone),
            low_cut_freq: self.get(TapeParam::LowCutFreq),
            low_cut_q: self.get(TapeParam::LowCutQ),
            high_cut_freq: self.get(TapeParam::HighCutFreq),
            high_cut_q: self.get(TapeParam::HighCutQ),
            bypass: self.bypassed(),
        }
    }

    /// Restore every parameter from a snapshot.
    ///
    /// The persistence layer stores nothing but parameter values, so a
    /// snapshot round-trip is a complete state save/restore.
    pub fn restore(&self, snapshot: &TapeParamSnapshot) {
        self.set(TapeParam::Wow, snapshot.wow);
        self.set(TapeParam::Drive, snapshot.drive);
        self.set(TapeParam::Tone, snapshot.tone);
        self.set(TapeParam::LowCutFreq, snapshot.low_cut_freq);
        self.set(TapeParam::LowCutQ, snapshot.low_cut_q);
        self.set(TapeParam::HighCutFreq, snapshot.high_cut_freq);
        self.set(TapeParam::HighCutQ, snapshot.high_cut_q);
        self.set_bypass(snapshot.bypass);
    }
}

impl Default for TapeParams {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_descriptors() {
        let params = TapeParams::new();
        assert_eq!(params.get(TapeParam::Wow), 0.0);
        assert_eq!(params.get(TapeParam::LowCutFreq), 20.0);
        assert_eq!(params.get(TapeParam::LowCutQ), 0.707);
        assert_eq!(params.get(TapeParam::HighCutFreq), 20000.0);
        assert!(!params.bypassed());
    }

    #[test]
    fn writes_are_clamped_at_the_boundary() {
        let params = TapeParams::new();

        params.set(TapeParam::Wow, 250.0);
        assert_eq!(params.get(TapeParam::Wow), 100.0);

        params.set(TapeParam::Tone, -500.0);
        assert_eq!(params.get(TapeParam::Tone), -100.0);

        params.set(TapeParam::LowCutFreq, 5.0);
        assert_eq!(params.get(TapeParam::LowCutFreq), 20.0);

        params.set(TapeParam::HighCutQ, 99.0);
        assert_eq!(params.get(TapeParam::HighCutQ), 10.0);
    }

    #[test]
    fn bypass_round_trip() {
        let params = TapeParams::new();
        params.set_bypass(true);
        assert!(params.bypassed());
        params.set_bypass(false);
        assert!(!params.bypassed());
    }

    #[test]
    fn string_id_lookup() {
        assert_eq!(
            TapeParams::param_by_string_id("wow"),
            Some(TapeParam::Wow)
        );
        assert_eq!(
            TapeParams::param_by_string_id("highCutFreq"),
            Some(TapeParam::HighCutFreq)
        );
        assert_eq!(TapeParams::param_by_string_id("nope"), None);
    }

    #[test]
    fn snapshot_restore_round_trip() {
        let params = TapeParams::new();
        params.set(TapeParam::Wow, 42.0);
        params.set(TapeParam::Drive, 77.0);
        params.set(TapeParam::Tone, -30.0);
        params.set(TapeParam::LowCutFreq, 120.0);
        params.set_bypass(true);

        let snapshot = params.snapshot();

        let restored = TapeParams::new();
        restored.restore(&snapshot);
        assert_eq!(restored.snapshot(), snapshot);
    }

    #[test]
    fn shared_across_threads() {
        use std::sync::Arc;

        let params = Arc::new(TapeParams::new());
        let writer = Arc::clone(&params);

        let handle = std::thread::spawn(move || {
            for i in 0..1000 {
                writer.set(TapeParam::Drive, (i % 101) as f32);
            }
        });

        // Reader never sees a torn or out-of-range value
        for _ in 0..1000 {
            let drive = params.get(TapeParam::Drive);
            assert!((0.0..=100.0).contains(&drive));
        }

        handle.join().unwrap();
    }
}
