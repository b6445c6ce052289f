//! Tinge IO - offline audio file I/O.
//!
//! WAV reading and writing for the CLI's offline render path. Real-time
//! device streaming is deliberately out of scope; the processing core only
//! ever sees plain `f32` buffers.

pub mod wav;

pub use wav::{
    StereoSamples, WavFormat, WavInfo, WavSpec, read_wav, read_wav_info, read_wav_stereo,
    write_wav, write_wav_stereo,
};

/// Errors produced by the I/O layer.
///
/// The DSP core itself is infallible by design; only the file boundary
/// can fail.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Underlying filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// WAV encoding/decoding error.
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// File has a layout the engine cannot process.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Result alias for the I/O layer.
pub type Result<T> = std::result::Result<T, Error>;
