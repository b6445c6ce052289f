//! File-based tape chain processing command.

use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tinge_core::Effect;
use tinge_effects::{Gain, TapeChain, TapeParam, TapeParams};
use tinge_io::{WavSpec, read_wav_stereo, write_wav_stereo};

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Wow depth in percent (0-100)
    #[arg(long, default_value = "0.0")]
    wow: f32,

    /// Saturation drive in percent (0-100)
    #[arg(long, default_value = "0.0")]
    drive: f32,

    /// Tilt tone in percent (-100 dark .. 100 bright)
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    tone: f32,

    /// Low-cut (high-pass) frequency in Hz (20-2000)
    #[arg(long, default_value = "20.0")]
    low_cut: f32,

    /// Low-cut resonance Q (0.1-10)
    #[arg(long, default_value = "0.707")]
    low_cut_q: f32,

    /// High-cut (low-pass) frequency in Hz (1000-20000)
    #[arg(long, default_value = "20000.0")]
    high_cut: f32,

    /// High-cut resonance Q (0.1-10)
    #[arg(long, default_value = "0.707")]
    high_cut_q: f32,

    /// Bypass the tape chain (renders the file unchanged)
    #[arg(long)]
    bypass: bool,

    /// Extra output gain in dB applied after the chain (-20..20)
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    gain: f32,

    /// Processing block size
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.block_size > 0, "Block size must be positive");
    anyhow::ensure!(
        matches!(args.bit_depth, 16 | 24 | 32),
        "Bit depth must be 16, 24, or 32"
    );

    println!("Reading {}...", args.input.display());
    let (mut samples, spec) = read_wav_stereo(&args.input)?;
    let sample_rate = spec.sample_rate as f32;

    println!(
        "  {} frames, {} Hz, {:.2}s",
        samples.len(),
        spec.sample_rate,
        samples.len() as f32 / sample_rate
    );

    let params = Arc::new(TapeParams::new());
    params.set(TapeParam::Wow, args.wow);
    params.set(TapeParam::Drive, args.drive);
    params.set(TapeParam::Tone, args.tone);
    params.set(TapeParam::LowCutFreq, args.low_cut);
    params.set(TapeParam::LowCutQ, args.low_cut_q);
    params.set(TapeParam::HighCutFreq, args.high_cut);
    params.set(TapeParam::HighCutQ, args.high_cut_q);
    params.set_bypass(args.bypass);

    let mut chain = TapeChain::new(Arc::clone(&params));
    chain.prepare(sample_rate, args.block_size);

    println!(
        "Processing (wow {}%, drive {}%, tone {}%)...",
        params.get(TapeParam::Wow),
        params.get(TapeParam::Drive),
        params.get(TapeParam::Tone)
    );

    let frames = samples.len();
    tracing::info!(frames, block_size = args.block_size, "rendering");

    let mut offset = 0;
    while offset < frames {
        let end = (offset + args.block_size).min(frames);
        chain.process_block(&mut [
            &mut samples.left[offset..end],
            &mut samples.right[offset..end],
        ]);
        offset = end;
    }

    if args.gain.abs() > f32::EPSILON {
        let mut trim = Gain::new(sample_rate);
        trim.set_gain_db(args.gain);
        trim.reset();
        trim.process_block_inplace(&mut samples.left);
        trim.reset();
        trim.process_block_inplace(&mut samples.right);
    }

    let out_spec = WavSpec {
        channels: 2,
        sample_rate: spec.sample_rate,
        bits_per_sample: args.bit_depth,
    };
    write_wav_stereo(&args.output, &samples, out_spec)?;

    println!("Wrote {}", args.output.display());
    Ok(())
}
