//! Test signal generation command.

use clap::{Args, Subcommand};
use std::path::PathBuf;
use tinge_io::{WavSpec, write_wav};

#[derive(Args)]
pub struct GenerateArgs {
    #[command(subcommand)]
    command: GenerateCommand,
}

#[derive(Subcommand)]
enum GenerateCommand {
    /// Generate a sine tone
    Tone {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Frequency in Hz
        #[arg(long, default_value = "440.0")]
        freq: f32,

        /// Duration in seconds
        #[arg(long, default_value = "1.0")]
        duration: f32,

        /// Sample rate
        #[arg(long, default_value = "48000")]
        sample_rate: u32,

        /// Amplitude (0-1)
        #[arg(long, default_value = "0.5")]
        amplitude: f32,
    },

    /// Generate an impulse
    Impulse {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Length in samples
        #[arg(long, default_value = "48000")]
        length: usize,

        /// Impulse position in samples
        #[arg(long, default_value = "0")]
        position: usize,

        /// Sample rate
        #[arg(long, default_value = "48000")]
        sample_rate: u32,

        /// Impulse amplitude
        #[arg(long, default_value = "1.0")]
        amplitude: f32,
    },

    /// Generate white noise from a seeded generator
    Noise {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Duration in seconds
        #[arg(long, default_value = "1.0")]
        duration: f32,

        /// Sample rate
        #[arg(long, default_value = "48000")]
        sample_rate: u32,

        /// Amplitude (0-1)
        #[arg(long, default_value = "0.5")]
        amplitude: f32,

        /// Generator seed, for reproducible output
        #[arg(long, default_value = "1")]
        seed: u64,
    },
}

/// Linear congruential generator with explicit, locally-owned state.
///
/// Deterministic for a given seed, so generated fixtures are reproducible
/// across runs and machines.
struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_f32(&mut self) -> f32 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        // Top 32 bits have the best statistical quality; map to [-1, 1)
        ((self.state >> 32) as u32 as f32 / 2147483648.0) - 1.0
    }
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    match args.command {
        GenerateCommand::Tone {
            output,
            freq,
            duration,
            sample_rate,
            amplitude,
        } => {
            anyhow::ensure!(duration > 0.0, "Duration must be positive");
            let num_samples = (duration * sample_rate as f32) as usize;
            let samples: Vec<f32> = (0..num_samples)
                .map(|i| {
                    amplitude
                        * (std::f32::consts::TAU * freq * i as f32 / sample_rate as f32).sin()
                })
                .collect();

            write_signal(&output, &samples, sample_rate)?;
            println!(
                "Wrote {} ({freq} Hz tone, {duration}s)",
                output.display()
            );
        }

        GenerateCommand::Impulse {
            output,
            length,
            position,
            sample_rate,
            amplitude,
        } => {
            anyhow::ensure!(position < length, "Impulse position must be inside the buffer");
            let mut samples = vec![0.0f32; length];
            samples[position] = amplitude;

            write_signal(&output, &samples, sample_rate)?;
            println!(
                "Wrote {} (impulse at sample {position})",
                output.display()
            );
        }

        GenerateCommand::Noise {
            output,
            duration,
            sample_rate,
            amplitude,
            seed,
        } => {
            anyhow::ensure!(duration > 0.0, "Duration must be positive");
            let num_samples = (duration * sample_rate as f32) as usize;
            let mut lcg = Lcg::new(seed);
            let samples: Vec<f32> = (0..num_samples)
                .map(|_| amplitude * lcg.next_f32())
                .collect();

            write_signal(&output, &samples, sample_rate)?;
            println!(
                "Wrote {} (seeded noise, {duration}s)",
                output.display()
            );
        }
    }

    Ok(())
}

fn write_signal(path: &std::path::Path, samples: &[f32], sample_rate: u32) -> anyhow::Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
    };
    write_wav(path, samples, spec)?;
    Ok(())
}
