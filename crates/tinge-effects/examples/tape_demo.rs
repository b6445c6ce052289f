//! Renders a short test tone through the tape chain and prints level stats.
//!
//! Run with: cargo run -p tinge-effects --example tape_demo
#![allow(missing_docs)]

use std::sync::Arc;
use tinge_effects::{TapeChain, TapeParam, TapeParams};

fn main() {
    let sample_rate = 48000.0;
    let params = Arc::new(TapeParams::new());
    params.set(TapeParam::Wow, 30.0);
    params.set(TapeParam::Drive, 60.0);
    params.set(TapeParam::Tone, -20.0);
    params.set(TapeParam::HighCutFreq, 15000.0);

    let mut chain = TapeChain::new(Arc::clone(&params));
    chain.prepare(sample_rate, 512);

    // One second of 440 Hz at -6 dBFS
    let mut buffer: Vec<f32> = (0..48000)
        .map(|i| 0.5 * (std::f32::consts::TAU * 440.0 * i as f32 / sample_rate).sin())
        .collect();

    let input_rms = rms(&buffer);
    for block in buffer.chunks_mut(512) {
        chain.process_block(&mut [block]);
    }
    let output_rms = rms(&buffer);

    println!("input  RMS: {input_rms:.4}");
    println!("output RMS: {output_rms:.4}");
    println!(
        "gain: {:+.2} dB",
        20.0 * (output_rms / input_rms).log10()
    );
}

fn rms(buffer: &[f32]) -> f32 {
    (buffer.iter().map(|x| x * x).sum::<f32>() / buffer.len() as f32).sqrt()
}
