//! Effect listing command.

use clap::Args;
use tinge_core::ParameterInfo;
use tinge_effects::{DESCRIPTORS, Gain, STRING_IDS};

#[derive(Args)]
pub struct EffectsArgs {
    /// Show full parameter tables
    #[arg(long)]
    verbose: bool,
}

pub fn run(args: EffectsArgs) -> anyhow::Result<()> {
    println!("tape: Tape emulation chain (wow, saturation, tilt tone, cut filters)");
    if args.verbose {
        for (descriptor, string_id) in DESCRIPTORS.iter().zip(STRING_IDS.iter()) {
            println!(
                "  {:<10} {:<10} {}..{}{} (default {})",
                string_id,
                descriptor.name,
                descriptor.min,
                descriptor.max,
                descriptor.unit.suffix(),
                descriptor.default
            );
        }
        println!("  {:<10} {:<10} on/off (default off)", "bypass", "Bypass");
    }

    println!("gain: Smoothed gain utility");
    if args.verbose {
        let gain = Gain::new(48000.0);
        for index in 0..gain.param_count() {
            if let Some(descriptor) = gain.param_info(index) {
                println!(
                    "  {:<10} {:<10} {}..{}{} (default {})",
                    descriptor.short_name,
                    descriptor.name,
                    descriptor.min,
                    descriptor.max,
                    descriptor.unit.suffix(),
                    descriptor.default
                );
            }
        }
    }

    Ok(())
}
