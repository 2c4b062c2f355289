// vidfit-cli/src/main.rs
//
// Command-line entry point: parses arguments, checks the external tool
// dependencies, builds the core configuration and runs the batch.

mod cli;
mod progress;
mod summary;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use vidfit_core::{
    check_dependency, find_subtitle, find_videos, process_videos, CoreConfig, CoreError,
};

use crate::cli::{Cli, Commands, ConvertArgs};
use crate::progress::{JsonProgress, TerminalProgress};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Convert(args) => run_convert(args),
    }
}

fn run_convert(args: ConvertArgs) -> anyhow::Result<()> {
    check_dependency("ffmpeg").context("ffmpeg is required")?;
    check_dependency("ffprobe").context("ffprobe is required")?;

    let mut config = CoreConfig::new(args.input_dir, args.output_dir);
    config.rotation = args.rotate.map(Into::into);
    config.detect_bars = !args.no_bar_detect;
    if let Some(preset) = args.preset {
        config.encoder.preset = preset;
    }
    if let Some(crf) = args.crf {
        config.encoder.crf = crf;
    }
    config.encoder.threads = args
        .threads
        .or_else(|| std::thread::available_parallelism().ok().map(|n| n.get()));
    config.validate()?;
    log::debug!("Run configuration: {config:?}");

    let files = match find_videos(&config.input_dir) {
        Ok(files) => files,
        Err(CoreError::NoFilesFound) => {
            println!(
                "No video files found in {}",
                config.input_dir.display()
            );
            return Ok(());
        }
        Err(e) => return Err(e).context("input discovery failed"),
    };

    let with_subtitles = files
        .iter()
        .filter(|file| find_subtitle(file).is_some())
        .count();

    println!("Found {} video file(s).", files.len().to_string().bold());
    println!("Videos with subtitles: {with_subtitles}");
    println!(
        "Target: {}h x {}-{}w (prefer {}w)",
        config.target.height,
        config.target.width_min,
        config.target.width_max,
        config.target.width_preferred
    );
    println!(
        "Scaling limits: {:.0}% squeeze to {:.0}% stretch",
        config.limits.min_squeeze * 100.0,
        config.limits.max_stretch * 100.0
    );
    if let Some(threads) = config.encoder.threads {
        println!("Encoder threads: {threads}");
    }
    println!(
        "Black bar detection: {}",
        if config.detect_bars { "enabled" } else { "disabled" }
    );
    println!();

    let summary = if args.json_progress {
        process_videos(&config, &files, &JsonProgress)?
    } else {
        process_videos(&config, &files, &TerminalProgress::new())?
    };

    if args.json_progress {
        if let Ok(line) = serde_json::to_string(&summary) {
            println!("{line}");
        }
    } else {
        summary::print_summary(&summary);
    }

    Ok(())
}
