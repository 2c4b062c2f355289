// vidfit-cli/src/summary.rs
//
// Human-readable run summary printed after a batch completes.

use colored::Colorize;
use vidfit_core::{format_bytes, format_duration, BatchSummary};

pub fn print_summary(summary: &BatchSummary) {
    if !summary.results.is_empty() {
        println!("{}", "========================================".cyan());
        println!("{}", "Conversion Summary".bold());
        println!("{}", "========================================".cyan());
        for result in &summary.results {
            println!("{}", result.filename.bold());
            println!(
                "  Encode time: {}",
                format_duration(result.duration.as_secs_f64())
            );
            println!("  Input size:  {}", format_bytes(result.input_size));
            println!("  Output size: {}", format_bytes(result.output_size));
            println!("{}", "----------------------------------------".cyan());
        }
    }

    let processed = summary.results.len().to_string();
    println!(
        "Finished: {} processed, {} skipped, {} failed.",
        if summary.results.is_empty() {
            processed.normal()
        } else {
            processed.green().bold()
        },
        summary.skipped,
        if summary.failed > 0 {
            summary.failed.to_string().red().bold()
        } else {
            summary.failed.to_string().normal()
        }
    );

    let stats = &summary.stats;
    if summary.results.len() + summary.failed > 0 {
        println!("Strategy breakdown:");
        println!("  Exact fit:       {}", stats.exact_fit);
        println!("  Distorted:       {}", stats.distorted);
        println!("  Scaled and cropped: {}", stats.cropped);
        println!("  Fallback (unknown geometry): {}", stats.fallback);
        println!("  Letterbox removed: {}", stats.bar_cropped);
    }
}
