//! # chatmap CLI
//!
//! Command-line interface for the chatmap library.

use std::fs;
use std::io::{self, Write};
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use chatmap::ChatmapError;
use chatmap::cli::Args;
use chatmap::geojson::to_geojson;
use chatmap::media::MediaCatalog;
use chatmap::merger::{MergeOutput, merge_paths};

fn main() {
    let args = <Args as ClapParser>::parse();
    init_logging(&args);

    if let Err(e) = run(&args) {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn init_logging(args: &Args) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level())),
        )
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args) -> Result<(), ChatmapError> {
    let start = Instant::now();
    let config = args.parse_config();

    let output = merge_paths(&args.inputs, &config);
    let json = to_geojson(&output.geojson, args.pretty)?;

    match &args.output {
        Some(path) => fs::write(path, json)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }

    if args.report {
        print_report(&output, start.elapsed().as_secs_f64());
    }

    if let Some(dir) = &args.media {
        let catalog = MediaCatalog::from_dir(dir)?;
        let missing = catalog.missing(&output.geojson);
        if missing.is_empty() {
            eprintln!("🖼️  All {} attachments found in {}", attachment_count(&output), dir.display());
        } else {
            eprintln!("⚠️  {} attachments missing from {}:", missing.len(), dir.display());
            for name in missing {
                eprintln!("   {}", name);
            }
        }
    }

    Ok(())
}

fn attachment_count(output: &MergeOutput) -> usize {
    output
        .geojson
        .features
        .iter()
        .filter(|feature| feature.properties.file.is_some())
        .count()
}

fn print_report(output: &MergeOutput, seconds: f64) {
    eprintln!("🗺️  chatmap v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for report in &output.files {
        let platform = report
            .platform
            .map_or_else(|| "unknown".to_string(), |p| p.to_string());
        eprintln!("📂 {} [{}]: {}", report.name, platform, report.status);
    }
    eprintln!();
    eprintln!("📊 Summary:");
    eprintln!("   Files:     {}", output.files.len());
    eprintln!("   Skipped:   {}", output.skipped_count());
    eprintln!("   Locations: {}", output.geojson.len());
    eprintln!("   Time:      {:.2}s", seconds);
}
