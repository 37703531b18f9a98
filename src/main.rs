use std::fs;
use std::path::PathBuf;

use clap::Parser;

use hazmap::ReportDesk;

/// Submit hazard photo reports and print the verified map
#[derive(Parser)]
struct Cli {
    /// Photo files to submit as reports, in order
    #[arg(required = true)]
    photos: Vec<PathBuf>,
    /// Description attached when a report starts a new hazard
    #[arg(short, long, default_value_t = String::new())]
    description: String,
    /// Fallback latitude for photos without a geotag
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<String>,
    /// Fallback longitude for photos without a geotag
    #[arg(long, allow_hyphen_values = true)]
    lng: Option<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Cli::parse();

    let desk = ReportDesk::new();
    for path in &args.photos {
        let bytes = fs::read(path)?;
        match desk.submit(
            &bytes,
            &args.description,
            args.lat.as_deref(),
            args.lng.as_deref(),
        ) {
            Ok(outcome) => {
                let status = if outcome.created {
                    "new"
                } else if outcome.verified {
                    "verified"
                } else {
                    "corroborated"
                };
                println!(
                    "{}\t{}\t{}\t({}, {})",
                    path.display(),
                    status,
                    outcome.hazard.id,
                    outcome.hazard.lat,
                    outcome.hazard.lng
                );
            }
            Err(err) => eprintln!("{}: {}", path.display(), err),
        }
    }

    println!("{}", serde_json::to_string_pretty(&desk.verified())?);
    Ok(())
}
