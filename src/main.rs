use std::path::Path;

use shift_roster::config::AppConfig;
use shift_roster::display::{print_roster, write_roster_to_file};
use shift_roster::export::export_roster_to_csv;
use shift_roster::storage::RosterFile;
use shift_roster::{web, RosterStore};
use tracing_subscriber::EnvFilter;

fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Loads the stored roster; an unreadable record starts an empty one
fn load_roster(storage: &RosterFile) -> RosterStore {
    match storage.load_store() {
        Ok(roster) => roster,
        Err(e) => {
            tracing::warn!(error = %e, path = %storage.path().display(), "Ignoring unreadable roster file");
            RosterStore::new()
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::from_env()?;
    init_logging(&config);

    let args: Vec<String> = std::env::args().collect();
    let storage = RosterFile::new(&config.state_file);
    let mut roster = load_roster(&storage);

    match args.get(1).map(String::as_str) {
        Some("web") => {
            if let Some(port) = args.get(2).and_then(|p| p.parse::<u16>().ok()) {
                config.port = port;
            }
            println!("Access the roster at http://localhost:{}", config.port);
            web::start_server(&config, roster).await?;
        }
        Some("generate") => {
            roster.generate_schedule();
            storage.save(&roster)?;
            print_roster(&roster);

            let text_path = Path::new("roster.txt");
            write_roster_to_file(roster.grid(), text_path)?;
            println!("\nRoster saved to {} and {}", storage.path().display(), text_path.display());
        }
        Some("export") => {
            let csv_path = args.get(2).map(String::as_str).unwrap_or("roster.csv");
            export_roster_to_csv(roster.grid(), Path::new(csv_path))?;
            println!("Roster exported to {}", csv_path);
        }
        Some("show") | None => print_roster(&roster),
        Some(other) => {
            eprintln!("Unknown command: {}", other);
            eprintln!("Usage: shift-roster [show | generate | export [file.csv] | web [port]]");
            std::process::exit(2);
        }
    }

    Ok(())
}
