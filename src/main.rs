//! catalog-ingestor CLI - Build and upload catalog CSV files
//!
//! # Commands
//!
//! ```bash
//! catalog-ingestor build catalog.json --out-dir out/   # Build CSV files
//! catalog-ingestor ingest catalog.json \
//!     --api-key KEY --api-token TOKEN                  # Full ingestion
//! ```
//!
//! The catalog JSON file holds one `CatalogPayload`:
//!
//! ```json
//! { "type": "full", "data": { "groups": [...], "items": [...], "variations": [...] } }
//! ```

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use catalog_ingestor::{
    build_csv_payload, CatalogIngestor, CatalogPayload, IngestionType, IngestorOptions,
};

#[derive(Parser)]
#[command(name = "catalog-ingestor")]
#[command(about = "Build and upload catalog CSV files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the CSV payload from a catalog JSON file
    Build {
        /// Input catalog JSON file
        input: PathBuf,

        /// Directory to write item_groups.csv / items.csv / variations.csv
        /// into (default: print to stdout)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },

    /// Full ingestion: build CSVs, upload them, report the ingestion event
    Ingest {
        /// Input catalog JSON file
        input: PathBuf,

        /// Index key identifying the catalog
        #[arg(long)]
        api_key: String,

        /// Secret API token
        #[arg(long)]
        api_token: String,

        /// Connection id for ingestion-event reporting
        #[arg(long)]
        connection_id: Option<String>,

        /// Email notified when the ingestion finishes
        #[arg(long)]
        notification_email: Option<String>,

        /// Run an incremental (delta) ingestion instead of the type
        /// declared in the payload file
        #[arg(long)]
        delta: bool,

        /// Do not force the ingestion when the service flags it as destructive
        #[arg(long)]
        no_force: bool,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build { input, out_dir } => cmd_build(&input, out_dir.as_deref()),

        Commands::Ingest {
            input,
            api_key,
            api_token,
            connection_id,
            notification_email,
            delta,
            no_force,
        } => {
            cmd_ingest(
                &input,
                api_key,
                api_token,
                connection_id,
                notification_email,
                delta,
                no_force,
            )
            .await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_build(input: &Path, out_dir: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let payload = read_payload(input)?;
    eprintln!(
        "Read catalog: {} groups, {} items, {} variations",
        payload.data.groups.len(),
        payload.data.items.len(),
        payload.data.variations.len()
    );

    let csv_payload = build_csv_payload(&payload.data)?;

    match out_dir {
        Some(dir) => {
            let written = csv_payload.write_to_dir(dir)?;
            if written.is_empty() {
                eprintln!("Catalog is empty; nothing written.");
            }
            for name in written {
                eprintln!("Wrote {}", dir.join(name).display());
            }
        }
        None => {
            for (label, blob) in [
                ("groups", &csv_payload.groups),
                ("items", &csv_payload.items),
                ("variations", &csv_payload.variations),
            ] {
                if let Some(csv) = blob {
                    println!("--- {} ---", label);
                    println!("{}", csv);
                }
            }
        }
    }

    Ok(())
}

async fn cmd_ingest(
    input: &Path,
    api_key: String,
    api_token: String,
    connection_id: Option<String>,
    notification_email: Option<String>,
    delta: bool,
    no_force: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut payload = read_payload(input)?;
    if delta {
        payload.ingestion_type = IngestionType::Delta;
    }

    let mut options = IngestorOptions::new(api_key, api_token).with_force(!no_force);
    if let Some(connection_id) = connection_id {
        options = options.with_connection_id(connection_id);
    }
    if let Some(email) = notification_email {
        options = options.with_notification_email(email);
    }

    let ingestor = CatalogIngestor::new(options);
    let outcome = ingestor.ingest(|| async move { Ok(payload) }).await?;

    eprintln!(
        "Ingestion task {} created in {}ms ({} groups, {} items, {} variations)",
        outcome.task_id,
        outcome.elapsed.as_millis(),
        outcome.counts.groups,
        outcome.counts.items,
        outcome.counts.variations
    );

    Ok(())
}

fn read_payload(input: &Path) -> Result<CatalogPayload, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(input)?;
    let payload: CatalogPayload = serde_json::from_str(&content)?;
    Ok(payload)
}
