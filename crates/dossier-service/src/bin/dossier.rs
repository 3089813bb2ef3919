//! dossier: command-line front end for the office document index.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dossier_core::defaults::{DEFAULT_PERSON, DEFAULT_SPECIALTY};
use dossier_core::{ExactFilters, RecordEdit};
use dossier_service::{explain, Dossier, IngestRequest, SearchRequest, ServiceConfig};
use dossier_store::NameList;

#[derive(Parser)]
#[command(name = "dossier")]
#[command(author, version, about = "Document indexing and search for a law office")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show search engine, OCR and catalog status
    Status,

    /// Index every supported file under the given folders
    Scan {
        /// Folders to index (replaces the current catalog)
        #[arg(required = true, num_args = 1..)]
        folders: Vec<PathBuf>,

        #[arg(short, long, default_value = DEFAULT_SPECIALTY)]
        specialty: String,

        #[arg(short, long, default_value = DEFAULT_PERSON)]
        person: String,
    },

    /// Add one file to the catalog
    Ingest {
        file: PathBuf,

        /// Display name (default: the file name)
        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long, default_value = DEFAULT_SPECIALTY)]
        specialty: String,

        #[arg(short, long, default_value = DEFAULT_PERSON)]
        person: String,

        /// Index the file where it is instead of copying it to the data directory
        #[arg(long)]
        in_place: bool,
    },

    /// Search the catalog
    Search {
        /// Query, e.g. avocat:"Jean Dupont" contrat -brouillon
        #[arg(default_value = "")]
        query: String,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Show how a query is compiled, without running it
    Explain { query: String },

    /// List catalog records
    List,

    /// Change the title, person or specialty of a record
    Edit {
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        person: Option<String>,

        #[arg(short, long)]
        specialty: Option<String>,
    },

    /// Delete a record and its file
    Delete { id: String },

    /// Maintain the specialty list
    Specialty {
        #[command(subcommand)]
        action: NameAction,
    },

    /// Maintain the person list
    Person {
        #[command(subcommand)]
        action: NameAction,
    },

    /// Corpus statistics
    Stats,
}

#[derive(Args)]
struct FilterArgs {
    #[arg(long)]
    specialty: Option<String>,

    #[arg(long)]
    person: Option<String>,

    #[arg(long)]
    category: Option<String>,
}

#[derive(Subcommand)]
enum NameAction {
    List,
    Add { name: String },
    Rename { old: String, new: String },
    Remove { name: String },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Environment variables:
///   LOG_FORMAT  - "json" or "text" (default: "text")
///   LOG_FILE    - path to log file (optional, enables file logging)
///   RUST_LOG    - standard env filter (default: "dossier=info,dossier_service=info")
///
/// Console logs go to stderr so command output stays machine-readable.
fn init_tracing() -> Option<WorkerGuard> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "dossier=info,dossier_service=info".into());
    let registry = tracing_subscriber::registry().with(env_filter);

    if let Some(ref path) = log_file {
        let path = std::path::Path::new(path);
        let file_dir = path.parent().unwrap_or(std::path::Path::new("."));
        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("dossier.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(non_blocking),
                )
                .init();
        }
        Some(guard)
    } else {
        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        } else {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
        None
    }
}

async fn run_names(dossier: &Dossier, list: NameList, action: NameAction) -> anyhow::Result<()> {
    let service = dossier.catalog_service();
    match action {
        NameAction::List => print_json(&service.names(list)?),
        NameAction::Add { name } => print_json(&service.add_name(list, &name)?),
        NameAction::Rename { old, new } => {
            let updated = service.rename_name(list, &old, &new).await?;
            println!("{} -> {} ({} document(s) updated)", old, new.trim(), updated);
            Ok(())
        }
        NameAction::Remove { name } => print_json(&service.remove_name(list, &name)?),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let _log_guard = init_tracing();

    let cli = Cli::parse();
    let config = ServiceConfig::from_env();
    info!(index_dir = %config.index_dir.display(), "Starting dossier");

    let dossier = Dossier::connect(config)
        .await
        .context("Failed to initialize")?;

    match cli.command {
        Commands::Status => print_json(&dossier.status()?)?,

        Commands::Scan {
            folders,
            specialty,
            person,
        } => {
            let stats = dossier
                .indexer()
                .scan(&folders, &specialty, &person)
                .await
                .context("Scan failed")?;
            print_json(&stats)?;
        }

        Commands::Ingest {
            file,
            title,
            specialty,
            person,
            in_place,
        } => {
            let request = IngestRequest {
                title,
                specialty,
                person,
            };
            let indexer = dossier.indexer();
            let result = if in_place {
                indexer.ingest(&file, &request).await
            } else {
                indexer
                    .ingest_copy(&file, &dossier.config.data_dir, &request)
                    .await
            };
            let record = result.with_context(|| format!("Failed to ingest {}", file.display()))?;
            print_json(&record)?;
        }

        Commands::Search { query, filters } => {
            let request = SearchRequest {
                term: query,
                filters: ExactFilters::new(filters.specialty, filters.person, filters.category),
            };
            print_json(&dossier.search_service().search(&request).await?)?;
        }

        Commands::Explain { query } => print_json(&explain(&query))?,

        Commands::List => print_json(&dossier.catalog_service().documents()?)?,

        Commands::Edit {
            id,
            title,
            person,
            specialty,
        } => {
            let edit = RecordEdit {
                title,
                person,
                specialty,
            };
            print_json(&dossier.catalog_service().edit(&id, &edit).await?)?;
        }

        Commands::Delete { id } => {
            let record = dossier.catalog_service().delete(&id).await?;
            println!("Deleted {} ({})", record.id, record.name);
        }

        Commands::Specialty { action } => run_names(&dossier, NameList::Specialties, action).await?,

        Commands::Person { action } => run_names(&dossier, NameList::Persons, action).await?,

        Commands::Stats => print_json(&dossier.statistics()?)?,
    }

    Ok(())
}
