use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use coursepack::config::{Settings, StoreKind};
use coursepack::db::SqliteStore;
use coursepack::descriptor::{self, tree_render};
use coursepack::ingest::{AnySource, DescriptorSource, DirectoryLister, FileLister, Ingestor};
use coursepack::models::{InteractionModel, ProcessedPackage, TemplateId};
use coursepack::processor::BatchFailure;
use coursepack::rules::RuleEngine;
use coursepack::store::{MemoryStore, PackageStore};
use coursepack::{BatchReport, PackageProcessor};

#[derive(Parser)]
#[command(name = "cpk")]
#[command(about = "Classify e-learning packages into activity templates")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect the package family of an extracted package directory
    Detect { path: PathBuf },
    /// Fetch and parse a manifest descriptor from a path or URL
    Parse {
        location: String,

        /// Print the organization tree instead of JSON
        #[arg(long)]
        tree: bool,
    },
    /// Classify packages and cache the results
    Classify {
        #[arg(required = true)]
        paths: Vec<String>,

        /// JSON file with an exported interaction model, applied to every path
        #[arg(long)]
        interactions: Option<PathBuf>,

        /// Recommendations below this confidence fall back to contentreveal
        #[arg(long)]
        min_confidence: Option<u8>,
    },
    /// Show a stored package by id
    Show { id: Uuid },
    /// Print the effective detection rule table
    Rules,
    /// Remove every stored package
    Clear,
}

/// Logs go to stderr so stdout carries only JSON.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "coursepack=info,coursepack_core=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn open_store(settings: &Settings) -> anyhow::Result<Arc<dyn PackageStore>> {
    match settings.store {
        StoreKind::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreKind::Sqlite => {
            let store = match &settings.database_path {
                Some(path) => SqliteStore::open(path.clone())?,
                None => SqliteStore::open_default()?,
            };
            store.migrate()?;
            Ok(Arc::new(store))
        }
    }
}

fn engine(settings: &Settings) -> RuleEngine {
    let mut engine = RuleEngine::default();
    engine.merge(settings.rules.iter().cloned());
    engine
}

#[derive(Serialize)]
struct Classified<'a> {
    #[serde(flatten)]
    package: &'a ProcessedPackage,
    recommended_template: TemplateId,
}

#[derive(Serialize)]
struct ClassifyOutput<'a> {
    packages: Vec<Classified<'a>>,
    failures: &'a [BatchFailure],
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let settings = Settings::load();

    match cli.command {
        Commands::Detect { path } => {
            let files = DirectoryLister::from_settings(&settings).list(&path).await?;
            print_json(&engine(&settings).detect(&files))?;
        }
        Commands::Parse { location, tree } => {
            let raw = AnySource::from_env().fetch(&location).await?;
            let parsed = descriptor::parse(&raw);
            if tree {
                if !parsed.valid {
                    anyhow::bail!(parsed.error.unwrap_or_default());
                }
                print!("{}", tree_render::render_tree(&parsed.organizations));
            } else {
                print_json(&parsed)?;
            }
        }
        Commands::Classify {
            paths,
            interactions,
            min_confidence,
        } => {
            let model: Option<InteractionModel> = match interactions {
                Some(path) => {
                    let content = std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    Some(serde_json::from_str(&content).context("Invalid interaction model")?)
                }
                None => None,
            };
            let min_confidence = min_confidence.unwrap_or(settings.min_confidence);

            let processor = PackageProcessor::with_store(engine(&settings), open_store(&settings)?);
            let ingestor = Ingestor::new(
                Arc::new(processor),
                DirectoryLister::from_settings(&settings),
                AnySource::from_env(),
            );

            let mut report = BatchReport::default();
            for path in &paths {
                match ingestor.ingest_with(path, model.clone()).await {
                    Ok(package) => report.processed.push(package),
                    Err(e) => {
                        tracing::error!(source = %path, "Failed to classify package: {}", e);
                        report.failures.push(BatchFailure {
                            source_path: path.clone(),
                            error: e.to_string(),
                        });
                    }
                }
            }

            print_json(&ClassifyOutput {
                packages: report
                    .processed
                    .iter()
                    .map(|package| Classified {
                        package,
                        recommended_template: package.recommended_template(min_confidence),
                    })
                    .collect(),
                failures: &report.failures,
            })?;

            if !report.failures.is_empty() {
                std::process::exit(1);
            }
        }
        Commands::Show { id } => {
            let processor = PackageProcessor::with_store(engine(&settings), open_store(&settings)?);
            let package = processor.get_package(id)?;
            print_json(&Classified {
                recommended_template: package.recommended_template(settings.min_confidence),
                package: &package,
            })?;
        }
        Commands::Rules => {
            print_json(&engine(&settings).table())?;
        }
        Commands::Clear => {
            let removed = open_store(&settings)?.clear()?;
            println!("Removed {} package(s)", removed);
        }
    }

    Ok(())
}
