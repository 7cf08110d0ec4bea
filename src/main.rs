//! scene-facts CLI: common-sense facts for detected image objects.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use scene_facts::config::{FactsConfig, default_config_path};
use scene_facts::normalize::ConceptId;
use scene_facts::pipeline::FactFinder;
use scene_facts::rank::RankedFact;
use scene_facts::source::{ConceptNetClient, EdgeSource, MemorySource};

#[derive(Parser)]
#[command(
    name = "scene-facts",
    version,
    about = "Common-sense facts for detected image objects, from ConceptNet"
)]
struct Cli {
    /// Path to a TOML config file (default: $XDG_CONFIG_HOME/scene-facts/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up facts for a list of objects.
    Facts {
        /// Object names, e.g. "dog" "golden retriever" "park".
        objects: Vec<String>,

        /// Allowed relations (comma-separated, e.g. "IsA,AtLocation").
        #[arg(long)]
        relations: Option<String>,

        /// Minimum edge weight.
        #[arg(long)]
        min_weight: Option<f64>,

        /// Maximum number of facts.
        #[arg(long)]
        max_facts: Option<usize>,

        /// Result limit per object lookup.
        #[arg(long)]
        per_object_limit: Option<usize>,

        /// Result limit per pair lookup.
        #[arg(long)]
        pair_limit: Option<usize>,

        /// Issue lookups concurrently.
        #[arg(long)]
        parallel: bool,

        /// Answer lookups from a JSON fixture instead of the network.
        #[arg(long)]
        fixture: Option<PathBuf>,

        /// Print facts with weights as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the identifiers and URIs objects normalize to.
    Normalize {
        /// Concept strings.
        concepts: Vec<String>,
    },

    /// Print the effective configuration as TOML.
    Config,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = FactsConfig::resolve(cli.config.as_deref())?;

    match cli.command {
        Commands::Facts {
            objects,
            relations,
            min_weight,
            max_facts,
            per_object_limit,
            pair_limit,
            parallel,
            fixture,
            json,
        } => {
            if let Some(relations) = relations {
                config = config.with_relations(
                    relations
                        .split(',')
                        .map(str::trim)
                        .filter(|r| !r.is_empty()),
                );
            }
            if let Some(min_weight) = min_weight {
                config.min_weight = min_weight;
            }
            if let Some(max_facts) = max_facts {
                config.max_facts = max_facts;
            }
            if let Some(limit) = per_object_limit {
                config.per_object_limit = limit;
            }
            if let Some(limit) = pair_limit {
                config.pair_limit = limit;
            }
            config.parallel |= parallel;

            let facts = match fixture {
                Some(path) => run(MemorySource::load(&path)?, config, &objects)?,
                None => {
                    let client = ConceptNetClient::new(&config);
                    run(client, config, &objects)?
                }
            };

            if json {
                let records: Vec<serde_json::Value> = facts
                    .iter()
                    .map(|fact| {
                        serde_json::json!({
                            "sentence": fact.sentence(),
                            "start": fact.key.start,
                            "relation": fact.key.relation,
                            "end": fact.key.end,
                            "weight": fact.weight,
                        })
                    })
                    .collect();
                let out = serde_json::to_string_pretty(&records).into_diagnostic()?;
                println!("{out}");
            } else if facts.is_empty() {
                eprintln!("No facts found.");
            } else {
                for fact in &facts {
                    println!("{}", fact.sentence());
                }
            }
        }

        Commands::Normalize { concepts } => {
            for concept in &concepts {
                let id = ConceptId::new(concept);
                println!("{concept:?} -> {id} ({})", id.uri(&config.language));
            }
        }

        Commands::Config => {
            if cli.config.is_none() {
                if let Ok(path) = default_config_path() {
                    eprintln!("# user config: {}", path.display());
                }
            }
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

fn run<S: EdgeSource>(
    source: S,
    config: FactsConfig,
    objects: &[String],
) -> Result<Vec<RankedFact>> {
    let finder = FactFinder::new(source, config);
    Ok(finder.ranked_facts(objects)?)
}
