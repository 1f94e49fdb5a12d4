use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use estimate_forge::catalog::RuleCatalog;
use estimate_forge::config::{get_config_path, ForgeConfig};
use estimate_forge::models::{ComplexityTier, UpdateItemInput};
use estimate_forge::store::ProjectStore;
use estimate_forge::{export, report, snapshot};

#[derive(Parser)]
#[command(name = "forge")]
#[command(about = "Effort estimates for .NET project components")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List categories, metrics, patterns and roles
    Catalog,
    /// Start a new estimate with one default component
    New {
        /// Directory to write the snapshot to (defaults to the configured output dir)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Add a component
    Add {
        file: PathBuf,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        pattern: Option<String>,
        #[arg(long)]
        complexity: Option<ComplexityTier>,
        #[arg(long)]
        title: Option<String>,
    },
    /// Change fields of a component
    Edit {
        file: PathBuf,
        id: u64,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        pattern: Option<String>,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        complexity: Option<ComplexityTier>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        assumptions: Option<String>,
        #[arg(long)]
        risks: Option<String>,
    },
    /// Set a metric count (negative counts become 0)
    SetMetric {
        file: PathBuf,
        id: u64,
        metric: String,
        #[arg(allow_negative_numbers = true)]
        value: i64,
    },
    /// Set a secondary multiplier such as `dependencies`
    SetFactor {
        file: PathBuf,
        id: u64,
        name: String,
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
    /// Remove a component
    Remove { file: PathBuf, id: u64 },
    /// Print every component and the project total
    Show { file: PathBuf },
    /// Write the estimate as CSV
    Export {
        file: PathBuf,
        /// Output path (defaults to the dated file name in the configured output dir)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Print the configuration
    Config {
        /// Write the current values to the config file
        #[arg(long)]
        init: bool,
    },
}

/// Initialize tracing with output to stderr so stdout only carries command output
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "estimate_forge=info,forge=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = ForgeConfig::load();
    let catalog = RuleCatalog::builtin();
    let today = chrono::Utc::now().date_naive();

    match cli.command {
        Commands::Catalog => print_catalog(catalog),
        Commands::New { dir } => {
            let dir = dir.unwrap_or_else(|| config.output_dir());
            let mut store = ProjectStore::with_default_item(catalog);
            apply_default_role(&mut store, &config, catalog)?;
            let path = snapshot::save_to_dir(&store, &dir, today)?;
            println!("{}", path.display());
        }
        Commands::Add {
            file,
            category,
            pattern,
            complexity,
            title,
        } => {
            let mut store = snapshot::load_from_file(&file)?;
            let item = store.add(catalog);
            // Category first so a pattern for the new category is accepted.
            store.update(
                item.id,
                UpdateItemInput {
                    category,
                    role: Some(config.default_role.clone()),
                    ..Default::default()
                },
                catalog,
            )?;
            store.update(
                item.id,
                UpdateItemInput {
                    pattern,
                    complexity,
                    title,
                    ..Default::default()
                },
                catalog,
            )?;
            snapshot::save_to_file(&store, &file)?;
            println!("Added component #{}", item.id);
        }
        Commands::Edit {
            file,
            id,
            category,
            pattern,
            role,
            complexity,
            title,
            assumptions,
            risks,
        } => {
            let mut store = snapshot::load_from_file(&file)?;
            let input = UpdateItemInput {
                category,
                pattern,
                role,
                complexity,
                title,
                assumptions,
                risks,
            };
            if store.update(id, input, catalog)?.is_none() {
                anyhow::bail!("No component with id {}", id);
            }
            snapshot::save_to_file(&store, &file)?;
        }
        Commands::SetMetric {
            file,
            id,
            metric,
            value,
        } => {
            let mut store = snapshot::load_from_file(&file)?;
            if store.set_metric(id, &metric, value, catalog)?.is_none() {
                anyhow::bail!("No component with id {}", id);
            }
            snapshot::save_to_file(&store, &file)?;
        }
        Commands::SetFactor {
            file,
            id,
            name,
            value,
        } => {
            let mut store = snapshot::load_from_file(&file)?;
            if store.set_complexity_factor(id, &name, value).is_none() {
                anyhow::bail!("No component with id {}", id);
            }
            snapshot::save_to_file(&store, &file)?;
        }
        Commands::Remove { file, id } => {
            let mut store = snapshot::load_from_file(&file)?;
            if !store.remove(id) {
                tracing::info!("No component with id {}, nothing removed", id);
            }
            snapshot::save_to_file(&store, &file)?;
        }
        Commands::Show { file } => {
            let store = snapshot::load_from_file(&file)?;
            print!("{}", report::render_summary(&store, catalog));
        }
        Commands::Export { file, out } => {
            let store = snapshot::load_from_file(&file)?;
            let out = out.unwrap_or_else(|| {
                config
                    .output_dir()
                    .join(snapshot::default_file_name(today, export::EXPORT_EXTENSION))
            });
            export::write_export(&store, catalog, &out)?;
            println!("{}", out.display());
        }
        Commands::Config { init } => {
            let path = get_config_path()?;
            if init {
                config.save().context("Failed to write config")?;
            }
            print_config(&path, &config)?;
        }
    }

    Ok(())
}

fn apply_default_role(
    store: &mut ProjectStore,
    config: &ForgeConfig,
    catalog: &RuleCatalog,
) -> anyhow::Result<()> {
    let ids: Vec<u64> = store.items().iter().map(|i| i.id).collect();
    for id in ids {
        store.update(
            id,
            UpdateItemInput {
                role: Some(config.default_role.clone()),
                ..Default::default()
            },
            catalog,
        )?;
    }
    Ok(())
}

fn print_catalog(catalog: &RuleCatalog) {
    for category in catalog.categories() {
        println!("{} ({})", category.name(), category.id());
        for metric in category.metrics() {
            println!(
                "    metric  {:<16} {:<24} {}h/unit",
                metric.id, metric.name, metric.hours_per_unit
            );
        }
        for pattern in category.patterns() {
            println!(
                "    pattern {:<16} {:<24} x{}",
                pattern.id, pattern.name, pattern.multiplier
            );
        }
    }

    println!("Complexity");
    for tier in ComplexityTier::ALL {
        println!(
            "    {:<24} {:<24} x{}",
            tier.as_str(),
            tier.label(),
            catalog.complexity_multiplier(tier)
        );
    }

    println!("Roles");
    for role in catalog.roles() {
        println!("    {:<24} {:<24} {}/h", role.id, role.name, role.hourly_rate);
    }
}

fn print_config(path: &Path, config: &ForgeConfig) -> anyhow::Result<()> {
    println!("{}", path.display());
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
