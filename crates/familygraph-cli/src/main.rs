//! FamilyGraph CLI - Command line interface for the kinship engine

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{completions, family, person, relation, serve, title, titlemap};
use config::Config;
use familygraph_core::{FamilyId, KinshipEngine};
use familygraph_storage::SqliteStorage;
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "familygraph")]
#[command(author, version, about = "Family tree kinship graph with inferred relations and titles")]
pub struct Cli {
    /// Family to operate on (defaults to `default_family` from the config)
    #[arg(long, env = "FAMILYGRAPH_FAMILY", global = true)]
    pub family: Option<String>,

    /// Data directory
    #[arg(short, long, env = "FAMILYGRAPH_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Output format: table, json
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::from(self.format.as_str())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage families
    Family(family::FamilyArgs),
    /// Manage persons
    Person(person::PersonArgs),
    /// Manage explicit relations
    Relation(relation::RelationArgs),
    /// Compute kinship titles
    Title(title::TitleArgs),
    /// Manage custom title maps
    Titlemap(titlemap::TitlemapArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
    /// Start the HTTP API server
    Serve(serve::ServeArgs),
}

/// Application context with the engine over SQLite storage
pub struct AppContext {
    pub engine: KinshipEngine<SqliteStorage>,
    pub config: Config,
    default_family: Option<String>,
}

impl AppContext {
    pub fn new(cli: &Cli, config: Config) -> anyhow::Result<Self> {
        let data_dir = cli
            .data_dir
            .clone()
            .or_else(|| config.data_dir.clone())
            .unwrap_or_else(config::default_data_dir);
        std::fs::create_dir_all(&data_dir)?;

        let db_path = data_dir.join("familygraph.db");
        tracing::debug!("Using database at: {:?}", db_path);

        let engine_config = config.engine_config();
        engine_config.validate()?;
        let engine = KinshipEngine::new(Arc::new(SqliteStorage::open(&db_path)?))
            .with_config(engine_config);

        Ok(Self {
            engine,
            default_family: cli.family.clone().or_else(|| config.default_family.clone()),
            config,
        })
    }

    /// The family selected by `--family` or the config
    pub fn family(&self) -> anyhow::Result<FamilyId> {
        let Some(raw) = &self.default_family else {
            anyhow::bail!(
                "No family selected. Pass --family <ID> or run 'familygraph family use <ID>'"
            );
        };
        Ok(raw.parse()?)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting familygraph CLI");

    // These commands never touch the database
    match &cli.command {
        Commands::Config(args) => return commands::config::run(args),
        Commands::Completions(args) => return completions::run(args),
        _ => {}
    }

    let config = Config::load()?;
    let ctx = AppContext::new(&cli, config)?;

    match &cli.command {
        Commands::Family(args) => family::run(args, &cli, &ctx).await?,
        Commands::Person(args) => person::run(args, &cli, &ctx).await?,
        Commands::Relation(args) => relation::run(args, &cli, &ctx).await?,
        Commands::Title(args) => title::run(args, &cli, &ctx).await?,
        Commands::Titlemap(args) => titlemap::run(args, &cli, &ctx).await?,
        Commands::Serve(args) => serve::run(args, &ctx).await?,
        Commands::Config(_) | Commands::Completions(_) => {}
    }

    Ok(())
}
