//! Command surface over the pets provider.
//!
//! # Responsibility
//! - Parse CLI input into provider requests.
//! - Print results as stable, line-oriented output.
//!
//! # Invariants
//! - Every command goes through `PetProvider`; no direct SQL.
//! - Output is written to the supplied writer so it can be asserted in tests.

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use petstore_core::{
    default_log_level, init_logging, Address, Column, DatabaseLocation, Gender, PetProvider,
    PetRepository, PetValues, SortOrder, SqlitePetRepository, StoreConfig,
};
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "pets")]
#[command(about = "Manage the local pets store")]
pub struct Cli {
    /// SQLite database file (default `pets.db`).
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Use a throwaway in-memory database.
    #[arg(long, conflicts_with = "db")]
    pub memory: bool,

    /// Optional JSON store config; `--db`/`--memory` override its location.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub authority: Option<String>,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long)]
    pub log_dir: Option<String>,

    /// Log level filter; only meaningful together with `--log-dir`.
    #[arg(long, requires = "log_dir")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print pets as JSON lines.
    List(ListArgs),
    /// Add a pet and print its address.
    Add(AddArgs),
    /// Update fields of one pet and print the number of rows changed.
    Update(UpdateArgs),
    /// Remove one pet or all pets and print the number of rows removed.
    Remove(RemoveArgs),
    /// Print the resource type of the collection or one pet.
    Type(TargetArgs),
}

#[derive(Debug, Args)]
pub struct TargetArgs {
    #[arg(long)]
    pub id: Option<i64>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Comma-separated columns, e.g. `name,weight`.
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,

    #[arg(long)]
    pub sort: Option<String>,

    #[arg(long, requires = "sort")]
    pub desc: bool,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub breed: Option<String>,
    /// 0 = unknown, 1 = male, 2 = female.
    #[arg(long)]
    pub gender: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    pub weight: Option<i64>,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    #[arg(long)]
    pub id: i64,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub breed: Option<String>,
    #[arg(long)]
    pub gender: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    pub weight: Option<i64>,
}

#[derive(Debug, Args)]
pub struct RemoveArgs {
    #[arg(long, conflicts_with = "all", required_unless_present = "all")]
    pub id: Option<i64>,
    #[arg(long)]
    pub all: bool,
}

/// Parses process arguments and runs the selected command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(cli, &mut out)
}

/// Runs one parsed command, writing results to `out`.
pub fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).context("failed to initialize logging")?;
    }

    let config = load_config(&cli)?;
    let conn = config
        .open_database()
        .with_context(|| format!("failed to open pets database {:?}", config.database))?;
    let repo = SqlitePetRepository::try_new(&conn).context("pets database is not ready")?;
    let provider = PetProvider::new(&config, repo);
    info!("event=cli_command module=cli status=start");

    match cli.command {
        Command::List(args) => {
            let address = target_address(&provider, &args.target);
            let projection = parse_columns(&args.columns)?;
            let order = match args.sort.as_deref() {
                Some(raw) => {
                    let column = parse_column(raw)?;
                    Some(if args.desc {
                        SortOrder::desc(column)
                    } else {
                        SortOrder::asc(column)
                    })
                }
                None => None,
            };
            for row in provider.list(&address, projection, order)? {
                writeln!(out, "{}", serde_json::to_string(&row)?)?;
            }
        }
        Command::Add(args) => {
            let mut values = PetValues::new().name(args.name);
            values.breed = args.breed;
            values.gender = args.gender.map(parse_gender).transpose()?;
            values.weight = args.weight;
            let address = provider.create(&values)?;
            writeln!(out, "{address}")?;
        }
        Command::Update(args) => {
            let values = PetValues {
                name: args.name,
                breed: args.breed,
                gender: args.gender.map(parse_gender).transpose()?,
                weight: args.weight,
            };
            let changed = provider.replace(&provider.item_address(args.id), &values)?;
            writeln!(out, "{changed}")?;
        }
        Command::Remove(args) => {
            let address = match args.id {
                Some(id) => provider.item_address(id),
                None => provider.collection_address(),
            };
            let removed = provider.remove(&address)?;
            writeln!(out, "{removed}")?;
        }
        Command::Type(args) => {
            let address = target_address(&provider, &args);
            writeln!(out, "{}", provider.type_name(&address)?)?;
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<StoreConfig> {
    let mut config = match cli.config.as_deref() {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            StoreConfig::from_json_str(&raw)?
        }
        None => StoreConfig::default(),
    };

    if cli.memory {
        config.database = DatabaseLocation::InMemory;
    } else if let Some(path) = &cli.db {
        config.database = DatabaseLocation::File { path: path.clone() };
    }

    if let Some(authority) = &cli.authority {
        config.authority = authority.clone();
    }
    config.validate()?;
    Ok(config)
}

fn target_address<R: PetRepository>(
    provider: &PetProvider<'_, R>,
    target: &TargetArgs,
) -> Address {
    match target.id {
        Some(id) => provider.item_address(id),
        None => provider.collection_address(),
    }
}

fn parse_columns(raw: &[String]) -> Result<Option<Vec<Column>>> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.iter()
        .map(|value| parse_column(value))
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

fn parse_column(raw: &str) -> Result<Column> {
    Column::parse(raw).ok_or_else(|| anyhow!("unknown column `{raw}`"))
}

fn parse_gender(raw: i64) -> Result<Gender> {
    Ok(Gender::try_from(raw)?)
}
