use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "consign",
    about = "Consign — user and consignment records over a key-value ledger",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Ledger file holding all records
    #[arg(long, global = true, default_value = "consign.json")]
    pub store: PathBuf,

    /// TOML file defining entity schemas
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Entity schema to operate on (defaults to the configured default)
    #[arg(short, long, global = true)]
    pub schema: Option<String>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the index record, optionally with a first entity
    Init(InitArgs),
    /// Register a new entity
    Create(CreateArgs),
    /// Change one field of an existing entity
    Update(UpdateArgs),
    /// Show one entity
    Get(GetArgs),
    /// Show every indexed entity in creation order
    List(ListArgs),
    /// Check the index against the records it lists
    Audit(AuditArgs),
    /// Show the configured schemas
    Schemas(SchemasArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Seed entity fields as name=value
    #[arg(value_parser = parse_field)]
    pub fields: Vec<(String, String)>,
}

#[derive(Args)]
pub struct CreateArgs {
    /// Entity fields as name=value
    #[arg(required = true, value_parser = parse_field)]
    pub fields: Vec<(String, String)>,
}

#[derive(Args)]
pub struct UpdateArgs {
    pub id: String,
    pub field: String,
    pub value: String,
}

#[derive(Args)]
pub struct GetArgs {
    pub id: String,
}

#[derive(Args)]
pub struct ListArgs {
    /// Print identifiers only
    #[arg(long)]
    pub ids: bool,
}

#[derive(Args)]
pub struct AuditArgs {}

#[derive(Args)]
pub struct SchemasArgs {}

/// Parse a `name=value` argument. The value may itself contain `=`.
pub fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got {raw:?}"))?;
    if name.is_empty() {
        return Err(format!("missing field name in {raw:?}"));
    }
    Ok((name.to_string(), value.to_string()))
}
