//! Command line arguments for the `kubedeck` binary

use clap::{ArgGroup, Args, Parser, Subcommand};

/// Manage cluster registrations in the local Kubedeck store
#[derive(Debug, Parser)]
#[command(name = "kubedeck", version, about)]
pub struct Cli {
    /// Configuration file (defaults to conf/application.yml when present)
    #[arg(short = 'c', long = "config", env = "KUBEDECK_CONFIG", global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register a new cluster
    Add(AddArgs),
    /// Show one active cluster
    Get(GetArgs),
    /// List clusters
    List(ListArgs),
    /// Change a registered cluster
    Update(UpdateArgs),
    /// Record the connection error of a cluster
    Status(StatusArgs),
    /// Remove a cluster (soft delete unless --hard)
    Remove(RemoveArgs),
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long = "server-url")]
    pub server_url: String,
    /// Config entry as KEY=VALUE, repeatable
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub entries: Vec<(String, String)>,
    #[arg(long = "k8s-version", default_value = "")]
    pub k8s_version: String,
    #[arg(long = "user-id", default_value_t = 1)]
    pub user_id: i32,
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("target").required(true).args(["name", "id"])))]
pub struct GetArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub id: Option<i32>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Include soft-deleted clusters
    #[arg(long, conflicts_with = "ids")]
    pub all: bool,
    /// Only these ids, comma separated
    #[arg(long, value_delimiter = ',')]
    pub ids: Vec<i32>,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    #[arg(long)]
    pub id: i32,
    #[arg(long = "server-url")]
    pub server_url: Option<String>,
    #[arg(long = "k8s-version")]
    pub k8s_version: Option<String>,
    /// Config entry to add or replace as KEY=VALUE, repeatable
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub entries: Vec<(String, String)>,
    /// Config key to remove, repeatable
    #[arg(long = "unset", value_name = "KEY")]
    pub unset: Vec<String>,
    #[arg(long = "user-id", default_value_t = 1)]
    pub user_id: i32,
}

#[derive(Debug, Args)]
pub struct StatusArgs {
    #[arg(long)]
    pub id: i32,
    /// Connection error text; empty clears it
    #[arg(long, default_value = "")]
    pub error: String,
}

#[derive(Debug, Args)]
pub struct RemoveArgs {
    #[arg(long)]
    pub id: i32,
    /// Physically delete the row instead of marking it inactive
    #[arg(long)]
    pub hard: bool,
    #[arg(long = "user-id", default_value_t = 1)]
    pub user_id: i32,
}

/// Parse a `KEY=VALUE` pair; the value may itself contain `=`
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("invalid KEY=VALUE: no `=` or empty key in `{}`", s)),
    }
}
