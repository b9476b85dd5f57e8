//! Execution of `kubedeck` subcommands against a cluster repository
//!
//! Commands only orchestrate: they stamp audit fields, merge edits, and
//! print JSON. All storage goes through [`ClusterRepository`].

use std::io::Write;

use anyhow::{Context, bail};
use chrono::{NaiveDateTime, Utc};
use serde::Serialize;
use tracing::info;

use kubedeck_persistence::{AuditLog, Cluster, ClusterRepository};

use crate::cli::{AddArgs, Command, GetArgs, ListArgs, RemoveArgs, StatusArgs, UpdateArgs};

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

fn print_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Run one subcommand, writing its result to `out`
pub async fn execute<W: Write>(
    repo: &dyn ClusterRepository,
    command: Command,
    out: &mut W,
) -> anyhow::Result<()> {
    match command {
        Command::Add(args) => add(repo, args, out).await,
        Command::Get(args) => get(repo, args, out).await,
        Command::List(args) => list(repo, args, out).await,
        Command::Update(args) => update(repo, args, out).await,
        Command::Status(args) => status(repo, args, out).await,
        Command::Remove(args) => remove(repo, args, out).await,
    }
}

async fn add<W: Write>(
    repo: &dyn ClusterRepository,
    args: AddArgs,
    out: &mut W,
) -> anyhow::Result<()> {
    let mut cluster = Cluster::new(args.name, args.server_url)
        .with_config(args.entries)
        .with_audit_log(AuditLog::created_by(args.user_id, now()));
    cluster.k8s_version = args.k8s_version;

    repo.save(&mut cluster).await?;
    info!(cluster_id = ?cluster.id, cluster_name = %cluster.cluster_name, "Registered cluster");
    print_json(out, &cluster)
}

async fn get<W: Write>(
    repo: &dyn ClusterRepository,
    args: GetArgs,
    out: &mut W,
) -> anyhow::Result<()> {
    let found = match (args.id, args.name) {
        (Some(id), _) => repo.find_by_id(id).await?,
        (None, Some(name)) => repo.find_one(&name).await?,
        (None, None) => bail!("either --name or --id is required"),
    };
    let cluster = found.context("cluster not found")?;
    print_json(out, &cluster)
}

async fn list<W: Write>(
    repo: &dyn ClusterRepository,
    args: ListArgs,
    out: &mut W,
) -> anyhow::Result<()> {
    let clusters = if !args.ids.is_empty() {
        repo.find_by_ids(&args.ids).await?
    } else if args.all {
        repo.find_all_with_inactive().await?
    } else {
        repo.find_all().await?
    };
    print_json(out, &clusters)
}

async fn update<W: Write>(
    repo: &dyn ClusterRepository,
    args: UpdateArgs,
    out: &mut W,
) -> anyhow::Result<()> {
    let mut cluster = repo
        .find_by_id(args.id)
        .await?
        .with_context(|| format!("cluster {} not found", args.id))?;

    if let Some(server_url) = args.server_url {
        cluster.server_url = server_url;
    }
    if let Some(k8s_version) = args.k8s_version {
        cluster.k8s_version = k8s_version;
    }
    for key in &args.unset {
        cluster.config.remove(key);
    }
    cluster.config.extend(args.entries);
    cluster.audit_log.touch(args.user_id, now());

    repo.update(&cluster).await?;
    print_json(out, &cluster)
}

async fn status<W: Write>(
    repo: &dyn ClusterRepository,
    args: StatusArgs,
    out: &mut W,
) -> anyhow::Result<()> {
    if repo.find_by_id(args.id).await?.is_none() {
        bail!("cluster {} not found", args.id);
    }
    repo.update_cluster_connection_status(args.id, &args.error).await?;
    print_json(out, &serde_json::json!({ "id": args.id, "errorInConnecting": args.error }))
}

async fn remove<W: Write>(
    repo: &dyn ClusterRepository,
    args: RemoveArgs,
    out: &mut W,
) -> anyhow::Result<()> {
    if args.hard {
        // Soft-deleted clusters are invisible to lookups, so delete by id
        let cluster = Cluster {
            id: Some(args.id),
            ..Default::default()
        };
        repo.delete(&cluster).await?;
        info!(cluster_id = args.id, "Deleted cluster");
        return print_json(out, &serde_json::json!({ "id": args.id, "deleted": "hard" }));
    }

    let mut cluster = repo
        .find_by_id(args.id)
        .await?
        .with_context(|| format!("cluster {} not found", args.id))?;
    cluster.audit_log.touch(args.user_id, now());
    repo.mark_cluster_deleted(&mut cluster).await?;
    info!(cluster_id = args.id, "Marked cluster deleted");
    print_json(out, &serde_json::json!({ "id": args.id, "deleted": "soft" }))
}
