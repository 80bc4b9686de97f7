mod args;
pub mod export;

pub use args::{Args, Command, Seeds};

use collector::api::{Client, RepoListing, Result};
use collector::{ExportBatch, ExportKind, PaginatedCollector};
use export::Exporter;
use github_client::{GithubClient, GithubClientBuilder};
use log::{error, info};
use std::path::PathBuf;
use std::time::Instant;

/// Outcome of a whole run.
#[derive(Debug, Default)]
pub struct Report {
    pub exported: Vec<PathBuf>,
    pub failed: Vec<String>,
}

pub async fn export(args: Args) -> Result<Report> {
    let started = Instant::now();

    let mut client = GithubClientBuilder::default().with_github_url(&args.api_url);
    if let Some(token) = args.api_token {
        client = client.try_with_token(token)?;
    }
    let client = client.build()?;

    let mut seeds = args.command.seeds().read()?;
    if seeds.is_empty() {
        seeds.push(client.authenticated_login().await?);
    }

    let mut collector = PaginatedCollector::new(client, args.per_page);
    let exporter = Exporter::new(args.output_dir);
    let mut report = Report::default();
    for seed in seeds {
        info!("Exporting {} of {}", kind(&args.command), seed);
        match export_seed(&mut collector, &exporter, &args.command, &seed).await {
            Ok(path) => report.exported.push(path),
            Err(err) => {
                error!("Failed to export {} of {}: {}", kind(&args.command), seed, err);
                report.failed.push(seed);
            }
        }
    }

    if let Some(quota) = collector.client().last_observed_quota().await {
        info!("{} of {} API calls remaining", quota.remaining, quota.limit);
    }
    info!("Runtime : {:.2} seconds", started.elapsed().as_secs_f64());
    Ok(report)
}

async fn export_seed(
    collector: &mut PaginatedCollector<GithubClient>,
    exporter: &Exporter,
    command: &Command,
    seed: &str,
) -> Result<PathBuf> {
    let kind = kind(command);
    let collection = match command {
        Command::Following { extended, .. } => collector.collect(seed, *extended).await?,
        Command::Starred { .. } => collector.collect_repos(seed, RepoListing::Starred).await?,
        Command::Repos { .. } => collector.collect_repos(seed, RepoListing::Owned).await?,
    };
    let batch = ExportBatch::new(collection.login, kind, collection.records);
    let path = exporter.write(&batch)?;
    if kind == ExportKind::Repos {
        // The seed's own file is already written, a broken aggregate does not undo it.
        if let Err(err) = exporter.append_complete(&batch) {
            error!("Failed to append repos of {} to the complete export: {}", batch.account, err);
        }
    }
    Ok(path)
}

fn kind(command: &Command) -> ExportKind {
    match command {
        Command::Following { extended: false, .. } => ExportKind::Following,
        Command::Following { extended: true, .. } => ExportKind::FollowingExtended,
        Command::Starred { .. } => ExportKind::Starred,
        Command::Repos { .. } => ExportKind::Repos,
    }
}
