mod args;
mod error;
mod logic;
mod models;
mod utils;

use anyhow::Context;
use args::{Args, LogFormat};
use clap::Parser;
use models::event::IssueEvent;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};
use utils::fields::IssueTemplate;
use utils::labels::TriagePlan;
use utils::vocabulary::ControlledVocabulary;

use crate::logic::{BotState, http_client};

fn init_tracing(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Json => registry.with(fmt::layer().with_target(false).json()).init(),
        LogFormat::Text => registry.with(fmt::layer().with_target(false)).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format);

    let vocabulary = match &args.vocabulary {
        Some(path) => ControlledVocabulary::from_path(path)?,
        None => ControlledVocabulary::default(),
    };
    info!(gpus = vocabulary.gpus().len(), "Loaded GPU vocabulary");
    let template = IssueTemplate::default();

    let issue = IssueEvent::from_path(&args.event_path)?
        .into_triage_issue(args.repository.as_deref())
        .context("Invalid issue event")?;
    info!(
        issue = issue.number,
        repository = %format!("{}/{}", issue.owner, issue.repo),
        "Triaging issue"
    );

    let fields = template.extract(&issue.body);
    let plan = TriagePlan::build(&issue.title, &issue.repo, fields, &vocabulary);

    let state = BotState {
        client: http_client()?,
        token: args.token,
        api_url: args.api_url,
        graphql_url: args.graphql_url,
        organization: args.organization,
        project_number: args.project_number,
        issue,
        plan,
        dry_run: args.dry_run,
    };

    let report = state.run().await;
    info!(
        succeeded = report.succeeded.len(),
        failed = report.failed.len(),
        skipped = report.skipped.len(),
        "Triage finished"
    );

    if args.strict && report.has_failures() {
        anyhow::bail!("Steps failed: {}", report.failed.join(", "));
    }
    Ok(())
}
