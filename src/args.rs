use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "GitHub Issue Triage Bot")]
pub struct Args {
    #[arg(long, env = "GITHUB_ORGANIZATION", required = true)]
    pub organization: String,

    #[arg(long, env = "PROJECT_NUMBER", required = true)]
    pub project_number: u64,

    #[arg(long, env = "GITHUB_TOKEN", required = true, hide_env_values = true)]
    pub token: String,

    #[arg(long, env = "GITHUB_EVENT_PATH", required = true)]
    pub event_path: PathBuf,

    /// `owner/repo` of the issue; the event payload is used when absent.
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    pub api_url: String,

    #[arg(
        long,
        env = "GITHUB_GRAPHQL_URL",
        default_value = "https://api.github.com/graphql"
    )]
    pub graphql_url: String,

    /// JSON file replacing the built-in GPU and ROCm vocabulary.
    #[arg(long, env = "TRIAGE_VOCABULARY")]
    pub vocabulary: Option<PathBuf>,

    /// Log the labels and board values without calling the API.
    #[arg(long)]
    pub dry_run: bool,

    /// Exit with failure if any API step failed.
    #[arg(long)]
    pub strict: bool,

    #[arg(long, env = "TRIAGE_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}
