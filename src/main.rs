use arctic_client::ArcticShiftClient;
use clap::Parser;
use llm_interface::OpenAiVoteCaster;
use pipeline::{LogProgress, RunConfig, SubredditFinder};
use std::path::PathBuf;
use subscout_core::{CoreError, ErrorExt};

const USER_AGENT: &str = concat!("subscout/", env!("CARGO_PKG_VERSION"));

/// Discover and label subreddits relevant to a research question.
#[derive(Debug, Parser)]
#[command(name = "subscout", version, about)]
struct Args {
    /// Path to the TOML run configuration
    #[arg(long, default_value = "subscout.toml")]
    config: PathBuf,

    /// Override the configured report output path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), CoreError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting Subscout - subreddit discovery");

    if let Err(e) = run(Args::parse()).await {
        e.log_error();
        eprintln!("{}", e.user_friendly_message());
        return Err(e);
    }

    Ok(())
}

async fn run(args: Args) -> Result<(), CoreError> {
    let mut config = RunConfig::load(&args.config)?;
    if let Some(output) = args.output {
        config.output_path = output;
    }

    let client = ArcticShiftClient::new(USER_AGENT.to_string())?;
    let caster = OpenAiVoteCaster::from_env(config.model.clone())?;
    let finder = SubredditFinder::new(config)?;

    finder.run(&client, &caster, &LogProgress).await
}
