use std::sync::Arc;

use clap::Parser;
use repolens_core::{providers::GitHubFetcher, Config, RepoFetcher};
use repolens_tui::App;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "repolens")]
#[command(version, about = "Terminal viewer for a GitHub user's repositories", long_about = None)]
struct Cli {
    /// Username to look up immediately on startup
    username: Option<String>,

    /// GitHub API token for a higher rate limit
    #[arg(long, env = "GITHUB_TOKEN")]
    token: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging - helps when things go sideways
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "repolens=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(%e, "could not load config, using defaults");
        Config::default()
    });

    let fetcher: Arc<dyn RepoFetcher> = Arc::new(GitHubFetcher::new(cli.token));

    let mut app = App::new(config.ui.theme);
    if let Some(username) = cli.username {
        app.username_input = username;
    }

    repolens_tui::run_tui(app, fetcher, config).await
}
