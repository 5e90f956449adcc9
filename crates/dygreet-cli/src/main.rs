use clap::{Parser, Subcommand};

mod artifacts;
mod cookie;
mod logging;
mod pipeline;
mod report;
mod status;
mod videos;

#[derive(Debug, Parser)]
#[command(name = "dygreet")]
#[command(about = "Douyin profile crawler and AI greeting generator")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the full pipeline over the configured target list.
    Run {
        /// Crawl only; skip the greeting stage even when Coze is configured.
        #[arg(long)]
        skip_ai: bool,
        /// Probe each video's byte size (slow; one extra request per video).
        #[arg(long)]
        probe_sizes: bool,
        /// Stop listing after this many videos per target (0 = unlimited).
        #[arg(long)]
        max_videos: Option<usize>,
    },
    /// Acquire a Douyin cookie from an installed browser and persist it.
    Cookie {
        /// Try only this browser instead of scanning all of them.
        #[arg(long)]
        browser: Option<String>,
    },
    /// List one user's videos without generating a greeting.
    Videos {
        /// Profile, short-link, or share URL.
        url: String,
    },
    /// Show configuration, credential state, and available browsers.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let mut config = dygreet_core::load_app_config_from_env()?;
    logging::init(&config)?;

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Run {
            skip_ai,
            probe_sizes,
            max_videos,
        }) => {
            if probe_sizes {
                config.probe_sizes = true;
            }
            if let Some(cap) = max_videos {
                config.max_videos = cap;
            }
            pipeline::execute(&config, skip_ai).await
        }
        None => pipeline::execute(&config, false).await,
        Some(Commands::Cookie { browser }) => cookie::execute(&config, browser.as_deref()),
        Some(Commands::Videos { url }) => videos::execute(&config, &url).await,
        Some(Commands::Status) => status::execute(&config),
    }
}
