/// Sona Console - chat-style playback orchestrator on stdin/stdout
use clap::{Parser, Subcommand};
use sona_catalog::YoutubeCatalog;
use sona_console::{
    config::SonaConfig,
    console::{parse_line, Input, Speaker, HELP},
    simulated::{ConsoleMessenger, SimulatedStreams, SimulatedTransport},
};
use sona_core::{Catalog, CommunityId};
use sona_playback::{Collaborators, PlaybackError, SessionRegistry};
use sona_storage::JsonRankRepository;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sona-console")]
#[command(about = "Sona playback orchestrator driven from the terminal", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "SONA_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read commands from stdin and play them on a simulated voice channel
    Run {
        /// Community to run commands against
        #[arg(long)]
        community: Option<String>,

        /// Simulated playback speed factor
        #[arg(long)]
        speed: Option<f64>,
    },
    /// Print a community's stored play counts
    Ranks {
        /// Community whose counts to print
        community: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sona=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = SonaConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run { community, speed } => {
            if let Some(community) = community {
                config.console.community = community;
            }
            if let Some(speed) = speed {
                config.console.speed = speed;
            }
            run(config).await?;
        }
        Commands::Ranks { community } => {
            print_ranks(&config, &community).await?;
        }
    }

    Ok(())
}

async fn run(config: SonaConfig) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!("Starting Sona console");
    tracing::info!("Community: {}", config.console.community);
    tracing::info!("Speed: {}x", config.console.speed);

    let ranks = JsonRankRepository::new(&config.storage.rank_root, &config.storage.rank_prefix);
    ranks.initialize().await?;
    tracing::info!("Rank storage at {}", ranks.root().display());

    let catalog: Arc<dyn Catalog> = Arc::new(YoutubeCatalog::new(config.youtube())?);
    let transport = Arc::new(SimulatedTransport::new(config.console.speed));

    let deps = Collaborators {
        catalog: Arc::clone(&catalog),
        transport: transport.clone(),
        streams: Arc::new(SimulatedStreams::new(catalog)),
        ranks: Arc::new(ranks),
        messenger: Arc::new(ConsoleMessenger::new()),
    };
    let registry = SessionRegistry::new(config.playback.clone(), deps);
    let community = CommunityId::new(config.console.community.clone());
    let mut speaker = Speaker::new(config.console.user.clone());

    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        };
        let Some(line) = line else {
            break;
        };

        let input = match parse_line(&line, &mut speaker) {
            Ok(Some(input)) => input,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match input {
            Input::Command(command) => {
                let name = command.name();
                match registry.session(&community).execute(command).await {
                    Ok(outcome) => tracing::debug!(command = name, ?outcome, "Command done"),
                    // Already answered in chat
                    Err(PlaybackError::UserInput(_)) => {}
                    Err(e) => tracing::error!(command = name, error = %e, "Command failed"),
                }
            }
            Input::Presence(in_voice) => {
                speaker.set_in_voice(in_voice);
                transport.set_listeners(usize::from(in_voice));
                println!(
                    "{}",
                    if in_voice {
                        "You joined the voice channel"
                    } else {
                        "You left the voice channel"
                    }
                );
            }
            Input::Help => println!("{}", HELP),
            Input::Quit => break,
        }
    }

    registry.shutdown().await;
    tracing::info!("Sona console stopped");
    Ok(())
}

async fn print_ranks(config: &SonaConfig, community: &str) -> anyhow::Result<()> {
    let ranks = JsonRankRepository::new(&config.storage.rank_root, &config.storage.rank_prefix);
    let counts = ranks.read(&CommunityId::new(community)).await?;

    let mut entries: Vec<(&String, &u64)> = counts.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    println!("Play counts for {}:", community);
    for (id, count) in entries {
        println!("  {:>5}  {}", count, id);
    }

    Ok(())
}
