/// Serenade - landing page music and content
use clap::{Parser, Subcommand};
use serenade::{config::SiteConfig, session, SessionOptions};
use serenade_playback::{MemoryPreferenceStore, PlaybackEngine};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "serenade")]
#[command(about = "Landing page playback engine and content tools", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "SERENADE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted visit against simulated audio outputs
    Play {
        /// How long the visit lasts, in seconds
        #[arg(short, long, default_value_t = 12)]
        seconds: u64,
        /// Refuse autoplay until the scripted first click
        #[arg(short, long)]
        blocked: bool,
        /// Pretend the visitor is on a touch device
        #[arg(long)]
        touch: bool,
        /// Pretend the visitor asked for reduced motion
        #[arg(long)]
        reduced_motion: bool,
    },
    /// Render the polaroid cluster from a photo manifest
    Photos {
        /// Manifest path (defaults to the configured one)
        path: Option<PathBuf>,
    },
    /// List the messages from a message manifest
    Messages {
        /// Manifest path (defaults to the configured one)
        path: Option<PathBuf>,
    },
    /// Show the configured playlist
    Tracks,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "serenade=info,serenade_playback=info,serenade_content=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = SiteConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Play {
            seconds,
            blocked,
            touch,
            reduced_motion,
        } => {
            play(&config, seconds, blocked, touch, reduced_motion).await?;
        }
        Commands::Photos { path } => {
            let path = path.unwrap_or_else(|| config.content.photos_path.clone());
            let (count, html) = session::render_photo_file(&path)?;
            tracing::info!("Loaded {} photo frames from {:?}", count, path);
            println!("{}", html);
        }
        Commands::Messages { path } => {
            let path = path.unwrap_or_else(|| config.content.messages_path.clone());
            let messages = session::read_message_file(&path)?;
            if messages.is_empty() {
                println!("{}", serenade_content::carousel::PLACEHOLDER_TEXT);
            }
            for message in messages {
                let date = message.display_date().unwrap_or_default();
                println!("{} - {} {}", message.text, message.from, date);
            }
        }
        Commands::Tracks => {
            list_tracks(&config)?;
        }
    }

    Ok(())
}

async fn play(
    config: &SiteConfig,
    seconds: u64,
    blocked: bool,
    touch: bool,
    reduced_motion: bool,
) -> anyhow::Result<()> {
    tracing::info!("Starting scripted visit ({}s)", seconds);

    let options = SessionOptions {
        duration: Duration::from_secs(seconds),
        autoplay_blocked: blocked,
        device: serenade_content::DeviceProfile {
            prefers_reduced_motion: reduced_motion,
            touch,
        },
        ..SessionOptions::default()
    };

    let summary = session::run_session(config, options).await?;

    println!("Now showing: {} - {}", summary.title, summary.artist);
    println!(
        "Track {} | playing: {} | volume: {}",
        summary.final_index, summary.playing, summary.volume
    );
    println!(
        "Photos: {} | messages: {} (showing {}) | parallax: {}",
        summary.photos, summary.messages, summary.carousel_index, summary.parallax
    );
    for event in &summary.events {
        println!("  {}", serde_json::to_string(event)?);
    }

    Ok(())
}

fn list_tracks(config: &SiteConfig) -> anyhow::Result<()> {
    // Preferences are not touched when only listing
    let engine = PlaybackEngine::new(
        config.playlist()?,
        config.playback_config(),
        Box::new(serenade::SimulatedOutputFactory::new(
            serenade::AutoplayGate::new(false),
        )),
        Box::new(MemoryPreferenceStore::new()),
    );

    println!("Tracks:");
    for entry in engine.track_list() {
        let marker = if entry.active { '>' } else { ' ' };
        println!("  {} {} {}", marker, entry.index + 1, entry.title);
    }

    Ok(())
}
