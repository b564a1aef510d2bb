//! ExPlayer command-line player
//!
//! Every invocation restores the last session, applies one command and
//! leaves the updated session behind for the next run.

use anyhow::Context;
use clap::{Parser, Subcommand};
use explayer_core::TrackId;
use explayer_cli::{display, files, PlayerSettings};
use explayer_playback::{HeadlessOutput, Player};
use explayer_storage::{
    create_pool, run_migrations, FileKeyValueStore, SessionCache, SqliteTrackStore,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "explayer")]
#[command(about = "Local music player with a persistent playlist", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "EXPLAYER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import audio files into the playlist
    Import {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// List the playlist
    List,
    /// List favorite tracks
    Favorites,
    /// Toggle a track's favorite flag
    Favorite { id: String },
    /// Remove a track from the playlist and the library
    Remove { id: String },
    /// Show transport state
    Status,
    /// Start playback, optionally at a playlist index
    Play { index: Option<usize> },
    /// Pause playback
    Pause,
    /// Skip to the next track
    Next,
    /// Go back to the previous track
    Previous,
    /// Toggle shuffle
    Shuffle,
    /// Cycle repeat mode (none, one, all)
    Repeat,
    /// Seek to a fraction of the current track (0.0-1.0)
    Seek { fraction: f64 },
    /// Let playback run for a number of seconds
    Advance { seconds: f64 },
    /// Set volume in percent
    Volume {
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        percent: u8,
    },
    /// Toggle mute
    Mute,
    /// Forget the cached session, keeping imported tracks
    Reset,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "explayer=info,explayer_playback=info,explayer_storage=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let settings = PlayerSettings::load(cli.config.as_deref())?;
    settings.validate()?;

    let mut player = open_player(&settings).await?;
    let outcome = run(&mut player, cli.command).await;
    player.flush();

    for event in player.drain_events() {
        tracing::debug!(?event, "Player event");
    }

    outcome
}

async fn open_player(settings: &PlayerSettings) -> anyhow::Result<Player> {
    if let Some(path) = settings.storage.database_path() {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    if let Some(parent) = settings.storage.session_file.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let pool = create_pool(&settings.storage.database_url)
        .await
        .context("Failed to open track database")?;
    run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    let mut player = Player::new(
        Arc::new(SqliteTrackStore::new(pool)),
        SessionCache::new(FileKeyValueStore::open(&settings.storage.session_file)),
        Box::new(HeadlessOutput::new()),
        settings.player_config(),
    );
    player.restore().await.context("Failed to restore session")?;

    Ok(player)
}

async fn run(player: &mut Player, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Import { paths } => {
            let mut intake = Vec::with_capacity(paths.len());
            for path in &paths {
                match files::read_import_file(path).await {
                    Ok(file) => intake.push(file),
                    Err(e) => eprintln!("Skipping {}: {e}", path.display()),
                }
            }

            let summary = player.import_files(intake).await;
            println!("Imported {} track(s)", summary.imported.len());
            if summary.skipped_non_audio > 0 {
                println!("Skipped {} non-audio file(s)", summary.skipped_non_audio);
            }
            for failure in &summary.failed {
                eprintln!("Failed to import {}: {}", failure.name, failure.message);
            }
        }
        Commands::List => print!("{}", display::playlist(player)),
        Commands::Favorites => print!("{}", display::favorites(player)),
        Commands::Favorite { id } => match player.toggle_favorite(&TrackId::new(id.as_str())) {
            Some(true) => println!("Added {id} to favorites"),
            Some(false) => println!("Removed {id} from favorites"),
            None => anyhow::bail!("No track with id {id}"),
        },
        Commands::Remove { id } => {
            if player.remove(&TrackId::new(id.as_str())).await? {
                println!("Removed {id}");
            } else {
                anyhow::bail!("No track with id {id}");
            }
        }
        Commands::Status => print!("{}", display::status(player)),
        Commands::Play { index } => {
            match index {
                Some(index) => player.play_track_at(index).await?,
                None if !player.transport().is_playing() => player.toggle_play().await?,
                None => {}
            }
            print!("{}", display::status(player));
        }
        Commands::Pause => {
            if player.transport().is_playing() {
                player.toggle_play().await?;
            }
            print!("{}", display::status(player));
        }
        Commands::Next => {
            player.play_next().await?;
            print!("{}", display::status(player));
        }
        Commands::Previous => {
            player.play_previous().await?;
            print!("{}", display::status(player));
        }
        Commands::Shuffle => {
            let enabled = player.toggle_shuffle();
            println!("Shuffle {}", if enabled { "on" } else { "off" });
        }
        Commands::Repeat => println!("Repeat {}", player.toggle_repeat()),
        Commands::Seek { fraction } => {
            if !player.seek_to(fraction)? {
                println!("Duration unknown, nothing to seek");
            }
            print!("{}", display::status(player));
        }
        Commands::Advance { seconds } => {
            let elapsed = Duration::try_from_secs_f64(seconds)
                .context("Seconds must be a non-negative number")?;
            player.tick(elapsed).await?;
            print!("{}", display::status(player));
        }
        Commands::Volume { percent } => {
            player.set_volume(percent);
            println!("Volume {percent}%");
        }
        Commands::Mute => {
            player.toggle_mute();
            let muted = player.transport().volume().is_muted();
            println!("{}", if muted { "Muted" } else { "Unmuted" });
        }
        Commands::Reset => {
            player.reset_session();
            println!("Session cleared");
        }
    }

    Ok(())
}
