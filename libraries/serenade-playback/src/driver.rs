//! Async player task
//!
//! Runs a [`PlaybackEngine`] on its own tokio task. UI handlers send
//! [`PlayerCommand`]s through a [`PlayerHandle`]; a frame interval drives
//! `tick`; events drained after each step are forwarded to the receiver.
//! Shutdown is cooperative through a `CancellationToken`.

use crate::{engine::PlaybackEngine, error::PlaybackError, error::Result, events::PlayerEvent};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Default frame interval (~60 fps)
const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;

/// Commands accepted by the player task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCommand {
    /// Load the first track and attempt autoplay
    Start,
    Play,
    Pause,
    Toggle,
    Next,
    /// Track list click
    Select(usize),
    /// Volume slider input (0-100)
    SetVolume(u8),
    /// The active output finished its track
    TrackEnded,
    /// Any click/keypress/touch on the page
    UserInteraction,
}

/// Configuration for the player task
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Time between two frames
    pub frame_interval: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(DEFAULT_FRAME_INTERVAL_MS),
        }
    }
}

/// Cloneable handle for sending commands to the player task
#[derive(Debug, Clone)]
pub struct PlayerHandle {
    commands: mpsc::UnboundedSender<PlayerCommand>,
    cancel: CancellationToken,
}

impl PlayerHandle {
    pub fn send(&self, command: PlayerCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| PlaybackError::PlayerGone)
    }

    pub fn start(&self) -> Result<()> {
        self.send(PlayerCommand::Start)
    }

    pub fn play(&self) -> Result<()> {
        self.send(PlayerCommand::Play)
    }

    pub fn pause(&self) -> Result<()> {
        self.send(PlayerCommand::Pause)
    }

    pub fn toggle(&self) -> Result<()> {
        self.send(PlayerCommand::Toggle)
    }

    pub fn next(&self) -> Result<()> {
        self.send(PlayerCommand::Next)
    }

    pub fn select(&self, index: usize) -> Result<()> {
        self.send(PlayerCommand::Select(index))
    }

    pub fn set_volume(&self, level: u8) -> Result<()> {
        self.send(PlayerCommand::SetVolume(level))
    }

    pub fn track_ended(&self) -> Result<()> {
        self.send(PlayerCommand::TrackEnded)
    }

    pub fn user_interaction(&self) -> Result<()> {
        self.send(PlayerCommand::UserInteraction)
    }

    /// Ask the task to stop after the current step
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// A running player task
pub struct PlayerTask {
    pub handle: PlayerHandle,
    pub events: mpsc::UnboundedReceiver<PlayerEvent>,
    /// Resolves to the engine once the task stops
    pub join: JoinHandle<PlaybackEngine>,
}

/// Spawn the engine onto the current tokio runtime
pub fn spawn_player(engine: PlaybackEngine, config: DriverConfig) -> PlayerTask {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();

    let join = tokio::spawn(run_player(
        engine,
        config,
        command_rx,
        event_tx,
        cancel.clone(),
    ));

    PlayerTask {
        handle: PlayerHandle {
            commands: command_tx,
            cancel,
        },
        events: event_rx,
        join,
    }
}

async fn run_player(
    mut engine: PlaybackEngine,
    config: DriverConfig,
    mut commands: mpsc::UnboundedReceiver<PlayerCommand>,
    events: mpsc::UnboundedSender<PlayerEvent>,
    cancel: CancellationToken,
) -> PlaybackEngine {
    let mut frames = tokio::time::interval(config.frame_interval);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!("Player task started");

    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                debug!("Player task cancelled");
                break;
            }

            command = commands.recv() => match command {
                Some(command) => apply_command(&mut engine, command),
                None => {
                    debug!("All player handles dropped");
                    break;
                }
            },

            _ = frames.tick() => engine.tick(now()),
        }

        for event in engine.drain_events() {
            // Nobody listening is fine; the engine keeps running
            let _ = events.send(event);
        }
    }

    info!("Player task stopped");
    engine
}

fn apply_command(engine: &mut PlaybackEngine, command: PlayerCommand) {
    let now = now();
    debug!("Player command: {:?}", command);

    let result = match command {
        PlayerCommand::Start => {
            engine.start(now);
            Ok(())
        }
        PlayerCommand::Play => engine.play(now),
        PlayerCommand::Pause => {
            engine.pause(now);
            Ok(())
        }
        PlayerCommand::Toggle => engine.toggle(now),
        PlayerCommand::Next => {
            engine.next_track(now);
            Ok(())
        }
        PlayerCommand::Select(index) => engine.select_track(index, now),
        PlayerCommand::SetVolume(level) => {
            engine.set_volume(level, now);
            Ok(())
        }
        PlayerCommand::TrackEnded => {
            engine.on_track_ended(now);
            Ok(())
        }
        PlayerCommand::UserInteraction => {
            engine.on_user_interaction(now);
            Ok(())
        }
    };

    // Blocked playback is already reported through events
    if let Err(e) = result {
        debug!("Command did not complete: {}", e);
    }
}

/// Current time on the tokio clock (follows paused time in tests)
fn now() -> std::time::Instant {
    tokio::time::Instant::now().into_std()
}
