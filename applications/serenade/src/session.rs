/// Scripted landing-page session
///
/// Wires the playback driver and the page content together the way the
/// page does on load, then replays a short visitor script (click, volume,
/// skip, track end, carousel swipes) against simulated outputs.
use crate::config::SiteConfig;
use crate::error::Result;
use crate::output::{AutoplayGate, SimulatedOutputFactory};
use serenade_content::{
    init_parallax, load_messages_from_path, load_photo_frames_from_path, parse_messages_from_path,
    parse_photo_manifest_from_path, render_cluster, Carousel, DeviceProfile, Message,
    ParallaxConfig, ParallaxInitializer, TextBlockLayout, TrackLabel,
};
use serenade_playback::{
    spawn_player, JsonFilePreferenceStore, PlaybackEngine, PlaybackError, PlayerEvent,
    PlayerHandle,
};
use std::path::Path;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Visitor actions replayed by [`run_session`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitorAction {
    /// First click anywhere on the page
    Click,
    SetVolume(u8),
    Next,
    TrackEnded,
    Toggle,
    NextMessage,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// How long to run before pausing and shutting down
    pub duration: Duration,
    /// Refuse playback until the first click
    pub autoplay_blocked: bool,
    pub device: DeviceProfile,
    pub script: Vec<(Duration, VisitorAction)>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(12),
            autoplay_blocked: false,
            device: DeviceProfile::default(),
            script: default_script(),
        }
    }
}

/// Visitor clicks, nudges the volume, skips a song and browses messages
pub fn default_script() -> Vec<(Duration, VisitorAction)> {
    vec![
        (Duration::from_millis(1000), VisitorAction::Click),
        (Duration::from_millis(2500), VisitorAction::SetVolume(80)),
        (Duration::from_millis(3000), VisitorAction::NextMessage),
        (Duration::from_millis(4000), VisitorAction::Next),
        (Duration::from_millis(6000), VisitorAction::NextMessage),
        (Duration::from_millis(8000), VisitorAction::TrackEnded),
    ]
}

/// What the page looked like when the session ended
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub events: Vec<PlayerEvent>,
    pub final_index: usize,
    pub playing: bool,
    pub volume: u8,
    pub title: String,
    pub artist: String,
    pub photos: usize,
    pub messages: usize,
    pub carousel_index: usize,
    pub parallax: bool,
}

/// Parallax stand-in that logs the options it would pass on
#[derive(Debug, Default)]
pub struct LoggingParallax {
    pub last: Option<ParallaxConfig>,
}

impl ParallaxInitializer for LoggingParallax {
    fn init(&mut self, config: &ParallaxConfig) -> serenade_content::Result<()> {
        let options = serde_json::to_string(config)?;
        info!("Parallax options: {}", options);
        self.last = Some(config.clone());
        Ok(())
    }
}

/// Render the polaroid cluster for a manifest file
///
/// Unlike the page load, a broken or missing manifest is an error here.
pub fn render_photo_file(path: &Path) -> Result<(usize, String)> {
    let frames = parse_photo_manifest_from_path(path)?;
    Ok((frames.len(), render_cluster(&frames)))
}

/// Read a message manifest file, reporting failures
pub fn read_message_file(path: &Path) -> Result<Vec<Message>> {
    Ok(parse_messages_from_path(path)?)
}

/// Run one scripted visit and return the final page state
pub async fn run_session(config: &SiteConfig, options: SessionOptions) -> Result<SessionSummary> {
    config.validate()?;

    // Content first: none of it may block the player from starting
    let frames = load_photo_frames_from_path(&config.content.photos_path);
    let cluster = render_cluster(&frames);
    debug!("Rendered {} photo frames ({} bytes)", frames.len(), cluster.len());

    let messages = load_messages_from_path(&config.content.messages_path);
    let mut carousel = Carousel::new(messages, TextBlockLayout::default());

    let mut parallax = LoggingParallax::default();
    let parallax_running = init_parallax(Some(&mut parallax), options.device);

    let gate = AutoplayGate::new(!options.autoplay_blocked);
    let preferences = JsonFilePreferenceStore::open(&config.content.preferences_path)?;
    let engine = PlaybackEngine::new(
        config.playlist()?,
        config.playback_config(),
        Box::new(SimulatedOutputFactory::new(gate.clone())),
        Box::new(preferences),
    );

    let mut task = spawn_player(engine, config.driver_config());
    let handle = task.handle.clone();
    handle.start()?;

    let mut label = TrackLabel::default();
    let mut events = Vec::new();
    let mut script = options.script.clone();
    script.sort_by_key(|(at, _)| *at);
    let mut script = script.into_iter().peekable();

    let started = Instant::now();
    let mut frames_tick = tokio::time::interval(config.driver_config().frame_interval);
    frames_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    while started.elapsed() < options.duration {
        frames_tick.tick().await;
        let now = Instant::now().into_std();

        while let Some((_, action)) = script.next_if(|(at, _)| *at <= started.elapsed()) {
            perform(action, &handle, &gate, &mut carousel, now)?;
        }

        while let Ok(event) = task.events.try_recv() {
            observe(&event, &mut label, now);
            events.push(event);
        }

        label.tick(now);
        carousel.tick(now);
    }

    // Leave the page the way a visitor would: pause and let the fade finish
    handle.pause()?;
    let settle = config.playback_config().timings.pause_stop + config.driver_config().frame_interval;
    tokio::time::sleep(settle * 2).await;
    handle.shutdown();

    let engine = task.join.await.map_err(|e| {
        warn!("Player task ended abnormally: {}", e);
        PlaybackError::PlayerGone
    })?;

    let now = Instant::now().into_std();
    while let Ok(event) = task.events.try_recv() {
        observe(&event, &mut label, now);
        events.push(event);
    }
    label.tick(now + Duration::from_secs(1));

    info!(
        "Session finished on track {} ({} events)",
        engine.current_index(),
        events.len()
    );

    Ok(SessionSummary {
        events,
        final_index: engine.current_index(),
        playing: engine.is_playing(),
        volume: engine.volume().level(),
        title: label.title.text().to_string(),
        artist: label.artist.text().to_string(),
        photos: frames.len(),
        messages: carousel.message_count(),
        carousel_index: carousel.index(),
        parallax: parallax_running,
    })
}

fn perform(
    action: VisitorAction,
    handle: &PlayerHandle,
    gate: &AutoplayGate,
    carousel: &mut Carousel,
    now: std::time::Instant,
) -> std::result::Result<(), PlaybackError> {
    debug!("Visitor: {:?}", action);
    match action {
        VisitorAction::Click => {
            // A real gesture unlocks audio before listeners run
            gate.allow();
            handle.user_interaction()
        }
        VisitorAction::SetVolume(level) => handle.set_volume(level),
        VisitorAction::Next => handle.next(),
        VisitorAction::TrackEnded => handle.track_ended(),
        VisitorAction::Toggle => handle.toggle(),
        VisitorAction::NextMessage => {
            if !carousel.next(now) {
                debug!("Carousel busy, swipe ignored");
            }
            Ok(())
        }
    }
}

fn observe(event: &PlayerEvent, label: &mut TrackLabel, now: std::time::Instant) {
    match event {
        PlayerEvent::TrackChanged { title, artist, .. } => {
            info!("Now showing: {} - {}", title, artist);
            label.show_track(title, artist, now);
        }
        PlayerEvent::AutoplayNotice { visible: true } => {
            info!("Tap anywhere to enable audio");
        }
        PlayerEvent::PlaybackBlocked { reason } => {
            warn!("Autoplay blocked: {}", reason);
        }
        other => debug!("Player event: {}", other.name()),
    }
}
