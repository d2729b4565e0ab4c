//! Serenade - Page Content
//!
//! Everything on the landing page that is not music:
//! - Polaroid photo frames from a JSON manifest (two accepted shapes)
//! - Messages from a JSON manifest and the carousel that shows them
//! - The fade/swap transition of the track title and artist labels
//! - Parallax initialization policy
//!
//! Manifest failures never surface to the visitor: loaders log a warning
//! and fall back to an empty render.

pub mod carousel;
pub mod error;
pub mod label;
pub mod messages;
pub mod parallax;
pub mod photos;

pub use carousel::{
    Carousel, CarouselTimings, Dot, Slide, SlideContent, SlideLayout, SlideState, TextBlockLayout,
};
pub use error::{ContentError, Result};
pub use label::{TextFade, TrackLabel};
pub use messages::{
    load_messages, load_messages_from_path, parse_messages, parse_messages_from_path, Message,
};
pub use parallax::{init_parallax, DeviceProfile, ParallaxConfig, ParallaxInitializer};
pub use photos::{
    load_photo_frames, load_photo_frames_from_path, parse_photo_manifest,
    parse_photo_manifest_from_path, render_cluster, CssValue, PhotoFrame,
};
