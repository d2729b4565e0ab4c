//! Parallax initialization policy
//!
//! The parallax library itself is opaque; this module decides whether to
//! start it and with which speeds, and keeps its failures contained.

use crate::error::Result;
use serde::Serialize;
use tracing::{debug, warn};

/// What the page knows about the visitor's device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceProfile {
    /// `prefers-reduced-motion: reduce`
    pub prefers_reduced_motion: bool,
    /// Coarse pointer without hover, or touch events available
    pub touch: bool,
}

/// Options handed to the parallax library
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParallaxConfig {
    pub wrapper: String,
    pub targets: String,
    pub wrapper_speed: f32,
    pub target_speed: f32,
    pub target_percentage: f32,
}

impl ParallaxConfig {
    /// Speeds tuned per device; `None` when motion should stay off
    ///
    /// Touch scrolling gets faster speeds so the effect does not feel laggy.
    pub fn for_device(profile: DeviceProfile) -> Option<Self> {
        if profile.prefers_reduced_motion {
            return None;
        }

        let (wrapper_speed, target_speed) = if profile.touch {
            (0.15, 0.32)
        } else {
            (0.08, 0.24)
        };

        Some(Self {
            wrapper: "#luxy".to_string(),
            targets: ".parallax".to_string(),
            wrapper_speed,
            target_speed,
            target_percentage: 0.1,
        })
    }
}

/// The parallax library entry point
pub trait ParallaxInitializer {
    fn init(&mut self, config: &ParallaxConfig) -> Result<()>;
}

/// Start parallax if the device and the library allow it
///
/// Returns whether the effect is running. A missing library, reduced
/// motion or an init error all leave the page static.
pub fn init_parallax(
    initializer: Option<&mut dyn ParallaxInitializer>,
    profile: DeviceProfile,
) -> bool {
    let Some(config) = ParallaxConfig::for_device(profile) else {
        debug!("Reduced motion requested, parallax disabled");
        return false;
    };
    let Some(initializer) = initializer else {
        debug!("Parallax library not present");
        return false;
    };

    match initializer.init(&config) {
        Ok(()) => {
            debug!("Parallax started: {:?}", config);
            true
        }
        Err(e) => {
            warn!("Parallax initialization failed: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContentError;

    struct Recorder {
        seen: Option<ParallaxConfig>,
        fail: bool,
    }

    impl ParallaxInitializer for Recorder {
        fn init(&mut self, config: &ParallaxConfig) -> Result<()> {
            self.seen = Some(config.clone());
            if self.fail {
                Err(ContentError::EffectInit("wrapper not found".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn touch_devices_get_faster_speeds() {
        let touch = ParallaxConfig::for_device(DeviceProfile {
            touch: true,
            ..Default::default()
        })
        .unwrap();
        let desktop = ParallaxConfig::for_device(DeviceProfile::default()).unwrap();

        assert_eq!(touch.wrapper_speed, 0.15);
        assert_eq!(touch.target_speed, 0.32);
        assert_eq!(desktop.wrapper_speed, 0.08);
        assert_eq!(desktop.target_speed, 0.24);
        assert_eq!(desktop.target_percentage, 0.1);
    }

    #[test]
    fn reduced_motion_skips_library() {
        let mut recorder = Recorder {
            seen: None,
            fail: false,
        };
        let profile = DeviceProfile {
            prefers_reduced_motion: true,
            touch: false,
        };
        assert!(!init_parallax(Some(&mut recorder), profile));
        assert!(recorder.seen.is_none());
    }

    #[test]
    fn init_failure_is_contained() {
        let mut recorder = Recorder {
            seen: None,
            fail: true,
        };
        assert!(!init_parallax(Some(&mut recorder), DeviceProfile::default()));
        assert!(recorder.seen.is_some());

        assert!(!init_parallax(None, DeviceProfile::default()));
    }

    #[test]
    fn config_serializes_in_library_casing() {
        let config = ParallaxConfig::for_device(DeviceProfile::default()).unwrap();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["wrapperSpeed"], serde_json::json!(0.08f32));
        assert_eq!(json["targets"], ".parallax");
    }
}
