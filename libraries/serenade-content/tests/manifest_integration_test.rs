//! Integration tests for manifest loading and the carousel
//!
//! Files are written to a temp dir and read back through the public loaders.

use proptest::prelude::*;
use serenade_content::{
    load_messages_from_path, load_photo_frames_from_path, render_cluster, Carousel, SlideState,
    TextBlockLayout,
};
use std::time::{Duration, Instant};

#[test]
fn test_photo_manifest_file_renders_cluster() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photos.json");
    std::fs::write(
        &path,
        r#"{
            "baseY": 100,
            "items": [
                {"src": "img/beach.jpg", "x": "12%", "rot": "-3deg", "offsetY": 20, "caption": "Summer"},
                {"src": "img/snow.jpg", "x": "70%", "y": 300, "alt": "Snow day"}
            ]
        }"#,
    )
    .unwrap();

    let frames = load_photo_frames_from_path(&path);
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].top, Some(120.0));
    assert_eq!(frames[1].top, Some(300.0));

    let html = render_cluster(&frames);
    assert_eq!(html.matches("<figure class=\"polaroid\"").count(), 2);
    assert!(html.contains("top: 120px"));
    assert!(html.contains("<figcaption>Summer</figcaption>"));
}

#[test]
fn test_missing_photo_manifest_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_photo_frames_from_path(dir.path().join("nope.json")).is_empty());
}

#[test]
fn test_empty_message_manifest_renders_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("messages.json");
    std::fs::write(&path, "[]").unwrap();

    let carousel = Carousel::new(load_messages_from_path(&path), TextBlockLayout::default());
    assert!(carousel.is_placeholder());
    assert_eq!(carousel.stage().state, SlideState::Active);
    assert!(carousel.dots().is_empty());
}

#[test]
fn test_broken_message_manifest_renders_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("messages.json");
    std::fs::write(&path, r#"{"messages": "oops"}"#).unwrap();

    let carousel = Carousel::new(load_messages_from_path(&path), TextBlockLayout::default());
    assert!(carousel.is_placeholder());
    assert_eq!(carousel.message_count(), 0);
}

#[test]
fn test_carousel_walks_through_file_messages() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("messages.json");
    std::fs::write(
        &path,
        r#"[
            {"text": "First", "from": "A"},
            {"text": "Second, a much longer message that wraps onto several lines of the card", "from": "B"},
            {"text": ""}
        ]"#,
    )
    .unwrap();

    let mut carousel = Carousel::new(load_messages_from_path(&path), TextBlockLayout::default());
    assert_eq!(carousel.dots().len(), 2);

    let t0 = Instant::now();
    assert!(carousel.next(t0));
    let frozen = carousel.container_height().unwrap();

    carousel.tick(t0 + Duration::from_millis(430));
    let growing = carousel.container_height().unwrap();
    assert!(growing > frozen, "longer message should need more room");

    carousel.tick(t0 + Duration::from_millis(1030));
    assert_eq!(carousel.container_height(), None);
    assert!(carousel.stage().content.text().starts_with("Second"));
}

proptest! {
    /// Property: requests issued while animating never change the state
    #[test]
    fn requests_while_animating_are_no_ops(
        count in 2usize..10,
        requests in prop::collection::vec((-20i64..20, 0u64..1029), 1..20),
    ) {
        let messages = (0..count)
            .map(|i| serenade_content::Message::new(format!("m{}", i), ""))
            .collect();
        let mut carousel = Carousel::new(messages, TextBlockLayout::default());
        let t0 = Instant::now();
        prop_assert!(carousel.next(t0));
        let index = carousel.index();

        for (target, offset) in requests {
            let now = t0 + Duration::from_millis(offset);
            prop_assert!(!carousel.go_to(target, now));
            prop_assert_eq!(carousel.index(), index);
        }
    }
}
