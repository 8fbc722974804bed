use super::*;
use crate::foundation::core::Fps;
use crate::render::surface::FrameRGBA;

#[test]
fn negotiation_prefers_h264_mp4() {
    let picked = negotiate_codec(|_| true);
    assert_eq!(picked.container, Container::Mp4);
    assert_eq!(picked.encoder, Some("libx264"));
}

#[test]
fn negotiation_skips_unsupported_encoders() {
    // A build without MP4 support should land on VP9 WebM.
    let picked = negotiate_codec(|c| c.container == Container::Webm);
    assert_eq!(picked.container, Container::Webm);
    assert_eq!(picked.encoder, Some("libvpx-vp9"));
}

#[test]
fn negotiation_never_fails() {
    let picked = negotiate_codec(|_| false);
    assert_eq!(picked, FALLBACK_SELECTION);
    assert_eq!(picked.container, Container::Webm);
    assert_eq!(picked.encoder, None);
}

#[test]
fn candidate_order_is_mp4_then_webm() {
    let containers: Vec<Container> = CODEC_CANDIDATES.iter().map(|c| c.container).collect();
    assert_eq!(
        containers,
        vec![
            Container::Mp4,
            Container::Mp4,
            Container::Mp4,
            Container::Webm,
            Container::Webm,
            Container::Webm,
        ]
    );
}

#[test]
fn media_types_match_containers() {
    assert_eq!(Container::Mp4.media_type(), "video/mp4");
    assert_eq!(Container::Webm.media_type(), "video/webm");
}

#[test]
fn suggested_filename_is_timestamped() {
    let asset = VideoAsset {
        chunks: vec![vec![1, 2, 3]],
        container: Container::Mp4,
    };
    let name = asset.suggested_filename();
    assert!(name.starts_with("before-after-"));
    assert!(name.ends_with(".mp4"));
    let stamp = &name["before-after-".len()..name.len() - ".mp4".len()];
    assert!(stamp.chars().all(|c| c.is_ascii_digit()));

    // The extension stays .mp4 even for WebM output; the container field is
    // the source of truth for the media type.
    let webm = VideoAsset {
        chunks: vec![],
        container: Container::Webm,
    };
    assert!(webm.suggested_filename().ends_with(".mp4"));
    assert_eq!(webm.container().media_type(), "video/webm");
}

#[test]
fn asset_bytes_concatenate_chunks_in_order() {
    let asset = VideoAsset {
        chunks: vec![vec![1, 2], vec![3], vec![], vec![4, 5]],
        container: Container::Webm,
    };
    assert_eq!(asset.len_bytes(), 5);
    assert_eq!(asset.to_bytes(), vec![1, 2, 3, 4, 5]);
}

#[test]
fn session_exposes_no_asset_before_ready() {
    let session = RecordingSession::new(FALLBACK_SELECTION);
    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.asset().is_none());
    assert!(session.into_asset().is_none());
}

#[test]
fn frames_are_rejected_before_begin() {
    let mut session = RecordingSession::new(FALLBACK_SELECTION);
    let frame = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 16],
    };
    let err = session.push_frame(FrameIndex(0), &frame).unwrap_err();
    assert!(err.to_string().contains("not accepting frames"));
    assert_eq!(session.state(), SessionState::Idle);
}

#[test]
fn end_is_rejected_before_begin() {
    let mut session = RecordingSession::new(FALLBACK_SELECTION);
    assert!(session.end().is_err());
}

#[test]
fn odd_dimensions_fail_the_session() {
    let mut session = RecordingSession::new(FALLBACK_SELECTION);
    let err = session
        .begin(SinkConfig {
            width: 3,
            height: 4,
            fps: Fps { num: 30, den: 1 },
        })
        .unwrap_err();
    assert!(err.to_string().contains("even"));
    assert_eq!(session.state(), SessionState::Failed);
}
