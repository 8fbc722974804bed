use std::sync::Arc;

use crate::animation::wipe::AnimationConfig;
use crate::assets::decode::PreparedImage;
use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
use crate::foundation::core::{Canvas, FrameIndex, Rgba8};
use crate::foundation::error::WipeframeResult;
use crate::render::compositor::RenderRequest;
use crate::render::driver::{run_animation, Pacing};
use crate::render::surface::FrameRGBA;

fn solid_image(width: u32, height: u32, color: Rgba8) -> PreparedImage {
    let px = color.to_premul();
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..width * height {
        data.extend_from_slice(&px);
    }
    PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(data),
    }
}

fn small_request(total_frames: u64) -> RenderRequest {
    let mut config = AnimationConfig::default();
    config.total_frames = total_frames;
    config.margin = 8.0;
    RenderRequest {
        before: solid_image(8, 12, Rgba8::new(255, 0, 0, 255)),
        after: solid_image(8, 12, Rgba8::new(0, 0, 255, 255)),
        canvas: Canvas {
            width: 64,
            height: 96,
        },
        config,
        caption_font: None,
    }
}

#[test]
fn unpaced_run_delivers_every_frame_in_order() {
    let request = small_request(10);
    let mut sink = InMemorySink::new();
    let stats = run_animation(&request, Pacing::Unpaced, &mut sink).unwrap();

    assert_eq!(stats.frames_rendered, 10);
    assert_eq!(sink.frames().len(), 10);
    for (i, (idx, frame)) in sink.frames().iter().enumerate() {
        assert_eq!(idx.0, i as u64);
        assert_eq!((frame.width, frame.height), (64, 96));
    }
}

#[test]
fn sink_config_matches_request() {
    let request = small_request(3);
    let mut sink = InMemorySink::new();
    run_animation(&request, Pacing::Unpaced, &mut sink).unwrap();

    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height), (64, 96));
    assert_eq!(cfg.fps, request.config.fps);
}

#[test]
fn sink_errors_abort_the_run() {
    struct FailingSink {
        pushed: u64,
    }
    impl FrameSink for FailingSink {
        fn begin(&mut self, _cfg: SinkConfig) -> WipeframeResult<()> {
            Ok(())
        }
        fn push_frame(&mut self, _idx: FrameIndex, _frame: &FrameRGBA) -> WipeframeResult<()> {
            self.pushed += 1;
            if self.pushed == 3 {
                return Err(crate::foundation::error::WipeframeError::encode(
                    "sink rejected frame",
                ));
            }
            Ok(())
        }
        fn end(&mut self) -> WipeframeResult<()> {
            panic!("end must not run after a push failure");
        }
    }

    let request = small_request(10);
    let mut sink = FailingSink { pushed: 0 };
    let err = run_animation(&request, Pacing::Unpaced, &mut sink).unwrap_err();
    assert!(err.to_string().contains("sink rejected frame"));
    assert_eq!(sink.pushed, 3);
}

#[test]
fn realtime_pacing_takes_at_least_the_animation_duration() {
    // 4 frames at 100 fps: the run must span at least the 3 inter-frame gaps.
    let mut request = small_request(4);
    request.config.fps = crate::foundation::core::Fps { num: 100, den: 1 };
    let mut sink = InMemorySink::new();
    let stats = run_animation(&request, Pacing::Realtime, &mut sink).unwrap();
    assert!(stats.elapsed >= std::time::Duration::from_millis(30));
}
