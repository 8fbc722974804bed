use std::time::{Duration, Instant};

use crate::animation::wipe::FrameState;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::WipeframeResult;
use crate::render::compositor::{FrameCompositor, RenderRequest};
use crate::render::surface::Surface;

/// Frame pacing policy for a render run.
///
/// Compositing is identical under both policies; pacing only decides when a
/// finished frame is handed to the sink.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Pacing {
    /// Hold each frame until its wall-clock deadline, as a live preview would.
    Realtime,
    /// Push frames as fast as they are composited.
    #[default]
    Unpaced,
}

/// Aggregated rendering counters.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RenderStats {
    /// Frames composited and delivered.
    pub frames_rendered: u64,
    /// Wall-clock duration of the whole run.
    pub elapsed: Duration,
}

/// Drive a full animation: composite every frame of the request and push them
/// into `sink` in strictly increasing frame order.
///
/// Frame deadlines are computed from the start instant rather than chained
/// sleep calls, so pacing error does not accumulate across frames.
#[tracing::instrument(skip_all, fields(frames = request.config.total_frames))]
pub fn run_animation(
    request: &RenderRequest,
    pacing: Pacing,
    sink: &mut dyn FrameSink,
) -> WipeframeResult<RenderStats> {
    let compositor = FrameCompositor::new(request)?;
    let frame_duration = request.config.fps.frame_duration_secs();

    sink.begin(SinkConfig {
        width: request.canvas.width,
        height: request.canvas.height,
        fps: request.config.fps,
    })?;

    let start = Instant::now();
    let mut surface = Surface::new(request.canvas);
    let range = request.config.frame_range();
    for idx in range.start.0..range.end.0 {
        let frame = FrameIndex(idx);
        compositor.composite(FrameState::at(frame, &request.config), &mut surface)?;

        if pacing == Pacing::Realtime {
            let deadline = start + Duration::from_secs_f64(frame_duration * idx as f64);
            let now = Instant::now();
            if deadline > now {
                std::thread::sleep(deadline - now);
            }
        }

        sink.push_frame(frame, &surface.to_frame())?;
    }
    sink.end()?;

    Ok(RenderStats {
        frames_rendered: range.len_frames(),
        elapsed: start.elapsed(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/driver.rs"]
mod tests;
