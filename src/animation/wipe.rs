use kurbo::Rect;

use crate::foundation::core::{Fps, FrameIndex, FrameRange};
use crate::foundation::error::{WipeframeError, WipeframeResult};

/// Default caption drawn when the caller enables captions without overriding
/// the text.
pub const DEFAULT_CAPTION_TEXT: &str = "LR PRESETS LINKED IN BIO";

/// Vertical space reserved at the bottom of the canvas when captions are on.
pub const CAPTION_RESERVE_PX: f64 = 150.0;

/// Parameters of one wipe animation. Immutable for the duration of a render.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct AnimationConfig {
    /// Total frames produced by one render.
    pub total_frames: u64,
    /// Output frame rate.
    pub fps: Fps,
    /// Number of complete back-and-forth sweeps over the animation.
    pub cycles: u32,
    /// Canvas margin around the image area, in pixels.
    pub margin: f64,
    /// Caption text, or `None` to disable the caption entirely.
    pub caption: Option<String>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            total_frames: 120,
            fps: Fps { num: 30, den: 1 },
            cycles: 2,
            margin: 100.0,
            caption: None,
        }
    }
}

impl AnimationConfig {
    /// Reject configs that cannot drive a render.
    pub fn validate(&self) -> WipeframeResult<()> {
        if self.total_frames == 0 {
            return Err(WipeframeError::validation("total_frames must be > 0"));
        }
        if self.cycles == 0 {
            return Err(WipeframeError::validation("cycles must be > 0"));
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(WipeframeError::validation("margin must be finite and >= 0"));
        }
        if let Some(text) = &self.caption
            && text.is_empty()
        {
            return Err(WipeframeError::validation(
                "caption text must be non-empty when captions are enabled",
            ));
        }
        Ok(())
    }

    /// Timeline range this animation spans, `[0, total_frames)`.
    pub fn frame_range(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(0),
            end: FrameIndex(self.total_frames),
        }
    }

    /// Vertical pixels reserved for the caption below the image area.
    pub fn caption_reserve(&self) -> f64 {
        if self.caption.is_some() {
            CAPTION_RESERVE_PX
        } else {
            0.0
        }
    }
}

/// Per-frame wipe state. Recreated each tick; carries no hidden state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameState {
    /// The frame this state describes.
    pub frame: FrameIndex,
    /// Normalized wipe-line position in `[0, 1]`.
    pub wipe_fraction: f64,
}

impl FrameState {
    /// Evaluate the wipe at `frame` under `config`.
    pub fn at(frame: FrameIndex, config: &AnimationConfig) -> Self {
        Self {
            frame,
            wipe_fraction: wipe_fraction(frame, config.total_frames, config.cycles),
        }
    }

    /// Absolute wipe-line x-coordinate within the given layout rectangle.
    pub fn line_x(self, layout: Rect) -> f64 {
        layout.x0 + self.wipe_fraction * layout.width()
    }
}

/// Normalized wipe-line position for a frame.
///
/// A raised cosine starting and ending at the left edge, so the rendered clip
/// loops seamlessly: `f(0) = 0` and the function is periodic with period
/// `total_frames / cycles`. Each half-cycle eases in and out rather than
/// moving linearly.
pub fn wipe_fraction(frame: FrameIndex, total_frames: u64, cycles: u32) -> f64 {
    let normalized = (frame.0 as f64) / (total_frames.max(1) as f64);
    (1.0 - (normalized * std::f64::consts::TAU * f64::from(cycles)).cos()) / 2.0
}

#[cfg(test)]
#[path = "../../tests/unit/animation/wipe.rs"]
mod tests;
