//! Wipeframe renders before/after comparison videos.
//!
//! Two stills are fitted into a portrait canvas and a vertical divider sweeps
//! between them on a raised-cosine schedule, revealing the "after" image to
//! the right of the line. Frames are composited on the CPU and streamed
//! through the system `ffmpeg` into an MP4 or WebM asset.
//!
//! The pipeline is request-oriented:
//!
//! - Decode the two images (and optionally a caption font) into a
//!   [`RenderRequest`]
//! - Negotiate a codec and open a [`RecordingSession`]
//! - Drive the animation with [`run_animation`], which pushes every frame
//!   into the session in timeline order
//! - Take the finished [`VideoAsset`] from the session
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

pub(crate) mod animation;
pub(crate) mod layout;

/// Encoding sinks and the recording session.
pub mod encode;
/// CPU compositing and the animation driver.
pub mod render;

pub use crate::animation::wipe::{
    wipe_fraction, AnimationConfig, FrameState, CAPTION_RESERVE_PX, DEFAULT_CAPTION_TEXT,
};
pub use crate::assets::decode::{decode_image, load_font, CaptionFont, PreparedImage};
pub use crate::foundation::core::{
    AspectPreset, Canvas, Fps, FrameIndex, FrameRange, Rect, Rgba8,
};
pub use crate::foundation::error::{WipeframeError, WipeframeResult};
pub use crate::layout::fit::fit_layout;

pub use crate::encode::ffmpeg::is_ffmpeg_on_path;
pub use crate::encode::session::{
    ffmpeg_probe, negotiate_codec, CodecSelection, Container, RecordingSession, SessionState,
    VideoAsset, CODEC_CANDIDATES, FALLBACK_SELECTION,
};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::render::compositor::{FrameCompositor, RenderRequest};
pub use crate::render::driver::{run_animation, Pacing, RenderStats};
pub use crate::render::surface::{FrameRGBA, Surface};
