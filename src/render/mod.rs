//! CPU rendering: drawing surface, per-frame compositor, and the animation
//! driver that feeds frames to a sink.

/// Per-frame compositing of the before/after wipe.
pub mod compositor;
/// The animation loop: pacing and sink delivery.
pub mod driver;
pub(crate) mod glow;
/// Premultiplied RGBA8 drawing surface.
pub mod surface;
pub(crate) mod text;
