//! Encoding sinks and the recording session.
//!
//! Sinks consume rendered frames in timeline order; the recording session
//! streams them through the system `ffmpeg` into a finished video asset.

/// `ffmpeg` process plumbing and argument construction.
pub mod ffmpeg;
/// Codec negotiation and the recording session lifecycle.
pub mod session;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
