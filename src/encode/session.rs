use std::time::{SystemTime, UNIX_EPOCH};

use crate::encode::ffmpeg::{encoder_available, FfmpegPipe};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{WipeframeError, WipeframeResult};
use crate::render::surface::FrameRGBA;

/// Output container format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Container {
    /// ISO BMFF / MP4.
    Mp4,
    /// Matroska-based WebM.
    Webm,
}

impl Container {
    /// IANA media type of the container.
    pub fn media_type(self) -> &'static str {
        match self {
            Container::Mp4 => "video/mp4",
            Container::Webm => "video/webm",
        }
    }

    /// ffmpeg `-f` muxer name.
    pub(crate) fn ffmpeg_format(self) -> &'static str {
        match self {
            Container::Mp4 => "mp4",
            Container::Webm => "webm",
        }
    }

    pub(crate) fn is_mp4(self) -> bool {
        self == Container::Mp4
    }
}

/// One container/encoder pairing tried during negotiation.
///
/// `encoder: None` means the container's default video encoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodecSelection {
    /// Output container format.
    pub container: Container,
    /// ffmpeg encoder name, or `None` for the container default.
    pub encoder: Option<&'static str>,
}

/// Preference-ordered candidates: H.264 in MP4 first for compatibility, then
/// VP9/VP8 WebM. The bare WebM entry doubles as the guaranteed fallback.
pub const CODEC_CANDIDATES: &[CodecSelection] = &[
    CodecSelection {
        container: Container::Mp4,
        encoder: Some("libx264"),
    },
    CodecSelection {
        container: Container::Mp4,
        encoder: Some("libopenh264"),
    },
    CodecSelection {
        container: Container::Mp4,
        encoder: None,
    },
    CodecSelection {
        container: Container::Webm,
        encoder: Some("libvpx-vp9"),
    },
    CodecSelection {
        container: Container::Webm,
        encoder: Some("libvpx"),
    },
    CodecSelection {
        container: Container::Webm,
        encoder: None,
    },
];

/// Fallback used when no candidate probes as supported. The muxer's default
/// encoder is always worth attempting, so negotiation itself never fails.
pub const FALLBACK_SELECTION: CodecSelection = CodecSelection {
    container: Container::Webm,
    encoder: None,
};

/// Pick the first candidate the probe accepts, falling back to bare WebM.
///
/// The probe is injected so negotiation itself stays deterministic under test;
/// the production probe asks ffmpeg for its encoder list.
pub fn negotiate_codec(probe: impl Fn(&CodecSelection) -> bool) -> CodecSelection {
    CODEC_CANDIDATES
        .iter()
        .copied()
        .find(|candidate| probe(candidate))
        .unwrap_or(FALLBACK_SELECTION)
}

/// Probe backed by the local ffmpeg build. Bare-container candidates need no
/// specific encoder and always pass.
pub fn ffmpeg_probe(candidate: &CodecSelection) -> bool {
    match candidate.encoder {
        Some(encoder) => encoder_available(encoder),
        None => true,
    }
}

/// Finished recording: the encoded byte stream plus its container identity.
#[derive(Clone, Debug)]
pub struct VideoAsset {
    /// Encoded container bytes, in arrival order from the encoder.
    chunks: Vec<Vec<u8>>,
    container: Container,
}

impl VideoAsset {
    /// The container this asset was encoded into.
    pub fn container(&self) -> Container {
        self.container
    }

    /// Encoded chunks in arrival order.
    pub fn chunks(&self) -> &[Vec<u8>] {
        &self.chunks
    }

    /// Total encoded size in bytes.
    pub fn len_bytes(&self) -> u64 {
        self.chunks.iter().map(|c| c.len() as u64).sum()
    }

    /// Concatenate the chunks into one contiguous buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len_bytes() as usize);
        for chunk in &self.chunks {
            out.extend_from_slice(chunk);
        }
        out
    }

    /// Timestamped download-style filename, e.g. `before-after-1724990000000.mp4`.
    ///
    /// The extension is always `.mp4` for player compatibility, even when the
    /// negotiated container is WebM; `container()` carries the real identity.
    pub fn suggested_filename(&self) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        format!("before-after-{millis}.mp4")
    }
}

/// Lifecycle of a [`RecordingSession`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Created, no encoder spawned yet.
    Idle,
    /// Encoder running, accepting frames.
    Recording,
    /// Frame stream closed, waiting for the encoder to flush.
    Finalizing,
    /// Finished; the asset is available.
    Ready,
    /// The encoder failed; partial output was discarded.
    Failed,
}

/// One recording: spawns the encoder on `begin`, streams frames through it,
/// and yields a [`VideoAsset`] after `end`.
///
/// A session is single-use. Transitions are strict:
/// `Idle -> Recording -> Finalizing -> Ready`, with any encoder error moving
/// to `Failed`.
pub struct RecordingSession {
    selection: CodecSelection,
    state: SessionState,
    pipe: Option<FfmpegPipe>,
    asset: Option<VideoAsset>,
    last_idx: Option<FrameIndex>,
}

impl RecordingSession {
    /// Create a session for an already-negotiated codec selection.
    pub fn new(selection: CodecSelection) -> Self {
        Self {
            selection,
            state: SessionState::Idle,
            pipe: None,
            asset: None,
            last_idx: None,
        }
    }

    /// Create a session by negotiating against the local ffmpeg build.
    pub fn negotiated() -> Self {
        Self::new(negotiate_codec(ffmpeg_probe))
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The codec selection this session encodes with.
    pub fn selection(&self) -> CodecSelection {
        self.selection
    }

    /// The finished asset. `None` unless the session is `Ready`.
    pub fn asset(&self) -> Option<&VideoAsset> {
        match self.state {
            SessionState::Ready => self.asset.as_ref(),
            _ => None,
        }
    }

    /// Consume the session, returning the asset if one was produced.
    pub fn into_asset(self) -> Option<VideoAsset> {
        match self.state {
            SessionState::Ready => self.asset,
            _ => None,
        }
    }

    fn fail(&mut self, err: WipeframeError) -> WipeframeError {
        self.state = SessionState::Failed;
        self.pipe = None;
        self.asset = None;
        err
    }
}

impl FrameSink for RecordingSession {
    #[tracing::instrument(skip_all, fields(container = self.selection.container.media_type()))]
    fn begin(&mut self, cfg: SinkConfig) -> WipeframeResult<()> {
        if self.state != SessionState::Idle {
            return Err(WipeframeError::encode(
                "recording session can only begin once",
            ));
        }
        match FfmpegPipe::spawn(cfg, &self.selection) {
            Ok(pipe) => {
                self.pipe = Some(pipe);
                self.state = SessionState::Recording;
                self.last_idx = None;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> WipeframeResult<()> {
        if self.state != SessionState::Recording {
            return Err(WipeframeError::encode(
                "recording session is not accepting frames",
            ));
        }
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(self.fail(WipeframeError::encode(
                "recording session received out-of-order frame index",
            )));
        }
        self.last_idx = Some(idx);

        let Some(pipe) = self.pipe.as_mut() else {
            return Err(self.fail(WipeframeError::encode("encoder pipe missing (unexpected)")));
        };
        match pipe.write_frame(&frame.data) {
            Ok(()) => Ok(()),
            Err(e) => Err(self.fail(e)),
        }
    }

    #[tracing::instrument(skip_all, fields(frames = self.last_idx.map_or(0, |i| i.0 + 1)))]
    fn end(&mut self) -> WipeframeResult<()> {
        if self.state != SessionState::Recording {
            return Err(WipeframeError::encode(
                "recording session is not recording",
            ));
        }
        let Some(pipe) = self.pipe.take() else {
            return Err(self.fail(WipeframeError::encode("encoder pipe missing (unexpected)")));
        };
        self.state = SessionState::Finalizing;
        match pipe.finish() {
            Ok(chunks) if chunks.iter().all(|c| c.is_empty()) => Err(self.fail(
                WipeframeError::encode("encoder exited cleanly but produced no output"),
            )),
            Ok(chunks) => {
                self.asset = Some(VideoAsset {
                    chunks,
                    container: self.selection.container,
                });
                self.state = SessionState::Ready;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/session.rs"]
mod tests;
