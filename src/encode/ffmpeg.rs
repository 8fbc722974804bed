use std::io::Read;
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::encode::session::CodecSelection;
use crate::encode::sink::SinkConfig;
use crate::foundation::core::Fps;
use crate::foundation::error::{WipeframeError, WipeframeResult};
use crate::foundation::math::mul_div255_u16;

/// Chunk size used when draining encoded bytes from ffmpeg stdout.
const STDOUT_CHUNK_BYTES: usize = 64 * 1024;

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Ask the local ffmpeg whether it was built with the named encoder.
///
/// `ffmpeg -encoders` prints one encoder per line as ` V..... name  desc`;
/// matching the second column avoids false hits on description text.
pub(crate) fn encoder_available(encoder: &str) -> bool {
    let Ok(output) = Command::new("ffmpeg")
        .args(["-hide_banner", "-encoders"])
        .stderr(Stdio::null())
        .output()
    else {
        return false;
    };
    if !output.status.success() {
        return false;
    }
    let listing = String::from_utf8_lossy(&output.stdout);
    listing
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .any(|name| name == encoder)
}

/// Build the full ffmpeg argument list for one recording.
///
/// Input is raw RGBA8 frames on stdin; output is the encoded container on
/// stdout. MP4 over a pipe needs fragmented output, since ffmpeg cannot seek
/// back to write the moov atom.
pub(crate) fn encode_args(cfg: SinkConfig, selection: &CodecSelection) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "-hide_banner".into(),
        "-loglevel".into(),
        "error".into(),
        "-f".into(),
        "rawvideo".into(),
        "-pix_fmt".into(),
        "rgba".into(),
        "-s".into(),
        format!("{}x{}", cfg.width, cfg.height),
    ];
    push_input_fps(&mut args, cfg.fps);
    args.extend(["-i".into(), "pipe:0".into(), "-an".into()]);

    if let Some(encoder) = selection.encoder {
        args.extend(["-c:v".into(), encoder.to_string()]);
    }
    args.extend(["-pix_fmt".into(), "yuv420p".into()]);

    args.extend(["-f".into(), selection.container.ffmpeg_format().to_string()]);
    if selection.container.is_mp4() {
        args.extend(["-movflags".into(), "+frag_keyframe+empty_moov".into()]);
    }
    args.push("pipe:1".into());
    args
}

fn push_input_fps(args: &mut Vec<String>, fps: Fps) {
    // For rawvideo input, `-r` before `-i` sets the input framerate.
    args.extend(["-r".into(), format!("{}/{}", fps.num, fps.den)]);
}

/// A running ffmpeg process with raw frames going in and encoded container
/// bytes coming out.
pub(crate) struct FfmpegPipe {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<Vec<u8>>>>>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
    scratch: Vec<u8>,
}

impl FfmpegPipe {
    /// Spawn ffmpeg for the given recording. Fails fast when the binary is
    /// missing rather than on the first frame write.
    pub(crate) fn spawn(cfg: SinkConfig, selection: &CodecSelection) -> WipeframeResult<Self> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(WipeframeError::validation(
                "recording width/height must be non-zero",
            ));
        }
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(WipeframeError::validation(
                "recording width/height must be even (required for yuv420p output)",
            ));
        }
        if !is_ffmpeg_on_path() {
            return Err(WipeframeError::encode(
                "ffmpeg is required for video encoding, but was not found on PATH",
            ));
        }

        let mut child = Command::new("ffmpeg")
            .args(encode_args(cfg, selection))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| WipeframeError::encode(format!("failed to spawn ffmpeg: {e}")))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| WipeframeError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| WipeframeError::encode("failed to open ffmpeg stdout (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| WipeframeError::encode("failed to open ffmpeg stderr (unexpected)"))?;

        // Drain stdout continuously so ffmpeg never blocks on a full pipe.
        // Chunks are kept in arrival order.
        let stdout_drain = std::thread::spawn(move || {
            let mut chunks = Vec::new();
            let mut buf = vec![0u8; STDOUT_CHUNK_BYTES];
            loop {
                let n = stdout.read(&mut buf)?;
                if n == 0 {
                    break;
                }
                chunks.push(buf[..n].to_vec());
            }
            Ok(chunks)
        });
        let stderr_drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok(bytes)
        });

        Ok(Self {
            child,
            stdin: Some(stdin),
            stdout_drain: Some(stdout_drain),
            stderr_drain: Some(stderr_drain),
            scratch: vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4],
        })
    }

    /// Write one frame's pixels to ffmpeg stdin, flattening premultiplied
    /// alpha over white first.
    pub(crate) fn write_frame(&mut self, premul_rgba: &[u8]) -> WipeframeResult<()> {
        if premul_rgba.len() != self.scratch.len() {
            return Err(WipeframeError::validation(
                "frame data size mismatch with width*height*4",
            ));
        }
        flatten_premul_to_opaque(&mut self.scratch, premul_rgba, [255, 255, 255]);

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(WipeframeError::encode("ffmpeg pipe is already finalized"));
        };
        use std::io::Write as _;
        stdin
            .write_all(&self.scratch)
            .map_err(|e| WipeframeError::encode(format!("failed to write frame to ffmpeg: {e}")))
    }

    /// Close stdin, wait for ffmpeg to exit, and collect the encoded chunks.
    pub(crate) fn finish(mut self) -> WipeframeResult<Vec<Vec<u8>>> {
        drop(self.stdin.take());

        let status = self
            .child
            .wait()
            .map_err(|e| WipeframeError::encode(format!("failed to wait for ffmpeg: {e}")))?;

        let chunks = match self.stdout_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| WipeframeError::encode("ffmpeg stdout drain thread panicked"))?
                .map_err(|e| WipeframeError::encode(format!("ffmpeg stdout read failed: {e}")))?,
            None => Vec::new(),
        };
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| WipeframeError::encode("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| WipeframeError::encode(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(WipeframeError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        Ok(chunks)
    }
}

/// Flatten premultiplied RGBA8 over an opaque background color.
///
/// ffmpeg's `rgba` raw input expects straight alpha; rendered frames here are
/// effectively opaque already, so this is a cheap copy in the common case.
fn flatten_premul_to_opaque(dst: &mut [u8], src_premul: &[u8], bg_rgb: [u8; 3]) {
    debug_assert_eq!(dst.len(), src_premul.len());
    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let a = s[3] as u16;
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255u16 - a;
        d[0] = (s[0] as u16 + mul_div255_u16(bg_rgb[0] as u16, inv)).min(255) as u8;
        d[1] = (s[1] as u16 + mul_div255_u16(bg_rgb[1] as u16, inv)).min(255) as u8;
        d[2] = (s[2] as u16 + mul_div255_u16(bg_rgb[2] as u16, inv)).min(255) as u8;
        d[3] = 255;
    }
}
