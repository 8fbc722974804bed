use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use wipeframe::{
    run_animation, AnimationConfig, AspectPreset, FrameCompositor, FrameIndex, FrameState, Pacing,
    RecordingSession, RenderRequest, SessionState, Surface, DEFAULT_CAPTION_TEXT,
};

#[derive(Parser, Debug)]
#[command(name = "wipeframe", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render the full animation to a video file (requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct InputArgs {
    /// "Before" image path.
    #[arg(long)]
    before: PathBuf,

    /// "After" image path.
    #[arg(long)]
    after: PathBuf,

    /// Output aspect preset.
    #[arg(long, default_value = "9x16", value_parser = parse_aspect)]
    aspect: AspectPreset,

    /// Draw the caption strip.
    #[arg(long, default_value_t = false)]
    caption: bool,

    /// Caption text (implies --caption).
    #[arg(long)]
    caption_text: Option<String>,

    /// TTF/OTF font for the caption. Required when the caption is enabled.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Animation config JSON overriding the built-in timing defaults.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output video path. Defaults to a timestamped `.mp4` name in the
    /// working directory; the extension stays `.mp4` whatever container the
    /// codec negotiation picks.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn parse_aspect(s: &str) -> Result<AspectPreset, String> {
    match s {
        "9x16" => Ok(AspectPreset::Portrait9x16),
        "4x5" => Ok(AspectPreset::Portrait4x5),
        other => Err(format!("unknown aspect '{other}' (expected 9x16 or 4x5)")),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn build_request(input: &InputArgs) -> anyhow::Result<RenderRequest> {
    let before_bytes = std::fs::read(&input.before)
        .with_context(|| format!("read before image '{}'", input.before.display()))?;
    let after_bytes = std::fs::read(&input.after)
        .with_context(|| format!("read after image '{}'", input.after.display()))?;
    let before = wipeframe::decode_image(&before_bytes)?;
    let after = wipeframe::decode_image(&after_bytes)?;

    let mut config = match &input.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read animation config '{}'", path.display()))?;
            serde_json::from_str::<AnimationConfig>(&text)
                .with_context(|| format!("parse animation config '{}'", path.display()))?
        }
        None => AnimationConfig::default(),
    };
    // Flags override the config file's caption.
    if input.caption || input.caption_text.is_some() {
        config.caption = Some(
            input
                .caption_text
                .clone()
                .unwrap_or_else(|| DEFAULT_CAPTION_TEXT.to_string()),
        );
    }

    let caption_font = match (&config.caption, &input.font) {
        (Some(_), Some(path)) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("read caption font '{}'", path.display()))?;
            Some(wipeframe::load_font(&bytes)?)
        }
        (Some(_), None) => anyhow::bail!("captions require --font"),
        (None, _) => None,
    };
    Ok(RenderRequest {
        before,
        after,
        canvas: input.aspect.canvas(),
        config,
        caption_font,
    })
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let request = build_request(&args.input)?;
    let compositor = FrameCompositor::new(&request)?;

    let mut surface = Surface::new(request.canvas);
    compositor.composite(
        FrameState::at(FrameIndex(args.frame), &request.config),
        &mut surface,
    )?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        surface.data(),
        surface.width(),
        surface.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let request = build_request(&args.input)?;

    let mut session = RecordingSession::negotiated();
    run_animation(&request, Pacing::Unpaced, &mut session)?;
    debug_assert_eq!(session.state(), SessionState::Ready);

    let asset = session
        .into_asset()
        .context("recording finished without producing an asset")?;
    let out_path = args
        .out
        .unwrap_or_else(|| PathBuf::from(asset.suggested_filename()));

    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
    }
    std::fs::write(&out_path, asset.to_bytes())
        .with_context(|| format!("write video '{}'", out_path.display()))?;

    eprintln!(
        "wrote {} ({} bytes, {})",
        out_path.display(),
        asset.len_bytes(),
        asset.container().media_type()
    );
    Ok(())
}
