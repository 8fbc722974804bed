use kurbo::Rect;

use crate::animation::wipe::{AnimationConfig, FrameState};
use crate::assets::decode::{CaptionFont, PreparedImage};
use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{WipeframeError, WipeframeResult};
use crate::layout::fit::fit_layout;
use crate::render::glow::blur_surface;
use crate::render::surface::Surface;
use crate::render::text::draw_text_centered;

/// Divider line geometry, matching the animation's visual design.
const LINE_WIDTH: f64 = 8.0;
const OUTLINE_WIDTH: f64 = LINE_WIDTH + 4.0;
const OUTLINE_COLOR: Rgba8 = Rgba8::new(0, 0, 0, 51); // 20% black
const LINE_OVERSHOOT: f64 = 10.0;
const GLOW_WIDTH: f64 = 2.0;
const GLOW_OVERSHOOT: f64 = 5.0;
const GLOW_RADIUS: u32 = 10;
const GLOW_SIGMA: f32 = 5.0;

const CAPTION_SIZE_PX: f32 = 100.0;
const CAPTION_BOTTOM_OFFSET: f64 = 120.0;
const CAPTION_COLOR: Rgba8 = Rgba8::new(51, 51, 51, 255); // #333

/// Everything one render needs, bundled immutably up front.
///
/// A request is built once per render and never mutated, so repeated renders
/// cannot observe each other's state.
#[derive(Clone, Debug)]
pub struct RenderRequest {
    /// The image shown left of the wipe line.
    pub before: PreparedImage,
    /// The image revealed right of the wipe line.
    pub after: PreparedImage,
    /// Output canvas dimensions.
    pub canvas: Canvas,
    /// Timing and framing parameters.
    pub config: AnimationConfig,
    /// Required when `config.caption` is set.
    pub caption_font: Option<CaptionFont>,
}

impl RenderRequest {
    /// Reject requests that cannot be rendered.
    pub fn validate(&self) -> WipeframeResult<()> {
        self.config.validate()?;
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(WipeframeError::validation("canvas must be non-empty"));
        }
        if self.config.caption.is_some() && self.caption_font.is_none() {
            return Err(WipeframeError::validation(
                "captions are enabled but no caption font was provided",
            ));
        }
        Ok(())
    }
}

/// Renders one fully composited frame per invocation.
///
/// The layout is resolved once at construction (both images are static and
/// share it); per-frame work is purely a function of the [`FrameState`].
#[derive(Debug)]
pub struct FrameCompositor<'a> {
    request: &'a RenderRequest,
    layout: Rect,
}

impl<'a> FrameCompositor<'a> {
    /// Validate the request and resolve the shared image layout.
    pub fn new(request: &'a RenderRequest) -> WipeframeResult<Self> {
        request.validate()?;
        let layout = fit_layout(
            request.canvas,
            request.config.margin,
            request.config.caption_reserve(),
            request.before.aspect(),
        )?;
        Ok(Self { request, layout })
    }

    /// Shared display rectangle for both images.
    pub fn layout(&self) -> Rect {
        self.layout
    }

    /// Composite one frame onto `surface`.
    ///
    /// Draw order is a contract: background, before image, clipped after
    /// image, divider, caption. Later steps occlude earlier ones.
    pub fn composite(&self, state: FrameState, surface: &mut Surface) -> WipeframeResult<()> {
        let layout = self.layout;
        let line_x = state.line_x(layout);

        // 1. Erase the previous frame.
        surface.fill(Rgba8::WHITE);

        // 2. Full "before" image.
        surface.draw_image(&self.request.before, layout, None)?;

        // 3. "After" image revealed right of the wipe line.
        surface.draw_image(&self.request.after, layout, Some((line_x, layout.x1)))?;

        // 4. Divider: dark outline, white core, blurred glow.
        self.draw_divider(surface, line_x)?;

        // 5. Caption above everything.
        if let Some(text) = &self.request.config.caption {
            let font = self
                .request
                .caption_font
                .as_ref()
                .ok_or_else(|| WipeframeError::render("caption font missing at draw time"))?;
            draw_text_centered(
                surface,
                font,
                text,
                CAPTION_SIZE_PX,
                f64::from(self.request.canvas.width) / 2.0,
                f64::from(self.request.canvas.height) - CAPTION_BOTTOM_OFFSET,
                CAPTION_COLOR,
            );
        }

        Ok(())
    }

    fn draw_divider(&self, surface: &mut Surface, line_x: f64) -> WipeframeResult<()> {
        let layout = self.layout;
        let y0 = layout.y0 - LINE_OVERSHOOT;
        let y1 = layout.y1 + LINE_OVERSHOOT;

        surface.stroke_vline(line_x, y0, y1, OUTLINE_WIDTH, OUTLINE_COLOR);
        surface.stroke_vline(line_x, y0, y1, LINE_WIDTH, Rgba8::WHITE);

        // Glow: render the narrow line on a scratch band, blur the band, and
        // composite it back. The blur never touches the main surface state.
        let pad = f64::from(GLOW_RADIUS) + GLOW_WIDTH;
        let band_x0 = (line_x - pad).floor();
        let band_y0 = (layout.y0 - GLOW_OVERSHOOT - f64::from(GLOW_RADIUS)).floor();
        let band_y1 = (layout.y1 + GLOW_OVERSHOOT + f64::from(GLOW_RADIUS)).ceil();
        let band = Canvas {
            width: (2.0 * pad).ceil() as u32 + 1,
            height: (band_y1 - band_y0).max(1.0) as u32,
        };

        let mut scratch = Surface::new(band);
        scratch.stroke_vline(
            line_x - band_x0,
            layout.y0 - GLOW_OVERSHOOT - band_y0,
            layout.y1 + GLOW_OVERSHOOT - band_y0,
            GLOW_WIDTH,
            Rgba8::WHITE,
        );
        // Sigma follows the shadow-blur convention of sigma = blur / 2.
        blur_surface(&mut scratch, GLOW_RADIUS, GLOW_SIGMA)?;
        surface.composite_over_at(&scratch, band_x0 as i64, band_y0 as i64);

        // The crisp narrow line sits on top of its own halo.
        surface.stroke_vline(
            line_x,
            layout.y0 - GLOW_OVERSHOOT,
            layout.y1 + GLOW_OVERSHOOT,
            GLOW_WIDTH,
            Rgba8::WHITE,
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
