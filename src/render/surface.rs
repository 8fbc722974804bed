use kurbo::Rect;

use crate::assets::decode::PreparedImage;
use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{WipeframeError, WipeframeResult};
use crate::foundation::math::premul_over_px;

/// One rendered frame: premultiplied RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major premultiplied RGBA8 bytes, `width * height * 4` long.
    pub data: Vec<u8>,
}

/// Mutable premultiplied-RGBA8 drawing surface owned by one render session.
///
/// All drawing is source-over; there is no retained state between draw calls,
/// so effects like the divider glow cannot leak into later steps.
#[derive(Clone, Debug)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Allocate a transparent surface at the canvas size.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![0u8; canvas.area_px() * 4],
        }
    }

    /// Surface width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Surface height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Borrow the raw premultiplied RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Read one pixel as premultiplied RGBA8. Panics out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Fill the whole surface with an opaque color, erasing previous content.
    pub fn fill(&mut self, color: Rgba8) {
        let px = color.to_premul();
        for chunk in self.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
    }

    /// Draw `image` scaled into `dest`, optionally restricted to the columns
    /// in `clip_x = [start, end)`. Bilinear sampling, source-over blending.
    ///
    /// The clip window only narrows the drawn columns; the image is always
    /// scaled to the full `dest` rectangle, which is what produces the
    /// reveal effect when the window starts at the wipe line.
    pub fn draw_image(
        &mut self,
        image: &PreparedImage,
        dest: Rect,
        clip_x: Option<(f64, f64)>,
    ) -> WipeframeResult<()> {
        if dest.width() <= 0.0 || dest.height() <= 0.0 {
            return Err(WipeframeError::render("image dest rect is empty"));
        }
        let expected = (image.width as usize) * (image.height as usize) * 4;
        if image.rgba8_premul.len() != expected {
            return Err(WipeframeError::render(
                "image buffer does not match width*height*4",
            ));
        }

        let mut px0 = dest.x0;
        let mut px1 = dest.x1;
        if let Some((cx0, cx1)) = clip_x {
            px0 = px0.max(cx0);
            px1 = px1.min(cx1);
        }
        let x_start = px0.round().max(0.0) as u32;
        let x_end = (px1.round().min(f64::from(self.width))).max(0.0) as u32;
        let y_start = dest.y0.round().max(0.0) as u32;
        let y_end = (dest.y1.round().min(f64::from(self.height))).max(0.0) as u32;

        let sx_scale = f64::from(image.width) / dest.width();
        let sy_scale = f64::from(image.height) / dest.height();
        let src = image.rgba8_premul.as_slice();

        for y in y_start..y_end {
            let sy = (f64::from(y) + 0.5 - dest.y0) * sy_scale - 0.5;
            let row = (y as usize) * (self.width as usize);
            for x in x_start..x_end {
                let sx = (f64::from(x) + 0.5 - dest.x0) * sx_scale - 0.5;
                let s = sample_bilinear(src, image.width, image.height, sx, sy);
                let idx = (row + x as usize) * 4;
                let d = &mut self.data[idx..idx + 4];
                let out = premul_over_px([d[0], d[1], d[2], d[3]], s);
                d.copy_from_slice(&out);
            }
        }
        Ok(())
    }

    /// Blend an axis-aligned rectangle over the surface.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        let src = color.to_premul();
        let x_start = rect.x0.round().max(0.0) as u32;
        let x_end = (rect.x1.round().min(f64::from(self.width))).max(0.0) as u32;
        let y_start = rect.y0.round().max(0.0) as u32;
        let y_end = (rect.y1.round().min(f64::from(self.height))).max(0.0) as u32;

        for y in y_start..y_end {
            let row = (y as usize) * (self.width as usize);
            for x in x_start..x_end {
                let idx = (row + x as usize) * 4;
                let d = &mut self.data[idx..idx + 4];
                let out = premul_over_px([d[0], d[1], d[2], d[3]], src);
                d.copy_from_slice(&out);
            }
        }
    }

    /// Stroke a vertical line of the given stroke width centered on `x`.
    pub fn stroke_vline(&mut self, x: f64, y0: f64, y1: f64, stroke_width: f64, color: Rgba8) {
        let half = stroke_width / 2.0;
        self.fill_rect(Rect::new(x - half, y0, x + half, y1), color);
    }

    /// Source-over composite another surface of identical dimensions.
    pub fn composite_over(&mut self, other: &Surface) -> WipeframeResult<()> {
        if other.width != self.width || other.height != self.height {
            return Err(WipeframeError::render(
                "composite_over expects surfaces of identical dimensions",
            ));
        }
        for (d, s) in self
            .data
            .chunks_exact_mut(4)
            .zip(other.data.chunks_exact(4))
        {
            let out = premul_over_px([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
            d.copy_from_slice(&out);
        }
        Ok(())
    }

    /// Source-over composite another surface placed at `(x_off, y_off)`,
    /// clipped to this surface's bounds.
    pub fn composite_over_at(&mut self, other: &Surface, x_off: i64, y_off: i64) {
        for sy in 0..other.height as i64 {
            let dy = sy + y_off;
            if dy < 0 || dy >= self.height as i64 {
                continue;
            }
            let src_row = (sy as usize) * (other.width as usize);
            let dst_row = (dy as usize) * (self.width as usize);
            for sx in 0..other.width as i64 {
                let dx = sx + x_off;
                if dx < 0 || dx >= self.width as i64 {
                    continue;
                }
                let s_idx = (src_row + sx as usize) * 4;
                let d_idx = (dst_row + dx as usize) * 4;
                let s = [
                    other.data[s_idx],
                    other.data[s_idx + 1],
                    other.data[s_idx + 2],
                    other.data[s_idx + 3],
                ];
                if s[3] == 0 {
                    continue;
                }
                let d = &mut self.data[d_idx..d_idx + 4];
                let out = premul_over_px([d[0], d[1], d[2], d[3]], s);
                d.copy_from_slice(&out);
            }
        }
    }

    /// Snapshot the surface into an owned frame.
    pub fn to_frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.width,
            height: self.height,
            data: self.data.clone(),
        }
    }
}

fn sample_bilinear(src: &[u8], sw: u32, sh: u32, sx: f64, sy: f64) -> [u8; 4] {
    let max_x = (sw - 1) as i64;
    let max_y = (sh - 1) as i64;
    let x0 = sx.floor();
    let y0 = sy.floor();
    let tx = sx - x0;
    let ty = sy - y0;

    let xi0 = (x0 as i64).clamp(0, max_x);
    let yi0 = (y0 as i64).clamp(0, max_y);
    let xi1 = (xi0 + 1).min(max_x);
    let yi1 = (yi0 + 1).min(max_y);

    let fetch = |xi: i64, yi: i64| -> [f64; 4] {
        let idx = ((yi as usize) * (sw as usize) + (xi as usize)) * 4;
        [
            f64::from(src[idx]),
            f64::from(src[idx + 1]),
            f64::from(src[idx + 2]),
            f64::from(src[idx + 3]),
        ]
    };

    let p00 = fetch(xi0, yi0);
    let p10 = fetch(xi1, yi0);
    let p01 = fetch(xi0, yi1);
    let p11 = fetch(xi1, yi1);

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = p00[c] + (p10[c] - p00[c]) * tx;
        let bot = p01[c] + (p11[c] - p01[c]) * tx;
        let v = top + (bot - top) * ty;
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    out
}
