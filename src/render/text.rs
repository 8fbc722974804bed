use crate::assets::decode::CaptionFont;
use crate::foundation::core::Rgba8;
use crate::foundation::math::{mul_div255_u8, premul_over_px};
use crate::render::surface::Surface;

/// Rasterize `text` with its center at `(center_x, center_y)`.
///
/// Glyph coverage from fontdue is treated as alpha and blended source-over,
/// so the caption sits cleanly above whatever imagery is already drawn.
pub(crate) fn draw_text_centered(
    surface: &mut Surface,
    font: &CaptionFont,
    text: &str,
    size_px: f32,
    center_x: f64,
    center_y: f64,
    color: Rgba8,
) {
    let font = font.font.as_ref();

    // Measure pass: total advance plus the tallest ascent/descent.
    let mut total_width = 0.0f32;
    let mut max_ascent = 0i32;
    let mut max_descent = 0i32;
    for ch in text.chars() {
        let metrics = font.metrics(ch, size_px);
        let ascent = metrics.height as i32 + metrics.ymin;
        let descent = -metrics.ymin;
        max_ascent = max_ascent.max(ascent);
        max_descent = max_descent.max(descent);
        total_width += metrics.advance_width;
    }
    let text_height = max_ascent + max_descent;

    let origin_x = center_x - f64::from(total_width) / 2.0;
    let origin_y = center_y - f64::from(text_height) / 2.0;
    let premul = color.to_premul();

    let mut cursor_x = origin_x;
    for ch in text.chars() {
        let (metrics, bitmap) = font.rasterize(ch, size_px);
        let glyph_x = cursor_x + f64::from(metrics.xmin);
        let glyph_y = origin_y + f64::from(max_ascent - (metrics.height as i32 + metrics.ymin));

        for gy in 0..metrics.height {
            for gx in 0..metrics.width {
                let coverage = bitmap[gy * metrics.width + gx];
                if coverage == 0 {
                    continue;
                }
                let px = glyph_x + gx as f64;
                let py = glyph_y + gy as f64;
                if px < 0.0 || py < 0.0 {
                    continue;
                }
                let (px, py) = (px as u32, py as u32);
                if px >= surface.width() || py >= surface.height() {
                    continue;
                }

                let cov = u16::from(coverage);
                let src = [
                    mul_div255_u8(u16::from(premul[0]), cov),
                    mul_div255_u8(u16::from(premul[1]), cov),
                    mul_div255_u8(u16::from(premul[2]), cov),
                    mul_div255_u8(u16::from(premul[3]), cov),
                ];
                let d = surface.pixel(px, py);
                let out = premul_over_px(d, src);
                let idx = ((py as usize) * (surface.width() as usize) + (px as usize)) * 4;
                surface.data_mut()[idx..idx + 4].copy_from_slice(&out);
            }
        }
        cursor_x += f64::from(metrics.advance_width);
    }
}
