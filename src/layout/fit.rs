use kurbo::Rect;

use crate::foundation::core::Canvas;
use crate::foundation::error::{WipeframeError, WipeframeResult};

/// Margin-bounded area of the canvas available for image display.
///
/// The caption reservation is subtracted from the available height before the
/// fit is computed, so an enabled caption never overlaps the imagery.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageArea {
    pub width: f64,
    pub height: f64,
}

impl ImageArea {
    pub fn of(canvas: Canvas, margin: f64, caption_reserve: f64) -> WipeframeResult<Self> {
        let width = f64::from(canvas.width) - 2.0 * margin;
        let height = f64::from(canvas.height) - 2.0 * margin - caption_reserve;
        if width <= 0.0 || height <= 0.0 {
            return Err(WipeframeError::validation(
                "margins and caption reservation leave no image area",
            ));
        }
        Ok(Self { width, height })
    }

    fn aspect(self) -> f64 {
        self.width / self.height
    }
}

/// Compute the centered, aspect-preserving display rectangle for an image of
/// the given intrinsic aspect ratio.
///
/// Wider-than-container images fit to the area width and center vertically
/// within the available area; taller images fit to the area height and center
/// horizontally within the full canvas width.
pub fn fit_layout(
    canvas: Canvas,
    margin: f64,
    caption_reserve: f64,
    image_aspect: f64,
) -> WipeframeResult<Rect> {
    if !image_aspect.is_finite() || image_aspect <= 0.0 {
        return Err(WipeframeError::validation(
            "image aspect ratio must be finite and > 0",
        ));
    }
    let area = ImageArea::of(canvas, margin, caption_reserve)?;

    let (x, y, w, h) = if image_aspect > area.aspect() {
        let w = area.width;
        let h = w / image_aspect;
        let x = margin;
        let y = margin + (area.height - h) / 2.0;
        (x, y, w, h)
    } else {
        let h = area.height;
        let w = h * image_aspect;
        let x = (f64::from(canvas.width) - w) / 2.0;
        let y = margin;
        (x, y, w, h)
    };

    Ok(Rect::new(x, y, x + w, y + h))
}

#[cfg(test)]
#[path = "../../tests/unit/layout/fit.rs"]
mod tests;
