use std::sync::Arc;

use crate::animation::wipe::{AnimationConfig, FrameState};
use crate::assets::decode::PreparedImage;
use crate::foundation::core::{Canvas, FrameIndex, Rgba8};
use crate::render::compositor::{FrameCompositor, RenderRequest};
use crate::render::surface::Surface;

fn solid_image(width: u32, height: u32, color: Rgba8) -> PreparedImage {
    let px = color.to_premul();
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..width * height {
        data.extend_from_slice(&px);
    }
    PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(data),
    }
}

fn request(canvas: Canvas) -> RenderRequest {
    RenderRequest {
        before: solid_image(40, 60, Rgba8::new(255, 0, 0, 255)),
        after: solid_image(40, 60, Rgba8::new(0, 0, 255, 255)),
        canvas,
        config: AnimationConfig {
            margin: 20.0,
            ..AnimationConfig::default()
        },
        caption_font: None,
    }
}

#[test]
fn start_frame_shows_only_after_image() {
    // Fraction 0 puts the wipe line at the left edge of the layout; the
    // clipped after image then covers the whole image area.
    let canvas = Canvas {
        width: 200,
        height: 320,
    };
    let req = request(canvas);
    let compositor = FrameCompositor::new(&req).unwrap();
    let mut surface = Surface::new(canvas);
    compositor
        .composite(FrameState::at(FrameIndex(0), &req.config), &mut surface)
        .unwrap();

    let layout = compositor.layout();
    let cx = layout.center().x as u32;
    let cy = layout.center().y as u32;
    let px = surface.pixel(cx, cy);
    assert_eq!((px[0], px[2]), (0, 255), "center should be the after color");
}

#[test]
fn peak_frame_shows_before_image() {
    // Cycle peak pushes the line to the right edge, hiding the after image.
    let canvas = Canvas {
        width: 200,
        height: 320,
    };
    let req = request(canvas);
    let compositor = FrameCompositor::new(&req).unwrap();
    let mut surface = Surface::new(canvas);
    compositor
        .composite(FrameState::at(FrameIndex(30), &req.config), &mut surface)
        .unwrap();

    let layout = compositor.layout();
    // Sample left of center, clear of the divider near the right edge.
    let cx = (layout.x0 + layout.width() * 0.25) as u32;
    let cy = layout.center().y as u32;
    let px = surface.pixel(cx, cy);
    assert_eq!((px[0], px[2]), (255, 0), "left side should be the before color");
}

#[test]
fn divider_column_is_white() {
    let canvas = Canvas {
        width: 200,
        height: 320,
    };
    let req = request(canvas);
    let compositor = FrameCompositor::new(&req).unwrap();
    let mut surface = Surface::new(canvas);
    // Frame 15 of the default config is a quarter cycle in: fraction 0.5.
    let state = FrameState::at(FrameIndex(15), &req.config);
    compositor.composite(state, &mut surface).unwrap();

    let layout = compositor.layout();
    let x = state.line_x(layout) as u32;
    let y = layout.center().y as u32;
    let px = surface.pixel(x, y);
    assert_eq!(&px[..3], &[255, 255, 255], "line core should be white");
}

#[test]
fn margins_stay_background_white() {
    let canvas = Canvas {
        width: 200,
        height: 320,
    };
    let req = request(canvas);
    let compositor = FrameCompositor::new(&req).unwrap();
    let mut surface = Surface::new(canvas);
    compositor
        .composite(FrameState::at(FrameIndex(7), &req.config), &mut surface)
        .unwrap();

    // Top-left corner is inside the margin on every frame.
    let px = surface.pixel(2, 2);
    assert_eq!(&px[..3], &[255, 255, 255]);
}

#[test]
fn caption_without_font_is_rejected() {
    let canvas = Canvas {
        width: 200,
        height: 320,
    };
    let mut req = request(canvas);
    req.config.caption = Some("HELLO".into());
    let err = FrameCompositor::new(&req).unwrap_err();
    assert!(err.to_string().contains("caption font"));
}

#[test]
fn mismatched_image_aspects_share_one_layout() {
    // Layout comes from the before image alone; both images are drawn into
    // the same rectangle so the wipe always lines up.
    let canvas = Canvas {
        width: 200,
        height: 320,
    };
    let mut req = request(canvas);
    req.after = solid_image(10, 90, Rgba8::new(0, 255, 0, 255));
    let compositor = FrameCompositor::new(&req).unwrap();
    let mut surface = Surface::new(canvas);
    compositor
        .composite(FrameState::at(FrameIndex(0), &req.config), &mut surface)
        .unwrap();

    let layout = compositor.layout();
    let px = surface.pixel(layout.center().x as u32, layout.center().y as u32);
    assert_eq!(px[1], 255, "after image fills the before image's layout");
}
