use super::*;
use crate::foundation::core::AspectPreset;

fn assert_aspect_preserved(rect: Rect, aspect: f64) {
    let got = rect.width() / rect.height();
    let rel = ((got - aspect) / aspect).abs();
    assert!(rel < 1e-6, "aspect drifted: want {aspect}, got {got}");
}

#[test]
fn wide_image_in_portrait_canvas_fits_to_width_and_centers_vertically() {
    let canvas = AspectPreset::Portrait9x16.canvas();
    let rect = fit_layout(canvas, 100.0, 0.0, 16.0 / 9.0).unwrap();

    assert_eq!(rect.x0, 100.0);
    assert_eq!(rect.width(), f64::from(canvas.width) - 200.0);
    assert_aspect_preserved(rect, 16.0 / 9.0);

    // Centered within the available vertical area.
    let area_h = f64::from(canvas.height) - 200.0;
    let expected_y = 100.0 + (area_h - rect.height()) / 2.0;
    assert!((rect.y0 - expected_y).abs() < 1e-9);
}

#[test]
fn tall_image_fits_to_height_and_centers_horizontally() {
    let canvas = AspectPreset::Portrait4x5.canvas();
    let rect = fit_layout(canvas, 100.0, 0.0, 0.5).unwrap();

    assert_eq!(rect.y0, 100.0);
    assert_eq!(rect.height(), f64::from(canvas.height) - 200.0);
    assert_aspect_preserved(rect, 0.5);

    let expected_x = (f64::from(canvas.width) - rect.width()) / 2.0;
    assert!((rect.x0 - expected_x).abs() < 1e-9);
}

#[test]
fn layout_is_always_inside_the_canvas() {
    let canvas = AspectPreset::Portrait9x16.canvas();
    for aspect in [0.1, 0.5, 1.0, 16.0 / 9.0, 4.0, 20.0] {
        let rect = fit_layout(canvas, 100.0, 150.0, aspect).unwrap();
        assert!(rect.x0 >= 0.0 && rect.y0 >= 0.0);
        assert!(rect.x1 <= f64::from(canvas.width));
        assert!(rect.y1 <= f64::from(canvas.height));
        assert_aspect_preserved(rect, aspect);
    }
}

#[test]
fn caption_reservation_shrinks_the_available_height() {
    let canvas = AspectPreset::Portrait9x16.canvas();
    let without = fit_layout(canvas, 100.0, 0.0, 16.0 / 9.0).unwrap();
    let with = fit_layout(canvas, 100.0, 150.0, 16.0 / 9.0).unwrap();

    // Width-fit branch in both cases: same rect size, but the vertical
    // centering happens in a 150px-shorter area.
    assert_eq!(without.width(), with.width());
    assert!((without.y0 - with.y0 - 75.0).abs() < 1e-9);
}

#[test]
fn degenerate_inputs_are_rejected() {
    let canvas = Canvas {
        width: 100,
        height: 100,
    };
    assert!(fit_layout(canvas, 60.0, 0.0, 1.0).is_err());
    assert!(fit_layout(canvas, 10.0, 0.0, 0.0).is_err());
    assert!(fit_layout(canvas, 10.0, 0.0, f64::NAN).is_err());
}
