use super::*;

#[test]
fn fraction_stays_normalized_for_every_frame() {
    for f in 0..120 {
        let v = wipe_fraction(FrameIndex(f), 120, 2);
        assert!((0.0..=1.0).contains(&v), "frame {f} out of range: {v}");
    }
}

#[test]
fn fraction_starts_at_zero() {
    assert_eq!(wipe_fraction(FrameIndex(0), 120, 2), 0.0);
}

#[test]
fn fraction_is_periodic_over_total_frames_div_cycles() {
    // Period is 120/2 = 60 frames.
    for f in 0..60 {
        let a = wipe_fraction(FrameIndex(f), 120, 2);
        let b = wipe_fraction(FrameIndex(f + 60), 120, 2);
        assert!((a - b).abs() < 1e-12, "frame {f}: {a} vs {b}");
    }
}

#[test]
fn line_returns_to_left_edge_at_cycle_boundaries() {
    let layout = Rect::new(100.0, 200.0, 2060.0, 1302.5);
    let config = AnimationConfig::default();
    for f in [0u64, 60] {
        let state = FrameState::at(FrameIndex(f), &config);
        assert!((state.line_x(layout) - layout.x0).abs() < 1e-9);
    }
}

#[test]
fn line_x_stays_within_the_layout() {
    let layout = Rect::new(100.0, 200.0, 2060.0, 1302.5);
    let config = AnimationConfig::default();
    for f in 0..config.total_frames {
        let x = FrameState::at(FrameIndex(f), &config).line_x(layout);
        assert!(x >= layout.x0 - 1e-9 && x <= layout.x1 + 1e-9, "frame {f}");
    }
}

#[test]
fn fraction_peaks_mid_half_cycle() {
    // With 2 cycles over 120 frames each cycle spans 60 frames; the raised
    // cosine peaks at the half of each cycle, frames 30 and 90.
    let v = wipe_fraction(FrameIndex(30), 120, 2);
    assert!((v - 1.0).abs() < 1e-12);
    let v = wipe_fraction(FrameIndex(90), 120, 2);
    assert!((v - 1.0).abs() < 1e-12);
}

#[test]
fn config_validation_catches_degenerate_inputs() {
    let mut c = AnimationConfig::default();
    assert!(c.validate().is_ok());

    c.total_frames = 0;
    assert!(c.validate().is_err());

    c = AnimationConfig {
        cycles: 0,
        ..AnimationConfig::default()
    };
    assert!(c.validate().is_err());

    c = AnimationConfig {
        caption: Some(String::new()),
        ..AnimationConfig::default()
    };
    assert!(c.validate().is_err());
}

#[test]
fn frame_range_covers_the_whole_timeline() {
    let c = AnimationConfig::default();
    let range = c.frame_range();
    assert_eq!(range.start, FrameIndex(0));
    assert_eq!(range.len_frames(), c.total_frames);
    assert!(range.contains(FrameIndex(c.total_frames - 1)));
    assert!(!range.contains(FrameIndex(c.total_frames)));
}

#[test]
fn caption_reserve_only_applies_when_enabled() {
    let mut c = AnimationConfig::default();
    assert_eq!(c.caption_reserve(), 0.0);
    c.caption = Some(DEFAULT_CAPTION_TEXT.to_owned());
    assert_eq!(c.caption_reserve(), CAPTION_RESERVE_PX);
}
