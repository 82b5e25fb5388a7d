#![no_main]

use libfuzzer_sys::fuzz_target;
use strandfx_core::headless::RecordingSurface;
use strandfx_core::{BackdropEffect, FieldConfig, FloatingLinesField, FrameInputs, Viewport};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Parse must never panic, whatever the input.
    let Ok(config) = FieldConfig::from_json(text) else {
        return;
    };
    if config.total_lines() > 4096 {
        return;
    }

    let viewport = Viewport::new(640.0, 480.0);
    let mut field = FloatingLinesField::new(config.clone(), 0);
    field.resize(viewport);
    assert_eq!(field.population(), config.total_lines());

    let mut surface = RecordingSurface::new(viewport);
    for frame in 0..4 {
        field.frame(f64::from(frame) * 16.0, &FrameInputs::default(), &mut surface);
    }
    for strand in field.strands() {
        let x = strand.position().x;
        if x.is_finite() {
            assert!(x >= -2.0 * strand.length() && x <= viewport.width + 2.0 * strand.length());
        }
    }
});
