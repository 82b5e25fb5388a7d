#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use strandfx_core::headless::{HeadlessHost, RecordingSurface};
use strandfx_core::{
    FieldConfig, FloatingLinesField, HostEvent, Listeners, Mount, PerBand, Viewport,
};

#[derive(Debug, Arbitrary)]
enum Step {
    Frame(u16),
    Move(i16, i16, u16),
    Leave,
    Scroll(i16),
    Resize(u16, u16),
    Unmount,
}

#[derive(Debug, Arbitrary)]
struct Script {
    interactive: bool,
    parallax: bool,
    counts: [u8; 3],
    seed: u64,
    steps: Vec<Step>,
}

fuzz_target!(|script: Script| {
    let config = FieldConfig {
        interactive: script.interactive,
        parallax: script.parallax,
        line_count: PerBand::Each(script.counts.map(|c| u32::from(c % 32))),
        ..FieldConfig::default()
    };
    let expected = config.listeners();
    let mut host = HeadlessHost::new(Viewport::new(800.0, 600.0));
    let Ok(mut mount) = Mount::activate(
        FloatingLinesField::new(config, script.seed),
        Some(RecordingSurface::default()),
        &mut host,
    ) else {
        return;
    };
    assert_eq!(host.attached(), expected);

    let mut clock = 0.0;
    for step in script.steps {
        match step {
            Step::Frame(dt) => {
                clock += f64::from(dt);
                if host.take_frame().is_some() {
                    mount.on_frame(clock, &mut host);
                }
            }
            Step::Move(x, y, dt) => {
                clock += f64::from(dt);
                let event = HostEvent::PointerMove {
                    x: f64::from(x),
                    y: f64::from(y),
                    time_ms: clock,
                };
                mount.dispatch(event, &host);
            }
            Step::Leave => {
                mount.dispatch(HostEvent::PointerLeave, &host);
            }
            Step::Scroll(offset) => {
                mount.dispatch(HostEvent::Scroll { offset: f64::from(offset) }, &host);
            }
            Step::Resize(w, h) => {
                host.set_viewport(Viewport::new(f64::from(w), f64::from(h)));
                mount.dispatch(HostEvent::Resize, &host);
            }
            Step::Unmount => {
                mount.deactivate(&mut host);
                assert_eq!(host.attached(), Listeners::empty());
                assert_eq!(host.pending_frame(), None);
            }
        }
    }

    let draws = mount.surface().draw_calls();
    mount.deactivate(&mut host);
    assert!(!mount.on_frame(clock + 16.0, &mut host));
    assert_eq!(mount.surface().draw_calls(), draws);
    assert_eq!(host.attached(), Listeners::empty());
});
