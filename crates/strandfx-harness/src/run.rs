//! Headless effect runs and their reports.

use std::fs;
use std::io::Write;

use serde::Serialize;
use strandfx_core::headless::{DrawCommand, HeadlessHost, RecordingSurface};
use strandfx_core::{
    BackdropEffect, FieldConfig, FloatingLinesField, HostEvent, HyperspaceField, Listeners, Mount,
    StarfieldConfig, Viewport,
};

use crate::cli::{EffectKind, RunArgs};
use crate::error::{HarnessError, Result};

/// Draw statistics of one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FrameRecord {
    pub frame: u32,
    pub time_ms: f64,
    pub draw_calls: usize,
    pub curves: usize,
    pub segments: usize,
    pub discs: usize,
    pub fills: usize,
    pub population: usize,
}

impl FrameRecord {
    fn tally(frame: u32, time_ms: f64, population: usize, commands: &[DrawCommand]) -> Self {
        let mut record = Self {
            frame,
            time_ms,
            population,
            ..Self::default()
        };
        for command in commands {
            match command {
                DrawCommand::Resize(_) => continue,
                DrawCommand::StrokeCurve(_) => record.curves += 1,
                DrawCommand::StrokeSegment { .. } => record.segments += 1,
                DrawCommand::FillDisc { .. } => record.discs += 1,
                DrawCommand::Clear | DrawCommand::Fill(_) | DrawCommand::FillRadial(_) => {
                    record.fills += 1;
                }
            }
            record.draw_calls += 1;
        }
        record
    }
}

/// Summary of a whole run, printed as JSON on stdout.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub effect: &'static str,
    pub seed: u64,
    pub width: f64,
    pub height: f64,
    pub frames: u32,
    pub population: usize,
    /// DOM event names attached at activation.
    pub listeners: Vec<&'static str>,
    /// Events delivered before the first frame that were ignored because
    /// their listener was not attached.
    pub ignored_events: u32,
    pub total_draw_calls: u64,
    pub listeners_after_teardown: usize,
    pub draws_after_teardown: u64,
    #[serde(skip)]
    pub records: Vec<FrameRecord>,
}

impl RunReport {
    /// Whether teardown left nothing behind.
    #[must_use]
    pub fn teardown_clean(&self) -> bool {
        self.listeners_after_teardown == 0 && self.draws_after_teardown == 0
    }

    /// One JSON object per line, one line per frame.
    pub fn to_jsonl(&self) -> Result<String> {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&serde_json::to_string(record)?);
            out.push('\n');
        }
        Ok(out)
    }
}

fn validate(args: &RunArgs) -> Result<Viewport> {
    if !(args.width.is_finite() && args.width > 0.0) {
        return Err(HarnessError::invalid(format!(
            "width must be a positive number, got {}",
            args.width
        )));
    }
    if !(args.height.is_finite() && args.height > 0.0) {
        return Err(HarnessError::invalid(format!(
            "height must be a positive number, got {}",
            args.height
        )));
    }
    if !(args.frame_ms.is_finite() && args.frame_ms >= 0.0) {
        return Err(HarnessError::invalid("frame-ms must be a non-negative number"));
    }
    Ok(Viewport::new(args.width, args.height))
}

fn read_options(args: &RunArgs) -> Result<Option<String>> {
    let Some(path) = &args.config else {
        return Ok(None);
    };
    let text = fs::read_to_string(path).map_err(|err| {
        tracing::error!(path = %path.display(), error = %err, "cannot read options file");
        err
    })?;
    Ok(Some(text))
}

/// Run the effect selected in `args` and write JSONL if requested.
pub fn run_effect(args: &RunArgs) -> Result<RunReport> {
    let viewport = validate(args)?;
    let options = read_options(args)?;
    let report = match args.effect {
        EffectKind::FloatingLines => {
            let config = match options.as_deref() {
                Some(json) => FieldConfig::from_json(json)?,
                None => FieldConfig::default(),
            };
            drive(FloatingLinesField::new(config, args.seed), viewport, args)
        }
        EffectKind::Hyperspace => {
            let config = match options.as_deref() {
                Some(json) => StarfieldConfig::from_json(json)?,
                None => StarfieldConfig::default(),
            };
            drive(HyperspaceField::new(config, args.seed), viewport, args)
        }
    }?;

    if let Some(path) = &args.jsonl {
        let mut file = fs::File::create(path)?;
        file.write_all(report.to_jsonl()?.as_bytes())?;
        tracing::info!(path = %path.display(), lines = report.records.len(), "frame records written");
    }
    Ok(report)
}

fn drive<E: BackdropEffect>(effect: E, viewport: Viewport, args: &RunArgs) -> Result<RunReport> {
    let name = effect.name();
    let mut host = HeadlessHost::new(viewport);
    let mut mount = Mount::activate(effect, Some(RecordingSurface::new(viewport)), &mut host)?;
    let attached = mount.attached();
    mount.surface_mut().take_commands();

    let mut ignored_events = 0;
    let mut deliver = |mount: &mut Mount<E, RecordingSurface>, event: HostEvent| {
        if !mount.dispatch(event, &host) {
            ignored_events += 1;
        }
    };
    if let Some((x, y)) = args.pointer {
        deliver(&mut mount, HostEvent::PointerMove { x, y, time_ms: 1.0 });
    }
    if let Some(offset) = args.scroll {
        deliver(&mut mount, HostEvent::Scroll { offset });
    }

    let mut records = Vec::with_capacity(args.frames as usize);
    for frame in 0..args.frames {
        if host.take_frame().is_none() {
            tracing::warn!(frame, "no frame pending; stopping early");
            break;
        }
        let time_ms = f64::from(frame) * args.frame_ms;
        mount.on_frame(time_ms, &mut host);
        let commands = mount.surface_mut().take_commands();
        records.push(FrameRecord::tally(
            frame,
            time_ms,
            mount.effect().population(),
            &commands,
        ));
    }

    let total_draw_calls = mount.surface().draw_calls();
    mount.deactivate(&mut host);
    // A stale callback after teardown must not draw.
    mount.on_frame(f64::from(args.frames) * args.frame_ms, &mut host);
    let draws_after_teardown = mount.surface().draw_calls() - total_draw_calls;

    let report = RunReport {
        effect: name,
        seed: args.seed,
        width: viewport.width,
        height: viewport.height,
        frames: records.len() as u32,
        population: mount.effect().population(),
        listeners: Listeners::EACH
            .into_iter()
            .filter(|l| attached.contains(*l))
            .filter_map(Listeners::event_name)
            .collect(),
        ignored_events,
        total_draw_calls,
        listeners_after_teardown: host.attached().bits().count_ones() as usize,
        draws_after_teardown,
        records,
    };
    if !report.teardown_clean() {
        tracing::warn!(
            listeners = report.listeners_after_teardown,
            draws = report.draws_after_teardown,
            "teardown left state behind"
        );
    }
    Ok(report)
}

/// Print the default options of `effect` as pretty JSON.
pub fn print_defaults(effect: EffectKind) -> Result<()> {
    let json = match effect {
        EffectKind::FloatingLines => serde_json::to_string_pretty(&FieldConfig::default())?,
        EffectKind::Hyperspace => serde_json::to_string_pretty(&StarfieldConfig::default())?,
    };
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_skips_resize() {
        let commands = [
            DrawCommand::Resize(Viewport::new(1.0, 1.0)),
            DrawCommand::Clear,
            DrawCommand::FillDisc {
                center: Viewport::new(2.0, 2.0).center(),
                radius: 1.0,
                color: strandfx_core::palette::STAR_COLORS[0],
            },
        ];
        let record = FrameRecord::tally(0, 0.0, 7, &commands);
        assert_eq!(record.draw_calls, 2);
        assert_eq!(record.fills, 1);
        assert_eq!(record.discs, 1);
        assert_eq!(record.population, 7);
    }

    #[test]
    fn non_positive_size_is_rejected() {
        let args = RunArgs {
            width: 0.0,
            ..RunArgs::default()
        };
        assert!(matches!(
            run_effect(&args),
            Err(HarnessError::InvalidArgument(_))
        ));
    }
}
