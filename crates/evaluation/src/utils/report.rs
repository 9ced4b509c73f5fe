use anyhow::{Context, Result};
use linecount_rs::{Axis, AxisBalance, CrossingEvent, FlowMetrics, Orientation};
use log::{info, warn};
use std::{fs::File, io::Write, path::Path};

/// Returns the `(metric, value)` rows of the summary export. Direction rows depend on the orientation.
pub fn summary_rows(metrics: &FlowMetrics, min_confidence: f32) -> Vec<(&'static str, String)> {
    let mut rows = vec![("Total cyclists", metrics.total_cyclists.to_string())];

    match metrics.orientation() {
        Orientation::Horizontal => rows.extend([
            ("Cyclists up", metrics.cyclists_up.to_string()),
            ("Cyclists down", metrics.cyclists_down.to_string()),
        ]),
        Orientation::Vertical => rows.extend([
            ("Cyclists left", metrics.cyclists_left.to_string()),
            ("Cyclists right", metrics.cyclists_right.to_string()),
        ]),
        Orientation::Both => rows.extend([
            ("Cyclists up (horizontal)", metrics.cyclists_up.to_string()),
            ("Cyclists down (horizontal)", metrics.cyclists_down.to_string()),
            ("Cyclists left (vertical)", metrics.cyclists_left.to_string()),
            ("Cyclists right (vertical)", metrics.cyclists_right.to_string()),
        ]),
    }

    rows.extend([
        ("Cyclists per minute", format!("{:.2}", metrics.cyclists_per_minute)),
        (
            "Cyclists per hour (projection)",
            format!("{:.2}", metrics.cyclists_per_hour),
        ),
        ("Video duration (min)", format!("{:.2}", metrics.duration_minutes)),
        ("Line orientation", metrics.orientation().to_string()),
        ("Minimum confidence", min_confidence.to_string()),
    ]);

    rows
}

pub fn write_summary(path: &Path, metrics: &FlowMetrics, min_confidence: f32) -> Result<()> {
    let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    write_summary_to(file, metrics, min_confidence)
}

pub fn write_summary_to<W: Write>(
    writer: W,
    metrics: &FlowMetrics,
    min_confidence: f32,
) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(["metric", "value"])?;
    summary_rows(metrics, min_confidence)
        .into_iter()
        .try_for_each(|(metric, value)| writer.write_record([metric, value.as_str()]))?;
    writer.flush()?;
    Ok(())
}

pub fn write_events(path: &Path, events: &[CrossingEvent<usize>]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    write_events_to(file, events)
}

pub fn write_events_to<W: Write>(writer: W, events: &[CrossingEvent<usize>]) -> Result<()> {
    // header is written by hand so a run without crossings still gets one
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    writer.write_record(["track_id", "direction", "axis", "frame_index"])?;
    events
        .iter()
        .try_for_each(|event| writer.serialize(event))?;
    writer.flush()?;
    Ok(())
}

/// Log the final results of a run.
pub fn log_summary(metrics: &FlowMetrics, min_confidence: f32) {
    let orientation = metrics.orientation();

    info!("{}", "=".repeat(50));
    info!("final results:");

    if metrics.total_cyclists == 0 {
        warn!("no cyclists were counted");
        info!("suggestions:");
        info!("  - lower the minimum confidence (current: {min_confidence:.2})");
        info!("  - check the tracker output covers the whole video");
        info!("  - move the counting line to where cyclists pass");
    } else {
        info!("total cyclists: {}", metrics.total_cyclists);
        if orientation.includes_horizontal() {
            info!("up: {}", metrics.cyclists_up);
            info!("down: {}", metrics.cyclists_down);
        }
        if orientation.includes_vertical() {
            info!("left: {}", metrics.cyclists_left);
            info!("right: {}", metrics.cyclists_right);
        }
        info!("cyclists/minute: {:.2}", metrics.cyclists_per_minute);
        info!(
            "cyclists/hour (projection): {:.2} ({} flow)",
            metrics.cyclists_per_hour,
            metrics.flow_category()
        );

        [Axis::Horizontal, Axis::Vertical]
            .into_iter()
            .filter_map(|axis| metrics.balance(axis))
            .for_each(|balance| match balance {
                AxisBalance::Dominant { direction, share } => info!(
                    "{} line: predominant flow {direction} ({:.0}%)",
                    direction.axis(),
                    share * 100.0
                ),
                AxisBalance::Balanced { axis } => info!("{axis} line: balanced flow"),
            });
    }

    info!("{}", "=".repeat(50));
}
