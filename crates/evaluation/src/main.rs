mod utils;
use anyhow::{bail, Ok, Result};
use clap::Parser;
use linecount_rs::{
    CrossingEvent, DetectionFilter, FlowMetrics, FrameSampler, LineConfig, LineCrossingCounter,
    Orientation, VideoInfo,
};
use log::info;
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;
use utils::*;

/// Count cyclists crossing virtual lines in MOT challenge tracker output
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The input path or glob pattern. Each matching file is counted as a separate video
    #[arg(short, long)]
    input: String,

    /// Frame width in pixels
    #[arg(long)]
    width: u32,

    /// Frame height in pixels
    #[arg(long)]
    height: u32,

    /// Frames per second of the source video
    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    /// Total frames in the source video. Defaults to the last frame in the tracker output
    #[arg(long)]
    total_frames: Option<u64>,

    /// Counting line orientation: horizontal, vertical or both
    #[arg(long, default_value = "horizontal")]
    orientation: Orientation,

    /// Horizontal line position as a fraction of frame height
    #[arg(long, default_value_t = 0.5)]
    line_position: f32,

    /// Vertical line position as a fraction of frame width
    #[arg(long, default_value_t = 0.5)]
    line_position_x: f32,

    /// Process every N frames
    #[arg(long, default_value_t = 1)]
    every_n_frames: u32,

    /// Detections below this confidence are ignored
    #[arg(long, default_value_t = 0.15)]
    min_confidence: f32,

    /// Only count these class ids, e.g. `1` for bicycles or `0,1` to include persons. Read from the eighth column
    #[arg(long, value_delimiter = ',')]
    classes: Vec<usize>,

    /// Log progress every N processed frames, 0 to disable
    #[arg(long, default_value_t = 5)]
    progress_interval: u64,

    /// Write summary and crossing event CSV files to this directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Log every track and ignored reversal
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        })
        .with_target(false)
        .init();

    let mut line_config = LineConfig::default();
    line_config
        .with_orientation(args.orientation)
        .with_horizontal_position(args.line_position)
        .with_vertical_position(args.line_position_x);
    line_config.validate()?;

    let filter = DetectionFilter::new(
        Some(args.min_confidence),
        (!args.classes.is_empty()).then(|| args.classes.clone()),
    );
    let sampler = FrameSampler::try_from_factor(args.every_n_frames)?;

    let files = glob::glob(&args.input)?
        .filter_map(|path| path.ok())
        .collect::<Vec<_>>();
    if files.is_empty() {
        bail!("no tracker output matches {}", args.input);
    }

    if let Some(output_dir) = &args.output_dir {
        std::fs::create_dir_all(output_dir)?;
    }

    files.iter().try_for_each(|path| {
        let (metrics, events) = count_sequence(path, &args, line_config, &filter, sampler)?;

        report::log_summary(&metrics, args.min_confidence);

        if let Some(output_dir) = &args.output_dir {
            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "sequence".to_string());

            let summary_path = output_dir.join(format!("{name}_summary.csv"));
            report::write_summary(&summary_path, &metrics, args.min_confidence)?;
            let events_path = output_dir.join(format!("{name}_events.csv"));
            report::write_events(&events_path, &events)?;

            info!(
                "wrote {} and {}",
                summary_path.display(),
                events_path.display()
            );
        }

        Ok(())
    })?;

    Ok(())
}

/// Run one tracker output file through a fresh counter.
fn count_sequence(
    path: &Path,
    args: &Args,
    line_config: LineConfig,
    filter: &DetectionFilter,
    sampler: FrameSampler,
) -> Result<(FlowMetrics, Vec<CrossingEvent<usize>>)> {
    info!("processing {} @ {} fps", path.display(), args.fps);

    let frames = frame_processing::read_frames(path, filter)?;
    let mut counter = LineCrossingCounter::new(line_config, args.width, args.height)?;
    let count = frame_processing::count_frames(
        frames,
        &mut counter,
        sampler,
        args.total_frames,
        args.progress_interval,
    );

    let metrics = FlowMetrics::new(
        &count.snapshot,
        &line_config,
        &VideoInfo::new(args.fps, count.total_frames, count.processed_frames),
    );

    Ok((metrics, count.events))
}
