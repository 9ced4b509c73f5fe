use anyhow::{anyhow, Context, Result};
use indexmap::IndexMap;
use linecount_rs::{
    BoundingBox, CountsSnapshot, CrossingEvent, Detection, DetectionFilter, FrameSampler,
    LineCrossingCounter, Orientation,
};
use log::info;
use std::{fmt, fs::File, io::Read, path::Path};

/// Detections of a sequence keyed by 1-based frame number, in file order.
pub type Frames = IndexMap<u64, Vec<Detection>>;

/// One line of MOT challenge tracker output.
///
/// `<frame>, <id>, <bb_left>, <bb_top>, <bb_width>, <bb_height>, <conf>, <x>, <y>, <z>`
///
/// The world co-ordinates are ignored. Ground truth files put the class in the eighth column instead; it is read
/// when it holds a non-negative integer.
#[derive(Debug, Clone, PartialEq)]
pub struct MotRecord {
    pub frame: u64,
    pub track_id: usize,
    pub bbox: BoundingBox,
    pub confidence: f32,
    pub class_id: Option<usize>,
}

impl MotRecord {
    pub fn from_record(record: &csv::StringRecord) -> Result<MotRecord> {
        let frame = field(record, 0, "frame")?
            .parse::<u64>()
            .with_context(|| format!("invalid frame in {:?}", record))?;

        Ok(MotRecord {
            frame,
            track_id: track_id(record)?,
            bbox: BoundingBox::new(
                float(record, 2, "bb_left")?,
                float(record, 3, "bb_top")?,
                float(record, 4, "bb_width")?,
                float(record, 5, "bb_height")?,
            ),
            confidence: float(record, 6, "conf")?,
            class_id: record.get(7).and_then(|class| class.parse::<usize>().ok()),
        })
    }

    pub fn into_detection(self) -> Detection {
        Detection::new(self.track_id, self.bbox, self.confidence, self.class_id)
    }
}

fn track_id(record: &csv::StringRecord) -> Result<usize> {
    let id = field(record, 1, "id")?;
    if let Ok(id) = id.parse::<usize>() {
        return Ok(id);
    }

    // some trackers write identifiers as floats, e.g. `3.0`
    let id = id
        .parse::<f64>()
        .with_context(|| format!("invalid id in {:?}", record))?;
    if id < 0.0 || id.fract() != 0.0 || id >= usize::MAX as f64 {
        return Err(anyhow!("invalid track id {id} in {:?}", record));
    }
    Ok(id as usize)
}

fn field<'a>(record: &'a csv::StringRecord, index: usize, name: &str) -> Result<&'a str> {
    record
        .get(index)
        .ok_or_else(|| anyhow!("missing {name} column in {:?}", record))
}

fn float(record: &csv::StringRecord, index: usize, name: &str) -> Result<f32> {
    field(record, index, name)?
        .parse::<f32>()
        .with_context(|| format!("invalid {name} in {:?}", record))
}

/// Read a MOT tracker output file and group detections by frame.
///
/// # Parameters
///
/// * `path`: The tracker output file.
/// * `filter`: Detections it rejects are dropped.
pub fn read_frames(path: &Path, filter: &DetectionFilter) -> Result<Frames> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    read_detections(file, filter).with_context(|| format!("cannot read {}", path.display()))
}

pub fn read_detections<R: Read>(reader: R, filter: &DetectionFilter) -> Result<Frames> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut frames = Frames::new();
    for record in reader.records() {
        let record = MotRecord::from_record(&record?)?;
        let frame = record.frame;
        let detection = record.into_detection();
        if filter.accepts(&detection) {
            frames.entry(frame).or_default().push(detection);
        }
    }

    Ok(frames)
}

/// The outcome of counting one sequence.
#[derive(Debug, Clone)]
pub struct SequenceCount {
    pub total_frames: u64,
    pub processed_frames: u64,
    pub snapshot: CountsSnapshot,
    pub events: Vec<CrossingEvent<usize>>,
}

/// Feed the sampled frames of a sequence through the counter.
///
/// # Parameters
///
/// * `frames`: Detections grouped by 1-based frame number.
/// * `counter`: The counter for this sequence.
/// * `sampler`: Selects the frames to process.
/// * `total_frames`: Frames in the video. Defaults to the highest frame number in `frames`.
/// * `progress_interval`: Log progress every N processed frames, 0 to disable.
pub fn count_frames(
    mut frames: Frames,
    counter: &mut LineCrossingCounter,
    sampler: FrameSampler,
    total_frames: Option<u64>,
    progress_interval: u64,
) -> SequenceCount {
    let total_frames = total_frames
        .or_else(|| frames.keys().max().copied())
        .unwrap_or(0);

    info!(
        "{total_frames} frames, every {} frame(s)",
        sampler.every_n()
    );

    let mut events = Vec::new();
    let mut processed_frames = 0;

    for frame_number in 1..=total_frames {
        if !sampler.should_process(frame_number) {
            continue;
        }
        processed_frames += 1;

        // frames without detections are absent from the tracker output
        let detections = frames.swap_remove(&frame_number).unwrap_or_default();
        events.extend(
            counter.observe_frame(
                detections
                    .into_iter()
                    .map(|detection| detection.into_observation(frame_number)),
            ),
        );

        if progress_interval > 0 && processed_frames % progress_interval == 0 {
            let progress = Progress {
                frame_number,
                total_frames,
                snapshot: counter.snapshot(),
            };
            info!("{progress}");
        }
    }

    SequenceCount {
        total_frames,
        processed_frames,
        snapshot: counter.snapshot(),
        events,
    }
}

/// A progress line for a run in flight.
#[derive(Debug, Clone)]
pub struct Progress {
    pub frame_number: u64,
    pub total_frames: u64,
    pub snapshot: CountsSnapshot,
}

impl Progress {
    pub fn percent(&self) -> u64 {
        if self.total_frames == 0 {
            0
        } else {
            self.frame_number * 100 / self.total_frames
        }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frame {}/{} ({}%)",
            self.frame_number,
            self.total_frames,
            self.percent()
        )?;
        match self.snapshot.orientation {
            Orientation::Both => write!(
                f,
                " | H:{} V:{}",
                self.snapshot.horizontal_total(),
                self.snapshot.vertical_total()
            ),
            _ => write!(f, " | Detected: {}", self.snapshot.total_unique),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linecount_rs::{Direction, LineConfig};

    static TRACKER_OUTPUT: &str = "\
1,1.0,100.000,280.000,20.000,40.000,0.9,-1,-1,-1
1,2.0,190.000,480.000,20.000,40.000,0.1,-1,-1,-1
2,1.0,100.000,380.000,20.000,40.000,0.8,-1,-1,-1
2,3, 40.0, 80.0, 20.0, 40.0, -1
";

    #[test]
    fn read_tracker_output() -> Result<()> {
        let frames = read_detections(TRACKER_OUTPUT.as_bytes(), &DetectionFilter::default())?;

        assert_eq!(frames.keys().copied().collect::<Vec<_>>(), vec![1, 2]);

        // track 2 is below the confidence threshold
        let frame = &frames[&1];
        assert_eq!(frame.len(), 1);
        assert_eq!(*frame[0].track_id(), 1);
        assert_eq!(frame[0].center().y, 300.0);

        // missing world co-ordinates and unknown confidence are accepted
        let frame = &frames[&2];
        assert_eq!(frame.len(), 2);
        assert_eq!(*frame[1].track_id(), 3);
        assert_eq!(frame[1].confidence(), -1.0);

        Ok(())
    }

    #[test]
    fn reject_malformed_rows() {
        let filter = DetectionFilter::new(Some(0.0), None);
        assert!(read_detections("1,1.5,0,0,1,1,1\n".as_bytes(), &filter).is_err());
        assert!(read_detections("1,-2,0,0,1,1,1\n".as_bytes(), &filter).is_err());
        assert!(read_detections("x,1,0,0,1,1,1\n".as_bytes(), &filter).is_err());
        assert!(read_detections("1,1,0,0\n".as_bytes(), &filter).is_err());
    }

    #[test]
    fn large_track_ids_stay_distinct() -> Result<()> {
        let frames = read_detections(
            "1,16777216,0,0,1,1,1\n1,16777217,0,0,1,1,1\n1,16777218.0,0,0,1,1,1\n".as_bytes(),
            &DetectionFilter::new(Some(0.0), None),
        )?;

        let ids = frames[&1]
            .iter()
            .map(|detection| *detection.track_id())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![16777216, 16777217, 16777218]);

        Ok(())
    }

    #[test]
    fn filter_by_class_column() -> Result<()> {
        static GROUND_TRUTH: &str = "\
1,1,0,0,10,10,1,1,1.0
1,2,0,0,10,10,1,2,1.0
1,3,0,0,10,10,1,-1,-1
";
        let frames = read_detections(
            GROUND_TRUTH.as_bytes(),
            &DetectionFilter::new(None, Some(vec![1])),
        )?;

        // track 3 has no class and passes
        let frame = &frames[&1];
        assert_eq!(frame.len(), 2);
        assert_eq!(frame[0].class_id(), Some(1));
        assert_eq!(*frame[1].track_id(), 3);
        assert_eq!(frame[1].class_id(), None);

        Ok(())
    }

    fn detection(track_id: usize, y: f32) -> Detection {
        Detection::new(track_id, BoundingBox::new(40.0, y - 5.0, 10.0, 10.0), 0.9, None)
    }

    fn sequence() -> Frames {
        // frame 4 is missing and odd frames are skipped by the sampler
        [
            (2, vec![detection(1, 30.0), detection(2, 80.0)]),
            (3, vec![detection(2, 20.0)]),
            (6, vec![detection(1, 70.0)]),
            (8, vec![detection(1, 80.0), detection(2, 20.0)]),
            (9, vec![detection(3, 10.0)]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn count_sampled_frames() -> Result<()> {
        let mut counter = LineCrossingCounter::new(LineConfig::default(), 100, 100)?;
        let count = count_frames(
            sequence(),
            &mut counter,
            FrameSampler::try_from_factor(2)?,
            None,
            0,
        );

        // defaults to the last frame in the output, absent frames still count as processed
        assert_eq!(count.total_frames, 9);
        assert_eq!(count.processed_frames, 4);

        let events = count
            .events
            .iter()
            .map(|event| (event.track_id, event.direction, event.frame_index))
            .collect::<Vec<_>>();
        assert_eq!(events, vec![(1, Direction::Down, 6), (2, Direction::Up, 8)]);

        assert_eq!(count.snapshot.total_unique, 2);
        // track 3 only appears in a skipped frame
        assert_eq!(counter.tracks_seen(), 2);

        Ok(())
    }

    #[test]
    fn count_past_the_last_detection() -> Result<()> {
        let mut counter = LineCrossingCounter::new(LineConfig::default(), 100, 100)?;
        let count = count_frames(
            sequence(),
            &mut counter,
            FrameSampler::try_from_factor(2)?,
            Some(12),
            1,
        );

        assert_eq!(count.total_frames, 12);
        assert_eq!(count.processed_frames, 6);
        assert_eq!(count.events.len(), 2);

        let mut counter = LineCrossingCounter::new(LineConfig::default(), 100, 100)?;
        let count = count_frames(Frames::new(), &mut counter, FrameSampler::default(), None, 0);
        assert_eq!(count.total_frames, 0);
        assert_eq!(count.processed_frames, 0);
        assert!(count.events.is_empty());

        Ok(())
    }

    #[test]
    fn progress_line() {
        let mut progress = Progress {
            frame_number: 50,
            total_frames: 200,
            snapshot: CountsSnapshot {
                orientation: Orientation::Horizontal,
                up: 2,
                down: 3,
                left: 0,
                right: 0,
                total_unique: 5,
            },
        };
        assert_eq!(progress.to_string(), "Frame 50/200 (25%) | Detected: 5");

        progress.snapshot.orientation = Orientation::Both;
        progress.snapshot.left = 1;
        assert_eq!(progress.to_string(), "Frame 50/200 (25%) | H:5 V:1");
    }
}
