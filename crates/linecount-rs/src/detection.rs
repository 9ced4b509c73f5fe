use crate::{BoundingBox, Point, TrackObservation};

/// Detection represents a tracked bounding box in a single frame, as produced by an external tracker.
#[derive(Debug, Clone)]
pub struct Detection<T = usize> {
    /// Identifier assigned by the tracker.
    track_id: T,
    /// Bounding box in top, left, width, height format.
    bbox: BoundingBox,
    /// Detection confidence score.
    confidence: f32,
    /// Optional class identifier.
    class_id: Option<usize>,
}

impl<T> Detection<T> {
    /// Returns a new Detection
    ///
    /// # Parameters
    ///
    /// * `track_id`: The tracker assigned identifier.
    /// * `bbox`: A bounding box object.
    /// * `confidence`: Detection confidence score.
    /// * `class_id`: An optional class identifier.
    pub fn new(
        track_id: T,
        bbox: BoundingBox,
        confidence: f32,
        class_id: Option<usize>,
    ) -> Detection<T> {
        Detection {
            track_id,
            bbox,
            confidence,
            class_id,
        }
    }

    /// Returns the track identifier of the detection
    pub fn track_id(&self) -> &T {
        &self.track_id
    }

    /// Returns a BoundingBox of the detection co-ordinates
    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// Returns the confidence of the detection
    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    /// Returns the class identifier of the detection
    pub fn class_id(&self) -> Option<usize> {
        self.class_id
    }

    /// Returns the center of the bounding box
    pub fn center(&self) -> Point {
        self.bbox.center()
    }

    /// Converts the detection into the observation consumed by the counter.
    pub fn into_observation(self, frame_index: u64) -> TrackObservation<T> {
        let center = self.bbox.center();
        TrackObservation::new(self.track_id, center, frame_index)
    }
}

/// DetectionFilter decides which detections reach the counter.
///
/// Negative confidences mean the tracker did not report one and always pass. Detections without a class pass the
/// class gate.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionFilter {
    /// Detections scoring below this are dropped.
    min_confidence: f32,
    /// Accepted class identifiers, or any class when `None`.
    classes: Option<Vec<usize>>,
}

impl Default for DetectionFilter {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl DetectionFilter {
    /// Returns a new DetectionFilter
    ///
    /// # Arguments
    ///
    /// * `min_confidence`: Minimum confidence score. Default `0.15`.
    /// * `classes`: Accepted class identifiers. Default any class.
    pub fn new(min_confidence: Option<f32>, classes: Option<Vec<usize>>) -> DetectionFilter {
        DetectionFilter {
            min_confidence: min_confidence.unwrap_or(0.15),
            classes,
        }
    }

    pub fn min_confidence(&self) -> f32 {
        self.min_confidence
    }

    pub fn classes(&self) -> Option<&[usize]> {
        self.classes.as_deref()
    }

    /// Returns true if the detection should be counted.
    pub fn accepts<T>(&self, detection: &Detection<T>) -> bool {
        let confidence = detection.confidence();
        if confidence >= 0.0 && confidence < self.min_confidence {
            return false;
        }

        match (&self.classes, detection.class_id()) {
            (Some(classes), Some(class_id)) => classes.contains(&class_id),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn into_observation() {
        let detection = Detection::new(
            7,
            BoundingBox::from_tlbr(10.0, 20.0, 30.0, 60.0),
            0.8,
            Some(1),
        );
        assert_eq!(detection.center(), Point::new(20.0, 40.0));
        assert_eq!(detection.class_id(), Some(1));

        let observation = detection.into_observation(12);
        assert_eq!(observation.track_id(), &7);
        assert_eq!(observation.center(), Point::new(20.0, 40.0));
        assert_eq!(observation.frame_index(), 12);
    }

    #[test]
    fn filter_by_confidence() {
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        let filter = DetectionFilter::default();
        assert_eq!(filter.min_confidence(), 0.15);

        assert!(filter.accepts(&Detection::new(1, bbox, 0.15, None)));
        assert!(!filter.accepts(&Detection::new(1, bbox, 0.1, None)));
        // not reported
        assert!(filter.accepts(&Detection::new(1, bbox, -1.0, None)));
    }

    #[test]
    fn filter_by_class() {
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        let filter = DetectionFilter::new(Some(0.5), Some(vec![1]));
        assert_eq!(filter.classes(), Some(&[1][..]));

        assert!(filter.accepts(&Detection::new(1, bbox, 0.9, Some(1))));
        assert!(!filter.accepts(&Detection::new(1, bbox, 0.9, Some(0))));
        assert!(filter.accepts(&Detection::new(1, bbox, 0.9, None)));
        assert!(!filter.accepts(&Detection::new(1, bbox, 0.4, Some(1))));

        // persons as well as bicycles
        let filter = DetectionFilter::new(None, Some(vec![0, 1]));
        assert!(filter.accepts(&Detection::new(1, bbox, 0.9, Some(0))));
        assert!(!filter.accepts(&Detection::new(1, bbox, 0.9, Some(2))));
    }
}
