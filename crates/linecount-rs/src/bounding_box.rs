use crate::Point;
use serde::{Deserialize, Serialize};

/// BoundingBox represents the bounding box of a tracked detection in frame-pixel co-ordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left of the bounding box (i.e. min-x)
    x: f32,
    /// Top of the bounding box (i.e. min-y)
    y: f32,
    /// Width of the bounding box
    width: f32,
    /// Height of the bounding box
    height: f32,
}

impl PartialEq for BoundingBox {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x
            && self.y == other.y
            && self.width == other.width
            && self.height == other.height
    }
}

impl BoundingBox {
    /// Returns a new BoundingBox
    ///
    /// # Parameters
    ///
    /// * `x`: Bounding box left.
    /// * `y`: Bounding box top.
    /// * `width`: Bounding box width.
    /// * `height`: Bounding box height.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> BoundingBox {
        BoundingBox {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns a new BoundingBox from corner co-ordinates, i.e. `(x1, y1, x2, y2)` as emitted by most detectors.
    ///
    /// The corners may be given in either order.
    pub fn from_tlbr(x1: f32, y1: f32, x2: f32, y2: f32) -> BoundingBox {
        let (left, right) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let (top, bottom) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
        BoundingBox::new(left, top, right - left, bottom - top)
    }

    /// Returns the bounding box in top-left, bottom-right format, i.e., `(min x, min y, max x, max y)`.
    pub fn to_tlbr(&self) -> [f32; 4] {
        [self.x, self.y, self.x + self.width, self.y + self.height]
    }

    /// Returns the center of the bounding box, `((x1 + x2) / 2, (y1 + y2) / 2)`.
    pub fn center(&self) -> Point {
        let [x1, y1, x2, y2] = self.to_tlbr();
        Point::new((x1 + x2) / 2.0, (y1 + y2) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn to_tlbr() {
        let bbox = BoundingBox::new(1.0, 2.0, 13.0, 4.0);
        assert_eq!(bbox.to_tlbr(), [1.0, 2.0, 14.0, 6.0]);
    }

    #[test]
    fn from_tlbr() {
        let bbox = BoundingBox::from_tlbr(1.0, 2.0, 14.0, 6.0);
        assert_eq!(bbox, BoundingBox::new(1.0, 2.0, 13.0, 4.0));

        // swapped corners describe the same box
        let bbox = BoundingBox::from_tlbr(14.0, 6.0, 1.0, 2.0);
        assert_eq!(bbox, BoundingBox::new(1.0, 2.0, 13.0, 4.0));
    }

    #[test]
    fn center() {
        let bbox = BoundingBox::new(1.0, 2.0, 13.0, 4.0);
        assert_eq!(bbox.center(), Point::new(7.5, 4.0));
    }
}
