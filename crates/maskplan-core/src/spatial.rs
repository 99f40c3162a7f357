use rstar::{RTree, RTreeObject, AABB};

use crate::geometry::{BBox, Circle};

/// An entry in the R-tree spatial index, referencing a keep-out zone by its index.
#[derive(Debug, Clone)]
pub struct SpatialEntry {
    /// Index into the caller's zone slice.
    pub zone_index: usize,
    /// Bounding box of the zone circle.
    pub bbox: BBox,
}

impl RTreeObject for SpatialEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.bbox.min.x, self.bbox.min.y],
            [self.bbox.max.x, self.bbox.max.y],
        )
    }
}

/// Spatial index over circular keep-out zones.
///
/// Envelopes are padded by a few ulps so the index never drops a zone the
/// exact circle test would report as touching; callers still run the exact
/// test on every hit.
pub struct ZoneIndex {
    tree: RTree<SpatialEntry>,
}

impl ZoneIndex {
    /// Build the index from a list of zone circles.
    pub fn build(zones: &[Circle]) -> Self {
        let entries = zones
            .iter()
            .enumerate()
            .map(|(zone_index, circle)| SpatialEntry {
                zone_index,
                bbox: padded(circle.bbox()),
            })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Indices of all zones whose envelope touches `rect`, in ascending order.
    pub fn query(&self, rect: &BBox) -> Vec<usize> {
        let envelope = AABB::from_corners([rect.min.x, rect.min.y], [rect.max.x, rect.max.y]);
        let mut hits: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|e| e.zone_index)
            .collect();
        hits.sort_unstable();
        hits
    }
}

fn padded(bbox: BBox) -> BBox {
    let magnitude = bbox
        .min
        .x
        .abs()
        .max(bbox.min.y.abs())
        .max(bbox.max.x.abs())
        .max(bbox.max.y.abs())
        .max(1.0);
    let pad = 4.0 * f64::EPSILON * magnitude;
    BBox::new(bbox.min.translate(-pad, -pad), bbox.max.translate(pad, pad))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    #[test]
    fn test_zone_query() {
        let zones = vec![
            Circle::new(Point::new(0.0, 0.0), 5.0),
            Circle::new(Point::new(100.0, 100.0), 5.0),
        ];
        let index = ZoneIndex::build(&zones);

        let near_origin = BBox::new(Point::new(-1.0, -1.0), Point::new(1.0, 1.0));
        assert_eq!(index.query(&near_origin), vec![0]);

        let far = BBox::new(Point::new(90.0, 90.0), Point::new(96.0, 96.0));
        assert_eq!(index.query(&far), vec![1]);

        let nowhere = BBox::new(Point::new(40.0, 40.0), Point::new(50.0, 50.0));
        assert!(index.query(&nowhere).is_empty());
    }

    #[test]
    fn test_touching_envelope_is_reported() {
        let index = ZoneIndex::build(&[Circle::new(Point::new(15.0, 0.0), 0.0)]);
        let rect = BBox::new(Point::new(5.0, -5.0), Point::new(15.0, 5.0));
        assert_eq!(index.query(&rect), vec![0]);
    }

    #[test]
    fn test_no_zones() {
        let index = ZoneIndex::build(&[]);
        let rect = BBox::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        assert!(index.query(&rect).is_empty());
    }
}
