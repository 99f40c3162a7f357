//! Chip placement on a circular wafer.
//!
//! Candidate chip centers lie on a regular grid whose pitch equals the chip
//! size, spanning the wafer radius plus one spare row/column on each side.
//! A candidate survives when its rectangle satisfies the wafer boundary
//! rule for the chosen [`PlacementPolicy`] and touches none of the
//! keep-out zones.

use serde::{Deserialize, Serialize};

use crate::error::{
    require_finite, require_non_negative, require_positive, require_positive_size, Result,
    TilingError,
};
use crate::geometry::{classify_overlap, BBox, Circle, Point};
use crate::spatial::ZoneIndex;

/// A circular keep-out region, e.g. the clearance around an alignment mark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AvoidanceZone {
    pub center: Point,
    /// Zero is a point exclusion.
    pub radius: f64,
}

impl AvoidanceZone {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.center, self.radius)
    }
}

/// Grid alignment and edge-inclusion policy for wafer tiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementPolicy {
    /// `true` puts a chip center on the wafer center, `false` a chip corner.
    pub chip_center: bool,
    /// `true` keeps chips that straddle the wafer edge.
    pub place_partial: bool,
}

impl Default for PlacementPolicy {
    fn default() -> Self {
        Self {
            chip_center: true,
            place_partial: false,
        }
    }
}

/// Wafer tiling parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaferTiler {
    /// Wafer radius; the wafer is centered on the origin.
    pub radius: f64,
    /// Chip (tile) size.
    pub tile_size: Point,
    pub policy: PlacementPolicy,
    pub avoid: Vec<AvoidanceZone>,
}

impl WaferTiler {
    pub fn new(radius: f64, tile_size: Point) -> Self {
        Self {
            radius,
            tile_size,
            policy: PlacementPolicy::default(),
            avoid: Vec::new(),
        }
    }

    pub fn with_policy(mut self, policy: PlacementPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_avoidance(mut self, zone: AvoidanceZone) -> Self {
        self.avoid.push(zone);
        self
    }

    pub fn validate(&self) -> Result<()> {
        require_positive("radius", self.radius)?;
        require_positive_size("tile_size.x", "tile_size.y", &self.tile_size)?;
        for zone in &self.avoid {
            require_finite("avoid.center.x", zone.center.x)?;
            require_finite("avoid.center.y", zone.center.y)?;
            require_non_negative("avoid.radius", zone.radius)?;
        }
        self.grid().map(|_| ())
    }

    /// Candidate axes, checked so the full grid can be indexed.
    fn grid(&self) -> Result<(GridAxis, GridAxis)> {
        let xs = GridAxis::new(self.radius, self.tile_size.x, self.policy.chip_center)?;
        let ys = GridAxis::new(self.radius, self.tile_size.y, self.policy.chip_center)?;
        if xs.samples.checked_mul(ys.samples).is_none() {
            return Err(too_many_cells(self.radius));
        }
        Ok((xs, ys))
    }

    /// Compute the chip centers, row by row from the bottom, left to right.
    pub fn tile(&self) -> Result<Vec<Point>> {
        self.validate()?;

        let boundary = Circle::at_origin(self.radius);
        let zones: Vec<Circle> = self.avoid.iter().map(AvoidanceZone::circle).collect();
        let index = ZoneIndex::build(&zones);

        let (xs, ys) = self.grid()?;

        let mut placements = Vec::new();
        for y in ys.iter() {
            for x in xs.iter() {
                let center = Point::new(x, y);
                let rect = BBox::centered(center, self.tile_size);

                if !classify_overlap(&rect, &boundary).accepts(self.policy.place_partial) {
                    continue;
                }

                let blocked = index
                    .query(&rect)
                    .into_iter()
                    .any(|i| classify_overlap(&rect, &zones[i]).accepts(true));
                if blocked {
                    continue;
                }

                placements.push(center);
            }
        }

        log::debug!(
            "Wafer r={}: {} of {} candidate sites kept ({} keep-out zones)",
            self.radius,
            placements.len(),
            xs.samples * ys.samples,
            zones.len()
        );
        Ok(placements)
    }
}

/// Compute chip centers on a wafer of `radius` centered on the origin.
pub fn tile(
    radius: f64,
    tile_size: Point,
    chip_center: bool,
    place_partial: bool,
    avoid: &[AvoidanceZone],
) -> Result<Vec<Point>> {
    WaferTiler {
        radius,
        tile_size,
        policy: PlacementPolicy {
            chip_center,
            place_partial,
        },
        avoid: avoid.to_vec(),
    }
    .tile()
}

/// Candidate center coordinates along one axis.
///
/// Samples `[-limit, limit]` at a pitch of `size`, where `limit` covers the
/// radius plus one spare tile. With `chip_center` the end point is included
/// so zero is a sample; otherwise the end point is dropped and every sample
/// shifts by half a tile so tile corners meet at zero.
#[derive(Debug, Clone, Copy)]
struct GridAxis {
    samples: usize,
    start: f64,
    stop: f64,
    step: f64,
    size: f64,
    chip_center: bool,
}

impl GridAxis {
    fn new(radius: f64, size: f64, chip_center: bool) -> Result<Self> {
        let cells = (radius / size).ceil();
        if !(cells < usize::MAX as f64) {
            return Err(too_many_cells(radius));
        }
        let count = (cells as usize)
            .checked_add(1)
            .ok_or_else(|| too_many_cells(radius))?;
        let samples = count
            .checked_mul(2)
            .and_then(|n| n.checked_add(usize::from(chip_center)))
            .ok_or_else(|| too_many_cells(radius))?;

        let limit = size * count as f64;
        let (start, stop) = (-limit, limit);
        let divisions = if chip_center { samples - 1 } else { samples };
        Ok(Self {
            samples,
            start,
            stop,
            step: (stop - start) / divisions as f64,
            size,
            chip_center,
        })
    }

    fn at(&self, i: usize) -> f64 {
        if self.chip_center {
            if i == self.samples - 1 {
                self.stop
            } else {
                i as f64 * self.step + self.start
            }
        } else {
            i as f64 * self.step + self.start + 0.5 * self.size
        }
    }

    fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.samples).map(move |i| self.at(i))
    }
}

fn too_many_cells(radius: f64) -> TilingError {
    TilingError::InvalidParameter {
        name: "radius",
        value: radius,
        reason: "needs more grid cells than can be indexed for this tile size",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn contains(points: &[Point], x: f64, y: f64) -> bool {
        points
            .iter()
            .any(|p| (p.x - x).abs() < 1e-10 && (p.y - y).abs() < 1e-10)
    }

    fn axis(radius: f64, size: f64, chip_center: bool) -> Vec<f64> {
        GridAxis::new(radius, size, chip_center).unwrap().iter().collect()
    }

    #[test]
    fn test_grid_axis_centered() {
        assert_eq!(axis(10.0, 10.0, true), vec![-20.0, -10.0, 0.0, 10.0, 20.0]);
    }

    #[test]
    fn test_grid_axis_corner_aligned() {
        assert_eq!(axis(10.0, 10.0, false), vec![-15.0, -5.0, 5.0, 15.0]);
    }

    #[test]
    fn test_grid_axis_covers_radius() {
        let xs = axis(95.0, 10.0, true);
        assert!(xs[0] <= -95.0 - 10.0);
        assert!(*xs.last().unwrap() >= 95.0 + 10.0);
    }

    #[test]
    fn test_unindexable_grid_is_rejected() {
        let tiny = Point::new(1e-300, 1e-300);
        assert!(matches!(
            tile(1e300, tiny, true, false, &[]),
            Err(TilingError::InvalidParameter { name: "radius", .. })
        ));

        // Each axis fits on its own but the full grid does not.
        let thin = Point::new(1.0, 1.0);
        let radius = (usize::MAX / 4) as f64;
        assert!(matches!(
            tile(radius, thin, false, false, &[]),
            Err(TilingError::InvalidParameter { name: "radius", .. })
        ));
    }

    #[test]
    fn test_partial_ring_around_center() {
        init_logging();
        let placements = tile(10.0, Point::new(10.0, 10.0), true, true, &[]).unwrap();
        assert_eq!(placements.len(), 9);
        for y in [-10.0, 0.0, 10.0] {
            for x in [-10.0, 0.0, 10.0] {
                assert!(contains(&placements, x, y), "missing ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_full_only_keeps_center() {
        let placements = tile(10.0, Point::new(10.0, 10.0), true, false, &[]).unwrap();
        assert_eq!(placements, vec![Point::new(0.0, 0.0)]);
    }

    #[test]
    fn test_generation_order_is_row_major() {
        let placements = tile(10.0, Point::new(10.0, 10.0), true, true, &[]).unwrap();
        let expected: Vec<Point> = [-10.0, 0.0, 10.0]
            .iter()
            .flat_map(|&y| [-10.0, 0.0, 10.0].map(|x| Point::new(x, y)))
            .collect();
        assert_eq!(placements, expected);
    }

    #[test]
    fn test_corner_aligned_quadrants() {
        // Four 10x10 chips meeting at the origin all fit in a radius-15 wafer.
        let placements = tile(15.0, Point::new(10.0, 10.0), false, false, &[]).unwrap();
        assert_eq!(placements.len(), 4);
        for (x, y) in [(-5.0, -5.0), (5.0, -5.0), (-5.0, 5.0), (5.0, 5.0)] {
            assert!(contains(&placements, x, y));
        }
    }

    #[test]
    fn test_tile_larger_than_wafer_is_placed() {
        // The wafer sits inside the single central chip.
        let placements = tile(1.0, Point::new(10.0, 10.0), true, false, &[]).unwrap();
        assert_eq!(placements, vec![Point::new(0.0, 0.0)]);
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        // Corner-aligned chips never contain the whole small wafer and
        // never sit inside it either.
        let placements = tile(1.0, Point::new(10.0, 10.0), false, false, &[]).unwrap();
        assert!(placements.is_empty());
    }

    #[test]
    fn test_point_exclusion_removes_single_tile() {
        let zone = AvoidanceZone::new(Point::new(0.0, 0.0), 0.0);
        let placements = tile(10.0, Point::new(10.0, 10.0), true, true, &[zone]).unwrap();
        assert_eq!(placements.len(), 8);
        assert!(!contains(&placements, 0.0, 0.0));
    }

    #[test]
    fn test_avoidance_ignores_place_partial() {
        // Zone grazes the right edge of the center chip only.
        let zone = AvoidanceZone::new(Point::new(4.0, 0.0), 0.5);
        let placements = tile(30.0, Point::new(10.0, 10.0), true, false, &[zone]).unwrap();
        assert!(!contains(&placements, 0.0, 0.0));
        assert!(contains(&placements, 10.0, 0.0));
        assert!(contains(&placements, -10.0, 0.0));
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(tile(0.0, Point::new(1.0, 1.0), true, true, &[]).is_err());
        assert!(tile(10.0, Point::new(0.0, 1.0), true, true, &[]).is_err());
        assert!(tile(10.0, Point::new(1.0, -1.0), true, true, &[]).is_err());
        let bad_zone = AvoidanceZone::new(Point::new(0.0, 0.0), -1.0);
        assert!(tile(10.0, Point::new(1.0, 1.0), true, true, &[bad_zone]).is_err());
    }

    #[test]
    fn test_builder_matches_free_function() {
        let zone = AvoidanceZone::new(Point::new(20.0, 20.0), 3.0);
        let tiler = WaferTiler::new(50.0, Point::new(7.0, 9.0))
            .with_policy(PlacementPolicy {
                chip_center: false,
                place_partial: true,
            })
            .with_avoidance(zone);
        let a = tiler.tile().unwrap();
        let b = tile(50.0, Point::new(7.0, 9.0), false, true, &[zone]).unwrap();
        assert_eq!(a, b);
    }
}
