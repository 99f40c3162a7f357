//! Exposure planning: reticle panels stepped across a wafer.
//!
//! Images are first packed onto reticle panels; the reticle field, reduced
//! to wafer scale, is then stepped across the wafer while keeping clear of
//! the alignment marks.

use serde::{Deserialize, Serialize};

use crate::error::{require_finite, require_non_negative, require_positive_size, Result};
use crate::geometry::Point;
use crate::reticle::{ReticleLayout, ReticleTiler};
use crate::wafer::{AvoidanceZone, PlacementPolicy, WaferTiler};

/// Keep-out radius around each alignment mark.
pub const DEFAULT_MARK_CLEARANCE: f64 = 500.0;

/// Everything needed to plan one exposure job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureRequest {
    /// Reticle ID, printed on the wafer.
    pub id: String,
    /// Free-form label printed next to the ID.
    pub label: String,
    pub wafer_radius: f64,
    pub policy: PlacementPolicy,
    /// Alignment mark positions on the wafer.
    pub marks: Vec<Point>,
    pub mark_clearance: f64,
    pub reticle: ReticleTiler,
    pub image_count: usize,
    /// Size of one exposure field on the wafer. Defaults to the reticle
    /// panel reduced by the reticle scale.
    pub field_size: Option<Point>,
}

impl ExposureRequest {
    pub fn field_size(&self) -> Point {
        self.field_size
            .unwrap_or_else(|| self.reticle.panel_size.scale(1.0 / self.reticle.scale))
    }

    fn wafer_tiler(&self) -> WaferTiler {
        let avoid = self
            .marks
            .iter()
            .map(|&mark| AvoidanceZone::new(mark, self.mark_clearance))
            .collect();
        WaferTiler {
            radius: self.wafer_radius,
            tile_size: self.field_size(),
            policy: self.policy,
            avoid,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.reticle.validate()?;
        require_non_negative("mark_clearance", self.mark_clearance)?;
        for mark in &self.marks {
            require_finite("marks.x", mark.x)?;
            require_finite("marks.y", mark.y)?;
        }
        if let Some(field) = &self.field_size {
            require_positive_size("field_size.x", "field_size.y", field)?;
        }
        self.wafer_tiler().validate()
    }
}

/// Exposure sites and fixtures on the wafer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaferMap {
    pub radius: f64,
    pub field_size: Point,
    /// Field centers, row by row from the bottom.
    pub sites: Vec<Point>,
    pub marks: Vec<Point>,
}

/// A complete, replayable exposure plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposurePlan {
    /// Upper-cased reticle ID.
    pub id: String,
    /// Upper-cased label.
    pub label: String,
    pub reticle: ReticleLayout,
    pub wafer: WaferMap,
}

/// Pack the images onto reticles and step the reticle field across the wafer.
pub fn plan_exposure(request: &ExposureRequest) -> Result<ExposurePlan> {
    request.validate()?;

    let reticle = request.reticle.layout(request.image_count)?;
    let tiler = request.wafer_tiler();
    let sites = tiler.tile()?;

    let id = request.id.to_uppercase();
    log::info!(
        "Exposure plan {}: {} image(s) on {} reticle(s), {} wafer site(s)",
        id,
        request.image_count,
        reticle.panel_count,
        sites.len()
    );

    Ok(ExposurePlan {
        id,
        label: request.label.to_uppercase(),
        reticle,
        wafer: WaferMap {
            radius: request.wafer_radius,
            field_size: tiler.tile_size,
            sites,
            marks: request.marks.clone(),
        },
    })
}
