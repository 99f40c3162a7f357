use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use maskplan_core::{plan_exposure, ExposurePlan, Point};

use crate::error::{IoError, Result};
use crate::job::JobConfig;

/// Placement of one image on its reticle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Caller's identifier for the image (source layer number).
    pub tag: u32,
    pub reticle: usize,
    pub x: f64,
    pub y: f64,
}

/// The ordered, replayable output of a job: where every image sits on
/// which reticle, and where every reticle field is exposed on the wafer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementPlan {
    pub job: String,
    pub id: String,
    pub label: String,
    pub reticle_count: usize,
    /// One record per image, in job order.
    pub images: Vec<ImageRecord>,
    pub field_size: Point,
    /// Field centers on the wafer, row by row from the bottom.
    pub sites: Vec<Point>,
    pub marks: Vec<Point>,
}

impl PlacementPlan {
    /// Plan a job.
    pub fn run(config: &JobConfig) -> Result<Self> {
        if config.images.is_empty() {
            return Err(IoError::NoImages);
        }
        let plan = plan_exposure(&config.to_request())?;
        Self::from_exposure(config, plan)
    }

    fn from_exposure(config: &JobConfig, plan: ExposurePlan) -> Result<Self> {
        let images = plan
            .reticle
            .tagged(&config.images)?
            .into_iter()
            .map(|(&tag, p)| ImageRecord {
                tag,
                reticle: p.panel,
                x: p.position.x,
                y: p.position.y,
            })
            .collect();

        Ok(Self {
            job: config.name.clone(),
            id: plan.id,
            label: plan.label,
            reticle_count: plan.reticle.panel_count,
            images,
            field_size: plan.wafer.field_size,
            sites: plan.wafer.sites,
            marks: plan.wafer.marks,
        })
    }

    /// Images on one reticle, in fill order.
    pub fn images_on(&self, reticle: usize) -> Vec<&ImageRecord> {
        self.images.iter().filter(|r| r.reticle == reticle).collect()
    }

    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    // ── Serialization ────────────────────────────────────────────────

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?).map_err(IoError::at(path))?;
        log::info!(
            "Wrote plan for '{}' ({} images, {} sites) to {}",
            self.job,
            self.images.len(),
            self.sites.len(),
            path.display()
        );
        Ok(())
    }

    pub fn read_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(IoError::at(path))?;
        Self::from_json(&json)
    }
}
