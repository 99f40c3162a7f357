use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use maskplan_core::assembly::DEFAULT_MARK_CLEARANCE;
use maskplan_core::{ExposureRequest, PlacementPolicy, Point, ReticleTiler};

use crate::error::{IoError, Result};

/// An exposure job as stored in a `.json` job file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    pub name: String,
    /// Reticle ID.
    pub id: String,
    pub label: String,
    pub wafer: WaferSettings,
    pub reticle: ReticleSettings,
    /// Identifiers of the images to place (source layer numbers), in
    /// placement order.
    pub images: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaferSettings {
    pub radius: f64,
    pub chip_center: bool,
    pub place_partial: bool,
    pub marks: Vec<Point>,
    pub mark_clearance: f64,
    /// Exposure field on the wafer; derived from the reticle when absent.
    pub field_size: Option<Point>,
}

impl Default for WaferSettings {
    fn default() -> Self {
        Self {
            radius: 150_000.0, // 300mm wafer, microns
            chip_center: true,
            place_partial: false,
            marks: Vec::new(),
            mark_clearance: DEFAULT_MARK_CLEARANCE,
            field_size: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReticleSettings {
    /// Usable panel size at reticle scale.
    pub size: Point,
    /// Reticle-to-wafer reduction.
    pub scale: f64,
    pub clearance: f64,
    /// Image size at wafer scale.
    pub image_size: Point,
}

impl Default for ReticleSettings {
    fn default() -> Self {
        Self {
            size: Point::new(104_000.0, 132_000.0), // 26 x 33 mm field at 4x
            scale: 4.0,
            clearance: 0.0,
            image_size: Point::new(10_000.0, 10_000.0),
        }
    }
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            name: "untitled".to_string(),
            id: String::new(),
            label: String::new(),
            wafer: WaferSettings::default(),
            reticle: ReticleSettings::default(),
            images: Vec::new(),
        }
    }
}

impl JobConfig {
    pub fn new(name: &str, id: &str) -> Self {
        Self {
            name: name.to_string(),
            id: id.to_string(),
            ..Default::default()
        }
    }

    pub fn with_images(mut self, images: Vec<u32>) -> Self {
        self.images = images;
        self
    }

    /// The core planner's view of this job.
    pub fn to_request(&self) -> ExposureRequest {
        ExposureRequest {
            id: self.id.clone(),
            label: self.label.clone(),
            wafer_radius: self.wafer.radius,
            policy: PlacementPolicy {
                chip_center: self.wafer.chip_center,
                place_partial: self.wafer.place_partial,
            },
            marks: self.wafer.marks.clone(),
            mark_clearance: self.wafer.mark_clearance,
            reticle: ReticleTiler::new(
                self.reticle.size,
                self.reticle.scale,
                self.reticle.clearance,
                self.reticle.image_size,
            ),
            image_count: self.images.len(),
            field_size: self.wafer.field_size,
        }
    }

    // ── Serialization ────────────────────────────────────────────────

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(IoError::at(path))?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded job '{}' from {}", config.name, path.display());
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?).map_err(IoError::at(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = JobConfig::from_json(r#"{ "name": "lot7", "images": [1, 2, 3] }"#).unwrap();
        assert_eq!(config.name, "lot7");
        assert_eq!(config.images, vec![1, 2, 3]);
        assert!((config.wafer.radius - 150_000.0).abs() < 1e-10);
        assert!((config.wafer.mark_clearance - 500.0).abs() < 1e-10);
        assert!(config.wafer.field_size.is_none());
    }

    #[test]
    fn test_to_request() {
        let mut config = JobConfig::new("lot7", "r1").with_images(vec![4, 5]);
        config.wafer.place_partial = true;
        config.wafer.marks = vec![Point::new(1.0, 2.0)];
        let request = config.to_request();
        assert_eq!(request.image_count, 2);
        assert!(request.policy.place_partial);
        assert!(request.policy.chip_center);
        assert_eq!(request.marks, vec![Point::new(1.0, 2.0)]);
        // 104000 x 132000 panel at 4x reduction.
        assert_eq!(request.field_size(), Point::new(26_000.0, 33_000.0));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.json");
        let config = JobConfig::new("lot7", "r1").with_images(vec![10, 11]);
        config.save(&path).unwrap();
        let loaded = JobConfig::load(&path).unwrap();
        assert_eq!(loaded.name, "lot7");
        assert_eq!(loaded.images, vec![10, 11]);
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = JobConfig::load("/nonexistent/job.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/job.json"));
    }
}
