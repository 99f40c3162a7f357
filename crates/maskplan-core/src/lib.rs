//! # MaskPlan Core
//!
//! Placement engines for photomask layout: chip sites on a circular wafer
//! with keep-out zones, and image packing onto fixed-size reticle panels.
//!
//! Both engines are pure functions of their inputs; the exposure planner
//! in [`assembly`] composes them.

pub mod geometry;
pub mod error;
pub mod spatial;
pub mod wafer;
pub mod reticle;
pub mod assembly;

pub use assembly::{plan_exposure, ExposurePlan, ExposureRequest, WaferMap};
pub use error::{Result, TilingError};
pub use geometry::{classify_overlap, BBox, Circle, Overlap, Point};
pub use reticle::{ImagePlacement, ReticleLayout, ReticleTiler};
pub use wafer::{AvoidanceZone, PlacementPolicy, WaferTiler};
