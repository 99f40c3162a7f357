//! # MaskPlan I/O
//!
//! JSON job descriptions and placement plan files. A job file describes
//! the wafer, the reticle and the images to place; running it yields a
//! placement plan that downstream layout tools replay.

pub mod error;
pub mod job;
pub mod plan;

pub use error::IoError;
pub use job::{JobConfig, ReticleSettings, WaferSettings};
pub use plan::{ImageRecord, PlacementPlan};
