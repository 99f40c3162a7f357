//! Image packing onto reticle panels.
//!
//! Each panel holds an `n_x` x `n_y` grid of cells, one scaled image plus
//! one clearance gap per cell, centered on the panel origin. Images fill
//! cells row by row from the bottom left; a new panel starts when the
//! current one is full.

use serde::{Deserialize, Serialize};

use crate::error::{require_non_negative, require_positive, require_positive_size, Result, TilingError};
use crate::geometry::Point;

/// Where one image landed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImagePlacement {
    /// Position of the image in the input sequence.
    pub image: usize,
    /// Panel (reticle) the image is placed on.
    pub panel: usize,
    /// Image center relative to the panel center.
    pub position: Point,
}

/// Result of packing a sequence of images onto panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReticleLayout {
    pub panel_count: usize,
    /// Cells per panel along x.
    pub n_x: usize,
    /// Cells per panel along y.
    pub n_y: usize,
    /// One entry per image, ordered by image index.
    pub placements: Vec<ImagePlacement>,
}

impl ReticleLayout {
    pub fn capacity(&self) -> usize {
        self.n_x * self.n_y
    }

    /// Placements on one panel, in fill order.
    pub fn on_panel(&self, panel: usize) -> impl Iterator<Item = &ImagePlacement> {
        self.placements.iter().filter(move |p| p.panel == panel)
    }

    /// Pair each placement with the caller's identifier for that image
    /// (e.g. its source layer). `tags` must hold exactly one entry per image.
    pub fn tagged<'a, T>(&self, tags: &'a [T]) -> Result<Vec<(&'a T, ImagePlacement)>> {
        if tags.len() != self.placements.len() {
            return Err(TilingError::TagCountMismatch {
                tags: tags.len(),
                images: self.placements.len(),
            });
        }
        Ok(tags.iter().zip(self.placements.iter().copied()).collect())
    }
}

/// Reticle packing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReticleTiler {
    /// Panel size, at reticle scale.
    pub panel_size: Point,
    /// Magnification from image scale to reticle scale.
    pub scale: f64,
    /// Minimum gap between neighbouring images, at reticle scale.
    pub clearance: f64,
    /// Image size, at image scale.
    pub image_size: Point,
}

impl ReticleTiler {
    pub fn new(panel_size: Point, scale: f64, clearance: f64, image_size: Point) -> Self {
        Self {
            panel_size,
            scale,
            clearance,
            image_size,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_positive_size("panel_size.x", "panel_size.y", &self.panel_size)?;
        require_positive("scale", self.scale)?;
        require_non_negative("clearance", self.clearance)?;
        require_positive_size("image_size.x", "image_size.y", &self.image_size)
    }

    /// Distance between neighbouring cell centers.
    pub fn pitch(&self) -> Point {
        Point::new(
            self.scale * self.image_size.x + self.clearance,
            self.scale * self.image_size.y + self.clearance,
        )
    }

    /// Number of cells along each axis of a panel. A panel's total cell
    /// count always fits in a `usize`.
    pub fn cells(&self) -> Result<(usize, usize)> {
        self.validate()?;
        let pitch = self.pitch();
        let n_x = cell_count("panel_size.x", self.panel_size.x, self.clearance, pitch.x)?;
        let n_y = cell_count("panel_size.y", self.panel_size.y, self.clearance, pitch.y)?;
        if n_x.checked_mul(n_y).is_none() {
            return Err(TilingError::InvalidParameter {
                name: "panel_size",
                value: self.panel_size.x * self.panel_size.y,
                reason: "holds more cells than can be indexed",
            });
        }
        Ok((n_x, n_y))
    }

    /// Pack `image_count` images.
    pub fn layout(&self, image_count: usize) -> Result<ReticleLayout> {
        let (n_x, n_y) = self.cells()?;
        let capacity = n_x * n_y;
        if capacity == 0 {
            if image_count > 0 {
                return Err(TilingError::ZeroCapacity { n_x, n_y });
            }
            return Ok(ReticleLayout {
                panel_count: 0,
                n_x,
                n_y,
                placements: Vec::new(),
            });
        }

        let panel_count = image_count.div_ceil(capacity);
        let pitch = self.pitch();
        let offset_x = -0.5 * (n_x as f64 - 1.0) * pitch.x;
        let offset_y = -0.5 * (n_y as f64 - 1.0) * pitch.y;

        let mut placements = Vec::with_capacity(image_count);
        'panels: for r in 0..panel_count {
            for y in 0..n_y {
                for x in 0..n_x {
                    let i = x + y * n_x + r * capacity;
                    if i >= image_count {
                        break 'panels;
                    }
                    placements.push(ImagePlacement {
                        image: i,
                        panel: r,
                        position: Point::new(
                            x as f64 * pitch.x + offset_x,
                            y as f64 * pitch.y + offset_y,
                        ),
                    });
                }
            }
        }

        log::debug!(
            "Packed {} images into {} panel(s) of {}x{} cells",
            image_count,
            panel_count,
            n_x,
            n_y
        );
        Ok(ReticleLayout {
            panel_count,
            n_x,
            n_y,
            placements,
        })
    }
}

/// Pack `image_count` images of `image_size` onto panels of `panel_size`.
pub fn tile(
    panel_size: Point,
    scale: f64,
    clearance: f64,
    image_size: Point,
    image_count: usize,
) -> Result<(usize, Vec<ImagePlacement>)> {
    let layout = ReticleTiler::new(panel_size, scale, clearance, image_size).layout(image_count)?;
    Ok((layout.panel_count, layout.placements))
}

fn cell_count(name: &'static str, panel: f64, clearance: f64, pitch: f64) -> Result<usize> {
    let n = floor_div(panel + clearance, pitch);
    if !(n < usize::MAX as f64) {
        return Err(TilingError::InvalidParameter {
            name,
            value: panel,
            reason: "holds more cells than can be indexed",
        });
    }
    Ok(n as usize)
}

/// Floored float division with the rounding of a remainder-based `//`:
/// `1.0 // 0.1` is 9, not `floor(1.0 / 0.1)` = 10.
fn floor_div(a: f64, b: f64) -> f64 {
    let rem = a % b;
    let mut div = (a - rem) / b;
    if rem != 0.0 && (b < 0.0) != (rem < 0.0) {
        div -= 1.0;
    }
    let floored = div.floor();
    if div - floored > 0.5 {
        floored + 1.0
    } else {
        floored
    }
}
