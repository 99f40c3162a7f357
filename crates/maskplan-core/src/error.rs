use thiserror::Error;

use crate::geometry::Point;

// ── Errors ────────────────────────────────────────────────────────────

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TilingError {
    #[error("Invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Panel holds no images ({n_x} x {n_y} cells); the image does not fit even alone")]
    ZeroCapacity { n_x: usize, n_y: usize },

    #[error("Got {tags} image tag(s) for {images} placed image(s)")]
    TagCountMismatch { tags: usize, images: usize },
}

pub type Result<T> = std::result::Result<T, TilingError>;

// ── Validation helpers ───────────────────────────────────────────────

pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<()> {
    require_finite(name, value)?;
    if value <= 0.0 {
        return Err(TilingError::InvalidParameter {
            name,
            value,
            reason: "must be greater than zero",
        });
    }
    Ok(())
}

pub(crate) fn require_non_negative(name: &'static str, value: f64) -> Result<()> {
    require_finite(name, value)?;
    if value < 0.0 {
        return Err(TilingError::InvalidParameter {
            name,
            value,
            reason: "must not be negative",
        });
    }
    Ok(())
}

pub(crate) fn require_finite(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(TilingError::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        });
    }
    Ok(())
}

/// Both components of a size must be strictly positive.
pub(crate) fn require_positive_size(
    name_x: &'static str,
    name_y: &'static str,
    size: &Point,
) -> Result<()> {
    require_positive(name_x, size.x)?;
    require_positive(name_y, size.y)
}
