use serde::{Deserialize, Serialize};

/// A 2D point or size in layout coordinates (microns).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub min: Point,
    pub max: Point,
}

impl BBox {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// The box of a `size`-sized rectangle centered on `center`.
    pub fn centered(center: Point, size: Point) -> Self {
        Self {
            min: Point::new(center.x - 0.5 * size.x, center.y - 0.5 * size.y),
            max: Point::new(center.x + 0.5 * size.x, center.y + 0.5 * size.y),
        }
    }

    pub fn left(&self) -> f64 {
        self.min.x
    }

    pub fn right(&self) -> f64 {
        self.max.x
    }

    pub fn bottom(&self) -> f64 {
        self.min.y
    }

    pub fn top(&self) -> f64 {
        self.max.y
    }
}

/// A circle: the wafer boundary or a keep-out zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    /// A circle centered on the origin.
    pub fn at_origin(radius: f64) -> Self {
        Self::new(Point::new(0.0, 0.0), radius)
    }

    pub fn bbox(&self) -> BBox {
        BBox::new(
            self.center.translate(-self.radius, -self.radius),
            self.center.translate(self.radius, self.radius),
        )
    }
}

/// How a circle and an axis-aligned rectangle relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Overlap {
    /// The circle lies entirely within the rectangle.
    CircleInsideRect,
    /// The rectangle lies entirely within the circle.
    RectInsideCircle,
    /// The two shapes intersect but neither contains the other.
    Partial,
    Disjoint,
}

impl Overlap {
    /// Whether a tile with this overlap is kept. Containment in either
    /// direction always counts; a partial overlap only when `partial` is set.
    pub fn accepts(self, partial: bool) -> bool {
        match self {
            Overlap::CircleInsideRect | Overlap::RectInsideCircle => true,
            Overlap::Partial => partial,
            Overlap::Disjoint => false,
        }
    }
}

/// Classify a rectangle against a circle.
///
/// The cases are tested in a fixed order: circle-in-rectangle, then
/// rectangle-in-circle, then partial intersection via the rectangle point
/// closest to the circle center. All comparisons are inclusive, so shapes
/// that merely touch count as overlapping.
pub fn classify_overlap(rect: &BBox, circle: &Circle) -> Overlap {
    let (cx, cy, r) = (circle.center.x, circle.center.y, circle.radius);
    let (left, right, bottom, top) = (rect.left(), rect.right(), rect.bottom(), rect.top());

    if cx - r >= left && cx + r <= right && cy - r >= bottom && cy + r <= top {
        return Overlap::CircleInsideRect;
    }

    let dx = (left - cx).abs().max((right - cx).abs());
    let dy = (bottom - cy).abs().max((top - cy).abs());
    if norm(dx, dy) <= r {
        return Overlap::RectInsideCircle;
    }

    let cdx = cx - left.max(cx.min(right));
    let cdy = cy - bottom.max(cy.min(top));
    if norm(cdx, cdy) <= r {
        return Overlap::Partial;
    }

    Overlap::Disjoint
}

// Plain sqrt of the sum of squares; `f64::hypot` rounds differently at the
// inclusive boundary.
fn norm(x: f64, y: f64) -> f64 {
    (x * x + y * y).sqrt()
}
