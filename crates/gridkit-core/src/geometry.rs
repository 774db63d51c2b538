//! Geometry primitives shared by every GridKit engine.
//!
//! These are plain value types: they carry no behavior beyond construction
//! defaults and a handful of arithmetic helpers. Canvas space and screen
//! space both use [`Point`]; which space a value lives in is up to the caller.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// A 2D point or vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The origin (0, 0).
    pub const fn origin() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// True when both components are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Width and height of a surface (the viewport, a panel).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero, negative or not finite.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }
}

/// Axis-aligned rectangle given by its top-left corner and extent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bounds anchored at the origin.
    pub const fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn min(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn max(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x <= self.x + self.width
            && point.y <= self.y + self.height
    }

    /// Smallest bounds enclosing both `self` and `other`.
    pub fn union(&self, other: &Bounds) -> Bounds {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        let max_x = (self.x + self.width).max(other.x + other.width);
        let max_y = (self.y + self.height).max(other.y + other.height);
        Bounds::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    pub fn is_degenerate(&self) -> bool {
        self.size().is_degenerate()
    }
}

/// Placement of a panel's content: translation, scale, rotation (degrees)
/// about a normalized pivot.
///
/// Scale components of zero or below are representable; what they mean when
/// drawn is up to the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Point,
    pub scale: Point,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Pivot in normalized panel space (0..1).
    pub pivot: Point,
}

impl Transform {
    pub const fn new(position: Point, scale: Point, rotation: f64, pivot: Point) -> Self {
        Self {
            position,
            scale,
            rotation,
            pivot,
        }
    }

    /// Identity transform with a uniform scale factor.
    pub fn scaled(factor: f64) -> Self {
        Self {
            scale: Point::new(factor, factor),
            ..Self::default()
        }
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Point::new(x, y);
        self
    }

    pub fn with_scale(mut self, x: f64, y: f64) -> Self {
        self.scale = Point::new(x, y);
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Point::origin(),
            scale: Point::new(1.0, 1.0),
            rotation: 0.0,
            pivot: Point::new(0.5, 0.5),
        }
    }
}

/// Normalized crop rectangle in panel space. A panel without a crop holds
/// `None` instead.
///
/// The model never enforces the unit-square bounds; use
/// [`CropRegion::is_within_unit`] before accepting user input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRegion {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The whole panel.
    pub const fn full() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }

    /// Checks `0 <= x, y` and `x + width <= 1`, `y + height <= 1` with
    /// positive extent.
    pub fn is_within_unit(&self) -> bool {
        const EPS: f64 = 1e-9;
        self.x >= 0.0
            && self.y >= 0.0
            && self.width > 0.0
            && self.height > 0.0
            && self.x + self.width <= 1.0 + EPS
            && self.y + self.height <= 1.0 + EPS
    }

    /// Width over height of the cropped area, in normalized units.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.height > 0.0 {
            Some(self.width / self.height)
        } else {
            None
        }
    }
}
