use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::domain::errors::{ChartError, ChartResult};
use crate::domain::math::AR1;

/// Value Object - zoom/pan state: `screen = k * p + (x, y)`
#[derive(Debug, Clone, Copy, PartialEq, Display, Serialize, Deserialize)]
#[display(fmt = "translate({},{}) scale({})", x, y, k)]
pub struct ZoomTransform {
    pub k: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomTransform {
    pub const IDENTITY: ZoomTransform = ZoomTransform { k: 1.0, x: 0.0, y: 0.0 };

    pub fn new(k: f64, x: f64, y: f64) -> Self {
        Self { k, x, y }
    }

    pub fn apply_x(&self, p: f64) -> f64 {
        p * self.k + self.x
    }

    pub fn apply_y(&self, p: f64) -> f64 {
        p * self.k + self.y
    }

    pub fn invert_x(&self, p: f64) -> f64 {
        (p - self.x) / self.k
    }

    pub fn invert_y(&self, p: f64) -> f64 {
        (p - self.y) / self.k
    }

    /// Translation expressed in pre-scale units, so it is multiplied by `k`.
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self { k: self.k, x: self.x + self.k * dx, y: self.y + self.k * dy }
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self { k: self.k * factor, ..*self }
    }

    /// Rescales to `k` keeping the screen point `center` fixed.
    ///
    /// An invalid `self` cannot be inverted, so the anchor is taken from
    /// [`ZoomTransform::IDENTITY`] instead.
    pub fn scale_to(&self, k: f64, center: (f64, f64)) -> Self {
        let from = if self.is_valid() { *self } else { Self::IDENTITY };
        let (px, py) = center;
        let (mx, my) = (from.invert_x(px), from.invert_y(py));
        Self { k, x: px - mx * k, y: py - my * k }
    }

    pub fn as_ar1_x(&self) -> AR1 {
        AR1::new(self.k, self.x)
    }

    pub fn as_ar1_y(&self) -> AR1 {
        AR1::new(self.k, self.y)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Finite translation and a finite, positive scale
    pub fn is_valid(&self) -> bool {
        self.k.is_finite() && self.k > 0.0 && self.x.is_finite() && self.y.is_finite()
    }
}

/// Value Object - allowed zoom scale range `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScaleExtent {
    min: f64,
    max: f64,
}

impl Default for ScaleExtent {
    fn default() -> Self {
        Self { min: 1.0, max: 40.0 }
    }
}

impl ScaleExtent {
    /// Exactly two finite positive values with `min < max`.
    pub fn try_from_slice(extent: &[f64]) -> ChartResult<Self> {
        let invalid = || {
            ChartError::Config(format!(
                "scale extent must be two finite, positive numbers where extent[0] < extent[1], got {:?}",
                extent
            ))
        };
        let [min, max] = <[f64; 2]>::try_from(extent).map_err(|_| invalid())?;
        if !min.is_finite() || !max.is_finite() || min <= 0.0 || max <= 0.0 || min >= max {
            return Err(invalid());
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn clamp(&self, k: f64) -> f64 {
        k.clamp(self.min, self.max)
    }

    pub fn to_arr(&self) -> [f64; 2] {
        [self.min, self.max]
    }
}

impl TryFrom<[f64; 2]> for ScaleExtent {
    type Error = ChartError;

    fn try_from(extent: [f64; 2]) -> ChartResult<Self> {
        Self::try_from_slice(&extent)
    }
}

/// Value Object - viewport size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self { width: 800.0, height: 600.0 }
    }
}

impl Dimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

/// Value Object - 2-D affine matrix in SVG/DOMMatrix layout
///
/// ```text
/// | a c e |
/// | b d f |
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Display, Serialize, Deserialize)]
#[display(fmt = "matrix({} {} {} {} {} {})", a, b, c, d, e, f)]
pub struct Matrix2D {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Matrix2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix2D {
    pub fn identity() -> Self {
        Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 }
    }

    pub fn translate(tx: f64, ty: f64) -> Self {
        Self { e: tx, f: ty, ..Self::identity() }
    }

    /// Axis-aligned matrix from independent x and y maps
    pub fn from_axes(x: &AR1, y: &AR1) -> Self {
        Self { a: x.a, b: 0.0, c: 0.0, d: y.a, e: x.b, f: y.b }
    }

    pub fn apply_point(&self, x: f64, y: f64) -> (f64, f64) {
        (self.a * x + self.c * y + self.e, self.b * x + self.d * y + self.f)
    }
}

/// Zoom input as seen by the scheduler.
///
/// `user_gesture` marks events that came straight from pointer/wheel input
/// on this chart. Only those are debounced and relayed to siblings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomEvent {
    pub transform: ZoomTransform,
    pub user_gesture: bool,
}

impl ZoomEvent {
    pub fn user(transform: ZoomTransform) -> Self {
        Self { transform, user_gesture: true }
    }

    pub fn programmatic(transform: ZoomTransform) -> Self {
        Self { transform, user_gesture: false }
    }

    /// Same transform with the gesture marker cleared, as relayed to siblings.
    pub fn forwarded(&self) -> Self {
        Self::programmatic(self.transform)
    }
}
