use serde::Serialize;

use crate::domain::chart::{Matrix2D, ZoomTransform};
use crate::domain::errors::{ChartError, ChartResult};
use crate::domain::math::{Basis, DirectProductBasis, AR1};

const EPS: f64 = 1e-12;

/// Model ↔ screen mapping of one chart axis pair.
///
/// Three inputs change at different rates and are set independently: the
/// screen range (container resize), the model domain (visible data bounds)
/// and the zoom transform (user gestures). Per axis the composed map is
/// `screen = k * base(model) + t`, where `base` takes the domain onto the
/// range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewportTransform {
    domain_x: Basis,
    domain_y: Basis,
    range_x: Basis,
    range_y: Basis,
    zoom: ZoomTransform,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewportTransform {
    pub fn new() -> Self {
        Self {
            domain_x: Basis::UNIT,
            domain_y: Basis::UNIT,
            range_x: Basis::UNIT,
            range_y: Basis::UNIT,
            zoom: ZoomTransform::IDENTITY,
        }
    }

    /// Sets the screen extent of both base scales.
    pub fn on_viewport_resize(&mut self, basis_x: Basis, basis_y: Basis) {
        self.range_x = basis_x;
        self.range_y = basis_y;
    }

    /// Sets the model extent of both base scales.
    pub fn on_reference_window_resize(&mut self, basis_x: Basis, basis_y: Basis) {
        self.domain_x = basis_x;
        self.domain_y = basis_y;
    }

    pub fn on_zoom_pan(&mut self, zoom: ZoomTransform) {
        self.zoom = zoom;
    }

    pub fn zoom(&self) -> ZoomTransform {
        self.zoom
    }

    pub fn domain(&self) -> DirectProductBasis {
        DirectProductBasis::from_projections(self.domain_x, self.domain_y)
    }

    pub fn range(&self) -> DirectProductBasis {
        DirectProductBasis::from_projections(self.range_x, self.range_y)
    }

    /// Un-zoomed X scale. A degenerate domain maps everything to the middle
    /// of the range.
    pub fn base_x(&self) -> AR1 {
        base_scale(&self.domain_x, &self.range_x)
    }

    pub fn base_y(&self) -> AR1 {
        base_scale(&self.domain_y, &self.range_y)
    }

    fn composed_x(&self) -> AR1 {
        self.zoom.as_ar1_x().compose_with(&self.base_x())
    }

    fn composed_y(&self) -> AR1 {
        self.zoom.as_ar1_y().compose_with(&self.base_y())
    }

    pub fn matrix(&self) -> Matrix2D {
        Matrix2D::from_axes(&self.composed_x(), &self.composed_y())
    }

    pub fn to_screen_from_model_x(&self, p: f64) -> f64 {
        self.composed_x().apply(p)
    }

    pub fn to_screen_from_model_y(&self, p: f64) -> f64 {
        self.composed_y().apply(p)
    }

    pub fn from_screen_to_model_x(&self, p: f64) -> ChartResult<f64> {
        self.assert_invertible_axis("x", &self.domain_x, &self.range_x)?;
        Ok(self.composed_x().inverse()?.apply(p))
    }

    pub fn from_screen_to_model_y(&self, p: f64) -> ChartResult<f64> {
        self.assert_invertible_axis("y", &self.domain_y, &self.range_y)?;
        Ok(self.composed_y().inverse()?.apply(p))
    }

    pub fn to_screen_from_model_basis_x(&self, basis: &Basis) -> Basis {
        basis.transform_with(&self.composed_x())
    }

    pub fn to_screen_from_model_basis_y(&self, basis: &Basis) -> Basis {
        basis.transform_with(&self.composed_y())
    }

    pub fn from_screen_to_model_basis_x(&self, basis: &Basis) -> ChartResult<Basis> {
        Ok(Basis::new(self.from_screen_to_model_x(basis.p1)?, self.from_screen_to_model_x(basis.p2)?))
    }

    pub fn from_screen_to_model_basis_y(&self, basis: &Basis) -> ChartResult<Basis> {
        Ok(Basis::new(self.from_screen_to_model_y(basis.p1)?, self.from_screen_to_model_y(basis.p2)?))
    }

    /// Maps a screen rectangle back into model space.
    pub fn from_screen_to_model_rect(&self, rect: &DirectProductBasis) -> ChartResult<DirectProductBasis> {
        Ok(DirectProductBasis::from_projections(
            self.from_screen_to_model_basis_x(&rect.x())?,
            self.from_screen_to_model_basis_y(&rect.y())?,
        ))
    }

    /// Checks both axes are invertible in their current configuration.
    pub fn assert_invertible(&self) -> ChartResult<()> {
        self.assert_invertible_axis("x", &self.domain_x, &self.range_x)?;
        self.assert_invertible_axis("y", &self.domain_y, &self.range_y)
    }

    fn assert_invertible_axis(&self, axis: &str, domain: &Basis, range: &Basis) -> ChartResult<()> {
        let k = self.zoom.k;
        if !k.is_finite() || k.abs() <= EPS {
            return Err(ChartError::SingularTransform(format!("zoom scale {} is not invertible", k)));
        }
        if !domain.is_finite() || domain.range() <= EPS {
            return Err(ChartError::SingularTransform(format!(
                "{} domain [{}, {}] is degenerate",
                axis, domain.p1, domain.p2
            )));
        }
        if !range.is_finite() || range.range() <= EPS {
            return Err(ChartError::SingularTransform(format!(
                "{} range [{}, {}] is degenerate",
                axis, range.p1, range.p2
            )));
        }
        Ok(())
    }
}

fn base_scale(domain: &Basis, range: &Basis) -> AR1 {
    if !domain.is_finite() || domain.range() <= EPS {
        return AR1::new(0.0, range.midpoint());
    }
    AR1::between_bases(domain, range).unwrap_or_else(|_| AR1::new(0.0, range.midpoint()))
}
