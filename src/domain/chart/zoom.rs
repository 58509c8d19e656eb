//! Zoom-state helpers: translation bounds and time-window fitting.

use crate::domain::chart::{Dimensions, ZoomTransform};
use crate::domain::math::AR1;

/// Keeps the zoomed content covering the viewport.
///
/// Per axis with `min = size - size * k`: when `k < 1` the content is
/// centered (`min / 2`); otherwise the translation is clamped into
/// `[min, 0]`. Returns the input unchanged when nothing moves.
pub fn constrain_translation(current: ZoomTransform, dims: Dimensions) -> ZoomTransform {
    let k = current.k;
    let x = constrain_axis(current.x, k, dims.width);
    let y = constrain_axis(current.y, k, dims.height);
    if x == current.x && y == current.y { current } else { ZoomTransform::new(k, x, y) }
}

fn constrain_axis(t: f64, k: f64, size: f64) -> f64 {
    let min = size - size * k;
    if k < 1.0 {
        min / 2.0
    } else if t > 0.0 {
        0.0
    } else if t < min {
        min
    } else {
        t
    }
}

/// Transform whose X view spans exactly the index range `[m0, m1]`.
///
/// `base_x` is the un-zoomed index → screen scale. Returns `None` when the
/// range collapses to a single screen column.
pub fn zoom_to_index_window(base_x: &AR1, m0: f64, m1: f64, width: f64) -> Option<ZoomTransform> {
    let (m0, m1) = if m1 < m0 { (m1, m0) } else { (m0, m1) };
    let (sx0, sx1) = (base_x.apply(m0), base_x.apply(m1));
    if m0 == m1 || sx0 == sx1 || !width.is_finite() {
        return None;
    }
    let k = width / (sx1 - sx0);
    Some(ZoomTransform::IDENTITY.scale(k).translate(-sx0, 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims() -> Dimensions {
        Dimensions::new(50.0, 50.0)
    }

    #[test]
    fn clamps_beyond_left_top() {
        let t = constrain_translation(ZoomTransform::new(2.0, 30.0, 40.0), dims());
        assert_eq!(t, ZoomTransform::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn clamps_beyond_right_bottom() {
        let t = constrain_translation(ZoomTransform::new(2.0, -120.0, -80.0), dims());
        assert_eq!(t, ZoomTransform::new(2.0, -50.0, -50.0));
    }

    #[test]
    fn inside_and_boundaries_untouched() {
        for t in [
            ZoomTransform::new(2.0, -20.0, -30.0),
            ZoomTransform::new(2.0, 0.0, 0.0),
            ZoomTransform::new(2.0, -50.0, -50.0),
            ZoomTransform::IDENTITY,
        ] {
            assert_eq!(constrain_translation(t, dims()), t);
        }
    }

    #[test]
    fn zoomed_out_content_is_centered() {
        let t = constrain_translation(ZoomTransform::new(0.5, 7.0, -3.0), Dimensions::new(100.0, 40.0));
        assert_eq!(t, ZoomTransform::new(0.5, 25.0, 10.0));
    }

    #[test]
    fn index_window_fills_width() {
        // 11 samples over 100px
        let base = AR1::new(10.0, 0.0);
        let t = zoom_to_index_window(&base, 6.0, 2.0, 100.0).unwrap();
        assert_eq!(t.k, 2.5);
        assert_eq!(t.apply_x(base.apply(2.0)), 0.0);
        assert_eq!(t.apply_x(base.apply(6.0)), 100.0);
        assert!(zoom_to_index_window(&base, 3.0, 3.0, 100.0).is_none());
    }
}
