use serde::Serialize;

use crate::domain::chart::Matrix2D;
use crate::infrastructure::rendering::{NodeId, NodeKind, Renderer};

/// Sample under the pointer, with its screen placement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoverPoint {
    pub index: usize,
    pub timestamp: f64,
    pub values: Vec<f64>,
    pub screen_x: f64,
    /// Per channel; NaN where the value is missing
    pub screen_y: Vec<f64>,
}

pub trait LegendController {
    fn highlight(&mut self, point: &HoverPoint);
    fn clear_highlight(&mut self);
    fn destroy(&mut self);
}

/// Legend for headless charts
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLegend;

impl LegendController for NoopLegend {
    fn highlight(&mut self, _point: &HoverPoint) {}
    fn clear_highlight(&mut self) {}
    fn destroy(&mut self) {}
}

/// Minimal legend: one text line plus one dot per channel.
pub struct TextLegend<R: Renderer> {
    renderer: R,
    label: NodeId,
    dots: Vec<NodeId>,
    destroyed: bool,
}

impl<R: Renderer> TextLegend<R> {
    pub fn new(mut renderer: R, channel_count: usize) -> Self {
        let root = renderer.root();
        let label = renderer.append_child(root, NodeKind::Text);
        let dots = (0..channel_count).map(|_| renderer.append_child(root, NodeKind::Circle)).collect();
        Self { renderer, label, dots, destroyed: false }
    }

    pub fn label(&self) -> NodeId {
        self.label
    }

    pub fn dots(&self) -> &[NodeId] {
        &self.dots
    }

    pub fn format_point(point: &HoverPoint) -> String {
        let values: Vec<String> = point
            .values
            .iter()
            .map(|v| if v.is_nan() { "-".to_string() } else { format!("{}", v) })
            .collect();
        format!("{}: {}", point.timestamp, values.join(", "))
    }
}

impl<R: Renderer> LegendController for TextLegend<R> {
    fn highlight(&mut self, point: &HoverPoint) {
        if self.destroyed {
            return;
        }
        self.renderer.set_text(self.label, &Self::format_point(point));
        for (&dot, &y) in self.dots.iter().zip(&point.screen_y) {
            if y.is_finite() {
                self.renderer.set_matrix(dot, &Matrix2D::translate(point.screen_x, y));
            }
        }
    }

    fn clear_highlight(&mut self) {
        if !self.destroyed {
            self.renderer.set_text(self.label, "");
        }
    }

    fn destroy(&mut self) {
        if std::mem::replace(&mut self.destroyed, true) {
            return;
        }
        self.renderer.remove(self.label);
        for &dot in &self.dots {
            self.renderer.remove(dot);
        }
    }
}
