use crate::domain::chart::{Dimensions, Matrix2D, ViewportTransform, ZoomTransform};
use crate::domain::math::Basis;
use crate::domain::series::SlidingWindowDataset;
use crate::infrastructure::rendering::{NodeId, NodeKind, PathData, Renderer};

/// Nodes of one channel: a group carrying the axis matrix and the path
/// inside it, drawn in model coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesView {
    pub channel: usize,
    pub axis: usize,
    pub view: NodeId,
    pub path: NodeId,
}

#[derive(Debug, Clone)]
pub struct AxisState {
    pub transform: ViewportTransform,
    pub channels: Vec<usize>,
}

/// Per-chart viewport bookkeeping: one X transform for index lookups and
/// one transform per Y axis, all sharing the same zoom and screen extent.
#[derive(Debug, Clone)]
pub struct RenderState {
    x_transform: ViewportTransform,
    axes: Vec<AxisState>,
    series: Vec<SeriesView>,
    dimensions: Dimensions,
}

fn screen_bases(dims: Dimensions) -> (Basis, Basis) {
    (Basis::new(0.0, dims.width), Basis::new(dims.height, 0.0))
}

impl RenderState {
    pub fn new(
        data: &SlidingWindowDataset,
        series_axes: &[usize],
        dimensions: Dimensions,
        renderer: &mut dyn Renderer,
    ) -> Self {
        let axis_count = series_axes.iter().copied().max().unwrap_or(0) + 1;
        let (screen_x, screen_y) = screen_bases(dimensions);
        let full = data.b_index_full();

        let mut x_transform = ViewportTransform::new();
        x_transform.on_viewport_resize(screen_x, screen_y);
        x_transform.on_reference_window_resize(full, Basis::PLACEHOLDER);

        let axes = (0..axis_count)
            .map(|axis| {
                let mut transform = ViewportTransform::new();
                transform.on_viewport_resize(screen_x, screen_y);
                transform.on_reference_window_resize(full, Basis::PLACEHOLDER);
                let channels = series_axes.iter().enumerate().filter(|&(_, &a)| a == axis).map(|(c, _)| c).collect();
                AxisState { transform, channels }
            })
            .collect();

        let root = renderer.root();
        let series = series_axes
            .iter()
            .enumerate()
            .map(|(channel, &axis)| {
                let view = renderer.append_child(root, NodeKind::Group);
                let path = renderer.append_child(view, NodeKind::Path);
                SeriesView { channel, axis, view, path }
            })
            .collect();

        Self { x_transform, axes, series, dimensions }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn x_transform(&self) -> &ViewportTransform {
        &self.x_transform
    }

    pub fn axes(&self) -> &[AxisState] {
        &self.axes
    }

    pub fn series(&self) -> &[SeriesView] {
        &self.series
    }

    pub fn axis_of(&self, channel: usize) -> Option<usize> {
        self.series.get(channel).map(|s| s.axis)
    }

    pub fn resize(&mut self, dimensions: Dimensions) {
        self.dimensions = dimensions;
        let (screen_x, screen_y) = screen_bases(dimensions);
        self.x_transform.on_viewport_resize(screen_x, screen_y);
        for axis in &mut self.axes {
            axis.transform.on_viewport_resize(screen_x, screen_y);
        }
    }

    pub fn apply_zoom(&mut self, zoom: ZoomTransform) {
        self.x_transform.on_zoom_pan(zoom);
        for axis in &mut self.axes {
            axis.transform.on_zoom_pan(zoom);
        }
    }

    /// Index range currently on screen. Falls back to the whole window when
    /// the X transform cannot be inverted.
    pub fn visible_index_basis(&self, data: &SlidingWindowDataset) -> Basis {
        let (screen_x, _) = screen_bases(self.dimensions);
        self.x_transform.from_screen_to_model_basis_x(&screen_x).unwrap_or_else(|_| data.b_index_full())
    }

    /// Fits every Y axis to the data visible on screen and pushes the
    /// resulting matrices to the series views.
    pub fn refresh(&mut self, data: &SlidingWindowDataset, renderer: &mut dyn Renderer) {
        let full = data.b_index_full();
        self.x_transform.on_reference_window_resize(full, Basis::PLACEHOLDER);
        let visible = self.visible_index_basis(data);
        for axis in &mut self.axes {
            let extent = data.axis_extent(&visible, &axis.channels);
            axis.transform.on_reference_window_resize(full, extent);
        }
        for s in &self.series {
            if let Some(axis) = self.axes.get(s.axis) {
                renderer.set_matrix(s.view, &axis.transform.matrix());
            }
        }
    }

    /// Rewrites every series path from the current window contents.
    pub fn draw_series(&self, data: &SlidingWindowDataset, renderer: &mut dyn Renderer) {
        for s in &self.series {
            renderer.set_path(s.path, &PathData::from_values(&data.channel_values(s.channel)));
        }
    }

    pub fn axis_matrix(&self, axis: usize) -> Option<Matrix2D> {
        self.axes.get(axis).map(|a| a.transform.matrix())
    }

    /// Model Y extent the axis currently maps onto the viewport
    pub fn axis_domain(&self, axis: usize) -> Option<Basis> {
        self.axes.get(axis).map(|a| a.transform.domain().y())
    }

    pub fn destroy(&mut self, renderer: &mut dyn Renderer) {
        for s in self.series.drain(..) {
            renderer.remove(s.view);
        }
    }
}
