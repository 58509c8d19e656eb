use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::application::config::ChartConfig;
use crate::application::frame::{DrawProc, FrameScheduler};
use crate::application::legend::{HoverPoint, LegendController};
use crate::application::render_state::RenderState;
use crate::application::zoom_scheduler::{ZoomScheduler, ZoomTarget};
use crate::domain::chart::{zoom_to_index_window, Dimensions, Matrix2D, ScaleExtent, ZoomEvent, ZoomTransform};
use crate::domain::errors::{ChartError, ChartResult};
use crate::domain::logging::LogComponent;
use crate::domain::math::Basis;
use crate::domain::series::{DataSource, Point, SlidingWindowDataset};
use crate::infrastructure::rendering::Renderer;
use crate::{log_debug, log_info};

/// Host-side collaborators of one chart
pub struct ChartAdapters {
    pub renderer: Box<dyn Renderer>,
    pub legend: Box<dyn LegendController>,
    pub frames: Rc<dyn FrameScheduler>,
}

pub type ZoomHandler = Rc<dyn Fn(ZoomEvent)>;

struct ChartCore {
    data: SlidingWindowDataset,
    render: RenderState,
    renderer: Box<dyn Renderer>,
    gesture: ZoomTransform,
    hover_x: Option<f64>,
}

impl ChartCore {
    fn refresh(&mut self) {
        let ChartCore { data, render, renderer, .. } = self;
        render.refresh(data, renderer.as_mut());
    }

    fn draw_series(&mut self) {
        let ChartCore { data, render, renderer, .. } = self;
        render.draw_series(data, renderer.as_mut());
    }

    /// Sample under the remembered pointer column. A singular X transform
    /// means nothing is visible, so there is nothing to highlight.
    fn hover_point(&self) -> Option<HoverPoint> {
        let x = self.hover_x?;
        let index = self.render.x_transform().from_screen_to_model_x(x).ok()?;
        let Point { index, timestamp, values } = self.data.get_point(self.data.clamp_index(index));
        let screen_x = self.render.x_transform().to_screen_from_model_x(index as f64);
        let screen_y = values
            .iter()
            .enumerate()
            .map(|(channel, &v)| {
                self.render
                    .axis_of(channel)
                    .and_then(|axis| self.render.axes().get(axis))
                    .map(|axis| axis.transform.to_screen_from_model_y(v))
                    .unwrap_or(f64::NAN)
            })
            .collect();
        Some(HoverPoint { index, timestamp, values, screen_x, screen_y })
    }
}

struct ChartShared {
    core: RefCell<ChartCore>,
    legend: RefCell<Box<dyn LegendController>>,
    disposed: Cell<bool>,
}

impl ChartShared {
    fn redraw(&self) {
        if self.disposed.get() {
            return;
        }
        let point = {
            let mut core = self.core.borrow_mut();
            core.refresh();
            core.hover_point()
        };
        if let Some(point) = point {
            self.legend.borrow_mut().highlight(&point);
        }
    }
}

struct ChartZoomTarget(Weak<ChartShared>);

impl ZoomTarget for ChartZoomTarget {
    fn on_zoom_pan(&self, transform: ZoomTransform) {
        if let Some(shared) = self.0.upgrade() {
            shared.core.borrow_mut().render.apply_zoom(transform);
        }
    }

    fn apply_to_gesture(&self, transform: ZoomTransform) {
        if let Some(shared) = self.0.upgrade() {
            shared.core.borrow_mut().gesture = transform;
        }
    }

    fn redraw(&self) {
        if let Some(shared) = self.0.upgrade() {
            shared.redraw();
        }
    }
}

/// Live sliding-window chart.
///
/// Every method takes `&self`, so a chart can sit behind an `Rc` and be
/// driven from event handlers. After [`TimeSeriesChart::dispose`] every
/// mutating call is a no-op.
pub struct TimeSeriesChart {
    shared: Rc<ChartShared>,
    scheduler: ZoomScheduler,
    draw: DrawProc,
    zoom_handler: RefCell<Option<ZoomHandler>>,
}

impl TimeSeriesChart {
    /// Builds the chart and draws the initial window.
    ///
    /// On error the legend is destroyed, so nothing it drew stays behind.
    pub fn new(source: &dyn DataSource, config: ChartConfig, adapters: ChartAdapters) -> ChartResult<Self> {
        let ChartAdapters { mut renderer, mut legend, frames } = adapters;
        let (scale_extent, data, series_axes) = match Self::prepare(source, &config) {
            Ok(prepared) => prepared,
            Err(e) => {
                legend.destroy();
                return Err(e);
            }
        };

        let mut render = RenderState::new(&data, &series_axes, config.dimensions, renderer.as_mut());
        render.draw_series(&data, renderer.as_mut());
        render.refresh(&data, renderer.as_mut());

        let core = ChartCore { data, render, renderer, gesture: ZoomTransform::IDENTITY, hover_x: None };
        let shared = Rc::new(ChartShared {
            core: RefCell::new(core),
            legend: RefCell::new(legend),
            disposed: Cell::new(false),
        });

        let target: Rc<dyn ZoomTarget> = Rc::new(ChartZoomTarget(Rc::downgrade(&shared)));
        let scheduler = ZoomScheduler::new(frames.clone(), target, scale_extent, config.dimensions);
        let weak = Rc::downgrade(&shared);
        let draw = DrawProc::new(frames, move || {
            if let Some(shared) = weak.upgrade() {
                shared.redraw();
            }
        });

        let chart = Self { shared, scheduler, draw, zoom_handler: RefCell::new(None) };
        if config.hover_on_init {
            chart.on_hover(config.dimensions.width - 1.0);
        }
        log_info!(
            LogComponent::Application("Chart"),
            "chart ready: {} samples x {} channels on {} axes",
            chart.len(),
            series_axes.len(),
            series_axes.iter().max().map_or(1, |m| m + 1)
        );
        Ok(chart)
    }

    fn prepare(
        source: &dyn DataSource,
        config: &ChartConfig,
    ) -> ChartResult<(ScaleExtent, SlidingWindowDataset, Vec<usize>)> {
        config.validate()?;
        let scale_extent = config.scale_extent()?;
        let data = SlidingWindowDataset::new(source)?;
        let series_axes = config.resolve_series_axes(data.channel_count())?;
        Ok((scale_extent, data, series_axes))
    }

    /// Receives this chart's user zoom events, already stripped of the
    /// gesture marker.
    pub fn set_zoom_handler(&self, handler: impl Fn(ZoomEvent) + 'static) {
        *self.zoom_handler.borrow_mut() = Some(Rc::new(handler));
    }

    fn handler(&self) -> Option<ZoomHandler> {
        self.zoom_handler.borrow().clone()
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.disposed.get()
    }

    /// Slides the window by one sample. The paths are rewritten at once; the
    /// axis refit is coalesced into the next frame.
    pub fn append(&self, values: &[f64]) -> ChartResult<()> {
        if self.is_disposed() {
            return Ok(());
        }
        {
            let mut core = self.shared.core.borrow_mut();
            core.data.append(values)?;
            core.draw_series();
        }
        self.draw.request();
        Ok(())
    }

    pub fn resize(&self, dimensions: Dimensions) -> ChartResult<()> {
        if self.is_disposed() {
            return Ok(());
        }
        if !dimensions.is_valid() {
            return Err(ChartError::Config(format!(
                "dimensions must be positive and finite, got {}x{}",
                dimensions.width, dimensions.height
            )));
        }
        log_debug!(LogComponent::Application("Chart"), "resize to {}x{}", dimensions.width, dimensions.height);
        self.shared.core.borrow_mut().render.resize(dimensions);
        self.scheduler.update_extents(dimensions);
        self.scheduler.refresh();
        Ok(())
    }

    pub fn zoom(&self, event: ZoomEvent) {
        if self.is_disposed() {
            return;
        }
        let handler = self.handler();
        self.scheduler.zoom(event, handler.as_deref());
    }

    pub fn zoom_by(&self, factor: f64, x: f64, y: f64) {
        if self.is_disposed() {
            return;
        }
        let handler = self.handler();
        self.scheduler.zoom_by(factor, (x, y), handler.as_deref());
    }

    pub fn pan_by(&self, dx: f64, dy: f64) {
        if self.is_disposed() {
            return;
        }
        let handler = self.handler();
        self.scheduler.pan_by(dx, dy, handler.as_deref());
    }

    pub fn reset_zoom(&self) {
        self.scheduler.reset();
    }

    pub fn refresh(&self) {
        self.scheduler.refresh();
    }

    pub fn set_scale_extent(&self, extent: &[f64]) -> ChartResult<()> {
        self.scheduler.set_scale_extent(extent)
    }

    /// Zooms so the X axis spans `[t0, t1]`, clamped to the window. Returns
    /// the time window actually shown, or `None` when it collapses to a
    /// single sample.
    pub fn zoom_to_time_window(&self, t0: f64, t1: f64) -> ChartResult<Option<(f64, f64)>> {
        if self.is_disposed() {
            return Ok(None);
        }
        let solved = {
            let core = self.shared.core.borrow();
            let m0 = core.data.clamp_index(core.data.time_to_index(t0)?);
            let m1 = core.data.clamp_index(core.data.time_to_index(t1)?);
            let (m0, m1) = if m1 < m0 { (m1, m0) } else { (m0, m1) };
            let base_x = core.render.x_transform().base_x();
            zoom_to_index_window(&base_x, m0, m1, core.render.dimensions().width)
                .map(|t| (t, (core.data.index_to_time(m0), core.data.index_to_time(m1))))
        };
        Ok(solved.map(|(transform, window)| {
            self.scheduler.zoom(ZoomEvent::programmatic(transform), None);
            window
        }))
    }

    /// Highlights the sample under screen column `x` in the legend.
    pub fn on_hover(&self, x: f64) {
        if self.is_disposed() {
            return;
        }
        let point = {
            let mut core = self.shared.core.borrow_mut();
            core.hover_x = Some(x);
            core.hover_point()
        };
        if let Some(point) = point {
            self.shared.legend.borrow_mut().highlight(&point);
        }
    }

    pub fn clear_hover(&self) {
        if self.is_disposed() {
            return;
        }
        self.shared.core.borrow_mut().hover_x = None;
        self.shared.legend.borrow_mut().clear_highlight();
    }

    /// Cancels pending frames first, then tears down legend and nodes.
    pub fn dispose(&self) {
        if self.shared.disposed.replace(true) {
            return;
        }
        self.scheduler.destroy();
        self.draw.cancel();
        self.shared.legend.borrow_mut().destroy();
        let mut core = self.shared.core.borrow_mut();
        let ChartCore { render, renderer, .. } = &mut *core;
        render.destroy(renderer.as_mut());
        log_debug!(LogComponent::Application("Chart"), "disposed");
    }

    pub fn current_transform(&self) -> ZoomTransform {
        self.scheduler.current_transform()
    }

    /// Transform last pushed into the gesture controller
    pub fn gesture_transform(&self) -> ZoomTransform {
        self.shared.core.borrow().gesture
    }

    pub fn has_pending_frame(&self) -> bool {
        self.scheduler.is_pending() || self.draw.is_pending()
    }

    pub fn axis_matrix(&self, axis: usize) -> Option<Matrix2D> {
        self.shared.core.borrow().render.axis_matrix(axis)
    }

    pub fn axis_domain(&self, axis: usize) -> Option<Basis> {
        self.shared.core.borrow().render.axis_domain(axis)
    }

    pub fn visible_index_basis(&self) -> Basis {
        let core = self.shared.core.borrow();
        core.render.visible_index_basis(&core.data)
    }

    pub fn visible_time_window(&self) -> Basis {
        let core = self.shared.core.borrow();
        core.render.visible_index_basis(&core.data).transform_with(&core.data.idx_to_time())
    }

    pub fn from_screen_to_model_x(&self, x: f64) -> ChartResult<f64> {
        self.shared.core.borrow().render.x_transform().from_screen_to_model_x(x)
    }

    pub fn get_point(&self, index: f64) -> Point {
        self.shared.core.borrow().data.get_point(index)
    }

    pub fn hover_point(&self) -> Option<HoverPoint> {
        self.shared.core.borrow().hover_point()
    }

    pub fn len(&self) -> usize {
        self.shared.core.borrow().data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn channel_count(&self) -> usize {
        self.shared.core.borrow().data.channel_count()
    }

    pub fn dimensions(&self) -> Dimensions {
        self.scheduler.dimensions()
    }
}
