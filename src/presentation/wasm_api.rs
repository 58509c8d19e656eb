use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::application::{ChartAdapters, ChartConfig, ChartGroup, TextLegend, TimeSeriesChart};
use crate::domain::chart::{Dimensions, ZoomEvent, ZoomTransform};
use crate::domain::errors::ChartError;
use crate::domain::logging::LogComponent;
use crate::domain::series::ColumnarDataSource;
use crate::infrastructure::rendering::SvgRenderer;
use crate::infrastructure::AnimationFrameScheduler;
use crate::log_warn;

/// JS facade over one SVG chart
#[wasm_bindgen]
pub struct WasmTimeSeriesChart {
    chart: Rc<TimeSeriesChart>,
}

#[wasm_bindgen]
impl WasmTimeSeriesChart {
    /// `values` is channel-major: all of channel 0, then all of channel 1...
    #[wasm_bindgen(constructor)]
    pub fn new(
        svg: web_sys::Element,
        start_time: f64,
        time_step: f64,
        channel_count: usize,
        values: Vec<f64>,
        config_json: Option<String>,
    ) -> Result<WasmTimeSeriesChart, JsValue> {
        let config = match config_json {
            Some(json) => ChartConfig::from_json(&json)?,
            None => ChartConfig::default(),
        };
        let renderer = SvgRenderer::new(svg)
            .ok_or_else(|| ChartError::Construction("svg root is not attached to a document".to_string()))?;
        let renderer = Rc::new(RefCell::new(renderer));
        let legend = TextLegend::new(renderer.clone(), channel_count);
        let source = ColumnarDataSource::new(start_time, time_step, channel_count, values);
        let adapters = ChartAdapters {
            renderer: Box::new(renderer),
            legend: Box::new(legend),
            frames: Rc::new(AnimationFrameScheduler),
        };
        let chart = TimeSeriesChart::new(&source, config, adapters)?;
        Ok(Self { chart: Rc::new(chart) })
    }

    pub fn append(&self, values: Vec<f64>) -> Result<(), JsValue> {
        Ok(self.chart.append(&values)?)
    }

    pub fn resize(&self, width: f64, height: f64) -> Result<(), JsValue> {
        Ok(self.chart.resize(Dimensions::new(width, height))?)
    }

    /// Feeds a zoom transform, e.g. from a d3-zoom handler.
    pub fn zoom(&self, k: f64, x: f64, y: f64, user_gesture: bool) {
        let transform = ZoomTransform::new(k, x, y);
        let event = if user_gesture { ZoomEvent::user(transform) } else { ZoomEvent::programmatic(transform) };
        self.chart.zoom(event);
    }

    #[wasm_bindgen(js_name = zoomBy)]
    pub fn zoom_by(&self, factor: f64, x: f64, y: f64) {
        self.chart.zoom_by(factor, x, y);
    }

    #[wasm_bindgen(js_name = panBy)]
    pub fn pan_by(&self, dx: f64, dy: f64) {
        self.chart.pan_by(dx, dy);
    }

    #[wasm_bindgen(js_name = resetZoom)]
    pub fn reset_zoom(&self) {
        self.chart.reset_zoom();
    }

    #[wasm_bindgen(js_name = setScaleExtent)]
    pub fn set_scale_extent(&self, extent: Vec<f64>) -> Result<(), JsValue> {
        Ok(self.chart.set_scale_extent(&extent)?)
    }

    /// Returns `[t0, t1]` actually shown, or an empty array when the window
    /// collapses to one sample.
    #[wasm_bindgen(js_name = zoomToTimeWindow)]
    pub fn zoom_to_time_window(&self, t0: f64, t1: f64) -> Result<Vec<f64>, JsValue> {
        let shown = self.chart.zoom_to_time_window(t0, t1)?;
        Ok(shown.map(|(a, b)| vec![a, b]).unwrap_or_default())
    }

    #[wasm_bindgen(js_name = onHover)]
    pub fn on_hover(&self, x: f64) {
        self.chart.on_hover(x);
    }

    #[wasm_bindgen(js_name = clearHover)]
    pub fn clear_hover(&self) {
        self.chart.clear_hover();
    }

    /// `[k, x, y]`
    #[wasm_bindgen(js_name = currentTransform)]
    pub fn current_transform(&self) -> Vec<f64> {
        let t = self.chart.current_transform();
        vec![t.k, t.x, t.y]
    }

    #[wasm_bindgen(js_name = visibleTimeWindow)]
    pub fn visible_time_window(&self) -> Vec<f64> {
        self.chart.visible_time_window().to_arr().to_vec()
    }

    /// Calls `callback(k, x, y)` for every user zoom on this chart.
    #[wasm_bindgen(js_name = onZoom)]
    pub fn on_zoom(&self, callback: js_sys::Function) {
        self.chart.set_zoom_handler(move |event| {
            let t = event.transform;
            if let Err(e) = callback.call3(&JsValue::NULL, &t.k.into(), &t.x.into(), &t.y.into()) {
                log_warn!(LogComponent::Presentation("WasmChart"), "zoom callback threw: {:?}", e);
            }
        });
    }

    pub fn dispose(&self) {
        self.chart.dispose();
    }
}

/// JS facade over [`ChartGroup`]
#[wasm_bindgen]
#[derive(Default)]
pub struct WasmChartGroup {
    group: ChartGroup,
}

#[wasm_bindgen]
impl WasmChartGroup {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, chart: &WasmTimeSeriesChart) {
        self.group.add(chart.chart.clone());
    }

    #[wasm_bindgen(js_name = hoverAll)]
    pub fn hover_all(&self, x: f64) {
        self.group.hover_all(x);
    }

    #[wasm_bindgen(js_name = resetAll)]
    pub fn reset_all(&self) {
        self.group.reset_all();
    }

    #[wasm_bindgen(js_name = appendAll)]
    pub fn append_all(&self, values: Vec<f64>) -> Result<(), JsValue> {
        Ok(self.group.append_all(&values)?)
    }

    #[wasm_bindgen(js_name = disposeAll)]
    pub fn dispose_all(&self) {
        self.group.dispose_all();
    }
}
