//! Narrow renderer port and its adapters.
//!
//! The chart never draws by itself: it creates a handful of nodes, hands them
//! model-space paths once per data change, and then only updates their
//! matrices on zoom. Anything that can apply a 2-D affine matrix to a node can
//! host the chart.

pub mod recording;
pub mod svg_renderer;

pub use recording::{RecordingRenderer, RenderCall};
pub use svg_renderer::SvgRenderer;

use std::cell::RefCell;
use std::rc::Rc;

use derive_more::Display;
use serde::Serialize;
use strum::{AsRefStr, EnumIter};

use crate::domain::chart::Matrix2D;

/// Opaque handle of a node owned by a renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize)]
#[display(fmt = "node#{}", _0)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumIter, Serialize)]
pub enum NodeKind {
    #[strum(serialize = "g")]
    Group,
    #[strum(serialize = "path")]
    Path,
    #[strum(serialize = "circle")]
    Circle,
    #[strum(serialize = "text")]
    Text,
}

pub trait Renderer {
    fn root(&self) -> NodeId;
    fn append_child(&mut self, parent: NodeId, kind: NodeKind) -> NodeId;
    fn set_matrix(&mut self, node: NodeId, matrix: &Matrix2D);
    fn set_text(&mut self, node: NodeId, text: &str);
    fn set_path(&mut self, node: NodeId, path: &PathData);
    /// Removes the node and everything below it.
    fn remove(&mut self, node: NodeId);
}

/// Shared renderer: the chart and its legend write to the same surface.
impl<R: Renderer + ?Sized> Renderer for Rc<RefCell<R>> {
    fn root(&self) -> NodeId {
        self.borrow().root()
    }

    fn append_child(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        self.borrow_mut().append_child(parent, kind)
    }

    fn set_matrix(&mut self, node: NodeId, matrix: &Matrix2D) {
        self.borrow_mut().set_matrix(node, matrix)
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        self.borrow_mut().set_text(node, text)
    }

    fn set_path(&mut self, node: NodeId, path: &PathData) {
        self.borrow_mut().set_path(node, path)
    }

    fn remove(&mut self, node: NodeId) {
        self.borrow_mut().remove(node)
    }
}

/// Polyline in model coordinates `(index, value)`.
///
/// Missing samples break the line: each run of finite values becomes its own
/// segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PathData {
    segments: Vec<Vec<(f64, f64)>>,
}

impl PathData {
    pub fn from_values(values: &[f64]) -> Self {
        let mut segments = Vec::new();
        let mut run: Vec<(f64, f64)> = Vec::new();
        for (i, &v) in values.iter().enumerate() {
            if v.is_finite() {
                run.push((i as f64, v));
            } else if !run.is_empty() {
                segments.push(std::mem::take(&mut run));
            }
        }
        if !run.is_empty() {
            segments.push(run);
        }
        Self { segments }
    }

    pub fn segments(&self) -> &[Vec<(f64, f64)>] {
        &self.segments
    }

    pub fn point_count(&self) -> usize {
        self.segments.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// SVG path syntax: `M0,1L1,2M4,0`
impl std::fmt::Display for PathData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for segment in &self.segments {
            for (i, (x, y)) in segment.iter().enumerate() {
                write!(f, "{}{},{}", if i == 0 { 'M' } else { 'L' }, x, y)?;
            }
        }
        Ok(())
    }
}
