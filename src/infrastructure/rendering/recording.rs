use std::collections::BTreeMap;

use serde::Serialize;

use super::{NodeId, NodeKind, PathData, Renderer};
use crate::domain::chart::Matrix2D;

/// One call received by a [`RecordingRenderer`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RenderCall {
    AppendChild { parent: NodeId, kind: NodeKind, node: NodeId },
    SetMatrix { node: NodeId, matrix: Matrix2D },
    SetText { node: NodeId, text: String },
    SetPath { node: NodeId, d: String },
    Remove { node: NodeId },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NodeRecord {
    pub kind: Option<NodeKind>,
    pub parent: Option<NodeId>,
    pub matrix: Option<Matrix2D>,
    pub text: Option<String>,
    pub path: Option<String>,
}

/// Headless renderer keeping a node tree and a log of every call.
#[derive(Debug, Clone)]
pub struct RecordingRenderer {
    next_id: u32,
    nodes: BTreeMap<NodeId, NodeRecord>,
    calls: Vec<RenderCall>,
}

impl Default for RecordingRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingRenderer {
    pub const ROOT: NodeId = NodeId(0);

    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(Self::ROOT, NodeRecord::default());
        Self { next_id: 1, nodes, calls: Vec::new() }
    }

    pub fn calls(&self) -> &[RenderCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn node(&self, node: NodeId) -> Option<&NodeRecord> {
        self.nodes.get(&node)
    }

    pub fn is_alive(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Live nodes, root excluded
    pub fn node_count(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn matrix_of(&self, node: NodeId) -> Option<Matrix2D> {
        self.nodes.get(&node).and_then(|n| n.matrix)
    }

    pub fn text_of(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(&node).and_then(|n| n.text.as_deref())
    }

    pub fn path_of(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(&node).and_then(|n| n.path.as_deref())
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> Vec<NodeId> {
        self.nodes.iter().filter(|(_, n)| n.kind == Some(kind)).map(|(&id, _)| id).collect()
    }

    pub fn matrix_updates(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, RenderCall::SetMatrix { .. })).count()
    }

    fn children_of(&self, parent: NodeId) -> Vec<NodeId> {
        self.nodes.iter().filter(|(_, n)| n.parent == Some(parent)).map(|(&id, _)| id).collect()
    }
}

impl Renderer for RecordingRenderer {
    fn root(&self) -> NodeId {
        Self::ROOT
    }

    fn append_child(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let node = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(node, NodeRecord { kind: Some(kind), parent: Some(parent), ..NodeRecord::default() });
        self.calls.push(RenderCall::AppendChild { parent, kind, node });
        node
    }

    fn set_matrix(&mut self, node: NodeId, matrix: &Matrix2D) {
        if let Some(record) = self.nodes.get_mut(&node) {
            record.matrix = Some(*matrix);
        }
        self.calls.push(RenderCall::SetMatrix { node, matrix: *matrix });
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(record) = self.nodes.get_mut(&node) {
            record.text = Some(text.to_string());
        }
        self.calls.push(RenderCall::SetText { node, text: text.to_string() });
    }

    fn set_path(&mut self, node: NodeId, path: &PathData) {
        let d = path.to_string();
        if let Some(record) = self.nodes.get_mut(&node) {
            record.path = Some(d.clone());
        }
        self.calls.push(RenderCall::SetPath { node, d });
    }

    fn remove(&mut self, node: NodeId) {
        if node == Self::ROOT {
            return;
        }
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            stack.extend(self.children_of(current));
            self.nodes.remove(&current);
        }
        self.calls.push(RenderCall::Remove { node });
    }
}
