use std::collections::HashMap;

use web_sys::{Document, Element};

use super::{NodeId, NodeKind, PathData, Renderer};
use crate::domain::chart::Matrix2D;
use crate::domain::logging::LogComponent;
use crate::log_error;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// DOM adapter: nodes are SVG elements below a host-provided root.
pub struct SvgRenderer {
    document: Document,
    elements: HashMap<NodeId, Element>,
    children: HashMap<NodeId, Vec<NodeId>>,
    next_id: u32,
}

impl SvgRenderer {
    const ROOT: NodeId = NodeId(0);

    /// `root` is usually the `<svg>` element itself.
    pub fn new(root: Element) -> Option<Self> {
        let document = root.owner_document()?;
        let mut elements = HashMap::new();
        elements.insert(Self::ROOT, root);
        Some(Self { document, elements, children: HashMap::new(), next_id: 1 })
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        self.elements.get(&node)
    }

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        if let Some(element) = self.elements.get(&node) {
            if let Err(e) = element.set_attribute(name, value) {
                log_error!(LogComponent::Infrastructure("SvgRenderer"), "set {} on {} failed: {:?}", name, node, e);
            }
        }
    }
}

impl Renderer for SvgRenderer {
    fn root(&self) -> NodeId {
        Self::ROOT
    }

    fn append_child(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let node = NodeId(self.next_id);
        self.next_id += 1;
        let Some(parent_el) = self.elements.get(&parent) else {
            log_error!(LogComponent::Infrastructure("SvgRenderer"), "unknown parent {}", parent);
            return node;
        };
        let created = self
            .document
            .create_element_ns(Some(SVG_NS), kind.as_ref())
            .and_then(|el| parent_el.append_child(&el).map(|_| el));
        match created {
            Ok(el) => {
                self.elements.insert(node, el);
                self.children.entry(parent).or_default().push(node);
            }
            Err(e) => {
                log_error!(LogComponent::Infrastructure("SvgRenderer"), "<{}> not created: {:?}", kind.as_ref(), e);
            }
        }
        node
    }

    fn set_matrix(&mut self, node: NodeId, matrix: &Matrix2D) {
        self.set_attribute(node, "transform", &matrix.to_string());
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(element) = self.elements.get(&node) {
            element.set_text_content(Some(text));
        }
    }

    fn set_path(&mut self, node: NodeId, path: &PathData) {
        self.set_attribute(node, "d", &path.to_string());
    }

    fn remove(&mut self, node: NodeId) {
        if node == Self::ROOT {
            return;
        }
        if let Some(element) = self.elements.get(&node) {
            element.remove();
        }
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            self.elements.remove(&current);
            stack.extend(self.children.remove(&current).unwrap_or_default());
        }
    }
}
