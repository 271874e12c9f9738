// File: crates/linechart-core/src/dom.rs
// Summary: Retained element tree standing in for the host document the chart draws into.
// Notes:
// - Nodes live in an arena addressed by `NodeId`. Removed slots go on a free
//   list and are reused under a new generation, so stale ids resolve to `None`
//   instead of aliasing a newer element.
// - Attributes and styles keep insertion order, which keeps SVG output stable.

use indexmap::IndexMap;

use crate::error::{LinechartError, LinechartResult};
use crate::types::{HEIGHT, WIDTH};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl NodeId {
    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Clone, Debug)]
pub struct Element {
    pub tag: String,
    classes: Vec<String>,
    attrs: IndexMap<String, String>,
    styles: IndexMap<String, String>,
    text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Layout box for host containers (the document does no layout of its own).
    size: Option<(f64, f64)>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            classes: Vec::new(),
            attrs: IndexMap::new(),
            styles: IndexMap::new(),
            text: None,
            parent: None,
            children: Vec::new(),
            size: None,
        }
    }

    pub fn classes(&self) -> &[String] { &self.classes }
    pub fn attrs(&self) -> &IndexMap<String, String> { &self.attrs }
    pub fn styles(&self) -> &IndexMap<String, String> { &self.styles }
    pub fn text(&self) -> Option<&str> { self.text.as_deref() }
    pub fn children(&self) -> &[NodeId] { &self.children }
    pub fn parent(&self) -> Option<NodeId> { self.parent }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// `tag.class1.class2`, `.class` or `tag`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector<'a> {
    tag: Option<&'a str>,
    classes: Vec<&'a str>,
}

impl<'a> Selector<'a> {
    pub fn parse(s: &'a str) -> Self {
        let mut parts = s.trim().split('.');
        let tag = parts.next().filter(|t| !t.is_empty());
        Self { tag, classes: parts.filter(|c| !c.is_empty()).collect() }
    }

    pub fn matches(&self, el: &Element) -> bool {
        self.tag.map_or(true, |t| el.tag == t) && self.classes.iter().all(|c| el.has_class(c))
    }
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    element: Option<Element>,
}

#[derive(Clone, Debug)]
pub struct Document {
    nodes: Vec<Slot>,
    free: Vec<usize>,
    body: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty document whose body measures `WIDTH x HEIGHT`.
    pub fn new() -> Self {
        let mut body = Element::new("body");
        body.size = Some((WIDTH, HEIGHT));
        Self {
            nodes: vec![Slot { generation: 0, element: Some(body) }],
            free: Vec::new(),
            body: NodeId { index: 0, generation: 0 },
        }
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.nodes
            .get(id.index)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.element.as_ref())
    }

    /// Like [`Document::element`], but a removed or foreign id is an
    /// [`LinechartError::UnknownNode`] error.
    pub fn try_element(&self, id: NodeId) -> LinechartResult<&Element> {
        self.element(id).ok_or(LinechartError::UnknownNode(id))
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.nodes
            .get_mut(id.index)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.element.as_mut())
    }

    /// New detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.nodes[index];
            slot.element = Some(Element::new(tag));
            return NodeId { index, generation: slot.generation };
        }
        self.nodes.push(Slot { generation: 0, element: Some(Element::new(tag)) });
        NodeId { index: self.nodes.len() - 1, generation: 0 }
    }

    /// Live elements, the body included.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Arena slots ever allocated; removed slots are reused before this grows.
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Create an element and append it under `parent`.
    pub fn append(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = self.create_element(tag);
        self.append_child(parent, id);
        id
    }

    /// Move `child` to the end of `parent`'s children.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.contains(parent) || !self.contains(child) || parent == child {
            return;
        }
        self.detach(child);
        if let Some(c) = self.element_mut(child) {
            c.parent = Some(parent);
        }
        if let Some(p) = self.element_mut(parent) {
            p.children.push(child);
        }
    }

    fn detach(&mut self, id: NodeId) {
        let parent = self.element(id).and_then(|e| e.parent);
        if let Some(p) = parent.and_then(|p| self.element_mut(p)) {
            p.children.retain(|c| *c != id);
        }
        if let Some(e) = self.element_mut(id) {
            e.parent = None;
        }
    }

    /// Remove `id` and its whole subtree.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.body {
            return;
        }
        self.detach(id);
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            let Some(slot) = self.nodes.get_mut(n.index).filter(|s| s.generation == n.generation) else {
                continue;
            };
            if let Some(el) = slot.element.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(n.index);
                stack.extend(el.children);
            }
        }
    }

    /// Move `id` to the end of its siblings so it paints last.
    pub fn raise(&mut self, id: NodeId) {
        if let Some(parent) = self.parent(id) {
            self.append_child(parent, id);
        }
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.element(id).and_then(|e| e.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.element(id).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attrs.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl ToString) {
        if let Some(e) = self.element_mut(id) {
            e.attrs.insert(name.to_string(), value.to_string());
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(e) = self.element_mut(id) {
            e.attrs.shift_remove(name);
        }
    }

    pub fn style(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.styles.get(name).map(String::as_str)
    }

    pub fn set_style(&mut self, id: NodeId, name: &str, value: impl ToString) {
        if let Some(e) = self.element_mut(id) {
            e.styles.insert(name.to_string(), value.to_string());
        }
    }

    pub fn remove_style(&mut self, id: NodeId, name: &str) {
        if let Some(e) = self.element_mut(id) {
            e.styles.shift_remove(name);
        }
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.element(id)?.text.as_deref()
    }

    pub fn set_text(&mut self, id: NodeId, text: Option<&str>) {
        if let Some(e) = self.element_mut(id) {
            e.text = text.map(str::to_string);
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|e| e.has_class(class))
    }

    /// Add (`on = true`) or remove a class.
    pub fn classed(&mut self, id: NodeId, class: &str, on: bool) {
        if let Some(e) = self.element_mut(id) {
            let present = e.has_class(class);
            if on && !present {
                e.classes.push(class.to_string());
            } else if !on && present {
                e.classes.retain(|c| c != class);
            }
        }
    }

    /// Give a host container a layout box.
    pub fn set_size(&mut self, id: NodeId, width: f64, height: f64) {
        if let Some(e) = self.element_mut(id) {
            e.size = Some((width, height));
        }
    }

    /// `(width, height)` from the layout box, else from numeric width/height attributes.
    pub fn bounding_box(&self, id: NodeId) -> (f64, f64) {
        let Some(e) = self.element(id) else { return (0.0, 0.0) };
        if let Some(size) = e.size {
            return size;
        }
        let num = |k: &str| e.attrs.get(k).and_then(|v| v.parse::<f64>().ok()).unwrap_or(0.0);
        (num("width"), num("height"))
    }

    /// Descendants of `scope` (excluding `scope`) in document order.
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }

    pub fn select_all(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        let sel = Selector::parse(selector);
        self.descendants(scope)
            .into_iter()
            .filter(|n| self.element(*n).is_some_and(|e| sel.matches(e)))
            .collect()
    }

    pub fn select(&self, scope: NodeId, selector: &str) -> Option<NodeId> {
        self.select_all(scope, selector).into_iter().next()
    }

    /// Direct children of `scope` matching `selector`.
    pub fn select_children(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        let sel = Selector::parse(selector);
        self.children(scope)
            .iter()
            .copied()
            .filter(|n| self.element(*n).is_some_and(|e| sel.matches(e)))
            .collect()
    }

    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        std::iter::once(self.body)
            .chain(self.descendants(self.body))
            .find(|n| self.attr(*n, "id") == Some(id))
    }

    /// Whether `node` is `ancestor` or lies beneath it.
    pub fn is_within(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if n == ancestor {
                return true;
            }
            cur = self.parent(n);
        }
        false
    }
}
