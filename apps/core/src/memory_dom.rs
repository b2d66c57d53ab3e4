use std::collections::BTreeSet;

use thiserror::Error;
use url::Url;

use crate::contract::{ElementSpec, PageSpec};
use crate::document::{DomError, Document, IndicatorView, Offset};
use crate::model::ElementId;

const ROOT: ElementId = ElementId(0);

#[derive(Debug, Error)]
pub enum PageError {
    #[error("invalid base url '{url}': {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("focused element '{0}' not found")]
    UnknownFocus(String),
}

/// Side effects recorded in the order the document saw them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomEvent {
    Focus(ElementId),
    Scroll(ElementId),
    Click(ElementId),
}

#[derive(Debug, Clone)]
struct Node {
    dom_id: Option<String>,
    tag: String,
    href: Option<String>,
    text: String,
    contenteditable: bool,
    positioned: bool,
    offset_top: i32,
    offset_left: i32,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    classes: BTreeSet<String>,
    attached: bool,
}

impl Node {
    fn from_spec(spec: &ElementSpec, parent: ElementId) -> Self {
        Self {
            dom_id: spec.id.clone(),
            tag: spec.tag.to_ascii_lowercase(),
            href: spec.href.clone(),
            text: spec.text.clone(),
            contenteditable: spec.contenteditable,
            positioned: spec.positioned,
            offset_top: spec.offset_top,
            offset_left: spec.offset_left,
            parent: Some(parent),
            children: Vec::new(),
            classes: BTreeSet::new(),
            attached: true,
        }
    }

    fn body() -> Self {
        Self {
            dom_id: None,
            tag: "body".to_string(),
            href: None,
            text: String::new(),
            contenteditable: false,
            positioned: false,
            offset_top: 0,
            offset_left: 0,
            parent: None,
            children: Vec::new(),
            classes: BTreeSet::new(),
            attached: true,
        }
    }

    fn is_link(&self) -> bool {
        self.tag == "a" && self.href.is_some()
    }

    fn is_focusable(&self) -> bool {
        self.is_link()
            || self.contenteditable
            || matches!(
                self.tag.as_str(),
                "input" | "textarea" | "button" | "select"
            )
    }
}

/// Arena-backed document used by the CLI replay and the tests.
///
/// Focus resting on the body is reported as no active element, and the body
/// itself cannot be focused, so restoring "nothing focused" is a no-op.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<Node>,
    base_url: Option<Url>,
    active: Option<ElementId>,
    indicator: IndicatorView,
    journal: Vec<DomEvent>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self {
            nodes: vec![Node::body()],
            base_url: None,
            active: None,
            indicator: IndicatorView::default(),
            journal: Vec::new(),
        }
    }
}

impl MemoryDocument {
    pub fn from_page(page: &PageSpec) -> Result<Self, PageError> {
        let mut document = Self::default();
        if let Some(raw) = &page.base_url {
            let parsed = Url::parse(raw).map_err(|source| PageError::BaseUrl {
                url: raw.clone(),
                source,
            })?;
            document.base_url = Some(parsed);
        }

        for spec in &page.elements {
            document.append(ROOT, spec);
        }

        if let Some(focused) = &page.focused {
            let id = document
                .element_by_id(focused)
                .ok_or_else(|| PageError::UnknownFocus(focused.clone()))?;
            document.active = Some(id);
        }
        Ok(document)
    }

    /// Appends `spec` and its subtree under `parent`.
    pub fn append(&mut self, parent: ElementId, spec: &ElementSpec) -> ElementId {
        let id = ElementId(self.nodes.len());
        self.nodes.push(Node::from_spec(spec, parent));
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.push(id);
        }
        for child in &spec.children {
            self.append(id, child);
        }
        id
    }

    pub fn body(&self) -> ElementId {
        ROOT
    }

    pub fn element_by_id(&self, dom_id: &str) -> Option<ElementId> {
        self.nodes
            .iter()
            .position(|node| node.attached && node.dom_id.as_deref() == Some(dom_id))
            .map(ElementId)
    }

    pub fn is_attached(&self, element: ElementId) -> bool {
        self.node(element).map(|node| node.attached).unwrap_or(false)
    }

    pub fn journal(&self) -> &[DomEvent] {
        &self.journal
    }

    pub fn clicks(&self) -> Vec<ElementId> {
        self.journal
            .iter()
            .filter_map(|event| match event {
                DomEvent::Click(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn indicator(&self) -> &IndicatorView {
        &self.indicator
    }

    pub fn elements_with_class(&self, class: &str) -> Vec<ElementId> {
        self.preorder()
            .into_iter()
            .filter(|id| self.has_class(*id, class))
            .collect()
    }

    pub fn own_text(&self, element: ElementId) -> Option<&str> {
        self.node(element).map(|node| node.text.as_str())
    }

    fn node(&self, element: ElementId) -> Option<&Node> {
        self.nodes.get(element.0)
    }

    fn attached_node(&self, element: ElementId) -> Result<&Node, DomError> {
        let node = self.node(element).ok_or(DomError::Missing(element))?;
        if !node.attached {
            return Err(DomError::Detached(element));
        }
        Ok(node)
    }

    fn preorder(&self) -> Vec<ElementId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![ROOT];
        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            if !node.attached {
                continue;
            }
            order.push(id);
            stack.extend(node.children.iter().rev().copied());
        }
        order
    }

    fn collect_text(&self, element: ElementId, out: &mut String) {
        let Some(node) = self.node(element) else {
            return;
        };
        out.push_str(&node.text);
        for child in &node.children {
            self.collect_text(*child, out);
        }
    }

    fn ancestors(&self, element: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        std::iter::successors(self.node(element).and_then(|n| n.parent), move |id| {
            self.node(*id).and_then(|n| n.parent)
        })
    }

    fn detach_subtree(&mut self, element: ElementId) {
        let children = match self.nodes.get_mut(element.0) {
            Some(node) => {
                node.attached = false;
                node.children.clone()
            }
            None => return,
        };
        if self.active == Some(element) {
            self.active = None;
        }
        for child in children {
            self.detach_subtree(child);
        }
    }
}

impl Document for MemoryDocument {
    fn links(&self) -> Vec<ElementId> {
        self.preorder()
            .into_iter()
            .filter(|id| self.node(*id).map(Node::is_link).unwrap_or(false))
            .collect()
    }

    fn text_content(&self, element: ElementId) -> String {
        let mut text = String::new();
        self.collect_text(element, &mut text);
        text
    }

    fn resolved_href(&self, element: ElementId) -> String {
        let Some(href) = self.node(element).and_then(|node| node.href.as_deref()) else {
            return String::new();
        };
        let resolved = match &self.base_url {
            Some(base) => base.join(href),
            None => Url::parse(href),
        };
        resolved
            .map(|url| url.to_string())
            .unwrap_or_else(|_| href.to_string())
    }

    fn active_element(&self) -> Option<ElementId> {
        self.active.filter(|id| self.is_attached(*id))
    }

    fn is_editable(&self, element: ElementId) -> bool {
        let Some(node) = self.node(element) else {
            return false;
        };
        if matches!(node.tag.as_str(), "input" | "textarea") || node.contenteditable {
            return true;
        }
        self.ancestors(element)
            .any(|id| self.node(id).map(|n| n.contenteditable).unwrap_or(false))
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        if let Some(node) = self.nodes.get_mut(element.0) {
            node.classes.insert(class.to_string());
        }
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        if let Some(node) = self.nodes.get_mut(element.0) {
            node.classes.remove(class);
        }
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.node(element)
            .map(|node| node.classes.contains(class))
            .unwrap_or(false)
    }

    fn focus(&mut self, element: ElementId, _prevent_scroll: bool) -> Result<(), DomError> {
        if !self.attached_node(element)?.is_focusable() {
            return Err(DomError::NotFocusable(element));
        }
        self.active = Some(element);
        self.journal.push(DomEvent::Focus(element));
        Ok(())
    }

    fn scroll_into_view(&mut self, element: ElementId) -> Result<(), DomError> {
        self.attached_node(element)?;
        self.journal.push(DomEvent::Scroll(element));
        Ok(())
    }

    fn click(&mut self, element: ElementId) -> Result<(), DomError> {
        self.attached_node(element)?;
        self.journal.push(DomEvent::Click(element));
        Ok(())
    }

    fn offset(&self, element: ElementId) -> Option<Offset> {
        let node = self.attached_node(element).ok()?;
        if element == ROOT {
            return Some(Offset::default());
        }
        let parent = self
            .ancestors(element)
            .find(|id| self.node(*id).map(|n| n.positioned).unwrap_or(false))
            .unwrap_or(ROOT);
        Some(Offset {
            top: node.offset_top,
            left: node.offset_left,
            parent: Some(parent),
        })
    }

    fn insert_label(
        &mut self,
        anchor: Option<ElementId>,
        text: &str,
        class: &str,
        top: i32,
        left: i32,
    ) -> Result<ElementId, DomError> {
        let parent = anchor.unwrap_or(ROOT);
        self.attached_node(parent)?;

        let mut spec = ElementSpec::new("span").at(top, left).positioned();
        spec.text = text.to_string();
        let id = self.append(parent, &spec);
        self.add_class(id, class);
        Ok(id)
    }

    fn remove_element(&mut self, element: ElementId) {
        if element == ROOT || !self.is_attached(element) {
            return;
        }
        if let Some(parent) = self.node(element).and_then(|node| node.parent) {
            if let Some(parent_node) = self.nodes.get_mut(parent.0) {
                parent_node.children.retain(|child| *child != element);
            }
        }
        self.detach_subtree(element);
    }

    fn render_indicator(&mut self, view: &IndicatorView) {
        self.indicator = view.clone();
    }
}
