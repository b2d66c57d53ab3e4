use thiserror::Error;

use crate::model::{ElementId, LinkRef};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("element {0} is no longer attached to the document")]
    Detached(ElementId),
    #[error("element {0} does not exist")]
    Missing(ElementId),
    #[error("element {0} cannot receive focus")]
    NotFocusable(ElementId),
}

/// Layout position of an element relative to its offset parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Offset {
    pub top: i32,
    pub left: i32,
    pub parent: Option<ElementId>,
}

/// What the fixed prompt indicator shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndicatorView {
    pub visible: bool,
    pub query: String,
    pub counter: String,
    pub help: String,
}

/// Host document surface the controller drives.
pub trait Document {
    /// All `a[href]` elements, in document order.
    fn links(&self) -> Vec<ElementId>;
    fn text_content(&self, element: ElementId) -> String;
    /// The href resolved against the document base URL.
    fn resolved_href(&self, element: ElementId) -> String;
    fn active_element(&self) -> Option<ElementId>;
    /// Text inputs, text areas and contenteditable content.
    fn is_editable(&self, element: ElementId) -> bool;

    fn add_class(&mut self, element: ElementId, class: &str);
    fn remove_class(&mut self, element: ElementId, class: &str);
    fn has_class(&self, element: ElementId, class: &str) -> bool;

    fn focus(&mut self, element: ElementId, prevent_scroll: bool) -> Result<(), DomError>;
    /// Smooth scroll that centres the element; not awaited.
    fn scroll_into_view(&mut self, element: ElementId) -> Result<(), DomError>;
    fn click(&mut self, element: ElementId) -> Result<(), DomError>;

    fn offset(&self, element: ElementId) -> Option<Offset>;
    /// Inserts a non-interactive label under `anchor` (the body when `None`),
    /// positioned at `top`/`left` within it.
    fn insert_label(
        &mut self,
        anchor: Option<ElementId>,
        text: &str,
        class: &str,
        top: i32,
        left: i32,
    ) -> Result<ElementId, DomError>;
    fn remove_element(&mut self, element: ElementId);

    fn render_indicator(&mut self, view: &IndicatorView);

    fn editable_focused(&self) -> bool {
        self.active_element()
            .map(|element| self.is_editable(element))
            .unwrap_or(false)
    }

    fn link_refs(&self) -> Vec<LinkRef> {
        self.links()
            .into_iter()
            .map(|element| {
                LinkRef::from_owned(
                    element,
                    self.text_content(element),
                    self.resolved_href(element),
                )
            })
            .collect()
    }
}

/// Sum of `offsetTop`/`offsetLeft` along the offset-parent chain.
pub fn page_offset<D: Document + ?Sized>(document: &D, element: ElementId) -> (i32, i32) {
    let mut top = 0;
    let mut left = 0;
    let mut current = Some(element);
    let mut hops = 0;
    while let Some(id) = current {
        let Some(offset) = document.offset(id) else {
            break;
        };
        top += offset.top;
        left += offset.left;
        current = offset.parent;
        hops += 1;
        // A malformed host could report a cycle.
        if hops > 4096 {
            break;
        }
    }
    (top, left)
}
