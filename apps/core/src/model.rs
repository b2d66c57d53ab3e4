use std::fmt::{Display, Formatter};

/// Non-owning handle to an element in the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

impl Display for ElementId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Snapshot of the searchable parts of a hyperlink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRef {
    pub element: ElementId,
    pub text: String,
    pub href: String,
    normalized_text: String,
    normalized_href: String,
}

impl LinkRef {
    pub fn new(element: ElementId, text: &str, href: &str) -> Self {
        Self::from_owned(element, text.to_string(), href.to_string())
    }

    pub fn from_owned(element: ElementId, text: String, href: String) -> Self {
        let normalized_text = normalize_for_search(&text);
        let normalized_href = normalize_for_search(&href);
        Self {
            element,
            text,
            href,
            normalized_text,
            normalized_href,
        }
    }

    pub fn normalized_text(&self) -> &str {
        &self.normalized_text
    }

    pub fn normalized_href(&self) -> &str {
        &self.normalized_href
    }
}

pub fn normalize_for_search(input: &str) -> String {
    input.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{normalize_for_search, ElementId, LinkRef};

    #[test]
    fn normalization_only_lowercases() {
        assert_eq!(normalize_for_search("About Home!"), "about home!");
    }

    #[test]
    fn link_keeps_original_text_alongside_normalized() {
        let link = LinkRef::new(ElementId(3), "Docs", "HTTPS://Example.com/Docs");
        assert_eq!(link.text, "Docs");
        assert_eq!(link.normalized_href(), "https://example.com/docs");
    }
}
