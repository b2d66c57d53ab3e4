use crate::model::{normalize_for_search, LinkRef};

/// Returns the links whose text or resolved URL contains `query`,
/// case-insensitively, in document order. An empty query matches nothing.
pub fn search<'a>(links: &'a [LinkRef], query: &str) -> Vec<&'a LinkRef> {
    if links.is_empty() {
        return Vec::new();
    }

    let normalized_query = normalize_for_search(query);
    if normalized_query.is_empty() {
        return Vec::new();
    }

    links
        .iter()
        .filter(|link| is_match(link, &normalized_query))
        .collect()
}

fn is_match(link: &LinkRef, normalized_query: &str) -> bool {
    link.normalized_text().contains(normalized_query)
        || link.normalized_href().contains(normalized_query)
}

#[cfg(test)]
mod tests {
    use super::search;
    use crate::model::{ElementId, LinkRef};

    fn fixture() -> Vec<LinkRef> {
        vec![
            LinkRef::new(ElementId(1), "Home", "https://example.com/home"),
            LinkRef::new(ElementId(2), "About Home", "https://example.com/about"),
            LinkRef::new(ElementId(3), "Contact", "https://example.com/contact"),
        ]
    }

    #[test]
    fn empty_query_matches_nothing() {
        assert!(search(&fixture(), "").is_empty());
    }

    #[test]
    fn matches_text_or_href_in_document_order() {
        let links = fixture();
        let ids: Vec<ElementId> = search(&links, "home").iter().map(|l| l.element).collect();
        assert_eq!(ids, vec![ElementId(1), ElementId(2)]);

        let ids: Vec<ElementId> = search(&links, "/about").iter().map(|l| l.element).collect();
        assert_eq!(ids, vec![ElementId(2)]);
    }

    #[test]
    fn query_case_does_not_change_result() {
        let links = fixture();
        assert_eq!(search(&links, "HoMe"), search(&links, "home"));
    }

    #[test]
    fn whitespace_is_significant() {
        let links = fixture();
        assert_eq!(search(&links, "about home").len(), 1);
        assert!(search(&links, "abouthome").is_empty());
    }
}
