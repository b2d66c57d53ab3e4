use crate::document::{page_offset, Document};
use crate::model::ElementId;

pub const MAX_MNEMONICS: usize = 26;

/// Letter to link mapping, valid only while the overlay is shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MnemonicMap {
    entries: Vec<(char, ElementId)>,
}

impl MnemonicMap {
    /// Assigns `a`, `b`, ... to the first links in document order.
    pub fn assign(links: &[ElementId], limit: usize) -> Self {
        let limit = limit.min(MAX_MNEMONICS);
        let entries = ('a'..='z')
            .zip(links.iter().copied())
            .take(limit)
            .collect();
        Self { entries }
    }

    pub fn get(&self, letter: char) -> Option<ElementId> {
        let letter = letter.to_ascii_lowercase();
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == letter)
            .map(|(_, element)| *element)
    }

    pub fn entries(&self) -> &[(char, ElementId)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelPlacement {
    pub letter: char,
    pub link: ElementId,
    /// Nearest positioned ancestor the label is attached to.
    pub anchor: Option<ElementId>,
    pub top: i32,
    pub left: i32,
    pub page_top: i32,
    pub page_left: i32,
}

/// Places each label just above its link, relative to the link's offset
/// parent so it follows layout changes. Links without layout (hidden or
/// detached) get no label but keep their letter.
pub fn place_labels<D: Document + ?Sized>(
    document: &D,
    map: &MnemonicMap,
    label_height: i32,
) -> Vec<LabelPlacement> {
    map.entries()
        .iter()
        .filter_map(|&(letter, link)| {
            let Some(offset) = document.offset(link) else {
                tracing::debug!(%link, %letter, "link has no layout; label skipped");
                return None;
            };
            let (page_top, page_left) = page_offset(document, link);
            Some(LabelPlacement {
                letter,
                link,
                anchor: offset.parent,
                top: offset.top - label_height,
                left: offset.left,
                page_top: page_top - label_height,
                page_left,
            })
        })
        .collect()
}

/// Rendered overlay: the mapping plus the label nodes it inserted.
#[derive(Debug, Clone, Default)]
pub struct MnemonicOverlay {
    map: MnemonicMap,
    placements: Vec<LabelPlacement>,
    labels: Vec<ElementId>,
}

impl MnemonicOverlay {
    pub fn render<D: Document + ?Sized>(
        document: &mut D,
        limit: usize,
        label_class: &str,
        label_height: i32,
    ) -> Self {
        let map = MnemonicMap::assign(&document.links(), limit);
        let placements = place_labels(document, &map, label_height);
        let mut labels = Vec::with_capacity(placements.len());
        for placement in &placements {
            let text = placement.letter.to_string();
            match document.insert_label(
                placement.anchor,
                &text,
                label_class,
                placement.top,
                placement.left,
            ) {
                Ok(label) => labels.push(label),
                Err(error) => {
                    tracing::debug!(link = %placement.link, %error, "mnemonic label not inserted");
                }
            }
        }
        tracing::debug!(assigned = map.len(), "mnemonic overlay rendered");
        Self {
            map,
            placements,
            labels,
        }
    }

    pub fn map(&self) -> &MnemonicMap {
        &self.map
    }

    pub fn placements(&self) -> &[LabelPlacement] {
        &self.placements
    }

    pub fn clear<D: Document + ?Sized>(&mut self, document: &mut D) {
        for label in self.labels.drain(..) {
            document.remove_element(label);
        }
        self.placements.clear();
        self.map = MnemonicMap::default();
    }
}
