use serde::{Deserialize, Serialize};

use crate::document::IndicatorView;
use crate::model::LinkRef;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PageSpec {
    #[serde(default)]
    pub base_url: Option<String>,
    /// Id of the element focused when the page is loaded.
    #[serde(default)]
    pub focused: Option<String>,
    #[serde(default)]
    pub elements: Vec<ElementSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ElementSpec {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub contenteditable: bool,
    /// Whether the element establishes an offset parent (non-static position).
    #[serde(default)]
    pub positioned: bool,
    #[serde(default)]
    pub offset_top: i32,
    #[serde(default)]
    pub offset_left: i32,
    #[serde(default)]
    pub children: Vec<ElementSpec>,
}

fn default_tag() -> String {
    "div".to_string()
}

impl ElementSpec {
    pub fn new(tag: &str) -> Self {
        Self {
            id: None,
            tag: tag.to_string(),
            href: None,
            text: String::new(),
            contenteditable: false,
            positioned: false,
            offset_top: 0,
            offset_left: 0,
            children: Vec::new(),
        }
    }

    pub fn link(text: &str, href: &str) -> Self {
        Self {
            href: Some(href.to_string()),
            text: text.to_string(),
            ..Self::new("a")
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn at(mut self, top: i32, left: i32) -> Self {
        self.offset_top = top;
        self.offset_left = left;
        self
    }

    pub fn positioned(mut self) -> Self {
        self.positioned = true;
        self
    }

    pub fn with_children(mut self, children: Vec<ElementSpec>) -> Self {
        self.children = children;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkDto {
    pub element: usize,
    pub text: String,
    pub href: String,
}

impl From<LinkRef> for LinkDto {
    fn from(value: LinkRef) -> Self {
        Self {
            element: value.element.0,
            text: value.text,
            href: value.href,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepDto {
    pub key: String,
    pub action: String,
    pub prevented: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabelDto {
    pub letter: char,
    pub link: usize,
    pub top: i32,
    pub left: i32,
    pub page_top: i32,
    pub page_left: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct IndicatorDto {
    pub visible: bool,
    pub query: String,
    pub counter: String,
    pub help: String,
}

impl From<&IndicatorView> for IndicatorDto {
    fn from(value: &IndicatorView) -> Self {
        Self {
            visible: value.visible,
            query: value.query.clone(),
            counter: value.counter.clone(),
            help: value.help.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplayReport {
    pub steps: Vec<StepDto>,
    pub mode: String,
    pub query: String,
    pub matches: Vec<LinkDto>,
    pub selected: Option<usize>,
    pub indicator: IndicatorDto,
    pub labels: Vec<LabelDto>,
    pub activated: Vec<LinkDto>,
}
