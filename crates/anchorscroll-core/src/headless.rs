#![forbid(unsafe_code)]

//! Deterministic in-memory page implementing [`AnchorScrollHost`].
//!
//! Elements are placed at fixed document-relative offsets; the page keeps a
//! vertical scroll position, a URL fragment, and logs of every scroll and
//! history write. Each optional capability can be switched to missing or
//! throwing to exercise the fallback paths without a browser.

use std::collections::BTreeMap;

use crate::config::HistoryUpdateMode;
use crate::host::{AnchorScrollHost, CapabilityError, ScrollMotion, ScrollRequest};

/// Index of an element inside a [`HeadlessPage`].
pub type NodeId = usize;

/// Availability of one optional capability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CapabilityMode {
    #[default]
    Available,
    Missing,
    Throws,
}

impl CapabilityMode {
    fn check(self, name: &'static str) -> Result<(), CapabilityError> {
        match self {
            Self::Available => Ok(()),
            Self::Missing => Err(CapabilityError::Unsupported(name)),
            Self::Throws => Err(CapabilityError::Threw(format!("{name} threw"))),
        }
    }
}

/// Capability toggles for a [`HeadlessPage`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    pub match_media: CapabilityMode,
    pub scroll_options: CapabilityMode,
    pub history: CapabilityMode,
}

/// Click dispatched to a headless element (or to nothing).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadlessClick {
    pub target: Option<NodeId>,
}

impl HeadlessClick {
    #[must_use]
    pub const fn on(target: NodeId) -> Self {
        Self {
            target: Some(target),
        }
    }
}

/// Scroll performed by the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadlessScroll {
    pub top: f64,
    /// `None` for coordinate scrolls and native fragment jumps.
    pub motion: Option<ScrollMotion>,
    pub native_jump: bool,
}

/// History write performed by the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessHistoryEntry {
    pub fragment: String,
    /// `None` when written through `location.hash`.
    pub mode: Option<HistoryUpdateMode>,
}

#[derive(Debug, Clone)]
struct HeadlessNode {
    tag: String,
    parent: Option<NodeId>,
    attributes: BTreeMap<String, String>,
    document_top: f64,
}

/// `tag[attr^="prefix"]`, the only selector form the headless page matches.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PrefixSelector<'a> {
    tag: &'a str,
    attribute: &'a str,
    prefix: &'a str,
}

impl<'a> PrefixSelector<'a> {
    fn parse(selector: &'a str) -> Option<Self> {
        let (tag, rest) = selector.split_once('[')?;
        let body = rest.strip_suffix(']')?;
        let (attribute, value) = body.split_once("^=")?;
        let prefix = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))?;
        Some(Self {
            tag: tag.trim(),
            attribute: attribute.trim(),
            prefix,
        })
    }

    fn matches(&self, node: &HeadlessNode) -> bool {
        (self.tag.is_empty() || node.tag.eq_ignore_ascii_case(self.tag))
            && node
                .attributes
                .get(self.attribute)
                .is_some_and(|value| value.starts_with(self.prefix))
    }
}

/// In-memory page.
#[derive(Debug, Clone, Default)]
pub struct HeadlessPage {
    nodes: Vec<HeadlessNode>,
    scroll_y: f64,
    fragment: String,
    prefers_reduced_motion: bool,
    capabilities: CapabilitySet,
    defaults_prevented: usize,
    scroll_log: Vec<HeadlessScroll>,
    history_log: Vec<HeadlessHistoryEntry>,
}

impl HeadlessPage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element at `document_top`, optionally nested in `parent`.
    pub fn add_element(&mut self, tag: &str, parent: Option<NodeId>, document_top: f64) -> NodeId {
        self.nodes.push(HeadlessNode {
            tag: tag.to_string(),
            parent,
            attributes: BTreeMap::new(),
            document_top,
        });
        self.nodes.len() - 1
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(node) {
            node.attributes.insert(name.to_string(), value.to_string());
        }
    }

    /// Add a `<section id=...>` at `document_top`.
    pub fn add_section(&mut self, id: &str, document_top: f64) -> NodeId {
        let node = self.add_element("section", None, document_top);
        self.set_attribute(node, "id", id);
        node
    }

    /// Add an `<a href=...>` at the top of the document.
    pub fn add_link(&mut self, href: &str) -> NodeId {
        let node = self.add_element("a", None, 0.0);
        self.set_attribute(node, "href", href);
        node
    }

    pub fn set_prefers_reduced_motion(&mut self, reduced: bool) {
        self.prefers_reduced_motion = reduced;
    }

    pub fn set_capabilities(&mut self, capabilities: CapabilitySet) {
        self.capabilities = capabilities;
    }

    pub fn set_scroll_y(&mut self, y: f64) {
        self.scroll_y = y.max(0.0);
    }

    #[must_use]
    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Current URL fragment without the leading `#`.
    #[must_use]
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    #[must_use]
    pub fn defaults_prevented(&self) -> usize {
        self.defaults_prevented
    }

    #[must_use]
    pub fn scroll_log(&self) -> &[HeadlessScroll] {
        &self.scroll_log
    }

    #[must_use]
    pub fn history_log(&self) -> &[HeadlessHistoryEntry] {
        &self.history_log
    }

    fn node(&self, id: NodeId) -> Option<&HeadlessNode> {
        self.nodes.get(id)
    }

    fn apply_scroll(&mut self, top: f64, motion: Option<ScrollMotion>, native_jump: bool) {
        self.scroll_y = top.max(0.0);
        self.scroll_log.push(HeadlessScroll {
            top: self.scroll_y,
            motion,
            native_jump,
        });
    }
}

impl AnchorScrollHost for HeadlessPage {
    type Event = HeadlessClick;
    type Element = NodeId;

    fn click_target(&self, event: &HeadlessClick) -> Option<NodeId> {
        event.target.filter(|&id| id < self.nodes.len())
    }

    fn closest_anchor(&self, element: &NodeId, selector: &str) -> Option<NodeId> {
        let selector = PrefixSelector::parse(selector)?;
        let mut current = Some(*element);
        while let Some(id) = current {
            let node = self.node(id)?;
            if selector.matches(node) {
                return Some(id);
            }
            current = node.parent;
        }
        None
    }

    fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        self.node(*element)?.attributes.get(name).cloned()
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.attributes.get("id").is_some_and(|value| value == id))
    }

    fn prevent_default(&mut self, _event: &HeadlessClick) {
        self.defaults_prevented += 1;
    }

    fn match_media(&self, query: &str) -> Result<bool, CapabilityError> {
        self.capabilities.match_media.check("matchMedia")?;
        Ok(query.contains("prefers-reduced-motion: reduce") && self.prefers_reduced_motion)
    }

    fn bounding_client_top(&self, element: &NodeId) -> f64 {
        self.node(*element)
            .map_or(0.0, |node| node.document_top - self.scroll_y)
    }

    fn page_y_offset(&self) -> f64 {
        self.scroll_y
    }

    fn scroll_to_with_options(&mut self, request: ScrollRequest) -> Result<(), CapabilityError> {
        self.capabilities.scroll_options.check("scrollTo(options)")?;
        self.apply_scroll(request.top, Some(request.motion), false);
        Ok(())
    }

    fn scroll_to(&mut self, _x: f64, y: f64) {
        self.apply_scroll(y, None, false);
    }

    fn write_history_fragment(
        &mut self,
        fragment: &str,
        mode: HistoryUpdateMode,
    ) -> Result<(), CapabilityError> {
        self.capabilities.history.check("history")?;
        self.fragment = fragment.to_string();
        self.history_log.push(HeadlessHistoryEntry {
            fragment: fragment.to_string(),
            mode: Some(mode),
        });
        Ok(())
    }

    fn assign_location_fragment(&mut self, fragment: &str) {
        self.fragment = fragment.to_string();
        self.history_log.push(HeadlessHistoryEntry {
            fragment: fragment.to_string(),
            mode: None,
        });
        // Browsers jump to the new fragment's target.
        if let Some(top) = self
            .element_by_id(fragment)
            .and_then(|id| self.node(id))
            .map(|node| node.document_top)
        {
            self.apply_scroll(top, None, true);
        }
    }
}
