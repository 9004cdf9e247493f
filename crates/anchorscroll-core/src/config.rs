#![forbid(unsafe_code)]

//! Embedder-facing configuration for the click handler.

use serde::Serialize;

/// Selector used to find the nearest in-page anchor around a click target.
pub const DEFAULT_ANCHOR_SELECTOR: &str = "a[href^=\"#\"]";

/// Media query whose match means the user asked for reduced motion.
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// `href` values treated as intentional no-target placeholders.
pub const DEFAULT_PLACEHOLDER_HREFS: [&str; 3] = ["", "#", "#!"];

/// How the visible URL fragment is rewritten after a scroll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryUpdateMode {
    /// `history.replaceState`: the fragment changes without a new entry.
    #[default]
    Replace,
    /// `history.pushState`: each click adds a back-button entry.
    Push,
}

/// Handler configuration.
///
/// There are no runtime flags; embedders that need different behavior build
/// a config in code and hand it to
/// [`AnchorClickHandler::new`](crate::handler::AnchorClickHandler::new).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorScrollConfig {
    /// Ancestor-or-self selector for in-page links.
    pub anchor_selector: String,
    /// Exact `href` values that never trigger a scroll.
    pub placeholder_hrefs: Vec<String>,
    /// Media query consulted for the reduced-motion preference.
    pub reduced_motion_query: String,
    pub history_mode: HistoryUpdateMode,
}

impl Default for AnchorScrollConfig {
    fn default() -> Self {
        Self {
            anchor_selector: DEFAULT_ANCHOR_SELECTOR.to_string(),
            placeholder_hrefs: DEFAULT_PLACEHOLDER_HREFS
                .iter()
                .map(|href| (*href).to_string())
                .collect(),
            reduced_motion_query: REDUCED_MOTION_QUERY.to_string(),
            history_mode: HistoryUpdateMode::Replace,
        }
    }
}

impl AnchorScrollConfig {
    /// Use `pushState` instead of `replaceState` for fragment updates.
    #[must_use]
    pub fn with_history_mode(mut self, mode: HistoryUpdateMode) -> Self {
        self.history_mode = mode;
        self
    }

    /// Whether `href` is one of the configured placeholders.
    #[must_use]
    pub fn is_placeholder(&self, href: &str) -> bool {
        self.placeholder_hrefs.iter().any(|p| p == href)
    }
}
