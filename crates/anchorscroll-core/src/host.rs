#![forbid(unsafe_code)]

//! Capability boundary between the click handler and its page.
//!
//! Mandatory DOM reads return plain values. Every capability that may be
//! missing or may throw in older environments returns
//! `Result<_, CapabilityError>` so the handler can pick its fallback
//! explicitly.

use serde::Serialize;

use crate::config::HistoryUpdateMode;

/// An optional page capability was absent or threw when invoked.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapabilityError {
    /// The capability is not present in this environment.
    #[error("unsupported: {0}")]
    Unsupported(&'static str),
    /// The capability exists but raised an exception.
    #[error("capability threw: {0}")]
    Threw(String),
}

/// Motion requested for a scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollMotion {
    Smooth,
    Instant,
}

impl ScrollMotion {
    /// Instant when the user prefers reduced motion, smooth otherwise.
    #[must_use]
    pub const fn for_preference(prefers_reduced_motion: bool) -> Self {
        if prefers_reduced_motion {
            Self::Instant
        } else {
            Self::Smooth
        }
    }
}

/// Vertical scroll to a document-relative offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScrollRequest {
    pub top: f64,
    pub motion: ScrollMotion,
}

/// Everything the click handler needs from a page.
///
/// `Event` and `Element` are opaque handles: `web_sys` objects in the
/// browser, node indexes in [`HeadlessPage`](crate::headless::HeadlessPage).
pub trait AnchorScrollHost {
    type Event;
    type Element;

    /// Element the click was dispatched to.
    fn click_target(&self, event: &Self::Event) -> Option<Self::Element>;

    /// Nearest ancestor-or-self of `element` matching `selector`.
    fn closest_anchor(&self, element: &Self::Element, selector: &str) -> Option<Self::Element>;

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// Suppress the browser's default action for `event`.
    fn prevent_default(&mut self, event: &Self::Event);

    /// Evaluate a media query.
    fn match_media(&self, query: &str) -> Result<bool, CapabilityError>;

    /// Top edge of `element` relative to the viewport.
    fn bounding_client_top(&self, element: &Self::Element) -> f64;

    /// Current vertical scroll offset of the document.
    fn page_y_offset(&self) -> f64;

    /// Options-based scroll honoring `request.motion`.
    fn scroll_to_with_options(&mut self, request: ScrollRequest) -> Result<(), CapabilityError>;

    /// Legacy coordinate scroll; always available and always immediate.
    fn scroll_to(&mut self, x: f64, y: f64);

    /// Rewrite the URL fragment through the history API without scrolling.
    fn write_history_fragment(
        &mut self,
        fragment: &str,
        mode: HistoryUpdateMode,
    ) -> Result<(), CapabilityError>;

    /// Assign `location.hash` directly. May cause a native jump.
    fn assign_location_fragment(&mut self, fragment: &str);
}
