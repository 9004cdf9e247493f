#![forbid(unsafe_code)]

//! Click-intercept decision procedure for in-page hash links.
//!
//! [`AnchorClickHandler::handle_click`] walks a fixed sequence:
//! resolve the anchor, classify its `href`, decode the fragment, look up the
//! target, and only then suppress the default action, scroll, and rewrite
//! the URL fragment. Every exit before the lookup succeeds leaves the page
//! untouched so the browser's own navigation proceeds.

use serde::Serialize;
use tracing::{debug, trace};

use crate::config::{AnchorScrollConfig, HistoryUpdateMode};
use crate::fragment::{HrefClass, TargetId};
use crate::host::{AnchorScrollHost, ScrollMotion, ScrollRequest};

/// Why a click was left to the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorIgnoredReason {
    /// No ancestor-or-self in-page anchor around the click target.
    NoAnchor,
    /// The anchor has no `href` attribute.
    MissingHref,
    /// `href` is a placeholder such as `#` or `#!`.
    PlaceholderHref,
    /// No element carries the fragment's identifier.
    TargetNotFound,
}

/// Outcome category for one click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum AnchorClickOutcome {
    Ignored(AnchorIgnoredReason),
    Scrolled,
}

/// Which scroll API carried out the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollPath {
    WithOptions,
    /// Options-based scrolling was unavailable; jumped via `scrollTo(0, y)`.
    LegacyJump,
}

/// Which mechanism rewrote the URL fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentPath {
    History(HistoryUpdateMode),
    /// History API unavailable; `location.hash` was assigned.
    LocationAssign,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScrollRecord {
    pub request: ScrollRequest,
    pub path: ScrollPath,
}

/// Result of one click dispatch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnchorClickDispatch {
    pub outcome: AnchorClickOutcome,
    pub href: Option<String>,
    pub target_id: Option<TargetId>,
    pub default_prevented: bool,
    pub reduced_motion: Option<bool>,
    pub scroll: Option<ScrollRecord>,
    pub fragment_path: Option<FragmentPath>,
}

impl AnchorClickDispatch {
    fn ignored(
        reason: AnchorIgnoredReason,
        href: Option<String>,
        target_id: Option<TargetId>,
    ) -> Self {
        Self {
            outcome: AnchorClickOutcome::Ignored(reason),
            href,
            target_id,
            default_prevented: false,
            reduced_motion: None,
            scroll: None,
            fragment_path: None,
        }
    }

    #[must_use]
    pub const fn is_scrolled(&self) -> bool {
        matches!(self.outcome, AnchorClickOutcome::Scrolled)
    }

    #[must_use]
    pub const fn ignored_reason(&self) -> Option<AnchorIgnoredReason> {
        match self.outcome {
            AnchorClickOutcome::Ignored(reason) => Some(reason),
            AnchorClickOutcome::Scrolled => None,
        }
    }
}

/// Stateless click handler.
///
/// One instance serves the whole page; it only borrows its configuration
/// during a dispatch.
#[derive(Debug, Clone, Default)]
pub struct AnchorClickHandler {
    config: AnchorScrollConfig,
}

impl AnchorClickHandler {
    #[must_use]
    pub fn new(config: AnchorScrollConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &AnchorScrollConfig {
        &self.config
    }

    /// Handle one click against `host`.
    pub fn handle_click<H: AnchorScrollHost>(
        &self,
        host: &mut H,
        event: &H::Event,
    ) -> AnchorClickDispatch {
        let link = host
            .click_target(event)
            .and_then(|target| host.closest_anchor(&target, &self.config.anchor_selector));
        let Some(link) = link else {
            trace!(target: "anchorscroll::click", "click outside in-page anchor");
            return AnchorClickDispatch::ignored(AnchorIgnoredReason::NoAnchor, None, None);
        };

        let Some(href) = host.attribute(&link, "href") else {
            trace!(target: "anchorscroll::click", "anchor without href");
            return AnchorClickDispatch::ignored(AnchorIgnoredReason::MissingHref, None, None);
        };

        let raw = match HrefClass::classify(&href, &self.config) {
            HrefClass::Placeholder => {
                trace!(target: "anchorscroll::click", href = %href, "placeholder href");
                return AnchorClickDispatch::ignored(
                    AnchorIgnoredReason::PlaceholderHref,
                    Some(href),
                    None,
                );
            }
            // Only reachable when the selector admits non-hash links.
            HrefClass::NotFragment => {
                return AnchorClickDispatch::ignored(
                    AnchorIgnoredReason::NoAnchor,
                    Some(href),
                    None,
                );
            }
            HrefClass::Fragment(raw) => raw,
        };

        let target_id = TargetId::resolve(raw);
        if target_id.fell_back_to_raw() {
            debug!(
                target: "anchorscroll::capability",
                raw = %target_id.raw,
                "fragment decode failed; looking up raw identifier"
            );
        }

        let Some(element) = host.element_by_id(target_id.lookup_key()) else {
            trace!(
                target: "anchorscroll::click",
                id = %target_id.lookup_key(),
                "fragment target not found"
            );
            return AnchorClickDispatch::ignored(
                AnchorIgnoredReason::TargetNotFound,
                Some(href),
                Some(target_id),
            );
        };

        host.prevent_default(event);

        let reduced_motion = self.prefers_reduced_motion(host);
        let top = host.bounding_client_top(&element) + host.page_y_offset();
        let request = ScrollRequest {
            top,
            motion: ScrollMotion::for_preference(reduced_motion),
        };
        let scroll_path = match host.scroll_to_with_options(request) {
            Ok(()) => ScrollPath::WithOptions,
            Err(err) => {
                debug!(
                    target: "anchorscroll::capability",
                    error = %err,
                    "options scroll unavailable; jumping"
                );
                host.scroll_to(0.0, top);
                ScrollPath::LegacyJump
            }
        };

        let fragment_path = self.update_fragment(host, target_id.lookup_key());

        debug!(
            target: "anchorscroll::click",
            id = %target_id.lookup_key(),
            top,
            reduced_motion,
            ?scroll_path,
            ?fragment_path,
            "scrolled to in-page anchor"
        );

        AnchorClickDispatch {
            outcome: AnchorClickOutcome::Scrolled,
            href: Some(href),
            target_id: Some(target_id),
            default_prevented: true,
            reduced_motion: Some(reduced_motion),
            scroll: Some(ScrollRecord {
                request,
                path: scroll_path,
            }),
            fragment_path: Some(fragment_path),
        }
    }

    fn prefers_reduced_motion<H: AnchorScrollHost>(&self, host: &H) -> bool {
        match host.match_media(&self.config.reduced_motion_query) {
            Ok(matches) => matches,
            Err(err) => {
                debug!(
                    target: "anchorscroll::capability",
                    error = %err,
                    "media query unavailable; assuming no motion preference"
                );
                false
            }
        }
    }

    fn update_fragment<H: AnchorScrollHost>(&self, host: &mut H, fragment: &str) -> FragmentPath {
        let mode = self.config.history_mode;
        match host.write_history_fragment(fragment, mode) {
            Ok(()) => FragmentPath::History(mode),
            Err(err) => {
                // May jump again after the scroll; accepted on old engines.
                debug!(
                    target: "anchorscroll::capability",
                    error = %err,
                    "history API unavailable; assigning location.hash"
                );
                host.assign_location_fragment(fragment);
                FragmentPath::LocationAssign
            }
        }
    }
}
