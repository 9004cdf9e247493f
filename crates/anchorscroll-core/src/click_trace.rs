#![forbid(unsafe_code)]

//! Bounded trace of click dispatches for hosts and tests.
//!
//! [`ClickTrace`] keeps the most recent [`AnchorClickDispatch`] records,
//! summarises them by outcome and fallback path, and exports JSONL with one
//! object per click.
//!
//! # Usage
//!
//! ```
//! use anchorscroll_core::{AnchorClickHandler, ClickTrace, HeadlessClick, HeadlessPage};
//!
//! let mut page = HeadlessPage::new();
//! let link = page.add_link("#usage");
//! page.add_section("usage", 640.0);
//!
//! let handler = AnchorClickHandler::default();
//! let mut trace = ClickTrace::new(64);
//! trace.record(handler.handle_click(&mut page, &HeadlessClick::on(link)));
//!
//! assert_eq!(trace.summary().scrolled, 1);
//! assert_eq!(trace.to_jsonl().lines().count(), 1);
//! ```

use std::collections::VecDeque;

use serde::Serialize;

use crate::handler::{
    AnchorClickDispatch, AnchorClickOutcome, AnchorIgnoredReason, FragmentPath, ScrollPath,
};

/// Default number of dispatches retained.
pub const DEFAULT_CLICK_TRACE_CAPACITY: usize = 256;

/// Bounded click dispatch history.
#[derive(Debug, Clone)]
pub struct ClickTrace {
    capacity: usize,
    records: VecDeque<AnchorClickDispatch>,
    dropped: u64,
}

impl Default for ClickTrace {
    fn default() -> Self {
        Self::new(DEFAULT_CLICK_TRACE_CAPACITY)
    }
}

impl ClickTrace {
    /// Create a trace keeping at most `capacity` records (minimum 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            records: VecDeque::with_capacity(capacity.min(1024)),
            dropped: 0,
        }
    }

    /// Append a dispatch, evicting the oldest when full.
    pub fn record(&mut self, dispatch: AnchorClickDispatch) {
        if self.records.len() >= self.capacity {
            self.records.pop_front();
            self.dropped = self.dropped.saturating_add(1);
        }
        self.records.push_back(dispatch);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records evicted because the trace was full.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn records(&self) -> impl Iterator<Item = &AnchorClickDispatch> {
        self.records.iter()
    }

    #[must_use]
    pub fn last(&self) -> Option<&AnchorClickDispatch> {
        self.records.back()
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.dropped = 0;
    }

    /// Count retained records by outcome and fallback path.
    #[must_use]
    pub fn summary(&self) -> ClickTraceSummary {
        let mut summary = ClickTraceSummary {
            total: self.records.len() as u64,
            dropped: self.dropped,
            ..ClickTraceSummary::default()
        };
        for dispatch in &self.records {
            match dispatch.outcome {
                AnchorClickOutcome::Scrolled => summary.scrolled += 1,
                AnchorClickOutcome::Ignored(reason) => match reason {
                    AnchorIgnoredReason::NoAnchor => summary.ignored_no_anchor += 1,
                    AnchorIgnoredReason::MissingHref => summary.ignored_missing_href += 1,
                    AnchorIgnoredReason::PlaceholderHref => summary.ignored_placeholder += 1,
                    AnchorIgnoredReason::TargetNotFound => summary.ignored_target_not_found += 1,
                },
            }
            if dispatch
                .target_id
                .as_ref()
                .is_some_and(|id| id.fell_back_to_raw())
            {
                summary.raw_fragment_fallbacks += 1;
            }
            if dispatch
                .scroll
                .is_some_and(|scroll| scroll.path == ScrollPath::LegacyJump)
            {
                summary.legacy_scroll_fallbacks += 1;
            }
            if dispatch.fragment_path == Some(FragmentPath::LocationAssign) {
                summary.location_hash_fallbacks += 1;
            }
        }
        summary
    }

    /// Emit one JSON object per retained record, in order.
    #[must_use]
    pub fn to_jsonl(&self) -> String {
        let mut out = String::new();
        for (idx, dispatch) in self.records.iter().enumerate() {
            let row = JsonlClickRecord {
                click_idx: idx,
                dispatch,
            };
            if let Ok(line) = serde_json::to_string(&row) {
                out.push_str(&line);
                out.push('\n');
            }
        }
        out
    }
}

#[derive(Debug, Serialize)]
struct JsonlClickRecord<'a> {
    click_idx: usize,
    #[serde(flatten)]
    dispatch: &'a AnchorClickDispatch,
}

/// Aggregate counts over a [`ClickTrace`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClickTraceSummary {
    pub total: u64,
    pub dropped: u64,
    pub scrolled: u64,
    pub ignored_no_anchor: u64,
    pub ignored_missing_href: u64,
    pub ignored_placeholder: u64,
    pub ignored_target_not_found: u64,
    pub raw_fragment_fallbacks: u64,
    pub legacy_scroll_fallbacks: u64,
    pub location_hash_fallbacks: u64,
}

impl ClickTraceSummary {
    /// Serialize to pretty JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::ClickTrace;
    use crate::config::AnchorScrollConfig;
    use crate::handler::AnchorClickHandler;
    use crate::headless::{CapabilityMode, CapabilitySet, HeadlessClick, HeadlessPage};
    use pretty_assertions::assert_eq;

    fn page_with_links() -> (HeadlessPage, Vec<usize>) {
        let mut page = HeadlessPage::new();
        page.add_section("intro", 100.0);
        page.add_section("se%ztion1", 300.0);
        let links = vec![
            page.add_link("#intro"),
            page.add_link("#"),
            page.add_link("#nowhere"),
            page.add_link("#se%ztion1"),
        ];
        (page, links)
    }

    #[test]
    fn summary_counts_outcomes_and_fallbacks() {
        let (mut page, links) = page_with_links();
        page.set_capabilities(CapabilitySet {
            scroll_options: CapabilityMode::Missing,
            ..CapabilitySet::default()
        });
        let handler = AnchorClickHandler::new(AnchorScrollConfig::default());
        let mut trace = ClickTrace::default();
        for link in &links {
            trace.record(handler.handle_click(&mut page, &HeadlessClick::on(*link)));
        }
        trace.record(handler.handle_click(&mut page, &HeadlessClick { target: None }));

        let summary = trace.summary();
        assert_eq!(summary.total, 5);
        assert_eq!(summary.scrolled, 2);
        assert_eq!(summary.ignored_placeholder, 1);
        assert_eq!(summary.ignored_target_not_found, 1);
        assert_eq!(summary.ignored_no_anchor, 1);
        assert_eq!(summary.raw_fragment_fallbacks, 1);
        assert_eq!(summary.legacy_scroll_fallbacks, 2);
        assert_eq!(summary.location_hash_fallbacks, 0);
    }

    #[test]
    fn capacity_evicts_oldest() {
        let (mut page, links) = page_with_links();
        let handler = AnchorClickHandler::default();
        let mut trace = ClickTrace::new(2);
        for link in &links {
            trace.record(handler.handle_click(&mut page, &HeadlessClick::on(*link)));
        }
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.dropped(), 2);
        assert_eq!(
            trace.last().and_then(|d| d.href.as_deref()),
            Some("#se%ztion1")
        );
        trace.clear();
        assert!(trace.is_empty());
        assert_eq!(trace.dropped(), 0);
    }

    #[test]
    fn jsonl_lines_are_valid_json() {
        let (mut page, links) = page_with_links();
        let handler = AnchorClickHandler::default();
        let mut trace = ClickTrace::new(16);
        for link in &links {
            trace.record(handler.handle_click(&mut page, &HeadlessClick::on(*link)));
        }
        let jsonl = trace.to_jsonl();
        let lines: Vec<&str> = jsonl.lines().collect();
        assert_eq!(lines.len(), 4);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["click_idx"], 0);
        assert_eq!(first["outcome"]["outcome"], "scrolled");
        assert_eq!(first["scroll"]["request"]["top"], 100.0);
        assert_eq!(first["scroll"]["request"]["motion"], "smooth");

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["outcome"]["reason"], "placeholder_href");
        assert_eq!(second["default_prevented"], false);

        let fourth: serde_json::Value = serde_json::from_str(lines[3]).unwrap();
        assert_eq!(fourth["target_id"]["decode"]["status"], "fell_back_to_raw");
        assert_eq!(fourth["target_id"]["decode"]["error"]["kind"], "malformed_escape");
    }

    #[test]
    fn summary_json_is_valid() {
        let trace = ClickTrace::new(4);
        let parsed: serde_json::Value = serde_json::from_str(&trace.summary().to_json()).unwrap();
        assert_eq!(parsed["total"], 0);
    }
}
