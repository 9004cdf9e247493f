#![forbid(unsafe_code)]

//! `anchorscroll-core` decides what happens when a user clicks an in-page
//! hash link.
//!
//! Design goals:
//! - **Host-driven**: every browser capability the behavior touches is
//!   reached through [`AnchorScrollHost`], so the same decision procedure
//!   runs against the real DOM (`anchorscroll-web`) and against
//!   [`HeadlessPage`] in native tests.
//! - **Stateless per click**: [`AnchorClickHandler::handle_click`] reads the
//!   page, issues at most one scroll and one fragment update, and keeps
//!   nothing between calls.
//! - **Optional capabilities degrade, never fail**: media queries, the
//!   options-based scroll API, history replacement, and fragment decoding
//!   each route to a fallback when absent.
//!
//! This crate does not bind to `wasm-bindgen`; `anchorscroll-web` wraps it.

pub mod click_trace;
pub mod config;
pub mod fragment;
pub mod handler;
pub mod headless;
pub mod host;

pub use click_trace::{ClickTrace, ClickTraceSummary};
pub use config::{AnchorScrollConfig, HistoryUpdateMode};
pub use fragment::{DecodeOutcome, FragmentDecodeError, HrefClass, TargetId};
pub use handler::{
    AnchorClickDispatch, AnchorClickHandler, AnchorClickOutcome, AnchorIgnoredReason,
    FragmentPath, ScrollPath, ScrollRecord,
};
pub use headless::{
    CapabilityMode, CapabilitySet, HeadlessClick, HeadlessHistoryEntry, HeadlessPage, HeadlessScroll,
    NodeId,
};
pub use host::{AnchorScrollHost, CapabilityError, ScrollMotion, ScrollRequest};
