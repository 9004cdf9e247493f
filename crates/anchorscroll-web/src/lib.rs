#![forbid(unsafe_code)]

//! Browser entry point for anchorscroll.
//!
//! On `wasm32` this crate exports a `wasm-bindgen` start function that
//! installs one `click` listener on the document. The listener hands every
//! click to [`anchorscroll_core::AnchorClickHandler`] through a `web-sys`
//! implementation of [`anchorscroll_core::AnchorScrollHost`].
//!
//! The registration guard is platform-independent and tested natively.

#[cfg(target_arch = "wasm32")]
mod dom_host;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{anchor_scroll_installed, decode_anchor_fragment, install_anchor_scroll};

pub mod registration;

pub use anchorscroll_core::{AnchorClickHandler, AnchorScrollConfig, HistoryUpdateMode};
