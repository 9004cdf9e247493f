#![forbid(unsafe_code)]

//! One-shot listener registration.
//!
//! The document listener lives for the whole page. [`ListenerRegistration`]
//! makes repeated install calls (module start plus explicit host calls)
//! register it exactly once, and leaves it uninstalled when the environment
//! has no window or document so a later call can retry.

use std::cell::Cell;

use tracing::debug;

/// Result of one install attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The listener was registered by this call.
    Installed,
    /// A previous call already registered it.
    AlreadyInstalled,
    /// No window/document context; nothing was registered.
    NoDocument,
}

impl InstallOutcome {
    /// Whether a listener is active after this attempt.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Installed | Self::AlreadyInstalled)
    }
}

/// Registration flag for the page-lifetime click listener.
#[derive(Debug, Default)]
pub struct ListenerRegistration {
    installed: Cell<bool>,
}

impl ListenerRegistration {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            installed: Cell::new(false),
        }
    }

    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.installed.get()
    }

    /// Run `register` unless a listener is already installed.
    ///
    /// `register` returns `false` when the environment has no document.
    pub fn install_with<F>(&self, register: F) -> InstallOutcome
    where
        F: FnOnce() -> bool,
    {
        if self.installed.get() {
            return InstallOutcome::AlreadyInstalled;
        }
        if register() {
            self.installed.set(true);
            debug!(target: "anchorscroll::web", "click listener installed");
            InstallOutcome::Installed
        } else {
            debug!(target: "anchorscroll::web", "no document; click listener not installed");
            InstallOutcome::NoDocument
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{InstallOutcome, ListenerRegistration};
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    #[test]
    fn registers_exactly_once() {
        let registration = ListenerRegistration::new();
        let calls = Cell::new(0);
        let register = || {
            calls.set(calls.get() + 1);
            true
        };

        assert_eq!(registration.install_with(register), InstallOutcome::Installed);
        assert_eq!(
            registration.install_with(register),
            InstallOutcome::AlreadyInstalled
        );
        assert_eq!(calls.get(), 1);
        assert!(registration.is_installed());
    }

    #[test]
    fn missing_document_leaves_registration_open() {
        let registration = ListenerRegistration::new();
        let outcome = registration.install_with(|| false);
        assert_eq!(outcome, InstallOutcome::NoDocument);
        assert!(!outcome.is_active());
        assert!(!registration.is_installed());

        assert_eq!(registration.install_with(|| true), InstallOutcome::Installed);
        assert!(InstallOutcome::AlreadyInstalled.is_active());
    }
}
