//! Shadow DOM
//!
//! Shadow root data for host elements. The root itself lives in the
//! arena as a parentless node; this module holds its per-root state.

use crate::NodeId;

/// Shadow root mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowRootMode {
    #[default]
    Open,
    Closed,
}

/// Shadow root state
#[derive(Debug, Clone)]
pub struct ShadowRootData {
    /// Host element
    pub host: NodeId,
    /// Mode (open/closed)
    pub mode: ShadowRootMode,
    /// Space-separated list of delegated ARIA attribute names.
    /// Write-once, like `delegatesFocus`.
    delegates_aria: Option<Box<str>>,
}

impl ShadowRootData {
    pub(crate) fn new(host: NodeId, mode: ShadowRootMode) -> Self {
        Self {
            host,
            mode,
            delegates_aria: None,
        }
    }

    /// The delegated-attribute configuration, if one has been installed
    pub fn delegates_aria(&self) -> Option<&str> {
        self.delegates_aria.as_deref()
    }

    /// Install the delegated-attribute configuration. The first write
    /// sticks; later writes are silently ignored.
    pub fn set_delegates_aria(&mut self, value: &str) {
        if self.delegates_aria.is_none() {
            self.delegates_aria = Some(value.into());
        }
    }
}
