//! View lifecycle state.
//!
//! Provides [`ViewState`] and [`ViewHandle`] for tracking whether a consumer
//! view (the landing grid, a detail page, the comment widget) is still
//! mounted. Long-running work checks the handle before applying results and
//! stops when the view goes away.
//!
//! # Usage
//!
//! ```rust
//! use folio_core::lifecycle::{ViewHandle, ViewState};
//!
//! let handle = ViewHandle::new("portfolio");
//! assert_eq!(handle.state(), ViewState::Pending);
//!
//! handle.mount();
//! assert!(handle.is_mounted());
//! handle.unmount();
//! assert!(!handle.is_mounted());
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

// ============================================================================
// ViewState
// ============================================================================

/// State of a view in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewState {
    /// View has been created but not yet mounted.
    Pending,
    /// View is mounted and accepts state updates.
    Mounted,
    /// View has been torn down; late results must be dropped.
    Unmounted,
}

impl ViewState {
    /// Returns `true` if the view accepts state updates.
    pub fn is_mounted(&self) -> bool {
        matches!(self, Self::Mounted)
    }

    /// Returns `true` if the view has been torn down.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Unmounted)
    }
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Mounted => write!(f, "mounted"),
            Self::Unmounted => write!(f, "unmounted"),
        }
    }
}

// ============================================================================
// ViewHandle
// ============================================================================

/// Thread-safe handle for observing and updating a view's lifecycle.
///
/// Cheap to clone (Arc internals). State changes are broadcast
/// to all subscribers via a watch channel.
#[derive(Clone)]
pub struct ViewHandle {
    inner: Arc<ViewHandleInner>,
}

struct ViewHandleInner {
    name: String,
    tx: watch::Sender<ViewState>,
    created_at: Instant,
}

impl ViewHandle {
    /// Create a new handle with the given view name.
    ///
    /// Initial state is [`ViewState::Pending`].
    pub fn new(name: impl Into<String>) -> Self {
        let (tx, _rx) = watch::channel(ViewState::Pending);
        Self {
            inner: Arc::new(ViewHandleInner {
                name: name.into(),
                tx,
                created_at: Instant::now(),
            }),
        }
    }

    /// Create a handle that is already mounted.
    pub fn mounted(name: impl Into<String>) -> Self {
        let handle = Self::new(name);
        handle.mount();
        handle
    }

    /// Get the view name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Get the current state.
    pub fn state(&self) -> ViewState {
        *self.inner.tx.borrow()
    }

    /// Returns `true` while the view is mounted.
    pub fn is_mounted(&self) -> bool {
        self.state().is_mounted()
    }

    /// Mark the view as mounted. Has no effect once unmounted.
    pub fn mount(&self) {
        let changed = self.inner.tx.send_if_modified(|state| {
            if *state == ViewState::Pending {
                *state = ViewState::Mounted;
                true
            } else {
                false
            }
        });
        if changed {
            log::debug!("View '{}' mounted", self.inner.name);
        }
    }

    /// Mark the view as torn down. Idempotent.
    pub fn unmount(&self) {
        let previous = self.inner.tx.send_replace(ViewState::Unmounted);
        if previous != ViewState::Unmounted {
            log::debug!("View '{}' unmounted", self.inner.name);
        }
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.inner.tx.subscribe()
    }

    /// Resolves once the view is unmounted.
    pub async fn unmounted(&self) {
        let mut rx = self.subscribe();
        // The sender lives in `self`, so `wait_for` only fails if it is dropped.
        let _ = rx.wait_for(|state| state.is_terminal()).await;
    }

    /// Elapsed time since the handle was created.
    pub fn elapsed(&self) -> Duration {
        self.inner.created_at.elapsed()
    }
}

impl fmt::Debug for ViewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewHandle")
            .field("name", &self.inner.name)
            .field("state", &self.state())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_state_display() {
        assert_eq!(ViewState::Pending.to_string(), "pending");
        assert_eq!(ViewState::Mounted.to_string(), "mounted");
        assert_eq!(ViewState::Unmounted.to_string(), "unmounted");
    }

    #[test]
    fn test_view_state_predicates() {
        assert!(ViewState::Mounted.is_mounted());
        assert!(!ViewState::Pending.is_mounted());
        assert!(ViewState::Unmounted.is_terminal());
        assert!(!ViewState::Mounted.is_terminal());
    }

    #[test]
    fn test_view_handle_transitions() {
        let handle = ViewHandle::new("grid");
        assert_eq!(handle.name(), "grid");
        assert_eq!(handle.state(), ViewState::Pending);

        handle.mount();
        assert_eq!(handle.state(), ViewState::Mounted);

        handle.unmount();
        assert_eq!(handle.state(), ViewState::Unmounted);
    }

    #[test]
    fn test_remount_after_unmount_is_ignored() {
        let handle = ViewHandle::mounted("detail");
        handle.unmount();
        handle.mount();
        assert_eq!(handle.state(), ViewState::Unmounted);
    }

    #[test]
    fn test_clone_shares_state() {
        let a = ViewHandle::mounted("shared");
        let b = a.clone();
        b.unmount();
        assert!(!a.is_mounted());
    }

    #[tokio::test]
    async fn test_unmounted_resolves() {
        let handle = ViewHandle::mounted("comments");
        let h = handle.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            h.unmount();
        });

        tokio::time::timeout(Duration::from_secs(1), handle.unmounted())
            .await
            .ok();
        assert_eq!(handle.state(), ViewState::Unmounted);
    }

    #[tokio::test]
    async fn test_unmounted_already_terminal() {
        let handle = ViewHandle::mounted("done");
        handle.unmount();
        handle.unmounted().await;
    }

    #[test]
    fn test_view_handle_debug() {
        let debug = format!("{:?}", ViewHandle::new("debug-test"));
        assert!(debug.contains("debug-test"));
        assert!(debug.contains("ViewHandle"));
    }

    fn _assert_send_sync<T: Send + Sync>() {}
    #[test]
    fn test_view_handle_send_sync() {
        _assert_send_sync::<ViewHandle>();
        _assert_send_sync::<ViewState>();
    }
}
