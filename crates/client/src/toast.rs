//! User-facing notices emitted by cart operations.
//!
//! Operations push a [`Toast`] and move on; whatever renders them (a terminal,
//! a UI shell) drains the receiving end.

use tokio::sync::mpsc;

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastLevel {
    Success,
    Error,
}

/// A short notice for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

/// Sending side of the toast channel.
#[derive(Debug, Clone, Default)]
pub struct Toasts {
    tx: Option<mpsc::UnboundedSender<Toast>>,
}

impl Toasts {
    /// Create a connected sender and receiver.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Toast>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A sink that drops every toast.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { tx: None }
    }

    /// Emit a success toast.
    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastLevel::Success, message.into());
    }

    /// Emit an error toast.
    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastLevel::Error, message.into());
    }

    fn push(&self, level: ToastLevel, message: String) {
        let Some(tx) = &self.tx else {
            return;
        };
        if tx.send(Toast { level, message }).is_err() {
            tracing::debug!("Toast receiver dropped; notice discarded");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_toasts_arrive_in_order() {
        let (toasts, mut rx) = Toasts::channel();
        toasts.success("Đã thêm vào giỏ hàng");
        toasts.error("Hết hàng");

        assert_eq!(rx.try_recv().unwrap().level, ToastLevel::Success);
        let second = rx.try_recv().unwrap();
        assert_eq!(second.level, ToastLevel::Error);
        assert_eq!(second.message, "Hết hàng");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_disabled_and_dropped_receivers_are_silent() {
        Toasts::disabled().error("ignored");

        let (toasts, rx) = Toasts::channel();
        drop(rx);
        toasts.success("ignored");
    }
}
