//! Transient toast notifications
//!
//! At most one toast is visible. Showing a new toast replaces the current one
//! and restarts the dismissal timer.

use log::debug;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
}

/// A short user-facing message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == ToastKind::Error
    }
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ToastKind::Success => write!(f, "[ok] {}", self.message),
            ToastKind::Error => write!(f, "[error] {}", self.message),
        }
    }
}

#[derive(Debug, Default)]
struct ToastSlot {
    toast: Option<Toast>,
    generation: u64,
}

/// Owner of the single toast slot and its dismissal timer
#[derive(Debug)]
pub struct Toaster {
    slot: Arc<RwLock<ToastSlot>>,
    duration: Duration,
    timer: Option<JoinHandle<()>>,
}

impl Toaster {
    pub fn new(duration: Duration) -> Self {
        Self {
            slot: Arc::new(RwLock::new(ToastSlot::default())),
            duration,
            timer: None,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Show a toast, replacing the visible one
    ///
    /// Must be called from within a tokio runtime; the dismissal timer is a
    /// spawned task.
    pub async fn show(&mut self, toast: Toast) {
        self.cancel_timer();
        debug!("toast: {}", toast);

        let generation = {
            let mut slot = self.slot.write().await;
            slot.generation += 1;
            slot.toast = Some(toast);
            slot.generation
        };

        let slot = Arc::clone(&self.slot);
        let duration = self.duration;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let mut slot = slot.write().await;
            // a newer toast owns the slot
            if slot.generation == generation {
                slot.toast = None;
            }
        }));
    }

    pub async fn success(&mut self, message: impl Into<String>) {
        self.show(Toast::success(message)).await;
    }

    pub async fn error(&mut self, message: impl Into<String>) {
        self.show(Toast::error(message)).await;
    }

    /// The visible toast, if any
    pub async fn current(&self) -> Option<Toast> {
        self.slot.read().await.toast.clone()
    }

    /// Hide the visible toast now
    pub async fn dismiss(&mut self) {
        self.cancel_timer();
        let mut slot = self.slot.write().await;
        slot.generation += 1;
        slot.toast = None;
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for Toaster {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
