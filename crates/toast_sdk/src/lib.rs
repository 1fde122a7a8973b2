use std::sync::OnceLock;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Warning,
    Error,
}

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(3000);

/// A notification waiting to be shown, as produced by background work.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToastRequest {
    pub kind: ToastKind,
    pub message: String,
    pub duration: Duration,
}

impl ToastRequest {
    pub fn new(kind: ToastKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            duration: DEFAULT_TOAST_DURATION,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Toast {
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= self.duration
    }
}

/// Toasts currently on screen. Owned by the host's event loop.
#[derive(Default)]
pub struct ToastManager {
    next_id: u64,
    active: Vec<Toast>,
}

impl ToastManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> &[Toast] {
        &self.active
    }

    pub fn push(&mut self, request: ToastRequest) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.active.push(Toast {
            id,
            kind: request.kind,
            message: request.message,
            created_at: Instant::now(),
            duration: request.duration,
        });
        id
    }

    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Drops every toast whose duration elapsed before `now`.
    pub fn tick_at(&mut self, now: Instant) {
        self.active.retain(|toast| !toast.is_expired_at(now));
    }

    /// Moves everything queued through [`enqueue_toast`] on screen.
    pub fn ingest_pending(&mut self) -> usize {
        let pending = drain_pending();
        let count = pending.len();
        for request in pending {
            self.push(request);
        }
        count
    }
}

static TOAST_QUEUE: OnceLock<Mutex<Vec<ToastRequest>>> = OnceLock::new();

fn queue() -> &'static Mutex<Vec<ToastRequest>> {
    TOAST_QUEUE.get_or_init(|| Mutex::new(Vec::new()))
}

pub fn enqueue_toast(kind: ToastKind, message: impl Into<String>) {
    queue().lock().push(ToastRequest::new(kind, message));
}

pub fn drain_pending() -> Vec<ToastRequest> {
    std::mem::take(&mut *queue().lock())
}

pub fn info(message: impl Into<String>) {
    enqueue_toast(ToastKind::Info, message);
}

pub fn success(message: impl Into<String>) {
    enqueue_toast(ToastKind::Success, message);
}

pub fn warning(message: impl Into<String>) {
    enqueue_toast(ToastKind::Warning, message);
}

pub fn error(message: impl Into<String>) {
    enqueue_toast(ToastKind::Error, message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expired_toasts_are_dropped_on_tick() {
        let mut manager = ToastManager::new();
        let short = manager.push(ToastRequest {
            duration: Duration::from_millis(10),
            ..ToastRequest::new(ToastKind::Info, "short")
        });
        manager.push(ToastRequest::new(ToastKind::Success, "long"));

        let later = manager.active()[0].created_at + Duration::from_millis(20);
        manager.tick_at(later);

        assert_eq!(manager.active().len(), 1);
        assert_eq!(manager.active()[0].message, "long");
        assert!(manager.active().iter().all(|toast| toast.id != short));
    }

    #[test]
    fn pushed_toasts_get_distinct_ids() {
        let mut manager = ToastManager::new();
        let first = manager.push(ToastRequest::new(ToastKind::Info, "one"));
        let second = manager.push(ToastRequest::new(ToastKind::Error, "two"));
        assert_ne!(first, second);
        assert_eq!(manager.active().len(), 2);
    }

    #[test]
    fn queued_toasts_are_ingested_once() {
        warning("queued from a worker");
        let mut manager = ToastManager::new();
        assert!(manager.ingest_pending() >= 1);

        let toast = manager
            .active()
            .iter()
            .find(|toast| toast.message == "queued from a worker")
            .cloned()
            .unwrap();
        assert_eq!(toast.kind, ToastKind::Warning);
        assert_eq!(toast.duration, DEFAULT_TOAST_DURATION);

        manager.ingest_pending();
        let copies = manager
            .active()
            .iter()
            .filter(|toast| toast.message == "queued from a worker")
            .count();
        assert_eq!(copies, 1);
    }
}
