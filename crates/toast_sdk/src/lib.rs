use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Warning,
    Error,
    Loading,
}

impl ToastKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "ok",
            Self::Warning => "warn",
            Self::Error => "error",
            Self::Loading => "...",
        }
    }
}

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(3000);
/// Loading toasts stay until they are updated or dismissed.
const LOADING_TOAST_DURATION: Duration = Duration::from_secs(60 * 60);

#[derive(Clone, Debug)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    pub created_at: Instant,
    pub duration: Option<Duration>,
}

impl Toast {
    fn expired_at(&self, now: Instant, default_duration: Duration) -> bool {
        let duration = self.duration.unwrap_or(default_duration);
        now.saturating_duration_since(self.created_at) >= duration
    }
}

#[derive(Clone, Debug)]
pub struct ToastRequest {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    pub duration: Option<Duration>,
}

#[derive(Clone, Debug)]
pub struct ToastUpdate {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

#[derive(Clone, Debug)]
enum Pending {
    Show(ToastRequest),
    Update(ToastUpdate),
    Dismiss(u64),
}

/// Owns the visible toasts. The UI drains the global queue into it once per
/// frame and expires old entries.
pub struct ToastManager {
    default_duration: Duration,
    active: Vec<Toast>,
}

impl Default for ToastManager {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_DURATION)
    }
}

impl ToastManager {
    pub fn new(default_duration: Duration) -> Self {
        Self {
            default_duration,
            active: Vec::new(),
        }
    }

    pub fn active(&self) -> &[Toast] {
        &self.active
    }

    /// Most recent toast, the one a status line shows.
    pub fn latest(&self) -> Option<&Toast> {
        self.active.last()
    }

    pub fn push(&mut self, request: ToastRequest) {
        self.push_at(request, Instant::now());
    }

    fn push_at(&mut self, request: ToastRequest, now: Instant) {
        self.active.retain(|toast| toast.id != request.id);
        self.active.push(Toast {
            id: request.id,
            kind: request.kind,
            message: request.message,
            created_at: now,
            duration: request.duration,
        });
    }

    pub fn dismiss(&mut self, id: u64) {
        self.active.retain(|toast| toast.id != id);
    }

    pub fn apply_update(&mut self, update: ToastUpdate) {
        self.apply_update_at(update, Instant::now());
    }

    fn apply_update_at(&mut self, update: ToastUpdate, now: Instant) {
        if let Some(toast) = self.active.iter_mut().find(|t| t.id == update.id) {
            toast.kind = update.kind;
            toast.message = update.message;
            // A finished loading toast starts a fresh default lifetime
            if update.kind != ToastKind::Loading {
                toast.duration = None;
                toast.created_at = now;
            }
        }
    }

    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub fn tick_at(&mut self, now: Instant) {
        let default_duration = self.default_duration;
        self.active
            .retain(|toast| !toast.expired_at(now, default_duration));
    }

    pub fn ingest_pending(&mut self) {
        for pending in drain_pending() {
            match pending {
                Pending::Show(request) => self.push(request),
                Pending::Update(update) => self.apply_update(update),
                Pending::Dismiss(id) => self.dismiss(id),
            }
        }
    }

    pub fn is_busy(&self) -> bool {
        self.active
            .iter()
            .any(|toast| toast.kind == ToastKind::Loading)
    }
}

static PENDING: OnceLock<Mutex<Vec<Pending>>> = OnceLock::new();
static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn pending() -> &'static Mutex<Vec<Pending>> {
    PENDING.get_or_init(|| Mutex::new(Vec::new()))
}

fn enqueue(item: Pending) {
    let mut queue = pending().lock().expect("toast queue lock poisoned");
    queue.push(item);
}

fn drain_pending() -> Vec<Pending> {
    let mut queue = pending().lock().expect("toast queue lock poisoned");
    std::mem::take(&mut *queue)
}

/// Enqueue a toast and return its id for later updates.
pub fn enqueue_toast(kind: ToastKind, message: impl Into<String>, duration: Option<Duration>) -> u64 {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    enqueue(Pending::Show(ToastRequest {
        id,
        kind,
        message: message.into(),
        duration,
    }));
    id
}

pub fn info(message: impl Into<String>) {
    enqueue_toast(ToastKind::Info, message, None);
}

pub fn success(message: impl Into<String>) {
    enqueue_toast(ToastKind::Success, message, None);
}

pub fn warning(message: impl Into<String>) {
    enqueue_toast(ToastKind::Warning, message, None);
}

pub fn error(message: impl Into<String>) {
    enqueue_toast(ToastKind::Error, message, None);
}

/// Show an error toast that stays longer (8 seconds)
pub fn error_long(message: impl Into<String>) {
    enqueue_toast(ToastKind::Error, message, Some(Duration::from_millis(8000)));
}

pub fn loading(message: impl Into<String>) -> u64 {
    enqueue_toast(ToastKind::Loading, message, Some(LOADING_TOAST_DURATION))
}

pub fn update_toast(id: u64, kind: ToastKind, message: impl Into<String>) {
    enqueue(Pending::Update(ToastUpdate {
        id,
        kind,
        message: message.into(),
    }));
}

pub fn dismiss_toast(id: u64) {
    enqueue(Pending::Dismiss(id));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(id: u64, kind: ToastKind, duration: Option<Duration>) -> ToastRequest {
        ToastRequest {
            id,
            kind,
            message: format!("toast {id}"),
            duration,
        }
    }

    #[test]
    fn toasts_expire_after_their_duration() {
        let start = Instant::now();
        let mut manager = ToastManager::new(Duration::from_millis(100));
        manager.push_at(request(1, ToastKind::Info, None), start);
        manager.push_at(
            request(2, ToastKind::Error, Some(Duration::from_millis(500))),
            start,
        );

        manager.tick_at(start + Duration::from_millis(99));
        assert_eq!(manager.active().len(), 2);

        manager.tick_at(start + Duration::from_millis(100));
        assert_eq!(manager.active().len(), 1);
        assert_eq!(manager.latest().map(|t| t.id), Some(2));

        manager.tick_at(start + Duration::from_millis(500));
        assert!(manager.latest().is_none());
    }

    #[test]
    fn finished_loading_toast_gets_default_lifetime() {
        let start = Instant::now();
        let mut manager = ToastManager::new(Duration::from_millis(100));
        manager.push_at(
            request(7, ToastKind::Loading, Some(LOADING_TOAST_DURATION)),
            start,
        );
        assert!(manager.is_busy());

        let later = start + Duration::from_secs(10);
        manager.apply_update_at(
            ToastUpdate {
                id: 7,
                kind: ToastKind::Success,
                message: "done".to_string(),
            },
            later,
        );
        assert!(!manager.is_busy());
        assert_eq!(manager.latest().map(|t| t.message.as_str()), Some("done"));

        manager.tick_at(later + Duration::from_millis(50));
        assert_eq!(manager.active().len(), 1);
        manager.tick_at(later + Duration::from_millis(100));
        assert!(manager.active().is_empty());
    }

    #[test]
    fn pushing_an_existing_id_replaces_it() {
        let mut manager = ToastManager::default();
        manager.push(request(3, ToastKind::Info, None));
        manager.push(request(4, ToastKind::Info, None));
        manager.push(request(3, ToastKind::Warning, None));

        let ids = manager.active().iter().map(|t| t.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![4, 3]);
        assert_eq!(manager.latest().map(|t| t.kind), Some(ToastKind::Warning));

        manager.dismiss(3);
        assert_eq!(manager.latest().map(|t| t.id), Some(4));
    }

    #[test]
    fn queued_operations_apply_in_order() {
        let mut manager = ToastManager::default();
        let id = loading("Creating property");
        update_toast(id, ToastKind::Error, "Failed");
        manager.ingest_pending();

        let toast = manager
            .active()
            .iter()
            .find(|toast| toast.id == id)
            .expect("queued toast");
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.message, "Failed");

        dismiss_toast(id);
        manager.ingest_pending();
        assert!(manager.active().iter().all(|toast| toast.id != id));
    }
}
