//! Per-browser navigation sessions.
//!
//! A session holds the sidebar state and the most recently *settled* file
//! view. File views are issued a [`Ticket`] before their fetches start; when
//! they finish, the result only lands in the session if no newer view was
//! issued meanwhile. Older results are dropped, the HTTP response is still
//! sent.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::Serialize;

use crate::core::FileTarget;
use crate::debug;
use crate::metadata::Metadata;
use crate::nav::NavState;

/// Cookie carrying the session id.
pub const SESSION_COOKIE: &str = "syllabus_session";

/// Most sessions kept at once.
pub const MAX_SESSIONS: usize = 10_000;

/// Sessions unseen for this long are the first to be evicted.
pub const SESSION_IDLE: Duration = Duration::from_secs(12 * 60 * 60);

/// Claim on the session's current view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    target: FileTarget,
}

impl Ticket {
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[cfg(test)]
    pub const fn target(&self) -> &FileTarget {
        &self.target
    }
}

/// Outcome of a content fetch, as recorded in the session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ContentState {
    Ready,
    Failed { message: String },
    /// Viewer embeds the address without fetching.
    Embedded,
    Unsupported { tag: String },
}

/// A file view whose fetches have settled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettledView {
    pub generation: u64,
    pub course: String,
    pub week: usize,
    pub file: usize,
    pub name: String,
    pub viewer: &'static str,
    pub content: ContentState,
    pub metadata: Option<Metadata>,
}

/// One browser's navigation state.
#[derive(Debug, Default)]
pub struct NavSession {
    pub nav: NavState,
    generation: u64,
    settled: Option<SettledView>,
}

impl NavSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new file view. Invalidates every earlier ticket.
    pub fn begin(&mut self, target: FileTarget) -> Ticket {
        self.generation += 1;
        Ticket {
            generation: self.generation,
            target,
        }
    }

    /// Whether `ticket` still names the latest view.
    #[inline]
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        ticket.generation == self.generation
    }

    /// Record a settled view if its ticket is still current.
    ///
    /// Returns `false` (and drops the view) for stale tickets.
    pub fn settle(&mut self, ticket: &Ticket, view: SettledView) -> bool {
        if !self.is_current(ticket) {
            debug!(
                "session";
                "discarding stale view of {}/{}/{} (generation {} < {})",
                ticket.target.course,
                ticket.target.week,
                ticket.target.file,
                ticket.generation,
                self.generation
            );
            return false;
        }
        self.settled = Some(view);
        true
    }

    #[cfg(test)]
    pub fn settled(&self) -> Option<&SettledView> {
        self.settled.as_ref()
    }

    #[cfg(test)]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Copy of the session for the JSON API.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            generation: self.generation,
            nav: self.nav.clone(),
            settled: self.settled.clone(),
        }
    }
}

/// Serializable view of a [`NavSession`].
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub generation: u64,
    pub nav: NavState,
    pub settled: Option<SettledView>,
}

/// Shared handle to one session.
pub type SessionHandle = Arc<Mutex<NavSession>>;

/// A stored session and when it was last used.
struct Entry {
    handle: SessionHandle,
    /// Milliseconds since the store's epoch.
    last_seen: AtomicU64,
}

/// All live sessions, keyed by cookie id.
///
/// Sessions are memory-only. The store holds at most `capacity` of them:
/// when full, idle sessions are dropped first, then the least recently
/// used one.
pub struct SessionStore {
    sessions: DashMap<String, Entry>,
    next_id: AtomicU64,
    epoch: Instant,
    capacity: usize,
    idle: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(MAX_SESSIONS, SESSION_IDLE)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(capacity: usize, idle: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            next_id: AtomicU64::new(0),
            epoch: Instant::now(),
            capacity: capacity.max(1),
            idle,
        }
    }

    /// A session that is never stored, for requests that only read state.
    pub fn transient() -> SessionHandle {
        Arc::new(Mutex::new(NavSession::new()))
    }

    /// Look up the session for `cookie_id`, creating one when absent.
    ///
    /// Returns the id actually in use and whether it is new (the caller then
    /// sets the cookie).
    pub fn obtain(&self, cookie_id: Option<&str>) -> (String, SessionHandle, bool) {
        if let Some(id) = cookie_id
            && let Some(handle) = self.lookup(id)
        {
            return (id.to_string(), handle, false);
        }

        self.make_room();
        let id = self.fresh_id();
        let handle = Self::transient();
        self.sessions.insert(
            id.clone(),
            Entry {
                handle: Arc::clone(&handle),
                last_seen: AtomicU64::new(self.now()),
            },
        );
        (id, handle, true)
    }

    /// Look up without creating. Counts as a use of the session.
    pub fn lookup(&self, id: &str) -> Option<SessionHandle> {
        self.sessions.get(id).map(|entry| {
            entry.last_seen.store(self.now(), Ordering::Relaxed);
            Arc::clone(&entry.handle)
        })
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Free a slot when the store is full.
    fn make_room(&self) {
        if self.sessions.len() < self.capacity {
            return;
        }

        let (now, idle) = (self.now(), self.idle_millis());
        let before = self.sessions.len();
        self.sessions
            .retain(|_, entry| now.saturating_sub(entry.last_seen.load(Ordering::Relaxed)) <= idle);

        if self.sessions.len() >= self.capacity {
            let oldest = self
                .sessions
                .iter()
                .min_by_key(|entry| entry.last_seen.load(Ordering::Relaxed))
                .map(|entry| entry.key().clone());
            if let Some(id) = oldest {
                self.sessions.remove(&id);
            }
        }
        debug!(
            "session";
            "evicted {} of {} sessions",
            before - self.sessions.len(),
            before
        );
    }

    fn now(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn idle_millis(&self) -> u64 {
        u64::try_from(self.idle.as_millis()).unwrap_or(u64::MAX)
    }

    fn fresh_id(&self) -> String {
        use std::time::{SystemTime, UNIX_EPOCH};

        let seq = self.next_id.fetch_add(1, Ordering::Relaxed);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        format!("{:x}-{:x}-{:x}", std::process::id(), nanos, seq)
    }
}

/// Extract the session id from a `Cookie` header value.
pub fn session_id_from_cookie(header: &str) -> Option<&str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(file: &str) -> FileTarget {
        FileTarget {
            course: "intro".into(),
            week: "0".into(),
            file: file.into(),
        }
    }

    fn view(ticket: &Ticket, name: &str) -> SettledView {
        SettledView {
            generation: ticket.generation(),
            course: ticket.target().course.clone(),
            week: 0,
            file: 0,
            name: name.into(),
            viewer: "markdown",
            content: ContentState::Ready,
            metadata: None,
        }
    }

    #[test]
    fn test_current_ticket_settles() {
        let mut session = NavSession::new();
        let ticket = session.begin(target("0"));

        assert!(session.settle(&ticket, view(&ticket, "A")));
        assert_eq!(session.settled().unwrap().name, "A");
    }

    #[test]
    fn test_stale_ticket_discarded() {
        let mut session = NavSession::new();
        let first = session.begin(target("0"));
        let second = session.begin(target("1"));

        // The newer view settles first, then the older one arrives late
        assert!(session.settle(&second, view(&second, "B")));
        assert!(!session.settle(&first, view(&first, "A")));

        assert_eq!(session.settled().unwrap().name, "B");
        assert!(!session.is_current(&first));
        assert!(session.is_current(&second));
    }

    #[test]
    fn test_same_target_reissued_is_new_generation() {
        let mut session = NavSession::new();
        let a = session.begin(target("0"));
        let b = session.begin(target("0"));
        assert_ne!(a, b);
        assert!(!session.is_current(&a));
        assert_eq!(session.generation(), 2);
    }

    #[test]
    fn test_store_obtain_and_reuse() {
        let store = SessionStore::new();
        let (id, first, created) = store.obtain(None);
        assert!(created);

        first.lock().nav.toggle("Week 1");

        let (same_id, again, created) = store.obtain(Some(&id));
        assert!(!created);
        assert_eq!(same_id, id);
        assert!(again.lock().nav.is_expanded("Week 1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_unknown_cookie_gets_fresh_session() {
        let store = SessionStore::new();
        let (id, _, created) = store.obtain(Some("forged"));
        assert!(created);
        assert_ne!(id, "forged");
        assert!(store.lookup("forged").is_none());
        assert!(store.lookup(&id).is_some());
    }

    #[test]
    fn test_store_capacity_evicts_least_recent() {
        let store = SessionStore::with_limits(3, SESSION_IDLE);
        let (first, _, _) = store.obtain(None);
        std::thread::sleep(Duration::from_millis(5));
        let (second, _, _) = store.obtain(None);
        std::thread::sleep(Duration::from_millis(5));
        let (third, _, _) = store.obtain(None);
        std::thread::sleep(Duration::from_millis(5));

        // Touching the first session makes the second the oldest
        assert!(store.lookup(&first).is_some());
        let (fourth, _, _) = store.obtain(None);

        assert_eq!(store.len(), 3);
        assert!(store.lookup(&second).is_none());
        for id in [&first, &third, &fourth] {
            assert!(store.lookup(id).is_some());
        }
    }

    #[test]
    fn test_store_stays_bounded() {
        let store = SessionStore::with_limits(16, SESSION_IDLE);
        for _ in 0..200 {
            store.obtain(None);
        }
        assert_eq!(store.len(), 16);
    }

    #[test]
    fn test_store_drops_idle_sessions_first() {
        let store = SessionStore::with_limits(2, Duration::ZERO);
        store.obtain(None);
        store.obtain(None);
        std::thread::sleep(Duration::from_millis(5));

        let (fresh, _, _) = store.obtain(None);
        assert_eq!(store.len(), 1);
        assert!(store.lookup(&fresh).is_some());
    }

    #[test]
    fn test_transient_session_is_not_stored() {
        let store = SessionStore::new();
        let session = SessionStore::transient();
        session.lock().nav.toggle("Week 1");
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_session_ids_unique() {
        let store = SessionStore::new();
        let (a, _, _) = store.obtain(None);
        let (b, _, _) = store.obtain(None);
        assert_ne!(a, b);
    }

    #[test]
    fn test_cookie_parsing() {
        assert_eq!(
            session_id_from_cookie("theme=dark; syllabus_session=abc-1; x=y"),
            Some("abc-1")
        );
        assert_eq!(session_id_from_cookie("syllabus_session="), None);
        assert_eq!(session_id_from_cookie("other=1"), None);
    }

    #[test]
    fn test_settled_view_json() {
        let mut session = NavSession::new();
        let ticket = session.begin(target("0"));
        let mut v = view(&ticket, "A");
        v.content = ContentState::Failed {
            message: "missing".into(),
        };
        session.settle(&ticket, v);

        let json = serde_json::to_value(session.settled().unwrap()).unwrap();
        assert_eq!(json["content"]["state"], "failed");
        assert_eq!(json["content"]["message"], "missing");
        assert_eq!(json["generation"], 1);
    }

    #[test]
    fn test_snapshot_json() {
        let mut session = NavSession::new();
        session.nav.toggle("Week 1");
        let ticket = session.begin(target("0"));
        session.begin(target("1"));
        session.settle(&ticket, view(&ticket, "A"));

        let json = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(json["generation"], 2);
        assert_eq!(json["nav"]["expanded"]["Week 1"], true);
        assert!(json["settled"].is_null());
    }
}
