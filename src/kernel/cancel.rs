use std::fmt;

use uuid::Uuid;

/// Identifies one tracker activation in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

type Release = Box<dyn FnOnce() + Send>;

/// The `deactivate` side of an activation.
///
/// Owns the release closure built by `activate`: it stops the tracker task
/// and finalizes the session it owns. Releasing is idempotent, and dropping
/// the handle releases it.
pub struct TrackerHandle {
    session_id: Option<SessionId>,
    release: Option<Release>,
}

impl TrackerHandle {
    pub(crate) fn new(session_id: SessionId, release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            session_id: Some(session_id),
            release: Some(Box::new(release)),
        }
    }

    /// A handle with no activation behind it. Deactivating it does nothing.
    pub fn inert() -> Self {
        Self {
            session_id: None,
            release: None,
        }
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session_id
    }

    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    /// Stops observation. Safe to call any number of times.
    pub fn deactivate(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Default for TrackerHandle {
    fn default() -> Self {
        Self::inert()
    }
}

impl Drop for TrackerHandle {
    fn drop(&mut self) {
        self.deactivate();
    }
}

impl fmt::Debug for TrackerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackerHandle")
            .field("session_id", &self.session_id)
            .field("active", &self.is_active())
            .finish()
    }
}
