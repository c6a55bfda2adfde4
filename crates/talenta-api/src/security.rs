//! Dashboard access gating.
//!
//! Authentication here is a fixed allow-list of access codes and a
//! timestamped logged-in flag with a 24 hour window. This is access gating, not a
//! security boundary. The flag lives in a small key-value store under the
//! same two keys the dashboard has always used, behind a trait so tests
//! and alternative frontends can supply their own storage.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::debug;

use talenta_models::SharedClock;

use crate::error::{ApiError, ApiResult};

/// Storage key for the logged-in flag.
pub const SESSION_KEY: &str = "dashboard_auth";

/// Storage key for the login timestamp (epoch milliseconds).
pub const SESSION_TIME_KEY: &str = "dashboard_auth_time";

/// Session lifetime.
const SESSION_TTL_MS: i64 = 24 * 60 * 60 * 1000;

/// Codes accepted by the dashboard, compared case-insensitively.
const VALID_ACCESS_CODES: [&str; 3] = ["HRD2025", "ADMIN123", "DASHBOARD2025"];

/// Browser-equivalent key-value storage for the session flag.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn remove(&self, key: &str);
}

/// In-memory store, the default for a single-process deployment.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().expect("store poisoned").get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.entries
            .lock()
            .expect("store poisoned")
            .insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.entries.lock().expect("store poisoned").remove(key);
    }
}

/// Two-state session guard: logged out / logged in with expiry.
pub struct SessionGuard {
    store: Arc<dyn SessionStore>,
    clock: SharedClock,
}

impl SessionGuard {
    pub fn new(store: Arc<dyn SessionStore>, clock: SharedClock) -> Self {
        Self { store, clock }
    }

    /// Validate an access code and open a session.
    ///
    /// Both failure modes are local: an empty code is a validation error
    /// and a wrong code an invalid credential. No network is involved.
    pub fn authenticate(&self, code: &str) -> ApiResult<()> {
        if code.is_empty() {
            return Err(ApiError::validation("Kode akses harus diisi"));
        }

        let candidate = code.to_uppercase();
        if !VALID_ACCESS_CODES.contains(&candidate.as_str()) {
            return Err(ApiError::unauthorized("Kode akses tidak valid"));
        }

        self.store.set(SESSION_KEY, "true".to_string());
        self.store.set(
            SESSION_TIME_KEY,
            self.clock.now().timestamp_millis().to_string(),
        );
        debug!("Dashboard session opened");
        Ok(())
    }

    /// Whether a live session exists.
    ///
    /// An expired session is cleared on sight; there is no separate timer.
    pub fn check_session(&self) -> bool {
        let flag = self.store.get(SESSION_KEY);
        let login_ms = self
            .store
            .get(SESSION_TIME_KEY)
            .and_then(|t| t.parse::<i64>().ok());

        match (flag.as_deref(), login_ms) {
            (Some("true"), Some(login_ms)) => {
                let elapsed_ms = self.clock.now().timestamp_millis() - login_ms;
                if elapsed_ms < SESSION_TTL_MS {
                    true
                } else {
                    debug!("Dashboard session expired");
                    self.logout();
                    false
                }
            }
            _ => false,
        }
    }

    /// Close the session unconditionally.
    pub fn logout(&self) {
        self.store.remove(SESSION_KEY);
        self.store.remove(SESSION_TIME_KEY);
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use talenta_models::ManualClock;

    use super::*;

    fn guard_with_clock() -> (SessionGuard, Arc<MemoryStore>, Arc<ManualClock>) {
        let store = Arc::new(MemoryStore::default());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let guard = SessionGuard::new(
            Arc::clone(&store) as Arc<dyn SessionStore>,
            Arc::clone(&clock) as SharedClock,
        );
        (guard, store, clock)
    }

    #[test]
    fn accepts_codes_case_insensitively() {
        let (guard, _, _) = guard_with_clock();
        guard.authenticate("hrd2025").unwrap();
        assert!(guard.check_session());
    }

    #[test]
    fn rejects_empty_code_as_validation_error() {
        let (guard, _, _) = guard_with_clock();
        let err = guard.authenticate("").unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(!guard.check_session());
    }

    #[test]
    fn rejects_unknown_code() {
        let (guard, store, _) = guard_with_clock();
        let err = guard.authenticate("LETMEIN").unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
        assert!(store.get(SESSION_KEY).is_none());
    }

    #[test]
    fn session_survives_just_under_24_hours() {
        let (guard, _, clock) = guard_with_clock();
        guard.authenticate("ADMIN123").unwrap();

        clock.advance(Duration::hours(24) - Duration::milliseconds(1));
        assert!(guard.check_session());
    }

    #[test]
    fn session_expires_at_24_hours_and_clears_storage() {
        let (guard, store, clock) = guard_with_clock();
        guard.authenticate("DASHBOARD2025").unwrap();

        clock.advance(Duration::hours(24) + Duration::milliseconds(1));
        assert!(!guard.check_session());

        // Self-healing expiry wiped the persisted flag
        assert!(store.get(SESSION_KEY).is_none());
        assert!(store.get(SESSION_TIME_KEY).is_none());
    }

    #[test]
    fn logout_clears_both_keys() {
        let (guard, store, _) = guard_with_clock();
        guard.authenticate("HRD2025").unwrap();
        assert!(store.get(SESSION_KEY).is_some());

        guard.logout();
        assert!(store.get(SESSION_KEY).is_none());
        assert!(store.get(SESSION_TIME_KEY).is_none());
        assert!(!guard.check_session());
    }

    #[test]
    fn tampered_timestamp_reads_as_logged_out() {
        let (guard, store, _) = guard_with_clock();
        guard.authenticate("HRD2025").unwrap();
        store.set(SESSION_TIME_KEY, "not-a-number".to_string());
        assert!(!guard.check_session());
    }
}
