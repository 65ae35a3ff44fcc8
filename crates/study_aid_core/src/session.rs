//! crates/study_aid_core/src/session.rs
//!
//! The `SessionManager` owns the auth token and the current user for the lifetime of
//! the process. Durable storage is read once, when the manager is built, and written
//! only when the user asked to be remembered.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{Session, SessionState, User};
use crate::ports::KeyValueStore;

pub const CURRENT_USER_KEY: &str = "currentUser";
pub const AUTH_TOKEN_KEY: &str = "authToken";

pub struct SessionManager {
    storage: Arc<dyn KeyValueStore>,
    session: Session,
}

impl SessionManager {
    /// Seeds the in-memory session from durable storage. Unreadable entries are ignored.
    pub fn restore(storage: Arc<dyn KeyValueStore>) -> Self {
        let auth_token = read_key(storage.as_ref(), AUTH_TOKEN_KEY);
        let user = read_key(storage.as_ref(), CURRENT_USER_KEY).and_then(|raw| {
            serde_json::from_str::<User>(&raw)
                .map_err(|e| warn!("Ignoring unreadable stored user: {}", e))
                .ok()
        });
        let persist_to_local_storage = auth_token.is_some() || user.is_some();
        if let Some(user) = &user {
            info!("Restored session for {}", user.email);
        }

        Self {
            storage,
            session: Session {
                user,
                auth_token,
                persist_to_local_storage,
            },
        }
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.user.as_ref()
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.session.auth_token.as_deref()
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// Records a successful login. With `remember` the session is written to durable
    /// storage; without it any durable copy is purged so a restart starts logged out.
    pub fn establish(&mut self, user: User, auth_token: Option<String>, remember: bool) {
        self.session = Session {
            user: Some(user),
            auth_token,
            persist_to_local_storage: remember,
        };

        if !remember {
            self.purge_storage();
            return;
        }
        if let Some(token) = &self.session.auth_token {
            write_key(self.storage.as_ref(), AUTH_TOKEN_KEY, token);
        } else {
            remove_key(self.storage.as_ref(), AUTH_TOKEN_KEY);
        }
        if let Some(user) = &self.session.user {
            match serde_json::to_string(user) {
                Ok(json) => write_key(self.storage.as_ref(), CURRENT_USER_KEY, &json),
                Err(e) => warn!("Failed to serialize user for storage: {}", e),
            }
        }
    }

    /// Forgets the session in memory and always purges durable storage.
    pub fn clear(&mut self) {
        self.session = Session::default();
        self.purge_storage();
    }

    fn purge_storage(&self) {
        remove_key(self.storage.as_ref(), CURRENT_USER_KEY);
        remove_key(self.storage.as_ref(), AUTH_TOKEN_KEY);
    }
}

// Storage failures never break the session: the in-memory state stays authoritative.

fn read_key(storage: &dyn KeyValueStore, key: &str) -> Option<String> {
    storage
        .get(key)
        .map_err(|e| warn!("Failed to read {} from local storage: {}", key, e))
        .ok()
        .flatten()
}

fn write_key(storage: &dyn KeyValueStore, key: &str, value: &str) {
    if let Err(e) = storage.set(key, value) {
        warn!("Failed to write {} to local storage: {}", key, e);
    }
}

fn remove_key(storage: &dyn KeyValueStore, key: &str) {
    if let Err(e) = storage.remove(key) {
        warn!("Failed to remove {} from local storage: {}", key, e);
    }
}
