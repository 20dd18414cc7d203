//! Session Context
//!
//! Explicit owner of the auth session: hydrated from storage at startup,
//! updated on login/refresh, cleared on logout or when a refresh fails.
//! The API client receives it by injection.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const TOKEN_TYPE_KEY: &str = "token_type";
pub const EXPIRES_IN_KEY: &str = "expires_in";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const USER_KEY: &str = "user";
/// Remembered login email; survives logout
pub const EMAIL_KEY: &str = "email";

/// Key-value persistence for the session (browser `localStorage` in the app)
pub trait SessionStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

#[derive(Default)]
pub struct MemoryStorage {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values.borrow_mut().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values.borrow_mut().remove(key);
    }
}

/// Tokens returned by the login and refresh endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<Value>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: Option<u64>,
    pub refresh_token: Option<String>,
    /// Raw user record; decoded by the app
    pub user: Option<Value>,
}

type ExpiredHook = Rc<dyn Fn()>;

struct Inner {
    storage: Rc<dyn SessionStorage>,
    session: RefCell<Option<Session>>,
    on_expired: RefCell<Option<ExpiredHook>>,
}

/// Cheap to clone; all clones share one session.
#[derive(Clone)]
pub struct SessionContext {
    inner: Rc<Inner>,
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl SessionContext {
    /// Hydrate from storage.
    pub fn new(storage: Rc<dyn SessionStorage>) -> Self {
        let session = hydrate(storage.as_ref());
        if session.is_some() {
            tracing::debug!("session restored from storage");
        }
        Self {
            inner: Rc::new(Inner {
                storage,
                session: RefCell::new(session),
                on_expired: RefCell::new(None),
            }),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Rc::new(MemoryStorage::new()))
    }

    pub fn current(&self) -> Option<Session> {
        self.inner.session.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.session.borrow().is_some()
    }

    pub fn access_token(&self) -> Option<String> {
        self.inner
            .session
            .borrow()
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.inner
            .session
            .borrow()
            .as_ref()
            .and_then(|s| s.refresh_token.clone())
    }

    pub fn user(&self) -> Option<Value> {
        self.inner.session.borrow().as_ref().and_then(|s| s.user.clone())
    }

    /// Store a fresh grant. A grant without a user or refresh token keeps
    /// the previous values (refresh responses often omit both).
    pub fn establish(&self, grant: TokenGrant) {
        let previous = self.current();
        let session = Session {
            access_token: grant.access_token,
            token_type: grant.token_type,
            expires_in: grant.expires_in,
            refresh_token: grant
                .refresh_token
                .or_else(|| previous.as_ref().and_then(|p| p.refresh_token.clone())),
            user: grant.user.or_else(|| previous.and_then(|p| p.user)),
        };
        persist(self.inner.storage.as_ref(), &session);
        *self.inner.session.borrow_mut() = Some(session);
    }

    pub fn set_user(&self, user: Value) {
        let mut guard = self.inner.session.borrow_mut();
        if let Some(session) = guard.as_mut() {
            self.inner.storage.set(USER_KEY, &user.to_string());
            session.user = Some(user);
        }
    }

    /// Drop the session and its stored keys. The remembered email stays.
    pub fn clear(&self) {
        let storage = self.inner.storage.as_ref();
        for key in [ACCESS_TOKEN_KEY, TOKEN_TYPE_KEY, EXPIRES_IN_KEY, REFRESH_TOKEN_KEY, USER_KEY] {
            storage.remove(key);
        }
        *self.inner.session.borrow_mut() = None;
    }

    pub fn remembered_email(&self) -> Option<String> {
        self.inner.storage.get(EMAIL_KEY)
    }

    pub fn remember_email(&self, email: Option<&str>) {
        match email {
            Some(email) if !email.is_empty() => self.inner.storage.set(EMAIL_KEY, email),
            _ => self.inner.storage.remove(EMAIL_KEY),
        }
    }

    /// Called once after a session is forcibly ended (failed refresh).
    pub fn on_expired(&self, hook: impl Fn() + 'static) {
        *self.inner.on_expired.borrow_mut() = Some(Rc::new(hook));
    }

    pub fn expire(&self) {
        tracing::warn!("session expired, clearing credentials");
        self.clear();
        let hook = self.inner.on_expired.borrow().clone();
        if let Some(hook) = hook {
            hook();
        }
    }
}

fn hydrate(storage: &dyn SessionStorage) -> Option<Session> {
    let access_token = storage.get(ACCESS_TOKEN_KEY).filter(|t| !t.is_empty())?;
    let user = storage.get(USER_KEY).and_then(|raw| match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("ignoring unreadable stored user: {}", e);
            None
        }
    });
    Some(Session {
        access_token,
        token_type: storage.get(TOKEN_TYPE_KEY).unwrap_or_else(default_token_type),
        expires_in: storage.get(EXPIRES_IN_KEY).and_then(|v| v.parse().ok()),
        refresh_token: storage.get(REFRESH_TOKEN_KEY).filter(|t| !t.is_empty()),
        user,
    })
}

fn persist(storage: &dyn SessionStorage, session: &Session) {
    storage.set(ACCESS_TOKEN_KEY, &session.access_token);
    storage.set(TOKEN_TYPE_KEY, &session.token_type);
    match session.expires_in {
        Some(secs) => storage.set(EXPIRES_IN_KEY, &secs.to_string()),
        None => storage.remove(EXPIRES_IN_KEY),
    }
    match &session.refresh_token {
        Some(token) => storage.set(REFRESH_TOKEN_KEY, token),
        None => storage.remove(REFRESH_TOKEN_KEY),
    }
    match &session.user {
        Some(user) => storage.set(USER_KEY, &user.to_string()),
        None => storage.remove(USER_KEY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn grant(token: &str, refresh: Option<&str>) -> TokenGrant {
        TokenGrant {
            access_token: token.to_string(),
            token_type: "Bearer".to_string(),
            expires_in: Some(3600),
            refresh_token: refresh.map(str::to_string),
            user: Some(serde_json::json!({"id": 7, "name": "Dana"})),
        }
    }

    #[test]
    fn test_establish_persists_and_hydrates() {
        let storage = Rc::new(MemoryStorage::new());
        let ctx = SessionContext::new(storage.clone());
        assert!(!ctx.is_authenticated());

        ctx.establish(grant("abc", Some("r1")));
        assert_eq!(storage.get(ACCESS_TOKEN_KEY).as_deref(), Some("abc"));
        assert_eq!(storage.get(EXPIRES_IN_KEY).as_deref(), Some("3600"));

        let restored = SessionContext::new(storage);
        let session = restored.current().expect("session should hydrate");
        assert_eq!(session.access_token, "abc");
        assert_eq!(session.refresh_token.as_deref(), Some("r1"));
        assert_eq!(session.user.unwrap()["name"], "Dana");
    }

    #[test]
    fn test_refresh_grant_keeps_previous_refresh_token_and_user() {
        let ctx = SessionContext::in_memory();
        ctx.establish(grant("old", Some("r1")));
        ctx.establish(TokenGrant {
            access_token: "new".into(),
            token_type: "Bearer".into(),
            expires_in: None,
            refresh_token: None,
            user: None,
        });

        assert_eq!(ctx.access_token().as_deref(), Some("new"));
        assert_eq!(ctx.refresh_token().as_deref(), Some("r1"));
        assert!(ctx.user().is_some());
    }

    #[test]
    fn test_clear_keeps_remembered_email() {
        let storage = Rc::new(MemoryStorage::new());
        let ctx = SessionContext::new(storage.clone());
        ctx.establish(grant("abc", None));
        ctx.remember_email(Some("dana@example.com"));

        ctx.clear();
        assert!(!ctx.is_authenticated());
        assert!(storage.get(ACCESS_TOKEN_KEY).is_none());
        assert!(storage.get(USER_KEY).is_none());
        assert_eq!(ctx.remembered_email().as_deref(), Some("dana@example.com"));
    }

    #[test]
    fn test_expire_runs_hook() {
        let ctx = SessionContext::in_memory();
        ctx.establish(grant("abc", None));
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        ctx.on_expired(move || counter.set(counter.get() + 1));

        ctx.expire();
        assert_eq!(fired.get(), 1);
        assert!(ctx.access_token().is_none());
    }

    #[test]
    fn test_corrupt_user_is_ignored() {
        let storage = Rc::new(MemoryStorage::new());
        storage.set(ACCESS_TOKEN_KEY, "abc");
        storage.set(USER_KEY, "{not json");
        let ctx = SessionContext::new(storage);
        assert!(ctx.is_authenticated());
        assert!(ctx.user().is_none());
    }
}
