//! Bearer-token session shared by every API client.
//!
//! SYSTEM CONTEXT
//! ==============
//! The token lives in exactly one [`TokenStore`] (browser `localStorage`, a
//! file for the CLI, memory in tests). Only the HTTP layer calls
//! [`Session::absorb`] and [`Session::bearer`]; UI code asks
//! [`Session::is_authenticated`] and nothing else.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Mutex;

use serde_json::Value;

/// Where the bearer token is persisted between requests.
pub trait TokenStore {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str);
    fn clear(&self);
}

/// Process-local store, used by tests and one-shot clients.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self { token: Mutex::new(Some(token.to_owned())) }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token.lock().ok().and_then(|t| t.clone())
    }

    fn save(&self, token: &str) {
        if let Ok(mut slot) = self.token.lock() {
            *slot = Some(token.to_owned());
        }
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.token.lock() {
            *slot = None;
        }
    }
}

#[derive(Debug, Default)]
pub struct Session<S> {
    store: S,
}

impl<S: TokenStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn token(&self) -> Option<String> {
        self.store.load().filter(|t| !t.trim().is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// `Authorization` header value, if a token is stored.
    pub fn bearer(&self) -> Option<String> {
        self.token().map(|t| format!("Bearer {t}"))
    }

    /// Persist a token found in a login/verify/refresh response body.
    /// Returns whether one was found.
    pub fn absorb(&self, body: &Value) -> bool {
        match extract_token(body) {
            Some(token) => {
                self.store.save(token);
                true
            }
            None => false,
        }
    }

    pub fn sign_out(&self) {
        self.store.clear();
    }
}

const TOKEN_KEYS: [&str; 3] = ["token", "accessToken", "access_token"];

/// Find a token at the top level of `body` or under its `data` object.
#[must_use]
pub fn extract_token(body: &Value) -> Option<&str> {
    let top = TOKEN_KEYS.iter().find_map(|k| body.get(*k).and_then(Value::as_str));
    top.or_else(|| {
        let data = body.get("data")?;
        TOKEN_KEYS.iter().find_map(|k| data.get(*k).and_then(Value::as_str))
    })
    .filter(|t| !t.is_empty())
}
