//! Process-wide session storage.
//!
//! # Design
//! A string key-value store shared between the client and the (external)
//! login flow. The only key this crate touches is [`TOKEN_KEY`]: the login
//! flow writes it, the request interceptor reads it on every outgoing
//! request, and the 401 handling path removes it.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Session key holding the auth token.
pub const TOKEN_KEY: &str = "token";

/// Thread-safe in-process key-value store.
#[derive(Debug, Default)]
pub struct SessionStore {
    values: RwLock<HashMap<String, String>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Set `key` to `value`, replacing any previous value.
    pub fn set(&self, key: &str, value: &str) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    /// Remove `key`, returning the previous value if one was stored.
    pub fn remove(&self, key: &str) -> Option<String> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
    }
}
