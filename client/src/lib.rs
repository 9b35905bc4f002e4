//! Authenticated HTTP client and cached query layer for the todo service.
//!
//! # Overview
//! One shared [`Api`] client carries the request/response interception
//! contract: every outgoing request gets the JSON content type and, when a
//! session token is stored, a bearer `Authorization` header; any 401
//! response clears the token and navigates the embedding shell to the
//! login page before the error reaches the caller. On top of it,
//! [`TodoQueries`] exposes the todo list as a cache-backed query with
//! `idle → loading → success | error` states.
//!
//! # Design
//! - The transport is a ureq [`Agent`](ureq::Agent); the interceptors are
//!   its middleware chain, run in registration order.
//! - Status interpretation lives in this crate: non-2xx responses come
//!   back as data and are mapped to [`ApiError::Http`].
//! - Cached results live in a moka cache owned by [`QueryClient`]; expiry
//!   and invalidation mechanics are the cache library's.
//! - The session store and the navigation sink are injected, so tests run
//!   against a recording navigator and a throwaway store.

pub mod config;
pub mod error;
pub mod http;
pub mod navigation;
pub mod query;
pub mod session;
pub mod todos;
pub mod types;

pub use config::{ApiConfig, BASE_URL_ENV, DEFAULT_BASE_URL, REQUEST_TIMEOUT};
pub use error::ApiError;
pub use http::Api;
pub use navigation::{NavigationLog, Navigator, LOGIN_PATH};
pub use query::{QueryClient, QueryOptions, QueryState};
pub use session::{SessionStore, TOKEN_KEY};
pub use todos::{TodoQueries, TODOS_QUERY_KEY};
pub use types::Todo;
