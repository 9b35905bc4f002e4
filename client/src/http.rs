//! Shared HTTP client for the todo API.
//!
//! # Design
//! One [`Api`] value wraps a ureq [`Agent`] configured with the base URL,
//! a global request deadline, and two middlewares carrying the request/
//! response interception contract:
//!
//! - outbound, first in the chain: attach `Authorization: Bearer <token>`
//!   when the session store holds a token;
//! - inbound: on a 401 response, remove the stored token and navigate to
//!   the login page, then pass the response on so the caller still
//!   observes the failure.
//!
//! Automatic status-as-error conversion is disabled so 4xx/5xx responses
//! flow back through the middleware chain as data; `Api` owns status
//! interpretation and maps non-2xx to [`ApiError::Http`].

use std::sync::Arc;

use ureq::http::{header, HeaderValue, Request, Response};
use ureq::middleware::{Middleware, MiddlewareNext};
use ureq::{Agent, Body, SendBody};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::navigation::{Navigator, LOGIN_PATH};
use crate::session::{SessionStore, TOKEN_KEY};
use crate::types::Todo;

/// Shared client for the todo API.
#[derive(Clone)]
pub struct Api {
    agent: Agent,
    base_url: String,
}

impl Api {
    /// Build the shared client from `config`, wiring the interceptors to
    /// `session` and `navigator`.
    pub fn new(
        config: ApiConfig,
        session: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .http_status_as_error(false)
            .middleware(BearerAuth {
                session: Arc::clone(&session),
            })
            .middleware(UnauthorizedRedirect { session, navigator })
            .build()
            .new_agent();

        Self {
            agent,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `GET /todos`: the full todo list, in server order.
    pub fn list_todos(&self) -> Result<Vec<Todo>, ApiError> {
        let url = format!("{}/todos", self.base_url);
        tracing::debug!(%url, "GET");

        let mut response = self
            .agent
            .get(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .call()?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(ApiError::from)?;

        if !(200..300).contains(&status) {
            return Err(ApiError::Http { status, body });
        }
        serde_json::from_str(&body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }
}

/// Outbound interceptor: attach the session's bearer token.
struct BearerAuth {
    session: Arc<SessionStore>,
}

impl Middleware for BearerAuth {
    fn handle(
        &self,
        mut request: Request<SendBody>,
        next: MiddlewareNext,
    ) -> Result<Response<Body>, ureq::Error> {
        if let Some(token) = self.session.get(TOKEN_KEY) {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(ureq::http::Error::from)?;
            request.headers_mut().insert(header::AUTHORIZATION, value);
        }
        next.handle(request)
    }
}

/// Inbound interceptor: a 401 ends the session. The stored token is
/// dropped and the shell is sent to the login page; the response then
/// continues down the chain unchanged so the caller still sees the
/// failure.
struct UnauthorizedRedirect {
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl Middleware for UnauthorizedRedirect {
    fn handle(
        &self,
        request: Request<SendBody>,
        next: MiddlewareNext,
    ) -> Result<Response<Body>, ureq::Error> {
        let response = next.handle(request)?;
        if response.status().as_u16() == 401 {
            tracing::warn!("401 response: clearing session token, redirecting to login");
            self.session.remove(TOKEN_KEY);
            self.navigator.navigate(LOGIN_PATH);
        }
        Ok(response)
    }
}
