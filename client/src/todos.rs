//! The "fetch all todos" query.

use crate::http::Api;
use crate::query::{QueryClient, QueryOptions, QueryState};
use crate::types::Todo;

/// Cache key for the todo list query.
pub const TODOS_QUERY_KEY: &str = "todos";

/// Composed read over the todo list: the shared HTTP client behind the
/// query runtime, keyed under [`TODOS_QUERY_KEY`].
pub struct TodoQueries {
    api: Api,
    queries: QueryClient<Vec<Todo>>,
}

impl TodoQueries {
    pub fn new(api: Api, options: QueryOptions) -> Self {
        Self {
            api,
            queries: QueryClient::new(options),
        }
    }

    /// Activate the todo list query: served from cache when warm, fetched
    /// through the shared client otherwise. Items stay in server order.
    pub fn get_todos(&self) -> QueryState<Vec<Todo>> {
        self.queries.fetch(TODOS_QUERY_KEY, || self.api.list_todos())
    }

    /// Current state of the todo list query, without fetching.
    pub fn state(&self) -> QueryState<Vec<Todo>> {
        self.queries.state(TODOS_QUERY_KEY)
    }

    /// Drop the cached list; the next [`get_todos`](Self::get_todos)
    /// call refetches.
    pub fn invalidate(&self) {
        self.queries.invalidate(TODOS_QUERY_KEY);
    }
}
