//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined
//! independently; integration tests catch schema drift. The wire format
//! uses camelCase keys (`isCompleted`), matching the server's JSON
//! contract.

use serde::{Deserialize, Serialize};

/// A single todo item returned by the API.
///
/// Read-only on this side: ids are assigned by the server, and nothing in
/// this client mutates items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: u64,
    pub title: String,
    pub is_completed: bool,
}
