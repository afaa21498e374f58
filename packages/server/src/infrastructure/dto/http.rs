//! HTTP API response DTOs.

use serde::Serialize;

/// Router occupancy for the stats endpoint
#[derive(Debug, Clone, Serialize)]
pub struct StatsDto {
    /// Open connections
    pub connections: usize,
    /// Names in the Session Registry
    pub online_users: usize,
    /// Non-empty groups
    pub groups: usize,
    pub started_at: String, // ISO 8601
}
