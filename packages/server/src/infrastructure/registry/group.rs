//! Group id -> member connections.

use std::collections::{HashMap, HashSet};

use tokio::sync::Mutex;

use crate::domain::{ConnectionHandle, GroupId};

/// Group channel membership.
///
/// One lock over the whole map; joins and broadcast snapshots never
/// interleave on the same set.
#[derive(Debug, Default)]
pub struct GroupRegistry {
    groups: Mutex<HashMap<GroupId, HashSet<ConnectionHandle>>>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `handle` to `group`, creating the group if needed.
    ///
    /// Returns `false` when it was already a member.
    pub async fn join(&self, group: GroupId, handle: ConnectionHandle) -> bool {
        self.groups
            .lock()
            .await
            .entry(group)
            .or_default()
            .insert(handle)
    }

    /// Snapshot of the members of `group` other than `handle`.
    pub async fn members_except(
        &self,
        group: GroupId,
        handle: ConnectionHandle,
    ) -> Vec<ConnectionHandle> {
        let groups = self.groups.lock().await;
        groups
            .get(&group)
            .map(|members| members.iter().filter(|m| **m != handle).copied().collect())
            .unwrap_or_default()
    }

    /// Remove `handle` from every group, dropping groups left empty.
    ///
    /// Returns how many groups it was removed from.
    pub async fn leave_all(&self, handle: ConnectionHandle) -> usize {
        let mut groups = self.groups.lock().await;
        let mut left = 0;
        groups.retain(|_, members| {
            if members.remove(&handle) {
                left += 1;
            }
            !members.is_empty()
        });
        left
    }

    pub async fn member_count(&self, group: GroupId) -> usize {
        self.groups
            .lock()
            .await
            .get(&group)
            .map_or(0, HashSet::len)
    }

    /// Number of non-empty groups.
    pub async fn len(&self) -> usize {
        self.groups.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.groups.lock().await.is_empty()
    }
}
