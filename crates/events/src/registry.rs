//! Subscriber → connection membership tracking.
//!
//! [`ConnectionRegistry`] is the single source of truth for which live
//! connections belong to which subscriber group. It is constructed once per
//! process and shared via `Arc` between the hub, the dispatcher and the HTTP
//! status endpoints.

use std::collections::{HashMap, HashSet};

use euit_core::types::{ConnectionId, SubscriberId};
use tokio::sync::RwLock;

/// Both directions of the membership relation, kept under one lock so a
/// connection can be dropped from every group in a single write.
///
/// Invariant: a subscriber (or connection) key exists only while its set is
/// non-empty, and the two maps always describe the same pairs.
#[derive(Default)]
struct Memberships {
    by_subscriber: HashMap<SubscriberId, HashSet<ConnectionId>>,
    by_connection: HashMap<ConnectionId, HashSet<SubscriberId>>,
}

impl Memberships {
    fn unlink(&mut self, subscriber_id: &str, conn_id: &ConnectionId) -> bool {
        let Some(conns) = self.by_subscriber.get_mut(subscriber_id) else {
            return false;
        };
        let removed = conns.remove(conn_id);
        if conns.is_empty() {
            self.by_subscriber.remove(subscriber_id);
        }

        if let Some(subs) = self.by_connection.get_mut(conn_id) {
            subs.remove(subscriber_id);
            if subs.is_empty() {
                self.by_connection.remove(conn_id);
            }
        }
        removed
    }
}

/// Tracks the live connection set of every subscriber.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application.
pub struct ConnectionRegistry {
    inner: RwLock<Memberships>,
}

impl ConnectionRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Memberships::default()),
        }
    }

    /// Add `conn_id` to the group of `subscriber_id`, creating the group if
    /// needed.
    ///
    /// Returns `false` if the connection was already a member.
    pub async fn add(&self, subscriber_id: &str, conn_id: ConnectionId) -> bool {
        let mut inner = self.inner.write().await;
        let inserted = inner
            .by_subscriber
            .entry(subscriber_id.to_string())
            .or_default()
            .insert(conn_id);
        inner
            .by_connection
            .entry(conn_id)
            .or_default()
            .insert(subscriber_id.to_string());
        inserted
    }

    /// Remove `conn_id` from one subscriber's group only.
    ///
    /// Returns `false` if it was not a member.
    pub async fn remove_membership(&self, subscriber_id: &str, conn_id: ConnectionId) -> bool {
        self.inner.write().await.unlink(subscriber_id, &conn_id)
    }

    /// Remove `conn_id` from every group it belongs to, pruning groups that
    /// become empty. Unknown connections are a no-op.
    ///
    /// Returns the subscriber ids the connection was removed from.
    pub async fn remove(&self, conn_id: ConnectionId) -> Vec<SubscriberId> {
        let mut inner = self.inner.write().await;
        let Some(subscribers) = inner.by_connection.remove(&conn_id) else {
            return Vec::new();
        };

        for subscriber_id in &subscribers {
            if let Some(conns) = inner.by_subscriber.get_mut(subscriber_id) {
                conns.remove(&conn_id);
                if conns.is_empty() {
                    inner.by_subscriber.remove(subscriber_id);
                }
            }
        }
        subscribers.into_iter().collect()
    }

    /// Whether the subscriber has at least one live connection.
    pub async fn is_online(&self, subscriber_id: &str) -> bool {
        self.inner.read().await.by_subscriber.contains_key(subscriber_id)
    }

    /// Number of subscribers with at least one live connection.
    pub async fn online_subscriber_count(&self) -> usize {
        self.inner.read().await.by_subscriber.len()
    }

    /// Number of connections currently in the subscriber's group.
    pub async fn connection_count(&self, subscriber_id: &str) -> usize {
        self.inner
            .read()
            .await
            .by_subscriber
            .get(subscriber_id)
            .map_or(0, HashSet::len)
    }

    /// Snapshot of the subscriber's group at call time.
    pub async fn members(&self, subscriber_id: &str) -> Vec<ConnectionId> {
        self.inner
            .read()
            .await
            .by_subscriber
            .get(subscriber_id)
            .map(|conns| conns.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Subscriber groups the connection currently belongs to.
    pub async fn subscriptions(&self, conn_id: ConnectionId) -> Vec<SubscriberId> {
        self.inner
            .read()
            .await
            .by_connection
            .get(&conn_id)
            .map(|subs| subs.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[tokio::test]
    async fn new_registry_is_empty() {
        let registry = ConnectionRegistry::new();

        assert_eq!(registry.online_subscriber_count().await, 0);
        assert!(!registry.is_online("23520001").await);
    }

    #[tokio::test]
    async fn add_marks_subscriber_online() {
        let registry = ConnectionRegistry::new();
        let conn = Uuid::new_v4();

        assert!(registry.add("23520001", conn).await);

        assert!(registry.is_online("23520001").await);
        assert_eq!(registry.online_subscriber_count().await, 1);
        assert_eq!(registry.members("23520001").await, vec![conn]);
    }

    #[tokio::test]
    async fn add_is_idempotent() {
        let registry = ConnectionRegistry::new();
        let conn = Uuid::new_v4();

        assert!(registry.add("A", conn).await);
        assert!(!registry.add("A", conn).await);

        assert_eq!(registry.connection_count("A").await, 1);
    }

    #[tokio::test]
    async fn remove_drops_connection_from_every_group() {
        let registry = ConnectionRegistry::new();
        let conn = Uuid::new_v4();
        let other = Uuid::new_v4();

        registry.add("A", conn).await;
        registry.add("B", conn).await;
        registry.add("B", other).await;

        let mut left = registry.remove(conn).await;
        left.sort();
        assert_eq!(left, vec!["A".to_string(), "B".to_string()]);

        assert!(!registry.is_online("A").await);
        assert!(registry.is_online("B").await);
        assert_eq!(registry.members("B").await, vec![other]);
        assert!(registry.subscriptions(conn).await.is_empty());
    }

    #[tokio::test]
    async fn remove_unknown_connection_is_noop() {
        let registry = ConnectionRegistry::new();
        registry.add("A", Uuid::new_v4()).await;

        assert!(registry.remove(Uuid::new_v4()).await.is_empty());
        assert_eq!(registry.online_subscriber_count().await, 1);
    }

    #[tokio::test]
    async fn remove_membership_prunes_empty_group() {
        let registry = ConnectionRegistry::new();
        let conn = Uuid::new_v4();

        registry.add("A", conn).await;
        registry.add("B", conn).await;

        assert!(registry.remove_membership("A", conn).await);
        assert!(!registry.remove_membership("A", conn).await);

        assert!(!registry.is_online("A").await);
        assert_eq!(registry.online_subscriber_count().await, 1);
        assert_eq!(registry.subscriptions(conn).await, vec!["B".to_string()]);
    }

    #[tokio::test]
    async fn subscriber_stays_online_until_last_connection_leaves() {
        let registry = ConnectionRegistry::new();
        let c1 = Uuid::new_v4();
        let c2 = Uuid::new_v4();

        registry.add("A", c1).await;
        registry.add("A", c2).await;

        registry.remove(c1).await;
        assert!(registry.is_online("A").await);

        registry.remove_membership("A", c2).await;
        assert!(!registry.is_online("A").await);
        assert_eq!(registry.online_subscriber_count().await, 0);
    }

    #[tokio::test]
    async fn replayed_operations_leave_no_leaked_memberships() {
        let registry = ConnectionRegistry::new();
        let conns: Vec<_> = (0..4).map(|_| Uuid::new_v4()).collect();

        for (i, conn) in conns.iter().enumerate() {
            registry.add("shared", *conn).await;
            registry.add(&format!("own-{i}"), *conn).await;
        }
        registry.remove_membership("shared", conns[0]).await;
        registry.remove(conns[1]).await;
        registry.remove(conns[2]).await;

        assert_eq!(registry.members("shared").await, vec![conns[3]]);
        assert!(registry.is_online("own-0").await);
        assert!(!registry.is_online("own-1").await);
        assert!(!registry.is_online("own-2").await);
        assert!(registry.is_online("own-3").await);
        assert_eq!(registry.online_subscriber_count().await, 3);
    }

    #[tokio::test]
    async fn concurrent_adds_and_removes_do_not_lose_updates() {
        let registry = std::sync::Arc::new(ConnectionRegistry::new());
        let conns: Vec<_> = (0..64).map(|_| Uuid::new_v4()).collect();

        let tasks: Vec<_> = conns
            .iter()
            .map(|conn| {
                let registry = std::sync::Arc::clone(&registry);
                let conn = *conn;
                tokio::spawn(async move { registry.add("hot", conn).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }
        assert_eq!(registry.connection_count("hot").await, 64);

        let tasks: Vec<_> = conns
            .iter()
            .map(|conn| {
                let registry = std::sync::Arc::clone(&registry);
                let conn = *conn;
                tokio::spawn(async move { registry.remove(conn).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }
        assert!(!registry.is_online("hot").await);
    }
}
