/// Connection registry mapping users to their live WebSocket connection
///
/// Each accepted socket gets a [`ConnectionId`] and an outbound channel.
/// Once the client identifies itself with a register event, the registry
/// associates the user id with that connection so targeted events can be
/// delivered without broadcasting.
///
/// The mapping is kept in both directions: `by_user` answers "which
/// connection does this user have?" for targeted delivery, and the
/// per-connection entry remembers which user (if any) claimed it so that
/// disconnect cleanup is a direct lookup rather than a scan.
///
/// A user has at most one registered connection. Registering on a new
/// connection displaces the old association, and a later disconnect of
/// the displaced connection must not evict the newer registration.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use crate::realtime::events::ServerEvent;

/// Unique identifier for a WebSocket connection
///
/// Independent of user identity: a connection exists (and can receive
/// broadcasts) before any user registers on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-connection state held by the registry
struct ConnectionEntry {
    /// User that registered on this connection, if any
    user_id: Option<Uuid>,

    /// Outbound channel to the connection's socket loop
    sender: mpsc::Sender<ServerEvent>,
}

#[derive(Default)]
struct RegistryInner {
    /// User id -> currently registered connection
    by_user: HashMap<Uuid, ConnectionId>,

    /// Connection id -> connection state
    connections: HashMap<ConnectionId, ConnectionEntry>,
}

/// Shared registry of live connections
///
/// Cheaply cloneable; all clones share the same state.
#[derive(Clone, Default)]
pub struct ConnectionRegistry {
    inner: Arc<RwLock<RegistryInner>>,
}

impl ConnectionRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits a new connection and returns its id
    ///
    /// The connection is anonymous until [`register`](Self::register) is
    /// called for it.
    pub async fn connect(&self, sender: mpsc::Sender<ServerEvent>) -> ConnectionId {
        let connection_id = ConnectionId::new();
        let mut inner = self.inner.write().await;
        inner.connections.insert(
            connection_id,
            ConnectionEntry {
                user_id: None,
                sender,
            },
        );
        connection_id
    }

    /// Associates a user with a connection
    ///
    /// Last registration wins: if the user was registered on another
    /// connection (e.g. an old tab that has not yet disconnected), the
    /// association moves to the new connection and the old one reverts
    /// to anonymous.
    pub async fn register(&self, user_id: Uuid, connection_id: ConnectionId) {
        let mut inner = self.inner.write().await;

        if !inner.connections.contains_key(&connection_id) {
            tracing::warn!(
                %user_id,
                %connection_id,
                "Register for unknown connection, ignoring"
            );
            return;
        }

        if let Some(previous) = inner.by_user.insert(user_id, connection_id) {
            if previous != connection_id {
                if let Some(entry) = inner.connections.get_mut(&previous) {
                    entry.user_id = None;
                }
                tracing::debug!(%user_id, old = %previous, new = %connection_id, "User re-registered on new connection");
            }
        }

        if let Some(entry) = inner.connections.get_mut(&connection_id) {
            entry.user_id = Some(user_id);
        }
    }

    /// Returns the connection currently registered for a user
    pub async fn lookup(&self, user_id: Uuid) -> Option<ConnectionId> {
        self.inner.read().await.by_user.get(&user_id).copied()
    }

    /// Returns the outbound channel for a user's registered connection
    pub async fn sender_for(&self, user_id: Uuid) -> Option<mpsc::Sender<ServerEvent>> {
        let inner = self.inner.read().await;
        let connection_id = inner.by_user.get(&user_id)?;
        inner
            .connections
            .get(connection_id)
            .map(|entry| entry.sender.clone())
    }

    /// Removes a connection on disconnect
    ///
    /// The user association is removed only if it still points at this
    /// connection, so a stale disconnect cannot evict a registration
    /// that has since moved to a newer connection.
    pub async fn unregister(&self, connection_id: ConnectionId) {
        let mut inner = self.inner.write().await;

        if let Some(entry) = inner.connections.remove(&connection_id) {
            if let Some(user_id) = entry.user_id {
                if inner.by_user.get(&user_id) == Some(&connection_id) {
                    inner.by_user.remove(&user_id);
                }
            }
        }
    }

    /// Number of live connections (registered or anonymous)
    pub async fn connection_count(&self) -> usize {
        self.inner.read().await.connections.len()
    }

    /// Number of users with a registered connection
    pub async fn registered_count(&self) -> usize {
        self.inner.read().await.by_user.len()
    }
}
