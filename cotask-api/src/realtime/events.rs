/// Event types and the publisher that fans them out
///
/// Task lifecycle events are broadcast to every connected client so open
/// boards stay current. Assignment notifications are targeted: they go
/// only to the assignee's registered connection, looked up through the
/// [`ConnectionRegistry`].
///
/// Publishing is fire-and-forget. A failed or impossible delivery (no
/// subscribers, recipient offline, slow consumer) is logged and dropped;
/// HTTP handlers never fail because a push did not land.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use cotask_shared::models::task::Task;

use crate::realtime::registry::ConnectionRegistry;

/// Capacity of the broadcast channel before slow consumers start lagging
const BROADCAST_CAPACITY: usize = 256;

/// Events pushed from server to clients
///
/// Serialized as `{"event": "...", "data": ...}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// A task was created; payload is the full task
    TaskCreated(Task),

    /// A task was updated; payload is the full updated task
    TaskUpdated(Task),

    /// A task was deleted; payload carries only the id
    #[serde(rename_all = "camelCase")]
    TaskDeleted { task_id: Uuid },

    /// Targeted notification for the assignee
    TaskAssigned { message: String },
}

/// Events received from clients
///
/// The only inbound event is registration, where the client declares
/// which user the connection belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Associate this connection with a user id
    Register(Uuid),
}

/// Publishes domain events to connected clients
///
/// Cheaply cloneable; handlers hold a clone through application state.
#[derive(Clone)]
pub struct EventPublisher {
    broadcast: broadcast::Sender<ServerEvent>,
    registry: ConnectionRegistry,
}

impl EventPublisher {
    /// Creates a publisher wired to the given registry
    pub fn new(registry: ConnectionRegistry) -> Self {
        let (broadcast, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            broadcast,
            registry,
        }
    }

    /// Subscribes to the broadcast stream
    ///
    /// Each socket loop holds its own receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.broadcast.subscribe()
    }

    /// Announces a newly created task to all clients
    pub fn task_created(&self, task: &Task) {
        self.publish_broadcast(ServerEvent::TaskCreated(task.clone()));
    }

    /// Announces an updated task to all clients
    pub fn task_updated(&self, task: &Task) {
        self.publish_broadcast(ServerEvent::TaskUpdated(task.clone()));
    }

    /// Announces a deleted task to all clients
    pub fn task_deleted(&self, task_id: Uuid) {
        self.publish_broadcast(ServerEvent::TaskDeleted { task_id });
    }

    /// Delivers an assignment notification to one user, if connected
    pub async fn task_assigned(&self, user_id: Uuid, message: &str) {
        let Some(sender) = self.registry.sender_for(user_id).await else {
            tracing::debug!(%user_id, "Assignee not connected, skipping push");
            return;
        };

        let event = ServerEvent::TaskAssigned {
            message: message.to_string(),
        };

        if let Err(e) = sender.try_send(event) {
            tracing::warn!(%user_id, "Failed to push assignment notification: {}", e);
        }
    }

    fn publish_broadcast(&self, event: ServerEvent) {
        // send only fails when there are no subscribers
        if self.broadcast.send(event).is_err() {
            tracing::debug!("No connected clients, dropping broadcast event");
        }
    }
}
