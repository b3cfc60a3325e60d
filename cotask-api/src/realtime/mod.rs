/// Real-time layer: connection registry, event fan-out, WebSocket endpoint
///
/// This module bridges HTTP-triggered state mutations to live socket
/// subscribers:
///
/// - [`registry`]: maps application user identity to the active
///   connection, so targeted events can be routed without broadcasting
/// - [`events`]: converts domain facts (task created/updated/deleted,
///   assignment) into pushes; broadcast for board-wide events, targeted
///   via the registry for notifications
/// - [`socket`]: the `/ws` upgrade handler and per-connection loop
///
/// Delivery is best-effort: a user without a live connection simply does
/// not receive the push, and the persisted Notification record remains
/// the durable source of truth.

pub mod events;
pub mod registry;
pub mod socket;

pub use events::{ClientEvent, EventPublisher, ServerEvent};
pub use registry::{ConnectionId, ConnectionRegistry};
