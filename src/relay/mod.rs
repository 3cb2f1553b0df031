//! Real-time relay between a user's own sessions.
//!
//! A client connects to `/api/ws` with its bearer token (header or `token`
//! query parameter) and joins the channel of the user the token belongs to.
//! Events it emits are re-broadcast to that user's other connections:
//!
//! - `workout_completed` → `workout_update`
//! - `goal_achieved` → `goal_update`
//! - `metrics_updated` → `metrics_update`
//!
//! Delivery is fire-and-forget. Nothing is queued for absent sessions.

mod handler;
mod hub;
mod messages;

pub use handler::{relay_handler, RelayParams};
pub use hub::{ConnectionId, HubConfig, HubError, RelayHub};
pub use messages::{ClientEvent, Notification, NotificationKind, ServerEvent};
