//! Per-user channel membership.
//!
//! Each user id maps to the senders of that user's open connections. An
//! event relayed on a channel reaches every member except the connection
//! that emitted it.

use std::collections::HashMap;

use thiserror::Error;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use super::messages::ServerEvent;

/// Unique identifier for a relay connection
pub type ConnectionId = Uuid;

type Channel = HashMap<ConnectionId, mpsc::UnboundedSender<ServerEvent>>;

#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Maximum number of concurrent connections across all users
    pub max_connections: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self { max_connections: 1000 }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum HubError {
    #[error("Too many connections (limit: {0})")]
    TooManyConnections(usize),

    #[error("Connection not found")]
    ConnectionNotFound,

    #[error("Failed to send message")]
    SendFailed,
}

pub struct RelayHub {
    channels: RwLock<HashMap<Uuid, Channel>>,
    config: HubConfig,
}

impl Default for RelayHub {
    fn default() -> Self {
        Self::new(HubConfig::default())
    }
}

impl RelayHub {
    pub fn new(config: HubConfig) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Add a connection to its user's channel, creating the channel if needed
    pub async fn join(
        &self,
        user_id: Uuid,
        sender: mpsc::UnboundedSender<ServerEvent>,
    ) -> Result<ConnectionId, HubError> {
        let mut channels = self.channels.write().await;

        let open: usize = channels.values().map(HashMap::len).sum();
        if open >= self.config.max_connections {
            return Err(HubError::TooManyConnections(self.config.max_connections));
        }

        let connection_id = Uuid::new_v4();
        channels.entry(user_id).or_default().insert(connection_id, sender);

        tracing::info!(user_id = %user_id, connection_id = %connection_id, "Relay connection joined");
        Ok(connection_id)
    }

    /// Remove a connection; the channel goes away with its last member
    pub async fn leave(&self, user_id: Uuid, connection_id: ConnectionId) {
        let mut channels = self.channels.write().await;

        if let Some(channel) = channels.get_mut(&user_id) {
            channel.remove(&connection_id);
            if channel.is_empty() {
                channels.remove(&user_id);
            }
        }

        tracing::info!(user_id = %user_id, connection_id = %connection_id, "Relay connection left");
    }

    /// Deliver `event` to every connection on the user's channel except `from`.
    ///
    /// Returns how many connections accepted it. Closed receivers are skipped.
    pub async fn relay(&self, user_id: Uuid, from: ConnectionId, event: &ServerEvent) -> usize {
        let channels = self.channels.read().await;
        let Some(channel) = channels.get(&user_id) else {
            return 0;
        };

        let mut delivered = 0;
        for (connection_id, sender) in channel.iter().filter(|(id, _)| **id != from) {
            if sender.send(event.clone()).is_ok() {
                delivered += 1;
            } else {
                tracing::debug!(connection_id = %connection_id, "Dropped relay to closed connection");
            }
        }

        delivered
    }

    /// Send directly to one connection
    pub async fn send_to(
        &self,
        user_id: Uuid,
        connection_id: ConnectionId,
        event: ServerEvent,
    ) -> Result<(), HubError> {
        let channels = self.channels.read().await;
        let sender = channels
            .get(&user_id)
            .and_then(|channel| channel.get(&connection_id))
            .ok_or(HubError::ConnectionNotFound)?;

        sender.send(event).map_err(|_| HubError::SendFailed)
    }

    pub async fn connection_count(&self) -> usize {
        self.channels.read().await.values().map(HashMap::len).sum()
    }

    pub async fn channel_size(&self, user_id: Uuid) -> usize {
        self.channels
            .read()
            .await
            .get(&user_id)
            .map(HashMap::len)
            .unwrap_or(0)
    }
}
