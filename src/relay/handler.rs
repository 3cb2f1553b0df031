//! Relay connection lifecycle.
//!
//! The bearer token is checked before the upgrade is accepted, so an
//! unauthenticated client gets a plain 401 and never joins a channel.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::{IntoResponse, Response},
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use chrono::Utc;
use futures::{Sink, SinkExt, Stream, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::hub::{ConnectionId, RelayHub};
use super::messages::{ClientEvent, ServerEvent};
use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::auth::{AuthError, UserSession};

#[derive(Debug, Deserialize)]
pub struct RelayParams {
    pub token: Option<String>,
}

/// `GET /api/ws`
pub async fn relay_handler(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    Query(params): Query<RelayParams>,
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Result<Response, ApiError> {
    let token = bearer
        .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string())
        .or(params.token)
        .ok_or(AuthError::MissingToken)?;

    let session = state.auth_service.authenticate(&token).await?;

    let upgrade = match upgrade {
        Ok(upgrade) => upgrade,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    let hub = Arc::clone(&state.relay);
    Ok(upgrade.on_upgrade(move |socket| handle_socket(socket, hub, session)))
}

async fn handle_socket(socket: WebSocket, hub: Arc<RelayHub>, session: UserSession) {
    let (sender, receiver) = socket.split();
    run_connection(sender, receiver, hub, session).await;
}

/// Drive an authenticated connection until either side closes it
async fn run_connection<S, R>(mut sender: S, mut receiver: R, hub: Arc<RelayHub>, session: UserSession)
where
    S: Sink<Message> + Unpin + Send + 'static,
    R: Stream<Item = Result<Message, axum::Error>> + Unpin + Send + 'static,
{
    let user_id = session.user_id;

    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();

    let connection_id = match hub.join(user_id, tx).await {
        Ok(id) => id,
        Err(e) => {
            tracing::error!(user_id = %user_id, error = %e, "Failed to join relay channel");
            if let Ok(text) = serde_json::to_string(&ServerEvent::Error { message: e.to_string() }) {
                let _ = sender.send(Message::Text(text)).await;
            }
            return;
        }
    };

    let mut send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(text) => {
                    if sender.send(Message::Text(text)).await.is_err() {
                        tracing::debug!(connection_id = %connection_id, "Relay send failed, closing connection");
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize relay event");
                }
            }
        }
    });

    let hub_for_recv = Arc::clone(&hub);
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(message) => {
                    if !handle_frame(&hub_for_recv, user_id, connection_id, message).await {
                        break;
                    }
                }
                Err(e) => {
                    tracing::debug!(connection_id = %connection_id, error = %e, "Relay receive error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
        }
        _ = &mut recv_task => {
            send_task.abort();
        }
    }

    hub.leave(user_id, connection_id).await;
}

/// Returns false if the connection should be closed
async fn handle_frame(hub: &RelayHub, user_id: Uuid, connection_id: ConnectionId, message: Message) -> bool {
    match message {
        Message::Text(text) => {
            match serde_json::from_str::<ClientEvent>(&text) {
                Ok(event) => {
                    let outbound = event.into_server_event(Utc::now());
                    let delivered = hub.relay(user_id, connection_id, &outbound).await;
                    tracing::debug!(user_id = %user_id, delivered, "Relayed event");
                }
                Err(e) => {
                    tracing::debug!(connection_id = %connection_id, error = %e, "Invalid relay frame");
                    let error = ServerEvent::Error {
                        message: format!("Invalid message format: {}", e),
                    };
                    let _ = hub.send_to(user_id, connection_id, error).await;
                }
            }
            true
        }
        Message::Binary(_) => {
            let error = ServerEvent::Error {
                message: "Binary messages not supported".to_string(),
            };
            let _ = hub.send_to(user_id, connection_id, error).await;
            true
        }
        Message::Ping(_) | Message::Pong(_) => true,
        Message::Close(_) => {
            tracing::debug!(connection_id = %connection_id, "Client requested close");
            false
        }
    }
}
