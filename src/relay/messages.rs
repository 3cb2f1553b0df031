//! Relay wire format.
//!
//! Every frame is a JSON text frame of the form
//! `{"event": "<name>", "data": ...}`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Events a session may emit to its user's other sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    WorkoutCompleted(Value),
    GoalAchieved(Value),
    MetricsUpdated(Value),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    WorkoutCompleted,
    GoalAchieved,
    MetricsUpdated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub data: Value,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Events delivered to a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    WorkoutUpdate(Notification),
    GoalUpdate(Notification),
    MetricsUpdate(Notification),
    /// Only ever sent back to the connection that caused it
    Error { message: String },
}

fn string_field<'a>(data: &'a Value, key: &str) -> Option<&'a str> {
    data.get(key).and_then(Value::as_str).filter(|s| !s.trim().is_empty())
}

impl ClientEvent {
    /// The notification other sessions receive for this event
    pub fn into_server_event(self, now: DateTime<Utc>) -> ServerEvent {
        match self {
            ClientEvent::WorkoutCompleted(data) => {
                let message = match string_field(&data, "workoutName") {
                    Some(name) => format!("Workout \"{}\" completed!", name),
                    None => "Workout completed!".to_string(),
                };
                ServerEvent::WorkoutUpdate(Notification {
                    kind: NotificationKind::WorkoutCompleted,
                    data,
                    message,
                    timestamp: now,
                })
            }
            ClientEvent::GoalAchieved(data) => {
                let message = match string_field(&data, "goalName") {
                    Some(name) => format!("Congratulations! You achieved: {}", name),
                    None => "Congratulations! You achieved a goal!".to_string(),
                };
                ServerEvent::GoalUpdate(Notification {
                    kind: NotificationKind::GoalAchieved,
                    data,
                    message,
                    timestamp: now,
                })
            }
            ClientEvent::MetricsUpdated(data) => ServerEvent::MetricsUpdate(Notification {
                kind: NotificationKind::MetricsUpdated,
                data,
                message: "Health metrics updated".to_string(),
                timestamp: now,
            }),
        }
    }
}
