use chrono::Utc;
use serde_json::json;
use tokio::sync::mpsc;
use uuid::Uuid;

use fitness_tracker::relay::{ClientEvent, HubConfig, HubError, NotificationKind, RelayHub, ServerEvent};

#[cfg(test)]
mod relay_hub_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_client_frame_reaches_other_sessions_of_same_user() {
        let hub = RelayHub::new(HubConfig::default());
        let user = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        let (phone_tx, mut phone_rx) = mpsc::unbounded_channel();
        let (laptop_tx, mut laptop_rx) = mpsc::unbounded_channel();
        let (other_tx, mut other_rx) = mpsc::unbounded_channel();

        let phone = hub.join(user, phone_tx).await.unwrap();
        hub.join(user, laptop_tx).await.unwrap();
        hub.join(stranger, other_tx).await.unwrap();

        let frame = r#"{"event":"workout_completed","data":{"workoutName":"5k run"}}"#;
        let event: ClientEvent = serde_json::from_str(frame).unwrap();
        let delivered = hub.relay(user, phone, &event.into_server_event(Utc::now())).await;

        assert_eq!(delivered, 1);
        match laptop_rx.try_recv().unwrap() {
            ServerEvent::WorkoutUpdate(notification) => {
                assert_eq!(notification.kind, NotificationKind::WorkoutCompleted);
                assert_eq!(notification.message, "Workout \"5k run\" completed!");
                assert_eq!(notification.data, json!({"workoutName": "5k run"}));
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(phone_rx.try_recv().is_err());
        assert!(other_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_channels_are_released_when_last_session_leaves() {
        let hub = RelayHub::new(HubConfig::default());
        let user = Uuid::new_v4();

        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();
        let first = hub.join(user, tx1).await.unwrap();
        let second = hub.join(user, tx2).await.unwrap();
        assert_eq!(hub.channel_size(user).await, 2);

        hub.leave(user, first).await;
        assert_eq!(hub.channel_size(user).await, 1);

        hub.leave(user, second).await;
        assert_eq!(hub.channel_size(user).await, 0);
        assert_eq!(hub.connection_count().await, 0);
    }

    #[tokio::test]
    async fn test_connection_limit_is_global() {
        let hub = RelayHub::new(HubConfig { max_connections: 1 });

        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();
        hub.join(Uuid::new_v4(), tx1).await.unwrap();

        let result = hub.join(Uuid::new_v4(), tx2).await;
        assert_eq!(result, Err(HubError::TooManyConnections(1)));
    }
}
