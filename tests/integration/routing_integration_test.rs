use std::io;
use std::sync::{Arc, Mutex};

use axum::http::{Method, StatusCode};
use tracing_subscriber::fmt::MakeWriter;

use crate::common::{create_test_app, register, send};

/// In-memory sink for formatted log lines
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[cfg(test)]
mod routing_integration_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_request_logs_omit_query_string() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(logs.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let app = create_test_app();
        let response = send(&app, Method::GET, "/api/ws?token=leaked-secret-token", None, None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);

        let output = logs.contents();
        assert!(output.contains("path=/api/ws"), "{}", output);
        assert!(!output.contains("leaked-secret-token"), "{}", output);
    }

    #[tokio::test]
    async fn test_health_check_endpoint() {
        let app = create_test_app();

        let response = send(&app, Method::GET, "/api/health", None, None).await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["message"], "Fitness Tracker API is running!");
        assert_eq!(response.body["database"], "memory");
        assert!(response.body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_unknown_route_returns_json_404() {
        let app = create_test_app();

        for uri in ["/api/does-not-exist", "/elsewhere"] {
            let response = send(&app, Method::GET, uri, None, None).await;
            assert_eq!(response.status, StatusCode::NOT_FOUND, "{}", uri);
            assert_eq!(response.body["success"], false);
            assert_eq!(response.body["message"], "Route not found");
        }
    }

    #[tokio::test]
    async fn test_protected_routes_require_token() {
        let app = create_test_app();

        for uri in ["/api/workouts", "/api/nutrition", "/api/health-metrics", "/api/workouts/stats/summary"] {
            let response = send(&app, Method::GET, uri, None, None).await;
            assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_relay_requires_token() {
        let app = create_test_app();

        let missing = send(&app, Method::GET, "/api/ws", None, None).await;
        assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
        assert_eq!(missing.body["message"], "No token, authorization denied");

        let invalid = send(&app, Method::GET, "/api/ws?token=garbage", None, None).await;
        assert_eq!(invalid.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_relay_accepts_query_token_before_upgrade_check() {
        let app = create_test_app();
        let token = register(&app, "t1").await;

        // Authenticated, but a plain GET is not a websocket handshake
        let response = send(&app, Method::GET, &format!("/api/ws?token={}", token), None, None).await;
        assert_ne!(response.status, StatusCode::UNAUTHORIZED);
        assert!(response.status.is_client_error());
    }
}
