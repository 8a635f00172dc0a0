//! HTTP interface - router, shared state and server loop.
//!
//! Routes:
//! - `GET    /accounts`       list clients
//! - `POST   /accounts`       create a client
//! - `GET    /accounts/{id}`  fetch one client
//! - `PUT    /accounts/{id}`  replace a client
//! - `DELETE /accounts/{id}`  remove a client

/// Error to response mapping
pub mod error;
/// Endpoint handlers
pub mod handlers;

use crate::errors::{Error, Result};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Application state injected into handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Connection pool shared by every request
    pub db: DatabaseConnection,
}

/// Builds the router with CORS restricted to `allowed_origin`.
pub fn router(state: AppState, allowed_origin: &str) -> Result<Router> {
    let origin = HeaderValue::from_str(allowed_origin).map_err(|e| Error::Config {
        message: format!("Invalid allowed_origin {allowed_origin:?}: {e}"),
    })?;

    // A list only echoes the origin back when the request carries it
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Ok(Router::new()
        .route(
            "/accounts",
            get(handlers::list_clients).post(handlers::create_client),
        )
        .route(
            "/accounts/{id}",
            get(handlers::get_client)
                .put(handlers::update_client)
                .delete(handlers::delete_client),
        )
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

/// Serves `app` on `listener` until ctrl-c is received.
pub async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    info!(address = %listener.local_addr()?, "HTTP server starting");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_test_db;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const ORIGIN: &str = "http://localhost:3500";

    async fn test_app() -> Result<Router> {
        let db = setup_test_db().await?;
        router(AppState { db }, ORIGIN)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn send_json(app: &Router, method: &str, uri: &str, body: &Value) -> (StatusCode, Value) {
        let (status, bytes) = send(app, method, uri, Some(&body.to_string())).await;
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn kofi() -> Value {
        json!({
            "id": 999,
            "firstName": "Kofi",
            "lastName": "Mensah",
            "dateOfBirth": "1990-03-06",
            "phoneNumber": "0244000000",
            "accountNumber": 111_222_333_345_i64,
            "branch": "Dansoman",
            "occupation": "Trader",
            "snnitNumber": 1_234_567,
            "accounts": [
                { "accountType": "checking" },
                { "accountType": "savings" }
            ]
        })
    }

    #[tokio::test]
    async fn test_create_then_get() -> Result<()> {
        let app = test_app().await?;

        let (status, created) = send_json(&app, "POST", "/accounts", &kofi()).await;
        assert_eq!(status, StatusCode::OK);
        let id = created["id"].as_i64().unwrap();
        assert!(id > 0);
        assert_ne!(id, 999);

        let (status, bytes) = send(&app, "GET", &format!("/accounts/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        let fetched: Value = serde_json::from_slice(&bytes).unwrap();
        for key in [
            "firstName",
            "lastName",
            "dateOfBirth",
            "phoneNumber",
            "accountNumber",
            "branch",
            "occupation",
            "snnitNumber",
        ] {
            assert_eq!(fetched[key], kofi()[key], "field {key}");
        }
        let accounts = fetched["accounts"].as_array().unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0]["accountType"], "checking");
        assert_eq!(accounts[0]["clientId"], id);
        assert!(fetched["createdAt"].is_string());

        Ok(())
    }

    #[tokio::test]
    async fn test_list_returns_all_created() -> Result<()> {
        let app = test_app().await?;

        let (status, bytes) = send(&app, "GET", "/accounts", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_slice::<Value>(&bytes).unwrap(), json!([]));

        for name in ["Ama", "Kwesi", "Efua"] {
            let (status, _) =
                send_json(&app, "POST", "/accounts", &json!({ "firstName": name })).await;
            assert_eq!(status, StatusCode::OK);
        }

        let (_, bytes) = send(&app, "GET", "/accounts", None).await;
        let listed: Value = serde_json::from_slice(&bytes).unwrap();
        let mut names: Vec<_> = listed
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["firstName"].as_str().unwrap().to_string())
            .collect();
        names.sort();
        assert_eq!(names, ["Ama", "Efua", "Kwesi"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_put_uses_path_id() -> Result<()> {
        let app = test_app().await?;
        let (_, created) = send_json(&app, "POST", "/accounts", &kofi()).await;
        let id = created["id"].as_i64().unwrap();

        let mut update = created.clone();
        update["id"] = json!(id + 100);
        update["branch"] = json!("Osu");

        let (status, saved) = send_json(&app, "PUT", &format!("/accounts/{id}"), &update).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(saved["id"], id);
        assert_eq!(saved["branch"], "Osu");

        let (status, _) = send(&app, "GET", &format!("/accounts/{}", id + 100), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, bytes) = send(&app, "GET", &format!("/accounts/{id}"), None).await;
        let fetched: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(fetched["branch"], "Osu");
        let account_ids: Vec<_> = fetched["accounts"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["id"].clone())
            .collect();
        let original_ids: Vec<_> = created["accounts"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["id"].clone())
            .collect();
        assert_eq!(account_ids, original_ids);

        Ok(())
    }

    #[tokio::test]
    async fn test_put_unknown_id_creates() -> Result<()> {
        let app = test_app().await?;

        let (status, saved) =
            send_json(&app, "PUT", "/accounts/55", &json!({ "firstName": "Yaa" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(saved["id"], 55);

        let (status, _) = send(&app, "GET", "/accounts/55", None).await;
        assert_eq!(status, StatusCode::OK);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_then_get() -> Result<()> {
        let app = test_app().await?;
        let (_, created) = send_json(&app, "POST", "/accounts", &kofi()).await;
        let id = created["id"].as_i64().unwrap();

        let (status, bytes) = send(&app, "DELETE", &format!("/accounts/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(bytes.is_empty());

        let (status, bytes) = send(&app, "GET", &format!("/accounts/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let text = String::from_utf8(bytes).unwrap();
        assert!(!text.contains("Kofi"));

        let (_, bytes) = send(&app, "GET", "/accounts", None).await;
        assert_eq!(serde_json::from_slice::<Value>(&bytes).unwrap(), json!([]));

        Ok(())
    }

    #[tokio::test]
    async fn test_request_timestamps_are_ignored() -> Result<()> {
        let app = test_app().await?;
        let stale = json!({
            "firstName": "X",
            "deletedAt": "2020-01-01T00:00:00Z",
            "createdAt": "2000-01-01T00:00:00Z"
        });

        let (status, created) = send_json(&app, "POST", "/accounts", &stale).await;
        assert_eq!(status, StatusCode::OK);
        let id = created["id"].as_i64().unwrap();

        let (status, bytes) = send(&app, "GET", &format!("/accounts/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        let fetched: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(fetched["deletedAt"], Value::Null);
        let created_at = fetched["createdAt"].as_str().unwrap();
        assert!(!created_at.starts_with("2000-"));

        let (status, saved) = send_json(&app, "PUT", &format!("/accounts/{id}"), &stale).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(saved["deletedAt"], Value::Null);
        assert_eq!(saved["createdAt"], created_at);

        let (status, _) = send(&app, "GET", &format!("/accounts/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);

        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_input_is_bad_request() -> Result<()> {
        let app = test_app().await?;

        let (status, _) = send(&app, "POST", "/accounts", Some("{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "PUT", "/accounts/1", Some("[]")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "GET", "/accounts/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "DELETE", "/accounts/0", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        // The server keeps serving after rejecting bad input
        let (status, created) = send_json(&app, "POST", "/accounts", &kofi()).await;
        assert_eq!(status, StatusCode::OK);
        assert!(created["id"].as_i64().unwrap() > 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_cors_allows_only_configured_origin() -> Result<()> {
        let app = test_app().await?;

        let request = Request::builder()
            .uri("/accounts")
            .header(header::ORIGIN, ORIGIN)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static(ORIGIN))
        );

        let request = Request::builder()
            .uri("/accounts")
            .header(header::ORIGIN, "http://evil.example")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none()
        );

        Ok(())
    }

    #[test]
    fn test_router_rejects_invalid_origin() {
        let db = sea_orm::DatabaseConnection::Disconnected;
        let result = router(AppState { db }, "bad\norigin");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
