use axum::{body::Bytes, extract::State, http::Method};
use std::sync::Arc;

use crate::models::Reply;
use crate::services::ConfigLogService;

/// 处理 `/` 上的请求，只接受 POST
pub async fn root(
    State(service): State<Arc<ConfigLogService>>,
    method: Method,
    body: Bytes,
) -> Reply {
    if method != Method::POST {
        tracing::debug!("Rejected {} request", method);
        return Reply::error("Use POST to call the database service");
    }

    service.handle(&body).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::create_router;
    use crate::models::{ConnectionSettings, RESULT_ERROR};
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use tower::ServiceExt;

    fn app() -> axum::Router {
        create_router(Arc::new(ConfigLogService::new(ConnectionSettings::default())))
    }

    async fn send(request: Request<Body>) -> (StatusCode, Option<String>, Reply) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let origin = response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().unwrap().to_string());
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, origin, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_get_is_rejected() {
        let request = Request::builder()
            .method("GET")
            .uri("/")
            .body(Body::empty())
            .unwrap();
        let (status, origin, reply) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(origin.as_deref(), Some("*"));
        assert_eq!(reply.result, RESULT_ERROR);
        assert!(reply.message.unwrap().contains("POST"));
    }

    #[tokio::test]
    async fn test_empty_post() {
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::empty())
            .unwrap();
        let (_, origin, reply) = send(request).await;
        assert_eq!(origin.as_deref(), Some("*"));
        assert_eq!(reply.result, RESULT_ERROR);
    }

    #[tokio::test]
    async fn test_any_path_is_served() {
        let request = Request::builder()
            .method("POST")
            .uri("/some/other/path")
            .body(Body::from(r#"{"op": "get_config"}"#))
            .unwrap();
        let (status, _, reply) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply.result, RESULT_ERROR);
        assert!(reply.message.unwrap().contains("not connected"));
    }
}
