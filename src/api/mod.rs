pub mod handler;

use axum::{
    Json, Router,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::any,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::models::Reply;
use crate::services::ConfigLogService;

/// 创建服务路由，所有路径都交给同一个处理函数
pub fn create_router(service: Arc<ConfigLogService>) -> Router {
    Router::new()
        .route("/", any(handler::root))
        .fallback(handler::root)
        // 请求追踪
        .layer(TraceLayer::new_for_http())
        // 共享状态
        .with_state(service)
}

/// 回复始终为 200 + JSON，结果写在 result 字段中
impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
            Json(self),
        )
            .into_response()
    }
}
