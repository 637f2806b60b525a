//! 配置与日志服务
//! 通过 POST / 读写项目库中的 tbl_config 和 tbl_log

use anyhow::Context;
use project_db::api;
use project_db::models::ServiceSettings;
use project_db::services::ConfigLogService;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "project_db=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting config/log service...");

    let settings = ServiceSettings::load().context("Failed to load service settings")?;
    tracing::info!(
        "Default database connection: {}",
        settings.database.display_url()
    );

    // 数据库连接由客户端的 config 操作建立
    let service = Arc::new(ConfigLogService::new(settings.database));
    let app = api::create_router(service);

    tracing::info!("Server listening on {}", settings.bind_addr);

    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", settings.bind_addr))?;

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
