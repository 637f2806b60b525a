pub mod repository;
pub mod schema;

use crate::models::ConnectionSettings;
use crate::utils::error::{AppError, Result};
use sqlx::{Connection, MySqlConnection, MySqlPool, mysql::MySqlPoolOptions};

pub use repository::*;

/// 建立单个连接，供初始化脚本独占使用
pub async fn connect(settings: &ConnectionSettings) -> Result<MySqlConnection> {
    tracing::info!("Connecting to {}", settings.display_url());

    let conn = MySqlConnection::connect_with(&settings.connect_options())
        .await
        .map_err(|e| {
            tracing::error!("MySQL connection failed: {}", e);
            AppError::Connection(format!("{}: {}", settings.display_url(), e))
        })?;

    tracing::debug!("MySQL connection established");
    Ok(conn)
}

/// 创建连接池并测试连通性
pub async fn connect_pool(settings: &ConnectionSettings) -> Result<MySqlPool> {
    tracing::info!("Opening pool for {}", settings.display_url());

    let pool = MySqlPoolOptions::new()
        .max_connections(10)
        .connect_with(settings.connect_options())
        .await
        .map_err(|e| {
            tracing::error!("MySQL connection failed: {}", e);
            AppError::Connection(format!("{}: {}", settings.display_url(), e))
        })?;

    // 测试简单查询
    sqlx::query("SELECT 1").execute(&pool).await.map_err(|e| {
        tracing::error!("MySQL query test failed: {}", e);
        AppError::Connection(format!("Query test failed: {}", e))
    })?;

    Ok(pool)
}
