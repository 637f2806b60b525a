use crate::models::{ConfigItem, ConfigUpdate, LogRecord};
use crate::utils::error::Result;
use sqlx::{Executor, MySql, MySqlPool};

/// 写入一条日志，连接和连接池均可使用
pub async fn insert_log<'e, E>(executor: E, record: &LogRecord) -> Result<u64>
where
    E: Executor<'e, Database = MySql>,
{
    let result = match &record.ts {
        Some(ts) => {
            sqlx::query("INSERT INTO tbl_log (type, detail, ts) VALUES (?, ?, ?)")
                .bind(&record.log_type)
                .bind(&record.detail)
                .bind(ts)
                .execute(executor)
                .await?
        }
        None => {
            sqlx::query("INSERT INTO tbl_log (type, detail) VALUES (?, ?)")
                .bind(&record.log_type)
                .bind(&record.detail)
                .execute(executor)
                .await?
        }
    };

    Ok(result.last_insert_id())
}

/// 配置表仓库
pub struct ConfigRepository<'a> {
    pool: &'a MySqlPool,
}

impl<'a> ConfigRepository<'a> {
    pub fn new(pool: &'a MySqlPool) -> Self {
        Self { pool }
    }

    /// 新增配置项
    pub async fn insert(&self, item: &ConfigItem) -> Result<()> {
        sqlx::query("INSERT INTO tbl_config (name, value, memo) VALUES (?, ?, ?)")
            .bind(&item.name)
            .bind(&item.value)
            .bind(&item.memo)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// 更新配置项，可同时改名
    pub async fn update(&self, update: &ConfigUpdate) -> Result<u64> {
        let result = sqlx::query("UPDATE tbl_config SET name = ?, value = ?, memo = ? WHERE name = ?")
            .bind(&update.new_name)
            .bind(&update.value)
            .bind(&update.memo)
            .bind(&update.name)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// 获取所有配置项
    pub async fn find_all(&self) -> Result<Vec<ConfigItem>> {
        let items = sqlx::query_as::<_, ConfigItem>(
            "SELECT name, value, memo FROM tbl_config ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(items)
    }

    /// 根据名称获取配置项
    pub async fn find_by_name(&self, name: &str) -> Result<Option<ConfigItem>> {
        let item = sqlx::query_as::<_, ConfigItem>(
            "SELECT name, value, memo FROM tbl_config WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;
        Ok(item)
    }

    /// 删除配置项
    pub async fn delete(&self, name: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM tbl_config WHERE name = ?")
            .bind(name)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// 清空配置表
    pub async fn clear(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM tbl_config")
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

/// 日志表仓库
pub struct LogRepository<'a> {
    pool: &'a MySqlPool,
}

impl<'a> LogRepository<'a> {
    pub fn new(pool: &'a MySqlPool) -> Self {
        Self { pool }
    }

    /// 添加日志
    pub async fn add(&self, record: &LogRecord) -> Result<u64> {
        insert_log(self.pool, record).await
    }
}
