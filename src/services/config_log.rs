use crate::db::{self, ConfigRepository, LogRepository};
use crate::models::{
    ConfigItem, ConfigUpdate, ConfigureRequest, ConnectionSettings, LogRecord, Operation,
    OperationHeader, ProjectSchema, RecordsRequest, Reply,
};
use crate::utils::error::{AppError, Result};
use serde::de::DeserializeOwned;
use sqlx::MySqlPool;
use tokio::sync::RwLock;

struct ServiceState {
    settings: ConnectionSettings,
    pool: Option<MySqlPool>,
}

/// 配置与日志服务，对已初始化的项目库读写 tbl_config / tbl_log
pub struct ConfigLogService {
    state: RwLock<ServiceState>,
}

impl ConfigLogService {
    /// 初始为未连接状态，需先执行 `config` 操作
    pub fn new(settings: ConnectionSettings) -> Self {
        Self {
            state: RwLock::new(ServiceState {
                settings,
                pool: None,
            }),
        }
    }

    /// 当前连接参数
    pub async fn settings(&self) -> ConnectionSettings {
        self.state.read().await.settings.clone()
    }

    pub async fn is_connected(&self) -> bool {
        self.state.read().await.pool.is_some()
    }

    /// 处理一个请求体，任何错误都转为 ERROR 回复
    pub async fn handle(&self, body: &[u8]) -> Reply {
        if body.is_empty() {
            return Reply::error("Request body is empty, send a JSON operation");
        }

        let header: OperationHeader = match serde_json::from_slice(body) {
            Ok(header) => header,
            Err(e) => return Reply::error(format!("JSON parse error: {}", e)),
        };

        let Some(op) = Operation::from_str(&header.op) else {
            return Reply::error(format!("Unsupported 'op' value: '{}'", header.op));
        };

        tracing::debug!("Handling operation {}", op.as_str());
        match self.dispatch(op, body).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("Operation {} failed: {}", op.as_str(), e);
                Reply::error(e.to_string())
            }
        }
    }

    async fn dispatch(&self, op: Operation, body: &[u8]) -> Result<Reply> {
        match op {
            Operation::Config => {
                self.configure(serde_json::from_slice(body)?).await?;
            }
            Operation::AddConfig => {
                let pool = self.pool().await?;
                let records = non_empty(parse_records::<Vec<String>>(body)?)?;
                Self::add_config(&pool, records).await?;
            }
            Operation::UpdateConfig => {
                let pool = self.pool().await?;
                let records = non_empty(parse_records::<Vec<String>>(body)?)?;
                Self::update_config(&pool, records).await?;
            }
            Operation::GetConfig => {
                let pool = self.pool().await?;
                let names = parse_records::<String>(body)?;
                let items = Self::get_config(&pool, names).await?;
                return Ok(Reply::with_records(op, items));
            }
            Operation::DelConfig => {
                let pool = self.pool().await?;
                let names = non_empty(parse_records::<String>(body)?)?;
                Self::del_config(&pool, names).await?;
            }
            Operation::ClearConfig => {
                let pool = self.pool().await?;
                let removed = ConfigRepository::new(&pool).clear().await?;
                tracing::info!("Cleared {} config items", removed);
            }
            Operation::AddLog => {
                let pool = self.pool().await?;
                let records = non_empty(parse_records::<Vec<String>>(body)?)?;
                Self::add_log(&pool, records).await?;
            }
        }

        Ok(Reply::ok(op))
    }

    /// 设置数据库连接参数，成功连接后才替换当前连接
    pub async fn configure(&self, req: ConfigureRequest) -> Result<()> {
        let settings = self.merge_settings(req).await?;
        settings.validate()?;

        let pool = db::connect_pool(&settings).await?;
        tracing::info!("Connected to {}", settings.display_url());

        // 释放写锁后再关闭旧连接池，关闭会等待进行中的请求
        if let Some(old) = self.install_pool(settings, pool).await {
            old.close().await;
        }
        Ok(())
    }

    /// 替换当前连接，返回旧连接池
    async fn install_pool(
        &self,
        settings: ConnectionSettings,
        pool: MySqlPool,
    ) -> Option<MySqlPool> {
        let mut state = self.state.write().await;
        state.settings = settings;
        state.pool.replace(pool)
    }

    /// 未提供的参数使用原先参数，数据库名补全 db_project_ 前缀
    async fn merge_settings(&self, req: ConfigureRequest) -> Result<ConnectionSettings> {
        let current = self.settings().await;

        let port = match req.port {
            Some(port) => port.parse()?,
            None => current.port,
        };
        let dbname = given(req.dbname)
            .or(current.database)
            .unwrap_or_default();

        Ok(ConnectionSettings {
            host: given(req.ip).unwrap_or(current.host),
            port,
            username: given(req.username).unwrap_or(current.username),
            password: given(req.pwd).unwrap_or(current.password),
            database: Some(ProjectSchema::from_database_name(&dbname)?.name()),
        })
    }

    async fn pool(&self) -> Result<MySqlPool> {
        self.state.read().await.pool.clone().ok_or_else(|| {
            AppError::NotConnected(
                "database is not connected, use the 'config' operation first".to_string(),
            )
        })
    }

    /// 逐条插入，遇到错误立即返回
    pub async fn add_config(pool: &MySqlPool, records: Vec<Vec<String>>) -> Result<()> {
        let repo = ConfigRepository::new(pool);
        for fields in records {
            let item = ConfigItem::try_from(fields)?;
            repo.insert(&item).await?;
        }
        Ok(())
    }

    pub async fn update_config(pool: &MySqlPool, records: Vec<Vec<String>>) -> Result<()> {
        let repo = ConfigRepository::new(pool);
        for fields in records {
            let update = ConfigUpdate::try_from(fields)?;
            let affected = repo.update(&update).await?;
            tracing::debug!("Updated config {}: {} rows", update.name, affected);
        }
        Ok(())
    }

    /// 名称列表为空时返回全部配置，不存在的名称返回占位条目
    pub async fn get_config(pool: &MySqlPool, names: Vec<String>) -> Result<Vec<ConfigItem>> {
        let repo = ConfigRepository::new(pool);
        if names.is_empty() {
            return repo.find_all().await;
        }

        let mut items = Vec::with_capacity(names.len());
        for name in names {
            let item = repo
                .find_by_name(&name)
                .await?
                .unwrap_or_else(|| ConfigItem::missing(&name));
            items.push(item);
        }
        Ok(items)
    }

    pub async fn del_config(pool: &MySqlPool, names: Vec<String>) -> Result<()> {
        let repo = ConfigRepository::new(pool);
        for name in names {
            repo.delete(&name).await?;
        }
        Ok(())
    }

    pub async fn add_log(pool: &MySqlPool, records: Vec<Vec<String>>) -> Result<()> {
        let repo = LogRepository::new(pool);
        for fields in records {
            let record = LogRecord::try_from(fields)?;
            repo.add(&record).await?;
        }
        Ok(())
    }
}

fn parse_records<T: DeserializeOwned>(body: &[u8]) -> Result<Vec<T>> {
    let req: RecordsRequest<T> = serde_json::from_slice(body)?;
    Ok(req.records)
}

fn non_empty<T>(records: Vec<T>) -> Result<Vec<T>> {
    if records.is_empty() {
        return Err(AppError::InvalidInput("request contains no records".to_string()));
    }
    Ok(records)
}

fn given(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RESULT_ERROR;
    use sqlx::mysql::MySqlPoolOptions;

    fn service() -> ConfigLogService {
        ConfigLogService::new(ConnectionSettings {
            host: "127.0.0.1".to_string(),
            port: 3306,
            database: Some("test".to_string()),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_empty_body() {
        let reply = service().handle(b"").await;
        assert_eq!(reply.result, RESULT_ERROR);
        assert!(reply.op.is_none());
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let reply = service().handle(b"{not json").await;
        assert_eq!(reply.result, RESULT_ERROR);
        assert!(reply.message.unwrap().starts_with("JSON parse error"));
    }

    #[tokio::test]
    async fn test_unknown_operation() {
        let reply = service().handle(br#"{"op": "drop_everything"}"#).await;
        assert_eq!(reply.result, RESULT_ERROR);
        assert!(reply.message.unwrap().contains("drop_everything"));
    }

    #[tokio::test]
    async fn test_table_operation_requires_connection() {
        let svc = service();
        assert!(!svc.is_connected().await);
        for body in [
            r#"{"op": "add_config", "records": [["a", "1"]]}"#,
            r#"{"op": "GET_CONFIG"}"#,
            r#"{"op": "clear_config"}"#,
            r#"{"op": "add_log", "records": [["info", "x"]]}"#,
        ] {
            let reply = svc.handle(body.as_bytes()).await;
            assert!(!reply.is_ok(), "{}", body);
            assert!(reply.message.unwrap().contains("not connected"));
        }
    }

    #[tokio::test]
    async fn test_merge_keeps_current_values() {
        let svc = service();
        let merged = svc
            .merge_settings(ConfigureRequest {
                ip: Some(String::new()),
                pwd: Some("secret".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(merged.host, "127.0.0.1");
        assert_eq!(merged.port, 3306);
        assert_eq!(merged.password, "secret");
        assert_eq!(merged.database.as_deref(), Some("db_project_test"));
    }

    #[tokio::test]
    async fn test_merge_rejects_bad_port() {
        let req: ConfigureRequest =
            serde_json::from_str(r#"{"op": "config", "port": "33o6", "dbname": "db_project_x"}"#)
                .unwrap();
        assert!(matches!(
            service().merge_settings(req).await,
            Err(AppError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_configure_validation_happens_before_connect() {
        let svc = service();
        let reply = svc.handle(br#"{"op": "config", "port": 0, "dbname": "demo"}"#).await;
        assert_eq!(reply.result, RESULT_ERROR);
        assert!(reply.message.unwrap().contains("port is zero"));
        assert!(!svc.is_connected().await);
        assert_eq!(svc.settings().await.database.as_deref(), Some("test"));
    }

    #[tokio::test]
    async fn test_install_pool_releases_lock_before_close() {
        let svc = service();
        let settings = svc.settings().await;
        let lazy = || MySqlPoolOptions::new().connect_lazy_with(settings.connect_options());

        assert!(svc.install_pool(settings.clone(), lazy()).await.is_none());
        assert!(svc.is_connected().await);

        let old = svc.install_pool(settings.clone(), lazy()).await.unwrap();
        // 旧连接池尚未关闭时，状态锁已可用
        assert!(!old.is_closed());
        assert!(svc.state.try_write().is_ok());
        old.close().await;
        assert!(svc.is_connected().await);
    }

    #[test]
    fn test_non_empty() {
        assert!(non_empty::<String>(Vec::new()).is_err());
        assert_eq!(non_empty(vec![1]).unwrap(), vec![1]);
    }
}
