use serde::{Deserialize, Serialize};
use sqlx::mysql::{MySqlConnectOptions, MySqlSslMode};
use std::fmt;

use crate::utils::error::{AppError, Result};

/// 项目数据库名前缀
pub const SCHEMA_PREFIX: &str = "db_project_";

/// 项目数据库名，始终为 `db_project_<项目名>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSchema {
    project: String,
}

impl ProjectSchema {
    /// 由项目名构造，项目名原样使用，只拒绝空字符串
    pub fn for_project(project: &str) -> Result<Self> {
        if project.is_empty() {
            return Err(AppError::InvalidInput("Project name is empty".to_string()));
        }
        Ok(Self {
            project: project.to_string(),
        })
    }

    /// 由数据库名构造，未以 `db_project_` 开头时自动加上前缀
    pub fn from_database_name(name: &str) -> Result<Self> {
        Self::for_project(name.strip_prefix(SCHEMA_PREFIX).unwrap_or(name))
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn name(&self) -> String {
        format!("{}{}", SCHEMA_PREFIX, self.project)
    }
}

impl fmt::Display for ProjectSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", SCHEMA_PREFIX, self.project)
    }
}

/// MySQL 服务器连接参数
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub database: Option<String>,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 33060,
            username: "root".to_string(),
            password: "root".to_string(),
            database: None,
        }
    }
}

impl ConnectionSettings {
    /// 检查参数是否完整，列出所有缺失项
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();
        if matches!(&self.database, Some(db) if db.is_empty()) {
            problems.push("database name is empty");
        }
        if self.host.is_empty() {
            problems.push("host is empty");
        }
        if self.port == 0 {
            problems.push("port is zero");
        }
        if self.username.is_empty() || self.password.is_empty() {
            problems.push("username or password is empty");
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(AppError::InvalidInput(problems.join("; ")))
        }
    }

    /// 构建 sqlx 连接选项（避免密码特殊字符问题）
    pub fn connect_options(&self) -> MySqlConnectOptions {
        let mut opts = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .ssl_mode(MySqlSslMode::Preferred)
            .charset("utf8mb4");

        if let Some(db) = &self.database {
            opts = opts.database(db);
        }

        opts
    }

    /// 用于日志输出的连接串，密码已隐藏
    pub fn display_url(&self) -> String {
        format!(
            "mysql://{}:****@{}:{}/{}",
            self.username,
            self.host,
            self.port,
            self.database.as_deref().unwrap_or("")
        )
    }
}
