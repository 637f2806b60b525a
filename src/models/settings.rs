use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::Deserialize;
use std::net::SocketAddr;

use super::ConnectionSettings;
use crate::utils::error::Result;

/// 服务配置文件（可选），不含扩展名
pub const SETTINGS_FILE: &str = "config/config_log";

/// 配置与日志服务的运行参数
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceSettings {
    pub bind_addr: SocketAddr,
    /// `config` 操作未提供的字段从这里取值
    pub database: ConnectionSettings,
}

impl ServiceSettings {
    /// 默认值 < config/config_log.toml < CONFIG_LOG_* 环境变量
    pub fn load() -> Result<Self> {
        let settings = Self::defaults()?
            .add_source(File::with_name(SETTINGS_FILE).required(false))
            .add_source(
                Environment::with_prefix("CONFIG_LOG")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("bind_addr", "127.0.0.1:9000")?
            .set_default("database.host", "127.0.0.1")?
            .set_default("database.port", 3306)?
            .set_default("database.username", "root")?
            .set_default("database.password", "root")?
            .set_default("database.database", "test")?)
    }
}
