use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::utils::error::{AppError, Result};

/// 启动日志条目
pub const BOOTSTRAP_LOG_TYPE: &str = "INFO";
pub const BOOTSTRAP_LOG_DETAIL: &str = "database created";

/// 查询不到配置项时的占位值
pub const MISSING_CONFIG_VALUE: &str = "***Key doesn't exist.***";

// ts 必须精确到毫秒，如 2022-04-20 19:00:00.000
static LOG_TS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d{3}$").unwrap());

/// tbl_config 中的一行
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct ConfigItem {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub memo: String,
}

impl ConfigItem {
    /// 查询结果中代替不存在的配置项
    pub fn missing(name: &str) -> Self {
        Self {
            name: format!("***{}***", name),
            value: MISSING_CONFIG_VALUE.to_string(),
            memo: String::new(),
        }
    }
}

/// 新增配置：[name, value] 或 [name, value, memo]
impl TryFrom<Vec<String>> for ConfigItem {
    type Error = AppError;

    fn try_from(fields: Vec<String>) -> Result<Self> {
        let mut fields = fields.into_iter();
        match (fields.next(), fields.next(), fields.next(), fields.next()) {
            (Some(name), Some(value), memo, None) => Ok(Self {
                name,
                value,
                memo: memo.unwrap_or_default(),
            }),
            _ => Err(AppError::InvalidInput(
                "A config record must have 2 or 3 fields".to_string(),
            )),
        }
    }
}

/// 更新配置：[name, value]、[name, value, memo] 或 [name, value, memo, new_name]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigUpdate {
    pub name: String,
    pub new_name: String,
    pub value: String,
    pub memo: String,
}

impl TryFrom<Vec<String>> for ConfigUpdate {
    type Error = AppError;

    fn try_from(fields: Vec<String>) -> Result<Self> {
        let mut fields = fields.into_iter();
        match (
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
        ) {
            (Some(name), Some(value), memo, new_name, None) => Ok(Self {
                new_name: new_name.unwrap_or_else(|| name.clone()),
                name,
                value,
                memo: memo.unwrap_or_default(),
            }),
            _ => Err(AppError::InvalidInput(
                "An update record must have 2, 3 or 4 fields".to_string(),
            )),
        }
    }
}

/// 新增日志：[type, detail] 或 [type, detail, ts]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub log_type: String,
    pub detail: String,
    pub ts: Option<NaiveDateTime>,
}

impl LogRecord {
    pub fn new(log_type: &str, detail: &str) -> Self {
        Self {
            log_type: log_type.to_uppercase(),
            detail: detail.to_string(),
            ts: None,
        }
    }

    pub fn bootstrap() -> Self {
        Self::new(BOOTSTRAP_LOG_TYPE, BOOTSTRAP_LOG_DETAIL)
    }
}

impl TryFrom<Vec<String>> for LogRecord {
    type Error = AppError;

    fn try_from(fields: Vec<String>) -> Result<Self> {
        let mut fields = fields.into_iter();
        match (fields.next(), fields.next(), fields.next(), fields.next()) {
            (Some(log_type), Some(detail), ts, None) => {
                let ts = ts.map(|ts| parse_log_ts(&ts)).transpose()?;
                Ok(Self {
                    ts,
                    ..Self::new(&log_type, &detail)
                })
            }
            _ => Err(AppError::InvalidInput(
                "A log record must have 2 or 3 fields".to_string(),
            )),
        }
    }
}

fn parse_log_ts(ts: &str) -> Result<NaiveDateTime> {
    if !LOG_TS_PATTERN.is_match(ts) {
        return Err(AppError::InvalidInput(format!(
            "Log timestamp must look like 2022-04-20 19:00:00.000, got: {}",
            ts
        )));
    }
    NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S%.f")
        .map_err(|e| AppError::InvalidInput(format!("Invalid log timestamp {}: {}", ts, e)))
}
