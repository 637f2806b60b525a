use serde::{Deserialize, Serialize};

use super::ConfigItem;
use crate::utils::error::{AppError, Result};

pub const RESULT_OK: &str = "OK";
pub const RESULT_ERROR: &str = "ERROR";

/// 操作类型，请求体中的 `op` 字段（不区分大小写）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Config,
    AddConfig,
    UpdateConfig,
    GetConfig,
    DelConfig,
    ClearConfig,
    AddLog,
}

impl Operation {
    pub fn as_str(&self) -> &str {
        match self {
            Operation::Config => "config",
            Operation::AddConfig => "add_config",
            Operation::UpdateConfig => "update_config",
            Operation::GetConfig => "get_config",
            Operation::DelConfig => "del_config",
            Operation::ClearConfig => "clear_config",
            Operation::AddLog => "add_log",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "config" => Some(Operation::Config),
            "add_config" => Some(Operation::AddConfig),
            "update_config" => Some(Operation::UpdateConfig),
            "get_config" => Some(Operation::GetConfig),
            "del_config" => Some(Operation::DelConfig),
            "clear_config" => Some(Operation::ClearConfig),
            "add_log" => Some(Operation::AddLog),
            _ => None,
        }
    }
}

/// 只解析 op 字段，其余字段由具体操作再解析
#[derive(Debug, Deserialize)]
pub struct OperationHeader {
    pub op: String,
}

/// 端口既可以是字符串也可以是数字
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum PortField {
    Number(u16),
    Text(String),
}

impl PortField {
    pub fn parse(&self) -> Result<u16> {
        match self {
            PortField::Number(port) => Ok(*port),
            PortField::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| AppError::InvalidInput(format!("Invalid port: {}", text))),
        }
    }
}

/// 设置数据库连接参数，未提供的字段沿用当前值
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigureRequest {
    pub ip: Option<String>,
    pub port: Option<PortField>,
    pub username: Option<String>,
    pub pwd: Option<String>,
    pub dbname: Option<String>,
}

/// 带记录列表的请求
#[derive(Debug, Clone, Deserialize)]
pub struct RecordsRequest<T> {
    #[serde(default = "Vec::new")]
    pub records: Vec<T>,
}

/// 请求回复
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op: Option<String>,
    pub result: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<ConfigItem>,
}

impl Reply {
    pub fn ok(op: Operation) -> Self {
        Self {
            op: Some(op.as_str().to_string()),
            result: RESULT_OK.to_string(),
            ..Default::default()
        }
    }

    pub fn with_records(op: Operation, records: Vec<ConfigItem>) -> Self {
        Self {
            records,
            ..Self::ok(op)
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            result: RESULT_ERROR.to_string(),
            message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.result == RESULT_OK
    }
}
