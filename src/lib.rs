//! 项目数据库工具
//! 初始化 `db_project_<name>` 数据库，并提供配置表/日志表的读写服务

pub mod api;
pub mod cli;
pub mod db;
pub mod models;
pub mod services;
pub mod utils;

pub use utils::error::{AppError, Result};
