/// 配置表名
pub const CONFIG_TABLE: &str = "tbl_config";

/// 日志表名
pub const LOG_TABLE: &str = "tbl_log";

/// 配置表的 CREATE TABLE 语句
pub const CREATE_CONFIG_TABLE: &str = r#"
CREATE TABLE tbl_config (
    name VARCHAR(20) NOT NULL PRIMARY KEY,
    value VARCHAR(20) NOT NULL,
    memo VARCHAR(100) NOT NULL DEFAULT ''
)
"#;

/// 日志表的 CREATE TABLE 语句，ts 精确到毫秒
pub const CREATE_LOG_TABLE: &str = r#"
CREATE TABLE tbl_log (
    id INT NOT NULL AUTO_INCREMENT PRIMARY KEY,
    type VARCHAR(10) NOT NULL,
    detail VARCHAR(100) NOT NULL,
    ts TIMESTAMP(3) NOT NULL DEFAULT CURRENT_TIMESTAMP(3)
)
"#;

/// 判断数据库是否存在
pub const COUNT_SCHEMA: &str =
    "SELECT COUNT(*) FROM INFORMATION_SCHEMA.SCHEMATA WHERE SCHEMA_NAME = ?";

/// 用反引号包裹标识符，内部的反引号双写
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

pub fn drop_database(name: &str) -> String {
    format!("DROP DATABASE IF EXISTS {}", quote_identifier(name))
}

pub fn create_database(name: &str) -> String {
    format!("CREATE DATABASE {}", quote_identifier(name))
}

pub fn use_database(name: &str) -> String {
    format!("USE {}", quote_identifier(name))
}
