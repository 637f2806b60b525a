//! 需要可用的 MySQL 服务器，默认忽略：
//! PROJECT_DB_TEST_HOST=127.0.0.1 PROJECT_DB_TEST_PORT=3306 cargo test -- --ignored

use project_db::db::{self, schema};
use project_db::models::{ConnectionSettings, ProjectSchema};
use project_db::services::{Outcome, Prompt, Provisioner, Stage};
use project_db::Result;
use sqlx::MySqlPool;

const LIST_TABLES: &str = "SELECT TABLE_NAME FROM INFORMATION_SCHEMA.TABLES \
     WHERE TABLE_SCHEMA = ? AND TABLE_TYPE = 'BASE TABLE' ORDER BY TABLE_NAME";

struct Answer(&'static str);

impl Prompt for Answer {
    fn ask(&mut self, _question: &str) -> Result<String> {
        Ok(self.0.to_string())
    }
}

fn test_settings() -> ConnectionSettings {
    let env = |key: &str, default: &str| std::env::var(key).unwrap_or_else(|_| default.to_string());
    ConnectionSettings {
        host: env("PROJECT_DB_TEST_HOST", "127.0.0.1"),
        port: env("PROJECT_DB_TEST_PORT", "3306").parse().unwrap(),
        username: env("PROJECT_DB_TEST_USER", "root"),
        password: env("PROJECT_DB_TEST_PASSWORD", "root"),
        database: None,
    }
}

async fn provision(project: &str, answer: &'static str) -> (Outcome, Stage) {
    let schema = ProjectSchema::for_project(project).unwrap();
    let mut provisioner = Provisioner::connect(&test_settings(), schema).await.unwrap();
    let outcome = provisioner.run(&mut Answer(answer)).await.unwrap();
    (outcome, provisioner.stage())
}

async fn tables(pool: &MySqlPool, name: &str) -> Vec<String> {
    sqlx::query_scalar(LIST_TABLES)
        .bind(name)
        .fetch_all(pool)
        .await
        .unwrap()
}

async fn log_rows(pool: &MySqlPool, name: &str) -> Vec<(String, String)> {
    sqlx::query_as(&format!(
        "SELECT type, detail FROM {}.tbl_log ORDER BY id",
        schema::quote_identifier(name)
    ))
    .fetch_all(pool)
    .await
    .unwrap()
}

async fn drop_schema(pool: &MySqlPool, name: &str) {
    sqlx::raw_sql(&schema::drop_database(name))
        .execute(pool)
        .await
        .unwrap();
}

#[tokio::test]
#[ignore]
async fn test_fresh_project_is_created() {
    let pool = db::connect_pool(&test_settings()).await.unwrap();
    let name = "db_project_it_fresh";
    drop_schema(&pool, name).await;

    let (outcome, stage) = provision("it_fresh", "n").await;
    assert_eq!(outcome, Outcome::Created);
    assert_eq!(stage, Stage::Terminated);

    assert_eq!(tables(&pool, name).await, vec!["tbl_config", "tbl_log"]);
    assert_eq!(
        log_rows(&pool, name).await,
        vec![("INFO".to_string(), "database created".to_string())]
    );

    drop_schema(&pool, name).await;
}

#[tokio::test]
#[ignore]
async fn test_existing_project_overwrite() {
    let pool = db::connect_pool(&test_settings()).await.unwrap();
    let name = "db_project_it_overwrite";
    drop_schema(&pool, name).await;

    provision("it_overwrite", "n").await;
    sqlx::query(&format!(
        "INSERT INTO {}.tbl_config (name, value) VALUES ('mode', 'fast')",
        schema::quote_identifier(name)
    ))
    .execute(&pool)
    .await
    .unwrap();

    // 拒绝覆盖：原有数据保留
    let (outcome, _) = provision("it_overwrite", "N").await;
    assert_eq!(outcome, Outcome::Kept);
    let count: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM {}.tbl_config",
        schema::quote_identifier(name)
    ))
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);

    // 确认覆盖：得到全新的库
    let (outcome, _) = provision("it_overwrite", "Y").await;
    assert_eq!(outcome, Outcome::Created);
    assert_eq!(tables(&pool, name).await, vec!["tbl_config", "tbl_log"]);
    let count: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM {}.tbl_config",
        schema::quote_identifier(name)
    ))
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 0);
    assert_eq!(log_rows(&pool, name).await.len(), 1);

    drop_schema(&pool, name).await;
}
