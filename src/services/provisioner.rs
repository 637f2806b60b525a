use crate::db::{self, schema};
use crate::models::{ConnectionSettings, LogRecord, ProjectSchema};
use crate::utils::error::{AppError, Result};
use sqlx::MySqlConnection;
use std::io::{BufRead, Write};

/// 初始化流程所处阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    ArgsResolved,
    Connected,
    ExistenceChecked,
    Dropped,
    Skipped,
    SchemaCreated,
    TablesCreated,
    LogWritten,
    Terminated,
}

impl Stage {
    /// 流程只能前进，唯一的分支在 ExistenceChecked
    pub fn can_advance_to(self, next: Stage) -> bool {
        use Stage::*;
        matches!(
            (self, next),
            (Start, ArgsResolved)
                | (ArgsResolved, Connected)
                | (Connected, ExistenceChecked)
                | (ExistenceChecked, Dropped)
                | (ExistenceChecked, Skipped)
                | (ExistenceChecked, Terminated)
                | (Dropped, SchemaCreated)
                | (Skipped, SchemaCreated)
                | (SchemaCreated, TablesCreated)
                | (TablesCreated, LogWritten)
                | (LogWritten, Terminated)
        )
    }
}

/// 初始化结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 数据库已（重新）创建
    Created,
    /// 数据库已存在且用户选择保留
    Kept,
}

/// 向用户提问并读取一行回答
pub trait Prompt {
    fn ask(&mut self, question: &str) -> Result<String>;
}

/// 从标准输入读取回答（阻塞）
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn ask(&mut self, question: &str) -> Result<String> {
        let mut stdout = std::io::stdout();
        write!(stdout, "{}", question)?;
        stdout.flush()?;

        let mut answer = String::new();
        std::io::stdin().lock().read_line(&mut answer)?;
        Ok(answer.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// 只有 y / Y 表示确认
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

/// 初始化流程用到的数据库操作
#[allow(async_fn_in_trait)]
pub trait SchemaSession {
    /// 查询 INFORMATION_SCHEMA 判断数据库是否存在
    async fn schema_exists(&mut self, name: &str) -> Result<bool>;
    async fn drop_schema(&mut self, name: &str) -> Result<()>;
    /// 创建数据库并切换到该库
    async fn create_schema(&mut self, name: &str) -> Result<()>;
    async fn create_config_table(&mut self) -> Result<()>;
    async fn create_log_table(&mut self) -> Result<()>;
    /// 写入启动日志
    async fn log_creation_event(&mut self) -> Result<()>;
}

/// 独占一个 MySQL 连接的会话
pub struct MySqlSession {
    conn: MySqlConnection,
}

impl MySqlSession {
    /// 连接 MySQL 服务器，失败不重试
    pub async fn connect(settings: &ConnectionSettings) -> Result<Self> {
        Ok(Self {
            conn: db::connect(settings).await?,
        })
    }

    // USE 不支持预处理语句协议，DDL 统一走文本协议
    async fn execute_ddl(&mut self, sql: &str) -> Result<()> {
        tracing::debug!("DDL: {}", sql.trim());
        sqlx::raw_sql(sql)
            .execute(&mut self.conn)
            .await
            .map_err(|e| {
                tracing::error!("DDL failed: {}", e);
                AppError::Database(e)
            })?;
        Ok(())
    }
}

impl SchemaSession for MySqlSession {
    async fn schema_exists(&mut self, name: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(schema::COUNT_SCHEMA)
            .bind(name)
            .fetch_one(&mut self.conn)
            .await?;
        tracing::info!("Schema {} exists: {}", name, count > 0);
        Ok(count > 0)
    }

    async fn drop_schema(&mut self, name: &str) -> Result<()> {
        self.execute_ddl(&schema::drop_database(name)).await
    }

    async fn create_schema(&mut self, name: &str) -> Result<()> {
        self.execute_ddl(&schema::create_database(name)).await?;
        self.execute_ddl(&schema::use_database(name)).await
    }

    async fn create_config_table(&mut self) -> Result<()> {
        self.execute_ddl(schema::CREATE_CONFIG_TABLE).await
    }

    async fn create_log_table(&mut self) -> Result<()> {
        self.execute_ddl(schema::CREATE_LOG_TABLE).await
    }

    async fn log_creation_event(&mut self) -> Result<()> {
        let id = db::insert_log(&mut self.conn, &LogRecord::bootstrap()).await?;
        tracing::info!("Bootstrap log row {} written", id);
        Ok(())
    }
}

/// 项目数据库初始化器
pub struct Provisioner<S = MySqlSession> {
    session: S,
    schema: ProjectSchema,
    stage: Stage,
}

impl Provisioner<MySqlSession> {
    /// 连接 MySQL 服务器，失败不重试
    pub async fn connect(settings: &ConnectionSettings, schema: ProjectSchema) -> Result<Self> {
        let session = MySqlSession::connect(settings).await?;
        Ok(Self::with_session(session, schema))
    }
}

impl<S: SchemaSession> Provisioner<S> {
    /// 参数已解析、会话已建立
    pub fn with_session(session: S, schema: ProjectSchema) -> Self {
        let mut provisioner = Self {
            session,
            schema,
            stage: Stage::Start,
        };
        provisioner.advance(Stage::ArgsResolved);
        provisioner.advance(Stage::Connected);
        provisioner
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(
            self.stage.can_advance_to(next),
            "invalid transition {:?} -> {:?}",
            self.stage,
            next
        );
        tracing::debug!("Provisioning {}: {:?} -> {:?}", self.schema, self.stage, next);
        self.stage = next;
    }

    /// 执行完整流程
    pub async fn run(&mut self, prompt: &mut dyn Prompt) -> Result<Outcome> {
        let name = self.schema.name();

        let exists = self.session.schema_exists(&name).await?;
        self.advance(Stage::ExistenceChecked);

        if exists {
            if !self.confirm_overwrite(prompt)? {
                println!("Keeping existing project data.");
                tracing::info!("Overwrite of {} declined", name);
                self.advance(Stage::Terminated);
                return Ok(Outcome::Kept);
            }
            println!("Removing existing project data...");
            self.session.drop_schema(&name).await?;
            self.advance(Stage::Dropped);
        } else {
            self.advance(Stage::Skipped);
        }

        println!("Creating database for project: {}", self.schema.project());
        self.session.create_schema(&name).await?;
        self.advance(Stage::SchemaCreated);

        println!("Creating config table: {}", schema::CONFIG_TABLE);
        self.session.create_config_table().await?;
        println!("Creating log table: {}", schema::LOG_TABLE);
        self.session.create_log_table().await?;
        self.advance(Stage::TablesCreated);

        println!("Writing log: database created...");
        self.session.log_creation_event().await?;
        self.advance(Stage::LogWritten);

        println!("\nProject {} database initialized.", self.schema.project());
        self.advance(Stage::Terminated);
        Ok(Outcome::Created)
    }

    /// 询问是否覆盖已有项目
    pub fn confirm_overwrite(&self, prompt: &mut dyn Prompt) -> Result<bool> {
        let answer = prompt.ask(&format!(
            "Project {} already exists, overwrite? [y/n] :",
            self.schema.project()
        ))?;
        println!();
        Ok(is_affirmative(&answer))
    }
}
