//! 项目数据库初始化脚本
//! 用法: project-init [项目名] [用户名] [密码] [主机] [端口]

use anyhow::Context;
use clap::Parser;
use project_db::cli::ProvisionArgs;
use project_db::services::{Provisioner, StdinPrompt};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const START_BANNER: &str = "\n------------------- Project database init: start -------------------\n";
const END_BANNER: &str = "\n------------------- Project database init: end -------------------\n\n";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // 初始化日志，输出到 stderr，避免与提示信息混在一起
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "project_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    println!("{}", START_BANNER);

    let args = ProvisionArgs::parse();
    let mut prompt = StdinPrompt;

    let schema = args
        .project_schema(&mut prompt)
        .context("Failed to read project name")?;
    println!("Project name: {}", schema.project());

    let settings = args.resolve();
    let mut provisioner = Provisioner::connect(&settings, schema)
        .await
        .context("Failed to connect to MySQL")?;

    let outcome = provisioner
        .run(&mut prompt)
        .await
        .context("Failed to initialize project database")?;
    tracing::info!("Provisioning finished: {:?}", outcome);

    println!("{}", END_BANNER);
    Ok(())
}
