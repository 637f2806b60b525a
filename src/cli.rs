use clap::Parser;

use crate::models::{ConnectionSettings, ProjectSchema};
use crate::services::Prompt;
use crate::utils::error::Result;

/// 项目数据库初始化脚本
///
/// 依次创建 db_project_<PROJECT>、配置表 tbl_config 和日志表 tbl_log。
#[derive(Parser, Debug, Default)]
#[clap(author, version, about, long_about = None)]
pub struct ProvisionArgs {
    /// Project name, asked for interactively when omitted
    #[clap(allow_hyphen_values = true)]
    pub project: Option<String>,

    /// MySQL user, only used together with PASSWORD
    #[clap(allow_hyphen_values = true)]
    pub user: Option<String>,

    /// MySQL password
    #[clap(allow_hyphen_values = true)]
    pub password: Option<String>,

    /// MySQL host, only used together with PORT
    #[clap(allow_hyphen_values = true)]
    pub host: Option<String>,

    /// MySQL port
    pub port: Option<u16>,

    /// 第 5 个之后的参数忽略
    #[clap(hide = true, num_args = 0.., allow_hyphen_values = true)]
    pub ignored: Vec<String>,
}

impl ProvisionArgs {
    /// 用户名和密码、主机和端口必须成对提供，否则使用默认值
    pub fn resolve(&self) -> ConnectionSettings {
        let mut settings = ConnectionSettings::default();

        if let (Some(user), Some(password)) = (&self.user, &self.password) {
            settings.username = user.clone();
            settings.password = password.clone();
        }

        if let (Some(host), Some(port)) = (&self.host, self.port) {
            settings.host = host.clone();
            settings.port = port;
        }

        settings
    }

    /// 未提供项目名时向用户询问
    pub fn project_schema(&self, prompt: &mut dyn Prompt) -> Result<ProjectSchema> {
        match &self.project {
            Some(project) => ProjectSchema::for_project(project),
            None => ProjectSchema::for_project(&prompt.ask("Project name: ")?),
        }
    }
}
