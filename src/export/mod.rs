pub mod fileset;
pub mod ident;
pub mod node;
pub mod pocketflow;
pub mod team;

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::archive;
use crate::config::{AgentConfig, TaskConfig};
use crate::error::{ExportError, Result};
use crate::flow::FlowData;
use crate::utils::validation::ConfigValidator;

pub use fileset::{FileSet, GeneratedFile};
pub use node::{export_node_runtime, NodeRuntimeExporter};
pub use pocketflow::{export_pocketflow_runtime, PocketFlowExporter};
pub use team::export_team_json;

/// 导出目标运行时
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportTarget {
    /// Node.js HTTP 服务
    #[value(name = "node")]
    #[serde(rename = "node")]
    NodeRuntime,
    /// Python PocketFlow 脚本
    #[value(name = "pocketflow")]
    PocketFlow,
}

impl ExportTarget {
    pub fn suffix(&self) -> &'static str {
        match self {
            ExportTarget::NodeRuntime => "runtime",
            ExportTarget::PocketFlow => "pocketflow",
        }
    }

    /// 建议的归档名（不含扩展名）：`<slug>-runtime` / `<slug>-pocketflow`
    pub fn archive_stem(&self, slug: &str) -> String {
        format!("{}-{}", slug, self.suffix())
    }

    pub fn archive_file_name(&self, slug: &str) -> String {
        format!("{}.{}", self.archive_stem(slug), archive::ARCHIVE_EXTENSION)
    }
}

impl fmt::Display for ExportTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportTarget::NodeRuntime => f.write_str("node"),
            ExportTarget::PocketFlow => f.write_str("pocketflow"),
        }
    }
}

impl FromStr for ExportTarget {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "node" | "runtime" => Ok(ExportTarget::NodeRuntime),
            "pocketflow" | "python" => Ok(ExportTarget::PocketFlow),
            other => Err(ExportError::Other(anyhow::anyhow!(
                "unknown export target `{}`",
                other
            ))),
        }
    }
}

/// 导出选项
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// 导出前校验 slug、模型字段和供应商；默认关闭，缺陷留给生成的工程在运行时暴露
    pub strict: bool,
}

impl ExportOptions {
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

/// 运行时导出器
///
/// 实现必须是输入的纯函数：相同输入得到逐字节相同的文件集合。
pub trait RuntimeExporter: Send + Sync {
    fn target(&self) -> ExportTarget;

    fn export(
        &self,
        agent: &AgentConfig,
        tasks: &[TaskConfig],
        flow: Option<&FlowData>,
    ) -> Result<FileSet>;
}

pub fn exporter_for(target: ExportTarget) -> Box<dyn RuntimeExporter> {
    match target {
        ExportTarget::NodeRuntime => Box::new(NodeRuntimeExporter),
        ExportTarget::PocketFlow => Box::new(PocketFlowExporter),
    }
}

/// 一次导出的结果：目标、建议的归档文件名和文件集合
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBundle {
    pub target: ExportTarget,
    pub file_name: String,
    pub files: FileSet,
}

impl ExportBundle {
    pub fn to_archive(&self) -> Result<Vec<u8>> {
        archive::assemble(&self.files)
    }
}

#[tracing::instrument(skip_all, fields(agent = %agent.slug, target = %target))]
pub fn export_runtime(
    target: ExportTarget,
    agent: &AgentConfig,
    tasks: &[TaskConfig],
    flow: Option<&FlowData>,
    options: ExportOptions,
) -> Result<ExportBundle> {
    if options.strict {
        ConfigValidator::validate_for_export(agent, target)?;
    }

    let files = exporter_for(target).export(agent, tasks, flow)?;
    tracing::debug!(files = files.len(), bytes = files.total_bytes(), "runtime exported");

    Ok(ExportBundle {
        target,
        file_name: target.archive_file_name(&agent.slug),
        files,
    })
}
