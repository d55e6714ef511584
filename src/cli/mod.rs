use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::archive::write_archive;
use crate::config::{ProcessType, TeamConfig, TeamManager};
use crate::error::Result;
use crate::export::{export_runtime, export_team_json, ExportOptions, ExportTarget};
use crate::flow::FlowData;

/// 一次命令行导出请求
#[derive(Clone, Debug)]
pub struct ExportRequest {
    /// agent 的 id 或 slug
    pub agent: String,
    pub target: ExportTarget,
    pub flow: Option<PathBuf>,
    pub out_dir: PathBuf,
    pub options: ExportOptions,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSummary {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub provider: String,
    pub model: String,
    pub tools: usize,
    pub tasks: usize,
    /// hierarchical team 的 manager agent
    pub manager: bool,
}

pub async fn load_team(path: &Path) -> Result<TeamConfig> {
    let raw = tokio::fs::read_to_string(path).await?;
    TeamConfig::from_json(&raw)
}

pub async fn load_flow(path: &Path) -> Result<FlowData> {
    let raw = tokio::fs::read_to_string(path).await?;
    FlowData::from_json(&raw)
}

/// 导出单个 agent 并写出归档，返回归档路径
///
/// 生成的配置携带整个 team 的任务列表，任务之间的依赖可能跨 agent。
pub async fn run_export(team: &TeamConfig, request: &ExportRequest) -> Result<PathBuf> {
    let agent = team.require_agent(&request.agent)?;

    let flow = match &request.flow {
        Some(path) => Some(load_flow(path).await?),
        None => None,
    };
    if let Some(flow) = &flow {
        for diagnostic in flow.diagnostics() {
            tracing::warn!(agent = %agent.slug, "{}", diagnostic);
        }
    }

    let bundle = export_runtime(request.target, agent, &team.tasks, flow.as_ref(), request.options)?;
    let path = request.out_dir.join(&bundle.file_name);
    write_archive(bundle.files, &path).await?;
    Ok(path)
}

/// 写出 `team-<id>.json`，返回文件路径
pub async fn write_team_json(team: &TeamConfig, out_dir: &Path) -> Result<PathBuf> {
    let file = export_team_json(team)?;
    tokio::fs::create_dir_all(out_dir).await?;
    let path = out_dir.join(&file.path);
    tokio::fs::write(&path, file.contents).await?;
    tracing::info!(path = %path.display(), "team snapshot written");
    Ok(path)
}

pub fn agent_summaries(team: &TeamConfig) -> Vec<AgentSummary> {
    let manager_id = match team.manager() {
        Some(TeamManager::Agent(agent)) => Some(agent.id.as_str()),
        _ => None,
    };
    team.agents
        .iter()
        .map(|agent| AgentSummary {
            id: agent.id.clone(),
            slug: agent.slug.clone(),
            name: agent.name.clone(),
            provider: agent.llm.provider.to_string(),
            model: agent.llm.model.clone(),
            tools: agent.tools.len(),
            tasks: team.tasks_for_agent(&agent.id).len(),
            manager: manager_id == Some(agent.id.as_str()),
        })
        .collect()
}

/// `list` 的标题行：team 名称、流程类型，以及 hierarchical 模式下的 manager
pub fn describe_team(team: &TeamConfig) -> String {
    let process = match team.process {
        ProcessType::Sequential => "sequential",
        ProcessType::Hierarchical => "hierarchical",
    };
    let mut line = format!("{} ({})", team.name, process);
    match team.manager() {
        Some(TeamManager::Agent(agent)) => line.push_str(&format!(", manager agent `{}`", agent.slug)),
        Some(TeamManager::Llm(llm)) => {
            line.push_str(&format!(", manager model {}/{}", llm.provider, llm.model))
        }
        None => {}
    }
    line
}
