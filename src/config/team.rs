use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::agent::AgentConfig;
use super::llm::LlmProvider;
use super::task::TaskConfig;
use crate::error::{ExportError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessType {
    #[default]
    Sequential,
    Hierarchical,
}

/// 未指定 manager agent 时使用的独立 manager 模型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerLlm {
    pub provider: LlmProvider,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeTemplate {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub template_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRuntime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_template: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub templates: Vec<RuntimeTemplate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamConfig {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub process: ProcessType,

    /// hierarchical 模式下担任 manager 的 agent id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_agent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "managerLLM")]
    pub manager_llm: Option<ManagerLlm>,

    #[serde(default)]
    pub agents: Vec<AgentConfig>,
    #[serde(default)]
    pub tasks: Vec<TaskConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<TeamRuntime>,
}

/// hierarchical 模式的 manager：team 内的 agent，或者独立的模型配置
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TeamManager<'a> {
    Agent(&'a AgentConfig),
    Llm(&'a ManagerLlm),
}

impl TeamConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            ExportError::Serialization(format!("Failed to parse team config: {}", e))
        })
    }

    /// 按 id 或 slug 查找 agent，id 优先
    pub fn find_agent(&self, key: &str) -> Option<&AgentConfig> {
        self.agents
            .iter()
            .find(|a| a.id == key)
            .or_else(|| self.agents.iter().find(|a| a.slug == key))
    }

    pub fn require_agent(&self, key: &str) -> Result<&AgentConfig> {
        self.find_agent(key)
            .ok_or_else(|| ExportError::AgentNotFound(key.to_string()))
    }

    /// 分配给指定 agent 的任务，保持原始顺序
    pub fn tasks_for_agent(&self, agent_id: &str) -> Vec<&TaskConfig> {
        self.tasks
            .iter()
            .filter(|t| t.agent_id.as_deref() == Some(agent_id))
            .collect()
    }

    /// 仅 hierarchical 模式有 manager；manager agent 优先于 manager 模型
    pub fn manager(&self) -> Option<TeamManager<'_>> {
        if self.process != ProcessType::Hierarchical {
            return None;
        }
        if let Some(agent) = self
            .manager_agent_id
            .as_deref()
            .and_then(|id| self.agents.iter().find(|a| a.id == id))
        {
            return Some(TeamManager::Agent(agent));
        }
        self.manager_llm.as_ref().map(TeamManager::Llm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_team() -> TeamConfig {
        serde_json::from_value(json!({
            "id": "team-1",
            "name": "Sales Crew",
            "process": "hierarchical",
            "managerLLM": { "provider": "openai", "model": "gpt-4o" },
            "agents": [
                {
                    "id": "agent-a",
                    "name": "Qualifier",
                    "slug": "qualifier",
                    "llm": { "provider": "google", "model": "gemini-2.5-flash", "apiKeyEnvVar": "GEMINI_API_KEY" }
                },
                {
                    "id": "agent-b",
                    "name": "Closer",
                    "slug": "closer",
                    "llm": { "provider": "openai", "model": "gpt-4o", "apiKeyEnvVar": "OPENAI_API_KEY" }
                }
            ],
            "tasks": [
                { "id": "t1", "name": "Qualify", "agentId": "agent-a" },
                { "id": "t2", "name": "Close", "agentId": "agent-b", "contextTasks": ["t1"] },
                { "id": "t3", "name": "Follow up", "agentId": "agent-a" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_find_agent_by_id_or_slug() {
        let team = sample_team();
        assert_eq!(team.find_agent("agent-b").map(|a| a.name.as_str()), Some("Closer"));
        assert_eq!(team.find_agent("qualifier").map(|a| a.id.as_str()), Some("agent-a"));
        assert!(matches!(
            team.require_agent("missing"),
            Err(ExportError::AgentNotFound(_))
        ));
    }

    #[test]
    fn test_tasks_for_agent_keep_order() {
        let team = sample_team();
        let ids: Vec<_> = team
            .tasks_for_agent("agent-a")
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["t1", "t3"]);
    }

    #[test]
    fn test_manager_resolution() {
        let mut team = sample_team();
        assert!(matches!(team.manager(), Some(TeamManager::Llm(llm)) if llm.model == "gpt-4o"));

        team.manager_agent_id = Some("agent-b".to_string());
        assert!(matches!(team.manager(), Some(TeamManager::Agent(a)) if a.slug == "closer"));

        team.process = ProcessType::Sequential;
        assert!(team.manager().is_none());
    }
}
