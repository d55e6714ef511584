use serde::{Deserialize, Serialize};

use super::knowledge::KnowledgeConfig;
use super::llm::LlmConfig;
use super::tool::Tool;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    #[default]
    Draft,
    Active,
    Archived,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalPrompt {
    pub id: String,
    pub label: String,
    pub key: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_index: Option<u32>,
}

/// Agent 配置快照
///
/// 字段名与编辑界面持久化的 JSON 保持一致（camelCase）。`slug` 会被直接拼进
/// 生成的文件名和源码里，调用方需保证它是标识符安全的；宽松模式下导出器不再校验。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,

    /// CrewAI 角色与目标
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub goal: String,

    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub status: AgentStatus,
    #[serde(default = "default_version")]
    pub current_version: u32,

    #[serde(default)]
    pub persona_tone: String,
    #[serde(default)]
    pub emoji_allowed: bool,

    #[serde(default)]
    pub greeting: String,
    #[serde(default)]
    pub base_instructions: String,
    #[serde(default)]
    pub global_prompts: Vec<GlobalPrompt>,

    pub llm: LlmConfig,

    #[serde(default)]
    pub tools: Vec<Tool>,

    #[serde(default)]
    pub knowledge: KnowledgeConfig,
}

fn default_version() -> u32 {
    1
}

impl AgentConfig {
    pub fn new(id: impl Into<String>, name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: slug.into(),
            description: String::new(),
            role: String::new(),
            goal: String::new(),
            language: "en".to_string(),
            status: AgentStatus::Draft,
            current_version: default_version(),
            persona_tone: String::new(),
            emoji_allowed: false,
            greeting: String::new(),
            base_instructions: String::new(),
            global_prompts: Vec::new(),
            llm: LlmConfig::default(),
            tools: Vec::new(),
            knowledge: KnowledgeConfig::default(),
        }
    }

    pub fn with_llm(mut self, llm: LlmConfig) -> Self {
        self.llm = llm;
        self
    }

    pub fn with_tool(mut self, tool: Tool) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.base_instructions = instructions.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn tool(&self, slug: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.slug == slug)
    }

    /// HTTP 工具头部引用的环境变量，去重并保持首次出现顺序
    pub fn tool_env_vars(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for name in self.tools.iter().flat_map(|t| t.header_env_vars()) {
            if !seen.contains(&name) {
                seen.push(name);
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_agent_from_persisted_json() {
        let agent: AgentConfig = serde_json::from_value(json!({
            "id": "agent-leo",
            "name": "Léo",
            "slug": "leo-numtema",
            "status": "active",
            "currentVersion": 3,
            "baseInstructions": "Tu es Léo.",
            "llm": {
                "provider": "google",
                "model": "gemini-2.5-flash",
                "apiKeyEnvVar": "GEMINI_API_KEY",
                "temperature": 0.7,
                "maxTokens": 2048
            }
        }))
        .unwrap();
        assert_eq!(agent.status, AgentStatus::Active);
        assert_eq!(agent.current_version, 3);
        assert_eq!(agent.knowledge.chunk_size, 1000);
        assert!(agent.tools.is_empty());
    }

    #[test]
    fn test_tool_env_vars_dedup() {
        let tool = |slug: &str, header: &str| -> Tool {
            serde_json::from_value(json!({
                "id": slug,
                "name": slug,
                "slug": slug,
                "type": "http",
                "httpHeaders": { "Authorization": header }
            }))
            .unwrap()
        };
        let agent = AgentConfig::new("a", "A", "a")
            .with_tool(tool("one", "{{env.SHARED}}"))
            .with_tool(tool("two", "{{env.SHARED}} {{env.OTHER}}"));
        assert_eq!(agent.tool_env_vars(), vec!["SHARED", "OTHER"]);
        assert!(agent.tool("two").is_some());
        assert!(agent.tool("three").is_none());
    }
}
