use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskOutputFormat {
    #[default]
    Raw,
    Json,
    Pydantic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuardrailMode {
    Function,
    Llm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskGuardrail {
    pub id: String,
    pub mode: GuardrailMode,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Map<String, Value>>,
}

/// 任务配置
///
/// `context_tasks` 引用同一 team 内的其他任务，构成 DAG；环不在这里检测。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskConfig {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub expected_output: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// team 内 agent 的 id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_tools: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context_tasks: Vec<String>,

    #[serde(default)]
    pub async_execution: bool,
    #[serde(default)]
    pub human_review: bool,
    #[serde(default)]
    pub markdown: bool,
    /// 秒
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_execution_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
    #[serde(default)]
    pub create_directory: bool,
    #[serde(default)]
    pub output_format: TaskOutputFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_json_schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_model_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guardrail_max_retries: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub guardrails: Vec<TaskGuardrail>,
}

impl TaskConfig {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: None,
            description: String::new(),
            expected_output: String::new(),
            tags: Vec::new(),
            agent_id: None,
            allowed_tools: Vec::new(),
            context_tasks: Vec::new(),
            async_execution: false,
            human_review: false,
            markdown: false,
            max_execution_time: None,
            max_retries: None,
            config: None,
            output_file: None,
            create_directory: false,
            output_format: TaskOutputFormat::Raw,
            output_json_schema: None,
            output_model_name: None,
            guardrail_max_retries: None,
            guardrails: Vec::new(),
        }
    }

    pub fn assigned_to(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }

    pub fn depends_on(mut self, task_id: impl Into<String>) -> Self {
        self.context_tasks.push(task_id.into());
        self
    }
}
