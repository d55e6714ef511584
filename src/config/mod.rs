pub mod agent;
pub mod env;
pub mod knowledge;
pub mod llm;
pub mod task;
pub mod team;
pub mod tool;

pub use agent::{AgentConfig, AgentStatus, GlobalPrompt};
pub use env::EnvConfig;
pub use knowledge::{
    EmbedderConfig, EmbedderProvider, KnowledgeConfig, KnowledgeSource, KnowledgeSourceType,
    KnowledgeStatus,
};
pub use llm::{FallbackLlm, LlmConfig, LlmProvider};
pub use task::{GuardrailMode, TaskConfig, TaskGuardrail, TaskOutputFormat};
pub use team::{ManagerLlm, ProcessType, RuntimeTemplate, TeamConfig, TeamManager, TeamRuntime};
pub use tool::{HttpMethod, Tool, ToolParam, ToolType};
