use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnowledgeSourceType {
    Text,
    Url,
    Pdf,
    Csv,
    Excel,
    Json,
    Api,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnowledgeStatus {
    Indexed,
    Processing,
    #[default]
    Pending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeSource {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub source_type: KnowledgeSourceType,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: KnowledgeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// true 表示 crew 级共享，false 表示仅当前 agent
    #[serde(default)]
    pub shared_with_crew: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_name: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderProvider {
    #[default]
    Google,
    Openai,
    Azure,
    Ollama,
    Voyage,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedderConfig {
    #[serde(default)]
    pub provider: EmbedderProvider,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env_var: Option<String>,
    /// Azure / Ollama 使用
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            provider: EmbedderProvider::Google,
            model: "models/text-embedding-004".to_string(),
            api_key_env_var: None,
            api_base: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeConfig {
    #[serde(default)]
    pub sources: Vec<KnowledgeSource>,
    #[serde(default)]
    pub embedder: EmbedderConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector_provider: Option<String>,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u32,
    #[serde(default = "default_overlap")]
    pub overlap: u32,
    #[serde(default = "default_top_k_retrieval")]
    pub top_k_retrieval: u32,
}

fn default_chunk_size() -> u32 {
    1000
}

fn default_overlap() -> u32 {
    200
}

fn default_top_k_retrieval() -> u32 {
    3
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            embedder: EmbedderConfig::default(),
            vector_provider: None,
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
            top_k_retrieval: default_top_k_retrieval(),
        }
    }
}
