use std::fmt;

use serde::{Deserialize, Serialize};

/// 模型供应商
///
/// 持久化层存的是开放字符串，这里收敛为封闭枚举；未知值保留在 `Other` 里，
/// 由各个导出目标决定如何处理。
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LlmProvider {
    #[default]
    Google,
    OpenAi,
    Anthropic,
    Qwen,
    Custom,
    Other(String),
}

impl LlmProvider {
    pub fn as_str(&self) -> &str {
        match self {
            LlmProvider::Google => "google",
            LlmProvider::OpenAi => "openai",
            LlmProvider::Anthropic => "anthropic",
            LlmProvider::Qwen => "qwen",
            LlmProvider::Custom => "custom",
            LlmProvider::Other(value) => value,
        }
    }
}

impl From<String> for LlmProvider {
    fn from(value: String) -> Self {
        match value.as_str() {
            "google" => LlmProvider::Google,
            "openai" => LlmProvider::OpenAi,
            "anthropic" => LlmProvider::Anthropic,
            "qwen" => LlmProvider::Qwen,
            "custom" => LlmProvider::Custom,
            _ => LlmProvider::Other(value),
        }
    }
}

impl From<&str> for LlmProvider {
    fn from(value: &str) -> Self {
        LlmProvider::from(value.to_string())
    }
}

impl From<LlmProvider> for String {
    fn from(provider: LlmProvider) -> Self {
        match provider {
            LlmProvider::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Agent 的模型绑定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub model: String,
    /// 运行时读取 API Key 的环境变量名
    pub api_key_env_var: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// 按顺序尝试的备用模型
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fallbacks: Vec<FallbackLlm>,
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    2048
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::Google,
            model: "gemini-2.5-flash".to_string(),
            api_key_env_var: "GEMINI_API_KEY".to_string(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_k: None,
            top_p: None,
            fallbacks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackLlm {
    pub provider: LlmProvider,
    pub model: String,
    pub api_key_env_var: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_index: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_provider_is_preserved() {
        let provider: LlmProvider = serde_json::from_value(json!("mistral")).unwrap();
        assert_eq!(provider, LlmProvider::Other("mistral".to_string()));
        assert_eq!(serde_json::to_value(&provider).unwrap(), json!("mistral"));
    }

    #[test]
    fn test_llm_config_defaults() {
        let config: LlmConfig = serde_json::from_value(json!({
            "provider": "openai",
            "model": "gpt-4o",
            "apiKeyEnvVar": "OPENAI_API_KEY"
        }))
        .unwrap();
        assert_eq!(config.provider, LlmProvider::OpenAi);
        assert_eq!(config.max_tokens, 2048);
        assert!(config.fallbacks.is_empty());
    }
}
