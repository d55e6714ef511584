use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::env::EnvConfig;

/// 工具类型
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ToolType {
    Http,
    Webhook,
    Internal,
    Mcp,
    Custom,
    GoogleSearch,
    GoogleMaps,
    Other(String),
}

impl ToolType {
    pub fn as_str(&self) -> &str {
        match self {
            ToolType::Http => "http",
            ToolType::Webhook => "webhook",
            ToolType::Internal => "internal",
            ToolType::Mcp => "mcp",
            ToolType::Custom => "custom",
            ToolType::GoogleSearch => "google_search",
            ToolType::GoogleMaps => "google_maps",
            ToolType::Other(value) => value,
        }
    }

    /// http 与 webhook 走同一条 HTTP 调用路径
    pub fn is_http(&self) -> bool {
        matches!(self, ToolType::Http | ToolType::Webhook)
    }
}

impl From<String> for ToolType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "http" => ToolType::Http,
            "webhook" => ToolType::Webhook,
            "internal" => ToolType::Internal,
            "mcp" => ToolType::Mcp,
            "custom" => ToolType::Custom,
            "google_search" => ToolType::GoogleSearch,
            "google_maps" => ToolType::GoogleMaps,
            _ => ToolType::Other(value),
        }
    }
}

impl From<ToolType> for String {
    fn from(tool_type: ToolType) -> Self {
        match tool_type {
            ToolType::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ToolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

/// 工具参数（编辑界面使用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolParam {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_index: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub tool_type: ToolType,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// 仅 http / webhook 类型使用
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_method: Option<HttpMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_url: Option<String>,
    /// 头部值可以是 `{{env.NAME}}` 占位符
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub http_headers: BTreeMap<String, String>,

    /// JSON Schema 文本，原样保存
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ToolParam>,
}

fn default_enabled() -> bool {
    true
}

impl Tool {
    /// 头部中引用的环境变量名，按头部键排序后的出现顺序
    pub fn header_env_vars(&self) -> Vec<&str> {
        if !self.tool_type.is_http() {
            return Vec::new();
        }
        self.http_headers
            .values()
            .flat_map(|value| EnvConfig::placeholders(value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_deserialize_http() {
        let tool: Tool = serde_json::from_value(json!({
            "id": "t1",
            "name": "CRM Lookup",
            "slug": "crm_lookup",
            "type": "webhook",
            "httpMethod": "GET",
            "httpUrl": "https://crm.example.com/lookup",
            "httpHeaders": { "Authorization": "Bearer {{env.CRM_TOKEN}}" }
        }))
        .unwrap();
        assert!(tool.tool_type.is_http());
        assert!(tool.enabled);
        assert_eq!(tool.http_method, Some(HttpMethod::Get));
        assert_eq!(tool.header_env_vars(), vec!["CRM_TOKEN"]);
    }

    #[test]
    fn test_non_http_tool_has_no_env_vars() {
        let tool: Tool = serde_json::from_value(json!({
            "id": "t2",
            "name": "Search",
            "slug": "search",
            "type": "google_search",
            "httpHeaders": { "X-Key": "{{env.SHOULD_NOT_APPEAR}}" }
        }))
        .unwrap();
        assert_eq!(tool.tool_type, ToolType::GoogleSearch);
        assert!(tool.header_env_vars().is_empty());
    }
}
