use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ExportError, Result};

/// 流程节点类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowNodeType {
    Start,
    Prompt,
    ToolCall,
    Decision,
    End,
    Action,
}

impl FlowNodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowNodeType::Start => "start",
            FlowNodeType::Prompt => "prompt",
            FlowNodeType::ToolCall => "tool_call",
            FlowNodeType::Decision => "decision",
            FlowNodeType::End => "end",
            FlowNodeType::Action => "action",
        }
    }
}

impl fmt::Display for FlowNodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 图节点
///
/// `x` / `y` 只用于画布展示，执行语义与坐标无关。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: FlowNodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
}

impl FlowNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>, node_type: FlowNodeType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            node_type,
            description: None,
            x: 0.0,
            y: 0.0,
            name: None,
            prompt_id: None,
            tool_id: None,
            config: None,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }
}

/// 有向边
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_index: Option<u32>,
}

impl FlowEdge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            label: None,
            condition: None,
            order_index: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// 两端都能解析到节点的边
#[derive(Debug, Clone, Copy)]
pub struct ResolvedEdge<'a> {
    pub edge: &'a FlowEdge,
    pub source: &'a FlowNode,
    pub target: &'a FlowNode,
}

/// 流程图快照
///
/// 每次生成 / 调整都会整体替换，导出时只读取最新快照。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub nodes: Vec<FlowNode>,
    #[serde(default)]
    pub edges: Vec<FlowEdge>,
    #[serde(default)]
    pub summary: String,
}

impl FlowData {
    pub fn new(nodes: Vec<FlowNode>, edges: Vec<FlowEdge>) -> Self {
        Self {
            nodes,
            edges,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ExportError::Serialization(format!("Failed to parse flow data: {}", e)))
    }

    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| {
            ExportError::Serialization(format!("Failed to parse flow data value: {}", e))
        })
    }

    /// 最小可运行图：start → end
    pub fn fallback() -> Self {
        Self {
            name: Some("fallback".to_string()),
            nodes: vec![
                FlowNode::new("start", "Start", FlowNodeType::Start),
                FlowNode::new("end", "End", FlowNodeType::End).at(0.0, 150.0),
            ],
            edges: vec![FlowEdge::new("start-end", "start", "end")],
            summary: "Minimal start to end flow.".to_string(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 根据 ID 获取节点，重复 ID 时取第一个
    pub fn node(&self, node_id: &str) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| n.id == node_id)
    }

    /// 根据类型获取节点
    pub fn nodes_by_type(&self, node_type: FlowNodeType) -> Vec<&FlowNode> {
        self.nodes
            .iter()
            .filter(|n| n.node_type == node_type)
            .collect()
    }

    /// 入口节点：第一个 `start` 节点，没有则取列表第一个节点
    pub fn entry_node(&self) -> Option<&FlowNode> {
        self.nodes
            .iter()
            .find(|n| n.node_type == FlowNodeType::Start)
            .or_else(|| self.nodes.first())
    }

    /// 两端都存在的边，按原始顺序；悬空边被跳过
    pub fn resolved_edges(&self) -> impl Iterator<Item = ResolvedEdge<'_>> + '_ {
        self.edges.iter().filter_map(move |edge| {
            let source = self.node(&edge.source)?;
            let target = self.node(&edge.target)?;
            Some(ResolvedEdge {
                edge,
                source,
                target,
            })
        })
    }

    /// 至少一端引用了不存在节点的边
    pub fn dangling_edges(&self) -> Vec<&FlowEdge> {
        self.edges
            .iter()
            .filter(|e| self.node(&e.source).is_none() || self.node(&e.target).is_none())
            .collect()
    }
}
