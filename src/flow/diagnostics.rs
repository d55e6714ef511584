use std::collections::HashSet;
use std::fmt;

use super::graph::{FlowData, FlowNodeType};

/// 图的结构问题，仅作提示，导出不会因此失败
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowDiagnostic {
    Empty,
    MissingStart { entry: String },
    DuplicateNode(String),
    DanglingEdge { edge: String, missing: String },
}

impl fmt::Display for FlowDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowDiagnostic::Empty => write!(f, "flow has no nodes; the fallback graph will be exported"),
            FlowDiagnostic::MissingStart { entry } => {
                write!(f, "no `start` node; `{}` is used as the entry point", entry)
            }
            FlowDiagnostic::DuplicateNode(id) => {
                write!(f, "duplicate node id `{}`; edges bind to the first occurrence", id)
            }
            FlowDiagnostic::DanglingEdge { edge, missing } => {
                write!(f, "edge `{}` references unknown node `{}` and will be skipped", edge, missing)
            }
        }
    }
}

impl FlowData {
    pub fn diagnostics(&self) -> Vec<FlowDiagnostic> {
        let mut found = Vec::new();
        if self.nodes.is_empty() {
            found.push(FlowDiagnostic::Empty);
            return found;
        }

        if self.nodes_by_type(FlowNodeType::Start).is_empty() {
            if let Some(entry) = self.entry_node() {
                found.push(FlowDiagnostic::MissingStart {
                    entry: entry.id.clone(),
                });
            }
        }

        let mut seen = HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                found.push(FlowDiagnostic::DuplicateNode(node.id.clone()));
            }
        }

        for edge in &self.edges {
            for end in [&edge.source, &edge.target] {
                if !seen.contains(end.as_str()) {
                    found.push(FlowDiagnostic::DanglingEdge {
                        edge: edge.id.clone(),
                        missing: end.clone(),
                    });
                }
            }
        }

        found
    }
}
