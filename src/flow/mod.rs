pub mod diagnostics;
pub mod graph;

pub use diagnostics::FlowDiagnostic;
pub use graph::{FlowData, FlowEdge, FlowNode, FlowNodeType, ResolvedEdge};
