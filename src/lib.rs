pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod flow;
pub mod utils;

pub use archive::{assemble, write_archive, ARCHIVE_EXTENSION};
pub use cli::{
    agent_summaries, describe_team, load_flow, load_team, run_export, AgentSummary, ExportRequest,
};
pub use config::{
    AgentConfig, EnvConfig, HttpMethod, KnowledgeConfig, LlmConfig, LlmProvider, ProcessType,
    TaskConfig, TeamConfig, Tool, ToolType,
};
pub use error::{ExportError, Result};
pub use export::{
    export_node_runtime, export_pocketflow_runtime, export_runtime, export_team_json,
    exporter_for, ExportBundle, ExportOptions, ExportTarget, FileSet, GeneratedFile,
    RuntimeExporter,
};
pub use flow::{FlowData, FlowDiagnostic, FlowEdge, FlowNode, FlowNodeType};
pub use utils::{logging, validation};
