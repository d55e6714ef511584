pub mod program;

use super::{ExportTarget, FileSet, RuntimeExporter};
use crate::config::{AgentConfig, TaskConfig};
use crate::error::Result;
use crate::flow::FlowData;

pub use program::{bind_nodes, render_main, NodeBinding};

/// pocketflow 运行库，原样嵌入每个 Python 导出
pub const POCKETFLOW_RUNTIME: &str = include_str!("pocketflow.py");

pub const RUNTIME_LIBRARY: &str = "pocketflow.py";
pub const MAIN_PROGRAM: &str = "main.py";
pub const REQUIREMENTS: &str = "requirements.txt";
pub const README: &str = "README.md";

pub const POCKETFLOW_FILES: [&str; 4] = [RUNTIME_LIBRARY, MAIN_PROGRAM, REQUIREMENTS, README];

const REQUIREMENTS_TXT: &str = "aiohttp\npython-dotenv\n";

/// Python PocketFlow 导出器
#[derive(Debug, Clone, Copy, Default)]
pub struct PocketFlowExporter;

impl RuntimeExporter for PocketFlowExporter {
    fn target(&self) -> ExportTarget {
        ExportTarget::PocketFlow
    }

    fn export(
        &self,
        agent: &AgentConfig,
        tasks: &[TaskConfig],
        flow: Option<&FlowData>,
    ) -> Result<FileSet> {
        export_pocketflow_runtime(agent, tasks, flow)
    }
}

/// 没有流程图或流程图为空时，使用 start → end 的最小图，保证导出可以直接运行
pub fn export_pocketflow_runtime(
    agent: &AgentConfig,
    tasks: &[TaskConfig],
    flow: Option<&FlowData>,
) -> Result<FileSet> {
    let fallback;
    let graph = match flow.filter(|f| !f.is_empty()) {
        Some(graph) => graph,
        None => {
            tracing::debug!(agent = %agent.slug, "no flow graph supplied, using fallback");
            fallback = FlowData::fallback();
            &fallback
        }
    };

    let mut files = FileSet::new();
    files.insert(RUNTIME_LIBRARY, POCKETFLOW_RUNTIME);
    files.insert(MAIN_PROGRAM, render_main(agent, graph));
    files.insert(REQUIREMENTS, REQUIREMENTS_TXT);
    files.insert(README, readme(agent, tasks, graph));

    tracing::debug!(
        agent = %agent.slug,
        nodes = graph.nodes.len(),
        edges = graph.resolved_edges().count(),
        "pocketflow runtime generated"
    );
    Ok(files)
}

fn readme(agent: &AgentConfig, tasks: &[TaskConfig], flow: &FlowData) -> String {
    let mut out = format!(
        "# {} - PocketFlow Agent\n\nThis agent uses the lightweight PocketFlow library for orchestration.\n\n",
        agent.name
    );
    if !flow.summary.trim().is_empty() {
        out.push_str(&format!("## Flow\n\n{}\n\n", flow.summary.trim()));
    }
    out.push_str(&format!(
        "## Setup\n\n1. Install Python 3.8+\n2. `pip install -r requirements.txt`\n3. Set env var: `export {}=your_key`\n\n",
        agent.llm.api_key_env_var
    ));
    out.push_str("## Run\n\n`python main.py`\n");
    if !tasks.is_empty() {
        out.push_str(&format!(
            "\n## Tasks\n\nThis agent has **{}** defined tasks. Node bodies in `main.py` are placeholders for their logic.\n",
            tasks.len()
        ));
    }
    out
}
