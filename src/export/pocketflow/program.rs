//! 把 `FlowData` 转成基于 pocketflow 的 `main.py`。
//!
//! 每个节点生成一个 `AsyncNode` 子类并实例化一次，解析成功的边用 `>>` 串起来，
//! 最后以入口节点为根构造 `AsyncFlow` 并运行。

use std::collections::HashMap;

use crate::export::ident::{pascal_case, single_line, string_literal, IdentAllocator};
use crate::config::AgentConfig;
use crate::flow::{FlowData, FlowNode};

/// 单个节点在生成代码中的名字
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeBinding {
    pub class_name: String,
    pub var_name: String,
}

/// 为每个节点分配类名与变量名，顺序与 `flow.nodes` 一致
pub fn bind_nodes(flow: &FlowData) -> Vec<NodeBinding> {
    let mut idents = IdentAllocator::new();
    flow.nodes
        .iter()
        .map(|node| {
            let suffix = idents.allocate(&node.id);
            NodeBinding {
                class_name: format!("{}Node_{}", pascal_case(node.node_type.as_str()), suffix),
                var_name: format!("node_{}", suffix),
            }
        })
        .collect()
}

pub fn render_main(agent: &AgentConfig, flow: &FlowData) -> String {
    let bindings = bind_nodes(flow);

    // 重复 id 时边绑定到第一个节点，与 FlowData::node 一致
    let mut by_id: HashMap<&str, &NodeBinding> = HashMap::new();
    for (node, binding) in flow.nodes.iter().zip(&bindings) {
        by_id.entry(node.id.as_str()).or_insert(binding);
    }

    let mut out = render_header(agent);

    out.push_str("# --- NODES ---\n");
    for (node, binding) in flow.nodes.iter().zip(&bindings) {
        out.push_str(&render_node_class(node, binding));
    }

    out.push_str("\n\n# --- FLOW ORCHESTRATION ---\n\n\nasync def main():\n");
    out.push_str("    shared = AgentContext()\n\n    # Instantiate nodes\n");
    for binding in &bindings {
        out.push_str(&format!("    {} = {}()\n", binding.var_name, binding.class_name));
    }

    out.push_str("\n    # Wire edges\n");
    for resolved in flow.resolved_edges() {
        let (Some(source), Some(target)) = (
            by_id.get(resolved.source.id.as_str()),
            by_id.get(resolved.target.id.as_str()),
        ) else {
            continue;
        };
        out.push_str(&format!("    {} >> {}", source.var_name, target.var_name));
        if let Some(label) = resolved.edge.label.as_deref().filter(|l| !l.trim().is_empty()) {
            out.push_str(&format!("  # {}", single_line(label)));
        }
        out.push('\n');
    }
    for skipped in flow.dangling_edges() {
        tracing::warn!(
            edge = %skipped.id,
            source = %skipped.source,
            target = %skipped.target,
            "skipping edge with unknown endpoint"
        );
    }

    let entry = flow
        .entry_node()
        .and_then(|node| by_id.get(node.id.as_str()))
        .map(|binding| binding.var_name.as_str())
        .unwrap_or("None");

    out.push_str(&format!(
        "\n    # Create flow\n    flow = AsyncFlow(start={})\n\n",
        entry
    ));
    out.push_str(
        "    print(\"Starting PocketFlow for\", AGENT_NAME)\n    await flow.run_async(shared)\n    print(\"Flow Complete.\")\n\n\n",
    );
    out.push_str("if __name__ == \"__main__\":\n    asyncio.run(main())\n");
    out
}

fn render_header(agent: &AgentConfig) -> String {
    format!(
        "import asyncio\nimport os\n\nfrom pocketflow import AsyncFlow, AsyncNode\n\n\
         # Configuration\n\
         AGENT_NAME = {}\n\
         API_KEY = os.getenv({})\n\n\n\
         class AgentContext:\n    def __init__(self):\n        self.history = []\n        self.data = {{}}\n\n\n",
        string_literal(&agent.name),
        string_literal(&agent.llm.api_key_env_var),
    )
}

fn render_node_class(node: &FlowNode, binding: &NodeBinding) -> String {
    let label = single_line(&node.label);
    let mut out = format!(
        "\n\nclass {}(AsyncNode):\n    async def prep_async(self, shared):\n        print(\"Processing Node:\", {})\n        return shared\n\n",
        binding.class_name,
        string_literal(&node.label),
    );
    out.push_str("    async def exec_async(self, shared):\n");
    out.push_str(&format!("        # Logic for {}\n", label));
    if let Some(description) = node.description.as_deref().filter(|d| !d.trim().is_empty()) {
        out.push_str(&format!("        # {}\n", single_line(description)));
    }
    out.push_str("        return \"success\"\n\n");
    out.push_str(
        "    async def post_async(self, shared, prep_res, exec_res):\n        return \"default\"\n",
    );
    out
}
