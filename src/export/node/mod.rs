pub mod sources;

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Value};

use super::{ExportTarget, FileSet, RuntimeExporter};
use crate::config::env::ENV_PLACEHOLDER_PATTERN;
use crate::config::{AgentConfig, LlmProvider, TaskConfig};
use crate::error::Result;
use crate::flow::FlowData;

pub const PACKAGE_MANIFEST: &str = "package.json";
pub const BUILD_CONFIG: &str = "tsconfig.json";
pub const ENV_TEMPLATE: &str = ".env.example";
pub const CONFIG_MODULE: &str = "src/config.ts";
pub const LLM_MODULE: &str = "src/llm.ts";
pub const TOOLS_MODULE: &str = "src/tools.ts";
pub const ENTRY_MODULE: &str = "src/index.ts";
pub const README: &str = "README.md";

/// Node 导出的固定文件列表，按写入顺序
pub const NODE_FILES: [&str; 8] = [
    PACKAGE_MANIFEST,
    BUILD_CONFIG,
    ENV_TEMPLATE,
    CONFIG_MODULE,
    LLM_MODULE,
    TOOLS_MODULE,
    ENTRY_MODULE,
    README,
];

/// 依赖列表与 agent 实际使用的供应商无关
const DEPENDENCIES: [(&str, &str); 7] = [
    ("express", "^4.18.2"),
    ("dotenv", "^16.3.1"),
    ("cors", "^2.8.5"),
    ("body-parser", "^1.20.2"),
    ("@google/genai", "^1.0.0"),
    ("openai", "^4.20.1"),
    ("axios", "^1.6.0"),
];

const DEV_DEPENDENCIES: [(&str, &str); 5] = [
    ("typescript", "^5.3.2"),
    ("@types/node", "^20.10.0"),
    ("@types/express", "^4.17.21"),
    ("@types/cors", "^2.8.17"),
    ("ts-node", "^10.9.1"),
];

/// Node.js HTTP 服务导出器
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeRuntimeExporter;

impl RuntimeExporter for NodeRuntimeExporter {
    fn target(&self) -> ExportTarget {
        ExportTarget::NodeRuntime
    }

    /// Node 目标不使用流程图
    fn export(
        &self,
        agent: &AgentConfig,
        tasks: &[TaskConfig],
        _flow: Option<&FlowData>,
    ) -> Result<FileSet> {
        export_node_runtime(agent, tasks)
    }
}

pub fn export_node_runtime(agent: &AgentConfig, tasks: &[TaskConfig]) -> Result<FileSet> {
    let mut files = FileSet::new();
    files.insert(PACKAGE_MANIFEST, package_manifest(agent)?);
    files.insert(BUILD_CONFIG, build_config()?);
    files.insert(ENV_TEMPLATE, env_template(agent));
    files.insert(CONFIG_MODULE, config_module(agent, tasks)?);
    files.insert(LLM_MODULE, llm_module(&agent.llm.provider));
    files.insert(TOOLS_MODULE, tools_module());
    files.insert(ENTRY_MODULE, sources::ENTRY_MODULE);
    files.insert(README, readme(agent, tasks));

    tracing::debug!(agent = %agent.slug, files = files.len(), "node runtime generated");
    Ok(files)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PackageManifest<'a> {
    name: &'a str,
    version: &'static str,
    description: &'a str,
    main: &'static str,
    scripts: BTreeMap<&'static str, &'static str>,
    dependencies: BTreeMap<&'static str, &'static str>,
    dev_dependencies: BTreeMap<&'static str, &'static str>,
}

fn package_manifest(agent: &AgentConfig) -> Result<String> {
    let manifest = PackageManifest {
        name: &agent.slug,
        version: "1.0.0",
        description: &agent.description,
        main: "dist/index.js",
        scripts: BTreeMap::from([
            ("build", "tsc"),
            ("start", "node dist/index.js"),
            ("dev", "ts-node src/index.ts"),
        ]),
        dependencies: DEPENDENCIES.into_iter().collect(),
        dev_dependencies: DEV_DEPENDENCIES.into_iter().collect(),
    };
    Ok(serde_json::to_string_pretty(&manifest)? + "\n")
}

fn build_config() -> Result<String> {
    let config = json!({
        "compilerOptions": {
            "target": "es2020",
            "module": "commonjs",
            "outDir": "./dist",
            "rootDir": "./src",
            "strict": true,
            "esModuleInterop": true,
            "skipLibCheck": true,
            "forceConsistentCasingInFileNames": true
        }
    });
    Ok(serde_json::to_string_pretty(&config)? + "\n")
}

fn env_template(agent: &AgentConfig) -> String {
    let mut out = String::from("PORT=3000\n# LLM Keys\n");
    out.push_str(&format!("{}=your_api_key_here\n", agent.llm.api_key_env_var));
    out.push_str("# Tool Keys\n");
    for name in agent.tool_env_vars() {
        out.push_str(&format!("{}=\n", name));
    }
    out
}

/// agent 快照与任务列表合并到 `tasks` 键下
fn config_value(agent: &AgentConfig, tasks: &[TaskConfig]) -> Result<Value> {
    let mut value = serde_json::to_value(agent)?;
    if let Value::Object(map) = &mut value {
        map.insert("tasks".to_string(), serde_json::to_value(tasks)?);
    }
    Ok(value)
}

fn config_module(agent: &AgentConfig, tasks: &[TaskConfig]) -> Result<String> {
    let literal = serde_json::to_string_pretty(&config_value(agent, tasks)?)?;
    Ok(format!(
        "// Agent configuration snapshot. Regenerate the export to update it.\n\n{}\nexport const agentConfig: AgentConfig = {};\n",
        sources::CONFIG_TYPES,
        literal
    ))
}

/// 生成的正则与 `EnvConfig::placeholders` 使用同一个模式
fn tools_module() -> String {
    format!(
        "{}\nconst ENV_PLACEHOLDER = /{}/g;\n{}{}",
        sources::TOOLS_IMPORTS,
        ENV_PLACEHOLDER_PATTERN,
        sources::HEADER_RESOLVER,
        sources::TOOL_EXECUTOR
    )
}

fn llm_module(provider: &LlmProvider) -> String {
    match provider {
        LlmProvider::Google => format!(
            "{}{}\n{}",
            sources::LLM_GOOGLE_IMPORT,
            sources::LLM_PRELUDE,
            sources::LLM_GOOGLE
        ),
        LlmProvider::OpenAi => format!(
            "{}{}\n{}",
            sources::LLM_OPENAI_IMPORT,
            sources::LLM_PRELUDE,
            sources::LLM_OPENAI
        ),
        LlmProvider::Anthropic
        | LlmProvider::Qwen
        | LlmProvider::Custom
        | LlmProvider::Other(_) => {
            tracing::warn!(
                provider = %provider,
                "provider has no node runtime code path; exported llm module will throw"
            );
            format!("{}\n{}", sources::LLM_PRELUDE, sources::LLM_UNSUPPORTED)
        }
    }
}

fn readme(agent: &AgentConfig, tasks: &[TaskConfig]) -> String {
    let mut out = format!("# {}\n\n{}\n\n", agent.name, agent.description);
    out.push_str(&format!(
        "## Setup\n\n\
         1. Install dependencies:\n   ```bash\n   npm install\n   ```\n\n\
         2. Configure Environment:\n   Copy `.env.example` to `.env` and fill in your API keys (e.g., `{}`).\n\n\
         3. Run:\n   ```bash\n   npm run dev\n   ```\n\n",
        agent.llm.api_key_env_var
    ));
    out.push_str(
        "## API\n\n\
         - **GET /**: Health check, returns the agent name and version.\n\
         - **POST /chat**: Send `{ \"messages\": [{ \"role\", \"content\" }] }` to the agent.\n\
         - **POST /tool/:slug**: Execute a specific tool directly.\n\n",
    );

    out.push_str(&format!(
        "## Configuration\n\nThis agent is powered by **{}** ({}).\nConfiguration is stored in `src/config.ts`.\n",
        agent.llm.provider, agent.llm.model
    ));
    if !matches!(agent.llm.provider, LlmProvider::Google | LlmProvider::OpenAi) {
        out.push_str(&format!(
            "\n> The `{}` provider is not supported by this runtime yet; `/chat` will return an error.\n",
            agent.llm.provider
        ));
    }

    if !agent.tools.is_empty() {
        out.push_str("\n## Tools\n\n");
        for tool in &agent.tools {
            out.push_str(&format!("- `{}` ({}): {}\n", tool.slug, tool.tool_type, tool.name));
        }
        let env_vars = agent.tool_env_vars();
        if !env_vars.is_empty() {
            out.push_str(&format!(
                "\nTool headers read {} from the environment. `.env.example` lists these \
                 variable names rather than the header keys; a header whose variable is unset \
                 is left out of the request.\n",
                env_vars
                    .iter()
                    .map(|name| format!("`{}`", name))
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }
    }

    out.push_str(&format!(
        "\n## Tasks\n\nThis agent has **{}** defined tasks available for execution.\n",
        tasks.len()
    ));
    out
}
