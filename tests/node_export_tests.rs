use crewforge::export::node::{sources, NODE_FILES};
use crewforge::{
    export_node_runtime, export_runtime, AgentConfig, ExportError, ExportOptions, ExportTarget,
    LlmConfig, LlmProvider, TaskConfig, Tool,
};
use serde_json::{json, Value};

fn crm_tool() -> Tool {
    serde_json::from_value(json!({
        "id": "tool-crm",
        "name": "CRM Lookup",
        "slug": "crm_lookup",
        "type": "http",
        "httpMethod": "GET",
        "httpUrl": "https://crm.example.com/api",
        "httpHeaders": {
            "Authorization": "Bearer {{env.CRM_TOKEN}}",
            "X-Tenant": "{{env.CRM_TENANT}}"
        }
    }))
    .expect("valid tool")
}

fn support_agent(provider: LlmProvider) -> AgentConfig {
    AgentConfig::new("agent-1", "Support Bot", "support-bot")
        .with_description("Answers customer questions")
        .with_instructions("Be concise.")
        .with_llm(LlmConfig {
            provider,
            ..LlmConfig::default()
        })
        .with_tool(crm_tool())
}

fn tasks() -> Vec<TaskConfig> {
    vec![
        TaskConfig::new("task-1", "Triage").assigned_to("agent-1"),
        TaskConfig::new("task-2", "Answer")
            .assigned_to("agent-1")
            .depends_on("task-1"),
    ]
}

#[test]
fn node_export_produces_fixed_file_set() {
    let files = export_node_runtime(&support_agent(LlmProvider::Google), &tasks()).unwrap();
    assert_eq!(files.paths(), NODE_FILES.to_vec());
}

#[test]
fn node_export_is_deterministic() {
    let agent = support_agent(LlmProvider::OpenAi);
    let first = export_node_runtime(&agent, &tasks()).unwrap();
    let second = export_node_runtime(&agent, &tasks()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn package_manifest_uses_slug_and_description() {
    let files = export_node_runtime(&support_agent(LlmProvider::Google), &[]).unwrap();
    let manifest: Value = serde_json::from_str(files.get("package.json").unwrap()).unwrap();
    assert_eq!(manifest["name"], "support-bot");
    assert_eq!(manifest["description"], "Answers customer questions");
    assert_eq!(manifest["scripts"]["dev"], "ts-node src/index.ts");
    assert!(manifest["dependencies"]["@google/genai"].is_string());
    assert!(manifest["dependencies"]["openai"].is_string());
    assert!(manifest["devDependencies"]["typescript"].is_string());
}

#[test]
fn env_template_lists_llm_key_and_tool_placeholders() {
    let files = export_node_runtime(&support_agent(LlmProvider::Google), &[]).unwrap();
    assert_eq!(
        files.get(".env.example").unwrap(),
        "PORT=3000\n# LLM Keys\nGEMINI_API_KEY=your_api_key_here\n# Tool Keys\nCRM_TOKEN=\nCRM_TENANT=\n"
    );
}

#[test]
fn config_module_embeds_agent_and_tasks() {
    let files = export_node_runtime(&support_agent(LlmProvider::Google), &tasks()).unwrap();
    let config = files.get("src/config.ts").unwrap();
    assert!(config.contains("export const agentConfig: AgentConfig = {"));
    assert!(config.contains("\"slug\": \"support-bot\""));
    assert!(config.contains("\"baseInstructions\": \"Be concise.\""));
    assert!(config.contains("\"id\": \"task-2\""));
    assert!(config.contains("\"Authorization\": \"Bearer {{env.CRM_TOKEN}}\""));
}

fn generate_response(module: &str) -> &str {
    let start = module
        .find("export async function generateResponse(")
        .expect("generateResponse is exported");
    &module[start..]
}

#[test]
fn google_llm_forwards_only_last_message() {
    let files = export_node_runtime(&support_agent(LlmProvider::Google), &[]).unwrap();
    let body = generate_response(files.get("src/llm.ts").unwrap());
    assert!(body.contains("messages[messages.length - 1].content"));
    assert!(body.contains("contents: lastMessage,"));
    assert!(body.contains("systemInstruction: agentConfig.baseInstructions,"));
    assert!(!body.contains("...messages"));
    assert!(!body.contains("new OpenAI"));
}

#[test]
fn openai_llm_forwards_history_with_system_message() {
    let files = export_node_runtime(&support_agent(LlmProvider::OpenAi), &[]).unwrap();
    let body = generate_response(files.get("src/llm.ts").unwrap());
    assert!(body.contains("content: agentConfig.baseInstructions"));
    assert!(body.contains("messages: [systemMessage, ...messages]"));
    assert!(!body.contains("messages.length - 1"));
    assert!(!body.contains("GoogleGenAI"));
}

#[test]
fn unsupported_llm_only_throws() {
    let files = export_node_runtime(&support_agent(LlmProvider::from("mistral")), &[]).unwrap();
    let llm = files.get("src/llm.ts").unwrap();
    assert_eq!(llm.matches("function generateResponse(").count(), 1);
    assert_eq!(
        generate_response(llm),
        "export async function generateResponse(_messages: ChatMessage[]): Promise<string> {\n  \
         throw new ProviderNotSupportedError(agentConfig.llm.provider);\n}\n"
    );
}

#[test]
fn tools_module_drops_headers_with_unset_variables() {
    let files = export_node_runtime(&support_agent(LlmProvider::Google), &[]).unwrap();
    let tools = files.get("src/tools.ts").unwrap();
    assert!(tools.contains(sources::HEADER_RESOLVER));
    assert!(tools.contains("const envValue = process.env[name];"));
    assert!(tools.contains("return unresolved.length > 0 ? undefined : resolved;"));
    assert!(tools.contains("if (resolved !== undefined) headers[key] = resolved;"));
    assert!(tools.contains("headers: buildHeaders(tool),"));
    assert!(!tools.contains("{{env.CRM_TOKEN}}"));
    assert!(tools.contains("ToolNotFoundError"));
    assert!(tools.contains("return { error: \"Tool type not implemented\" };"));
}

#[test]
fn entry_module_exposes_routes() {
    let files = export_node_runtime(&support_agent(LlmProvider::Google), &[]).unwrap();
    let index = files.get("src/index.ts").unwrap();
    assert!(index.contains("app.get(\"/\""));
    assert!(index.contains("app.post(\"/chat\""));
    assert!(index.contains("app.post(\"/tool/:slug\""));
}

#[test]
fn export_runtime_names_bundle_after_slug() {
    let agent = support_agent(LlmProvider::Google);
    let bundle = export_runtime(
        ExportTarget::NodeRuntime,
        &agent,
        &tasks(),
        None,
        ExportOptions::default(),
    )
    .unwrap();
    assert_eq!(bundle.file_name, "support-bot-runtime.zip");
    assert_eq!(bundle.files.len(), 8);
}

#[test]
fn lenient_mode_exports_unsupported_provider() {
    let agent = support_agent(LlmProvider::Anthropic);
    let result = export_runtime(
        ExportTarget::NodeRuntime,
        &agent,
        &[],
        None,
        ExportOptions::default(),
    );
    assert!(result.is_ok());
}

#[test]
fn strict_mode_rejects_unsupported_provider() {
    let agent = support_agent(LlmProvider::Anthropic);
    let result = export_runtime(
        ExportTarget::NodeRuntime,
        &agent,
        &[],
        None,
        ExportOptions::strict(),
    );
    assert!(matches!(result, Err(ExportError::UnsupportedProvider(p)) if p == "anthropic"));
}

#[test]
fn strict_mode_rejects_bad_slug() {
    let agent = AgentConfig::new("a", "Agent", "Not A Slug");
    let result = export_runtime(
        ExportTarget::NodeRuntime,
        &agent,
        &[],
        None,
        ExportOptions::strict(),
    );
    assert!(matches!(result, Err(ExportError::InvalidSlug(_))));
}
