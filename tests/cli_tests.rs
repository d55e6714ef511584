use std::io::Cursor;
use std::path::Path;

use crewforge::cli::write_team_json;
use crewforge::{
    load_flow, load_team, run_export, ExportError, ExportOptions, ExportRequest, ExportTarget,
    TeamConfig,
};
use serde_json::json;

fn write_json(dir: &Path, name: &str, value: serde_json::Value) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(&value).unwrap()).unwrap();
    path
}

fn team_json() -> serde_json::Value {
    json!({
        "id": "crew-1",
        "name": "Research Crew",
        "process": "sequential",
        "agents": [
            {
                "id": "agent-r",
                "name": "Researcher",
                "slug": "researcher",
                "llm": { "provider": "openai", "model": "gpt-4o", "apiKeyEnvVar": "OPENAI_API_KEY" }
            },
            {
                "id": "agent-w",
                "name": "Writer",
                "slug": "writer",
                "llm": { "provider": "anthropic", "model": "claude", "apiKeyEnvVar": "ANTHROPIC_API_KEY" }
            }
        ],
        "tasks": [
            { "id": "t1", "name": "Collect", "agentId": "agent-r" },
            { "id": "t2", "name": "Write", "agentId": "agent-w" }
        ]
    })
}

fn request(agent: &str, target: ExportTarget, out_dir: &Path) -> ExportRequest {
    ExportRequest {
        agent: agent.to_string(),
        target,
        flow: None,
        out_dir: out_dir.to_path_buf(),
        options: ExportOptions::default(),
    }
}

fn read_archive(path: &Path) -> zip::ZipArchive<Cursor<Vec<u8>>> {
    zip::ZipArchive::new(Cursor::new(std::fs::read(path).unwrap())).unwrap()
}

#[tokio::test]
async fn load_team_parses_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_json(dir.path(), "team.json", team_json());
    let team = load_team(&path).await.unwrap();
    assert_eq!(team.agents.len(), 2);
    assert_eq!(team.find_agent("writer").unwrap().id, "agent-w");
}

#[tokio::test]
async fn load_team_reports_bad_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("team.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(load_team(&path).await, Err(ExportError::Serialization(_))));
}

#[tokio::test]
async fn load_team_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_team(&dir.path().join("absent.json")).await;
    assert!(matches!(result, Err(ExportError::Io(_))));
}

#[tokio::test]
async fn run_export_writes_node_archive_by_slug() {
    let dir = tempfile::tempdir().unwrap();
    let team: TeamConfig = serde_json::from_value(team_json()).unwrap();
    let out = dir.path().join("dist");

    let path = run_export(&team, &request("researcher", ExportTarget::NodeRuntime, &out))
        .await
        .unwrap();

    assert_eq!(path, out.join("researcher-runtime.zip"));
    let archive = read_archive(&path);
    assert_eq!(archive.len(), 8);
}

#[tokio::test]
async fn run_export_uses_flow_file() {
    let dir = tempfile::tempdir().unwrap();
    let team: TeamConfig = serde_json::from_value(team_json()).unwrap();
    let flow = write_json(
        dir.path(),
        "flow.json",
        json!({
            "nodes": [
                { "id": "s", "type": "start", "label": "Start" },
                { "id": "p", "type": "prompt", "label": "Research" }
            ],
            "edges": [
                { "id": "e1", "source": "s", "target": "p" },
                { "id": "e2", "source": "p", "target": "missing" }
            ]
        }),
    );
    let mut req = request("agent-r", ExportTarget::PocketFlow, dir.path());
    req.flow = Some(flow);

    let path = run_export(&team, &req).await.unwrap();
    assert!(path.ends_with("researcher-pocketflow.zip"));

    let mut archive = read_archive(&path);
    let mut main = String::new();
    std::io::Read::read_to_string(&mut archive.by_name("main.py").unwrap(), &mut main).unwrap();
    assert!(main.contains("node_s >> node_p"));
    assert!(!main.contains("missing"));
}

#[tokio::test]
async fn run_export_unknown_agent() {
    let dir = tempfile::tempdir().unwrap();
    let team: TeamConfig = serde_json::from_value(team_json()).unwrap();
    let result = run_export(&team, &request("nobody", ExportTarget::NodeRuntime, dir.path())).await;
    assert!(matches!(result, Err(ExportError::AgentNotFound(key)) if key == "nobody"));
}

#[tokio::test]
async fn strict_export_writes_nothing_on_failure() {
    let dir = tempfile::tempdir().unwrap();
    let team: TeamConfig = serde_json::from_value(team_json()).unwrap();
    let mut req = request("writer", ExportTarget::NodeRuntime, dir.path());
    req.options = ExportOptions::strict();

    let result = run_export(&team, &req).await;
    assert!(matches!(result, Err(ExportError::UnsupportedProvider(_))));
    assert!(!dir.path().join("writer-runtime.zip").exists());
}

#[tokio::test]
async fn team_json_is_written_by_id() {
    let dir = tempfile::tempdir().unwrap();
    let team: TeamConfig = serde_json::from_value(team_json()).unwrap();
    let path = write_team_json(&team, dir.path()).await.unwrap();
    assert_eq!(path, dir.path().join("team-crew-1.json"));
    let reloaded = load_team(&path).await.unwrap();
    assert_eq!(reloaded, team);
}

#[tokio::test]
async fn load_flow_reports_diagnostics() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_json(
        dir.path(),
        "flow.json",
        json!({
            "nodes": [{ "id": "a", "type": "action", "label": "Act" }],
            "edges": [{ "id": "e", "source": "a", "target": "b" }]
        }),
    );
    let flow = load_flow(&path).await.unwrap();
    let messages: Vec<String> = flow.diagnostics().iter().map(|d| d.to_string()).collect();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].contains("`a` is used as the entry point"));
    assert!(messages[1].contains("unknown node `b`"));
}
