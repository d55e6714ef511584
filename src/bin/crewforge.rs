use std::path::PathBuf;

use clap::{Parser, Subcommand};
use crewforge::cli::write_team_json;
use crewforge::utils::LoggingConfig;
use crewforge::{
    agent_summaries, describe_team, load_flow, load_team, run_export, AgentSummary,
    ExportOptions, ExportRequest, ExportTarget,
};

#[derive(Parser)]
#[command(name = "crewforge", version, about = "CrewForge exporter CLI", author)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 把一个 agent 导出为可运行的工程归档
    Export {
        #[arg(long)]
        team: PathBuf,
        /// agent 的 id 或 slug
        #[arg(long)]
        agent: String,
        #[arg(long, value_enum, default_value_t = ExportTarget::NodeRuntime)]
        target: ExportTarget,
        #[arg(long)]
        flow: Option<PathBuf>,
        #[arg(long, env = "CREWFORGE_OUT_DIR", default_value = ".")]
        out: PathBuf,
        #[arg(long, env = "CREWFORGE_STRICT", default_value_t = false)]
        strict: bool,
    },
    /// 导出整个 team 的 JSON 快照
    TeamJson {
        #[arg(long)]
        team: PathBuf,
        #[arg(long, env = "CREWFORGE_OUT_DIR", default_value = ".")]
        out: PathBuf,
    },
    Flow {
        #[command(subcommand)]
        command: FlowCommand,
    },
    List {
        #[arg(long)]
        team: PathBuf,
    },
}

#[derive(Subcommand)]
enum FlowCommand {
    /// 检查流程图并打印诊断
    Check { file: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    LoggingConfig::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Export {
            team,
            agent,
            target,
            flow,
            out,
            strict,
        } => {
            let request = ExportRequest {
                agent,
                target,
                flow,
                out_dir: out,
                options: ExportOptions { strict },
            };
            handle_export(team, request).await?
        }
        Command::TeamJson { team, out } => handle_team_json(team, out).await?,
        Command::Flow { command } => match command {
            FlowCommand::Check { file } => handle_flow_check(file).await?,
        },
        Command::List { team } => handle_list(team).await?,
    }
    Ok(())
}

async fn handle_export(team: PathBuf, request: ExportRequest) -> anyhow::Result<()> {
    let team = load_team(&team).await?;
    let path = run_export(&team, &request).await?;
    println!("Exported `{}` ({}) to `{}`", request.agent, request.target, path.display());
    Ok(())
}

async fn handle_team_json(team: PathBuf, out: PathBuf) -> anyhow::Result<()> {
    let team = load_team(&team).await?;
    let path = write_team_json(&team, &out).await?;
    println!("Team exported to `{}`", path.display());
    Ok(())
}

async fn handle_flow_check(file: PathBuf) -> anyhow::Result<()> {
    let flow = load_flow(&file).await?;
    let diagnostics = flow.diagnostics();
    println!(
        "{} nodes, {} edges, entry `{}`",
        flow.nodes.len(),
        flow.edges.len(),
        flow.entry_node().map(|n| n.id.as_str()).unwrap_or("-")
    );
    if diagnostics.is_empty() {
        println!("No issues found");
    } else {
        for diagnostic in diagnostics {
            println!("  - {diagnostic}");
        }
    }
    Ok(())
}

async fn handle_list(team: PathBuf) -> anyhow::Result<()> {
    let team = load_team(&team).await?;
    let summaries = agent_summaries(&team);
    println!("{}", describe_team(&team));
    if summaries.is_empty() {
        println!("No agents found in team `{}`", team.name);
    } else {
        render_agent_table(&summaries);
    }
    Ok(())
}

fn render_agent_table(summaries: &[AgentSummary]) {
    println!(
        "{:<24} {:<24} {:<10} {:<24} {:>5} {:>5}",
        "Slug", "Name", "Provider", "Model", "Tools", "Tasks"
    );
    for summary in summaries {
        let slug = if summary.manager {
            format!("{} *", summary.slug)
        } else {
            summary.slug.clone()
        };
        println!(
            "{:<24} {:<24} {:<10} {:<24} {:>5} {:>5}",
            slug, summary.name, summary.provider, summary.model, summary.tools, summary.tasks
        );
    }
}
