use super::GeneratedFile;
use crate::config::TeamConfig;
use crate::error::Result;

/// 整个 team 的 JSON 快照，文件名 `team-<id>.json`
pub fn export_team_json(team: &TeamConfig) -> Result<GeneratedFile> {
    let contents = serde_json::to_string_pretty(team)?;
    Ok(GeneratedFile {
        path: format!("team-{}.json", team.id),
        contents,
    })
}
