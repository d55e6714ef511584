use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{AgentConfig, LlmProvider};
use crate::error::{ExportError, Result};
use crate::export::ExportTarget;

static SLUG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9_-]*$").expect("slug pattern is a valid regex"));

static ENV_VAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("env var pattern is a valid regex")
});

/// 严格模式下的导出前校验
///
/// 宽松模式（默认）不会调用这里，缺陷直接进入生成的工程。
pub struct ConfigValidator;

impl ConfigValidator {
    /// slug 会进入包名、文件名和源码，只允许小写字母、数字、`-`、`_`
    pub fn validate_slug(slug: &str) -> Result<()> {
        if SLUG.is_match(slug) {
            Ok(())
        } else {
            Err(ExportError::InvalidSlug(slug.to_string()))
        }
    }

    /// 验证环境变量名
    pub fn validate_env_var(entity: &str, field: &str, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(ExportError::MissingField {
                entity: entity.to_string(),
                field: field.to_string(),
            });
        }
        if !ENV_VAR.is_match(name) {
            return Err(ExportError::Other(anyhow::anyhow!(
                "{} field `{}` is not a valid environment variable name: `{}`",
                entity,
                field,
                name
            )));
        }
        Ok(())
    }

    /// 验证模型名称
    pub fn validate_model_name(model: &str) -> Result<()> {
        if model.trim().is_empty() {
            return Err(ExportError::MissingField {
                entity: "llm".to_string(),
                field: "model".to_string(),
            });
        }
        Ok(())
    }

    /// 验证温度参数
    pub fn validate_temperature(temperature: f64) -> Result<()> {
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ExportError::Other(anyhow::anyhow!(
                "temperature must be between 0.0 and 2.0, got {}",
                temperature
            )));
        }
        Ok(())
    }

    /// 目标运行时是否有该供应商的代码路径
    pub fn validate_provider(provider: &LlmProvider, target: ExportTarget) -> Result<()> {
        match (target, provider) {
            (ExportTarget::NodeRuntime, LlmProvider::Google | LlmProvider::OpenAi) => Ok(()),
            (ExportTarget::NodeRuntime, other) => {
                Err(ExportError::UnsupportedProvider(other.to_string()))
            }
            // Python 导出只读取 API Key，不调用模型
            (ExportTarget::PocketFlow, _) => Ok(()),
        }
    }

    pub fn validate_for_export(agent: &AgentConfig, target: ExportTarget) -> Result<()> {
        Self::validate_slug(&agent.slug)?;
        if agent.name.trim().is_empty() {
            return Err(ExportError::MissingField {
                entity: format!("agent `{}`", agent.slug),
                field: "name".to_string(),
            });
        }
        Self::validate_model_name(&agent.llm.model)?;
        Self::validate_env_var("llm", "apiKeyEnvVar", &agent.llm.api_key_env_var)?;
        Self::validate_temperature(agent.llm.temperature)?;
        Self::validate_provider(&agent.llm.provider, target)?;
        for tool in &agent.tools {
            for name in tool.header_env_vars() {
                Self::validate_env_var(&format!("tool `{}`", tool.slug), "httpHeaders", name)?;
            }
        }
        Ok(())
    }
}
