use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use eyre::{Context, Result};
use serde_json::Value;

use crate::config::models::{CompilerSettings, ENV_PREFIX};

fn file_format(path: &Path) -> FileFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => FileFormat::Yaml,
        Some("json") => FileFormat::Json,
        Some("ini") => FileFormat::Ini,
        _ => FileFormat::Toml,
    }
}

/// Load settings from an optional file, then apply `PRACTICE_COMPILER_*`
/// environment overrides
pub fn load_settings(settings_path: Option<&Path>) -> Result<CompilerSettings> {
    let mut builder = Config::builder();

    if let Some(path) = settings_path {
        builder = builder.add_source(File::new(
            path.to_str()
                .ok_or_else(|| eyre::eyre!("Invalid UTF-8 path: {}", path.display()))?,
            file_format(path),
        ));
    }

    let settings = builder
        .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
        .build()
        .context("Failed to build compiler settings")?;

    settings
        .try_deserialize()
        .context("Failed to deserialize compiler settings")
}

/// Read a JSON policy document
pub fn load_policy_document(policy_path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(policy_path)
        .with_context(|| format!("Failed to read policy from {}", policy_path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse policy from {}", policy_path.display()))
}
