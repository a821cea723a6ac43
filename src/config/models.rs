//! Compiler settings.
//!
//! Map directly to TOML / YAML / JSON settings files and to
//! `PRACTICE_COMPILER_*` environment variables. Every field has a default so
//! the compiler runs without any settings file.
use serde::{Deserialize, Serialize};

use crate::policy::{Mode, Vocabulary};

pub const ENV_PREFIX: &str = "PRACTICE_COMPILER";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CompilerSettings {
    /// Asset-level mode used when a practice defers to its parent
    pub default_mode: String,
    /// `EnvFilter` directive, e.g. "info" or "practice_compiler=debug"
    pub log_level: String,
    pub json_logs: bool,
    /// Pretty-print the compiled JSON
    pub pretty_output: bool,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            default_mode: Mode::Inactive.as_str().to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            pretty_output: true,
        }
    }
}

impl CompilerSettings {
    /// Parsed default mode, `None` if the configured token is unknown
    pub fn default_mode(&self) -> Option<Mode> {
        Mode::parse(&self.default_mode)
    }
}
