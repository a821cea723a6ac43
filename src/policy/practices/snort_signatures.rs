use tracing::trace;

use crate::policy::{
    archive::{JsonArchive, Loadable, OnInvalid},
    error::CompileResult,
    resolver::resolve,
    vocabulary::{MODE_ACTIONS, Mode},
};

/// Snort signature files attached to a practice.
///
/// The same model backs the OpenAPI schema validation slot, which carries an
/// identical shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnortSignatures {
    override_mode: Mode,
    config_map: Vec<String>,
    files: Vec<String>,
    is_temporary: bool,
}

impl Loadable for SnortSignatures {
    fn load(archive: &JsonArchive<'_>) -> CompileResult<Self> {
        trace!("Loading AppSec Snort Signatures practice");
        Ok(Self {
            override_mode: archive.read_mandatory_token(
                "overrideMode",
                Mode::Inactive,
                OnInvalid::Reject,
            )?,
            config_map: archive.read_optional("configmap", Vec::new())?,
            files: archive.read_optional("files", Vec::new())?,
            is_temporary: false,
        })
    }
}

impl SnortSignatures {
    pub fn mode(&self, default_mode: Mode) -> &'static str {
        *resolve(self.override_mode, default_mode, &MODE_ACTIONS)
    }

    pub fn add_file(&mut self, file_name: impl Into<String>) {
        self.files.push(file_name.into());
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn config_map(&self) -> &[String] {
        &self.config_map
    }

    pub fn is_temporary(&self) -> bool {
        self.is_temporary
    }

    pub fn set_temporary(&mut self, value: bool) {
        self.is_temporary = value;
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn add_file_appends_after_load() {
        let doc = json!({"overrideMode": "detect", "files": ["base.rules"], "configmap": ["cm"]});
        let archive = JsonArchive::from_value(&doc, "snortSignatures").unwrap();
        let mut practice = SnortSignatures::load(&archive).unwrap();

        practice.add_file("custom.rules");
        assert_eq!(practice.files(), ["base.rules", "custom.rules"]);
        assert_eq!(practice.config_map(), ["cm"]);
        assert_eq!(practice.mode(Mode::Prevent), "Detect");
    }

    #[test]
    fn temporary_flag_defaults_false() {
        let doc = json!({});
        let archive = JsonArchive::from_value(&doc, "snortSignatures").unwrap();
        let mut practice = SnortSignatures::load(&archive).unwrap();
        assert!(!practice.is_temporary());
        practice.set_temporary(true);
        assert!(practice.is_temporary());
    }

    #[test]
    fn invalid_override_mode_is_fatal() {
        let doc = json!({"overrideMode": "audit"});
        let archive = JsonArchive::from_value(&doc, "schemaValidation").unwrap();
        let err = SnortSignatures::load(&archive).unwrap_err();
        assert_eq!(err.field(), "schemaValidation.overrideMode");
    }
}
