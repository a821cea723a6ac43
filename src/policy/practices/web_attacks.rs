//! Web attacks practice.

use tracing::trace;

use crate::policy::{
    archive::{JsonArchive, Loadable, OnInvalid},
    error::CompileResult,
    resolver::resolve,
    vocabulary::{ConfidenceLevel, MODE_ACTIONS, Mode, PREVENT_ACTION, TRANSPARENT_MODE, Vocabulary},
};

pub const DEFAULT_MAX_BODY_SIZE_KB: i64 = 1_000_000;
pub const DEFAULT_MAX_HEADER_SIZE_BYTES: i64 = 102_400;
pub const DEFAULT_MAX_OBJECT_DEPTH: i64 = 40;
pub const DEFAULT_MAX_URL_SIZE_BYTES: i64 = 32_768;

/// Optional attack classes, each with its own mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebAttackProtections {
    csrf_protection: Mode,
    error_disclosure: Mode,
    open_redirect: Mode,
    non_valid_http_methods: bool,
}

impl Loadable for WebAttackProtections {
    fn load(archive: &JsonArchive<'_>) -> CompileResult<Self> {
        trace!("Loading AppSec Web Attack Protections");
        Ok(Self {
            csrf_protection: archive.read_token("csrfProtection", Mode::Inactive, OnInvalid::Reject)?,
            error_disclosure: archive.read_token(
                "errorDisclosure",
                Mode::Inactive,
                OnInvalid::Reject,
            )?,
            open_redirect: archive.read_token("openRedirect", Mode::Inactive, OnInvalid::Reject)?,
            non_valid_http_methods: archive.read_optional("nonValidHttpMethods", false)?,
        })
    }
}

impl WebAttackProtections {
    pub fn csrf_protection_mode(&self, default_mode: Mode) -> &'static str {
        *resolve(self.csrf_protection, default_mode, &MODE_ACTIONS)
    }

    pub fn error_disclosure_mode(&self, default_mode: Mode) -> &'static str {
        *resolve(self.error_disclosure, default_mode, &MODE_ACTIONS)
    }

    pub fn open_redirect_mode(&self, default_mode: Mode) -> &'static str {
        *resolve(self.open_redirect, default_mode, &MODE_ACTIONS)
    }

    pub fn non_valid_http_methods(&self) -> bool {
        self.non_valid_http_methods
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebAttacks {
    mode: Mode,
    minimum_confidence: ConfidenceLevel,
    max_body_size_kb: i64,
    max_header_size_bytes: i64,
    max_object_depth: i64,
    max_url_size_bytes: i64,
    protections: WebAttackProtections,
}

impl Loadable for WebAttacks {
    fn load(archive: &JsonArchive<'_>) -> CompileResult<Self> {
        trace!("Loading AppSec practice web attacks spec");
        Ok(Self {
            protections: archive.read_object_or_default("protections")?,
            mode: archive.read_mandatory_token("overrideMode", Mode::Inactive, OnInvalid::Reject)?,
            minimum_confidence: archive.read_token(
                "minimumConfidence",
                ConfidenceLevel::Critical,
                OnInvalid::Reject,
            )?,
            max_body_size_kb: archive.read_optional("maxBodySizeKb", DEFAULT_MAX_BODY_SIZE_KB)?,
            max_header_size_bytes: archive
                .read_optional("maxHeaderSizeBytes", DEFAULT_MAX_HEADER_SIZE_BYTES)?,
            max_object_depth: archive.read_optional("maxObjectDepth", DEFAULT_MAX_OBJECT_DEPTH)?,
            max_url_size_bytes: archive
                .read_optional("maxUrlSizeBytes", DEFAULT_MAX_URL_SIZE_BYTES)?,
        })
    }
}

impl WebAttacks {
    /// Resolved practice action
    pub fn mode(&self, default_mode: Mode) -> &'static str {
        *resolve(self.mode, default_mode, &MODE_ACTIONS)
    }

    /// Confidence filtering only applies while preventing; any other
    /// resolved action yields the transparent marker
    pub fn minimum_confidence(&self, default_mode: Mode) -> &'static str {
        if self.mode(default_mode) != PREVENT_ACTION {
            return TRANSPARENT_MODE;
        }
        self.minimum_confidence.as_str()
    }

    pub fn max_body_size_kb(&self) -> i64 {
        self.max_body_size_kb
    }

    pub fn max_header_size_bytes(&self) -> i64 {
        self.max_header_size_bytes
    }

    pub fn max_object_depth(&self) -> i64 {
        self.max_object_depth
    }

    pub fn max_url_size_bytes(&self) -> i64 {
        self.max_url_size_bytes
    }

    pub fn protections(&self) -> &WebAttackProtections {
        &self.protections
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::policy::error::PolicyCompilationError;

    fn load(doc: Value) -> CompileResult<WebAttacks> {
        WebAttacks::load(&JsonArchive::from_value(&doc, "webAttacks")?)
    }

    #[test]
    fn defaults_apply_to_empty_practice() {
        let practice = load(json!({})).unwrap();
        assert_eq!(practice.max_body_size_kb(), 1_000_000);
        assert_eq!(practice.max_header_size_bytes(), 102_400);
        assert_eq!(practice.max_object_depth(), 40);
        assert_eq!(practice.max_url_size_bytes(), 32_768);
        assert_eq!(practice.mode(Mode::Prevent), "Inactive");
        assert!(!practice.protections().non_valid_http_methods());
    }

    #[test]
    fn minimum_confidence_is_transparent_unless_preventing() {
        let practice = load(json!({
            "overrideMode": "inherited",
            "minimumConfidence": "high"
        }))
        .unwrap();

        assert_eq!(practice.minimum_confidence(Mode::Prevent), "high");
        assert_eq!(practice.minimum_confidence(Mode::PreventLearn), "high");
        assert_eq!(practice.minimum_confidence(Mode::Detect), "Transparent");
        assert_eq!(practice.minimum_confidence(Mode::Inactive), "Transparent");
        assert_eq!(practice.minimum_confidence(Mode::Inherited), "Transparent");
    }

    #[test]
    fn explicit_mode_wins_over_default() {
        let practice = load(json!({"overrideMode": "detect-learn"})).unwrap();
        assert_eq!(practice.mode(Mode::Prevent), "Detect");
        assert_eq!(practice.minimum_confidence(Mode::Prevent), "Transparent");
    }

    #[test]
    fn protections_resolve_against_caller_default() {
        let practice = load(json!({
            "protections": {
                "csrfProtection": "inherited",
                "errorDisclosure": "prevent",
                "openRedirect": "as-top-level",
                "nonValidHttpMethods": true
            }
        }))
        .unwrap();

        let protections = practice.protections();
        assert_eq!(protections.csrf_protection_mode(Mode::Detect), "Detect");
        assert_eq!(protections.error_disclosure_mode(Mode::Detect), "Prevent");
        assert_eq!(protections.open_redirect_mode(Mode::Inactive), "Inactive");
        assert!(protections.non_valid_http_methods());
    }

    #[test]
    fn invalid_protection_mode_is_fatal() {
        let err = load(json!({"protections": {"openRedirect": "block"}})).unwrap_err();
        assert_eq!(err.field(), "webAttacks.protections.openRedirect");
    }

    #[test]
    fn invalid_minimum_confidence_is_fatal() {
        let err = load(json!({"minimumConfidence": "low"})).unwrap_err();
        assert!(matches!(err, PolicyCompilationError::InvalidValue { .. }));
    }

    #[test]
    fn invalid_override_mode_is_fatal() {
        let err = load(json!({"overrideMode": "enforce"})).unwrap_err();
        assert_eq!(err.field(), "webAttacks.overrideMode");
    }
}
