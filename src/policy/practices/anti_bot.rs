use tracing::trace;

use crate::policy::{
    archive::{JsonArchive, Loadable, OnInvalid},
    error::CompileResult,
    resolver::resolve,
    vocabulary::{ANTI_BOT_ACTIONS, Mode},
};

/// Anti-bot practice: URIs that get the client challenge injected and the
/// URIs on which it is validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AntiBot {
    override_mode: Mode,
    injected_uris: Vec<String>,
    validated_uris: Vec<String>,
}

impl Loadable for AntiBot {
    fn load(archive: &JsonArchive<'_>) -> CompileResult<Self> {
        trace!("Loading AppSec Web Bots");
        Ok(Self {
            injected_uris: archive.read_optional("injectedUris", Vec::new())?,
            validated_uris: archive.read_optional("validatedUris", Vec::new())?,
            override_mode: archive.read_mandatory_token(
                "overrideMode",
                Mode::Inactive,
                OnInvalid::Fallback(Mode::Inactive),
            )?,
        })
    }
}

impl AntiBot {
    pub fn injected_uris(&self) -> &[String] {
        &self.injected_uris
    }

    pub fn validated_uris(&self) -> &[String] {
        &self.validated_uris
    }

    /// Resolved through the anti-bot vocabulary, where inactive is "Disabled"
    pub fn mode(&self, default_mode: Mode) -> &'static str {
        *resolve(self.override_mode, default_mode, &ANTI_BOT_ACTIONS)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn load(doc: Value) -> AntiBot {
        let archive = JsonArchive::from_value(&doc, "antiBot").expect("object");
        AntiBot::load(&archive).expect("anti-bot loads")
    }

    #[test]
    fn inactive_is_disabled() {
        let practice = load(json!({"overrideMode": "inactive"}));
        assert_eq!(practice.mode(Mode::Prevent), "Disabled");
    }

    #[test]
    fn inherited_follows_default() {
        let practice = load(json!({"overrideMode": "inherited"}));
        assert_eq!(practice.mode(Mode::PreventLearn), "Prevent");
        assert_eq!(practice.mode(Mode::Inactive), "Disabled");
    }

    #[test]
    fn invalid_mode_falls_back_to_disabled() {
        let practice = load(json!({"overrideMode": "block-everything"}));
        assert_eq!(practice.mode(Mode::Prevent), "Disabled");
    }

    #[test]
    fn uri_lists_are_kept() {
        let practice = load(json!({
            "injectedUris": ["/login", "/checkout"],
            "validatedUris": ["/api/pay"]
        }));
        assert_eq!(practice.injected_uris(), ["/login", "/checkout"]);
        assert_eq!(practice.validated_uris(), ["/api/pay"]);
    }
}
