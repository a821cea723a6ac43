use serde::Serialize;

use super::AssetIdentity;
use crate::policy::{
    practices::{AntiBot, WebAttacks},
    vocabulary::Mode,
};

const INACTIVE_ACTION: &str = "Inactive";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeAdvancedConfig {
    http_header_max_size: i64,
    http_illegal_methods_allowed: bool,
    http_request_body_max_size: i64,
    json_max_object_depth: i64,
    url_max_size: i64,
}

impl From<&WebAttacks> for PracticeAdvancedConfig {
    fn from(practice: &WebAttacks) -> Self {
        Self {
            http_header_max_size: practice.max_header_size_bytes(),
            http_illegal_methods_allowed: practice.protections().non_valid_http_methods(),
            http_request_body_max_size: practice.max_body_size_kb(),
            json_max_object_depth: practice.max_object_depth(),
            url_max_size: practice.max_url_size_bytes(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BotProtection {
    mode: &'static str,
    injected: Vec<String>,
    validated: Vec<String>,
}

impl BotProtection {
    pub fn new(practice: &AntiBot, default_mode: Mode) -> Self {
        Self {
            mode: practice.mode(default_mode),
            injected: practice.injected_uris().to_vec(),
            validated: practice.validated_uris().to_vec(),
        }
    }
}

/// Web application firewall settings for one asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebAppSection {
    context: String,
    rule_name: String,
    asset_name: String,
    asset_id: String,
    practice_name: String,
    practice_id: String,
    web_attack_mitigation: bool,
    web_attack_mitigation_mode: &'static str,
    web_attack_mitigation_action: &'static str,
    csrf_protection: &'static str,
    error_disclosure: &'static str,
    open_redirect: &'static str,
    practice_advanced_config: PracticeAdvancedConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    bot_protection: Option<BotProtection>,
}

impl WebAppSection {
    pub fn new(
        identity: &AssetIdentity,
        practice: &WebAttacks,
        anti_bot: Option<&AntiBot>,
        default_mode: Mode,
    ) -> Self {
        let mode = practice.mode(default_mode);
        let protections = practice.protections();
        Self {
            context: identity.context.clone(),
            rule_name: identity.asset_name.clone(),
            asset_name: identity.asset_name.clone(),
            asset_id: identity.asset_id.clone(),
            practice_name: identity.practice_name.clone(),
            practice_id: identity.practice_id.clone(),
            web_attack_mitigation: mode != INACTIVE_ACTION,
            web_attack_mitigation_mode: mode,
            web_attack_mitigation_action: practice.minimum_confidence(default_mode),
            csrf_protection: protections.csrf_protection_mode(default_mode),
            error_disclosure: protections.error_disclosure_mode(default_mode),
            open_redirect: protections.open_redirect_mode(default_mode),
            practice_advanced_config: practice.into(),
            bot_protection: anti_bot.map(|bot| BotProtection::new(bot, default_mode)),
        }
    }

    pub fn web_attack_mitigation(&self) -> bool {
        self.web_attack_mitigation
    }

    pub fn web_attack_mitigation_mode(&self) -> &str {
        self.web_attack_mitigation_mode
    }

    pub fn web_attack_mitigation_action(&self) -> &str {
        self.web_attack_mitigation_action
    }
}

/// Serialized as `{"WebAppSecurity": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WebApplicationSection {
    #[serde(rename = "WebAppSecurity")]
    web_app_security: Vec<WebAppSection>,
}

impl WebApplicationSection {
    pub fn push(&mut self, section: WebAppSection) {
        self.web_app_security.push(section);
    }

    pub fn sections(&self) -> &[WebAppSection] {
        &self.web_app_security
    }
}
