//! Engine-facing documents generated from loaded practices.
//!
//! Generators never validate: every model handed to them already loaded
//! successfully. They resolve deferring modes against the default they are
//! given, translate vocabularies and copy the asset identity.

pub mod file_security;
pub mod ips;
pub mod log_trigger;
pub mod rate_limit;
pub mod snort;
pub mod web_app;

use serde::{Deserialize, Serialize};

pub use file_security::{FileSecurityProtectionsSection, FileSecuritySection};
pub use ips::{IpsProtectionsRulesSection, IpsProtectionsSection, IpsSection};
pub use log_trigger::LogTriggerSection;
pub use rate_limit::{
    AccessControlRulebaseWrapper, RateLimitRulesSection, RateLimitRulesTriggerSection,
    RateLimitSection,
};
pub use snort::{
    DetectionRules, ProtectionMetadata, ProtectionsProtectionsSection, ProtectionsSection,
    SnortProtectionsSection, SnortSection,
};
pub use web_app::{BotProtection, PracticeAdvancedConfig, WebAppSection, WebApplicationSection};

/// Where a practice is attached, copied into every generated section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssetIdentity {
    pub context: String,
    pub asset_name: String,
    pub asset_id: String,
    pub practice_name: String,
    pub practice_id: String,
    pub source_identifier: String,
}

impl AssetIdentity {
    pub fn new(asset_name: impl Into<String>, asset_id: impl Into<String>) -> Self {
        let asset_id = asset_id.into();
        Self {
            context: format!("assetId({asset_id})"),
            asset_name: asset_name.into(),
            asset_id,
            ..Self::default()
        }
    }

    pub fn with_practice(mut self, name: impl Into<String>, id: impl Into<String>) -> Self {
        self.practice_name = name.into();
        self.practice_id = id.into();
        self
    }

    pub fn with_source_identifier(mut self, source_identifier: impl Into<String>) -> Self {
        self.source_identifier = source_identifier.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_builds_asset_context() {
        let identity = AssetIdentity::new("shop", "a1b2")
            .with_practice("best-practice", "p-1")
            .with_source_identifier("ingress");
        assert_eq!(identity.context, "assetId(a1b2)");
        assert_eq!(identity.practice_id, "p-1");
        assert_eq!(identity.source_identifier, "ingress");
    }
}
