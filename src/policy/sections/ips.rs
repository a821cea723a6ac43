use serde::Serialize;

use super::AssetIdentity;
use crate::policy::{
    practices::{IntrusionPrevention, IpsRule},
    vocabulary::Mode,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IpsProtectionsRulesSection {
    action: &'static str,
    confidence_level: &'static str,
    client_protections: bool,
    server_protections: bool,
    protection_tags: Vec<String>,
    protection_ids: Vec<String>,
    performance_impact: &'static str,
    severity_level: &'static str,
    protections_from_year: i32,
}

impl From<IpsRule> for IpsProtectionsRulesSection {
    fn from(rule: IpsRule) -> Self {
        Self {
            action: rule.action,
            confidence_level: rule.confidence_level,
            client_protections: true,
            server_protections: true,
            protection_tags: Vec::new(),
            protection_ids: Vec::new(),
            performance_impact: rule.performance_impact.qualifier(),
            severity_level: rule.severity_level.qualifier(),
            protections_from_year: rule.protections_from_year,
        }
    }
}

impl IpsProtectionsRulesSection {
    pub fn action(&self) -> &str {
        self.action
    }

    pub fn confidence_level(&self) -> &str {
        self.confidence_level
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IpsProtectionsSection {
    context: String,
    rule_name: String,
    asset_name: String,
    asset_id: String,
    practice_name: String,
    practice_id: String,
    source_identifier: String,
    default_action: &'static str,
    rules: Vec<IpsProtectionsRulesSection>,
}

impl IpsProtectionsSection {
    pub fn new(identity: &AssetIdentity, practice: &IntrusionPrevention, default_mode: Mode) -> Self {
        Self {
            context: identity.context.clone(),
            rule_name: identity.asset_name.clone(),
            asset_name: identity.asset_name.clone(),
            asset_id: identity.asset_id.clone(),
            practice_name: identity.practice_name.clone(),
            practice_id: identity.practice_id.clone(),
            source_identifier: identity.source_identifier.clone(),
            default_action: practice.mode(default_mode),
            rules: practice
                .create_ips_rules(default_mode)
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }

    pub fn default_action(&self) -> &str {
        self.default_action
    }

    pub fn rules(&self) -> &[IpsProtectionsRulesSection] {
        &self.rules
    }
}

/// Serialized as `{"IpsProtections": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IpsSection {
    #[serde(rename = "IpsProtections")]
    ips_protections: Vec<IpsProtectionsSection>,
}

impl IpsSection {
    pub fn push(&mut self, section: IpsProtectionsSection) {
        self.ips_protections.push(section);
    }

    pub fn protections(&self) -> &[IpsProtectionsSection] {
        &self.ips_protections
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::policy::archive::{JsonArchive, Loadable};

    #[test]
    fn section_serializes_with_engine_keys() {
        let doc = json!({
            "overrideMode": "inherited",
            "maxPerformanceImpact": "low",
            "minSeverityLevel": "high",
            "highConfidenceEventAction": "prevent"
        });
        let practice =
            IntrusionPrevention::load(&JsonArchive::from_value(&doc, "intrusionPrevention").unwrap())
                .unwrap();
        let identity = AssetIdentity::new("shop", "a1").with_practice("bp", "p1");

        let section = IpsProtectionsSection::new(&identity, &practice, Mode::Detect);
        let value = serde_json::to_value(&section).unwrap();

        assert_eq!(value["ruleName"], "shop");
        assert_eq!(value["assetName"], "shop");
        assert_eq!(value["context"], "assetId(a1)");
        assert_eq!(value["defaultAction"], "Detect");
        assert_eq!(
            value["rules"][0],
            json!({
                "action": "Prevent",
                "confidenceLevel": "High",
                "clientProtections": true,
                "serverProtections": true,
                "protectionTags": [],
                "protectionIds": [],
                "performanceImpact": "Low or lower",
                "severityLevel": "High or above",
                "protectionsFromYear": 2016
            })
        );
        assert_eq!(value["rules"][1]["action"], "Detect");
        assert_eq!(value["rules"][2]["confidenceLevel"], "Low");
    }

    #[test]
    fn container_wraps_protections() {
        let value = serde_json::to_value(IpsSection::default()).unwrap();
        assert_eq!(value, json!({"IpsProtections": []}));
    }
}
