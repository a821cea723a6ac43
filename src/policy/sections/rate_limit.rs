//! Access control rulebase: rate-limit rules per asset.

use serde::Serialize;
use uuid::Uuid;

use super::LogTriggerSection;
use crate::policy::{
    practices::{AccessControlPractice, RateLimitRule},
    vocabulary::Mode,
};

const ANY: &str = "Any";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateLimitRulesTriggerSection {
    id: String,
    name: String,
    #[serde(rename = "type")]
    kind: String,
}

impl RateLimitRulesTriggerSection {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: kind.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<&LogTriggerSection> for RateLimitRulesTriggerSection {
    fn from(trigger: &LogTriggerSection) -> Self {
        Self::new(trigger.trigger_id(), trigger.trigger_name(), trigger.trigger_type())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateLimitRulesSection {
    id: String,
    #[serde(rename = "URI")]
    uri: String,
    scope: &'static str,
    triggers: Vec<RateLimitRulesTriggerSection>,
    limit: i64,
}

impl RateLimitRulesSection {
    /// `seed` makes the rule id unique within the rulebase while keeping it
    /// stable across compilations
    pub fn new(
        rule: &RateLimitRule,
        seed: &str,
        trigger: Option<&RateLimitRulesTriggerSection>,
    ) -> Self {
        let name = format!("rate-limit-rule:{seed}:{}", rule.uri());
        Self {
            id: Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()).to_string(),
            uri: rule.uri().to_string(),
            scope: rule.unit().scope(),
            triggers: trigger
                .filter(|t| rule.references_trigger(t.name()))
                .cloned()
                .into_iter()
                .collect(),
            limit: rule.limit(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn triggers(&self) -> &[RateLimitRulesTriggerSection] {
        &self.triggers
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitSection {
    context: String,
    mode: &'static str,
    practice_id: String,
    name: String,
    rules: Vec<RateLimitRulesSection>,
}

impl RateLimitSection {
    pub fn new(
        asset_name: &str,
        url: &str,
        uri: &str,
        practice_id: &str,
        practice: &AccessControlPractice,
        trigger: Option<&RateLimitRulesTriggerSection>,
        default_mode: Mode,
    ) -> Self {
        let any = asset_name == ANY && url == ANY && uri == ANY;
        let context = if any {
            "All()".to_string()
        } else {
            format!("assetId({url}{uri})")
        };

        let rate_limit = practice.rate_limit();
        let rules = rate_limit
            .rules()
            .iter()
            .enumerate()
            .map(|(i, rule)| {
                RateLimitRulesSection::new(rule, &format!("{practice_id}/{url}{uri}/{i}"), trigger)
            })
            .collect();

        Self {
            context,
            mode: rate_limit.mode(practice.mode(default_mode)),
            practice_id: practice_id.to_string(),
            name: practice.name().to_string(),
            rules,
        }
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn mode(&self) -> &str {
        self.mode
    }

    pub fn rules(&self) -> &[RateLimitRulesSection] {
        &self.rules
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct AccessControlRulebaseSection {
    access_control: Vec<String>,
    traditional_firewall: Vec<String>,
    #[serde(rename = "l4firewall")]
    l4_firewall: Vec<String>,
    rate_limit: Vec<RateLimitSection>,
}

/// Serialized as `{"rulebase": {..., "rateLimit": [...]}}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccessControlRulebaseWrapper {
    rulebase: AccessControlRulebaseSection,
}

impl AccessControlRulebaseWrapper {
    pub fn new(rate_limit: Vec<RateLimitSection>) -> Self {
        Self {
            rulebase: AccessControlRulebaseSection {
                rate_limit,
                ..Default::default()
            },
        }
    }

    pub fn rate_limit(&self) -> &[RateLimitSection] {
        &self.rulebase.rate_limit
    }
}
