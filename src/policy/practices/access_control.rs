//! Access control practice: per-URI rate limiting.

use tracing::trace;

use crate::policy::{
    archive::{JsonArchive, Loadable, OnInvalid},
    error::CompileResult,
    resolver::{inherit_mode, resolve},
    vocabulary::{ACCESS_CONTROL_ACTIONS, Mode, RateLimitUnit},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitRule {
    limit: i64,
    uri: String,
    unit: RateLimitUnit,
    comment: String,
    triggers: Vec<String>,
}

impl Loadable for RateLimitRule {
    fn load(archive: &JsonArchive<'_>) -> CompileResult<Self> {
        trace!("Loading Access control rate limit rules");
        Ok(Self {
            limit: archive.read_optional("limit", 0)?,
            uri: archive.read_optional("uri", String::new())?,
            unit: archive.read_token("unit", RateLimitUnit::Minute, OnInvalid::Reject)?,
            comment: archive.read_optional("comment", String::new())?,
            triggers: archive.read_optional("triggers", Vec::new())?,
        })
    }
}

impl RateLimitRule {
    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn unit(&self) -> RateLimitUnit {
        self.unit
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn triggers(&self) -> &[String] {
        &self.triggers
    }

    /// Whether a trigger, possibly namespaced as `namespace/name`, is listed
    /// on this rule
    pub fn references_trigger(&self, trigger_name: &str) -> bool {
        let short_name = trigger_name
            .split_once('/')
            .map_or(trigger_name, |(_, name)| name);
        self.triggers.iter().any(|t| t == short_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimit {
    override_mode: Mode,
    rules: Vec<RateLimitRule>,
}

impl Loadable for RateLimit {
    fn load(archive: &JsonArchive<'_>) -> CompileResult<Self> {
        trace!("Loading Access control rate limit");
        Ok(Self {
            override_mode: archive.read_mandatory_token(
                "overrideMode",
                Mode::Inactive,
                OnInvalid::Reject,
            )?,
            rules: archive.read_list("rules")?,
        })
    }
}

impl RateLimit {
    /// Resolved in rulebase terms, where preventing is "Active"
    pub fn mode(&self, default_mode: Mode) -> &'static str {
        *resolve(self.override_mode, default_mode, &ACCESS_CONTROL_ACTIONS)
    }

    pub fn rules(&self) -> &[RateLimitRule] {
        &self.rules
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessControlPractice {
    name: String,
    practice_mode: Mode,
    appsec_class_name: String,
    rate_limit: RateLimit,
}

impl Loadable for AccessControlPractice {
    fn load(archive: &JsonArchive<'_>) -> CompileResult<Self> {
        trace!("Loading AppSec access control practice spec");
        Ok(Self {
            name: archive.read_optional("name", String::new())?,
            practice_mode: archive.read_token("practiceMode", Mode::Inherited, OnInvalid::Reject)?,
            appsec_class_name: archive.read_optional("appsecClassName", String::new())?,
            rate_limit: archive.read_object_or_default("rateLimit")?,
        })
    }
}

impl AccessControlPractice {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn appsec_class_name(&self) -> &str {
        &self.appsec_class_name
    }

    pub fn mode(&self, default_mode: Mode) -> Mode {
        inherit_mode(self.practice_mode, default_mode)
    }

    pub fn rate_limit(&self) -> &RateLimit {
        &self.rate_limit
    }
}
