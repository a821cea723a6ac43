use tracing::trace;

use crate::policy::{
    archive::{JsonArchive, Loadable, OnInvalid},
    error::CompileResult,
    resolver::resolve,
    vocabulary::{ConfidenceAction, MODE_ACTIONS, Mode, PerformanceImpact, SeverityLevel},
};

pub const DEFAULT_MIN_CVE_YEAR: i32 = 2016;

/// One confidence tier of the IPS rule set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpsRule {
    pub action: &'static str,
    pub confidence_level: &'static str,
    pub performance_impact: PerformanceImpact,
    pub severity_level: SeverityLevel,
    pub protections_from_year: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntrusionPrevention {
    override_mode: Mode,
    max_performance_impact: PerformanceImpact,
    min_severity_level: SeverityLevel,
    high_confidence_event_action: ConfidenceAction,
    medium_confidence_event_action: ConfidenceAction,
    low_confidence_event_action: ConfidenceAction,
    min_cve_year: i32,
}

impl Loadable for IntrusionPrevention {
    fn load(archive: &JsonArchive<'_>) -> CompileResult<Self> {
        trace!("Loading AppSec Intrusion Prevention practice");
        Ok(Self {
            override_mode: archive.read_mandatory_token(
                "overrideMode",
                Mode::Inactive,
                OnInvalid::Reject,
            )?,
            max_performance_impact: archive.read_token(
                "maxPerformanceImpact",
                PerformanceImpact::Medium,
                OnInvalid::Reject,
            )?,
            min_severity_level: archive.read_token(
                "minSeverityLevel",
                SeverityLevel::Medium,
                OnInvalid::Fallback(SeverityLevel::Low),
            )?,
            high_confidence_event_action: archive.read_token(
                "highConfidenceEventAction",
                ConfidenceAction::Inherited,
                OnInvalid::Reject,
            )?,
            medium_confidence_event_action: archive.read_token(
                "mediumConfidenceEventAction",
                ConfidenceAction::Inherited,
                OnInvalid::Reject,
            )?,
            low_confidence_event_action: archive.read_token(
                "lowConfidenceEventAction",
                ConfidenceAction::Detect,
                OnInvalid::Reject,
            )?,
            min_cve_year: archive.read_optional("minCveYear", DEFAULT_MIN_CVE_YEAR)?,
        })
    }
}

impl IntrusionPrevention {
    pub fn mode(&self, default_mode: Mode) -> &'static str {
        *resolve(self.override_mode, default_mode, &MODE_ACTIONS)
    }

    /// Always three rows: High, Medium, Low
    pub fn create_ips_rules(&self, default_mode: Mode) -> Vec<IpsRule> {
        [
            ("High", self.high_confidence_event_action),
            ("Medium", self.medium_confidence_event_action),
            ("Low", self.low_confidence_event_action),
        ]
        .into_iter()
        .map(|(confidence_level, action)| IpsRule {
            action: *resolve(action.into(), default_mode, &MODE_ACTIONS),
            confidence_level,
            performance_impact: self.max_performance_impact,
            severity_level: self.min_severity_level,
            protections_from_year: self.min_cve_year,
        })
        .collect()
    }

    pub fn max_performance_impact(&self) -> PerformanceImpact {
        self.max_performance_impact
    }

    pub fn min_severity_level(&self) -> SeverityLevel {
        self.min_severity_level
    }

    pub fn min_cve_year(&self) -> i32 {
        self.min_cve_year
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn load(doc: Value) -> CompileResult<IntrusionPrevention> {
        IntrusionPrevention::load(&JsonArchive::from_value(&doc, "intrusionPrevention")?)
    }

    #[test]
    fn rules_cover_three_tiers_in_order() {
        let practice = load(json!({
            "overrideMode": "prevent",
            "maxPerformanceImpact": "high",
            "minSeverityLevel": "critical",
            "highConfidenceEventAction": "prevent",
            "mediumConfidenceEventAction": "detect",
            "lowConfidenceEventAction": "inactive",
            "minCveYear": 2020
        }))
        .unwrap();

        let rules = practice.create_ips_rules(Mode::Detect);
        let tiers: Vec<_> = rules.iter().map(|r| r.confidence_level).collect();
        assert_eq!(tiers, ["High", "Medium", "Low"]);
        let actions: Vec<_> = rules.iter().map(|r| r.action).collect();
        assert_eq!(actions, ["Prevent", "Detect", "Inactive"]);
        assert!(rules.iter().all(|r| r.protections_from_year == 2020));
        assert!(rules.iter().all(|r| r.severity_level == SeverityLevel::Critical));
        assert!(rules.iter().all(|r| r.performance_impact == PerformanceImpact::High));
    }

    #[test]
    fn defaults_and_inherited_high_tier() {
        let practice = load(json!({"highConfidenceEventAction": "inherited"})).unwrap();
        assert_eq!(practice.min_cve_year(), 2016);
        assert_eq!(practice.max_performance_impact(), PerformanceImpact::Medium);
        assert_eq!(practice.min_severity_level(), SeverityLevel::Medium);

        let rules = practice.create_ips_rules(Mode::Detect);
        assert_eq!(rules[0].action, "Detect");
        assert_eq!(rules[1].action, "Detect");
        assert_eq!(rules[2].action, "Detect");
    }

    #[test]
    fn invalid_severity_falls_back_to_low() {
        let practice = load(json!({"minSeverityLevel": "extreme"})).unwrap();
        assert_eq!(practice.min_severity_level(), SeverityLevel::Low);
    }

    #[test]
    fn fatal_fields_abort_loading() {
        for (key, value) in [
            ("overrideMode", "block"),
            ("maxPerformanceImpact", "critical"),
            ("highConfidenceEventAction", "prevent-learn"),
            ("mediumConfidenceEventAction", "learn"),
            ("lowConfidenceEventAction", "detect-learn"),
        ] {
            let err = load(json!({ key: value })).unwrap_err();
            assert_eq!(err.field(), format!("intrusionPrevention.{key}"));
        }
    }

    #[test]
    fn mode_defers_to_default() {
        let practice = load(json!({"overrideMode": "as-top-level"})).unwrap();
        assert_eq!(practice.mode(Mode::Prevent), "Prevent");
        assert_eq!(practice.mode(Mode::Inherited), "Inactive");
    }
}
