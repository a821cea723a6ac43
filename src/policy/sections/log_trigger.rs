use serde::Serialize;
use uuid::Uuid;

use crate::policy::{triggers::LogTrigger, vocabulary::Vocabulary};

const TRIGGER_TYPE: &str = "log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verbosity {
    Standard,
    Extended,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogTriggerSection {
    #[serde(skip)]
    id: String,
    context: String,
    trigger_name: String,
    trigger_type: &'static str,
    verbosity: Verbosity,
    ac_allow: bool,
    ac_drop: bool,
    compliance_violations: bool,
    compliance_warnings: bool,
    extend_logging_min_severity: &'static str,
    extend_logging: bool,
    log_to_agent: bool,
    log_to_cef: bool,
    log_to_cloud: bool,
    #[serde(rename = "logTolocalTuning")]
    log_to_local_tuning: bool,
    log_to_syslog: bool,
    response_body: bool,
    response_code: bool,
    tp_detect: bool,
    tp_prevent: bool,
    web_body: bool,
    web_headers: bool,
    web_requests: bool,
    web_url_path: bool,
    web_url_query: bool,
    url_for_syslog: String,
    url_for_cef: String,
    format_logging_output: bool,
}

impl LogTriggerSection {
    pub fn new(trigger: &LogTrigger) -> Self {
        let id = Self::trigger_id_for(trigger.name());
        let access_control = trigger.access_control_logging();
        let suspicious = trigger.suspicious_events_logging();
        let appsec = trigger.appsec_logging();
        let extended = trigger.extended_logging();
        let destination = trigger.log_destination();

        Self {
            context: format!("triggerId({id})"),
            id,
            trigger_name: trigger.name().to_string(),
            trigger_type: TRIGGER_TYPE,
            verbosity: if extended.any_enabled() {
                Verbosity::Extended
            } else {
                Verbosity::Standard
            },
            ac_allow: access_control.allow_events,
            ac_drop: access_control.drop_events,
            compliance_violations: false,
            compliance_warnings: false,
            extend_logging_min_severity: suspicious.min_severity.as_str(),
            extend_logging: suspicious.enabled,
            log_to_agent: destination.log_to_agent,
            log_to_cef: destination.cef_service.is_needed(),
            log_to_cloud: destination.cloud,
            log_to_local_tuning: destination.local_tuning,
            log_to_syslog: destination.syslog_service.is_needed(),
            response_body: suspicious.response_body,
            response_code: false,
            tp_detect: appsec.detect_events,
            tp_prevent: appsec.prevent_events,
            web_body: extended.request_body,
            web_headers: extended.http_headers,
            web_requests: appsec.all_web_requests,
            web_url_path: extended.url_path,
            web_url_query: extended.url_query,
            url_for_syslog: destination.syslog_service.url(),
            url_for_cef: destination.cef_service.url(),
            format_logging_output: destination.should_beautify_logs(),
        }
    }

    /// Deterministic id derived from the trigger name
    pub fn trigger_id_for(name: &str) -> String {
        let seed = format!("log-trigger:{name}");
        Uuid::new_v5(&Uuid::NAMESPACE_OID, seed.as_bytes()).to_string()
    }

    pub fn trigger_id(&self) -> &str {
        &self.id
    }

    pub fn trigger_name(&self) -> &str {
        &self.trigger_name
    }

    pub fn trigger_type(&self) -> &str {
        self.trigger_type
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::policy::{
        archive::{JsonArchive, Loadable},
        sections::RateLimitRulesTriggerSection,
    };

    fn trigger(doc: Value) -> LogTrigger {
        LogTrigger::load(&JsonArchive::from_value(&doc, "logTrigger").unwrap()).unwrap()
    }

    #[test]
    fn standard_trigger_serializes_engine_keys() {
        let section = LogTriggerSection::new(&trigger(json!({"name": "log-all"})));
        let value = serde_json::to_value(&section).unwrap();

        assert_eq!(value["triggerName"], "log-all");
        assert_eq!(value["triggerType"], "log");
        assert_eq!(value["verbosity"], "Standard");
        assert_eq!(value["extendLoggingMinSeverity"], "high");
        assert_eq!(value["logTolocalTuning"], false);
        assert_eq!(value["responseCode"], false);
        assert_eq!(value["urlForSyslog"], ":514");
        assert_eq!(
            value["context"],
            format!("triggerId({})", section.trigger_id())
        );
        assert!(value.get("id").is_none());
    }

    #[test]
    fn extended_flags_raise_verbosity() {
        let section = LogTriggerSection::new(&trigger(json!({
            "name": "verbose",
            "extendedLogging": {"httpHeaders": true},
            "logDestination": {"cefService": {"address": "cef.local", "port": 601}}
        })));
        assert_eq!(section.verbosity(), Verbosity::Extended);

        let value = serde_json::to_value(&section).unwrap();
        assert_eq!(value["webHeaders"], true);
        assert_eq!(value["logToCef"], true);
        assert_eq!(value["urlForCef"], "cef.local:601");
    }

    #[test]
    fn trigger_ids_are_stable_per_name() {
        let first = LogTriggerSection::new(&trigger(json!({"name": "log-all"})));
        let second = LogTriggerSection::new(&trigger(json!({"name": "log-all"})));
        let other = LogTriggerSection::new(&trigger(json!({"name": "log-none"})));

        assert_eq!(first.trigger_id(), second.trigger_id());
        assert_ne!(first.trigger_id(), other.trigger_id());
    }

    #[test]
    fn converts_to_rate_limit_trigger() {
        let section = LogTriggerSection::new(&trigger(json!({"name": "log-all"})));
        let rule_trigger = RateLimitRulesTriggerSection::from(&section);
        assert_eq!(rule_trigger.name(), "log-all");
    }
}
