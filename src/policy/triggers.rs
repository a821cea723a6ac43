//! Log trigger: which events get logged and where the logs are sent.

use tracing::trace;

use super::{
    archive::{JsonArchive, Loadable, OnInvalid},
    error::CompileResult,
    vocabulary::{ExtendedLoggingSeverity, LogFormat, LogProtocol},
};

pub const DEFAULT_LOG_SERVICE_PORT: u16 = 514;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessControlLogging {
    pub allow_events: bool,
    pub drop_events: bool,
}

impl Loadable for AccessControlLogging {
    fn load(archive: &JsonArchive<'_>) -> CompileResult<Self> {
        trace!("Loading AppSec Trigger - Access Control Logging");
        Ok(Self {
            allow_events: archive.read_optional("allowEvents", false)?,
            drop_events: archive.read_optional("dropEvents", true)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuspiciousEventsLogging {
    pub enabled: bool,
    pub response_body: bool,
    pub response_code: bool,
    pub min_severity: ExtendedLoggingSeverity,
}

impl Loadable for SuspiciousEventsLogging {
    fn load(archive: &JsonArchive<'_>) -> CompileResult<Self> {
        trace!("Loading AppSec Trigger - Additional Suspicious Events Logging");
        Ok(Self {
            enabled: archive.read_optional("enabled", true)?,
            response_body: archive.read_optional("responseBody", false)?,
            response_code: archive.read_optional("responseCode", true)?,
            min_severity: archive.read_token(
                "minSeverity",
                ExtendedLoggingSeverity::High,
                OnInvalid::Reject,
            )?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppsecLogging {
    pub detect_events: bool,
    pub prevent_events: bool,
    pub all_web_requests: bool,
}

impl Loadable for AppsecLogging {
    fn load(archive: &JsonArchive<'_>) -> CompileResult<Self> {
        trace!("Loading AppSec Trigger - AppSec Logging");
        Ok(Self {
            detect_events: archive.read_optional("detectEvents", false)?,
            prevent_events: archive.read_optional("preventEvents", true)?,
            all_web_requests: archive.read_optional("allWebRequests", false)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedLogging {
    pub http_headers: bool,
    pub request_body: bool,
    pub url_path: bool,
    pub url_query: bool,
}

impl Loadable for ExtendedLogging {
    fn load(archive: &JsonArchive<'_>) -> CompileResult<Self> {
        trace!("Loading AppSec Trigger Extended Logging");
        Ok(Self {
            http_headers: archive.read_optional("httpHeaders", false)?,
            request_body: archive.read_optional("requestBody", false)?,
            url_path: archive.read_optional("urlPath", false)?,
            url_query: archive.read_optional("urlQuery", false)?,
        })
    }
}

impl ExtendedLogging {
    pub fn any_enabled(&self) -> bool {
        self.http_headers || self.request_body || self.url_path || self.url_query
    }
}

/// Remote syslog or CEF collector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingService {
    pub address: String,
    pub proto: LogProtocol,
    pub port: u16,
}

impl Loadable for LoggingService {
    fn load(archive: &JsonArchive<'_>) -> CompileResult<Self> {
        Ok(Self {
            address: archive.read_optional("address", String::new())?,
            proto: archive.read_token("proto", LogProtocol::Tcp, OnInvalid::Reject)?,
            port: archive.read_optional("port", DEFAULT_LOG_SERVICE_PORT)?,
        })
    }
}

impl LoggingService {
    /// A service with no address is not configured
    pub fn is_needed(&self) -> bool {
        !self.address.is_empty()
    }

    pub fn url(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogDestination {
    pub cloud: bool,
    pub local_tuning: bool,
    pub stdout_format: LogFormat,
    pub log_to_agent: bool,
    pub syslog_service: LoggingService,
    pub cef_service: LoggingService,
}

impl Loadable for LogDestination {
    fn load(archive: &JsonArchive<'_>) -> CompileResult<Self> {
        trace!("Loading AppSec Trigger LogDestination");
        let stdout = match archive.read_object::<StdoutLogging>("stdout")? {
            Some(stdout) => stdout.format,
            None => LogFormat::Json,
        };
        Ok(Self {
            cloud: archive.read_optional("cloud", false)?,
            local_tuning: archive.read_optional("local-tuning", false)?,
            stdout_format: stdout,
            log_to_agent: archive.read_optional("logToAgent", true)?,
            syslog_service: archive.read_object_or_default("syslogService")?,
            cef_service: archive.read_object_or_default("cefService")?,
        })
    }
}

impl LogDestination {
    pub fn should_beautify_logs(&self) -> bool {
        self.stdout_format == LogFormat::JsonFormatted
    }
}

struct StdoutLogging {
    format: LogFormat,
}

impl Loadable for StdoutLogging {
    fn load(archive: &JsonArchive<'_>) -> CompileResult<Self> {
        Ok(Self {
            format: archive.read_token("format", LogFormat::Json, OnInvalid::Reject)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogTrigger {
    name: String,
    appsec_class_name: String,
    access_control_logging: AccessControlLogging,
    suspicious_events_logging: SuspiciousEventsLogging,
    appsec_logging: AppsecLogging,
    extended_logging: ExtendedLogging,
    log_destination: LogDestination,
}

impl Loadable for LogTrigger {
    fn load(archive: &JsonArchive<'_>) -> CompileResult<Self> {
        trace!("Loading AppSec log trigger configuration");
        Ok(Self {
            appsec_class_name: archive.read_optional("appsecClassName", String::new())?,
            access_control_logging: archive.read_object_or_default("accessControlLogging")?,
            suspicious_events_logging: archive
                .read_object_or_default("additionalSuspiciousEventsLogging")?,
            appsec_logging: archive.read_object_or_default("appsecLogging")?,
            extended_logging: archive.read_object_or_default("extendedLogging")?,
            log_destination: archive.read_object_or_default("logDestination")?,
            name: archive.read_optional("name", String::new())?,
        })
    }
}

impl LogTrigger {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn appsec_class_name(&self) -> &str {
        &self.appsec_class_name
    }

    pub fn access_control_logging(&self) -> &AccessControlLogging {
        &self.access_control_logging
    }

    pub fn suspicious_events_logging(&self) -> &SuspiciousEventsLogging {
        &self.suspicious_events_logging
    }

    pub fn appsec_logging(&self) -> &AppsecLogging {
        &self.appsec_logging
    }

    pub fn extended_logging(&self) -> &ExtendedLogging {
        &self.extended_logging
    }

    pub fn log_destination(&self) -> &LogDestination {
        &self.log_destination
    }
}
