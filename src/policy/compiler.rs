//! Practice document to engine documents, in one pass.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use super::{
    archive::{JsonArchive, Loadable},
    error::CompileResult,
    practice_spec::PracticeSpec,
    practices::AccessControlPractice,
    sections::{
        AccessControlRulebaseWrapper, AssetIdentity, FileSecurityProtectionsSection,
        FileSecuritySection, IpsProtectionsSection, IpsSection, LogTriggerSection,
        ProtectionsSection, RateLimitRulesTriggerSection, RateLimitSection,
        SnortProtectionsSection, SnortSection, WebAppSection, WebApplicationSection,
    },
    triggers::LogTrigger,
    vocabulary::Mode,
};
use crate::tracing_setup::configure_component_tracing;

/// Every engine document generated for one asset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompiledPolicy {
    #[serde(rename = "IPS")]
    ips: IpsSection,
    #[serde(rename = "FileSecurity")]
    file_security: FileSecuritySection,
    #[serde(rename = "IPSSnortSigs")]
    snort: SnortSection,
    #[serde(rename = "WebApplicationSecurity")]
    web_application: WebApplicationSection,
}

impl CompiledPolicy {
    pub fn ips(&self) -> &IpsSection {
        &self.ips
    }

    pub fn file_security(&self) -> &FileSecuritySection {
        &self.file_security
    }

    pub fn snort(&self) -> &SnortSection {
        &self.snort
    }

    pub fn web_application(&self) -> &WebApplicationSection {
        &self.web_application
    }

    /// Attach converted signature files to the Snort section
    pub fn add_snort_protections(&mut self, protections: ProtectionsSection) {
        self.snort.add_protections(protections);
    }

    /// Add the sections for every practice present in `spec`
    pub fn add_practice(&mut self, spec: &PracticeSpec, identity: &AssetIdentity, asset_default: Mode) {
        let _span = configure_component_tracing("practice-sections").entered();
        let default_mode = spec.mode(asset_default);
        debug!(
            practice = spec.name(),
            asset = %identity.asset_name,
            default_mode = %default_mode,
            "Generating practice sections"
        );

        if let Some(ips) = spec.intrusion_prevention() {
            self.ips
                .push(IpsProtectionsSection::new(identity, ips, default_mode));
        }
        if let Some(file_security) = spec.file_security() {
            self.file_security.push(FileSecurityProtectionsSection::new(
                identity,
                file_security,
                default_mode,
            ));
        }
        if let Some(snort) = spec.snort_signatures() {
            self.snort
                .push(SnortProtectionsSection::new(identity, snort, default_mode));
        }
        if let Some(web_attacks) = spec.web_attacks() {
            self.web_application.push(WebAppSection::new(
                identity,
                web_attacks,
                spec.anti_bot(),
                default_mode,
            ));
        }
    }
}

/// Load a practice document and generate its sections.
///
/// Fails without producing any output if any fatal field is invalid.
pub fn compile_practice(
    document: &Value,
    identity: &AssetIdentity,
    asset_default: Mode,
) -> CompileResult<CompiledPolicy> {
    let spec = PracticeSpec::from_document(document)?;

    let mut identity = identity.clone();
    if identity.practice_name.is_empty() {
        identity.practice_name = spec.name().to_string();
    }

    let mut policy = CompiledPolicy::default();
    policy.add_practice(&spec, &identity, asset_default);

    info!(
        practice = spec.name(),
        asset = %identity.asset_name,
        ips = policy.ips.protections().len(),
        file_security = policy.file_security.protections().len(),
        snort = policy.snort.snort_protections().len(),
        web_application = policy.web_application.sections().len(),
        "Compiled practice"
    );
    Ok(policy)
}

/// Load an access control practice, and optionally the log trigger its
/// rules reference, into a rate-limit rulebase for one route.
///
/// `url` and `uri` locate the route; the rulebase applies to every asset
/// when they and the asset name are all `Any`.
pub fn compile_access_control(
    practice_document: &Value,
    trigger_document: Option<&Value>,
    identity: &AssetIdentity,
    url: &str,
    uri: &str,
    asset_default: Mode,
) -> CompileResult<AccessControlRulebaseWrapper> {
    let _span = configure_component_tracing("rate-limit").entered();

    let archive = JsonArchive::from_value(practice_document, "accessControl")?;
    let practice = AccessControlPractice::load(&archive)?;
    let trigger = trigger_document
        .map(|document| -> CompileResult<RateLimitRulesTriggerSection> {
            let trigger = LogTrigger::load(&JsonArchive::from_value(document, "logTrigger")?)?;
            Ok(RateLimitRulesTriggerSection::from(&LogTriggerSection::new(&trigger)))
        })
        .transpose()?;

    let section = RateLimitSection::new(
        &identity.asset_name,
        url,
        uri,
        &identity.practice_id,
        &practice,
        trigger.as_ref(),
        asset_default,
    );

    info!(
        practice = practice.name(),
        asset = %identity.asset_name,
        rules = section.rules().len(),
        mode = section.mode(),
        "Compiled rate limit"
    );
    Ok(AccessControlRulebaseWrapper::new(vec![section]))
}
