//! Snort signature sections plus the pass-through protections documents
//! produced by the signature converter.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use super::AssetIdentity;
use crate::policy::{
    error::{CompileResult, PolicyCompilationError},
    practices::SnortSignatures,
    vocabulary::Mode,
};

pub const SNORT_VERSION_ID: &str = "LocalVersion";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnortProtectionsSection {
    context: String,
    mode: &'static str,
    files: Vec<String>,
    asset_name: String,
    asset_id: String,
    practice_name: String,
    practice_id: String,
    source_identifier: String,
}

impl SnortProtectionsSection {
    pub fn new(identity: &AssetIdentity, practice: &SnortSignatures, default_mode: Mode) -> Self {
        Self {
            context: identity.context.clone(),
            mode: practice.mode(default_mode),
            files: practice.files().to_vec(),
            asset_name: identity.asset_name.clone(),
            asset_id: identity.asset_id.clone(),
            practice_name: identity.practice_name.clone(),
            practice_id: identity.practice_id.clone(),
            source_identifier: identity.source_identifier.clone(),
        }
    }

    pub fn mode(&self) -> &str {
        self.mode
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionRules {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "SSM")]
    pub ssm: String,
    pub keywords: String,
    pub context: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProtectionMetadata {
    pub protection_name: String,
    pub severity: String,
    pub confidence_level: String,
    pub performance_impact: String,
    pub last_update: String,
    pub maintrain_id: String,
    pub tags: Vec<String>,
    pub cve_list: Vec<String>,
    pub silent: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProtectionsProtectionsSection {
    pub protection_metadata: ProtectionMetadata,
    pub detection_rules: DetectionRules,
}

/// One converted signature file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProtectionsSection {
    pub name: String,
    pub modification_time: String,
    pub protections: Vec<ProtectionsProtectionsSection>,
}

#[derive(Deserialize)]
struct ProtectionsSectionWrapper {
    #[serde(rename = "IPSSnortSigs", default)]
    protections: ProtectionsSection,
}

impl ProtectionsSection {
    /// Read a converter output document of the form `{"IPSSnortSigs": {...}}`
    pub fn from_document(document: &Value) -> CompileResult<Self> {
        trace!("Loading Snort protections section");
        serde_json::from_value::<ProtectionsSectionWrapper>(document.clone())
            .map(|wrapper| wrapper.protections)
            .map_err(|e| PolicyCompilationError::MalformedField {
                field: "IPSSnortSigs".to_string(),
                message: e.to_string(),
            })
    }
}

/// Serialized as
/// `{"VersionId": "LocalVersion", "SnortProtections": [...], "protections": [...]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnortSection {
    #[serde(rename = "VersionId")]
    version_id: &'static str,
    #[serde(rename = "SnortProtections")]
    snort_protections: Vec<SnortProtectionsSection>,
    protections: Vec<ProtectionsSection>,
}

impl Default for SnortSection {
    fn default() -> Self {
        Self {
            version_id: SNORT_VERSION_ID,
            snort_protections: Vec::new(),
            protections: Vec::new(),
        }
    }
}

impl SnortSection {
    pub fn push(&mut self, section: SnortProtectionsSection) {
        self.snort_protections.push(section);
    }

    pub fn add_protections(&mut self, protections: ProtectionsSection) {
        self.protections.push(protections);
    }

    pub fn snort_protections(&self) -> &[SnortProtectionsSection] {
        &self.snort_protections
    }

    pub fn protections(&self) -> &[ProtectionsSection] {
        &self.protections
    }
}
