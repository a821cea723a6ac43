use serde::Serialize;

use super::AssetIdentity;
use crate::policy::{
    practices::FileSecurity,
    resolver::{inherit_mode, resolve},
    vocabulary::{MODE_ACTIONS, Mode, PREVENT_ACTION},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSecurityProtectionsSection {
    context: String,
    rule_name: String,
    asset_name: String,
    asset_id: String,
    practice_name: String,
    practice_id: String,
    action: &'static str,
    files_without_name_action: &'static str,
    allow_files_without_name: bool,
    high_confidence: &'static str,
    medium_confidence: &'static str,
    low_confidence: &'static str,
    severity_level: &'static str,
    file_size_limit_action: &'static str,
    file_size_limit: u64,
    required_file_size_limit: bool,
    required_archive_extraction: bool,
    archive_file_size_limit: u64,
    #[serde(rename = "MultiLevelArchiveAction")]
    multi_level_archive_action: &'static str,
    #[serde(rename = "UnopenedArchiveAction")]
    unopened_archive_action: &'static str,
}

impl FileSecurityProtectionsSection {
    pub fn new(identity: &AssetIdentity, practice: &FileSecurity, default_mode: Mode) -> Self {
        let practice_action = inherit_mode(practice.override_mode(), default_mode);
        let action = |mode: Mode| *resolve(mode, practice_action, &MODE_ACTIONS);

        let archive = practice.archive_inspection();
        let large_file = practice.large_file_inspection();
        let unnamed_files_action = action(practice.unnamed_files_action().into());
        let large_file_action = action(large_file.file_size_limit_action().into());

        Self {
            context: identity.context.clone(),
            rule_name: identity.asset_name.clone(),
            asset_name: identity.asset_name.clone(),
            asset_id: identity.asset_id.clone(),
            practice_name: identity.practice_name.clone(),
            practice_id: identity.practice_id.clone(),
            action: action(practice.override_mode()),
            files_without_name_action: unnamed_files_action,
            allow_files_without_name: unnamed_files_action == PREVENT_ACTION,
            high_confidence: action(practice.high_confidence_event_action().into()),
            medium_confidence: action(practice.medium_confidence_event_action().into()),
            low_confidence: action(practice.low_confidence_event_action().into()),
            severity_level: practice.min_severity_level().qualifier(),
            file_size_limit_action: large_file_action,
            file_size_limit: large_file.file_size_limit(),
            required_file_size_limit: large_file_action == PREVENT_ACTION,
            required_archive_extraction: archive.required_archive_extraction(),
            archive_file_size_limit: archive.archive_file_size_limit(),
            multi_level_archive_action: action(archive.multi_level_archive_action().into()),
            unopened_archive_action: action(archive.unopened_archive_action().into()),
        }
    }

    pub fn action(&self) -> &str {
        self.action
    }

    pub fn required_file_size_limit(&self) -> bool {
        self.required_file_size_limit
    }

    pub fn allow_files_without_name(&self) -> bool {
        self.allow_files_without_name
    }

    pub fn file_size_limit(&self) -> u64 {
        self.file_size_limit
    }
}

/// Serialized as `{"FileSecurityProtections": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileSecuritySection {
    #[serde(rename = "FileSecurityProtections")]
    file_security: Vec<FileSecurityProtectionsSection>,
}

impl FileSecuritySection {
    pub fn push(&mut self, section: FileSecurityProtectionsSection) {
        self.file_security.push(section);
    }

    pub fn protections(&self) -> &[FileSecurityProtectionsSection] {
        &self.file_security
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::policy::archive::{JsonArchive, Loadable};

    fn section(doc: Value, default_mode: Mode) -> FileSecurityProtectionsSection {
        let practice =
            FileSecurity::load(&JsonArchive::from_value(&doc, "fileSecurity").unwrap()).unwrap();
        FileSecurityProtectionsSection::new(&AssetIdentity::new("shop", "a1"), &practice, default_mode)
    }

    #[test]
    fn inherited_large_file_action_under_detect_is_not_required() {
        let section = section(
            json!({
                "overrideMode": "inherited",
                "largeFileInspection": {"filesExceedingSizeLimitAction": "inherited"}
            }),
            Mode::Detect,
        );
        assert_eq!(section.action(), "Detect");
        assert!(!section.required_file_size_limit());
        assert!(!section.allow_files_without_name());
    }

    #[test]
    fn prevent_actions_set_required_flags() {
        let section = section(
            json!({
                "overrideMode": "detect",
                "unnamedFilesAction": "prevent",
                "largeFileInspection": {
                    "fileSizeLimit": 5,
                    "fileSizeLimitUnit": "KB",
                    "filesExceedingSizeLimitAction": "prevent"
                }
            }),
            Mode::Inactive,
        );
        assert!(section.required_file_size_limit());
        assert!(section.allow_files_without_name());
        assert_eq!(section.file_size_limit(), 5120);
    }

    #[test]
    fn tiers_inherit_the_practice_action() {
        let section = section(json!({"overrideMode": "prevent-learn"}), Mode::Detect);
        let value = serde_json::to_value(&section).unwrap();

        assert_eq!(value["action"], "Prevent");
        assert_eq!(value["highConfidence"], "Prevent");
        assert_eq!(value["mediumConfidence"], "Prevent");
        assert_eq!(value["lowConfidence"], "Detect");
        assert_eq!(value["filesWithoutNameAction"], "Prevent");
        assert_eq!(value["severityLevel"], "Medium or above");
        assert_eq!(value["MultiLevelArchiveAction"], "Prevent");
        assert_eq!(value["UnopenedArchiveAction"], "Prevent");
        assert_eq!(value["archiveFileSizeLimit"], 10_485_760);
        assert_eq!(value["requiredArchiveExtraction"], false);
    }
}
