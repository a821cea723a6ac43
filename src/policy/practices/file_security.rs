//! File security practice and its archive / large-file inspection settings.

use tracing::trace;

use crate::policy::{
    archive::{JsonArchive, Loadable, OnInvalid},
    error::CompileResult,
    vocabulary::{ConfidenceAction, Mode, SeverityLevel, SizeUnit},
};

pub const DEFAULT_SIZE_LIMIT: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveInspection {
    extract_archive_files: bool,
    scan_max_file_size: u64,
    scan_max_file_size_unit: SizeUnit,
    archived_files_within_archived_files: ConfidenceAction,
    archived_files_where_content_extraction_failed: ConfidenceAction,
}

impl Loadable for ArchiveInspection {
    fn load(archive: &JsonArchive<'_>) -> CompileResult<Self> {
        trace!("Loading AppSec File Security Archive Inspection practice");
        Ok(Self {
            extract_archive_files: archive.read_optional("extractArchiveFiles", false)?,
            scan_max_file_size: archive.read_optional("scanMaxFileSize", DEFAULT_SIZE_LIMIT)?,
            scan_max_file_size_unit: archive.read_token(
                "scanMaxFileSizeUnit",
                SizeUnit::Megabytes,
                OnInvalid::Reject,
            )?,
            archived_files_within_archived_files: archive.read_token(
                "archivedFilesWithinArchivedFiles",
                ConfidenceAction::Inherited,
                OnInvalid::Reject,
            )?,
            archived_files_where_content_extraction_failed: archive.read_token(
                "archivedFilesWhereContentExtractionFailed",
                ConfidenceAction::Inherited,
                OnInvalid::Fallback(ConfidenceAction::Inactive),
            )?,
        })
    }
}

impl ArchiveInspection {
    pub fn archive_file_size_limit(&self) -> u64 {
        self.scan_max_file_size_unit.to_bytes(self.scan_max_file_size)
    }

    pub fn required_archive_extraction(&self) -> bool {
        self.extract_archive_files
    }

    pub fn multi_level_archive_action(&self) -> ConfidenceAction {
        self.archived_files_within_archived_files
    }

    pub fn unopened_archive_action(&self) -> ConfidenceAction {
        self.archived_files_where_content_extraction_failed
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LargeFileInspection {
    file_size_limit: u64,
    file_size_limit_unit: SizeUnit,
    files_exceeding_size_limit_action: ConfidenceAction,
}

impl Loadable for LargeFileInspection {
    fn load(archive: &JsonArchive<'_>) -> CompileResult<Self> {
        trace!("Loading AppSec File Security large File Inspection practice");
        Ok(Self {
            file_size_limit: archive.read_optional("fileSizeLimit", DEFAULT_SIZE_LIMIT)?,
            file_size_limit_unit: archive.read_token(
                "fileSizeLimitUnit",
                SizeUnit::Megabytes,
                OnInvalid::Reject,
            )?,
            files_exceeding_size_limit_action: archive.read_token(
                "filesExceedingSizeLimitAction",
                ConfidenceAction::Inherited,
                OnInvalid::Reject,
            )?,
        })
    }
}

impl LargeFileInspection {
    pub fn file_size_limit(&self) -> u64 {
        self.file_size_limit_unit.to_bytes(self.file_size_limit)
    }

    pub fn file_size_limit_action(&self) -> ConfidenceAction {
        self.files_exceeding_size_limit_action
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSecurity {
    override_mode: Mode,
    min_severity_level: SeverityLevel,
    high_confidence_event_action: ConfidenceAction,
    medium_confidence_event_action: ConfidenceAction,
    low_confidence_event_action: ConfidenceAction,
    unnamed_files_action: ConfidenceAction,
    threat_emulation_enabled: bool,
    archive_inspection: ArchiveInspection,
    large_file_inspection: LargeFileInspection,
}

impl Loadable for FileSecurity {
    fn load(archive: &JsonArchive<'_>) -> CompileResult<Self> {
        trace!("Loading AppSec File Security practice");
        let inactive = OnInvalid::Fallback(ConfidenceAction::Inactive);
        Ok(Self {
            override_mode: archive.read_mandatory_token(
                "overrideMode",
                Mode::Inactive,
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
                inactive,
            )?,
            medium_confidence_event_action: archive.read_token(
                "mediumConfidenceEventAction",
                ConfidenceAction::Inherited,
                inactive,
            )?,
            low_confidence_event_action: archive.read_token(
                "lowConfidenceEventAction",
                ConfidenceAction::Detect,
                inactive,
            )?,
            unnamed_files_action: archive.read_token(
                "unnamedFilesAction",
                ConfidenceAction::Inherited,
                inactive,
            )?,
            threat_emulation_enabled: archive.read_optional("threatEmulationEnabled", false)?,
            archive_inspection: archive.read_object_or_default("archiveInspection")?,
            large_file_inspection: archive.read_object_or_default("largeFileInspection")?,
        })
    }
}

impl FileSecurity {
    pub fn override_mode(&self) -> Mode {
        self.override_mode
    }

    pub fn min_severity_level(&self) -> SeverityLevel {
        self.min_severity_level
    }

    pub fn high_confidence_event_action(&self) -> ConfidenceAction {
        self.high_confidence_event_action
    }

    pub fn medium_confidence_event_action(&self) -> ConfidenceAction {
        self.medium_confidence_event_action
    }

    pub fn low_confidence_event_action(&self) -> ConfidenceAction {
        self.low_confidence_event_action
    }

    pub fn unnamed_files_action(&self) -> ConfidenceAction {
        self.unnamed_files_action
    }

    pub fn threat_emulation_enabled(&self) -> bool {
        self.threat_emulation_enabled
    }

    pub fn archive_inspection(&self) -> &ArchiveInspection {
        &self.archive_inspection
    }

    pub fn large_file_inspection(&self) -> &LargeFileInspection {
        &self.large_file_inspection
    }
}
