//! The practice document: one optional model per security capability plus
//! the practice-level mode every nested practice inherits from.

use tracing::trace;

use super::{
    archive::{JsonArchive, Loadable, OnInvalid},
    error::CompileResult,
    practices::{AntiBot, FileSecurity, IntrusionPrevention, SnortSignatures, WebAttacks},
    resolver::inherit_mode,
    vocabulary::Mode,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeSpec {
    appsec_class_name: String,
    name: String,
    practice_mode: Mode,
    web_attacks: Option<WebAttacks>,
    anti_bot: Option<AntiBot>,
    intrusion_prevention: Option<IntrusionPrevention>,
    file_security: Option<FileSecurity>,
    snort_signatures: Option<SnortSignatures>,
    schema_validation: Option<SnortSignatures>,
}

impl Loadable for PracticeSpec {
    fn load(archive: &JsonArchive<'_>) -> CompileResult<Self> {
        trace!("Loading AppSec practice spec");
        Ok(Self {
            schema_validation: archive.read_object("schemaValidation")?,
            appsec_class_name: archive.read_optional("appsecClassName", String::new())?,
            file_security: archive.read_object("fileSecurity")?,
            intrusion_prevention: archive.read_object("intrusionPrevention")?,
            snort_signatures: archive.read_object("snortSignatures")?,
            web_attacks: archive.read_object("webAttacks")?,
            anti_bot: archive.read_object("antiBot")?,
            name: archive.read_optional("name", String::new())?,
            practice_mode: archive.read_token("practiceMode", Mode::Inherited, OnInvalid::Reject)?,
        })
    }
}

impl PracticeSpec {
    /// Load a whole practice document
    pub fn from_document(document: &serde_json::Value) -> CompileResult<Self> {
        Self::load(&JsonArchive::from_value(document, "")?)
    }

    pub fn appsec_class_name(&self) -> &str {
        &self.appsec_class_name
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Practice-level default handed to every nested practice
    pub fn mode(&self, default_mode: Mode) -> Mode {
        inherit_mode(self.practice_mode, default_mode)
    }

    pub fn web_attacks(&self) -> Option<&WebAttacks> {
        self.web_attacks.as_ref()
    }

    pub fn anti_bot(&self) -> Option<&AntiBot> {
        self.anti_bot.as_ref()
    }

    pub fn intrusion_prevention(&self) -> Option<&IntrusionPrevention> {
        self.intrusion_prevention.as_ref()
    }

    pub fn file_security(&self) -> Option<&FileSecurity> {
        self.file_security.as_ref()
    }

    pub fn snort_signatures(&self) -> Option<&SnortSignatures> {
        self.snort_signatures.as_ref()
    }

    pub fn snort_signatures_mut(&mut self) -> Option<&mut SnortSignatures> {
        self.snort_signatures.as_mut()
    }

    pub fn schema_validation(&self) -> Option<&SnortSignatures> {
        self.schema_validation.as_ref()
    }
}
