//! Per-capability practice models loaded from a practice document.

pub mod access_control;
pub mod anti_bot;
pub mod file_security;
pub mod intrusion_prevention;
pub mod snort_signatures;
pub mod web_attacks;

pub use access_control::{AccessControlPractice, RateLimit, RateLimitRule};
pub use anti_bot::AntiBot;
pub use file_security::{ArchiveInspection, FileSecurity, LargeFileInspection};
pub use intrusion_prevention::{IntrusionPrevention, IpsRule};
pub use snort_signatures::SnortSignatures;
pub use web_attacks::{WebAttackProtections, WebAttacks};
