//! Closed vocabularies of the policy language and the tables that translate
//! them into the terms enforcement engines expect.
//!
//! Every enumerated field is parsed once at the document boundary into one of
//! the enums below. Action tables are partial on purpose: the deferring modes
//! (`as-top-level`, `inherited`) are never keys, so only
//! [`resolve`](super::resolver::resolve) may dereference them after
//! substituting the contextual default.

use std::fmt;

/// A closed set of wire tokens
pub trait Vocabulary: Sized + Copy {
    /// Every accepted token, in declaration order
    const TOKENS: &'static [&'static str];

    fn parse(token: &str) -> Option<Self>;

    fn as_str(&self) -> &'static str;
}

macro_rules! vocabulary {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $token:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl Vocabulary for $name {
            const TOKENS: &'static [&'static str] = &[$($token),+];

            fn parse(token: &str) -> Option<Self> {
                match token {
                    $($token => Some(Self::$variant),)+
                    _ => None,
                }
            }

            fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $token),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

vocabulary! {
    /// Enforcement stance requested for a practice or one of its sub-fields
    Mode {
        Prevent => "prevent",
        Detect => "detect",
        Inactive => "inactive",
        PreventLearn => "prevent-learn",
        DetectLearn => "detect-learn",
        AsTopLevel => "as-top-level",
        Inherited => "inherited",
    }
}

impl Mode {
    /// `as-top-level` and `inherited` both defer to the enclosing scope
    pub fn is_inherited(&self) -> bool {
        matches!(self, Mode::AsTopLevel | Mode::Inherited)
    }
}

vocabulary! {
    /// Per-confidence-tier action; the learn variants are not allowed here
    ConfidenceAction {
        Prevent => "prevent",
        Detect => "detect",
        Inactive => "inactive",
        AsTopLevel => "as-top-level",
        Inherited => "inherited",
    }
}

impl From<ConfidenceAction> for Mode {
    fn from(action: ConfidenceAction) -> Self {
        match action {
            ConfidenceAction::Prevent => Mode::Prevent,
            ConfidenceAction::Detect => Mode::Detect,
            ConfidenceAction::Inactive => Mode::Inactive,
            ConfidenceAction::AsTopLevel => Mode::AsTopLevel,
            ConfidenceAction::Inherited => Mode::Inherited,
        }
    }
}

vocabulary! {
    ConfidenceLevel {
        Medium => "medium",
        High => "high",
        Critical => "critical",
    }
}

vocabulary! {
    SeverityLevel {
        Low => "low",
        Medium => "medium",
        High => "high",
        Critical => "critical",
    }
}

impl SeverityLevel {
    /// Minimum-severity filter in engine terms
    pub fn qualifier(&self) -> &'static str {
        match self {
            SeverityLevel::Low => "Low or above",
            SeverityLevel::Medium => "Medium or above",
            SeverityLevel::High => "High or above",
            SeverityLevel::Critical => "Critical",
        }
    }
}

vocabulary! {
    PerformanceImpact {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

impl PerformanceImpact {
    /// Maximum-impact filter in engine terms
    pub fn qualifier(&self) -> &'static str {
        match self {
            PerformanceImpact::Low => "Low or lower",
            PerformanceImpact::Medium => "Medium or lower",
            PerformanceImpact::High => "High or lower",
        }
    }
}

vocabulary! {
    SizeUnit {
        Bytes => "bytes",
        Kilobytes => "KB",
        Megabytes => "MB",
        Gigabytes => "GB",
    }
}

impl SizeUnit {
    pub fn multiplier(&self) -> u64 {
        match self {
            SizeUnit::Bytes => 1,
            SizeUnit::Kilobytes => 1024,
            SizeUnit::Megabytes => 1_048_576,
            SizeUnit::Gigabytes => 1_073_741_824,
        }
    }

    /// Saturates instead of wrapping on absurd quantities
    pub fn to_bytes(&self, quantity: u64) -> u64 {
        quantity.saturating_mul(self.multiplier())
    }
}

vocabulary! {
    RateLimitUnit {
        Minute => "minute",
        Second => "second",
    }
}

impl RateLimitUnit {
    pub fn scope(&self) -> &'static str {
        match self {
            RateLimitUnit::Minute => "Minute",
            RateLimitUnit::Second => "Second",
        }
    }
}

vocabulary! {
    LogProtocol {
        Tcp => "tcp",
        Udp => "udp",
    }
}

vocabulary! {
    LogFormat {
        Json => "json",
        JsonFormatted => "json-formatted",
    }
}

vocabulary! {
    /// Minimum severity for additional suspicious-event logging
    ExtendedLoggingSeverity {
        High => "high",
        Critical => "critical",
    }
}

/// Partial mapping from concrete modes to an engine vocabulary
#[derive(Debug)]
pub struct ActionTable<V: 'static> {
    name: &'static str,
    entries: &'static [(Mode, V)],
}

impl<V> ActionTable<V> {
    pub const fn new(name: &'static str, entries: &'static [(Mode, V)]) -> Self {
        Self { name, entries }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get(&self, mode: Mode) -> Option<&V> {
        self.entries
            .iter()
            .find(|(key, _)| *key == mode)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, mode: Mode) -> bool {
        self.get(mode).is_some()
    }
}

/// Practice and confidence-tier actions
pub static MODE_ACTIONS: ActionTable<&str> = ActionTable::new(
    "mode actions",
    &[
        (Mode::PreventLearn, "Prevent"),
        (Mode::DetectLearn, "Detect"),
        (Mode::Prevent, "Prevent"),
        (Mode::Detect, "Detect"),
        (Mode::Inactive, "Inactive"),
    ],
);

/// Anti-bot engine calls an inactive practice "Disabled"
pub static ANTI_BOT_ACTIONS: ActionTable<&str> = ActionTable::new(
    "anti-bot actions",
    &[
        (Mode::PreventLearn, "Prevent"),
        (Mode::DetectLearn, "Detect"),
        (Mode::Prevent, "Prevent"),
        (Mode::Detect, "Detect"),
        (Mode::Inactive, "Disabled"),
    ],
);

pub static ACCESS_CONTROL_ACTIONS: ActionTable<&str> = ActionTable::new(
    "access control actions",
    &[
        (Mode::Prevent, "Active"),
        (Mode::PreventLearn, "Active"),
        (Mode::Detect, "Detect"),
        (Mode::DetectLearn, "Detect"),
        (Mode::Inactive, "Inactive"),
    ],
);

/// Resolved action value the engines treat as blocking
pub const PREVENT_ACTION: &str = "Prevent";

/// Minimum-confidence marker used whenever the practice is not preventing
pub const TRANSPARENT_MODE: &str = "Transparent";
