use tracing_subscriber::EnvFilter;

use crate::{
    config::models::CompilerSettings,
    policy::{Mode, Vocabulary},
};

/// Validation result type alias
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Settings validation errors
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid field '{field}': {message}")]
    InvalidField { field: String, message: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },
}

pub struct SettingsValidator;

impl SettingsValidator {
    /// Validate all settings, reporting every problem at once
    pub fn validate(settings: &CompilerSettings) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_default_mode(&settings.default_mode) {
            errors.push(e);
        }

        if let Err(e) = Self::validate_log_level(&settings.log_level) {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::ValidationFailed {
                message: Self::format_multiple_errors(errors),
            })
        }
    }

    fn validate_default_mode(mode: &str) -> ValidationResult<()> {
        match Mode::parse(mode) {
            Some(_) => Ok(()),
            None => Err(ValidationError::InvalidField {
                field: "default_mode".to_string(),
                message: format!(
                    "'{mode}' is not a mode, expected one of {}",
                    Mode::TOKENS.join(", ")
                ),
            }),
        }
    }

    fn validate_log_level(level: &str) -> ValidationResult<()> {
        EnvFilter::try_new(level)
            .map(|_| ())
            .map_err(|e| ValidationError::InvalidField {
                field: "log_level".to_string(),
                message: e.to_string(),
            })
    }

    fn format_multiple_errors(errors: Vec<ValidationError>) -> String {
        if errors.len() == 1 {
            return errors[0].to_string();
        }

        let mut message = format!("Found {} validation errors:\n", errors.len());
        for (i, error) in errors.iter().enumerate() {
            message.push_str(&format!("  {}. {}\n", i + 1, error));
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(SettingsValidator::validate(&CompilerSettings::default()).is_ok());
    }

    #[test]
    fn test_deferring_default_mode_is_accepted() {
        let settings = CompilerSettings {
            default_mode: "inherited".to_string(),
            ..CompilerSettings::default()
        };
        assert!(SettingsValidator::validate(&settings).is_ok());
    }

    #[test]
    fn test_unknown_default_mode() {
        let settings = CompilerSettings {
            default_mode: "block".to_string(),
            ..CompilerSettings::default()
        };
        let err = SettingsValidator::validate(&settings).unwrap_err();
        assert!(err.to_string().contains("default_mode"));
        assert!(err.to_string().contains("prevent-learn"));
    }

    #[test]
    fn test_all_errors_are_reported() {
        let settings = CompilerSettings {
            default_mode: "block".to_string(),
            log_level: "practice_compiler=loud".to_string(),
            ..CompilerSettings::default()
        };
        let err = SettingsValidator::validate(&settings).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Found 2 validation errors"));
        assert!(message.contains("log_level"));
    }
}
