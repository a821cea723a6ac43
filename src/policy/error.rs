/// Result alias used by every practice loader and the compile pipeline
pub type CompileResult<T> = Result<T, PolicyCompilationError>;

/// Fatal policy compilation failures.
///
/// Any of these aborts compilation of the whole enclosing document; callers
/// must not use a partially loaded practice.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum PolicyCompilationError {
    #[error("Invalid value '{value}' for '{field}': expected one of {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("Malformed field '{field}': {message}")]
    MalformedField { field: String, message: String },

    #[error("Field '{field}' must be an object")]
    NotAnObject { field: String },
}

impl PolicyCompilationError {
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        expected: &[&str],
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            expected: expected.join(", "),
        }
    }

    /// Dotted path of the offending field
    pub fn field(&self) -> &str {
        match self {
            Self::InvalidValue { field, .. }
            | Self::MalformedField { field, .. }
            | Self::NotAnObject { field } => field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_value_message_lists_domain() {
        let err = PolicyCompilationError::invalid_value(
            "intrusionPrevention.overrideMode",
            "block",
            &["prevent", "detect"],
        );
        assert_eq!(err.field(), "intrusionPrevention.overrideMode");
        assert_eq!(
            err.to_string(),
            "Invalid value 'block' for 'intrusionPrevention.overrideMode': expected one of prevent, detect"
        );
    }
}
