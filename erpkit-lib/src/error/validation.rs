//! Field-level validation errors

/// A problem with a single form field.
///
/// These are surfaced next to the control that owns the field and are never
/// propagated further.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// The field is required but empty.
    #[error("{field} is required")]
    Required { field: String },

    /// The value does not have the expected format.
    #[error("{field}: {message}")]
    Invalid { field: String, message: String },

    /// The backend rejected or failed to process the value.
    #[error("{message}")]
    Remote { field: String, message: String },
}

impl FieldError {
    /// Creates a required-field error.
    pub fn required(field: impl Into<String>) -> Self {
        Self::Required {
            field: field.into(),
        }
    }

    /// Creates a format error.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an error reported by the backend.
    pub fn remote(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The field this error belongs to.
    pub fn field(&self) -> &str {
        match self {
            Self::Required { field } | Self::Invalid { field, .. } | Self::Remote { field, .. } => {
                field
            }
        }
    }
}
