//! Field-level validation state.

use erpkit_lib::error::FieldError;

/// Where to display validation errors for a widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorDisplay {
    /// Show error message below the widget (default).
    #[default]
    Below,
    /// Show error message inline/to the right of the widget.
    Inline,
    /// Don't display error message - widget only shows error styling.
    None,
}

/// Check a required field. Whitespace-only counts as empty.
pub fn require(field: &str, value: Option<&str>) -> Result<(), FieldError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(FieldError::required(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require() {
        assert!(require("role", Some("owner")).is_ok());
        assert_eq!(require("role", Some("  ")), Err(FieldError::required("role")));
        assert_eq!(require("role", None), Err(FieldError::required("role")));
    }
}
