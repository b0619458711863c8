//! Field validation helpers shared by request DTOs.

use validator::ValidationErrors;

use crate::error::CoreError;

/// Grade categories a subject can belong to.
pub const SUBJECT_CATEGORIES: &[&str] = &["KELAS_7", "KELAS_8", "KELAS_9"];

/// Validate a subject category against [`SUBJECT_CATEGORIES`].
pub fn validate_category(category: &str) -> Result<(), CoreError> {
    if SUBJECT_CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid category '{category}'. Must be one of: {SUBJECT_CATEGORIES:?}"
        )))
    }
}

/// Reject empty or whitespace-only text for a required field.
pub fn require_non_blank(value: &str, field: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be blank")));
    }
    Ok(())
}

impl From<ValidationErrors> for CoreError {
    /// Flatten derive-based validation errors into one readable message,
    /// sorted by field name so the output is stable.
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => format!("{field}: {msg}"),
                    None => format!("{field}: invalid ({})", e.code),
                })
            })
            .collect();
        messages.sort();
        CoreError::Validation(messages.join("; "))
    }
}
