use std::borrow::Cow;
use std::collections::BTreeMap;

use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

/// Human-readable validation messages keyed by field path.
///
/// Nested collection entries are keyed as `items[0].quantity`.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Run the derived `validator` rules and flatten any failures into [`FieldErrors`].
pub fn check<T: Validate>(payload: &T) -> Result<(), FieldErrors> {
    payload.validate().map_err(|errs| flatten(&errs))
}

pub fn flatten(errors: &ValidationErrors) -> FieldErrors {
    let mut out = FieldErrors::new();
    collect(errors, None, &mut out);
    out
}

fn collect(errors: &ValidationErrors, prefix: Option<&str>, out: &mut FieldErrors) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(p) => format!("{}.{}", p, field),
            None => field.to_string(),
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                let messages = out.entry(path).or_default();
                messages.extend(errs.iter().map(describe));
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, Some(&path), out),
            ValidationErrorsKind::List(entries) => {
                for (index, inner) in entries {
                    let entry_path = format!("{}[{}]", path, index);
                    collect(inner, Some(&entry_path), out);
                }
            }
        }
    }
}

fn describe(error: &ValidationError) -> String {
    match &error.message {
        Some(message) => message.to_string(),
        None => match error.code.as_ref() {
            "email" => "Enter a valid email address".to_string(),
            "length" => "Has an invalid length".to_string(),
            "range" => "Is out of range".to_string(),
            code => format!("Is invalid ({})", code),
        },
    }
}

/// Upper bound on staff notes, in characters.
pub const MAX_ADMIN_NOTES: usize = 5000;

/// Records an `admin_notes` error when `notes` is over [`MAX_ADMIN_NOTES`].
pub fn check_admin_notes(notes: Option<&str>, errors: &mut FieldErrors) {
    if notes.is_some_and(|n| n.chars().count() > MAX_ADMIN_NOTES) {
        push(errors, "admin_notes", "Must be at most 5000 characters");
    }
}

/// Add a single message under `field`.
pub fn push(errors: &mut FieldErrors, field: &str, message: impl Into<String>) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.into());
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("blank", "Is required"));
    }
    Ok(())
}

/// Catalog references are opaque slugs or ids: no whitespace, no control characters.
pub fn catalog_reference(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("blank", "Must reference a catalog item"));
    }
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(invalid(
            "catalog_reference",
            "Must be a valid catalog item reference",
        ));
    }
    Ok(())
}
