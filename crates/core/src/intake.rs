//! Intake form rules: field value types and join-time answer validation.
//!
//! A room defines an ordered set of form fields. When a user joins, the
//! submitted answers must reference only that room's fields, must cover every
//! required field with a non-blank value, and must parse as the field's type.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::error::CoreError;
use crate::types::DbId;

/// Maximum length of a field label (characters).
pub const MAX_LABEL_LENGTH: usize = 100;

/// Maximum length of a single answer value (characters).
pub const MAX_ANSWER_LENGTH: usize = 1_000;

/// Maximum number of fields a room may define.
pub const MAX_FIELDS_PER_ROOM: usize = 50;

/// Value type of a form field. Stored as lowercase text in `form_fields.field_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Email,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Email => "email",
        }
    }

    /// Check a non-blank value against this type.
    fn accepts(self, value: &str) -> bool {
        match self {
            FieldType::Text => true,
            FieldType::Number => value.parse::<f64>().is_ok_and(f64::is_finite),
            FieldType::Email => value.validate_email(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(FieldType::Text),
            "number" => Ok(FieldType::Number),
            "email" => Ok(FieldType::Email),
            other => Err(CoreError::Validation(format!(
                "Invalid field type '{other}'. Must be one of: [\"text\", \"number\", \"email\"]"
            ))),
        }
    }
}

/// The parts of a stored form field that answer validation needs.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub id: DbId,
    pub label: String,
    pub field_type: FieldType,
    pub required: bool,
}

/// One submitted answer in a join request.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnswerInput {
    pub field_id: DbId,
    pub value: String,
}

/// Validate join answers against a room's fields.
///
/// Checks, in order: every answer references a field of this room, no field
/// is answered twice, values fit [`MAX_ANSWER_LENGTH`], every required field
/// has a non-blank answer, and non-blank values match their field type.
pub fn validate_answers(fields: &[FieldRule], answers: &[AnswerInput]) -> Result<(), CoreError> {
    let mut seen: HashSet<DbId> = HashSet::with_capacity(answers.len());

    for answer in answers {
        let field = fields
            .iter()
            .find(|f| f.id == answer.field_id)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unknown form field id {} for this room",
                    answer.field_id
                ))
            })?;

        if !seen.insert(answer.field_id) {
            return Err(CoreError::Validation(format!(
                "Field '{}' is answered more than once",
                field.label
            )));
        }

        if answer.value.chars().count() > MAX_ANSWER_LENGTH {
            return Err(CoreError::Validation(format!(
                "Answer for '{}' exceeds maximum length of {MAX_ANSWER_LENGTH} characters",
                field.label
            )));
        }
    }

    for field in fields {
        let value = answers
            .iter()
            .find(|a| a.field_id == field.id)
            .map(|a| a.value.trim())
            .unwrap_or_default();

        if value.is_empty() {
            if field.required {
                return Err(CoreError::Validation(format!(
                    "Field '{}' is required",
                    field.label
                )));
            }
            continue;
        }

        if !field.field_type.accepts(value) {
            return Err(CoreError::Validation(format!(
                "Field '{}' must be a valid {}",
                field.label, field.field_type
            )));
        }
    }

    Ok(())
}

/// Validate a field label supplied when defining a room's form.
pub fn validate_label(label: &str) -> Result<(), CoreError> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Field label must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_LABEL_LENGTH {
        return Err(CoreError::Validation(format!(
            "Field label exceeds maximum length of {MAX_LABEL_LENGTH} characters"
        )));
    }
    Ok(())
}
