//! Form field model and DTO.

use antrean_core::error::CoreError;
use antrean_core::intake::{FieldRule, FieldType};
use antrean_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `form_fields` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FormField {
    pub id: DbId,
    pub room_id: DbId,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub required: bool,
    pub display_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl FormField {
    /// Convert to the rule used for join-time answer validation.
    pub fn rule(&self) -> Result<FieldRule, CoreError> {
        Ok(FieldRule {
            id: self.id,
            label: self.label.clone(),
            field_type: self.field_type.parse()?,
            required: self.required,
        })
    }
}

/// DTO for one field in a room's form definition.
///
/// Display order is taken from the field's position in the submitted list.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFormField {
    pub label: String,
    #[serde(rename = "type", alias = "field_type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
}
