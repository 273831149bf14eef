//! Room models and DTOs.

use antrean_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::form_field::{CreateFormField, FormField};

/// A row from the `rooms` table.
///
/// Includes the secret join key; only serialize to the owning company.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Room {
    pub id: DbId,
    pub company_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub secret_key: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A room with its form fields in display order.
#[derive(Debug, Clone, Serialize)]
pub struct RoomWithFields {
    #[serde(flatten)]
    pub room: Room,
    pub fields: Vec<FormField>,
}

/// What a prospective joiner sees when looking a room up by its key.
///
/// Omits the key itself and the owning company id.
#[derive(Debug, Clone, Serialize)]
pub struct RoomPreview {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<FormField>,
}

impl From<RoomWithFields> for RoomPreview {
    fn from(value: RoomWithFields) -> Self {
        Self {
            id: value.room.id,
            name: value.room.name,
            description: value.room.description,
            fields: value.fields,
        }
    }
}

/// DTO for creating a room together with its form fields.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoom {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<CreateFormField>,
}

/// DTO for updating a room. All fields are optional.
///
/// When `fields` is present the room's field set is replaced wholesale.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRoom {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub fields: Option<Vec<CreateFormField>>,
}
