use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Lookup by an opaque key (e.g. a room's secret key) found nothing usable.
    /// The key itself is never echoed back.
    #[error("{entity} not found or inactive")]
    NotFoundByKey { entity: &'static str },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid transition from '{from}' to '{to}'")]
    InvalidTransition { from: &'static str, to: &'static str },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
