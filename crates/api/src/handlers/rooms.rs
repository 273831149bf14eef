//! Handlers for the `/rooms` resource: room CRUD for companies, the join-key
//! preview, and the operator's ticket board.

use antrean_core::access::ensure_company_owns;
use antrean_core::error::CoreError;
use antrean_core::intake::{validate_label, MAX_FIELDS_PER_ROOM};
use antrean_core::room::{generate_secret_key, validate_description, validate_name};
use antrean_core::types::DbId;
use antrean_db::models::form_field::CreateFormField;
use antrean_db::models::queue_ticket::QueueBoard;
use antrean_db::models::room::{CreateRoom, Room, RoomPreview, RoomWithFields, UpdateRoom};
use antrean_db::models::user::Company;
use antrean_db::repositories::{
    CompanyRepo, FormFieldRepo, QueueSessionRepo, QueueTicketRepo, RoomRepo,
};
use antrean_db::{is_unique_violation, DbPool};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireCompany;
use crate::response::DataResponse;
use crate::state::AppState;

/// Attempts at generating a secret key that does not collide with an existing room.
const SECRET_KEY_ATTEMPTS: u32 = 3;

const SECRET_KEY_CONSTRAINT: &str = "uq_rooms_secret_key";

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/rooms
///
/// Create a room with its form fields. The secret join key is generated here.
pub async fn create(
    State(state): State<AppState>,
    RequireCompany(user): RequireCompany,
    Json(input): Json<CreateRoom>,
) -> AppResult<impl IntoResponse> {
    let company = caller_company(&state.pool, &user).await?;

    validate_name(&input.name)?;
    validate_description(input.description.as_deref())?;
    validate_fields(&input.fields)?;

    let mut attempt = 1;
    let room = loop {
        let secret_key = generate_secret_key();
        match RoomRepo::create_with_fields(&state.pool, company.id, &secret_key, &input).await {
            Ok(room) => break room,
            Err(err)
                if attempt < SECRET_KEY_ATTEMPTS
                    && is_unique_violation(&err, SECRET_KEY_CONSTRAINT) =>
            {
                tracing::warn!(attempt, "Secret key collision, regenerating");
                attempt += 1;
            }
            Err(err) => return Err(err.into()),
        }
    };

    tracing::info!(
        room_id = room.room.id,
        company_id = company.id,
        fields = room.fields.len(),
        "Room created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: room })))
}

/// GET /api/v1/rooms
///
/// List the caller's rooms, active and inactive.
pub async fn list(
    State(state): State<AppState>,
    RequireCompany(user): RequireCompany,
) -> AppResult<Json<DataResponse<Vec<Room>>>> {
    let company = caller_company(&state.pool, &user).await?;
    let rooms = RoomRepo::list_by_company(&state.pool, company.id).await?;
    Ok(Json(DataResponse { data: rooms }))
}

/// GET /api/v1/rooms/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireCompany(user): RequireCompany,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<RoomWithFields>>> {
    let room = owned_room(&state.pool, &user, id).await?;
    let fields = FormFieldRepo::list_for_room(&state.pool, room.id).await?;
    Ok(Json(DataResponse {
        data: RoomWithFields { room, fields },
    }))
}

/// PUT /api/v1/rooms/{id}
///
/// Update a room. When `fields` is present the whole field set is replaced.
pub async fn update(
    State(state): State<AppState>,
    RequireCompany(user): RequireCompany,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRoom>,
) -> AppResult<Json<DataResponse<RoomWithFields>>> {
    owned_room(&state.pool, &user, id).await?;

    if let Some(ref name) = input.name {
        validate_name(name)?;
    }
    validate_description(input.description.as_deref())?;
    if let Some(ref fields) = input.fields {
        validate_fields(fields)?;
    }

    let room = RoomRepo::update_with_fields(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Room", id }))?;

    tracing::info!(
        room_id = id,
        is_active = room.room.is_active,
        fields_replaced = input.fields.is_some(),
        "Room updated"
    );

    Ok(Json(DataResponse { data: room }))
}

/// DELETE /api/v1/rooms/{id}
///
/// Remove a room with its fields, sessions, and tickets. Returns 204.
pub async fn delete(
    State(state): State<AppState>,
    RequireCompany(user): RequireCompany,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    owned_room(&state.pool, &user, id).await?;

    if !RoomRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Room", id }));
    }

    tracing::info!(room_id = id, "Room deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/rooms/join/{secret_key}
///
/// Public preview of an active room so a client can render the intake form
/// before joining. Inactive rooms are reported as missing.
pub async fn preview(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(secret_key): Path<String>,
) -> AppResult<Json<DataResponse<RoomPreview>>> {
    let room = RoomRepo::find_active_by_secret_key(&state.pool, secret_key.trim())
        .await?
        .ok_or(AppError::Core(CoreError::NotFoundByKey { entity: "Room" }))?;
    let fields = FormFieldRepo::list_for_room(&state.pool, room.id).await?;

    Ok(Json(DataResponse {
        data: RoomWithFields { room, fields }.into(),
    }))
}

/// GET /api/v1/rooms/{id}/queue
///
/// The room's active session (or `null`) with every ticket in number order.
pub async fn board(
    State(state): State<AppState>,
    RequireCompany(user): RequireCompany,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<QueueBoard>>> {
    let room = owned_room(&state.pool, &user, id).await?;

    let session = QueueSessionRepo::find_active_for_room(&state.pool, room.id).await?;
    let tickets = match &session {
        Some(session) => {
            QueueTicketRepo::list_for_session_with_answers(&state.pool, session.id).await?
        }
        None => Vec::new(),
    };

    Ok(Json(DataResponse {
        data: QueueBoard { session, tickets },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve the company behind a company-role caller.
async fn caller_company(pool: &DbPool, user: &AuthUser) -> AppResult<Company> {
    CompanyRepo::find_by_user_id(pool, user.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Forbidden(
                "No company profile is linked to this account".into(),
            ))
        })
}

/// Load a room and check that the caller's company owns it.
async fn owned_room(pool: &DbPool, user: &AuthUser, id: DbId) -> AppResult<Room> {
    let room = RoomRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Room", id }))?;

    let company = CompanyRepo::find_by_user_id(pool, user.user_id).await?;
    ensure_company_owns(company.map(|c| c.id), room.company_id, "Room")?;

    Ok(room)
}

fn validate_fields(fields: &[CreateFormField]) -> Result<(), CoreError> {
    if fields.len() > MAX_FIELDS_PER_ROOM {
        return Err(CoreError::Validation(format!(
            "A room may have at most {MAX_FIELDS_PER_ROOM} fields"
        )));
    }
    fields.iter().try_for_each(|f| validate_label(&f.label))
}
