use axum::{extract::State, Extension, Json};
use serde::Deserialize;

use crate::constants::{ERR_ADD_FIELDS_REQUIRED, ERR_NAME_REQUIRED};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::room_key;
use crate::routes::auth::MessageResponse;
use crate::routes::extract::ApiJson;
use crate::routes::validation::{rename_pair, required, validate_room_parts};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AddCameraRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub building: Option<String>,
    #[serde(default)]
    pub room: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteCameraRequest {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    #[serde(default)]
    pub old_name: Option<String>,
    #[serde(default)]
    pub new_name: Option<String>,
}

/// Add a camera to the relay config and to a room
///
/// An existing camera of the same name has its routing entry replaced.
/// The room list never holds the same camera twice.
pub async fn add_camera(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(payload): ApiJson<AddCameraRequest>,
) -> Result<Json<MessageResponse>> {
    let (name, url, building, room) = match (
        required(payload.name),
        required(payload.url),
        required(payload.building),
        required(payload.room),
    ) {
        (Some(name), Some(url), Some(building), Some(room)) => (name, url, building, room),
        _ => return Err(AppError::InvalidInput(ERR_ADD_FIELDS_REQUIRED.to_string())),
    };
    validate_room_parts(&building, &room)?;

    let full_room = room_key(&building, &room);
    let store = state.store.clone();
    let (camera, key) = (name.clone(), full_room.clone());

    tokio::task::spawn_blocking(move || -> Result<()> {
        let mut txn = store.begin();

        if txn.routing()?.contains(&camera) {
            tracing::info!("Replacing routing entry for existing camera {}", camera);
        }
        txn.routing_mut()?.upsert_camera(&camera, &url);
        txn.rooms_mut()?.add_camera(&key, &camera);
        txn.commit()?;
        Ok(())
    })
    .await??;

    tracing::info!("{} added camera {} to {}", user.username, name, full_room);

    Ok(Json(MessageResponse {
        message: format!("Camera {name} added to room {full_room}"),
    }))
}

/// Delete a camera everywhere it is referenced
///
/// Removes the routing entry, every token bound to the camera and its
/// membership in every room. Unknown cameras succeed without changes.
pub async fn delete_camera(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(payload): ApiJson<DeleteCameraRequest>,
) -> Result<Json<MessageResponse>> {
    let name = required(payload.name)
        .ok_or_else(|| AppError::InvalidInput(ERR_NAME_REQUIRED.to_string()))?;

    let store = state.store.clone();
    let camera = name.clone();

    let (had_entry, tokens_removed, rooms_touched) =
        tokio::task::spawn_blocking(move || -> Result<(bool, usize, usize)> {
            let mut txn = store.begin();

            let had_entry = txn.routing_mut()?.remove_camera(&camera);
            let tokens_removed = txn.tokens_mut()?.remove_camera(&camera);
            let rooms_touched = txn.rooms_mut()?.remove_camera(&camera);
            txn.commit()?;

            Ok((had_entry, tokens_removed, rooms_touched))
        })
        .await??;

    tracing::info!(
        "{} deleted camera {} (routing entry: {}, tokens: {}, rooms: {})",
        user.username,
        name,
        had_entry,
        tokens_removed,
        rooms_touched
    );

    Ok(Json(MessageResponse {
        message: format!("Camera {name} deleted successfully"),
    }))
}

/// Rename a camera in the relay config, its token and every room
///
/// The camera keeps its position in each room list.
pub async fn rename_camera(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(payload): ApiJson<RenameRequest>,
) -> Result<Json<MessageResponse>> {
    let (old_name, new_name) = rename_pair(payload.old_name, payload.new_name)?;

    let store = state.store.clone();
    let (old, new) = (old_name.clone(), new_name.clone());

    tokio::task::spawn_blocking(move || -> Result<()> {
        let mut txn = store.begin();

        let routing = txn.routing()?;
        if !routing.contains(&old) {
            return Err(AppError::OldCameraNotFound);
        }
        if old == new {
            return Ok(());
        }
        if routing.contains(&new) {
            return Err(AppError::CameraAlreadyExists(new));
        }

        txn.routing_mut()?.rename_camera(&old, &new);
        txn.tokens_mut()?.rename_camera(&old, &new);
        txn.rooms_mut()?.rename_camera(&old, &new);
        txn.commit()?;
        Ok(())
    })
    .await??;

    tracing::info!(
        "{} renamed camera {} to {}",
        user.username,
        old_name,
        new_name
    );

    Ok(Json(MessageResponse {
        message: format!("Renamed camera {old_name} → {new_name}"),
    }))
}
