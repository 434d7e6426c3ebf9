use axum::{
    extract::{Path, State},
    Extension, Json,
};
use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::room::camera_views;
use crate::models::{room_key, BuildingTree, CameraView, RoomListing};
use crate::routes::auth::MessageResponse;
use crate::routes::extract::ApiJson;
use crate::routes::cameras::RenameRequest;
use crate::routes::validation::rename_pair;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct RoomNamesResponse {
    pub rooms: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BuildingResponse {
    pub rooms: RoomListing,
}

/// List room keys (public)
pub async fn list_rooms(State(state): State<AppState>) -> Result<Json<RoomNamesResponse>> {
    let store = state.store.clone();

    let rooms = tokio::task::spawn_blocking(move || -> Result<Vec<String>> {
        let txn = store.begin();
        let names = txn.rooms()?.keys().map(str::to_string).collect();
        Ok(names)
    })
    .await??;

    Ok(Json(RoomNamesResponse { rooms }))
}

/// Raw room -> camera names map
pub async fn all_room_cameras(
    State(state): State<AppState>,
) -> Result<Json<IndexMap<String, Vec<String>>>> {
    let store = state.store.clone();

    let rooms = tokio::task::spawn_blocking(move || -> Result<IndexMap<String, Vec<String>>> {
        let txn = store.begin();
        let rooms = txn.rooms()?.as_map().clone();
        Ok(rooms)
    })
    .await??;

    Ok(Json(rooms))
}

/// Rename a room key; its camera list moves with it
pub async fn rename_room(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(payload): ApiJson<RenameRequest>,
) -> Result<Json<MessageResponse>> {
    let (old_name, new_name) = rename_pair(payload.old_name, payload.new_name)?;

    let store = state.store.clone();
    let (old, new) = (old_name.clone(), new_name.clone());

    tokio::task::spawn_blocking(move || -> Result<()> {
        let mut txn = store.begin();
        txn.rooms_mut()?.rename_room(&old, &new)?;
        txn.commit()?;
        Ok(())
    })
    .await??;

    tracing::info!("{} renamed room {} to {}", user.username, old_name, new_name);

    Ok(Json(MessageResponse {
        message: format!("Renamed room {old_name} → {new_name}"),
    }))
}

/// Every building with its rooms and cameras
pub async fn list_buildings(State(state): State<AppState>) -> Result<Json<BuildingTree>> {
    let store = state.store.clone();

    let tree = tokio::task::spawn_blocking(move || -> Result<BuildingTree> {
        let txn = store.begin();
        let tree = txn.rooms()?.building_tree(txn.routing()?);
        Ok(tree)
    })
    .await??;

    Ok(Json(tree))
}

/// Rooms of a single building
pub async fn get_building(
    State(state): State<AppState>,
    Path(building): Path<String>,
) -> Result<Json<BuildingResponse>> {
    let store = state.store.clone();

    let rooms = tokio::task::spawn_blocking(move || -> Result<RoomListing> {
        let txn = store.begin();
        let rooms = txn
            .rooms()?
            .building_rooms(&building, txn.routing()?)
            .ok_or(AppError::BuildingNotFound)?;
        Ok(rooms)
    })
    .await??;

    Ok(Json(BuildingResponse { rooms }))
}

/// Cameras of one room, keyed by the full room key
pub async fn get_room_in_building(
    State(state): State<AppState>,
    Path((building, room)): Path<(String, String)>,
) -> Result<Json<IndexMap<String, Vec<CameraView>>>> {
    let store = state.store.clone();
    let key = room_key(&building, &room);

    let listing = tokio::task::spawn_blocking(move || -> Result<IndexMap<String, Vec<CameraView>>> {
        let txn = store.begin();
        let cameras = txn.rooms()?.cameras(&key).ok_or(AppError::RoomNotFound)?;
        let views = camera_views(cameras, txn.routing()?);

        let mut listing = IndexMap::new();
        listing.insert(key, views);
        Ok(listing)
    })
    .await??;

    Ok(Json(listing))
}
