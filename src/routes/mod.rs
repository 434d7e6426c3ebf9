pub mod auth;
pub mod cameras;
pub mod extract;
pub mod health;
pub mod rooms;
pub mod tokens;
pub mod validation;

pub use auth::{login, register_user};
pub use cameras::{add_camera, delete_camera, rename_camera};
pub use health::health_check;
pub use rooms::{
    all_room_cameras, get_building, get_room_in_building, list_buildings, list_rooms, rename_room,
};
pub use tokens::{embed_camera, generate_token, get_or_create_token};

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::middleware::require_auth;
use crate::AppState;

/// Build the API router; everything but register, login, home and health
/// requires a login token
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/home/cameras", get(all_room_cameras))
        .route("/api/add", post(add_camera))
        .route("/api/delete", post(delete_camera))
        .route("/api/token/:name", get(get_or_create_token))
        .route("/api/camera/rename", post(rename_camera))
        .route("/api/room/rename", post(rename_room))
        .route("/api/buildings", get(list_buildings))
        .route("/api/building/:building", get(get_building))
        .route("/api/building/:building/:room", get(get_room_in_building))
        .route("/api/embed/:name", get(embed_camera))
        .route("/api/generate-token/:name", get(generate_token))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let public = Router::new()
        .route("/health", get(health_check))
        .route("/api/register", post(register_user))
        .route("/api/login", post(login))
        .route("/api/home", get(list_rooms));

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
