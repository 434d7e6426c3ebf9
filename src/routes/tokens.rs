use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::security::{embed_iframe, generate_access_token};
use crate::store::Store;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct CameraTokenResponse {
    pub camera: String,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct EmbedResponse {
    pub camera: String,
    pub token: String,
    pub iframe_code: String,
}

/// Token bound to `camera`, created on first request
///
/// Only cameras present in the routing file get tokens.
async fn camera_token(store: Store, camera: String) -> Result<String> {
    tokio::task::spawn_blocking(move || -> Result<String> {
        let mut txn = store.begin();

        if !txn.routing()?.contains(&camera) {
            return Err(AppError::CameraNotFound);
        }
        if let Some(token) = txn.tokens()?.token_for(&camera) {
            return Ok(token.to_string());
        }

        let (token, _) = txn
            .tokens_mut()?
            .get_or_insert_with(&camera, generate_access_token);
        txn.commit()?;

        tracing::info!("Issued access token for camera {}", camera);
        Ok(token)
    })
    .await?
}

/// GET /api/token/:name
pub async fn get_or_create_token(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<TokenResponse>> {
    let token = camera_token(state.store.clone(), name).await?;
    Ok(Json(TokenResponse { token }))
}

/// GET /api/generate-token/:name
pub async fn generate_token(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CameraTokenResponse>> {
    let token = camera_token(state.store.clone(), name.clone()).await?;
    Ok(Json(CameraTokenResponse {
        camera: name,
        token,
    }))
}

/// GET /api/embed/:name
pub async fn embed_camera(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<EmbedResponse>> {
    let token = camera_token(state.store.clone(), name.clone()).await?;
    let iframe_code = embed_iframe(&state.config.embed_base_url, &token);

    Ok(Json(EmbedResponse {
        camera: name,
        token,
        iframe_code,
    }))
}
