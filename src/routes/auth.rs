use axum::{extract::State, Json};
use serde::Serialize;

use crate::constants::ERR_CREDENTIALS_REQUIRED;
use crate::error::{AppError, Result};
use crate::models::Credentials;
use crate::routes::extract::ApiJson;
use crate::security::{hash_password, issue_token, verify_password, PasswordCheck};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Register a new user
///
/// Returns 400 if the username is already taken. The password is stored
/// as a salted Argon2id hash.
pub async fn register_user(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<Credentials>,
) -> Result<Json<MessageResponse>> {
    let (username, password) = payload
        .validate()
        .ok_or_else(|| AppError::InvalidInput(ERR_CREDENTIALS_REQUIRED.to_string()))?;

    let store = state.store.clone();

    tokio::task::spawn_blocking(move || -> Result<()> {
        let mut txn = store.begin();

        if txn.users()?.contains(&username) {
            tracing::info!("Registration rejected, user {} already exists", username);
            return Err(AppError::UserAlreadyExists);
        }

        let hash = hash_password(&password)?;
        txn.users_mut()?.set_password(&username, hash);
        txn.commit()?;

        tracing::info!("New user registered: {}", username);
        Ok(())
    })
    .await??;

    Ok(Json(MessageResponse {
        message: "User registered successfully".to_string(),
    }))
}

/// Exchange username and password for a login token
///
/// Plaintext passwords left by older deployments are accepted once and
/// replaced with a hash.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<Credentials>,
) -> Result<Json<LoginResponse>> {
    let (username, password) = payload
        .validate()
        .ok_or_else(|| AppError::InvalidInput(ERR_CREDENTIALS_REQUIRED.to_string()))?;

    let store = state.store.clone();
    let user = username.clone();

    tokio::task::spawn_blocking(move || -> Result<()> {
        let mut txn = store.begin();

        let check = match txn.users()?.password(&user) {
            Some(stored) => verify_password(&password, stored),
            None => PasswordCheck::Invalid,
        };

        match check {
            PasswordCheck::Valid => Ok(()),
            PasswordCheck::ValidLegacy => {
                let hash = hash_password(&password)?;
                txn.users_mut()?.set_password(&user, hash);
                txn.commit()?;
                tracing::info!("Upgraded plaintext password for {}", user);
                Ok(())
            }
            PasswordCheck::Invalid => {
                tracing::warn!("Failed login for {}", user);
                Err(AppError::InvalidCredentials)
            }
        }
    })
    .await??;

    let token = issue_token(
        &username,
        &state.config.jwt_secret,
        state.config.jwt_ttl_hours,
    )?;

    tracing::info!("User logged in: {}", username);

    Ok(Json(LoginResponse { token }))
}
