use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Token encoding error: {0}")]
    TokenEncoding(#[from] jsonwebtoken::errors::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Username already exists")]
    UserAlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token required")]
    MissingToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Camera not found")]
    CameraNotFound,

    #[error("Old camera not found")]
    OldCameraNotFound,

    #[error("Old room not found")]
    OldRoomNotFound,

    #[error("Building not found")]
    BuildingNotFound,

    #[error("Room not found in this building")]
    RoomNotFound,

    #[error("Camera {0} already exists")]
    CameraAlreadyExists(String),

    #[error("Room {0} already exists")]
    RoomAlreadyExists(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<argon2::password_hash::Error> for AppError {
    fn from(err: argon2::password_hash::Error) -> Self {
        AppError::PasswordHash(err.to_string())
    }
}

/// Implement IntoResponse to convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Io(ref e) => {
                tracing::error!("Storage I/O error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Json(ref e) => {
                tracing::error!("JSON store error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Yaml(ref e) => {
                tracing::error!("Routing file error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::TokenEncoding(ref e) => {
                tracing::error!("Token encoding error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::PasswordHash(ref e) => {
                tracing::error!("Password hashing error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::TaskJoin(ref e) => {
                tracing::error!("Task join error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::UserAlreadyExists
            | AppError::CameraAlreadyExists(_)
            | AppError::RoomAlreadyExists(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials
            | AppError::MissingToken
            | AppError::TokenExpired
            | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::CameraNotFound
            | AppError::OldCameraNotFound
            | AppError::OldRoomNotFound
            | AppError::BuildingNotFound
            | AppError::RoomNotFound => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        };

        let error_message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal server error".to_string()
        } else {
            match self {
                AppError::InvalidInput(msg) => msg,
                other => other.to_string(),
            }
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

/// Result type alias for application results
pub type Result<T> = std::result::Result<T, AppError>;
