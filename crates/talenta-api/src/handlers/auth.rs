//! Access-code authentication handlers.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub code: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
}

/// Validate the access code and open a 24 hour session.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    state.sessions.authenticate(&request.code)?;
    Ok(Json(LoginResponse {
        success: true,
        message: "Berhasil masuk ke dashboard".to_string(),
    }))
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
}

/// Report whether a live session exists; expired sessions are cleared here.
pub async fn session(State(state): State<AppState>) -> Json<SessionResponse> {
    Json(SessionResponse {
        authenticated: state.sessions.check_session(),
    })
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// Close the session unconditionally.
pub async fn logout(State(state): State<AppState>) -> Json<LogoutResponse> {
    state.sessions.logout();
    Json(LogoutResponse { success: true })
}
