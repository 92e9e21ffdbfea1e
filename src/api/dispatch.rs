//! Single entry point: decode the JSON body and dispatch by `mode`/`action`.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub struct ApiRequest {
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
struct CreateData {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
}

#[derive(Debug, Default, Deserialize)]
struct LoginData {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Default, Deserialize)]
struct TokenData {
    #[serde(default)]
    username: String,
    #[serde(default)]
    token: String,
}

#[derive(Debug, Default, Deserialize)]
struct UpdateData {
    #[serde(default)]
    username: String,
    #[serde(default)]
    token: String,
    password: Option<String>,
    name: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ViewLogData {
    #[serde(default)]
    start: u64,
    #[serde(rename = "numElements")]
    num_elements: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct DeleteLogData {
    id: Option<i64>,
}

/// POST /api
///
/// Body is `{ mode, action, data }`. Unknown modes and actions, and bodies
/// that do not decode, come back as 406 Not Acceptable.
pub async fn process(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ApiRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Ok(Json(request)) = payload else {
        return Err(ApiError::no_content_for_mode());
    };

    match request.mode.as_deref() {
        Some("users") => dispatch_users(&state, request.action.as_deref(), request.data).await,
        Some("error") => dispatch_error_log(&state, request.action.as_deref(), request.data).await,
        _ => Err(ApiError::no_content_for_mode()),
    }
}

async fn dispatch_users(
    state: &AppState,
    action: Option<&str>,
    data: serde_json::Value,
) -> Result<Response, ApiError> {
    let auth = state.auth();

    match action {
        Some("create") => {
            let d: CreateData = parse_data(data)?;
            let result = auth
                .create(&d.username, &d.password, &d.name, &d.email)
                .await?;
            Ok(Json(ApiResponse::success(result)).into_response())
        }
        Some("login") => {
            let d: LoginData = parse_data(data)?;
            let result = auth.login(&d.username, &d.password).await?;
            Ok(Json(ApiResponse::success(result)).into_response())
        }
        Some("validate") => {
            let d: TokenData = parse_data(data)?;
            let result = auth.validate(&d.username, &d.token).await?;
            Ok(Json(ApiResponse::success(result)).into_response())
        }
        Some("update") => {
            let d: UpdateData = parse_data(data)?;
            let result = auth
                .update(
                    &d.username,
                    &d.token,
                    d.password.as_deref(),
                    d.name.as_deref(),
                    d.email.as_deref(),
                )
                .await?;
            Ok(Json(ApiResponse::success(result)).into_response())
        }
        Some("account") => {
            let d: TokenData = parse_data(data)?;
            let result = auth.account(&d.username, &d.token).await?;
            Ok(Json(ApiResponse::success(result)).into_response())
        }
        _ => Err(ApiError::no_content_for_action()),
    }
}

async fn dispatch_error_log(
    state: &AppState,
    action: Option<&str>,
    data: serde_json::Value,
) -> Result<Response, ApiError> {
    let error_log = state.error_log();

    match action {
        Some("view_error_log") => {
            let d: ViewLogData = parse_data(data)?;
            let result = error_log
                .view(d.start, d.num_elements.unwrap_or(40))
                .await?;
            Ok(Json(ApiResponse::success(result)).into_response())
        }
        Some("delete_error_log") => {
            let d: DeleteLogData = parse_data(data)?;
            let id = d.id.ok_or_else(|| {
                ApiError::validation("Trying to delete a log without an id")
            })?;
            let result = error_log.delete(id).await?;
            Ok(Json(ApiResponse::success(result)).into_response())
        }
        Some("delete_all_error_log") => {
            let result = error_log.delete_all().await?;
            Ok(Json(ApiResponse::success(result)).into_response())
        }
        _ => Err(ApiError::no_content_for_action()),
    }
}

/// A missing `data` object behaves like an empty one; the services report
/// the individual missing fields.
fn parse_data<T: DeserializeOwned + Default>(data: serde_json::Value) -> Result<T, ApiError> {
    if data.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(data)
        .map_err(|e| ApiError::validation(format!("Malformed data payload: {e}")))
}
