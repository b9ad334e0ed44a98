use crate::error::{AppError, Result};
use crate::model::{CreateShortUrlRequest, CreateShortUrlResponse, WelcomeResponse};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tinylink_core::Token;
use tracing::{debug, info};

pub async fn welcome_handler() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the URL Shortener API",
    })
}

pub async fn create_short_url_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateShortUrlRequest>,
) -> Result<Json<CreateShortUrlResponse>> {
    if request.long_url.is_empty() {
        return Err(AppError::BadRequest("long_url is required".to_string()));
    }
    if request.user_id.is_empty() {
        return Err(AppError::BadRequest("user_id is required".to_string()));
    }

    let token = state
        .generator()
        .generate(&request.long_url, &request.user_id)?;
    state.store().put(&token, &request.long_url).await?;

    info!(token = %token, "Created short url");
    Ok(Json(CreateShortUrlResponse {
        message: "short url created successfully",
        short_url: token.to_url(state.base_url()),
    }))
}

pub async fn redirect_handler(
    Path(token): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let token = Token::parse(&token).map_err(|e| {
        debug!(error = %e, "Rejected malformed token");
        AppError::NotFound
    })?;

    let original_url = state.store().get(&token).await?;
    let location = HeaderValue::from_str(&original_url).map_err(|e| {
        AppError::Internal(format!("stored url for {token} is not a valid header: {e}"))
    })?;

    debug!(token = %token, "Redirecting");
    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}
