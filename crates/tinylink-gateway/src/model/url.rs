use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateShortUrlRequest {
    pub long_url: String,
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct CreateShortUrlResponse {
    pub message: &'static str,
    pub short_url: String,
}

#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
