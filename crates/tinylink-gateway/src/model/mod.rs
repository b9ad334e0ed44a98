mod url;

pub use url::{CreateShortUrlRequest, CreateShortUrlResponse, ErrorResponse, HealthResponse, WelcomeResponse};
