mod health;
mod url;

pub use health::health_handler;
pub use url::{create_short_url_handler, redirect_handler, welcome_handler};
