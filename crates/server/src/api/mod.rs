mod books;
mod handlers;
mod recommendations;
mod routes;
mod search;

pub use routes::create_router;

use serde::Serialize;

/// Error body shared by all API handlers.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
