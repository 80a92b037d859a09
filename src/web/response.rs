use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tracing::error;

use crate::error::SiteError;
use crate::web::templates::ErrorTemplate;

impl SiteError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SiteError::DataUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            SiteError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            SiteError::DuplicateUsername(_) => StatusCode::CONFLICT,
            SiteError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text safe to show a visitor.
    pub fn user_message(&self) -> String {
        match self {
            SiteError::DataUnavailable(_) => {
                "The projection data is not available right now. Please try again later.".to_string()
            }
            SiteError::InvalidCredentials => "Invalid username or password".to_string(),
            SiteError::DuplicateUsername(_) => "Username already exists".to_string(),
            SiteError::Validation(message) => message.clone(),
            _ => "Something went wrong on our side.".to_string(),
        }
    }
}

impl IntoResponse for SiteError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let page = ErrorTemplate {
            user: None,
            title: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.user_message(),
        };
        match page.render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(_) => (status, page.message).into_response(),
        }
    }
}
