use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ItineraryError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no places found for {interests:?} in {city}")]
    NoPlacesFound { city: String, interests: Vec<String> },

    #[error("{service} failed: {message}")]
    Collaborator { service: String, message: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ItineraryError {
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn collaborator<S: Into<String>, M: Into<String>>(service: S, message: M) -> Self {
        Self::Collaborator {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Message shown to the end user.
    pub fn user_message(&self) -> String {
        match self {
            ItineraryError::NoPlacesFound { city, .. } => format!(
                "We couldn't find any places in {} for those interests. Try broader interests or a different city.",
                city
            ),
            other => other.to_string(),
        }
    }
}

impl ResponseError for ItineraryError {
    fn status_code(&self) -> StatusCode {
        match self {
            ItineraryError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ItineraryError::NoPlacesFound { .. } | ItineraryError::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ItineraryError::Collaborator { .. } | ItineraryError::Http(_) => {
                StatusCode::BAD_GATEWAY
            }
            ItineraryError::Database(_) | ItineraryError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("Request failed: {}", self);
        }
        HttpResponse::build(self.status_code()).json(json!({ "error": self.user_message() }))
    }
}
