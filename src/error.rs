use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::{
	constants::{MESSAGE_INVALID_TOKEN, MESSAGE_NOT_FOUND},
	models::ErrorResponse,
};

#[derive(Debug, Error)]
pub enum AppError {
	#[error("{0}")]
	Validation(String),

	/// Also returned when the record exists but belongs to someone else.
	#[error("{}", MESSAGE_NOT_FOUND)]
	NotFound,

	#[error("{}", MESSAGE_INVALID_TOKEN)]
	Unauthorized,

	/// Only `message` reaches the client; `source` is logged.
	#[error("{message}")]
	Internal {
		message: &'static str,
		#[source]
		source: anyhow::Error,
	},
}

impl AppError {
	pub fn validation(message: impl Into<String>) -> Self {
		AppError::Validation(message.into())
	}

	pub fn internal(message: &'static str, source: impl Into<anyhow::Error>) -> Self {
		let source = source.into();
		log::error!("{}: {:?}", message, source);
		AppError::Internal { message, source }
	}
}

impl ResponseError for AppError {
	fn status_code(&self) -> StatusCode {
		match self {
			AppError::Validation(_) => StatusCode::BAD_REQUEST,
			AppError::NotFound => StatusCode::NOT_FOUND,
			AppError::Unauthorized => StatusCode::UNAUTHORIZED,
			AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn error_response(&self) -> HttpResponse {
		HttpResponse::build(self.status_code()).json(ErrorResponse { error: self.to_string() })
	}
}
