use std::borrow::Cow;

use axum::{
	body::Body,
	extract::rejection,
	http::{Response, StatusCode},
	response::IntoResponse,
};
use schemars::JsonSchema;
use serde::Serialize;

use crate::extract::Json;

pub type Map = serde_json::Map<String, serde_json::Value>;

/// A single error message, serialized as `{"error": ..., "details": {...}}`.
///
/// The `error` string is presented to the client, so it should not contain
/// sensitive information.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Message<'a> {
	pub error: Cow<'a, str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<Map>,
}

impl<'a> Message<'a> {
	pub fn new(error: impl Into<Cow<'a, str>>) -> Self {
		Self {
			error: error.into(),
			details: None,
		}
	}

	pub fn detail(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
		self.details
			.get_or_insert_with(Map::new)
			.insert(key.into(), value.into());

		self
	}
}

/// The response shape of a route-specific error.
pub trait ErrorShape {
	fn status(&self) -> StatusCode;
	fn message(&self) -> Message<'_>;
}

/// Errors that can occur in any route, mostly from extractors.
///
/// The Display trait is not sent to the client, so it can show
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("json error: {0}")]
	Json(#[from] rejection::JsonRejection),
	#[error("query error: {0}")]
	Query(#[from] rejection::QueryRejection),
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response<Body> {
		let (status, message) = match &self {
			Self::Validation(errors) => (StatusCode::BAD_REQUEST, validation_message(errors)),
			Self::Json(rejection) => (StatusCode::BAD_REQUEST, Message::new(rejection.body_text())),
			Self::Query(rejection) => (StatusCode::BAD_REQUEST, Message::new(rejection.body_text())),
			Self::Database(error) => {
				tracing::error!(%error, "database error");

				(
					StatusCode::INTERNAL_SERVER_ERROR,
					Message::new("internal server error"),
				)
			}
		};

		(status, Json(message)).into_response()
	}
}

fn validation_message(errors: &validator::ValidationErrors) -> Message<'_> {
	let mut message = Message::new("validation error");

	for (field, errors) in errors.field_errors() {
		message = message.detail(
			field.to_string(),
			serde_json::json!(errors.iter().map(ToString::to_string).collect::<Vec<_>>()),
		);
	}

	message
}

/// Error type for a route: either the route's own error or an [`AppError`].
///
/// Route modules alias this with their error type filled in, implement
/// [`ErrorShape`] for that error and convert into `Self::Route` with a
/// single `From` impl.
#[derive(Debug)]
pub enum RouteError<E> {
	Route(E),
	App(AppError),
}

impl<E> From<AppError> for RouteError<E> {
	fn from(error: AppError) -> Self {
		Self::App(error)
	}
}

impl<E> From<sqlx::Error> for RouteError<E> {
	fn from(error: sqlx::Error) -> Self {
		Self::App(AppError::Database(error))
	}
}

impl<E> From<validator::ValidationErrors> for RouteError<E> {
	fn from(error: validator::ValidationErrors) -> Self {
		Self::App(AppError::Validation(error))
	}
}

impl<E> IntoResponse for RouteError<E>
where
	E: ErrorShape,
{
	fn into_response(self) -> Response<Body> {
		match self {
			Self::Route(error) => (error.status(), Json(error.message())).into_response(),
			Self::App(error) => error.into_response(),
		}
	}
}

impl<E> aide::OperationOutput for RouteError<E> {
	type Inner = Message<'static>;

	fn operation_response(
		_ctx: &mut aide::gen::GenContext,
		_operation: &mut aide::openapi::Operation,
	) -> Option<aide::openapi::Response> {
		None
	}

	fn inferred_responses(
		_ctx: &mut aide::gen::GenContext,
		_operation: &mut aide::openapi::Operation,
	) -> Vec<(Option<u16>, aide::openapi::Response)> {
		Vec::new()
	}
}
