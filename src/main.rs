#![warn(clippy::pedantic)]

mod error;
mod extract;
mod model;
mod openapi;
mod route;

#[cfg(test)]
mod test;

use std::sync::Arc;

use aide::{axum::ApiRouter, openapi::OpenApi};
use axum::{extract::Request, Extension, Router, ServiceExt};
use tower::{Layer, ServiceBuilder};
use tower_http::{
	compression::CompressionLayer,
	cors::CorsLayer,
	normalize_path::NormalizePathLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};

pub use error::AppError;

pub type Database = sqlx::Pool<sqlx::Postgres>;
pub type AppState = State;

/// The shared application state.
///
/// This should contain all shared dependencies that handlers need to access,
/// such as a database connection pool or a cache client.
///
/// For dependencies only used by a single handler, you can combine states instead.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub database: Database,
}

/// Builds the application router on top of the given database pool.
fn app(database: Database) -> Router {
	let mut api = OpenApi::default();

	ApiRouter::new()
		.nest("/posts", route::post::routes())
		.nest("/docs", route::docs::routes())
		.finish_api_with(&mut api, openapi::docs)
		.layer(
			ServiceBuilder::new()
				.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
				.layer(TraceLayer::new_for_http())
				.layer(PropagateRequestIdLayer::x_request_id())
				.layer(CorsLayer::permissive())
				.layer(CompressionLayer::new()),
		)
		.layer(Extension(Arc::new(api)))
		.with_state(State { database })
}

#[tokio::main]
async fn main() {
	tracing_subscriber::fmt::init();
	dotenvy::dotenv().ok();

	let database = Database::connect(
		&std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
	)
	.await
	.expect("failed to connect to database");

	sqlx::migrate!()
		.run(&database)
		.await
		.expect("failed to run migrations");

	// `/posts/` and `/posts` resolve to the same route.
	let app = NormalizePathLayer::trim_trailing_slash().layer(app(database));

	let port = std::env::var("PORT").map_or_else(
		|_| 3000,
		|port| port.parse().expect("PORT must be a number"),
	);

	let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
		.await
		.expect("failed to bind to port");

	tracing::info!("listening on port {}", port);

	axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
		.await
		.unwrap();
}
