use aide::axum::{
	routing::{get_with, post_with},
	ApiRouter,
};
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::{error, AppState};

pub mod model;
pub mod route;
pub mod serialize;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown post {0}")]
	UnknownPost(Uuid),
	#[error("unknown comment {0}")]
	UnknownComment(Uuid),
	#[error("Content is required")]
	MissingContent,
}

pub type RouteError = error::RouteError<Error>;

impl From<Error> for RouteError {
	fn from(error: Error) -> Self {
		Self::Route(error)
	}
}

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/",
			get_with(get_posts, get_posts_docs).post_with(create_post, create_post_docs),
		)
		.api_route(
			"/:id",
			get_with(get_post, get_post_docs)
				.put_with(update_post, update_post_docs)
				.patch_with(update_post, update_post_docs)
				.delete_with(delete_post, delete_post_docs),
		)
		.api_route(
			"/:id/comments",
			post_with(create_comment, create_comment_docs),
		)
		.api_route(
			"/:id/comments/:comment_id/replies",
			post_with(create_reply, create_reply_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownPost(..) | Self::UnknownComment(..) => StatusCode::NOT_FOUND,
			Self::MissingContent => StatusCode::BAD_REQUEST,
		}
	}

	fn message(&self) -> error::Message<'_> {
		match self {
			Self::UnknownPost(post) => error::Message::new("unknown_post").detail("post", json!(post)),
			Self::UnknownComment(comment) => {
				error::Message::new("unknown_comment").detail("comment", json!(comment))
			}
			Self::MissingContent => error::Message::new("Content is required"),
		}
	}
}

#[cfg(test)]
mod test {
	use uuid::Uuid;

	use crate::test::*;

	async fn create_post(app: &axum_test::TestServer, title: &str) -> String {
		let response = app
			.post("/posts")
			.json(&json!({
				"title": title,
				"content": "hello world",
				"subreddit": "rust",
			}))
			.await;

		assert_eq!(response.status_code(), 200);

		response.json::<serde_json::Value>()["id"]
			.as_str()
			.unwrap()
			.to_owned()
	}

	#[sqlx::test]
	async fn test_post_crud_flow(pool: Database) {
		let app = app(pool);
		let id = create_post(&app, "First post").await;

		let response = app.get(&format!("/posts/{id}")).await;

		assert_eq!(response.status_code(), 200);

		let post = response.json::<serde_json::Value>();

		assert_eq!(post["title"], "First post");
		assert_eq!(post["subreddit"], "rust");
		assert_eq!(post["author"], "demo_user");
		assert_eq!(post["votes"], 0);
		assert_eq!(post["comments"], json!([]));
		assert!(post["timestamp"].as_str().unwrap().ends_with(" hours ago"));

		let response = app.get("/posts").await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<serde_json::Value>()[0]["title"], "First post");

		let response = app
			.put(&format!("/posts/{id}"))
			.json(&json!({ "title": "Renamed post" }))
			.await;

		assert_eq!(response.status_code(), 200);

		let post = response.json::<serde_json::Value>();

		assert_eq!(post["title"], "Renamed post");
		assert_eq!(post["content"], "hello world");

		let response = app.delete(&format!("/posts/{id}")).await;

		assert_eq!(response.status_code(), 200);

		let response = app.get(&format!("/posts/{id}")).await;

		assert_eq!(response.status_code(), 404);
	}

	#[sqlx::test]
	async fn test_unknown_post_is_not_found(pool: Database) {
		let app = app(pool);
		let id = Uuid::new_v4();

		let response = app.get(&format!("/posts/{id}")).await;

		assert_eq!(response.status_code(), 404);
		assert_eq!(response.json::<serde_json::Value>()["error"], "unknown_post");

		let response = app
			.post(&format!("/posts/{id}/comments"))
			.json(&json!({ "content": "hello" }))
			.await;

		assert_eq!(response.status_code(), 404);
	}

	#[sqlx::test]
	async fn test_comment_round_trip(pool: Database) {
		let app = app(pool);
		let id = create_post(&app, "First post").await;

		let response = app
			.post(&format!("/posts/{id}/comments"))
			.json(&json!({ "content": "hello" }))
			.await;

		assert_eq!(response.status_code(), 201);

		let comment = response.json::<serde_json::Value>();

		assert_eq!(comment["content"], "hello");
		assert_eq!(comment["author"], "demo_user");
		assert_eq!(comment["votes"], 0);
		assert_eq!(comment["replies"], json!([]));
		assert!(comment["timestamp"].as_str().unwrap().ends_with(" hours ago"));

		let response = app.get(&format!("/posts/{id}")).await;

		assert_eq!(response.status_code(), 200);

		let comments = &response.json::<serde_json::Value>()["comments"];

		assert_eq!(comments.as_array().unwrap().len(), 1);
		assert_eq!(comments[0]["id"], comment["id"]);
		assert_eq!(comments[0]["content"], "hello");
		assert_eq!(comments[0]["replies"], json!([]));
		assert_eq!(comments[0]["votes"], 0);
	}

	#[sqlx::test]
	async fn test_comment_requires_content(pool: Database) {
		let app = app(pool);
		let id = create_post(&app, "First post").await;
		let expected = json!({ "error": "Content is required" });

		let response = app.post(&format!("/posts/{id}/comments")).json(&json!({})).await;

		assert_eq!(response.status_code(), 400);
		assert_eq!(response.json::<serde_json::Value>(), expected);

		let response = app
			.post(&format!("/posts/{id}/comments"))
			.json(&json!({ "content": "" }))
			.await;

		assert_eq!(response.status_code(), 400);
		assert_eq!(response.json::<serde_json::Value>(), expected);

		let response = app
			.post(&format!("/posts/{id}/comments"))
			.json(&json!({ "content": "present" }))
			.await;

		assert_eq!(response.status_code(), 201);

		let comment_id = response.json::<serde_json::Value>()["id"]
			.as_str()
			.unwrap()
			.to_owned();

		let response = app
			.post(&format!("/posts/{id}/comments/{comment_id}/replies"))
			.json(&json!({ "content": "" }))
			.await;

		assert_eq!(response.status_code(), 400);
		assert_eq!(response.json::<serde_json::Value>(), expected);

		// Only the one valid comment exists, with no replies attached.
		let post = app.get(&format!("/posts/{id}")).await.json::<serde_json::Value>();

		assert_eq!(post["comments"].as_array().unwrap().len(), 1);
		assert_eq!(post["comments"][0]["replies"], json!([]));
	}

	#[sqlx::test]
	async fn test_reply_nests_under_its_parent(pool: Database) {
		let app = app(pool);
		let id = create_post(&app, "First post").await;

		let first = app
			.post(&format!("/posts/{id}/comments"))
			.json(&json!({ "content": "first" }))
			.await
			.json::<serde_json::Value>();

		let first_id = first["id"].as_str().unwrap();

		let response = app
			.post(&format!("/posts/{id}/comments/{first_id}/replies"))
			.json(&json!({ "content": "second" }))
			.await;

		assert_eq!(response.status_code(), 201);

		let second = response.json::<serde_json::Value>();

		assert_eq!(second["content"], "second");
		assert_eq!(second["replies"], json!([]));

		let second_id = second["id"].as_str().unwrap();

		let response = app
			.post(&format!("/posts/{id}/comments/{second_id}/replies"))
			.json(&json!({ "content": "third" }))
			.await;

		assert_eq!(response.status_code(), 201);

		let post = app.get(&format!("/posts/{id}")).await.json::<serde_json::Value>();
		let comments = post["comments"].as_array().unwrap();

		// The reply chain stays nested; nothing is duplicated at the top level.
		assert_eq!(comments.len(), 1);
		assert_eq!(comments[0]["content"], "first");
		assert_eq!(comments[0]["replies"][0]["content"], "second");
		assert_eq!(comments[0]["replies"][0]["replies"][0]["content"], "third");
		assert_eq!(
			comments[0]["replies"][0]["replies"][0]["replies"],
			json!([])
		);
	}

	#[sqlx::test]
	async fn test_reply_is_scoped_to_its_post(pool: Database) {
		let app = app(pool);
		let first = create_post(&app, "First post").await;
		let second = create_post(&app, "Second post").await;

		let comment = app
			.post(&format!("/posts/{first}/comments"))
			.json(&json!({ "content": "hello" }))
			.await
			.json::<serde_json::Value>();

		let comment_id = comment["id"].as_str().unwrap();

		let response = app
			.post(&format!("/posts/{second}/comments/{comment_id}/replies"))
			.json(&json!({ "content": "stray" }))
			.await;

		assert_eq!(response.status_code(), 404);
		assert_eq!(
			response.json::<serde_json::Value>()["error"],
			"unknown_comment"
		);

		let post = app
			.get(&format!("/posts/{second}"))
			.await
			.json::<serde_json::Value>();

		assert_eq!(post["comments"], json!([]));

		let post = app
			.get(&format!("/posts/{first}"))
			.await
			.json::<serde_json::Value>();

		assert_eq!(post["comments"][0]["replies"], json!([]));
	}

	#[sqlx::test]
	async fn test_deep_reply_chain(pool: Database) {
		let app = app(pool);
		let id = create_post(&app, "First post").await;

		let mut parent = app
			.post(&format!("/posts/{id}/comments"))
			.json(&json!({ "content": "depth 0" }))
			.await
			.json::<serde_json::Value>()["id"]
			.as_str()
			.unwrap()
			.to_owned();

		for depth in 1..50 {
			let response = app
				.post(&format!("/posts/{id}/comments/{parent}/replies"))
				.json(&json!({ "content": format!("depth {depth}") }))
				.await;

			assert_eq!(response.status_code(), 201);

			parent = response.json::<serde_json::Value>()["id"]
				.as_str()
				.unwrap()
				.to_owned();
		}

		let post = app.get(&format!("/posts/{id}")).await.json::<serde_json::Value>();
		let mut node = &post["comments"][0];

		for depth in 0..49 {
			assert_eq!(node["content"], format!("depth {depth}"));
			assert_eq!(node["replies"].as_array().unwrap().len(), 1);

			node = &node["replies"][0];
		}

		assert_eq!(node["content"], "depth 49");
		assert_eq!(node["replies"], json!([]));
	}

	#[sqlx::test]
	async fn test_repeated_reads_are_identical(pool: Database) {
		let app = app(pool);
		let id = create_post(&app, "First post").await;

		let comment = app
			.post(&format!("/posts/{id}/comments"))
			.json(&json!({ "content": "first" }))
			.await
			.json::<serde_json::Value>();

		let comment_id = comment["id"].as_str().unwrap();

		let response = app
			.post(&format!("/posts/{id}/comments/{comment_id}/replies"))
			.json(&json!({ "content": "second" }))
			.await;

		assert_eq!(response.status_code(), 201);

		let response = app
			.post(&format!("/posts/{id}/comments"))
			.json(&json!({ "content": "third" }))
			.await;

		assert_eq!(response.status_code(), 201);

		let first = app.get(&format!("/posts/{id}")).await.text();
		let second = app.get(&format!("/posts/{id}")).await.text();

		assert_eq!(first, second);
	}
}
