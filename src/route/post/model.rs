pub use crate::route::model::Paginate;

use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A single post, filed under a subreddit.
#[model]
#[derive(Debug, Deserialize, Serialize, JsonSchema, Validate, sqlx::FromRow)]
pub struct Post {
	/// The unique identifier of the post.
	#[serde(skip_deserializing)]
	pub id: Uuid,
	/// The user that created the post.
	#[serde(skip_deserializing)]
	pub author_id: Uuid,
	/// The title of the post.
	#[validate(length(min = 3, max = 128))]
	pub title: String,
	/// The content of the post in Markdown format.
	pub content: String,
	/// The subreddit the post is filed under.
	#[validate(length(min = 1, max = 64))]
	pub subreddit: String,
	/// The vote score of the post. Nothing here changes it.
	#[serde(skip_deserializing)]
	pub votes: i32,
	/// The creation time of the post.
	#[serde(skip_deserializing)]
	pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A raw comment row.
#[derive(Debug, sqlx::FromRow)]
pub struct Comment {
	pub id: Uuid,
	pub post_id: Uuid,
	pub parent_id: Option<Uuid>,
	pub author_id: Uuid,
	pub content: String,
	pub votes: i32,
	pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A post row joined with its author's username.
#[derive(Debug, sqlx::FromRow)]
pub struct PostRow {
	pub id: Uuid,
	pub title: String,
	pub content: String,
	pub author: String,
	pub subreddit: String,
	pub votes: i32,
	pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A comment row joined with its author's username.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentRow {
	pub id: Uuid,
	pub parent_id: Option<Uuid>,
	pub content: String,
	pub author: String,
	pub votes: i32,
	pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A serialized comment with its replies, nested to arbitrary depth.
#[derive(Debug, Serialize, JsonSchema)]
pub struct CommentNode {
	pub id: Uuid,
	pub content: String,
	pub author: String,
	pub votes: i32,
	pub timestamp: String,
	pub replies: Vec<CommentNode>,
}

/// A fully serialized post: the row itself plus its comment forest.
///
/// `comments` holds only the post's top-level comments; everything deeper
/// hangs off their `replies`.
#[derive(Debug, Serialize, JsonSchema)]
pub struct PostDetail {
	pub id: Uuid,
	pub title: String,
	pub content: String,
	pub author: String,
	pub subreddit: String,
	pub votes: i32,
	pub timestamp: String,
	pub comments: Vec<CommentNode>,
}

/// Body for creating a comment or a reply.
///
/// `content` stays an Option so that an absent field and an empty string
/// are rejected through the same path.
#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct CreateCommentInput {
	/// The text of the comment.
	#[serde(default)]
	pub content: Option<String>,
}
