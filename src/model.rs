use schemars::JsonSchema;
use serde::Serialize;
use uuid::Uuid;

/// A model representing a single user.
///
/// There are no credentials; accounts exist to attribute posts and comments.
/// See [`crate::extract::Identity`] for how one is picked per request.
#[derive(Debug, Serialize, JsonSchema, sqlx::FromRow)]
pub struct User {
	pub id: Uuid,
	pub username: String,
	pub created_at: chrono::DateTime<chrono::Utc>,
}
