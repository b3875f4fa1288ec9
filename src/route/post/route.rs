use aide::axum::IntoApiResponse;
use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::IntoResponse,
};
use macros::route;
use uuid::Uuid;

use crate::{
	extract::{Identity, Json, Query},
	openapi::tag,
	Database,
};

use super::{model, Error, RouteError};

async fn fetch_post(
	database: &Database,
	post_id: Uuid,
) -> Result<Option<model::PostRow>, sqlx::Error> {
	sqlx::query_as::<_, model::PostRow>(
		r#"
			SELECT p.id, p.title, p.content, u.username AS author, p.subreddit, p.votes, p.created_at
			FROM post p
			JOIN "user" u ON u.id = p.author_id
			WHERE p.id = $1
		"#,
	)
	.bind(post_id)
	.fetch_optional(database)
	.await
}

async fn fetch_comment_rows(
	database: &Database,
	post_id: Uuid,
) -> Result<Vec<model::CommentRow>, sqlx::Error> {
	sqlx::query_as::<_, model::CommentRow>(
		r#"
			SELECT c.id, c.parent_id, c.content, u.username AS author, c.votes, c.created_at
			FROM comment c
			JOIN "user" u ON u.id = c.author_id
			WHERE c.post_id = $1
			ORDER BY c.created_at, c.id
		"#,
	)
	.bind(post_id)
	.fetch_all(database)
	.await
}

async fn post_exists(database: &Database, post_id: Uuid) -> Result<bool, sqlx::Error> {
	let id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM post WHERE id = $1")
		.bind(post_id)
		.fetch_optional(database)
		.await?;

	Ok(id.is_some())
}

/// Writes one comment row and returns it in its serialized shape.
///
/// The parent, when present, must already be verified to belong to the post.
async fn insert_comment(
	database: &Database,
	post_id: Uuid,
	parent_id: Option<Uuid>,
	identity: Identity,
	input: model::CreateCommentInput,
) -> Result<model::CommentNode, RouteError> {
	let content = match input.content {
		Some(content) if !content.is_empty() => content,
		_ => return Err(Error::MissingContent.into()),
	};

	let comment = sqlx::query_as::<_, model::Comment>(
		r#"
			INSERT INTO comment (post_id, parent_id, author_id, content)
			VALUES ($1, $2, $3, $4)
			RETURNING id, post_id, parent_id, author_id, content, votes, created_at
		"#,
	)
	.bind(post_id)
	.bind(parent_id)
	.bind(identity.user.id)
	.bind(content)
	.fetch_one(database)
	.await?;

	Ok(model::CommentNode::from_comment(
		comment,
		identity.user.username,
	))
}

/// Get all posts
/// Returns a paginated response of all posts with their comment trees, newest first.
#[route(tag = tag::POST)]
pub async fn get_posts(
	State(database): State<Database>,
	Query(paginate): Query<model::Paginate>,
) -> Result<Json<Vec<model::PostDetail>>, RouteError> {
	let posts = sqlx::query_as::<_, model::PostRow>(
		r#"
			SELECT p.id, p.title, p.content, u.username AS author, p.subreddit, p.votes, p.created_at
			FROM post p
			JOIN "user" u ON u.id = p.author_id
			ORDER BY p.created_at DESC
			LIMIT $1 OFFSET $2
		"#,
	)
	.bind(paginate.limit())
	.bind(paginate.offset())
	.fetch_all(&database)
	.await?;

	let mut details = Vec::with_capacity(posts.len());

	for post in posts {
		let comments = fetch_comment_rows(&database, post.id).await?;

		details.push(model::PostDetail::from_rows(post, comments));
	}

	Ok(Json(details))
}

/// Get single post
/// Returns a single post by its unique id, with its full comment tree.
#[route(tag = tag::POST)]
pub async fn get_post(
	State(database): State<Database>,
	Path(post_id): Path<Uuid>,
) -> Result<Json<model::PostDetail>, RouteError> {
	let post = fetch_post(&database, post_id)
		.await?
		.ok_or(Error::UnknownPost(post_id))?;
	let comments = fetch_comment_rows(&database, post_id).await?;

	Ok(Json(model::PostDetail::from_rows(post, comments)))
}

/// Create post
/// Creates a new post, authored by the resolved identity.
#[route(tag = tag::POST)]
pub async fn create_post(
	State(database): State<Database>,
	identity: Identity,
	Json(input): Json<model::CreatePostInput>,
) -> Result<Json<model::PostDetail>, RouteError> {
	let post = sqlx::query_as::<_, model::Post>(
		r#"
			INSERT INTO post (author_id, title, content, subreddit)
			VALUES ($1, $2, $3, $4)
			RETURNING id, author_id, title, content, subreddit, votes, created_at
		"#,
	)
	.bind(identity.user.id)
	.bind(input.title)
	.bind(input.content)
	.bind(input.subreddit)
	.fetch_one(&database)
	.await?;

	Ok(Json(model::PostDetail::from_post(
		post,
		identity.user.username,
	)))
}

/// Update post
/// Updates an existing post by its unique id. Absent fields are left as they are.
#[route(tag = tag::POST)]
pub async fn update_post(
	State(database): State<Database>,
	Path(post_id): Path<Uuid>,
	Json(input): Json<model::UpdatePostInput>,
) -> Result<Json<model::PostDetail>, RouteError> {
	let updated = sqlx::query(
		r#"
			UPDATE post
			SET title = COALESCE($1, title),
				content = COALESCE($2, content),
				subreddit = COALESCE($3, subreddit)
			WHERE id = $4
		"#,
	)
	.bind(input.title)
	.bind(input.content)
	.bind(input.subreddit)
	.bind(post_id)
	.execute(&database)
	.await?;

	if updated.rows_affected() == 0 {
		return Err(Error::UnknownPost(post_id).into());
	}

	let post = fetch_post(&database, post_id)
		.await?
		.ok_or(Error::UnknownPost(post_id))?;
	let comments = fetch_comment_rows(&database, post_id).await?;

	Ok(Json(model::PostDetail::from_rows(post, comments)))
}

/// Delete post
/// Deletes an existing post and its comments by its unique id.
#[route(tag = tag::POST)]
pub async fn delete_post(
	State(database): State<Database>,
	Path(post_id): Path<Uuid>,
) -> Result<(), RouteError> {
	let deleted = sqlx::query("DELETE FROM post WHERE id = $1")
		.bind(post_id)
		.execute(&database)
		.await?;

	if deleted.rows_affected() == 0 {
		return Err(Error::UnknownPost(post_id).into());
	}

	Ok(())
}

/// Add comment
/// Adds a top-level comment to a post, authored by the resolved identity.
#[route(tag = tag::COMMENT, response(status = 201, description = "The created comment.", shape = "Json<model::CommentNode>"))]
pub async fn create_comment(
	State(database): State<Database>,
	Path(post_id): Path<Uuid>,
	identity: Identity,
	Json(input): Json<model::CreateCommentInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	if !post_exists(&database, post_id).await? {
		return Err(Error::UnknownPost(post_id).into());
	}

	let comment = insert_comment(&database, post_id, None, identity, input).await?;

	Ok((StatusCode::CREATED, Json(comment)).into_response())
}

/// Add reply
/// Adds a reply beneath an existing comment of the same post.
#[route(tag = tag::COMMENT, response(status = 201, description = "The created reply.", shape = "Json<model::CommentNode>"))]
pub async fn create_reply(
	State(database): State<Database>,
	Path((post_id, comment_id)): Path<(Uuid, Uuid)>,
	identity: Identity,
	Json(input): Json<model::CreateCommentInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	if !post_exists(&database, post_id).await? {
		return Err(Error::UnknownPost(post_id).into());
	}

	// Scoping the lookup to the post keeps replies inside their post's forest.
	let parent_id = sqlx::query_scalar::<_, Uuid>(
		"SELECT id FROM comment WHERE id = $1 AND post_id = $2",
	)
	.bind(comment_id)
	.bind(post_id)
	.fetch_optional(&database)
	.await?
	.ok_or(Error::UnknownComment(comment_id))?;

	let reply = insert_comment(&database, post_id, Some(parent_id), identity, input).await?;

	Ok((StatusCode::CREATED, Json(reply)).into_response())
}
