use aide::OperationInput;
use axum::{
	extract::{FromRef, FromRequestParts},
	http::request,
};

use crate::{error::AppError, model, Database};

/// The username given to the account created when the store has no users.
pub const PLACEHOLDER_USERNAME: &str = "demo_user";

/// The identity a request acts as.
///
/// There is no real authentication. Every request resolves to the first
/// existing user, and the placeholder account is created when the store is
/// empty. Handlers that create records take this extractor as an explicit
/// parameter, so swapping it for a session or token lookup touches nothing
/// else.
///
/// ```rust
/// async fn route(identity: Identity) {
///   println!("{}", identity.user.username);
/// }
/// ```
#[derive(Debug)]
pub struct Identity {
	pub user: model::User,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Identity
where
	Database: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = AppError;

	/// Resolves the acting user, creating the placeholder account if needed.
	///
	/// Two concurrent requests against an empty store can both take the
	/// insert path; the unique username constraint fails the loser.
	async fn from_request_parts(
		_parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let database = Database::from_ref(state);

		let user = sqlx::query_as::<_, model::User>(
			r#"
				SELECT id, username, created_at FROM "user"
				ORDER BY created_at, id
				LIMIT 1
			"#,
		)
		.fetch_optional(&database)
		.await?;

		let user = match user {
			Some(user) => user,
			None => {
				sqlx::query_as::<_, model::User>(
					r#"
						INSERT INTO "user" (username) VALUES ($1)
						RETURNING id, username, created_at
					"#,
				)
				.bind(PLACEHOLDER_USERNAME)
				.fetch_one(&database)
				.await?
			}
		};

		Ok(Self { user })
	}
}

impl OperationInput for Identity {}
