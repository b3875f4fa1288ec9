use aide::{openapi::Tag, transform::TransformOpenApi};

use crate::{error, extract::Json};

pub mod tag {
	pub const POST: &str = "Post";
	pub const COMMENT: &str = "Comment";
}

pub fn docs(api: TransformOpenApi) -> TransformOpenApi {
	api.title("Forum API")
		.summary("A small forum: posts in subreddits with nested comments")
		.description(include_str!("../README.md"))
		.tag(Tag {
			name: tag::POST.into(),
			description: Some("Post management".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::COMMENT.into(),
			description: Some("Comments and replies".into()),
			..Default::default()
		})
		.default_response_with::<Json<error::Message>, _>(|res| {
			res.example(error::Message::new("error message").detail("key", "value"))
		})
}
