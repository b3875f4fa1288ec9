use std::collections::HashMap;

use uuid::Uuid;

use super::model::{Comment, CommentNode, CommentRow, Post, PostDetail, PostRow};

/// Formats a creation instant for display.
///
/// The value is the hour of day (00-23), not an elapsed duration.
pub fn timestamp_label(created_at: &chrono::DateTime<chrono::Utc>) -> String {
	format!("{} hours ago", created_at.format("%H"))
}

/// Splits a post's comment rows into its top-level comments and a map of
/// children keyed by parent id, both in store order.
pub fn split_by_parent(rows: Vec<CommentRow>) -> (Vec<CommentRow>, HashMap<Uuid, Vec<CommentRow>>) {
	let mut roots = Vec::new();
	let mut children: HashMap<Uuid, Vec<CommentRow>> = HashMap::new();

	for row in rows {
		match row.parent_id {
			Some(parent_id) => children.entry(parent_id).or_default().push(row),
			None => roots.push(row),
		}
	}

	(roots, children)
}

struct Frame {
	node: CommentNode,
	pending: std::vec::IntoIter<CommentRow>,
}

impl Frame {
	fn open(row: CommentRow, children: &mut HashMap<Uuid, Vec<CommentRow>>) -> Self {
		let pending = children.remove(&row.id).unwrap_or_default().into_iter();

		Self {
			node: CommentNode::from_row(row),
			pending,
		}
	}
}

/// Builds the nested reply trees for a set of top-level comments.
///
/// Depth-first over an explicit stack of frames, so the call stack stays
/// flat no matter how deep a reply chain goes. A node is attached to its
/// parent once all of its own children have been attached. Each row is
/// consumed at most once, so the walk terminates on any input.
pub fn comment_forest(
	roots: Vec<CommentRow>,
	mut children: HashMap<Uuid, Vec<CommentRow>>,
) -> Vec<CommentNode> {
	let mut forest = Vec::with_capacity(roots.len());
	let mut roots = roots.into_iter();
	let mut stack: Vec<Frame> = Vec::new();

	loop {
		let next = if let Some(frame) = stack.last_mut() {
			frame.pending.next()
		} else if let Some(root) = roots.next() {
			stack.push(Frame::open(root, &mut children));
			continue;
		} else {
			return forest;
		};

		match next {
			Some(row) => stack.push(Frame::open(row, &mut children)),
			None => {
				if let Some(frame) = stack.pop() {
					match stack.last_mut() {
						Some(parent) => parent.node.replies.push(frame.node),
						None => forest.push(frame.node),
					}
				}
			}
		}
	}
}

impl CommentNode {
	/// Serializes a single comment row, with no replies attached yet.
	pub fn from_row(row: CommentRow) -> Self {
		Self {
			id: row.id,
			content: row.content,
			author: row.author,
			votes: row.votes,
			timestamp: timestamp_label(&row.created_at),
			replies: Vec::new(),
		}
	}

	/// Serializes a freshly written comment, which cannot have replies.
	pub fn from_comment(comment: Comment, author: String) -> Self {
		Self {
			id: comment.id,
			content: comment.content,
			author,
			votes: comment.votes,
			timestamp: timestamp_label(&comment.created_at),
			replies: Vec::new(),
		}
	}
}

impl PostDetail {
	/// Serializes a post row together with its comment forest.
	pub fn from_rows(post: PostRow, rows: Vec<CommentRow>) -> Self {
		let (roots, children) = split_by_parent(rows);

		Self {
			id: post.id,
			title: post.title,
			content: post.content,
			author: post.author,
			subreddit: post.subreddit,
			votes: post.votes,
			timestamp: timestamp_label(&post.created_at),
			comments: comment_forest(roots, children),
		}
	}

	/// Serializes a freshly created post, which cannot have comments yet.
	pub fn from_post(post: Post, author: String) -> Self {
		Self {
			id: post.id,
			title: post.title,
			content: post.content,
			author,
			subreddit: post.subreddit,
			votes: post.votes,
			timestamp: timestamp_label(&post.created_at),
			comments: Vec::new(),
		}
	}
}
