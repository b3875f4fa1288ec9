pub use serde_json::json;

pub use crate::Database;

/// Spins up an in-process test server around the full application router.
pub fn app(database: Database) -> axum_test::TestServer {
	axum_test::TestServer::new(crate::app(database)).expect("failed to start test server")
}
