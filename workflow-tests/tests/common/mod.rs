//! Common test utilities for workflow tests.

use workflow_tests::{post, WorkflowTestContext};

/// Services seeded with three reception posts out of order and one post
/// that belongs elsewhere on the site.
pub async fn setup() -> WorkflowTestContext {
    WorkflowTestContext::start(vec![
        post("valkommen", 10, "mottagning"),
        post("schema-andrat", 30, "mottagning"),
        post("anmalan", 20, "mottagning"),
        post("styrelsemote", 40, "public"),
    ])
    .await
    .expect("Failed to start services")
}
