//! Gateway trait defining the remote policy operations

use async_trait::async_trait;
use policy_console_core::{PolicyDraft, PolicyListEntry};
use serde_json::Value;

use crate::GatewayError;

/// One method per remote policy operation.
///
/// Implementations pass requests straight through: no validation, no
/// retries, and failures are returned to the caller as they happened.
#[async_trait]
pub trait PolicyGateway: Send + Sync {
    /// List the policies that use the given fragment
    async fn fetch_by_fragment(
        &self,
        fragment_type: &str,
        fragment_id: &str,
    ) -> Result<Vec<PolicyListEntry>, GatewayError>;

    /// List all saved policies
    async fn fetch_all(&self) -> Result<Vec<PolicyListEntry>, GatewayError>;

    /// Persist a new policy
    async fn create(&self, draft: &PolicyDraft) -> Result<PolicyDraft, GatewayError>;

    /// Delete a policy by ID
    async fn delete(&self, id: &str) -> Result<(), GatewayError>;

    /// Launch a policy
    async fn run(&self, id: &str) -> Result<Value, GatewayError>;

    /// Fetch the demo policy fixture
    async fn fetch_fake(&self) -> Result<PolicyDraft, GatewayError>;

    /// Ask the server to stop a running policy
    async fn stop(&self, draft: &PolicyDraft) -> Result<Value, GatewayError>;

    /// Overwrite an existing policy
    async fn save(&self, draft: &PolicyDraft) -> Result<PolicyDraft, GatewayError>;
}
