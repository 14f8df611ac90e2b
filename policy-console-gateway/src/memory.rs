//! In-memory gateway for development and testing

use async_trait::async_trait;
use policy_console_core::{PolicyDraft, PolicyListEntry};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::{GatewayError, PolicyGateway};

type PolicyMap = HashMap<String, PolicyDraft>;

/// In-memory policy collection standing in for the remote API
pub struct InMemoryGateway {
    policies: RwLock<PolicyMap>,
    running: RwLock<HashSet<String>>,
    fake: PolicyDraft,
    unavailable: AtomicBool,
    calls: AtomicUsize,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self {
            policies: RwLock::new(HashMap::new()),
            running: RwLock::new(HashSet::new()),
            fake: default_fake_policy(),
            unavailable: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// Create pre-populated with saved policies; drafts without an ID get one
    pub fn with_policies(policies: impl IntoIterator<Item = PolicyDraft>) -> Self {
        let gateway = Self::new();
        if let Ok(mut map) = gateway.policies.write() {
            for mut policy in policies {
                let id = policy.id.get_or_insert_with(new_id).clone();
                map.insert(id, policy);
            }
        }
        gateway
    }

    /// Replace the fixture served by `fetch_fake`
    pub fn with_fake(mut self, fake: PolicyDraft) -> Self {
        self.fake = fake;
        self
    }

    /// While set, every operation fails as if the server were unreachable
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of operations issued so far, failed ones included
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn is_running(&self, id: &str) -> bool {
        self.running
            .read()
            .map(|running| running.contains(id))
            .unwrap_or(false)
    }

    fn enter(&self, operation: &str) -> Result<(), GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("in-memory gateway: {}", operation);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable(format!(
                "policy service unreachable during {}",
                operation
            )));
        }
        Ok(())
    }

    fn read_policies(&self) -> Result<RwLockReadGuard<'_, PolicyMap>, GatewayError> {
        self.policies
            .read()
            .map_err(|_| GatewayError::Internal("policy map lock poisoned".to_string()))
    }

    fn write_policies(&self) -> Result<RwLockWriteGuard<'_, PolicyMap>, GatewayError> {
        self.policies
            .write()
            .map_err(|_| GatewayError::Internal("policy map lock poisoned".to_string()))
    }

    fn write_running(&self) -> Result<RwLockWriteGuard<'_, HashSet<String>>, GatewayError> {
        self.running
            .write()
            .map_err(|_| GatewayError::Internal("running set lock poisoned".to_string()))
    }
}

impl Default for InMemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn default_fake_policy() -> PolicyDraft {
    let mut fake = PolicyDraft::new("fake-policy");
    fake.description = Some("Demo policy".to_string());
    fake.spark_streaming_window = Some(6000);
    fake.storage_level = Some("MEMORY_AND_DISK_SER".to_string());
    fake.enabled = false;
    fake
}

/// Whether `policy` lists the fragment among its `fragments`
fn uses_fragment(policy: &PolicyDraft, fragment_type: &str, fragment_id: &str) -> bool {
    policy
        .extra
        .get("fragments")
        .and_then(Value::as_array)
        .map(|fragments| {
            fragments.iter().any(|fragment| {
                fragment.get("fragmentType").and_then(Value::as_str) == Some(fragment_type)
                    && fragment.get("id").and_then(Value::as_str) == Some(fragment_id)
            })
        })
        .unwrap_or(false)
}

fn require_id(draft: &PolicyDraft) -> Result<&str, GatewayError> {
    draft
        .id
        .as_deref()
        .ok_or_else(|| GatewayError::NotFound(format!("Policy '{}' has no id", draft.name)))
}

#[async_trait]
impl PolicyGateway for InMemoryGateway {
    async fn fetch_by_fragment(
        &self,
        fragment_type: &str,
        fragment_id: &str,
    ) -> Result<Vec<PolicyListEntry>, GatewayError> {
        self.enter("fetch_by_fragment")?;
        let policies = self.read_policies()?;
        Ok(policies
            .values()
            .filter(|p| uses_fragment(p, fragment_type, fragment_id))
            .map(PolicyListEntry::from)
            .collect())
    }

    async fn fetch_all(&self) -> Result<Vec<PolicyListEntry>, GatewayError> {
        self.enter("fetch_all")?;
        let policies = self.read_policies()?;
        let mut entries: Vec<_> = policies.values().map(PolicyListEntry::from).collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn create(&self, draft: &PolicyDraft) -> Result<PolicyDraft, GatewayError> {
        self.enter("create")?;
        let mut policies = self.write_policies()?;
        let mut policy = draft.clone();
        let id = policy.id.get_or_insert_with(new_id).clone();
        if policies.contains_key(&id) {
            return Err(GatewayError::AlreadyExists(format!(
                "Policy with id {} already exists",
                id
            )));
        }
        policies.insert(id, policy.clone());
        Ok(policy)
    }

    async fn delete(&self, id: &str) -> Result<(), GatewayError> {
        self.enter("delete")?;
        if self.write_policies()?.remove(id).is_none() {
            return Err(GatewayError::NotFound(format!(
                "Policy with id {} not found",
                id
            )));
        }
        self.write_running()?.remove(id);
        Ok(())
    }

    async fn run(&self, id: &str) -> Result<Value, GatewayError> {
        self.enter("run")?;
        let name = self
            .read_policies()?
            .get(id)
            .map(|p| p.name.clone())
            .ok_or_else(|| GatewayError::NotFound(format!("Policy with id {} not found", id)))?;
        self.write_running()?.insert(id.to_string());
        Ok(json!({"id": id, "name": name, "status": "Launched"}))
    }

    async fn fetch_fake(&self) -> Result<PolicyDraft, GatewayError> {
        self.enter("fetch_fake")?;
        Ok(self.fake.clone())
    }

    async fn stop(&self, draft: &PolicyDraft) -> Result<Value, GatewayError> {
        self.enter("stop")?;
        let id = require_id(draft)?;
        if !self.read_policies()?.contains_key(id) {
            return Err(GatewayError::NotFound(format!(
                "Policy with id {} not found",
                id
            )));
        }
        self.write_running()?.remove(id);
        Ok(json!({"id": id, "status": "Stopping"}))
    }

    async fn save(&self, draft: &PolicyDraft) -> Result<PolicyDraft, GatewayError> {
        self.enter("save")?;
        let id = require_id(draft)?;
        let mut policies = self.write_policies()?;
        match policies.get_mut(id) {
            Some(existing) => {
                *existing = draft.clone();
                Ok(draft.clone())
            }
            None => Err(GatewayError::NotFound(format!(
                "Policy with id {} not found",
                id
            ))),
        }
    }
}
