//! Core domain models

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::CoreError;

fn enabled_by_default() -> bool {
    true
}

/// Raw-data sink settings of a policy
///
/// `path` and `partition_format` only mean something while raw data
/// persistence is enabled on the owning draft.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawData {
    /// Target location for the raw records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Directory partitioning pattern, e.g. `yyyy/MM/dd`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition_format: Option<String>,
    /// Any other settings the server keeps in this bag
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawData {
    pub fn is_empty(&self) -> bool {
        self.path.is_none() && self.partition_format.is_none() && self.extra.is_empty()
    }
}

/// A policy being edited in the creation wizard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDraft {
    /// Server-assigned identifier, absent until first persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Human-readable name; unique across policies ignoring case
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether raw data persistence is on. Only an explicit `false` disables it;
    /// see `raw_data_enabled` for the nested `rawData.enabled` form.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub raw_data: RawData,
    /// Batch interval of the streaming job, in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spark_streaming_window: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpoint_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_level: Option<String>,
    /// Fields owned by later wizard steps (inputs, outputs, cubes...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PolicyDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            enabled: true,
            raw_data: RawData::default(),
            spark_streaming_window: None,
            checkpoint_path: None,
            storage_level: None,
            extra: Map::new(),
        }
    }

    /// Parse a draft from its JSON wire form
    pub fn from_json(input: &str) -> Result<Self, CoreError> {
        let value: Value = serde_json::from_str(input)?;
        if !value.is_object() {
            return Err(CoreError::InvalidDraft(format!(
                "expected a JSON object, found {}",
                json_kind(&value)
            )));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Whether raw data persistence is on, honouring both the top-level
    /// `enabled` flag and an explicit `rawData.enabled: false`.
    pub fn raw_data_enabled(&self) -> bool {
        self.enabled && self.raw_data.extra.get("enabled") != Some(&Value::Bool(false))
    }

    /// Drop the raw-data sink settings when raw data is disabled.
    ///
    /// Returns `true` if anything was removed. Calling it again is a no-op.
    pub fn prune_disabled_raw_data(&mut self) -> bool {
        if self.raw_data_enabled() {
            return false;
        }
        let had_path = self.raw_data.path.take().is_some();
        let had_format = self.raw_data.partition_format.take().is_some();
        had_path || had_format
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// An already saved policy as returned by the policy list endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyListEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PolicyListEntry {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            extra: Map::new(),
        }
    }
}

impl From<&PolicyDraft> for PolicyListEntry {
    fn from(draft: &PolicyDraft) -> Self {
        Self {
            id: draft.id.clone(),
            name: draft.name.clone(),
            extra: Map::new(),
        }
    }
}

/// Flags the description step exposes to whoever renders it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    /// The chosen name is already used by another policy
    pub error: bool,
    /// The last attempt to load the policy list failed
    pub transport_error: bool,
}
