//! Structural checks of the description form

use policy_console_core::PolicyDraft;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

/// Client-side validity of the description form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormState {
    pub valid: bool,
    pub violations: Vec<FieldViolation>,
}

impl FormState {
    /// Validity reported by an external form renderer
    pub fn from_flag(valid: bool) -> Self {
        Self {
            valid,
            violations: Vec::new(),
        }
    }

    /// Apply the field constraints of the description form to `draft`
    pub fn check(draft: &PolicyDraft) -> Self {
        let mut violations = Vec::new();

        let name = draft.name.trim();
        if name.is_empty() {
            violations.push(FieldViolation {
                field: "name",
                message: "name is required".to_string(),
            });
        } else if name != draft.name {
            violations.push(FieldViolation {
                field: "name",
                message: format!("name '{}' has leading or trailing whitespace", draft.name),
            });
        } else if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            violations.push(FieldViolation {
                field: "name",
                message: format!(
                    "name '{}' may only contain letters, digits, '-' and '_'",
                    draft.name
                ),
            });
        }

        if draft.raw_data_enabled()
            && draft
                .raw_data
                .path
                .as_deref()
                .map_or(true, |p| p.trim().is_empty())
        {
            violations.push(FieldViolation {
                field: "rawData.path",
                message: "path is required while raw data is enabled".to_string(),
            });
        }

        if draft.spark_streaming_window == Some(0) {
            violations.push(FieldViolation {
                field: "sparkStreamingWindow",
                message: "streaming window must be greater than zero".to_string(),
            });
        }

        Self {
            valid: violations.is_empty(),
            violations,
        }
    }
}
