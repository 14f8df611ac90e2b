//! Option lists shown on the description form
//!
//! These are display data only; nothing in the wizard interprets them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption<T> {
    pub label: String,
    pub value: T,
}

impl<T> SelectOption<T> {
    fn new(label: &str, value: T) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelpLinks {
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyStaticData {
    /// Batch intervals, in milliseconds
    pub spark_streaming_window: Vec<SelectOption<u64>>,
    /// Checkpoint intervals, in milliseconds
    pub checkpoint_interval: Vec<SelectOption<u64>>,
    /// How long checkpoints are kept, in milliseconds
    pub checkpoint_availability: Vec<SelectOption<u64>>,
    pub partition_format: Vec<SelectOption<String>>,
    pub storage_level: Vec<SelectOption<String>>,
    pub help_links: HelpLinks,
}

impl Default for PolicyStaticData {
    fn default() -> Self {
        let names = |values: &[&str]| -> Vec<SelectOption<String>> {
            values
                .iter()
                .map(|v| SelectOption::new(v, v.to_string()))
                .collect()
        };

        Self {
            spark_streaming_window: vec![
                SelectOption::new("2 seconds", 2_000),
                SelectOption::new("6 seconds", 6_000),
                SelectOption::new("10 seconds", 10_000),
                SelectOption::new("30 seconds", 30_000),
                SelectOption::new("1 minute", 60_000),
            ],
            checkpoint_interval: vec![
                SelectOption::new("10 seconds", 10_000),
                SelectOption::new("30 seconds", 30_000),
                SelectOption::new("1 minute", 60_000),
                SelectOption::new("5 minutes", 300_000),
            ],
            checkpoint_availability: vec![
                SelectOption::new("1 minute", 60_000),
                SelectOption::new("10 minutes", 600_000),
                SelectOption::new("1 hour", 3_600_000),
                SelectOption::new("1 day", 86_400_000),
            ],
            partition_format: names(&["year", "month", "day", "hour", "minute"]),
            storage_level: names(&[
                "MEMORY_ONLY",
                "MEMORY_ONLY_SER",
                "MEMORY_AND_DISK",
                "MEMORY_AND_DISK_SER",
                "DISK_ONLY",
                "MEMORY_ONLY_2",
                "MEMORY_ONLY_SER_2",
                "MEMORY_AND_DISK_2",
                "MEMORY_AND_DISK_SER_2",
            ]),
            help_links: HelpLinks {
                description: "/help/policy-description".to_string(),
            },
        }
    }
}
