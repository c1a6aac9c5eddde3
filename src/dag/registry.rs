// src/dag/registry.rs

use std::collections::BTreeMap;

use clap::ValueEnum;
use serde::Deserialize;
use tracing::{info, warn};

use crate::dag::model::JobGraphDefinition;
use crate::errors::GeneratorError;

/// What to do when two schedules map to the same job graph id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Fail the whole generator run.
    #[default]
    Reject,
    /// Keep the later definition and log a warning.
    Replace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    schedule: String,
    definition: JobGraphDefinition,
}

/// Job graphs produced by one generator run, keyed by `dag_id`.
///
/// Iteration order is sorted by `dag_id`, so output is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobGraphRegistry {
    policy: DuplicatePolicy,
    entries: BTreeMap<String, Entry>,
}

impl JobGraphRegistry {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            entries: BTreeMap::new(),
        }
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Register a definition produced from `schedule`.
    pub fn register(
        &mut self,
        schedule: &str,
        definition: JobGraphDefinition,
    ) -> Result<(), GeneratorError> {
        let dag_id = definition.dag_id.clone();

        if let Some(existing) = self.entries.get(&dag_id) {
            match self.policy {
                DuplicatePolicy::Reject => {
                    return Err(GeneratorError::DuplicateJobIdentifier {
                        dag_id,
                        schedule: schedule.to_string(),
                    });
                }
                DuplicatePolicy::Replace => {
                    warn!(
                        dag_id = %dag_id,
                        previous_schedule = %existing.schedule,
                        schedule = %schedule,
                        "job graph id already registered, replacing previous definition"
                    );
                }
            }
        }

        info!(
            dag_id = %dag_id,
            schedule = %schedule,
            tasks = definition.tasks().len(),
            "registered job graph"
        );
        self.entries.insert(
            dag_id,
            Entry {
                schedule: schedule.to_string(),
                definition,
            },
        );
        Ok(())
    }

    pub fn get(&self, dag_id: &str) -> Option<&JobGraphDefinition> {
        self.entries.get(dag_id).map(|e| &e.definition)
    }

    /// Schedule name that produced `dag_id`.
    pub fn source_schedule(&self, dag_id: &str) -> Option<&str> {
        self.entries.get(dag_id).map(|e| e.schedule.as_str())
    }

    pub fn contains(&self, dag_id: &str) -> bool {
        self.entries.contains_key(dag_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dag_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &JobGraphDefinition> {
        self.entries.values().map(|e| &e.definition)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn into_definitions(self) -> Vec<JobGraphDefinition> {
        self.entries.into_values().map(|e| e.definition).collect()
    }
}
