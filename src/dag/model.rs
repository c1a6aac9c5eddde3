// src/dag/model.rs

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use serde::{Serialize, Serializer};

use crate::errors::GeneratorError;

/// Tag carried by every generated job graph.
pub const BASE_TAG: &str = "meltano";

/// Default arguments applied to every task of a job graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefaultArgs {
    pub owner: String,
    pub depends_on_past: bool,
    pub email_on_failure: bool,
    pub email_on_retry: bool,
    pub catchup: bool,
    pub retries: u32,
    #[serde(serialize_with = "serialize_secs")]
    pub retry_delay: Duration,
    pub concurrency: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDateTime>,
}

impl Default for DefaultArgs {
    fn default() -> Self {
        Self {
            owner: "airflow".to_string(),
            depends_on_past: false,
            email_on_failure: false,
            email_on_retry: false,
            catchup: false,
            retries: 1,
            retry_delay: Duration::from_secs(5 * 60),
            concurrency: 1,
            start_date: None,
        }
    }
}

impl DefaultArgs {
    pub fn with_start_date(mut self, start_date: NaiveDateTime) -> Self {
        self.start_date = Some(start_date);
        self
    }
}

fn serialize_secs<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_secs())
}

/// Midnight, 1970-01-01.
pub fn epoch() -> NaiveDateTime {
    DateTime::<Utc>::UNIX_EPOCH.naive_utc()
}

/// One shell task inside a job graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskNode {
    pub task_id: String,
    pub bash_command: String,
    /// Task that must succeed before this one may start.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream: Option<String>,
}

/// A scheduler-native job graph.
///
/// Tasks form a strict linear chain: each task's upstream is the task added
/// before it. Catch-up is always off and at most one run is active, since
/// the extract/load pairs underneath cannot run windowed or in parallel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobGraphDefinition {
    pub dag_id: String,
    pub tags: Vec<String>,
    pub default_args: DefaultArgs,
    pub schedule_interval: Option<String>,
    catchup: bool,
    max_active_runs: u32,
    tasks: Vec<TaskNode>,
}

impl JobGraphDefinition {
    pub fn new(
        dag_id: impl Into<String>,
        default_args: DefaultArgs,
        schedule_interval: Option<String>,
    ) -> Self {
        Self {
            dag_id: dag_id.into(),
            tags: vec![BASE_TAG.to_string()],
            default_args,
            schedule_interval,
            catchup: false,
            max_active_runs: 1,
            tasks: Vec::new(),
        }
    }

    /// Add a tag, keeping the first occurrence of duplicates.
    pub fn tag(&mut self, tag: impl Into<String>) -> &mut Self {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    /// Append a task that runs after the current last task.
    pub fn chain_task(
        &mut self,
        task_id: impl Into<String>,
        bash_command: impl Into<String>,
    ) -> &mut Self {
        let upstream = self.tasks.last().map(|t| t.task_id.clone());
        self.tasks.push(TaskNode {
            task_id: task_id.into(),
            bash_command: bash_command.into(),
            upstream,
        });
        self
    }

    pub fn catchup(&self) -> bool {
        self.catchup
    }

    pub fn max_active_runs(&self) -> u32 {
        self.max_active_runs
    }

    pub fn tasks(&self) -> &[TaskNode] {
        &self.tasks
    }

    pub fn task(&self, task_id: &str) -> Option<&TaskNode> {
        self.tasks.iter().find(|t| t.task_id == task_id)
    }

    /// Immediate dependencies of a task.
    pub fn dependencies_of(&self, task_id: &str) -> Vec<&str> {
        self.task(task_id)
            .and_then(|t| t.upstream.as_deref())
            .into_iter()
            .collect()
    }

    /// Immediate dependents of a task.
    pub fn dependents_of(&self, task_id: &str) -> Vec<&str> {
        self.tasks
            .iter()
            .filter(|t| t.upstream.as_deref() == Some(task_id))
            .map(|t| t.task_id.as_str())
            .collect()
    }

    /// Task ids in an order that respects every dependency.
    ///
    /// Fails on duplicate task ids, dangling upstream references, or cycles.
    pub fn execution_order(&self) -> Result<Vec<&str>, GeneratorError> {
        let invalid = |reason: String| GeneratorError::InvalidJobGraph {
            dag_id: self.dag_id.clone(),
            reason,
        };

        let mut seen: HashSet<&str> = HashSet::new();
        for task in &self.tasks {
            if !seen.insert(task.task_id.as_str()) {
                return Err(invalid(format!("duplicate task id '{}'", task.task_id)));
            }
        }

        // Edge direction: upstream -> task.
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
        for task in &self.tasks {
            graph.add_node(task.task_id.as_str());
        }
        for task in &self.tasks {
            if let Some(upstream) = task.upstream.as_deref() {
                if !seen.contains(upstream) {
                    return Err(invalid(format!(
                        "task '{}' depends on unknown task '{}'",
                        task.task_id, upstream
                    )));
                }
                graph.add_edge(upstream, task.task_id.as_str(), ());
            }
        }

        toposort(&graph, None)
            .map_err(|cycle| invalid(format!("cycle involving task '{}'", cycle.node_id())))
    }
}
