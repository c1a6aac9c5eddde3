#![allow(dead_code)]

use airflow_ext::schedule::{JobSchedule, Schedule, ScheduleExport};
use serde_json::{Map, Value, json};

/// Builder for one elt schedule record, as it appears in an export.
pub struct ScheduleBuilder {
    record: Map<String, Value>,
}

impl ScheduleBuilder {
    pub fn new(name: &str) -> Self {
        let mut record = Map::new();
        record.insert("name".into(), json!(name));
        record.insert("cron_interval".into(), json!("0 0 * * *"));
        record.insert("interval".into(), json!("@daily"));
        record.insert("start_date".into(), Value::Null);
        record.insert("extractor".into(), Value::Null);
        record.insert("loader".into(), Value::Null);
        record.insert("transform".into(), Value::Null);
        Self { record }
    }

    pub fn cron_interval(mut self, cron: Option<&str>) -> Self {
        self.record.insert("cron_interval".into(), json!(cron));
        self
    }

    pub fn interval(mut self, interval: &str) -> Self {
        self.record.insert("interval".into(), json!(interval));
        self
    }

    pub fn start_date(mut self, start_date: &str) -> Self {
        self.record.insert("start_date".into(), json!(start_date));
        self
    }

    pub fn extractor(mut self, extractor: &str) -> Self {
        self.record.insert("extractor".into(), json!(extractor));
        self
    }

    pub fn loader(mut self, loader: &str) -> Self {
        self.record.insert("loader".into(), json!(loader));
        self
    }

    pub fn transform(mut self, transform: &str) -> Self {
        self.record.insert("transform".into(), json!(transform));
        self
    }

    /// Set `annotations.airbyte` verbatim.
    pub fn airbyte(mut self, airbyte: Value) -> Self {
        self.record
            .insert("annotations".into(), json!({ "airbyte": airbyte }));
        self
    }

    pub fn build(self) -> Value {
        Value::Object(self.record)
    }

    pub fn build_typed(self) -> Schedule {
        serde_json::from_value(self.build()).expect("builder produced an invalid elt record")
    }
}

/// Builder for one v2 job schedule record.
pub struct JobScheduleBuilder {
    record: Map<String, Value>,
    tasks: Vec<Value>,
    job_name: Option<String>,
}

impl JobScheduleBuilder {
    pub fn new(name: &str, job_name: &str) -> Self {
        let mut record = Map::new();
        record.insert("name".into(), json!(name));
        record.insert("cron_interval".into(), json!("0 * * * *"));
        Self {
            record,
            tasks: Vec::new(),
            job_name: Some(job_name.to_string()),
        }
    }

    /// A job schedule record without a nested `job`.
    pub fn without_job(name: &str) -> Self {
        let mut builder = Self::new(name, "");
        builder.job_name = None;
        builder
    }

    pub fn cron_interval(mut self, cron: Option<&str>) -> Self {
        self.record.insert("cron_interval".into(), json!(cron));
        self
    }

    pub fn start_date(mut self, start_date: &str) -> Self {
        self.record.insert("start_date".into(), json!(start_date));
        self
    }

    /// Add a single-token task, e.g. `"tap-foo target-bar"`.
    pub fn task(mut self, task: &str) -> Self {
        self.tasks.push(json!(task));
        self
    }

    /// Add a multi-token task, e.g. `["tap-foo", "target-bar"]`.
    pub fn task_tokens(mut self, tokens: &[&str]) -> Self {
        self.tasks.push(json!(tokens));
        self
    }

    pub fn airbyte(mut self, airbyte: Value) -> Self {
        self.record
            .insert("annotations".into(), json!({ "airbyte": airbyte }));
        self
    }

    pub fn build(mut self) -> Value {
        if let Some(job_name) = self.job_name {
            self.record.insert(
                "job".into(),
                json!({ "name": job_name, "tasks": self.tasks }),
            );
        }
        Value::Object(self.record)
    }

    pub fn build_typed(self) -> JobSchedule {
        serde_json::from_value(self.build()).expect("builder produced an invalid job record")
    }
}

/// Builder for a whole export document.
pub struct ExportBuilder {
    versioned: bool,
    elt: Vec<Value>,
    job: Vec<Value>,
}

impl ExportBuilder {
    /// `{"schedules": {"elt": [...], "job": [...]}}`
    pub fn v2() -> Self {
        Self {
            versioned: true,
            elt: Vec::new(),
            job: Vec::new(),
        }
    }

    /// A bare array of elt records.
    pub fn v1() -> Self {
        Self {
            versioned: false,
            elt: Vec::new(),
            job: Vec::new(),
        }
    }

    pub fn elt(mut self, schedule: ScheduleBuilder) -> Self {
        self.elt.push(schedule.build());
        self
    }

    pub fn job(mut self, schedule: JobScheduleBuilder) -> Self {
        self.job.push(schedule.build());
        self
    }

    pub fn build(self) -> Value {
        if self.versioned {
            json!({ "schedules": { "elt": self.elt, "job": self.job } })
        } else {
            Value::Array(self.elt)
        }
    }

    pub fn to_json(self) -> String {
        self.build().to_string()
    }

    pub fn build_typed(self) -> ScheduleExport {
        ScheduleExport::from_value(self.build()).expect("builder produced an invalid export")
    }
}
