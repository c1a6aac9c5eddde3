// src/schedule/model.rs

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::errors::GeneratorError;

/// Sentinel `cron_interval` for schedules that only run on demand.
pub const RUN_ONCE: &str = "@once";

/// A parsed `schedule list --format=json` document.
///
/// v2 exports look like:
///
/// ```json
/// { "schedules": { "elt": [ ... ], "job": [ ... ] } }
/// ```
///
/// v1 exports are a bare array of elt records.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleExport {
    V1(Vec<Schedule>),
    V2 {
        elt: Vec<Schedule>,
        job: Vec<JobSchedule>,
    },
}

/// Top-level shape of an export before any typed parsing happens.
///
/// Classification only looks at the JSON kind and the presence of the
/// `schedules` key, never at record contents.
#[derive(Debug)]
enum RawEnvelope {
    Versioned(Value),
    Bare(Value),
    Unrecognised(Map<String, Value>),
    Scalar(&'static str),
}

impl From<Value> for RawEnvelope {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) if map.contains_key("schedules") => {
                RawEnvelope::Versioned(Value::Object(map))
            }
            Value::Object(map) => RawEnvelope::Unrecognised(map),
            Value::Array(_) => RawEnvelope::Bare(value),
            Value::Null => RawEnvelope::Scalar("null"),
            Value::Bool(_) => RawEnvelope::Scalar("boolean"),
            Value::Number(_) => RawEnvelope::Scalar("number"),
            Value::String(_) => RawEnvelope::Scalar("string"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct VersionedEnvelope {
    #[serde(default)]
    schedules: Option<VersionedSchedules>,
}

#[derive(Debug, Default, Deserialize)]
struct VersionedSchedules {
    #[serde(default)]
    elt: Option<Vec<Schedule>>,
    #[serde(default)]
    job: Option<Vec<JobSchedule>>,
}

impl ScheduleExport {
    /// Parse raw stdout of the schedule listing command.
    pub fn from_json(text: &str) -> Result<Self, GeneratorError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Classify an already-parsed JSON value and build the typed variant.
    pub fn from_value(value: Value) -> Result<Self, GeneratorError> {
        match RawEnvelope::from(value) {
            RawEnvelope::Versioned(value) => {
                let envelope: VersionedEnvelope = serde_json::from_value(value)?;
                let schedules = envelope.schedules.unwrap_or_default();
                Ok(ScheduleExport::V2 {
                    elt: schedules.elt.unwrap_or_default(),
                    job: schedules.job.unwrap_or_default(),
                })
            }
            RawEnvelope::Bare(value) => Ok(ScheduleExport::V1(serde_json::from_value(value)?)),
            RawEnvelope::Unrecognised(map) => {
                let keys: Vec<&str> = map.keys().map(String::as_str).collect();
                Err(GeneratorError::UnknownSchema(format!(
                    "object export without a `schedules` key (keys: {keys:?})"
                )))
            }
            RawEnvelope::Scalar(kind) => Err(GeneratorError::UnknownSchema(format!(
                "expected an object or an array, got {kind}"
            ))),
        }
    }

    pub fn version(&self) -> u8 {
        match self {
            ScheduleExport::V1(_) => 1,
            ScheduleExport::V2 { .. } => 2,
        }
    }

    /// Total number of schedule records, across both lists for v2.
    pub fn len(&self) -> usize {
        match self {
            ScheduleExport::V1(elt) => elt.len(),
            ScheduleExport::V2 { elt, job } => elt.len() + job.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A legacy `elt` schedule record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Schedule {
    pub name: String,

    #[serde(default)]
    pub cron_interval: Option<String>,

    /// Engine-native trigger expression, used verbatim as the job graph's
    /// schedule interval.
    #[serde(default)]
    pub interval: Option<String>,

    #[serde(default, deserialize_with = "deserialize_start_date")]
    pub start_date: Option<NaiveDateTime>,

    #[serde(default)]
    pub extractor: Option<String>,

    #[serde(default)]
    pub loader: Option<String>,

    #[serde(default)]
    pub transform: Option<Transform>,

    #[serde(default)]
    pub annotations: Option<Annotations>,
}

/// A v2 `job` schedule record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JobSchedule {
    pub name: String,

    #[serde(default)]
    pub cron_interval: Option<String>,

    #[serde(default, deserialize_with = "deserialize_start_date")]
    pub start_date: Option<NaiveDateTime>,

    #[serde(default)]
    pub annotations: Option<Annotations>,

    #[serde(default)]
    pub job: Option<JobSpec>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JobSpec {
    pub name: String,

    #[serde(default)]
    pub tasks: Vec<TaskSpec>,
}

/// One entry of `job.tasks`: either `"tap-foo target-bar"` or
/// `["tap-foo", "target-bar"]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TaskSpec {
    Single(String),
    Sequence(Vec<String>),
}

impl TaskSpec {
    /// Arguments handed to `<bin> run`.
    pub fn run_args(&self) -> String {
        match self {
            TaskSpec::Single(token) => token.clone(),
            TaskSpec::Sequence(tokens) => tokens.join(" "),
        }
    }
}

/// The `transform` field of an elt schedule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Transform {
    Run,
    Only,
    Skip,
    Other(String),
}

impl From<String> for Transform {
    fn from(value: String) -> Self {
        match value.as_str() {
            "run" => Transform::Run,
            "only" => Transform::Only,
            "skip" => Transform::Skip,
            _ => Transform::Other(value),
        }
    }
}

impl Transform {
    /// Tag contributed to the job graph, if any.
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            Transform::Run => Some("transform"),
            Transform::Only => Some("transform-only"),
            Transform::Skip | Transform::Other(_) => None,
        }
    }
}

/// Free-form `annotations` block; only `airbyte` is interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Annotations {
    #[serde(default)]
    pub airbyte: Option<EnablementAnnotation>,
}

/// `annotations.airbyte`: per-environment enablement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EnablementAnnotation {
    /// `null` reads as `false`.
    #[serde(default, deserialize_with = "deserialize_null_as_false")]
    pub disabled: bool,

    /// `None` means "no environment affinity", which is not the same as an
    /// empty set.
    #[serde(default)]
    pub environments: Option<BTreeSet<String>>,
}

impl EnablementAnnotation {
    pub fn is_empty(&self) -> bool {
        !self.disabled && self.environments.is_none()
    }
}

/// True when a `cron_interval` means the schedule never triggers on its own.
pub fn is_run_once(cron_interval: Option<&str>) -> bool {
    match cron_interval.map(str::trim) {
        None | Some("") => true,
        Some(interval) => interval == RUN_ONCE,
    }
}

/// Parse a `start_date` in the formats the schedule listing emits.
pub fn parse_start_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn deserialize_start_date<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_start_date(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid start_date '{s}'"))),
    }
}

fn deserialize_null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}
