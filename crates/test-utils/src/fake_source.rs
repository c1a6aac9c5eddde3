use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};

use airflow_ext::errors::GeneratorError;
use airflow_ext::schedule::ScheduleSource;

/// A fake schedule source that:
/// - returns canned text (or a canned failure) on every fetch
/// - counts how many times it was asked.
pub struct FakeScheduleSource {
    response: Result<String, String>,
    fetches: AtomicUsize,
}

impl FakeScheduleSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
            fetches: AtomicUsize::new(0),
        }
    }

    /// A source whose command always fails.
    pub fn failing(reason: &str) -> Self {
        Self {
            response: Err(reason.to_string()),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl ScheduleSource for FakeScheduleSource {
    fn fetch(&self) -> Pin<Box<dyn Future<Output = Result<String, GeneratorError>> + Send + '_>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let response = self
            .response
            .clone()
            .map_err(GeneratorError::SourceUnavailable);
        Box::pin(async move { response })
    }
}
