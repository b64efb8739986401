//! In-memory pipeline used by unit tests

use super::{PipelineError, ResultKind, RetrievalPipeline};
use crate::query::QueryDescriptor;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

/// Returns canned responses per kind and records every call
#[derive(Default)]
pub struct RecordingPipeline {
    responses: HashMap<ResultKind, Result<Value, PipelineError>>,
    calls: Mutex<Vec<(ResultKind, QueryDescriptor)>>,
}

impl RecordingPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, kind: ResultKind, value: Value) -> Self {
        self.responses.insert(kind, Ok(value));
        self
    }

    pub fn fail(mut self, kind: ResultKind, error: PipelineError) -> Self {
        self.responses.insert(kind, Err(error));
        self
    }

    pub fn calls(&self) -> Vec<(ResultKind, QueryDescriptor)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RetrievalPipeline for RecordingPipeline {
    async fn fetch(
        &self,
        kind: ResultKind,
        query: &QueryDescriptor,
    ) -> Result<Value, PipelineError> {
        self.calls.lock().unwrap().push((kind, query.clone()));
        self.responses
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| Err(PipelineError::NotFound(format!("{} {}", kind, query))))
    }
}
