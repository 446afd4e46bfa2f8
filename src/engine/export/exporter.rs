use crate::engine::errors::ExportError;
use crate::engine::rank::ResultList;

/// Sink for a finalized result list. Called once per successful run.
pub trait Exporter {
    fn export(&mut self, list: &ResultList) -> Result<(), ExportError>;
}

/// Keeps every exported list. Can be told to fail.
#[derive(Debug, Default)]
pub struct MemoryExporter {
    pub calls: Vec<ResultList>,
    failure: Option<String>,
}

impl MemoryExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            calls: Vec::new(),
            failure: Some(reason.into()),
        }
    }

    pub fn last(&self) -> Option<&ResultList> {
        self.calls.last()
    }
}

impl Exporter for MemoryExporter {
    fn export(&mut self, list: &ResultList) -> Result<(), ExportError> {
        self.calls.push(list.clone());
        match &self.failure {
            Some(reason) => Err(ExportError::SinkUnavailable(reason.clone())),
            None => Ok(()),
        }
    }
}
