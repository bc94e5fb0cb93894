use tracery_core::schemas::KvMap;

/// Per-call evaluation settings
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluateOptions {
    /// Attach the run's descendants before grading
    pub load_child_runs: bool,
    /// Metadata recorded in every feedback source
    pub source_info: KvMap,
    /// Evaluations in flight at once when evaluating a cursor
    pub max_concurrency: usize,
}

impl Default for EvaluateOptions {
    fn default() -> Self {
        Self {
            load_child_runs: false,
            source_info: KvMap::new(),
            max_concurrency: 1,
        }
    }
}

impl EvaluateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_child_runs(mut self) -> Self {
        self.load_child_runs = true;
        self
    }

    pub fn with_source_info(mut self, source_info: KvMap) -> Self {
        self.source_info = source_info;
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }
}
