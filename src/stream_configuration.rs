//! Configuration types for stream tracing and collection

use log::Level;

/// Settings for the `traced` combinator
#[derive(Debug, Clone)]
pub struct TraceConfig {
    pub label: String,
    pub level: Level,
    pub log_skips: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            label: "stream".to_string(),
            level: Level::Trace,
            log_skips: false,
        }
    }
}

impl TraceConfig {
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Skips are silent unless enabled; filters can produce a lot of them.
    pub fn with_skips(mut self, log_skips: bool) -> Self {
        self.log_skips = log_skips;
        self
    }
}

/// Buffer presizing for `to_vec_with`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectConfig {
    pub initial_capacity: usize,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 16,
        }
    }
}

impl CollectConfig {
    pub fn with_capacity(initial_capacity: usize) -> Self {
        Self { initial_capacity }
    }
}
