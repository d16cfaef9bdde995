use serde::{Deserialize, Serialize};

use crate::TickError;

pub(crate) const DEFAULT_EVENT_BUFFER_SIZE: usize = 1024;

/// Largest accepted event channel capacity. The channel allocates it up front.
pub const MAX_EVENT_BUFFER_SIZE: usize = 1 << 16;

/// Settings for a pipeline instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Capacity of the event broadcast channel.
    pub event_buffer_size: usize,

    /// Upper bound on ticks for `run_configured`. `None` runs to completion.
    pub max_ticks: Option<u64>,
}

impl PipelineConfig {
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the pipeline cannot honour.
    pub fn validate(&self) -> crate::Result<()> {
        if self.event_buffer_size > MAX_EVENT_BUFFER_SIZE {
            return Err(TickError::Config(format!(
                "event_buffer_size {} exceeds the maximum of {}",
                self.event_buffer_size, MAX_EVENT_BUFFER_SIZE
            )));
        }
        Ok(())
    }

    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: DEFAULT_EVENT_BUFFER_SIZE,
            max_ticks: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = PipelineConfig::from_json_str(r#"{"max_ticks": 10}"#).unwrap();
        assert_eq!(config.max_ticks, Some(10));
        assert_eq!(config.event_buffer_size, DEFAULT_EVENT_BUFFER_SIZE);
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let err = PipelineConfig::from_json_str("{").unwrap_err();
        assert!(matches!(err, TickError::Serialization(_)));
    }

    #[test]
    fn oversized_event_buffer_is_rejected() {
        let err = PipelineConfig::from_json_str(r#"{"event_buffer_size": 10000000000000000000}"#)
            .unwrap_err();
        assert!(matches!(err, TickError::Config(_)));

        let json = format!(r#"{{"event_buffer_size": {}}}"#, MAX_EVENT_BUFFER_SIZE);
        let config = PipelineConfig::from_json_str(&json).unwrap();
        assert_eq!(config.event_buffer_size, MAX_EVENT_BUFFER_SIZE);
    }
}
