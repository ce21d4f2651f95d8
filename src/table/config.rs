use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::cell::CellMode;
use crate::geometry::EPSILON;
use crate::logging::Logger;
use crate::metrics::GridMetrics;

/// Table-wide settings.
#[derive(Clone)]
pub struct GridConfig {
    /// Edge tolerance handed to the focus registry.
    pub epsilon: f64,
    /// Mode every widget starts in.
    pub default_mode: CellMode,
    /// Optional structured logger shared with the registry.
    pub logger: Option<Logger>,
    /// Metrics accumulator used for periodic snapshots.
    pub metrics: Option<Arc<Mutex<GridMetrics>>>,
    /// Interval between metrics snapshot emissions. Zero disables snapshots.
    pub metrics_interval: Duration,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            epsilon: EPSILON,
            default_mode: CellMode::Selected,
            logger: None,
            metrics: None,
            metrics_interval: Duration::from_secs(5),
            metrics_target: "cellgrid::table.metrics".to_string(),
        }
    }
}

impl GridConfig {
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(GridMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<GridMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_toggle() {
        let mut config = GridConfig::default();
        assert!(config.metrics_handle().is_none());
        config.enable_metrics();
        let first = config.metrics_handle().unwrap();
        config.enable_metrics();
        assert!(Arc::ptr_eq(&first, &config.metrics_handle().unwrap()));
        config.disable_metrics();
        assert!(config.metrics_handle().is_none());
    }
}
