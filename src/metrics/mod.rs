use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;

/// Counters accumulated by a [`GridTable`](crate::table::GridTable).
#[derive(Debug, Default, Clone)]
pub struct GridMetrics {
    events: u64,
    registrations: u64,
    focus_reports: u64,
    focus_misses: u64,
    moves: u64,
    blocked_moves: u64,
    commits: u64,
    mode_changes: u64,
}

impl GridMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_event(&mut self) {
        self.events = self.events.saturating_add(1);
    }

    pub fn record_registrations(&mut self, count: usize) {
        self.registrations = self.registrations.saturating_add(count as u64);
    }

    pub fn record_focus_report(&mut self, hit: bool) {
        self.focus_reports = self.focus_reports.saturating_add(1);
        if !hit {
            self.focus_misses = self.focus_misses.saturating_add(1);
        }
    }

    pub fn record_move(&mut self, resolved: bool) {
        if resolved {
            self.moves = self.moves.saturating_add(1);
        } else {
            self.blocked_moves = self.blocked_moves.saturating_add(1);
        }
    }

    pub fn record_commit(&mut self) {
        self.commits = self.commits.saturating_add(1);
    }

    pub fn record_mode_change(&mut self) {
        self.mode_changes = self.mode_changes.saturating_add(1);
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            events: self.events,
            registrations: self.registrations,
            focus_reports: self.focus_reports,
            focus_misses: self.focus_misses,
            moves: self.moves,
            blocked_moves: self.blocked_moves,
            commits: self.commits,
            mode_changes: self.mode_changes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub events: u64,
    pub registrations: u64,
    pub focus_reports: u64,
    pub focus_misses: u64,
    pub moves: u64,
    pub blocked_moves: u64,
    pub commits: u64,
    pub mode_changes: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "grid_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("events".to_string(), json!(self.events));
        map.insert("registrations".to_string(), json!(self.registrations));
        map.insert("focus_reports".to_string(), json!(self.focus_reports));
        map.insert("focus_misses".to_string(), json!(self.focus_misses));
        map.insert("moves".to_string(), json!(self.moves));
        map.insert("blocked_moves".to_string(), json!(self.blocked_moves));
        map.insert("commits".to_string(), json!(self.commits));
        map.insert("mode_changes".to_string(), json!(self.mode_changes));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_split_into_resolved_and_blocked() {
        let mut metrics = GridMetrics::new();
        metrics.record_move(true);
        metrics.record_move(false);
        metrics.record_move(false);
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.moves, 1);
        assert_eq!(snapshot.blocked_moves, 2);
    }

    #[test]
    fn snapshot_renders_as_log_event() {
        let mut metrics = GridMetrics::new();
        metrics.record_focus_report(true);
        metrics.record_focus_report(false);
        let event = metrics.snapshot().to_log_event("cellgrid::table.metrics");
        assert_eq!(event.message, "grid_metrics");
        assert_eq!(event.field("focus_reports"), Some(&json!(2)));
        assert_eq!(event.field("focus_misses"), Some(&json!(1)));
    }
}
