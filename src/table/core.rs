use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use crossterm::event::KeyEvent;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::cell::{CellCommand, CellMode, EventFlow};
use crate::error::{GridError, Result};
use crate::geometry::CellLayout;
use crate::logging::{LogLevel, emit, json_kv};
use crate::metrics::{GridMetrics, MetricSnapshot};
use crate::navigation::MoveDirection;
use crate::registry::{FocusRegistry, RegisterOutcome, SharedRegistry};
use crate::widgets::{CellCtx, CellValue, GridCell};

use super::composer::{CellScope, GridComposer};
use super::config::GridConfig;
use super::reducer::{ChangeSink, GridChange, RowData, apply_change};

const LOG_TARGET: &str = "cellgrid::table";

pub type CellFactory = Arc<dyn Fn(CellMode) -> Box<dyn GridCell> + Send + Sync>;

/// Column definition: data key, header text and the widget built for
/// every row of the column.
#[derive(Clone)]
pub struct ColumnDef {
    key: String,
    header: String,
    factory: CellFactory,
}

impl ColumnDef {
    pub fn new<F, C>(key: impl Into<String>, header: impl Into<String>, factory: F) -> Self
    where
        F: Fn(CellMode) -> C + Send + Sync + 'static,
        C: GridCell + 'static,
    {
        Self {
            key: key.into(),
            header: header.into(),
            factory: Arc::new(move |mode| Box::new(factory(mode)) as Box<dyn GridCell>),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    fn build(&self, mode: CellMode) -> Box<dyn GridCell> {
        (self.factory)(mode)
    }
}

impl fmt::Debug for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("key", &self.key)
            .field("header", &self.header)
            .finish_non_exhaustive()
    }
}

/// Sub-cell `sub` of the widget at `(row, column)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellAddress {
    pub row: usize,
    pub column: usize,
    pub sub: usize,
}

impl CellAddress {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column, sub: 0 }
    }

    pub fn with_sub(mut self, sub: usize) -> Self {
        self.sub = sub;
        self
    }
}

/// Input delivered to a table.
#[derive(Debug, Clone)]
pub enum GridEvent {
    /// Keystroke for the focused cell.
    Key(KeyEvent),
    Click(CellAddress),
    DoubleClick(CellAddress),
    /// The table as a whole lost input focus.
    FocusLost,
}

impl GridEvent {
    fn describe(&self) -> &'static str {
        match self {
            GridEvent::Key(_) => "key",
            GridEvent::Click(_) => "click",
            GridEvent::DoubleClick(_) => "double_click",
            GridEvent::FocusLost => "focus_lost",
        }
    }
}

/// Result of one [`GridTable::dispatch`].
#[derive(Debug, Clone, PartialEq)]
pub struct TableOutcome {
    pub flow: EventFlow,
    pub changes: Vec<GridChange>,
    /// Focused address once the event has been handled.
    pub focus: Option<CellAddress>,
}

/// An interactive table: rows of values, one widget per `(row, column)` and a
/// focus registry spanning every sub-cell.
pub struct GridTable {
    columns: Vec<ColumnDef>,
    rows: Vec<RowData>,
    cells: Vec<Vec<Box<dyn GridCell>>>,
    composer: GridComposer,
    focused: Option<CellAddress>,
    pending_focus: Arc<Mutex<Option<CellAddress>>>,
    change_sink: Option<Arc<dyn ChangeSink>>,
    config: GridConfig,
    last_metrics_emit: Option<Instant>,
}

impl GridTable {
    /// Table with its own registry built from `config`.
    pub fn new(columns: Vec<ColumnDef>, config: GridConfig) -> Self {
        let mut registry = FocusRegistry::new().with_epsilon(config.epsilon);
        if let Some(logger) = config.logger.clone() {
            registry = registry.with_logger(logger);
        }
        Self::with_registry(columns, Arc::new(registry), config)
    }

    /// Table over an injected registry.
    pub fn with_registry(columns: Vec<ColumnDef>, registry: SharedRegistry, config: GridConfig) -> Self {
        let mut table = Self {
            columns,
            rows: Vec::new(),
            cells: Vec::new(),
            composer: GridComposer::new(registry),
            focused: None,
            pending_focus: Arc::new(Mutex::new(None)),
            change_sink: None,
            config,
            last_metrics_emit: None,
        };
        table.ensure_metrics_initialized();
        table
    }

    pub fn set_change_sink<S>(&mut self, sink: S)
    where
        S: ChangeSink + 'static,
    {
        self.change_sink = Some(Arc::new(sink));
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn rows(&self) -> &[RowData] {
        &self.rows
    }

    pub fn registry(&self) -> &SharedRegistry {
        self.composer.registry()
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn focused(&self) -> Option<CellAddress> {
        self.focused
    }

    pub fn column_index(&self, key: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|column| column.key == key)
            .ok_or_else(|| GridError::UnknownColumn(key.to_string()))
    }

    /// Replace the row data and re-mount. Widgets of surviving rows keep their
    /// interaction state; rows that disappeared are unregistered.
    pub fn set_rows(&mut self, rows: Vec<RowData>) {
        let removed = rows.len()..self.cells.len();
        for row in removed.clone() {
            self.unregister_row(row);
        }
        if self.focused.is_some_and(|focused| removed.contains(&focused.row)) {
            self.focused = None;
        }
        self.cells.truncate(rows.len());

        let mode = self.config.default_mode;
        while self.cells.len() < rows.len() {
            let widgets = self.columns.iter().map(|column| column.build(mode)).collect();
            self.cells.push(widgets);
        }
        self.rows = rows;
        self.mount();
    }

    /// Register every sub-cell with the registry. Safe to repeat: existing
    /// rectangles only get their activation refreshed.
    pub fn mount(&mut self) {
        let mut added = 0;
        for (row, widgets) in self.cells.iter().enumerate() {
            for (column, widget) in widgets.iter().enumerate() {
                let scope = self.composer.scope(row, column);
                for (sub, local) in widget.layouts().iter().enumerate() {
                    let address = CellAddress { row, column, sub };
                    let pending = Arc::clone(&self.pending_focus);
                    let outcome = scope.register(local, move || {
                        if let Ok(mut slot) = pending.lock() {
                            *slot = Some(address);
                        }
                    });
                    if outcome == RegisterOutcome::Added {
                        added += 1;
                    }
                }
            }
        }

        self.with_metrics(|metrics| metrics.record_registrations(added));
        self.log(
            LogLevel::Debug,
            "grid_mounted",
            [
                json_kv("rows", json!(self.rows.len())),
                json_kv("columns", json!(self.columns.len())),
                json_kv("added", json!(added)),
            ],
        );
    }

    fn unregister_row(&self, row: usize) {
        let Some(widgets) = self.cells.get(row) else {
            return;
        };
        for (column, widget) in widgets.iter().enumerate() {
            let scope = self.composer.scope(row, column);
            for local in widget.layouts() {
                scope.unregister(&local);
            }
        }
    }

    fn check(&self, address: CellAddress) -> Result<()> {
        let widgets = self.cells.get(address.row).ok_or(GridError::RowOutOfBounds {
            row: address.row,
            rows: self.cells.len(),
        })?;
        let widget = widgets.get(address.column).ok_or(GridError::ColumnOutOfBounds {
            column: address.column,
            columns: widgets.len(),
        })?;
        let parts = widget.layouts().len();
        if address.sub >= parts {
            return Err(GridError::SubCellOutOfBounds {
                sub: address.sub,
                parts,
            });
        }
        Ok(())
    }

    /// Current value at `(row, key)`. Missing entries read as `Empty`.
    pub fn value(&self, row: usize, key: &str) -> Result<CellValue> {
        self.column_index(key)?;
        let data = self.rows.get(row).ok_or(GridError::RowOutOfBounds {
            row,
            rows: self.rows.len(),
        })?;
        Ok(data.get(key).cloned().unwrap_or_default())
    }

    /// Host-side write. Does not emit a [`GridChange`].
    pub fn set_value(&mut self, row: usize, key: &str, value: CellValue) -> Result<()> {
        self.column_index(key)?;
        apply_change(
            &mut self.rows,
            &GridChange {
                row_index: row,
                column_key: key.to_string(),
                value,
            },
        )
    }

    pub fn display(&self, row: usize, column: usize) -> Result<String> {
        self.check(CellAddress::new(row, column))?;
        let key = self.columns[column].key.as_str();
        Ok(self.cells[row][column].display(&self.value(row, key)?))
    }

    pub fn mode_at(&self, address: CellAddress) -> Result<CellMode> {
        self.check(address)?;
        Ok(self.cells[address.row][address.column].mode(address.sub))
    }

    pub fn is_just_focused(&self, address: CellAddress) -> Result<bool> {
        self.check(address)?;
        Ok(self.cells[address.row][address.column].is_just_focused(address.sub))
    }

    /// Absolute registry rectangle of `address`.
    pub fn layout_of(&self, address: CellAddress) -> Result<CellLayout> {
        self.check(address)?;
        let local = self.cells[address.row][address.column].layouts()[address.sub];
        Ok(self.scope(address).absolute(&local))
    }

    fn scope(&self, address: CellAddress) -> CellScope {
        self.composer.scope(address.row, address.column)
    }

    /// Move input focus to `address`, as a click would.
    pub fn focus(&mut self, address: CellAddress) -> Result<TableOutcome> {
        self.check(address)?;
        let mut changes = Vec::new();
        self.move_focus(address, &mut changes)?;
        Ok(self.outcome(EventFlow::Consumed, changes))
    }

    pub fn dispatch(&mut self, event: GridEvent) -> Result<TableOutcome> {
        self.with_metrics(GridMetrics::record_event);
        let mut changes = Vec::new();

        let flow = match &event {
            GridEvent::Key(key) => self.dispatch_key(key, &mut changes)?,
            GridEvent::Click(address) => {
                let address = *address;
                self.check(address)?;
                if self.focused != Some(address) {
                    self.move_focus(address, &mut changes)?;
                }
                let value = self.value_for(address)?;
                let mut ctx = CellCtx::new();
                let flow = self.widget_mut(address).handle_click(address.sub, &value, &mut ctx);
                self.apply_commands(address, ctx, &mut changes)?;
                flow
            }
            GridEvent::DoubleClick(address) => {
                let address = *address;
                self.check(address)?;
                if self.focused != Some(address) {
                    self.move_focus(address, &mut changes)?;
                }
                let mut ctx = CellCtx::new();
                self.widget_mut(address).handle_double_click(address.sub, &mut ctx);
                self.apply_commands(address, ctx, &mut changes)?;
                EventFlow::Consumed
            }
            GridEvent::FocusLost => {
                if let Some(previous) = self.focused.take() {
                    self.blur(previous, &mut changes)?;
                }
                EventFlow::Continue
            }
        };

        self.log(
            LogLevel::Debug,
            "event_dispatched",
            [
                json_kv("event", json!(event.describe())),
                json_kv("consumed", json!(flow.is_consumed())),
                json_kv("changes", json!(changes.len())),
            ],
        );
        self.maybe_emit_metrics();
        Ok(self.outcome(flow, changes))
    }

    fn outcome(&self, flow: EventFlow, changes: Vec<GridChange>) -> TableOutcome {
        TableOutcome {
            flow,
            changes,
            focus: self.focused,
        }
    }

    fn dispatch_key(&mut self, key: &KeyEvent, changes: &mut Vec<GridChange>) -> Result<EventFlow> {
        let Some(address) = self.focused else {
            return Ok(EventFlow::Continue);
        };
        let value = self.value_for(address)?;
        let mut ctx = CellCtx::new();
        let flow = self
            .widget_mut(address)
            .handle_key(address.sub, &value, key, &mut ctx);
        self.apply_commands(address, ctx, changes)?;
        Ok(flow)
    }

    fn widget_mut(&mut self, address: CellAddress) -> &mut Box<dyn GridCell> {
        &mut self.cells[address.row][address.column]
    }

    fn value_for(&self, address: CellAddress) -> Result<CellValue> {
        let key = self.columns[address.column].key.clone();
        self.value(address.row, &key)
    }

    fn apply_commands(
        &mut self,
        origin: CellAddress,
        ctx: CellCtx,
        changes: &mut Vec<GridChange>,
    ) -> Result<()> {
        for command in ctx.into_commands() {
            match command {
                CellCommand::Commit(value) => self.commit(origin, value, changes)?,
                CellCommand::ModeChanged(mode) => {
                    self.with_metrics(GridMetrics::record_mode_change);
                    self.log(
                        LogLevel::Debug,
                        "mode_changed",
                        [
                            json_kv("address", json!(origin)),
                            json_kv("mode", json!(mode.as_str())),
                        ],
                    );
                }
                CellCommand::Move(direction) => self.navigate(origin, direction, changes)?,
            }
        }
        Ok(())
    }

    fn commit(&mut self, origin: CellAddress, value: CellValue, changes: &mut Vec<GridChange>) -> Result<()> {
        let change = GridChange {
            row_index: origin.row,
            column_key: self.columns[origin.column].key.clone(),
            value,
        };
        apply_change(&mut self.rows, &change)?;
        if let Some(sink) = self.change_sink.as_ref() {
            sink.on_change(&change);
        }
        self.with_metrics(GridMetrics::record_commit);
        self.log(
            LogLevel::Trace,
            "cell_committed",
            [
                json_kv("row", json!(change.row_index)),
                json_kv("column", json!(change.column_key)),
            ],
        );
        changes.push(change);
        Ok(())
    }

    fn navigate(
        &mut self,
        origin: CellAddress,
        direction: MoveDirection,
        changes: &mut Vec<GridChange>,
    ) -> Result<()> {
        let target = self.scope(origin).navigate(direction);
        self.with_metrics(|metrics| metrics.record_move(target.is_some()));
        let requested = self
            .pending_focus
            .lock()
            .map(|mut slot| slot.take())
            .unwrap_or(None);
        match requested {
            Some(address) if target.is_some() => self.move_focus(address, changes),
            _ => Ok(()),
        }
    }

    fn blur(&mut self, address: CellAddress, changes: &mut Vec<GridChange>) -> Result<()> {
        let mut ctx = CellCtx::new();
        self.widget_mut(address).handle_blur(address.sub, &mut ctx);
        self.apply_commands(address, ctx, changes)
    }

    /// Blur the previous widget, focus the next one and report it to the registry.
    fn move_focus(&mut self, address: CellAddress, changes: &mut Vec<GridChange>) -> Result<()> {
        self.check(address)?;
        if let Some(previous) = self.focused.take() {
            self.blur(previous, changes)?;
        }
        self.focused = Some(address);
        self.widget_mut(address).handle_focus(address.sub);

        let local = self.cells[address.row][address.column].layouts()[address.sub];
        let hit = self.scope(address).report_focus(&local);
        self.with_metrics(|metrics| metrics.record_focus_report(hit));
        self.log(
            LogLevel::Debug,
            "focus_changed",
            [json_kv("address", json!(address)), json_kv("registered", json!(hit))],
        );
        Ok(())
    }

    pub fn metrics_snapshot(&self) -> Option<MetricSnapshot> {
        let metrics = self.config.metrics.as_ref()?;
        metrics.lock().ok().map(|guard| guard.snapshot())
    }

    /// Log a metrics snapshot now, regardless of the interval.
    pub fn emit_metrics(&mut self) {
        self.last_metrics_emit = Some(Instant::now());
        if let (Some(logger), Some(snapshot)) = (self.config.logger.as_ref(), self.metrics_snapshot()) {
            let _ = logger.log_event(snapshot.to_log_event(&self.config.metrics_target));
        }
    }

    fn ensure_metrics_initialized(&mut self) {
        if self.config.metrics.is_none() && !self.config.metrics_interval.is_zero() {
            self.config.enable_metrics();
        }
    }

    fn maybe_emit_metrics(&mut self) {
        if self.config.metrics.is_none() || self.config.metrics_interval.is_zero() {
            return;
        }
        let now = Instant::now();
        match self.last_metrics_emit {
            Some(last) if now.duration_since(last) < self.config.metrics_interval => {}
            Some(_) => self.emit_metrics(),
            None => self.last_metrics_emit = Some(now),
        }
    }

    fn with_metrics<F>(&self, record: F)
    where
        F: FnOnce(&mut GridMetrics),
    {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                record(&mut guard);
            }
        }
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        emit(self.config.logger.as_ref(), level, LOG_TARGET, message, fields);
    }
}
