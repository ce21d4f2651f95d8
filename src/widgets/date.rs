use chrono::NaiveDate;
use crossterm::event::KeyEvent;

use crate::cell::{CellKey, CellMachine, CellMode, EventFlow, classify_key};

use super::{CellCtx, CellValue, GridCell, pop_char};

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Date cell backed by `chrono::NaiveDate`.
///
/// Typing only takes effect while editing; every keystroke re-parses the
/// draft and commits the date, or `Empty` while the text is not yet a date.
#[derive(Debug)]
pub struct DateCell {
    machine: CellMachine<CellValue>,
    format: String,
    min: Option<NaiveDate>,
    max: Option<NaiveDate>,
    draft: Option<String>,
}

impl Default for DateCell {
    fn default() -> Self {
        Self::new(CellMode::Selected)
    }
}

impl DateCell {
    pub fn new(default_mode: CellMode) -> Self {
        Self {
            machine: CellMachine::new(default_mode),
            format: DEFAULT_DATE_FORMAT.to_string(),
            min: None,
            max: None,
            draft: None,
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_range(mut self, min: Option<NaiveDate>, max: Option<NaiveDate>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn parse(&self, text: &str) -> CellValue {
        match NaiveDate::parse_from_str(text.trim(), &self.format) {
            Ok(date) => {
                let date = self.min.map_or(date, |min| date.max(min));
                CellValue::Date(self.max.map_or(date, |max| date.min(max)))
            }
            Err(_) => CellValue::Empty,
        }
    }

    fn format_value(&self, value: &CellValue) -> String {
        match value {
            CellValue::Date(date) => date.format(&self.format).to_string(),
            other => other.to_string(),
        }
    }

    fn current_text(&self, value: &CellValue) -> String {
        match &self.draft {
            Some(draft) if self.parse(draft) == *value => draft.clone(),
            _ => self.format_value(value),
        }
    }

    fn commit_text(&mut self, text: String, ctx: &mut CellCtx) -> EventFlow {
        ctx.commit(self.parse(&text));
        self.draft = Some(text);
        EventFlow::Consumed
    }
}

impl GridCell for DateCell {
    fn kind(&self) -> &'static str {
        "date"
    }

    fn mode(&self, _sub: usize) -> CellMode {
        self.machine.mode()
    }

    fn is_just_focused(&self, _sub: usize) -> bool {
        self.machine.is_just_focused()
    }

    fn handle_focus(&mut self, _sub: usize) {
        self.draft = None;
        self.machine.handle_focus();
    }

    fn handle_blur(&mut self, _sub: usize, ctx: &mut CellCtx) {
        self.draft = None;
        self.machine.handle_blur(ctx);
    }

    fn handle_double_click(&mut self, _sub: usize, ctx: &mut CellCtx) {
        self.machine.handle_double_click(ctx);
    }

    fn handle_key(
        &mut self,
        _sub: usize,
        value: &CellValue,
        key: &KeyEvent,
        ctx: &mut CellCtx,
    ) -> EventFlow {
        let key = classify_key(key);
        match (self.machine.mode(), key) {
            // the picker has no free typing until it is opened
            (CellMode::Selected, CellKey::Char(_)) => EventFlow::Consumed,
            (CellMode::Editing, CellKey::Char(ch)) => {
                let text = format!("{}{ch}", self.current_text(value));
                self.commit_text(text, ctx)
            }
            (CellMode::Editing, CellKey::Backspace) => {
                let text = pop_char(&self.current_text(value));
                self.commit_text(text, ctx)
            }
            _ => {
                let flow = self.machine.handle_key(value, key, || CellValue::Empty, ctx);
                if ctx.last_commit().is_some() {
                    self.draft = None;
                }
                flow
            }
        }
    }

    fn display(&self, value: &CellValue) -> String {
        self.format_value(value)
    }
}
