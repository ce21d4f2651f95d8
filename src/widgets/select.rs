use crossterm::event::KeyEvent;

use crate::cell::{CellKey, CellMachine, CellMode, EventFlow, classify_key};
use crate::navigation::MoveDirection;

use super::{CellCtx, CellValue, GridCell};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Drop-down cell over a fixed option list. The committed value is the
/// option's `value` as text.
#[derive(Debug)]
pub struct SelectCell {
    machine: CellMachine<CellValue>,
    options: Vec<SelectOption>,
    placeholder: Option<String>,
}

impl SelectCell {
    pub fn new(default_mode: CellMode, options: Vec<SelectOption>) -> Self {
        Self {
            machine: CellMachine::new(default_mode),
            options,
            placeholder: None,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    fn selected_index(&self, value: &CellValue) -> Option<usize> {
        let value = value.as_text()?;
        self.options.iter().position(|option| option.value == value)
    }

    fn step(&mut self, value: &CellValue, forward: bool, ctx: &mut CellCtx) -> EventFlow {
        if self.options.is_empty() {
            return EventFlow::Consumed;
        }
        let last = self.options.len() - 1;
        let next = match (self.selected_index(value), forward) {
            (None, true) => 0,
            (None, false) => last,
            (Some(idx), true) => (idx + 1).min(last),
            (Some(idx), false) => idx.saturating_sub(1),
        };
        if self.selected_index(value) != Some(next) {
            ctx.commit(CellValue::text(self.options[next].value.clone()));
        }
        EventFlow::Consumed
    }
}

impl GridCell for SelectCell {
    fn kind(&self) -> &'static str {
        "select"
    }

    fn mode(&self, _sub: usize) -> CellMode {
        self.machine.mode()
    }

    fn is_just_focused(&self, _sub: usize) -> bool {
        self.machine.is_just_focused()
    }

    fn handle_focus(&mut self, _sub: usize) {
        self.machine.handle_focus();
    }

    fn handle_blur(&mut self, _sub: usize, ctx: &mut CellCtx) {
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
            (CellMode::Selected, CellKey::Char(' ') | CellKey::Enter { .. }) => {
                self.machine.start_editing(ctx);
                EventFlow::Consumed
            }
            (CellMode::Selected, CellKey::Char(_)) => EventFlow::Continue,
            (CellMode::Editing, CellKey::Arrow(MoveDirection::Down)) => self.step(value, true, ctx),
            (CellMode::Editing, CellKey::Arrow(MoveDirection::Up)) => self.step(value, false, ctx),
            _ => self
                .machine
                .handle_key(value, key, || CellValue::Empty, ctx),
        }
    }

    fn display(&self, value: &CellValue) -> String {
        match self.selected_index(value) {
            Some(idx) => self.options[idx].label.clone(),
            None => self.placeholder.clone().unwrap_or_default(),
        }
    }
}
