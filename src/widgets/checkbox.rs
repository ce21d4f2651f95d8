use crossterm::event::KeyEvent;

use crate::cell::{CellKey, CellMachine, CellMode, EventFlow, classify_key};

use super::{CellCtx, CellValue, GridCell};

/// Boolean cell. Space and clicks toggle; there is no editing mode.
#[derive(Debug, Default)]
pub struct CheckboxCell {
    machine: CellMachine<CellValue>,
    label: Option<String>,
    disabled: bool,
}

impl CheckboxCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    fn toggle(&mut self, value: &CellValue, ctx: &mut CellCtx) -> EventFlow {
        if !self.disabled {
            self.machine.set_just_focused(false);
            ctx.commit(CellValue::Bool(!value.as_bool().unwrap_or(false)));
        }
        EventFlow::Consumed
    }
}

impl GridCell for CheckboxCell {
    fn kind(&self) -> &'static str {
        "checkbox"
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

    fn handle_click(&mut self, _sub: usize, value: &CellValue, ctx: &mut CellCtx) -> EventFlow {
        self.toggle(value, ctx)
    }

    fn handle_double_click(&mut self, _sub: usize, _ctx: &mut CellCtx) {}

    fn handle_key(
        &mut self,
        _sub: usize,
        value: &CellValue,
        key: &KeyEvent,
        ctx: &mut CellCtx,
    ) -> EventFlow {
        match classify_key(key) {
            CellKey::Char(' ') => self.toggle(value, ctx),
            CellKey::F2 => EventFlow::Consumed,
            key if self.disabled && key.move_direction().is_none() => EventFlow::Consumed,
            key => self
                .machine
                .handle_key(value, key, || CellValue::Bool(false), ctx),
        }
    }

    fn display(&self, value: &CellValue) -> String {
        let mark = if value.as_bool().unwrap_or(false) {
            "[x]"
        } else {
            "[ ]"
        };
        match &self.label {
            Some(label) => format!("{mark} {label}"),
            None => mark.to_string(),
        }
    }
}
