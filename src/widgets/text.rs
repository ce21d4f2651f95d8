use crossterm::event::KeyEvent;

use crate::cell::{CellKey, CellMachine, CellMode, EventFlow, classify_key};

use super::{CellCtx, CellValue, GridCell, pop_char};

/// Free-text cell.
#[derive(Debug, Default)]
pub struct TextCell {
    machine: CellMachine<CellValue>,
    placeholder: Option<String>,
}

impl TextCell {
    pub fn new(default_mode: CellMode) -> Self {
        Self {
            machine: CellMachine::new(default_mode),
            placeholder: None,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn machine(&self) -> &CellMachine<CellValue> {
        &self.machine
    }

    fn backspace(&mut self, value: &CellValue, ctx: &mut CellCtx) -> EventFlow {
        self.machine.set_just_focused(false);
        ctx.commit(CellValue::Text(pop_char(&value.to_string())));
        EventFlow::Consumed
    }
}

impl GridCell for TextCell {
    fn kind(&self) -> &'static str {
        "text"
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
        match key {
            CellKey::Char(ch) => {
                let current = value.to_string();
                self.machine
                    .handle_input(value, &current, &ch.to_string(), |text| CellValue::text(text), ctx)
            }
            CellKey::Backspace => {
                let flow = self
                    .machine
                    .handle_key(value, key, || CellValue::text(""), ctx);
                match flow {
                    EventFlow::Consumed => flow,
                    EventFlow::Continue => self.backspace(value, ctx),
                }
            }
            _ => self
                .machine
                .handle_key(value, key, || CellValue::text(""), ctx),
        }
    }

    fn display(&self, value: &CellValue) -> String {
        match (value, &self.placeholder) {
            (CellValue::Empty, Some(placeholder)) => placeholder.clone(),
            (CellValue::Text(text), Some(placeholder)) if text.is_empty() => placeholder.clone(),
            _ => value.to_string(),
        }
    }
}
