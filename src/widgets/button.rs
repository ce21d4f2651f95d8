use std::fmt;
use std::sync::Arc;

use crossterm::event::KeyEvent;

use crate::cell::{CellKey, CellMachine, CellMode, EventFlow, classify_key};

use super::{CellCtx, CellValue, GridCell};

pub type ClickHandler = Arc<dyn Fn() + Send + Sync>;

/// Action cell. Holds no value; Space, Enter and clicks fire `on_click`.
pub struct ButtonCell {
    machine: CellMachine<CellValue>,
    label: String,
    disabled: bool,
    on_click: ClickHandler,
}

impl ButtonCell {
    pub fn new<F>(label: impl Into<String>, on_click: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            machine: CellMachine::default(),
            label: label.into(),
            disabled: false,
            on_click: Arc::new(on_click),
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    fn click(&mut self) -> EventFlow {
        if !self.disabled {
            self.machine.set_just_focused(false);
            (self.on_click)();
        }
        EventFlow::Consumed
    }
}

impl fmt::Debug for ButtonCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ButtonCell")
            .field("label", &self.label)
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}

impl GridCell for ButtonCell {
    fn kind(&self) -> &'static str {
        "button"
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

    fn handle_click(&mut self, _sub: usize, _value: &CellValue, _ctx: &mut CellCtx) -> EventFlow {
        self.click()
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
            CellKey::Char(' ') | CellKey::Enter { shift: false } => self.click(),
            CellKey::F2 => EventFlow::Consumed,
            key if key.move_direction().is_some() => {
                self.machine
                    .handle_key(value, key, || CellValue::Empty, ctx)
            }
            _ => EventFlow::Continue,
        }
    }

    fn display(&self, _value: &CellValue) -> String {
        self.label.clone()
    }
}
