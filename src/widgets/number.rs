use crossterm::event::KeyEvent;

use crate::cell::{CellKey, CellMachine, CellMode, EventFlow, classify_key};
use crate::navigation::MoveDirection;

use super::{CellCtx, CellValue, GridCell, pop_char};

/// Numeric cell. Input that does not parse becomes `0`; every result is
/// clamped into `[min, max]`.
#[derive(Debug)]
pub struct NumberCell {
    machine: CellMachine<CellValue>,
    min: Option<f64>,
    max: Option<f64>,
    step: f64,
    /// Text as typed, so partial input such as `1.` survives a commit.
    draft: Option<String>,
    /// Draft paired with the value held in the machine's undo slot.
    undo_draft: Option<String>,
}

impl Default for NumberCell {
    fn default() -> Self {
        Self::new(CellMode::Selected)
    }
}

impl NumberCell {
    pub fn new(default_mode: CellMode) -> Self {
        Self {
            machine: CellMachine::new(default_mode),
            min: None,
            max: None,
            step: 1.0,
            draft: None,
            undo_draft: None,
        }
    }

    pub fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn machine(&self) -> &CellMachine<CellValue> {
        &self.machine
    }

    fn clamp(&self, number: f64) -> f64 {
        clamp(number, self.min, self.max)
    }

    pub fn coerce(&self, text: &str) -> CellValue {
        coerce(text, self.min, self.max)
    }

    /// The draft when it still describes `value`, otherwise the value's text.
    fn current_text(&self, value: &CellValue) -> String {
        match &self.draft {
            Some(draft) if self.coerce(draft) == *value => draft.clone(),
            _ => value.to_string(),
        }
    }

    fn commit_text(&mut self, text: String, ctx: &mut CellCtx) -> EventFlow {
        ctx.commit(self.coerce(&text));
        self.draft = Some(text);
        EventFlow::Consumed
    }

    fn step_by(&mut self, value: &CellValue, direction: f64, ctx: &mut CellCtx) -> EventFlow {
        let base = value.as_number().unwrap_or(0.0);
        self.draft = None;
        ctx.commit(CellValue::Number(self.clamp(base + direction * self.step)));
        EventFlow::Consumed
    }
}

impl GridCell for NumberCell {
    fn kind(&self) -> &'static str {
        "number"
    }

    fn mode(&self, _sub: usize) -> CellMode {
        self.machine.mode()
    }

    fn is_just_focused(&self, _sub: usize) -> bool {
        self.machine.is_just_focused()
    }

    fn handle_focus(&mut self, _sub: usize) {
        self.draft = None;
        self.undo_draft = None;
        self.machine.handle_focus();
    }

    fn handle_blur(&mut self, _sub: usize, ctx: &mut CellCtx) {
        self.draft = None;
        self.undo_draft = None;
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
        let editing = self.machine.mode() == CellMode::Editing;
        match key {
            CellKey::Char(ch) => {
                let current = self.current_text(value);
                let replacing = !editing && self.machine.is_just_focused();
                let (min, max) = (self.min, self.max);
                let flow = self.machine.handle_input(
                    value,
                    &current,
                    &ch.to_string(),
                    |text| coerce(text, min, max),
                    ctx,
                );
                let text = if replacing {
                    self.undo_draft = self.draft.take();
                    ch.to_string()
                } else {
                    format!("{current}{ch}")
                };
                self.draft = Some(text);
                flow
            }
            CellKey::Arrow(MoveDirection::Up) if editing => self.step_by(value, 1.0, ctx),
            CellKey::Arrow(MoveDirection::Down) if editing => self.step_by(value, -1.0, ctx),
            CellKey::Backspace => {
                let flow = self.machine.handle_key(value, key, || CellValue::Empty, ctx);
                match flow {
                    EventFlow::Consumed => {
                        self.undo_draft = self.draft.take();
                        flow
                    }
                    EventFlow::Continue => {
                        self.machine.set_just_focused(false);
                        let text = pop_char(&self.current_text(value));
                        self.commit_text(text, ctx)
                    }
                }
            }
            _ => {
                let draft = self.draft.take();
                let flow = self.machine.handle_key(value, key, || CellValue::Empty, ctx);
                match (key, ctx.last_commit()) {
                    (CellKey::Undo, Some(_)) => {
                        self.draft = self.undo_draft.take();
                        self.undo_draft = draft;
                    }
                    (_, Some(_)) => self.undo_draft = draft,
                    (_, None) => self.draft = draft,
                }
                flow
            }
        }
    }
}

fn clamp(number: f64, min: Option<f64>, max: Option<f64>) -> f64 {
    let number = min.map_or(number, |min| number.max(min));
    max.map_or(number, |max| number.min(max))
}

/// Blank text is `Empty`; anything else that fails to parse is `0`.
fn coerce(text: &str, min: Option<f64>, max: Option<f64>) -> CellValue {
    let text = text.trim();
    if text.is_empty() {
        return CellValue::Empty;
    }
    let number = text
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(0.0);
    CellValue::Number(clamp(number, min, max))
}
