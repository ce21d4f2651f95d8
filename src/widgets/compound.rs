use std::collections::BTreeMap;

use crossterm::event::KeyEvent;

use crate::cell::{CellCommand, CellContext, CellMode, EventFlow};
use crate::error::{GridError, Result};
use crate::geometry::CellLayout;

use super::{CellCtx, CellValue, GridCell};

/// One named, independently focusable part of a [`CompoundCell`].
pub struct CompoundPart {
    key: String,
    layout: CellLayout,
    cell: Box<dyn GridCell>,
}

impl CompoundPart {
    /// `layout` is local to the parent's unit square.
    pub fn new(key: impl Into<String>, layout: CellLayout, cell: impl GridCell + 'static) -> Result<Self> {
        layout.validate()?;
        if layout.top_row < 0.0
            || layout.left_column < 0.0
            || layout.bottom_row > 1.0
            || layout.right_column > 1.0
        {
            return Err(GridError::InvalidLayout(format!(
                "compound part must lie inside the unit square: {layout:?}"
            )));
        }
        Ok(Self {
            key: key.into(),
            layout,
            cell: Box::new(cell),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn layout(&self) -> &CellLayout {
        &self.layout
    }
}

/// A cell split into sub-cells over a `Record` value, one record field per
/// part. Each part keeps its own interaction state.
pub struct CompoundCell {
    parts: Vec<CompoundPart>,
}

impl CompoundCell {
    pub fn new(parts: Vec<CompoundPart>) -> Result<Self> {
        if parts.is_empty() {
            return Err(GridError::InvalidSplit { count: 0 });
        }
        Ok(Self { parts })
    }

    pub fn parts(&self) -> &[CompoundPart] {
        &self.parts
    }

    fn part_value(&self, sub: usize, value: &CellValue) -> CellValue {
        self.parts
            .get(sub)
            .and_then(|part| value.field(&part.key))
            .cloned()
            .unwrap_or_default()
    }

    /// Lift a part's commands into whole-record commands.
    fn lift(&self, sub: usize, value: &CellValue, inner: CellContext<CellValue>, ctx: &mut CellCtx) {
        let Some(part) = self.parts.get(sub) else {
            return;
        };
        let mut record: BTreeMap<String, CellValue> = value.as_record().cloned().unwrap_or_default();
        for command in inner.into_commands() {
            match command {
                CellCommand::Commit(field) => {
                    record.insert(part.key.clone(), field);
                    ctx.commit(CellValue::Record(record.clone()));
                }
                CellCommand::Move(direction) => ctx.request_move(direction),
                CellCommand::ModeChanged(mode) => ctx.mode_changed(mode),
            }
        }
    }
}

impl GridCell for CompoundCell {
    fn kind(&self) -> &'static str {
        "compound"
    }

    fn layouts(&self) -> Vec<CellLayout> {
        self.parts.iter().map(|part| part.layout).collect()
    }

    fn mode(&self, sub: usize) -> CellMode {
        self.parts
            .get(sub)
            .map(|part| part.cell.mode(0))
            .unwrap_or_default()
    }

    fn is_just_focused(&self, sub: usize) -> bool {
        self.parts
            .get(sub)
            .is_some_and(|part| part.cell.is_just_focused(0))
    }

    fn handle_focus(&mut self, sub: usize) {
        if let Some(part) = self.parts.get_mut(sub) {
            part.cell.handle_focus(0);
        }
    }

    fn handle_blur(&mut self, sub: usize, ctx: &mut CellCtx) {
        if let Some(part) = self.parts.get_mut(sub) {
            part.cell.handle_blur(0, ctx);
        }
    }

    fn handle_click(&mut self, sub: usize, value: &CellValue, ctx: &mut CellCtx) -> EventFlow {
        let inner_value = self.part_value(sub, value);
        let mut inner = CellContext::new();
        let flow = match self.parts.get_mut(sub) {
            Some(part) => part.cell.handle_click(0, &inner_value, &mut inner),
            None => return EventFlow::Continue,
        };
        self.lift(sub, value, inner, ctx);
        flow
    }

    fn handle_double_click(&mut self, sub: usize, ctx: &mut CellCtx) {
        if let Some(part) = self.parts.get_mut(sub) {
            part.cell.handle_double_click(0, ctx);
        }
    }

    fn handle_key(
        &mut self,
        sub: usize,
        value: &CellValue,
        key: &KeyEvent,
        ctx: &mut CellCtx,
    ) -> EventFlow {
        let inner_value = self.part_value(sub, value);
        let mut inner = CellContext::new();
        let flow = match self.parts.get_mut(sub) {
            Some(part) => part.cell.handle_key(0, &inner_value, key, &mut inner),
            None => return EventFlow::Continue,
        };
        self.lift(sub, value, inner, ctx);
        flow
    }

    fn display(&self, value: &CellValue) -> String {
        self.parts
            .iter()
            .map(|part| part.cell.display(&value.field(&part.key).cloned().unwrap_or_default()))
            .collect::<Vec<_>>()
            .join(" / ")
    }
}
