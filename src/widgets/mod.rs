//! Concrete cell widgets built on the shared [`CellMachine`](crate::cell::CellMachine).

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use crossterm::event::KeyEvent;
use serde::{Deserialize, Serialize};

use crate::cell::{CellContext, CellMode, EventFlow};
use crate::geometry::CellLayout;

mod button;
mod checkbox;
mod compound;
mod date;
mod number;
mod select;
mod text;

pub use button::ButtonCell;
pub use checkbox::CheckboxCell;
pub use compound::{CompoundCell, CompoundPart};
pub use date::DateCell;
pub use number::NumberCell;
pub use select::{SelectCell, SelectOption};
pub use text::TextCell;

/// Value held by one table cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
    Record(BTreeMap<String, CellValue>),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn record<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, CellValue)>,
    {
        CellValue::Record(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(date) => Some(*date),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&BTreeMap<String, CellValue>> {
        match self {
            CellValue::Record(fields) => Some(fields),
            _ => None,
        }
    }

    /// Field of a record value, `None` for anything else.
    pub fn field(&self, key: &str) -> Option<&CellValue> {
        self.as_record().and_then(|fields| fields.get(key))
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(text) => f.write_str(text),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            CellValue::Record(fields) => {
                for (idx, value) in fields.values().enumerate() {
                    if idx > 0 {
                        f.write_str(" / ")?;
                    }
                    write!(f, "{value}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::Date(value)
    }
}

pub type CellCtx = CellContext<CellValue>;

/// Capability every table cell widget provides.
///
/// A widget may expose several focusable sub-cells; `sub` indexes into
/// [`layouts`](Self::layouts). Widgets never store their value: the host
/// passes the current value in and receives commits through the context.
pub trait GridCell: Send {
    fn kind(&self) -> &'static str;

    /// Local sub-cell rectangles inside the unit square.
    fn layouts(&self) -> Vec<CellLayout> {
        vec![CellLayout::STANDARD]
    }

    fn mode(&self, sub: usize) -> CellMode;

    fn is_just_focused(&self, sub: usize) -> bool;

    fn handle_focus(&mut self, sub: usize);

    fn handle_blur(&mut self, sub: usize, ctx: &mut CellCtx);

    fn handle_click(&mut self, _sub: usize, _value: &CellValue, _ctx: &mut CellCtx) -> EventFlow {
        EventFlow::Continue
    }

    fn handle_double_click(&mut self, sub: usize, ctx: &mut CellCtx);

    fn handle_key(
        &mut self,
        sub: usize,
        value: &CellValue,
        key: &KeyEvent,
        ctx: &mut CellCtx,
    ) -> EventFlow;

    fn display(&self, value: &CellValue) -> String {
        value.to_string()
    }
}

/// Drop the last character of `text`.
pub(crate) fn pop_char(text: &str) -> String {
    let mut text = text.to_string();
    text.pop();
    text
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_each_variant() {
        assert_eq!(CellValue::Empty.to_string(), "");
        assert_eq!(CellValue::Number(42.0).to_string(), "42");
        assert_eq!(CellValue::Number(107.5).to_string(), "107.5");
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(CellValue::Date(date).to_string(), "2024-03-09");
        let bp = CellValue::record([
            ("diastolic", CellValue::Number(80.0)),
            ("systolic", CellValue::Number(120.0)),
        ]);
        assert_eq!(bp.to_string(), "80 / 120");
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(CellValue::text("hi")).unwrap();
        assert_eq!(json, serde_json::json!({"type": "text", "value": "hi"}));
        let back: CellValue = serde_json::from_value(json).unwrap();
        assert_eq!(back, CellValue::text("hi"));
    }

    #[test]
    fn record_field_lookup() {
        let bp = CellValue::record([("systolic", CellValue::Number(120.0))]);
        assert_eq!(bp.field("systolic"), Some(&CellValue::Number(120.0)));
        assert!(bp.field("average").is_none());
        assert!(CellValue::Number(1.0).field("systolic").is_none());
    }
}
