use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::widgets::CellValue;

/// One table row keyed by column.
pub type RowData = BTreeMap<String, CellValue>;

/// A committed value, addressed the way the host stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridChange {
    pub row_index: usize,
    pub column_key: String,
    pub value: CellValue,
}

/// Receives every committed change.
pub trait ChangeSink: Send + Sync {
    fn on_change(&self, change: &GridChange);
}

impl<F> ChangeSink for F
where
    F: Fn(&GridChange) + Send + Sync,
{
    fn on_change(&self, change: &GridChange) {
        self(change)
    }
}

/// Write `change` into `rows`.
pub fn apply_change(rows: &mut [RowData], change: &GridChange) -> Result<()> {
    let count = rows.len();
    let row = rows
        .get_mut(change.row_index)
        .ok_or(GridError::RowOutOfBounds {
            row: change.row_index,
            rows: count,
        })?;
    row.insert(change.column_key.clone(), change.value.clone());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn applies_into_existing_row() {
        let mut rows = vec![RowData::new(), RowData::new()];
        let change = GridChange {
            row_index: 1,
            column_key: "name".into(),
            value: CellValue::text("Jane"),
        };
        apply_change(&mut rows, &change).unwrap();
        assert_eq!(rows[1].get("name"), Some(&CellValue::text("Jane")));
        assert!(rows[0].is_empty());
    }

    #[test]
    fn rejects_missing_row() {
        let mut rows = vec![RowData::new()];
        let change = GridChange {
            row_index: 4,
            column_key: "name".into(),
            value: CellValue::Empty,
        };
        assert!(matches!(
            apply_change(&mut rows, &change),
            Err(GridError::RowOutOfBounds { row: 4, rows: 1 })
        ));
    }

    #[test]
    fn closures_are_sinks() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = {
            let seen = Arc::clone(&seen);
            move |change: &GridChange| seen.lock().unwrap().push(change.column_key.clone())
        };
        sink.on_change(&GridChange {
            row_index: 0,
            column_key: "age".into(),
            value: CellValue::Number(3.0),
        });
        assert_eq!(*seen.lock().unwrap(), vec!["age".to_string()]);
    }
}
