use std::hint::black_box;
use std::time::Duration;

use cellgrid::logging::{LogEvent, LogSink};
use cellgrid::{
    CellAddress, CellLayout, ColumnDef, CompoundCell, CompoundPart, EPSILON, FocusRegistry,
    GridConfig, GridEvent, GridTable, Logger, LoggingResult, MoveDirection, NumberCell, Result,
    RegisteredCell, RowData, SplitDirection, TextCell, move_from, split,
};
use criterion::{Criterion, criterion_group, criterion_main};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Default)]
struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _event: &LogEvent) -> LoggingResult<()> {
        Ok(())
    }
}

const ROWS: usize = 200;
const COLUMNS: usize = 20;

/// Every third column is split into vertical thirds.
fn irregular_layouts() -> Vec<CellLayout> {
    let thirds = split(SplitDirection::Vertical, 3).expect("thirds");
    let mut cells = Vec::with_capacity(ROWS * COLUMNS * 2);
    for row in 0..ROWS {
        for column in 0..COLUMNS {
            if column % 3 == 0 {
                cells.extend(thirds.iter().map(|part| part.offset(row, column)));
            } else {
                cells.push(CellLayout::unit(row, column));
            }
        }
    }
    cells
}

fn move_from_slice(c: &mut Criterion) {
    let cells = irregular_layouts();
    let start = CellLayout::unit(ROWS / 2, 1);
    c.bench_function("move_from_slice", |b| {
        b.iter(|| {
            for direction in MoveDirection::ALL {
                black_box(move_from(&cells, black_box(&start), direction, EPSILON));
            }
        });
    });
}

fn registry_walk(c: &mut Criterion) {
    let registry = FocusRegistry::new();
    for layout in irregular_layouts() {
        registry.register(RegisteredCell::new(layout, || {}));
    }
    c.bench_function("registry_walk", |b| {
        b.iter(|| {
            registry.focus(&CellLayout::unit(0, 1));
            for _ in 0..10 {
                black_box(registry.navigate(MoveDirection::Down));
                black_box(registry.navigate(MoveDirection::Right));
            }
        });
    });
}

fn table_script(c: &mut Criterion) {
    let script = scripted_events();
    c.bench_function("table_script", |b| {
        b.iter(|| {
            let mut table = build_table().expect("table");
            table.focus(CellAddress::new(0, 0)).expect("focus");
            for event in black_box(script.clone()) {
                table.dispatch(event).expect("dispatch");
            }
        });
    });
}

fn build_table() -> Result<GridTable> {
    let mut config = GridConfig::default().with_logger(Logger::new(NullSink::default()));
    config.metrics_interval = Duration::from_millis(0);
    config.enable_metrics();

    let columns = vec![
        ColumnDef::new("name", "Name", TextCell::new),
        ColumnDef::new("age", "Age", NumberCell::new),
        ColumnDef::new("bloodPressure", "Blood pressure", |mode| {
            blood_pressure(mode).expect("blood pressure layout")
        }),
    ];
    let mut table = GridTable::new(columns, config);
    table.set_rows(vec![RowData::new(); 50]);
    Ok(table)
}

fn blood_pressure(mode: cellgrid::CellMode) -> Result<CompoundCell> {
    let halves = split(SplitDirection::Vertical, 2)?;
    let left = |l: CellLayout| CellLayout::new(l.top_row, 0.0, l.bottom_row, 0.5);
    CompoundCell::new(vec![
        CompoundPart::new("systolic", left(halves[0]), NumberCell::new(mode))?,
        CompoundPart::new("diastolic", left(halves[1]), NumberCell::new(mode))?,
        CompoundPart::new(
            "average",
            CellLayout::new(0.0, 0.5, 1.0, 1.0),
            NumberCell::new(mode),
        )?,
    ])
}

fn scripted_events() -> Vec<GridEvent> {
    let key = |code| GridEvent::Key(KeyEvent::new(code, KeyModifiers::NONE));
    let mut events = Vec::with_capacity(200);
    for _ in 0..20 {
        events.push(key(KeyCode::Char('4')));
        events.push(key(KeyCode::Char('2')));
        events.push(key(KeyCode::Right));
        events.push(key(KeyCode::Right));
        events.push(key(KeyCode::Down));
        events.push(key(KeyCode::Right));
        events.push(key(KeyCode::Left));
        events.push(key(KeyCode::Left));
        events.push(key(KeyCode::Left));
        events.push(key(KeyCode::Enter));
    }
    events
}

criterion_group!(benches, move_from_slice, registry_walk, table_script);
criterion_main!(benches);
