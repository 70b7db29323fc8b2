use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use layout_editor_core::{
    Command, CommandExecutor, CursorCommand, EditorStateManager, FacilityLayout, GridPosition,
    GridSize, HistoryCommand, LayoutCommand, MAX_GRID_SIZE, ObjectKind,
};

fn full_grid() -> FacilityLayout {
    FacilityLayout::filled_with_spaces(
        "bench",
        "bench",
        GridSize::new(MAX_GRID_SIZE, MAX_GRID_SIZE),
    )
    .unwrap()
}

fn bench_place_whole_grid(c: &mut Criterion) {
    c.bench_function("place/select_all_30x30", |b| {
        b.iter_batched(
            || {
                let mut executor = CommandExecutor::with_layout(full_grid());
                executor
                    .execute(Command::Cursor(CursorCommand::SelectAll))
                    .unwrap();
                executor
            },
            |mut executor| {
                executor
                    .execute(Command::Layout(LayoutCommand::Place {
                        kind: ObjectKind::Seat,
                    }))
                    .unwrap();
                black_box(executor.layout().objects.len());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_cell_by_cell_with_undo(c: &mut Criterion) {
    c.bench_function("place/100_cells_then_undo_all", |b| {
        b.iter_batched(
            || CommandExecutor::with_layout(full_grid()),
            |mut executor| {
                for i in 0..100u32 {
                    executor
                        .execute(Command::Cursor(CursorCommand::MoveTo {
                            position: GridPosition::new(i % MAX_GRID_SIZE, i / MAX_GRID_SIZE),
                        }))
                        .unwrap();
                    executor
                        .execute(Command::Layout(LayoutCommand::Place {
                            kind: ObjectKind::Seat,
                        }))
                        .unwrap();
                }
                while executor.can_undo() {
                    executor
                        .execute(Command::History(HistoryCommand::Undo))
                        .unwrap();
                }
                black_box(executor.layout().objects.len());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let manager = EditorStateManager::with_layout(full_grid());
    c.bench_function("snapshot/30x30", |b| {
        b.iter(|| {
            let grid = manager.snapshot();
            black_box(grid.rows.len());
        })
    });
}

criterion_group!(
    benches,
    bench_place_whole_grid,
    bench_cell_by_cell_with_undo,
    bench_snapshot
);
criterion_main!(benches);
