//! Benchmarks for the grid differencing pass.
//!
//! Models the renderer's steady state: a full screen of content where a
//! frame changes nothing, one line, or everything. Sizes chosen to
//! match real usage:
//!
//! - **80x24**: Classic terminal (ssh, tmux panes).
//! - **120x50**: Modern half-screen split.
//! - **240x80**: Full-screen 4K terminal.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use termsurf::{Cell, CellSource, GridDiffer, SelectionModel, ViewState};

const SIZES: [(usize, usize); 3] = [
    (80, 24),   // Classic VT100.
    (120, 50),  // Modern split pane.
    (240, 80),  // Full-screen 4K.
];

/// Minimal in-memory screen for driving the differ.
struct BenchGrid {
    rows: Vec<Vec<Cell>>,
}

impl BenchGrid {
    /// Mostly-ASCII content, the common log/compiler-output workload.
    fn filled(width: usize, height: usize) -> Self {
        let rows = (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| Cell::glyph((b'a' + ((x + y) % 26) as u8) as char))
                    .collect()
            })
            .collect();
        Self { rows }
    }

    fn rewrite_row(&mut self, y: usize) {
        for cell in &mut self.rows[y] {
            cell.ch = if cell.ch == 'x' { 'y' } else { 'x' };
        }
    }

    fn rewrite_all(&mut self) {
        for y in 0..self.rows.len() {
            self.rewrite_row(y);
        }
    }
}

impl CellSource for BenchGrid {
    fn row(&self, index: i32) -> Option<&[Cell]> {
        if index < 0 {
            return None;
        }
        self.rows.get(index as usize).map(Vec::as_slice)
    }
}

fn view(width: usize, height: usize) -> ViewState {
    ViewState {
        width,
        height,
        ..ViewState::default()
    }
}

fn bench_unchanged_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff_unchanged");
    for (width, height) in SIZES {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{width}x{height}")),
            &(width, height),
            |b, &(width, height)| {
                let grid = BenchGrid::filled(width, height);
                let mut differ = GridDiffer::new(width, height);
                let selection = SelectionModel::new();
                let v = view(width, height);
                differ.apply(&grid, &v, &selection);
                b.iter(|| black_box(differ.apply(&grid, &v, &selection)));
            },
        );
    }
    group.finish();
}

fn bench_one_line_changed(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff_one_line");
    for (width, height) in SIZES {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{width}x{height}")),
            &(width, height),
            |b, &(width, height)| {
                let mut grid = BenchGrid::filled(width, height);
                let mut differ = GridDiffer::new(width, height);
                let selection = SelectionModel::new();
                let v = view(width, height);
                differ.apply(&grid, &v, &selection);
                b.iter(|| {
                    grid.rewrite_row(height / 2);
                    black_box(differ.apply(&grid, &v, &selection));
                });
            },
        );
    }
    group.finish();
}

fn bench_full_redraw(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff_full_redraw");
    for (width, height) in SIZES {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{width}x{height}")),
            &(width, height),
            |b, &(width, height)| {
                let mut grid = BenchGrid::filled(width, height);
                let mut differ = GridDiffer::new(width, height);
                let selection = SelectionModel::new();
                let v = view(width, height);
                differ.apply(&grid, &v, &selection);
                b.iter(|| {
                    grid.rewrite_all();
                    black_box(differ.apply(&grid, &v, &selection));
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_unchanged_frame,
    bench_one_line_changed,
    bench_full_redraw
);
criterion_main!(benches);
