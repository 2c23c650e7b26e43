//! Benchmarks for the editor reducer and its history.

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use docblocks::block::{BlockKind, default_content};
use docblocks::editor::{EditorState, Message, update};

fn filled(count: usize) -> EditorState {
    (0..count).fold(EditorState::new(), |state, _| {
        update(
            state,
            Message::AddComponent {
                content: default_content(BlockKind::Paragraph, None),
                index: None,
            },
        )
    })
}

fn bench_add_blocks(c: &mut Criterion) {
    c.bench_function("add_100_blocks", |b| b.iter(|| filled(black_box(100))));
}

fn bench_reorder_reverse(c: &mut Criterion) {
    let state = filled(200);
    let mut reversed = state.ids();
    reversed.reverse();
    c.bench_function("reorder_reverse_200", |b| {
        b.iter_batched(
            || state.clone(),
            |state| update(state, Message::ReorderComponents(reversed.clone())),
            BatchSize::SmallInput,
        )
    });
}

fn bench_undo_redo(c: &mut Criterion) {
    let state = filled(100);
    c.bench_function("undo_redo_all", |b| {
        b.iter_batched(
            || state.clone(),
            |mut state| {
                while state.history().can_undo() {
                    state = update(state, Message::Undo);
                }
                while state.history().can_redo() {
                    state = update(state, Message::Redo);
                }
                state
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_add_blocks,
    bench_reorder_reverse,
    bench_undo_redo
);
criterion_main!(benches);
