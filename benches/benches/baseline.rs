use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use st_core::{BlockId, BlockList, ContentType, HeaderEditor, HeaderElement, History, Key, KeyInput, UndoRedo};
use st_engine::{GridConfig, GridEngine, HeightCache, SharedMeasurer, SimpleMeasurer};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::WARN)
        .try_init();
}

fn build_board(blocks: usize) -> BlockList {
    let mut list = BlockList::sequential();
    let mut last = BlockId::from("rect1");
    for i in 0..blocks {
        list.set_text(&last, format!("{} {}", i, "note text for row sizing ".repeat(6)));
        last = list.on_enter_key(&last).unwrap();
    }
    list
}

fn history_push_dedup(c: &mut Criterion) {
    init_tracing();
    c.bench_function("history_push_dedup", |b| {
        b.iter(|| {
            let mut history = History::new(0u32);
            for i in 0..1000u32 {
                history.push(i / 2);
            }
            history.past().len()
        })
    });
}

fn header_undo_100_ops(c: &mut Criterion) {
    c.bench_function("header_undo_100_ops", |b| {
        b.iter_batched(
            || {
                let mut editor = HeaderEditor::default();
                for _ in 0..100 {
                    editor.toggle_element(HeaderElement::Social);
                }
                editor
            },
            |mut editor| {
                while UndoRedo::undo(&mut editor) {}
            },
            BatchSize::SmallInput,
        )
    });
}

fn enter_backspace_cycle(c: &mut Criterion) {
    c.bench_function("enter_backspace_cycle_500", |b| {
        b.iter_batched(
            || build_board(500),
            |mut list| {
                let anchor = BlockId::from("rect250");
                for _ in 0..100 {
                    if let Some(id) = list.on_enter_key(&anchor) {
                        list.handle_key(&id, KeyInput::plain(Key::Backspace));
                    }
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn relayout_cold(c: &mut Criterion) {
    let engine = GridEngine::with_measurer(SharedMeasurer::new(SimpleMeasurer));
    let config = GridConfig::default();
    c.bench_function("relayout_cold_1000", |b| {
        b.iter_batched(
            || build_board(1000),
            |mut list| {
                let mut cache = HeightCache::new();
                engine.relayout(&mut list, &config, &mut cache)
            },
            BatchSize::SmallInput,
        )
    });
}

fn relayout_one_changed(c: &mut Criterion) {
    let engine = GridEngine::with_measurer(SharedMeasurer::new(SimpleMeasurer));
    let config = GridConfig::default();
    let mut list = build_board(1000);
    let mut cache = HeightCache::new();
    engine.relayout(&mut list, &config, &mut cache);
    let target = BlockId::from("rect500");
    let mut flip = false;
    c.bench_function("relayout_1000_one_changed", |b| {
        b.iter(|| {
            flip = !flip;
            let ty = if flip { ContentType::Heading1 } else { ContentType::Paragraph };
            list.set_content_type(&target, ty);
            engine.relayout(&mut list, &config, &mut cache)
        })
    });
}

criterion_group!(
    benches,
    history_push_dedup,
    header_undo_100_ops,
    enter_backspace_cycle,
    relayout_cold,
    relayout_one_changed
);
criterion_main!(benches);
