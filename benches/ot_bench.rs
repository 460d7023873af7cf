use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use synckit_ot::{compose, transform, Document, OperationSequence, Server};

/// Text of `lines` lines, 60 characters each
fn sample_text(lines: usize) -> String {
    vec!["a".repeat(60); lines].join("\n")
}

/// Edit touching every tenth line: one delete and one insert each
fn scattered_edit(size: usize) -> OperationSequence {
    let mut ops = OperationSequence::new();
    let mut covered = 0;
    while covered + 610 <= size {
        ops = ops.retain(600).delete(10).insert("edited");
        covered += 610;
    }
    ops.retain(size - covered)
}

/// Benchmark applying scattered edits to documents of growing size
fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("document_apply");

    for lines in [100, 1000, 10000].iter() {
        let doc = Document::from(sample_text(*lines));
        let ops = scattered_edit(doc.size());

        group.bench_with_input(BenchmarkId::from_parameter(lines), &ops, |b, ops| {
            b.iter_batched(
                || doc.clone(),
                |mut doc| {
                    doc.apply(black_box(ops)).unwrap();
                    doc
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

/// Benchmark transforming two concurrent scattered edits
fn bench_transform(c: &mut Criterion) {
    let size = Document::from(sample_text(1000)).size();
    let a = scattered_edit(size);
    let b = OperationSequence::new().insert("header\n").retain(size);

    c.bench_function("transform_1000_lines", |bench| {
        bench.iter(|| black_box(transform(&a, &b).unwrap()));
    });
}

/// Benchmark composing a chain of single keystrokes (simulates typing)
fn bench_compose_typing(c: &mut Criterion) {
    let mut group = c.benchmark_group("compose_typing");

    for keystrokes in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(keystrokes), keystrokes, |b, &keystrokes| {
            b.iter(|| {
                let mut acc = OperationSequence::new().retain(100);
                for i in 0..keystrokes {
                    let key = OperationSequence::new().retain(100 + i).insert("k");
                    acc = compose(&acc, &key).unwrap();
                }
                black_box(acc)
            });
        });
    }

    group.finish();
}

/// Benchmark a server receiving ops based on an old revision
fn bench_server_stale_receive(c: &mut Criterion) {
    let text = sample_text(100);

    c.bench_function("server_receive_50_behind", |b| {
        b.iter_batched(
            || {
                let mut server = Server::new(Document::from(text.as_str()));
                for i in 0..50 {
                    let size = server.document().size();
                    let ops = OperationSequence::new().retain(i).insert("x").retain(size - i);
                    server.receive(server.revision(), ops).unwrap();
                }
                server
            },
            |mut server| {
                let size = text.chars().count();
                let ops = OperationSequence::new().retain(size).insert("!");
                black_box(server.receive(0, ops).unwrap());
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_apply,
    bench_transform,
    bench_compose_typing,
    bench_server_stale_receive
);
criterion_main!(benches);
