use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sensplot_core::{BufferMode, ChannelBuffer, Reading, TelemetryBuffers};

fn bench_push(c: &mut Criterion) {
    let mut buffer = ChannelBuffer::new(100, BufferMode::SteadyWindow);
    c.bench_function("channel_buffer_push", |b| {
        b.iter(|| buffer.push(black_box(21.5)))
    });
}

fn bench_commit_and_snapshot(c: &mut Criterion) {
    let mut buffers = TelemetryBuffers::new(100, BufferMode::SteadyWindow);
    let reading = Reading::new(21.5, 40.0, 12.0);
    c.bench_function("telemetry_commit_snapshot", |b| {
        b.iter(|| {
            buffers.commit(black_box(&reading));
            black_box(buffers.snapshot(1))
        })
    });
}

criterion_group!(benches, bench_push, bench_commit_and_snapshot);
criterion_main!(benches);
