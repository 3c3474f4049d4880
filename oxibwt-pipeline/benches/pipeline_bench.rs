use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use oxibwt_core::PipelineConfig;
use oxibwt_pipeline::{Pipeline, forward_bytes, inverse_bytes};
use std::hint::black_box;

fn generate_text(size: usize) -> Vec<u8> {
    let words: &[&[u8]] = &[
        b"lorem", b"ipsum", b"dolor", b"sit", b"amet", b"consectetur", b"adipiscing", b"elit",
        b"sed", b"do", b"eiusmod", b"tempor",
    ];

    let mut data = Vec::with_capacity(size);
    let mut seed = 7u32;
    while data.len() < size {
        seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
        data.extend_from_slice(words[(seed as usize) % words.len()]);
        data.push(b' ');
    }
    data.truncate(size);
    data
}

fn bench_forward_workers(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_forward");
    let size = 1024 * 1024;
    let data = generate_text(size);
    group.throughput(Throughput::Bytes(size as u64));
    group.sample_size(10);

    group.bench_function("sequential", |b| {
        let config = PipelineConfig::new(4096);
        b.iter(|| black_box(forward_bytes(&data, &config).unwrap()));
    });

    for workers in [1, 2, 4, 8] {
        let pipeline = Pipeline::new(PipelineConfig::new(4096).with_workers(workers)).unwrap();
        group.bench_with_input(BenchmarkId::new("workers", workers), &data, |b, data| {
            b.iter(|| black_box(pipeline.forward_to_vec(data).unwrap()));
        });
    }

    group.finish();
}

fn bench_inverse_workers(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_inverse");
    let size = 1024 * 1024;
    let config = PipelineConfig::new(4096);
    let stream = forward_bytes(&generate_text(size), &config).unwrap();
    group.throughput(Throughput::Bytes(size as u64));
    group.sample_size(10);

    group.bench_function("sequential", |b| {
        b.iter(|| black_box(inverse_bytes(&stream, &config).unwrap()));
    });

    for workers in [1, 4] {
        let pipeline = Pipeline::new(config.with_workers(workers)).unwrap();
        group.bench_with_input(BenchmarkId::new("workers", workers), &stream, |b, stream| {
            b.iter(|| black_box(pipeline.inverse_to_vec(stream).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_forward_workers, bench_inverse_workers);
criterion_main!(benches);
