use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use tlm_merge::{merge, Engine, MergeConfig};
use tlm_source::{VecSink, VecSource};

/// `sources` sources of `per_source` records each, interleaved round-robin.
fn interleaved(sources: u64, per_source: u64) -> Vec<VecSource> {
    (0..sources)
        .map(|s| VecSource::from_millis((0..per_source).map(move |i| i * sources + s)))
        .collect()
}

fn bench_engines(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    let mut group = c.benchmark_group("merge");

    for &sources in &[4u64, 64, 512] {
        let per_source = 20_000 / sources;
        group.throughput(Throughput::Elements(sources * per_source));

        for engine in [Engine::Eager, Engine::Bounded] {
            let id = BenchmarkId::new(engine.to_string(), sources);
            group.bench_with_input(id, &sources, |b, &n| {
                b.iter(|| {
                    runtime.block_on(async {
                        let mut sink = VecSink::new();
                        let config = MergeConfig::default();
                        merge(engine, &config, interleaved(n, per_source), &mut sink)
                            .await
                            .expect("merge");
                        sink
                    })
                })
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_engines);
criterion_main!(benches);
