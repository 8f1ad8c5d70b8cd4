use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use futures::StreamExt;
use preflight::{DefaultPrerequisiteRegistrar, LoadResult};
use tokio::runtime::Runtime; // To run async code within Criterion

// A full load run: register `count` immediate units, drain the stream.
// Each iteration needs a fresh registrar since a run executes exactly once.
fn bench_full_load(c: &mut Criterion) {
  let rt = Runtime::new().unwrap();
  let mut group = c.benchmark_group("full_load");
  for unit_count in [1usize, 8, 64] {
    group.throughput(Throughput::Elements(unit_count as u64));
    group.bench_with_input(BenchmarkId::from_parameter(unit_count), &unit_count, |b, &count| {
      b.to_async(&rt).iter(|| async move {
        let registrar = DefaultPrerequisiteRegistrar::new();
        for index in 0..count {
          registrar.register_action(|| Ok(()), format!("unit-{index}")).unwrap();
        }
        let results: Vec<LoadResult> = registrar.load().collect().await;
        assert_eq!(results.len(), count * 2);
      });
    });
  }
  group.finish();
}

// Replay cost for a late subscriber: the run happened once during setup,
// every iteration only drains the buffered outcome.
fn bench_replay_subscription(c: &mut Criterion) {
  let rt = Runtime::new().unwrap();
  let registrar = DefaultPrerequisiteRegistrar::new();
  for index in 0..8 {
    registrar.register_action(|| Ok(()), format!("unit-{index}")).unwrap();
  }
  let live: Vec<LoadResult> = rt.block_on(registrar.load().collect());
  assert_eq!(live.len(), 16);

  c.bench_function("replay_subscription", |b| {
    b.to_async(&rt).iter(|| async {
      let results: Vec<LoadResult> = registrar.load().collect().await;
      assert_eq!(results.len(), 16);
    });
  });
}

criterion_group!(benches, bench_full_load, bench_replay_subscription);
criterion_main!(benches);
