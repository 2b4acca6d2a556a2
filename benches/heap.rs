use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use heapcache::ds::{Heap, MinFirst};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const N: usize = 4096;

fn random_values(seed: u64) -> Vec<u64> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..N).map(|_| rng.random::<u64>()).collect()
}

fn bench_heap_push_pop(c: &mut Criterion) {
    let values = random_values(42);
    c.bench_function("heap_push_pop", |b| {
        b.iter_batched(
            || values.clone(),
            |values| {
                let mut heap = Heap::with_capacity(N, MinFirst);
                for v in values {
                    heap.push(v);
                }
                while let Ok(v) = heap.pop() {
                    std::hint::black_box(v);
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_heap_from_vec(c: &mut Criterion) {
    let values = random_values(7);
    c.bench_function("heap_from_vec", |b| {
        b.iter_batched(
            || values.clone(),
            |values| std::hint::black_box(Heap::from_vec(values, MinFirst)),
            BatchSize::SmallInput,
        )
    });
}

fn bench_heap_fix_random(c: &mut Criterion) {
    let values = random_values(11);
    c.bench_function("heap_fix_random", |b| {
        b.iter_batched(
            || (Heap::from_vec(values.clone(), MinFirst), SmallRng::seed_from_u64(3)),
            |(mut heap, mut rng)| {
                for _ in 0..N {
                    let pos = rng.random_range(0..heap.len());
                    heap.as_mut_slice()[pos] = rng.random::<u64>();
                    let _ = heap.fix(std::hint::black_box(pos));
                }
                heap
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_heap_remove_random(c: &mut Criterion) {
    let values = random_values(13);
    c.bench_function("heap_remove_random", |b| {
        b.iter_batched(
            || (Heap::from_vec(values.clone(), MinFirst), SmallRng::seed_from_u64(5)),
            |(mut heap, mut rng)| {
                while !heap.is_empty() {
                    let pos = rng.random_range(0..heap.len());
                    let _ = std::hint::black_box(heap.remove(pos));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_heap_push_pop,
    bench_heap_from_vec,
    bench_heap_fix_random,
    bench_heap_remove_random
);
criterion_main!(benches);
