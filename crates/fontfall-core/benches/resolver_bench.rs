use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fontfall_core::dummy_backend::{DummyFont, DummyInstanceCache, StaticCatalog};
use fontfall_core::{
    FontStyle, GlyphCoverageResolver, NegativeCoverageCache, PixelFormat, SurfaceAllocator,
    SurfaceRequest,
};

/// Catalog of `families` concrete entries behind the three generic aliases
fn resolver(
    families: usize,
) -> GlyphCoverageResolver<Arc<StaticCatalog>, Arc<DummyInstanceCache>> {
    let names: Vec<String> = ["serif", "sans-serif", "monospace"]
        .iter()
        .map(|s| s.to_string())
        .chain((0..families).map(|i| format!("Family {}", i)))
        .collect();
    let fonts = (0..families)
        .map(|i| DummyFont::new(&format!("Family {}", i), &[0x41 + i as u32]))
        .collect();
    GlyphCoverageResolver::new(
        Arc::new(StaticCatalog::new(names)),
        Arc::new(DummyInstanceCache::new(fonts)),
    )
}

fn bench_negative_cache(c: &mut Criterion) {
    let cache = NegativeCoverageCache::new();
    for cp in (0xE000..0xF900).step_by(3) {
        cache.set(cp);
    }

    let mut group = c.benchmark_group("negative_cache");
    group.throughput(Throughput::Elements(0x1900));
    group.bench_function("test_private_use", |b| {
        b.iter(|| {
            let mut hits = 0;
            for cp in 0xE000..0xF900 {
                hits += cache.test(black_box(cp)) as usize;
            }
            hits
        });
    });
    group.finish();
}

fn bench_cached_miss(c: &mut Criterion) {
    let mut group = c.benchmark_group("cached_miss");
    let style = FontStyle::default();

    for families in [10, 100, 1000] {
        let resolver = resolver(families);
        resolver.resolve(0xE000, &style);

        group.bench_with_input(BenchmarkId::from_parameter(families), &resolver, |b, r| {
            b.iter(|| r.resolve(black_box(0xE000), &style));
        });
    }
    group.finish();
}

fn bench_first_miss_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("first_miss_scan");
    let style = FontStyle::default();

    for families in [10, 100, 1000] {
        let resolver = resolver(families);
        group.bench_with_input(BenchmarkId::from_parameter(families), &resolver, |b, r| {
            b.iter(|| {
                r.negative_cache().reset_all();
                r.resolve(black_box(0xE000), &style)
            });
        });
    }
    group.finish();
}

fn bench_allocator(c: &mut Criterion) {
    let allocator = SurfaceAllocator::new();
    let requests: Vec<SurfaceRequest> = (1..=256)
        .map(|side| SurfaceRequest::new(side, side, PixelFormat::Argb32))
        .collect();

    c.bench_function("allocate_256_sizes", |b| {
        b.iter(|| {
            requests
                .iter()
                .map(|request| allocator.allocate(black_box(request)))
                .count()
        });
    });
}

criterion_group!(
    benches,
    bench_negative_cache,
    bench_cached_miss,
    bench_first_miss_scan,
    bench_allocator,
);

criterion_main!(benches);
