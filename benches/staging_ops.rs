//! Benchmarks for staging and tag confirmation.
//!
//! These measure the in-memory side of a build session: registering folder
//! chains, staging files with last-write-wins, and merging tag contributions.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use packsmith::context::BuildContext;
use packsmith::defaults::StaticTables;
use packsmith::path::VirtualPath;
use packsmith::tags::TagContribution;
use packsmith::version::resolve;
use serde_json::json;

/// A context with `num_files` recipe documents spread over subfolders.
fn staged_context(num_files: usize) -> BuildContext {
    let mut ctx = BuildContext::new("bench", Vec::new()).unwrap();
    for i in 0..num_files {
        let path = VirtualPath::parse(&format!("bench/recipe/group{}/item{}.json", i / 50, i)).unwrap();
        ctx.stage_json(path, json!({"type": "minecraft:crafting_shapeless", "n": i}));
    }
    ctx
}

fn bench_stage_files(c: &mut Criterion) {
    let mut group = c.benchmark_group("stage_files");
    for size in [100, 1000, 5000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| black_box(staged_context(size)));
        });
    }
    group.finish();
}

fn bench_overwrite(c: &mut Criterion) {
    let ctx = staged_context(1000);
    let path = VirtualPath::parse("bench/recipe/group10/item500.json").unwrap();
    c.bench_function("overwrite_existing_file", |b| {
        b.iter_batched(
            || ctx.clone(),
            |mut ctx| {
                ctx.stage_text(path.clone(), "replaced");
                black_box(ctx)
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

fn bench_confirm_tags(c: &mut Criterion) {
    let seed = StaticTables::builtin().unwrap().essence_blacklist;
    let mut group = c.benchmark_group("confirm_tags");
    for contributions in [10, 100, 1000] {
        let mut ctx = BuildContext::new("bench", seed.clone()).unwrap();
        for i in 0..contributions {
            let name = format!("tag{}", i % 20);
            ctx.declare_tag(&name);
            ctx.contribute(TagContribution::new(&name, "item", format!("bench:item{}", i)));
        }
        ctx.remove_from_seed(&"minecraft:potion".into());

        group.bench_with_input(
            BenchmarkId::from_parameter(contributions),
            &ctx,
            |b, ctx| {
                b.iter_batched(
                    || ctx.clone(),
                    |mut ctx| black_box(ctx.confirm_tags().unwrap()),
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }
    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let tables = StaticTables::builtin().unwrap();
    c.bench_function("resolve_version", |b| {
        b.iter(|| black_box(resolve(black_box("1.21.4"), &tables.pack_formats)));
    });
}

criterion_group!(
    benches,
    bench_stage_files,
    bench_overwrite,
    bench_confirm_tags,
    bench_resolve,
);
criterion_main!(benches);
